//! Client-side form validation. Anything rejected here never reaches the
//! backend.

use agenda_shared::time::{parse_date_flexible, parse_time_flexible};

use crate::error::{AppError, Result};
use crate::models::{AttachmentUpload, InvitationForm, PersonPayload};

/// Attachment types the backend stores.
pub const ALLOWED_ATTACHMENT_EXTS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

/// Required fields plus date/time sanity for the invitation form.
/// Notes and party are optional.
pub fn validate_invitation_form(form: &InvitationForm) -> Result<()> {
    let required = [
        ("fecha", &form.date),
        ("hora", &form.time),
        ("evento", &form.event),
        ("convoca_cargo", &form.convener_title),
        ("convoca", &form.convener),
        ("municipio", &form.municipality),
        ("lugar", &form.venue),
    ];

    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    if parse_date_flexible(&form.date).is_none() {
        return Err(AppError::validation(format!(
            "unrecognized date: {}",
            form.date
        )));
    }
    if parse_time_flexible(&form.time).is_none() {
        return Err(AppError::validation(format!(
            "unrecognized time: {}",
            form.time
        )));
    }

    Ok(())
}

/// Name and title are mandatory; the phone, when present, must be
/// exactly ten digits.
pub fn validate_person(payload: &PersonPayload) -> Result<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    if payload.title.trim().is_empty() {
        return Err(AppError::validation("title is required"));
    }

    let phone = payload.phone.trim();
    if !phone.is_empty() && (phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit())) {
        return Err(AppError::validation(format!(
            "phone must be 10 digits: {}",
            phone
        )));
    }

    Ok(())
}

/// Extension allow-list check, mirroring what the backend accepts.
pub fn validate_attachment(attachment: &AttachmentUpload) -> Result<()> {
    let ext = attachment
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase());
    match ext {
        Some(ext) if ALLOWED_ATTACHMENT_EXTS.contains(&ext.as_str()) => Ok(()),
        _ => Err(AppError::validation(format!(
            "unsupported attachment type: {}",
            attachment.file_name
        ))),
    }
}
