use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// Request DTOs

/// Body of `POST /api/assign` and `POST /api/reassign`. `force` carries a
/// user's explicit decision to override a reported conflict.
#[derive(Serialize, Debug, Clone)]
pub struct AssignRequest {
    pub id: i64,
    #[serde(rename = "persona_id")]
    pub person_id: i64,
    #[serde(rename = "rol")]
    pub role: String,
    #[serde(rename = "comentario")]
    pub comment: String,
    pub force: bool,
}

/// Body of `POST /api/cancel` and `POST /api/invitation/delete`.
#[derive(Serialize, Debug, Clone)]
pub struct CommentRequest {
    pub id: i64,
    #[serde(rename = "comentario", skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

/// Body of `POST /api/status`.
#[derive(Serialize, Debug, Clone)]
pub struct StatusChangeRequest {
    pub id: i64,
    #[serde(rename = "estatus")]
    pub status: agenda_shared::models::InvitationStatus,
    #[serde(rename = "comentario")]
    pub comment: String,
}

/// Body of `POST /api/check-conflict`.
#[derive(Serialize, Debug, Clone)]
pub struct ConflictCheckRequest {
    #[serde(rename = "persona_id")]
    pub person_id: i64,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "hora", with = "agenda_shared::time::hhmm::option")]
    pub time: Option<NaiveTime>,
    #[serde(rename = "exclude_id", skip_serializing_if = "Option::is_none")]
    pub exclude_id: Option<i64>,
}

/// User-entered invitation fields, as typed into the create/edit form.
/// Dates and times stay raw strings here; validation parses them before
/// anything is sent. Serializes to the backend's snake-case form keys
/// (the JSON create variant takes the same names as the multipart one).
#[derive(Serialize, Debug, Clone, Default)]
pub struct InvitationForm {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "evento")]
    pub event: String,
    #[serde(rename = "convoca_cargo")]
    pub convener_title: String,
    #[serde(rename = "convoca")]
    pub convener: String,
    #[serde(rename = "partido_politico")]
    pub party: String,
    #[serde(rename = "municipio")]
    pub municipality: String,
    #[serde(rename = "lugar")]
    pub venue: String,
    #[serde(rename = "observaciones")]
    pub notes: String,
}

/// An attachment picked for upload alongside an invitation.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Catalog mutation payload: create when `id` is absent, update when
/// present. Wire keys match the backend's display-style field names.
#[derive(Serialize, Debug, Clone, Default)]
pub struct PersonPayload {
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Cargo")]
    pub title: String,
    #[serde(rename = "Teléfono")]
    pub phone: String,
    #[serde(rename = "Correo")]
    pub email: String,
    #[serde(rename = "Unidad/Región")]
    pub unit: String,
}

/// Body of `POST /api/person/delete`.
#[derive(Serialize, Debug, Clone)]
pub struct PersonDeleteRequest {
    #[serde(rename = "ID")]
    pub id: i64,
}

// Response DTOs

#[derive(Deserialize, Debug, Clone)]
pub struct CreatedId {
    pub id: i64,
}

/// Deleting a person also releases their invitations back to Pending;
/// the backend reports how many it touched.
#[derive(Deserialize, Debug, Clone)]
pub struct PersonDeleteSummary {
    #[serde(rename = "invitaciones_actualizadas", default)]
    pub released_invitations: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub ok: bool,
}
