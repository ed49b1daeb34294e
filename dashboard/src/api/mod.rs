use std::time::Duration;

use chrono::{NaiveDate, Utc};
use log::{debug, warn};
use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use agenda_shared::conflict::ConflictLevel;
use agenda_shared::models::{
    ConflictBrief, ConflictReport, Invitation, Person, StatusCounts,
};

use crate::error::{AppError, Result};
use crate::models::{
    AssignRequest, AttachmentUpload, CommentRequest, ConflictCheckRequest, CreatedId,
    HealthResponse, InvitationForm, PersonDeleteRequest, PersonDeleteSummary, PersonPayload,
    StatusChangeRequest,
};
use crate::view::InvitationFilter;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Typed client for the invitation backend.
///
/// Every GET carries a `_ts` cache-buster and `no-store` headers so the
/// client never observes a stale cached response; every request has an
/// explicit timeout. Mutations return only after the backend commits, and
/// callers re-fetch rather than patching local state.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// 409 body shape: `{ok: false, conflict: true, level, conflicts}`.
#[derive(Deserialize)]
struct ConflictEnvelope {
    #[serde(default)]
    conflict: bool,
    level: ConflictLevel,
    #[serde(default)]
    conflicts: Vec<ConflictBrief>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(ApiClient { http, base_url })
    }

    /// Builds a client from `AGENDA_API_URL` and `AGENDA_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("AGENDA_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout = std::env::var("AGENDA_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::with_timeout(base_url, Duration::from_secs(timeout))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let ts = Utc::now().timestamp_millis().to_string();
        debug!("GET {}", path);
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .query(&[("_ts", ts)])
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await?;
        into_api_result(response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        Ok(self.get(path, query).await?.json().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        debug!("POST {}", path);
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Ok(into_api_result(response).await?.json().await?)
    }

    async fn post_multipart(&self, path: &str, form: multipart::Form) -> Result<reqwest::Response> {
        debug!("POST {} (multipart)", path);
        let response = self.http.post(self.url(path)).multipart(form).send().await?;
        into_api_result(response).await
    }

    // Invitations

    /// `GET /api/invitations`, optionally constrained by status and date
    /// range. Ordering (date/time descending) comes from the backend.
    pub async fn invitations(&self, filter: &InvitationFilter) -> Result<Vec<Invitation>> {
        self.get_json("/api/invitations", &filter.to_query()).await
    }

    /// `GET /api/invitation/{id}`.
    pub async fn invitation(&self, id: i64) -> Result<Invitation> {
        self.get_json(&format!("/api/invitation/{}", id), &[]).await
    }

    /// `POST /api/invitation/create` (multipart). Returns the new id.
    pub async fn create_invitation(
        &self,
        form: &InvitationForm,
        attachment: Option<AttachmentUpload>,
    ) -> Result<i64> {
        let mut body = invitation_fields(form);
        if let Some(att) = attachment {
            body = body.part("archivo", attachment_part(att)?);
        }
        let created: CreatedId = self
            .post_multipart("/api/invitation/create", body)
            .await?
            .json()
            .await?;
        Ok(created.id)
    }

    /// `POST /api/create` — JSON variant of invitation creation, for
    /// callers with no attachment to ship.
    pub async fn create_invitation_json(&self, form: &InvitationForm) -> Result<i64> {
        let created: CreatedId = self.post_json("/api/create", form).await?;
        Ok(created.id)
    }

    /// `POST /api/invitation/update` (multipart). `remove_attachment`
    /// clears the stored file even when no replacement is sent.
    pub async fn update_invitation(
        &self,
        id: i64,
        form: &InvitationForm,
        attachment: Option<AttachmentUpload>,
        remove_attachment: bool,
    ) -> Result<()> {
        let mut body = invitation_fields(form).text("id", id.to_string());
        if remove_attachment {
            body = body.text("eliminar_archivo", "true");
        }
        if let Some(att) = attachment {
            body = body.part("archivo", attachment_part(att)?);
        }
        self.post_multipart("/api/invitation/update", body).await?;
        Ok(())
    }

    /// `POST /api/invitation/delete`.
    pub async fn delete_invitation(&self, id: i64) -> Result<()> {
        let _: serde_json::Value = self
            .post_json(
                "/api/invitation/delete",
                &CommentRequest {
                    id,
                    comment: String::new(),
                },
            )
            .await?;
        Ok(())
    }

    // Assignment actions

    /// `POST /api/assign` — confirm and assign a person. A 409 conflict
    /// surfaces as [`AppError::Conflict`].
    pub async fn assign(&self, request: &AssignRequest) -> Result<()> {
        let _: serde_json::Value = self.post_json("/api/assign", request).await?;
        Ok(())
    }

    /// `POST /api/reassign` — substitute the assigned person.
    pub async fn reassign(&self, request: &AssignRequest) -> Result<()> {
        let _: serde_json::Value = self.post_json("/api/reassign", request).await?;
        Ok(())
    }

    /// `POST /api/cancel`.
    pub async fn cancel(&self, id: i64, comment: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post_json(
                "/api/cancel",
                &CommentRequest {
                    id,
                    comment: comment.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// `POST /api/status`. Moving back to Pending clears the assignment
    /// on the backend.
    pub async fn set_status(&self, request: &StatusChangeRequest) -> Result<()> {
        let _: serde_json::Value = self.post_json("/api/status", request).await?;
        Ok(())
    }

    /// `POST /api/check-conflict` — the backend's own evaluation of an
    /// assignment slot, without committing anything.
    pub async fn check_conflict(&self, request: &ConflictCheckRequest) -> Result<ConflictReport> {
        self.post_json("/api/check-conflict", request).await
    }

    // Catalog

    /// `GET /api/catalog`, falling back to `GET /api/persons` when the
    /// primary endpoint fails or comes back empty.
    pub async fn catalog(&self) -> Result<Vec<Person>> {
        match self.get_json::<Vec<Person>>("/api/catalog", &[]).await {
            Ok(people) if !people.is_empty() => Ok(people),
            Ok(empty) => {
                debug!("catalog endpoint returned no rows, trying fallback");
                match self.get_json::<Vec<Person>>("/api/persons", &[]).await {
                    Ok(people) if !people.is_empty() => Ok(people),
                    _ => Ok(empty),
                }
            }
            Err(err) => {
                warn!("catalog endpoint failed ({}), trying fallback", err);
                self.get_json("/api/persons", &[]).await
            }
        }
    }

    /// `POST /api/person/create`. Returns the new id.
    pub async fn create_person(&self, payload: &PersonPayload) -> Result<i64> {
        let created: CreatedId = self.post_json("/api/person/create", payload).await?;
        Ok(created.id)
    }

    /// `POST /api/person/update`.
    pub async fn update_person(&self, payload: &PersonPayload) -> Result<()> {
        let _: serde_json::Value = self.post_json("/api/person/update", payload).await?;
        Ok(())
    }

    /// `POST /api/person/delete`. Returns how many invitations the
    /// backend released back to Pending.
    pub async fn delete_person(&self, id: i64) -> Result<u64> {
        let summary: PersonDeleteSummary = self
            .post_json("/api/person/delete", &PersonDeleteRequest { id })
            .await?;
        Ok(summary.released_invitations)
    }

    // Dashboard extras

    /// `GET /api/stats` — per-status counts for a date range.
    pub async fn stats(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<StatusCounts> {
        let mut query = Vec::new();
        if let Some(from) = from {
            query.push(("date_from", from.to_string()));
        }
        if let Some(to) = to {
            query.push(("date_to", to.to_string()));
        }
        self.get_json("/api/stats", &query).await
    }

    /// `GET /api/counters` — global per-status counts plus total.
    pub async fn counters(&self) -> Result<StatusCounts> {
        self.get_json("/api/counters", &[]).await
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<bool> {
        let health: HealthResponse = self.get_json("/api/health", &[]).await?;
        Ok(health.ok)
    }

    /// `GET /api/report/confirmados.xlsx` — opaque spreadsheet bytes,
    /// not parsed client-side.
    pub async fn download_confirmed_report(&self) -> Result<Vec<u8>> {
        let response = self.get("/api/report/confirmados.xlsx", &[]).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn invitation_fields(form: &InvitationForm) -> multipart::Form {
    multipart::Form::new()
        .text("fecha", form.date.clone())
        .text("hora", form.time.clone())
        .text("evento", form.event.clone())
        .text("convoca_cargo", form.convener_title.clone())
        .text("convoca", form.convener.clone())
        .text("partido_politico", form.party.clone())
        .text("municipio", form.municipality.clone())
        .text("lugar", form.venue.clone())
        .text("observaciones", form.notes.clone())
}

fn attachment_part(att: AttachmentUpload) -> Result<multipart::Part> {
    Ok(multipart::Part::bytes(att.bytes)
        .file_name(att.file_name)
        .mime_str(&att.mime)?)
}

/// Maps non-2xx responses into the error taxonomy. A 409 whose body says
/// `conflict: true` becomes [`AppError::Conflict`]; everything else
/// surfaces the structured `{error}` message when one is present.
async fn into_api_result(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    if status == reqwest::StatusCode::CONFLICT {
        if let Ok(envelope) = serde_json::from_str::<ConflictEnvelope>(&body) {
            if envelope.conflict {
                return Err(AppError::Conflict(ConflictReport {
                    level: envelope.level,
                    conflicts: envelope.conflicts,
                }));
            }
        }
    }

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    Err(AppError::api(status.as_u16(), message))
}
