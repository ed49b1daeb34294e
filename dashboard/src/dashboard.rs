use chrono::NaiveDate;
use log::{debug, info};

use agenda_shared::models::{Invitation, InvitationStatus, StatusCounts};

use crate::api::ApiClient;
use crate::cache::CatalogCache;
use crate::error::{AppError, Result};
use crate::models::{AttachmentUpload, InvitationForm, PersonPayload, StatusChangeRequest};
use crate::orchestrator::{AssignmentOrchestrator, AssignmentOutcome, OverridePrompt};
use crate::validate::{validate_attachment, validate_invitation_form, validate_person};
use crate::view::{InvitationFilter, InvitationView};

/// The whole client-side state in one place: the API client, the person
/// catalog, the invitation listing and the user-decision prompt. Every
/// operation that mutates backend state re-fetches what it invalidated
/// before returning, so the caller always reads post-commit data.
///
/// Methods take `&mut self`: one user action runs at a time.
pub struct Dashboard<P> {
    client: ApiClient,
    pub catalog: CatalogCache,
    pub view: InvitationView,
    prompt: P,
}

impl<P: OverridePrompt> Dashboard<P> {
    pub fn new(client: ApiClient, prompt: P) -> Self {
        Dashboard {
            client,
            catalog: CatalogCache::default(),
            view: InvitationView::default(),
            prompt,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Initial load: catalog first, then the unfiltered listing.
    pub async fn start(&mut self) -> Result<()> {
        self.catalog.reload(&self.client).await?;
        self.view.reload(&self.client).await
    }

    /// Applies a new listing filter and re-fetches.
    pub async fn apply_filter(&mut self, filter: InvitationFilter) -> Result<()> {
        self.view.set_filter(filter);
        self.view.reload(&self.client).await
    }

    pub async fn reload_catalog(&mut self) -> Result<()> {
        self.catalog.reload(&self.client).await
    }

    // Invitation CRUD

    pub async fn create_invitation(
        &mut self,
        form: &InvitationForm,
        attachment: Option<AttachmentUpload>,
    ) -> Result<i64> {
        validate_invitation_form(form)?;
        if let Some(att) = &attachment {
            validate_attachment(att)?;
        }
        let id = self.client.create_invitation(form, attachment).await?;
        info!("created invitation {}", id);
        self.view.reload(&self.client).await?;
        Ok(id)
    }

    pub async fn update_invitation(
        &mut self,
        id: i64,
        form: &InvitationForm,
        attachment: Option<AttachmentUpload>,
        remove_attachment: bool,
    ) -> Result<()> {
        validate_invitation_form(form)?;
        if let Some(att) = &attachment {
            validate_attachment(att)?;
        }
        self.client
            .update_invitation(id, form, attachment, remove_attachment)
            .await?;
        self.view.reload(&self.client).await
    }

    pub async fn delete_invitation(&mut self, id: i64) -> Result<()> {
        self.client.delete_invitation(id).await?;
        self.view.reload(&self.client).await
    }

    // Assignment flow

    /// Assign a person; may suspend on the prompt when a conflict is
    /// found locally or reported by the backend.
    pub async fn assign(
        &mut self,
        invitation_id: i64,
        person_id: i64,
        role: &str,
        comment: &str,
    ) -> Result<AssignmentOutcome> {
        self.drive_assignment(invitation_id, person_id, role, comment, false)
            .await
    }

    /// Substitute the assigned person (same flow, status Sustituido).
    pub async fn substitute(
        &mut self,
        invitation_id: i64,
        person_id: i64,
        role: &str,
        comment: &str,
    ) -> Result<AssignmentOutcome> {
        self.drive_assignment(invitation_id, person_id, role, comment, true)
            .await
    }

    async fn drive_assignment(
        &mut self,
        invitation_id: i64,
        person_id: i64,
        role: &str,
        comment: &str,
        substitute: bool,
    ) -> Result<AssignmentOutcome> {
        // Fresh copy of the target; the listing may be stale.
        let target = self.client.invitation(invitation_id).await?;
        let person = self.resolve_person(person_id).await?;
        let snapshot = self.conflict_snapshot(&target).await?;

        let mut orchestrator = AssignmentOrchestrator::new(&self.client, &self.prompt);
        let outcome = if substitute {
            orchestrator
                .substitute(&target, &person, role, comment, &snapshot)
                .await?
        } else {
            orchestrator
                .assign(&target, &person, role, comment, &snapshot)
                .await?
        };

        if outcome == AssignmentOutcome::Committed {
            self.view.reload(&self.client).await?;
        }
        Ok(outcome)
    }

    async fn resolve_person(&mut self, person_id: i64) -> Result<agenda_shared::models::Person> {
        if let Some(person) = self.catalog.lookup(person_id) {
            return Ok(person.clone());
        }
        debug!("person {} not cached, reloading catalog", person_id);
        self.catalog.reload(&self.client).await?;
        self.catalog
            .lookup(person_id)
            .cloned()
            .ok_or_else(|| AppError::validation(format!("unknown person id {}", person_id)))
    }

    /// Snapshot for conflict evaluation: everything scheduled on the
    /// target's date. An unscheduled target cannot conflict.
    async fn conflict_snapshot(&self, target: &Invitation) -> Result<Vec<Invitation>> {
        match target.date {
            Some(date) => {
                self.client
                    .invitations(&InvitationFilter::on_date(date))
                    .await
            }
            None => Ok(Vec::new()),
        }
    }

    // Status transitions

    pub async fn cancel(&mut self, id: i64, comment: &str) -> Result<()> {
        self.client.cancel(id, comment).await?;
        self.view.reload(&self.client).await
    }

    /// Back to Pending; the backend clears the assignment fields.
    pub async fn reactivate(&mut self, id: i64, comment: &str) -> Result<()> {
        self.set_status(id, InvitationStatus::Pending, comment).await
    }

    pub async fn set_status(
        &mut self,
        id: i64,
        status: InvitationStatus,
        comment: &str,
    ) -> Result<()> {
        self.client
            .set_status(&StatusChangeRequest {
                id,
                status,
                comment: comment.to_string(),
            })
            .await?;
        self.view.reload(&self.client).await
    }

    // Catalog mutations

    pub async fn create_person(&mut self, payload: &PersonPayload) -> Result<i64> {
        validate_person(payload)?;
        let id = self.client.create_person(payload).await?;
        info!("created person {}", id);
        self.catalog.reload(&self.client).await?;
        Ok(id)
    }

    pub async fn update_person(&mut self, payload: &PersonPayload) -> Result<()> {
        validate_person(payload)?;
        self.client.update_person(payload).await?;
        self.catalog.reload(&self.client).await
    }

    /// Deletes a person; their invitations fall back to Pending on the
    /// backend, so both the catalog and the listing are re-fetched.
    pub async fn delete_person(&mut self, id: i64) -> Result<u64> {
        let released = self.client.delete_person(id).await?;
        info!("deleted person {}, released {} invitations", id, released);
        self.catalog.reload(&self.client).await?;
        self.view.reload(&self.client).await?;
        Ok(released)
    }

    // Dashboard extras

    pub async fn counters(&self) -> Result<StatusCounts> {
        self.client.counters().await
    }

    pub async fn stats(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<StatusCounts> {
        self.client.stats(from, to).await
    }

    pub async fn export_confirmed_report(&self) -> Result<Vec<u8>> {
        self.client.download_confirmed_report().await
    }
}
