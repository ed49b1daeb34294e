use async_trait::async_trait;
use log::{info, warn};

use agenda_shared::conflict::{evaluate, ConflictLevel};
use agenda_shared::models::{ConflictBrief, Invitation, Person};

use crate::api::ApiClient;
use crate::error::{AppError, Result};
use crate::models::AssignRequest;

/// The user-decision seam of the assignment flow: shown a conflict
/// verdict, the user answers whether to commit anyway.
#[async_trait]
pub trait OverridePrompt: Send + Sync {
    async fn confirm_override(&self, level: ConflictLevel, conflicts: &[ConflictBrief]) -> bool;
}

/// How a driven attempt ended. Backend failures are not an outcome; they
/// propagate as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// The mutation was accepted by the backend.
    Committed,
    /// The user declined to override a conflict; nothing was sent, or a
    /// rejected attempt was not retried.
    Abandoned,
}

#[derive(Debug, Clone, Copy)]
enum AssignmentKind {
    Assign,
    Substitute,
}

/// Drives one assign/reassign attempt to a terminal state.
///
/// Flow: evaluate the local snapshot; a clean verdict commits directly,
/// anything else asks the prompt first and commits with `force` on a yes.
/// When the backend still answers 409 (its snapshot is newer than ours),
/// its verdict replaces the local one and the user decides again.
///
/// Takes `&mut self` so one orchestrator instance can only run a single
/// attempt at a time.
pub struct AssignmentOrchestrator<'a> {
    client: &'a ApiClient,
    prompt: &'a dyn OverridePrompt,
}

impl<'a> AssignmentOrchestrator<'a> {
    pub fn new(client: &'a ApiClient, prompt: &'a dyn OverridePrompt) -> Self {
        AssignmentOrchestrator { client, prompt }
    }

    /// Assign `person` to `target` (status becomes Confirmado).
    pub async fn assign(
        &mut self,
        target: &Invitation,
        person: &Person,
        role: &str,
        comment: &str,
        snapshot: &[Invitation],
    ) -> Result<AssignmentOutcome> {
        self.run(AssignmentKind::Assign, target, person, role, comment, snapshot)
            .await
    }

    /// Replace the assigned person (status becomes Sustituido).
    pub async fn substitute(
        &mut self,
        target: &Invitation,
        person: &Person,
        role: &str,
        comment: &str,
        snapshot: &[Invitation],
    ) -> Result<AssignmentOutcome> {
        self.run(
            AssignmentKind::Substitute,
            target,
            person,
            role,
            comment,
            snapshot,
        )
        .await
    }

    async fn run(
        &mut self,
        kind: AssignmentKind,
        target: &Invitation,
        person: &Person,
        role: &str,
        comment: &str,
        snapshot: &[Invitation],
    ) -> Result<AssignmentOutcome> {
        let verdict = evaluate(target, person.id, snapshot);

        let mut force = false;
        if !verdict.is_clear() {
            let briefs: Vec<ConflictBrief> =
                verdict.conflicts.iter().map(ConflictBrief::from).collect();
            if !self.prompt.confirm_override(verdict.level, &briefs).await {
                info!(
                    "assignment of person {} to invitation {} abandoned ({} conflict)",
                    person.id, target.id, verdict.level
                );
                return Ok(AssignmentOutcome::Abandoned);
            }
            force = true;
        }

        let mut request = AssignRequest {
            id: target.id,
            person_id: person.id,
            role: role.trim().to_string(),
            comment: comment.trim().to_string(),
            force,
        };

        loop {
            let result = match kind {
                AssignmentKind::Assign => self.client.assign(&request).await,
                AssignmentKind::Substitute => self.client.reassign(&request).await,
            };

            match result {
                Ok(()) => {
                    info!(
                        "invitation {} committed to person {} (force: {})",
                        target.id, person.id, request.force
                    );
                    return Ok(AssignmentOutcome::Committed);
                }
                // The backend re-validated against fresher data and
                // rejected; its verdict is authoritative.
                Err(AppError::Conflict(report)) => {
                    warn!(
                        "backend reported {} conflict for invitation {}",
                        report.level, target.id
                    );
                    if !self
                        .prompt
                        .confirm_override(report.level, &report.conflicts)
                        .await
                    {
                        return Ok(AssignmentOutcome::Abandoned);
                    }
                    request.force = true;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
