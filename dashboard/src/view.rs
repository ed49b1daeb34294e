use chrono::NaiveDate;
use log::info;

use agenda_shared::models::{Invitation, InvitationStatus};

use crate::api::ApiClient;
use crate::error::Result;

/// Active listing constraints: status and/or an inclusive date range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvitationFilter {
    pub status: Option<InvitationStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl InvitationFilter {
    /// Everything on a single day; used for conflict snapshots.
    pub fn on_date(date: NaiveDate) -> Self {
        InvitationFilter {
            status: None,
            from: Some(date),
            to: Some(date),
        }
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(from) = self.from {
            query.push(("date_from", from.to_string()));
        }
        if let Some(to) = self.to {
            query.push(("date_to", to.to_string()));
        }
        query
    }
}

/// The last-fetched invitation listing.
///
/// Read-only view with pessimistic consistency: it is never patched in
/// place after a mutation, only re-fetched. A reload replaces the rows
/// wholesale once the fetch succeeds; failures keep the previous rows.
#[derive(Default)]
pub struct InvitationView {
    filter: InvitationFilter,
    rows: Vec<Invitation>,
}

impl InvitationView {
    pub fn filter(&self) -> &InvitationFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: InvitationFilter) {
        self.filter = filter;
    }

    pub fn rows(&self) -> &[Invitation] {
        &self.rows
    }

    pub fn get(&self, id: i64) -> Option<&Invitation> {
        self.rows.iter().find(|inv| inv.id == id)
    }

    /// Re-fetches the listing under the current filter.
    pub async fn reload(&mut self, client: &ApiClient) -> Result<()> {
        let rows = client.invitations(&self.filter).await?;
        info!("loaded {} invitations", rows.len());
        self.rows = rows;
        Ok(())
    }
}
