use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::conflict::ConflictLevel;
use crate::time::{self, hhmm};

/// A person from the catalog, available for assignment.
///
/// The backend serializes catalog rows with display-style keys, so every
/// field carries an explicit wire rename. Identity is the integer `id`;
/// names are display data and never used as a join key.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Person {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Nombre", default)]
    pub name: String,
    #[serde(rename = "Cargo", default)]
    pub title: String,
    #[serde(rename = "Teléfono", default)]
    pub phone: String,
    #[serde(rename = "Correo", default)]
    pub email: String,
    #[serde(rename = "Unidad/Región", default)]
    pub unit: String,
}

/// Lifecycle state of an invitation.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvitationStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Confirmado")]
    Confirmed,
    #[serde(rename = "Sustituido")]
    Substituted,
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl InvitationStatus {
    /// Wire name of the status, as the backend stores and filters it.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "Pendiente",
            InvitationStatus::Confirmed => "Confirmado",
            InvitationStatus::Substituted => "Sustituido",
            InvitationStatus::Cancelled => "Cancelado",
        }
    }

    /// True for statuses that represent an active commitment of the
    /// assigned person (they will attend unless something changes).
    pub fn is_active_commitment(&self) -> bool {
        matches!(
            self,
            InvitationStatus::Confirmed | InvitationStatus::Substituted
        )
    }
}

impl std::str::FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pendiente" | "pending" => Ok(InvitationStatus::Pending),
            "confirmado" | "confirmed" => Ok(InvitationStatus::Confirmed),
            "sustituido" | "substituted" => Ok(InvitationStatus::Substituted),
            "cancelado" | "cancelled" => Ok(InvitationStatus::Cancelled),
            _ => Err(format!("unknown status: {}", s)),
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An event a person may be assigned to attend.
///
/// This is a read copy of the backend record. The backend serializes both
/// machine-readable (`FechaISO`, `HoraISO`) and pre-formatted display
/// fields; we deserialize the ISO forms and ignore the rest.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Invitation {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "PersonaID", default)]
    pub person_id: Option<i64>,
    #[serde(rename = "Evento", default)]
    pub event: String,
    #[serde(rename = "Convoca Cargo", default)]
    pub convener_title: String,
    #[serde(rename = "Convoca", default)]
    pub convener: String,
    #[serde(rename = "Partido Político", default)]
    pub party: String,
    #[serde(rename = "FechaISO", default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "HoraISO", default, with = "hhmm::option")]
    pub time: Option<NaiveTime>,
    #[serde(rename = "Municipio/Dependencia", default)]
    pub municipality: String,
    #[serde(rename = "Lugar", default)]
    pub venue: String,
    #[serde(rename = "Estatus", default)]
    pub status: InvitationStatus,
    #[serde(rename = "Asignado A", default)]
    pub assignee_name: String,
    #[serde(rename = "PersonaNombre", default)]
    pub person_name: Option<String>,
    #[serde(rename = "Rol", default)]
    pub role: String,
    #[serde(rename = "Observaciones", default)]
    pub notes: String,
    #[serde(rename = "Fecha Asignación", default)]
    pub assigned_at: String,
    #[serde(rename = "Última Modificación", default)]
    pub modified_at: String,
    #[serde(rename = "Modificado Por", default)]
    pub modified_by: String,
    #[serde(rename = "ArchivoURL", default)]
    pub file_url: String,
    #[serde(rename = "ArchivoNombre", default)]
    pub file_name: String,
    #[serde(rename = "ArchivoMime", default)]
    pub file_mime: String,
    #[serde(rename = "ArchivoTamano", default)]
    pub file_size: u64,
    #[serde(rename = "ArchivoTS", default)]
    pub file_ts: String,
    #[serde(rename = "DiasParaEvento", default)]
    pub days_until_event: Option<i64>,
}

impl Invitation {
    /// Display name of the current assignee: the live catalog name when
    /// the relation resolved, otherwise the denormalized snapshot.
    pub fn assignee_label(&self) -> &str {
        match self.person_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.assignee_name,
        }
    }

    /// Date and time together, when both are present.
    pub fn when(&self) -> Option<(NaiveDate, NaiveTime)> {
        Some((self.date?, self.time?))
    }

    pub fn has_attachment(&self) -> bool {
        !self.file_url.is_empty()
    }
}

/// Compact description of a conflicting invitation, as carried in 409
/// conflict payloads and conflict-check responses. Dates and times are
/// pre-formatted display strings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ConflictBrief {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Evento", default)]
    pub event: String,
    #[serde(rename = "FechaFmt", default)]
    pub date: String,
    #[serde(rename = "HoraFmt", default)]
    pub time: String,
    #[serde(rename = "Estatus", default)]
    pub status: String,
    #[serde(rename = "Lugar", default)]
    pub venue: String,
}

impl From<&Invitation> for ConflictBrief {
    fn from(inv: &Invitation) -> Self {
        ConflictBrief {
            id: inv.id,
            event: inv.event.clone(),
            date: time::fmt_date(inv.date),
            time: time::fmt_time(inv.time),
            status: inv.status.as_str().to_string(),
            venue: inv.venue.clone(),
        }
    }
}

/// Conflict verdict as reported by the backend (409 payload body or a
/// `check-conflict` response). The server is authoritative: when it
/// rejects an assignment, its report replaces any locally computed one.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ConflictReport {
    pub level: ConflictLevel,
    #[serde(default)]
    pub conflicts: Vec<ConflictBrief>,
}

/// Per-status invitation counts, for the dashboard header KPIs.
/// `total` is only present on the global counters endpoint.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct StatusCounts {
    #[serde(rename = "Pendiente", default)]
    pub pending: u64,
    #[serde(rename = "Confirmado", default)]
    pub confirmed: u64,
    #[serde(rename = "Sustituido", default)]
    pub substituted: u64,
    #[serde(rename = "Cancelado", default)]
    pub cancelled: u64,
    #[serde(rename = "Total", default)]
    pub total: Option<u64>,
}
