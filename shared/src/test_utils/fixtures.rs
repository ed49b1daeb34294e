use chrono::{NaiveDate, NaiveTime};

use crate::models::{Invitation, InvitationStatus, Person};

/// Catalog entry with plausible contact fields.
pub fn sample_person(id: i64, name: &str) -> Person {
    Person {
        id,
        name: name.to_string(),
        title: "Representante".to_string(),
        phone: "5512345678".to_string(),
        email: format!("persona{}@example.org", id),
        unit: "Región Centro".to_string(),
    }
}

/// Invitation with a concrete slot, for conflict and orchestration tests.
/// `date` is ISO `YYYY-MM-DD`, `time` is `HH:MM`; both must be valid.
pub fn scheduled(
    id: i64,
    person_id: Option<i64>,
    date: &str,
    time: &str,
    status: InvitationStatus,
) -> Invitation {
    let mut inv = unscheduled(id);
    inv.person_id = person_id;
    inv.date = Some(
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("bad fixture date: {}", date)),
    );
    inv.time = Some(
        NaiveTime::parse_from_str(time, "%H:%M")
            .unwrap_or_else(|_| panic!("bad fixture time: {}", time)),
    );
    inv.status = status;
    inv
}

/// Minimal pending invitation with no slot and no assignee.
pub fn unscheduled(id: i64) -> Invitation {
    Invitation {
        id,
        person_id: None,
        event: format!("Evento {}", id),
        convener_title: "Diputado(a)".to_string(),
        convener: "J. López".to_string(),
        party: String::new(),
        date: None,
        time: None,
        municipality: "Centro".to_string(),
        venue: "Auditorio Municipal".to_string(),
        status: InvitationStatus::Pending,
        assignee_name: String::new(),
        person_name: None,
        role: String::new(),
        notes: String::new(),
        assigned_at: String::new(),
        modified_at: String::new(),
        modified_by: String::new(),
        file_url: String::new(),
        file_name: String::new(),
        file_mime: String::new(),
        file_size: 0,
        file_ts: String::new(),
        days_until_event: None,
    }
}
