//! Double-booking detection for assignment attempts.
//!
//! Pure computation over an invitation snapshot supplied by the caller;
//! nothing here talks to the backend. The backend runs the same
//! classification on every assign/reassign and its verdict wins, so this
//! module only has to agree with it often enough to save a round trip.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{Invitation, InvitationStatus};
use crate::time::minutes_between;

/// Near-collision window, in minutes.
pub const TIGHT_1H_MINUTES: i64 = 60;
/// Outer warning window, in minutes.
pub const TIGHT_2H_MINUTES: i64 = 120;

/// Severity of a temporal overlap between two invitations assigned to the
/// same person. Ordered: `None < Tight2h < Tight1h < Hard`.
#[derive(
    Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ConflictLevel {
    #[default]
    None,
    Tight2h,
    Tight1h,
    Hard,
}

impl std::fmt::Display for ConflictLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConflictLevel::None => "none",
            ConflictLevel::Tight2h => "tight2h",
            ConflictLevel::Tight1h => "tight1h",
            ConflictLevel::Hard => "hard",
        };
        write!(f, "{}", s)
    }
}

/// Result of evaluating one assignment attempt: the worst severity found
/// and every invitation that classified above `None`, in fetch order.
/// Derived on each attempt and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub level: ConflictLevel,
    pub conflicts: Vec<Invitation>,
}

impl Verdict {
    pub fn clear() -> Self {
        Verdict {
            level: ConflictLevel::None,
            conflicts: Vec::new(),
        }
    }

    pub fn is_clear(&self) -> bool {
        self.level == ConflictLevel::None
    }
}

/// Decides whether assigning `person_id` to `target` collides with that
/// person's other commitments in `snapshot`.
///
/// Candidates are the snapshot entries assigned to the person, excluding
/// `target` itself and anything Cancelled. Only same-calendar-date pairs
/// can conflict; a missing time on either side makes the pair
/// non-comparable. Severity per candidate:
/// - `Hard` — identical time and the candidate is an active commitment
///   (Confirmed or Substituted).
/// - `Tight1h` — within one hour, not identical.
/// - `Tight2h` — more than one hour but within two.
pub fn evaluate(target: &Invitation, person_id: i64, snapshot: &[Invitation]) -> Verdict {
    let (date, time) = match target.when() {
        Some(v) => v,
        // Without a comparable timestamp there is nothing to check.
        None => return Verdict::clear(),
    };

    let mut level = ConflictLevel::None;
    let mut conflicts = Vec::new();

    for candidate in snapshot {
        if candidate.id == target.id
            || candidate.person_id != Some(person_id)
            || candidate.status == InvitationStatus::Cancelled
            || candidate.date != Some(date)
        {
            continue;
        }

        let candidate_time = match candidate.time {
            Some(t) => t,
            None => continue,
        };

        let minutes = minutes_between(candidate_time, time);
        let candidate_level = if minutes == 0 && candidate.status.is_active_commitment() {
            ConflictLevel::Hard
        } else if minutes > 0 && minutes <= TIGHT_1H_MINUTES {
            ConflictLevel::Tight1h
        } else if minutes > TIGHT_1H_MINUTES && minutes <= TIGHT_2H_MINUTES {
            ConflictLevel::Tight2h
        } else {
            ConflictLevel::None
        };

        if candidate_level != ConflictLevel::None {
            level = level.max(candidate_level);
            conflicts.push(candidate.clone());
        }
    }

    if level != ConflictLevel::None {
        debug!(
            "conflict {} for person {} on invitation {}: {} overlapping",
            level,
            person_id,
            target.id,
            conflicts.len()
        );
    }

    Verdict { level, conflicts }
}
