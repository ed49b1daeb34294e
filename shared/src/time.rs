//! Date and time helpers shared by the API client and the conflict logic.
//!
//! The backend stores dates and times as plain calendar values with no
//! timezone; user-facing inputs arrive in several regional formats, so
//! parsing is deliberately tolerant while wire formats stay strict.

use chrono::{NaiveDate, NaiveTime};

/// Strict ISO `YYYY-MM-DD` parse.
pub fn parse_date_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Tolerant date parse: ISO `YYYY-MM-DD`, `dd/mm/yyyy` or `dd/mm/yy`.
pub fn parse_date_flexible(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = parse_date_iso(s) {
        return Some(d);
    }
    for fmt in ["%d/%m/%Y", "%d/%m/%y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Tolerant time parse.
///
/// Accepts `HH:MM`, `HH:MM:SS` and 12-hour `h[:mm[:ss]] am/pm` forms
/// (`3 pm`, `03:05 PM`, `12:30am`).
pub fn parse_time_flexible(s: &str) -> Option<NaiveTime> {
    let v = s.trim().to_lowercase();
    if v.is_empty() {
        return None;
    }

    if let Some(t) = parse_time_ampm(&v) {
        return Some(t);
    }

    // 24h HH:MM(:SS)
    let parts: Vec<&str> = v.split(':').collect();
    match parts.as_slice() {
        [h, m] => NaiveTime::from_hms_opt(h.trim().parse().ok()?, m.trim().parse().ok()?, 0),
        [h, m, s, ..] => NaiveTime::from_hms_opt(
            h.trim().parse().ok()?,
            m.trim().parse().ok()?,
            s.trim().parse().ok()?,
        ),
        _ => None,
    }
}

fn parse_time_ampm(v: &str) -> Option<NaiveTime> {
    let (body, is_pm) = if let Some(body) = v.strip_suffix("am") {
        (body, false)
    } else if let Some(body) = v.strip_suffix("pm") {
        (body, true)
    } else {
        return None;
    };

    let mut parts = body.trim().split(':');
    let hh: u32 = parts.next()?.trim().parse().ok()?;
    let mm: u32 = match parts.next() {
        Some(p) => p.trim().parse().ok()?,
        None => 0,
    };
    let ss: u32 = match parts.next() {
        Some(p) => p.trim().parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() || hh > 12 {
        return None;
    }

    // 12 am is midnight, 12 pm is noon
    let mut hh = if hh == 12 { 0 } else { hh };
    if is_pm {
        hh += 12;
    }
    NaiveTime::from_hms_opt(hh, mm, ss)
}

/// `dd/mm/yy` display form, empty when absent.
pub fn fmt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format("%d/%m/%y").to_string())
        .unwrap_or_default()
}

/// `HH:MM` display form, empty when absent.
pub fn fmt_time(t: Option<NaiveTime>) -> String {
    t.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
}

/// Absolute difference between two times of the same day, in minutes.
pub fn minutes_between(a: NaiveTime, b: NaiveTime) -> i64 {
    (a - b).num_minutes().abs()
}

/// Serde adapter for the backend's `"HH:MM"` time fields, which chrono's
/// default `NaiveTime` format (`HH:MM:SS`) would reject.
pub mod hhmm {
    pub mod option {
        use chrono::NaiveTime;
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(t: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match t {
                Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(s) => super::super::parse_time_flexible(s)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid time: {}", s))),
            }
        }
    }
}
