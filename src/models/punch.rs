//! Punch models.
//!
//! A day's punches are held in four fixed slots. Collaborators hand them over
//! either as already-grouped slot strings ([`RawPunchSet`]) or as a loose list
//! of clock events ([`PunchEvent`]) that still need grouping.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calculation::parse_punch;

/// The four punch slots of one employee-day.
///
/// # Example
///
/// ```
/// use ponto_engine::models::PunchSet;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
/// let punches = PunchSet {
///     morning_entry: Some(at("2025-03-10 08:00")),
///     lunch_exit: Some(at("2025-03-10 12:00")),
///     afternoon_entry: None,
///     final_exit: None,
/// };
/// assert_eq!(punches.count(), 2);
/// assert!(punches.has_morning_pair());
/// assert!(!punches.is_complete());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchSet {
    /// First punch of the day.
    #[serde(default)]
    pub morning_entry: Option<NaiveDateTime>,
    /// Departure for the midday break.
    #[serde(default)]
    pub lunch_exit: Option<NaiveDateTime>,
    /// Return from the midday break.
    #[serde(default)]
    pub afternoon_entry: Option<NaiveDateTime>,
    /// Last punch of the day.
    #[serde(default)]
    pub final_exit: Option<NaiveDateTime>,
}

impl PunchSet {
    /// Number of populated slots.
    pub fn count(&self) -> usize {
        [
            self.morning_entry,
            self.lunch_exit,
            self.afternoon_entry,
            self.final_exit,
        ]
        .iter()
        .filter(|p| p.is_some())
        .count()
    }

    /// Returns true when no slot is populated.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns true when all four slots are populated.
    pub fn is_complete(&self) -> bool {
        self.count() == 4
    }

    /// Returns true when `morning_entry` and `lunch_exit` are both present.
    pub fn has_morning_pair(&self) -> bool {
        self.morning_entry.is_some() && self.lunch_exit.is_some()
    }

    /// Returns true when `afternoon_entry` and `final_exit` are both present.
    pub fn has_afternoon_pair(&self) -> bool {
        self.afternoon_entry.is_some() && self.final_exit.is_some()
    }
}

/// A punch value that could not be parsed and was treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedTimeValue {
    /// The slot or schedule field the value was meant for.
    pub field: String,
    /// The raw input.
    pub value: String,
}

/// The four punch slots as raw strings, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPunchSet {
    /// First punch of the day.
    #[serde(default)]
    pub morning_entry: Option<String>,
    /// Departure for the midday break.
    #[serde(default)]
    pub lunch_exit: Option<String>,
    /// Return from the midday break.
    #[serde(default)]
    pub afternoon_entry: Option<String>,
    /// Last punch of the day.
    #[serde(default)]
    pub final_exit: Option<String>,
}

impl RawPunchSet {
    /// Parses every slot, turning unreadable values into absent slots.
    ///
    /// Blank strings count as absent and are not reported. Anything else that
    /// fails to parse is returned in the rejected list.
    ///
    /// # Example
    ///
    /// ```
    /// use ponto_engine::models::RawPunchSet;
    ///
    /// let raw = RawPunchSet {
    ///     morning_entry: Some("2025-03-10 08:02:41".to_string()),
    ///     lunch_exit: Some("12:xx".to_string()),
    ///     afternoon_entry: Some("".to_string()),
    ///     final_exit: None,
    /// };
    /// let (punches, rejected) = raw.parse();
    /// assert!(punches.morning_entry.is_some());
    /// assert!(punches.lunch_exit.is_none());
    /// assert_eq!(rejected.len(), 1);
    /// assert_eq!(rejected[0].field, "lunch_exit");
    /// ```
    pub fn parse(&self) -> (PunchSet, Vec<RejectedTimeValue>) {
        let mut rejected = Vec::new();
        let mut slot = |field: &str, value: &Option<String>| -> Option<NaiveDateTime> {
            let value = value.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
            match parse_punch(value) {
                Ok(instant) => Some(instant),
                Err(_) => {
                    rejected.push(RejectedTimeValue {
                        field: field.to_string(),
                        value: value.to_string(),
                    });
                    None
                }
            }
        };

        let punches = PunchSet {
            morning_entry: slot("morning_entry", &self.morning_entry),
            lunch_exit: slot("lunch_exit", &self.lunch_exit),
            afternoon_entry: slot("afternoon_entry", &self.afternoon_entry),
            final_exit: slot("final_exit", &self.final_exit),
        };

        (punches, rejected)
    }
}

/// Direction recorded by the clock for a punch, when it records one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchDirection {
    /// Clock-in.
    In,
    /// Clock-out.
    Out,
    /// The export did not say.
    #[default]
    Unknown,
}

/// A single clock event before it has been assigned to a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchEvent {
    /// When the punch happened.
    pub timestamp: NaiveDateTime,
    /// Direction, if the clock recorded one.
    #[serde(default)]
    pub direction: PunchDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_empty_punch_set() {
        let punches = PunchSet::default();
        assert!(punches.is_empty());
        assert_eq!(punches.count(), 0);
        assert!(!punches.has_morning_pair());
        assert!(!punches.has_afternoon_pair());
    }

    #[test]
    fn test_complete_punch_set() {
        let punches = PunchSet {
            morning_entry: Some(at("2025-03-10 08:00:00")),
            lunch_exit: Some(at("2025-03-10 12:00:00")),
            afternoon_entry: Some(at("2025-03-10 13:00:00")),
            final_exit: Some(at("2025-03-10 17:00:00")),
        };
        assert!(punches.is_complete());
        assert!(punches.has_morning_pair());
        assert!(punches.has_afternoon_pair());
    }

    #[test]
    fn test_raw_parse_accepts_iso_and_space_forms() {
        let raw = RawPunchSet {
            morning_entry: Some("2025-03-10T08:00:00".to_string()),
            lunch_exit: Some("2025-03-10 12:00".to_string()),
            afternoon_entry: Some("2025-03-10 13:00:15".to_string()),
            final_exit: Some("2025-03-10T17:00".to_string()),
        };
        let (punches, rejected) = raw.parse();
        assert!(rejected.is_empty());
        assert!(punches.is_complete());
        assert_eq!(punches.afternoon_entry, Some(at("2025-03-10 13:00:15")));
    }

    #[test]
    fn test_raw_parse_rejects_garbage_as_absent() {
        let raw = RawPunchSet {
            morning_entry: Some("not a time".to_string()),
            lunch_exit: None,
            afternoon_entry: Some("   ".to_string()),
            final_exit: Some("2025-13-45 99:00".to_string()),
        };
        let (punches, rejected) = raw.parse();
        assert!(punches.is_empty());
        assert_eq!(
            rejected,
            vec![
                RejectedTimeValue {
                    field: "morning_entry".to_string(),
                    value: "not a time".to_string(),
                },
                RejectedTimeValue {
                    field: "final_exit".to_string(),
                    value: "2025-13-45 99:00".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_punch_event_direction_defaults_to_unknown() {
        let event: PunchEvent =
            serde_json::from_str(r#"{"timestamp": "2025-03-10T08:00:00"}"#).unwrap();
        assert_eq!(event.direction, PunchDirection::Unknown);

        let event: PunchEvent =
            serde_json::from_str(r#"{"timestamp": "2025-03-10T08:00:00", "direction": "in"}"#)
                .unwrap();
        assert_eq!(event.direction, PunchDirection::In);
    }
}
