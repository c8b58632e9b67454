/**
 * Calendar Events
 *
 * Events carry a plain `date` that is always derived from the start
 * timestamp's date component, both on create and whenever an update moves
 * the start time. List filtering by an explicit start/end range takes
 * precedence over month+year when both are supplied.
 */

pub mod handlers;
pub mod store;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::Identity;

pub use store::{EventStore, MemEventStore, PgEventStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    /// Date component of `start_time`; kept for date-bucketed queries
    pub date: NaiveDate,
    pub attendees: Vec<String>,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub meta: EventMeta,
}

/// Event detail fields, stored in the single `metadata` jsonb column on the
/// persistent side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMeta {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub recurrence_rule: String,
    #[serde(default = "default_reminders")]
    pub reminders: Vec<i32>,
    #[serde(default = "default_event_status")]
    pub status: String,
}

fn default_color() -> String {
    "#000000".to_string()
}

fn default_reminders() -> Vec<i32> {
    vec![15]
}

fn default_event_status() -> String {
    "confirmed".to_string()
}

/// Create input.
#[derive(Debug, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(flatten)]
    pub meta: EventMeta,
}

impl CalendarEvent {
    pub fn create(input: NewEvent, owner: &Identity) -> CalendarEvent {
        let now = Utc::now();
        CalendarEvent {
            id: Uuid::new_v4(),
            title: input.title,
            date: input.meta.start_time.date_naive(),
            attendees: input.attendees,
            owner_id: owner.id,
            owner_name: owner.display_label(),
            created_at: now,
            updated_at: now,
            meta: input.meta,
        }
    }
}

/// Update input: absent fields leave the record untouched; a new start
/// time re-derives the date.
#[derive(Debug, Default, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub attendees: Option<Vec<String>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub color: Option<String>,
    pub recurring: Option<bool>,
    pub recurrence_rule: Option<String>,
    pub reminders: Option<Vec<i32>>,
    pub status: Option<String>,
}

impl EventPatch {
    pub fn apply(self, event: &mut CalendarEvent) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(attendees) = self.attendees {
            event.attendees = attendees;
        }
        if let Some(start) = self.start_time {
            event.meta.start_time = start;
            event.date = start.date_naive();
        }
        if let Some(end) = self.end_time {
            event.meta.end_time = Some(end);
        }
        if let Some(all_day) = self.all_day {
            event.meta.all_day = all_day;
        }
        if let Some(description) = self.description {
            event.meta.description = description;
        }
        if let Some(location) = self.location {
            event.meta.location = location;
        }
        if let Some(color) = self.color {
            event.meta.color = color;
        }
        if let Some(recurring) = self.recurring {
            event.meta.recurring = recurring;
        }
        if let Some(rule) = self.recurrence_rule {
            event.meta.recurrence_rule = rule;
        }
        if let Some(reminders) = self.reminders {
            event.meta.reminders = reminders;
        }
        if let Some(status) = self.status {
            event.meta.status = status;
        }
        event.updated_at = Utc::now();
    }
}

/// List filters. A full start/end range wins over month+year.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl EventFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            return date >= start && date <= end;
        }
        if let (Some(month), Some(year)) = (self.month, self.year) {
            return date.month() == month && date.year() == year;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::users::Role;

    fn owner() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "alex@opsdesk.example".to_string(),
            role: Role::Employee,
        }
    }

    fn event_on(start: &str) -> CalendarEvent {
        let input: NewEvent = serde_json::from_value(serde_json::json!({
            "title": "Sync",
            "start_time": start,
        }))
        .unwrap();
        CalendarEvent::create(input, &owner())
    }

    #[test]
    fn test_date_derived_from_start_time() {
        let event = event_on("2026-02-10T15:30:00Z");
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
        assert_eq!(event.meta.status, "confirmed");
        assert_eq!(event.meta.reminders, vec![15]);
    }

    #[test]
    fn test_patching_start_time_moves_date() {
        let mut event = event_on("2026-02-10T15:30:00Z");
        let patch: EventPatch = serde_json::from_value(serde_json::json!({
            "start_time": "2026-03-01T09:00:00Z",
        }))
        .unwrap();
        patch.apply(&mut event);
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn test_range_filter_wins_over_month() {
        // Range covers only February, month/year points at January
        let filter = EventFilter {
            month: Some(1),
            year: Some(2026),
            start: NaiveDate::from_ymd_opt(2026, 2, 1),
            end: NaiveDate::from_ymd_opt(2026, 2, 28),
        };

        let january = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let february = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
        assert!(!filter.matches(january));
        assert!(filter.matches(february));
    }

    #[test]
    fn test_month_filter_applies_without_range() {
        let filter = EventFilter {
            month: Some(1),
            year: Some(2026),
            start: None,
            end: None,
        };
        assert!(filter.matches(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
        assert!(!filter.matches(NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()));

        // A lone start date is not a range; everything passes
        let partial = EventFilter {
            month: None,
            year: None,
            start: NaiveDate::from_ymd_opt(2026, 2, 1),
            end: None,
        };
        assert!(partial.matches(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
    }
}
