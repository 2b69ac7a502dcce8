use crate::model::WipCategory;
use chrono::{DateTime, Datelike, FixedOffset};

pub type Records = Vec<TransitionRecord>;

// One row per recorded status change. A ticket without any change history
// contributes exactly one synthetic row with no transition fields set.
#[derive(Debug, Clone)]
pub struct TransitionRecord {
    pub ticket_key: String,
    pub issue_type: String,
    pub current_status: String,
    pub from_status: Option<String>,
    pub to_status: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub transitioned_at: Option<DateTime<FixedOffset>>,
    pub time_in_from_status_days: Option<f64>,
    pub resolved_at: Option<DateTime<FixedOffset>>,
    pub wip_category: WipCategory,
    pub release_tags: Vec<String>,
    pub epic_label: Option<String>,
    pub done_year_week: Option<String>,
    pub created_year_week: String,
}

// ISO (year, week) formatted `YYYY-WW`; zero-padded so the series sorts
// lexicographically in chronological order.
pub fn year_week(datetime: &DateTime<FixedOffset>) -> String {
    let week = datetime.iso_week();
    format!("{}-{:02}", week.year(), week.week())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_week_uses_iso_calendar() {
        let datetime = DateTime::parse_from_rfc3339("2024-01-04T12:00:00+00:00").unwrap();
        assert_eq!(year_week(&datetime), "2024-01");
    }

    #[test]
    fn year_week_zero_pads_single_digit_weeks() {
        let datetime = DateTime::parse_from_rfc3339("2025-02-12T09:30:00+00:00").unwrap();
        assert_eq!(year_week(&datetime), "2025-07");
    }

    #[test]
    fn year_week_assigns_january_days_to_previous_iso_year() {
        // 2027-01-01 is a Friday belonging to ISO week 2026-53.
        let datetime = DateTime::parse_from_rfc3339("2027-01-01T00:00:00+00:00").unwrap();
        assert_eq!(year_week(&datetime), "2026-53");
    }
}
