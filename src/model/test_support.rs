use crate::model::{ForecastConfig, RollingStat, TransitionRecord, WipCategory, WipMapping};
use chrono::DateTime;

pub fn config() -> ForecastConfig {
    ForecastConfig {
        release: None,
        included_wip_categories: vec![WipCategory::Done],
        excluded_issue_types: Vec::new(),
        excluded_epics: Vec::new(),
        excluded_from_statuses: Vec::new(),
        rolling_avg_weeks: 5,
        rolling_stat: RollingStat::Median,
        confidence_level: 85.0,
        n_simulations: 1000,
        buffer_percent: 10.0,
        remaining_ticket_count: None,
        available_hours_per_week: 36.25,
        required_completion_date: None,
        wip_mapping: WipMapping::default(),
    }
}

pub fn record(
    ticket_key: &str,
    wip_category: WipCategory,
    from_status: Option<&str>,
    time_in_from_status_days: f64,
) -> TransitionRecord {
    let created_at = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap();
    let resolved_at = (wip_category == WipCategory::Done)
        .then(|| DateTime::parse_from_rfc3339("2024-01-10T00:00:00+00:00").unwrap());
    TransitionRecord {
        ticket_key: ticket_key.to_string(),
        issue_type: "Story".to_string(),
        current_status: wip_category.as_str().to_string(),
        from_status: from_status.map(String::from),
        to_status: from_status.map(|_| wip_category.as_str().to_string()),
        created_at,
        transitioned_at: from_status.map(|_| created_at),
        time_in_from_status_days: from_status.map(|_| time_in_from_status_days),
        resolved_at,
        wip_category,
        release_tags: Vec::new(),
        epic_label: None,
        done_year_week: resolved_at.as_ref().map(crate::model::year_week),
        created_year_week: "2024-01".to_string(),
    }
}

pub fn done_in_week(ticket_key: &str, done_year_week: &str) -> TransitionRecord {
    let mut record = record(ticket_key, WipCategory::Done, Some("To Do"), 1.0);
    record.done_year_week = Some(done_year_week.to_string());
    record
}
