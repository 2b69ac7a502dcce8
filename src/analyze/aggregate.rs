use crate::model::{RollingStat, TransitionRecord, WipCategory};
use crate::utils::stats;
use chrono::NaiveDate;
use indexmap::IndexMap;
use itertools::Itertools;

// Total chargeable days per ticket across the counted status transitions.
#[derive(Debug, Clone)]
pub struct CycleTimeAnalysis {
    pub tickets: IndexMap<String, f64>,
}

impl CycleTimeAnalysis {
    pub fn from_records(records: &[&TransitionRecord]) -> Self {
        let mut tickets: IndexMap<String, f64> = IndexMap::new();
        for record in records {
            let days = record.time_in_from_status_days.unwrap_or(0.0);
            *tickets.entry(record.ticket_key.clone()).or_insert(0.0) += days;
        }
        Self { tickets }
    }

    pub fn values(&self) -> Vec<f64> {
        self.tickets.values().copied().collect::<Vec<_>>()
    }

    pub fn median(&self) -> Option<f64> {
        stats::median(&self.values())
    }

    pub fn std_dev(&self) -> Option<f64> {
        stats::std_dev(&self.values())
    }
}

// Completed tickets per calendar week, ordered by week. Only weeks with at
// least one completion appear in the series; the rolling window therefore
// spans however many non-empty weeks fall inside it.
#[derive(Debug, Clone)]
pub struct ThroughputAnalysis {
    pub weeks: IndexMap<String, u32>,
    pub completed_tickets: usize,
}

impl ThroughputAnalysis {
    pub fn from_records(records: &[&TransitionRecord]) -> Self {
        // One completion event per ticket and week, guarding against tickets
        // that re-enter Done and would otherwise be double-counted.
        let completions = records
            .iter()
            .filter(|record| record.wip_category == WipCategory::Done)
            .filter_map(|record| {
                record
                    .done_year_week
                    .as_ref()
                    .map(|week| (record.ticket_key.as_str(), week.as_str()))
            })
            .unique()
            .collect::<Vec<_>>();

        let completed_tickets = completions.iter().map(|(key, _)| key).unique().count();

        let mut weeks: IndexMap<String, u32> = IndexMap::new();
        for (_, week) in completions.iter().sorted_by_key(|(_, week)| *week) {
            *weeks.entry(week.to_string()).or_insert(0) += 1;
        }
        Self {
            weeks,
            completed_tickets,
        }
    }

    pub fn counts(&self) -> Vec<u32> {
        self.weeks.values().copied().collect::<Vec<_>>()
    }

    // Point estimate of current capacity over the trailing window.
    pub fn rolling_capacity(&self, window: usize, stat: RollingStat) -> Option<f64> {
        let counts = self.counts();
        let tail = counts
            .iter()
            .skip(counts.len().saturating_sub(window))
            .map(|count| *count as f64)
            .collect::<Vec<_>>();
        match stat {
            RollingStat::Median => stats::median(&tail),
            RollingStat::Mean => stats::mean(&tail),
        }
    }

    // Average hours available per completed ticket; undefined without
    // historical throughput.
    pub fn takt_time(&self, available_hours_per_week: f64) -> Option<f64> {
        let mean = stats::mean(
            &self
                .counts()
                .iter()
                .map(|count| *count as f64)
                .collect::<Vec<_>>(),
        )?;
        if mean == 0.0 {
            return None;
        }
        Some(available_hours_per_week / mean)
    }
}

pub fn remaining_tickets(records: &[&TransitionRecord]) -> usize {
    records
        .iter()
        .map(|record| record.ticket_key.as_str())
        .unique()
        .count()
}

pub fn buffered_ticket_count(remaining: usize, buffer_percent: f64) -> u32 {
    (remaining as f64 * (1.0 + buffer_percent / 100.0)).ceil() as u32
}

// Tickets/week needed to clear the backlog by the deadline; None once the
// deadline is today or past.
pub fn tickets_per_week_for_deadline(
    remaining: u32,
    deadline: NaiveDate,
    today: NaiveDate,
) -> Option<f64> {
    let days_until_deadline = (deadline - today).num_days();
    if days_until_deadline <= 0 {
        return None;
    }
    Some(remaining as f64 / (days_until_deadline as f64 / 7.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::RecordsFilter;
    use crate::model::test_support::{config, done_in_week, record};
    use crate::model::WipCategory;

    #[test]
    fn cycle_time_is_the_sum_of_a_tickets_transition_durations() {
        let rows = vec![
            record("FC-1", WipCategory::Done, Some("To Do"), 1.5),
            record("FC-1", WipCategory::Done, Some("In Progress"), 2.0),
            record("FC-1", WipCategory::Done, Some("Review"), 0.5),
            record("FC-2", WipCategory::Done, Some("To Do"), 4.0),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        let analysis = CycleTimeAnalysis::from_records(&refs);
        assert_eq!(analysis.tickets.get("FC-1"), Some(&4.0));
        assert_eq!(analysis.tickets.get("FC-2"), Some(&4.0));
        assert_eq!(analysis.median(), Some(4.0));
    }

    #[test]
    fn excluded_queue_time_does_not_count_toward_cycle_time() {
        // Backlog -> To Do lasted 3 days, To Do -> Done lasted 2 days.
        let mut first = record("FC-1", WipCategory::Done, Some("Backlog"), 3.0);
        first.to_status = Some("To Do".to_string());
        let mut second = record("FC-1", WipCategory::Done, Some("To Do"), 2.0);
        second.to_status = Some("Done".to_string());
        let rows = vec![first, second];

        let mut config = config();
        config.excluded_from_statuses = vec!["Backlog".to_string()];

        let analysis = CycleTimeAnalysis::from_records(&rows.for_cycle_time(&config));
        assert_eq!(analysis.tickets.get("FC-1"), Some(&2.0));

        let throughput = ThroughputAnalysis::from_records(&rows.for_throughput(&config));
        assert_eq!(throughput.completed_tickets, 1);
    }

    #[test]
    fn a_ticket_done_twice_in_one_week_counts_once() {
        let rows = vec![
            done_in_week("FC-1", "2024-05"),
            done_in_week("FC-1", "2024-05"),
            done_in_week("FC-2", "2024-05"),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        let throughput = ThroughputAnalysis::from_records(&refs);
        assert_eq!(throughput.weeks.get("2024-05"), Some(&2));
        assert_eq!(throughput.completed_tickets, 2);
    }

    #[test]
    fn weekly_series_is_ordered_by_week() {
        let rows = vec![
            done_in_week("FC-3", "2024-11"),
            done_in_week("FC-1", "2024-09"),
            done_in_week("FC-2", "2024-10"),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        let throughput = ThroughputAnalysis::from_records(&refs);
        let weeks = throughput.weeks.keys().cloned().collect::<Vec<_>>();
        assert_eq!(weeks, vec!["2024-09", "2024-10", "2024-11"]);
        assert_eq!(throughput.counts(), vec![1, 1, 1]);
    }

    #[test]
    fn rolling_capacity_uses_the_trailing_window_only() {
        let rows = vec![
            done_in_week("FC-1", "2024-01"),
            done_in_week("FC-2", "2024-01"),
            done_in_week("FC-3", "2024-01"),
            done_in_week("FC-4", "2024-02"),
            done_in_week("FC-5", "2024-03"),
        ];
        let refs = rows.iter().collect::<Vec<_>>();
        let throughput = ThroughputAnalysis::from_records(&refs);

        // Counts are [3, 1, 1]; the last two weeks give a median of 1.
        assert_eq!(throughput.rolling_capacity(2, RollingStat::Median), Some(1.0));
        assert_eq!(throughput.rolling_capacity(3, RollingStat::Mean), Some(5.0 / 3.0));
        // A window wider than the series falls back to every non-empty week.
        assert_eq!(throughput.rolling_capacity(10, RollingStat::Median), Some(1.0));
    }

    #[test]
    fn empty_filtered_set_yields_empty_series() {
        let throughput = ThroughputAnalysis::from_records(&[]);
        assert!(throughput.weeks.is_empty());
        assert_eq!(throughput.completed_tickets, 0);
        assert_eq!(throughput.rolling_capacity(5, RollingStat::Median), None);
        assert_eq!(throughput.takt_time(36.25), None);

        let cycle = CycleTimeAnalysis::from_records(&[]);
        assert!(cycle.tickets.is_empty());
        assert_eq!(cycle.median(), None);
    }

    #[test]
    fn backlog_count_is_distinct_tickets_with_buffer_rounded_up() {
        let rows = vec![
            record("FC-1", WipCategory::Backlog, None, 0.0),
            record("FC-2", WipCategory::Prioritized, Some("Backlog"), 1.0),
            record("FC-2", WipCategory::Prioritized, Some("To Do"), 1.0),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(remaining_tickets(&refs), 2);
        assert_eq!(buffered_ticket_count(2, 10.0), 3);
        assert_eq!(buffered_ticket_count(10, 0.0), 10);
        assert_eq!(buffered_ticket_count(0, 10.0), 0);
    }

    #[test]
    fn takt_time_divides_available_hours_by_mean_throughput() {
        let rows = vec![
            done_in_week("FC-1", "2024-01"),
            done_in_week("FC-2", "2024-01"),
            done_in_week("FC-3", "2024-02"),
            done_in_week("FC-4", "2024-02"),
        ];
        let refs = rows.iter().collect::<Vec<_>>();
        let throughput = ThroughputAnalysis::from_records(&refs);

        // Mean of [2, 2] completions/week against 36 available hours.
        assert_eq!(throughput.takt_time(36.0), Some(18.0));
    }

    #[test]
    fn deadline_demand_requires_a_future_date() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let deadline = NaiveDate::from_ymd_opt(2026, 9, 3).unwrap();

        assert_eq!(tickets_per_week_for_deadline(8, deadline, today), Some(2.0));
        assert_eq!(tickets_per_week_for_deadline(8, today, today), None);
    }
}
