use crate::model::{ForecastConfig, TransitionRecord, WipCategory};

// Record selection for the three downstream reductions. Cycle time
// additionally drops rows charged to an excluded queue; throughput counting
// never does. Backlog sizing looks at the not-yet-done categories under the
// same issue-type/epic/release exclusions.
pub trait RecordsFilter {
    fn for_cycle_time<'a>(&'a self, config: &ForecastConfig) -> Vec<&'a TransitionRecord>;
    fn for_throughput<'a>(&'a self, config: &ForecastConfig) -> Vec<&'a TransitionRecord>;
    fn for_backlog<'a>(&'a self, config: &ForecastConfig) -> Vec<&'a TransitionRecord>;
}

impl RecordsFilter for [TransitionRecord] {
    fn for_cycle_time<'a>(&'a self, config: &ForecastConfig) -> Vec<&'a TransitionRecord> {
        self.iter()
            .filter(|record| matches_common(record, config))
            .filter(|record| {
                !record
                    .from_status
                    .as_ref()
                    .is_some_and(|status| config.excluded_from_statuses.contains(status))
            })
            .collect::<Vec<_>>()
    }

    fn for_throughput<'a>(&'a self, config: &ForecastConfig) -> Vec<&'a TransitionRecord> {
        self.iter()
            .filter(|record| matches_common(record, config))
            .collect::<Vec<_>>()
    }

    fn for_backlog<'a>(&'a self, config: &ForecastConfig) -> Vec<&'a TransitionRecord> {
        const OPEN_CATEGORIES: [WipCategory; 3] = [
            WipCategory::Backlog,
            WipCategory::Prioritized,
            WipCategory::Wip,
        ];
        self.iter()
            .filter(|record| OPEN_CATEGORIES.contains(&record.wip_category))
            .filter(|record| matches_exclusions(record, config))
            .collect::<Vec<_>>()
    }
}

fn matches_common(record: &TransitionRecord, config: &ForecastConfig) -> bool {
    config.included_wip_categories.contains(&record.wip_category)
        && matches_exclusions(record, config)
}

fn matches_exclusions(record: &TransitionRecord, config: &ForecastConfig) -> bool {
    !config.excluded_issue_types.contains(&record.issue_type)
        && !record
            .epic_label
            .as_ref()
            .is_some_and(|epic| config.excluded_epics.contains(epic))
        && matches_release(record, config)
}

fn matches_release(record: &TransitionRecord, config: &ForecastConfig) -> bool {
    match &config.release {
        Some(release) => record.release_tags.contains(release),
        None => true,
    }
}
