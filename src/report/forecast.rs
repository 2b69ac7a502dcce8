use crate::model::WipCategory;
use crate::utils::stats;
use chrono::{Duration, NaiveDate};

// The simulation is only trusted once this many tickets have completed.
pub const MIN_COMPLETED_FOR_FORECAST: usize = 10;

const BUSINESS_DAYS_PER_WEEK: f64 = 5.0;

// Read-only view over the simulated weeks-to-complete array; every date is
// derived on demand and nothing here mutates.
#[derive(Debug, Clone)]
pub struct ForecastReport {
    pub release: Option<String>,
    pub included_wip_categories: Vec<WipCategory>,
    pub excluded_from_statuses: Vec<String>,
    pub excluded_issue_types: Vec<String>,
    pub completed_tickets: usize,
    pub median_cycle_time: f64,
    pub cycle_time_std_dev: f64,
    pub rolling_avg_weeks: usize,
    pub rolling_capacity: f64,
    pub confidence_level: f64,
    pub remaining_tickets: u32,
    pub buffer_percent: f64,
    pub weeks_to_complete: Vec<u32>,
    pub today: NaiveDate,
}

impl ForecastReport {
    // Outer bound at the given percentile; weeks convert at 5 business days
    // each, and fractional days from interpolation round up.
    pub fn forecast_date(&self, percentile_level: f64) -> Option<NaiveDate> {
        let weeks = self.weeks_as_f64();
        let weeks_needed = stats::percentile(&weeks, percentile_level)?;
        Some(self.date_after_weeks(weeks_needed))
    }

    pub fn best_case_date(&self) -> Option<NaiveDate> {
        let weeks_needed = self.weeks_to_complete.iter().min()?;
        Some(self.date_after_weeks(*weeks_needed as f64))
    }

    pub fn generate_summary(&self) -> String {
        if self.weeks_to_complete.is_empty() {
            return self.insufficient_data_notice();
        }

        let release = self.release.as_deref().unwrap_or("all releases");
        let included = self
            .included_wip_categories
            .iter()
            .map(|category| category.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut summary = format!(
            "The following empirical data for release {release} is used to forecast delivery dates:\n\
             - [{included}] tickets are included\n\
             - time spent in {:?} queues is NOT counted\n\
             - {:?} ticket types are NOT counted\n\
             - {} tickets have been completed so far\n\
             \u{20}-- with a median cycle time of {:.2} working days per ticket and a standard deviation of {:.2} working days\n\
             \u{20}-- with a {} week rolling capacity of {:.2} tickets/week\n",
            self.excluded_from_statuses,
            self.excluded_issue_types,
            self.completed_tickets,
            self.median_cycle_time,
            self.cycle_time_std_dev,
            self.rolling_avg_weeks,
            self.rolling_capacity,
        );

        match (self.forecast_date(self.confidence_level), self.best_case_date()) {
            (Some(outer_bound), Some(best_case)) => {
                summary.push_str(&format!(
                    "\nForecast: there is a {:.0}% chance that the remaining {} tickets \
                     (including a {:.0}% allowance for scope growth) are delivered on or before \
                     {}, and no earlier than {}.\n",
                    self.confidence_level,
                    self.remaining_tickets,
                    self.buffer_percent,
                    outer_bound.format("%d %B, %Y"),
                    best_case.format("%d %B, %Y"),
                ));
            }
            _ => summary.push_str(&format!("\n{}\n", self.insufficient_data_notice())),
        }
        summary
    }

    // One row per decile, each mapped through the same percentile -> days ->
    // date transform as the headline forecast.
    pub fn generate_table(&self) -> Vec<(u32, NaiveDate)> {
        (10..=90)
            .step_by(10)
            .filter_map(|probability| {
                self.forecast_date(probability as f64)
                    .map(|date| (probability, date))
            })
            .collect::<Vec<_>>()
    }

    pub fn insufficient_data_notice(&self) -> String {
        format!(
            "Insufficient data to forecast: {} completed tickets match the filters \
             (at least {MIN_COMPLETED_FOR_FORECAST} are needed). The distributions that \
             could be computed were still exported.",
            self.completed_tickets
        )
    }

    fn weeks_as_f64(&self) -> Vec<f64> {
        self.weeks_to_complete
            .iter()
            .map(|weeks| *weeks as f64)
            .collect::<Vec<_>>()
    }

    fn date_after_weeks(&self, weeks: f64) -> NaiveDate {
        let days = (weeks * BUSINESS_DAYS_PER_WEEK).ceil() as i64;
        self.today + Duration::days(days)
    }
}
