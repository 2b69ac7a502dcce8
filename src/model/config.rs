use crate::model::{WipCategory, WipMapping};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;

const DEFAULT_SIMULATIONS: usize = 10_000;
const DEFAULT_BUFFER_PERCENT: f64 = 10.0;
const DEFAULT_AVAILABLE_HOURS: f64 = 36.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollingStat {
    Median,
    Mean,
}

#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub release: Option<String>,
    pub included_wip_categories: Vec<WipCategory>,
    pub excluded_issue_types: Vec<String>,
    pub excluded_epics: Vec<String>,
    pub excluded_from_statuses: Vec<String>,
    pub rolling_avg_weeks: usize,
    pub rolling_stat: RollingStat,
    pub confidence_level: f64,
    pub n_simulations: usize,
    pub buffer_percent: f64,
    pub remaining_ticket_count: Option<u32>,
    pub available_hours_per_week: f64,
    pub required_completion_date: Option<NaiveDate>,
    pub wip_mapping: WipMapping,
}

// Create
impl ForecastConfig {
    pub fn from_config(path: &str) -> crate::model::Result<Self> {
        let json_str = fs::read_to_string(path)
            .map_err(|error| format!("the config file `{path}` can't be read: {error}"))?;
        Self::parse(&json_str)
    }
}

// Parser
impl ForecastConfig {
    pub fn parse(json_str: &str) -> crate::model::Result<Self> {
        let config: IndexMap<String, Value> = from_str(json_str)?;

        let release = match config.get("release").and_then(|v| v.as_str()) {
            Some("") | None => None,
            Some(release) => Some(release.to_string()),
        };

        let Some(included) = config.get("included_wip_categories").and_then(|v| v.as_array())
        else {
            return Err("missing 'included_wip_categories' list".into());
        };
        let mut included_wip_categories = Vec::new();
        for label in included {
            let Some(label) = label.as_str() else {
                return Err("'included_wip_categories' entries must be strings".into());
            };
            included_wip_categories.push(WipCategory::parse(label)?);
        }
        if included_wip_categories.is_empty() {
            return Err("'included_wip_categories' must name at least one category".into());
        }

        let excluded_issue_types = string_list(&config, "excluded_issue_types")?;
        let excluded_epics = string_list(&config, "excluded_epics")?;
        let excluded_from_statuses = string_list(&config, "excluded_from_statuses")?;

        let Some(rolling_avg_weeks) = config.get("rolling_avg_weeks").and_then(|v| v.as_u64())
        else {
            return Err("missing or non-numeric 'rolling_avg_weeks'".into());
        };
        if rolling_avg_weeks == 0 {
            return Err("'rolling_avg_weeks' must be a positive integer".into());
        }

        let rolling_stat = match config.get("rolling_stat").and_then(|v| v.as_str()) {
            None | Some("median") => RollingStat::Median,
            Some("mean") => RollingStat::Mean,
            Some(other) => {
                return Err(format!("'rolling_stat' must be 'median' or 'mean', got `{other}`").into())
            }
        };

        let confidence_level = confidence_level(&config)?;

        let n_simulations = match config.get("n_simulations") {
            None => DEFAULT_SIMULATIONS,
            Some(value) => match value.as_u64() {
                Some(n) if n > 0 => n as usize,
                _ => return Err("'n_simulations' must be a positive integer".into()),
            },
        };

        let buffer_percent = match config.get("buffer_percent") {
            None => DEFAULT_BUFFER_PERCENT,
            Some(value) => match value.as_f64() {
                Some(percent) if percent >= 0.0 => percent,
                _ => return Err("'buffer_percent' must be a non-negative number".into()),
            },
        };

        let remaining_ticket_count = match config.get("remaining_ticket_count") {
            None => None,
            Some(value) => match value.as_u64() {
                Some(count) => Some(count as u32),
                None => return Err("'remaining_ticket_count' must be a non-negative integer".into()),
            },
        };

        let available_hours_per_week = match config.get("available_hours_per_week") {
            None => DEFAULT_AVAILABLE_HOURS,
            Some(value) => match value.as_f64() {
                Some(hours) if hours > 0.0 => hours,
                _ => return Err("'available_hours_per_week' must be a positive number".into()),
            },
        };

        let required_completion_date =
            match config.get("required_completion_date").and_then(|v| v.as_str()) {
                Some("") | None => None,
                Some(date) => match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                    Ok(date) => Some(date),
                    Err(_) => {
                        return Err(format!(
                            "'required_completion_date' is not a YYYY-MM-DD date: `{date}`"
                        )
                        .into())
                    }
                },
            };

        let wip_mapping = wip_mapping(&config)?;

        Ok(Self {
            release,
            included_wip_categories,
            excluded_issue_types,
            excluded_epics,
            excluded_from_statuses,
            rolling_avg_weeks: rolling_avg_weeks as usize,
            rolling_stat,
            confidence_level,
            n_simulations,
            buffer_percent,
            remaining_ticket_count,
            available_hours_per_week,
            required_completion_date,
            wip_mapping,
        })
    }
}

fn string_list(config: &IndexMap<String, Value>, key: &str) -> crate::model::Result<Vec<String>> {
    let Some(value) = config.get(key) else {
        return Ok(Vec::new());
    };
    let Some(list) = value.as_array() else {
        return Err(format!("'{key}' must be a list of strings").into());
    };
    let mut result = Vec::new();
    for entry in list {
        let Some(entry) = entry.as_str() else {
            return Err(format!("'{key}' entries must be strings").into());
        };
        result.push(entry.to_string());
    }
    Ok(result)
}

// The historical configs carry the confidence both as a number and as a
// `"85%"` string; both forms are accepted.
fn confidence_level(config: &IndexMap<String, Value>) -> crate::model::Result<f64> {
    let Some(value) = config.get("confidence_level") else {
        return Err("missing 'confidence_level'".into());
    };
    let level = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match level {
        Some(level) if level > 0.0 && level <= 100.0 => Ok(level),
        Some(level) => Err(format!("'confidence_level' must be within (0, 100], got {level}").into()),
        None => Err("'confidence_level' is not a number".into()),
    }
}

fn wip_mapping(config: &IndexMap<String, Value>) -> crate::model::Result<WipMapping> {
    let Some(value) = config.get("status_categories") else {
        return Ok(WipMapping::default());
    };
    let Some(object) = value.as_object() else {
        return Err("'status_categories' must map status names to WIP categories".into());
    };
    let mut statuses = IndexMap::new();
    for (status, category) in object {
        let Some(category) = category.as_str() else {
            return Err(format!("'status_categories.{status}' must be a string").into());
        };
        statuses.insert(status.clone(), WipCategory::parse(category)?);
    }
    Ok(WipMapping::new(statuses))
}
