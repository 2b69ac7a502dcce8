use crate::model::{year_week, Records, TransitionRecord, WipMapping};
use chrono::{DateTime, FixedOffset};
use itertools::Itertools;
use serde_json::{from_str, Value};
use std::fs;

// Clock skew in tracker exports can produce a transition stamped before the
// previous one; the duration is clamped to a small positive value instead of
// zero so the ordering of the derived distribution survives.
const MIN_STATUS_DAYS: f64 = 0.0001;

const SECONDS_PER_DAY: f64 = 86_400.0;

// Create
pub fn from_export(path: &str, mapping: &WipMapping) -> crate::model::Result<Records> {
    let json_str = fs::read_to_string(path)
        .map_err(|error| format!("the ticket export file `{path}` can't be read: {error}"))?;
    parse(&json_str, mapping)
}

// Parser
pub fn parse(json_str: &str, mapping: &WipMapping) -> crate::model::Result<Records> {
    let root: Value = from_str(json_str)?;
    let Some(issues) = root["issues"].as_array() else {
        return Err("the ticket export has no 'issues' array".into());
    };
    let mut records = Vec::new();
    for issue in issues {
        records.extend(issue_records(issue, mapping)?);
    }
    Ok(records)
}

fn issue_records(issue: &Value, mapping: &WipMapping) -> crate::model::Result<Records> {
    let Some(ticket_key) = issue["key"].as_str() else {
        return Err("a ticket in the export has no 'key' field".into());
    };
    let fields = &issue["fields"];
    let Some(issue_type) = fields["issuetype"]["name"].as_str() else {
        return Err(format!("ticket `{ticket_key}` has no issue type").into());
    };
    let Some(current_status) = fields["status"]["name"].as_str() else {
        return Err(format!("ticket `{ticket_key}` has no status").into());
    };
    let Some(created) = fields["created"].as_str() else {
        return Err(format!("ticket `{ticket_key}` has no creation date").into());
    };
    let created_at = parse_datetime(created)
        .ok_or_else(|| format!("ticket `{ticket_key}` has an unreadable creation date: `{created}`"))?;
    let resolved_at = match fields["resolutiondate"].as_str() {
        None => None,
        Some(resolved) => Some(parse_datetime(resolved).ok_or_else(|| {
            format!("ticket `{ticket_key}` has an unreadable resolution date: `{resolved}`")
        })?),
    };

    let epic_label = fields["parent"]["fields"]["summary"]
        .as_str()
        .map(String::from);
    let release_tags = match fields["fixVersions"].as_array() {
        None => Vec::new(),
        Some(versions) => versions
            .iter()
            .filter_map(|version| version["name"].as_str().map(String::from))
            .collect(),
    };

    let wip_category = mapping.categorize(current_status);
    let done_year_week = resolved_at.as_ref().map(year_week);
    let created_year_week = year_week(&created_at);

    let record = |from_status: Option<String>,
                  to_status: Option<String>,
                  transitioned_at: Option<DateTime<FixedOffset>>,
                  time_in_from_status_days: Option<f64>| TransitionRecord {
        ticket_key: ticket_key.to_string(),
        issue_type: issue_type.to_string(),
        current_status: current_status.to_string(),
        from_status,
        to_status,
        created_at,
        transitioned_at,
        time_in_from_status_days,
        resolved_at,
        wip_category,
        release_tags: release_tags.clone(),
        epic_label: epic_label.clone(),
        done_year_week: done_year_week.clone(),
        created_year_week: created_year_week.clone(),
    };

    let changes = status_changes(issue, ticket_key)?;
    if changes.is_empty() {
        return Ok(vec![record(None, None, None, None)]);
    }

    let mut records = Vec::with_capacity(changes.len());
    let mut previous = created_at;
    for change in changes {
        let days = chargeable_days(&previous, &change.at);
        records.push(record(
            change.from_status,
            change.to_status,
            Some(change.at),
            Some(days),
        ));
        previous = change.at;
    }
    Ok(records)
}

struct StatusChange {
    at: DateTime<FixedOffset>,
    from_status: Option<String>,
    to_status: Option<String>,
}

// Only history entries carrying a `status` item describe a workflow
// transition; everything else in the change log is discarded. Entries are
// sorted chronologically here, whatever order the tracker returned them in.
fn status_changes(issue: &Value, ticket_key: &str) -> crate::model::Result<Vec<StatusChange>> {
    let Some(histories) = issue["changelog"]["histories"].as_array() else {
        return Ok(Vec::new());
    };
    let mut changes = Vec::new();
    for history in histories {
        let Some(items) = history["items"].as_array() else {
            continue;
        };
        let Some(status_item) = items.iter().find(|item| item["field"].as_str() == Some("status"))
        else {
            continue;
        };
        let Some(changed) = history["created"].as_str() else {
            return Err(format!("a status change of `{ticket_key}` has no timestamp").into());
        };
        let at = parse_datetime(changed).ok_or_else(|| {
            format!("ticket `{ticket_key}` has an unreadable change timestamp: `{changed}`")
        })?;
        changes.push(StatusChange {
            at,
            from_status: status_item["fromString"].as_str().map(String::from),
            to_status: status_item["toString"].as_str().map(String::from),
        });
    }
    Ok(changes
        .into_iter()
        .sorted_by_key(|change| change.at)
        .collect())
}

fn chargeable_days(since: &DateTime<FixedOffset>, until: &DateTime<FixedOffset>) -> f64 {
    let days = (*until - *since).num_seconds() as f64 / SECONDS_PER_DAY;
    if days < 0.0 {
        MIN_STATUS_DAYS
    } else {
        days
    }
}

// Tracker exports stamp dates either as RFC 3339 or with a compact
// `+0000`-style offset.
fn parse_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}
