use std::collections::BTreeMap;

use serde_json::Value;

use crate::{api::ActivityLog, Lookups};

/// An activity log, ready to be shown in a timeline
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActivityEntry {
    pub author: String,

    /// `Mon dd, HH:MM`
    pub when: String,

    pub headline: &'static str,
    pub details: Vec<String>,
}

const EMPTY: &str = "empty";

fn raw(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let items = items.iter().filter_map(raw).collect::<Vec<_>>();
            (!items.is_empty()).then(|| items.join(", "))
        }
        other => Some(other.to_string()),
    }
}

/// Display form of the value of `key`, with ids turned into names when known
fn display(key: &str, v: &Value, lookups: &Lookups) -> Option<String> {
    if let Value::Array(items) = v {
        let items = items
            .iter()
            .filter_map(|i| display(key, i, lookups))
            .collect::<Vec<_>>();
        return (!items.is_empty()).then(|| items.join(", "));
    }
    let s = raw(v)?;
    let name = match key {
        "task priority" => lookups.priority_name(&s),
        "label" | "labels" => lookups.label_name(&s),
        "task stage" => lookups.stage_name(&s),
        "assign" | "assignedUsers" => lookups.user_name(&s),
        _ => None,
    };
    Some(name.map(String::from).unwrap_or(s))
}

fn is_creation(old: &BTreeMap<String, Value>, new: &BTreeMap<String, Value>) -> bool {
    old.is_empty() && new.len() == 1 && new.contains_key("task")
}

/// Turns a log into a headline and one line per change, `None` when there is nothing to show
pub fn describe(log: &ActivityLog, lookups: &Lookups) -> Option<ActivityEntry> {
    let no_old = BTreeMap::new();
    let old = log.old_value.as_ref().unwrap_or(&no_old);
    let new = &log.new_value;
    if old.is_empty() && new.is_empty() {
        return None;
    }

    let author = match (&log.user_name, &log.user_id) {
        (Some(n), _) if !n.trim().is_empty() => n.clone(),
        (_, Some(u)) => lookups.user_display(&u.to_string()),
        _ => String::from("Unknown"),
    };
    let when = log.timestamp.format("%b %d, %H:%M").to_string();

    if is_creation(old, new) {
        return Some(ActivityEntry {
            author,
            when,
            headline: "Created task",
            details: Vec::new(),
        });
    }

    let shown = |key: &str, v: Option<&Value>| {
        v.and_then(|v| display(key, v, lookups))
            .unwrap_or_else(|| String::from(EMPTY))
    };
    let details = if new.is_empty() {
        old.iter()
            .map(|(k, v)| format!("Removed \"{k}\" with value \"{}\"", shown(k, Some(v))))
            .collect()
    } else {
        new.iter()
            .filter_map(|(k, v)| {
                if k == "assignedUsers" {
                    let first = match v {
                        Value::Array(items) => items.first(),
                        other => Some(other),
                    };
                    Some(format!("Assigned \"{}\"", shown(k, first)))
                } else if old.get(k) != Some(v) {
                    Some(format!(
                        "\"{k}\" changed from \"{}\" to \"{}\"",
                        shown(k, old.get(k)),
                        shown(k, Some(v))
                    ))
                } else {
                    None
                }
            })
            .collect()
    };

    Some(ActivityEntry {
        author,
        when,
        headline: "Updated task",
        details,
    })
}
