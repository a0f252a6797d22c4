use chrono::NaiveDate;

use crate::{LabelId, PriorityId, StageId, TaskId, Time, UserId, Uuid};

#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_stage_id: Option<StageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_priority_id: Option<PriorityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_to: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_to: Option<NaiveDate>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_id: Option<LabelId>,
}

fn default_public() -> bool {
    true
}

impl Default for TaskFilter {
    fn default() -> TaskFilter {
        TaskFilter {
            title: None,
            description: None,
            project_id: None,
            task_stage_id: None,
            task_priority_id: None,
            start_date_from: None,
            start_date_to: None,
            deadline_from: None,
            deadline_to: None,
            is_public: true,
            is_active: None,
            assigned_user_id: None,
            label_id: None,
        }
    }
}

/// Filter shared by the label and priority catalogs
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_to: Option<NaiveDate>,
}

impl CatalogFilter {
    pub fn matches(&self, name: &str, color: &str, created_at: Option<Time>) -> bool {
        let name_ok = self
            .name
            .as_ref()
            .map_or(true, |n| name.to_lowercase().contains(&n.to_lowercase()));
        let color_ok = self
            .color
            .as_ref()
            .map_or(true, |c| color.eq_ignore_ascii_case(c));
        let date = created_at.map(|t| t.date_naive());
        let from_ok = self
            .created_from
            .map_or(true, |f| date.map_or(false, |d| d >= f));
        let to_ok = self
            .created_to
            .map_or(true, |t| date.map_or(false, |d| d <= t));
        name_ok && color_ok && from_ok && to_ok
    }
}

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
}

/// Filter of the resources hanging off a single task
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskScope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn default_task_filter_only_sends_is_public() {
        assert_eq!(
            serde_json::to_value(TaskFilter::default()).unwrap(),
            json!({"isPublic": true})
        );
        let f: TaskFilter = serde_json::from_value(json!({})).unwrap();
        assert_eq!(f, TaskFilter::default());
    }

    #[test]
    fn catalog_matching() {
        let f = CatalogFilter {
            name: Some(String::from("bug")),
            color: Some(String::from("#F87171")),
            ..CatalogFilter::default()
        };
        assert!(f.matches("Bugfix", "#f87171", None));
        assert!(!f.matches("Feature", "#f87171", None));
        let f = CatalogFilter {
            created_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..CatalogFilter::default()
        };
        assert!(!f.matches("x", "y", None));
        assert!(f.matches("x", "y", crate::time::parse("2024-02-01")));
    }
}
