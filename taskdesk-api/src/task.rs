use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{time, Label, PriorityId, StageId, TaskFilter, Time, UserId};

id_type!(TaskId);
id_type!(SubtaskId);

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_id: Option<crate::Uuid>,
    #[serde(default)]
    pub parent_task_id: Option<TaskId>,
    #[serde(default)]
    pub task_stage_id: Option<StageId>,
    #[serde(default)]
    pub task_priority_id: Option<PriorityId>,
    #[serde(default)]
    pub milestone_id: Option<crate::Uuid>,
    #[serde(default, with = "time::option")]
    pub start_date: Option<Time>,
    #[serde(default, with = "time::option")]
    pub deadline: Option<Time>,
    #[serde(default, with = "time::option")]
    pub complete_date: Option<Time>,
    #[serde(default)]
    pub progress_percent: Option<u8>,
    #[serde(default)]
    pub is_auto_calculate_progress: Option<bool>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default, with = "time::option")]
    pub created_at: Option<Time>,
    #[serde(default, with = "time::option")]
    pub updated_at: Option<Time>,
    #[serde(default)]
    pub created_by: Option<UserId>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assigned_users: Vec<UserId>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub child_count: usize,
}

fn default_active() -> bool {
    true
}

impl Task {
    pub fn stub() -> Task {
        Task {
            id: TaskId::stub(),
            title: String::from("stub task"),
            description: String::new(),
            project_id: None,
            parent_task_id: None,
            task_stage_id: None,
            task_priority_id: None,
            milestone_id: None,
            start_date: None,
            deadline: None,
            complete_date: None,
            progress_percent: None,
            is_auto_calculate_progress: None,
            is_public: Some(true),
            created_at: None,
            updated_at: None,
            created_by: None,
            labels: Vec::new(),
            assigned_users: Vec::new(),
            is_active: true,
            properties: BTreeMap::new(),
            child_count: 0,
        }
    }

    /// Whether this task passes `filter`, comparing dates at day granularity
    pub fn matches(&self, filter: &TaskFilter) -> bool {
        let contains = |hay: &str, needle: &Option<String>| {
            needle
                .as_ref()
                .map_or(true, |n| hay.to_lowercase().contains(&n.to_lowercase()))
        };
        let in_range = |t: Option<Time>, from: Option<NaiveDate>, to: Option<NaiveDate>| match (t.map(|t| t.date_naive()), from, to) {
            (_, None, None) => true,
            (None, _, _) => false,
            (Some(d), from, to) => {
                from.map_or(true, |f| d >= f) && to.map_or(true, |t| d <= t)
            }
        };
        contains(&self.title, &filter.title)
            && contains(&self.description, &filter.description)
            && filter.project_id.map_or(true, |p| self.project_id == Some(p))
            && filter
                .task_stage_id
                .map_or(true, |s| self.task_stage_id == Some(s))
            && filter
                .task_priority_id
                .map_or(true, |p| self.task_priority_id == Some(p))
            && in_range(self.start_date, filter.start_date_from, filter.start_date_to)
            && in_range(self.deadline, filter.deadline_from, filter.deadline_to)
            && self.is_public.unwrap_or(true) == filter.is_public
            && filter.is_active.map_or(true, |a| self.is_active == a)
            && filter
                .assigned_user_id
                .map_or(true, |u| self.assigned_users.contains(&u))
            && filter
                .label_id
                .map_or(true, |l| self.labels.iter().any(|lbl| lbl.id == l))
    }
}

/// Body of task creation and full-replacement update requests
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<crate::Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_stage_id: Option<StageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_priority_id: Option<PriorityId>,
    #[serde(
        default,
        with = "time::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Time>,
    #[serde(
        default,
        with = "time::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl From<&Task> for NewTask {
    fn from(t: &Task) -> NewTask {
        NewTask {
            title: t.title.clone(),
            description: t.description.clone(),
            project_id: t.project_id,
            parent_task_id: t.parent_task_id,
            task_stage_id: t.task_stage_id,
            task_priority_id: t.task_priority_id,
            start_date: t.start_date,
            deadline: t.deadline,
            progress_percent: t.progress_percent,
            is_public: t.is_public,
            properties: t.properties.clone(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: SubtaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, with = "time::option")]
    pub created_at: Option<Time>,
    #[serde(default, with = "time::option")]
    pub updated_at: Option<Time>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewSubtask {
    pub title: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SubtaskUpdate {
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_sparse_task() {
        let t: Task = serde_json::from_value(json!({
            "id": "00000000-0000-0000-0000-0000000000aa",
            "title": "Write report",
            "deadline": "2024-05-01T00:00:00",
            "labels": [{"id": "00000000-0000-0000-0000-0000000000bb", "name": "docs", "color": "#60a5fa"}],
        }))
        .unwrap();
        assert_eq!(t.title, "Write report");
        assert!(t.is_active);
        assert_eq!(t.labels.len(), 1);
        assert_eq!(
            t.deadline.map(|d| d.date_naive()),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
    }

    #[test]
    fn filter_matching() {
        let mut t = Task::stub();
        t.title = String::from("Fix login page");
        t.deadline = crate::time::parse("2024-05-10");
        let mut f = TaskFilter::default();
        assert!(t.matches(&f));
        f.title = Some(String::from("LOGIN"));
        assert!(t.matches(&f));
        f.deadline_from = NaiveDate::from_ymd_opt(2024, 5, 10);
        f.deadline_to = NaiveDate::from_ymd_opt(2024, 5, 10);
        assert!(t.matches(&f));
        f.deadline_from = NaiveDate::from_ymd_opt(2024, 5, 11);
        assert!(!t.matches(&f));
        f.deadline_from = None;
        f.is_public = false;
        assert!(!t.matches(&f));
    }

    #[test]
    fn ids_parse_from_their_display() {
        let raw = "0e5b9a8c-3f51-4c5e-9a4f-2d6f1b7c8e90";
        let id: TaskId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
        assert_eq!(id, TaskId(crate::Uuid::parse_str(raw).unwrap()));
        assert!("not-an-id".parse::<SubtaskId>().is_err());
        assert_eq!(TaskId::stub().0, crate::STUB_UUID);
    }
}
