use std::collections::BTreeMap;

use crate::{time, TaskId, Time, UserId};

id_type!(ActivityId);

/// One append-only record of field-level changes made to a task
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: ActivityId,
    pub task_id: TaskId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(with = "time")]
    pub timestamp: Time,

    /// Field values before the change, absent on creation
    #[serde(default)]
    pub old_value: Option<BTreeMap<String, serde_json::Value>>,

    #[serde(default)]
    pub new_value: BTreeMap<String, serde_json::Value>,
}
