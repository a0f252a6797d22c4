use crate::{LabelId, TaskId, UserId};

id_type!(TaskAssignId);
id_type!(TaskLabelId);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssign {
    pub id: TaskAssignId,
    pub task_id: TaskId,
    pub user_id: UserId,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskAssign {
    pub task_id: TaskId,
    pub user_id: UserId,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLabel {
    pub id: TaskLabelId,
    pub task_id: TaskId,
    pub label_id: LabelId,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskLabel {
    pub task_id: TaskId,
    pub label_id: LabelId,
}
