use crate::{time, TaskId, Time, UserId};

id_type!(CommentId);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,

    /// `None` for a top-level comment
    #[serde(default)]
    pub parent_id: Option<CommentId>,

    #[serde(default)]
    pub task_id: Option<TaskId>,

    pub content: String,

    #[serde(default, alias = "createdBy")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_avatar: Option<String>,

    #[serde(default, with = "time::option")]
    pub created_at: Option<Time>,
    #[serde(default, with = "time::option")]
    pub updated_at: Option<Time>,

    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Loaded prefix of the replies, never longer than `child_count`
    #[serde(default)]
    pub child_comments: Vec<Comment>,

    #[serde(default)]
    pub has_more_children: bool,

    /// Number of replies the server knows of
    #[serde(default)]
    pub child_count: usize,
}

fn default_active() -> bool {
    true
}

impl Comment {
    pub fn stub() -> Comment {
        Comment {
            id: CommentId::stub(),
            parent_id: None,
            task_id: None,
            content: String::new(),
            user_id: None,
            user_name: None,
            user_avatar: None,
            created_at: None,
            updated_at: None,
            is_pinned: false,
            is_active: true,
            child_comments: Vec::new(),
            has_more_children: false,
            child_count: 0,
        }
    }

    /// Number of replies not loaded yet
    pub fn unloaded_children(&self) -> usize {
        self.child_count.saturating_sub(self.child_comments.len())
    }

    pub fn author(&self) -> String {
        match (&self.user_name, &self.user_id) {
            (Some(n), _) if !n.trim().is_empty() => n.clone(),
            (_, Some(u)) => u.to_string(),
            _ => String::from("Unknown"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub task_id: TaskId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEdit {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
}
