mod activity;
pub use activity::{describe, ActivityEntry};

mod client;
pub use client::Client;

pub mod comment;
pub use comment::CommentTree;

mod lookups;
pub use lookups::Lookups;

mod notice;
pub use notice::{Notice, NoticeLevel};

pub mod pagination;

mod rest;
pub use rest::RestTransport;

mod subtask;
pub use subtask::SubtaskList;

mod task_form;
pub use task_form::TaskForm;

mod transport;
pub use transport::{Method, Request, Transport};

pub mod view;
pub use view::{ListDefaults, ListView, UrlFilter, ViewAction};

pub mod api {
    pub use taskdesk_api::*;
}

/// Base URL of the REST collaborator when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8083/api";
