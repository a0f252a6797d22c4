use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

/// Project the dashboard is bound to when nothing else is configured
pub const DEFAULT_PROJECT_ID: Uuid = uuid!("9cdb426d-4087-4a98-afff-843050855a89");

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
            serde::Deserialize,
            serde::Serialize,
        )]
        pub struct $name(pub crate::Uuid);

        impl $name {
            pub fn stub() -> $name {
                $name(crate::STUB_UUID)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<$name, uuid::Error> {
                crate::Uuid::try_parse(s).map($name)
            }
        }
    };
}

mod activity;
pub use activity::{ActivityId, ActivityLog};

mod assign;
pub use assign::{NewTaskAssign, NewTaskLabel, TaskAssign, TaskAssignId, TaskLabel, TaskLabelId};

mod comment;
pub use comment::{Comment, CommentEdit, CommentId, NewComment};

mod envelope;
pub use envelope::{decode_list, decode_single, Page};

mod error;
pub use error::Error;

mod filter;
pub use filter::{CatalogFilter, StageFilter, TaskFilter, TaskScope};

mod label;
pub use label::{Label, LabelId, NewLabel};

mod priority;
pub use priority::{NewPriority, Priority, PriorityId};

mod query;
pub use query::{ListQuery, Sort, SortDirection};

mod resource;
pub use resource::{Paging, Resource};

mod stage;
pub use stage::{NewStage, Stage, StageId, STAGE_COLORS};

mod task;
pub use task::{NewSubtask, NewTask, Subtask, SubtaskId, SubtaskUpdate, Task, TaskId};

pub mod time;

mod user;
pub use user::{User, UserId};

/// Trims `s` and returns `None` if nothing is left
pub fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
