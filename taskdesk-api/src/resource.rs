use std::fmt::{Debug, Display};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    ActivityId, ActivityLog, CatalogFilter, Comment, CommentEdit, CommentId, Label, LabelId,
    NewComment, NewLabel, NewPriority, NewStage, NewTask, NewTaskAssign, NewTaskLabel, Priority,
    PriorityId, Stage, StageFilter, StageId, Task, TaskAssign, TaskAssignId, TaskFilter, TaskId,
    TaskLabel, TaskLabelId, TaskScope,
};

/// Where the paging parameters of a filter request go
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Paging {
    /// `page`, `size`, `sortBy`, `direction` in the query string
    Query,

    /// `page`, `limit`, `sortBy`, `sortDirection` merged into the JSON body
    Body,
}

/// A REST resource exposed under `{base}/{PATH}`
pub trait Resource: Clone + Debug + DeserializeOwned + 'static {
    const PATH: &'static str;
    const PAGING: Paging = Paging::Query;

    type Id: Copy + Debug + Display + Eq;
    type Filter: Clone + Debug + Default + Serialize;
    type New: Debug + Serialize;
    type Update: Debug + Serialize;

    fn id(&self) -> Self::Id;
}

macro_rules! resource {
    ($ty:ty, $path:literal, $id:ty, $filter:ty, $new:ty, $update:ty $(, $paging:expr)?) => {
        impl Resource for $ty {
            const PATH: &'static str = $path;
            $(const PAGING: Paging = $paging;)?

            type Id = $id;
            type Filter = $filter;
            type New = $new;
            type Update = $update;

            fn id(&self) -> $id {
                self.id
            }
        }
    };
}

resource!(Task, "task", TaskId, TaskFilter, NewTask, NewTask, Paging::Body);
resource!(Label, "label", LabelId, CatalogFilter, NewLabel, NewLabel);
resource!(Priority, "priority", PriorityId, CatalogFilter, NewPriority, NewPriority);
resource!(Stage, "task-stage", StageId, StageFilter, NewStage, NewStage);
resource!(Comment, "task-comment", CommentId, TaskScope, NewComment, CommentEdit);
resource!(TaskAssign, "task-assign", TaskAssignId, TaskScope, NewTaskAssign, NewTaskAssign);
resource!(TaskLabel, "task-label", TaskLabelId, TaskScope, NewTaskLabel, NewTaskLabel);
resource!(ActivityLog, "task-log-activity", ActivityId, TaskScope, ActivityLog, ActivityLog);
