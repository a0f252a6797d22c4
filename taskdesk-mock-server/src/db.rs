use std::{cmp::Ordering, collections::BTreeMap};

use serde::Serialize;
use serde_json::{json, Value};
use taskdesk_client::{
    api::{
        self, ActivityId, ActivityLog, Comment, CommentId, Error, Label, LabelId, NewTask,
        Priority, SortDirection, Stage, Subtask, Task, TaskAssign, TaskId, TaskLabel, Time,
        UserId, Uuid,
    },
    comment::CHILDREN_PAGE_SIZE,
};

/// Depth a task may sit at, top-level tasks being at depth 0
pub const MAX_TASK_DEPTH: usize = 2;

/// Depth a comment may sit at, top-level comments being at depth 0
pub const MAX_COMMENT_DEPTH: usize = 2;

/// Everything the mock server stores; also the format of seed files
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub priorities: Vec<Priority>,
    #[serde(default)]
    pub stages: Vec<Stage>,

    /// Flat, oldest first; replies point to their parent through `parent_id`
    #[serde(default)]
    pub comments: Vec<Comment>,

    #[serde(default)]
    pub assignments: Vec<TaskAssign>,
    #[serde(default)]
    pub task_labels: Vec<TaskLabel>,

    /// Oldest first
    #[serde(default)]
    pub activity: Vec<ActivityLog>,

    #[serde(default)]
    pub subtasks: BTreeMap<TaskId, Vec<Subtask>>,
}

pub fn not_found(what: &str, id: impl std::fmt::Display) -> Error {
    Error::NotFound(format!("{what} {id} not found"))
}

/// Case-insensitive ordering of JSON scalars, nulls first
fn cmp_json(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (a, b) => a.to_string().cmp(&b.to_string()),
    }
}

/// `created_at` → `createdAt`
fn camel_case(field: &str) -> String {
    let mut res = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            res.extend(c.to_uppercase());
            upper = false;
        } else {
            res.push(c);
        }
    }
    res
}

/// Sorts by the JSON field `field`, in snake or camel case, keeping ties in order
pub fn sort_by_field<T: Serialize>(items: Vec<T>, field: &str, dir: SortDirection) -> Vec<T> {
    let field = camel_case(field);
    let mut keyed = items
        .into_iter()
        .map(|i| {
            let key = serde_json::to_value(&i)
                .ok()
                .and_then(|v| v.get(&field).cloned())
                .unwrap_or(Value::Null);
            (key, i)
        })
        .collect::<Vec<_>>();
    keyed.sort_by(|(a, _), (b, _)| match dir {
        SortDirection::Asc => cmp_json(a, b),
        SortDirection::Desc => cmp_json(b, a),
    });
    keyed.into_iter().map(|(_, i)| i).collect()
}

/// Cuts page `page` out of `items`, returning it with the number of pages
pub fn paginate<T>(items: Vec<T>, page: usize, size: usize) -> (Vec<T>, usize, usize) {
    let total = items.len();
    let size = size.max(1);
    let pages = (total + size - 1) / size;
    let slice = items.into_iter().skip(page.saturating_mul(size)).take(size).collect();
    (slice, pages, total)
}

impl Seed {
    pub fn task(&self, id: TaskId) -> Result<&Task, Error> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("task", id))
    }

    pub fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, Error> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("task", id))
    }

    pub fn task_depth(&self, id: TaskId) -> Result<usize, Error> {
        let mut depth = 0;
        let mut cur = self.task(id)?;
        while let Some(parent) = cur.parent_task_id {
            depth += 1;
            cur = self.task(parent)?;
            if depth > self.tasks.len() {
                return Err(Error::Server {
                    status: 500,
                    message: String::from("task hierarchy has a cycle"),
                });
            }
        }
        Ok(depth)
    }

    pub fn label(&self, id: LabelId) -> Result<&Label, Error> {
        self.labels
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| not_found("label", id))
    }

    pub fn comment(&self, id: CommentId) -> Result<&Comment, Error> {
        self.comments
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("comment", id))
    }

    pub fn comment_depth(&self, id: CommentId) -> Result<usize, Error> {
        let mut depth = 0;
        let mut cur = self.comment(id)?;
        while let Some(parent) = cur.parent_id {
            depth += 1;
            cur = self.comment(parent)?;
        }
        Ok(depth)
    }

    /// Replies of `parent` (or top-level comments of `task`), newest first
    pub fn comments_under(&self, task: TaskId, parent: Option<CommentId>) -> Vec<&Comment> {
        self.comments
            .iter()
            .rev()
            .filter(|c| c.is_active && c.parent_id == parent)
            .filter(|c| parent.is_some() || c.task_id == Some(task))
            .collect()
    }

    /// A comment the way the server sends it: counts filled in, first page of replies embedded
    pub fn expand(&self, c: &Comment) -> Comment {
        let task = c.task_id.unwrap_or_else(TaskId::stub);
        let kids = self.comments_under(task, Some(c.id));
        let mut res = c.clone();
        res.child_count = kids.len();
        res.has_more_children = kids.len() > CHILDREN_PAGE_SIZE;
        res.child_comments = kids
            .into_iter()
            .take(CHILDREN_PAGE_SIZE)
            .map(|k| self.expand(k))
            .collect();
        res
    }

    /// Removes a comment and all its replies, returning how many went away
    pub fn remove_comment(&mut self, id: CommentId) -> usize {
        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            let cur = doomed[i];
            doomed.extend(
                self.comments
                    .iter()
                    .filter(|c| c.parent_id == Some(cur))
                    .map(|c| c.id),
            );
            i += 1;
        }
        let before = self.comments.len();
        self.comments.retain(|c| !doomed.contains(&c.id));
        before - self.comments.len()
    }

    pub fn log(
        &mut self,
        task: TaskId,
        user: UserId,
        now: Time,
        old: Option<BTreeMap<String, Value>>,
        new: BTreeMap<String, Value>,
    ) {
        self.activity.push(ActivityLog {
            id: ActivityId(Uuid::new_v4()),
            task_id: task,
            user_id: Some(user),
            user_name: None,
            timestamp: now,
            old_value: old,
            new_value: new,
        });
    }

    /// Field-level differences between two versions of a task, as activity maps
    pub fn task_diff(
        before: &Task,
        after: &NewTask,
    ) -> (BTreeMap<String, Value>, BTreeMap<String, Value>) {
        let mut old = BTreeMap::new();
        let mut new = BTreeMap::new();
        let mut diff = |key: &str, a: Value, b: Value| {
            if a != b {
                old.insert(String::from(key), a);
                new.insert(String::from(key), b);
            }
        };
        let day = |t: Option<Time>| {
            t.map_or(Value::Null, |t| json!(t.date_naive().to_string()))
        };
        diff("title", json!(before.title), json!(after.title));
        diff(
            "description",
            json!(before.description),
            json!(after.description),
        );
        diff(
            "task stage",
            json!(before.task_stage_id),
            json!(after.task_stage_id),
        );
        diff(
            "task priority",
            json!(before.task_priority_id),
            json!(after.task_priority_id),
        );
        diff("start date", day(before.start_date), day(after.start_date));
        diff("deadline", day(before.deadline), day(after.deadline));
        diff(
            "progress",
            json!(before.progress_percent),
            json!(after.progress_percent),
        );
        (old, new)
    }

    pub fn apply_task(t: &mut Task, new: NewTask, now: Time) {
        t.title = new.title;
        t.description = new.description;
        t.project_id = new.project_id.or(t.project_id);
        t.parent_task_id = new.parent_task_id;
        t.task_stage_id = new.task_stage_id;
        t.task_priority_id = new.task_priority_id;
        t.start_date = new.start_date;
        t.deadline = new.deadline;
        t.progress_percent = new.progress_percent;
        t.is_public = new.is_public.or(t.is_public);
        t.properties = new.properties;
        t.updated_at = Some(now);
    }

    pub fn validate_task(new: &NewTask) -> Result<(), Error> {
        if new.title.trim().is_empty() {
            return Err(Error::Validation(String::from("Title is required")));
        }
        if let (Some(s), Some(d)) = (new.start_date, new.deadline) {
            if d < s {
                return Err(Error::Validation(String::from(
                    "Deadline must not be before the start date",
                )));
            }
        }
        if new.progress_percent.map_or(false, |p| p > 100) {
            return Err(Error::Validation(String::from(
                "Progress must be between 0 and 100",
            )));
        }
        Ok(())
    }

    pub fn validate_catalog(name: &str, color: &str) -> Result<(), Error> {
        if name.trim().is_empty() {
            return Err(Error::Validation(String::from("Name is required")));
        }
        let hex = color.strip_prefix('#').unwrap_or("");
        if !(hex.len() == 6 || hex.len() == 3) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Validation(format!("Invalid color {color:?}")));
        }
        Ok(())
    }
}

/// User the mock server acts as
pub fn stub_user() -> UserId {
    api::User::directory()
        .first()
        .map_or_else(UserId::stub, |u| u.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorting_by_json_field() {
        let items = vec![
            json!({"name": "beta", "sortOrder": 2}),
            json!({"name": "Alpha", "sortOrder": 3}),
            json!({"sortOrder": 1}),
        ];
        let by_name = sort_by_field(items.clone(), "name", SortDirection::Asc);
        assert_eq!(by_name[0], items[2]);
        assert_eq!(by_name[1], items[1]);
        let by_order = sort_by_field(items.clone(), "sort_order", SortDirection::Desc);
        assert_eq!(by_order, vec![items[1].clone(), items[0].clone(), items[2].clone()]);
    }

    #[test]
    fn paging() {
        let (page, pages, total) = paginate((0..12).collect::<Vec<_>>(), 2, 5);
        assert_eq!((page, pages, total), (vec![10, 11], 3, 12));
        let (page, pages, _) = paginate(Vec::<u8>::new(), 0, 5);
        assert!(page.is_empty());
        assert_eq!(pages, 0);
    }

    #[test]
    fn paging_far_past_the_end() {
        let (page, pages, total) = paginate(vec![1, 2, 3], usize::MAX - 1, 5);
        assert!(page.is_empty());
        assert_eq!((pages, total), (1, 3));
    }

    #[test]
    fn catalog_validation() {
        assert!(Seed::validate_catalog("Bug", "#f87171").is_ok());
        assert!(Seed::validate_catalog("Bug", "#fff").is_ok());
        assert!(Seed::validate_catalog(" ", "#fff").is_err());
        assert!(Seed::validate_catalog("Bug", "red").is_err());
    }
}
