//! In-memory stand-in for the REST collaborator of the dashboard
//!
//! Routes are answered with the same envelope shapes the real server uses,
//! inconsistencies included, and errors go through the same status-and-body
//! encoding a real HTTP exchange would.

use std::{collections::HashSet, str::FromStr};

use chrono::Utc;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use taskdesk_client::{
    api::{
        CatalogFilter, Comment, CommentEdit, CommentId, Error, Label, LabelId, NewComment,
        NewLabel, NewPriority, NewStage, NewSubtask, NewTask, Priority, PriorityId, SortDirection,
        Stage, StageFilter, StageId, Subtask, SubtaskId, SubtaskUpdate, Task, TaskAssign,
        TaskAssignId, TaskFilter, TaskId, TaskLabel, TaskLabelId, TaskScope, UserId, Uuid,
    },
    Method, Request, Transport,
};

mod db;
pub use db::{Seed, MAX_COMMENT_DEPTH, MAX_TASK_DEPTH};
use db::{not_found, paginate, sort_by_field};

struct State {
    db: Seed,
    acting_user: UserId,
    offline: bool,

    /// Resources on which writes answer 403
    read_only: HashSet<String>,

    requests: Vec<Request>,
}

pub struct MockServer(Mutex<State>);

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

fn parse_id<I: FromStr>(s: &str) -> Result<I, Error> {
    s.parse()
        .map_err(|_| Error::Validation(format!("invalid id {s:?}")))
}

fn body<T: DeserializeOwned>(req: &Request) -> Result<T, Error> {
    serde_json::from_value(req.body.clone().unwrap_or(Value::Null))
        .map_err(|e| Error::Validation(format!("invalid request body: {e}")))
}

fn query_num(req: &Request, key: &str, default: usize) -> usize {
    req.query_value(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn query_id<I: FromStr>(req: &Request, key: &str) -> Result<I, Error> {
    let raw = req
        .query_value(key)
        .ok_or_else(|| Error::Validation(format!("missing {key} parameter")))?;
    parse_id(raw)
}

fn to_json<T: serde::Serialize>(v: T) -> Result<Value, Error> {
    serde_json::to_value(v).map_err(|e| Error::Server {
        status: 500,
        message: format!("serializing response: {e}"),
    })
}

/// Paging parameters of a catalog filter request, from the query string
fn query_paging(req: &Request) -> (usize, usize, Option<String>, SortDirection) {
    let direction = req
        .query_value("direction")
        .and_then(|d| d.parse().ok())
        .unwrap_or(SortDirection::Asc);
    (
        query_num(req, "page", 0),
        query_num(req, "size", 10),
        req.query_value("sortBy").map(String::from),
        direction,
    )
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer::from_seed(Seed::default())
    }

    pub fn from_seed(db: Seed) -> MockServer {
        MockServer(Mutex::new(State {
            db,
            acting_user: db::stub_user(),
            offline: false,
            read_only: HashSet::new(),
            requests: Vec::new(),
        }))
    }

    /// Makes every following request fail as if the server were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.0.lock().offline = offline;
    }

    /// Makes writes to `resource` (e.g. `task-stage`) answer 403
    pub fn set_read_only(&self, resource: &str) {
        self.0.lock().read_only.insert(String::from(resource));
    }

    pub fn set_acting_user(&self, user: UserId) {
        self.0.lock().acting_user = user;
    }

    pub fn snapshot(&self) -> Seed {
        self.0.lock().db.clone()
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<Request> {
        self.0.lock().requests.clone()
    }

    pub fn handle(&self, req: Request) -> Result<Value, Error> {
        let mut st = self.0.lock();
        st.requests.push(req.clone());
        if st.offline {
            return Err(Error::Network(String::from("connection refused")));
        }
        let segs = req.path_segments();
        if req.method != Method::Get {
            if let Some(res) = segs.first() {
                if st.read_only.contains(*res) {
                    return Err(Error::PermissionDenied);
                }
            }
        }
        st.route(&req, &segs)
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for MockServer {
    async fn send(&self, req: Request) -> Result<Value, Error> {
        let (method, path) = (req.method, req.path.clone());
        self.handle(req).map_err(|err| match err.status_code() {
            // Round-trip through the wire encoding, like an HTTP response would
            Some(status) => {
                let parsed = Error::from_response(status, &err.contents());
                tracing::debug!(?parsed, %method, %path, "mock server answers with an error");
                parsed
            }
            None => err,
        })
    }
}

impl State {
    fn route(&mut self, req: &Request, segs: &[&str]) -> Result<Value, Error> {
        use Method::*;
        match (req.method, segs) {
            (Post, ["task", "filter"]) => self.filter_tasks(req),
            (Get, ["task"]) => to_json(&self.db.tasks),
            (Post, ["task"]) => self.create_task(body(req)?),
            (Get, ["task", id]) => {
                let task = self.db.task(parse_id(id)?)?;
                Ok(json!({"success": true, "data": task}))
            }
            (Put, ["task", id]) => self.update_task(parse_id(id)?, body(req)?),
            (Delete, ["task", id]) => self.delete_task(parse_id(id)?),
            (Get, ["task", id, "subtasks"]) => {
                let task = self.db.task(parse_id(id)?)?.id;
                to_json(self.db.subtasks.get(&task).cloned().unwrap_or_default())
            }
            (Post, ["task", id, "subtasks"]) => self.add_subtask(parse_id(id)?, body(req)?),
            (Patch, ["task", id, "subtasks", sub]) => {
                self.update_subtask(parse_id(id)?, parse_id(sub)?, body(req)?)
            }
            (Delete, ["task", id, "subtasks", sub]) => {
                self.delete_subtask(parse_id(id)?, parse_id(sub)?)
            }

            (Post, ["label", "filter"]) => self.filter_labels(req, body(req)?),
            (Get, ["label"]) => to_json(&self.db.labels),
            (Post, ["label"]) => self.create_label(body(req)?),
            (Get, ["label", id]) => to_json(self.db.label(parse_id(id)?)?),
            (Put, ["label", id]) => self.update_label(parse_id(id)?, body(req)?),
            (Delete, ["label", id]) => self.delete_label(parse_id(id)?),

            (Post, ["priority", "filter"]) => self.filter_priorities(req, body(req)?),
            (Get, ["priority"]) => Ok(json!({"success": true, "data": self.db.priorities})),
            (Post, ["priority"]) => self.create_priority(body(req)?),
            (Get, ["priority", id]) => self.get_priority(parse_id(id)?),
            (Put, ["priority", id]) => self.update_priority(parse_id(id)?, body(req)?),
            (Delete, ["priority", id]) => self.delete_priority(parse_id(id)?),

            (Post, ["task-stage", "filter"]) => self.filter_stages(req, body(req)?),
            (Get, ["task-stage"]) => to_json(&self.db.stages),
            (Get, ["task-stage", "by-project", project]) => {
                let project = parse_id::<Uuid>(project)?;
                let stages = self
                    .db
                    .stages
                    .iter()
                    .filter(|s| s.project_id == Some(project))
                    .collect::<Vec<_>>();
                to_json(stages)
            }
            (Post, ["task-stage"]) => self.create_stage(body(req)?),
            (Put, ["task-stage", id]) => self.update_stage(parse_id(id)?, body(req)?),
            (Delete, ["task-stage", id]) => self.delete_stage(parse_id(id)?),

            (Get, ["task-comment", "by-task", task]) => self.comments_by_task(req, parse_id(task)?),
            (Get, ["task-comment", id, "children"]) => self.comment_children(req, parse_id(id)?),
            (Post, ["task-comment", "filter"]) => self.filter_comments(req, body(req)?),
            (Post, ["task-comment"]) => self.create_comment(body(req)?),
            (Get, ["task-comment", id]) => {
                let c = self.db.comment(parse_id(id)?)?;
                to_json(self.db.expand(c))
            }
            (Put, ["task-comment", id]) => self.update_comment(parse_id(id)?, body(req)?),
            (Delete, ["task-comment", id]) => self.delete_comment(parse_id(id)?),

            (Get, ["task-assign"]) => {
                let task = query_id::<TaskId>(req, "idTask")?;
                let users = self
                    .db
                    .assignments
                    .iter()
                    .filter(|a| a.task_id == task)
                    .map(|a| a.user_id)
                    .collect::<Vec<_>>();
                to_json(users)
            }
            (Post, ["task-assign", "filter"]) => {
                let scope = body::<TaskScope>(req)?;
                let items = self
                    .db
                    .assignments
                    .iter()
                    .filter(|a| scope.task_id.map_or(true, |t| a.task_id == t))
                    .cloned()
                    .collect::<Vec<_>>();
                self.flat_page(req, items)
            }
            (Post, ["task-assign"]) => self.assign(query_id(req, "taskId")?, body(req)?),
            (Delete, ["task-assign"]) => {
                self.unassign(query_id(req, "taskId")?, query_id(req, "userId")?)
            }

            (Get, ["task-label"]) => {
                let task = query_id::<TaskId>(req, "idTask")?;
                let labels = self
                    .db
                    .task_labels
                    .iter()
                    .filter(|tl| tl.task_id == task)
                    .filter_map(|tl| self.db.label(tl.label_id).ok())
                    .collect::<Vec<_>>();
                to_json(labels)
            }
            (Post, ["task-label", "filter"]) => {
                let scope = body::<TaskScope>(req)?;
                let items = self
                    .db
                    .task_labels
                    .iter()
                    .filter(|tl| scope.task_id.map_or(true, |t| tl.task_id == t))
                    .cloned()
                    .collect::<Vec<_>>();
                self.flat_page(req, items)
            }
            (Post, ["task-label"]) => self.attach_labels(query_id(req, "taskId")?, body(req)?),
            (Delete, ["task-label"]) => {
                self.detach_label(query_id(req, "taskId")?, query_id(req, "labelId")?)
            }

            (Get, ["task-log-activity", "by-task", task]) => {
                let task = parse_id::<TaskId>(task)?;
                let logs = self
                    .db
                    .activity
                    .iter()
                    .rev()
                    .filter(|a| a.task_id == task)
                    .collect::<Vec<_>>();
                Ok(json!({"success": true, "data": logs}))
            }
            (Post, ["task-log-activity", "filter"]) => {
                let scope = body::<TaskScope>(req)?;
                let items = self
                    .db
                    .activity
                    .iter()
                    .rev()
                    .filter(|a| scope.task_id.map_or(true, |t| a.task_id == t))
                    .cloned()
                    .collect::<Vec<_>>();
                self.flat_page(req, items)
            }

            _ => Err(Error::NotFound(format!(
                "no route for {} /{}",
                req.method,
                segs.join("/")
            ))),
        }
    }

    /// `{data: [..], totalPages, ..}` for query-paged resources without a dedicated shape
    fn flat_page<T: serde::Serialize>(&self, req: &Request, items: Vec<T>) -> Result<Value, Error> {
        let (page, size, sort_by, direction) = query_paging(req);
        let items = match sort_by {
            Some(field) => sort_by_field(items, &field, direction),
            None => items,
        };
        let (data, pages, total) = paginate(items, page, size);
        Ok(json!({
            "success": true,
            "data": data,
            "page": page,
            "limit": size,
            "totalPages": pages,
            "totalElements": total,
        }))
    }

    fn filter_tasks(&self, req: &Request) -> Result<Value, Error> {
        let raw = req.body.clone().unwrap_or_else(|| json!({}));
        let filter = serde_json::from_value::<TaskFilter>(raw.clone())
            .map_err(|e| Error::Validation(format!("invalid task filter: {e}")))?;
        let num = |k: &str, d: usize| {
            raw.get(k)
                .and_then(|v| v.as_u64())
                .map_or(d, |v| v as usize)
        };
        let page = num("page", 0);
        let limit = num("limit", 5);
        let sort_by = raw
            .get("sortBy")
            .and_then(|v| v.as_str())
            .unwrap_or("created_at")
            .to_string();
        let direction = raw
            .get("sortDirection")
            .and_then(|v| v.as_str())
            .and_then(|d| d.parse().ok())
            .unwrap_or(SortDirection::Desc);

        let matching = self
            .db
            .tasks
            .iter()
            .filter(|t| t.matches(&filter))
            .cloned()
            .collect::<Vec<_>>();
        let (data, pages, total) = paginate(sort_by_field(matching, &sort_by, direction), page, limit);
        Ok(json!({
            "data": data,
            "totalElements": total,
            "page": page,
            "limit": limit,
            "totalPages": pages,
            "sortBy": sort_by,
            "sortDirection": direction,
        }))
    }

    fn create_task(&mut self, new: NewTask) -> Result<Value, Error> {
        db::Seed::validate_task(&new)?;
        if let Some(parent) = new.parent_task_id {
            if self.db.task_depth(parent)? + 1 > MAX_TASK_DEPTH {
                return Err(Error::MaxDepthExceeded(format!(
                    "Maximum task depth of {} reached",
                    MAX_TASK_DEPTH + 1
                )));
            }
        }
        let now = Utc::now();
        let mut task = Task {
            id: TaskId(Uuid::new_v4()),
            created_at: Some(now),
            created_by: Some(self.acting_user),
            ..Task::stub()
        };
        let title = new.title.clone();
        Seed::apply_task(&mut task, new, now);
        if let Some(parent) = task.parent_task_id {
            self.db.task_mut(parent)?.child_count += 1;
        }
        let id = task.id;
        self.db.tasks.push(task.clone());
        self.db.log(
            id,
            self.acting_user,
            now,
            None,
            [(String::from("task"), json!(title))].into_iter().collect(),
        );
        Ok(json!({"success": true, "data": task}))
    }

    fn update_task(&mut self, id: TaskId, new: NewTask) -> Result<Value, Error> {
        Seed::validate_task(&new)?;
        let now = Utc::now();
        let user = self.acting_user;
        let (old, changed) = Seed::task_diff(self.db.task(id)?, &new);
        let task = self.db.task_mut(id)?;
        Seed::apply_task(task, new, now);
        let task = task.clone();
        if !changed.is_empty() {
            self.db.log(id, user, now, Some(old), changed);
        }
        to_json(task)
    }

    fn delete_task(&mut self, id: TaskId) -> Result<Value, Error> {
        let task = self.db.task(id)?.clone();
        if self.db.tasks.iter().any(|t| t.parent_task_id == Some(id)) {
            return Err(Error::Conflict(String::from(
                "Task still has subtasks",
            )));
        }
        self.db.tasks.retain(|t| t.id != id);
        if let Some(parent) = task.parent_task_id {
            if let Ok(p) = self.db.task_mut(parent) {
                p.child_count = p.child_count.saturating_sub(1);
            }
        }
        self.db.comments.retain(|c| c.task_id != Some(id));
        self.db.assignments.retain(|a| a.task_id != id);
        self.db.task_labels.retain(|tl| tl.task_id != id);
        self.db.subtasks.remove(&id);
        Ok(Value::Null)
    }

    fn add_subtask(&mut self, task: TaskId, new: NewSubtask) -> Result<Value, Error> {
        self.db.task(task)?;
        if new.title.trim().is_empty() {
            return Err(Error::Validation(String::from("Title is required")));
        }
        let now = Utc::now();
        let sub = Subtask {
            id: SubtaskId(Uuid::new_v4()),
            title: new.title,
            completed: false,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.db.subtasks.entry(task).or_default().push(sub.clone());
        to_json(sub)
    }

    fn update_subtask(
        &mut self,
        task: TaskId,
        id: SubtaskId,
        upd: SubtaskUpdate,
    ) -> Result<Value, Error> {
        let sub = self
            .db
            .subtasks
            .get_mut(&task)
            .and_then(|subs| subs.iter_mut().find(|s| s.id == id))
            .ok_or_else(|| not_found("subtask", id))?;
        sub.completed = upd.completed;
        sub.updated_at = Some(Utc::now());
        to_json(sub.clone())
    }

    fn delete_subtask(&mut self, task: TaskId, id: SubtaskId) -> Result<Value, Error> {
        let subs = self
            .db
            .subtasks
            .get_mut(&task)
            .ok_or_else(|| not_found("subtask", id))?;
        let before = subs.len();
        subs.retain(|s| s.id != id);
        if subs.len() == before {
            return Err(not_found("subtask", id));
        }
        Ok(Value::Null)
    }

    fn filter_labels(&self, req: &Request, filter: CatalogFilter) -> Result<Value, Error> {
        let (page, size, sort_by, direction) = query_paging(req);
        let matching = self
            .db
            .labels
            .iter()
            .filter(|l| l.matches(&filter))
            .cloned()
            .collect::<Vec<_>>();
        let sorted = sort_by_field(matching, sort_by.as_deref().unwrap_or("id"), direction);
        let (data, pages, total) = paginate(sorted, page, size);
        Ok(json!({
            "success": true,
            "data": {
                "data": data,
                "totalPages": pages,
                "totalElements": total,
                "page": page,
                "limit": size,
            },
        }))
    }

    fn check_label_name(&self, name: &str, except: Option<LabelId>) -> Result<(), Error> {
        let taken = self
            .db
            .labels
            .iter()
            .any(|l| Some(l.id) != except && l.name.eq_ignore_ascii_case(name.trim()));
        if taken {
            return Err(Error::Conflict(format!("Label {name:?} already exists")));
        }
        Ok(())
    }

    fn create_label(&mut self, new: NewLabel) -> Result<Value, Error> {
        Seed::validate_catalog(&new.name, &new.color)?;
        self.check_label_name(&new.name, None)?;
        let label = Label {
            id: LabelId(Uuid::new_v4()),
            name: new.name,
            color: new.color,
            description: new.description,
            created_at: Some(Utc::now()),
        };
        self.db.labels.push(label.clone());
        Ok(json!({"success": true, "data": label}))
    }

    fn update_label(&mut self, id: LabelId, new: NewLabel) -> Result<Value, Error> {
        Seed::validate_catalog(&new.name, &new.color)?;
        self.check_label_name(&new.name, Some(id))?;
        let label = self
            .db
            .labels
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| not_found("label", id))?;
        label.name = new.name;
        label.color = new.color;
        label.description = new.description;
        let label = label.clone();
        for t in self.db.tasks.iter_mut() {
            for l in t.labels.iter_mut().filter(|l| l.id == id) {
                *l = label.clone();
            }
        }
        Ok(json!({"success": true, "data": label}))
    }

    fn delete_label(&mut self, id: LabelId) -> Result<Value, Error> {
        self.db.label(id)?;
        self.db.labels.retain(|l| l.id != id);
        self.db.task_labels.retain(|tl| tl.label_id != id);
        for t in self.db.tasks.iter_mut() {
            t.labels.retain(|l| l.id != id);
        }
        Ok(json!({"success": true}))
    }

    fn filter_priorities(&self, req: &Request, filter: CatalogFilter) -> Result<Value, Error> {
        let (page, size, sort_by, direction) = query_paging(req);
        let matching = self
            .db
            .priorities
            .iter()
            .filter(|p| p.matches(&filter))
            .cloned()
            .collect::<Vec<_>>();
        let sorted = sort_by_field(matching, sort_by.as_deref().unwrap_or("id"), direction);
        let (content, pages, total) = paginate(sorted, page, size);
        Ok(json!({
            "content": content,
            "number": page,
            "size": size,
            "totalPages": pages,
            "totalElements": total,
        }))
    }

    fn get_priority(&self, id: PriorityId) -> Result<Value, Error> {
        let p = self
            .db
            .priorities
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("priority", id))?;
        Ok(json!({"success": true, "data": p}))
    }

    fn create_priority(&mut self, new: NewPriority) -> Result<Value, Error> {
        Seed::validate_catalog(&new.name, &new.color)?;
        let p = Priority {
            id: PriorityId(Uuid::new_v4()),
            name: new.name,
            color: new.color,
            description: new.description,
            sort_order: new.sort_order,
            created_at: Some(Utc::now()),
        };
        self.db.priorities.push(p.clone());
        to_json(p)
    }

    fn update_priority(&mut self, id: PriorityId, new: NewPriority) -> Result<Value, Error> {
        Seed::validate_catalog(&new.name, &new.color)?;
        let p = self
            .db
            .priorities
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("priority", id))?;
        p.name = new.name;
        p.color = new.color;
        p.description = new.description;
        p.sort_order = new.sort_order;
        to_json(p.clone())
    }

    fn delete_priority(&mut self, id: PriorityId) -> Result<Value, Error> {
        if self
            .db
            .tasks
            .iter()
            .any(|t| t.task_priority_id == Some(id))
        {
            return Err(Error::Conflict(String::from(
                "Priority is still used by some tasks",
            )));
        }
        let before = self.db.priorities.len();
        self.db.priorities.retain(|p| p.id != id);
        if before == self.db.priorities.len() {
            return Err(not_found("priority", id));
        }
        Ok(Value::Null)
    }

    fn filter_stages(&self, req: &Request, filter: StageFilter) -> Result<Value, Error> {
        let items = self
            .db
            .stages
            .iter()
            .filter(|s| filter.project_id.map_or(true, |p| s.project_id == Some(p)))
            .cloned()
            .collect::<Vec<_>>();
        self.flat_page(req, items)
    }

    fn create_stage(&mut self, new: NewStage) -> Result<Value, Error> {
        Seed::validate_catalog(&new.name, &new.color)?;
        let stage = Stage {
            id: StageId(Uuid::new_v4()),
            name: new.name,
            color: Some(new.color),
            sort_order: new.sort_order,
            project_id: Some(new.project_id),
        };
        self.db.stages.push(stage.clone());
        to_json(stage)
    }

    fn update_stage(&mut self, id: StageId, new: NewStage) -> Result<Value, Error> {
        Seed::validate_catalog(&new.name, &new.color)?;
        let stage = self
            .db
            .stages
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("stage", id))?;
        stage.name = new.name;
        stage.color = Some(new.color);
        stage.sort_order = new.sort_order;
        stage.project_id = Some(new.project_id);
        to_json(stage.clone())
    }

    fn delete_stage(&mut self, id: StageId) -> Result<Value, Error> {
        let before = self.db.stages.len();
        self.db.stages.retain(|s| s.id != id);
        if before == self.db.stages.len() {
            return Err(not_found("stage", id));
        }
        for t in self.db.tasks.iter_mut() {
            if t.task_stage_id == Some(id) {
                t.task_stage_id = None;
            }
        }
        Ok(Value::Null)
    }

    fn comments_by_task(&self, req: &Request, task: TaskId) -> Result<Value, Error> {
        self.db.task(task)?;
        let page = query_num(req, "page", 0);
        let size = query_num(req, "size", 5);
        let roots = self
            .db
            .comments_under(task, None)
            .into_iter()
            .map(|c| self.db.expand(c))
            .collect::<Vec<_>>();
        let (data, pages, total) = paginate(roots, page, size);
        Ok(json!({
            "success": true,
            "data": {
                "data": data,
                "page": page,
                "limit": size,
                "totalPages": pages,
                "totalElements": total,
            },
        }))
    }

    fn comment_children(&self, req: &Request, id: CommentId) -> Result<Value, Error> {
        let parent = self.db.comment(id)?;
        let task = parent.task_id.unwrap_or_else(TaskId::stub);
        let page = query_num(req, "page", 0);
        let size = query_num(req, "size", 2);
        let kids = self
            .db
            .comments_under(task, Some(id))
            .into_iter()
            .map(|c| self.db.expand(c))
            .collect::<Vec<_>>();
        let (data, _, total) = paginate(kids, page, size);
        Ok(json!({
            "success": true,
            "data": data,
            "hasMoreChildren": (page + 1) * size.max(1) < total,
        }))
    }

    fn filter_comments(&self, req: &Request, scope: TaskScope) -> Result<Value, Error> {
        let items = self
            .db
            .comments
            .iter()
            .filter(|c| scope.task_id.map_or(true, |t| c.task_id == Some(t)))
            .map(|c| self.db.expand(c))
            .collect::<Vec<_>>();
        self.flat_page(req, items)
    }

    fn create_comment(&mut self, new: NewComment) -> Result<Value, Error> {
        self.db.task(new.task_id)?;
        if new.content.trim().is_empty() {
            return Err(Error::Validation(String::from("Comment must not be empty")));
        }
        if let Some(parent) = new.parent_id {
            if self.db.comment_depth(parent)? + 1 > MAX_COMMENT_DEPTH {
                return Err(Error::MaxDepthExceeded(format!(
                    "Maximum comment depth of {} reached",
                    MAX_COMMENT_DEPTH + 1
                )));
            }
        }
        let now = Utc::now();
        let author = new.user_id.unwrap_or(self.acting_user);
        let user_name = taskdesk_client::api::User::directory()
            .into_iter()
            .find(|u| u.id == author)
            .map(|u| u.name);
        let c = Comment {
            id: CommentId(Uuid::new_v4()),
            parent_id: new.parent_id,
            task_id: Some(new.task_id),
            content: new.content,
            user_id: Some(author),
            user_name,
            created_at: Some(now),
            updated_at: Some(now),
            ..Comment::stub()
        };
        self.db.comments.push(c.clone());
        Ok(json!({"success": true, "data": c}))
    }

    fn update_comment(&mut self, id: CommentId, edit: CommentEdit) -> Result<Value, Error> {
        if edit.content.trim().is_empty() {
            return Err(Error::Validation(String::from("Comment must not be empty")));
        }
        let c = self
            .db
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("comment", id))?;
        c.content = edit.content;
        if let Some(p) = edit.is_pinned {
            c.is_pinned = p;
        }
        c.updated_at = Some(Utc::now());
        let c = c.clone();
        Ok(json!({"success": true, "data": self.db.expand(&c)}))
    }

    fn delete_comment(&mut self, id: CommentId) -> Result<Value, Error> {
        self.db.comment(id)?;
        let removed = self.db.remove_comment(id);
        tracing::debug!(%id, removed, "deleted comment thread");
        Ok(json!({"success": true}))
    }

    fn assign(&mut self, task: TaskId, users: Vec<UserId>) -> Result<Value, Error> {
        let now = Utc::now();
        let actor = self.acting_user;
        let t = self.db.task_mut(task)?;
        let added = users
            .into_iter()
            .filter(|u| !t.assigned_users.contains(u))
            .collect::<Vec<_>>();
        t.assigned_users.extend(added.iter().copied());
        for u in added.iter() {
            self.db.assignments.push(TaskAssign {
                id: TaskAssignId(Uuid::new_v4()),
                task_id: task,
                user_id: *u,
            });
        }
        if !added.is_empty() {
            let new = [(String::from("assignedUsers"), json!(added))];
            self.db.log(task, actor, now, None, new.into_iter().collect());
        }
        Ok(json!({"success": true}))
    }

    fn unassign(&mut self, task: TaskId, user: UserId) -> Result<Value, Error> {
        let now = Utc::now();
        let actor = self.acting_user;
        let t = self.db.task_mut(task)?;
        if !t.assigned_users.contains(&user) {
            return Err(not_found("assignment of user", user));
        }
        t.assigned_users.retain(|u| *u != user);
        self.db
            .assignments
            .retain(|a| !(a.task_id == task && a.user_id == user));
        let old = [(String::from("assign"), json!(user))];
        self.db.log(
            task,
            actor,
            now,
            Some(old.into_iter().collect()),
            Default::default(),
        );
        Ok(Value::Null)
    }

    fn attach_labels(&mut self, task: TaskId, labels: Vec<LabelId>) -> Result<Value, Error> {
        let now = Utc::now();
        let actor = self.acting_user;
        let labels = labels
            .into_iter()
            .map(|l| self.db.label(l).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        let t = self.db.task_mut(task)?;
        let added = labels
            .into_iter()
            .filter(|l| !t.labels.iter().any(|tl| tl.id == l.id))
            .collect::<Vec<_>>();
        t.labels.extend(added.iter().cloned());
        for l in added.iter() {
            self.db.task_labels.push(TaskLabel {
                id: TaskLabelId(Uuid::new_v4()),
                task_id: task,
                label_id: l.id,
            });
            let new = [(String::from("label"), json!(l.id))];
            self.db.log(task, actor, now, None, new.into_iter().collect());
        }
        Ok(json!({"success": true}))
    }

    fn detach_label(&mut self, task: TaskId, label: LabelId) -> Result<Value, Error> {
        let now = Utc::now();
        let actor = self.acting_user;
        let t = self.db.task_mut(task)?;
        if !t.labels.iter().any(|l| l.id == label) {
            return Err(not_found("label of task", label));
        }
        t.labels.retain(|l| l.id != label);
        self.db
            .task_labels
            .retain(|tl| !(tl.task_id == task && tl.label_id == label));
        let old = [(String::from("label"), json!(label))];
        self.db.log(
            task,
            actor,
            now,
            Some(old.into_iter().collect()),
            Default::default(),
        );
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(server: &MockServer, title: &str) -> Task {
        let req = Request::post("task")
            .json(&NewTask {
                title: String::from(title),
                ..NewTask::default()
            })
            .unwrap();
        let v = server.handle(req).unwrap();
        serde_json::from_value(v["data"].clone()).unwrap()
    }

    #[test]
    fn errors_cross_the_wire_encoding() {
        let s = MockServer::new();
        let req = Request::post("task").json(&NewTask::default()).unwrap();
        let err = futures::executor::block_on(s.send(req)).unwrap_err();
        assert_eq!(err, Error::Validation(String::from("Title is required")));

        s.set_offline(true);
        let err = futures::executor::block_on(s.send(Request::get("task"))).unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn comment_depth_is_enforced() {
        let s = MockServer::new();
        let t = task(&s, "t");
        let mut parent = None;
        for depth in 0..=MAX_COMMENT_DEPTH {
            let new = NewComment {
                task_id: t.id,
                content: format!("depth {depth}"),
                parent_id: parent,
                user_id: None,
            };
            let v = s.handle(Request::post("task-comment").json(&new).unwrap()).unwrap();
            parent = Some(parse_id(v["data"]["id"].as_str().unwrap()).unwrap());
        }
        let new = NewComment {
            task_id: t.id,
            content: String::from("too deep"),
            parent_id: parent,
            user_id: None,
        };
        let err = s.handle(Request::post("task-comment").json(&new).unwrap()).unwrap_err();
        assert!(matches!(err, Error::MaxDepthExceeded(_)));
    }

    #[test]
    fn writes_to_read_only_resources_are_denied() {
        let s = MockServer::new();
        s.set_read_only("task-stage");
        let new = NewStage {
            name: String::from("Review"),
            color: String::from("#60a5fa"),
            project_id: Uuid::new_v4(),
            sort_order: 1,
        };
        let err = s.handle(Request::post("task-stage").json(&new).unwrap()).unwrap_err();
        assert_eq!(err, Error::PermissionDenied);
        assert!(s.handle(Request::get("task-stage")).is_ok());
    }

    #[test]
    fn task_updates_are_logged() {
        let s = MockServer::new();
        let t = task(&s, "first");
        let upd = NewTask {
            title: String::from("second"),
            ..NewTask::from(&t)
        };
        s.handle(Request::put(format!("task/{}", t.id)).json(&upd).unwrap())
            .unwrap();
        let logs = s.snapshot().activity;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].new_value.get("task"), Some(&json!("first")));
        let old = logs[1].old_value.as_ref().unwrap();
        assert_eq!(old.get("title"), Some(&json!("first")));
        assert_eq!(logs[1].new_value.get("title"), Some(&json!("second")));
    }
}
