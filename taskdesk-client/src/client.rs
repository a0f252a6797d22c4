use serde::de::DeserializeOwned;

use crate::{
    api::{
        decode_list, decode_single, ActivityLog, Comment, CommentId, Error, Label, LabelId,
        ListQuery, NewSubtask, Page, Paging, Resource, Stage, Subtask, SubtaskId, SubtaskUpdate,
        TaskId, UserId, Uuid,
    },
    Request, Transport,
};

/// Typed access to the REST collaborator
#[derive(Clone, Debug)]
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Client<T> {
        Client { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call(&self, req: Request) -> Result<serde_json::Value, Error> {
        tracing::debug!(method = %req.method, path = %req.path, "sending request");
        let method = req.method;
        let path = req.path.clone();
        self.transport.send(req).await.map_err(|err| {
            tracing::warn!(?err, %method, %path, "request failed");
            err
        })
    }

    async fn call_single<R: DeserializeOwned>(&self, req: Request) -> Result<R, Error> {
        decode_single(self.call(req).await?)
    }

    async fn call_list<R: DeserializeOwned>(&self, req: Request) -> Result<Page<R>, Error> {
        decode_list(self.call(req).await?)
    }

    /// `POST /{res}/filter`, with paging where the resource expects it
    pub async fn filter<R: Resource>(
        &self,
        filter: &R::Filter,
        query: &ListQuery,
    ) -> Result<Page<R>, Error> {
        let path = format!("{}/filter", R::PATH);
        let req = match R::PAGING {
            Paging::Query => Request::post(path).query(query.query_pairs()).json(filter)?,
            Paging::Body => {
                let mut body = match serde_json::to_value(filter) {
                    Ok(serde_json::Value::Object(map)) => map,
                    Ok(other) => {
                        return Err(Error::Validation(format!(
                            "filter of {} is not an object: {other}",
                            R::PATH
                        )))
                    }
                    Err(e) => return Err(Error::Validation(format!("serializing filter: {e}"))),
                };
                query.merge_into(&mut body);
                Request::post(path).json(&body)?
            }
        };
        let mut page = self.call_list::<R>(req).await?;
        if page.limit.is_none() {
            page.limit = Some(query.size);
        }
        Ok(page)
    }

    /// `GET /{res}`, the unpaginated lookup list
    pub async fn all<R: Resource>(&self) -> Result<Vec<R>, Error> {
        Ok(self.call_list::<R>(Request::get(R::PATH)).await?.items)
    }

    pub async fn get<R: Resource>(&self, id: R::Id) -> Result<R, Error> {
        self.call_single(Request::get(format!("{}/{}", R::PATH, id)))
            .await
    }

    pub async fn create<R: Resource>(&self, new: &R::New) -> Result<R, Error> {
        self.call_single(Request::post(R::PATH).json(new)?).await
    }

    pub async fn update<R: Resource>(&self, id: R::Id, update: &R::Update) -> Result<R, Error> {
        self.call_single(Request::put(format!("{}/{}", R::PATH, id)).json(update)?)
            .await
    }

    pub async fn delete<R: Resource>(&self, id: R::Id) -> Result<(), Error> {
        self.call(Request::delete(format!("{}/{}", R::PATH, id)))
            .await
            .map(|_| ())
    }

    pub async fn stages_by_project(&self, project: Uuid) -> Result<Vec<Stage>, Error> {
        let req = Request::get(format!("{}/by-project/{}", Stage::PATH, project));
        let mut stages = self.call_list::<Stage>(req).await?.items;
        Stage::sort(&mut stages);
        Ok(stages)
    }

    /// Top-level comments of a task, each with the first page of its replies embedded
    pub async fn comments_by_task(
        &self,
        task: TaskId,
        page: usize,
        size: usize,
    ) -> Result<Page<Comment>, Error> {
        let req = Request::get(format!("{}/by-task/{}", Comment::PATH, task))
            .param("page", page)
            .param("size", size);
        let mut res = self.call_list::<Comment>(req).await?;
        res.page = page;
        Ok(res)
    }

    pub async fn comment_children(
        &self,
        comment: CommentId,
        page: usize,
        size: usize,
    ) -> Result<Page<Comment>, Error> {
        let req = Request::get(format!("{}/{}/children", Comment::PATH, comment))
            .param("page", page)
            .param("size", size);
        let mut res = self.call_list::<Comment>(req).await?;
        res.page = page;
        Ok(res)
    }

    pub async fn activity(&self, task: TaskId) -> Result<Vec<ActivityLog>, Error> {
        let req = Request::get(format!("{}/by-task/{}", ActivityLog::PATH, task));
        Ok(self.call_list::<ActivityLog>(req).await?.items)
    }

    /// Users assigned to `task`
    pub async fn assignees(&self, task: TaskId) -> Result<Vec<UserId>, Error> {
        let req = Request::get("task-assign").param("idTask", task);
        Ok(self.call_list::<UserId>(req).await?.items)
    }

    pub async fn assign(&self, task: TaskId, users: &[UserId]) -> Result<(), Error> {
        let req = Request::post("task-assign").param("taskId", task).json(&users)?;
        self.call(req).await.map(|_| ())
    }

    pub async fn unassign(&self, task: TaskId, user: UserId) -> Result<(), Error> {
        let req = Request::delete("task-assign")
            .param("taskId", task)
            .param("userId", user);
        self.call(req).await.map(|_| ())
    }

    /// Labels attached to `task`
    pub async fn task_labels(&self, task: TaskId) -> Result<Vec<Label>, Error> {
        let req = Request::get("task-label").param("idTask", task);
        Ok(self.call_list::<Label>(req).await?.items)
    }

    pub async fn attach_labels(&self, task: TaskId, labels: &[LabelId]) -> Result<(), Error> {
        let req = Request::post("task-label").param("taskId", task).json(&labels)?;
        self.call(req).await.map(|_| ())
    }

    pub async fn detach_label(&self, task: TaskId, label: LabelId) -> Result<(), Error> {
        let req = Request::delete("task-label")
            .param("taskId", task)
            .param("labelId", label);
        self.call(req).await.map(|_| ())
    }

    pub async fn subtasks(&self, task: TaskId) -> Result<Vec<Subtask>, Error> {
        let req = Request::get(format!("task/{task}/subtasks"));
        Ok(self.call_list::<Subtask>(req).await?.items)
    }

    pub async fn add_subtask(&self, task: TaskId, new: &NewSubtask) -> Result<Subtask, Error> {
        self.call_single(Request::post(format!("task/{task}/subtasks")).json(new)?)
            .await
    }

    pub async fn set_subtask_completed(
        &self,
        task: TaskId,
        subtask: SubtaskId,
        completed: bool,
    ) -> Result<(), Error> {
        let req = Request::patch(format!("task/{task}/subtasks/{subtask}"))
            .json(&SubtaskUpdate { completed })?;
        self.call(req).await.map(|_| ())
    }

    pub async fn delete_subtask(&self, task: TaskId, subtask: SubtaskId) -> Result<(), Error> {
        self.call(Request::delete(format!("task/{task}/subtasks/{subtask}")))
            .await
            .map(|_| ())
    }
}
