use crate::{
    api::{Error, NewSubtask, Subtask, SubtaskId, TaskId},
    Client, Transport,
};

/// Subtasks of one task, changed only once the server accepted the change
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubtaskList {
    task: TaskId,
    items: Vec<Subtask>,
}

impl SubtaskList {
    pub fn new(task: TaskId, items: Vec<Subtask>) -> SubtaskList {
        SubtaskList { task, items }
    }

    pub async fn load<T: Transport>(client: &Client<T>, task: TaskId) -> Result<SubtaskList, Error> {
        Ok(SubtaskList::new(task, client.subtasks(task).await?))
    }

    pub fn items(&self) -> &[Subtask] {
        &self.items
    }

    pub fn completed(&self) -> usize {
        self.items.iter().filter(|s| s.completed).count()
    }

    pub async fn add<T: Transport>(&mut self, client: &Client<T>, title: &str) -> Result<(), Error> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation(String::from("Subtask title is required")));
        }
        let new = NewSubtask {
            title: title.to_string(),
        };
        let created = client.add_subtask(self.task, &new).await?;
        self.items.push(created);
        Ok(())
    }

    pub async fn set_completed<T: Transport>(
        &mut self,
        client: &Client<T>,
        id: SubtaskId,
        completed: bool,
    ) -> Result<(), Error> {
        client.set_subtask_completed(self.task, id, completed).await?;
        if let Some(s) = self.items.iter_mut().find(|s| s.id == id) {
            s.completed = completed;
        }
        Ok(())
    }

    pub async fn delete<T: Transport>(&mut self, client: &Client<T>, id: SubtaskId) -> Result<(), Error> {
        client.delete_subtask(self.task, id).await?;
        self.items.retain(|s| s.id != id);
        Ok(())
    }
}
