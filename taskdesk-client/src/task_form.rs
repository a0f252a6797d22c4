use chrono::{NaiveDate, TimeZone, Utc};

use crate::{
    api::{non_empty, Error, NewTask, Task, Time, Uuid},
    Client, Transport,
};

/// Editable fields of a task, kept as the text the inputs hold
///
/// Dates are `YYYY-MM-DD`, ids and progress are their display form, and an
/// empty string means "unset".
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub stage: String,
    pub priority: String,
    pub start_date: String,
    pub deadline: String,
    pub progress: String,
    pub is_public: bool,
}

impl Default for TaskForm {
    fn default() -> TaskForm {
        TaskForm {
            title: String::new(),
            description: String::new(),
            stage: String::new(),
            priority: String::new(),
            start_date: String::new(),
            deadline: String::new(),
            progress: String::new(),
            is_public: true,
        }
    }
}

fn invalid(what: &str) -> Error {
    Error::Validation(format!("Invalid {what}"))
}

fn parse_id<I: std::str::FromStr>(raw: &str, what: &str) -> Result<Option<I>, Error> {
    match non_empty(raw) {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| invalid(what)),
    }
}

/// Date of an input, keeping the time of day of `before` when the day did not change
fn parse_date(raw: &str, before: Option<Time>, what: &str) -> Result<Option<Time>, Error> {
    let Some(s) = non_empty(raw) else {
        return Ok(None);
    };
    let day = NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| invalid(what))?;
    if let Some(t) = before.filter(|t| t.date_naive() == day) {
        return Ok(Some(t));
    }
    let midnight = day.and_hms_opt(0, 0, 0).ok_or_else(|| invalid(what))?;
    Ok(Some(Utc.from_utc_datetime(&midnight)))
}

fn show_date(t: Option<Time>) -> String {
    t.map(|t| t.date_naive().to_string()).unwrap_or_default()
}

impl TaskForm {
    pub fn from_task(t: &Task) -> TaskForm {
        TaskForm {
            title: t.title.clone(),
            description: t.description.clone(),
            stage: t.task_stage_id.map(|s| s.to_string()).unwrap_or_default(),
            priority: t.task_priority_id.map(|p| p.to_string()).unwrap_or_default(),
            start_date: show_date(t.start_date),
            deadline: show_date(t.deadline),
            progress: t.progress_percent.map(|p| p.to_string()).unwrap_or_default(),
            is_public: t.is_public.unwrap_or(true),
        }
    }

    /// Writes the form over `new`, leaving it untouched if any field is invalid
    pub fn apply(&self, new: &mut NewTask) -> Result<(), Error> {
        let title = non_empty(&self.title)
            .ok_or_else(|| Error::Validation(String::from("Title is required")))?;
        let stage = parse_id(&self.stage, "stage")?;
        let priority = parse_id(&self.priority, "priority")?;
        let start = parse_date(&self.start_date, new.start_date, "start date")?;
        let deadline = parse_date(&self.deadline, new.deadline, "deadline")?;
        if let (Some(s), Some(d)) = (start, deadline) {
            if d.date_naive() < s.date_naive() {
                return Err(Error::Validation(String::from(
                    "Deadline must not be before the start date",
                )));
            }
        }
        let progress = match non_empty(&self.progress) {
            None => None,
            Some(p) => match p.parse::<u8>() {
                Ok(p) if p <= 100 => Some(p),
                _ => {
                    return Err(Error::Validation(String::from(
                        "Progress must be between 0 and 100",
                    )))
                }
            },
        };

        new.title = title;
        new.description = self.description.trim().to_string();
        new.task_stage_id = stage;
        new.task_priority_id = priority;
        new.start_date = start;
        new.deadline = deadline;
        new.progress_percent = progress;
        new.is_public = Some(self.is_public);
        Ok(())
    }

    /// `POST /task`, a stage being required for new tasks
    pub async fn create<T: Transport>(
        &self,
        client: &Client<T>,
        project: Uuid,
    ) -> Result<Task, Error> {
        if non_empty(&self.stage).is_none() {
            return Err(Error::Validation(String::from("Stage is required")));
        }
        let mut new = NewTask {
            project_id: Some(project),
            ..NewTask::default()
        };
        self.apply(&mut new)?;
        let task = client.create::<Task>(&new).await?;
        tracing::debug!(id = %task.id, "created task");
        Ok(task)
    }

    /// `PUT /task/{id}` with the form written over the current version of `task`
    pub async fn save<T: Transport>(&self, client: &Client<T>, task: &Task) -> Result<Task, Error> {
        let mut new = NewTask::from(task);
        self.apply(&mut new)?;
        client.update::<Task>(task.id, &new).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{StageId, TaskId};

    fn task() -> Task {
        Task {
            id: TaskId(Uuid::from_u128(1)),
            title: String::from("Write report"),
            task_stage_id: Some(StageId(Uuid::from_u128(2))),
            start_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
            progress_percent: Some(40),
            ..Task::stub()
        }
    }

    #[test]
    fn unchanged_form_keeps_the_task() {
        let t = task();
        let mut new = NewTask::from(&t);
        TaskForm::from_task(&t).apply(&mut new).unwrap();
        assert_eq!(new, NewTask::from(&t));
    }

    #[test]
    fn dates_change_by_day() {
        let t = task();
        let mut form = TaskForm::from_task(&t);
        assert_eq!(form.start_date, "2024-03-01");
        form.start_date = String::from("2024-03-04");
        form.deadline = String::from("2024-03-10");
        let mut new = NewTask::from(&t);
        form.apply(&mut new).unwrap();
        assert_eq!(new.start_date, Some(Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()));
        assert_eq!(new.deadline, Some(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()));
    }

    #[test]
    fn invalid_fields_are_rejected() {
        let t = task();
        let cases: [(fn(&mut TaskForm), &str); 5] = [
            (|f| f.title = String::from("  "), "Title is required"),
            (|f| f.stage = String::from("doing"), "Invalid stage"),
            (|f| f.deadline = String::from("2024-02-28"), "Deadline must not be before the start date"),
            (|f| f.progress = String::from("101"), "Progress must be between 0 and 100"),
            (|f| f.start_date = String::from("03/01/2024"), "Invalid start date"),
        ];
        for (edit, message) in cases {
            let mut form = TaskForm::from_task(&t);
            edit(&mut form);
            let mut new = NewTask::from(&t);
            assert_eq!(form.apply(&mut new), Err(Error::Validation(String::from(message))));
            assert_eq!(new, NewTask::from(&t));
        }
    }
}
