use chrono::{TimeZone, Utc};
use taskdesk_client::{
    api::{Error, NewTask, Task, TaskId, User, UserId, Uuid, DEFAULT_PROJECT_ID},
    describe, ActivityEntry, Lookups, SubtaskList, TaskForm,
};

use crate::fixture::{self, at, label, priority, stage, task};

fn alice() -> UserId {
    UserId(Uuid::from_u128(1))
}

async fn timeline<T: taskdesk_client::Transport>(
    client: &taskdesk_client::Client<T>,
    lookups: &Lookups,
    id: TaskId,
) -> Vec<ActivityEntry> {
    client
        .activity(id)
        .await
        .unwrap()
        .iter()
        .filter_map(|log| describe(log, lookups))
        .collect()
}

#[tokio::test]
async fn stage_change_is_logged_by_name() {
    let client = fixture::client();
    let lookups = Lookups::load(&client, DEFAULT_PROJECT_ID).await.unwrap();
    let t = client.get::<Task>(task(0)).await.unwrap();
    let mut update = NewTask::from(&t);
    update.task_stage_id = Some(stage(1));
    let updated = client.update::<Task>(t.id, &update).await.unwrap();
    assert_eq!(updated.task_stage_id, Some(stage(1)));

    let entries = timeline(&client, &lookups, task(0)).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].headline, "Updated task");
    assert_eq!(entries[0].author, "Alice");
    assert_eq!(
        entries[0].details,
        ["\"task stage\" changed from \"To Do\" to \"Doing\""]
    );

    // Saving the same task again changes nothing and logs nothing
    client.update::<Task>(t.id, &update).await.unwrap();
    assert_eq!(timeline(&client, &lookups, task(0)).await.len(), 1);
}

#[tokio::test]
async fn assignments_show_who() {
    let client = fixture::client();
    let lookups = Lookups::load(&client, DEFAULT_PROJECT_ID).await.unwrap();
    client.assign(task(0), &[alice()]).await.unwrap();
    assert_eq!(client.assignees(task(0)).await.unwrap(), [alice()]);

    // Assigning twice does not duplicate
    client.assign(task(0), &[alice()]).await.unwrap();
    assert_eq!(client.assignees(task(0)).await.unwrap(), [alice()]);

    let entries = timeline(&client, &lookups, task(0)).await;
    assert!(
        entries
            .iter()
            .any(|e| e.details == ["Assigned \"Alice\""]),
        "got {entries:?}"
    );

    client.unassign(task(0), alice()).await.unwrap();
    assert!(client.assignees(task(0)).await.unwrap().is_empty());
    let err = client.unassign(task(0), alice()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "got {err:?}");
    assert_eq!(User::directory()[0].id, alice());
}

#[tokio::test]
async fn labels_attach_and_detach() {
    let client = fixture::client();
    client.attach_labels(task(0), &[label(0), label(1)]).await.unwrap();
    let names = client
        .task_labels(task(0))
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect::<Vec<_>>();
    assert_eq!(names, ["bug", "feature"]);

    client.detach_label(task(0), label(0)).await.unwrap();
    let left = client.task_labels(task(0)).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, label(1));
}

#[tokio::test]
async fn subtasks_follow_the_server() {
    let client = fixture::client();
    let mut list = SubtaskList::load(&client, task(1)).await.unwrap();
    assert!(list.items().is_empty());

    list.add(&client, "  write tests ").await.unwrap();
    list.add(&client, "ship").await.unwrap();
    assert_eq!(list.items()[0].title, "write tests");

    let first = list.items()[0].id;
    list.set_completed(&client, first, true).await.unwrap();
    assert_eq!(list.completed(), 1);
    let reloaded = SubtaskList::load(&client, task(1)).await.unwrap();
    assert_eq!(reloaded.completed(), 1);
    assert!(reloaded.items()[0].completed);

    list.delete(&client, first).await.unwrap();
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.completed(), 0);

    let sent = client.transport().requests().len();
    let err = list.add(&client, "   ").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");
    assert_eq!(client.transport().requests().len(), sent);
}

#[tokio::test]
async fn failed_subtask_changes_keep_the_list() {
    let client = fixture::client();
    let mut list = SubtaskList::load(&client, task(1)).await.unwrap();
    list.add(&client, "ship").await.unwrap();
    let before = list.clone();

    client.transport().set_offline(true);
    let id = list.items()[0].id;
    assert!(list.set_completed(&client, id, true).await.is_err());
    assert!(list.delete(&client, id).await.is_err());
    assert_eq!(list, before);
}

#[tokio::test]
async fn task_nesting_is_bounded() {
    let client = fixture::client();
    let child = |parent, title: &str| NewTask {
        title: String::from(title),
        project_id: Some(DEFAULT_PROJECT_ID),
        parent_task_id: Some(parent),
        ..NewTask::default()
    };
    let a = client.create::<Task>(&child(task(0), "child")).await.unwrap();
    let b = client.create::<Task>(&child(a.id, "grandchild")).await.unwrap();
    let err = client
        .create::<Task>(&child(b.id, "too deep"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MaxDepthExceeded(_)), "got {err:?}");

    let err = client.delete::<Task>(a.id).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "got {err:?}");
    client.delete::<Task>(b.id).await.unwrap();
    client.delete::<Task>(a.id).await.unwrap();
    assert_eq!(client.get::<Task>(task(0)).await.unwrap().child_count, 0);
}

#[tokio::test]
async fn invalid_tasks_are_rejected() {
    let client = fixture::client();
    let t = client.get::<Task>(task(2)).await.unwrap();
    let mut update = NewTask::from(&t);
    update.deadline = t.start_date.map(|s| s - chrono::Duration::days(1));
    let err = client.update::<Task>(t.id, &update).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");
    assert_eq!(client.get::<Task>(task(2)).await.unwrap(), t);
}

#[tokio::test]
async fn new_tasks_come_from_the_form() {
    let client = fixture::client();
    let lookups = Lookups::load(&client, DEFAULT_PROJECT_ID).await.unwrap();
    let form = TaskForm {
        title: String::from("  Plan the sprint "),
        description: String::from("Pick the stories"),
        stage: stage(1).to_string(),
        priority: priority(1).to_string(),
        start_date: String::from("2024-04-01"),
        deadline: String::from("2024-04-05"),
        is_public: false,
        ..TaskForm::default()
    };
    let created = form.create(&client, DEFAULT_PROJECT_ID).await.unwrap();

    let t = client.get::<Task>(created.id).await.unwrap();
    assert_eq!(t.title, "Plan the sprint");
    assert_eq!(t.description, "Pick the stories");
    assert_eq!(t.project_id, Some(DEFAULT_PROJECT_ID));
    assert_eq!(t.task_stage_id, Some(stage(1)));
    assert_eq!(t.task_priority_id, Some(priority(1)));
    assert_eq!(t.start_date, Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()));
    assert_eq!(t.deadline, Some(Utc.with_ymd_and_hms(2024, 4, 5, 0, 0, 0).unwrap()));
    assert_eq!(t.is_public, Some(false));
    assert_eq!(t.parent_task_id, None);

    let entries = timeline(&client, &lookups, created.id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].headline, "Created task");
}

#[tokio::test]
async fn incomplete_new_tasks_stay_local() {
    let client = fixture::client();
    let sent = client.transport().requests().len();
    let complete = TaskForm {
        title: String::from("Plan the sprint"),
        stage: stage(0).to_string(),
        ..TaskForm::default()
    };

    let no_stage = TaskForm {
        stage: String::new(),
        ..complete.clone()
    };
    let err = no_stage.create(&client, DEFAULT_PROJECT_ID).await.unwrap_err();
    assert_eq!(err, Error::Validation(String::from("Stage is required")));

    let no_title = TaskForm {
        title: String::from("   "),
        ..complete.clone()
    };
    let err = no_title.create(&client, DEFAULT_PROJECT_ID).await.unwrap_err();
    assert_eq!(err, Error::Validation(String::from("Title is required")));

    let backwards = TaskForm {
        start_date: String::from("2024-04-05"),
        deadline: String::from("2024-04-01"),
        ..complete
    };
    let err = backwards.create(&client, DEFAULT_PROJECT_ID).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");

    assert_eq!(client.transport().requests().len(), sent);
}

#[tokio::test]
async fn details_editor_saves_the_whole_task() {
    let client = fixture::client();
    let lookups = Lookups::load(&client, DEFAULT_PROJECT_ID).await.unwrap();
    let before = client.get::<Task>(task(0)).await.unwrap();
    let mut form = TaskForm::from_task(&before);
    assert_eq!(form.start_date, "2024-03-01");
    assert_eq!(form.deadline, "2024-03-11");
    form.title = String::from("Renamed");
    form.description = String::from("More context");
    form.deadline = String::from("2024-03-20");
    form.progress = String::from("60");

    let after = form.save(&client, &before).await.unwrap();
    assert_eq!(after.title, "Renamed");
    assert_eq!(after.description, "More context");
    assert_eq!(after.progress_percent, Some(60));
    assert_eq!(after.deadline, Some(Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap()));
    // Untouched fields keep their exact values
    assert_eq!(after.start_date, Some(at(0)));
    assert_eq!(after.task_stage_id, before.task_stage_id);
    assert_eq!(after.task_priority_id, before.task_priority_id);
    assert_eq!(after.parent_task_id, before.parent_task_id);
    assert_eq!(after.is_public, before.is_public);

    let entries = timeline(&client, &lookups, task(0)).await;
    assert_eq!(entries.len(), 1);
    let details = &entries[0].details;
    assert_eq!(details.len(), 4, "got {details:?}");
    assert!(details.contains(&String::from(
        "\"title\" changed from \"task 00\" to \"Renamed\""
    )));
    assert!(details.contains(&String::from(
        "\"deadline\" changed from \"2024-03-11\" to \"2024-03-20\""
    )));
}

#[tokio::test]
async fn invalid_edits_are_not_sent() {
    let client = fixture::client();
    let before = client.get::<Task>(task(3)).await.unwrap();
    let sent = client.transport().requests().len();
    for (progress, deadline) in [("150", "2024-03-14"), ("50", "2024-03-01")] {
        let form = TaskForm {
            progress: String::from(progress),
            deadline: String::from(deadline),
            ..TaskForm::from_task(&before)
        };
        let err = form.save(&client, &before).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {err:?}");
    }
    assert_eq!(client.transport().requests().len(), sent);
    assert_eq!(client.get::<Task>(task(3)).await.unwrap(), before);
}
