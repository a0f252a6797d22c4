use taskdesk_client::{
    api::{
        CatalogFilter, Error, Label, NewLabel, NewStage, Priority, Sort, SortDirection, Stage,
        DEFAULT_PROJECT_ID,
    },
    ListDefaults, ListView, Lookups, Notice, ViewAction,
};

use crate::fixture::{self, priority, stage};

fn new_label(name: &str, color: &str) -> NewLabel {
    NewLabel {
        name: String::from(name),
        color: String::from(color),
        description: None,
    }
}

#[tokio::test]
async fn labels_filter_by_name() {
    let client = fixture::client();
    let v = ListView::<CatalogFilter>::new(ListDefaults::LABELS).with(ViewAction::SetFilter(
        CatalogFilter {
            name: Some(String::from("BU")),
            ..CatalogFilter::default()
        },
    ));
    let page = client.filter::<Label>(&v.filter, &v.query()).await.unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.items[0].name, "bug");
    assert_eq!(page.limit, Some(10));
}

#[tokio::test]
async fn priorities_sort_by_order() {
    let client = fixture::client();
    let v = ListView::<CatalogFilter>::new(ListDefaults::PRIORITIES)
        .with(ViewAction::SortBy(String::from("sortOrder")))
        .with(ViewAction::SortBy(String::from("sortOrder")));
    assert_eq!(v.sort, Sort::new("sortOrder", SortDirection::Desc));
    let page = client.filter::<Priority>(&v.filter, &v.query()).await.unwrap();
    let names = page.items.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["High", "Low"]);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.items[0].description.as_deref(), Some("Do it now"));
}

#[tokio::test]
async fn label_writes_are_checked() {
    let client = fixture::client();

    let err = client
        .create::<Label>(&new_label("Bug", "#000000"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "got {err:?}");

    let err = client
        .create::<Label>(&new_label("docs", "blue"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");

    let docs = client
        .create::<Label>(&new_label("docs", "#0ea5e9"))
        .await
        .unwrap();
    let renamed = client
        .update::<Label>(docs.id, &new_label("documentation", "#0ea5e9"))
        .await
        .unwrap();
    assert_eq!(renamed.id, docs.id);
    assert_eq!(client.all::<Label>().await.unwrap().len(), 3);

    client.delete::<Label>(docs.id).await.unwrap();
    let err = client.get::<Label>(docs.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn priorities_in_use_stay() {
    let client = fixture::client();
    let err = client.delete::<Priority>(priority(0)).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "got {err:?}");
    assert_eq!(client.all::<Priority>().await.unwrap().len(), 2);
}

#[tokio::test]
async fn lookups_resolve_names() {
    let client = fixture::client();
    let lookups = Lookups::load(&client, DEFAULT_PROJECT_ID).await.unwrap();
    let stages = lookups
        .stages
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(stages, ["Done", "Doing", "To Do"]);
    assert_eq!(lookups.next_stage_order(), 4);
    assert_eq!(lookups.stage_name(&stage(1).to_string()), Some("Doing"));
    assert_eq!(lookups.priority_name(&priority(1).to_string()), Some("High"));
    assert_eq!(lookups.stage_name(&priority(1).to_string()), None);
}

#[tokio::test]
async fn stage_additions_follow_the_last_one() {
    let client = fixture::client();
    let lookups = Lookups::load(&client, DEFAULT_PROJECT_ID).await.unwrap();
    let new = NewStage {
        name: String::from("Archived"),
        color: String::from("#9ca3af"),
        project_id: DEFAULT_PROJECT_ID,
        sort_order: lookups.next_stage_order(),
    };
    let created = client.create::<Stage>(&new).await.unwrap();
    assert_eq!(created.sort_order, 4);

    let reloaded = Lookups::load(&client, DEFAULT_PROJECT_ID).await.unwrap();
    assert_eq!(reloaded.stages.last().map(|s| s.id), Some(created.id));
    assert_eq!(reloaded.next_stage_order(), 5);
}

#[tokio::test]
async fn denied_stage_addition_says_so() {
    let client = fixture::client();
    client.transport().set_read_only("task-stage");
    let new = NewStage {
        name: String::from("Archived"),
        color: String::from("#9ca3af"),
        project_id: DEFAULT_PROJECT_ID,
        sort_order: 4,
    };
    let err = client.create::<Stage>(&new).await.unwrap_err();
    assert_eq!(err, Error::PermissionDenied);
    assert_eq!(
        Notice::failure("add this stage", &err).text,
        "You don't have permission to add this stage."
    );
}
