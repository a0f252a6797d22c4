use std::panic::AssertUnwindSafe;

use reqwest::Url;
use taskdesk_client::{
    api::{SortDirection, Task, TaskFilter},
    pagination::summary,
    ListDefaults, ListView, ViewAction,
};

use crate::fixture::{self, stage, NUM_TASKS};

fn view(url: &str) -> ListView<TaskFilter> {
    ListView::from_url(ListDefaults::TASKS, &Url::parse(url).unwrap())
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.title.as_str()).collect()
}

#[tokio::test]
async fn url_drives_the_request() {
    let client = fixture::client();
    let v = view("http://localhost/tasks?page=2&size=5&sortBy=title&direction=asc");
    assert_eq!(v.page, 1);
    let page = client.filter::<Task>(&v.filter, &v.query()).await.unwrap();
    assert_eq!(titles(&page.items), ["task 05", "task 06", "task 07", "task 08", "task 09"]);
    // The last task is private, and private tasks are hidden by default
    assert_eq!(page.total_elements, NUM_TASKS as usize - 1);
    assert_eq!(page.total_pages, 3);
    assert_eq!(summary(v.page, v.size, page.total_elements), "Showing 6 to 10 of 11 entries");
}

#[tokio::test]
async fn default_view_is_newest_first() {
    let client = fixture::client();
    let v = view("http://localhost/tasks");
    assert!(v.is_default());
    let page = client.filter::<Task>(&v.filter, &v.query()).await.unwrap();
    assert_eq!(titles(&page.items), ["task 10", "task 09", "task 08", "task 07", "task 06"]);
}

#[tokio::test]
async fn filters_from_the_url() {
    let client = fixture::client();

    let v = view(&format!("http://localhost/tasks?taskStageId={}&size=20", stage(1)));
    let page = client.filter::<Task>(&v.filter, &v.query()).await.unwrap();
    assert_eq!(titles(&page.items), ["task 10", "task 07", "task 04", "task 01"]);

    let v = view("http://localhost/tasks?isPublic=false");
    let page = client.filter::<Task>(&v.filter, &v.query()).await.unwrap();
    assert_eq!(titles(&page.items), ["task 11"]);

    let v = view("http://localhost/tasks?startDateFrom=2024-03-05&startDateTo=2024-03-07&sortBy=start_date&direction=ASC");
    let page = client.filter::<Task>(&v.filter, &v.query()).await.unwrap();
    assert_eq!(titles(&page.items), ["task 04", "task 05", "task 06"]);

    // Garbage falls back to defaults instead of failing the page
    let v = view("http://localhost/tasks?page=zero&size=-3&sortBy=secret&direction=sideways&taskStageId=nope");
    assert!(v.is_default());
}

#[tokio::test]
async fn view_changes_show_up_in_the_url() {
    let client = fixture::client();
    let mut url = Url::parse("http://localhost/tasks?tab=board").unwrap();
    let mut v = ListView::<TaskFilter>::from_url(ListDefaults::TASKS, &url);

    v.apply(ViewAction::SortBy(String::from("title")));
    v.apply(ViewAction::SetPage(2));
    v.write_url(&mut url);
    assert_eq!(url.query(), Some("tab=board&page=3&sortBy=title&direction=ASC"));

    let reread = ListView::<TaskFilter>::from_url(ListDefaults::TASKS, &url);
    assert_eq!(reread, v);
    let page = client.filter::<Task>(&reread.filter, &reread.query()).await.unwrap();
    assert_eq!(titles(&page.items), ["task 10"]);

    v.apply(ViewAction::SortBy(String::from("title")));
    assert_eq!(v.sort.direction, SortDirection::Desc);
    assert_eq!(v.page, 0);

    v.apply(ViewAction::Reset);
    v.write_url(&mut url);
    assert_eq!(url.query(), Some("tab=board"));
}

#[tokio::test]
async fn failed_fetch_reports_the_connection() {
    let client = fixture::client();
    client.transport().set_offline(true);
    let v = ListView::<TaskFilter>::new(ListDefaults::TASKS);
    let err = client.filter::<Task>(&v.filter, &v.query()).await.unwrap_err();
    assert_eq!(err.user_message(), "Cannot connect to server");
}

#[test]
fn any_paging_gets_a_bounded_page() {
    let runtime = AssertUnwindSafe(
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed initializing tokio runtime"),
    );
    let client = AssertUnwindSafe(fixture::client());
    bolero::check!()
        .with_type::<(u8, u8)>()
        .cloned()
        .for_each(move |(page, size)| {
            let v = ListView::<TaskFilter>::new(ListDefaults::TASKS)
                .with(ViewAction::SetSize(size as usize))
                .with(ViewAction::SetPage(page as usize));
            let res = runtime
                .block_on(client.filter::<Task>(&v.filter, &v.query()))
                .unwrap();
            assert!(res.items.len() <= v.size);
            assert_eq!(res.total_elements, NUM_TASKS as usize - 1);
        });
}
