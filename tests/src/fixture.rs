use chrono::{Duration, TimeZone, Utc};
use taskdesk_client::{
    api::{
        Comment, CommentId, Label, LabelId, Priority, PriorityId, Stage, StageId, Task, TaskId,
        Time, Uuid, DEFAULT_PROJECT_ID,
    },
    Client,
};
use taskdesk_mock_server::{MockServer, Seed};

pub fn at(day: i64) -> Time {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::days(day)
}

fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn stage(n: u128) -> StageId {
    StageId(id(0x100 + n))
}

pub fn priority(n: u128) -> PriorityId {
    PriorityId(id(0x200 + n))
}

pub fn label(n: u128) -> LabelId {
    LabelId(id(0x300 + n))
}

pub fn task(n: u128) -> TaskId {
    TaskId(id(0x1000 + n))
}

pub fn comment(n: u128) -> CommentId {
    CommentId(id(0x2000 + n))
}

pub const NUM_TASKS: u128 = 12;

/// Comment `n` of the first task
pub fn seed_comment(n: u128, parent: Option<u128>) -> Comment {
    Comment {
        id: comment(n),
        parent_id: parent.map(comment),
        task_id: Some(task(0)),
        content: format!("comment {n}"),
        created_at: Some(at(n as i64)),
        ..Comment::stub()
    }
}

/// Three stages, two priorities, two labels and a dozen tasks
///
/// The first task carries a thread: top-level comments 0 to 6, comment 6 has
/// replies 10, 11 and 12, and reply 12 has a reply of its own, 20.
pub fn seed() -> Seed {
    let stages = ["To Do", "Doing", "Done"]
        .iter()
        .enumerate()
        .map(|(i, name)| Stage {
            id: stage(i as u128),
            name: String::from(*name),
            color: Some(String::from("#60a5fa")),
            sort_order: 3 - i as i64,
            project_id: Some(DEFAULT_PROJECT_ID),
        })
        .collect();
    let priorities = vec![
        Priority {
            id: priority(0),
            name: String::from("Low"),
            color: String::from("#34d399"),
            description: None,
            sort_order: 1,
            created_at: Some(at(0)),
        },
        Priority {
            id: priority(1),
            name: String::from("High"),
            color: String::from("#f87171"),
            description: Some(String::from("Do it now")),
            sort_order: 2,
            created_at: Some(at(1)),
        },
    ];
    let labels = vec![
        Label {
            id: label(0),
            name: String::from("bug"),
            color: String::from("#f43f5e"),
            description: None,
            created_at: Some(at(0)),
        },
        Label {
            id: label(1),
            name: String::from("feature"),
            color: String::from("#a78bfa"),
            description: None,
            created_at: Some(at(5)),
        },
    ];
    let tasks = (0..NUM_TASKS)
        .map(|n| Task {
            id: task(n),
            title: format!("task {n:02}"),
            project_id: Some(DEFAULT_PROJECT_ID),
            task_stage_id: Some(stage(n % 3)),
            task_priority_id: Some(priority(n % 2)),
            start_date: Some(at(n as i64)),
            deadline: Some(at(n as i64 + 10)),
            created_at: Some(at(n as i64)),
            is_public: Some(n != 11),
            ..Task::stub()
        })
        .collect();
    let mut comments = (0..7).map(|n| seed_comment(n, None)).collect::<Vec<_>>();
    comments.extend((10..13).map(|n| seed_comment(n, Some(6))));
    comments.push(seed_comment(20, Some(12)));
    Seed {
        tasks,
        labels,
        priorities,
        stages,
        comments,
        ..Seed::default()
    }
}

pub fn client() -> Client<MockServer> {
    Client::new(MockServer::from_seed(seed()))
}
