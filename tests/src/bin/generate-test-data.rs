use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use rand::{seq::SliceRandom, Rng};
use taskdesk_client::api::{
    Comment, CommentId, Label, LabelId, Priority, PriorityId, Stage, StageId, Subtask, SubtaskId,
    Task, TaskAssign, TaskAssignId, TaskId, TaskLabel, TaskLabelId, Time, User, Uuid,
    DEFAULT_PROJECT_ID,
};
use taskdesk_mock_server::{Seed, MAX_COMMENT_DEPTH};

const NUM_TASKS: usize = 150;
const TASK_TITLE_LEN: usize = 6;
const TASK_DESCRIPTION_LEN: usize = 40;

const NUM_LABELS: usize = 8;
const MAX_LABELS_PER_TASK: usize = 3;

const NUM_COMMENTS: usize = 600;
const COMMENT_WORD_COUNT: usize = 25;

const MAX_SUBTASKS: usize = 5;

/// Days before now the oldest generated item is created
const HISTORY_DAYS: i64 = 90;

const COLORS: [&str; 8] = [
    "#60a5fa", "#34d399", "#fbbf24", "#f87171", "#a78bfa", "#f472b6", "#2dd4bf", "#9ca3af",
];

const STAGES: [&str; 4] = ["Backlog", "To Do", "In Progress", "Done"];
const PRIORITIES: [&str; 4] = ["Low", "Medium", "High", "Urgent"];

fn gen_color(rng: &mut impl Rng) -> String {
    COLORS.choose(rng).map_or_else(String::new, |c| String::from(*c))
}

fn gen_time(rng: &mut impl Rng) -> Time {
    Utc::now() - Duration::minutes(rng.gen_range(0..HISTORY_DAYS * 24 * 60))
}

fn gen_word() -> String {
    lipsum::lipsum_words(1).trim_end_matches('.').to_lowercase()
}

fn main() {
    let mut rng = rand::thread_rng();
    let users = User::directory();

    let stages = STAGES
        .iter()
        .enumerate()
        .map(|(i, name)| Stage {
            id: StageId(Uuid::new_v4()),
            name: String::from(*name),
            color: Some(String::from(COLORS[i])),
            sort_order: i as i64 + 1,
            project_id: Some(DEFAULT_PROJECT_ID),
        })
        .collect::<Vec<_>>();

    let priorities = PRIORITIES
        .iter()
        .enumerate()
        .map(|(i, name)| Priority {
            id: PriorityId(Uuid::new_v4()),
            name: String::from(*name),
            color: gen_color(&mut rng),
            description: rng.gen_bool(0.5).then(|| lipsum::lipsum_words(8)),
            sort_order: i as i64 + 1,
            created_at: Some(gen_time(&mut rng)),
        })
        .collect::<Vec<_>>();

    let mut labels: Vec<Label> = Vec::new();
    while labels.len() < NUM_LABELS {
        let name = gen_word();
        // Label names are unique
        if labels.iter().any(|l| l.name == name) {
            continue;
        }
        labels.push(Label {
            id: LabelId(Uuid::new_v4()),
            name,
            color: gen_color(&mut rng),
            description: None,
            created_at: Some(gen_time(&mut rng)),
        });
    }

    let mut tasks = Vec::with_capacity(NUM_TASKS);
    let mut assignments = Vec::new();
    let mut task_labels = Vec::new();
    let mut subtasks = BTreeMap::new();
    for _ in 0..NUM_TASKS {
        let created = gen_time(&mut rng);
        let start = created + Duration::days(rng.gen_range(0..7));
        let mut task = Task {
            id: TaskId(Uuid::new_v4()),
            title: lipsum::lipsum_words(TASK_TITLE_LEN),
            description: lipsum::lipsum(TASK_DESCRIPTION_LEN),
            project_id: Some(DEFAULT_PROJECT_ID),
            task_stage_id: stages.choose(&mut rng).map(|s| s.id),
            task_priority_id: priorities.choose(&mut rng).map(|p| p.id),
            start_date: Some(start),
            deadline: rng
                .gen_bool(0.7)
                .then(|| start + Duration::days(rng.gen_range(1..30))),
            progress_percent: Some(rng.gen_range(0..=100)),
            is_public: Some(rng.gen_bool(0.8)),
            created_at: Some(created),
            updated_at: Some(created),
            created_by: users.choose(&mut rng).map(|u| u.id),
            ..Task::stub()
        };

        for user in users.iter().filter(|_| rng.gen_bool(0.3)) {
            task.assigned_users.push(user.id);
            assignments.push(TaskAssign {
                id: TaskAssignId(Uuid::new_v4()),
                task_id: task.id,
                user_id: user.id,
            });
        }

        let num_labels = rng.gen_range(0..=MAX_LABELS_PER_TASK);
        for label in labels.choose_multiple(&mut rng, num_labels) {
            task.labels.push(label.clone());
            task_labels.push(TaskLabel {
                id: TaskLabelId(Uuid::new_v4()),
                task_id: task.id,
                label_id: label.id,
            });
        }

        let subs = (0..rng.gen_range(0..=MAX_SUBTASKS))
            .map(|_| Subtask {
                id: SubtaskId(Uuid::new_v4()),
                title: lipsum::lipsum_words(4),
                completed: rng.gen_bool(0.4),
                created_at: Some(created),
                updated_at: Some(created),
            })
            .collect::<Vec<_>>();
        if !subs.is_empty() {
            subtasks.insert(task.id, subs);
        }

        tasks.push(task);
    }

    // Comments are generated oldest first, replies only ever pointing to older comments
    let mut comments: Vec<Comment> = Vec::with_capacity(NUM_COMMENTS);
    let mut depths = Vec::with_capacity(NUM_COMMENTS);
    let start = Utc::now() - Duration::days(HISTORY_DAYS);
    for i in 0..NUM_COMMENTS {
        let parent = match comments.is_empty() || rng.gen_bool(0.5) {
            true => None,
            false => {
                let p = rng.gen_range(0..comments.len());
                (depths[p] < MAX_COMMENT_DEPTH).then_some(p)
            }
        };
        let (task_id, parent_id, depth) = match parent {
            Some(p) => (comments[p].task_id, Some(comments[p].id), depths[p] + 1),
            None => (tasks.choose(&mut rng).map(|t| t.id), None, 0),
        };
        let author = users.choose(&mut rng);
        let at = start + Duration::minutes(i as i64 * 60);
        comments.push(Comment {
            id: CommentId(Uuid::new_v4()),
            parent_id,
            task_id,
            content: lipsum::lipsum_words(rng.gen_range(3..=COMMENT_WORD_COUNT)),
            user_id: author.map(|u| u.id),
            user_name: author.map(|u| u.name.clone()),
            created_at: Some(at),
            updated_at: Some(at),
            is_pinned: parent_id.is_none() && rng.gen_bool(0.05),
            ..Comment::stub()
        });
        depths.push(depth);
    }

    let seed = Seed {
        tasks,
        labels,
        priorities,
        stages,
        comments,
        assignments,
        task_labels,
        activity: Vec::new(),
        subtasks,
    };
    match serde_json::to_string_pretty(&seed) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("failed serializing test data: {e}");
            std::process::exit(1);
        }
    }
}
