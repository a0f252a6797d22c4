use anyhow::Context;
use taskdesk_client::{
    api::{
        Comment, CommentId, Label, Priority, Task, TaskFilter, TaskId, Uuid,
        DEFAULT_PROJECT_ID,
    },
    describe,
    pagination::summary,
    view::Params,
    Client, CommentTree, ListDefaults, ListView, Lookups, RestTransport, SubtaskList, TaskForm,
    Transport, DEFAULT_API_URL,
};
use taskdesk_mock_server::{MockServer, Seed};

#[derive(structopt::StructOpt)]
struct Opt {
    /// Base URL of the REST API
    #[structopt(short, long, env = "TASKDESK_API_URL")]
    host: Option<String>,

    /// Project whose stages are used
    #[structopt(short, long, env = "TASKDESK_PROJECT_ID")]
    project: Option<Uuid>,

    /// Answer from an in-memory server loaded with this seed file instead of `host`
    #[structopt(long)]
    seed: Option<std::path::PathBuf>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
struct ListOpt {
    /// One-based page
    #[structopt(long)]
    page: Option<usize>,

    #[structopt(long)]
    size: Option<usize>,

    #[structopt(long)]
    sort_by: Option<String>,

    /// `asc` or `desc`
    #[structopt(long)]
    direction: Option<String>,
}

impl ListOpt {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut res = Vec::new();
        let mut push = |k: &str, v: Option<String>| {
            if let Some(v) = v {
                res.push((String::from(k), v));
            }
        };
        push("page", self.page.map(|p| p.to_string()));
        push("size", self.size.map(|s| s.to_string()));
        push("sortBy", self.sort_by.clone());
        push("direction", self.direction.clone());
        res
    }
}

/// Task fields; dates are `YYYY-MM-DD`
#[derive(structopt::StructOpt)]
struct TaskOpt {
    #[structopt(long)]
    description: Option<String>,

    /// Stage id
    #[structopt(long)]
    stage: Option<String>,

    /// Priority id
    #[structopt(long)]
    priority: Option<String>,

    #[structopt(long)]
    start: Option<String>,

    #[structopt(long)]
    deadline: Option<String>,

    /// Percentage between 0 and 100
    #[structopt(long)]
    progress: Option<String>,

    /// Hide the task from public listings
    #[structopt(long)]
    private: bool,
}

impl TaskOpt {
    /// Writes the given options over `form`
    fn fill(self, form: &mut TaskForm) {
        let set = |field: &mut String, v: Option<String>| {
            if let Some(v) = v {
                *field = v;
            }
        };
        set(&mut form.description, self.description);
        set(&mut form.stage, self.stage);
        set(&mut form.priority, self.priority);
        set(&mut form.start_date, self.start);
        set(&mut form.deadline, self.deadline);
        set(&mut form.progress, self.progress);
        if self.private {
            form.is_public = false;
        }
    }
}

#[derive(structopt::StructOpt)]
enum Command {
    /// List tasks
    Tasks {
        /// Dashboard URL to take the filters, paging and sorting from
        #[structopt(long, conflicts_with_all = &["title", "stage", "priority"])]
        url: Option<String>,

        #[structopt(long)]
        title: Option<String>,

        /// Stage id
        #[structopt(long)]
        stage: Option<String>,

        /// Priority id
        #[structopt(long)]
        priority: Option<String>,

        #[structopt(flatten)]
        list: ListOpt,
    },

    /// Show one task with its subtasks, assignees and labels
    Task { id: TaskId },

    /// Create a task in the project
    AddTask {
        title: String,

        #[structopt(flatten)]
        fields: TaskOpt,
    },

    /// Change fields of a task, leaving the others as they are
    EditTask {
        id: TaskId,

        #[structopt(long)]
        title: Option<String>,

        #[structopt(flatten)]
        fields: TaskOpt,
    },

    /// Show the comment thread of a task
    Comments {
        task: TaskId,

        /// Load every page of comments and replies
        #[structopt(long)]
        all: bool,
    },

    /// Comment on a task, or reply to a comment
    Comment {
        task: TaskId,
        content: String,

        #[structopt(long)]
        reply_to: Option<CommentId>,
    },

    /// Show the activity timeline of a task
    Activity { task: TaskId },

    /// Add a subtask to a task
    AddSubtask { task: TaskId, title: String },

    /// List labels
    Labels {
        #[structopt(long)]
        name: Option<String>,

        #[structopt(flatten)]
        list: ListOpt,
    },

    /// List priorities
    Priorities {
        #[structopt(long)]
        name: Option<String>,

        #[structopt(flatten)]
        list: ListOpt,
    },

    /// List the stages of the project
    Stages,
}

fn print_comment(c: &Comment, indent: usize) {
    let pad = "    ".repeat(indent);
    let pin = if c.is_pinned { " [pinned]" } else { "" };
    println!("{pad}{} ({}){pin}: {}", c.author(), c.id, c.content);
    for r in &c.child_comments {
        print_comment(r, indent + 1);
    }
    if c.unloaded_children() > 0 {
        println!("{pad}    ... {} more replies", c.unloaded_children());
    }
}

async fn load_everything<T: Transport>(client: &Client<T>, tree: &mut CommentTree) -> anyhow::Result<()> {
    while tree.has_more_roots() {
        tree.load_more_roots(client).await?;
    }
    loop {
        let pending = tree
            .ids()
            .into_iter()
            .filter(|id| tree.has_more_replies(id))
            .collect::<Vec<_>>();
        if pending.is_empty() {
            return Ok(());
        }
        for id in pending {
            tree.load_more_children(client, id).await?;
        }
    }
}

async fn run<T: Transport>(client: &Client<T>, project: Uuid, cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Tasks {
            url,
            title,
            stage,
            priority,
            list,
        } => {
            let view = match url {
                Some(url) => {
                    let url = reqwest::Url::parse(&url).context("parsing dashboard URL")?;
                    ListView::<TaskFilter>::from_url(ListDefaults::TASKS, &url)
                }
                None => {
                    let mut pairs = list.pairs();
                    pairs.extend(title.map(|t| (String::from("title"), t)));
                    pairs.extend(stage.map(|s| (String::from("taskStageId"), s)));
                    pairs.extend(priority.map(|p| (String::from("taskPriorityId"), p)));
                    ListView::read(ListDefaults::TASKS, &Params::from_pairs(pairs))
                }
            };
            tracing::debug!(?view, "listing tasks");
            let lookups = Lookups::load(client, project).await?;
            let page = client.filter::<Task>(&view.filter, &view.query()).await?;
            for t in &page.items {
                let stage = t
                    .task_stage_id
                    .and_then(|s| lookups.stage(&s.0))
                    .map_or("-", |s| s.name.as_str());
                let prio = t
                    .task_priority_id
                    .and_then(|p| lookups.priority(&p.0))
                    .map_or("-", |p| p.name.as_str());
                println!("{}  {:<40} {:<12} {}", t.id, t.title, stage, prio);
            }
            println!("{}", summary(view.page, view.size, page.total_elements));
        }
        Command::Task { id } => {
            let lookups = Lookups::load(client, project).await?;
            let task = client.get::<Task>(id).await?;
            println!("{}", task.title);
            if !task.description.is_empty() {
                println!("\n{}\n", task.description);
            }
            let stage = task.task_stage_id.map(|s| s.to_string());
            let stage = stage.as_deref().map_or("-", |r| lookups.stage_name(r).unwrap_or(r));
            let prio = task.task_priority_id.map(|p| p.to_string());
            let prio = prio.as_deref().map_or("-", |r| lookups.priority_name(r).unwrap_or(r));
            println!("stage:    {stage}");
            println!("priority: {prio}");
            println!("progress: {}%", task.progress_percent.unwrap_or(0));
            let users = client.assignees(id).await?;
            let users = users
                .iter()
                .map(|u| lookups.user_display(&u.to_string()))
                .collect::<Vec<_>>();
            println!("assigned: {}", users.join(", "));
            let labels = client.task_labels(id).await?;
            let labels = labels.iter().map(|l| l.name.as_str()).collect::<Vec<_>>();
            println!("labels:   {}", labels.join(", "));
            let subtasks = SubtaskList::load(client, id).await?;
            println!("subtasks: {}/{}", subtasks.completed(), subtasks.items().len());
            for s in subtasks.items() {
                println!("  [{}] {}", if s.completed { "x" } else { " " }, s.title);
            }
        }
        Command::AddTask { title, fields } => {
            let mut form = TaskForm {
                title,
                ..TaskForm::default()
            };
            fields.fill(&mut form);
            let task = form.create(client, project).await?;
            println!("{}  {}", task.id, task.title);
        }
        Command::EditTask { id, title, fields } => {
            let task = client.get::<Task>(id).await?;
            let mut form = TaskForm::from_task(&task);
            if let Some(title) = title {
                form.title = title;
            }
            fields.fill(&mut form);
            let task = form.save(client, &task).await?;
            println!("{}  {}  {}%", task.id, task.title, task.progress_percent.unwrap_or(0));
        }
        Command::Comments { task, all } => {
            let mut tree = CommentTree::load(client, task).await?;
            if all {
                load_everything(client, &mut tree).await?;
            }
            println!("{} comments", tree.total_elements());
            for c in tree.roots() {
                print_comment(c, 0);
            }
            if tree.has_more_roots() {
                println!("... more comments, use --all to load them");
            }
        }
        Command::Comment {
            task,
            content,
            reply_to,
        } => {
            let mut tree = CommentTree::load(client, task).await?;
            let id = match reply_to {
                None => tree.post(client, &content, None).await?,
                Some(parent) => {
                    if tree.find(&parent).is_none() {
                        load_everything(client, &mut tree).await?;
                    }
                    tree.reply(client, parent, &content, None).await?
                }
            };
            println!("{id}");
        }
        Command::Activity { task } => {
            let lookups = Lookups::load(client, project).await?;
            let logs = client.activity(task).await?;
            if logs.is_empty() {
                println!("No activity yet");
            }
            for entry in logs.iter().filter_map(|l| describe(l, &lookups)) {
                println!("{}  {} {}", entry.when, entry.author, entry.headline);
                for d in entry.details {
                    println!("    {d}");
                }
            }
        }
        Command::AddSubtask { task, title } => {
            let mut list = SubtaskList::load(client, task).await?;
            list.add(client, &title).await?;
            println!("{}/{} subtasks done", list.completed(), list.items().len());
        }
        Command::Labels { name, list } => {
            let mut pairs = list.pairs();
            pairs.extend(name.map(|n| (String::from("name"), n)));
            let view = ListView::read(ListDefaults::LABELS, &Params::from_pairs(pairs));
            let page = client.filter::<Label>(&view.filter, &view.query()).await?;
            for l in &page.items {
                println!("{}  {:<24} {}", l.id, l.name, l.color);
            }
            println!("{}", summary(view.page, view.size, page.total_elements));
        }
        Command::Priorities { name, list } => {
            let mut pairs = list.pairs();
            pairs.extend(name.map(|n| (String::from("name"), n)));
            let view = ListView::read(ListDefaults::PRIORITIES, &Params::from_pairs(pairs));
            let page = client.filter::<Priority>(&view.filter, &view.query()).await?;
            for p in &page.items {
                println!("{}  {:<24} {:<8} {}", p.id, p.name, p.color, p.sort_order);
            }
            println!("{}", summary(view.page, view.size, page.total_elements));
        }
        Command::Stages => {
            for s in client.stages_by_project(project).await? {
                println!("{}  {:>3}  {}", s.id, s.sort_order, s.name);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let opt = <Opt as structopt::StructOpt>::from_args();
    let project = opt.project.unwrap_or(DEFAULT_PROJECT_ID);

    match opt.seed {
        Some(path) => {
            let seed = std::fs::read(&path)
                .with_context(|| format!("reading seed file {}", path.display()))?;
            let seed: Seed = serde_json::from_slice(&seed).context("parsing seed file")?;
            let client = Client::new(MockServer::from_seed(seed));
            run(&client, project, opt.cmd).await
        }
        None => {
            let host = opt.host.as_deref().unwrap_or(DEFAULT_API_URL);
            let client = Client::new(RestTransport::new(reqwest::Client::new(), host));
            run(&client, project, opt.cmd).await
        }
    }
}
