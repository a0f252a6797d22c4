use std::rc::Rc;

use taskdesk_client::{
    api::{ActivityLog, Error, Label, LabelId, NewTask, StageId, Task, TaskId, UserId, Uuid},
    Lookups, Notice, TaskForm,
};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::{api::Api, ui};

const SAVE_DETAILS: &str = "save this task";

#[derive(Clone, PartialEq, Properties)]
pub struct TaskDetailProps {
    pub api: Api,
    pub task: TaskId,
    pub project: Uuid,
    pub lookups: Rc<Lookups>,
    pub on_back: Callback<()>,
    pub on_notice: Callback<Notice>,
    pub on_stages_changed: Callback<()>,
}

pub enum TaskDetailMsg {
    Loaded(Result<Task, Error>),
    ActivityLoaded(Result<Vec<ActivityLog>, Error>),
    AssigneesLoaded(Result<Vec<UserId>, Error>),
    LabelsLoaded(Result<Vec<Label>, Error>),

    Edit(&'static str, Box<dyn FnOnce(&mut NewTask) -> Result<(), Error>>),
    Updated(&'static str, Result<Task, Error>),

    StartEditing,
    EditDetails(TaskForm),
    StopEditing,

    ToggleAssignee(UserId),
    ToggleLabel(LabelId),
    RelationChanged(&'static str, Result<(), Error>),

    Delete,
    Deleted(Result<(), Error>),
}

pub struct TaskDetail {
    task: Option<Task>,
    activity: Option<Rc<Vec<ActivityLog>>>,
    assignees: Vec<UserId>,
    labels: Vec<Label>,
    saving: bool,

    /// Draft of the details editor while it is open
    editing: Option<TaskForm>,
}

impl TaskDetail {
    fn load_activity(ctx: &Context<Self>) {
        let api = ctx.props().api.clone();
        let task = ctx.props().task;
        ctx.link().send_future(async move {
            TaskDetailMsg::ActivityLoaded(api.activity(task).await)
        });
    }

    fn load_relations(ctx: &Context<Self>) {
        let api = ctx.props().api.clone();
        let task = ctx.props().task;
        ctx.link().send_future(async move {
            TaskDetailMsg::AssigneesLoaded(api.assignees(task).await)
        });
        let api = ctx.props().api.clone();
        ctx.link().send_future(async move {
            TaskDetailMsg::LabelsLoaded(api.task_labels(task).await)
        });
    }

    /// Title, description, dates and progress, saved through [`TaskDetailMsg::Edit`]
    fn view_editor(&self, ctx: &Context<Self>, form: &TaskForm) -> Html {
        let link = ctx.link();
        let onsubmit = {
            let form = form.clone();
            link.callback(move |e: SubmitEvent| {
                e.prevent_default();
                let form = form.clone();
                TaskDetailMsg::Edit(
                    SAVE_DETAILS,
                    Box::new(move |t: &mut NewTask| {
                        // stage, priority and visibility have their own controls
                        let kept = (t.task_stage_id, t.task_priority_id, t.is_public);
                        form.apply(t)?;
                        (t.task_stage_id, t.task_priority_id, t.is_public) = kept;
                        Ok(())
                    }),
                )
            })
        };
        html! {
            <form class="card card-body mb-3" {onsubmit}>
                <ui::TaskFields
                    form={form.clone()}
                    lookups={ctx.props().lookups.clone()}
                    on_change={link.callback(TaskDetailMsg::EditDetails)}
                    editing=true
                />
                <div class="d-flex gap-2 mt-3">
                    <button type="submit" class="btn btn-primary btn-sm" disabled={self.saving}>
                        {"Save Changes"}
                    </button>
                    <button type="button" class="btn btn-outline-secondary btn-sm"
                        onclick={link.callback(|_| TaskDetailMsg::StopEditing)}>
                        {"Cancel"}
                    </button>
                </div>
            </form>
        }
    }

    fn view_relations(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let l = &ctx.props().lookups;
        html! {
            <>
                <h2 class="h6 mt-3">{"Assignees"}</h2>
                <div class="d-flex flex-wrap gap-1">
                    { for l.users.iter().map(|u| {
                        let id = u.id;
                        let on = self.assignees.contains(&id);
                        html! {
                            <button type="button"
                                class={classes!("btn", "btn-sm", if on { "btn-primary" } else { "btn-outline-secondary" })}
                                onclick={link.callback(move |_| TaskDetailMsg::ToggleAssignee(id))}>
                                { &u.name }
                            </button>
                        }
                    }) }
                </div>
                <h2 class="h6 mt-3">{"Labels"}</h2>
                <div class="d-flex flex-wrap gap-1">
                    { for l.labels.iter().map(|label| {
                        let id = label.id;
                        let on = self.labels.iter().any(|x| x.id == id);
                        let style = if on {
                            format!("background-color: {}; color: white", label.color)
                        } else {
                            format!("border: 1px solid {}", label.color)
                        };
                        html! {
                            <button type="button" class="btn btn-sm" {style}
                                onclick={link.callback(move |_| TaskDetailMsg::ToggleLabel(id))}>
                                { &label.name }
                            </button>
                        }
                    }) }
                </div>
            </>
        }
    }
}

impl Component for TaskDetail {
    type Message = TaskDetailMsg;
    type Properties = TaskDetailProps;

    fn create(ctx: &Context<Self>) -> Self {
        let api = ctx.props().api.clone();
        let task = ctx.props().task;
        ctx.link().send_future(async move {
            TaskDetailMsg::Loaded(api.get::<Task>(task).await)
        });
        Self::load_activity(ctx);
        Self::load_relations(ctx);
        TaskDetail {
            task: None,
            activity: None,
            assignees: Vec::new(),
            labels: Vec::new(),
            saving: false,
            editing: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let p = ctx.props();
        let api = p.api.clone();
        let task_id = p.task;
        match msg {
            TaskDetailMsg::Loaded(Ok(task)) => self.task = Some(task),
            TaskDetailMsg::Loaded(Err(err)) => p.on_notice.emit(Notice::failure("load this task", &err)),
            TaskDetailMsg::ActivityLoaded(Ok(logs)) => self.activity = Some(Rc::new(logs)),
            TaskDetailMsg::ActivityLoaded(Err(err)) => {
                self.activity = Some(Rc::new(Vec::new()));
                p.on_notice.emit(Notice::failure("load activity", &err));
            }
            TaskDetailMsg::AssigneesLoaded(Ok(users)) => self.assignees = users,
            TaskDetailMsg::LabelsLoaded(Ok(labels)) => self.labels = labels,
            TaskDetailMsg::AssigneesLoaded(Err(err)) | TaskDetailMsg::LabelsLoaded(Err(err)) => {
                tracing::warn!(?err, "failed loading task relations");
                return false;
            }
            TaskDetailMsg::Edit(action, edit) => {
                let Some(task) = &self.task else {
                    return false;
                };
                let mut new = NewTask::from(task);
                if let Err(err) = edit(&mut new) {
                    p.on_notice.emit(Notice::failure(action, &err));
                    return false;
                }
                self.saving = true;
                ctx.link().send_future(async move {
                    TaskDetailMsg::Updated(action, api.update::<Task>(task_id, &new).await)
                });
            }
            TaskDetailMsg::Updated(action, res) => {
                self.saving = false;
                match res {
                    Ok(task) => {
                        self.task = Some(task);
                        if action == SAVE_DETAILS {
                            self.editing = None;
                            p.on_notice.emit(Notice::success("Task updated"));
                        }
                        Self::load_activity(ctx);
                    }
                    Err(err) => p.on_notice.emit(Notice::failure(action, &err)),
                }
            }
            TaskDetailMsg::StartEditing => self.editing = self.task.as_ref().map(TaskForm::from_task),
            TaskDetailMsg::EditDetails(form) => self.editing = Some(form),
            TaskDetailMsg::StopEditing => self.editing = None,
            TaskDetailMsg::ToggleAssignee(user) => {
                let assigned = self.assignees.contains(&user);
                ctx.link().send_future(async move {
                    if assigned {
                        TaskDetailMsg::RelationChanged("unassign this user", api.unassign(task_id, user).await)
                    } else {
                        TaskDetailMsg::RelationChanged("assign this user", api.assign(task_id, &[user]).await)
                    }
                });
                return false;
            }
            TaskDetailMsg::ToggleLabel(label) => {
                let attached = self.labels.iter().any(|l| l.id == label);
                ctx.link().send_future(async move {
                    if attached {
                        TaskDetailMsg::RelationChanged("remove this label", api.detach_label(task_id, label).await)
                    } else {
                        TaskDetailMsg::RelationChanged("add this label", api.attach_labels(task_id, &[label]).await)
                    }
                });
                return false;
            }
            TaskDetailMsg::RelationChanged(action, res) => {
                match res {
                    Ok(()) => {
                        Self::load_relations(ctx);
                        Self::load_activity(ctx);
                    }
                    Err(err) => p.on_notice.emit(Notice::failure(action, &err)),
                }
                return false;
            }
            TaskDetailMsg::Delete => {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message("Delete this task?").ok())
                    .unwrap_or(false);
                if !confirmed {
                    return false;
                }
                ctx.link().send_future(async move {
                    TaskDetailMsg::Deleted(api.delete::<Task>(task_id).await)
                });
                return false;
            }
            TaskDetailMsg::Deleted(Ok(())) => {
                p.on_notice.emit(Notice::success("Deleted task"));
                p.on_back.emit(());
            }
            TaskDetailMsg::Deleted(Err(err)) => p.on_notice.emit(Notice::failure("delete this task", &err)),
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let p = ctx.props();
        let link = ctx.link();
        let Some(task) = &self.task else {
            return html! {
                <div class="text-center p-5">
                    <div class="spinner-border" role="status"></div>
                </div>
            };
        };
        let on_stage = link.callback(|stage: StageId| {
            TaskDetailMsg::Edit(
                "change the stage",
                Box::new(move |t| {
                    t.task_stage_id = Some(stage);
                    Ok(())
                }),
            )
        });
        let on_priority = link.callback(|e: Event| {
            let raw = e.target_unchecked_into::<HtmlSelectElement>().value();
            TaskDetailMsg::Edit(
                "change the priority",
                Box::new(move |t| {
                    t.task_priority_id = raw.parse().ok();
                    Ok(())
                }),
            )
        });
        let selected_priority = task.task_priority_id.map(|i| i.to_string()).unwrap_or_default();
        html! {
            <div class="container-fluid p-3">
                <div class="d-flex align-items-center gap-2 mb-3">
                    <button type="button" class="btn btn-light btn-sm bi-arrow-left" title="Back"
                        onclick={p.on_back.reform(|_| ())}>
                    </button>
                    <h1 class="h4 mb-0 me-auto">{ &task.title }</h1>
                    if self.saving {
                        <div class="spinner-border spinner-border-sm" role="status"></div>
                    }
                    if self.editing.is_none() {
                        <button type="button" class="btn btn-outline-secondary btn-sm bi-pencil" title="Edit details"
                            onclick={link.callback(|_| TaskDetailMsg::StartEditing)}>
                        </button>
                    }
                    <button type="button" class="btn btn-outline-danger btn-sm bi-trash" title="Delete task"
                        onclick={link.callback(|_| TaskDetailMsg::Delete)}>
                    </button>
                </div>
                <div class="row g-4">
                    <div class="col-lg-8">
                        if let Some(form) = &self.editing {
                            { self.view_editor(ctx, form) }
                        } else if !task.description.is_empty() {
                            <p style="white-space: pre-wrap">{ &task.description }</p>
                        }
                        <h2 class="h6 mt-3">{"Subtasks"}</h2>
                        <ui::SubtaskListView api={p.api.clone()} task={p.task} on_notice={p.on_notice.clone()} />
                        <h2 class="h6 mt-4">{"Comments"}</h2>
                        <ui::CommentSection api={p.api.clone()} task={p.task} on_notice={p.on_notice.clone()} />
                    </div>
                    <div class="col-lg-4">
                        <h2 class="h6">{"Stage"}</h2>
                        <ui::StageSelect
                            api={p.api.clone()}
                            lookups={p.lookups.clone()}
                            project={task.project_id.unwrap_or(p.project)}
                            selected={task.task_stage_id}
                            on_select={on_stage}
                            on_stages_changed={p.on_stages_changed.clone()}
                            on_notice={p.on_notice.clone()}
                        />
                        <h2 class="h6 mt-3">{"Priority"}</h2>
                        <select class="form-select form-select-sm" onchange={on_priority}>
                            <option value="" selected={selected_priority.is_empty()}>{"No priority"}</option>
                            { for p.lookups.priorities.iter().map(|pr| html! {
                                <option value={pr.id.to_string()} selected={pr.id.to_string() == selected_priority}>
                                    { &pr.name }
                                </option>
                            }) }
                        </select>
                        <dl class="row small mt-3 mb-0">
                            <dt class="col-5">{"Start"}</dt>
                            <dd class="col-7">{ ui::format_date(&task.start_date) }</dd>
                            <dt class="col-5">{"Deadline"}</dt>
                            <dd class="col-7">{ ui::format_date(&task.deadline) }</dd>
                            <dt class="col-5">{"Progress"}</dt>
                            <dd class="col-7">{ format!("{}%", task.progress_percent.unwrap_or(0)) }</dd>
                        </dl>
                        { self.view_relations(ctx) }
                        <h2 class="h6 mt-4">{"Activity"}</h2>
                        <ui::ActivityTimeline logs={self.activity.clone()} lookups={p.lookups.clone()} />
                    </div>
                </div>
            </div>
        }
    }
}
