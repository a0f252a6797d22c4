use std::rc::Rc;

use taskdesk_client::{
    api::{Error, StageId, Task, TaskId, Uuid},
    Lookups, Notice, TaskForm,
};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::{api::Api, ui};

type Setter = fn(&mut TaskForm, String);

fn input_value(e: Event) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

fn select_value(e: Event) -> String {
    e.target_unchecked_into::<HtmlSelectElement>().value()
}

fn textarea_value(e: Event) -> String {
    e.target_unchecked_into::<HtmlTextAreaElement>().value()
}

#[derive(Clone, PartialEq, Properties)]
pub struct TaskFieldsProps {
    pub form: TaskForm,
    pub lookups: Rc<Lookups>,
    pub on_change: Callback<TaskForm>,

    /// Editing an existing task: progress instead of priority and visibility
    #[prop_or_default]
    pub editing: bool,
}

/// Inputs of a [`TaskForm`] apart from the stage
#[function_component(TaskFields)]
pub fn task_fields(p: &TaskFieldsProps) -> Html {
    let f = &p.form;
    let edit = |read: fn(Event) -> String, set: Setter| {
        let form = p.form.clone();
        p.on_change.reform(move |e: Event| {
            let mut form = form.clone();
            set(&mut form, read(e));
            form
        })
    };
    let on_public = {
        let form = p.form.clone();
        p.on_change.reform(move |e: Event| {
            let mut form = form.clone();
            form.is_public = e.target_unchecked_into::<HtmlInputElement>().checked();
            form
        })
    };
    let on_progress = {
        let form = p.form.clone();
        p.on_change.reform(move |e: InputEvent| {
            let mut form = form.clone();
            form.progress = e.target_unchecked_into::<HtmlInputElement>().value();
            form
        })
    };
    let progress = if f.progress.is_empty() { "0" } else { f.progress.as_str() };
    html! {
        <div class="row g-3">
            <div class="col-12">
                <label class="form-label" for="task-title">{"Title"}</label>
                <input
                    id="task-title"
                    class="form-control"
                    required=true
                    value={f.title.clone()}
                    onchange={edit(input_value, |f, v| f.title = v)}
                />
            </div>
            if !p.editing {
                <div class="col-md-6">
                    <label class="form-label" for="task-priority">{"Priority"}</label>
                    <select id="task-priority" class="form-select"
                        onchange={edit(select_value, |f, v| f.priority = v)}>
                        <option value="" selected={f.priority.is_empty()}>{"No priority"}</option>
                        { for p.lookups.priorities.iter().map(|pr| {
                            let id = pr.id.to_string();
                            html! {
                                <option selected={id == f.priority} value={id.clone()}>{ &pr.name }</option>
                            }
                        }) }
                    </select>
                </div>
            }
            <div class="col-md-6">
                <label class="form-label" for="task-start">{"Start date"}</label>
                <input id="task-start" type="date" class="form-control"
                    value={f.start_date.clone()}
                    onchange={edit(input_value, |f, v| f.start_date = v)}
                />
            </div>
            <div class="col-md-6">
                <label class="form-label" for="task-deadline">{"Deadline"}</label>
                <input id="task-deadline" type="date" class="form-control"
                    value={f.deadline.clone()}
                    onchange={edit(input_value, |f, v| f.deadline = v)}
                />
            </div>
            if p.editing {
                <div class="col-md-6">
                    <label class="form-label" for="task-progress">{ format!("Progress: {progress}%") }</label>
                    <input id="task-progress" type="range" class="form-range" min="0" max="100" step="1"
                        value={progress.to_string()}
                        oninput={on_progress}
                    />
                </div>
            } else {
                <div class="col-md-6 d-flex align-items-end">
                    <div class="form-check form-switch">
                        <input id="task-public" class="form-check-input" type="checkbox" role="switch"
                            checked={f.is_public}
                            onchange={on_public}
                        />
                        <label class="form-check-label" for="task-public">{"Public"}</label>
                    </div>
                </div>
            }
            <div class="col-12">
                <label class="form-label" for="task-description">{"Description"}</label>
                <textarea id="task-description" class="form-control" rows="4"
                    value={f.description.clone()}
                    onchange={edit(textarea_value, |f, v| f.description = v)}
                />
            </div>
        </div>
    }
}

#[derive(Clone, PartialEq, Properties)]
pub struct NewTaskPageProps {
    pub api: Api,
    pub project: Uuid,
    pub lookups: Rc<Lookups>,
    pub on_created: Callback<TaskId>,
    pub on_cancel: Callback<()>,
    pub on_notice: Callback<Notice>,
    pub on_stages_changed: Callback<()>,
}

pub enum NewTaskMsg {
    Change(TaskForm),
    SetStage(StageId),
    Submit,
    Created(Result<Task, Error>),
}

/// Task creation page at `/tasks/new`
pub struct NewTaskPage {
    form: TaskForm,
    saving: bool,
}

impl Component for NewTaskPage {
    type Message = NewTaskMsg;
    type Properties = NewTaskPageProps;

    fn create(_ctx: &Context<Self>) -> Self {
        NewTaskPage {
            form: TaskForm::default(),
            saving: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let p = ctx.props();
        match msg {
            NewTaskMsg::Change(form) => self.form = form,
            NewTaskMsg::SetStage(stage) => self.form.stage = stage.to_string(),
            NewTaskMsg::Submit => {
                if self.saving {
                    return false;
                }
                self.saving = true;
                let api = p.api.clone();
                let form = self.form.clone();
                let project = p.project;
                ctx.link().send_future(async move {
                    NewTaskMsg::Created(form.create(&*api, project).await)
                });
            }
            NewTaskMsg::Created(Ok(task)) => {
                self.saving = false;
                p.on_notice.emit(Notice::success("Task created!"));
                p.on_created.emit(task.id);
            }
            NewTaskMsg::Created(Err(err)) => {
                self.saving = false;
                tracing::warn!(?err, "failed creating task");
                p.on_notice.emit(Notice::failure("create this task", &err));
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let p = ctx.props();
        let link = ctx.link();
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            NewTaskMsg::Submit
        });
        html! {
            <div class="container p-3" style="max-width: 48rem">
                <div class="d-flex align-items-center gap-2 mb-3">
                    <button type="button" class="btn btn-light btn-sm bi-arrow-left" title="Back"
                        onclick={p.on_cancel.reform(|_| ())}>
                    </button>
                    <h1 class="h4 mb-0">{"New task"}</h1>
                </div>
                <form class="card card-body" {onsubmit}>
                    <div class="mb-3">
                        <span class="form-label d-block">{"Stage"}</span>
                        <ui::StageSelect
                            api={p.api.clone()}
                            lookups={p.lookups.clone()}
                            project={p.project}
                            selected={self.form.stage.parse::<StageId>().ok()}
                            on_select={link.callback(NewTaskMsg::SetStage)}
                            on_stages_changed={p.on_stages_changed.clone()}
                            on_notice={p.on_notice.clone()}
                        />
                    </div>
                    <TaskFields
                        form={self.form.clone()}
                        lookups={p.lookups.clone()}
                        on_change={link.callback(NewTaskMsg::Change)}
                    />
                    <div class="d-flex gap-2 mt-3">
                        <button type="submit" class="btn btn-primary" disabled={self.saving}>
                            if self.saving {
                                <span class="spinner-border spinner-border-sm me-1" role="status"></span>
                            }
                            {"Create task"}
                        </button>
                        <button type="button" class="btn btn-outline-secondary"
                            onclick={p.on_cancel.reform(|_| ())}>
                            {"Cancel"}
                        </button>
                    </div>
                </form>
            </div>
        }
    }
}
