use std::rc::Rc;

use chrono::NaiveDate;
use taskdesk_client::{api::TaskFilter, Lookups};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::ui;

type Setter<T> = fn(&mut TaskFilter, T);

#[derive(Clone, PartialEq, Properties)]
pub struct TaskFilterBarProps {
    pub filter: TaskFilter,
    pub lookups: Rc<Lookups>,
    pub on_apply: Callback<TaskFilter>,
    pub on_reset: Callback<()>,
}

pub enum TaskFilterMsg {
    Edit(Box<dyn FnOnce(&mut TaskFilter)>),
    Apply,
}

/// Filter form of the task list; edits stay local until applied
pub struct TaskFilterBar {
    draft: TaskFilter,
}

impl TaskFilterBar {
    fn text(ctx: &Context<Self>, label: &'static str, value: &Option<String>, set: Setter<Option<String>>) -> Html {
        let onchange = ctx.link().callback(move |e: Event| {
            let v = ui::input_text(e.target_unchecked_into::<HtmlInputElement>().value());
            TaskFilterMsg::Edit(Box::new(move |f| set(f, v)))
        });
        html! {
            <div class="col-md-3">
                <input
                    class="form-control form-control-sm"
                    placeholder={label}
                    aria-label={label}
                    value={value.clone().unwrap_or_default()}
                    {onchange}
                />
            </div>
        }
    }

    fn date(ctx: &Context<Self>, label: &'static str, value: &Option<NaiveDate>, set: Setter<Option<NaiveDate>>) -> Html {
        let onchange = ctx.link().callback(move |e: Event| {
            let v = ui::input_date(&e.target_unchecked_into::<HtmlInputElement>().value());
            TaskFilterMsg::Edit(Box::new(move |f| set(f, v)))
        });
        html! {
            <div class="col-md-3">
                <label class="form-label small text-muted mb-0">{ label }</label>
                <input
                    type="date"
                    class="form-control form-control-sm"
                    value={value.map(|d| d.to_string()).unwrap_or_default()}
                    {onchange}
                />
            </div>
        }
    }

    /// A select over `(id, name)` options, the empty option meaning any
    fn select(
        ctx: &Context<Self>,
        label: &'static str,
        selected: Option<String>,
        options: Vec<(String, String)>,
        set: Setter<String>,
    ) -> Html {
        let onchange = ctx.link().callback(move |e: Event| {
            let v = e.target_unchecked_into::<HtmlSelectElement>().value();
            TaskFilterMsg::Edit(Box::new(move |f| set(f, v)))
        });
        let selected = selected.unwrap_or_default();
        html! {
            <div class="col-md-3">
                <select class="form-select form-select-sm" aria-label={label} {onchange}>
                    <option value="" selected={selected.is_empty()}>{ format!("Any {}", label.to_lowercase()) }</option>
                    { for options.into_iter().map(|(id, name)| html! {
                        <option selected={id == selected} value={id.clone()}>{ name }</option>
                    }) }
                </select>
            </div>
        }
    }
}

impl Component for TaskFilterBar {
    type Message = TaskFilterMsg;
    type Properties = TaskFilterBarProps;

    fn create(ctx: &Context<Self>) -> Self {
        TaskFilterBar {
            draft: ctx.props().filter.clone(),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().filter != old_props.filter {
            self.draft = ctx.props().filter.clone();
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            TaskFilterMsg::Edit(edit) => {
                edit(&mut self.draft);
                true
            }
            TaskFilterMsg::Apply => {
                ctx.props().on_apply.emit(self.draft.clone());
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let f = &self.draft;
        let l = &ctx.props().lookups;
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            TaskFilterMsg::Apply
        });
        let on_public = ctx.link().callback(|e: Event| {
            let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
            TaskFilterMsg::Edit(Box::new(move |f| f.is_public = checked))
        });
        let stages = l.stages.iter().map(|s| (s.id.to_string(), s.name.clone())).collect();
        let priorities = l.priorities.iter().map(|p| (p.id.to_string(), p.name.clone())).collect();
        let users = l.users.iter().map(|u| (u.id.to_string(), u.name.clone())).collect();
        let labels = l.labels.iter().map(|x| (x.id.to_string(), x.name.clone())).collect();
        let activity = vec![
            (String::from("true"), String::from("Active")),
            (String::from("false"), String::from("Inactive")),
        ];
        html! {
            <form class="card card-body mb-3" {onsubmit}>
                <div class="row g-2">
                    { Self::text(ctx, "Title", &f.title, |f, v| f.title = v) }
                    { Self::text(ctx, "Description", &f.description, |f, v| f.description = v) }
                    { Self::select(ctx, "Stage", f.task_stage_id.map(|i| i.to_string()), stages,
                        |f, v| f.task_stage_id = v.parse().ok()) }
                    { Self::select(ctx, "Priority", f.task_priority_id.map(|i| i.to_string()), priorities,
                        |f, v| f.task_priority_id = v.parse().ok()) }
                    { Self::date(ctx, "Start from", &f.start_date_from, |f, v| f.start_date_from = v) }
                    { Self::date(ctx, "Start to", &f.start_date_to, |f, v| f.start_date_to = v) }
                    { Self::date(ctx, "Deadline from", &f.deadline_from, |f, v| f.deadline_from = v) }
                    { Self::date(ctx, "Deadline to", &f.deadline_to, |f, v| f.deadline_to = v) }
                    { Self::select(ctx, "Assignee", f.assigned_user_id.map(|i| i.to_string()), users,
                        |f, v| f.assigned_user_id = v.parse().ok()) }
                    { Self::select(ctx, "Label", f.label_id.map(|i| i.to_string()), labels,
                        |f, v| f.label_id = v.parse().ok()) }
                    { Self::select(ctx, "Status", f.is_active.map(|a| a.to_string()), activity,
                        |f, v| f.is_active = v.parse().ok()) }
                    <div class="col-md-3 d-flex align-items-center">
                        <div class="form-check">
                            <input
                                id="filter-public"
                                class="form-check-input"
                                type="checkbox"
                                checked={f.is_public}
                                onchange={on_public}
                            />
                            <label class="form-check-label" for="filter-public">{"Public only"}</label>
                        </div>
                    </div>
                </div>
                <div class="d-flex gap-2 mt-3">
                    <button type="submit" class="btn btn-primary btn-sm">{"Apply"}</button>
                    <button type="button" class="btn btn-outline-secondary btn-sm"
                        onclick={ctx.props().on_reset.reform(|_| ())}>
                        {"Reset"}
                    </button>
                </div>
            </form>
        }
    }
}
