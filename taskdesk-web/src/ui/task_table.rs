use std::rc::Rc;

use taskdesk_client::{
    api::{Sort, SortDirection, Task, TaskId},
    Lookups,
};
use yew::prelude::*;

use crate::ui;

#[derive(Clone, PartialEq, Properties)]
pub struct TaskTableProps {
    pub tasks: Rc<Vec<Task>>,
    pub sort: Sort,
    pub lookups: Rc<Lookups>,
    pub on_sort: Callback<String>,
    pub on_open: Callback<TaskId>,
}

#[function_component(TaskTable)]
pub fn task_table(p: &TaskTableProps) -> Html {
    let header = |field: &'static str, label: &'static str| {
        let icon = (p.sort.by == field).then(|| match p.sort.direction {
            SortDirection::Asc => "bi-caret-up-fill",
            SortDirection::Desc => "bi-caret-down-fill",
        });
        html! {
            <th class="sortable" onclick={p.on_sort.reform(move |_| String::from(field))}>
                { label }
                if let Some(icon) = icon {
                    <span class={classes!(icon, "ms-1")} aria-hidden="true"></span>
                }
            </th>
        }
    };
    if p.tasks.is_empty() {
        return html! {
            <p class="text-muted fst-italic text-center p-4">{"No tasks match these filters"}</p>
        };
    }
    html! {
        <table class="table table-hover align-middle">
            <thead>
                <tr>
                    { header("title", "Title") }
                    <th>{"Stage"}</th>
                    <th>{"Priority"}</th>
                    { header("start_date", "Start") }
                    { header("deadline", "Deadline") }
                    <th>{"Progress"}</th>
                    { header("created_at", "Created") }
                </tr>
            </thead>
            <tbody>
                { for p.tasks.iter().map(|t| {
                    let id = t.id;
                    let stage = t.task_stage_id.and_then(|s| p.lookups.stage(&s.0));
                    let priority = t.task_priority_id.and_then(|s| p.lookups.priority(&s.0));
                    html! {
                        <tr key={id.to_string()} class="sortable" onclick={p.on_open.reform(move |_| id)}>
                            <td>
                                { &t.title }
                                if !t.labels.is_empty() {
                                    <div>
                                        { for t.labels.iter().map(|l| html! {
                                            <span class="badge me-1" style={format!("background-color: {}", l.color)}>
                                                { &l.name }
                                            </span>
                                        }) }
                                    </div>
                                }
                            </td>
                            <td>
                                if let Some(s) = stage {
                                    <span class="color-swatch me-1"
                                        style={format!("background-color: {}", s.color.as_deref().unwrap_or("#adb5bd"))}>
                                    </span>
                                    { &s.name }
                                }
                            </td>
                            <td>
                                if let Some(pr) = priority {
                                    <span class="badge" style={format!("background-color: {}", pr.color)}>{ &pr.name }</span>
                                }
                            </td>
                            <td>{ ui::format_date(&t.start_date) }</td>
                            <td>{ ui::format_date(&t.deadline) }</td>
                            <td>{ format!("{}%", t.progress_percent.unwrap_or(0)) }</td>
                            <td>{ ui::format_date(&t.created_at) }</td>
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}
