use taskdesk_client::{
    api::{Error, SubtaskId, TaskId},
    Notice, SubtaskList,
};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api::Api;

#[derive(Clone, PartialEq, Properties)]
pub struct SubtaskListProps {
    pub api: Api,
    pub task: TaskId,
    pub on_notice: Callback<Notice>,
}

pub enum SubtaskMsg {
    Loaded(Result<SubtaskList, Error>),
    SetDraft(String),
    Add,
    Toggle(SubtaskId, bool),
    Delete(SubtaskId),

    /// The list after a change, or the error that prevented it
    Changed(&'static str, SubtaskList, Result<(), Error>),
}

/// Checklist of a task
pub struct SubtaskListView {
    list: Option<SubtaskList>,
    draft: String,
    busy: bool,
}

impl SubtaskListView {
    /// Copy of the list to change, the shown list staying as is until the server answered
    fn begin(&mut self) -> Option<SubtaskList> {
        let list = self.list.clone()?;
        self.busy = true;
        Some(list)
    }
}

impl Component for SubtaskListView {
    type Message = SubtaskMsg;
    type Properties = SubtaskListProps;

    fn create(ctx: &Context<Self>) -> Self {
        let api = ctx.props().api.clone();
        let task = ctx.props().task;
        ctx.link().send_future(async move {
            SubtaskMsg::Loaded(SubtaskList::load(&*api, task).await)
        });
        SubtaskListView {
            list: None,
            draft: String::new(),
            busy: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            SubtaskMsg::Loaded(Ok(list)) => self.list = Some(list),
            SubtaskMsg::Loaded(Err(err)) => {
                ctx.props().on_notice.emit(Notice::failure("load subtasks", &err));
            }
            SubtaskMsg::SetDraft(d) => self.draft = d,
            SubtaskMsg::Add => {
                let Some(mut list) = self.begin() else {
                    return false;
                };
                let title = std::mem::take(&mut self.draft);
                let api = ctx.props().api.clone();
                ctx.link().send_future(async move {
                    let res = list.add(&*api, &title).await;
                    SubtaskMsg::Changed("add this subtask", list, res)
                });
            }
            SubtaskMsg::Toggle(id, completed) => {
                let Some(mut list) = self.begin() else {
                    return false;
                };
                let api = ctx.props().api.clone();
                ctx.link().send_future(async move {
                    let res = list.set_completed(&*api, id, completed).await;
                    SubtaskMsg::Changed("update this subtask", list, res)
                });
            }
            SubtaskMsg::Delete(id) => {
                let Some(mut list) = self.begin() else {
                    return false;
                };
                let api = ctx.props().api.clone();
                ctx.link().send_future(async move {
                    let res = list.delete(&*api, id).await;
                    SubtaskMsg::Changed("delete this subtask", list, res)
                });
            }
            SubtaskMsg::Changed(action, list, res) => {
                self.busy = false;
                match res {
                    Ok(()) => self.list = Some(list),
                    Err(err) => ctx.props().on_notice.emit(Notice::failure(action, &err)),
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let Some(list) = &self.list else {
            return html! { <div class="spinner-border spinner-border-sm" role="status"></div> };
        };
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            SubtaskMsg::Add
        });
        html! {
            <div>
                <div class="small text-muted mb-2">
                    { format!("{} of {} done", list.completed(), list.items().len()) }
                </div>
                <ul class="list-group mb-2">
                    { for list.items().iter().map(|s| {
                        let (id, done) = (s.id, s.completed);
                        html! {
                            <li key={id.to_string()} class="list-group-item d-flex align-items-center gap-2">
                                <input class="form-check-input" type="checkbox" checked={done}
                                    disabled={self.busy}
                                    onchange={link.callback(move |_| SubtaskMsg::Toggle(id, !done))} />
                                <span class={classes!("flex-grow-1", done.then_some("text-decoration-line-through text-muted"))}>
                                    { &s.title }
                                </span>
                                <button type="button" class="btn btn-light btn-sm bi-trash" title="Delete"
                                    disabled={self.busy}
                                    onclick={link.callback(move |_| SubtaskMsg::Delete(id))}>
                                </button>
                            </li>
                        }
                    }) }
                </ul>
                <form class="input-group input-group-sm" {onsubmit}>
                    <input class="form-control" placeholder="New subtask"
                        value={self.draft.clone()}
                        oninput={link.callback(|e: InputEvent| {
                            SubtaskMsg::SetDraft(e.target_unchecked_into::<HtmlInputElement>().value())
                        })} />
                    <button type="submit" class="btn btn-outline-primary" disabled={self.busy}>{"Add"}</button>
                </form>
            </div>
        }
    }
}
