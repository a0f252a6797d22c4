use std::rc::Rc;

use taskdesk_client::{
    api::{Error, NewStage, Stage, StageId, Uuid, STAGE_COLORS},
    Lookups, Notice,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::api::Api;

#[derive(Clone, PartialEq, Properties)]
pub struct StageSelectProps {
    pub api: Api,
    pub lookups: Rc<Lookups>,
    pub project: Uuid,
    pub selected: Option<StageId>,
    pub on_select: Callback<StageId>,

    /// Fired after a stage was added or renamed
    pub on_stages_changed: Callback<()>,
    pub on_notice: Callback<Notice>,
}

pub enum StageSelectMsg {
    Select(String),
    StartAdd,
    StartEdit,
    SetName(String),
    SetColor(&'static str),
    Cancel,
    Save,
    Saved(bool, Result<Stage, Error>),
}

struct StageDraft {
    /// `None` when adding a stage
    id: Option<StageId>,
    name: String,
    color: String,
    sort_order: i64,
}

/// Stage picker of a task, able to add and rename stages in place
pub struct StageSelect {
    draft: Option<StageDraft>,
    saving: bool,
}

impl Component for StageSelect {
    type Message = StageSelectMsg;
    type Properties = StageSelectProps;

    fn create(_ctx: &Context<Self>) -> Self {
        StageSelect {
            draft: None,
            saving: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let p = ctx.props();
        match msg {
            StageSelectMsg::Select(raw) => {
                if let Ok(id) = raw.parse() {
                    p.on_select.emit(id);
                }
                return false;
            }
            StageSelectMsg::StartAdd => {
                self.draft = Some(StageDraft {
                    id: None,
                    name: String::new(),
                    color: String::from(STAGE_COLORS[p.lookups.stages.len() % STAGE_COLORS.len()]),
                    sort_order: p.lookups.next_stage_order(),
                });
            }
            StageSelectMsg::StartEdit => {
                let stage = p.selected.and_then(|id| p.lookups.stage(&id.0));
                if let Some(s) = stage {
                    self.draft = Some(StageDraft {
                        id: Some(s.id),
                        name: s.name.clone(),
                        color: s.color.clone().unwrap_or_else(|| String::from(STAGE_COLORS[0])),
                        sort_order: s.sort_order,
                    });
                }
            }
            StageSelectMsg::SetName(name) => {
                if let Some(d) = &mut self.draft {
                    d.name = name;
                }
            }
            StageSelectMsg::SetColor(color) => {
                if let Some(d) = &mut self.draft {
                    d.color = String::from(color);
                }
            }
            StageSelectMsg::Cancel => self.draft = None,
            StageSelectMsg::Save => {
                let Some(d) = &self.draft else {
                    return false;
                };
                let new = NewStage {
                    name: d.name.trim().to_string(),
                    color: d.color.clone(),
                    project_id: p.project,
                    sort_order: d.sort_order,
                };
                if new.name.is_empty() {
                    return false;
                }
                let id = d.id;
                self.saving = true;
                let api = p.api.clone();
                ctx.link().send_future(async move {
                    match id {
                        None => StageSelectMsg::Saved(true, api.create::<Stage>(&new).await),
                        Some(id) => StageSelectMsg::Saved(false, api.update::<Stage>(id, &new).await),
                    }
                });
            }
            StageSelectMsg::Saved(added, res) => {
                self.saving = false;
                match res {
                    Ok(stage) => {
                        self.draft = None;
                        p.on_stages_changed.emit(());
                        if added {
                            p.on_notice.emit(Notice::success(format!("Added stage {}", stage.name)));
                            p.on_select.emit(stage.id);
                        } else {
                            p.on_notice.emit(Notice::success(format!("Renamed stage to {}", stage.name)));
                        }
                    }
                    Err(err) => {
                        let action = if added { "add this stage" } else { "edit this stage" };
                        p.on_notice.emit(Notice::failure(action, &err));
                    }
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let p = ctx.props();
        let link = ctx.link();
        let selected = p.selected.map(|s| s.to_string()).unwrap_or_default();
        let onchange = link.callback(|e: Event| {
            StageSelectMsg::Select(e.target_unchecked_into::<HtmlSelectElement>().value())
        });
        html! {
            <div>
                <div class="input-group input-group-sm">
                    <select class="form-select" aria-label="Stage" {onchange}>
                        <option value="" selected={selected.is_empty()} disabled=true>{"No stage"}</option>
                        { for p.lookups.stages.iter().map(|s| html! {
                            <option value={s.id.to_string()} selected={s.id.to_string() == selected}>
                                { &s.name }
                            </option>
                        }) }
                    </select>
                    <button type="button" class="btn btn-outline-secondary bi-pencil" title="Edit stage"
                        disabled={p.selected.is_none()}
                        onclick={link.callback(|_| StageSelectMsg::StartEdit)}>
                    </button>
                    <button type="button" class="btn btn-outline-secondary bi-plus-lg" title="Add stage"
                        onclick={link.callback(|_| StageSelectMsg::StartAdd)}>
                    </button>
                </div>
                if let Some(d) = &self.draft {
                    <form class="border rounded p-2 mt-2" onsubmit={link.callback(|e: SubmitEvent| {
                        e.prevent_default();
                        StageSelectMsg::Save
                    })}>
                        <input class="form-control form-control-sm mb-2" placeholder="Stage name"
                            value={d.name.clone()}
                            oninput={link.callback(|e: InputEvent| {
                                StageSelectMsg::SetName(e.target_unchecked_into::<HtmlInputElement>().value())
                            })} />
                        <div class="d-flex flex-wrap gap-1 mb-2">
                            { for STAGE_COLORS.iter().map(|c| {
                                let c: &'static str = c;
                                let border = if d.color == c { "border border-2 border-dark" } else { "" };
                                html! {
                                    <button type="button" title={c}
                                        class={classes!("color-swatch", "p-0", border)}
                                        style={format!("background-color: {c}")}
                                        onclick={link.callback(move |_| StageSelectMsg::SetColor(c))}>
                                    </button>
                                }
                            }) }
                        </div>
                        <div class="d-flex gap-2">
                            <button type="submit" class="btn btn-primary btn-sm" disabled={self.saving}>
                                { if d.id.is_some() { "Save" } else { "Add" } }
                            </button>
                            <button type="button" class="btn btn-outline-secondary btn-sm"
                                onclick={link.callback(|_| StageSelectMsg::Cancel)}>
                                {"Cancel"}
                            </button>
                        </div>
                    </form>
                }
            </div>
        }
    }
}
