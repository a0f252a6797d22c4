use taskdesk_client::api::CatalogFilter;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::ui;

#[derive(Clone, PartialEq, Properties)]
pub struct CatalogFilterBarProps {
    pub filter: CatalogFilter,
    pub on_apply: Callback<CatalogFilter>,
    pub on_reset: Callback<()>,
}

pub enum CatalogFilterMsg {
    Name(Option<String>),
    Color(Option<String>),
    CreatedFrom(Option<chrono::NaiveDate>),
    CreatedTo(Option<chrono::NaiveDate>),
    Apply,
}

pub struct CatalogFilterBar {
    draft: CatalogFilter,
}

fn input_value(e: Event) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

impl Component for CatalogFilterBar {
    type Message = CatalogFilterMsg;
    type Properties = CatalogFilterBarProps;

    fn create(ctx: &Context<Self>) -> Self {
        CatalogFilterBar {
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
            CatalogFilterMsg::Name(v) => self.draft.name = v,
            CatalogFilterMsg::Color(v) => self.draft.color = v,
            CatalogFilterMsg::CreatedFrom(v) => self.draft.created_from = v,
            CatalogFilterMsg::CreatedTo(v) => self.draft.created_to = v,
            CatalogFilterMsg::Apply => {
                ctx.props().on_apply.emit(self.draft.clone());
                return false;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let f = &self.draft;
        let link = ctx.link();
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            CatalogFilterMsg::Apply
        });
        let date = |d: &Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        html! {
            <form class="card card-body mb-3" {onsubmit}>
                <div class="row g-2 align-items-end">
                    <div class="col-md-3">
                        <input class="form-control form-control-sm" placeholder="Name"
                            value={f.name.clone().unwrap_or_default()}
                            onchange={link.callback(|e| CatalogFilterMsg::Name(ui::input_text(input_value(e))))} />
                    </div>
                    <div class="col-md-3">
                        <input class="form-control form-control-sm" placeholder="Color"
                            value={f.color.clone().unwrap_or_default()}
                            onchange={link.callback(|e| CatalogFilterMsg::Color(ui::input_text(input_value(e))))} />
                    </div>
                    <div class="col-md-3">
                        <label class="form-label small text-muted mb-0">{"Created from"}</label>
                        <input type="date" class="form-control form-control-sm"
                            value={date(&f.created_from)}
                            onchange={link.callback(|e| CatalogFilterMsg::CreatedFrom(ui::input_date(&input_value(e))))} />
                    </div>
                    <div class="col-md-3">
                        <label class="form-label small text-muted mb-0">{"Created to"}</label>
                        <input type="date" class="form-control form-control-sm"
                            value={date(&f.created_to)}
                            onchange={link.callback(|e| CatalogFilterMsg::CreatedTo(ui::input_date(&input_value(e))))} />
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
