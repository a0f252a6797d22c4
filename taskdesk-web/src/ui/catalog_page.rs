use std::marker::PhantomData;

use taskdesk_client::{
    api::{CatalogFilter, Error, Label, NewLabel, NewPriority, Page, Priority, Resource, Time},
    ListDefaults, ListView, Notice, ViewAction,
};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::{api::Api, route, ui};

/// Fields of the create and edit form, shared by every catalog
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogDraft {
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    pub sort_order: i64,
}

/// A catalog managed through a paginated admin page
pub trait CatalogKind: 'static {
    type Item: Resource<Filter = CatalogFilter, New = Self::Form, Update = Self::Form> + PartialEq;
    type Form;

    const TITLE: &'static str;
    const NOUN: &'static str;
    const DEFAULTS: ListDefaults;
    const HAS_SORT_ORDER: bool;

    fn name(item: &Self::Item) -> &str;
    fn color(item: &Self::Item) -> &str;
    fn description(item: &Self::Item) -> Option<&str>;
    fn created_at(item: &Self::Item) -> Option<Time>;
    fn draft(item: &Self::Item) -> CatalogDraft;
    fn form(draft: &CatalogDraft) -> Self::Form;
}

pub struct LabelCatalog;

impl CatalogKind for LabelCatalog {
    type Item = Label;
    type Form = NewLabel;

    const TITLE: &'static str = "Labels";
    const NOUN: &'static str = "label";
    const DEFAULTS: ListDefaults = ListDefaults::LABELS;
    const HAS_SORT_ORDER: bool = false;

    fn name(l: &Label) -> &str {
        &l.name
    }

    fn color(l: &Label) -> &str {
        &l.color
    }

    fn description(l: &Label) -> Option<&str> {
        l.description.as_deref()
    }

    fn created_at(l: &Label) -> Option<Time> {
        l.created_at
    }

    fn draft(l: &Label) -> CatalogDraft {
        CatalogDraft {
            name: l.name.clone(),
            color: l.color.clone(),
            description: l.description.clone(),
            sort_order: 0,
        }
    }

    fn form(d: &CatalogDraft) -> NewLabel {
        NewLabel {
            name: d.name.trim().to_string(),
            color: d.color.clone(),
            description: d.description.clone(),
        }
    }
}

pub struct PriorityCatalog;

impl CatalogKind for PriorityCatalog {
    type Item = Priority;
    type Form = NewPriority;

    const TITLE: &'static str = "Priorities";
    const NOUN: &'static str = "priority";
    const DEFAULTS: ListDefaults = ListDefaults::PRIORITIES;
    const HAS_SORT_ORDER: bool = true;

    fn name(p: &Priority) -> &str {
        &p.name
    }

    fn color(p: &Priority) -> &str {
        &p.color
    }

    fn description(p: &Priority) -> Option<&str> {
        p.description.as_deref()
    }

    fn created_at(p: &Priority) -> Option<Time> {
        p.created_at
    }

    fn draft(p: &Priority) -> CatalogDraft {
        CatalogDraft {
            name: p.name.clone(),
            color: p.color.clone(),
            description: p.description.clone(),
            sort_order: p.sort_order,
        }
    }

    fn form(d: &CatalogDraft) -> NewPriority {
        NewPriority {
            name: d.name.trim().to_string(),
            color: d.color.clone(),
            description: d.description.clone(),
            sort_order: d.sort_order,
        }
    }
}

#[derive(Clone, PartialEq, Properties)]
pub struct CatalogPageProps {
    pub api: Api,
    pub on_notice: Callback<Notice>,

    /// Fired after any successful write, so that lookups get refreshed
    pub on_changed: Callback<()>,
}

pub enum CatalogMsg<K: CatalogKind> {
    View(ViewAction<CatalogFilter>),
    Loaded(u64, Result<Page<K::Item>, Error>),
    StartCreate,
    StartEdit(<K::Item as Resource>::Id),
    EditDraft(Box<dyn FnOnce(&mut CatalogDraft)>),
    Cancel,
    Save,
    Saved(Result<K::Item, Error>),
    Delete(<K::Item as Resource>::Id),
    Deleted(Result<(), Error>),
}

enum Editing<Id> {
    New,
    Existing(Id),
}

/// Paginated list of a catalog, with its own create, edit and delete forms
pub struct CatalogPage<K: CatalogKind> {
    view: ListView<CatalogFilter>,
    page: Option<Page<K::Item>>,
    loading: bool,
    generation: u64,
    editing: Option<(Editing<<K::Item as Resource>::Id>, CatalogDraft)>,
    saving: bool,
    _kind: PhantomData<K>,
}

impl<K: CatalogKind> CatalogPage<K> {
    fn fetch(&mut self, ctx: &Context<Self>) {
        self.generation += 1;
        self.loading = true;
        let generation = self.generation;
        let api = ctx.props().api.clone();
        let filter = self.view.filter.clone();
        let query = self.view.query();
        ctx.link().send_future(async move {
            CatalogMsg::Loaded(generation, api.filter::<K::Item>(&filter, &query).await)
        });
    }

    fn sync_url(&self) {
        if let Some(mut url) = route::current_url() {
            self.view.write_url(&mut url);
            route::replace_url(&url);
        }
    }

    fn view_form(&self, ctx: &Context<Self>) -> Html {
        let Some((editing, draft)) = &self.editing else {
            return html! {};
        };
        let link = ctx.link();
        let edit = |set: fn(&mut CatalogDraft, String)| {
            link.callback(move |e: Event| {
                let v = e.target_unchecked_into::<HtmlInputElement>().value();
                CatalogMsg::EditDraft(Box::new(move |d| set(d, v)))
            })
        };
        let title = match editing {
            Editing::New => format!("New {}", K::NOUN),
            Editing::Existing(_) => format!("Edit {}", K::NOUN),
        };
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            CatalogMsg::Save
        });
        html! {
            <form class="card card-body mb-3" {onsubmit}>
                <h2 class="h6">{ title }</h2>
                <div class="row g-2">
                    <div class="col-md-4">
                        <input class="form-control form-control-sm" placeholder="Name" required=true
                            value={draft.name.clone()}
                            onchange={edit(|d, v| d.name = v)} />
                    </div>
                    <div class="col-md-2">
                        <input class="form-control form-control-sm form-control-color" type="color"
                            value={draft.color.clone()}
                            onchange={edit(|d, v| d.color = v)} />
                    </div>
                    <div class="col-md-4">
                        <input class="form-control form-control-sm" placeholder="Description"
                            value={draft.description.clone().unwrap_or_default()}
                            onchange={edit(|d, v| d.description = ui::input_text(v))} />
                    </div>
                    if K::HAS_SORT_ORDER {
                        <div class="col-md-2">
                            <input class="form-control form-control-sm" type="number" placeholder="Sort order"
                                value={draft.sort_order.to_string()}
                                onchange={edit(|d, v| d.sort_order = v.trim().parse().unwrap_or(d.sort_order))} />
                        </div>
                    }
                </div>
                <div class="d-flex gap-2 mt-3">
                    <button type="submit" class="btn btn-primary btn-sm" disabled={self.saving}>{"Save"}</button>
                    <button type="button" class="btn btn-outline-secondary btn-sm"
                        onclick={link.callback(|_| CatalogMsg::Cancel)}>
                        {"Cancel"}
                    </button>
                </div>
            </form>
        }
    }

    fn view_table(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let items = self.page.as_ref().map_or(&[][..], |p| &p.items[..]);
        if items.is_empty() {
            return html! {
                <p class="text-muted fst-italic text-center p-4">{ format!("No {} found", K::TITLE.to_lowercase()) }</p>
            };
        }
        let header = |field: &'static str, label: &'static str| {
            if !self.view.defaults().is_sortable(field) {
                return html! { <th>{ label }</th> };
            }
            let icon = (self.view.sort.by == field).then(|| self.view.sort.direction.as_str());
            html! {
                <th class="sortable" onclick={link.callback(move |_| CatalogMsg::View(ViewAction::SortBy(String::from(field))))}>
                    { label }
                    if let Some(dir) = icon {
                        <span class="small text-muted ms-1">{ dir }</span>
                    }
                </th>
            }
        };
        html! {
            <table class="table table-hover align-middle">
                <thead>
                    <tr>
                        { header("name", "Name") }
                        <th>{"Color"}</th>
                        <th>{"Description"}</th>
                        if K::HAS_SORT_ORDER {
                            { header("sortOrder", "Sort order") }
                        }
                        { header("createdAt", "Created") }
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    { for items.iter().map(|item| {
                        let id = item.id();
                        html! {
                            <tr key={id.to_string()}>
                                <td>{ K::name(item) }</td>
                                <td>
                                    <span class="color-swatch me-1" style={format!("background-color: {}", K::color(item))}></span>
                                    <code>{ K::color(item) }</code>
                                </td>
                                <td>{ K::description(item).unwrap_or("") }</td>
                                if K::HAS_SORT_ORDER {
                                    <td>{ K::draft(item).sort_order }</td>
                                }
                                <td>{ ui::format_date(&K::created_at(item)) }</td>
                                <td class="text-end">
                                    <button type="button" class="btn btn-light btn-sm bi-pencil me-1" title="Edit"
                                        onclick={link.callback(move |_| CatalogMsg::StartEdit(id))}>
                                    </button>
                                    <button type="button" class="btn btn-light btn-sm bi-trash text-danger" title="Delete"
                                        onclick={link.callback(move |_| CatalogMsg::Delete(id))}>
                                    </button>
                                </td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
        }
    }
}

impl<K: CatalogKind> Component for CatalogPage<K> {
    type Message = CatalogMsg<K>;
    type Properties = CatalogPageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let view = route::current_url().map_or_else(
            || ListView::new(K::DEFAULTS),
            |url| ListView::from_url(K::DEFAULTS, &url),
        );
        let mut res = CatalogPage {
            view,
            page: None,
            loading: false,
            generation: 0,
            editing: None,
            saving: false,
            _kind: PhantomData,
        };
        res.sync_url();
        res.fetch(ctx);
        res
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let p = ctx.props();
        match msg {
            CatalogMsg::View(action) => {
                let before = self.view.clone();
                self.view.apply(action);
                if self.view == before {
                    return false;
                }
                self.sync_url();
                self.fetch(ctx);
            }
            CatalogMsg::Loaded(generation, _) if generation != self.generation => return false,
            CatalogMsg::Loaded(_, res) => {
                self.loading = false;
                match res {
                    Ok(page) => self.page = Some(page),
                    Err(err) => p
                        .on_notice
                        .emit(Notice::failure(&format!("load {}", K::TITLE.to_lowercase()), &err)),
                }
            }
            CatalogMsg::StartCreate => {
                let draft = CatalogDraft {
                    color: String::from("#6c757d"),
                    ..CatalogDraft::default()
                };
                self.editing = Some((Editing::New, draft));
            }
            CatalogMsg::StartEdit(id) => {
                let item = self
                    .page
                    .as_ref()
                    .and_then(|pg| pg.items.iter().find(|i| i.id() == id));
                if let Some(item) = item {
                    self.editing = Some((Editing::Existing(id), K::draft(item)));
                }
            }
            CatalogMsg::EditDraft(edit) => {
                if let Some((_, draft)) = &mut self.editing {
                    edit(draft);
                }
            }
            CatalogMsg::Cancel => self.editing = None,
            CatalogMsg::Save => {
                let Some((editing, draft)) = &self.editing else {
                    return false;
                };
                if draft.name.trim().is_empty() {
                    p.on_notice.emit(Notice::failure(
                        &format!("save this {}", K::NOUN),
                        &Error::Validation(String::from("Name is required")),
                    ));
                    return false;
                }
                let form = K::form(draft);
                let target = match editing {
                    Editing::New => None,
                    Editing::Existing(id) => Some(*id),
                };
                self.saving = true;
                let api = p.api.clone();
                ctx.link().send_future(async move {
                    let res = match target {
                        None => api.create::<K::Item>(&form).await,
                        Some(id) => api.update::<K::Item>(id, &form).await,
                    };
                    CatalogMsg::Saved(res)
                });
            }
            CatalogMsg::Saved(res) => {
                self.saving = false;
                match res {
                    Ok(_) => {
                        self.editing = None;
                        p.on_notice.emit(Notice::success(format!("Saved {}", K::NOUN)));
                        p.on_changed.emit(());
                        self.fetch(ctx);
                    }
                    Err(err) => p
                        .on_notice
                        .emit(Notice::failure(&format!("save this {}", K::NOUN), &err)),
                }
            }
            CatalogMsg::Delete(id) => {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message(&format!("Delete this {}?", K::NOUN)).ok())
                    .unwrap_or(false);
                if !confirmed {
                    return false;
                }
                let api = p.api.clone();
                ctx.link().send_future(async move {
                    CatalogMsg::Deleted(api.delete::<K::Item>(id).await)
                });
            }
            CatalogMsg::Deleted(res) => match res {
                Ok(()) => {
                    p.on_notice.emit(Notice::success(format!("Deleted {}", K::NOUN)));
                    p.on_changed.emit(());
                    if self.page.as_ref().map_or(false, |pg| pg.items.len() == 1) && self.view.page > 0 {
                        ctx.link()
                            .send_message(CatalogMsg::View(ViewAction::SetPage(self.view.page - 1)));
                    } else {
                        self.fetch(ctx);
                    }
                }
                Err(err) => p
                    .on_notice
                    .emit(Notice::failure(&format!("delete this {}", K::NOUN), &err)),
            },
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let (total_pages, total_elements) = self
            .page
            .as_ref()
            .map_or((0, 0), |pg| (pg.total_pages, pg.total_elements));
        html! {
            <div class="container-fluid p-3">
                <div class="d-flex align-items-center mb-3">
                    <h1 class="h4 me-auto mb-0">{ K::TITLE }</h1>
                    if self.loading {
                        <div class="spinner-border spinner-border-sm me-2" role="status"></div>
                    }
                    <button type="button" class="btn btn-primary btn-sm"
                        onclick={link.callback(|_| CatalogMsg::StartCreate)}>
                        <span class="bi-plus-lg me-1" aria-hidden="true"></span>
                        { format!("New {}", K::NOUN) }
                    </button>
                </div>
                { self.view_form(ctx) }
                <ui::CatalogFilterBar
                    filter={self.view.filter.clone()}
                    on_apply={link.callback(|f| CatalogMsg::View(ViewAction::SetFilter(f)))}
                    on_reset={link.callback(|_| CatalogMsg::View(ViewAction::Reset))}
                />
                { self.view_table(ctx) }
                <ui::Pagination
                    page={self.view.page}
                    size={self.view.size}
                    {total_pages}
                    {total_elements}
                    on_page={link.callback(|n| CatalogMsg::View(ViewAction::SetPage(n)))}
                    on_size={link.callback(|n| CatalogMsg::View(ViewAction::SetSize(n)))}
                />
            </div>
        }
    }
}
