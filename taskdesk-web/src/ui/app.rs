use std::rc::Rc;

use taskdesk_client::{api::Error, Lookups, Notice};
use wasm_bindgen::{closure::Closure, JsCast};
use yew::prelude::*;

use crate::{api::Api, route::Route, settings::Settings, ui};

/// Notices kept on screen at once
const MAX_NOTICES: usize = 5;

pub enum AppMsg {
    Navigate(Route),
    HistoryChanged,

    ReloadLookups,
    LookupsLoaded(Result<Lookups, Error>),

    Notify(Notice),
    Dismiss(u64),

    SaveSettings(Settings),
}

pub struct App {
    settings: Settings,
    api: Api,
    route: Route,

    /// Bumped whenever the page must be rebuilt from the URL
    mount: u64,

    lookups: Rc<Lookups>,
    lookups_error: Option<String>,
    notices: Vec<(u64, Notice)>,
    next_notice: u64,
    _popstate: Option<Closure<dyn Fn()>>,
}

impl App {
    fn load_lookups(&self, ctx: &Context<Self>) {
        let api = self.api.clone();
        let project = self.settings.project_id;
        ctx.link().send_future(async move {
            AppMsg::LookupsLoaded(Lookups::load(&*api, project).await)
        });
    }

    fn listen_popstate(ctx: &Context<Self>) -> Option<Closure<dyn Fn()>> {
        let link = ctx.link().clone();
        let listener =
            Closure::wrap(Box::new(move || link.send_message(AppMsg::HistoryChanged)) as Box<dyn Fn()>);
        let window = web_sys::window()?;
        if let Err(e) =
            window.add_event_listener_with_callback("popstate", listener.as_ref().unchecked_ref())
        {
            tracing::error!("failed listening to history changes: {:?}", e);
            return None;
        }
        Some(listener)
    }
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let settings = Settings::load();
        let api = Api::new(&settings.api_url);
        let app = App {
            settings,
            api,
            route: Route::current(),
            mount: 0,
            lookups: Rc::new(Lookups::default()),
            lookups_error: None,
            notices: Vec::new(),
            next_notice: 0,
            _popstate: Self::listen_popstate(ctx),
        };
        app.load_lookups(ctx);
        app
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::Navigate(route) => {
                if route != self.route || matches!(route, Route::Tasks) {
                    route.push();
                    self.route = route;
                    self.mount += 1;
                }
            }
            AppMsg::HistoryChanged => {
                self.route = Route::current();
                self.mount += 1;
            }
            AppMsg::ReloadLookups => self.load_lookups(ctx),
            AppMsg::LookupsLoaded(Ok(lookups)) => {
                self.lookups = Rc::new(lookups);
                self.lookups_error = None;
            }
            AppMsg::LookupsLoaded(Err(err)) => {
                tracing::error!(?err, "failed loading catalogs");
                self.lookups_error = Some(err.user_message());
            }
            AppMsg::Notify(notice) => {
                self.notices.push((self.next_notice, notice));
                self.next_notice += 1;
                if self.notices.len() > MAX_NOTICES {
                    self.notices.remove(0);
                }
            }
            AppMsg::Dismiss(id) => self.notices.retain(|(i, _)| *i != id),
            AppMsg::SaveSettings(settings) => {
                if settings == self.settings {
                    return false;
                }
                settings.save();
                if settings.api_url != self.settings.api_url {
                    self.api = Api::new(&settings.api_url);
                }
                self.settings = settings;
                self.mount += 1;
                self.load_lookups(ctx);
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_notice = link.callback(AppMsg::Notify);
        let on_lookups_changed = link.callback(|_| AppMsg::ReloadLookups);
        let page = match &self.route {
            Route::Tasks => html! {
                <ui::TaskList
                    key={self.mount}
                    api={self.api.clone()}
                    lookups={self.lookups.clone()}
                    on_open={link.callback(|id| AppMsg::Navigate(Route::Task(id)))}
                    on_new={link.callback(|_| AppMsg::Navigate(Route::NewTask))}
                    {on_notice}
                />
            },
            Route::NewTask => html! {
                <ui::NewTaskPage
                    key={self.mount}
                    api={self.api.clone()}
                    project={self.settings.project_id}
                    lookups={self.lookups.clone()}
                    on_created={link.callback(|id| AppMsg::Navigate(Route::Task(id)))}
                    on_cancel={link.callback(|_| AppMsg::Navigate(Route::Tasks))}
                    {on_notice}
                    on_stages_changed={on_lookups_changed}
                />
            },
            Route::Task(id) => html! {
                <ui::TaskDetail
                    key={self.mount}
                    api={self.api.clone()}
                    task={*id}
                    project={self.settings.project_id}
                    lookups={self.lookups.clone()}
                    on_back={link.callback(|_| AppMsg::Navigate(Route::Tasks))}
                    {on_notice}
                    on_stages_changed={on_lookups_changed}
                />
            },
            Route::Labels => html! {
                <ui::CatalogPage<ui::LabelCatalog>
                    key={self.mount}
                    api={self.api.clone()}
                    {on_notice}
                    on_changed={on_lookups_changed}
                />
            },
            Route::Priorities => html! {
                <ui::CatalogPage<ui::PriorityCatalog>
                    key={self.mount}
                    api={self.api.clone()}
                    {on_notice}
                    on_changed={on_lookups_changed}
                />
            },
            Route::NotFound => html! {
                <div class="container p-5 text-center">
                    <h1 class="h4">{"Page not found"}</h1>
                    <button type="button" class="btn btn-primary btn-sm mt-3"
                        onclick={link.callback(|_| AppMsg::Navigate(Route::Tasks))}>
                        {"Back to tasks"}
                    </button>
                </div>
            },
        };
        html! {
            <>
                <ui::NavBar
                    route={self.route.clone()}
                    settings={self.settings.clone()}
                    on_navigate={link.callback(AppMsg::Navigate)}
                    on_save_settings={link.callback(AppMsg::SaveSettings)}
                />
                <ui::ConnectionBanner
                    error={self.lookups_error.clone()}
                    on_retry={link.callback(|_| AppMsg::ReloadLookups)}
                />
                { page }
                <ui::Toasts notices={self.notices.clone()} on_dismiss={link.callback(AppMsg::Dismiss)} />
            </>
        }
    }
}
