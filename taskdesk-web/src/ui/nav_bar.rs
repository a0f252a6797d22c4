use yew::prelude::*;

use crate::{route::Route, settings::Settings, ui};

#[derive(Clone, PartialEq, Properties)]
pub struct NavBarProps {
    pub route: Route,
    pub settings: Settings,
    pub on_navigate: Callback<Route>,
    pub on_save_settings: Callback<Settings>,
}

#[function_component(NavBar)]
pub fn nav_bar(p: &NavBarProps) -> Html {
    let link = |route: Route, label: &'static str| {
        let active = match (&p.route, &route) {
            (Route::Task(_) | Route::NewTask, Route::Tasks) => true,
            (a, b) => a == b,
        };
        let href = route.path();
        let onclick = p.on_navigate.reform(move |e: MouseEvent| {
            e.prevent_default();
            route.clone()
        });
        html! {
            <li class="nav-item">
                <a class={classes!("nav-link", active.then_some("active"))} {href} {onclick}>
                    { label }
                </a>
            </li>
        }
    };
    html! {
        <nav class="navbar navbar-expand bg-body-tertiary border-bottom px-3">
            <span class="navbar-brand">{"taskdesk"}</span>
            <ul class="navbar-nav me-auto">
                { link(Route::Tasks, "Tasks") }
                { link(Route::Labels, "Labels") }
                { link(Route::Priorities, "Priorities") }
            </ul>
            <ui::SettingsMenu settings={p.settings.clone()} on_save={p.on_save_settings.clone()} />
        </nav>
    }
}
