use taskdesk_client::api::Uuid;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::settings::Settings;

#[derive(Clone, PartialEq, Properties)]
pub struct SettingsMenuProps {
    pub settings: Settings,
    pub on_save: Callback<Settings>,
}

#[function_component(SettingsMenu)]
pub fn settings_menu(p: &SettingsMenuProps) -> Html {
    let api_url = use_node_ref();
    let project = use_node_ref();
    let on_submit = {
        let (api_url, project) = (api_url.clone(), project.clone());
        let current = p.settings.clone();
        p.on_save.reform(move |e: SubmitEvent| {
            e.prevent_default();
            let mut res = current.clone();
            if let Some(input) = api_url.cast::<HtmlInputElement>() {
                let url = input.value().trim().trim_end_matches('/').to_string();
                if !url.is_empty() {
                    res.api_url = url;
                }
            }
            if let Some(input) = project.cast::<HtmlInputElement>() {
                if let Ok(id) = Uuid::try_parse(input.value().trim()) {
                    res.project_id = id;
                }
            }
            res
        })
    };
    html! {
        <div class="dropdown">
            <button
                type="button"
                class="btn btn-light btn-sm bi-gear-fill"
                title="Settings"
                data-bs-toggle="dropdown"
                data-bs-auto-close="outside"
            >
            </button>
            <form class="dropdown-menu dropdown-menu-end p-3" style="min-width: 22rem" onsubmit={on_submit}>
                <div class="mb-2">
                    <label class="form-label small" for="settings-api-url">{"API URL"}</label>
                    <input
                        ref={api_url}
                        id="settings-api-url"
                        class="form-control form-control-sm"
                        type="url"
                        value={p.settings.api_url.clone()}
                    />
                </div>
                <div class="mb-3">
                    <label class="form-label small" for="settings-project">{"Project"}</label>
                    <input
                        ref={project}
                        id="settings-project"
                        class="form-control form-control-sm font-monospace"
                        value={p.settings.project_id.to_string()}
                    />
                </div>
                <button type="submit" class="btn btn-primary btn-sm">{"Save"}</button>
            </form>
        </div>
    }
}
