use reqwest::Url;
use taskdesk_client::api::TaskId;
use wasm_bindgen::JsValue;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Route {
    Tasks,
    NewTask,
    Task(TaskId),
    Labels,
    Priorities,
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        match segments.as_slice() {
            [] | ["tasks"] => Route::Tasks,
            ["tasks", "new"] => Route::NewTask,
            ["tasks", id] => match id.parse() {
                Ok(id) => Route::Task(id),
                Err(_) => Route::NotFound,
            },
            ["labels"] => Route::Labels,
            ["priorities"] => Route::Priorities,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Tasks | Route::NotFound => String::from("/tasks"),
            Route::NewTask => String::from("/tasks/new"),
            Route::Task(id) => format!("/tasks/{id}"),
            Route::Labels => String::from("/labels"),
            Route::Priorities => String::from("/priorities"),
        }
    }

    pub fn current() -> Route {
        current_url().map_or(Route::Tasks, |u| Route::parse(u.path()))
    }

    /// Opens the route, adding a history entry
    pub fn push(&self) {
        let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
            return;
        };
        if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(&self.path())) {
            tracing::error!("failed pushing history state: {:?}", e);
        }
    }
}

pub fn current_url() -> Option<Url> {
    let href = web_sys::window()?.location().href().ok()?;
    Url::parse(&href).ok()
}

/// Replaces the address bar URL without adding a history entry
pub fn replace_url(url: &Url) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(url.as_str())) {
        tracing::error!("failed replacing history state: {:?}", e);
    }
}
