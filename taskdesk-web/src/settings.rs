use gloo_storage::{LocalStorage, Storage};
use taskdesk_client::{
    api::{Uuid, DEFAULT_PROJECT_ID},
    DEFAULT_API_URL,
};

const KEY_SETTINGS: &str = "taskdesk-settings";

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Settings {
    pub api_url: String,
    pub project_id: Uuid,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            api_url: String::from(option_env!("TASKDESK_API_URL").unwrap_or(DEFAULT_API_URL)),
            project_id: DEFAULT_PROJECT_ID,
        }
    }
}

impl Settings {
    pub fn load() -> Settings {
        LocalStorage::get(KEY_SETTINGS).unwrap_or_default()
    }

    pub fn save(&self) {
        if let Err(e) = LocalStorage::set(KEY_SETTINGS, self) {
            tracing::error!("failed saving settings to local storage: {:?}", e);
        }
    }
}
