mod activity_timeline;
mod app;
mod catalog_filter;
mod catalog_page;
mod comment_section;
mod connection_banner;
mod nav_bar;
mod pagination;
mod settings_menu;
mod stage_select;
mod subtask_list;
mod task_detail;
mod task_filter;
mod task_form;
mod task_list;
mod task_table;
mod toasts;

pub use activity_timeline::ActivityTimeline;
pub use app::App;
pub use catalog_filter::CatalogFilterBar;
pub use catalog_page::{CatalogPage, LabelCatalog, PriorityCatalog};
pub use comment_section::CommentSection;
pub use connection_banner::ConnectionBanner;
pub use nav_bar::NavBar;
pub use pagination::Pagination;
pub use settings_menu::SettingsMenu;
pub use stage_select::StageSelect;
pub use subtask_list::SubtaskListView;
pub use task_detail::TaskDetail;
pub use task_filter::TaskFilterBar;
pub use task_form::{NewTaskPage, TaskFields};
pub use task_list::TaskList;
pub use task_table::TaskTable;
pub use toasts::Toasts;

use taskdesk_client::api::Time;

/// `Mon dd, yyyy`, or a dash for missing dates
pub fn format_date(t: &Option<Time>) -> String {
    t.map_or_else(|| String::from("-"), |t| t.format("%b %d, %Y").to_string())
}

/// Value of a text input, `None` when blank
pub fn input_text(value: String) -> Option<String> {
    taskdesk_client::api::non_empty(&value)
}

/// Value of a date input
pub fn input_date(value: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
