//! State of a list page, and its mapping to and from the URL query
//!
//! A `ListView` is only ever changed through `ViewAction`s. The URL is derived
//! from it on every change and read back once, when the page is opened. Pages
//! are zero-based in the view and one-based in the URL.

use std::{collections::HashMap, fmt::Debug, str::FromStr};

use chrono::NaiveDate;
use reqwest::Url;

use crate::api::{CatalogFilter, ListQuery, Sort, SortDirection, TaskFilter};

/// Page sizes offered to the user
pub const PAGE_SIZES: [usize; 5] = [5, 10, 20, 50, 100];

const PAGE_KEY: &str = "page";
const SIZE_KEY: &str = "size";
const SORT_BY_KEY: &str = "sortBy";
const DIRECTION_KEY: &str = "direction";
const VIEW_KEYS: [&str; 4] = [PAGE_KEY, SIZE_KEY, SORT_BY_KEY, DIRECTION_KEY];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Recognized query parameters of a URL, first occurrence winning
#[derive(Clone, Debug, Default)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Params
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = HashMap::new();
        for (k, v) in pairs {
            map.entry(k.into()).or_insert_with(|| v.into());
        }
        Params(map)
    }

    pub fn from_url(url: &Url) -> Params {
        Params::from_pairs(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())))
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).filter(|v| !v.trim().is_empty()).cloned()
    }

    /// Ids and other values with a strict textual form
    pub fn parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.0.get(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        self.0
            .get(key)
            .and_then(|v| NaiveDate::parse_from_str(v.trim(), DATE_FORMAT).ok())
    }

    pub fn boolean(&self, key: &str) -> Option<bool> {
        match self.0.get(key).map(|v| v.trim()) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }
}

/// Query parameters being written, skipping empty values
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParamsOut(Vec<(String, String)>);

impl ParamsOut {
    pub fn text(&mut self, key: &str, value: &Option<String>) {
        if let Some(v) = value.as_ref().filter(|v| !v.trim().is_empty()) {
            self.0.push((String::from(key), v.clone()));
        }
    }

    pub fn display<T: ToString>(&mut self, key: &str, value: &Option<T>) {
        if let Some(v) = value {
            self.0.push((String::from(key), v.to_string()));
        }
    }

    pub fn date(&mut self, key: &str, value: &Option<NaiveDate>) {
        if let Some(d) = value {
            self.0
                .push((String::from(key), d.format(DATE_FORMAT).to_string()));
        }
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

/// A filter whose fields live in the URL query
pub trait UrlFilter: Clone + Debug + Default + PartialEq {
    /// Every query key the filter reads or writes
    const KEYS: &'static [&'static str];

    /// Reads the filter, each invalid or missing value falling back to its default
    fn read(params: &Params) -> Self;

    /// Writes the non-default fields
    fn write(&self, out: &mut ParamsOut);
}

impl UrlFilter for TaskFilter {
    const KEYS: &'static [&'static str] = &[
        "title",
        "description",
        "projectId",
        "taskStageId",
        "taskPriorityId",
        "startDateFrom",
        "startDateTo",
        "deadlineFrom",
        "deadlineTo",
        "isPublic",
        "isActive",
        "assignedUserId",
        "labelId",
    ];

    fn read(p: &Params) -> TaskFilter {
        TaskFilter {
            title: p.text("title"),
            description: p.text("description"),
            project_id: p.parsed("projectId"),
            task_stage_id: p.parsed("taskStageId"),
            task_priority_id: p.parsed("taskPriorityId"),
            start_date_from: p.date("startDateFrom"),
            start_date_to: p.date("startDateTo"),
            deadline_from: p.date("deadlineFrom"),
            deadline_to: p.date("deadlineTo"),
            is_public: p.boolean("isPublic").unwrap_or(true),
            is_active: p.boolean("isActive"),
            assigned_user_id: p.parsed("assignedUserId"),
            label_id: p.parsed("labelId"),
        }
    }

    fn write(&self, out: &mut ParamsOut) {
        out.text("title", &self.title);
        out.text("description", &self.description);
        out.display("projectId", &self.project_id);
        out.display("taskStageId", &self.task_stage_id);
        out.display("taskPriorityId", &self.task_priority_id);
        out.date("startDateFrom", &self.start_date_from);
        out.date("startDateTo", &self.start_date_to);
        out.date("deadlineFrom", &self.deadline_from);
        out.date("deadlineTo", &self.deadline_to);
        out.display("isPublic", &(!self.is_public).then_some(false));
        out.display("isActive", &self.is_active);
        out.display("assignedUserId", &self.assigned_user_id);
        out.display("labelId", &self.label_id);
    }
}

impl UrlFilter for CatalogFilter {
    const KEYS: &'static [&'static str] = &["name", "color", "createdFrom", "createdTo"];

    fn read(p: &Params) -> CatalogFilter {
        CatalogFilter {
            name: p.text("name"),
            color: p.text("color"),
            created_from: p.date("createdFrom"),
            created_to: p.date("createdTo"),
        }
    }

    fn write(&self, out: &mut ParamsOut) {
        out.text("name", &self.name);
        out.text("color", &self.color);
        out.date("createdFrom", &self.created_from);
        out.date("createdTo", &self.created_to);
    }
}

/// Defaults and allowed sort fields of one list page
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ListDefaults {
    pub size: usize,
    pub sort_by: &'static str,
    pub direction: SortDirection,
    pub sortable: &'static [&'static str],
}

impl ListDefaults {
    pub const TASKS: ListDefaults = ListDefaults {
        size: 5,
        sort_by: "created_at",
        direction: SortDirection::Desc,
        sortable: &["created_at", "title", "start_date", "deadline"],
    };

    pub const LABELS: ListDefaults = ListDefaults {
        size: 10,
        sort_by: "id",
        direction: SortDirection::Asc,
        sortable: &["id", "name", "createdAt"],
    };

    pub const PRIORITIES: ListDefaults = ListDefaults {
        size: 10,
        sort_by: "id",
        direction: SortDirection::Asc,
        sortable: &["id", "name", "sortOrder"],
    };

    pub fn sort(&self) -> Sort {
        Sort::new(self.sort_by, self.direction)
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        self.sortable.contains(&field)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ViewAction<F> {
    /// Replaces the filter and goes back to the first page
    SetFilter(F),

    /// Zero-based
    SetPage(usize),

    /// Changes the page size and goes back to the first page
    SetSize(usize),

    /// Sorts by a field, toggling the direction if it already is the sort field
    SortBy(String),

    Reset,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListView<F> {
    pub filter: F,

    /// Zero-based
    pub page: usize,

    pub size: usize,
    pub sort: Sort,
    defaults: ListDefaults,
}

impl<F: UrlFilter> ListView<F> {
    pub fn new(defaults: ListDefaults) -> ListView<F> {
        ListView {
            filter: F::default(),
            page: 0,
            size: defaults.size,
            sort: defaults.sort(),
            defaults,
        }
    }

    pub fn defaults(&self) -> &ListDefaults {
        &self.defaults
    }

    pub fn is_default(&self) -> bool {
        *self == ListView::new(self.defaults)
    }

    pub fn apply(&mut self, action: ViewAction<F>) {
        match action {
            ViewAction::SetFilter(f) => {
                self.filter = f;
                self.page = 0;
            }
            ViewAction::SetPage(p) => self.page = p,
            ViewAction::SetSize(s) if s > 0 => {
                self.size = s;
                self.page = 0;
            }
            ViewAction::SetSize(_) => (),
            ViewAction::SortBy(field) if self.defaults.is_sortable(&field) => {
                self.sort = if self.sort.by == field {
                    Sort::new(field, self.sort.direction.toggled())
                } else {
                    Sort::new(field, SortDirection::Asc)
                };
                self.page = 0;
            }
            ViewAction::SortBy(field) => {
                tracing::debug!(%field, "ignoring sort by a field that is not sortable");
            }
            ViewAction::Reset => *self = ListView::new(self.defaults),
        }
    }

    pub fn with(mut self, action: ViewAction<F>) -> ListView<F> {
        self.apply(action);
        self
    }

    pub fn read(defaults: ListDefaults, params: &Params) -> ListView<F> {
        let page = params
            .parsed::<usize>(PAGE_KEY)
            .filter(|p| *p > 0)
            .map_or(0, |p| p - 1);
        let size = params
            .parsed::<usize>(SIZE_KEY)
            .filter(|s| *s > 0)
            .unwrap_or(defaults.size);
        let sort_by = params
            .text(SORT_BY_KEY)
            .filter(|f| defaults.is_sortable(f))
            .unwrap_or_else(|| String::from(defaults.sort_by));
        let direction = params
            .parsed::<SortDirection>(DIRECTION_KEY)
            .unwrap_or(defaults.direction);
        ListView {
            filter: F::read(params),
            page,
            size,
            sort: Sort::new(sort_by, direction),
            defaults,
        }
    }

    pub fn from_url(defaults: ListDefaults, url: &Url) -> ListView<F> {
        ListView::read(defaults, &Params::from_url(url))
    }

    /// Query parameters of the non-default parts of the view
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut out = ParamsOut::default();
        self.filter.write(&mut out);
        if self.page != 0 {
            out.display(PAGE_KEY, &Some(self.page.saturating_add(1)));
        }
        if self.size != self.defaults.size {
            out.display(SIZE_KEY, &Some(self.size));
        }
        if self.sort.by != self.defaults.sort_by {
            out.display(SORT_BY_KEY, &Some(&self.sort.by));
        }
        if self.sort.direction != self.defaults.direction {
            out.display(DIRECTION_KEY, &Some(self.sort.direction));
        }
        out.into_pairs()
    }

    /// Rewrites the query of `url` for this view, keeping parameters it does not own
    pub fn write_url(&self, url: &mut Url) {
        let foreign = url
            .query_pairs()
            .filter(|(k, _)| !VIEW_KEYS.contains(&k.as_ref()) && !F::KEYS.contains(&k.as_ref()))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect::<Vec<_>>();
        let ours = self.to_query();
        if foreign.is_empty() && ours.is_empty() {
            url.set_query(None);
            return;
        }
        url.query_pairs_mut()
            .clear()
            .extend_pairs(foreign)
            .extend_pairs(ours);
    }

    /// Paging of the request fetching this view, with a zero-based page
    pub fn query(&self) -> ListQuery {
        ListQuery::new(self.page, self.size).sorted(self.sort.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{LabelId, StageId, Uuid};

    use super::*;

    fn url(q: &str) -> Url {
        Url::parse(&format!("http://localhost/tasks{q}")).unwrap()
    }

    #[test]
    fn defaults_leave_the_url_clean() {
        let v = ListView::<TaskFilter>::new(ListDefaults::TASKS);
        assert!(v.to_query().is_empty());
        let mut u = url("?page=1&size=5");
        v.write_url(&mut u);
        assert_eq!(u.query(), None);
    }

    #[test]
    fn page_is_one_based_in_the_url() {
        let v = ListView::<TaskFilter>::new(ListDefaults::TASKS).with(ViewAction::SetPage(2));
        assert_eq!(
            v.to_query(),
            vec![(String::from("page"), String::from("3"))]
        );
        let back = ListView::<TaskFilter>::from_url(ListDefaults::TASKS, &url("?page=3"));
        assert_eq!(back.page, 2);
        assert_eq!(back, v);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let v = ListView::<TaskFilter>::from_url(
            ListDefaults::TASKS,
            &url("?page=zero&size=-3&sortBy=password&direction=sideways&taskStageId=nope&deadlineFrom=03/01/2024&isActive=yes&isPublic=maybe"),
        );
        assert_eq!(v, ListView::new(ListDefaults::TASKS));
    }

    #[test]
    fn values_are_coerced() {
        let stage = Uuid::from_u128(7);
        let v = ListView::<TaskFilter>::from_url(
            ListDefaults::TASKS,
            &url(&format!(
                "?title=report&taskStageId={stage}&deadlineTo=2024-03-01&isPublic=false&isActive=true&sortBy=title&direction=asc&size=20"
            )),
        );
        assert_eq!(v.filter.title.as_deref(), Some("report"));
        assert_eq!(v.filter.task_stage_id, Some(StageId(stage)));
        assert_eq!(v.filter.deadline_to, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(!v.filter.is_public);
        assert_eq!(v.filter.is_active, Some(true));
        assert_eq!(v.sort, Sort::new("title", SortDirection::Asc));
        assert_eq!(v.size, 20);
    }

    #[test]
    fn unknown_keys_survive_writes() {
        let mut u = url("?tab=board&title=old&page=4");
        let v = ListView::<TaskFilter>::from_url(ListDefaults::TASKS, &u)
            .with(ViewAction::SetFilter(TaskFilter {
                title: Some(String::from("new")),
                ..TaskFilter::default()
            }));
        v.write_url(&mut u);
        assert_eq!(u.query(), Some("tab=board&title=new"));
    }

    #[test]
    fn actions() {
        let mut v = ListView::<CatalogFilter>::new(ListDefaults::LABELS).with(ViewAction::SetPage(3));
        v.apply(ViewAction::SortBy(String::from("name")));
        assert_eq!(v.sort, Sort::new("name", SortDirection::Asc));
        assert_eq!(v.page, 0);
        v.apply(ViewAction::SortBy(String::from("name")));
        assert_eq!(v.sort, Sort::new("name", SortDirection::Desc));
        v.apply(ViewAction::SortBy(String::from("sortOrder")));
        assert_eq!(v.sort, Sort::new("name", SortDirection::Desc));

        v.apply(ViewAction::SetPage(2));
        v.apply(ViewAction::SetSize(50));
        assert_eq!((v.page, v.size), (0, 50));

        v.apply(ViewAction::SetPage(1));
        v.apply(ViewAction::SetFilter(CatalogFilter {
            name: Some(String::from("bug")),
            ..CatalogFilter::default()
        }));
        assert_eq!(v.page, 0);

        v.apply(ViewAction::Reset);
        assert!(v.is_default());
    }

    #[test]
    fn request_paging_is_zero_based() {
        let v = ListView::<TaskFilter>::from_url(ListDefaults::TASKS, &url("?page=2&size=10"));
        let q = v.query();
        assert_eq!((q.page, q.size), (1, 10));
        assert_eq!(q.sort, Some(Sort::new("created_at", SortDirection::Desc)));
    }

    const WORDS: [&str; 4] = ["alpha", "beta gamma", "ünïcode", "a&b=c"];
    const DAYS: [u32; 4] = [1, 9, 15, 28];

    #[derive(Clone, Debug, bolero::generator::TypeGenerator)]
    struct RawView {
        title: Option<u8>,
        stage: Option<u128>,
        label: Option<u128>,
        deadline_from: Option<(u8, u8)>,
        is_public: bool,
        is_active: Option<bool>,
        page: u16,
        size: u8,
        sort: Option<(u8, bool)>,
    }

    impl RawView {
        fn view(&self) -> ListView<TaskFilter> {
            let d = ListDefaults::TASKS;
            let filter = TaskFilter {
                title: self.title.map(|t| String::from(WORDS[t as usize % WORDS.len()])),
                task_stage_id: self.stage.map(|s| StageId(Uuid::from_u128(s))),
                label_id: self.label.map(|l| LabelId(Uuid::from_u128(l))),
                deadline_from: self.deadline_from.and_then(|(m, day)| {
                    NaiveDate::from_ymd_opt(2024, 1 + u32::from(m) % 12, DAYS[day as usize % 4])
                }),
                is_public: self.is_public,
                is_active: self.is_active,
                ..TaskFilter::default()
            };
            let mut v = ListView::new(d).with(ViewAction::SetFilter(filter));
            v.apply(ViewAction::SetSize(PAGE_SIZES[self.size as usize % PAGE_SIZES.len()]));
            if let Some((field, desc)) = self.sort {
                v.sort = Sort::new(
                    d.sortable[field as usize % d.sortable.len()],
                    if desc { SortDirection::Desc } else { SortDirection::Asc },
                );
            }
            v.apply(ViewAction::SetPage(usize::from(self.page)));
            v
        }
    }

    #[test]
    fn url_round_trip_preserves_view() {
        bolero::check!()
            .with_type::<RawView>()
            .cloned()
            .for_each(|raw| {
                let v = raw.view();
                let mut u = url("?tab=list");
                v.write_url(&mut u);
                let back = ListView::<TaskFilter>::from_url(ListDefaults::TASKS, &u);
                assert_eq!(back, v);
                assert!(u.query_pairs().any(|(k, v)| k == "tab" && v == "list"));
            });
    }
}
