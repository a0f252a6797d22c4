use std::rc::Rc;

use taskdesk_client::{
    api::{Error, Page, Task, TaskFilter, TaskId},
    ListDefaults, ListView, Lookups, Notice, ViewAction,
};
use yew::prelude::*;

use crate::{api::Api, route, ui};

#[derive(Clone, PartialEq, Properties)]
pub struct TaskListProps {
    pub api: Api,
    pub lookups: Rc<Lookups>,
    pub on_open: Callback<TaskId>,
    pub on_new: Callback<()>,
    pub on_notice: Callback<Notice>,
}

pub enum TaskListMsg {
    View(ViewAction<TaskFilter>),
    Loaded(u64, Result<Page<Task>, Error>),
    Reload,
}

/// The filterable task list, its state mirrored in the URL query
pub struct TaskList {
    view: ListView<TaskFilter>,
    page: Option<Page<Task>>,
    tasks: Rc<Vec<Task>>,
    loading: bool,

    /// Bumped on every fetch; answers to older fetches are dropped
    generation: u64,
}

impl TaskList {
    fn fetch(&mut self, ctx: &Context<Self>) {
        self.generation += 1;
        self.loading = true;
        let generation = self.generation;
        let api = ctx.props().api.clone();
        let filter = self.view.filter.clone();
        let query = self.view.query();
        ctx.link().send_future(async move {
            TaskListMsg::Loaded(generation, api.filter::<Task>(&filter, &query).await)
        });
    }

    fn sync_url(&self) {
        if let Some(mut url) = route::current_url() {
            self.view.write_url(&mut url);
            route::replace_url(&url);
        }
    }
}

impl Component for TaskList {
    type Message = TaskListMsg;
    type Properties = TaskListProps;

    fn create(ctx: &Context<Self>) -> Self {
        let view = route::current_url().map_or_else(
            || ListView::new(ListDefaults::TASKS),
            |url| ListView::from_url(ListDefaults::TASKS, &url),
        );
        let mut res = TaskList {
            view,
            page: None,
            tasks: Rc::new(Vec::new()),
            loading: false,
            generation: 0,
        };
        res.sync_url();
        res.fetch(ctx);
        res
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().api != old_props.api {
            self.fetch(ctx);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            TaskListMsg::View(action) => {
                let before = self.view.clone();
                self.view.apply(action);
                if self.view == before {
                    return false;
                }
                self.sync_url();
                self.fetch(ctx);
            }
            TaskListMsg::Reload => self.fetch(ctx),
            TaskListMsg::Loaded(generation, _) if generation != self.generation => {
                tracing::debug!(generation, "dropping stale task page");
                return false;
            }
            TaskListMsg::Loaded(_, Ok(page)) => {
                self.loading = false;
                self.tasks = Rc::new(page.items.clone());
                self.page = Some(page);
            }
            TaskListMsg::Loaded(_, Err(err)) => {
                self.loading = false;
                ctx.props().on_notice.emit(Notice::failure("load tasks", &err));
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let p = ctx.props();
        let (total_pages, total_elements) = self
            .page
            .as_ref()
            .map_or((0, 0), |pg| (pg.total_pages, pg.total_elements));
        html! {
            <div class="container-fluid p-3">
                <div class="d-flex align-items-center mb-3">
                    <h1 class="h4 me-auto mb-0">{"Tasks"}</h1>
                    if self.loading {
                        <div class="spinner-border spinner-border-sm me-2" role="status"></div>
                    }
                    <button type="button" class="btn btn-light btn-sm bi-arrow-clockwise" title="Reload"
                        onclick={link.callback(|_| TaskListMsg::Reload)}>
                    </button>
                    <button type="button" class="btn btn-primary btn-sm ms-2 bi-plus-lg"
                        onclick={p.on_new.reform(|_| ())}>
                        {" New task"}
                    </button>
                </div>
                <ui::TaskFilterBar
                    filter={self.view.filter.clone()}
                    lookups={p.lookups.clone()}
                    on_apply={link.callback(|f| TaskListMsg::View(ViewAction::SetFilter(f)))}
                    on_reset={link.callback(|_| TaskListMsg::View(ViewAction::Reset))}
                />
                <ui::TaskTable
                    tasks={self.tasks.clone()}
                    sort={self.view.sort.clone()}
                    lookups={p.lookups.clone()}
                    on_sort={link.callback(|f| TaskListMsg::View(ViewAction::SortBy(f)))}
                    on_open={p.on_open.clone()}
                />
                <ui::Pagination
                    page={self.view.page}
                    size={self.view.size}
                    {total_pages}
                    {total_elements}
                    on_page={link.callback(|n| TaskListMsg::View(ViewAction::SetPage(n)))}
                    on_size={link.callback(|n| TaskListMsg::View(ViewAction::SetSize(n)))}
                />
            </div>
        }
    }
}
