use taskdesk_client::{
    pagination::{page_range, summary, PageItem},
    view::PAGE_SIZES,
};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct PaginationProps {
    /// Zero-based
    pub page: usize,
    pub size: usize,
    pub total_pages: usize,
    pub total_elements: usize,
    pub on_page: Callback<usize>,
    pub on_size: Callback<usize>,
}

#[function_component(Pagination)]
pub fn pagination(p: &PaginationProps) -> Html {
    let on_size = p.on_size.reform(|e: Event| {
        e.target_unchecked_into::<HtmlSelectElement>()
            .value()
            .parse()
            .unwrap_or(0)
    });
    let page_link = |target: usize, label: Html, disabled: bool, active: bool| {
        html! {
            <li class={classes!("page-item", disabled.then_some("disabled"), active.then_some("active"))}>
                <button
                    type="button"
                    class="page-link"
                    disabled={disabled}
                    onclick={p.on_page.reform(move |_| target)}
                >
                    { label }
                </button>
            </li>
        }
    };
    let last = p.total_pages.saturating_sub(1);
    html! {
        <div class="d-flex flex-wrap justify-content-between align-items-center gap-2 my-3">
            <div class="d-flex align-items-center gap-2">
                <span class="text-muted small">{"Show rows"}</span>
                <select class="form-select form-select-sm w-auto" onchange={on_size}>
                    { for PAGE_SIZES.iter().map(|s| html! {
                        <option value={s.to_string()} selected={*s == p.size}>{ s }</option>
                    }) }
                </select>
                <span class="text-muted small">
                    { summary(p.page, p.size, p.total_elements) }
                </span>
            </div>
            <ul class="pagination pagination-sm mb-0">
                { page_link(p.page.saturating_sub(1), html! {"Previous"}, p.page == 0, false) }
                { for page_range(p.page, p.total_pages).into_iter().map(|item| match item {
                    PageItem::Page(i) => page_link(i, html! { { i + 1 } }, false, i == p.page),
                    PageItem::Ellipsis => html! {
                        <li class="page-item disabled"><span class="page-link">{"…"}</span></li>
                    },
                }) }
                { page_link((p.page + 1).min(last), html! {"Next"}, p.page >= last, false) }
            </ul>
        </div>
    }
}
