use std::rc::Rc;

use taskdesk_client::{api::ActivityLog, describe, Lookups};
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ActivityTimelineProps {
    /// `None` while loading
    pub logs: Option<Rc<Vec<ActivityLog>>>,
    pub lookups: Rc<Lookups>,
}

#[function_component(ActivityTimeline)]
pub fn activity_timeline(p: &ActivityTimelineProps) -> Html {
    let Some(logs) = &p.logs else {
        return html! {
            <div class="text-center p-3">
                <div class="spinner-border spinner-border-sm" role="status"></div>
            </div>
        };
    };
    let entries = logs
        .iter()
        .filter_map(|l| describe(l, &p.lookups))
        .collect::<Vec<_>>();
    if entries.is_empty() {
        return html! { <p class="text-muted fst-italic">{"No activity yet"}</p> };
    }
    html! {
        <ul class="list-unstyled">
            { for entries.into_iter().map(|e| html! {
                <li class="d-flex gap-2 mb-3">
                    <span class="timeline-dot bg-primary flex-shrink-0"></span>
                    <div>
                        <div>
                            <strong>{ e.author }</strong>
                            {" "}{ e.headline }
                            <span class="text-muted small ms-2">{ e.when }</span>
                        </div>
                        { for e.details.into_iter().map(|d| html! {
                            <div class="small text-muted">{ d }</div>
                        }) }
                    </div>
                </li>
            }) }
        </ul>
    }
}
