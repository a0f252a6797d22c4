use taskdesk_client::{Notice, NoticeLevel};
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ToastsProps {
    pub notices: Vec<(u64, Notice)>,
    pub on_dismiss: Callback<u64>,
}

#[function_component(Toasts)]
pub fn toasts(p: &ToastsProps) -> Html {
    html! {
        <div class="toast-stack">
            { for p.notices.iter().map(|(id, n)| {
                let id = *id;
                let color = match n.level {
                    NoticeLevel::Success => "text-bg-success",
                    NoticeLevel::Error => "text-bg-danger",
                };
                html! {
                    <div key={id} class={classes!("toast", "show", "mb-2", color)} role="alert">
                        <div class="d-flex">
                            <div class="toast-body">{ &n.text }</div>
                            <button
                                type="button"
                                class="btn-close btn-close-white me-2 m-auto"
                                aria-label="Close"
                                onclick={p.on_dismiss.reform(move |_| id)}
                            >
                            </button>
                        </div>
                    </div>
                }
            }) }
        </div>
    }
}
