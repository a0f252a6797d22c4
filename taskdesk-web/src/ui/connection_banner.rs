use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ConnectionBannerProps {
    /// Error shown while the catalogs could not be loaded
    pub error: Option<String>,
    pub on_retry: Callback<()>,
}

#[function_component(ConnectionBanner)]
pub fn connection_banner(p: &ConnectionBannerProps) -> Html {
    let Some(error) = &p.error else {
        return html! {};
    };
    html! {
        <div class="alert alert-warning d-flex align-items-center m-3" role="alert">
            <span class="bi-wifi-off me-2" aria-hidden="true"></span>
            <div class="flex-grow-1">{ error }</div>
            <button type="button" class="btn btn-sm btn-outline-dark" onclick={p.on_retry.reform(|_| ())}>
                {"Retry"}
            </button>
        </div>
    }
}
