use icons::LoaderCircle;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::tw_merge;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "text-sm [&_p]:leading-relaxed"}
    clx! {Badge, span, "inline-flex items-center rounded-full border px-2 py-0.5 text-xs font-medium whitespace-nowrap"}
}

pub use components::*;

#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <LoaderCircle class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Horizontal bar for a 0..=100 percentage.
#[component]
pub fn ProgressBar(#[prop(into)] percent: Signal<u8>) -> impl IntoView {
    view! {
        <div class="h-2 w-full overflow-hidden rounded-full bg-muted" role="progressbar"
            aria-valuemin="0" aria-valuemax="100" aria-valuenow=move || percent.get()>
            <div
                class="h-full bg-primary transition-[width]"
                style=move || format!("width: {}%", percent.get().min(100))
            ></div>
        </div>
    }
}
