use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

const FIELD_CLASS: &str = "placeholder:text-muted-foreground border-input w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50 disabled:cursor-not-allowed disabled:opacity-50";

/// Text input bound to a signal.
///
/// Wired by hand with `prop:value` + `on:input` instead of `bind:value`.
#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] required: bool,
    #[prop(optional)] maxlength: Option<usize>,
    #[prop(into, optional)] disabled: Signal<bool>,
    #[prop(into)] bind_value: RwSignal<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_CLASS, "h-9", class);

    let on_input = move |ev: web_sys::Event| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            bind_value.set(input.value());
        }
    };

    view! {
        <input
            type=r#type
            class=merged_class
            placeholder=placeholder
            id=id
            required=required
            maxlength=maxlength
            disabled=move || disabled.get()
            prop:value=move || bind_value.get()
            on:input=on_input
        />
    }
}

#[component]
pub fn TextArea(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] maxlength: Option<usize>,
    #[prop(into, optional)] disabled: Signal<bool>,
    #[prop(into)] bind_value: RwSignal<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_CLASS, "min-h-20 py-2", class);

    let on_input = move |ev: web_sys::Event| {
        if let Some(area) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        {
            bind_value.set(area.value());
        }
    };

    view! {
        <textarea
            class=merged_class
            placeholder=placeholder
            id=id
            maxlength=maxlength
            disabled=move || disabled.get()
            prop:value=move || bind_value.get()
            on:input=on_input
        ></textarea>
    }
}

/// `<select>` over `(value, label)` pairs, bound to the selected value.
#[component]
pub fn Select(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    options: Vec<(&'static str, &'static str)>,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_CLASS, "h-9 pr-8", class);

    let on_select = move |ev: web_sys::Event| {
        if let Some(select) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
        {
            on_change.run(select.value());
        }
    };

    view! {
        <select class=merged_class id=id prop:value=move || value.get() on:change=on_select>
            {options
                .into_iter()
                .map(|(v, label)| view! { <option value=v selected=move || value.get() == v>{label}</option> })
                .collect_view()}
        </select>
    }
}

#[component]
pub fn Label(
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] html_for: String,
    children: Children,
) -> impl IntoView {
    let class = tw_merge!("flex items-center gap-2 text-sm leading-none font-medium select-none", class);

    view! {
        <label class=class r#for=html_for>
            {children()}
        </label>
    }
}
