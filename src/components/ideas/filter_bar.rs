use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input, Select};
use crate::filter::{DateRange, StatusFilter};
use crate::models::IdeaStatus;
use crate::state::{AppContext, DashboardController};
use leptos::prelude::*;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Search box plus status and date-range selects. Every change goes through the
/// controller's debounce.
#[component]
pub fn FilterBar(controller: DashboardController) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let filter = app_state.0.filter;

    let term: RwSignal<String> = RwSignal::new(filter.get_untracked().term);

    // Keep the input and the filter state in step both ways (clearing resets the input).
    Effect::new(move |_| {
        let t = term.get();
        if filter.with_untracked(|f| f.term != t) {
            controller.update_filter(|f| f.term = t);
        }
    });
    Effect::new(move |_| {
        let t = filter.with(|f| f.term.clone());
        if term.get_untracked() != t {
            term.set(t);
        }
    });

    let mut status_options = vec![(StatusFilter::All.as_value(), "All Statuses")];
    status_options.extend(
        IdeaStatus::iter().map(|s| (StatusFilter::Only(s).as_value(), s.label())),
    );
    let date_options: Vec<(&'static str, &'static str)> = DateRange::iter()
        .map(|r| (r.into(), r.label()))
        .collect();

    let status_value = Signal::derive(move || filter.with(|f| f.status.as_value().to_string()));
    let date_value = Signal::derive(move || filter.with(|f| f.date_range.to_string()));

    let on_status = Callback::new(move |v: String| {
        controller.update_filter(|f| f.status = StatusFilter::from_value(&v));
    });
    let on_date = Callback::new(move |v: String| {
        let range = DateRange::from_str(&v).unwrap_or_default();
        controller.update_filter(|f| f.date_range = range);
    });

    view! {
        <div class="flex flex-col gap-2 sm:flex-row sm:items-center">
            <Input
                r#type="search"
                placeholder="Search ideas..."
                bind_value=term
                class="sm:flex-1"
            />
            <Select class="sm:w-44" options=status_options value=status_value on_change=on_status />
            <Select class="sm:w-36" options=date_options value=date_value on_change=on_date />
            <Show when=move || filter.with(|f| f.is_active())>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    on:click=move |_| controller.clear_filters()
                >
                    "Clear"
                </Button>
            </Show>
        </div>
    }
}
