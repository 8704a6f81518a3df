use crate::components::ui::{Card, CardContent};
use crate::models::{IdeaStatus, Priority};
use crate::stats::IdeaStats;
use leptos::prelude::*;
use strum::IntoEnumIterator;

fn status_accent(status: IdeaStatus) -> &'static str {
    match status {
        IdeaStatus::InProgress => "text-orange-600",
        IdeaStatus::Completed => "text-green-600",
        IdeaStatus::OnHold => "text-muted-foreground",
    }
}

#[component]
pub fn StatsPanel(#[prop(into)] stats: Signal<IdeaStats>) -> impl IntoView {
    let tiles = IdeaStatus::iter()
        .map(|status| {
            view! {
                <Card class="py-4">
                    <CardContent class="px-4">
                        <p class="text-xs font-medium text-muted-foreground">{status.label()}</p>
                        <p class=format!("text-2xl font-bold {}", status_accent(status))>
                            {move || stats.get().status_count(status)}
                        </p>
                    </CardContent>
                </Card>
            }
        })
        .collect_view();

    let priority_line = move || {
        let s = stats.get();
        let mut parts: Vec<String> = Priority::iter()
            .map(|p| format!("{p}: {}", s.priority_count(p)))
            .collect();
        if s.no_priority > 0 {
            parts.push(format!("none: {}", s.no_priority));
        }
        parts.join(" · ")
    };

    view! {
        <section class="flex flex-col gap-2">
            <div class="grid grid-cols-1 gap-3 sm:grid-cols-3">{tiles}</div>
            <p class="text-xs text-muted-foreground">
                {move || format!("{} ideas", stats.get().total)}
                " · "
                {priority_line}
            </p>
        </section>
    }
}
