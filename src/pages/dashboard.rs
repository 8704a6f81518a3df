use crate::components::ideas::{FilterBar, IdeaCard, IdeaForm, StatsPanel};
use crate::components::ui::{Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Spinner};
use crate::ideas::remove_idea;
use crate::models::Idea;
use crate::state::{AppContext, DashboardController};
use crate::stats::IdeaStats;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::set_timeout;
use std::time::Duration;

const NOTICE_MS: u64 = 3000;

#[derive(Clone, Debug, PartialEq)]
enum FormMode {
    Create,
    Edit(Idea),
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let controller = expect_context::<DashboardController>();

    let form: RwSignal<Option<FormMode>> = RwSignal::new(None);
    let notice: RwSignal<Option<String>> = RwSignal::new(None);
    let action_error: RwSignal<Option<String>> = RwSignal::new(None);

    controller.load_ideas();

    // Any change to the snapshot or the filters recomputes the visible list.
    Effect::new(move |_| {
        app_state.0.ideas.track();
        app_state.0.filter.track();
        controller.schedule_filter();
    });

    let stats = Memo::new(move |_| app_state.0.ideas.with(|ideas| IdeaStats::from_ideas(ideas)));

    let show_notice = move |msg: String| {
        notice.set(Some(msg));
        set_timeout(move || notice.set(None), Duration::from_millis(NOTICE_MS));
    };

    let on_saved = Callback::new(move |(idea, upload_failed): (Idea, bool)| {
        let edited = matches!(form.get_untracked(), Some(FormMode::Edit(_)));
        controller.apply_saved(idea);
        form.set(None);
        let mut msg = if edited {
            "Idea updated successfully!".to_string()
        } else {
            "Idea created successfully!".to_string()
        };
        if upload_failed {
            msg.push_str(" Some attachments failed to upload.");
        }
        show_notice(msg);
    });
    let on_cancel = Callback::new(move |_: ()| form.set(None));

    let on_edit = Callback::new(move |idea: Idea| {
        action_error.set(None);
        form.set(Some(FormMode::Edit(idea)));
    });
    let on_delete = Callback::new(move |idea: Idea| {
        action_error.set(None);
        let client = controller.client();
        spawn_local(async move {
            match remove_idea(&client, &client, &idea).await {
                Ok(()) => controller.forget(&idea.id),
                Err(e) if e.is_unauthorized() => controller.force_logout(),
                Err(e) => {
                    log::warn!("deleting idea {} failed: {e}", idea.id);
                    action_error.set(Some(e.to_string()));
                }
            }
        });
    });

    let user_name = move || {
        app_state
            .0
            .current_user
            .with(|u| u.as_ref().map(|u| u.display_name().to_string()).unwrap_or_default())
    };

    let result_count = move || {
        let shown = app_state.0.visible_ideas.with(|v| v.len());
        let total = app_state.0.ideas.with(|v| v.len());
        if app_state.0.filter.with(|f| f.is_active()) {
            format!("Showing {shown} of {total} ideas")
        } else {
            format!("{total} ideas")
        }
    };

    let idea_list = move || {
        let visible = app_state.0.visible_ideas.get();
        if visible.is_empty() {
            let msg = if app_state.0.filter.with(|f| f.is_active()) {
                "No ideas match your filters."
            } else {
                "No ideas yet. Create your first one!"
            };
            return view! { <p class="py-10 text-center text-sm text-muted-foreground">{msg}</p> }
                .into_any();
        }
        view! {
            <div class="grid grid-cols-1 gap-4 md:grid-cols-2 lg:grid-cols-3">
                {visible
                    .into_iter()
                    .map(|idea| view! { <IdeaCard idea=idea on_edit=on_edit on_delete=on_delete /> })
                    .collect_view()}
            </div>
        }
        .into_any()
    };

    view! {
        <div class="min-h-screen bg-background">
            <header class="border-b">
                <div class="mx-auto flex max-w-6xl items-center justify-between px-4 py-4">
                    <div>
                        <h1 class="text-xl font-bold">"Idea Tracker"</h1>
                        <p class="text-xs text-muted-foreground">"Welcome back, " {user_name} "!"</p>
                    </div>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| controller.logout()>
                        "Logout"
                    </Button>
                </div>
            </header>

            <main class="mx-auto flex max-w-6xl flex-col gap-6 px-4 py-6">
                <StatsPanel stats=stats />

                {move || notice.get().map(|msg| view! {
                    <Alert class="border-green-300 bg-green-50">
                        <AlertDescription class="text-green-800 text-xs">{msg}</AlertDescription>
                    </Alert>
                })}
                {move || {
                    app_state.0.ideas_error.get().or_else(|| action_error.get()).map(|e| view! {
                        <Alert class="border-destructive/30">
                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                        </Alert>
                    })
                }}

                <div class="flex items-center justify-between gap-2">
                    <span class="text-xs text-muted-foreground">{result_count}</span>
                    <Show when=move || form.with(|f| f.is_none())>
                        <Button size=ButtonSize::Sm on:click=move |_| form.set(Some(FormMode::Create))>
                            "New Idea"
                        </Button>
                    </Show>
                </div>

                {move || form.get().map(|mode| {
                    let editing = match mode {
                        FormMode::Create => None,
                        FormMode::Edit(idea) => Some(idea),
                    };
                    view! {
                        <IdeaForm editing=editing controller=controller on_saved=on_saved on_cancel=on_cancel />
                    }
                })}

                <FilterBar controller=controller />

                <Show
                    when=move || app_state.0.ideas_loading.get() && app_state.0.ideas.with(|i| i.is_empty())
                    fallback=idea_list
                >
                    <div class="flex justify-center py-10">
                        <Spinner class="size-6" />
                    </div>
                </Show>
            </main>
        </div>
    }
}
