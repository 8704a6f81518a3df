use crate::attachments::format_file_size;
use crate::backend::LocalFile;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader,
    CardTitle, Input, Label, ProgressBar, Select, Spinner, TextArea,
};
use crate::ideas::{submit_idea_edit, submit_new_idea};
use crate::models::{Idea, IdeaDraft, IdeaStatus, MAX_FIELD_CHARS};
use crate::state::{AppContext, DashboardController};
use chrono::Utc;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::str::FromStr;
use strum::IntoEnumIterator;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

async fn read_local_file(file: web_sys::File) -> Result<LocalFile, String> {
    let buf = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("could not read {}: {e:?}", file.name()))?;
    Ok(LocalFile {
        name: file.name(),
        mime_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buf).to_vec(),
    })
}

/// Create form when `editing` is `None`, edit form otherwise.
///
/// Picked files are read into memory right away and uploaded on submit; each pick replaces
/// the previous selection.
#[component]
pub fn IdeaForm(
    editing: Option<Idea>,
    controller: DashboardController,
    on_saved: Callback<(Idea, bool)>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let initial = editing.as_ref().map(IdeaDraft::from_idea).unwrap_or_default();
    let is_edit = editing.is_some();
    let existing = StoredValue::new(editing);

    let title: RwSignal<String> = RwSignal::new(initial.title);
    let description: RwSignal<String> = RwSignal::new(initial.description);
    let status: RwSignal<String> = RwSignal::new(initial.status.to_string());
    let kept_count = initial.attachments.len();
    let kept = StoredValue::new(initial.attachments);
    let unreadable = StoredValue::new(initial.unreadable_attachments);
    let picked: RwSignal<Vec<LocalFile>> = RwSignal::new(vec![]);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving: RwSignal<bool> = RwSignal::new(false);
    let progress: RwSignal<u8> = RwSignal::new(0);

    let on_files = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(list) = input.files() else {
            return;
        };
        let files: Vec<web_sys::File> = (0..list.length()).filter_map(|i| list.get(i)).collect();

        spawn_local(async move {
            let mut read = Vec::with_capacity(files.len());
            for file in files {
                match read_local_file(file).await {
                    Ok(f) => read.push(f),
                    Err(e) => log::warn!("{e}"),
                }
            }
            picked.set(read);
        });
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }

        let draft = IdeaDraft {
            title: title.get_untracked(),
            description: description.get_untracked(),
            status: IdeaStatus::from_str(&status.get_untracked()).unwrap_or_default(),
            attachments: kept.get_value(),
            unreadable_attachments: unreadable.get_value(),
        };
        if let Err(msg) = draft.validate() {
            error.set(Some(msg));
            return;
        }

        let Some(owner_id) = app_state.0.current_user.get_untracked().map(|u| u.id) else {
            controller.force_logout();
            return;
        };

        let client = app_state.0.api_client.get_untracked();
        let files = picked.get_untracked();
        let existing = existing.get_value();

        error.set(None);
        saving.set(true);
        progress.set(0);

        spawn_local(async move {
            let mut report = |p: u8| progress.set(p);
            let result = match &existing {
                Some(idea) => {
                    submit_idea_edit(&client, &client, idea, draft, &files, Utc::now, &mut report)
                        .await
                }
                None => {
                    submit_new_idea(&client, &client, &owner_id, draft, &files, Utc::now, &mut report)
                        .await
                }
            };

            saving.set(false);
            match result {
                Ok(idea) => {
                    let failed = idea.attachments.iter().any(|a| a.upload_error().is_some());
                    on_saved.run((idea, failed));
                }
                Err(e) if e.is_unauthorized() => controller.force_logout(),
                Err(e) => {
                    log::error!("saving idea failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    let status_options: Vec<(&'static str, &'static str)> = IdeaStatus::iter()
        .map(|s| (<&'static str>::from(s), s.label()))
        .collect();
    let status_value = Signal::derive(move || status.get());
    let on_status = Callback::new(move |v: String| status.set(v));

    let remove_picked = move |index: usize| {
        picked.update(|p| {
            if index < p.len() {
                p.remove(index);
            }
        });
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle class="text-lg">{if is_edit { "Edit Idea" } else { "New Idea" }}</CardTitle>
            </CardHeader>
            <CardContent>
                <form class="flex flex-col gap-3" on:submit=on_submit>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="idea-title" class="text-xs">"Title"</Label>
                        <Input
                            id="idea-title"
                            placeholder="What's the idea?"
                            bind_value=title
                            required=true
                            maxlength=MAX_FIELD_CHARS
                            disabled=saving
                        />
                        <span class="self-end text-[11px] text-muted-foreground">
                            {move || format!("{}/{MAX_FIELD_CHARS}", title.with(|t| t.chars().count()))}
                        </span>
                    </div>

                    <div class="flex flex-col gap-1.5">
                        <Label html_for="idea-description" class="text-xs">"Description"</Label>
                        <TextArea
                            id="idea-description"
                            placeholder="Describe it briefly"
                            bind_value=description
                            maxlength=MAX_FIELD_CHARS
                            disabled=saving
                        />
                        <span class="self-end text-[11px] text-muted-foreground">
                            {move || format!("{}/{MAX_FIELD_CHARS}", description.with(|t| t.chars().count()))}
                        </span>
                    </div>

                    <div class="flex flex-col gap-1.5">
                        <Label html_for="idea-status" class="text-xs">"Status"</Label>
                        <Select id="idea-status" options=status_options value=status_value on_change=on_status />
                    </div>

                    <div class="flex flex-col gap-1.5">
                        <Label html_for="idea-files" class="text-xs">"Attachments"</Label>
                        <input
                            id="idea-files"
                            type="file"
                            multiple=true
                            class="text-xs"
                            disabled=move || saving.get()
                            on:change=on_files
                        />
                        {(kept_count > 0).then(|| view! {
                            <span class="text-[11px] text-muted-foreground">
                                {format!("{kept_count} existing attachment(s) kept")}
                            </span>
                        })}
                        <ul class="flex flex-col gap-1">
                            {move || {
                                picked
                                    .get()
                                    .into_iter()
                                    .enumerate()
                                    .map(|(i, f)| {
                                        view! {
                                            <li class="flex items-center gap-2 text-xs">
                                                <span class="min-w-0 flex-1 truncate">{f.name.clone()}</span>
                                                <span class="text-muted-foreground">{format_file_size(f.size())}</span>
                                                <Button
                                                    variant=ButtonVariant::Ghost
                                                    size=ButtonSize::Xs
                                                    attr:r#type="button"
                                                    attr:disabled=move || saving.get()
                                                    on:click=move |_| remove_picked(i)
                                                >
                                                    "Remove"
                                                </Button>
                                            </li>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </ul>
                    </div>

                    <Show when=move || saving.get() && !picked.with(|p| p.is_empty())>
                        <div class="flex flex-col gap-1">
                            <ProgressBar percent=progress />
                            <span class="text-[11px] text-muted-foreground">
                                {move || format!("Uploading... {}%", progress.get())}
                            </span>
                        </div>
                    </Show>

                    {move || error.get().map(|e| view! {
                        <Alert class="border-destructive/30">
                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                        </Alert>
                    })}

                    <div class="flex justify-end gap-2">
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            attr:r#type="button"
                            attr:disabled=move || saving.get()
                            on:click=move |_| on_cancel.run(())
                        >
                            "Cancel"
                        </Button>
                        <Button size=ButtonSize::Sm attr:disabled=move || saving.get()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || saving.get()>
                                    <Spinner />
                                </Show>
                                {move || match (saving.get(), is_edit) {
                                    (true, _) => "Saving...",
                                    (false, true) => "Update Idea",
                                    (false, false) => "Create Idea",
                                }}
                            </span>
                        </Button>
                    </div>
                </form>
            </CardContent>
        </Card>
    }
}
