use crate::api::ApiClient;
use crate::attachments::{format_file_size, FileKind};
use crate::backend::FileStore;
use crate::components::ui::{
    Badge, Button, ButtonSize, ButtonVariant, Card, CardContent, CardFooter, CardHeader, CardTitle,
};
use crate::models::{Attachment, Idea, IdeaStatus, Priority};
use crate::state::AppContext;
use leptos::prelude::*;

fn status_badge_class(status: IdeaStatus) -> &'static str {
    match status {
        IdeaStatus::InProgress => "bg-orange-100 text-orange-800",
        IdeaStatus::Completed => "bg-green-100 text-green-800",
        IdeaStatus::OnHold => "bg-muted text-muted-foreground",
    }
}

fn priority_badge_class(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "bg-red-100 text-red-800",
        Priority::Medium => "bg-yellow-100 text-yellow-800",
        Priority::Low => "bg-green-100 text-green-800",
    }
}

/// e.g. `Mar 7, 2025`, in the browser's timezone.
pub(crate) fn format_created(idea: &Idea) -> String {
    idea.created_at
        .with_timezone(&chrono::Local)
        .format("%b %-d, %Y")
        .to_string()
}

#[component]
fn AttachmentRow(attachment: Attachment, client: ApiClient) -> impl IntoView {
    let kind = FileKind::from_mime(attachment.mime_type());
    let size = format_file_size(attachment.file_size());
    let name = attachment.file_name().to_string();

    let links = match attachment.file_id() {
        Some(id) => {
            let view_url = client.file_view_url(id);
            let download_url = client.file_download_url(id);
            view! {
                <a class="text-primary hover:underline" href=view_url target="_blank" rel="noopener">"View"</a>
                <a class="text-primary hover:underline" href=download_url download=name.clone()>"Download"</a>
            }
            .into_any()
        }
        None => {
            let reason = attachment.upload_error().unwrap_or("Upload failed").to_string();
            view! { <span class="text-destructive" title=reason>"Upload failed"</span> }.into_any()
        }
    };

    view! {
        <li class="flex items-center gap-2 text-xs">
            <Badge class="font-mono">{kind.badge()}</Badge>
            <span class="min-w-0 flex-1 truncate" title=name.clone()>{name.clone()}</span>
            <span class="text-muted-foreground">{size}</span>
            {links}
        </li>
    }
}

#[component]
pub fn IdeaCard(
    idea: Idea,
    on_edit: Callback<Idea>,
    on_delete: Callback<Idea>,
) -> impl IntoView {
    let client = expect_context::<AppContext>().0.api_client.get_untracked();
    let confirming: RwSignal<bool> = RwSignal::new(false);

    let idea = StoredValue::new(idea);
    let status = idea.with_value(|i| i.status);
    let priority = idea.with_value(|i| i.priority);
    let category = idea.with_value(|i| i.category.clone());
    let attachments = idea.with_value(|i| i.attachments.clone());

    view! {
        <Card class="gap-3">
            <CardHeader class="w-full">
                <div class="flex w-full items-start justify-between gap-2">
                    <CardTitle class="text-base break-words">{idea.with_value(|i| i.title.clone())}</CardTitle>
                    <Badge class=status_badge_class(status)>{status.label()}</Badge>
                </div>
                <div class="flex flex-wrap items-center gap-1.5 text-xs text-muted-foreground">
                    <span>{idea.with_value(format_created)}</span>
                    {priority.map(|p| view! { <Badge class=priority_badge_class(p)>{p.to_string()}</Badge> })}
                    {category.map(|c| view! { <Badge>{c}</Badge> })}
                </div>
            </CardHeader>

            <CardContent class="flex flex-col gap-3">
                <p class="text-sm whitespace-pre-wrap break-words">{idea.with_value(|i| i.description.clone())}</p>
                {(!attachments.is_empty()).then(|| view! {
                    <ul class="flex flex-col gap-1 border-t pt-2">
                        {attachments
                            .into_iter()
                            .map(|a| view! { <AttachmentRow attachment=a client=client.clone() /> })
                            .collect_view()}
                    </ul>
                })}
            </CardContent>

            <CardFooter class="justify-end">
                <Show
                    when=move || confirming.get()
                    fallback=move || view! {
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Xs
                            on:click=move |_| on_edit.run(idea.get_value())
                        >
                            "Edit"
                        </Button>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Xs
                            class="text-destructive"
                            on:click=move |_| confirming.set(true)
                        >
                            "Delete"
                        </Button>
                    }
                >
                    <span class="text-xs text-muted-foreground">"Delete this idea?"</span>
                    <Button
                        variant=ButtonVariant::Destructive
                        size=ButtonSize::Xs
                        on:click=move |_| {
                            confirming.set(false);
                            on_delete.run(idea.get_value());
                        }
                    >
                        "Delete"
                    </Button>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Xs
                        on:click=move |_| confirming.set(false)
                    >
                        "Cancel"
                    </Button>
                </Show>
            </CardFooter>
        </Card>
    }
}
