use crate::api::ApiClient;
use crate::auth;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, Card, CardContent, CardDescription, CardHeader,
    CardTitle, Input, Label, Spinner,
};
use crate::state::AppContext;
use crate::storage::save_user_to_storage;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Persist the freshly created session and fetch the account it belongs to.
async fn finish_login(app_state: AppContext, api_client: ApiClient) {
    api_client.save_to_storage();
    if let Some(user) = auth::current_user(&api_client).await {
        save_user_to_storage(&user);
        app_state.0.current_user.set(Some(user));
    }
    app_state.0.api_client.set(api_client);
    app_state.0.auth_checked.set(true);
    let _ = window().location().set_href("/");
}

#[component]
fn AuthShell(
    title: &'static str,
    description: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Idea Tracker"</a>
                </div>
                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">{title}</CardTitle>
                        <CardDescription class="text-xs">{description}</CardDescription>
                    </CardHeader>
                    <CardContent>{children()}</CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
fn FormError(error: RwSignal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|e| {
            view! {
                <Alert class="border-destructive/30">
                    <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                </Alert>
            }
        })
    }
}

#[component]
fn SubmitButton(loading: RwSignal<bool>, busy: &'static str, idle: &'static str) -> impl IntoView {
    view! {
        <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || loading.get()>
            <span class="inline-flex items-center gap-2">
                <Show when=move || loading.get()>
                    <Spinner />
                </Show>
                {move || if loading.get() { busy } else { idle }}
            </span>
        </Button>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let mut api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match auth::login(&mut api_client, &email_val, &password_val).await {
                Ok(()) => finish_login(app_state, api_client).await,
                Err(e) => {
                    log::warn!("login failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <AuthShell title="Log in" description="Use your email and password to continue.">
            <form class="flex flex-col gap-3" on:submit=on_submit>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="email" class="text-xs">"Email"</Label>
                    <Input id="email" r#type="email" placeholder="you@example.com" bind_value=email required=true class="h-8" />
                </div>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="password" class="text-xs">"Password"</Label>
                    <Input id="password" r#type="password" placeholder="Enter your password" bind_value=password required=true class="h-8" />
                </div>

                <FormError error=error />
                <SubmitButton loading=loading busy="Signing in..." idle="Sign In" />

                <div class="pt-1 text-xs text-muted-foreground">
                    "No account? "
                    <a class="text-primary underline underline-offset-4" href="/signup">"Sign up"</a>
                </div>
            </form>
        </AuthShell>
    }
}

#[component]
pub fn RegistrationPage() -> impl IntoView {
    let name: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let name_val = name.get_untracked().trim().to_string();
        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let mut api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match auth::register(&mut api_client, &email_val, &password_val, &name_val).await {
                Ok(user) => {
                    log::info!("registered account {}", user.id);
                    finish_login(app_state, api_client).await;
                }
                Err(e) => {
                    log::warn!("registration failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <AuthShell title="Create account" description="Start tracking your ideas.">
            <form class="flex flex-col gap-3" on:submit=on_submit>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="name" class="text-xs">"Name"</Label>
                    <Input id="name" placeholder="Your name" bind_value=name required=true class="h-8" />
                </div>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="email" class="text-xs">"Email"</Label>
                    <Input id="email" r#type="email" placeholder="you@example.com" bind_value=email required=true class="h-8" />
                </div>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="password" class="text-xs">"Password"</Label>
                    <Input id="password" r#type="password" placeholder="At least 8 characters" bind_value=password required=true class="h-8" />
                </div>

                <FormError error=error />
                <SubmitButton loading=loading busy="Creating..." idle="Create Account" />

                <div class="pt-1 text-xs text-muted-foreground">
                    "Already have an account? "
                    <a class="text-primary underline underline-offset-4" href="/login">"Log in"</a>
                </div>
            </form>
        </AuthShell>
    }
}
