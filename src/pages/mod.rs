mod auth;
mod dashboard;

pub use auth::{LoginPage, RegistrationPage};
pub use dashboard::DashboardPage;

use crate::components::ui::Spinner;
use crate::state::AppContext;
use leptos::prelude::*;

/// Dashboard for a known user, a spinner while the stored session is being checked, the
/// login page otherwise.
#[component]
pub fn RootPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let has_user = move || app_state.0.current_user.with(|u| u.is_some());
    let checking = move || !app_state.0.auth_checked.get();

    view! {
        <Show
            when=has_user
            fallback=move || {
                if checking() {
                    view! {
                        <div class="flex min-h-screen items-center justify-center">
                            <Spinner class="size-6" />
                        </div>
                    }
                    .into_any()
                } else {
                    view! { <LoginPage /> }.into_any()
                }
            }
        >
            <DashboardPage />
        </Show>
    }
}
