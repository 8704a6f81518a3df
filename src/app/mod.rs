use crate::config::AppwriteConfig;
use crate::pages::{LoginPage, RegistrationPage, RootPage};
use crate::state::{AppContext, AppState, DashboardController};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let app_context = AppContext(AppState::new(AppwriteConfig::from_env()));
    provide_context(app_context);

    let controller = DashboardController::new(app_context);
    provide_context(controller);
    controller.check_session();

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("signup") view=RegistrationPage />
                <Route path=path!("") view=RootPage />
            </Routes>
        </Router>
    }
}
