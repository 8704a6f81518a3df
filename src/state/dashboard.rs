use super::AppContext;
use crate::api::ApiClient;
use crate::auth;
use crate::filter::{resolve_visible_ideas, FilterState, FILTER_DEBOUNCE_MS};
use crate::ideas::{remove_from_snapshot, upsert_idea};
use crate::backend::IdeaStore;
use crate::models::Idea;
use crate::storage::save_user_to_storage;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::{set_timeout_with_handle, TimeoutHandle};
use std::time::Duration;

/// Drives the dashboard: loads the full listing, recomputes the visible list after a
/// debounce, and applies local results of create/edit/delete.
///
/// Responses are tagged with request ids; anything that arrives for a superseded request
/// is dropped.
#[derive(Clone, Copy)]
pub(crate) struct DashboardController {
    app: AppContext,
    debounce: StoredValue<Option<TimeoutHandle>>,
}

impl DashboardController {
    pub fn new(app: AppContext) -> Self {
        Self {
            app,
            debounce: StoredValue::new(None),
        }
    }

    pub fn load_ideas(&self) {
        let app = self.app;

        let mut gate = app.0.ideas_gate.get_untracked();
        let req_id = gate.begin();
        app.0.ideas_gate.set(gate);

        app.0.ideas_loading.set(true);
        app.0.ideas_error.set(None);

        let api_client = app.0.api_client.get_untracked();
        let this = *self;
        spawn_local(async move {
            let result = api_client.list_ideas().await;

            // Ignore stale responses.
            if !app.0.ideas_gate.get_untracked().is_current(req_id) {
                return;
            }

            match result {
                Ok(ideas) => {
                    log::debug!("loaded {} ideas", ideas.len());
                    app.0.ideas.set(ideas);
                }
                Err(e) if e.is_unauthorized() => {
                    this.force_logout();
                }
                Err(e) => {
                    log::warn!("loading ideas failed: {e}");
                    app.0.ideas_error.set(Some(e.to_string()));
                }
            }
            app.0.ideas_loading.set(false);
        });
    }

    /// Restart the quiet-period timer; the visible list is recomputed when it fires.
    pub fn schedule_filter(&self) {
        if let Some(handle) = self.debounce.get_value() {
            handle.clear();
        }

        let this = *self;
        match set_timeout_with_handle(
            move || this.run_filter(),
            Duration::from_millis(FILTER_DEBOUNCE_MS),
        ) {
            Ok(handle) => self.debounce.set_value(Some(handle)),
            Err(_) => {
                self.debounce.set_value(None);
                self.run_filter();
            }
        }
    }

    fn run_filter(&self) {
        let app = self.app;
        self.debounce.set_value(None);

        let mut gate = app.0.filter_gate.get_untracked();
        let req_id = gate.begin();
        app.0.filter_gate.set(gate);

        let api_client = app.0.api_client.get_untracked();
        let all = app.0.ideas.get_untracked();
        let filter = app.0.filter.get_untracked();

        spawn_local(async move {
            let visible =
                resolve_visible_ideas(&api_client, &all, &filter, &chrono::Local::now()).await;

            if !app.0.filter_gate.get_untracked().is_current(req_id) {
                log::debug!("dropping stale filter result {req_id}");
                return;
            }
            app.0.visible_ideas.set(visible);
        });
    }

    pub fn update_filter(&self, f: impl FnOnce(&mut FilterState)) {
        self.app.0.filter.update(f);
    }

    pub fn clear_filters(&self) {
        self.app.0.filter.update(|f| f.clear());
    }

    /// Apply a created or edited idea to the snapshot.
    pub fn apply_saved(&self, idea: Idea) {
        self.app.0.ideas.update(|list| upsert_idea(list, idea));
    }

    pub fn forget(&self, id: &str) {
        self.app.0.ideas.update(|list| remove_from_snapshot(list, id));
    }

    pub fn client(&self) -> ApiClient {
        self.app.0.api_client.get_untracked()
    }

    /// Session is gone on the server: drop local state and go back to the login page.
    pub fn force_logout(&self) {
        let app = self.app;
        let mut c = app.0.api_client.get_untracked();
        c.clear_session();
        ApiClient::clear_storage();
        app.0.api_client.set(c);
        app.0.current_user.set(None);
        app.0.ideas.set(vec![]);
        app.0.visible_ideas.set(vec![]);
        let _ = window().location().set_href("/login");
    }

    /// Delete the server session, then clear everything local regardless of the outcome.
    pub fn logout(&self) {
        let this = *self;
        let mut c = self.client();
        spawn_local(async move {
            if let Err(e) = auth::logout(&mut c).await {
                log::warn!("logout failed: {e}");
            }
            this.force_logout();
        });
    }

    /// Check the stored session against the server once at startup.
    pub fn check_session(&self) {
        let app = self.app;
        let api_client = app.0.api_client.get_untracked();
        spawn_local(async move {
            match auth::current_user(&api_client).await {
                Some(user) => {
                    save_user_to_storage(&user);
                    app.0.current_user.set(Some(user));
                }
                None => app.0.current_user.set(None),
            }
            app.0.auth_checked.set(true);
        });
    }
}
