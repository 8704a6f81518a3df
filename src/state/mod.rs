mod dashboard;

pub(crate) use dashboard::DashboardController;

use crate::api::ApiClient;
use crate::config::AppwriteConfig;
use crate::filter::FilterState;
use crate::models::{AccountInfo, Idea};
use crate::storage::load_user_from_storage;
use leptos::prelude::*;

/// Hands out request ids so only the newest in-flight response is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RequestGate {
    latest: u64,
}

impl RequestGate {
    pub fn begin(&mut self) -> u64 {
        self.latest = self.latest.saturating_add(1);
        self.latest
    }

    pub fn is_current(&self, id: u64) -> bool {
        self.latest == id
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub current_user: RwSignal<Option<AccountInfo>>,

    /// Set once the startup `GET /account` has answered.
    pub auth_checked: RwSignal<bool>,

    /// Last full listing (newest first, max 100). Stats are derived from this.
    pub ideas: RwSignal<Vec<Idea>>,
    pub ideas_loading: RwSignal<bool>,
    pub ideas_error: RwSignal<Option<String>>,
    pub ideas_gate: RwSignal<RequestGate>,

    /// What the list renders after search/status/date filtering.
    pub visible_ideas: RwSignal<Vec<Idea>>,
    pub filter: RwSignal<FilterState>,
    pub filter_gate: RwSignal<RequestGate>,
}

impl AppState {
    pub fn new(config: AppwriteConfig) -> Self {
        let stored_client = ApiClient::load_from_storage(config);
        let stored_user = if stored_client.has_session() {
            load_user_from_storage()
        } else {
            None
        };

        Self {
            api_client: RwSignal::new(stored_client),
            current_user: RwSignal::new(stored_user),
            auth_checked: RwSignal::new(false),
            ideas: RwSignal::new(vec![]),
            ideas_loading: RwSignal::new(false),
            ideas_error: RwSignal::new(None),
            ideas_gate: RwSignal::new(RequestGate::default()),
            visible_ideas: RwSignal::new(vec![]),
            filter: RwSignal::new(FilterState::default()),
            filter_gate: RwSignal::new(RequestGate::default()),
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
