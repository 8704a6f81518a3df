use crate::models::AccountInfo;
use serde::{Deserialize, Serialize};

/// Same key the official Appwrite web SDK uses, so sessions survive switching clients.
pub(crate) const SESSION_KEY: &str = "cookieFallback";
pub(crate) const USER_KEY: &str = "idea_tracker_user";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn load_session_from_storage() -> Option<String> {
    local_storage()?
        .get_item(SESSION_KEY)
        .ok()
        .flatten()
        .filter(|s| !s.trim().is_empty() && s != "[]")
}

pub(crate) fn save_session_to_storage(session: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(SESSION_KEY, session);
    }
}

pub(crate) fn remove_session_from_storage() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(SESSION_KEY);
        let _ = storage.remove_item(USER_KEY);
    }
}

pub(crate) fn save_user_to_storage(user: &AccountInfo) {
    save_json_to_storage(USER_KEY, user);
}

pub(crate) fn load_user_from_storage() -> Option<AccountInfo> {
    load_json_from_storage(USER_KEY)
}
