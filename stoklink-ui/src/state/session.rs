//! Session Cache
//!
//! The logged-in user is cached in browser local storage so a reload lands
//! back on the right dashboard. This is route gating only; the script
//! service re-checks credentials on every action.

use crate::state::global::User;

const SESSION_KEY: &str = "stoklink_user";

/// Restore the cached session, if any
pub fn load_session() -> Option<User> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    let raw = storage.get_item(SESSION_KEY).ok()??;
    serde_json::from_str(&raw).ok()
}

/// Cache the session for the next page load
pub fn store_session(user: &User) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(raw) = serde_json::to_string(user) {
                let _ = storage.set_item(SESSION_KEY, &raw);
            }
        }
    }
}

/// Drop the cached session
pub fn clear_session() {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.remove_item(SESSION_KEY);
        }
    }
}
