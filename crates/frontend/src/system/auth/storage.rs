use contracts::system::auth::AuthSession;
use web_sys::window;

const ADMIN_TOKEN_KEY: &str = "admin_token";
const USER_TOKEN_KEY: &str = "user_token";
const ADMIN_USERNAME_KEY: &str = "admin_username";

/// Which of the two independent sessions a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSlot {
    /// Back-office (staff) session
    Admin,
    /// Customer site session
    Client,
}

impl SessionSlot {
    pub fn key(&self) -> &'static str {
        match self {
            SessionSlot::Admin => ADMIN_TOKEN_KEY,
            SessionSlot::Client => USER_TOKEN_KEY,
        }
    }
}

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Stored JSON back into a session; unreadable values count as absent.
pub fn decode_session(raw: &str) -> Option<AuthSession> {
    match serde_json::from_str::<AuthSession>(raw) {
        Ok(session) if !session.access_token.is_empty() => Some(session),
        Ok(_) => None,
        Err(e) => {
            log::warn!("discarding unreadable stored session: {}", e);
            None
        }
    }
}

pub fn load_session(slot: SessionSlot) -> Option<AuthSession> {
    let raw = get_local_storage()?.get_item(slot.key()).ok()??;
    decode_session(&raw)
}

pub fn save_session(slot: SessionSlot, session: &AuthSession) {
    let Some(storage) = get_local_storage() else {
        return;
    };
    match serde_json::to_string(session) {
        Ok(json) => {
            let _ = storage.set_item(slot.key(), &json);
        }
        Err(e) => log::error!("failed to store session: {}", e),
    }
}

pub fn clear_session(slot: SessionSlot) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(slot.key());
    }
}

/// Username pre-filled on the admin login form ("remember me").
pub fn remembered_username() -> Option<String> {
    get_local_storage()?
        .get_item(ADMIN_USERNAME_KEY)
        .ok()?
        .filter(|name| !name.is_empty())
}

pub fn remember_username(username: Option<&str>) {
    if let Some(storage) = get_local_storage() {
        let _ = match username {
            Some(name) => storage.set_item(ADMIN_USERNAME_KEY, name),
            None => storage.remove_item(ADMIN_USERNAME_KEY),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::auth::Role;

    #[test]
    fn test_decode_stored_session() {
        let session = decode_session(
            r#"{"id":4,"username":"boss","accessToken":"abc","token":"r","role":"ROLE_EMPLOYEE"}"#,
        )
        .unwrap();
        assert_eq!(session.role, Role::Employee);
        assert_eq!(session.token.as_deref(), Some("r"));
    }

    #[test]
    fn test_decode_rejects_garbage_and_empty_token() {
        assert!(decode_session("not json").is_none());
        assert!(decode_session(r#"{"username":"x","accessToken":""}"#).is_none());
    }

    #[test]
    fn test_slot_keys() {
        assert_eq!(SessionSlot::Admin.key(), "admin_token");
        assert_eq!(SessionSlot::Client.key(), "user_token");
    }
}
