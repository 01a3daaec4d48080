use chrono::Utc;
use contracts::shared::error::ApiError;
use contracts::system::access::{has_permission, AccessState, Permission};
use contracts::system::auth::{is_token_valid, AuthSession, LoginRequest, RegisterRequest, Role};
use leptos::prelude::*;

use super::{api, storage};
use storage::SessionSlot;

/// Both sessions of the browser. The back-office and the customer site log
/// in independently and never share a token.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub admin: RwSignal<Option<AuthSession>>,
    pub client: RwSignal<Option<AuthSession>>,
}

impl AuthContext {
    /// Reads both sessions from local storage. An expired staff token is
    /// dropped; an expired customer token is kept for the refresh call.
    pub fn restore() -> Self {
        let now = Utc::now().timestamp();
        let admin = storage::load_session(SessionSlot::Admin).filter(|session| {
            let expired = !is_token_valid(&session.access_token, now);
            if expired {
                log::info!("stored admin session expired");
                storage::clear_session(SessionSlot::Admin);
            }
            !expired
        });
        Self {
            admin: RwSignal::new(admin),
            client: RwSignal::new(storage::load_session(SessionSlot::Client)),
        }
    }

    /// Re-reads storage, picking up sessions cleared by the HTTP layer.
    pub fn sync(&self) {
        self.admin.set(storage::load_session(SessionSlot::Admin));
        self.client.set(storage::load_session(SessionSlot::Client));
    }

    /// Called with every failed call so a rejected token logs the page out.
    pub fn on_api_error(&self, err: &ApiError) {
        if err.is_unauthorized() {
            self.sync();
        }
    }

    pub fn access_state(&self) -> AccessState {
        AccessState {
            staff_role: self.admin.with(|s| s.as_ref().map(|s| s.role)),
            has_client_session: self.client.with(|s| s.is_some()),
        }
    }

    pub fn staff_role(&self) -> Option<Role> {
        self.admin.with(|s| s.as_ref().map(|s| s.role))
    }

    pub fn staff_username(&self) -> Option<String> {
        self.admin.with(|s| s.as_ref().map(|s| s.username.clone()))
    }

    /// Permission check for the back-office user.
    pub fn can(&self, permission: Permission) -> bool {
        self.staff_role()
            .map(|role| has_permission(role, permission))
            .unwrap_or(false)
    }

    pub fn client_session(&self) -> Option<AuthSession> {
        self.client.get()
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    provide_context(AuthContext::restore());
    children()
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// Back-office login. A response without a role is an administrator;
/// customer accounts are refused.
pub async fn login_admin(
    auth: AuthContext,
    username: String,
    password: String,
    remember: bool,
) -> Result<AuthSession, ApiError> {
    let request = LoginRequest {
        username: username.trim().to_string(),
        password,
    };
    let response = api::login(&request).await?;
    let session = AuthSession::from_login(&request.username, response, Role::Admin);
    if !session.role.is_staff() {
        return Err(ApiError::Validation(
            "This account cannot sign in to the administration site".into(),
        ));
    }
    storage::save_session(SessionSlot::Admin, &session);
    storage::remember_username(remember.then_some(request.username.as_str()));
    auth.admin.set(Some(session.clone()));
    log::info!("staff {} signed in as {}", session.username, session.role.code());
    Ok(session)
}

pub async fn login_client(
    auth: AuthContext,
    username: String,
    password: String,
) -> Result<AuthSession, ApiError> {
    let request = LoginRequest {
        username: username.trim().to_string(),
        password,
    };
    let response = api::login(&request).await?;
    let session = AuthSession::from_login(&request.username, response, Role::User);
    storage::save_session(SessionSlot::Client, &session);
    auth.client.set(Some(session.clone()));
    log::info!("customer {} signed in", session.username);
    Ok(session)
}

pub async fn register_client(request: RegisterRequest) -> Result<(), ApiError> {
    api::register(&request).await?;
    log::info!("registered customer {}", request.email);
    Ok(())
}

pub fn logout_admin(auth: AuthContext) {
    storage::clear_session(SessionSlot::Admin);
    auth.admin.set(None);
}

pub fn logout_client(auth: AuthContext) {
    storage::clear_session(SessionSlot::Client);
    auth.client.set(None);
}
