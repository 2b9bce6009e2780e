//! In-process fake backend for store tests.
//!
//! Behaves like the real API for the happy paths, can be told to fail, and
//! can hold any single call open until the test releases it, which is how
//! the ordering tests force responses to complete out of order.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use otorite_client::{
    ApiError, ApiResult, AuthApi, AuthSession, FavoritesApi, RemoteSettings, SettingsApi,
};
use otorite_core::{Credential, User};
use tokio::sync::Notify;

pub const RESET_TOKEN: &str = "reset-token";
pub const VERIFY_TOKEN: &str = "verify-token";

/// One held call.
#[derive(Default)]
pub struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    /// Resolves once the held call has reached the fake.
    pub async fn entered(&self) {
        self.entered.notified().await
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

struct Account {
    password: String,
    user: User,
}

#[derive(Default)]
pub struct FakeBackend {
    accounts: Mutex<HashMap<String, Account>>,
    /// token -> email
    sessions: Mutex<HashMap<String, String>>,
    gates: Mutex<HashMap<String, Arc<Gate>>>,
    christmas: AtomicBool,
    fail_auth: AtomicBool,
    fail_settings: AtomicBool,
    fail_toggle: AtomicBool,
    issued: AtomicUsize,
    settings_calls: AtomicUsize,
    favorite_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&self, email: &str, password: &str) -> User {
        let mut accounts = self.accounts.lock().unwrap();
        let user = User {
            id: format!("u{}", accounts.len() + 1),
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            is_admin: false,
            is_verified: false,
            favorites: BTreeSet::new(),
            created_at: None,
        };
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        user
    }

    /// A valid token for an existing account, as if from an earlier login.
    pub fn issue_token(&self, email: &str) -> String {
        let token = format!("token-{}", self.issued.fetch_add(1, Ordering::SeqCst) + 1);
        self.sessions
            .lock()
            .unwrap()
            .insert(token.clone(), email.to_string());
        token
    }

    /// Invalidates every issued token.
    pub fn revoke_tokens(&self) {
        self.sessions.lock().unwrap().clear();
    }

    /// Holds the next call of `operation` open until the gate is released.
    ///
    /// Operations: `login`, `profile`, `settings`, `favorite:{id}` (held
    /// after the change is applied), `favorite-arrival:{id}` (held before).
    pub fn hold(&self, operation: &str) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gates
            .lock()
            .unwrap()
            .insert(operation.to_string(), gate.clone());
        gate
    }

    pub fn fail_auth(&self, fail: bool) {
        self.fail_auth.store(fail, Ordering::SeqCst);
    }

    pub fn fail_settings(&self, fail: bool) {
        self.fail_settings.store(fail, Ordering::SeqCst);
    }

    pub fn fail_toggle(&self, fail: bool) {
        self.fail_toggle.store(fail, Ordering::SeqCst);
    }

    pub fn set_christmas(&self, enabled: bool) {
        self.christmas.store(enabled, Ordering::SeqCst);
    }

    pub fn christmas(&self) -> bool {
        self.christmas.load(Ordering::SeqCst)
    }

    pub fn settings_calls(&self) -> usize {
        self.settings_calls.load(Ordering::SeqCst)
    }

    pub fn favorite_calls(&self) -> usize {
        self.favorite_calls.load(Ordering::SeqCst)
    }

    pub fn server_favorites(&self, email: &str) -> BTreeSet<String> {
        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .map(|a| a.user.favorites.clone())
            .unwrap_or_default()
    }

    async fn wait(&self, operation: &str) {
        let gate = self.gates.lock().unwrap().remove(operation);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }

    fn unreachable(&self) -> ApiError {
        ApiError::Unreachable("connection refused".to_string())
    }

    fn session_email(&self, credential: &Credential) -> ApiResult<String> {
        self.sessions
            .lock()
            .unwrap()
            .get(credential.expose())
            .cloned()
            .ok_or(ApiError::InvalidCredential {
                message: Some("Invalid token".to_string()),
            })
    }

    fn update_favorites<F>(&self, credential: &Credential, change: F) -> ApiResult<BTreeSet<String>>
    where
        F: FnOnce(&mut BTreeSet<String>),
    {
        self.favorite_calls.fetch_add(1, Ordering::SeqCst);
        let email = self.session_email(credential)?;
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(&email).ok_or(ApiError::Rejected {
            status: 404,
            message: Some("User not found".to_string()),
        })?;
        change(&mut account.user.favorites);
        Ok(account.user.favorites.clone())
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        self.wait("login").await;
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(self.unreachable());
        }

        let user = {
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(email) {
                Some(account) if account.password == password => account.user.clone(),
                _ => {
                    return Err(ApiError::InvalidCredential {
                        message: Some("Invalid email or password".to_string()),
                    })
                }
            }
        };

        let token = self.issue_token(email);
        Ok(AuthSession {
            user,
            credential: Credential::new(token),
        })
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<AuthSession> {
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(self.unreachable());
        }
        if self.accounts.lock().unwrap().contains_key(email) {
            return Err(ApiError::Rejected {
                status: 400,
                message: Some("Email already registered".to_string()),
            });
        }

        let mut user = self.add_account(email, password);
        user.name = name.to_string();
        if let Some(account) = self.accounts.lock().unwrap().get_mut(email) {
            account.user.name = name.to_string();
        }

        let token = self.issue_token(email);
        Ok(AuthSession {
            user,
            credential: Credential::new(token),
        })
    }

    async fn profile(&self, credential: &Credential) -> ApiResult<User> {
        self.wait("profile").await;
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(self.unreachable());
        }

        let email = self.session_email(credential)?;
        self.accounts
            .lock()
            .unwrap()
            .get(&email)
            .map(|a| a.user.clone())
            .ok_or(ApiError::InvalidCredential { message: None })
    }

    async fn forgot_password(&self, email: &str) -> ApiResult<String> {
        Ok(format!("If {} is registered, a reset link has been sent", email))
    }

    async fn reset_password(&self, token: &str, _new_password: &str) -> ApiResult<String> {
        if token == RESET_TOKEN {
            Ok("Password has been reset".to_string())
        } else {
            Err(ApiError::Rejected {
                status: 400,
                message: Some("Invalid or expired reset token".to_string()),
            })
        }
    }

    async fn verify_email(&self, token: &str) -> ApiResult<String> {
        if token == VERIFY_TOKEN {
            Ok("Email verified".to_string())
        } else {
            Err(ApiError::Rejected {
                status: 400,
                message: Some("Invalid verification token".to_string()),
            })
        }
    }

    async fn resend_verification(&self, credential: &Credential) -> ApiResult<String> {
        self.session_email(credential)?;
        Ok("Verification email sent".to_string())
    }
}

#[async_trait]
impl FavoritesApi for FakeBackend {
    async fn add_favorite(
        &self,
        credential: &Credential,
        vehicle_id: &str,
    ) -> ApiResult<BTreeSet<String>> {
        self.wait(&format!("favorite-arrival:{}", vehicle_id)).await;
        let set = self.update_favorites(credential, |f| {
            f.insert(vehicle_id.to_string());
        })?;
        self.wait(&format!("favorite:{}", vehicle_id)).await;
        Ok(set)
    }

    async fn remove_favorite(
        &self,
        credential: &Credential,
        vehicle_id: &str,
    ) -> ApiResult<BTreeSet<String>> {
        self.wait(&format!("favorite-arrival:{}", vehicle_id)).await;
        let set = self.update_favorites(credential, |f| {
            f.remove(vehicle_id);
        })?;
        self.wait(&format!("favorite:{}", vehicle_id)).await;
        Ok(set)
    }
}

#[async_trait]
impl SettingsApi for FakeBackend {
    async fn fetch_settings(&self) -> ApiResult<RemoteSettings> {
        self.settings_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_settings.load(Ordering::SeqCst) {
            return Err(self.unreachable());
        }

        // Read on arrival, answer when released
        let christmas_enabled = self.christmas();
        self.wait("settings").await;
        Ok(RemoteSettings {
            christmas_enabled,
            site_name: Some("Otorite".to_string()),
        })
    }

    async fn toggle_christmas(&self, _credential: Option<&Credential>) -> ApiResult<bool> {
        if self.fail_toggle.load(Ordering::SeqCst) {
            return Err(self.unreachable());
        }
        Ok(!self.christmas.fetch_xor(true, Ordering::SeqCst))
    }

    async fn update_settings(
        &self,
        christmas_enabled: bool,
        _credential: Option<&Credential>,
    ) -> ApiResult<RemoteSettings> {
        if self.fail_toggle.load(Ordering::SeqCst) {
            return Err(self.unreachable());
        }
        self.set_christmas(christmas_enabled);
        Ok(RemoteSettings {
            christmas_enabled,
            site_name: Some("Otorite".to_string()),
        })
    }
}
