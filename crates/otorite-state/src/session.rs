//! # Session Store
//!
//! Owns the logged-in user, the bearer credential, and the favorite set.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Session Store                                   │
//! │                                                                         │
//! │   mount() ──► Restoring { loading }                                     │
//! │                   │                                                     │
//! │        restore(): storage["token"]?                                     │
//! │          ├── none ───────────────────────────────► Anonymous            │
//! │          ├── GET /auth/me ok ────────────────────► Authenticated(user)  │
//! │          └── GET /auth/me fails (any kind) ──────► Anonymous            │
//! │                                                    + token removed      │
//! │                                                                         │
//! │   Anonymous ──login/register ok──► Authenticated (token persisted)      │
//! │   Authenticated ──logout──► Anonymous (token removed)                   │
//! │   Authenticated ──401 on an authenticated call──► Anonymous             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Two sequencers guard against responses landing out of order:
//!
//! - `session`: restore, login, register and logout. Logout issues and admits
//!   a ticket of its own, so a restore or login still in flight can never
//!   bring the session back.
//! - `favorites`: favorite toggles. A response only replaces the favorite set
//!   if no newer toggle response was applied, and only for the same user. A
//!   toggle whose response was dropped re-reads `/auth/me` and adopts that
//!   set, since the server may have applied it last.
//!
//! ## Persistence
//! The stored `token` always follows the in-memory credential: writes go
//! through one lock and store whatever the credential is at that moment.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use otorite_client::{ApiError, AuthApi, AuthSession, FavoritesApi};
use otorite_core::validation::{
    validate_email, validate_login_password, validate_name, validate_new_password,
    validate_token, validate_vehicle_id,
};
use otorite_core::{Credential, RequestSequencer, Ticket, User};
use otorite_storage::{keys, DurableStore};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{SessionError, SessionResult};

/// What the view layer renders for the session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    /// True while the startup restore is running.
    pub loading: bool,
}

/// Outcome of offering a favorites set to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FavoritesUpdate {
    Applied,
    /// A response issued later was already applied.
    Stale,
    /// The session ended or belongs to someone else now.
    Detached,
}

pub struct SessionStore {
    state: watch::Sender<SessionSnapshot>,
    credential: RwLock<Option<Credential>>,
    session: RequestSequencer,
    favorites_seq: RequestSequencer,
    /// Serializes writes of the stored token.
    persist: Mutex<()>,
    storage: Arc<dyn DurableStore>,
    auth: Arc<dyn AuthApi>,
    favorites: Arc<dyn FavoritesApi>,
}

impl SessionStore {
    /// Creates the store in its restoring state. No I/O.
    pub fn mount(
        storage: Arc<dyn DurableStore>,
        auth: Arc<dyn AuthApi>,
        favorites: Arc<dyn FavoritesApi>,
    ) -> Self {
        let (state, _) = watch::channel(SessionSnapshot {
            user: None,
            loading: true,
        });

        SessionStore {
            state,
            credential: RwLock::new(None),
            session: RequestSequencer::new(),
            favorites_seq: RequestSequencer::new(),
            persist: Mutex::new(()),
            storage,
            auth,
            favorites,
        }
    }

    /// `mount` followed by `restore`.
    pub async fn initialize(
        storage: Arc<dyn DurableStore>,
        auth: Arc<dyn AuthApi>,
        favorites: Arc<dyn FavoritesApi>,
    ) -> Self {
        let store = Self::mount(storage, auth, favorites);
        store.restore().await;
        store
    }

    /// Re-establishes the session from a stored token.
    ///
    /// Never fails: a token the backend does not accept, for whatever
    /// reason, is discarded and the store ends up anonymous.
    pub async fn restore(&self) {
        let ticket = self.session.issue();

        let stored = match self.storage.get(keys::TOKEN).await {
            Ok(token) => token.map(Credential::new).filter(|c| !c.is_empty()),
            Err(e) => {
                warn!(error = %e, "Could not read stored credential");
                None
            }
        };

        let Some(credential) = stored else {
            debug!("No stored credential; starting anonymous");
            self.finish_loading();
            return;
        };

        match self.auth.profile(&credential).await {
            Ok(user) => {
                let user_id = user.id.clone();
                if self.admit_session(ticket, user, credential) {
                    info!(user_id = %user_id, "Session restored");
                } else {
                    debug!("Dropping superseded restore");
                }
            }
            Err(e) => {
                if self.session.admit(ticket) {
                    warn!(error = %e, "Stored credential rejected; discarding it");
                    self.clear_session();
                    self.sync_stored_credential().await;
                } else {
                    debug!(error = %e, "Ignoring failed restore superseded by a newer change");
                }
            }
        }

        self.finish_loading();
    }

    pub async fn login(&self, email: &str, password: &str) -> SessionResult<User> {
        let email = email.trim();
        validate_email(email)?;
        validate_login_password(password)?;

        let ticket = self.session.issue();
        let result = self.auth.login(email, password).await;
        self.complete_auth("login", ticket, result).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> SessionResult<User> {
        let name = name.trim();
        let email = email.trim();
        validate_name(name)?;
        validate_email(email)?;
        validate_new_password(password)?;

        let ticket = self.session.issue();
        let result = self.auth.register(name, email, password).await;
        self.complete_auth("register", ticket, result).await
    }

    /// Ends the session locally. Any session or favorite response still in
    /// flight is discarded when it lands.
    pub async fn logout(&self) {
        self.session.invalidate();
        self.favorites_seq.invalidate();
        self.clear_session();
        self.sync_stored_credential().await;
        info!("Logged out");
    }

    /// Requests a reset link. Returns the server's message.
    pub async fn forgot_password(&self, email: &str) -> SessionResult<String> {
        let email = email.trim();
        validate_email(email)?;
        Ok(self.auth.forgot_password(email).await?)
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> SessionResult<String> {
        validate_token(token)?;
        validate_new_password(new_password)?;
        Ok(self.auth.reset_password(token, new_password).await?)
    }

    /// Confirms an email address. When a session exists, its user is marked
    /// verified.
    pub async fn verify_email(&self, token: &str) -> SessionResult<String> {
        validate_token(token)?;
        let message = self.auth.verify_email(token).await?;

        self.state.send_if_modified(|s| match s.user.as_mut() {
            Some(user) if !user.is_verified => {
                user.is_verified = true;
                true
            }
            _ => false,
        });
        Ok(message)
    }

    pub async fn resend_verification(&self) -> SessionResult<String> {
        let credential = self.credential().ok_or(SessionError::NoSession)?;

        match self.auth.resend_verification(&credential).await {
            Ok(message) => Ok(message),
            Err(e) => Err(self.authenticated_failure(&credential, e).await),
        }
    }

    /// Adds or removes a favorite, depending on whether it is one now.
    ///
    /// Returns whether `vehicle_id` is a favorite afterwards, according to
    /// the server.
    pub async fn toggle_favorite(&self, vehicle_id: &str) -> SessionResult<bool> {
        validate_vehicle_id(vehicle_id)?;

        let (credential, user_id, was_favorite) = {
            let credential = self.credential();
            let state = self.state.borrow();
            match (credential, state.user.as_ref()) {
                (Some(credential), Some(user)) => {
                    (credential, user.id.clone(), user.is_favorite(vehicle_id))
                }
                _ => return Err(SessionError::NoSession),
            }
        };

        let ticket = self.favorites_seq.issue();
        let result = if was_favorite {
            self.favorites.remove_favorite(&credential, vehicle_id).await
        } else {
            self.favorites.add_favorite(&credential, vehicle_id).await
        };

        let favorites = match result {
            Ok(favorites) => favorites,
            Err(e) => return Err(self.authenticated_failure(&credential, e).await),
        };

        let mut is_favorite = favorites.contains(vehicle_id);
        let mut update = self.admit_favorites(ticket, &user_id, favorites);

        // A newer response landed first, but the server may have applied this
        // request after it. Its current set decides.
        while update == FavoritesUpdate::Stale {
            debug!(vehicle_id, "Re-reading favorites after a stale response");
            let ticket = self.favorites_seq.issue();
            let user = match self.auth.profile(&credential).await {
                Ok(user) => user,
                Err(e) => return Err(self.authenticated_failure(&credential, e).await),
            };
            is_favorite = user.is_favorite(vehicle_id);
            update = self.admit_favorites(ticket, &user_id, user.favorites);
        }

        debug!(vehicle_id, is_favorite, "Favorite toggled");
        Ok(is_favorite)
    }

    pub fn is_favorite(&self, vehicle_id: &str) -> bool {
        self.state
            .borrow()
            .user
            .as_ref()
            .is_some_and(|u| u.is_favorite(vehicle_id))
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.credential
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().user.as_ref().is_some_and(|u| u.is_admin)
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    async fn complete_auth(
        &self,
        operation: &str,
        ticket: Ticket,
        result: Result<AuthSession, ApiError>,
    ) -> SessionResult<User> {
        match result {
            Ok(AuthSession { user, credential }) => {
                if !self.admit_session(ticket, user.clone(), credential) {
                    debug!(operation, "Dropping superseded session response");
                    return Err(SessionError::Superseded);
                }
                self.sync_stored_credential().await;
                info!(operation, user_id = %user.id, "Session established");
                Ok(user)
            }
            Err(e) => {
                debug!(operation, error = %e, "Authentication failed");
                Err(e.into())
            }
        }
    }

    /// Installs a session unless a newer session change was applied.
    fn admit_session(&self, ticket: Ticket, user: User, credential: Credential) -> bool {
        let mut admitted = false;

        self.state.send_if_modified(|s| {
            if !self.session.admit(ticket) {
                return false;
            }
            admitted = true;
            self.set_credential(Some(credential));
            s.user = Some(user);
            s.loading = false;
            true
        });

        // A different user's toggles must not land on this one
        if admitted {
            self.favorites_seq.invalidate();
        }
        admitted
    }

    fn admit_favorites(
        &self,
        ticket: Ticket,
        user_id: &str,
        favorites: BTreeSet<String>,
    ) -> FavoritesUpdate {
        let mut update = FavoritesUpdate::Detached;

        self.state.send_if_modified(|s| match s.user.as_mut() {
            Some(user) if user.id == user_id => {
                if !self.favorites_seq.admit(ticket) {
                    debug!(ticket = ticket.value(), "Dropping stale favorites response");
                    update = FavoritesUpdate::Stale;
                    return false;
                }
                update = FavoritesUpdate::Applied;
                std::mem::replace(&mut user.favorites, favorites) != user.favorites
            }
            _ => false,
        });

        update
    }

    /// Maps a failed authenticated call. A rejected credential ends the
    /// session, unless the session already moved on to another credential.
    async fn authenticated_failure(&self, used: &Credential, err: ApiError) -> SessionError {
        if !err.is_invalid_credential() {
            return err.into();
        }

        if self.credential().as_ref() == Some(used) {
            warn!("Credential rejected; ending session");
            self.session.invalidate();
            self.favorites_seq.invalidate();
            self.clear_session();
            self.sync_stored_credential().await;
        }
        SessionError::Expired
    }

    fn clear_session(&self) {
        self.set_credential(None);
        self.state.send_if_modified(|s| {
            let changed = s.user.is_some() || s.loading;
            s.user = None;
            s.loading = false;
            changed
        });
    }

    fn finish_loading(&self) {
        self.state
            .send_if_modified(|s| std::mem::replace(&mut s.loading, false));
    }

    fn set_credential(&self, credential: Option<Credential>) {
        *self
            .credential
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = credential;
    }

    /// Writes the current in-memory credential to storage.
    async fn sync_stored_credential(&self) {
        let _guard = self.persist.lock().await;

        let result = match self.credential() {
            Some(credential) => self.storage.set(keys::TOKEN, credential.expose()).await,
            None => self.storage.remove(keys::TOKEN).await,
        };

        if let Err(e) = result {
            warn!(error = %e, "Could not update stored credential");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, RESET_TOKEN, VERIFY_TOKEN};
    use otorite_storage::MemoryStore;

    const EMAIL: &str = "a@b.com";
    const PASSWORD: &str = "secret";

    struct Fixture {
        storage: Arc<MemoryStore>,
        backend: Arc<FakeBackend>,
    }

    impl Fixture {
        fn new() -> Self {
            let backend = FakeBackend::new();
            backend.add_account(EMAIL, PASSWORD);
            Fixture {
                storage: Arc::new(MemoryStore::new()),
                backend: Arc::new(backend),
            }
        }

        /// Storage already holding a token the backend accepts.
        fn with_stored_session() -> Self {
            let fx = Self::new();
            let token = fx.backend.issue_token(EMAIL);
            Fixture {
                storage: Arc::new(MemoryStore::with_entries([("token", token)])),
                backend: fx.backend,
            }
        }

        fn mount(&self) -> SessionStore {
            SessionStore::mount(self.storage.clone(), self.backend.clone(), self.backend.clone())
        }

        async fn logged_in(&self) -> SessionStore {
            let store = self.mount();
            store.restore().await;
            store.login(EMAIL, PASSWORD).await.unwrap();
            store
        }

        async fn stored_token(&self) -> Option<String> {
            self.storage.get("token").await.unwrap()
        }
    }

    // -------------------------------------------------------------------------
    // Restore
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_mount_starts_loading() {
        let fx = Fixture::new();
        let store = fx.mount();
        assert!(store.is_loading());
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_without_token() {
        let fx = Fixture::new();
        let store = fx.mount();
        store.restore().await;

        assert!(!store.is_loading());
        assert!(store.user().is_none());
    }

    #[tokio::test]
    async fn test_restore_with_valid_token() {
        let fx = Fixture::with_stored_session();
        let store =
            SessionStore::initialize(fx.storage.clone(), fx.backend.clone(), fx.backend.clone())
                .await;

        assert_eq!(store.user().unwrap().email, EMAIL);
        assert!(store.credential().is_some());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_restore_with_rejected_token_discards_it() {
        let fx = Fixture::with_stored_session();
        fx.backend.revoke_tokens();

        let store = fx.mount();
        store.restore().await;

        assert!(store.user().is_none());
        assert!(store.credential().is_none());
        assert!(!store.is_loading());
        assert_eq!(fx.stored_token().await, None);
    }

    #[tokio::test]
    async fn test_restore_with_unreachable_backend_discards_token() {
        let fx = Fixture::with_stored_session();
        fx.backend.fail_auth(true);

        let store = fx.mount();
        store.restore().await;

        assert!(store.user().is_none());
        assert_eq!(fx.stored_token().await, None);
    }

    #[tokio::test]
    async fn test_logout_during_restore_wins() {
        let fx = Fixture::with_stored_session();
        let store = Arc::new(fx.mount());
        let gate = fx.backend.hold("profile");

        let restore = tokio::spawn({
            let store = store.clone();
            async move { store.restore().await }
        });
        gate.entered().await;

        store.logout().await;
        gate.release();
        restore.await.unwrap();

        assert!(store.user().is_none());
        assert!(store.credential().is_none());
        assert!(!store.is_loading());
        assert_eq!(fx.stored_token().await, None);
    }

    // -------------------------------------------------------------------------
    // Login / Register / Logout
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_persists_credential() {
        let fx = Fixture::new();
        let store = fx.mount();
        let mut rx = store.subscribe();

        let user = store.login(EMAIL, PASSWORD).await.unwrap();

        assert_eq!(user.email, EMAIL);
        assert!(store.is_authenticated());
        assert!(!store.is_admin());
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            fx.stored_token().await.as_deref(),
            store.credential().as_ref().map(Credential::expose)
        );
    }

    #[tokio::test]
    async fn test_login_wrong_password_leaves_state() {
        let fx = Fixture::new();
        let store = fx.mount();
        store.restore().await;

        let err = store.login(EMAIL, "wrong").await.unwrap_err();

        assert_eq!(err, SessionError::InvalidCredentials);
        assert!(store.user().is_none());
        assert_eq!(fx.stored_token().await, None);
    }

    #[tokio::test]
    async fn test_login_validates_before_sending() {
        let fx = Fixture::new();
        let store = fx.mount();
        fx.backend.fail_auth(true);

        assert!(matches!(
            store.login("not-an-email", PASSWORD).await,
            Err(SessionError::Invalid(_))
        ));
        assert!(matches!(store.login(EMAIL, "").await, Err(SessionError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_login_unreachable() {
        let fx = Fixture::new();
        fx.backend.fail_auth(true);
        let store = fx.mount();

        assert!(matches!(
            store.login(EMAIL, PASSWORD).await,
            Err(SessionError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_login_superseded_by_logout() {
        let fx = Fixture::new();
        let store = Arc::new(fx.mount());
        let gate = fx.backend.hold("login");

        let login = tokio::spawn({
            let store = store.clone();
            async move { store.login(EMAIL, PASSWORD).await }
        });
        gate.entered().await;

        store.logout().await;
        gate.release();

        assert_eq!(login.await.unwrap(), Err(SessionError::Superseded));
        assert!(!store.is_authenticated());
        assert_eq!(fx.stored_token().await, None);
    }

    #[tokio::test]
    async fn test_register() {
        let fx = Fixture::new();
        let store = fx.mount();

        let user = store.register("Mehmet", "m@example.com", "secret1").await.unwrap();
        assert_eq!(user.name, "Mehmet");
        assert!(store.is_authenticated());
        assert!(fx.stored_token().await.is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let fx = Fixture::new();
        let store = fx.mount();

        let err = store.register("Ayşe", EMAIL, "secret1").await.unwrap_err();
        assert_eq!(err, SessionError::EmailTaken);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let fx = Fixture::new();
        let store = fx.mount();

        assert!(store.register("A", "x@example.com", "secret1").await.is_err());
        assert!(store.register("Ali", "x@example.com", "12345").await.is_err());
        assert!(store.register("Ali", "bad", "secret1").await.is_err());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let fx = Fixture::new();
        let store = fx.logged_in().await;
        store.toggle_favorite("veh1").await.unwrap();

        store.logout().await;

        assert!(store.user().is_none());
        assert!(store.credential().is_none());
        assert!(!store.is_favorite("veh1"));
        assert_eq!(fx.stored_token().await, None);
    }

    #[tokio::test]
    async fn test_logout_with_failing_storage_still_clears_memory() {
        let fx = Fixture::new();
        let store = fx.logged_in().await;
        fx.storage.set_failing(true);

        store.logout().await;
        assert!(!store.is_authenticated());
    }

    // -------------------------------------------------------------------------
    // Favorites
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_favorite_logout_scenario() {
        let fx = Fixture::new();
        let store = fx.mount();
        store.restore().await;

        store.login(EMAIL, PASSWORD).await.unwrap();
        assert!(fx.stored_token().await.is_some());

        assert!(store.toggle_favorite("veh1").await.unwrap());
        assert!(store.is_favorite("veh1"));

        store.logout().await;
        assert!(!store.is_favorite("veh1"));
    }

    #[tokio::test]
    async fn test_toggle_removes_existing_favorite() {
        let fx = Fixture::new();
        let store = fx.logged_in().await;

        assert!(store.toggle_favorite("veh1").await.unwrap());
        assert!(!store.toggle_favorite("veh1").await.unwrap());
        assert!(!store.is_favorite("veh1"));
        assert!(fx.backend.server_favorites(EMAIL).is_empty());
    }

    #[tokio::test]
    async fn test_toggle_without_session_sends_nothing() {
        let fx = Fixture::new();
        let store = fx.mount();
        store.restore().await;

        assert_eq!(store.toggle_favorite("veh1").await, Err(SessionError::NoSession));
        assert_eq!(fx.backend.favorite_calls(), 0);
        assert!(!store.is_favorite("veh1"));
    }

    #[tokio::test]
    async fn test_favorite_set_is_authoritative() {
        let fx = Fixture::new();
        let store = fx.logged_in().await;

        // Another device added one meanwhile
        let other = fx.backend.issue_token(EMAIL);
        fx.backend
            .add_favorite(&Credential::new(other), "veh9")
            .await
            .unwrap();

        store.toggle_favorite("veh1").await.unwrap();
        assert!(store.is_favorite("veh9"));
    }

    #[tokio::test]
    async fn test_stale_favorite_response_dropped() {
        let fx = Fixture::new();
        let store = Arc::new(fx.logged_in().await);
        let gate = fx.backend.hold("favorite:veh1");

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.toggle_favorite("veh1").await }
        });
        gate.entered().await;

        // Issued later, answers first with both ids
        assert!(store.toggle_favorite("veh2").await.unwrap());

        gate.release();
        assert!(first.await.unwrap().unwrap());

        let user = store.user().unwrap();
        assert_eq!(
            user.favorites.into_iter().collect::<Vec<_>>(),
            vec!["veh1".to_string(), "veh2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_earlier_toggle_applied_last_by_server_is_kept() {
        let fx = Fixture::new();
        let store = Arc::new(fx.logged_in().await);
        let gate = fx.backend.hold("favorite-arrival:veh1");

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.toggle_favorite("veh1").await }
        });
        gate.entered().await;

        // Reaches the server first, so its set lacks veh1
        assert!(store.toggle_favorite("veh2").await.unwrap());
        assert!(!store.is_favorite("veh1"));

        gate.release();
        assert!(first.await.unwrap().unwrap());

        let local = store.user().unwrap().favorites;
        assert_eq!(local, fx.backend.server_favorites(EMAIL));
        assert!(store.is_favorite("veh1"));
        assert!(store.is_favorite("veh2"));
    }

    #[tokio::test]
    async fn test_stale_toggle_reread_with_revoked_credential_ends_session() {
        let fx = Fixture::new();
        let store = Arc::new(fx.logged_in().await);
        let gate = fx.backend.hold("favorite:veh1");

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.toggle_favorite("veh1").await }
        });
        gate.entered().await;

        assert!(store.toggle_favorite("veh2").await.unwrap());
        fx.backend.revoke_tokens();

        gate.release();
        assert_eq!(first.await.unwrap(), Err(SessionError::Expired));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_credential_on_toggle_ends_session() {
        let fx = Fixture::new();
        let store = fx.logged_in().await;
        fx.backend.revoke_tokens();

        assert_eq!(store.toggle_favorite("veh1").await, Err(SessionError::Expired));
        assert!(!store.is_authenticated());
        assert!(store.credential().is_none());
        assert_eq!(fx.stored_token().await, None);
    }

    #[tokio::test]
    async fn test_toggle_rejects_unsafe_id() {
        let fx = Fixture::new();
        let store = fx.logged_in().await;

        assert!(matches!(
            store.toggle_favorite("../admin").await,
            Err(SessionError::Invalid(_))
        ));
        assert_eq!(fx.backend.favorite_calls(), 0);
    }

    // -------------------------------------------------------------------------
    // Account Recovery
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_password_reset_flow() {
        let fx = Fixture::new();
        let store = fx.mount();

        let message = store.forgot_password(EMAIL).await.unwrap();
        assert!(message.contains(EMAIL));

        assert_eq!(
            store.reset_password(RESET_TOKEN, "newpass").await.unwrap(),
            "Password has been reset"
        );

        let err = store.reset_password("expired", "newpass").await.unwrap_err();
        assert_eq!(
            err,
            SessionError::Rejected {
                message: Some("Invalid or expired reset token".to_string())
            }
        );

        assert!(matches!(
            store.reset_password(RESET_TOKEN, "123").await,
            Err(SessionError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_email_marks_user() {
        let fx = Fixture::new();
        let store = fx.logged_in().await;
        assert!(!store.user().unwrap().is_verified);

        store.verify_email(VERIFY_TOKEN).await.unwrap();
        assert!(store.user().unwrap().is_verified);
    }

    #[tokio::test]
    async fn test_verify_email_without_session() {
        let fx = Fixture::new();
        let store = fx.mount();
        store.restore().await;

        assert_eq!(store.verify_email(VERIFY_TOKEN).await.unwrap(), "Email verified");
        assert!(store.user().is_none());
    }

    #[tokio::test]
    async fn test_resend_verification_requires_session() {
        let fx = Fixture::new();
        let store = fx.mount();
        store.restore().await;
        assert_eq!(store.resend_verification().await, Err(SessionError::NoSession));

        store.login(EMAIL, PASSWORD).await.unwrap();
        assert_eq!(
            store.resend_verification().await.unwrap(),
            "Verification email sent"
        );
    }
}
