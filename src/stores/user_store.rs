//! User store - roster, per-user projects, sessions and point balances
//!
//! The roster and the projects are written as two separate blobs and joined
//! again at load time. Sessions are keyed by an opaque token handed to the
//! client and live in session-scoped storage.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use super::notices::{SaveNotices, StoreNotice};
use crate::error::{Result, StoreError};
use crate::models::{Tier, User, UserProject};
use crate::seed;
use crate::storage::{
    KeyValueStorage, PROJECTS_STORAGE_KEY, SESSION_STORAGE_KEY, USERS_STORAGE_KEY,
};
use crate::utils::dates;

/// One client's sign-in state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// A fresh session token and the account it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignIn {
    pub token: String,
    pub user: User,
}

type ProjectMap = BTreeMap<String, Vec<UserProject>>;
type SessionMap = BTreeMap<String, Session>;

pub struct UserStore {
    storage: Arc<dyn KeyValueStorage>,
    session_storage: Arc<dyn KeyValueStorage>,
    users: RwLock<Vec<User>>,
    sessions: RwLock<SessionMap>,
    /// Empty disables admin sign-in
    admin_passcode: String,
    notices: SaveNotices,
}

impl UserStore {
    pub fn open(
        storage: Arc<dyn KeyValueStorage>,
        session_storage: Arc<dyn KeyValueStorage>,
        admin_passcode: impl Into<String>,
    ) -> Self {
        let users = load_users(storage.as_ref());
        let sessions = load_sessions(session_storage.as_ref());
        info!(
            "User store ready: {} users, {} sessions",
            users.len(),
            sessions.len()
        );

        Self {
            storage,
            session_storage,
            users: RwLock::new(users),
            sessions: RwLock::new(sessions),
            admin_passcode: admin_passcode.into(),
            notices: SaveNotices::new(),
        }
    }

    // ========== Persistence ==========

    fn save(&self, users: &[User]) {
        match write_users(self.storage.as_ref(), users) {
            Ok(()) => self.notices.record_success(),
            Err(e) => self.notices.record_failure("users", &e),
        }
    }

    fn save_sessions(&self, sessions: &SessionMap) {
        let outcome = serde_json::to_string(sessions)
            .map_err(StoreError::from)
            .and_then(|raw| {
                self.session_storage
                    .set(SESSION_STORAGE_KEY, &raw)
                    .map_err(StoreError::from)
            });
        if let Err(e) = outcome {
            self.notices.record_failure("session", &e);
        }
    }

    /// Apply `f` to one user, then write the roster
    fn with_user<R>(&self, email: &str, f: impl FnOnce(&mut User) -> Result<R>) -> Result<R> {
        let mut users = self.users.write();
        let user = users
            .iter_mut()
            .find(|u| u.has_email(email))
            .ok_or_else(|| StoreError::not_found("user", email))?;
        let result = f(user)?;
        self.save(&users);
        Ok(result)
    }

    pub fn take_notices(&self) -> Vec<StoreNotice> {
        self.notices.take()
    }

    // ========== Roster ==========

    pub fn users(&self) -> Vec<User> {
        self.users.read().clone()
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.users.read().iter().find(|u| u.has_email(email)).cloned()
    }

    /// Register a new account and sign it in on a new session
    pub fn sign_up(&self, email: &str, name: &str, today: NaiveDate) -> Result<SignIn> {
        let email = email.trim();
        let name = name.trim();
        if email.is_empty() {
            return Err(StoreError::EmptyField("email"));
        }
        if name.is_empty() {
            return Err(StoreError::EmptyField("name"));
        }

        let user = {
            let mut users = self.users.write();
            if users.iter().any(|u| u.has_email(email)) {
                return Err(StoreError::DuplicateEmail(email.to_string()));
            }

            let mut user = User::new(email, name);
            user.points = seed::WELCOME_POINTS;
            // the welcome grant stands in for today's allowance
            user.last_login = Some(today);
            users.push(user.clone());
            self.save(&users);
            user
        };

        info!("New account: {}", user.email);
        let token = self.start_session(Session {
            email: Some(user.email.clone()),
            is_admin: false,
        });
        Ok(SignIn { token, user })
    }

    /// Replace a user record. Projects are replaced too.
    pub fn update_user(&self, user: User) -> Result<()> {
        let email = user.email.clone();
        self.with_user(&email, |slot| {
            *slot = user;
            Ok(())
        })
    }

    pub fn set_tier(&self, email: &str, tier: Tier) -> Result<()> {
        self.with_user(email, |user| {
            user.tier = tier;
            Ok(())
        })
    }

    // ========== Sessions ==========

    fn start_session(&self, session: Session) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write();
        sessions.insert(token.clone(), session);
        self.save_sessions(&sessions);
        token
    }

    /// Sign in on a new session and grant today's allowance if not yet granted
    pub fn log_in(&self, email: &str, today: NaiveDate) -> Result<SignIn> {
        let canonical = self
            .user(email)
            .map(|u| u.email)
            .ok_or_else(|| StoreError::not_found("user", email.trim()))?;

        self.apply_daily_allowance(&canonical, today)?;
        let user = self
            .user(&canonical)
            .ok_or_else(|| StoreError::not_found("user", canonical.clone()))?;
        let token = self.start_session(Session {
            email: Some(canonical),
            is_admin: false,
        });
        Ok(SignIn { token, user })
    }

    /// End a session. Unknown tokens are ignored.
    pub fn log_out(&self, token: &str) {
        let mut sessions = self.sessions.write();
        if sessions.remove(token).is_some() {
            self.save_sessions(&sessions);
        }
    }

    pub fn session(&self, token: &str) -> Option<Session> {
        self.sessions.read().get(token).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn current_user(&self, token: &str) -> Option<User> {
        let email = self.session(token)?.email?;
        self.user(&email)
    }

    /// Restore a returning client's user and grant the daily allowance.
    /// A session pointing at a missing account is ended.
    pub fn rehydrate(&self, token: &str, today: NaiveDate) -> Option<User> {
        let email = self.session(token)?.email?;

        if self.user(&email).is_none() {
            warn!("Session refers to unknown user {}, signing out", email);
            self.log_out(token);
            return None;
        }

        if let Err(e) = self.apply_daily_allowance(&email, today) {
            warn!("Could not apply daily allowance for {}: {}", email, e);
        }
        self.user(&email)
    }

    /// Unlock the admin console. An existing session is promoted, otherwise
    /// a new admin-only session starts. Returns the token on a match.
    pub fn admin_log_in(&self, token: Option<&str>, passcode: &str) -> Option<String> {
        if self.admin_passcode.is_empty() {
            return None;
        }

        let matched: bool = self
            .admin_passcode
            .as_bytes()
            .ct_eq(passcode.as_bytes())
            .into();
        if !matched {
            warn!("Rejected admin passcode");
            return None;
        }

        info!("Admin session started");
        {
            let mut sessions = self.sessions.write();
            if let Some(session) = token.and_then(|t| sessions.get_mut(t)) {
                session.is_admin = true;
                self.save_sessions(&sessions);
                return token.map(str::to_string);
            }
        }
        Some(self.start_session(Session {
            email: None,
            is_admin: true,
        }))
    }

    pub fn is_admin(&self, token: &str) -> bool {
        self.sessions
            .read()
            .get(token)
            .map_or(false, |session| session.is_admin)
    }

    // ========== Points ==========

    /// Grant the tier's allowance once per calendar day.
    /// Returns the amount granted, or `None` if already granted today.
    pub fn apply_daily_allowance(&self, email: &str, today: NaiveDate) -> Result<Option<u32>> {
        let mut users = self.users.write();
        let user = users
            .iter_mut()
            .find(|u| u.has_email(email))
            .ok_or_else(|| StoreError::not_found("user", email))?;

        if !dates::is_new_day(user.last_login, today) {
            return Ok(None);
        }

        let amount = seed::daily_allowance(user.tier);
        user.points = user.points.saturating_add(amount);
        user.last_login = Some(today);
        debug!("Granted {} daily points to {}", amount, user.email);

        self.save(&users);
        Ok(Some(amount))
    }

    /// Returns the new balance
    pub fn add_points(&self, email: &str, amount: u32) -> Result<u32> {
        self.with_user(email, |user| {
            user.points = user.points.saturating_add(amount);
            Ok(user.points)
        })
    }

    /// Deduct points. Callers check affordability first; the balance
    /// stops at zero rather than going negative. Returns the new balance.
    pub fn spend_points(&self, email: &str, amount: u32) -> Result<u32> {
        self.with_user(email, |user| {
            user.points = user.points.saturating_sub(amount);
            Ok(user.points)
        })
    }

    /// Check and deduct in one step. Returns the new balance.
    pub fn charge_points(&self, email: &str, amount: u32) -> Result<u32> {
        self.with_user(email, |user| {
            if user.points < amount {
                return Err(StoreError::InsufficientPoints {
                    needed: amount,
                    balance: user.points,
                });
            }
            user.points -= amount;
            Ok(user.points)
        })
    }

    // ========== Projects ==========

    pub fn projects(&self, email: &str) -> Vec<UserProject> {
        self.user(email).map(|u| u.projects).unwrap_or_default()
    }

    pub fn add_project(&self, email: &str, project: UserProject) -> Result<()> {
        self.with_user(email, |user| {
            if user.projects.iter().any(|p| p.id == project.id) {
                return Err(StoreError::duplicate("project", project.id.clone()));
            }
            user.projects.push(project);
            Ok(())
        })
    }

    pub fn delete_project(&self, email: &str, project_id: &str) -> bool {
        self.with_user(email, |user| {
            let before = user.projects.len();
            user.projects.retain(|p| p.id != project_id);
            Ok(user.projects.len() != before)
        })
        .unwrap_or(false)
    }
}

fn load_users(storage: &dyn KeyValueStorage) -> Vec<User> {
    let mut users: Vec<User> = match storage.get(USERS_STORAGE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Stored user roster is invalid, starting empty: {}", e);
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Could not read user roster: {}", e);
            Vec::new()
        }
    };

    let mut projects: ProjectMap = match storage.get(PROJECTS_STORAGE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Stored projects are invalid, ignoring them: {}", e);
            ProjectMap::new()
        }),
        Ok(None) => ProjectMap::new(),
        Err(e) => {
            warn!("Could not read user projects: {}", e);
            ProjectMap::new()
        }
    };

    for user in &mut users {
        user.projects = projects.remove(&User::email_key(&user.email)).unwrap_or_default();
    }
    if !projects.is_empty() {
        debug!("Dropped projects for {} unknown users", projects.len());
    }
    users
}

/// Projects go first: a failed roster write then never leaves the roster
/// newer than the projects it is joined with.
fn write_users(storage: &dyn KeyValueStorage, users: &[User]) -> Result<()> {
    let mut roster = Vec::with_capacity(users.len());
    let mut projects = ProjectMap::new();

    for user in users {
        let mut entry = user.clone();
        let owned = std::mem::take(&mut entry.projects);
        if !owned.is_empty() {
            projects.insert(User::email_key(&user.email), owned);
        }
        roster.push(entry);
    }

    storage.set(PROJECTS_STORAGE_KEY, &serde_json::to_string(&projects)?)?;
    storage.set(USERS_STORAGE_KEY, &serde_json::to_string(&roster)?)?;
    Ok(())
}

fn load_sessions(storage: &dyn KeyValueStorage) -> SessionMap {
    match storage.get(SESSION_STORAGE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            debug!("Discarding unreadable sessions: {}", e);
            SessionMap::new()
        }),
        _ => SessionMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn open() -> (Arc<MemoryStorage>, Arc<MemoryStorage>, UserStore) {
        let storage = Arc::new(MemoryStorage::new());
        let session = Arc::new(MemoryStorage::new());
        let store = UserStore::open(storage.clone(), session.clone(), "letmein");
        (storage, session, store)
    }

    /// Memory storage that refuses writes to one key
    struct RefuseKey {
        inner: MemoryStorage,
        key: &'static str,
        refusing: RwLock<bool>,
    }

    impl KeyValueStorage for RefuseKey {
        fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            if key == self.key && *self.refusing.read() {
                return Err(StorageError::Unavailable("refused".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_sign_up_rejects_duplicate_email() {
        let (_, _, store) = open();
        store.sign_up("Fan@Example.com", "Fan", day(1)).unwrap();

        let err = store.sign_up("fan@example.COM", "Other", day(1)).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
        assert_eq!(store.users().len(), 1);
    }

    #[test]
    fn test_sign_up_requires_fields() {
        let (_, _, store) = open();
        assert!(matches!(
            store.sign_up("  ", "Fan", day(1)),
            Err(StoreError::EmptyField("email"))
        ));
        assert!(matches!(
            store.sign_up("fan@example.com", "", day(1)),
            Err(StoreError::EmptyField("name"))
        ));
        assert!(store.users().is_empty());
    }

    #[test]
    fn test_sign_up_signs_in() {
        let (_, _, store) = open();
        let signed = store.sign_up("fan@example.com", "Fan", day(1)).unwrap();
        assert_eq!(signed.user.points, seed::WELCOME_POINTS);
        assert_eq!(
            store.current_user(&signed.token).unwrap().email,
            "fan@example.com"
        );
    }

    #[test]
    fn test_sessions_are_per_client() {
        let (_, _, store) = open();
        let a = store.sign_up("a@example.com", "A", day(1)).unwrap();
        let b = store.sign_up("b@example.com", "B", day(1)).unwrap();

        assert_ne!(a.token, b.token);
        assert_eq!(store.current_user(&a.token).unwrap().email, "a@example.com");
        assert_eq!(store.current_user(&b.token).unwrap().email, "b@example.com");

        store.log_out(&a.token);
        assert!(store.current_user(&a.token).is_none());
        assert_eq!(store.current_user(&b.token).unwrap().email, "b@example.com");
        assert!(store.current_user("not-a-token").is_none());
    }

    #[test]
    fn test_daily_allowance_once_per_day() {
        let (_, _, store) = open();
        store.sign_up("fan@example.com", "Fan", day(1)).unwrap();

        // already stamped today by sign-up
        assert_eq!(store.apply_daily_allowance("fan@example.com", day(1)).unwrap(), None);
        assert_eq!(store.user("fan@example.com").unwrap().points, seed::WELCOME_POINTS);

        let granted = store.apply_daily_allowance("fan@example.com", day(2)).unwrap();
        assert_eq!(granted, Some(seed::daily_allowance(Tier::Free)));
        assert_eq!(store.apply_daily_allowance("fan@example.com", day(2)).unwrap(), None);

        let user = store.user("fan@example.com").unwrap();
        assert_eq!(user.points, seed::WELCOME_POINTS + seed::daily_allowance(Tier::Free));
        assert_eq!(user.last_login, Some(day(2)));
    }

    #[test]
    fn test_allowance_granted_when_last_login_is_ahead() {
        let (_, _, store) = open();
        store.sign_up("fan@example.com", "Fan", day(10)).unwrap();

        let granted = store.apply_daily_allowance("fan@example.com", day(9)).unwrap();
        assert_eq!(granted, Some(seed::daily_allowance(Tier::Free)));
        assert_eq!(store.user("fan@example.com").unwrap().last_login, Some(day(9)));
        assert_eq!(store.apply_daily_allowance("fan@example.com", day(9)).unwrap(), None);
    }

    #[test]
    fn test_allowance_follows_tier() {
        let (_, _, store) = open();
        store.sign_up("vip@example.com", "Big Fan", day(1)).unwrap();
        store.set_tier("vip@example.com", Tier::Vip).unwrap();

        let granted = store.apply_daily_allowance("VIP@example.com", day(5)).unwrap();
        assert_eq!(granted, Some(seed::daily_allowance(Tier::Vip)));
    }

    #[test]
    fn test_rehydrate_grants_allowance_from_session() {
        let (storage, session, store) = open();
        let token = store.sign_up("fan@example.com", "Fan", day(1)).unwrap().token;
        drop(store);

        let store = UserStore::open(storage.clone(), session.clone(), "letmein");
        let user = store.rehydrate(&token, day(2)).unwrap();
        assert_eq!(user.points, seed::WELCOME_POINTS + seed::daily_allowance(Tier::Free));

        // same day again: no second grant
        let store = UserStore::open(storage, session, "letmein");
        let user = store.rehydrate(&token, day(2)).unwrap();
        assert_eq!(user.points, seed::WELCOME_POINTS + seed::daily_allowance(Tier::Free));
    }

    #[test]
    fn test_rehydrate_ends_unknown_session() {
        let (storage, session, _) = open();
        session
            .set(
                SESSION_STORAGE_KEY,
                r#"{"t-1": {"email": "ghost@example.com", "isAdmin": false}}"#,
            )
            .unwrap();
        let store = UserStore::open(storage, session, "letmein");
        assert_eq!(store.session_count(), 1);
        assert!(store.rehydrate("t-1", day(1)).is_none());
        assert!(store.session("t-1").is_none());
    }

    #[test]
    fn test_log_in_and_out() {
        let (_, _, store) = open();
        let first = store.sign_up("fan@example.com", "Fan", day(1)).unwrap();
        store.log_out(&first.token);
        assert!(store.current_user(&first.token).is_none());

        let signed = store.log_in("FAN@example.com", day(3)).unwrap();
        assert_eq!(signed.user.email, "fan@example.com");
        assert_eq!(signed.user.last_login, Some(day(3)));
        assert_eq!(
            store.current_user(&signed.token).map(|u| u.email),
            Some("fan@example.com".to_string())
        );
        assert!(matches!(
            store.log_in("nobody@example.com", day(3)),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_spend_never_goes_negative() {
        let (_, _, store) = open();
        store.sign_up("fan@example.com", "Fan", day(1)).unwrap();
        assert_eq!(store.spend_points("fan@example.com", 20).unwrap(), seed::WELCOME_POINTS - 20);
        assert_eq!(store.spend_points("fan@example.com", 10_000).unwrap(), 0);
        assert_eq!(store.add_points("fan@example.com", 7).unwrap(), 7);
    }

    #[test]
    fn test_charge_refuses_overdraft() {
        let (_, _, store) = open();
        store.sign_up("fan@example.com", "Fan", day(1)).unwrap();

        assert_eq!(store.charge_points("fan@example.com", 30).unwrap(), seed::WELCOME_POINTS - 30);
        let err = store.charge_points("fan@example.com", 1_000).unwrap_err();
        assert!(matches!(err, StoreError::InsufficientPoints { needed: 1_000, .. }));
        assert_eq!(store.user("fan@example.com").unwrap().points, seed::WELCOME_POINTS - 30);
    }

    #[test]
    fn test_projects_stored_apart_and_rejoined() {
        let (storage, session, store) = open();
        store.sign_up("Fan@Example.com", "Fan", day(1)).unwrap();
        let project = UserProject::saved_image("Cover", "data:image/png;base64,AA".into(), "neon".into());
        store.add_project("fan@example.com", project.clone()).unwrap();
        assert!(store.add_project("fan@example.com", project.clone()).is_err());

        let roster = storage.get(USERS_STORAGE_KEY).unwrap().unwrap();
        assert!(!roster.contains(&project.id));
        let projects = storage.get(PROJECTS_STORAGE_KEY).unwrap().unwrap();
        assert!(projects.contains("fan@example.com"));
        assert!(projects.contains(&project.id));

        let reopened = UserStore::open(storage, session, "letmein");
        assert_eq!(reopened.projects("fan@example.com"), vec![project.clone()]);

        assert!(reopened.delete_project("fan@example.com", &project.id));
        assert!(!reopened.delete_project("fan@example.com", &project.id));
        assert!(!reopened.delete_project("nobody@example.com", &project.id));
    }

    #[test]
    fn test_failed_projects_write_keeps_roster_unchanged() {
        let storage = Arc::new(RefuseKey {
            inner: MemoryStorage::new(),
            key: PROJECTS_STORAGE_KEY,
            refusing: RwLock::new(false),
        });
        let store = UserStore::open(storage.clone(), Arc::new(MemoryStorage::new()), "");
        store.sign_up("fan@example.com", "Fan", day(1)).unwrap();
        let roster_before = storage.get(USERS_STORAGE_KEY).unwrap();

        *storage.refusing.write() = true;
        let project = UserProject::saved_image("Cover", "data:,".into(), "neon".into());
        store.add_project("fan@example.com", project).unwrap();
        store.add_points("fan@example.com", 5).unwrap();

        assert_eq!(storage.get(USERS_STORAGE_KEY).unwrap(), roster_before);
        assert_eq!(store.take_notices().len(), 1);
    }

    #[test]
    fn test_admin_passcode() {
        let (_, _, store) = open();
        assert!(store.admin_log_in(None, "wrong").is_none());

        let token = store.admin_log_in(None, "letmein").unwrap();
        assert!(store.is_admin(&token));
        assert!(store.current_user(&token).is_none());
        store.log_out(&token);
        assert!(!store.is_admin(&token));

        let fan = store.sign_up("fan@example.com", "Fan", day(1)).unwrap().token;
        assert!(!store.is_admin(&fan));
        assert_eq!(store.admin_log_in(Some(fan.as_str()), "letmein"), Some(fan.clone()));
        assert!(store.is_admin(&fan));

        let (storage, session, _) = open();
        let locked = UserStore::open(storage, session, "");
        assert!(locked.admin_log_in(None, "").is_none());
    }

    #[test]
    fn test_save_failure_reported_once() {
        let (storage, _, store) = open();
        store.sign_up("fan@example.com", "Fan", day(1)).unwrap();
        storage.set_quota(Some(4));

        store.add_points("fan@example.com", 5).unwrap();
        store.add_points("fan@example.com", 5).unwrap();

        assert_eq!(store.user("fan@example.com").unwrap().points, seed::WELCOME_POINTS + 10);
        assert_eq!(store.take_notices().len(), 1);
    }
}
