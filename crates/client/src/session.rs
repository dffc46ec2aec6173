//! Session access
//!
//! [`SessionHandle`] is the one place the rest of the client reads the
//! current identity from. Where the session actually lives is a
//! [`SessionStore`] detail: a JSON file for the command line, memory for
//! tests and one-shot use.

use chrono::Utc;
use donation_core::{AdminError, AdminResult, AuthUser, Role, Session};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// File name used inside the config directory
pub const SESSION_FILE_NAME: &str = "session.json";

/// Current on-disk format version
const SESSION_FORMAT_VERSION: u32 = 1;

// ============================================================================
// SessionStore
// ============================================================================

/// Persistent storage for the logged-in session
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Read the stored session, if any
    fn load(&self) -> AdminResult<Option<Session>>;

    /// Replace the stored session
    fn save(&self, session: &Session) -> AdminResult<()>;

    /// Remove the stored session
    fn clear(&self) -> AdminResult<()>;
}

/// Session kept only for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> AdminResult<Option<Session>> {
        let guard = self
            .session
            .read()
            .map_err(|_| AdminError::internal("session lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> AdminResult<()> {
        let mut guard = self
            .session
            .write()
            .map_err(|_| AdminError::internal("session lock poisoned"))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> AdminResult<()> {
        let mut guard = self
            .session
            .write()
            .map_err(|_| AdminError::internal("session lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// Wrapper written to disk so the format can evolve
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    format_version: u32,
    session: Session,
}

/// Session stored as JSON in a file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/donation-admin/session.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("donation-admin")
            .join(SESSION_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> AdminResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| AdminError::FileRead {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        match serde_json::from_str::<SessionFile>(&content) {
            Ok(file) => Ok(Some(file.session)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring unreadable session file"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> AdminResult<()> {
        let file = SessionFile {
            format_version: SESSION_FORMAT_VERSION,
            session: session.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| AdminError::FileWrite {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }
        }

        write_private(&self.path, json.as_bytes()).map_err(|e| AdminError::FileWrite {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn clear(&self) -> AdminResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AdminError::FileWrite {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }
}

/// The token file is readable by its owner only, from the moment it exists
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::fs::{OpenOptions, Permissions};
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // An older file may predate the mode above
    file.set_permissions(Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

// ============================================================================
// SessionHandle
// ============================================================================

/// Shared access to the current session with change notifications
#[derive(Clone)]
pub struct SessionHandle {
    store: Arc<dyn SessionStore>,
    changes: Arc<watch::Sender<Option<Session>>>,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("store", &self.store)
            .field("logged_in", &self.changes.borrow().is_some())
            .finish()
    }
}

impl SessionHandle {
    /// Open a handle over a store, loading whatever it holds
    pub fn open(store: Arc<dyn SessionStore>) -> AdminResult<Self> {
        let initial = store.load()?;
        let (tx, _rx) = watch::channel(initial);
        Ok(Self {
            store,
            changes: Arc::new(tx),
        })
    }

    /// A fresh handle backed by memory
    pub fn in_memory() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            store: Arc::new(MemorySessionStore::new()),
            changes: Arc::new(tx),
        }
    }

    /// The stored session, expired or not
    pub fn current(&self) -> Option<Session> {
        self.changes.borrow().clone()
    }

    /// The stored session if it has not expired
    pub fn active(&self) -> Option<Session> {
        self.current().filter(|s| !s.is_expired_at(Utc::now()))
    }

    /// Identity of the logged-in operator
    pub fn identity(&self) -> Option<AuthUser> {
        self.active().map(|s| s.user)
    }

    /// Effective role of the logged-in operator
    pub fn role(&self) -> Option<Role> {
        self.active().map(|s| s.role())
    }

    /// Identity of the logged-in operator, or the error to show instead
    pub fn require_identity(&self) -> AdminResult<AuthUser> {
        match self.current() {
            None => Err(AdminError::Unauthenticated),
            Some(session) if session.is_expired() => Err(AdminError::SessionExpired),
            Some(session) => Ok(session.user),
        }
    }

    /// Persist a new session and notify subscribers
    pub fn set(&self, session: Session) -> AdminResult<()> {
        self.store.save(&session)?;
        tracing::debug!(user = %session.user.username, "session stored");
        self.changes.send_replace(Some(session));
        Ok(())
    }

    /// Remove the session and notify subscribers
    pub fn clear(&self) -> AdminResult<()> {
        self.store.clear()?;
        tracing::debug!("session cleared");
        self.changes.send_replace(None);
        Ok(())
    }

    /// Observe session changes (login, logout)
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.changes.subscribe()
    }
}

// ============================================================================
// Tests
// ============================================================================
