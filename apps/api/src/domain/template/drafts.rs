// Open editing sessions, keyed by owner and draft id
// The lock is never held across a gateway call: saves go through
// begin_save / complete_save in two short critical sections.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::errors::TemplateError;
use super::gateway::TemplateGateway;
use super::session::{EditingSession, SessionError, SessionState};
use super::template::Template;

/// Sessions untouched for this long are dropped on the next `open`
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Open drafts kept per owner; the least recently used one is evicted
pub const DEFAULT_MAX_DRAFTS_PER_OWNER: usize = 32;

const SAVE_INTERRUPTED: &str = "Save was interrupted";

/// Error returned by [`DraftStore`] operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Draft not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Session(#[from] SessionError),
}

type DraftKey = (Uuid, Uuid);
type Sessions = HashMap<DraftKey, DraftEntry>;

struct DraftEntry {
    session: EditingSession,
    touched: Instant,
}

impl DraftEntry {
    fn new(session: EditingSession) -> Self {
        Self {
            session,
            touched: Instant::now(),
        }
    }

    fn is_saving(&self) -> bool {
        self.session.state() == SessionState::Saving
    }
}

/// In-memory registry of editing sessions
///
/// Idle sessions expire after `idle_ttl` and each owner keeps at most
/// `max_per_owner` of them. Sessions with a save in flight are never
/// evicted.
pub struct DraftStore {
    sessions: Arc<RwLock<Sessions>>,
    idle_ttl: Duration,
    max_per_owner: usize,
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TTL, DEFAULT_MAX_DRAFTS_PER_OWNER)
    }
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_ttl: Duration, max_per_owner: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
            max_per_owner: max_per_owner.max(1),
        }
    }

    /// Registers a session for `owner_id` and returns its draft id
    pub async fn open(&self, owner_id: Uuid, session: EditingSession) -> Uuid {
        let draft_id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;

        self.evict_idle(&mut sessions);
        self.evict_over_cap(&mut sessions, owner_id);

        sessions.insert((owner_id, draft_id), DraftEntry::new(session));
        draft_id
    }

    /// Clone of the session's current state
    pub async fn get(&self, owner_id: Uuid, draft_id: Uuid) -> Result<EditingSession, DraftError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&(owner_id, draft_id))
            .ok_or(DraftError::NotFound(draft_id))?;
        entry.touched = Instant::now();
        Ok(entry.session.clone())
    }

    /// Runs `f` against the session under the write lock
    pub async fn update<T>(
        &self,
        owner_id: Uuid,
        draft_id: Uuid,
        f: impl FnOnce(&mut EditingSession) -> Result<T, SessionError>,
    ) -> Result<T, DraftError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&(owner_id, draft_id))
            .ok_or(DraftError::NotFound(draft_id))?;
        entry.touched = Instant::now();
        Ok(f(&mut entry.session)?)
    }

    /// Saves the draft through `gateway`
    ///
    /// Edits applied while the gateway call is pending land in the session
    /// but not in this save. If this future is dropped before the gateway
    /// answers, the session is returned to `Dirty` with an error recorded.
    pub async fn save(
        &self,
        gateway: &TemplateGateway,
        owner_id: Uuid,
        draft_id: Uuid,
    ) -> Result<Template, DraftError> {
        let request = self.update(owner_id, draft_id, |s| s.begin_save()).await?;
        let mut pending = PendingSave {
            sessions: Arc::clone(&self.sessions),
            key: (owner_id, draft_id),
            armed: true,
        };

        let outcome = request.submit(gateway, owner_id).await;
        let result = self
            .update(owner_id, draft_id, move |s| s.complete_save(outcome))
            .await;
        pending.armed = false;
        result
    }

    /// Drops the session; refused while a save is in flight
    pub async fn close(&self, owner_id: Uuid, draft_id: Uuid) -> Result<(), DraftError> {
        let mut sessions = self.sessions.write().await;
        let key = (owner_id, draft_id);
        match sessions.get(&key) {
            None => Err(DraftError::NotFound(draft_id)),
            Some(entry) if entry.is_saving() => Err(SessionError::SaveInFlight.into()),
            Some(_) => {
                sessions.remove(&key);
                Ok(())
            }
        }
    }

    fn evict_idle(&self, sessions: &mut Sessions) {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.is_saving() || entry.touched.elapsed() < self.idle_ttl);

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Dropped idle drafts");
        }
    }

    fn evict_over_cap(&self, sessions: &mut Sessions, owner_id: Uuid) {
        loop {
            let owned = sessions.keys().filter(|(owner, _)| *owner == owner_id).count();
            if owned < self.max_per_owner {
                return;
            }

            let oldest = sessions
                .iter()
                .filter(|((owner, _), entry)| *owner == owner_id && !entry.is_saving())
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(key, _)| *key);

            match oldest {
                Some(key) => {
                    tracing::debug!(owner_id = %owner_id, draft_id = %key.1, "Evicted least recently used draft");
                    sessions.remove(&key);
                }
                None => return,
            }
        }
    }
}

/// Armed while a gateway call is pending; on drop it fails the save so the
/// session does not stay in `Saving`
struct PendingSave {
    sessions: Arc<RwLock<Sessions>>,
    key: DraftKey,
    armed: bool,
}

impl Drop for PendingSave {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let sessions = Arc::clone(&self.sessions);
        let key = self.key;
        tracing::warn!(draft_id = %key.1, "Save interrupted before completion");
        runtime.spawn(async move {
            if let Some(entry) = sessions.write().await.get_mut(&key) {
                let _ = entry
                    .session
                    .complete_save(Err(TemplateError::Unexpected(SAVE_INTERRUPTED.to_string())));
            }
        });
    }
}
