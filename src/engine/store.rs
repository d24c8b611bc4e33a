//! Process-wide session table
//!
//! Lock discipline: the table lock is only held to insert, look up (and clone
//! the `Arc`), or evict. Everything that inspects or changes a session happens
//! under that session's own mutex, after the table lock has been released.

use crate::core::error::{LabError, Result};
use crate::core::types::{Difficulty, SessionId};
use crate::engine::session::{Session, SessionSummary, SessionView, TurnOutcome};
use crate::scenarios::ScenarioCatalog;
use ahash::AHashMap;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    /// Idle time after which a session is evicted
    pub session_ttl: Duration,
    /// Table capacity; the least recently touched session makes room when full
    pub max_sessions: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(7200),
            max_sessions: 10_000,
        }
    }
}

type SessionRef = Arc<Mutex<Session>>;

pub struct SessionStore {
    catalog: Arc<ScenarioCatalog>,
    config: StoreConfig,
    sessions: RwLock<AHashMap<SessionId, SessionRef>>,
}

impl SessionStore {
    pub fn new(catalog: Arc<ScenarioCatalog>, config: StoreConfig) -> Self {
        Self {
            catalog,
            config,
            sessions: RwLock::new(AHashMap::new()),
        }
    }

    pub fn config(&self) -> StoreConfig {
        self.config
    }

    pub fn create_session(&self, scenario_id: &str, difficulty: &str) -> Result<SessionView> {
        let scenario = self.catalog.get(scenario_id)?;
        let difficulty = Difficulty::parse(difficulty).ok_or_else(|| {
            LabError::UnsupportedDifficulty {
                scenario: scenario_id.to_string(),
                difficulty: difficulty.to_string(),
            }
        })?;

        let session = Session::new(SessionId::new(), scenario, difficulty)?;
        let view = session.view();

        let mut sessions = self.sessions.write();
        if sessions.len() >= self.config.max_sessions {
            self.make_room(&mut sessions);
        }
        sessions.insert(view.session_id, Arc::new(Mutex::new(session)));
        drop(sessions);

        info!(
            session_id = %view.session_id,
            scenario = scenario_id,
            difficulty = difficulty.as_str(),
            "Session created"
        );
        Ok(view)
    }

    /// Public view of a session; does not count as activity
    pub fn get_state(&self, id: SessionId) -> Result<SessionView> {
        let entry = self.lookup(id)?;
        let session = entry.lock();
        Ok(session.view())
    }

    pub fn play_turn(&self, id: SessionId, action: &str, amount: f64) -> Result<TurnOutcome> {
        let entry = self.lookup(id)?;
        let mut session = entry.lock();
        let scenario = self.catalog.get(&session.scenario_id)?;
        let outcome = session.play_turn(scenario, action, amount)?;
        debug!(
            session_id = %id,
            turn = outcome.turn,
            action,
            phase = outcome.phase.as_str(),
            terminal = outcome.terminal,
            "Turn played"
        );
        Ok(outcome)
    }

    pub fn end_session(&self, id: SessionId) -> Result<SessionSummary> {
        let entry = self.lookup(id)?;
        let mut session = entry.lock();
        let first_end = session.summary.is_none();
        let scenario = self.catalog.get(&session.scenario_id)?;
        let summary = session.end(scenario);
        if first_end {
            info!(session_id = %id, turns = summary.turns_played, "Session ended");
        }
        Ok(summary)
    }

    /// Drop every session idle for at least the TTL; returns how many were removed
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(&entry.lock(), now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Copies of every live session, for snapshots
    pub fn export(&self) -> Vec<Session> {
        let entries: Vec<SessionRef> = self.sessions.read().values().cloned().collect();
        entries.iter().map(|entry| entry.lock().clone()).collect()
    }

    /// Insert previously exported sessions; sessions for unknown scenarios are skipped
    pub fn import(&self, restored: Vec<Session>) -> usize {
        let mut sessions = self.sessions.write();
        let mut imported = 0;
        for mut session in restored {
            if self.catalog.get(&session.scenario_id).is_err() {
                debug!(session_id = %session.id, scenario = %session.scenario_id, "Skipping session for unknown scenario");
                continue;
            }
            if sessions.len() >= self.config.max_sessions {
                break;
            }
            session.touch();
            sessions.insert(session.id, Arc::new(Mutex::new(session)));
            imported += 1;
        }
        imported
    }

    fn is_expired(&self, session: &Session, now: Instant) -> bool {
        now.duration_since(session.last_touched()) >= self.config.session_ttl
    }

    /// Find a live session, evicting it on the spot if it has expired
    fn lookup(&self, id: SessionId) -> Result<SessionRef> {
        let entry = self
            .sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| LabError::UnknownSession(id.to_string()))?;

        let expired = self.is_expired(&entry.lock(), Instant::now());
        if expired {
            let mut sessions = self.sessions.write();
            if sessions.get(&id).map_or(false, |current| Arc::ptr_eq(current, &entry)) {
                sessions.remove(&id);
            }
            info!(session_id = %id, "Evicted idle session on access");
            return Err(LabError::UnknownSession(id.to_string()));
        }
        Ok(entry)
    }

    /// Free one slot: expired sessions first, else the least recently touched
    fn make_room(&self, sessions: &mut AHashMap<SessionId, SessionRef>) {
        let now = Instant::now();
        sessions.retain(|_, entry| !self.is_expired(&entry.lock(), now));
        if sessions.len() < self.config.max_sessions {
            return;
        }

        let oldest = sessions
            .iter()
            .map(|(id, entry)| (*id, entry.lock().last_touched()))
            .min_by_key(|(_, touched)| *touched)
            .map(|(id, _)| id);
        if let Some(id) = oldest {
            sessions.remove(&id);
            info!(session_id = %id, "Evicted least recently used session");
        }
    }
}
