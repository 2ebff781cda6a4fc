use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::Tables;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct Entry {
    loaded_at: Instant,
    tables: Tables,
}

/// Memoizes a full table load for a fixed time-to-live.
///
/// `invalidate` marks the snapshot stale so the next `load` goes back to the
/// store regardless of age. A failed reload leaves the previous snapshot in
/// place for read-only use (`last_snapshot`).
pub struct Cache {
    ttl: Duration,
    entry: Option<Entry>,
    stale: bool,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Cache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: None,
            stale: false,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn invalidate(&mut self) {
        debug!(target: "till::cache", "invalidated");
        self.stale = true;
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        match &self.entry {
            Some(entry) => !self.stale && now.saturating_duration_since(entry.loaded_at) < self.ttl,
            None => false,
        }
    }

    pub fn load<F>(&mut self, loader: F) -> Result<&Tables>
    where
        F: FnOnce() -> Result<Tables>,
    {
        self.load_at(Instant::now(), loader)
    }

    pub fn load_at<F>(&mut self, now: Instant, loader: F) -> Result<&Tables>
    where
        F: FnOnce() -> Result<Tables>,
    {
        let fresh = self.is_fresh(now);
        let entry = match self.entry.take() {
            Some(entry) if fresh => {
                debug!(target: "till::cache", "hit");
                entry
            }
            previous => {
                let reason = match (&previous, self.stale) {
                    (None, _) => "empty",
                    (Some(_), true) => "invalidated",
                    (Some(_), false) => "expired",
                };
                match loader() {
                    Ok(tables) => {
                        info!(target: "till::cache", reason, "reloaded tables");
                        self.stale = false;
                        Entry {
                            loaded_at: now,
                            tables,
                        }
                    }
                    Err(e) => {
                        warn!(target: "till::cache", reason, error = %e, "reload failed");
                        self.entry = previous;
                        return Err(e);
                    }
                }
            }
        };
        Ok(&self.entry.insert(entry).tables)
    }

    /// Most recent successful load, however old.
    pub fn last_snapshot(&self) -> Option<&Tables> {
        self.entry.as_ref().map(|e| &e.tables)
    }
}
