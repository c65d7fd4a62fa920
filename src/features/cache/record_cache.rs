use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::data::models::StudyRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub user_id: i32,
    pub mission_id: i32,
}

struct CachedRecords {
    loaded_at: Instant,
    records: Arc<Vec<StudyRecord>>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CachedRecords>,
    // Bumped by every invalidation touching the mission
    generations: HashMap<i32, u64>,
}

impl CacheState {
    fn generation(&self, mission_id: i32) -> Generation {
        Generation(self.generations.get(&mission_id).copied().unwrap_or(0))
    }

    fn bump(&mut self, mission_id: i32) {
        *self.generations.entry(mission_id).or_insert(0) += 1;
    }
}

/// Invalidation count observed before loading records from the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Bounded, time-limited cache of a mission's study records.
///
/// Entries are keyed by (user, mission). Writers must call [`invalidate`]
/// after changing a mission's records; the TTL only bounds staleness from
/// writes made outside this process.
///
/// Loaders take a [`Generation`] before reading the database and hand it
/// back to [`insert`]. If an invalidation happened in between, the rows are
/// returned to the caller but not stored.
///
/// [`invalidate`]: RecordCache::invalidate
/// [`insert`]: RecordCache::insert
pub struct RecordCache {
    state: Mutex<CacheState>,
    ttl: Duration,
    capacity: usize,
}

impl RecordCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: CacheKey) -> Option<Arc<Vec<StudyRecord>>> {
        let mut state = self.lock();
        let lookup = state
            .entries
            .get(&key)
            .map(|cached| (cached.loaded_at.elapsed() < self.ttl, Arc::clone(&cached.records)));

        match lookup {
            Some((true, records)) => Some(records),
            Some((false, _)) => {
                state.entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn generation(&self, key: CacheKey) -> Generation {
        self.lock().generation(key.mission_id)
    }

    /// Stores `records` unless the key was invalidated after `seen` was taken.
    pub fn insert(
        &self,
        key: CacheKey,
        seen: Generation,
        records: Vec<StudyRecord>,
    ) -> Arc<Vec<StudyRecord>> {
        let records = Arc::new(records);
        let mut state = self.lock();

        if state.generation(key.mission_id) != seen {
            log::debug!("Discarding stale load for {:?}", key);
            return records;
        }

        let ttl = self.ttl;
        state.entries.retain(|_, cached| cached.loaded_at.elapsed() < ttl);

        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, cached)| cached.loaded_at)
                .map(|(key, _)| *key);
            if let Some(oldest) = oldest {
                log::debug!("Evicting cached records for {:?}", oldest);
                state.entries.remove(&oldest);
            }
        }

        state.entries.insert(
            key,
            CachedRecords {
                loaded_at: Instant::now(),
                records: Arc::clone(&records),
            },
        );
        records
    }

    pub fn invalidate(&self, key: CacheKey) {
        let mut state = self.lock();
        state.entries.remove(&key);
        state.bump(key.mission_id);
    }

    /// Drops every entry for a mission, whichever user loaded it.
    pub fn invalidate_mission(&self, mission_id: i32) {
        let mut state = self.lock();
        state.entries.retain(|key, _| key.mission_id != mission_id);
        state.bump(mission_id);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }
}
