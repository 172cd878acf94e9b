//! Shared test doubles for the passgate workspace.
//!
//! These live in their own crate so integration tests of several crates can drive the
//! same store and notifier implementations.

use anyhow::bail;
use async_trait::async_trait;
use passgate_domain::clock::{Clock, FixedClock};
use passgate_mfa::{Notifier, SecretStore};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};
use time::{Date, Month, OffsetDateTime, Time, UtcOffset};

#[derive(Debug, Default)]
struct StoreState {
    secrets: BTreeMap<String, BTreeMap<String, String>>,
    deleted: Vec<String>,
    reads: u32,
    confirm_after: Option<u32>,
    failing_reads: BTreeSet<u32>,
    drop_writes: bool,
    fail_writes: bool,
    fail_deletes: bool,
}

/// In-memory [`SecretStore`] with hooks for simulating the user and the network.
///
/// Reads are numbered from 1 across all paths.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    state: Mutex<StoreState>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every read after the `n`-th sees its secret deleted, as if the user removed it.
    pub fn confirm_after(self, n: u32) -> Self {
        self.lock().confirm_after = Some(n);
        self
    }

    /// The given read numbers fail with a transport error.
    pub fn failing_reads(self, reads: impl IntoIterator<Item = u32>) -> Self {
        self.lock().failing_reads.extend(reads);
        self
    }

    /// Writes succeed but nothing is stored.
    pub fn dropping_writes(self) -> Self {
        self.lock().drop_writes = true;
        self
    }

    pub fn failing_writes(self) -> Self {
        self.lock().fail_writes = true;
        self
    }

    pub fn failing_deletes(self) -> Self {
        self.lock().fail_deletes = true;
        self
    }

    pub fn reads(&self) -> u32 {
        self.lock().reads
    }

    pub fn paths(&self) -> Vec<String> {
        self.lock().secrets.keys().cloned().collect()
    }

    pub fn secret(&self, path: &str) -> Option<BTreeMap<String, String>> {
        self.lock().secrets.get(path).cloned()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.lock().deleted.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn write(&self, path: &str, data: &BTreeMap<String, String>) -> anyhow::Result<()> {
        let mut state = self.lock();
        if state.fail_writes {
            bail!("permission denied writing {path}");
        }
        if !state.drop_writes {
            state.secrets.insert(path.to_string(), data.clone());
        }
        Ok(())
    }

    async fn read(&self, path: &str) -> anyhow::Result<bool> {
        let mut state = self.lock();
        state.reads += 1;
        let n = state.reads;

        if state.failing_reads.contains(&n) {
            bail!("connection reset reading {path}");
        }
        if state.confirm_after.is_some_and(|after| n > after) {
            state.secrets.remove(path);
        }
        Ok(state.secrets.contains_key(path))
    }

    async fn delete(&self, path: &str) -> anyhow::Result<()> {
        let mut state = self.lock();
        if state.fail_deletes {
            bail!("permission denied deleting {path}");
        }
        state.secrets.remove(path);
        state.deleted.push(path.to_string());
        Ok(())
    }
}

/// [`Notifier`] that keeps every message it is sent.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose sends all fail (nothing is recorded).
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_message(&self, text: &str) -> anyhow::Result<()> {
        if self.fail {
            bail!("notifier unavailable");
        }
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(text.to_string());
        Ok(())
    }
}

/// A UTC instant. Panics on an invalid date or time.
pub fn utc(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> OffsetDateTime {
    let month = Month::try_from(month).expect("valid month");
    let date = Date::from_calendar_date(year, month, day).expect("valid date");
    let time = Time::from_hms(hour, minute, second).expect("valid time");
    date.with_time(time).assume_offset(UtcOffset::UTC)
}

/// A shared clock frozen at `at`.
pub fn fixed_clock(at: OffsetDateTime) -> Arc<dyn Clock> {
    Arc::new(FixedClock(at))
}
