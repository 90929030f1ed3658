//! Newest-first record log with tail eviction.

use crate::clock::{Clock, SystemClock};
use crate::error::GalleryError;
use crate::model::{DailyCount, GalleryRecord};
use chrono::Local;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use uuid::Uuid;

/// Default number of records the log keeps.
pub const MAX_CAPACITY: usize = 50;
/// Window used by `list_latest` when the caller asks for zero or fewer.
pub const DEFAULT_LATEST: usize = 10;

/// Mutable state guarded by one lock so append and eviction stay atomic.
#[derive(Debug, Default)]
struct LogState {
    records: VecDeque<Arc<GalleryRecord>>,
    next_sequence: u64,
}

/// Capacity-limited gallery ordered newest-first.
///
/// Records are immutable once inserted and handed out as `Arc`s, so every
/// read returns a snapshot that later inserts cannot change.
pub struct BoundedRecordLog {
    state: RwLock<LogState>,
    capacity: usize,
    default_latest: usize,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for BoundedRecordLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedRecordLog")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("default_latest", &self.default_latest)
            .finish()
    }
}

impl Default for BoundedRecordLog {
    fn default() -> Self {
        Self::new(MAX_CAPACITY)
    }
}

impl BoundedRecordLog {
    /// Create an empty log holding at most `capacity` records (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    /// Create an empty log stamped by the provided clock.
    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = capacity.max(1);
        info!("initialized gallery log (capacity={capacity})");
        Self {
            state: RwLock::new(LogState {
                records: VecDeque::with_capacity(capacity + 1),
                next_sequence: 0,
            }),
            capacity,
            default_latest: DEFAULT_LATEST,
            clock,
        }
    }

    /// Override the window used when `list_latest` receives `n <= 0`.
    pub fn with_default_latest(mut self, default_latest: usize) -> Self {
        self.default_latest = default_latest.max(1);
        self
    }

    /// Maximum number of records kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Window used for non-positive `list_latest` requests.
    pub fn default_latest(&self) -> usize {
        self.default_latest
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    /// Whether the log holds no records.
    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }

    /// Insert a payload at the front, evicting the oldest records past capacity.
    pub fn insert(&self, payload: impl Into<String>) -> Result<Arc<GalleryRecord>, GalleryError> {
        self.insert_record(payload.into(), None)
    }

    /// Insert a payload together with the prompt that produced it.
    pub fn insert_with_prompt(
        &self,
        payload: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Result<Arc<GalleryRecord>, GalleryError> {
        let prompt = prompt.into();
        let prompt = (!prompt.trim().is_empty()).then_some(prompt);
        self.insert_record(payload.into(), prompt)
    }

    fn insert_record(
        &self,
        payload: String,
        prompt: Option<String>,
    ) -> Result<Arc<GalleryRecord>, GalleryError> {
        if payload.trim().is_empty() {
            return Err(GalleryError::InvalidInput(
                "payload must not be empty".to_string(),
            ));
        }

        let now = self.clock.now();
        let mut state = self.state.write();
        // Clamp to the head so created_at stays non-increasing front to back.
        let created_at = match state.records.front() {
            Some(head) if head.created_at > now => head.created_at,
            _ => now,
        };
        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let record = Arc::new(GalleryRecord {
            id: Uuid::new_v4(),
            sequence,
            payload,
            prompt,
            created_at,
        });
        state.records.push_front(record.clone());

        let mut evicted = 0usize;
        while state.records.len() > self.capacity {
            state.records.pop_back();
            evicted += 1;
        }
        debug!(
            "gallery insert (id={}, sequence={}, payload_len={}, len={}, evicted={})",
            record.id,
            record.sequence,
            record.payload.len(),
            state.records.len(),
            evicted
        );
        Ok(record)
    }

    /// Every record, newest first.
    pub fn list_all(&self) -> Vec<Arc<GalleryRecord>> {
        self.state.read().records.iter().cloned().collect()
    }

    /// The `n` most recent records; `n <= 0` falls back to the default window.
    pub fn list_latest(&self, n: i64) -> Vec<Arc<GalleryRecord>> {
        let window = usize::try_from(n)
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(self.default_latest);
        self.state
            .read()
            .records
            .iter()
            .take(window)
            .cloned()
            .collect()
    }

    /// Total records plus those created on the current local calendar day.
    pub fn count_today(&self) -> DailyCount {
        let today = self.clock.now().with_timezone(&Local).date_naive();
        let state = self.state.read();
        let today_count = state
            .records
            .iter()
            .take_while(|record| record.created_at.with_timezone(&Local).date_naive() >= today)
            .filter(|record| record.created_at.with_timezone(&Local).date_naive() == today)
            .count();
        DailyCount {
            total: state.records.len(),
            today: today_count,
        }
    }

    /// Drop every record. Sequence numbers keep increasing afterwards.
    pub fn clear(&self) {
        let mut state = self.state.write();
        let dropped = state.records.len();
        state.records.clear();
        info!("gallery cleared (dropped={dropped})");
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundedRecordLog, DEFAULT_LATEST, MAX_CAPACITY};
    use crate::GalleryError;
    use crate::clock::Clock;
    use chrono::{DateTime, Duration, Utc};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// Clock that walks backwards on every call.
    struct RegressingClock {
        next: Mutex<DateTime<Utc>>,
    }

    impl Clock for RegressingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self.next.lock();
            let current = *next;
            *next = current - Duration::seconds(5);
            current
        }
    }

    fn filled(log: &BoundedRecordLog, count: usize) {
        for idx in 0..count {
            log.insert(format!("data:image/png;base64,{idx}"))
                .expect("insert");
        }
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let log = BoundedRecordLog::default();
        for idx in 0..(MAX_CAPACITY * 2) {
            log.insert(format!("payload-{idx}")).expect("insert");
            assert!(log.len() <= MAX_CAPACITY);
        }
        assert_eq!(log.len(), MAX_CAPACITY);
    }

    #[test]
    fn new_record_lands_at_front() {
        let log = BoundedRecordLog::default();
        filled(&log, 3);
        let before = log.list_all();
        let record = log.insert("fresh").expect("insert");
        assert!(before.iter().all(|existing| existing.id != record.id));
        let after = log.list_all();
        assert_eq!(after[0].id, record.id);
        assert_eq!(after[0].payload, "fresh");
    }

    #[test]
    fn evicts_oldest_first() {
        let log = BoundedRecordLog::default();
        for idx in 0..55 {
            log.insert(format!("payload-{idx}")).expect("insert");
        }
        let records = log.list_all();
        assert_eq!(records.len(), 50);
        assert_eq!(records[0].payload, "payload-54");
        assert_eq!(records[49].payload, "payload-5");
        let sequences: Vec<u64> = records.iter().map(|record| record.sequence).collect();
        let expected: Vec<u64> = (5..55).rev().collect();
        assert_eq!(sequences, expected);
    }

    #[test]
    fn rejects_blank_payload_without_mutation() {
        let log = BoundedRecordLog::default();
        filled(&log, 2);
        let err = log.insert("").unwrap_err();
        assert!(matches!(err, GalleryError::InvalidInput(_)));
        let err = log.insert("   ").unwrap_err();
        assert!(matches!(err, GalleryError::InvalidInput(_)));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn latest_falls_back_to_default_window() {
        let log = BoundedRecordLog::default();
        filled(&log, 20);
        assert_eq!(log.list_latest(0).len(), DEFAULT_LATEST);
        assert_eq!(log.list_latest(-3).len(), DEFAULT_LATEST);
        assert_eq!(log.list_latest(0), log.list_latest(10));
    }

    #[test]
    fn latest_is_bounded_by_length() {
        let log = BoundedRecordLog::default();
        filled(&log, 3);
        let latest = log.list_latest(5);
        assert_eq!(latest.len(), 3);
        assert_eq!(latest, log.list_all());
    }

    #[test]
    fn configured_default_window_is_used() {
        let log = BoundedRecordLog::new(MAX_CAPACITY).with_default_latest(4);
        filled(&log, 8);
        assert_eq!(log.list_latest(0).len(), 4);
    }

    #[test]
    fn snapshots_do_not_observe_later_inserts() {
        let log = BoundedRecordLog::new(2);
        filled(&log, 2);
        let snapshot = log.list_all();
        filled(&log, 2);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].payload, "data:image/png;base64,1");
    }

    #[test]
    fn zero_capacity_keeps_one_record() {
        let log = BoundedRecordLog::new(0);
        filled(&log, 3);
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn regressing_clock_keeps_order() {
        let clock = Arc::new(RegressingClock {
            next: Mutex::new(Utc::now()),
        });
        let log = BoundedRecordLog::with_clock(MAX_CAPACITY, clock);
        filled(&log, 4);
        let records = log.list_all();
        for pair in records.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn empty_log_counts_zero() {
        let log = BoundedRecordLog::default();
        let counts = log.count_today();
        assert_eq!(counts.total, 0);
        assert_eq!(counts.today, 0);
    }

    #[test]
    fn clear_resets_and_keeps_sequence_monotonic() {
        let log = BoundedRecordLog::default();
        filled(&log, 3);
        log.clear();
        assert!(log.is_empty());
        log.clear();
        let record = log.insert("after clear").expect("insert");
        assert_eq!(record.sequence, 3);
    }

    #[test]
    fn concurrent_inserts_respect_capacity() {
        let log = Arc::new(BoundedRecordLog::new(16));
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for idx in 0..50 {
                        log.insert(format!("{worker}-{idx}")).expect("insert");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("join");
        }
        let records = log.list_all();
        assert_eq!(records.len(), 16);
        for pair in records.windows(2) {
            assert!(pair[0].sequence > pair[1].sequence);
        }
    }
}
