use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};

/// Bounded output-queue meter (C1).
///
/// Tracks current occupancy, configured capacity, and cumulative
/// enqueue/drop counts. Every counter is atomic: `on_enqueue`/`on_drop` are
/// meant to be callable from whatever context the host's packet path runs
/// in (interrupt handler, polling loop, or a cooperative task), without the
/// BRPL core itself ever blocking or suspending.
#[derive(Debug, Default)]
pub struct QueueMeter {
    length: AtomicU16,
    capacity: AtomicU16,
    enqueued_total: AtomicU32,
    dropped_total: AtomicU32,
}

impl QueueMeter {
    pub fn new(capacity: u16) -> Self {
        let meter = Self::default();
        meter.init(capacity);
        meter
    }

    /// Resets all counters and (re)sets capacity. `capacity == 0` is
    /// "uncapped": length still increments on every enqueue, nothing ever
    /// gets rejected for being over capacity, and callers dividing by
    /// capacity must check [`QueueMeter::capacity`] first.
    pub fn init(&self, capacity: u16) {
        if capacity == 0 {
            tracing::warn!("queue meter initialized with capacity 0 (uncapped mode)");
        }
        self.length.store(0, Ordering::SeqCst);
        self.capacity.store(capacity, Ordering::SeqCst);
        self.enqueued_total.store(0, Ordering::SeqCst);
        self.dropped_total.store(0, Ordering::SeqCst);
    }

    /// Records a successful enqueue. Saturates at capacity rather than
    /// erroring — rejection is the caller's decision, this meter only
    /// counts what happened.
    pub fn on_enqueue(&self) {
        let cap = self.capacity.load(Ordering::SeqCst);
        let _ = self
            .length
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |len| {
                Some(if cap == 0 || len < cap { len + 1 } else { len })
            });
        self.enqueued_total.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_dequeue(&self) {
        let _ = self
            .length
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |len| {
                Some(len.saturating_sub(1))
            });
    }

    /// Records a drop without touching `length` — a drop means the packet
    /// never entered the queue.
    pub fn on_drop(&self) {
        self.dropped_total.fetch_add(1, Ordering::SeqCst);
    }

    pub fn length(&self) -> u16 {
        self.length.load(Ordering::SeqCst)
    }

    pub fn capacity(&self) -> u16 {
        self.capacity.load(Ordering::SeqCst)
    }

    pub fn enqueued_total(&self) -> u32 {
        self.enqueued_total.load(Ordering::SeqCst)
    }

    pub fn dropped_total(&self) -> u32 {
        self.dropped_total.load(Ordering::SeqCst)
    }
}
