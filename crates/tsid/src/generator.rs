use crate::{
    id::TsId,
    node::derive_node_id,
    time::{TimeSource, WallClock},
};
use portable_atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

/// A lock-free [`TsId`] factory.
///
/// Holds an immutable node ID, a clock anchored to an epoch, and a shared
/// counter advanced with an atomic fetch-and-add. [`next_id`] never blocks,
/// never fails, and is safe to call concurrently from any number of
/// threads.
///
/// The counter is **not** reset when the timestamp advances: it only ever
/// increases, modulo 2^16, across the generator's lifetime. IDs minted at
/// the same millisecond are therefore distinguished by counter value, but
/// only up to 65536 generations' worth of separation.
///
/// # Example
/// ```
/// use tsid::TsIdGenerator;
///
/// let generator = TsIdGenerator::with_node_id(7);
/// let a = generator.next_id();
/// let b = generator.next_id();
/// assert_eq!(a.node_id(), 7);
/// assert_ne!(a, b);
/// ```
///
/// [`next_id`]: TsIdGenerator::next_id
pub struct TsIdGenerator<C = WallClock> {
    node_id: u8,
    counter: AtomicU64,
    clock: C,
}

impl TsIdGenerator<WallClock> {
    /// Creates a generator with a node ID derived from the machine name
    /// and the default epoch (2020-01-01T00:00:00Z).
    pub fn new() -> Self {
        Self::from_clock(derive_node_id(), WallClock::default())
    }

    /// Creates a generator with an explicit node ID and the default epoch.
    ///
    /// The node ID is masked to 6 bits, never rejected.
    pub fn with_node_id(node_id: u8) -> Self {
        Self::from_clock(node_id, WallClock::default())
    }

    /// Creates a generator with a derived node ID and a custom epoch,
    /// specified as a [`Duration`] since the Unix epoch.
    pub fn with_epoch(epoch: Duration) -> Self {
        Self::from_clock(derive_node_id(), WallClock::with_epoch(epoch))
    }

    /// Creates a generator with an explicit node ID and a custom epoch.
    pub fn with_node_id_and_epoch(node_id: u8, epoch: Duration) -> Self {
        Self::from_clock(node_id, WallClock::with_epoch(epoch))
    }
}

impl Default for TsIdGenerator<WallClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TsIdGenerator<C>
where
    C: TimeSource,
{
    /// Creates a generator from an explicit node ID and time source.
    ///
    /// This is the generic constructor the convenience constructors funnel
    /// into; it also lets tests inject a mock clock.
    pub fn from_clock(node_id: u8, clock: C) -> Self {
        Self::from_state(node_id, 0, clock)
    }

    /// Creates a generator with a preloaded counter value.
    ///
    /// Useful for restoring a counter position; in typical use, prefer
    /// [`Self::from_clock`] and let the counter start at zero.
    pub fn from_state(node_id: u8, counter: u64, clock: C) -> Self {
        Self {
            node_id: node_id & TsId::NODE_ID_MASK as u8,
            counter: AtomicU64::new(counter),
            clock,
        }
    }

    /// The node ID stamped into every generated ID.
    pub fn node_id(&self) -> u8 {
        self.node_id
    }

    /// Generates the next ID.
    ///
    /// Reads the elapsed milliseconds from the clock, atomically advances
    /// the shared counter, and packs both with the node ID. The counter is
    /// the post-increment value truncated to 16 bits, so concurrent callers
    /// never observe duplicate or lost counter values.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> TsId {
        let elapsed_ms = self.clock.current_millis();
        let counter = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1) as u16;
        TsId::from_parts(elapsed_ms, self.node_id, counter)
    }
}

static DEFAULT_GENERATOR: OnceLock<TsIdGenerator> = OnceLock::new();

/// Returns the process-wide default generator.
///
/// Lazily constructed exactly once with [`TsIdGenerator::new`]; racing
/// callers all observe the same instance, so the node ID derivation runs
/// at most once per process. Shared by every call to [`TsId::generate`].
pub fn default_generator() -> &'static TsIdGenerator {
    DEFAULT_GENERATOR.get_or_init(TsIdGenerator::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct MockTime {
        millis: u64,
    }

    impl TimeSource for MockTime {
        fn current_millis(&self) -> u64 {
            self.millis
        }
    }

    struct MockStepTime {
        values: Vec<u64>,
        index: Cell<usize>,
    }

    impl TimeSource for Rc<MockStepTime> {
        fn current_millis(&self) -> u64 {
            self.values[self.index.get()]
        }
    }

    #[test]
    fn counter_progresses_in_call_order() {
        let generator = TsIdGenerator::from_clock(7, MockTime { millis: 42 });
        for expected in 1..=16_u16 {
            let id = generator.next_id();
            assert_eq!(id.timestamp(), 42);
            assert_eq!(id.node_id(), 7);
            assert_eq!(id.counter(), expected);
        }
    }

    #[test]
    fn counter_wraps_modulo_two_pow_sixteen() {
        let generator = TsIdGenerator::from_state(3, u64::from(u16::MAX) - 1, MockTime { millis: 0 });
        assert_eq!(generator.next_id().counter(), u16::MAX);
        assert_eq!(generator.next_id().counter(), 0);
        assert_eq!(generator.next_id().counter(), 1);
    }

    #[test]
    fn counter_does_not_reset_when_timestamp_advances() {
        let time = Rc::new(MockStepTime {
            values: vec![42, 43],
            index: Cell::new(0),
        });
        let generator = TsIdGenerator::from_clock(1, time.clone());

        let first = generator.next_id();
        assert_eq!(first.timestamp(), 42);
        assert_eq!(first.counter(), 1);

        time.index.set(1);

        let second = generator.next_id();
        assert_eq!(second.timestamp(), 43);
        assert_eq!(second.counter(), 2);
    }

    #[test]
    fn later_tick_yields_numerically_greater_id() {
        let time = Rc::new(MockStepTime {
            values: vec![100, 250],
            index: Cell::new(0),
        });
        // Counter near wrap so the later ID has a *smaller* counter
        let generator = TsIdGenerator::from_state(1, u64::from(u16::MAX) - 1, time.clone());

        let earlier = generator.next_id();
        time.index.set(1);
        let later = generator.next_id();

        assert!(later.counter() < earlier.counter());
        assert!(later.to_raw() > earlier.to_raw());
    }

    #[test]
    fn node_id_is_masked_at_construction() {
        let generator = TsIdGenerator::from_clock(0xFF, MockTime { millis: 0 });
        assert_eq!(generator.node_id(), 63);
        assert_eq!(generator.next_id().node_id(), 63);
    }

    #[test]
    fn wall_clock_generator_produces_current_timestamps() {
        let generator = TsIdGenerator::with_node_id(7);
        let id = generator.next_id();
        assert_eq!(id.node_id(), 7);
        assert!(id.timestamp() > 0);
        assert!(id.timestamp() < (1 << 42));
    }

    #[test]
    fn custom_epoch_shifts_the_timestamp_origin() {
        let unix_now_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;

        // Anchored to the Unix epoch, the timestamp is plain wall-clock time
        let generator = TsIdGenerator::with_node_id_and_epoch(5, Duration::ZERO);
        let id = generator.next_id();

        assert_eq!(id.node_id(), 5);
        assert!(id.timestamp() >= unix_now_ms);
        assert!(id.timestamp() < unix_now_ms + 60_000);
    }

    #[test]
    fn concurrent_generation_never_loses_counter_values() {
        use std::collections::HashSet;
        use std::sync::{Arc, Mutex};
        use std::thread::scope;

        const THREADS: usize = 8;
        const TOTAL_IDS: usize = 4096;
        const IDS_PER_THREAD: usize = TOTAL_IDS / THREADS;

        struct FixedTime;
        impl TimeSource for FixedTime {
            fn current_millis(&self) -> u64 {
                42
            }
        }

        // With a pinned clock, uniqueness rests entirely on the counter.
        let generator = Arc::new(TsIdGenerator::from_clock(0, FixedTime));
        let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

        scope(|s| {
            for _ in 0..THREADS {
                let generator = Arc::clone(&generator);
                let seen_ids = Arc::clone(&seen_ids);

                s.spawn(move || {
                    for _ in 0..IDS_PER_THREAD {
                        let id = generator.next_id();
                        let mut set = seen_ids.lock().unwrap();
                        assert!(set.insert(id));
                    }
                });
            }
        });

        let final_count = seen_ids.lock().unwrap().len();
        assert_eq!(final_count, TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");
    }

    #[test]
    fn default_generator_is_initialized_once() {
        let a = default_generator() as *const TsIdGenerator;
        let b = default_generator() as *const TsIdGenerator;
        assert!(core::ptr::eq(a, b));
        assert!(default_generator().node_id() <= 63);
    }

    #[test]
    fn generate_uses_the_default_generator() {
        let a = TsId::generate();
        let b = TsId::generate();
        assert_ne!(a, b);
        assert_eq!(a.node_id(), default_generator().node_id());
        assert_eq!(b.counter(), a.counter().wrapping_add(1));
    }
}
