use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default epoch: Wednesday, January 1, 2020 00:00:00 UTC
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_577_836_800_000);

/// A trait for time sources that report elapsed milliseconds since a
/// configured epoch.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// # Example
///
/// ```
/// use tsid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

/// A wall-clock time source anchored to a custom epoch.
///
/// Each call reads `SystemTime::now()` and subtracts the epoch. If the
/// system clock precedes the epoch (or the Unix epoch), the elapsed time
/// saturates to zero; timestamps in that regime are meaningless anyway
/// since the 42-bit field truncates them.
#[derive(Clone, Debug)]
pub struct WallClock {
    epoch: Duration,
}

impl Default for WallClock {
    /// Constructs a wall clock anchored to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl WallClock {
    /// Constructs a wall clock using a custom epoch as the origin (t = 0),
    /// specified as a [`Duration`] since the Unix epoch.
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }

    /// The configured epoch, as a [`Duration`] since the Unix epoch.
    pub const fn epoch(&self) -> Duration {
        self.epoch
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        let since_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        since_unix.saturating_sub(self.epoch).as_millis() as u64
    }
}
