#[cfg(any(test, feature = "test-helpers"))]
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Monotonic time source used by every wait in the probe.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);

    /// Wall-clock capture time in fractional Unix seconds.
    fn unix_seconds(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock whose `sleep` advances time instantly.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().expect("poisoned mutex")
    }

    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().expect("poisoned mutex");
        *elapsed += duration;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("poisoned mutex").clone()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().expect("poisoned mutex").push(duration);
        self.advance(duration);
    }

    fn unix_seconds(&self) -> f64 {
        1_700_000_000.0 + self.elapsed().as_secs_f64()
    }
}
