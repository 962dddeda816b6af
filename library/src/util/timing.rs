//! Wall-clock timing that reports through the `log` facade.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use log::Level;

/// Logs the time between construction and drop.
///
/// A timer built while its level is disabled records nothing.
pub struct ScopedTimer {
    active: Option<(Cow<'static, str>, Instant)>,
    level: Level,
}

impl ScopedTimer {
    pub fn with_level(label: impl Into<Cow<'static, str>>, level: Level) -> Self {
        let active = log::log_enabled!(level).then(|| (label.into(), Instant::now()));
        Self { active, level }
    }

    pub fn info(label: impl Into<Cow<'static, str>>) -> Self {
        Self::with_level(label, Level::Info)
    }

    /// Debug-level timer whose label is only built when debug logging is on.
    pub fn debug_lazy(label: impl FnOnce() -> String) -> Self {
        let active = log::log_enabled!(Level::Debug).then(|| (Cow::Owned(label()), Instant::now()));
        Self {
            active,
            level: Level::Debug,
        }
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.active.as_ref().map(|(_, start)| start.elapsed())
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some((label, start)) = &self.active {
            let micros = start.elapsed().as_micros();
            log::log!(self.level, "{} took {}.{:03} ms", label, micros / 1000, micros % 1000);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_level_records_nothing() {
        // No logger is installed in this test binary, so every level is off.
        log::set_max_level(log::LevelFilter::Off);
        let mut built = false;
        let timer = ScopedTimer::debug_lazy(|| {
            built = true;
            "never".to_string()
        });
        assert!(timer.elapsed().is_none());
        drop(timer);
        assert!(!built);
    }
}
