use std::time::Duration;

pub const DEFAULT_BOUNDED_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_BEHAVIOUR_CEILING: Duration = Duration::from_secs(4);
pub const DEFAULT_SENSOR_CEILING: Duration = Duration::from_secs(4);
pub const DEFAULT_TOUCH_CEILING: Duration = Duration::from_secs(5);
pub const DEFAULT_WEBRTC_CEILING: Duration = Duration::from_millis(1_500);
pub const DEFAULT_SAMPLE_CAP: usize = 3;
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Timing of one collection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Budget for each bounded-async collector.
    pub bounded_timeout: Duration,
    /// Ceiling for mouse, key and scroll samplers.
    pub behaviour_ceiling: Duration,
    /// Ceiling for orientation and motion.
    pub sensor_ceiling: Duration,
    pub touch_ceiling: Duration,
    pub webrtc_ceiling: Duration,
    /// Maximum entries kept by the mouse, key and scroll samplers.
    pub sample_cap: usize,
    /// Wait before reading the behaviour key.
    pub settle_delay: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            bounded_timeout: DEFAULT_BOUNDED_TIMEOUT,
            behaviour_ceiling: DEFAULT_BEHAVIOUR_CEILING,
            sensor_ceiling: DEFAULT_SENSOR_CEILING,
            touch_ceiling: DEFAULT_TOUCH_CEILING,
            webrtc_ceiling: DEFAULT_WEBRTC_CEILING,
            sample_cap: DEFAULT_SAMPLE_CAP,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl CollectorConfig {
    /// Longest event-driven ceiling; no listener outlives it.
    #[must_use]
    pub fn hard_ceiling(&self) -> Duration {
        self.behaviour_ceiling
            .max(self.sensor_ceiling)
            .max(self.touch_ceiling)
            .max(self.webrtc_ceiling)
    }
}
