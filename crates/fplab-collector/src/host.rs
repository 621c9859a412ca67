//! Environment backed by the native host the process runs on.
//!
//! Only a handful of capabilities have a native counterpart. Everything tied
//! to a browser surface reports `Unsupported`, and input streams are empty.

use std::f64::consts::TAU;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::{
    environment::{
        AudioRender, CanvasText, ClientEnvironment, EnvEvent, EventKind, IntlInfo, MediaDevice,
        NavigatorInfo, ScreenInfo, WebGlInfo,
    },
    error::CapabilityError,
};

/// Frequency of the default oscillator, in hertz.
pub const DEFAULT_OSCILLATOR_HZ: f64 = 440.0;

const FALLBACK_TIME_ZONE: &str = "UTC";
const FALLBACK_LOCALE: &str = "en-US";

#[derive(Debug, Clone, Default)]
pub struct HostEnvironment {
    /// `LANG`-style locale, e.g. `de_DE.UTF-8`.
    pub lang: Option<String>,
    /// IANA zone name from `TZ`.
    pub time_zone: Option<String>,
}

impl HostEnvironment {
    /// Read `LANG` and `TZ` from the process environment.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self {
            lang: std::env::var("LANG").ok().filter(|v| !v.is_empty()),
            time_zone: std::env::var("TZ")
                .ok()
                .map(|tz| tz.trim_start_matches(':').to_string())
                .filter(|tz| !tz.is_empty()),
        }
    }

    /// BCP 47 tag derived from `LANG`: `de_DE.UTF-8` becomes `de-DE`.
    #[must_use]
    pub fn locale(&self) -> String {
        self.lang
            .as_deref()
            .map(|lang| lang.split(['.', '@']).next().unwrap_or(lang))
            .filter(|tag| !tag.is_empty() && *tag != "C" && *tag != "POSIX")
            .map_or_else(|| FALLBACK_LOCALE.to_string(), |tag| tag.replace('_', "-"))
    }
}

/// Render `frames` samples of a sine oscillator at `sample_rate`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn render_sine(spec: &AudioRender, frequency_hz: f64) -> Vec<f32> {
    let rate = f64::from(spec.sample_rate);
    (0..spec.frames)
        .map(|i| (TAU * frequency_hz * f64::from(i) / rate).sin() as f32)
        .collect()
}

#[async_trait]
impl ClientEnvironment for HostEnvironment {
    fn navigator(&self) -> Result<NavigatorInfo, CapabilityError> {
        let os = std::env::consts::OS;
        let arch = std::env::consts::ARCH;
        let cores = std::thread::available_parallelism()
            .ok()
            .and_then(|n| u32::try_from(n.get()).ok());
        Ok(NavigatorInfo {
            user_agent: format!("fplab/{} ({os}; {arch})", env!("CARGO_PKG_VERSION")),
            platform: format!("{os} {arch}"),
            hardware_concurrency: cores,
            device_memory_gb: None,
            cookie_enabled: false,
            language: self.locale(),
            do_not_track: None,
        })
    }

    fn screen(&self) -> Result<ScreenInfo, CapabilityError> {
        Err(CapabilityError::Unsupported)
    }

    fn intl(&self) -> Result<IntlInfo, CapabilityError> {
        Ok(IntlInfo {
            time_zone: self
                .time_zone
                .clone()
                .unwrap_or_else(|| FALLBACK_TIME_ZONE.to_string()),
            locale: self.locale(),
        })
    }

    fn plugins(&self) -> Result<Vec<String>, CapabilityError> {
        Ok(Vec::new())
    }

    fn measure_text_width(&self, _font: &str, _text: &str) -> Result<f64, CapabilityError> {
        Err(CapabilityError::Unsupported)
    }

    async fn render_canvas(&self, _spec: &CanvasText) -> Result<Vec<u8>, CapabilityError> {
        Err(CapabilityError::Unsupported)
    }

    async fn webgl(&self) -> Result<WebGlInfo, CapabilityError> {
        Err(CapabilityError::Unsupported)
    }

    async fn render_audio(&self, spec: &AudioRender) -> Result<Vec<f32>, CapabilityError> {
        if spec.channels != 1 || spec.sample_rate == 0 {
            return Err(CapabilityError::Unsupported);
        }
        Ok(render_sine(spec, DEFAULT_OSCILLATOR_HZ))
    }

    async fn media_devices(&self) -> Result<Vec<MediaDevice>, CapabilityError> {
        Err(CapabilityError::Unsupported)
    }

    async fn compile_wasm(&self, _module: &[u8]) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unsupported)
    }

    async fn ice_candidates(&self) -> Result<BoxStream<'static, String>, CapabilityError> {
        Err(CapabilityError::Unsupported)
    }

    async fn subscribe(
        &self,
        kind: EventKind,
    ) -> Result<BoxStream<'static, EnvEvent>, CapabilityError> {
        match kind {
            EventKind::Mouse | EventKind::Key | EventKind::Scroll | EventKind::Touch => {
                Ok(stream::empty().boxed())
            }
            EventKind::Orientation | EventKind::Motion => Err(CapabilityError::Unsupported),
        }
    }
}
