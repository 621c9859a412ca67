//! The capability surface collectors read from.
//!
//! Every capability can fail independently. Implementations report absence as
//! [`CapabilityError::Unsupported`], refused permission as
//! [`CapabilityError::Denied`], and anything else as
//! [`CapabilityError::Fault`]. Collectors also tolerate implementations that
//! panic or never resolve.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::CapabilityError;

/// Navigator properties read synchronously.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigatorInfo {
    pub user_agent: String,
    pub platform: String,
    pub hardware_concurrency: Option<u32>,
    pub device_memory_gb: Option<f64>,
    pub cookie_enabled: bool,
    pub language: String,
    pub do_not_track: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
    pub device_pixel_ratio: f64,
    pub avail_left: Option<i64>,
    pub avail_top: Option<i64>,
}

/// Resolved internationalisation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntlInfo {
    pub time_zone: String,
    pub locale: String,
}

/// Text drawn onto a 2D surface for the canvas signal.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasText {
    pub text: &'static str,
    pub font: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasText {
    fn default() -> Self {
        Self {
            text: "Canvas FP Test 😃 測試",
            font: "16px Arial",
            x: 10.0,
            y: 20.0,
            width: 200,
            height: 50,
        }
    }
}

/// Offline render of the default oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioRender {
    pub channels: u32,
    pub frames: u32,
    pub sample_rate: u32,
}

impl Default for AudioRender {
    fn default() -> Self {
        Self {
            channels: 1,
            frames: 44_100,
            sample_rate: 44_100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderPrecision {
    pub range_min: i32,
    pub range_max: i32,
    pub precision: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebGlInfo {
    /// Unmasked vendor and renderer, `None` when the debug-renderer
    /// extension is unavailable.
    pub debug_renderer: Option<(String, String)>,
    /// Vertex shader, high float.
    pub vertex_high_float: ShaderPrecision,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDevice {
    pub kind: String,
    /// Empty until the user grants media permission.
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Mouse,
    Key,
    Scroll,
    Touch,
    Orientation,
    Motion,
}

/// One event delivered by a subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvEvent {
    MouseMove { x: f64, y: f64 },
    KeyDown { key: String },
    Scroll { x: f64, y: f64 },
    TouchStart { touches: u32 },
    TouchEnd,
    Orientation { alpha: f64, beta: f64, gamma: f64 },
    Motion(MotionReading),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionReading {
    pub acceleration: [f64; 3],
    pub acceleration_including_gravity: [f64; 3],
    pub rotation_rate: [f64; 3],
}

/// The client a collection pass runs against.
#[async_trait]
pub trait ClientEnvironment: Send + Sync {
    fn navigator(&self) -> Result<NavigatorInfo, CapabilityError>;

    fn screen(&self) -> Result<ScreenInfo, CapabilityError>;

    fn intl(&self) -> Result<IntlInfo, CapabilityError>;

    /// Names of installed plugins.
    fn plugins(&self) -> Result<Vec<String>, CapabilityError>;

    /// Rendered width of `text` under a CSS font shorthand such as
    /// `"16px Arial,monospace"`.
    fn measure_text_width(&self, font: &str, text: &str) -> Result<f64, CapabilityError>;

    /// Draw `spec` and return the RGBA bytes of the whole surface.
    async fn render_canvas(&self, spec: &CanvasText) -> Result<Vec<u8>, CapabilityError>;

    async fn webgl(&self) -> Result<WebGlInfo, CapabilityError>;

    /// Render the default oscillator and return channel 0.
    async fn render_audio(&self, spec: &AudioRender) -> Result<Vec<f32>, CapabilityError>;

    async fn media_devices(&self) -> Result<Vec<MediaDevice>, CapabilityError>;

    /// Compile and instantiate a WebAssembly module.
    async fn compile_wasm(&self, module: &[u8]) -> Result<(), CapabilityError>;

    /// Open a peer connection with one data channel and stream its ICE
    /// candidate strings.
    async fn ice_candidates(&self) -> Result<BoxStream<'static, String>, CapabilityError>;

    /// Subscribe to one kind of input or sensor event. Sensor subscriptions
    /// may prompt for permission.
    async fn subscribe(&self, kind: EventKind)
        -> Result<BoxStream<'static, EnvEvent>, CapabilityError>;
}
