//! The fixed catalogue of fingerprint signals.
//!
//! Every signal has a wire label (the human-readable key used in submitted
//! JSON), a storage column, and a timing class. All three mappings are
//! exhaustive `match`es, so adding a variant without filling them in does not
//! compile.

use std::fmt;

/// How a collector for this signal behaves in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingClass {
    /// Synchronous read, completes in the same step.
    Immediate,
    /// Asynchronous with a bounded budget.
    BoundedAsync,
    /// Listener-based, finalized at a fixed ceiling.
    EventDriven,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Signal {
    CanvasFingerprint,
    WebGlVendor,
    WebGlRenderer,
    WebGlShaderPrecision,
    DetectedFonts,
    UserAgent,
    ScreenResolution,
    DevicePixelRatio,
    ColorDepth,
    TimeZone,
    Locale,
    Platform,
    CpuCores,
    DeviceMemory,
    MultiMonitorPosition,
    MediaDevices,
    WebRtcCandidate,
    CookiesEnabled,
    AcceptLanguage,
    DoNotTrack,
    Plugins,
    AudioFingerprint,
    WasmCompileTime,
    TlsJa3,
    SniDnsCert,
    DeviceMotion,
    DeviceOrientation,
    MouseSample,
    KeyPressSample,
    ScrollSample,
    TouchGesturesSample,
}

impl Signal {
    pub const COUNT: usize = 31;

    /// All signals in declaration order, which is also serialization order.
    pub const ALL: [Signal; Self::COUNT] = [
        Signal::CanvasFingerprint,
        Signal::WebGlVendor,
        Signal::WebGlRenderer,
        Signal::WebGlShaderPrecision,
        Signal::DetectedFonts,
        Signal::UserAgent,
        Signal::ScreenResolution,
        Signal::DevicePixelRatio,
        Signal::ColorDepth,
        Signal::TimeZone,
        Signal::Locale,
        Signal::Platform,
        Signal::CpuCores,
        Signal::DeviceMemory,
        Signal::MultiMonitorPosition,
        Signal::MediaDevices,
        Signal::WebRtcCandidate,
        Signal::CookiesEnabled,
        Signal::AcceptLanguage,
        Signal::DoNotTrack,
        Signal::Plugins,
        Signal::AudioFingerprint,
        Signal::WasmCompileTime,
        Signal::TlsJa3,
        Signal::SniDnsCert,
        Signal::DeviceMotion,
        Signal::DeviceOrientation,
        Signal::MouseSample,
        Signal::KeyPressSample,
        Signal::ScrollSample,
        Signal::TouchGesturesSample,
    ];

    /// Position of this signal in [`Signal::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire-format label used as the JSON key in `features`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Signal::CanvasFingerprint => "Canvas Fingerprint",
            Signal::WebGlVendor => "WebGL Vendor",
            Signal::WebGlRenderer => "WebGL Renderer",
            Signal::WebGlShaderPrecision => "WebGL Shader Precision",
            Signal::DetectedFonts => "Detected Fonts",
            Signal::UserAgent => "User-Agent",
            Signal::ScreenResolution => "Screen Resolution",
            Signal::DevicePixelRatio => "Device Pixel Ratio",
            Signal::ColorDepth => "Color Depth",
            Signal::TimeZone => "Time Zone",
            Signal::Locale => "Locale",
            Signal::Platform => "Platform",
            Signal::CpuCores => "CPU Cores",
            Signal::DeviceMemory => "Device Memory (GB)",
            Signal::MultiMonitorPosition => "Multi-Monitor Position",
            Signal::MediaDevices => "Media Devices",
            Signal::WebRtcCandidate => "WebRTC Candidate",
            Signal::CookiesEnabled => "Cookies Enabled",
            Signal::AcceptLanguage => "Accept-Language",
            Signal::DoNotTrack => "Do Not Track",
            Signal::Plugins => "Plugins",
            Signal::AudioFingerprint => "Audio Fingerprint",
            Signal::WasmCompileTime => "WASM Compile Time (ms)",
            Signal::TlsJa3 => "TLS / JA3",
            Signal::SniDnsCert => "SNI / DNS / Cert Info",
            Signal::DeviceMotion => "Device Motion",
            Signal::DeviceOrientation => "Device Orientation",
            Signal::MouseSample => "Mouse Sample",
            Signal::KeyPressSample => "Key Press Sample",
            Signal::ScrollSample => "Scroll Sample",
            Signal::TouchGesturesSample => "Touch Gestures Sample",
        }
    }

    /// Column name in the `fingerprint_tests` table.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Signal::CanvasFingerprint => "canvas_fingerprint",
            Signal::WebGlVendor => "webgl_vendor",
            Signal::WebGlRenderer => "webgl_renderer",
            Signal::WebGlShaderPrecision => "webgl_shader_precision",
            Signal::DetectedFonts => "detected_fonts",
            Signal::UserAgent => "user_agent",
            Signal::ScreenResolution => "screen_resolution",
            Signal::DevicePixelRatio => "device_pixel_ratio",
            Signal::ColorDepth => "color_depth",
            Signal::TimeZone => "time_zone",
            Signal::Locale => "locale",
            Signal::Platform => "platform",
            Signal::CpuCores => "cpu_cores",
            Signal::DeviceMemory => "device_memory",
            Signal::MultiMonitorPosition => "multi_monitor_position",
            Signal::MediaDevices => "media_devices",
            Signal::WebRtcCandidate => "webrtc_candidate",
            Signal::CookiesEnabled => "cookies_enabled",
            Signal::AcceptLanguage => "accept_language",
            Signal::DoNotTrack => "do_not_track",
            Signal::Plugins => "plugins",
            Signal::AudioFingerprint => "audio_fingerprint",
            Signal::WasmCompileTime => "wasm_compile_time",
            Signal::TlsJa3 => "tls_ja3",
            Signal::SniDnsCert => "sni_dns_cert",
            Signal::DeviceMotion => "device_motion",
            Signal::DeviceOrientation => "device_orientation",
            Signal::MouseSample => "mouse_sample",
            Signal::KeyPressSample => "key_press_sample",
            Signal::ScrollSample => "scroll_sample",
            Signal::TouchGesturesSample => "touch_gestures_sample",
        }
    }

    #[must_use]
    pub fn timing(self) -> TimingClass {
        match self {
            Signal::CanvasFingerprint
            | Signal::WebGlVendor
            | Signal::WebGlRenderer
            | Signal::WebGlShaderPrecision
            | Signal::MediaDevices
            | Signal::AudioFingerprint
            | Signal::WasmCompileTime => TimingClass::BoundedAsync,
            Signal::WebRtcCandidate
            | Signal::DeviceMotion
            | Signal::DeviceOrientation
            | Signal::MouseSample
            | Signal::KeyPressSample
            | Signal::ScrollSample
            | Signal::TouchGesturesSample => TimingClass::EventDriven,
            Signal::DetectedFonts
            | Signal::UserAgent
            | Signal::ScreenResolution
            | Signal::DevicePixelRatio
            | Signal::ColorDepth
            | Signal::TimeZone
            | Signal::Locale
            | Signal::Platform
            | Signal::CpuCores
            | Signal::DeviceMemory
            | Signal::MultiMonitorPosition
            | Signal::CookiesEnabled
            | Signal::AcceptLanguage
            | Signal::DoNotTrack
            | Signal::Plugins
            | Signal::TlsJa3
            | Signal::SniDnsCert => TimingClass::Immediate,
        }
    }

    /// Reverse lookup from a wire label. Matching is exact.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Signal> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
