//! Typed feature record: one field per signal.

use serde::{Deserialize, Serialize};

use crate::signal::Signal;
use crate::value::{SignalValue, UnavailableReason};

/// Behaviour-counter key used when the canvas signal could not be produced.
pub const BLOCKED_BEHAVIOUR_KEY: &str = "Blocked";

/// Identifier for the behaviour counter: the canvas hash, or the literal
/// `"Blocked"` whenever the canvas signal is missing or not a hash.
#[must_use]
pub fn behaviour_key(canvas: Option<&SignalValue>) -> String {
    match canvas {
        Some(SignalValue::Text(hash)) if !hash.is_empty() => hash.clone(),
        _ => BLOCKED_BEHAVIOUR_KEY.to_string(),
    }
}

/// A complete collection pass result.
///
/// Field order matches [`Signal::ALL`], so serializing yields the `features`
/// object in declaration order. Every signal is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "Canvas Fingerprint")]
    pub canvas_fingerprint: SignalValue,
    #[serde(rename = "WebGL Vendor")]
    pub webgl_vendor: SignalValue,
    #[serde(rename = "WebGL Renderer")]
    pub webgl_renderer: SignalValue,
    #[serde(rename = "WebGL Shader Precision")]
    pub webgl_shader_precision: SignalValue,
    #[serde(rename = "Detected Fonts")]
    pub detected_fonts: SignalValue,
    #[serde(rename = "User-Agent")]
    pub user_agent: SignalValue,
    #[serde(rename = "Screen Resolution")]
    pub screen_resolution: SignalValue,
    #[serde(rename = "Device Pixel Ratio")]
    pub device_pixel_ratio: SignalValue,
    #[serde(rename = "Color Depth")]
    pub color_depth: SignalValue,
    #[serde(rename = "Time Zone")]
    pub time_zone: SignalValue,
    #[serde(rename = "Locale")]
    pub locale: SignalValue,
    #[serde(rename = "Platform")]
    pub platform: SignalValue,
    #[serde(rename = "CPU Cores")]
    pub cpu_cores: SignalValue,
    #[serde(rename = "Device Memory (GB)")]
    pub device_memory: SignalValue,
    #[serde(rename = "Multi-Monitor Position")]
    pub multi_monitor_position: SignalValue,
    #[serde(rename = "Media Devices")]
    pub media_devices: SignalValue,
    #[serde(rename = "WebRTC Candidate")]
    pub webrtc_candidate: SignalValue,
    #[serde(rename = "Cookies Enabled")]
    pub cookies_enabled: SignalValue,
    #[serde(rename = "Accept-Language")]
    pub accept_language: SignalValue,
    #[serde(rename = "Do Not Track")]
    pub do_not_track: SignalValue,
    #[serde(rename = "Plugins")]
    pub plugins: SignalValue,
    #[serde(rename = "Audio Fingerprint")]
    pub audio_fingerprint: SignalValue,
    #[serde(rename = "WASM Compile Time (ms)")]
    pub wasm_compile_time: SignalValue,
    #[serde(rename = "TLS / JA3")]
    pub tls_ja3: SignalValue,
    #[serde(rename = "SNI / DNS / Cert Info")]
    pub sni_dns_cert: SignalValue,
    #[serde(rename = "Device Motion")]
    pub device_motion: SignalValue,
    #[serde(rename = "Device Orientation")]
    pub device_orientation: SignalValue,
    #[serde(rename = "Mouse Sample")]
    pub mouse_sample: SignalValue,
    #[serde(rename = "Key Press Sample")]
    pub key_press_sample: SignalValue,
    #[serde(rename = "Scroll Sample")]
    pub scroll_sample: SignalValue,
    #[serde(rename = "Touch Gestures Sample")]
    pub touch_gestures_sample: SignalValue,
}

impl FeatureRecord {
    /// Build a record by asking `value_for` for each signal in declaration order.
    pub fn from_fn<F>(mut value_for: F) -> Self
    where
        F: FnMut(Signal) -> SignalValue,
    {
        Self {
            canvas_fingerprint: value_for(Signal::CanvasFingerprint),
            webgl_vendor: value_for(Signal::WebGlVendor),
            webgl_renderer: value_for(Signal::WebGlRenderer),
            webgl_shader_precision: value_for(Signal::WebGlShaderPrecision),
            detected_fonts: value_for(Signal::DetectedFonts),
            user_agent: value_for(Signal::UserAgent),
            screen_resolution: value_for(Signal::ScreenResolution),
            device_pixel_ratio: value_for(Signal::DevicePixelRatio),
            color_depth: value_for(Signal::ColorDepth),
            time_zone: value_for(Signal::TimeZone),
            locale: value_for(Signal::Locale),
            platform: value_for(Signal::Platform),
            cpu_cores: value_for(Signal::CpuCores),
            device_memory: value_for(Signal::DeviceMemory),
            multi_monitor_position: value_for(Signal::MultiMonitorPosition),
            media_devices: value_for(Signal::MediaDevices),
            webrtc_candidate: value_for(Signal::WebRtcCandidate),
            cookies_enabled: value_for(Signal::CookiesEnabled),
            accept_language: value_for(Signal::AcceptLanguage),
            do_not_track: value_for(Signal::DoNotTrack),
            plugins: value_for(Signal::Plugins),
            audio_fingerprint: value_for(Signal::AudioFingerprint),
            wasm_compile_time: value_for(Signal::WasmCompileTime),
            tls_ja3: value_for(Signal::TlsJa3),
            sni_dns_cert: value_for(Signal::SniDnsCert),
            device_motion: value_for(Signal::DeviceMotion),
            device_orientation: value_for(Signal::DeviceOrientation),
            mouse_sample: value_for(Signal::MouseSample),
            key_press_sample: value_for(Signal::KeyPressSample),
            scroll_sample: value_for(Signal::ScrollSample),
            touch_gestures_sample: value_for(Signal::TouchGesturesSample),
        }
    }

    /// A record where every signal carries the same unavailability marker.
    #[must_use]
    pub fn unavailable(reason: UnavailableReason) -> Self {
        Self::from_fn(|_| SignalValue::Unavailable(reason))
    }

    #[must_use]
    pub fn get(&self, signal: Signal) -> &SignalValue {
        match signal {
            Signal::CanvasFingerprint => &self.canvas_fingerprint,
            Signal::WebGlVendor => &self.webgl_vendor,
            Signal::WebGlRenderer => &self.webgl_renderer,
            Signal::WebGlShaderPrecision => &self.webgl_shader_precision,
            Signal::DetectedFonts => &self.detected_fonts,
            Signal::UserAgent => &self.user_agent,
            Signal::ScreenResolution => &self.screen_resolution,
            Signal::DevicePixelRatio => &self.device_pixel_ratio,
            Signal::ColorDepth => &self.color_depth,
            Signal::TimeZone => &self.time_zone,
            Signal::Locale => &self.locale,
            Signal::Platform => &self.platform,
            Signal::CpuCores => &self.cpu_cores,
            Signal::DeviceMemory => &self.device_memory,
            Signal::MultiMonitorPosition => &self.multi_monitor_position,
            Signal::MediaDevices => &self.media_devices,
            Signal::WebRtcCandidate => &self.webrtc_candidate,
            Signal::CookiesEnabled => &self.cookies_enabled,
            Signal::AcceptLanguage => &self.accept_language,
            Signal::DoNotTrack => &self.do_not_track,
            Signal::Plugins => &self.plugins,
            Signal::AudioFingerprint => &self.audio_fingerprint,
            Signal::WasmCompileTime => &self.wasm_compile_time,
            Signal::TlsJa3 => &self.tls_ja3,
            Signal::SniDnsCert => &self.sni_dns_cert,
            Signal::DeviceMotion => &self.device_motion,
            Signal::DeviceOrientation => &self.device_orientation,
            Signal::MouseSample => &self.mouse_sample,
            Signal::KeyPressSample => &self.key_press_sample,
            Signal::ScrollSample => &self.scroll_sample,
            Signal::TouchGesturesSample => &self.touch_gestures_sample,
        }
    }

    pub fn get_mut(&mut self, signal: Signal) -> &mut SignalValue {
        match signal {
            Signal::CanvasFingerprint => &mut self.canvas_fingerprint,
            Signal::WebGlVendor => &mut self.webgl_vendor,
            Signal::WebGlRenderer => &mut self.webgl_renderer,
            Signal::WebGlShaderPrecision => &mut self.webgl_shader_precision,
            Signal::DetectedFonts => &mut self.detected_fonts,
            Signal::UserAgent => &mut self.user_agent,
            Signal::ScreenResolution => &mut self.screen_resolution,
            Signal::DevicePixelRatio => &mut self.device_pixel_ratio,
            Signal::ColorDepth => &mut self.color_depth,
            Signal::TimeZone => &mut self.time_zone,
            Signal::Locale => &mut self.locale,
            Signal::Platform => &mut self.platform,
            Signal::CpuCores => &mut self.cpu_cores,
            Signal::DeviceMemory => &mut self.device_memory,
            Signal::MultiMonitorPosition => &mut self.multi_monitor_position,
            Signal::MediaDevices => &mut self.media_devices,
            Signal::WebRtcCandidate => &mut self.webrtc_candidate,
            Signal::CookiesEnabled => &mut self.cookies_enabled,
            Signal::AcceptLanguage => &mut self.accept_language,
            Signal::DoNotTrack => &mut self.do_not_track,
            Signal::Plugins => &mut self.plugins,
            Signal::AudioFingerprint => &mut self.audio_fingerprint,
            Signal::WasmCompileTime => &mut self.wasm_compile_time,
            Signal::TlsJa3 => &mut self.tls_ja3,
            Signal::SniDnsCert => &mut self.sni_dns_cert,
            Signal::DeviceMotion => &mut self.device_motion,
            Signal::DeviceOrientation => &mut self.device_orientation,
            Signal::MouseSample => &mut self.mouse_sample,
            Signal::KeyPressSample => &mut self.key_press_sample,
            Signal::ScrollSample => &mut self.scroll_sample,
            Signal::TouchGesturesSample => &mut self.touch_gestures_sample,
        }
    }

    pub fn set(&mut self, signal: Signal, value: SignalValue) {
        *self.get_mut(signal) = value;
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Signal, &SignalValue)> + '_ {
        Signal::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Signals whose value is an unavailability marker.
    #[must_use]
    pub fn unavailable_signals(&self) -> Vec<(Signal, UnavailableReason)> {
        self.iter()
            .filter_map(|(s, v)| v.unavailable_reason().map(|r| (s, r)))
            .collect()
    }
}
