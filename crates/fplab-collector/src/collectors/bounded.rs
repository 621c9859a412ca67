//! Collectors that await one capability call under a fixed budget.

use std::time::Duration;

use fplab_core::{Signal, SignalValue};
use tokio::time::Instant;

use super::{guard_bounded, Entries};
use crate::{
    environment::{AudioRender, CanvasText, ClientEnvironment},
    error::CapabilityError,
    hashing::{sha256_hex, sha256_hex_f32},
};

/// Smallest valid WebAssembly module: magic number and version 1.
pub const EMPTY_WASM_MODULE: [u8; 8] = [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];

pub const HIDDEN_LABEL: &str = "hidden";

const WEBGL_SIGNALS: [Signal; 3] = [
    Signal::WebGlVendor,
    Signal::WebGlRenderer,
    Signal::WebGlShaderPrecision,
];

pub async fn canvas(env: &dyn ClientEnvironment, budget: Duration) -> Entries {
    guard_bounded("canvas", &[Signal::CanvasFingerprint], budget, read_canvas(env)).await
}

async fn read_canvas(env: &dyn ClientEnvironment) -> Result<Entries, CapabilityError> {
    let pixels = env.render_canvas(&CanvasText::default()).await?;
    Ok(vec![(Signal::CanvasFingerprint, SignalValue::Text(sha256_hex(pixels)))])
}

pub async fn webgl(env: &dyn ClientEnvironment, budget: Duration) -> Entries {
    guard_bounded("webgl", &WEBGL_SIGNALS, budget, read_webgl(env)).await
}

async fn read_webgl(env: &dyn ClientEnvironment) -> Result<Entries, CapabilityError> {
    let info = env.webgl().await?;
    let (vendor, renderer) = info
        .debug_renderer
        .unwrap_or_else(|| ("N/A".to_string(), "N/A".to_string()));
    let precision = info.vertex_high_float;
    Ok(vec![
        (Signal::WebGlVendor, SignalValue::Text(vendor)),
        (Signal::WebGlRenderer, SignalValue::Text(renderer)),
        (
            Signal::WebGlShaderPrecision,
            SignalValue::List(vec![
                SignalValue::Integer(i64::from(precision.range_min)),
                SignalValue::Integer(i64::from(precision.range_max)),
                SignalValue::Integer(i64::from(precision.precision)),
            ]),
        ),
    ])
}

pub async fn audio(env: &dyn ClientEnvironment, budget: Duration) -> Entries {
    guard_bounded("audio", &[Signal::AudioFingerprint], budget, read_audio(env)).await
}

async fn read_audio(env: &dyn ClientEnvironment) -> Result<Entries, CapabilityError> {
    let samples = env.render_audio(&AudioRender::default()).await?;
    Ok(vec![(
        Signal::AudioFingerprint,
        SignalValue::Text(sha256_hex_f32(&samples)),
    )])
}

pub async fn wasm(env: &dyn ClientEnvironment, budget: Duration) -> Entries {
    guard_bounded("wasm", &[Signal::WasmCompileTime], budget, time_wasm(env)).await
}

async fn time_wasm(env: &dyn ClientEnvironment) -> Result<Entries, CapabilityError> {
    let start = Instant::now();
    env.compile_wasm(&EMPTY_WASM_MODULE).await?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    Ok(vec![(
        Signal::WasmCompileTime,
        SignalValue::Text(format!("{elapsed_ms:.2}")),
    )])
}

pub async fn media_devices(env: &dyn ClientEnvironment, budget: Duration) -> Entries {
    guard_bounded(
        "media_devices",
        &[Signal::MediaDevices],
        budget,
        read_media_devices(env),
    )
    .await
}

async fn read_media_devices(env: &dyn ClientEnvironment) -> Result<Entries, CapabilityError> {
    let devices = env.media_devices().await?;
    let described = devices.into_iter().map(|d| {
        let label = if d.label.is_empty() {
            HIDDEN_LABEL.to_string()
        } else {
            d.label
        };
        format!("{}: {label}", d.kind)
    });
    Ok(vec![(Signal::MediaDevices, SignalValue::texts(described))])
}
