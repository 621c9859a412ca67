//! Collectors that read synchronously available properties.

use fplab_core::{Signal, SignalValue};

use super::{guard_sync, number_value, Entries};
use crate::{environment::ClientEnvironment, fonts::probe_fonts};

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_PLUGINS: &str = "None";
pub const NETWORK_PLACEHOLDER: &str = "Unavailable to client-side collection";

const NAVIGATOR_SIGNALS: [Signal; 7] = [
    Signal::UserAgent,
    Signal::Platform,
    Signal::CpuCores,
    Signal::DeviceMemory,
    Signal::CookiesEnabled,
    Signal::AcceptLanguage,
    Signal::DoNotTrack,
];

const SCREEN_SIGNALS: [Signal; 4] = [
    Signal::ScreenResolution,
    Signal::DevicePixelRatio,
    Signal::ColorDepth,
    Signal::MultiMonitorPosition,
];

const INTL_SIGNALS: [Signal; 2] = [Signal::TimeZone, Signal::Locale];

fn or_not_available(value: Option<SignalValue>) -> SignalValue {
    value.unwrap_or_else(|| SignalValue::text(NOT_AVAILABLE))
}

pub fn navigator(env: &dyn ClientEnvironment) -> Entries {
    guard_sync("navigator", &NAVIGATOR_SIGNALS, || {
        let nav = env.navigator()?;
        Ok(vec![
            (Signal::UserAgent, SignalValue::Text(nav.user_agent)),
            (Signal::Platform, SignalValue::Text(nav.platform)),
            (
                Signal::CpuCores,
                or_not_available(
                    nav.hardware_concurrency
                        .filter(|n| *n > 0)
                        .map(|n| SignalValue::Integer(i64::from(n))),
                ),
            ),
            (
                Signal::DeviceMemory,
                or_not_available(
                    nav.device_memory_gb
                        .filter(|gb| *gb > 0.0)
                        .map(number_value),
                ),
            ),
            (Signal::CookiesEnabled, SignalValue::Bool(nav.cookie_enabled)),
            (Signal::AcceptLanguage, SignalValue::Text(nav.language)),
            (
                Signal::DoNotTrack,
                or_not_available(
                    nav.do_not_track
                        .filter(|dnt| !dnt.is_empty())
                        .map(SignalValue::Text),
                ),
            ),
        ])
    })
}

pub fn screen(env: &dyn ClientEnvironment) -> Entries {
    guard_sync("screen", &SCREEN_SIGNALS, || {
        let screen = env.screen()?;
        Ok(vec![
            (
                Signal::ScreenResolution,
                SignalValue::Text(format!("{} x {}", screen.width, screen.height)),
            ),
            (
                Signal::DevicePixelRatio,
                number_value(screen.device_pixel_ratio),
            ),
            (
                Signal::ColorDepth,
                SignalValue::Integer(i64::from(screen.color_depth)),
            ),
            (
                Signal::MultiMonitorPosition,
                SignalValue::Text(format!(
                    "availLeft={}, availTop={}",
                    screen.avail_left.unwrap_or(0),
                    screen.avail_top.unwrap_or(0)
                )),
            ),
        ])
    })
}

pub fn intl(env: &dyn ClientEnvironment) -> Entries {
    guard_sync("intl", &INTL_SIGNALS, || {
        let intl = env.intl()?;
        Ok(vec![
            (Signal::TimeZone, SignalValue::Text(intl.time_zone)),
            (Signal::Locale, SignalValue::Text(intl.locale)),
        ])
    })
}

pub fn plugins(env: &dyn ClientEnvironment) -> Entries {
    guard_sync("plugins", &[Signal::Plugins], || {
        let names = env.plugins()?;
        let value = if names.is_empty() {
            SignalValue::text(NO_PLUGINS)
        } else {
            SignalValue::texts(names)
        };
        Ok(vec![(Signal::Plugins, value)])
    })
}

pub fn fonts(env: &dyn ClientEnvironment) -> Entries {
    guard_sync("fonts", &[Signal::DetectedFonts], || {
        Ok(vec![(Signal::DetectedFonts, SignalValue::texts(probe_fonts(env)?))])
    })
}

/// TLS and SNI details are only visible to a network observer.
#[must_use]
pub fn network_placeholders() -> Entries {
    vec![
        (Signal::TlsJa3, SignalValue::text(NETWORK_PLACEHOLDER)),
        (Signal::SniDnsCert, SignalValue::text(NETWORK_PLACEHOLDER)),
    ]
}

/// All immediate collectors, in declaration order of their first signal.
pub fn collect_all(env: &dyn ClientEnvironment) -> Entries {
    let mut entries = fonts(env);
    entries.extend(navigator(env));
    entries.extend(screen(env));
    entries.extend(intl(env));
    entries.extend(plugins(env));
    entries.extend(network_placeholders());
    entries
}
