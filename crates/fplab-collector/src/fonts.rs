//! Installed-font detection by text-width comparison.
//!
//! Each candidate is rendered with the generic families as fallbacks. If the
//! candidate is missing, the browser falls back to one of them and the width
//! matches that baseline. A font whose width happens to coincide with a
//! baseline is reported as missing.

use crate::{environment::ClientEnvironment, error::CapabilityError};

pub const PROBE_TEXT: &str = "mmmmmmmmmlliI";
pub const PROBE_SIZE: &str = "16px";
pub const BASELINE_FAMILIES: [&str; 3] = ["monospace", "serif", "sans-serif"];
pub const CANDIDATE_FONTS: [&str; 5] = [
    "Arial",
    "Times New Roman",
    "Courier New",
    "Roboto",
    "Comic Sans MS",
];

/// Widths closer than this to a baseline count as equal.
pub const WIDTH_EPSILON: f64 = 0.1;

/// `true` when `width` differs from every baseline by at least [`WIDTH_EPSILON`].
#[must_use]
pub fn is_detected(width: f64, baselines: &[f64]) -> bool {
    !baselines
        .iter()
        .any(|baseline| (width - baseline).abs() < WIDTH_EPSILON)
}

/// Candidates whose measured width sets them apart from all baselines, in
/// candidate order.
#[must_use]
pub fn detect_fonts<'a>(baselines: &[f64], measured: &[(&'a str, f64)]) -> Vec<&'a str> {
    measured
        .iter()
        .filter(|(_, width)| is_detected(*width, baselines))
        .map(|(name, _)| *name)
        .collect()
}

/// Measure the baselines and every candidate through `env`.
///
/// # Errors
///
/// Returns the first [`CapabilityError`] raised by a measurement.
pub fn probe_fonts(env: &dyn ClientEnvironment) -> Result<Vec<String>, CapabilityError> {
    let baselines = BASELINE_FAMILIES
        .iter()
        .map(|family| env.measure_text_width(&format!("{PROBE_SIZE} {family}"), PROBE_TEXT))
        .collect::<Result<Vec<_>, _>>()?;

    let fallback = BASELINE_FAMILIES.join(",");
    let measured = CANDIDATE_FONTS
        .iter()
        .map(|font| {
            env.measure_text_width(&format!("{PROBE_SIZE} {font},{fallback}"), PROBE_TEXT)
                .map(|width| (*font, width))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(detect_fonts(&baselines, &measured)
        .into_iter()
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_near_a_baseline_is_not_detected() {
        assert!(!is_detected(10.05, &[10.0, 10.0, 10.0]));
    }

    #[test]
    fn width_far_from_all_baselines_is_detected() {
        assert!(is_detected(15.0, &[10.0, 10.0, 10.0]));
    }

    #[test]
    fn matching_any_single_baseline_hides_font() {
        assert!(!is_detected(12.0, &[10.0, 12.0, 14.0]));
        assert!(is_detected(13.0, &[10.0, 12.0, 14.0]));
    }

    #[test]
    fn detect_keeps_candidate_order() {
        let detected = detect_fonts(
            &[10.0, 11.0, 12.0],
            &[("Roboto", 20.0), ("Arial", 10.0), ("Comic Sans MS", 30.0)],
        );
        assert_eq!(detected, vec!["Roboto", "Comic Sans MS"]);
    }
}
