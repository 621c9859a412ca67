//! Schema checks for `POST /api/testing` bodies.
//!
//! Checks run in a fixed order and stop at the first failure, so a client
//! always sees the same message for the same body.

use fplab_core::{ExtensionFlags, RunConfig, Signal};
use serde_json::{Map, Value};
use thiserror::Error;

/// The first constraint a submission failed, phrased with its JSON path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{constraint}")]
pub struct ValidationError {
    pub constraint: String,
}

impl ValidationError {
    fn new(constraint: impl Into<String>) -> Self {
        Self {
            constraint: constraint.into(),
        }
    }
}

/// A submission that passed every check, with flags derived and feature
/// values reduced to their stored text.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub timestamp: String,
    pub config: RunConfig,
    pub flags: ExtensionFlags,
    pub features: [String; Signal::COUNT],
}

/// Validate a parsed request body.
///
/// # Errors
///
/// Returns [`ValidationError`] naming the first failed constraint.
pub fn validate_submission(body: &Value) -> Result<ValidSubmission, ValidationError> {
    let body = body
        .as_object()
        .ok_or_else(|| ValidationError::new("body must be a JSON object"))?;

    let timestamp = match body.get("timestamp") {
        None | Some(Value::Null) => return Err(ValidationError::new("timestamp is required")),
        Some(Value::String(ts)) if !ts.is_empty() => ts.clone(),
        Some(_) => {
            return Err(ValidationError::new(
                "timestamp must be a non-empty string",
            ))
        }
    };

    let config = validate_config(body.get("config"))?;
    let features = validate_features(body.get("features"))?;
    let flags = ExtensionFlags::from_extensions(&config.extensions);

    Ok(ValidSubmission {
        timestamp,
        config,
        flags,
        features,
    })
}

fn validate_config(config: Option<&Value>) -> Result<RunConfig, ValidationError> {
    let config = required_object("config", config)?;

    let browser = match config.get("browser") {
        None | Some(Value::Null) => return Err(ValidationError::new("config.browser is required")),
        Some(Value::String(browser)) => browser.clone(),
        Some(_) => return Err(ValidationError::new("config.browser must be a string")),
    };
    let privacy_max = required_bool(config, "privacy_max")?;
    let incognito = required_bool(config, "incognito")?;

    let extensions = match config.get("extensions") {
        None | Some(Value::Null) => {
            return Err(ValidationError::new("config.extensions is required"))
        }
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ValidationError::new(format!("config.extensions[{i}] must be a string"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(ValidationError::new(
                "config.extensions must be an array of strings",
            ))
        }
    };

    Ok(RunConfig {
        browser,
        privacy_max,
        incognito,
        extensions,
    })
}

fn validate_features(features: Option<&Value>) -> Result<[String; Signal::COUNT], ValidationError> {
    let features = required_object("features", features)?;

    let mut texts: [String; Signal::COUNT] = std::array::from_fn(|_| String::new());
    for signal in Signal::ALL {
        let value = features.get(signal.label()).ok_or_else(|| {
            ValidationError::new(format!("features.\"{}\" is required", signal.label()))
        })?;
        if value.is_null() {
            return Err(ValidationError::new(format!(
                "features.\"{}\" must not be null",
                signal.label()
            )));
        }
        texts[signal.index()] = feature_text(value);
    }
    Ok(texts)
}

/// Stored text for a feature value: strings verbatim, anything else as
/// compact JSON.
#[must_use]
pub fn feature_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn required_object<'a>(
    path: &str,
    value: Option<&'a Value>,
) -> Result<&'a Map<String, Value>, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::new(format!("{path} is required"))),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ValidationError::new(format!("{path} must be an object"))),
    }
}

fn required_bool(config: &Map<String, Value>, field: &str) -> Result<bool, ValidationError> {
    match config.get(field) {
        None | Some(Value::Null) => Err(ValidationError::new(format!(
            "config.{field} is required"
        ))),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(ValidationError::new(format!(
            "config.{field} must be a boolean"
        ))),
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
