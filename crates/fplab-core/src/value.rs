use serde::{Deserialize, Serialize, Serializer};

/// Why a signal could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnavailableReason {
    /// The capability exists but faulted or was blocked.
    Blocked,
    /// The capability does not exist in this environment.
    Unsupported,
    /// The user or platform refused permission.
    Denied,
    /// Nothing arrived before the collector's budget or ceiling.
    Timeout,
}

impl UnavailableReason {
    /// Text emitted in place of a value on the wire.
    #[must_use]
    pub fn wire_text(self) -> &'static str {
        match self {
            UnavailableReason::Blocked => "Blocked",
            UnavailableReason::Unsupported => "Not supported",
            UnavailableReason::Denied => "Denied",
            UnavailableReason::Timeout => "Timeout",
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            UnavailableReason::Blocked => "blocked",
            UnavailableReason::Unsupported => "unsupported",
            UnavailableReason::Denied => "denied",
            UnavailableReason::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The value of one signal in a feature record.
///
/// Deserializing is lossy for unavailability: `"Blocked"` read back from JSON
/// is plain text, since the wire format does not tag markers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "WireValue")]
pub enum SignalValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    List(Vec<SignalValue>),
    Unavailable(UnavailableReason),
}

impl SignalValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        SignalValue::Text(value.into())
    }

    #[must_use]
    pub fn texts<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SignalValue::List(values.into_iter().map(|v| SignalValue::Text(v.into())).collect())
    }

    #[must_use]
    pub fn numbers<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        SignalValue::List(values.into_iter().map(SignalValue::Number).collect())
    }

    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SignalValue::Unavailable(_))
    }

    #[must_use]
    pub fn unavailable_reason(&self) -> Option<UnavailableReason> {
        match self {
            SignalValue::Unavailable(reason) => Some(*reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SignalValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Length of a list value, `None` for anything else.
    #[must_use]
    pub fn list_len(&self) -> Option<usize> {
        match self {
            SignalValue::List(items) => Some(items.len()),
            _ => None,
        }
    }
}

impl Serialize for SignalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SignalValue::Text(s) => serializer.serialize_str(s),
            SignalValue::Integer(n) => serializer.serialize_i64(*n),
            SignalValue::Number(n) => serializer.serialize_f64(*n),
            SignalValue::Bool(b) => serializer.serialize_bool(*b),
            SignalValue::List(items) => serializer.collect_seq(items),
            SignalValue::Unavailable(reason) => serializer.serialize_str(reason.wire_text()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<SignalValue>),
}

impl From<WireValue> for SignalValue {
    fn from(value: WireValue) -> Self {
        match value {
            WireValue::Bool(b) => SignalValue::Bool(b),
            WireValue::Integer(n) => SignalValue::Integer(n),
            WireValue::Number(n) => SignalValue::Number(n),
            WireValue::Text(s) => SignalValue::Text(s),
            WireValue::List(items) => SignalValue::List(items),
        }
    }
}
