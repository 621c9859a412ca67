//! Signal collectors, grouped by timing class.
//!
//! A collector owns a fixed set of signals and resolves to one entry per
//! owned signal. Failures never cross the collector boundary: they become
//! [`SignalValue::Unavailable`] entries for everything the collector owns.

pub mod bounded;
pub mod events;
pub mod immediate;

use std::{future::Future, panic::AssertUnwindSafe, time::Duration};

use fplab_core::{FeatureRecord, Signal, SignalValue, UnavailableReason};
use futures::FutureExt;
use parking_lot::Mutex;

use crate::error::CapabilityError;

/// `(signal, value)` pairs produced by one collector.
pub type Entries = Vec<(Signal, SignalValue)>;

/// Record under construction. The first write per signal wins.
pub struct RecordSlots {
    slots: Mutex<[Option<SignalValue>; Signal::COUNT]>,
}

impl Default for RecordSlots {
    fn default() -> Self {
        Self {
            slots: Mutex::new(std::array::from_fn(|_| None)),
        }
    }
}

impl RecordSlots {
    /// Store `value` unless the signal already has one. Returns `true` if
    /// this write was kept.
    pub fn offer(&self, signal: Signal, value: SignalValue) -> bool {
        let mut slots = self.slots.lock();
        let slot = &mut slots[signal.index()];
        if slot.is_some() {
            tracing::trace!(signal = %signal, "dropping late write");
            return false;
        }
        *slot = Some(value);
        true
    }

    pub fn offer_all(&self, entries: Entries) {
        for (signal, value) in entries {
            self.offer(signal, value);
        }
    }

    #[must_use]
    pub fn get(&self, signal: Signal) -> Option<SignalValue> {
        self.slots.lock()[signal.index()].clone()
    }

    /// Current contents in declaration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(Signal, Option<SignalValue>)> {
        let slots = self.slots.lock();
        Signal::ALL
            .into_iter()
            .map(|s| (s, slots[s.index()].clone()))
            .collect()
    }

    /// Complete record, with `Timeout` for every signal nothing was written to.
    #[must_use]
    pub fn to_record(&self) -> FeatureRecord {
        let slots = self.slots.lock();
        FeatureRecord::from_fn(|s| {
            slots[s.index()]
                .clone()
                .unwrap_or(SignalValue::Unavailable(UnavailableReason::Timeout))
        })
    }
}

/// Every owned signal marked with `reason`.
pub(crate) fn mark_all(owned: &[Signal], reason: UnavailableReason) -> Entries {
    owned
        .iter()
        .map(|s| (*s, SignalValue::Unavailable(reason)))
        .collect()
}

fn log_capability_error(collector: &str, err: &CapabilityError) {
    match err {
        CapabilityError::Fault(message) => {
            tracing::warn!(collector, error = %message, "collector faulted");
        }
        CapabilityError::Unsupported | CapabilityError::Denied => {
            tracing::debug!(collector, reason = %err.reason(), "collector unavailable");
        }
    }
}

/// Run a synchronous collector, converting errors and panics into markers.
pub(crate) fn guard_sync<F>(collector: &'static str, owned: &[Signal], work: F) -> Entries
where
    F: FnOnce() -> Result<Entries, CapabilityError>,
{
    match std::panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(Ok(entries)) => entries,
        Ok(Err(err)) => {
            log_capability_error(collector, &err);
            mark_all(owned, err.reason())
        }
        Err(_) => {
            tracing::warn!(collector, "collector panicked");
            mark_all(owned, UnavailableReason::Blocked)
        }
    }
}

/// Run an async collector under `budget`, converting errors, panics and
/// overruns into markers.
pub(crate) async fn guard_bounded<F>(
    collector: &'static str,
    owned: &[Signal],
    budget: Duration,
    work: F,
) -> Entries
where
    F: Future<Output = Result<Entries, CapabilityError>>,
{
    match tokio::time::timeout(budget, AssertUnwindSafe(work).catch_unwind()).await {
        Ok(Ok(Ok(entries))) => entries,
        Ok(Ok(Err(err))) => {
            log_capability_error(collector, &err);
            mark_all(owned, err.reason())
        }
        Ok(Err(_)) => {
            tracing::warn!(collector, "collector panicked");
            mark_all(owned, UnavailableReason::Blocked)
        }
        Err(_) => {
            tracing::debug!(collector, budget_ms = budget.as_millis(), "collector timed out");
            mark_all(owned, UnavailableReason::Timeout)
        }
    }
}

/// Numbers that are whole render as integers, matching how the browser
/// prints them.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub(crate) fn number_value(n: f64) -> SignalValue {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        SignalValue::Integer(n as i64)
    } else {
        SignalValue::Number(n)
    }
}
