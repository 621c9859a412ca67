//! Event-driven collectors.
//!
//! Each listener runs in its own task and races a wall-clock ceiling. At the
//! ceiling the listener is aborted and whatever it accumulated is written to
//! the record, so events arriving later are never seen.

use std::{future::Future, panic::AssertUnwindSafe, sync::Arc, time::Duration};

use fplab_core::{Signal, SignalValue, UnavailableReason};
use futures::{FutureExt, StreamExt};
use parking_lot::Mutex;
use tokio::{task::JoinHandle, time::Instant};

use super::{number_value, RecordSlots};
use crate::{
    ceiling::race_ceiling,
    config::CollectorConfig,
    environment::{ClientEnvironment, EnvEvent, EventKind},
    error::CapabilityError,
};

type Extract = fn(&EnvEvent) -> Option<SignalValue>;
type Buffer = Arc<Mutex<Vec<SignalValue>>>;

fn point(x: f64, y: f64) -> SignalValue {
    SignalValue::List(vec![number_value(x), number_value(y)])
}

fn mouse_entry(event: &EnvEvent) -> Option<SignalValue> {
    match event {
        EnvEvent::MouseMove { x, y } => Some(point(*x, *y)),
        _ => None,
    }
}

fn key_entry(event: &EnvEvent) -> Option<SignalValue> {
    match event {
        EnvEvent::KeyDown { key } => Some(SignalValue::text(key.clone())),
        _ => None,
    }
}

fn scroll_entry(event: &EnvEvent) -> Option<SignalValue> {
    match event {
        EnvEvent::Scroll { x, y } => Some(point(*x, *y)),
        _ => None,
    }
}

fn touch_entry(event: &EnvEvent) -> Option<SignalValue> {
    match event {
        EnvEvent::TouchStart { touches } => Some(SignalValue::Text(format!("start {touches}"))),
        EnvEvent::TouchEnd => Some(SignalValue::text("end")),
        _ => None,
    }
}

fn orientation_entry(event: &EnvEvent) -> Option<SignalValue> {
    match event {
        EnvEvent::Orientation { alpha, beta, gamma } => Some(SignalValue::List(vec![
            number_value(*alpha),
            number_value(*beta),
            number_value(*gamma),
        ])),
        _ => None,
    }
}

fn motion_entry(event: &EnvEvent) -> Option<SignalValue> {
    match event {
        EnvEvent::Motion(reading) => Some(SignalValue::List(
            reading
                .acceleration
                .iter()
                .chain(&reading.acceleration_including_gravity)
                .chain(&reading.rotation_rate)
                .map(|n| number_value(*n))
                .collect(),
        )),
        _ => None,
    }
}

/// Outcome of a listener that stops before its ceiling.
enum Listened {
    /// Nothing more will arrive; the ceiling fallback decides the value.
    Idle,
    Value(SignalValue),
}

async fn accumulate(
    env: Arc<dyn ClientEnvironment>,
    kind: EventKind,
    cap: Option<usize>,
    extract: Extract,
    buffer: Buffer,
) -> Result<Listened, CapabilityError> {
    let mut events = env.subscribe(kind).await?;
    while let Some(event) = events.next().await {
        let Some(entry) = extract(&event) else {
            continue;
        };
        let full = {
            let mut sampled = buffer.lock();
            sampled.push(entry);
            cap.is_some_and(|cap| sampled.len() >= cap)
        };
        if full {
            break;
        }
    }
    Ok(Listened::Idle)
}

async fn first_event(
    env: Arc<dyn ClientEnvironment>,
    kind: EventKind,
    extract: Extract,
) -> Result<Listened, CapabilityError> {
    let mut events = env.subscribe(kind).await?;
    while let Some(event) = events.next().await {
        if let Some(value) = extract(&event) {
            return Ok(Listened::Value(value));
        }
    }
    Ok(Listened::Idle)
}

async fn collect_candidates(
    env: Arc<dyn ClientEnvironment>,
    buffer: Buffer,
) -> Result<Listened, CapabilityError> {
    let mut candidates = env.ice_candidates().await?;
    while let Some(candidate) = candidates.next().await {
        buffer.lock().push(SignalValue::Text(candidate));
    }
    Ok(Listened::Idle)
}

/// Race `listen` against `ceiling` and write the winner for `signal`. The
/// ceiling is measured from the spawn, not from the task's first poll.
fn spawn_listener<L, G>(
    signal: Signal,
    ceiling: Duration,
    slots: Arc<RecordSlots>,
    listen: L,
    fallback: G,
) -> JoinHandle<()>
where
    L: Future<Output = Result<Listened, CapabilityError>> + Send + 'static,
    G: FnOnce() -> SignalValue + Send + 'static,
{
    let deadline = Instant::now() + ceiling;
    tokio::spawn(async move {
        let guarded = async move {
            match AssertUnwindSafe(listen).catch_unwind().await {
                Ok(Ok(Listened::Value(value))) => value,
                Ok(Ok(Listened::Idle)) => std::future::pending().await,
                Ok(Err(err)) => {
                    if let CapabilityError::Fault(message) = &err {
                        tracing::warn!(signal = %signal, error = %message, "listener faulted");
                    } else {
                        tracing::debug!(signal = %signal, reason = %err.reason(), "listener unavailable");
                    }
                    SignalValue::Unavailable(err.reason())
                }
                Err(_) => {
                    tracing::warn!(signal = %signal, "listener panicked");
                    SignalValue::Unavailable(UnavailableReason::Blocked)
                }
            }
        };

        let value = race_ceiling(guarded, deadline, fallback)
            .await
            .unwrap_or(SignalValue::Unavailable(UnavailableReason::Timeout));
        tracing::debug!(signal = %signal, len = ?value.list_len(), "listener finalized");
        slots.offer(signal, value);
    })
}

fn spawn_sampler(
    env: &Arc<dyn ClientEnvironment>,
    slots: &Arc<RecordSlots>,
    signal: Signal,
    kind: EventKind,
    cap: Option<usize>,
    ceiling: Duration,
    extract: Extract,
) -> JoinHandle<()> {
    let buffer: Buffer = Arc::default();
    let listen = accumulate(Arc::clone(env), kind, cap, extract, Arc::clone(&buffer));
    spawn_listener(signal, ceiling, Arc::clone(slots), listen, move || {
        SignalValue::List(buffer.lock().clone())
    })
}

fn spawn_first_event(
    env: &Arc<dyn ClientEnvironment>,
    slots: &Arc<RecordSlots>,
    signal: Signal,
    kind: EventKind,
    ceiling: Duration,
    extract: Extract,
) -> JoinHandle<()> {
    let listen = first_event(Arc::clone(env), kind, extract);
    spawn_listener(signal, ceiling, Arc::clone(slots), listen, || {
        SignalValue::Unavailable(UnavailableReason::Timeout)
    })
}

fn spawn_webrtc(
    env: &Arc<dyn ClientEnvironment>,
    slots: &Arc<RecordSlots>,
    ceiling: Duration,
) -> JoinHandle<()> {
    let buffer: Buffer = Arc::default();
    let listen = collect_candidates(Arc::clone(env), Arc::clone(&buffer));
    spawn_listener(
        Signal::WebRtcCandidate,
        ceiling,
        Arc::clone(slots),
        listen,
        move || SignalValue::List(buffer.lock().clone()),
    )
}

/// Start every event-driven collector. Each task ends at its ceiling.
pub fn spawn_all(
    env: &Arc<dyn ClientEnvironment>,
    config: &CollectorConfig,
    slots: &Arc<RecordSlots>,
) -> Vec<JoinHandle<()>> {
    let cap = Some(config.sample_cap);
    vec![
        spawn_webrtc(env, slots, config.webrtc_ceiling),
        spawn_first_event(
            env,
            slots,
            Signal::DeviceMotion,
            EventKind::Motion,
            config.sensor_ceiling,
            motion_entry,
        ),
        spawn_first_event(
            env,
            slots,
            Signal::DeviceOrientation,
            EventKind::Orientation,
            config.sensor_ceiling,
            orientation_entry,
        ),
        spawn_sampler(
            env,
            slots,
            Signal::MouseSample,
            EventKind::Mouse,
            cap,
            config.behaviour_ceiling,
            mouse_entry,
        ),
        spawn_sampler(
            env,
            slots,
            Signal::KeyPressSample,
            EventKind::Key,
            cap,
            config.behaviour_ceiling,
            key_entry,
        ),
        spawn_sampler(
            env,
            slots,
            Signal::ScrollSample,
            EventKind::Scroll,
            cap,
            config.behaviour_ceiling,
            scroll_entry,
        ),
        spawn_sampler(
            env,
            slots,
            Signal::TouchGesturesSample,
            EventKind::Touch,
            None,
            config.touch_ceiling,
            touch_entry,
        ),
    ]
}
