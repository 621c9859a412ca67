//! Integration tests for a full collection pass.
//!
//! `ScriptedEnvironment` returns fixed values, injects faults, panics and
//! hangs per capability, and replays timed event streams. All tests run on a
//! paused clock so ceilings are exact.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::time::Instant;

use fplab_collector::{
    hashing::sha256_hex_f32, host::render_sine, sha256_hex, AudioRender, CanvasText,
    CapabilityError, ClientEnvironment, CollectorConfig, EnvEvent, EventKind, HostEnvironment,
    IntlInfo, MediaDevice, MotionReading, NavigatorInfo, Orchestrator, ScreenInfo,
    ShaderPrecision, WebGlInfo,
};
use fplab_core::{Signal, SignalValue, UnavailableReason};

const CANVAS_PIXELS: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behave {
    Fault,
    Panic,
    Hang,
    Unsupported,
    Denied,
}

#[derive(Default)]
struct ScriptedEnvironment {
    failures: HashMap<&'static str, Behave>,
    /// Events per kind, as offsets from subscription.
    events: HashMap<EventKind, Vec<(Duration, EnvEvent)>>,
    candidates: Vec<(Duration, String)>,
    /// Widths keyed by the first family of the font stack.
    font_widths: HashMap<&'static str, f64>,
    /// Sync capabilities that block the calling thread before answering.
    stalls: HashMap<&'static str, Duration>,
}

impl ScriptedEnvironment {
    fn failing(mut self, capability: &'static str, behave: Behave) -> Self {
        self.failures.insert(capability, behave);
        self
    }

    fn with_events(mut self, kind: EventKind, events: Vec<(u64, EnvEvent)>) -> Self {
        self.events.insert(
            kind,
            events
                .into_iter()
                .map(|(ms, e)| (Duration::from_millis(ms), e))
                .collect(),
        );
        self
    }

    fn stalling(mut self, capability: &'static str, duration: Duration) -> Self {
        self.stalls.insert(capability, duration);
        self
    }

    /// Sync check. `Hang` cannot apply to sync reads and is ignored.
    fn check(&self, capability: &str) -> Result<(), CapabilityError> {
        if let Some(stall) = self.stalls.get(capability) {
            std::thread::sleep(*stall);
        }
        match self.failures.get(capability) {
            None | Some(Behave::Hang) => Ok(()),
            Some(Behave::Fault) => Err(CapabilityError::Fault(format!("{capability} fault"))),
            Some(Behave::Panic) => panic!("{capability} panicked"),
            Some(Behave::Unsupported) => Err(CapabilityError::Unsupported),
            Some(Behave::Denied) => Err(CapabilityError::Denied),
        }
    }

    async fn check_async(&self, capability: &str) -> Result<(), CapabilityError> {
        if self.failures.get(capability) == Some(&Behave::Hang) {
            std::future::pending::<()>().await;
        }
        self.check(capability)
    }

    fn timed<T: Send + 'static>(items: Vec<(Duration, T)>) -> BoxStream<'static, T> {
        let start = Instant::now();
        stream::iter(items)
            .then(move |(at, item)| async move {
                tokio::time::sleep_until(start + at).await;
                item
            })
            .boxed()
    }
}

#[async_trait]
impl ClientEnvironment for ScriptedEnvironment {
    fn navigator(&self) -> Result<NavigatorInfo, CapabilityError> {
        self.check("navigator")?;
        Ok(NavigatorInfo {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
                .to_string(),
            platform: "Linux x86_64".to_string(),
            hardware_concurrency: Some(8),
            device_memory_gb: None,
            cookie_enabled: true,
            language: "en-US".to_string(),
            do_not_track: Some("1".to_string()),
        })
    }

    fn screen(&self) -> Result<ScreenInfo, CapabilityError> {
        self.check("screen")?;
        Ok(ScreenInfo {
            width: 1920,
            height: 1080,
            color_depth: 24,
            device_pixel_ratio: 1.5,
            avail_left: Some(1920),
            avail_top: None,
        })
    }

    fn intl(&self) -> Result<IntlInfo, CapabilityError> {
        self.check("intl")?;
        Ok(IntlInfo {
            time_zone: "Europe/Berlin".to_string(),
            locale: "de-DE".to_string(),
        })
    }

    fn plugins(&self) -> Result<Vec<String>, CapabilityError> {
        self.check("plugins")?;
        Ok(Vec::new())
    }

    fn measure_text_width(&self, font: &str, _text: &str) -> Result<f64, CapabilityError> {
        self.check("fonts")?;
        let family = font
            .trim_start_matches("16px ")
            .split(',')
            .next()
            .unwrap_or_default();
        Ok(self.font_widths.get(family).copied().unwrap_or(10.0))
    }

    async fn render_canvas(&self, spec: &CanvasText) -> Result<Vec<u8>, CapabilityError> {
        self.check_async("canvas").await?;
        assert_eq!(spec.text, "Canvas FP Test 😃 測試");
        Ok(CANVAS_PIXELS.to_vec())
    }

    async fn webgl(&self) -> Result<WebGlInfo, CapabilityError> {
        self.check_async("webgl").await?;
        Ok(WebGlInfo {
            debug_renderer: Some(("Mesa".to_string(), "llvmpipe".to_string())),
            vertex_high_float: ShaderPrecision {
                range_min: 127,
                range_max: 127,
                precision: 23,
            },
        })
    }

    async fn render_audio(&self, spec: &AudioRender) -> Result<Vec<f32>, CapabilityError> {
        self.check_async("audio").await?;
        Ok(vec![0.25; spec.frames as usize])
    }

    async fn media_devices(&self) -> Result<Vec<MediaDevice>, CapabilityError> {
        self.check_async("media_devices").await?;
        Ok(vec![
            MediaDevice {
                kind: "audioinput".to_string(),
                label: String::new(),
            },
            MediaDevice {
                kind: "videoinput".to_string(),
                label: "Integrated Camera".to_string(),
            },
        ])
    }

    async fn compile_wasm(&self, module: &[u8]) -> Result<(), CapabilityError> {
        self.check_async("wasm").await?;
        assert_eq!(module, &[0, 97, 115, 109, 1, 0, 0, 0]);
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(())
    }

    async fn ice_candidates(&self) -> Result<BoxStream<'static, String>, CapabilityError> {
        self.check_async("webrtc").await?;
        Ok(Self::timed(self.candidates.clone()))
    }

    async fn subscribe(
        &self,
        kind: EventKind,
    ) -> Result<BoxStream<'static, EnvEvent>, CapabilityError> {
        let capability = format!("{kind:?}").to_lowercase();
        self.check_async(&capability).await?;
        Ok(Self::timed(self.events.get(&kind).cloned().unwrap_or_default()))
    }
}

fn orchestrator(env: ScriptedEnvironment) -> Orchestrator {
    Orchestrator::new(Arc::new(env), CollectorConfig::default())
}

fn unavailable(reason: UnavailableReason) -> SignalValue {
    SignalValue::Unavailable(reason)
}

fn mouse(x: f64, y: f64) -> EnvEvent {
    EnvEvent::MouseMove { x, y }
}

#[tokio::test(start_paused = true)]
async fn full_pass_collects_every_signal() {
    let mut env = ScriptedEnvironment::default()
        .with_events(
            EventKind::Mouse,
            vec![
                (100, mouse(1.0, 2.0)),
                (200, mouse(3.0, 4.0)),
                (300, mouse(5.0, 6.0)),
                (400, mouse(7.0, 8.0)),
                (500, mouse(9.0, 10.0)),
            ],
        )
        .with_events(
            EventKind::Key,
            vec![(150, EnvEvent::KeyDown { key: "a".to_string() })],
        )
        .with_events(
            EventKind::Touch,
            vec![
                (100, EnvEvent::TouchStart { touches: 1 }),
                (200, EnvEvent::TouchEnd),
                (4_500, EnvEvent::TouchStart { touches: 2 }),
            ],
        )
        .with_events(
            EventKind::Orientation,
            vec![
                (
                    50,
                    EnvEvent::Orientation {
                        alpha: 10.0,
                        beta: 20.5,
                        gamma: -3.0,
                    },
                ),
                (
                    60,
                    EnvEvent::Orientation {
                        alpha: 99.0,
                        beta: 99.0,
                        gamma: 99.0,
                    },
                ),
            ],
        )
        .with_events(
            EventKind::Motion,
            vec![(70, EnvEvent::Motion(MotionReading::default()))],
        );
    env.candidates = vec![(
        Duration::from_millis(20),
        "candidate:1 1 udp 2113937151 192.168.1.2 54400 typ host".to_string(),
    )];
    env.font_widths.insert("Arial", 15.0);
    env.font_widths.insert("Roboto", 10.05);

    let record = orchestrator(env).collect().await;

    assert!(record.unavailable_signals().is_empty(), "{:?}", record.unavailable_signals());
    assert_eq!(record.canvas_fingerprint, SignalValue::Text(sha256_hex(CANVAS_PIXELS)));
    assert_eq!(record.webgl_vendor, SignalValue::text("Mesa"));
    assert_eq!(record.webgl_renderer, SignalValue::text("llvmpipe"));
    assert_eq!(
        serde_json::to_string(&record.webgl_shader_precision).unwrap(),
        "[127,127,23]"
    );
    assert_eq!(record.detected_fonts, SignalValue::texts(["Arial"]));
    assert_eq!(record.screen_resolution, SignalValue::text("1920 x 1080"));
    assert_eq!(record.device_pixel_ratio, SignalValue::Number(1.5));
    assert_eq!(record.color_depth, SignalValue::Integer(24));
    assert_eq!(
        record.multi_monitor_position,
        SignalValue::text("availLeft=1920, availTop=0")
    );
    assert_eq!(record.cpu_cores, SignalValue::Integer(8));
    assert_eq!(record.device_memory, SignalValue::text("N/A"));
    assert_eq!(record.do_not_track, SignalValue::text("1"));
    assert_eq!(record.plugins, SignalValue::text("None"));
    assert_eq!(
        record.media_devices,
        SignalValue::texts(["audioinput: hidden", "videoinput: Integrated Camera"])
    );
    assert_eq!(
        record.audio_fingerprint,
        SignalValue::Text(sha256_hex_f32(&vec![0.25; 44_100]))
    );
    assert_eq!(record.wasm_compile_time, SignalValue::text("5.00"));
    assert_eq!(
        record.tls_ja3,
        SignalValue::text("Unavailable to client-side collection")
    );
    assert_eq!(record.sni_dns_cert, record.tls_ja3);

    assert_eq!(record.mouse_sample.list_len(), Some(3));
    assert_eq!(
        serde_json::to_string(&record.mouse_sample).unwrap(),
        "[[1,2],[3,4],[5,6]]"
    );
    assert_eq!(record.key_press_sample, SignalValue::texts(["a"]));
    assert_eq!(record.scroll_sample, SignalValue::List(Vec::new()));
    assert_eq!(record.touch_gestures_sample, SignalValue::texts(["start 1", "end", "start 2"]));
    assert_eq!(
        serde_json::to_string(&record.device_orientation).unwrap(),
        "[10,20.5,-3]"
    );
    assert_eq!(record.device_motion.list_len(), Some(9));
    assert_eq!(record.webrtc_candidate.list_len(), Some(1));

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json.as_object().unwrap().len(), Signal::COUNT);
}

#[tokio::test(start_paused = true)]
async fn faults_and_panics_become_markers() {
    let env = ScriptedEnvironment::default()
        .failing("canvas", Behave::Fault)
        .failing("webgl", Behave::Panic)
        .failing("audio", Behave::Hang)
        .failing("navigator", Behave::Panic)
        .failing("media_devices", Behave::Denied)
        .failing("fonts", Behave::Fault)
        .failing("wasm", Behave::Unsupported)
        .failing("mouse", Behave::Panic)
        .failing("webrtc", Behave::Fault);

    let start = Instant::now();
    let pass = orchestrator(env).run().await;
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(3), "audio hang uses the full budget");
    assert!(elapsed < Duration::from_millis(3_010), "bounded phase overran: {elapsed:?}");
    assert_eq!(pass.behaviour_key(), "Blocked");

    let record = pass.finish().await;

    assert_eq!(record.canvas_fingerprint, unavailable(UnavailableReason::Blocked));
    assert_eq!(record.webgl_vendor, unavailable(UnavailableReason::Blocked));
    assert_eq!(record.webgl_renderer, unavailable(UnavailableReason::Blocked));
    assert_eq!(record.webgl_shader_precision, unavailable(UnavailableReason::Blocked));
    assert_eq!(record.audio_fingerprint, unavailable(UnavailableReason::Timeout));
    assert_eq!(record.user_agent, unavailable(UnavailableReason::Blocked));
    assert_eq!(record.do_not_track, unavailable(UnavailableReason::Blocked));
    assert_eq!(record.media_devices, unavailable(UnavailableReason::Denied));
    assert_eq!(record.detected_fonts, unavailable(UnavailableReason::Blocked));
    assert_eq!(record.wasm_compile_time, unavailable(UnavailableReason::Unsupported));
    assert_eq!(record.mouse_sample, unavailable(UnavailableReason::Blocked));
    assert_eq!(record.webrtc_candidate, unavailable(UnavailableReason::Blocked));

    assert_eq!(record.screen_resolution, SignalValue::text("1920 x 1080"));
    assert_eq!(record.key_press_sample, SignalValue::List(Vec::new()));
    assert_eq!(
        serde_json::to_value(&record).unwrap()["Canvas Fingerprint"],
        "Blocked"
    );
}

#[tokio::test(start_paused = true)]
async fn events_after_the_ceiling_are_dropped() {
    let mut env = ScriptedEnvironment::default()
        .with_events(
            EventKind::Scroll,
            vec![
                (3_900, EnvEvent::Scroll { x: 0.0, y: 100.0 }),
                (4_100, EnvEvent::Scroll { x: 0.0, y: 200.0 }),
            ],
        )
        .with_events(
            EventKind::Orientation,
            vec![(
                4_500,
                EnvEvent::Orientation {
                    alpha: 1.0,
                    beta: 2.0,
                    gamma: 3.0,
                },
            )],
        );
    env.candidates = vec![
        (Duration::from_millis(100), "early".to_string()),
        (Duration::from_millis(2_000), "late".to_string()),
    ];

    let record = orchestrator(env).collect().await;

    assert_eq!(
        serde_json::to_string(&record.scroll_sample).unwrap(),
        "[[0,100]]"
    );
    assert_eq!(record.device_orientation, unavailable(UnavailableReason::Timeout));
    assert_eq!(record.device_motion, unavailable(UnavailableReason::Timeout));
    assert_eq!(record.webrtc_candidate, SignalValue::texts(["early"]));
}

#[tokio::test(start_paused = true)]
async fn sensor_permission_outcomes() {
    let env = ScriptedEnvironment::default()
        .failing("orientation", Behave::Denied)
        .failing("motion", Behave::Unsupported);

    let record = orchestrator(env).collect().await;

    assert_eq!(record.device_orientation, unavailable(UnavailableReason::Denied));
    assert_eq!(record.device_motion, unavailable(UnavailableReason::Unsupported));
}

#[tokio::test(start_paused = true)]
async fn run_returns_before_listeners_finalize() {
    let env = ScriptedEnvironment::default()
        .with_events(EventKind::Mouse, vec![(100, mouse(1.0, 1.0))]);

    let start = Instant::now();
    let pass = orchestrator(env).run().await;

    assert!(start.elapsed() < Duration::from_secs(1));
    let snapshot = pass.snapshot();
    assert_eq!(snapshot.len(), Signal::COUNT);
    assert!(snapshot[Signal::CanvasFingerprint.index()].1.is_some());
    assert!(snapshot[Signal::MouseSample.index()].1.is_none());
    assert_eq!(pass.behaviour_key(), sha256_hex(CANVAS_PIXELS));

    let record = pass.finish().await;
    assert_eq!(record.mouse_sample.list_len(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn hung_listeners_never_delay_finalization() {
    let env = ScriptedEnvironment::default()
        .failing("mouse", Behave::Hang)
        .failing("touch", Behave::Hang)
        .failing("orientation", Behave::Hang)
        .failing("webrtc", Behave::Hang);

    let start = Instant::now();
    let record = orchestrator(env).collect().await;
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_secs(5), "touch ceiling is 5 s, got {elapsed:?}");
    assert!(elapsed <= Duration::from_millis(5_250), "finished late: {elapsed:?}");
    assert_eq!(record.mouse_sample, SignalValue::List(Vec::new()));
    assert_eq!(record.touch_gestures_sample, SignalValue::List(Vec::new()));
    assert_eq!(record.device_orientation, unavailable(UnavailableReason::Timeout));
    assert_eq!(record.webrtc_candidate, SignalValue::List(Vec::new()));
}

#[tokio::test(start_paused = true)]
async fn settle_waits_from_start_of_pass() {
    let config = CollectorConfig {
        settle_delay: Duration::from_secs(2),
        ..CollectorConfig::default()
    };
    let orchestrator = Orchestrator::new(Arc::new(ScriptedEnvironment::default()), config);

    let start = Instant::now();
    let pass = orchestrator.run().await;
    pass.settle().await;

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_millis(2_010));
    assert_eq!(pass.behaviour_key(), sha256_hex(CANVAS_PIXELS));
}

#[tokio::test(start_paused = true)]
async fn host_environment_pass_is_complete() {
    let host = HostEnvironment {
        lang: Some("en_GB.UTF-8".to_string()),
        time_zone: Some("Europe/London".to_string()),
    };
    let orchestrator = Orchestrator::new(Arc::new(host), CollectorConfig::default());

    let pass = orchestrator.run().await;
    assert_eq!(pass.behaviour_key(), "Blocked");
    let record = pass.finish().await;

    assert_eq!(record.canvas_fingerprint, unavailable(UnavailableReason::Unsupported));
    assert_eq!(record.screen_resolution, unavailable(UnavailableReason::Unsupported));
    assert_eq!(record.detected_fonts, unavailable(UnavailableReason::Unsupported));
    assert_eq!(record.locale, SignalValue::text("en-GB"));
    assert_eq!(record.time_zone, SignalValue::text("Europe/London"));
    assert_eq!(record.plugins, SignalValue::text("None"));
    assert_eq!(
        record.audio_fingerprint,
        SignalValue::Text(sha256_hex_f32(&render_sine(&AudioRender::default(), 440.0)))
    );
    assert_eq!(record.mouse_sample, SignalValue::List(Vec::new()));
    assert_eq!(record.device_motion, unavailable(UnavailableReason::Unsupported));
}

fn one_second_ceilings() -> CollectorConfig {
    let ceiling = Duration::from_secs(1);
    CollectorConfig {
        behaviour_ceiling: ceiling,
        sensor_ceiling: ceiling,
        touch_ceiling: ceiling,
        webrtc_ceiling: ceiling,
        ..CollectorConfig::default()
    }
}

// Real clock: the stall blocks the runtime thread, which a paused clock
// would not observe.
#[tokio::test]
async fn blocking_capability_does_not_push_ceilings_past_finish() {
    let env = ScriptedEnvironment::default().stalling("navigator", Duration::from_millis(600));
    let orchestrator = Orchestrator::new(Arc::new(env), one_second_ceilings());

    let start = Instant::now();
    let record = orchestrator.collect().await;

    assert!(start.elapsed() < Duration::from_millis(1_500), "{:?}", start.elapsed());
    assert_eq!(record.touch_gestures_sample, SignalValue::List(Vec::new()));
    assert_eq!(record.mouse_sample, SignalValue::List(Vec::new()));
    assert_eq!(record.webrtc_candidate, SignalValue::List(Vec::new()));
    assert_eq!(record.device_orientation, unavailable(UnavailableReason::Timeout));
}

#[tokio::test]
async fn stall_past_hard_ceiling_still_keeps_samples() {
    let env = ScriptedEnvironment::default()
        .with_events(EventKind::Key, vec![(0, EnvEvent::KeyDown { key: "q".to_string() })])
        .stalling("screen", Duration::from_millis(1_500));
    let orchestrator = Orchestrator::new(Arc::new(env), one_second_ceilings());

    let record = orchestrator.collect().await;

    assert_eq!(record.scroll_sample, SignalValue::List(Vec::new()));
    assert_eq!(record.touch_gestures_sample, SignalValue::List(Vec::new()));
    assert_eq!(record.screen_resolution, SignalValue::text("1920 x 1080"));
}
