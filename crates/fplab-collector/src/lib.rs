//! Client-side signal collection for fplab.
//!
//! An [`Orchestrator`] runs every collector against a [`ClientEnvironment`]
//! and yields a complete [`fplab_core::FeatureRecord`]. Individual signals
//! fail independently; the record always carries all of them.

pub mod ceiling;
pub mod collectors;
pub mod config;
pub mod environment;
pub mod error;
pub mod fonts;
pub mod hashing;
pub mod host;
pub mod orchestrator;
pub mod submit;

pub use ceiling::{race_ceiling, Settle};
pub use config::CollectorConfig;
pub use environment::{
    AudioRender, CanvasText, ClientEnvironment, EnvEvent, EventKind, IntlInfo, MediaDevice,
    MotionReading, NavigatorInfo, ScreenInfo, ShaderPrecision, WebGlInfo,
};
pub use error::{CapabilityError, SubmitError};
pub use hashing::sha256_hex;
pub use host::HostEnvironment;
pub use orchestrator::{CollectionPass, Orchestrator};
pub use submit::{DeliveryPolicy, SubmissionClient};
