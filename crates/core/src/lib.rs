pub mod config;
pub mod dispatch;
pub mod events;
pub mod job;
pub mod metrics;
pub mod preset;
pub mod runner;
pub mod testing;

pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use dispatch::{Dispatcher, DispatcherConfig, DispatcherStatus, SubmitError};
pub use events::{ChannelSink, JobEvent, JobEventKind, NullSink, ProgressSink};
pub use job::{JobId, JobOutcome, JobPhase, JobSpec, JobState};
pub use preset::{Preset, PresetCatalog};
pub use runner::{FfmpegRunner, JobRunner, RunnerConfig, RunnerError};
