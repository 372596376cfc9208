pub mod animate;
pub mod backend;
pub mod config;
pub mod phases;
pub mod projection;
pub mod scene;
pub mod snapshot;
pub mod transitions;
pub mod validation;

pub use animate::{Animator, PropertySink};
pub use backend::{
    Backend, BackendContext, BackendError, BackendRegistry, Capability, FallbackBackend,
    Interpolation, Recording, RecordingBackend,
};
pub use config::{
    load_project_file, load_trace_file, save_project_file, ConfigError, ImageScale, PlotConfig,
    ProjectConfig, RenderSettings, TraceInput,
};
pub use phases::{boundary_masks, classify, entry_frames, frame_phases, phase_masks, Phase};
pub use projection::{project, project_frame};
pub use scene::{Plot, Scene, Trace};
pub use snapshot::{SessionSnapshot, SnapshotError, SNAPSHOT_VERSION};
pub use transitions::{transition_keyframes, TransitionKeyframe};

use encoding::EncodingError;
use timeline::TimelineError;

#[derive(thiserror::Error, Debug)]
pub enum ScatterError {
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("id {0} is not registered")]
    IdMissing(u64),
    #[error("id {0} is already taken")]
    IdTaken(u64),
}
