//! Price refresh control
//!
//! Decides when the cached snapshot is stale and runs re-scrapes through
//! a single-flight state machine:
//! - `staleness`: age check and the once-per-session auto-refresh flag
//! - `marker`: when the snapshot was last known fresh
//! - `progress`: cosmetic stage labels
//! - `orchestrator`: the refresh state machine

pub mod staleness;
pub mod marker;
pub mod progress;
pub mod orchestrator;

pub use marker::LastUpdateMarker;
pub use orchestrator::{RefreshOrchestrator, RefreshOutcome, RefreshState, RefreshSummary, RefreshTrigger};
pub use progress::{ProgressSchedule, ProgressStage};
pub use staleness::{is_stale, SessionFlags, DEFAULT_STALENESS_HOURS};
