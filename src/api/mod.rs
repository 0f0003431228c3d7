mod axis_options;
mod editor_config;
mod editor_snapshot;
mod profile;
mod profile_manager;
mod profile_store;

pub use axis_options::{AutoZoom, AxisKind, AxisOptions, AxisRange};
pub use editor_config::BandEditorConfig;
pub use editor_snapshot::EditorSnapshot;
pub use profile::{Profile, ProfileId, ProfileOption, ProjectOverride, RangeType, SaveRequest};
pub use profile_manager::{ProfileManager, ReloadOutcome, Selection};
pub use profile_store::{InMemoryProfileStore, ProfileStore};
