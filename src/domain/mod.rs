pub mod post;
pub mod target;
pub mod window;
pub mod zone;

pub use post::PostRecord;
pub use target::{Target, TargetConfig};
pub use window::{DateWindow, RangePreset};
pub use zone::DisplayZone;
