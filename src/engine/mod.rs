mod active;
mod blocklist;
mod classify;
mod insights;
mod model;
mod playback;
mod spreaders;

pub use blocklist::BlockList;
pub use classify::{Rgb, Tier, classify};
pub use insights::{StepInsights, reach_curve};
pub use model::RenderGraph;
pub use playback::{PlaybackController, PlaybackStatus};
