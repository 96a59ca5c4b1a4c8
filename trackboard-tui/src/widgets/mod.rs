//! Reusable widget components.

pub mod detail;
pub mod progress;
pub mod status;

pub use detail::DetailPanel;
pub use progress::ProgressBar;
pub use status::{badge_span, KpiTile};
