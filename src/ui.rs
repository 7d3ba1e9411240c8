//! Ratatui front-end. `App` owns the dataset, the selector filters and the
//! explicit view state; `terminal` drives the draw/input loop around it.

mod app;
mod helpers;
mod overlay;
mod state;
mod terminal;

pub use app::App;
pub use overlay::{OverlayPhase, UsageOverlay, CLOSE_DURATION, OPEN_DURATION};
pub use state::{ListState, RevealSet};
pub use terminal::run_app;
