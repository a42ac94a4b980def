pub mod clock;
pub mod controller;
pub mod machine;
pub mod state;

pub use clock::ProgressClock;
pub use controller::{PlaybackController, PlaybackSnapshot};
pub use machine::PlaybackMachine;
pub use state::{ExitReason, PlaybackEffect, PlaybackState, PlaybackStatus};
