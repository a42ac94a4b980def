pub mod event;
pub mod router;

pub use event::{GestureCommand, PointerEvent};
pub use router::{BareSurface, GestureConfig, GestureRouter, HitTest};
