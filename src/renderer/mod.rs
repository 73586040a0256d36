pub mod cell;
pub mod display;
pub mod geometry;
pub mod palette;
pub mod quantizer;

pub use display::{FrameRenderer, RenderMode, RenderOutcome};
pub use geometry::{Geometry, SizeRequest};
