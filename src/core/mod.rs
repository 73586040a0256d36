pub mod player;
pub mod settings;

pub use player::play_batch;
pub use settings::{Overrides, Settings};
