pub mod cancel;
pub mod clock;
pub mod pacer;

pub use cancel::CancellationToken;
pub use clock::{FrameRateHints, Rational};
pub use pacer::{Pacer, PlaybackEnd};
