pub mod clock;
pub mod validation;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
