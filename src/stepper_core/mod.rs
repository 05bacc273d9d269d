pub mod format;
pub mod state;

pub use format::NumberFormat;
#[allow(unused_imports)]
pub use state::{EditPhase, StepperSnapshot};
pub use state::{StepperState, ValueObserver};
