pub mod controller;
pub mod enumerator;

pub use controller::{ControlError, LifecycleController};
pub use enumerator::enumerate;
