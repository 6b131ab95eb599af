mod body;
mod set;

pub use body::{RigidBody, SleepParams};
pub use set::BodySet;
