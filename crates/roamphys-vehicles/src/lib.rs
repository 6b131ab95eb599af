#![deny(missing_docs)]
//! Raycast-wheel vehicle rig.
//!
//! A `VehicleRig` is a chassis body handle plus exactly four wheels in
//! front-left, front-right, rear-left, rear-right order. Each wheel is a ray
//! cast from its chassis-local connection point along the suspension axis;
//! hits drive a spring-damper plus an arcade traction model.
//!
//! The rig is world-agnostic: the host implements [`WheelHost`] to answer ray
//! queries and receive wheel forces.

mod error;
mod host;
mod rig;
mod setup;

pub use error::RigError;
pub use host::{ChassisState, SurfaceHit, WheelHost};
pub use rig::{VehicleRig, VehicleView, WheelContact, WheelRole, WheelState, WHEEL_COUNT};
pub use setup::{ChassisParams, VehicleSetup, WheelParams};
