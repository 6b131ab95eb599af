mod camera;
mod drive;

pub use camera::{ChaseCamera, ChaseParams, OrbitCamera, OrbitParams};
pub use drive::{DriveCommand, DriveParams, DriveReport, VehicleController};
