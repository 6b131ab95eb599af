use roamphys_core::types::{CameraPose, Isometry, Scalar, Vec3};
use roamphys_core::vec3;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseParams {
    /// Camera offset in the chassis frame (+Z is behind the car).
    pub offset: Vec3,
    /// Fraction of the remaining distance covered per update.
    pub follow: Scalar,
    pub look_height: Scalar,
}

impl Default for ChaseParams {
    fn default() -> Self { Self { offset: vec3(0.0, 5.0, 8.0), follow: 0.1, look_height: 1.0 } }
}

/// Smoothed follow camera for DRIVING.
#[derive(Copy, Clone, Debug, Default)]
pub struct ChaseCamera {
    pub params: ChaseParams,
    pose: CameraPose,
}

impl ChaseCamera {
    pub fn new(params: ChaseParams, start: CameraPose) -> Self { Self { params, pose: start } }

    #[inline] pub fn pose(&self) -> CameraPose { self.pose }

    /// Where the camera wants to be for this chassis pose.
    pub fn desired(&self, chassis: &Isometry) -> CameraPose {
        CameraPose {
            position: chassis.transform_point(self.params.offset),
            target: chassis.pos + vec3(0.0, self.params.look_height, 0.0),
        }
    }

    /// One per-frame step toward `desired` (frame-rate dependent, like the lerp it models).
    pub fn update(&mut self, chassis: &Isometry) -> CameraPose {
        let want = self.desired(chassis);
        self.pose.position = self.pose.position.lerp(want.position, self.params.follow.clamp(0.0, 1.0));
        self.pose.target = want.target;
        self.pose
    }

    /// Jump straight to the desired pose.
    pub fn snap(&mut self, chassis: &Isometry) -> CameraPose {
        self.pose = self.desired(chassis);
        self.pose
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitParams {
    pub radius: Scalar,
    pub height: Scalar,
    /// rad/s
    pub rate: Scalar,
    pub center: Vec3,
}

impl Default for OrbitParams {
    fn default() -> Self { Self { radius: 30.0, height: 20.0, rate: 0.5, center: Vec3::ZERO } }
}

/// Idle spin used while in the menu.
#[derive(Copy, Clone, Debug, Default)]
pub struct OrbitCamera {
    pub params: OrbitParams,
}

impl OrbitCamera {
    pub fn new(params: OrbitParams) -> Self { Self { params } }

    pub fn at(&self, elapsed: Scalar) -> CameraPose {
        let p = &self.params;
        let t = elapsed * p.rate;
        CameraPose {
            position: p.center + vec3(p.radius * t.sin(), p.height, p.radius * t.cos()),
            target: p.center,
        }
    }
}
