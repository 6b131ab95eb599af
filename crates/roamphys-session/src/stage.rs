use roamphys_controllers::{ChaseCamera, OrbitCamera, VehicleController};
use roamphys_core::types::{CameraPose, Isometry, Scalar};
use roamphys_core::{BodyId, StepStats, VehicleId};
use roamphys_locomotion::CharacterRig;
use roamphys_world::PhysicsWorld;
use tracing::debug;

use crate::events::{EventQueue, RespawnReason, SessionEvent};
use crate::interact::Interactions;

/// Everything the mode states act on.
pub(crate) struct Stage {
    pub world: PhysicsWorld,
    pub vehicle: VehicleId,
    pub chassis: BodyId,
    pub controller: VehicleController,
    pub character: CharacterRig,
    pub chase: ChaseCamera,
    pub orbit: OrbitCamera,
    pub interactions: Interactions,
    pub trunk: usize,
    pub trunk_open: bool,
    pub events: EventQueue,
    /// Simulated seconds since `start`.
    pub elapsed: Scalar,
    pub camera: CameraPose,
}

impl Stage {
    pub fn chassis_pose(&self) -> Isometry {
        self.world.body(self.chassis).map_or(Isometry::default(), |b| b.pose)
    }

    pub fn vehicle_speed(&self) -> Scalar {
        self.world.body(self.chassis).map_or(0.0, |b| b.vel.lin.length())
    }

    pub fn respawn_vehicle(&mut self, reason: RespawnReason) {
        if let Some(view) = self.world.vehicle_view(self.vehicle) {
            self.controller.respawn(view.chassis, view.rig);
            debug!(?reason, "vehicle respawned");
            self.events.push(SessionEvent::VehicleRespawned { reason });
        }
    }

    pub fn release_vehicle_controls(&mut self) {
        if let Some(view) = self.world.vehicle_view(self.vehicle) {
            view.rig.release_controls();
        }
    }

    /// Physics advance plus the post-step speed cap, which holds in every mode.
    pub fn advance(&mut self, dt: Scalar) -> StepStats {
        let stats = self.world.advance(dt);
        if let Some(chassis) = self.world.body_mut(self.chassis) {
            self.controller.govern_speed(chassis);
        }
        for &(a, b) in self.world.overlaps() {
            self.events.push(SessionEvent::TriggerOverlap { a, b });
        }
        stats
    }
}
