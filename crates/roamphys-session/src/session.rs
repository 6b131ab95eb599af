use glam::Quat;
use roamphys_controllers::{ChaseCamera, OrbitCamera, VehicleController};
use roamphys_core::types::{CameraPose, Isometry, Scalar, Vec3};
use roamphys_core::{BodyId, ControlSignal};
use roamphys_geom::Shape;
use roamphys_locomotion::CharacterRig;
use roamphys_vehicles::VehicleRig;
use roamphys_world::{PhysicsWorld, WorldBuilder, WorldError};
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, SessionConfig};
use crate::events::{EventQueue, RespawnReason, SessionEvent};
use crate::interact::{Interactable, InteractionKind, Interactions};
use crate::mode::{FrameReport, ModeCoordinator, ModeState};
use crate::stage::Stage;
use crate::sync::{SyncRecord, KIND_AVATAR, KIND_BODY, KIND_CHASSIS, KIND_WHEEL};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    World(#[from] WorldError),
}

/// One play session: world, car, avatar and the mode machine over them.
pub struct Session {
    config: SessionConfig,
    stage: Stage,
    modes: ModeCoordinator,
}

impl Session {
    /// Build the world and the vehicle (at its safe pose); starts in MENU.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let mut world = WorldBuilder::new()
            .with_params(config.world)
            .with_materials(config.materials.clone())
            .build();
        world.set_debug(config.debug);

        let controller = VehicleController::new(config.drive);
        let chassis = world.register(config.vehicle.chassis.build_body(config.drive.respawn_pose()));
        let rig = VehicleRig::from_setup(chassis, &config.vehicle).map_err(WorldError::from)?;
        let vehicle = world.attach_vehicle(rig)?;

        let mut interactions = Interactions::default();
        let trunk = interactions.add(Interactable {
            position: config.drive.respawn_pose().transform_point(config.modes.trunk_offset),
            radius: config.modes.trunk_radius,
            label: "Open Trunk".to_owned(),
            kind: InteractionKind::Trunk,
        });

        let orbit = OrbitCamera::new(config.orbit);
        let stage = Stage {
            world,
            vehicle,
            chassis,
            controller,
            character: CharacterRig::new(config.avatar),
            chase: ChaseCamera::new(config.chase, CameraPose::default()),
            orbit,
            interactions,
            trunk,
            trunk_open: false,
            events: EventQueue::default(),
            elapsed: 0.0,
            camera: orbit.at(0.0),
        };
        info!(%vehicle, %chassis, "session created");
        Ok(Self { modes: ModeCoordinator::new(config.modes), config, stage })
    }

    #[inline] pub fn config(&self) -> &SessionConfig { &self.config }

    /// MENU -> DRIVING. Returns false if not in MENU.
    pub fn start(&mut self) -> bool { self.modes.start(&mut self.stage) }

    /// Back to MENU from any mode, ENDED included.
    pub fn reset(&mut self) { self.modes.reset(&mut self.stage) }

    /// One frame: mode toggle, control dispatch, a single physics advance,
    /// then mode checks and the camera.
    pub fn frame(&mut self, dt: Scalar, signal: &ControlSignal) -> FrameReport {
        self.modes.frame(&mut self.stage, dt, signal)
    }

    #[inline] pub fn current_mode(&self) -> ModeState { self.modes.state() }
    #[inline] pub fn vehicle_speed(&self) -> Scalar { self.stage.vehicle_speed() }
    #[inline] pub fn vehicle_pose(&self) -> Isometry { self.stage.chassis_pose() }
    #[inline] pub fn vehicle(&self) -> Option<&VehicleRig> { self.stage.world.vehicle(self.stage.vehicle) }
    #[inline] pub fn chassis(&self) -> BodyId { self.stage.chassis }
    #[inline] pub fn avatar_position(&self) -> Vec3 { self.stage.character.position(&self.stage.world) }
    #[inline] pub fn avatar_active(&self) -> bool { self.stage.character.is_active() }
    #[inline] pub fn camera(&self) -> CameraPose { self.stage.camera }
    #[inline] pub fn elapsed(&self) -> Scalar { self.stage.elapsed }
    #[inline] pub fn final_time(&self) -> Option<Scalar> { self.modes.final_time() }
    #[inline] pub fn trunk_open(&self) -> bool { self.stage.trunk_open }
    #[inline] pub fn world(&self) -> &PhysicsWorld { &self.stage.world }
    #[inline] pub fn world_mut(&mut self) -> &mut PhysicsWorld { &mut self.stage.world }

    /// Safe pose, zero motion.
    pub fn respawn_vehicle(&mut self) { self.stage.respawn_vehicle(RespawnReason::Requested) }

    /// Teleport the avatar (velocity zeroed), whether or not it is in the world.
    pub fn place_avatar(&mut self, pos: Vec3) {
        self.stage.character.reset_position(&mut self.stage.world, pos);
    }

    /// World geometry hook: group 1, collides with everything, ground material.
    pub fn register_static_collider(&mut self, shape: Shape, position: Vec3, rotation: Quat) -> BodyId {
        self.stage.world.register_static(shape, Isometry { pos: position, rot: rotation })
    }

    pub fn add_interactable(&mut self, position: Vec3, radius: Scalar, label: impl Into<String>) -> usize {
        self.stage.interactions.add(Interactable { position, radius, label: label.into(), kind: InteractionKind::Notify })
    }

    pub fn focused_interactable(&self) -> Option<&Interactable> {
        self.stage.interactions.focused().and_then(|i| self.stage.interactions.get(i))
    }

    /// Events raised since the previous drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> { self.stage.events.drain() }

    /// Transforms of every dynamic entity: chassis, wheels, avatar (when
    /// active), then other dynamic bodies by slot.
    pub fn visual_frame(&self) -> Vec<SyncRecord> {
        let world = &self.stage.world;
        let chassis = self.stage.chassis_pose();
        let mut out = Vec::with_capacity(8);
        out.push(SyncRecord::new(KIND_CHASSIS, 0, &chassis));
        if let Some(rig) = self.vehicle() {
            for i in 0..rig.wheels().len() {
                if let Some(xf) = rig.wheel_transform(i, &chassis) {
                    out.push(SyncRecord::new(KIND_WHEEL, i as u32, &xf));
                }
            }
        }
        let avatar = self.stage.character.body_id();
        if avatar.is_some() {
            out.push(SyncRecord::new(KIND_AVATAR, 0, &self.stage.character.pose(world)));
        }
        for (id, body) in world.bodies() {
            if body.is_static() || id == self.stage.chassis || Some(id) == avatar { continue; }
            out.push(SyncRecord::new(KIND_BODY, id.slot, &body.pose));
        }
        out
    }
}
