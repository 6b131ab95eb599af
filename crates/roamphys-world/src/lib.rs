//! Rigid-body world: registration, fixed sub-step `advance`, contacts, ray
//! queries and raycast-wheel vehicles.

mod error;
mod params;
mod query;
mod solver;
mod wheel_host;

pub use error::WorldError;
pub use params::{DebugSettings, WorldParams};
pub use query::RayQueryHit;

use roamphys_collision::{collide, pairs_sap, ContactPoint};
use roamphys_core::{
    groups, hash_quat, hash_vec3, BodyId, FixedStep, Isometry, Scalar, StepHasher, StepStats, Vec3, VehicleId,
};
use roamphys_dynamics::{BodySet, RigidBody};
use roamphys_geom::{aabb_of, Aabb, Shape};
use roamphys_materials::{ContactMaterialTable, MaterialId};
use roamphys_vehicles::{ChassisState, VehicleRig, VehicleSetup, VehicleView};
use tracing::{debug, trace, warn};

use solver::{solve_contacts, Contact};
use wheel_host::WorldWheelHost;

/* ---------------- Builder ---------------- */
pub struct WorldBuilder {
    params: WorldParams,
    materials: ContactMaterialTable,
    bodies: usize,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self { params: WorldParams::default(), materials: ContactMaterialTable::default(), bodies: 128 }
    }
    pub fn with_params(mut self, p: WorldParams) -> Self { self.params = p; self }
    pub fn with_materials(mut self, t: ContactMaterialTable) -> Self { self.materials = t; self }
    pub fn with_capacity(mut self, bodies: usize) -> Self { self.bodies = bodies; self }
    pub fn build(self) -> PhysicsWorld {
        PhysicsWorld {
            clock: FixedStep::new(self.params.substep, self.params.max_dt, self.params.max_substeps),
            params: self.params,
            materials: self.materials,
            bodies: BodySet::with_capacity(self.bodies),
            vehicles: Vec::new(),
            tick: 0,
            debug: DebugSettings::default(),
            overlaps: Vec::new(),
            last_stats: StepStats::default(),
        }
    }
}

impl Default for WorldBuilder {
    fn default() -> Self { Self::new() }
}

/* ---------------- World ---------------- */
pub struct PhysicsWorld {
    params: WorldParams,
    materials: ContactMaterialTable,
    clock: FixedStep,
    bodies: BodySet,
    vehicles: Vec<Option<VehicleRig>>,
    /// Sub-steps taken since creation.
    tick: u64,
    debug: DebugSettings,
    overlaps: Vec<(BodyId, BodyId)>,
    last_stats: StepStats,
}

impl PhysicsWorld {
    pub fn new(params: WorldParams) -> Self { WorldBuilder::new().with_params(params).build() }

    #[inline] pub fn params(&self) -> &WorldParams { &self.params }
    #[inline] pub fn gravity(&self) -> Vec3 { self.params.gravity }
    #[inline] pub fn materials(&self) -> &ContactMaterialTable { &self.materials }
    #[inline] pub fn tick(&self) -> u64 { self.tick }
    #[inline] pub fn num_bodies(&self) -> usize { self.bodies.len() }
    #[inline] pub fn last_stats(&self) -> StepStats { self.last_stats }
    /// Leftover sub-step fraction, for render interpolation.
    #[inline] pub fn alpha(&self) -> Scalar { self.clock.alpha() }
    pub fn set_debug(&mut self, cfg: DebugSettings) { self.debug = cfg; }

    /* ---------- bodies ---------- */
    pub fn register(&mut self, body: RigidBody) -> BodyId {
        let id = self.bodies.insert(body);
        trace!(%id, "body registered");
        id
    }

    /// Remove a body, returning it with its state frozen as of the last sub-step.
    /// A body removed before `advance` does not integrate in that call.
    pub fn unregister(&mut self, id: BodyId) -> Option<RigidBody> {
        let body = self.bodies.remove(id)?;
        self.overlaps.retain(|&(a, b)| a != id && b != id);
        trace!(%id, "body unregistered");
        Some(body)
    }

    /// Static collider in the world group, colliding with everything.
    pub fn register_static(&mut self, shape: Shape, pose: Isometry) -> BodyId {
        self.register_static_with(shape, pose, MaterialId::Ground)
    }

    pub fn register_static_with(&mut self, shape: Shape, pose: Isometry, material: MaterialId) -> BodyId {
        self.register(
            RigidBody::fixed(shape)
                .with_pose(pose)
                .with_material(material)
                .with_filter(groups::STATIC, groups::ALL),
        )
    }

    /// Static overlap-only volume in the trigger group.
    pub fn register_trigger(&mut self, shape: Shape, pose: Isometry) -> BodyId {
        self.register(RigidBody::fixed(shape).with_pose(pose).with_filter(groups::TRIGGER, groups::ALL).as_trigger())
    }

    #[inline] pub fn contains(&self, id: BodyId) -> bool { self.bodies.contains(id) }
    #[inline] pub fn body(&self, id: BodyId) -> Option<&RigidBody> { self.bodies.get(id) }
    #[inline] pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> { self.bodies.get_mut(id) }
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> + '_ { self.bodies.iter() }

    /* ---------- vehicles ---------- */
    /// Register a chassis from `setup` at `pose` and attach its wheels.
    pub fn add_vehicle(&mut self, setup: &VehicleSetup, pose: Isometry) -> Result<VehicleId, WorldError> {
        let chassis = self.register(setup.chassis.build_body(pose));
        match VehicleRig::from_setup(chassis, setup) {
            Ok(rig) => self.attach_vehicle(rig),
            Err(e) => {
                self.unregister(chassis);
                Err(e.into())
            }
        }
    }

    /// Attach a rig whose chassis is already registered.
    pub fn attach_vehicle(&mut self, rig: VehicleRig) -> Result<VehicleId, WorldError> {
        rig.validate()?;
        let chassis = rig.chassis();
        let body = self.bodies.get(chassis).ok_or(WorldError::UnknownBody(chassis))?;
        if body.is_static() { return Err(WorldError::StaticChassis(chassis)); }
        self.vehicles.push(Some(rig));
        let id = VehicleId((self.vehicles.len() - 1) as u32);
        debug!(%id, %chassis, "vehicle attached");
        Ok(id)
    }

    /// Detach a rig; its chassis stays registered.
    pub fn detach_vehicle(&mut self, id: VehicleId) -> Option<VehicleRig> {
        self.vehicles.get_mut(id.0 as usize)?.take()
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&VehicleRig> {
        self.vehicles.get(id.0 as usize)?.as_ref()
    }

    /// Rig plus chassis body, both mutable.
    pub fn vehicle_view(&mut self, id: VehicleId) -> Option<VehicleView<'_>> {
        let rig = self.vehicles.get_mut(id.0 as usize)?.as_mut()?;
        let chassis = self.bodies.get_mut(rig.chassis())?;
        Some(VehicleView { rig, chassis })
    }

    /* ---------- queries ---------- */
    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_len: Scalar, mask: u32, exclude: Option<BodyId>) -> Option<RayQueryHit> {
        query::cast(&self.bodies, origin, dir, max_len, mask, exclude)
    }

    /// Trigger overlaps seen during the latest `advance`, each pair once.
    #[inline] pub fn overlaps(&self) -> &[(BodyId, BodyId)] { &self.overlaps }

    /* ---------- stepping ---------- */
    /// Clamp `dt`, run whole fixed sub-steps, then clear frame forces.
    pub fn advance(&mut self, dt: Scalar) -> StepStats {
        let plan = self.clock.plan(dt);
        if plan.non_finite { warn!(dt, "non-finite frame time treated as zero"); }
        if plan.dropped > 0.0 {
            warn!(dropped = plan.dropped, cap = self.params.max_substeps, "sub-step cap hit, discarding time");
        }

        self.overlaps.clear();
        let h = self.params.substep;
        let mut stats = StepStats::default();
        for _ in 0..plan.substeps {
            stats.accumulate(self.substep(h));
        }
        for (_, b) in self.bodies.iter_mut() { b.clear_forces(); }

        trace!(dt = plan.dt, substeps = stats.substeps, pairs = stats.pairs_tested, contacts = stats.contacts, "advance");
        self.last_stats = stats;
        stats
    }

    fn substep(&mut self, h: Scalar) -> StepStats {
        self.tick = self.tick.wrapping_add(1);
        let mut stats = StepStats { substeps: 1, ..StepStats::default() };

        // Wheels
        for rig in self.vehicles.iter_mut().flatten() {
            let chassis = rig.chassis();
            let Some(body) = self.bodies.get(chassis) else { continue; };
            if !body.is_active() { continue; }
            let mut host = WorldWheelHost {
                bodies: &self.bodies,
                materials: &self.materials,
                chassis,
                state: ChassisState::of(body),
                mask: rig.ray_mask,
                forces: Vec::with_capacity(8),
            };
            rig.step_wheels(&mut host, h);
            let forces = host.forces;
            if let Some(body) = self.bodies.get_mut(chassis) {
                for (f, p) in forces { body.apply_step_force_at(f, p); }
            }
            stats.wheel_contacts += rig.wheels().iter().filter(|w| w.in_contact()).count() as u32;
        }

        // Integrate velocities
        let g = self.params.gravity;
        for (_, b) in self.bodies.iter_mut() { b.integrate_velocity(g, h); }

        // Broadphase
        let mut slots: Vec<usize> = Vec::with_capacity(self.bodies.len());
        let mut aabbs: Vec<Aabb> = Vec::with_capacity(self.bodies.len());
        for slot in 0..self.bodies.slot_count() {
            let Some(b) = self.bodies.at(slot) else { continue; };
            let mut bb = aabb_of(&b.shape, &b.collider_pose());
            let margin = (b.vel.lin.length() * h).min(self.params.ccd_margin_cap);
            if margin > 0.0 { bb.expand_by(margin); }
            slots.push(slot);
            aabbs.push(bb);
        }
        let pairs = pairs_sap(&aabbs);
        stats.pairs_tested = pairs.len() as u32;

        // Narrowphase
        let mut points: Vec<ContactPoint> = Vec::new();
        let mut contacts: Vec<Contact> = Vec::new();
        let mut wake: Vec<usize> = Vec::new();
        for (i, k) in pairs {
            let (sa, sb) = (slots[i], slots[k]);
            let (Some(a), Some(b)) = (self.bodies.at(sa), self.bodies.at(sb)) else { continue; };
            if !a.is_active() && !b.is_active() { continue; }
            if !a.filter.interacts(&b.filter) { continue; }

            points.clear();
            if collide(&a.shape, &a.collider_pose(), &b.shape, &b.collider_pose(), &mut points) == 0 { continue; }

            if !a.collision_response || !b.collision_response {
                let (ida, idb) = (self.bodies.id_at(sa), self.bodies.id_at(sb));
                if let (Some(ida), Some(idb)) = (ida, idb) {
                    if !self.overlaps.contains(&(ida, idb)) { self.overlaps.push((ida, idb)); }
                }
                continue;
            }

            let limit2 = self.params.sleep.speed_limit * self.params.sleep.speed_limit;
            if !a.is_static() && !a.is_awake() && b.vel.lin.length_squared() > limit2 { wake.push(sa); }
            if !b.is_static() && !b.is_awake() && a.vel.lin.length_squared() > limit2 { wake.push(sb); }

            contacts.extend(points.iter().map(|p| Contact { a: sa, b: sb, point: p.point, normal: p.normal, depth: p.depth }));
        }
        for slot in wake {
            if let Some(b) = self.bodies.at_mut(slot) { b.wake_up(); }
        }
        stats.contacts = contacts.len() as u32;

        // Solve
        if !contacts.is_empty() {
            solve_contacts(&mut self.bodies, &contacts, &self.materials, &self.params);
        }

        // Integrate positions
        let sleep = self.params.sleep;
        for (id, b) in self.bodies.iter_mut() {
            b.integrate_position(h);
            b.clear_step_forces();
            if b.update_sleep(&sleep, h) { trace!(%id, "body asleep"); }
        }

        if self.debug.log_every != 0 && self.tick % self.debug.log_every as u64 == 0 {
            self.log_debug_block(&contacts);
        }
        stats
    }

    /// Blake3 over every body's slot, pose, velocity and sleep state.
    pub fn state_hash(&self) -> [u8; 32] {
        let mut h = StepHasher::new();
        h.update_bytes(&self.tick.to_le_bytes());
        h.update_f32(self.clock.accumulator());
        for (id, b) in self.bodies.iter() {
            h.update_bytes(&id.slot.to_le_bytes());
            hash_vec3(&mut h, &b.pose.pos);
            hash_quat(&mut h, &b.pose.rot);
            hash_vec3(&mut h, &b.vel.lin);
            hash_vec3(&mut h, &b.vel.ang);
            h.update_bytes(&[b.is_awake() as u8]);
        }
        h.finalize()
    }

    /* ---------- Debug dump ---------- */
    fn log_debug_block(&self, contacts: &[Contact]) {
        debug!(tick = self.tick, bodies = self.bodies.len(), "--- world debug ---");

        if self.debug.show_energy {
            let ke: f32 = self.bodies.iter()
                .filter(|(_, b)| !b.is_static())
                .map(|(_, b)| 0.5 * b.mass.mass * b.vel.lin.length_squared())
                .sum();
            debug!(ke, "energy");
        }

        if self.debug.show_bodies {
            for (id, b) in self.bodies.iter().take(self.debug.max_lines) {
                let (p, v) = (b.pose.pos, b.vel.lin);
                debug!("{id}  pos=({:+.3},{:+.3},{:+.3})  vel=({:+.3},{:+.3},{:+.3})  awake={}",
                       p.x, p.y, p.z, v.x, v.y, v.z, b.is_awake());
            }
        }

        if self.debug.show_contacts {
            if contacts.is_empty() {
                debug!("contacts: (none)");
            }
            for c in contacts.iter().take(self.debug.max_lines) {
                debug!("contact  a={} b={}  n=({:+.3},{:+.3},{:+.3})  depth={:.5}",
                       c.a, c.b, c.normal.x, c.normal.y, c.normal.z, c.depth);
            }
        }
    }
}

#[cfg(test)]
mod tests;
