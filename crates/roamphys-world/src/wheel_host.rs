use roamphys_core::types::{Scalar, Vec3};
use roamphys_core::BodyId;
use roamphys_dynamics::BodySet;
use roamphys_materials::{ContactMaterialTable, MaterialId};
use roamphys_vehicles::{ChassisState, SurfaceHit, WheelHost};

use crate::query;

/// Read-only view of the world for one rig's wheel step. Forces are buffered
/// and applied to the chassis once the rig is done.
pub(crate) struct WorldWheelHost<'a> {
    pub bodies: &'a BodySet,
    pub materials: &'a ContactMaterialTable,
    pub chassis: BodyId,
    pub state: ChassisState,
    pub mask: u32,
    pub forces: Vec<(Vec3, Vec3)>,
}

impl WheelHost for WorldWheelHost<'_> {
    fn chassis(&self) -> ChassisState { self.state }

    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_len: Scalar) -> Option<SurfaceHit> {
        let hit = query::cast(self.bodies, origin, dir, max_len, self.mask, Some(self.chassis))?;
        Some(SurfaceHit {
            point: hit.point,
            normal: hit.normal,
            distance: hit.distance,
            friction: self.materials.pair(MaterialId::Wheel, hit.material).friction,
            body: hit.body,
        })
    }

    fn apply_force_at(&mut self, force: Vec3, point: Vec3) {
        self.forces.push((force, point));
    }
}
