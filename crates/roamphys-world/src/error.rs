use roamphys_core::BodyId;
use roamphys_vehicles::RigError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("{0} is not registered")]
    UnknownBody(BodyId),
    #[error("{0} is static and cannot carry a vehicle")]
    StaticChassis(BodyId),
    #[error(transparent)]
    Rig(#[from] RigError),
}
