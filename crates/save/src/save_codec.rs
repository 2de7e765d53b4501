// ---------------------------------------------------------------------------
// Encoding helpers
// ---------------------------------------------------------------------------
//
// Enums cross the save boundary as raw u8 so the binary layout stays stable
// even if the simulation crate reorders variants. Decoding is fallible; an
// unknown tag means the file is corrupt or from an incompatible build.

use simulation::city::GamePhase;
use simulation::grid::{BuildingType, DisableReason};
use simulation::resources::Resource;

use crate::save_error::SaveError;

pub fn building_type_to_u8(b: BuildingType) -> u8 {
    match b {
        BuildingType::Residential => 0,
        BuildingType::Factory => 1,
        BuildingType::Shop => 2,
        BuildingType::Power => 3,
        BuildingType::Warehouse => 4,
    }
}

pub fn u8_to_building_type(v: u8) -> Result<BuildingType, SaveError> {
    match v {
        0 => Ok(BuildingType::Residential),
        1 => Ok(BuildingType::Factory),
        2 => Ok(BuildingType::Shop),
        3 => Ok(BuildingType::Power),
        4 => Ok(BuildingType::Warehouse),
        _ => Err(SaveError::Decode(format!("unknown building type tag {v}"))),
    }
}

pub fn resource_to_u8(r: Resource) -> u8 {
    match r {
        Resource::Money => 0,
        Resource::Population => 1,
        Resource::Workforce => 2,
        Resource::Power => 3,
        Resource::Happiness => 4,
        Resource::RawGoods => 5,
        Resource::Products => 6,
    }
}

pub fn u8_to_resource(v: u8) -> Result<Resource, SaveError> {
    match v {
        0 => Ok(Resource::Money),
        1 => Ok(Resource::Population),
        2 => Ok(Resource::Workforce),
        3 => Ok(Resource::Power),
        4 => Ok(Resource::Happiness),
        5 => Ok(Resource::RawGoods),
        6 => Ok(Resource::Products),
        _ => Err(SaveError::Decode(format!("unknown resource tag {v}"))),
    }
}

/// 0 encodes "not disabled"; reasons start at 1.
pub fn disable_reason_to_u8(r: Option<DisableReason>) -> u8 {
    match r {
        None => 0,
        Some(DisableReason::Workforce) => 1,
        Some(DisableReason::Power) => 2,
        Some(DisableReason::RawGoods) => 3,
        Some(DisableReason::StatusEffect) => 4,
    }
}

pub fn u8_to_disable_reason(v: u8) -> Result<Option<DisableReason>, SaveError> {
    match v {
        0 => Ok(None),
        1 => Ok(Some(DisableReason::Workforce)),
        2 => Ok(Some(DisableReason::Power)),
        3 => Ok(Some(DisableReason::RawGoods)),
        4 => Ok(Some(DisableReason::StatusEffect)),
        _ => Err(SaveError::Decode(format!("unknown disable reason tag {v}"))),
    }
}

pub fn phase_to_u8(p: GamePhase) -> u8 {
    match p {
        GamePhase::Playing => 0,
        GamePhase::GameOver => 1,
    }
}

pub fn u8_to_phase(v: u8) -> Result<GamePhase, SaveError> {
    match v {
        0 => Ok(GamePhase::Playing),
        1 => Ok(GamePhase::GameOver),
        _ => Err(SaveError::Decode(format!("unknown game phase tag {v}"))),
    }
}
