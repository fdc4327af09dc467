use crate::dex::NameKind;
use crate::types::{SpeciesId, TypeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid attacking type id: {0}")]
    InvalidAttackType(TypeId),

    #[error("Invalid defending type id: {0}")]
    InvalidDefendType(TypeId),

    #[error("Unknown creature: {0}")]
    UnknownCreature(String),

    #[error("Unknown species id: {0}")]
    UnknownSpecies(SpeciesId),

    #[error("A team needs at least one member")]
    EmptyTeam,

    #[error("Invalid type profile: {0}")]
    InvalidTypeProfile(String),

    #[error("Unknown {kind} name: {name}")]
    UnknownName { kind: NameKind, name: String },

    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: NameKind, name: String },

    #[error("{kind} id {id} is out of range")]
    UnknownId { kind: NameKind, id: u16 },

    #[error("Malformed type chart: {0}")]
    MalformedChart(String),

    #[error("C({pool}, {size}) combinations do not fit the search index space")]
    SearchTooLarge { pool: usize, size: usize },

    #[error("Search cancelled")]
    Cancelled,

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
