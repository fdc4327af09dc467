use crate::types::{AbilityId, SpeciesId, TypeProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// On-disk dataset. When `types` is empty the built-in chart is used and
/// `efficacy` is ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DexFile {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub efficacy: Vec<Vec<i8>>,
    #[serde(default)]
    pub abilities: Vec<String>,
    pub species: Vec<SpeciesEntry>,
    #[serde(flatten, default)]
    pub extras: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SpeciesEntry {
    pub name: String,
    pub generation: u8,
    #[serde(default)]
    pub evolves_from: Option<String>,
    pub types: Vec<String>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub stats: Vec<u32>,
    #[serde(flatten, default)]
    pub extras: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeciesDetails {
    pub generation: u8,
    pub evolves_from: Option<SpeciesId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatureDetails {
    pub types: TypeProfile,
    pub abilities: Vec<AbilityId>,
    pub stats: Vec<u32>,
}
