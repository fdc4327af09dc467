//! Data provider boundary and the JSON-backed dataset implementing it.
//!
//! Scoring code only talks to [`DataProvider`]; [`Dex`] is the in-process
//! implementation built from a [`DexFile`].

use crate::error::{Error, Result};
use crate::model::{CreatureDetails, DexFile, SpeciesDetails};
use crate::types::{AbilityId, Efficacy, SpeciesId, TypeChart, TypeId, TypeProfile};
use std::collections::HashMap;
use std::fmt;

/// Which id space a name lookup refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NameKind {
    Type,
    Ability,
    Species,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NameKind::Type => "type",
            NameKind::Ability => "ability",
            NameKind::Species => "species",
        };
        f.write_str(label)
    }
}

/// Read-only lookups the scoring engine consumes. Implementations must be
/// deterministic for the lifetime of a process.
pub trait DataProvider {
    fn type_count(&self) -> usize;

    fn efficacy(&self, attack: TypeId, defend: TypeId) -> Result<Efficacy>;

    fn ability_count(&self) -> usize;

    fn species_count(&self) -> usize;

    fn species_details(&self, id: SpeciesId) -> Result<SpeciesDetails>;

    fn creature_details(&self, id: SpeciesId) -> Result<CreatureDetails>;

    fn name_of(&self, kind: NameKind, id: u16) -> Result<&str>;
}

/// Lower-cases and strips everything but ASCII alphanumerics.
pub fn normalize_key(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Normalized name to position, rejecting names that collide after
/// normalization.
fn index_names<S: AsRef<str>>(kind: NameKind, names: &[S]) -> Result<HashMap<String, u16>> {
    let mut ids = HashMap::with_capacity(names.len());
    for (idx, name) in names.iter().enumerate() {
        let name = name.as_ref();
        if ids.insert(normalize_key(name), idx as u16).is_some() {
            return Err(Error::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(ids)
}

#[derive(Debug, Clone)]
struct SpeciesRecord {
    name: String,
    details: SpeciesDetails,
    creature: CreatureDetails,
}

#[derive(Debug, Clone)]
pub struct Dex {
    chart: TypeChart,
    abilities: Vec<String>,
    species: Vec<SpeciesRecord>,
}

impl Dex {
    /// Resolves every name in `file` to an id. Abilities missing from the
    /// top-level list are appended in first-seen order; unknown types,
    /// unknown `evolves_from` species and duplicate names are errors.
    pub fn from_file(file: DexFile) -> Result<Self> {
        let chart = if file.types.is_empty() {
            TypeChart::standard()
        } else {
            let rows = file
                .efficacy
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|&exp| {
                            Efficacy::from_exponent(exp).ok_or_else(|| {
                                Error::MalformedChart(format!("exponent {exp} is outside -2..=1"))
                            })
                        })
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<Vec<_>>>()?;
            TypeChart::new(file.types.clone(), rows)?
        };

        let mut abilities = file.abilities.clone();
        let mut ability_ids = index_names(NameKind::Ability, &abilities)?;

        if file.species.len() > SpeciesId::MAX as usize {
            return Err(Error::UnknownId {
                kind: NameKind::Species,
                id: SpeciesId::MAX,
            });
        }
        let species_names: Vec<&str> = file.species.iter().map(|e| e.name.as_str()).collect();
        let species_ids = index_names(NameKind::Species, &species_names)?;

        let mut species = Vec::with_capacity(file.species.len());
        for entry in file.species {
            let types = entry
                .types
                .iter()
                .map(|name| {
                    chart.id_of(name).ok_or_else(|| Error::UnknownName {
                        kind: NameKind::Type,
                        name: name.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let types = TypeProfile::from_slice(&types).map_err(|err| {
                Error::InvalidTypeProfile(format!("{}: {err}", entry.name))
            })?;

            let mut own_abilities = Vec::with_capacity(entry.abilities.len());
            for name in &entry.abilities {
                let key = normalize_key(name);
                let id = match ability_ids.get(&key) {
                    Some(id) => *id,
                    None => {
                        let id = abilities.len() as AbilityId;
                        abilities.push(name.clone());
                        ability_ids.insert(key, id);
                        id
                    }
                };
                own_abilities.push(id);
            }

            let evolves_from = match entry.evolves_from.as_deref() {
                Some(from) => Some(*species_ids.get(&normalize_key(from)).ok_or_else(|| {
                    Error::UnknownName {
                        kind: NameKind::Species,
                        name: from.to_string(),
                    }
                })?),
                None => None,
            };

            species.push(SpeciesRecord {
                name: entry.name,
                details: SpeciesDetails {
                    generation: entry.generation,
                    evolves_from,
                },
                creature: CreatureDetails {
                    types,
                    abilities: own_abilities,
                    stats: entry.stats,
                },
            });
        }

        Ok(Self {
            chart,
            abilities,
            species,
        })
    }

    pub fn chart(&self) -> &TypeChart {
        &self.chart
    }

    fn record(&self, id: SpeciesId) -> Result<&SpeciesRecord> {
        self.species
            .get(id as usize)
            .ok_or(Error::UnknownSpecies(id))
    }
}

impl DataProvider for Dex {
    fn type_count(&self) -> usize {
        self.chart.len()
    }

    fn efficacy(&self, attack: TypeId, defend: TypeId) -> Result<Efficacy> {
        self.chart.efficacy(attack, defend)
    }

    fn ability_count(&self) -> usize {
        self.abilities.len()
    }

    fn species_count(&self) -> usize {
        self.species.len()
    }

    fn species_details(&self, id: SpeciesId) -> Result<SpeciesDetails> {
        self.record(id).map(|r| r.details)
    }

    fn creature_details(&self, id: SpeciesId) -> Result<CreatureDetails> {
        self.record(id).map(|r| r.creature.clone())
    }

    fn name_of(&self, kind: NameKind, id: u16) -> Result<&str> {
        let name = match kind {
            NameKind::Type => u8::try_from(id).ok().and_then(|t| self.chart.name(t)),
            NameKind::Ability => self.abilities.get(id as usize).map(String::as_str),
            NameKind::Species => self.species.get(id as usize).map(|r| r.name.as_str()),
        };
        name.ok_or(Error::UnknownId { kind, id })
    }
}
