//! Immutable snapshot of a dataset with every creature already rated.

use crate::dex::{normalize_key, DataProvider, NameKind};
use crate::error::{Error, Result};
use crate::rating::{rate_creature, CreatureRating, ImmunityTable};
use crate::types::SpeciesId;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_MAX_GENERATION: u8 = 5;

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: SpeciesId,
    pub name: String,
    pub generation: u8,
    pub evolves_from: Option<SpeciesId>,
    pub rating: CreatureRating,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedSpecies {
    pub rating: i32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    type_names: Vec<String>,
    entries: Vec<CatalogEntry>,
    by_name: HashMap<String, SpeciesId>,
}

impl Catalog {
    pub fn build<P: DataProvider + ?Sized>(provider: &P) -> Result<Self> {
        let immunities = ImmunityTable::resolve(provider)?;
        let type_names = (0..provider.type_count())
            .map(|id| provider.name_of(NameKind::Type, id as u16).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;

        let count = provider.species_count();
        let mut entries = Vec::with_capacity(count);
        let mut by_name = HashMap::with_capacity(count);
        for idx in 0..count {
            let id = idx as SpeciesId;
            let name = provider.name_of(NameKind::Species, id)?.to_string();
            let species = provider.species_details(id)?;
            let details = provider.creature_details(id)?;
            let rating = rate_creature(provider, &immunities, &details)?;
            by_name.insert(normalize_key(&name), id);
            entries.push(CatalogEntry {
                id,
                name,
                generation: species.generation,
                evolves_from: species.evolves_from,
                rating,
            });
        }
        tracing::info!(
            species = entries.len(),
            types = type_names.len(),
            immunity_rules = immunities.rules().len(),
            "catalog built"
        );
        Ok(Self {
            type_names,
            entries,
            by_name,
        })
    }

    pub fn type_count(&self) -> usize {
        self.type_names.len()
    }

    pub fn type_names(&self) -> &[String] {
        &self.type_names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry(&self, id: SpeciesId) -> Result<&CatalogEntry> {
        self.entries
            .get(id as usize)
            .ok_or(Error::UnknownSpecies(id))
    }

    pub fn rating(&self, id: SpeciesId) -> Result<&CreatureRating> {
        self.entry(id).map(|e| &e.rating)
    }

    pub fn name(&self, id: SpeciesId) -> Result<&str> {
        self.entry(id).map(|e| e.name.as_str())
    }

    pub fn id_of(&self, name: &str) -> Result<SpeciesId> {
        self.by_name
            .get(&normalize_key(name))
            .copied()
            .ok_or_else(|| Error::UnknownCreature(name.to_string()))
    }

    pub fn resolve_team<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<SpeciesId>> {
        names.iter().map(|n| self.id_of(n.as_ref())).collect()
    }

    pub fn rate(&self, name: &str) -> Result<&CreatureRating> {
        self.id_of(name).and_then(|id| self.rating(id))
    }

    /// Name and rating of each member, in the order given.
    pub fn team<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<(String, CreatureRating)>> {
        names
            .iter()
            .map(|n| {
                let entry = self.entry(self.id_of(n.as_ref())?)?;
                Ok((entry.name.clone(), entry.rating.clone()))
            })
            .collect()
    }

    /// Species that some other in-bound species evolves from, where both ends
    /// satisfy `in_bound`.
    pub fn pre_evolutions<F>(&self, in_bound: F) -> HashSet<SpeciesId>
    where
        F: Fn(u8) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| in_bound(e.generation))
            .filter_map(|e| e.evolves_from)
            .filter(|from| {
                self.entries
                    .get(*from as usize)
                    .is_some_and(|f| in_bound(f.generation))
            })
            .collect()
    }

    /// Ids up to `max_generation` that do not evolve further within it.
    pub fn final_stage(&self, max_generation: u8) -> Vec<SpeciesId> {
        let in_bound = |generation: u8| generation <= max_generation;
        let evolves = self.pre_evolutions(in_bound);
        self.entries
            .iter()
            .filter(|e| in_bound(e.generation) && !evolves.contains(&e.id))
            .map(|e| e.id)
            .collect()
    }

    /// Ratings for the given generations (Gen I-V when empty), best first.
    pub fn rank(&self, generations: &[u8], final_only: bool) -> Vec<RankedSpecies> {
        let in_bound = |generation: u8| {
            if generations.is_empty() {
                (1..=DEFAULT_MAX_GENERATION).contains(&generation)
            } else {
                generations.contains(&generation)
            }
        };
        let evolves = if final_only {
            self.pre_evolutions(in_bound)
        } else {
            HashSet::new()
        };
        let mut ranked: Vec<RankedSpecies> = self
            .entries
            .iter()
            .filter(|e| in_bound(e.generation) && !evolves.contains(&e.id))
            .map(|e| RankedSpecies {
                rating: e.rating.rating,
                name: e.name.clone(),
            })
            .collect();
        ranked.sort_by(|left, right| {
            right
                .rating
                .cmp(&left.rating)
                .then_with(|| right.name.cmp(&left.name))
        });
        ranked
    }
}
