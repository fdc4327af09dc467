use crate::dex::{normalize_key, DataProvider, NameKind};
use crate::error::Result;
use crate::model::CreatureDetails;
use crate::types::{AbilityId, TypeId, TypeProfile};
use serde::Serialize;

pub const NEUTRAL_QUARTERS: u32 = 4;

pub const QUAD_WEAKNESS_RATING: i32 = -6;

/// Immunity-granting abilities, highest precedence first.
pub const IMMUNITY_ABILITIES: [(&str, &str); 4] = [
    ("Levitate", "Ground"),
    ("Flash Fire", "Fire"),
    ("Water Absorb", "Water"),
    ("Volt Absorb", "Electric"),
];

const OFFENSE_RATING_WEIGHT: i32 = 30;
const RESISTANCE_RATING_WEIGHT: i32 = 6;
const STAT_BASELINE: i32 = 400;

pub fn resistance_rating(quarters: u32) -> i32 {
    match quarters {
        0 => 4,
        1 => 3,
        2 => 2,
        4 => 0,
        8 => -4,
        16 => QUAD_WEAKNESS_RATING,
        other => unreachable!("multiplier {other}/4 cannot come from at most two types"),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImmunityTable {
    rules: Vec<(AbilityId, TypeId)>,
}

impl ImmunityTable {
    pub fn from_rules(rules: Vec<(AbilityId, TypeId)>) -> Self {
        Self { rules }
    }

    /// Looks up [`IMMUNITY_ABILITIES`] by name. Pairs the dataset lacks are
    /// dropped; the remaining ones keep their precedence.
    pub fn resolve<P: DataProvider + ?Sized>(provider: &P) -> Result<Self> {
        let ability_ids = (0..provider.ability_count())
            .map(|id| {
                provider
                    .name_of(NameKind::Ability, id as u16)
                    .map(|name| (normalize_key(name), id as AbilityId))
            })
            .collect::<Result<Vec<_>>>()?;
        let type_ids = (0..provider.type_count())
            .map(|id| {
                provider
                    .name_of(NameKind::Type, id as u16)
                    .map(|name| (normalize_key(name), id as TypeId))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut rules = Vec::with_capacity(IMMUNITY_ABILITIES.len());
        for (ability, immune) in IMMUNITY_ABILITIES {
            let ability_key = normalize_key(ability);
            let type_key = normalize_key(immune);
            let ability_id = ability_ids.iter().find(|(k, _)| *k == ability_key);
            let type_id = type_ids.iter().find(|(k, _)| *k == type_key);
            match (ability_id, type_id) {
                (Some((_, a)), Some((_, t))) => rules.push((*a, *t)),
                _ => tracing::debug!(ability, immune, "immunity rule not present in dataset"),
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[(AbilityId, TypeId)] {
        &self.rules
    }

    pub fn immunity(&self, abilities: &[AbilityId]) -> Option<TypeId> {
        self.rules
            .iter()
            .find(|(ability, _)| abilities.contains(ability))
            .map(|(_, immune)| *immune)
    }
}

pub fn rate_resistance<P: DataProvider + ?Sized>(
    provider: &P,
    types: &TypeProfile,
    immunity: Option<TypeId>,
) -> Result<Vec<i32>> {
    (0..provider.type_count())
        .map(|damage| {
            let damage = damage as TypeId;
            if immunity == Some(damage) {
                return Ok(resistance_rating(0));
            }
            let mut quarters = NEUTRAL_QUARTERS;
            for own in types.iter() {
                quarters *= provider.efficacy(damage, own)?.quarter_factor();
                quarters /= NEUTRAL_QUARTERS;
            }
            Ok(resistance_rating(quarters))
        })
        .collect()
}

pub fn rate_offense<P: DataProvider + ?Sized>(
    provider: &P,
    types: &TypeProfile,
) -> Result<Vec<bool>> {
    let mut covered = vec![false; provider.type_count()];
    for (target, hit) in covered.iter_mut().enumerate() {
        for own in types.iter() {
            if provider.efficacy(own, target as TypeId)?.is_super_effective() {
                *hit = true;
                break;
            }
        }
    }
    Ok(covered)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatureRating {
    pub offense: Vec<bool>,
    pub resistance: Vec<i32>,
    pub stats: Vec<u32>,
    pub rating: i32,
}

impl CreatureRating {
    pub fn offense_count(&self) -> usize {
        self.offense.iter().filter(|hit| **hit).count()
    }

    pub fn resistance_total(&self) -> i32 {
        self.resistance.iter().sum()
    }

    pub fn stat_total(&self) -> i32 {
        self.stats.iter().map(|s| *s as i32).sum()
    }
}

pub fn rate_creature<P: DataProvider + ?Sized>(
    provider: &P,
    immunities: &ImmunityTable,
    details: &CreatureDetails,
) -> Result<CreatureRating> {
    let immunity = immunities.immunity(&details.abilities);
    let offense = rate_offense(provider, &details.types)?;
    let resistance = rate_resistance(provider, &details.types, immunity)?;
    let mut rated = CreatureRating {
        offense,
        resistance,
        stats: details.stats.clone(),
        rating: 0,
    };
    rated.rating = OFFENSE_RATING_WEIGHT * rated.offense_count() as i32
        + RESISTANCE_RATING_WEIGHT * rated.resistance_total()
        + rated.stat_total()
        - STAT_BASELINE;
    Ok(rated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::Dex;
    use crate::model::{DexFile, SpeciesEntry};
    use crate::types::TypeChart;
    use std::collections::HashMap;

    fn ty(name: &str) -> TypeId {
        TypeChart::standard().id_of(name).unwrap()
    }

    fn dex_with_abilities(abilities: &[&str]) -> Dex {
        Dex::from_file(DexFile {
            abilities: abilities.iter().map(|a| a.to_string()).collect(),
            species: vec![SpeciesEntry {
                name: "Placeholder".to_string(),
                generation: 1,
                evolves_from: None,
                types: vec!["Normal".to_string()],
                abilities: Vec::new(),
                stats: Vec::new(),
                extras: HashMap::new(),
            }],
            ..DexFile::default()
        })
        .unwrap()
    }

    #[test]
    fn rating_scale_matches_quarter_units() {
        let expected = [(0, 4), (1, 3), (2, 2), (4, 0), (8, -4), (16, QUAD_WEAKNESS_RATING)];
        for (quarters, rating) in expected {
            assert_eq!(resistance_rating(quarters), rating);
        }
    }

    #[test]
    fn dual_resistance_and_dual_weakness_compound() {
        let dex = dex_with_abilities(&[]);
        // Grass/Poison takes x1/4 from Grass, Bug/Steel takes x4 from Fire.
        let grass_poison = TypeProfile::dual(ty("Grass"), ty("Poison")).unwrap();
        let res = rate_resistance(&dex, &grass_poison, None).unwrap();
        assert_eq!(res[ty("Grass") as usize], 3);
        assert_eq!(res[ty("Psychic") as usize], -4);

        let bug_steel = TypeProfile::dual(ty("Bug"), ty("Steel")).unwrap();
        let res = rate_resistance(&dex, &bug_steel, None).unwrap();
        assert_eq!(res[ty("Fire") as usize], QUAD_WEAKNESS_RATING);
        assert_eq!(res[ty("Poison") as usize], 4);
    }

    #[test]
    fn immunity_precedence_is_first_listed() {
        let dex = dex_with_abilities(&["Volt Absorb", "Flash Fire", "Levitate", "Water Absorb"]);
        let table = ImmunityTable::resolve(&dex).unwrap();
        assert_eq!(
            table.rules(),
            &[(2, ty("Ground")), (1, ty("Fire")), (3, ty("Water")), (0, ty("Electric"))]
        );
        assert_eq!(table.immunity(&[0, 1]), Some(ty("Fire")));
        assert_eq!(table.immunity(&[0, 3]), Some(ty("Water")));
        assert_eq!(table.immunity(&[0, 2]), Some(ty("Ground")));
        assert_eq!(table.immunity(&[]), None);
    }

    #[test]
    fn missing_abilities_drop_their_rule() {
        let dex = dex_with_abilities(&["Levitate"]);
        let table = ImmunityTable::resolve(&dex).unwrap();
        assert_eq!(table.rules(), &[(0, ty("Ground"))]);
    }
}
