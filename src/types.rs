use crate::dex::normalize_key;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub type TypeId = u8;
pub type SpeciesId = u16;
pub type AbilityId = u16;

/// Type names of the Generation II-V chart, in id order.
pub const STANDARD_TYPES: [&str; 17] = [
    "Normal", "Fighting", "Flying", "Poison", "Ground", "Rock", "Bug", "Ghost", "Steel", "Fire",
    "Water", "Grass", "Electric", "Psychic", "Ice", "Dragon", "Dark",
];

/// Damage multiplier tier, stored as a power-of-two exponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Efficacy {
    NoEffect,
    NotVeryEffective,
    Regular,
    SuperEffective,
}

impl Efficacy {
    pub fn from_exponent(exponent: i8) -> Option<Self> {
        match exponent {
            -2 => Some(Efficacy::NoEffect),
            -1 => Some(Efficacy::NotVeryEffective),
            0 => Some(Efficacy::Regular),
            1 => Some(Efficacy::SuperEffective),
            _ => None,
        }
    }

    pub fn exponent(self) -> i8 {
        match self {
            Efficacy::NoEffect => -2,
            Efficacy::NotVeryEffective => -1,
            Efficacy::Regular => 0,
            Efficacy::SuperEffective => 1,
        }
    }

    /// Multiplier in quarter units: 4 is x1.
    pub fn quarter_factor(self) -> u32 {
        match self {
            Efficacy::NoEffect => 0,
            Efficacy::NotVeryEffective => 2,
            Efficacy::Regular => 4,
            Efficacy::SuperEffective => 8,
        }
    }

    pub fn is_super_effective(self) -> bool {
        self.exponent() > 0
    }
}

impl TryFrom<i8> for Efficacy {
    type Error = String;

    fn try_from(exponent: i8) -> std::result::Result<Self, Self::Error> {
        Efficacy::from_exponent(exponent)
            .ok_or_else(|| format!("efficacy exponent {exponent} is outside -2..=1"))
    }
}

impl From<Efficacy> for i8 {
    fn from(efficacy: Efficacy) -> i8 {
        efficacy.exponent()
    }
}

/// Square attack-by-defend efficacy table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeChart {
    names: Vec<String>,
    table: Vec<Efficacy>,
}

impl TypeChart {
    pub fn new(names: Vec<String>, rows: Vec<Vec<Efficacy>>) -> Result<Self> {
        let count = names.len();
        if count == 0 {
            return Err(Error::MalformedChart("no types defined".to_string()));
        }
        if count > TypeId::MAX as usize + 1 {
            return Err(Error::MalformedChart(format!(
                "{count} types do not fit a type id"
            )));
        }
        if rows.len() != count {
            return Err(Error::MalformedChart(format!(
                "expected {count} rows, found {}",
                rows.len()
            )));
        }
        let mut table = Vec::with_capacity(count * count);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != count {
                return Err(Error::MalformedChart(format!(
                    "row {} ({}) has {} entries, expected {count}",
                    idx,
                    names[idx],
                    row.len()
                )));
            }
            table.extend(row);
        }
        Ok(Self { names, table })
    }

    pub fn standard() -> Self {
        let names: Vec<String> = STANDARD_TYPES.iter().map(|t| t.to_string()).collect();
        let table = STANDARD_TYPES
            .iter()
            .flat_map(|atk| STANDARD_TYPES.iter().map(move |def| standard_efficacy(atk, def)))
            .collect();
        Self { names, table }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, id: TypeId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        let key = normalize_key(name);
        self.names
            .iter()
            .position(|n| normalize_key(n) == key)
            .map(|idx| idx as TypeId)
    }

    pub fn efficacy(&self, attack: TypeId, defend: TypeId) -> Result<Efficacy> {
        let count = self.len();
        if attack as usize >= count {
            return Err(Error::InvalidAttackType(attack));
        }
        if defend as usize >= count {
            return Err(Error::InvalidDefendType(defend));
        }
        Ok(self.table[attack as usize * count + defend as usize])
    }
}

fn standard_efficacy(attacking: &str, defending: &str) -> Efficacy {
    use Efficacy::{
        NoEffect as Zero, NotVeryEffective as Half, Regular as One, SuperEffective as Two,
    };
    match attacking {
        "Normal" => match defending {
            "Rock" | "Steel" => Half,
            "Ghost" => Zero,
            _ => One,
        },
        "Fighting" => match defending {
            "Normal" | "Rock" | "Steel" | "Ice" | "Dark" => Two,
            "Flying" | "Poison" | "Bug" | "Psychic" => Half,
            "Ghost" => Zero,
            _ => One,
        },
        "Flying" => match defending {
            "Fighting" | "Bug" | "Grass" => Two,
            "Rock" | "Steel" | "Electric" => Half,
            _ => One,
        },
        "Poison" => match defending {
            "Grass" => Two,
            "Poison" | "Ground" | "Rock" | "Ghost" => Half,
            "Steel" => Zero,
            _ => One,
        },
        "Ground" => match defending {
            "Poison" | "Rock" | "Steel" | "Fire" | "Electric" => Two,
            "Bug" | "Grass" => Half,
            "Flying" => Zero,
            _ => One,
        },
        "Rock" => match defending {
            "Flying" | "Bug" | "Fire" | "Ice" => Two,
            "Fighting" | "Ground" | "Steel" => Half,
            _ => One,
        },
        "Bug" => match defending {
            "Grass" | "Psychic" | "Dark" => Two,
            "Fighting" | "Flying" | "Poison" | "Ghost" | "Steel" | "Fire" => Half,
            _ => One,
        },
        "Ghost" => match defending {
            "Ghost" | "Psychic" => Two,
            "Steel" | "Dark" => Half,
            "Normal" => Zero,
            _ => One,
        },
        "Steel" => match defending {
            "Rock" | "Ice" => Two,
            "Steel" | "Fire" | "Water" | "Electric" => Half,
            _ => One,
        },
        "Fire" => match defending {
            "Bug" | "Steel" | "Grass" | "Ice" => Two,
            "Rock" | "Fire" | "Water" | "Dragon" => Half,
            _ => One,
        },
        "Water" => match defending {
            "Ground" | "Rock" | "Fire" => Two,
            "Water" | "Grass" | "Dragon" => Half,
            _ => One,
        },
        "Grass" => match defending {
            "Ground" | "Rock" | "Water" => Two,
            "Flying" | "Poison" | "Bug" | "Steel" | "Fire" | "Grass" | "Dragon" => Half,
            _ => One,
        },
        "Electric" => match defending {
            "Flying" | "Water" => Two,
            "Grass" | "Electric" | "Dragon" => Half,
            "Ground" => Zero,
            _ => One,
        },
        "Psychic" => match defending {
            "Fighting" | "Poison" => Two,
            "Steel" | "Psychic" => Half,
            "Dark" => Zero,
            _ => One,
        },
        "Ice" => match defending {
            "Flying" | "Ground" | "Grass" | "Dragon" => Two,
            "Steel" | "Fire" | "Water" | "Ice" => Half,
            _ => One,
        },
        "Dragon" => match defending {
            "Dragon" => Two,
            "Steel" => Half,
            _ => One,
        },
        "Dark" => match defending {
            "Ghost" | "Psychic" => Two,
            "Fighting" | "Steel" | "Dark" => Half,
            _ => One,
        },
        _ => One,
    }
}

/// A creature's own one or two distinct types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeProfile {
    primary: TypeId,
    secondary: Option<TypeId>,
}

impl TypeProfile {
    pub fn single(primary: TypeId) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn dual(primary: TypeId, secondary: TypeId) -> Result<Self> {
        if primary == secondary {
            return Err(Error::InvalidTypeProfile(format!(
                "type {primary} listed twice"
            )));
        }
        Ok(Self {
            primary,
            secondary: Some(secondary),
        })
    }

    pub fn from_slice(types: &[TypeId]) -> Result<Self> {
        match types {
            [primary] => Ok(Self::single(*primary)),
            [primary, secondary] => Self::dual(*primary, *secondary),
            other => Err(Error::InvalidTypeProfile(format!(
                "expected 1 or 2 types, found {}",
                other.len()
            ))),
        }
    }

    pub fn primary(&self) -> TypeId {
        self.primary
    }

    pub fn secondary(&self) -> Option<TypeId> {
        self.secondary
    }

    pub fn len(&self) -> usize {
        if self.secondary.is_some() {
            2
        } else {
            1
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeId> {
        std::iter::once(self.primary).chain(self.secondary)
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.iter().any(|t| t == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> TypeId {
        TypeChart::standard().id_of(name).expect("standard type")
    }

    #[test]
    fn standard_chart_has_gen5_shape() {
        let chart = TypeChart::standard();
        assert_eq!(chart.len(), 17);
        assert_eq!(chart.name(4), Some("Ground"));
        assert_eq!(chart.name(9), Some("Fire"));
        assert_eq!(chart.name(10), Some("Water"));
        assert_eq!(chart.name(12), Some("Electric"));
    }

    #[test]
    fn standard_chart_matchups() {
        let chart = TypeChart::standard();
        assert_eq!(
            chart.efficacy(id("Electric"), id("Ground")).unwrap(),
            Efficacy::NoEffect
        );
        assert_eq!(
            chart.efficacy(id("Water"), id("Fire")).unwrap(),
            Efficacy::SuperEffective
        );
        assert_eq!(
            chart.efficacy(id("Ghost"), id("Steel")).unwrap(),
            Efficacy::NotVeryEffective
        );
        assert_eq!(
            chart.efficacy(id("Steel"), id("Ghost")).unwrap(),
            Efficacy::Regular
        );
    }

    #[test]
    fn invalid_ids_name_the_bad_side() {
        let chart = TypeChart::standard();
        assert_eq!(chart.efficacy(17, 0), Err(Error::InvalidAttackType(17)));
        assert_eq!(chart.efficacy(0, 200), Err(Error::InvalidDefendType(200)));
    }

    #[test]
    fn id_lookup_ignores_case() {
        let chart = TypeChart::standard();
        assert_eq!(chart.id_of("psychic"), Some(13));
        assert_eq!(chart.id_of("FAIRY"), None);
    }

    #[test]
    fn type_profile_rejects_duplicates_and_bad_lengths() {
        assert!(TypeProfile::dual(3, 3).is_err());
        assert!(TypeProfile::from_slice(&[]).is_err());
        assert!(TypeProfile::from_slice(&[1, 2, 3]).is_err());
        let dual = TypeProfile::from_slice(&[7, 3]).unwrap();
        assert_eq!(dual.iter().collect::<Vec<_>>(), vec![7, 3]);
        assert_eq!(TypeProfile::single(5).len(), 1);
    }

    #[test]
    fn ragged_chart_is_rejected() {
        let names = vec!["A".to_string(), "B".to_string()];
        let rows = vec![vec![Efficacy::Regular; 2], vec![Efficacy::Regular]];
        assert!(matches!(
            TypeChart::new(names, rows),
            Err(Error::MalformedChart(_))
        ));
    }
}
