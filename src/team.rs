use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::rating::CreatureRating;
use crate::types::SpeciesId;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};

pub const OFFENSE_WEIGHT: i32 = 5;

/// Team score ordered worst-first: a higher worst-type total wins, then
/// fewer types tied at that total, then a higher overall total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScoredTeam {
    pub min_total: i32,
    pub min_count: usize,
    pub full_total: i32,
    pub team: Vec<SpeciesId>,
}

impl ScoredTeam {
    fn sort_key(&self) -> (i32, Reverse<usize>, i32, &[SpeciesId]) {
        (
            self.min_total,
            Reverse(self.min_count),
            self.full_total,
            &self.team,
        )
    }
}

impl Ord for ScoredTeam {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for ScoredTeam {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn accumulate(totals: &mut [i32], rating: &CreatureRating) {
    for ((total, res), hit) in totals
        .iter_mut()
        .zip(&rating.resistance)
        .zip(&rating.offense)
    {
        *total += res + if *hit { OFFENSE_WEIGHT } else { 0 };
    }
}

/// `(min_total, min_count, full_total)` over per-type totals.
pub fn summarize(totals: &[i32]) -> (i32, usize, i32) {
    let min_total = totals.iter().copied().min().unwrap_or(0);
    let min_count = totals.iter().filter(|t| **t == min_total).count();
    (min_total, min_count, totals.iter().sum())
}

pub fn type_totals(type_count: usize, ratings: &[&CreatureRating]) -> Result<Vec<i32>> {
    if ratings.is_empty() {
        return Err(Error::EmptyTeam);
    }
    let mut totals = vec![0; type_count];
    for rating in ratings {
        accumulate(&mut totals, rating);
    }
    Ok(totals)
}

pub fn score_ratings(
    team: Vec<SpeciesId>,
    type_count: usize,
    ratings: &[&CreatureRating],
) -> Result<ScoredTeam> {
    let totals = type_totals(type_count, ratings)?;
    let (min_total, min_count, full_total) = summarize(&totals);
    Ok(ScoredTeam {
        min_total,
        min_count,
        full_total,
        team,
    })
}

pub fn score_team(catalog: &Catalog, team: &[SpeciesId]) -> Result<ScoredTeam> {
    let ratings = team
        .iter()
        .map(|id| catalog.rating(*id))
        .collect::<Result<Vec<_>>>()?;
    score_ratings(team.to_vec(), catalog.type_count(), &ratings)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RatingExtras {
    pub coverage: usize,
    pub ratings_total: i32,
    pub negatives: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseValues {
    pub coverage: Vec<bool>,
    pub or_totals: Vec<i32>,
    pub ratings_total: i32,
}

impl BaseValues {
    pub fn new(type_count: usize) -> Self {
        Self {
            coverage: vec![false; type_count],
            or_totals: vec![0; type_count],
            ratings_total: 0,
        }
    }

    pub fn fold(&mut self, rating: &CreatureRating) {
        for (covered, hit) in self.coverage.iter_mut().zip(&rating.offense) {
            *covered |= *hit;
        }
        accumulate(&mut self.or_totals, rating);
        self.ratings_total += rating.rating;
    }

    pub fn evaluate(self) -> ModifiedRating {
        let type_count = self.coverage.len().max(1) as i32;
        let coverage = self.coverage.iter().filter(|c| **c).count();
        let negatives: i32 = self.or_totals.iter().filter(|t| **t < 0).map(|t| -t).sum();
        let mut score = self.ratings_total;
        if self.ratings_total > 0 {
            score += coverage as i32 * self.ratings_total / type_count;
            score /= negatives + 1;
        }
        ModifiedRating {
            score,
            extras: RatingExtras {
                coverage,
                ratings_total: self.ratings_total,
                negatives,
            },
            base: self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifiedRating {
    pub score: i32,
    pub extras: RatingExtras,
    #[serde(skip)]
    pub base: BaseValues,
}

impl ModifiedRating {
    pub fn with_candidate(&self, candidate: &CreatureRating) -> ModifiedRating {
        let mut base = self.base.clone();
        base.fold(candidate);
        base.evaluate()
    }
}

/// Coverage-weighted score: the summed member ratings, boosted by coverage
/// breadth and divided by one plus the team's total negative exposure.
pub fn modified_rating<'a, I>(members: I, mut base: BaseValues) -> ModifiedRating
where
    I: IntoIterator<Item = &'a CreatureRating>,
{
    for rating in members {
        base.fold(rating);
    }
    base.evaluate()
}
