use crate::catalog::Catalog;
use crate::error::Result;
use crate::rating::CreatureRating;
use crate::team::{modified_rating, BaseValues, RatingExtras};
use crate::types::SpeciesId;
use serde::Serialize;

pub const SUGGESTION_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    pub name: String,
    #[serde(flatten)]
    pub rating: CreatureRating,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub id: SpeciesId,
    pub name: String,
    pub score: i32,
    pub extras: RatingExtras,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    pub members: Vec<TeamMember>,
    pub base_rating: i32,
    pub base_extras: RatingExtras,
    pub suggestions: Vec<Suggestion>,
}

/// Best single additions to `names` among final-stage species up to
/// `max_generation`, ranked by the modified rating of the grown team.
/// An empty current team is allowed and ranks candidates on their own.
pub fn suggest<S: AsRef<str>>(
    catalog: &Catalog,
    names: &[S],
    max_generation: u8,
) -> Result<Suggestions> {
    let members: Vec<TeamMember> = catalog
        .team(names)?
        .into_iter()
        .map(|(name, rating)| TeamMember { name, rating })
        .collect();
    let base = modified_rating(
        members.iter().map(|m| &m.rating),
        BaseValues::new(catalog.type_count()),
    );

    let candidates = catalog.final_stage(max_generation);
    let mut rated = Vec::with_capacity(candidates.len());
    for id in candidates {
        let entry = catalog.entry(id)?;
        let grown = base.with_candidate(&entry.rating);
        rated.push(Suggestion {
            id,
            name: entry.name.clone(),
            score: grown.score,
            extras: grown.extras,
        });
    }
    rated.sort_by(|left, right| {
        (right.score, right.extras, &right.name).cmp(&(left.score, left.extras, &left.name))
    });
    rated.truncate(SUGGESTION_COUNT);
    tracing::debug!(
        team = members.len(),
        max_generation,
        base = base.score,
        "suggestions ranked"
    );

    Ok(Suggestions {
        members,
        base_rating: base.score,
        base_extras: base.extras,
        suggestions: rated,
    })
}
