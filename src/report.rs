use crate::catalog::{Catalog, RankedSpecies};
use crate::error::Result;
use crate::suggest::Suggestions;
use crate::team::{accumulate, ScoredTeam};
use crate::types::SpeciesId;
use phf::phf_map;
use std::fmt::Write as _;

static TYPE_ABBREVIATIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "normal" => "Nrm",
    "fighting" => "Fit",
    "flying" => "Fly",
    "poison" => "Psn",
    "ground" => "Gnd",
    "rock" => "Rck",
    "bug" => "Bug",
    "ghost" => "Gst",
    "steel" => "Stl",
    "fire" => "Fir",
    "water" => "Wtr",
    "grass" => "Grs",
    "electric" => "Elc",
    "psychic" => "Psy",
    "ice" => "Ice",
    "dragon" => "Dgn",
    "dark" => "Drk",
    "fairy" => "Fry",
};

/// Three-letter column header for a type name.
pub fn type_abbreviation(name: &str) -> String {
    let key = name.to_ascii_lowercase();
    match TYPE_ABBREVIATIONS.get(key.as_str()) {
        Some(abbr) => abbr.to_string(),
        None => format!("{:<3.3}", name),
    }
}

fn header(catalog: &Catalog, trailer: &str) -> String {
    let mut line = catalog
        .type_names()
        .iter()
        .map(|t| type_abbreviation(t))
        .collect::<Vec<_>>()
        .join(" ");
    line.push(' ');
    line.push_str(trailer);
    line
}

/// Per-member resistance and offense rows followed by per-type totals.
/// Negative resistances are shown as `(n)`, covered types as `+`.
pub fn format_team_table(catalog: &Catalog, team: &[SpeciesId]) -> Result<String> {
    let mut out = header(catalog, "Pokemon");
    out.push('\n');
    let mut totals = vec![0; catalog.type_count()];
    for id in team {
        let entry = catalog.entry(*id)?;
        let resistance = entry
            .rating
            .resistance
            .iter()
            .map(|r| {
                if *r < 0 {
                    format!("({})", r.abs())
                } else {
                    format!(" {r} ")
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "{resistance} {}", entry.name);
        let offense = entry
            .rating
            .offense
            .iter()
            .map(|hit| if *hit { " + " } else { "   " })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "{}", offense.trim_end());
        accumulate(&mut totals, &entry.rating);
    }
    let total_row = totals
        .iter()
        .map(|t| format!("{t:3}"))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "{total_row} TOTAL");
    Ok(out)
}

pub fn format_ranked(ranked: &[RankedSpecies]) -> String {
    let mut out = String::new();
    for entry in ranked {
        let _ = writeln!(out, "{:4} {}", entry.rating, entry.name);
    }
    out
}

fn team_names(catalog: &Catalog, team: &[SpeciesId]) -> Result<String> {
    Ok(team
        .iter()
        .map(|id| catalog.name(*id))
        .collect::<Result<Vec<_>>>()?
        .join(" "))
}

/// One line per team, best first.
pub fn format_search_results(catalog: &Catalog, results: &[ScoredTeam]) -> Result<String> {
    let mut out = String::from(" min tied total team\n");
    for scored in results.iter().rev() {
        let _ = writeln!(
            out,
            "{:4} {:4} {:5} {}",
            scored.min_total,
            scored.min_count,
            scored.full_total,
            team_names(catalog, &scored.team)?
        );
    }
    Ok(out)
}

pub fn format_suggestions(suggestions: &Suggestions) -> String {
    let mut out = String::new();
    for member in &suggestions.members {
        let _ = writeln!(out, "{:5} {}", member.rating.rating, member.name);
    }
    let extras = suggestions.base_extras;
    let _ = writeln!(
        out,
        "team rating {} (coverage {}, total {}, exposure {})",
        suggestions.base_rating, extras.coverage, extras.ratings_total, extras.negatives
    );
    for suggestion in &suggestions.suggestions {
        let _ = writeln!(
            out,
            "{:5} {} (coverage {}, total {}, exposure {})",
            suggestion.score,
            suggestion.name,
            suggestion.extras.coverage,
            suggestion.extras.ratings_total,
            suggestion.extras.negatives
        );
    }
    out
}

/// Ascending search results as `min_total,min_count,full_total,team`, with
/// team members separated by spaces.
pub fn write_csv(
    catalog: &Catalog,
    results: &[ScoredTeam],
    path: &std::path::Path,
) -> anyhow::Result<()> {
    let mut out = String::from("min_total,min_count,full_total,team");
    for scored in results {
        out.push('\n');
        out.push_str(&format!(
            "{},{},{},{}",
            scored.min_total,
            scored.min_count,
            scored.full_total,
            team_names(catalog, &scored.team)?
        ));
    }
    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations_fall_back_to_three_letters() {
        assert_eq!(type_abbreviation("Electric"), "Elc");
        assert_eq!(type_abbreviation("FIGHTING"), "Fit");
        assert_eq!(type_abbreviation("Shadow"), "Sha");
        assert_eq!(type_abbreviation("Qi"), "Qi ");
    }
}
