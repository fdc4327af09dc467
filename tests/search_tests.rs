use pokemon_type_coverage::parallel::WorkerPool;
use pokemon_type_coverage::report::write_csv;
use pokemon_type_coverage::search::Combinations;
use pokemon_type_coverage::types::SpeciesId;
use pokemon_type_coverage::{
    load_catalog, score_combinations, score_combinations_with, score_team, suggest, CancelToken,
    Catalog, Error, ScoredTeam, SearchOptions,
};
use std::path::Path;
use std::sync::Mutex;

const POOL: [&str; 7] = [
    "Blastoise",
    "Charizard",
    "Venusaur",
    "Gengar",
    "Heatran",
    "Garchomp",
    "Skarmory",
];

fn make_catalog() -> Catalog {
    load_catalog(&Path::new(env!("CARGO_MANIFEST_DIR")).join("data/dex.json")).unwrap()
}

fn make_pool(catalog: &Catalog) -> Vec<SpeciesId> {
    catalog.resolve_team(&POOL).unwrap()
}

fn brute_force(catalog: &Catalog, pool: &[SpeciesId], size: usize, cutoff: i32) -> Vec<ScoredTeam> {
    let mut expected: Vec<ScoredTeam> = Combinations::new(pool.len(), size)
        .map(|indices| {
            let team: Vec<SpeciesId> = indices.iter().map(|&i| pool[i]).collect();
            score_team(catalog, &team).unwrap()
        })
        .filter(|scored| scored.min_total >= cutoff)
        .collect();
    expected.sort();
    expected
}

fn names(catalog: &Catalog, team: &[SpeciesId]) -> Vec<String> {
    team.iter()
        .map(|id| catalog.name(*id).unwrap().to_string())
        .collect()
}

#[test]
fn search_matches_brute_force() {
    let catalog = make_catalog();
    let pool = make_pool(&catalog);
    for cutoff in [-20, -2, 0, 5] {
        let found = score_combinations(&catalog, &pool, 3, cutoff).unwrap();
        assert_eq!(found, brute_force(&catalog, &pool, 3, cutoff));
        assert!(found.windows(2).all(|w| w[0] <= w[1]));
        assert!(found.iter().all(|t| t.min_total >= cutoff));
    }
    assert_eq!(score_combinations(&catalog, &pool, 3, -100).unwrap().len(), 35);
}

#[test]
fn best_three_member_team_is_last() {
    let catalog = make_catalog();
    let pool = make_pool(&catalog);
    let found = score_combinations(&catalog, &pool, 3, 0).unwrap();
    assert_eq!(found.len(), 1);
    let best = &found[0];
    assert_eq!((best.min_total, best.min_count, best.full_total), (1, 2, 90));
    assert_eq!(
        names(&catalog, &best.team),
        vec!["Blastoise", "Garchomp", "Skarmory"]
    );
}

#[test]
fn small_batches_and_fixed_workers_agree() {
    let catalog = make_catalog();
    let pool = make_pool(&catalog);
    let options = SearchOptions {
        batch_size: 4,
        workers: WorkerPool::with_workers(2),
        cancel: None,
    };
    let progress = Mutex::new(Vec::new());
    let found = score_combinations_with(&catalog, &pool, 4, -10, &options, |done, total| {
        progress.lock().unwrap().push((done, total));
    })
    .unwrap();
    assert_eq!(found, brute_force(&catalog, &pool, 4, -10));

    let progress = progress.into_inner().unwrap();
    // C(7, 4) = 35 split into ceil(35 / 4) = 9 batches
    assert_eq!(progress.len(), 9);
    assert!(progress.iter().all(|(_, total)| *total == 35));
    assert_eq!(progress.iter().map(|(done, _)| *done).max(), Some(35));
}

#[test]
fn cancelled_search_returns_error() {
    let catalog = make_catalog();
    let pool = make_pool(&catalog);
    let token = CancelToken::new();
    token.cancel();
    let options = SearchOptions {
        cancel: Some(token),
        ..SearchOptions::default()
    };
    let result = score_combinations_with(&catalog, &pool, 3, 0, &options, |_, _| {});
    assert_eq!(result, Err(Error::Cancelled));
}

#[test]
fn cancelled_search_over_huge_pool_returns_before_scanning() {
    let catalog = make_catalog();
    // C(493, 6) is about 1.9e13 combinations
    let pool = vec![0; 493];
    let token = CancelToken::new();
    token.cancel();
    let options = SearchOptions {
        cancel: Some(token),
        ..SearchOptions::default()
    };
    let result = score_combinations_with(&catalog, &pool, 6, i32::MIN, &options, |_, _| {
        panic!("no batch should run after cancellation");
    });
    assert_eq!(result, Err(Error::Cancelled));
}

#[test]
fn cancelling_from_progress_stops_the_search() {
    let catalog = make_catalog();
    let pool = vec![0; 40];
    let token = CancelToken::new();
    let options = SearchOptions {
        batch_size: 1_000,
        workers: WorkerPool::with_workers(2),
        cancel: Some(token.clone()),
    };
    let result = score_combinations_with(&catalog, &pool, 6, i32::MIN, &options, |_, _| {
        token.cancel();
    });
    assert_eq!(result, Err(Error::Cancelled));
}

#[test]
fn degenerate_sizes() {
    let catalog = make_catalog();
    let pool = make_pool(&catalog);
    assert_eq!(
        score_combinations(&catalog, &pool, 0, 0),
        Err(Error::EmptyTeam)
    );
    assert_eq!(score_combinations(&catalog, &pool, 8, 0), Ok(Vec::new()));
    assert_eq!(
        score_combinations(&catalog, &[0, 999], 1, 0),
        Err(Error::UnknownSpecies(999))
    );
}

#[test]
fn csv_has_header_and_one_row_per_team() {
    let catalog = make_catalog();
    let pool = make_pool(&catalog);
    let found = score_combinations(&catalog, &pool, 3, -2).unwrap();
    let path = std::env::temp_dir().join(format!("coverage_search_{}.csv", std::process::id()));
    write_csv(&catalog, &found, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "min_total,min_count,full_total,team");
    assert_eq!(lines.len(), found.len() + 1);
    assert_eq!(lines.last(), Some(&"1,2,90,Blastoise Garchomp Skarmory"));
}

#[test]
fn suggestions_grow_a_pair() {
    let catalog = make_catalog();
    let result = suggest(&catalog, &["Blastoise", "Charizard"], 5).unwrap();
    assert_eq!(result.base_rating, 63);
    assert_eq!(
        (
            result.base_extras.coverage,
            result.base_extras.ratings_total,
            result.base_extras.negatives
        ),
        (8, 516, 11)
    );
    let picked: Vec<(&str, i32)> = result
        .suggestions
        .iter()
        .map(|s| (s.name.as_str(), s.score))
        .collect();
    assert_eq!(
        picked,
        vec![
            ("Garchomp", 491),
            ("Swampert", 275),
            ("Lanturn", 243),
            ("Jolteon", 191),
            ("Raichu", 131),
        ]
    );
}

#[test]
fn suggestions_respect_generation_and_finality() {
    let catalog = make_catalog();
    let result = suggest(&catalog, &["Gengar"], 1).unwrap();
    let picked: Vec<&str> = result.suggestions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        picked,
        vec!["Jolteon", "Raichu", "Machamp", "Snorlax", "Vaporeon"]
    );

    for max_generation in 1..=4 {
        let evolves = catalog.pre_evolutions(|g| g <= max_generation);
        let result = suggest(&catalog, &["Blissey"], max_generation).unwrap();
        for suggestion in &result.suggestions {
            let entry = catalog.entry(suggestion.id).unwrap();
            assert!(entry.generation <= max_generation);
            assert!(!evolves.contains(&suggestion.id));
        }
    }
}

#[test]
fn empty_team_suggestions_rank_candidates_alone() {
    let catalog = make_catalog();
    let result = suggest::<&str>(&catalog, &[], 5).unwrap();
    assert!(result.members.is_empty());
    assert_eq!(result.base_rating, 0);
    assert_eq!(result.suggestions[0].name, "Bronzong");
    assert_eq!(result.suggestions[0].score, 85);
}

#[test]
fn suggest_is_idempotent() {
    let catalog = make_catalog();
    let first = suggest(&catalog, &["Scizor", "Starmie"], 4).unwrap();
    let second = suggest(&catalog, &["Scizor", "Starmie"], 4).unwrap();
    assert_eq!(first, second);
    assert!(matches!(
        suggest(&catalog, &["Scizor", "Agumon"], 4),
        Err(Error::UnknownCreature(name)) if name == "Agumon"
    ));
}
