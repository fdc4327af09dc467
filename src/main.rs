use pokemon_type_coverage::catalog::DEFAULT_MAX_GENERATION;
use pokemon_type_coverage::search::DEFAULT_BATCH_SIZE;
use pokemon_type_coverage::telemetry::init_tracing;
use pokemon_type_coverage::{run, CliOptions, Command};
use std::env;
use std::path::PathBuf;

const DEX_ENV: &str = "COVERAGE_DEX";

fn usage() -> ! {
    eprintln!(
        "Usage: pokemon-type-coverage [--dex dex.json] [--json] [--threads N] [--batch N] \
<command>\n\
Commands:\n  \
rate NAME\n  \
team NAME...\n  \
rank [--gen G]... [--final]\n  \
search [--size K] [--cutoff C] [--max-gen G] [--output teams.csv] [NAME...]\n  \
suggest [--max-gen G] [NAME...]"
    );
    std::process::exit(1);
}

fn next_value<I>(args: &mut I, flag: &str, what: &str) -> anyhow::Result<String>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| anyhow::anyhow!("{flag} requires {what}"))
}

fn parse_command<I: Iterator<Item = String>>(name: &str, mut args: I) -> anyhow::Result<Command> {
    match name {
        "rate" => {
            let name = args
                .next()
                .ok_or_else(|| anyhow::anyhow!("rate requires a species name"))?;
            if let Some(extra) = args.next() {
                anyhow::bail!("Unexpected argument {extra}");
            }
            Ok(Command::Rate { name })
        }
        "team" => {
            let names: Vec<String> = args.collect();
            if names.is_empty() {
                anyhow::bail!("team requires at least one species name");
            }
            Ok(Command::Team { names })
        }
        "rank" => {
            let mut generations = Vec::new();
            let mut final_only = false;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--gen" => {
                        generations.push(next_value(&mut args, "--gen", "a number")?.parse()?)
                    }
                    "--final" => final_only = true,
                    other => anyhow::bail!("Unknown rank argument {other}"),
                }
            }
            Ok(Command::Rank {
                generations,
                final_only,
            })
        }
        "search" => {
            let mut pool = Vec::new();
            let mut size = 6usize;
            let mut cutoff = 0i32;
            let mut max_generation = DEFAULT_MAX_GENERATION;
            let mut output = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--size" => size = next_value(&mut args, "--size", "a number")?.parse()?,
                    "--cutoff" => cutoff = next_value(&mut args, "--cutoff", "a number")?.parse()?,
                    "--max-gen" => {
                        max_generation = next_value(&mut args, "--max-gen", "a number")?.parse()?
                    }
                    "--output" => {
                        output = Some(PathBuf::from(next_value(
                            &mut args,
                            "--output",
                            "a path (e.g. --output teams.csv)",
                        )?))
                    }
                    other if other.starts_with("--") => {
                        anyhow::bail!("Unknown search argument {other}")
                    }
                    _ => pool.push(arg),
                }
            }
            Ok(Command::Search {
                pool,
                size,
                cutoff,
                max_generation,
                output,
            })
        }
        "suggest" => {
            let mut names = Vec::new();
            let mut max_generation = DEFAULT_MAX_GENERATION;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--max-gen" => {
                        max_generation = next_value(&mut args, "--max-gen", "a number")?.parse()?
                    }
                    other if other.starts_with("--") => {
                        anyhow::bail!("Unknown suggest argument {other}")
                    }
                    _ => names.push(arg),
                }
            }
            Ok(Command::Suggest {
                names,
                max_generation,
            })
        }
        other => Err(anyhow::anyhow!("Unknown command {other}")),
    }
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut dex_path = env::var_os(DEX_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dex.json"));
    let mut json = false;
    let mut threads = 0usize;
    let mut batch_size = DEFAULT_BATCH_SIZE;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dex" => {
                dex_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--dex requires a path (e.g. --dex dex.json)")
                })?;
            }
            "--json" => json = true,
            "--threads" => {
                threads = next_value(&mut args, "--threads", "a number")?.parse()?;
            }
            "--batch" => {
                batch_size = next_value(&mut args, "--batch", "a number")?.parse()?;
                if batch_size == 0 {
                    anyhow::bail!("--batch must be > 0");
                }
            }
            "--help" | "-h" => usage(),
            other if other.starts_with("--") => {
                return Err(anyhow::anyhow!("Unknown argument {other}"))
            }
            command => {
                let command = parse_command(command, args)?;
                return Ok(CliOptions {
                    dex_path,
                    json,
                    threads,
                    batch_size,
                    command,
                });
            }
        }
    }
    usage()
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let opts = parse_args()?;
    run(opts)
}
