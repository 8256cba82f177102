//! Connector Puzzle Hardener
//!
//! Searches a puzzle shape's connector assignments for the hardest instance:
//! the fewest structurally distinct valid assemblies, with ties broken
//! toward more near-miss assemblies that mislead a solver. Improvements
//! stream to stdout as they are found and, with `--out`, to one text file
//! each.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use interlock::instance::AssemblyCount;
use interlock::search::DarwinConfig;
use interlock::{persistence, shapes, SearchOps};

/// Searches for the hardest instance of a connector assembly puzzle.
#[derive(Parser)]
#[command(name = "interlock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Puzzle shape to search.
    #[arg(long, default_value = "chain3")]
    shape: String,

    /// Maximum connector magnitude.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(i32).range(1..))]
    kind: i32,

    /// Seed for reproducible random and darwin runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after scoring this many candidates.
    #[arg(long)]
    limit: Option<u64>,

    /// Directory receiving one text file per improvement.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the shape, its canonical instance, and its symmetry count.
    Show,
    /// Enumerate and score every instance.
    Brute,
    /// Score uniformly drawn instances until stopped.
    Random,
    /// Evolve a population of instances toward harder ones.
    Darwin {
        /// Survivors kept after each generation.
        #[arg(long, default_value_t = 50)]
        population: usize,
        /// Children bred per member per generation.
        #[arg(long, default_value_t = 5)]
        children: usize,
        /// Per-slot probability of redrawing a value.
        #[arg(long, default_value_t = 0.2)]
        mutation: f64,
    },
}

fn main() {
    let cli = Cli::parse();

    let Some(template) = shapes::by_name(&cli.shape) else {
        eprintln!(
            "Unknown shape `{}`. Available shapes: {}",
            cli.shape,
            shapes::SHAPE_NAMES.join(", ")
        );
        std::process::exit(2);
    };

    match &cli.command {
        Some(Command::Show) | None => run_show(template.as_ref()),
        Some(Command::Brute) => run_search(&cli, template.as_ref(), Strategy::Brute),
        Some(Command::Random) => run_search(&cli, template.as_ref(), Strategy::Random),
        Some(Command::Darwin {
            population,
            children,
            mutation,
        }) => {
            if !(0.0..=1.0).contains(mutation) {
                eprintln!("Mutation rate must lie between 0 and 1, got {mutation}");
                std::process::exit(2);
            }
            let config = DarwinConfig {
                population: *population,
                children: *children,
                mutation_rate: *mutation,
            };
            run_search(&cli, template.as_ref(), Strategy::Darwin(config));
        }
    }
}

/// Search strategy picked on the command line, with its validated knobs.
enum Strategy {
    Brute,
    Random,
    Darwin(DarwinConfig),
}

/// Prints the shape summary.
fn run_show(template: &dyn SearchOps) {
    println!("shape:     {}", template.describe());
    println!("canonical: {}", template.seeded());
    println!("symmetry:  {}", template.symmetry());
}

/// Runs one strategy, streaming improvements to stdout and the file sink.
fn run_search(cli: &Cli, template: &dyn SearchOps, strategy: Strategy) {
    let symmetry = template.symmetry();
    println!("shape: {} (symmetry {symmetry})", template.describe());

    let mut improvements = 0u64;
    let mut report = |rendered: &str, count: AssemblyCount| {
        improvements += 1;
        println!(
            "valid {} almost {} (raw {}x{}): {rendered}",
            count.valid / symmetry,
            count.almost / symmetry,
            count.valid,
            count.almost
        );
        if let Some(dir) = &cli.out {
            if let Err(error) = persistence::save_improvement(dir, rendered, count, symmetry) {
                eprintln!("Failed to save improvement: {error}");
            }
        }
    };

    let scored = match strategy {
        Strategy::Brute => template.brute(cli.kind, cli.limit, &mut report),
        Strategy::Random => template.random(cli.kind, cli.seed, cli.limit, &mut report),
        Strategy::Darwin(config) => {
            template.darwin(cli.kind, &config, cli.seed, cli.limit, &mut report)
        }
    };

    println!("Scored {scored} candidates, {improvements} improvements");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_shape_resolves() {
        let cli = Cli::parse_from(["interlock", "brute"]);
        assert!(shapes::by_name(&cli.shape).is_some());
    }
}
