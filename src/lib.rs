//! Connector Puzzle Hardener Library
//!
//! Searches for the hardest instance of a connector assembly puzzle: a fixed
//! topology of pieces whose edges carry signed integer connectors, where two
//! connectors mate only if their values are additive inverses. A template
//! fixes the topology; the search strategies choose connector values that
//! leave as few valid assemblies as possible while piling up near misses.

pub mod fixed;
pub mod instance;
pub mod persistence;
pub mod pieces;
pub mod search;
pub mod shapes;
pub mod slots;
pub mod template;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use instance::AssemblyCount;
use search::DarwinConfig;
use template::Template;

/// Trait that erases compile-time template parameters for dynamic dispatch.
///
/// The const generics (`SLOTS`, `PIECES`) are hidden behind the vtable, so
/// the CLI can pick a shape at runtime without turbofish. Improvements reach
/// the callback already rendered, paired with their raw score.
pub trait SearchOps {
    /// Human-readable template rendering.
    fn describe(&self) -> String;
    /// Rendering of the canonical one-solution instance.
    fn seeded(&self) -> String;
    /// Number of valid assemblies inherent to the shape.
    fn symmetry(&self) -> u64;
    /// Exhaustive search; returns the number of candidates scored.
    fn brute(
        &self,
        kind: i32,
        budget: Option<u64>,
        report: &mut dyn FnMut(&str, AssemblyCount),
    ) -> u64;
    /// Random sampling; unbounded without a budget.
    fn random(
        &self,
        kind: i32,
        seed: Option<u64>,
        budget: Option<u64>,
        report: &mut dyn FnMut(&str, AssemblyCount),
    ) -> u64;
    /// Evolutionary search; unbounded without a budget.
    fn darwin(
        &self,
        kind: i32,
        config: &DarwinConfig,
        seed: Option<u64>,
        budget: Option<u64>,
        report: &mut dyn FnMut(&str, AssemblyCount),
    ) -> u64;
}

fn rng_from(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::seed_from_u64(rand::random()),
    }
}

impl<const SLOTS: usize, const PIECES: usize> SearchOps for Template<SLOTS, PIECES> {
    fn describe(&self) -> String {
        self.to_string()
    }

    fn seeded(&self) -> String {
        self.one_solution().to_string()
    }

    fn symmetry(&self) -> u64 {
        Template::symmetry(self)
    }

    fn brute(
        &self,
        kind: i32,
        budget: Option<u64>,
        report: &mut dyn FnMut(&str, AssemblyCount),
    ) -> u64 {
        search::brute_force(self, kind, budget, |instance, count| {
            report(&instance.to_string(), count)
        })
    }

    fn random(
        &self,
        kind: i32,
        seed: Option<u64>,
        budget: Option<u64>,
        report: &mut dyn FnMut(&str, AssemblyCount),
    ) -> u64 {
        let mut rng = rng_from(seed);
        search::random_search(self, kind, &mut rng, budget, |instance, count| {
            report(&instance.to_string(), count)
        })
    }

    fn darwin(
        &self,
        kind: i32,
        config: &DarwinConfig,
        seed: Option<u64>,
        budget: Option<u64>,
        report: &mut dyn FnMut(&str, AssemblyCount),
    ) -> u64 {
        let mut rng = rng_from(seed);
        search::darwin(self, kind, config, &mut rng, budget, |instance, count| {
            report(&instance.to_string(), count)
        })
    }
}
