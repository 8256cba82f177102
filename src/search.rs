//! Search strategies over a template's instance space.
//!
//! All three strategies pull instances from the template, score them with
//! the counting engine (passing the best known valid count as a pruning
//! cutoff), and invoke the caller's report callback on every strict
//! improvement. Difficulty favors fewer valid assemblies, breaking ties
//! toward more near misses.
//!
//! Brute force terminates when the exhaustive enumeration is spent; random
//! and evolutionary search run until their optional candidate budget is
//! exhausted, or forever without one.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::instance::{AssemblyCount, Instance};
use crate::slots;
use crate::template::Template;

/// Total order on difficulty: `Greater` means `a` is harder than `b`.
///
/// Fewer valid assemblies dominates; among ties, more near misses misleads
/// a solver more and therefore ranks harder.
pub fn compare_difficulty(a: AssemblyCount, b: AssemblyCount) -> Ordering {
    match b.valid.cmp(&a.valid) {
        Ordering::Equal => a.almost.cmp(&b.almost),
        unequal => unequal,
    }
}

/// Tuning knobs for the evolutionary strategy.
#[derive(Clone, Copy, Debug)]
pub struct DarwinConfig {
    /// Survivors kept after each generation.
    pub population: usize,
    /// Children bred per member per generation.
    pub children: usize,
    /// Per-value-slot probability of redrawing a child's value.
    pub mutation_rate: f64,
}

impl Default for DarwinConfig {
    fn default() -> Self {
        Self {
            population: 50,
            children: 5,
            mutation_rate: 0.2,
        }
    }
}

const PROGRESS_STRIDE: u64 = 100;
const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// Throttled stderr progress for long unattended runs.
///
/// Checks the clock every `PROGRESS_STRIDE` candidates and prints a rate
/// line at most once per `PROGRESS_INTERVAL`.
struct Progress {
    label: &'static str,
    scored: u64,
    last_line: Instant,
    last_scored: u64,
}

impl Progress {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            scored: 0,
            last_line: Instant::now(),
            last_scored: 0,
        }
    }

    fn tick(&mut self) {
        self.scored += 1;
        if self.scored % PROGRESS_STRIDE != 0 {
            return;
        }
        let elapsed = self.last_line.elapsed();
        if elapsed < PROGRESS_INTERVAL {
            return;
        }
        let rate = (self.scored - self.last_scored) as f64 / elapsed.as_secs_f64();
        eprintln!(
            "{}: {} candidates scored ({rate:.0}/s)",
            self.label, self.scored
        );
        self.last_line = Instant::now();
        self.last_scored = self.scored;
    }
}

/// True when `candidate` strictly beats the best score seen so far.
fn improves(best: &Option<AssemblyCount>, candidate: AssemblyCount) -> bool {
    match best {
        None => true,
        Some(current) => compare_difficulty(candidate, *current) == Ordering::Greater,
    }
}

/// Scores every instance of the exhaustive enumeration.
///
/// Reports each strict improvement and returns the number of candidates
/// scored. Terminates on its own; the budget only matters for spaces too
/// large to finish.
pub fn brute_force<'t, const SLOTS: usize, const PIECES: usize, F>(
    template: &'t Template<SLOTS, PIECES>,
    kind: i32,
    budget: Option<u64>,
    mut report: F,
) -> u64
where
    F: FnMut(&Instance<'t, SLOTS, PIECES>, AssemblyCount),
{
    let mut progress = Progress::new("brute");
    let mut best: Option<AssemblyCount> = None;

    for instance in template.all(kind) {
        if budget.is_some_and(|limit| progress.scored >= limit) {
            break;
        }
        progress.tick();
        let count = instance.count_assemblies(best.map(|b| b.valid));
        if improves(&best, count) {
            best = Some(count);
            report(&instance, count);
        }
    }
    progress.scored
}

/// Scores uniformly drawn instances until the budget runs out.
///
/// Without a budget this runs forever; cancellation is the caller's
/// problem, checked here once per sample.
pub fn random_search<'t, const SLOTS: usize, const PIECES: usize, R, F>(
    template: &'t Template<SLOTS, PIECES>,
    kind: i32,
    rng: &mut R,
    budget: Option<u64>,
    mut report: F,
) -> u64
where
    R: Rng,
    F: FnMut(&Instance<'t, SLOTS, PIECES>, AssemblyCount),
{
    let mut progress = Progress::new("random");
    let mut best: Option<AssemblyCount> = None;

    loop {
        if budget.is_some_and(|limit| progress.scored >= limit) {
            return progress.scored;
        }
        progress.tick();
        let instance = template.random(kind, rng);
        let count = instance.count_assemblies(best.map(|b| b.valid));
        if improves(&best, count) {
            best = Some(count);
            report(&instance, count);
        }
    }
}

/// Generational evolutionary search.
///
/// Seeds the population with random instances, then each round breeds a
/// fixed number of mutated children per member, scores them against the
/// global best, and keeps only the hardest `population` members (elitist
/// survival: the retained set is always the hardest N among that
/// generation's candidates).
pub fn darwin<'t, const SLOTS: usize, const PIECES: usize, R, F>(
    template: &'t Template<SLOTS, PIECES>,
    kind: i32,
    config: &DarwinConfig,
    rng: &mut R,
    budget: Option<u64>,
    mut report: F,
) -> u64
where
    R: Rng,
    F: FnMut(&Instance<'t, SLOTS, PIECES>, AssemblyCount),
{
    assert!(config.population > 0, "population must be nonempty");
    assert!(config.children > 0, "children per member must be positive");
    assert!(
        (0.0..=1.0).contains(&config.mutation_rate),
        "mutation rate must lie in 0..=1"
    );

    let mut progress = Progress::new("darwin");
    let mut best: Option<AssemblyCount> = None;
    let mut population: Vec<(Instance<'t, SLOTS, PIECES>, AssemblyCount)> =
        Vec::with_capacity(config.population * (1 + config.children));

    for _ in 0..config.population {
        if budget.is_some_and(|limit| progress.scored >= limit) {
            return progress.scored;
        }
        progress.tick();
        let seed = template.random(kind, rng);
        let count = seed.count_assemblies(best.map(|b| b.valid));
        if improves(&best, count) {
            best = Some(count);
            report(&seed, count);
        }
        population.push((seed, count));
    }

    loop {
        let parents = population.len();
        for parent in 0..parents {
            for _ in 0..config.children {
                if budget.is_some_and(|limit| progress.scored >= limit) {
                    return progress.scored;
                }
                progress.tick();
                let child = mutate(
                    template,
                    &population[parent].0,
                    kind,
                    config.mutation_rate,
                    rng,
                );
                let count = child.count_assemblies(best.map(|b| b.valid));
                if improves(&best, count) {
                    best = Some(count);
                    report(&child, count);
                }
                population.push((child, count));
            }
        }

        // least-hard first, then trim from the front down to the target size
        population.sort_by(|a, b| compare_difficulty(a.1, b.1));
        let excess = population.len().saturating_sub(config.population);
        population.drain(..excess);
    }
}

/// Breeds one child: each value slot independently redraws with probability
/// `rate`, otherwise keeps the parent's value; mirrors follow by
/// re-resolution.
fn mutate<'t, const SLOTS: usize, const PIECES: usize, R: Rng>(
    template: &'t Template<SLOTS, PIECES>,
    parent: &Instance<'t, SLOTS, PIECES>,
    kind: i32,
    rate: f64,
    rng: &mut R,
) -> Instance<'t, SLOTS, PIECES> {
    let mut grid = [[0i32; SLOTS]; PIECES];
    for addr in template.value_slots() {
        let inherited = parent.pieces()[addr.piece].values()[addr.slot];
        grid[addr.piece][addr.slot] = if rng.gen::<f64>() < rate {
            slots::random_value(kind, rng)
        } else {
            inherited
        };
    }
    template.resolve_values(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{chain3, ring4};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn count(valid: u64, almost: u64) -> AssemblyCount {
        AssemblyCount { valid, almost }
    }

    #[test]
    fn fewer_valid_assemblies_is_harder() {
        assert_eq!(
            compare_difficulty(count(2, 0), count(4, 9)),
            Ordering::Greater
        );
        assert_eq!(compare_difficulty(count(4, 9), count(2, 0)), Ordering::Less);
    }

    #[test]
    fn ties_break_toward_more_near_misses() {
        assert_eq!(
            compare_difficulty(count(2, 7), count(2, 3)),
            Ordering::Greater
        );
        assert_eq!(compare_difficulty(count(2, 3), count(2, 3)), Ordering::Equal);
    }

    #[test]
    fn comparator_is_antisymmetric() {
        let scores = [
            count(0, 0),
            count(0, 5),
            count(2, 3),
            count(2, 7),
            count(4, 1),
        ];
        for &a in &scores {
            for &b in &scores {
                match compare_difficulty(a, b) {
                    Ordering::Equal => assert_eq!(compare_difficulty(b, a), Ordering::Equal),
                    Ordering::Greater => assert_eq!(compare_difficulty(b, a), Ordering::Less),
                    Ordering::Less => assert_eq!(compare_difficulty(b, a), Ordering::Greater),
                }
            }
        }
    }

    #[test]
    fn brute_force_visits_the_whole_space_once() {
        let template = chain3();
        let scored = brute_force(&template, 1, None, |_, _| {});
        assert_eq!(scored, 16);
    }

    #[test]
    fn brute_force_reports_only_strict_improvements() {
        let template = chain3();
        let mut reported: Vec<AssemblyCount> = Vec::new();
        brute_force(&template, 2, None, |_, count| reported.push(count));

        assert!(!reported.is_empty());
        for pair in reported.windows(2) {
            assert_eq!(
                compare_difficulty(pair[1], pair[0]),
                Ordering::Greater,
                "non-improving report: {pair:?}"
            );
        }
    }

    #[test]
    fn random_search_respects_its_budget() {
        let template = ring4();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut reported: Vec<AssemblyCount> = Vec::new();
        let scored = random_search(&template, 2, &mut rng, Some(50), |_, count| {
            reported.push(count);
        });

        assert_eq!(scored, 50);
        for pair in reported.windows(2) {
            assert_eq!(compare_difficulty(pair[1], pair[0]), Ordering::Greater);
        }
    }

    #[test]
    fn darwin_respects_its_budget_and_improves_monotonically() {
        let template = ring4();
        let mut rng = SmallRng::seed_from_u64(5);
        let config = DarwinConfig {
            population: 8,
            children: 2,
            mutation_rate: 0.3,
        };
        let mut reported: Vec<AssemblyCount> = Vec::new();
        let scored = darwin(&template, 2, &config, &mut rng, Some(120), |_, count| {
            reported.push(count);
        });

        assert!(scored <= 120);
        assert!(!reported.is_empty());
        for pair in reported.windows(2) {
            assert_eq!(compare_difficulty(pair[1], pair[0]), Ordering::Greater);
        }
    }

    #[test]
    fn mutation_at_rate_zero_reproduces_the_parent() {
        let template = chain3();
        let mut rng = SmallRng::seed_from_u64(9);
        let parent = template.random(2, &mut rng);
        let child = mutate(&template, &parent, 2, 0.0, &mut rng);
        assert_eq!(child.pieces(), parent.pieces());
    }

    #[test]
    fn mutation_keeps_mirrors_negated() {
        let template = chain3();
        let mut rng = SmallRng::seed_from_u64(13);
        let parent = template.random(2, &mut rng);
        for _ in 0..50 {
            let child = mutate(&template, &parent, 2, 1.0, &mut rng);
            let pieces = child.pieces();
            assert_eq!(pieces[1].values()[0], -pieces[0].values()[1]);
            assert_eq!(pieces[2].values()[0], -pieces[1].values()[1]);
        }
    }
}
