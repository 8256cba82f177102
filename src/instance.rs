//! Resolved puzzle instances and assembly counting.
//!
//! An instance commits every connector value of its template. Its difficulty
//! is measured by counting assemblies: assignments of the pieces to the
//! template's structural positions, one arrangement per placed piece. An
//! assembly is valid when every link mates (the two slot values sum to
//! zero) and a near miss when it falls short by a bounded number of links.
//!
//! Counting optimizations, in the spirit of the placement solver this engine
//! grew from:
//! - piece availability tracked in a u32 bitmask
//! - positions filled in index order so only backward links need checking
//! - partial assemblies pruned as soon as they exceed the near-miss slack
//! - optional cutoff to abandon instances that cannot beat the current best

use std::fmt;

use crate::pieces::ResolvedPiece;
use crate::template::Template;

/// Broken-link budget separating a near miss from a discarded assembly.
///
/// An assembly counts as "almost" valid when exactly this many connector
/// pairs fail to mate; anything looser is pruned during traversal.
const NEAR_MISS_SLACK: u32 = 1;

/// Difficulty score of one instance: raw assembly counts.
///
/// Both counts include every structural symmetry of the template uniformly;
/// the reporting boundary divides by the symmetry constant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssemblyCount {
    /// Assemblies satisfying every link.
    pub valid: u64,
    /// Assemblies within the near-miss slack.
    pub almost: u64,
}

/// A template with every slot resolved to a concrete value.
#[derive(Clone, Debug)]
pub struct Instance<'t, const SLOTS: usize, const PIECES: usize> {
    template: &'t Template<SLOTS, PIECES>,
    pieces: [ResolvedPiece<SLOTS>; PIECES],
}

impl<'t, const SLOTS: usize, const PIECES: usize> Instance<'t, SLOTS, PIECES> {
    pub(crate) fn new(template: &'t Template<SLOTS, PIECES>, grid: [[i32; SLOTS]; PIECES]) -> Self {
        let pieces =
            std::array::from_fn(|p| ResolvedPiece::new(grid[p], &template.pieces()[p]));
        Self { template, pieces }
    }

    /// The template this instance was resolved from.
    pub fn template(&self) -> &'t Template<SLOTS, PIECES> {
        self.template
    }

    pub fn pieces(&self) -> &[ResolvedPiece<SLOTS>; PIECES] {
        &self.pieces
    }

    /// Counts valid and near-miss assemblies of this instance.
    ///
    /// With a cutoff (the best known valid count), the traversal stops as
    /// soon as `valid` exceeds it and returns the partial tally: such an
    /// instance cannot be harder than the current best, and the comparator
    /// rejects it on the valid count alone. `valid` only ever increments
    /// during traversal, so the early exit never under-rejects.
    pub fn count_assemblies(&self, cutoff: Option<u64>) -> AssemblyCount {
        let mut count = AssemblyCount::default();
        let mut placed = [[0i32; SLOTS]; PIECES];
        self.place(0, 0, 0, &mut placed, &mut count, cutoff);
        count
    }

    /// Fills `position` with every unused piece and arrangement, checking
    /// the links that point backward from this position. Returns false to
    /// abandon the whole traversal once the cutoff is exceeded.
    fn place(
        &self,
        position: usize,
        used: u32,
        broken: u32,
        placed: &mut [[i32; SLOTS]; PIECES],
        count: &mut AssemblyCount,
        cutoff: Option<u64>,
    ) -> bool {
        if position == PIECES {
            if broken == 0 {
                count.valid += 1;
                if let Some(limit) = cutoff {
                    if count.valid > limit {
                        return false;
                    }
                }
            } else {
                count.almost += 1;
            }
            return true;
        }

        for piece in 0..PIECES {
            if used & (1 << piece) != 0 {
                continue;
            }
            'arrangements: for arrangement in self.pieces[piece].arrangements() {
                let mut broken_here = broken;
                for link in self.template.back_links(position) {
                    // a link back into this same position reads the
                    // candidate arrangement, not an earlier placement
                    let far = if link.to.piece == position {
                        arrangement[link.to.slot]
                    } else {
                        placed[link.to.piece][link.to.slot]
                    };
                    if arrangement[link.slot] + far != 0 {
                        broken_here += 1;
                        if broken_here > NEAR_MISS_SLACK {
                            continue 'arrangements;
                        }
                    }
                }
                placed[position] = *arrangement;
                let keep_going = self.place(
                    position + 1,
                    used | (1 << piece),
                    broken_here,
                    placed,
                    count,
                    cutoff,
                );
                if !keep_going {
                    return false;
                }
            }
        }
        true
    }
}

impl<const SLOTS: usize, const PIECES: usize> fmt::Display for Instance<'_, SLOTS, PIECES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (p, piece) in self.pieces.iter().enumerate() {
            if p > 0 {
                write!(f, " ")?;
            }
            write!(f, "[")?;
            for (s, value) in piece.values().iter().enumerate() {
                if s > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{value}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{chain3, ring4};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    // The canonical chain instance [1 2] [-2 3] [-3 4]: three pieces, each
    // flippable, gives 3! * 2^3 = 48 assemblies. Exactly two are valid (the
    // identity and the end-for-end reversal) and, with the near-miss slack
    // of one broken link, twelve mate on one of the two links only.
    #[test]
    fn near_miss_slack_is_one_broken_link() {
        let template = chain3();
        let count = template.one_solution().count_assemblies(None);
        assert_eq!(count, AssemblyCount { valid: 2, almost: 12 });
    }

    #[test]
    fn chain_symmetry_counts_both_chain_directions() {
        assert_eq!(chain3().symmetry(), 2);
    }

    #[test]
    fn ring_symmetry_counts_rotations_and_reflections() {
        assert_eq!(ring4().symmetry(), 8);
    }

    #[test]
    fn cutoff_stops_as_soon_as_the_best_is_beaten() {
        let template = chain3();
        let instance = template.one_solution();
        let count = instance.count_assemblies(Some(0));
        // the traversal stops the moment valid exceeds the cutoff
        assert_eq!(count.valid, 1);
    }

    #[test]
    fn cutoff_at_or_above_the_true_count_is_exact() {
        let template = chain3();
        let instance = template.one_solution();
        let full = instance.count_assemblies(None);
        assert_eq!(instance.count_assemblies(Some(full.valid)), full);
        assert_eq!(instance.count_assemblies(Some(u64::MAX)), full);
    }

    #[test]
    fn raw_counts_double_count_every_symmetry() {
        let template = chain3();
        let symmetry = template.symmetry();
        let mut rng = SmallRng::seed_from_u64(23);
        for _ in 0..20 {
            let count = template.random(2, &mut rng).count_assemblies(None);
            assert_eq!(count.valid % symmetry, 0, "valid not a symmetry multiple");
            assert_eq!(count.almost % symmetry, 0, "almost not a symmetry multiple");
        }
    }
}
