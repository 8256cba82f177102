//! Built-in puzzle shapes.
//!
//! Each shape fixes a topology: which connector slot of which piece must
//! mate with which slot of another piece. Connector values stay open; the
//! search strategies choose them.

use crate::pieces::PieceSpec;
use crate::slots::SlotSpec;
use crate::template::Template;
use crate::SearchOps;

/// A two-slot piece turned end for end.
const FLIP: [usize; 2] = [1, 0];

/// Rotations of a three-slot piece.
const TURN: [usize; 3] = [1, 2, 0];
const TURN_BACK: [usize; 3] = [2, 0, 1];

/// Shape names accepted by [`by_name`].
pub const SHAPE_NAMES: [&str; 3] = ["chain3", "ring4", "star4"];

/// Resolves a shape name for the CLI.
pub fn by_name(name: &str) -> Option<Box<dyn SearchOps>> {
    match name {
        "chain3" => Some(Box::new(chain3())),
        "ring4" => Some(Box::new(ring4())),
        "star4" => Some(Box::new(star4())),
        _ => None,
    }
}

/// Three flippable pieces in a line: `[a b] [*b c] [*c d]`.
pub fn chain3() -> Template<2, 3> {
    Template::new([
        PieceSpec::new([SlotSpec::value("a"), SlotSpec::value("b")], vec![FLIP]),
        PieceSpec::new([SlotSpec::mirror("b"), SlotSpec::value("c")], vec![FLIP]),
        PieceSpec::new([SlotSpec::mirror("c"), SlotSpec::value("d")], vec![FLIP]),
    ])
}

/// Four flippable pieces in a closed cycle.
pub fn ring4() -> Template<2, 4> {
    Template::new([
        PieceSpec::new([SlotSpec::value("a"), SlotSpec::value("b")], vec![FLIP]),
        PieceSpec::new([SlotSpec::mirror("b"), SlotSpec::value("c")], vec![FLIP]),
        PieceSpec::new([SlotSpec::mirror("c"), SlotSpec::value("d")], vec![FLIP]),
        PieceSpec::new([SlotSpec::mirror("d"), SlotSpec::mirror("a")], vec![FLIP]),
    ])
}

/// A rotatable three-slot hub with three leaves.
///
/// Each leaf mates one slot with the hub and leaves two connectors free;
/// free connectors never mate in a valid assembly but feed near misses.
pub fn star4() -> Template<3, 4> {
    Template::new([
        PieceSpec::new(
            [
                SlotSpec::value("a"),
                SlotSpec::value("b"),
                SlotSpec::value("c"),
            ],
            vec![TURN, TURN_BACK],
        ),
        PieceSpec::new(
            [
                SlotSpec::mirror("a"),
                SlotSpec::value("d"),
                SlotSpec::value("e"),
            ],
            vec![TURN, TURN_BACK],
        ),
        PieceSpec::new(
            [
                SlotSpec::mirror("b"),
                SlotSpec::value("f"),
                SlotSpec::value("g"),
            ],
            vec![TURN, TURN_BACK],
        ),
        PieceSpec::new(
            [
                SlotSpec::mirror("c"),
                SlotSpec::value("h"),
                SlotSpec::value("i"),
            ],
            vec![TURN, TURN_BACK],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_renders_with_mirror_markers() {
        insta::assert_snapshot!(chain3().to_string(), @"[a b] [*b c] [*c d]");
        insta::assert_snapshot!(chain3().one_solution().to_string(), @"[1 2] [-2 3] [-3 4]");
    }

    #[test]
    fn ring_renders_with_mirror_markers() {
        insta::assert_snapshot!(ring4().to_string(), @"[a b] [*b c] [*c d] [*d *a]");
        insta::assert_snapshot!(ring4().one_solution().to_string(), @"[1 2] [-2 3] [-3 4] [-4 -1]");
    }

    #[test]
    fn star_renders_with_mirror_markers() {
        insta::assert_snapshot!(star4().to_string(), @"[a b c] [*a d e] [*b f g] [*c h i]");
        insta::assert_snapshot!(
            star4().one_solution().to_string(),
            @"[1 2 3] [-1 4 5] [-2 6 7] [-3 8 9]"
        );
    }

    #[test]
    fn star_symmetry_counts_hub_rotations() {
        assert_eq!(star4().symmetry(), 3);
    }

    #[test]
    fn every_published_shape_resolves() {
        for name in SHAPE_NAMES {
            assert!(by_name(name).is_some(), "unresolvable shape {name}");
        }
        assert!(by_name("dodecahedron").is_none());
    }
}
