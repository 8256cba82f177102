//! Connector slot definitions and candidate value generation.
//!
//! A resolved connector is a nonzero signed integer: the magnitude picks the
//! connector kind, the sign picks key versus socket. Two connectors mate only
//! if their values sum to zero. At the template level a slot is either a named
//! value slot, which ranges over every candidate value, or a mirror slot,
//! which always carries the negation of the named value slot it shadows.

use std::fmt;

use rand::Rng;

/// Position of one slot inside a template: piece index, then slot index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotAddr {
    pub piece: usize,
    pub slot: usize,
}

/// A template-level slot: undetermined, but structurally constrained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotSpec {
    /// A named connector position that will receive a candidate value.
    Value(String),
    /// A connector that always equals the negation of the named value slot.
    Mirror(String),
}

impl SlotSpec {
    pub fn value(name: &str) -> Self {
        SlotSpec::Value(name.to_owned())
    }

    pub fn mirror(name: &str) -> Self {
        SlotSpec::Mirror(name.to_owned())
    }

    pub fn name(&self) -> &str {
        match self {
            SlotSpec::Value(name) | SlotSpec::Mirror(name) => name,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, SlotSpec::Value(_))
    }
}

impl fmt::Display for SlotSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotSpec::Value(name) => write!(f, "{name}"),
            SlotSpec::Mirror(name) => write!(f, "*{name}"),
        }
    }
}

/// One slot of a partially resolved piece: either a committed value or a
/// marker deferring to the value slot it mirrors.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Partial {
    Value(i32),
    Mirror(SlotAddr),
}

/// The candidate value at `index` within the ascending sequence for `kind`.
///
/// Indices `0..kind` map to `-kind..=-1`, indices `kind..2*kind` to
/// `1..=kind`; zero is reserved to mean "unassigned" and never produced.
pub(crate) fn value_at(kind: i32, index: usize) -> i32 {
    debug_assert!(kind >= 1 && index < candidate_count(kind));
    let offset = index as i32 - kind;
    if offset < 0 {
        offset
    } else {
        offset + 1
    }
}

/// Number of candidate values for a value slot: `2 * kind`.
pub fn candidate_count(kind: i32) -> usize {
    assert!(kind >= 1, "connector kind bound must be at least 1");
    2 * kind as usize
}

/// Lazy ascending sequence of every candidate value for `kind`.
pub fn candidates(kind: i32) -> impl Iterator<Item = i32> {
    (0..candidate_count(kind)).map(move |index| value_at(kind, index))
}

/// One uniform draw from the candidate values for `kind`.
pub fn random_value<R: Rng>(kind: i32, rng: &mut R) -> i32 {
    value_at(kind, rng.gen_range(0..candidate_count(kind)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn candidates_are_ascending_and_skip_zero() {
        assert_eq!(candidates(2).collect::<Vec<_>>(), vec![-2, -1, 1, 2]);
        assert_eq!(candidates(1).collect::<Vec<_>>(), vec![-1, 1]);
    }

    #[test]
    fn candidate_count_matches_sequence_length() {
        for kind in 1..=5 {
            assert_eq!(candidates(kind).count(), candidate_count(kind));
        }
    }

    #[test]
    fn random_values_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let value = random_value(3, &mut rng);
            assert!(value != 0 && value.abs() <= 3, "out of range: {value}");
        }
    }

    #[test]
    fn mirror_slots_render_with_marker_prefix() {
        assert_eq!(SlotSpec::value("a").to_string(), "a");
        assert_eq!(SlotSpec::mirror("b").to_string(), "*b");
    }
}
