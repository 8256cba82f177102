//! Puzzle piece definitions, template-level and resolved.
//!
//! A template piece is a fixed ordered list of `SLOTS` slot specs plus the
//! slot-index permutations for its alternate physical orientations. The base
//! slot order is itself an orientation; the permutation list holds only the
//! additional ones. A resolved piece carries concrete connector values and
//! the full list of value arrangements those orientations produce.

use rustc_hash::FxHashMap;

use crate::fixed;
use crate::slots::{value_at, Partial, SlotAddr, SlotSpec};

/// Template piece with compile-time slot count.
#[derive(Clone, Debug)]
pub struct PieceSpec<const SLOTS: usize> {
    slots: [SlotSpec; SLOTS],
    turns: Vec<[usize; SLOTS]>,
}

impl<const SLOTS: usize> PieceSpec<SLOTS> {
    /// Creates a piece from its ordered slots and additional orientations.
    ///
    /// Panics if any orientation is not a permutation of `0..SLOTS`; that is
    /// a template-authoring bug, not recoverable input.
    pub fn new(slots: [SlotSpec; SLOTS], turns: Vec<[usize; SLOTS]>) -> Self {
        for turn in &turns {
            assert!(
                fixed::is_permutation(turn),
                "orientation {turn:?} is not a permutation of 0..{SLOTS}"
            );
        }
        Self { slots, turns }
    }

    pub fn slots(&self) -> &[SlotSpec; SLOTS] {
        &self.slots
    }

    pub fn turns(&self) -> &[[usize; SLOTS]] {
        &self.turns
    }

    /// Slot indices holding value slots, in slot order.
    pub(crate) fn value_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..SLOTS).filter(|&s| self.slots[s].is_value())
    }

    /// Enumerates every resolution of this piece on its own.
    ///
    /// The cross-product runs over the value slots in slot order with the
    /// first one varying slowest; each mirror resolves against the value
    /// slot it names. Panics if a mirror names a value slot the piece does
    /// not own; pieces inside a template resolve through the template
    /// instead and may reference earlier pieces.
    pub fn all(&self, kind: i32) -> impl Iterator<Item = [i32; SLOTS]> + '_ {
        let mut by_name: FxHashMap<&str, usize> = FxHashMap::default();
        for s in self.value_slots() {
            by_name.insert(self.slots[s].name(), s);
        }
        let targets = std::array::from_fn(|s| match &self.slots[s] {
            SlotSpec::Value(_) => None,
            SlotSpec::Mirror(name) => {
                let slot = *by_name
                    .get(name.as_str())
                    .unwrap_or_else(|| panic!("mirror slot names unknown value slot `{name}`"));
                Some(SlotAddr { piece: 0, slot })
            }
        });
        PieceRows::new(self, targets, kind).map(resolve_standalone)
    }
}

/// Resolves a standalone piece row; every mirror target lies in the row.
fn resolve_standalone<const SLOTS: usize>(row: [Partial; SLOTS]) -> [i32; SLOTS] {
    let mut values = [0i32; SLOTS];
    for (s, partial) in row.iter().enumerate() {
        if let Partial::Value(value) = partial {
            values[s] = *value;
        }
    }
    for (s, partial) in row.iter().enumerate() {
        if let Partial::Mirror(addr) = partial {
            let target = values[addr.slot];
            assert!(target != 0, "mirror slot {s} resolved before its value slot");
            values[s] = -target;
        }
    }
    values
}

/// Restartable cross-product over one piece's value slots.
///
/// Yields partial rows: committed values for value slots, deferred markers
/// for mirrors. Rows are independent of any binding context, so the template
/// enumeration can compose them across pieces and resolve full combinations.
pub(crate) struct PieceRows<'p, const SLOTS: usize> {
    piece: &'p PieceSpec<SLOTS>,
    targets: [Option<SlotAddr>; SLOTS],
    kind: i32,
    digits: Vec<usize>,
    started: bool,
    done: bool,
}

impl<'p, const SLOTS: usize> PieceRows<'p, SLOTS> {
    pub(crate) fn new(
        piece: &'p PieceSpec<SLOTS>,
        targets: [Option<SlotAddr>; SLOTS],
        kind: i32,
    ) -> Self {
        let digits = vec![0; piece.value_slots().count()];
        Self {
            piece,
            targets,
            kind,
            digits,
            started: false,
            done: false,
        }
    }

    fn row(&self) -> [Partial; SLOTS] {
        let mut row = [Partial::Value(0); SLOTS];
        let mut digit = 0;
        for (s, spec) in self.piece.slots.iter().enumerate() {
            row[s] = match spec {
                SlotSpec::Value(_) => {
                    let value = value_at(self.kind, self.digits[digit]);
                    digit += 1;
                    Partial::Value(value)
                }
                SlotSpec::Mirror(_) => {
                    Partial::Mirror(self.targets[s].expect("mirror slot without resolved target"))
                }
            };
        }
        row
    }

    /// Advances the digit odometer; the last value slot varies fastest.
    fn advance(&mut self) -> bool {
        let base = crate::slots::candidate_count(self.kind);
        let mut position = self.digits.len();
        loop {
            if position == 0 {
                return false;
            }
            position -= 1;
            self.digits[position] += 1;
            if self.digits[position] < base {
                return true;
            }
            self.digits[position] = 0;
        }
    }
}

impl<const SLOTS: usize> Iterator for PieceRows<'_, SLOTS> {
    type Item = [Partial; SLOTS];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
        } else if !self.advance() {
            self.done = true;
            return None;
        }
        Some(self.row())
    }
}

/// A piece with every connector value committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPiece<const SLOTS: usize> {
    values: [i32; SLOTS],
    arrangements: Vec<[i32; SLOTS]>,
}

impl<const SLOTS: usize> ResolvedPiece<SLOTS> {
    pub(crate) fn new(values: [i32; SLOTS], spec: &PieceSpec<SLOTS>) -> Self {
        let mut arrangements = Vec::with_capacity(1 + spec.turns.len());
        arrangements.push(values);
        for turn in &spec.turns {
            arrangements.push(fixed::permute(&values, turn));
        }
        Self {
            values,
            arrangements,
        }
    }

    /// Connector values in base slot order.
    pub fn values(&self) -> &[i32; SLOTS] {
        &self.values
    }

    /// Every value arrangement this piece can present, identity first.
    pub fn arrangements(&self) -> &[[i32; SLOTS]] {
        &self.arrangements
    }
}
