//! Puzzle templates: structure without committed connector values.
//!
//! A template owns an ordered fixed-size list of pieces and the connector
//! link graph derived from their mirror slots. It can enumerate every
//! instance exhaustively, draw one at random, or produce the canonical
//! one-solution instance used to measure the shape's structural symmetry.

use std::fmt;

use rand::Rng;
use rustc_hash::FxHashMap;

use crate::instance::Instance;
use crate::pieces::{PieceRows, PieceSpec};
use crate::slots::{self, Partial, SlotAddr, SlotSpec};

/// One end of a connector link: this piece's slot and the far end's address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub slot: usize,
    pub to: SlotAddr,
}

/// Puzzle template with compile-time slot and piece counts.
#[derive(Debug)]
pub struct Template<const SLOTS: usize, const PIECES: usize> {
    pieces: [PieceSpec<SLOTS>; PIECES],
    /// Mirror target per slot, `None` for value slots.
    targets: [[Option<SlotAddr>; SLOTS]; PIECES],
    /// Every link touching each piece, both directions.
    links: [Vec<Link>; PIECES],
    /// Links whose far end lies strictly earlier in traversal order.
    back_links: [Vec<Link>; PIECES],
    /// Addresses of all value slots, in traversal order.
    value_slots: Vec<SlotAddr>,
}

impl<const SLOTS: usize, const PIECES: usize> Template<SLOTS, PIECES> {
    /// Assembles a template and derives its link graph.
    ///
    /// Panics on authoring errors: duplicate value slot names, mirrors
    /// naming unknown slots, or mirrors reaching forward to a later piece.
    pub fn new(pieces: [PieceSpec<SLOTS>; PIECES]) -> Self {
        assert!(PIECES <= 32, "piece count must be <= 32 (u32 bitmask)");

        let mut by_name: FxHashMap<String, SlotAddr> = FxHashMap::default();
        let mut value_slots = Vec::new();
        for (p, piece) in pieces.iter().enumerate() {
            for (s, spec) in piece.slots().iter().enumerate() {
                if let SlotSpec::Value(name) = spec {
                    let addr = SlotAddr { piece: p, slot: s };
                    let previous = by_name.insert(name.clone(), addr);
                    assert!(previous.is_none(), "duplicate value slot name `{name}`");
                    value_slots.push(addr);
                }
            }
        }

        let mut targets = [[None; SLOTS]; PIECES];
        let mut links: [Vec<Link>; PIECES] = std::array::from_fn(|_| Vec::new());
        for (p, piece) in pieces.iter().enumerate() {
            for (s, spec) in piece.slots().iter().enumerate() {
                let SlotSpec::Mirror(name) = spec else {
                    continue;
                };
                let target = *by_name.get(name).unwrap_or_else(|| {
                    panic!("mirror slot ({p}, {s}) names unknown value slot `{name}`")
                });
                assert!(
                    target.piece <= p,
                    "mirror slot ({p}, {s}) must name a value slot on the same or an earlier piece"
                );
                targets[p][s] = Some(target);
                links[p].push(Link { slot: s, to: target });
                links[target.piece].push(Link {
                    slot: target.slot,
                    to: SlotAddr { piece: p, slot: s },
                });
            }
        }

        // keep the side of each link whose far end is earlier; this covers
        // every link exactly once as positions are filled in order,
        // including links between two slots of the same piece
        let back_links = std::array::from_fn(|p| {
            links[p]
                .iter()
                .copied()
                .filter(|link| {
                    link.to.piece < p || (link.to.piece == p && link.to.slot < link.slot)
                })
                .collect()
        });

        Self {
            pieces,
            targets,
            links,
            back_links,
            value_slots,
        }
    }

    pub fn pieces(&self) -> &[PieceSpec<SLOTS>; PIECES] {
        &self.pieces
    }

    /// Every link touching `piece`, in mirror traversal order.
    pub fn links(&self, piece: usize) -> &[Link] {
        &self.links[piece]
    }

    /// The subset of `piece`'s links pointing at earlier traversal positions.
    pub fn back_links(&self, piece: usize) -> &[Link] {
        &self.back_links[piece]
    }

    /// Addresses of every value slot, in traversal order.
    pub fn value_slots(&self) -> &[SlotAddr] {
        &self.value_slots
    }

    /// Lazily enumerates every instance for the given kind bound.
    ///
    /// The search space has `(2 * kind) ^ value_slots` combinations; mirrors
    /// follow their value slots. Each call starts a fresh traversal.
    pub fn all(&self, kind: i32) -> AllInstances<'_, SLOTS, PIECES> {
        AllInstances::new(self, kind)
    }

    /// Resolves one instance with uniformly drawn connector values.
    pub fn random<R: Rng>(&self, kind: i32, rng: &mut R) -> Instance<'_, SLOTS, PIECES> {
        let mut grid = [[0i32; SLOTS]; PIECES];
        for addr in &self.value_slots {
            grid[addr.piece][addr.slot] = slots::random_value(kind, rng);
        }
        self.resolve_values(grid)
    }

    /// The canonical instance with one guaranteed assembly.
    ///
    /// Value slots receive unique ascending positive integers in traversal
    /// order, so the identity assembly is valid and any further valid
    /// assembly reflects a structural symmetry of the shape itself.
    pub fn one_solution(&self) -> Instance<'_, SLOTS, PIECES> {
        let mut grid = [[0i32; SLOTS]; PIECES];
        for (index, addr) in self.value_slots.iter().enumerate() {
            grid[addr.piece][addr.slot] = index as i32 + 1;
        }
        self.resolve_values(grid)
    }

    /// Number of valid assemblies inherent to the shape.
    ///
    /// Raw difficulty counts are divided by this constant when reported, so
    /// scores measure structurally distinct solutions.
    pub fn symmetry(&self) -> u64 {
        self.one_solution().count_assemblies(None).valid
    }

    /// Fills mirror slots from a grid whose value slots are assigned.
    ///
    /// The grid is the binding context of one resolution pass; zero means
    /// unassigned. Panics if a mirror's target was never assigned.
    pub(crate) fn resolve_values(
        &self,
        mut grid: [[i32; SLOTS]; PIECES],
    ) -> Instance<'_, SLOTS, PIECES> {
        for p in 0..PIECES {
            for s in 0..SLOTS {
                match self.targets[p][s] {
                    Some(to) => {
                        let value = grid[to.piece][to.slot];
                        assert!(
                            value != 0,
                            "mirror slot ({p}, {s}) resolved against unassigned value slot ({}, {})",
                            to.piece,
                            to.slot
                        );
                        grid[p][s] = -value;
                    }
                    None => {
                        assert!(grid[p][s] != 0, "value slot ({p}, {s}) left unassigned");
                    }
                }
            }
        }
        Instance::new(self, grid)
    }

    fn resolve_rows(&self, rows: &[[Partial; SLOTS]]) -> Instance<'_, SLOTS, PIECES> {
        let mut grid = [[0i32; SLOTS]; PIECES];
        for (p, row) in rows.iter().enumerate() {
            for (s, partial) in row.iter().enumerate() {
                if let Partial::Value(value) = partial {
                    grid[p][s] = *value;
                }
            }
        }
        self.resolve_values(grid)
    }
}

impl<const SLOTS: usize, const PIECES: usize> fmt::Display for Template<SLOTS, PIECES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (p, piece) in self.pieces.iter().enumerate() {
            if p > 0 {
                write!(f, " ")?;
            }
            write!(f, "[")?;
            for (s, spec) in piece.slots().iter().enumerate() {
                if s > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{spec}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// Lazy exhaustive enumeration of a template's instances.
///
/// Composes each piece's row enumeration in piece order, the first piece
/// varying slowest, and resolves every full combination into an instance.
pub struct AllInstances<'t, const SLOTS: usize, const PIECES: usize> {
    template: &'t Template<SLOTS, PIECES>,
    kind: i32,
    rows: Vec<PieceRows<'t, SLOTS>>,
    current: Vec<[Partial; SLOTS]>,
    started: bool,
    done: bool,
}

impl<'t, const SLOTS: usize, const PIECES: usize> AllInstances<'t, SLOTS, PIECES> {
    fn new(template: &'t Template<SLOTS, PIECES>, kind: i32) -> Self {
        let mut rows: Vec<PieceRows<'t, SLOTS>> = (0..PIECES)
            .map(|p| PieceRows::new(&template.pieces[p], template.targets[p], kind))
            .collect();
        let current = rows
            .iter_mut()
            .map(|piece_rows| piece_rows.next().expect("piece enumeration is never empty"))
            .collect();
        Self {
            template,
            kind,
            rows,
            current,
            started: false,
            done: false,
        }
    }

    /// Steps the last piece; on wrap-around, restarts it and carries left.
    fn advance(&mut self) -> bool {
        let mut p = PIECES;
        loop {
            if p == 0 {
                return false;
            }
            p -= 1;
            if let Some(row) = self.rows[p].next() {
                self.current[p] = row;
                return true;
            }
            self.rows[p] =
                PieceRows::new(&self.template.pieces[p], self.template.targets[p], self.kind);
            self.current[p] = self.rows[p]
                .next()
                .expect("piece enumeration is never empty");
        }
    }
}

impl<'t, const SLOTS: usize, const PIECES: usize> Iterator for AllInstances<'t, SLOTS, PIECES> {
    type Item = Instance<'t, SLOTS, PIECES>;

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
        Some(self.template.resolve_rows(&self.current))
    }
}
