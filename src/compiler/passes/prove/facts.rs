//! The relational fact table.
//!
//! Tracks, for each ordered pair of values and each domain, the set of
//! orderings still possible on the current path. Facts are installed as
//! the walk descends into a branch and rolled back as it ascends, so the
//! table is backed by an append-only undo log with checkpoint markers:
//! entering a branch costs O(1) and leaving it costs only the work done
//! inside, with no per-branch map cloning.
//!
//! # Canonicalization
//!
//! Pairs are stored with the lower value ID first. A query or update
//! arriving in the other order is swapped and its relation mask reversed,
//! so `get(v, w, d)` and `get(w, v, d)` always agree up to reversal. The
//! `None` side of a pair denotes the zero value (false for booleans, zero
//! for integers, nil for pointers) and orders before every real value.

use rustc_hash::FxHashMap;

use crate::{
    compiler::passes::prove::relation::{Domain, Relation},
    ir::ValueId,
};

/// An ordered value pair tagged with the domain the relation holds in.
///
/// Invariant: `v` orders before or equal to `w` (`None` first, then by
/// value ID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Pair {
    /// Lower side; `None` is the zero value.
    v: Option<ValueId>,
    /// Upper side; `None` is the zero value.
    w: Option<ValueId>,
    /// Interpretation domain. Always a single bit.
    domain: Domain,
}

/// One entry of the undo log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Undo {
    /// Marks the state at a `checkpoint` call.
    Checkpoint,
    /// Records the mask a pair held before an update.
    Fact { pair: Pair, prior: Relation },
}

/// Returns `true` if `a` orders strictly before `b`: the zero value
/// first, then ascending value ID.
fn less_by_id(a: Option<ValueId>, b: Option<ValueId>) -> bool {
    match (a, b) {
        (None, None) | (Some(_), None) => false,
        (None, Some(_)) => true,
        (Some(a), Some(b)) => a < b,
    }
}

/// Checkpointable map from value pairs to their possible orderings.
///
/// # Examples
///
/// ```rust
/// use branchprove::compiler::{FactTable, Relation, Domain};
/// use branchprove::ir::ValueId;
///
/// let mut ft = FactTable::new();
/// let (v, w) = (Some(ValueId::new(1)), Some(ValueId::new(2)));
///
/// ft.checkpoint();
/// ft.update(v, w, Domain::SIGNED, Relation::LT);
/// assert_eq!(ft.get(v, w, Domain::SIGNED), Relation::LT);
///
/// ft.restore();
/// assert_eq!(ft.get(v, w, Domain::SIGNED), Relation::ANY);
/// ```
#[derive(Debug, Default)]
pub struct FactTable {
    /// Current known relation per canonical pair.
    facts: FxHashMap<Pair, Relation>,
    /// Undo log; grows on update, drains on restore.
    undo: Vec<Undo>,
}

impl FactTable {
    /// Creates an empty fact table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the known possible orderings between `v` and `w` in
    /// domain `d`.
    ///
    /// Defaults to [`Relation::EQ`] when both sides are the same value
    /// and [`Relation::ANY`] for pairs never updated. A `None` side
    /// denotes the zero value.
    #[must_use]
    pub fn get(&self, v: Option<ValueId>, w: Option<ValueId>, d: Domain) -> Relation {
        let (v, w, swapped) = if less_by_id(w, v) {
            (w, v, true)
        } else {
            (v, w, false)
        };

        let r = self.lookup(Pair { v, w, domain: d });
        if swapped {
            r.reverse()
        } else {
            r
        }
    }

    /// Restricts the orderings between `v` and `w` in domain `d` to `r`.
    ///
    /// The stored mask only ever shrinks: the new mask is the
    /// intersection of the prior mask with `r`. The prior mask is pushed
    /// onto the undo log so a later [`restore`](Self::restore) can
    /// reinstate it exactly, including whether the key existed at all.
    pub fn update(&mut self, v: Option<ValueId>, w: Option<ValueId>, d: Domain, r: Relation) {
        let (v, w, r) = if less_by_id(w, v) {
            (w, v, r.reverse())
        } else {
            (v, w, r)
        };

        let pair = Pair { v, w, domain: d };
        let prior = self.lookup(pair);
        self.undo.push(Undo::Fact { pair, prior });
        self.facts.insert(pair, prior & r);
    }

    /// Saves the current state. Called when descending into a branch.
    pub fn checkpoint(&mut self) {
        self.undo.push(Undo::Checkpoint);
    }

    /// Rewinds to the state at the matching [`checkpoint`](Self::checkpoint).
    ///
    /// Consumes exactly one checkpoint marker. Keys whose prior mask was
    /// [`Relation::ANY`] are removed entirely so the table is bitwise
    /// identical to its pre-checkpoint state.
    ///
    /// # Panics
    ///
    /// Panics if no checkpoint is pending; restore calls must pair with
    /// checkpoints.
    pub fn restore(&mut self) {
        while let Some(entry) = self.undo.pop() {
            match entry {
                Undo::Checkpoint => return,
                Undo::Fact { pair, prior } => {
                    if prior == Relation::ANY {
                        self.facts.remove(&pair);
                    } else {
                        self.facts.insert(pair, prior);
                    }
                }
            }
        }
        panic!("restore without a matching checkpoint");
    }

    /// Returns the nesting depth of pending checkpoints.
    #[must_use]
    pub fn checkpoint_depth(&self) -> usize {
        self.undo
            .iter()
            .filter(|e| matches!(e, Undo::Checkpoint))
            .count()
    }

    /// Returns the number of stored facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns `true` if no facts are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Looks up a canonical pair, applying the defaults.
    fn lookup(&self, pair: Pair) -> Relation {
        match self.facts.get(&pair) {
            Some(&r) => r,
            None if pair.v == pair.w => Relation::EQ,
            None => Relation::ANY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> Option<ValueId> {
        Some(ValueId::new(n))
    }

    #[test]
    fn test_get_defaults() {
        let ft = FactTable::new();
        assert_eq!(ft.get(id(0), id(1), Domain::SIGNED), Relation::ANY);
        assert_eq!(ft.get(id(3), id(3), Domain::UNSIGNED), Relation::EQ);
        assert_eq!(ft.get(None, None, Domain::BOOLEAN), Relation::EQ);
        assert_eq!(ft.get(None, id(5), Domain::BOOLEAN), Relation::ANY);
    }

    #[test]
    fn test_get_is_reversal_symmetric() {
        let mut ft = FactTable::new();
        ft.update(id(1), id(2), Domain::SIGNED, Relation::LT);

        assert_eq!(ft.get(id(1), id(2), Domain::SIGNED), Relation::LT);
        assert_eq!(ft.get(id(2), id(1), Domain::SIGNED), Relation::GT);
    }

    #[test]
    fn test_update_canonicalizes_reversed_arguments() {
        let mut ft = FactTable::new();
        // "v5 > v1" arrives with the higher ID first.
        ft.update(id(5), id(1), Domain::UNSIGNED, Relation::GT);

        assert_eq!(ft.get(id(1), id(5), Domain::UNSIGNED), Relation::LT);
        assert_eq!(ft.get(id(5), id(1), Domain::UNSIGNED), Relation::GT);
    }

    #[test]
    fn test_update_intersects_with_prior() {
        let mut ft = FactTable::new();
        ft.update(id(0), id(1), Domain::SIGNED, Relation::LT | Relation::EQ);
        ft.update(id(0), id(1), Domain::SIGNED, Relation::EQ | Relation::GT);
        assert_eq!(ft.get(id(0), id(1), Domain::SIGNED), Relation::EQ);

        // A contradictory restriction leaves the empty set.
        ft.update(id(0), id(1), Domain::SIGNED, Relation::LT);
        assert!(ft.get(id(0), id(1), Domain::SIGNED).is_empty());
    }

    #[test]
    fn test_domains_are_independent() {
        let mut ft = FactTable::new();
        ft.update(id(0), id(1), Domain::UNSIGNED, Relation::LT);

        assert_eq!(ft.get(id(0), id(1), Domain::UNSIGNED), Relation::LT);
        assert_eq!(ft.get(id(0), id(1), Domain::SIGNED), Relation::ANY);
        assert_eq!(ft.get(id(0), id(1), Domain::POINTER), Relation::ANY);
    }

    #[test]
    fn test_zero_value_pairs() {
        let mut ft = FactTable::new();
        // "v7 is true": not equal to the zero boolean.
        ft.update(None, id(7), Domain::BOOLEAN, Relation::LT | Relation::GT);
        assert_eq!(
            ft.get(None, id(7), Domain::BOOLEAN),
            Relation::LT | Relation::GT
        );
        // Symmetric query.
        assert_eq!(
            ft.get(id(7), None, Domain::BOOLEAN),
            Relation::LT | Relation::GT
        );
    }

    #[test]
    fn test_checkpoint_restore_round_trip() {
        let mut ft = FactTable::new();
        ft.update(id(0), id(1), Domain::SIGNED, Relation::LT | Relation::EQ);

        ft.checkpoint();
        ft.update(id(0), id(1), Domain::SIGNED, Relation::LT);
        ft.update(id(2), id(3), Domain::UNSIGNED, Relation::GT);
        ft.update(None, id(4), Domain::BOOLEAN, Relation::EQ);
        assert_eq!(ft.get(id(0), id(1), Domain::SIGNED), Relation::LT);

        ft.restore();

        // Pre-checkpoint refinement survives; branch-local facts are gone,
        // including the keys themselves.
        assert_eq!(
            ft.get(id(0), id(1), Domain::SIGNED),
            Relation::LT | Relation::EQ
        );
        assert_eq!(ft.get(id(2), id(3), Domain::UNSIGNED), Relation::ANY);
        assert_eq!(ft.get(None, id(4), Domain::BOOLEAN), Relation::ANY);
        assert_eq!(ft.len(), 1);
    }

    #[test]
    fn test_nested_checkpoints_restore_in_lifo_order() {
        let mut ft = FactTable::new();

        ft.checkpoint();
        ft.update(id(0), id(1), Domain::SIGNED, Relation::LT);

        ft.checkpoint();
        ft.update(id(0), id(1), Domain::SIGNED, Relation::EMPTY);
        assert!(ft.get(id(0), id(1), Domain::SIGNED).is_empty());
        assert_eq!(ft.checkpoint_depth(), 2);

        ft.restore();
        assert_eq!(ft.get(id(0), id(1), Domain::SIGNED), Relation::LT);
        assert_eq!(ft.checkpoint_depth(), 1);

        ft.restore();
        assert_eq!(ft.get(id(0), id(1), Domain::SIGNED), Relation::ANY);
        assert_eq!(ft.checkpoint_depth(), 0);
        assert!(ft.is_empty());
    }

    #[test]
    fn test_self_update_is_idempotent_on_gets() {
        let mut ft = FactTable::new();
        ft.update(id(2), id(6), Domain::SIGNED, Relation::LT);

        let before = ft.get(id(2), id(6), Domain::SIGNED);
        ft.update(id(2), id(6), Domain::SIGNED, before);
        assert_eq!(ft.get(id(2), id(6), Domain::SIGNED), before);
        assert_eq!(ft.get(id(6), id(2), Domain::SIGNED), before.reverse());
    }

    #[test]
    fn test_storing_any_still_restores_key_absence() {
        let mut ft = FactTable::new();
        ft.checkpoint();
        // An update that learns nothing must still round-trip.
        ft.update(id(0), id(1), Domain::SIGNED, Relation::ANY);
        assert_eq!(ft.len(), 1);

        ft.restore();
        assert!(ft.is_empty());
        assert_eq!(ft.get(id(0), id(1), Domain::SIGNED), Relation::ANY);
    }

    #[test]
    #[should_panic(expected = "matching checkpoint")]
    fn test_restore_without_checkpoint_panics() {
        let mut ft = FactTable::new();
        ft.restore();
    }
}
