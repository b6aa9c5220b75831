use std::ops::Range;

use wicket_core::num::{self, Int, Sign};
use wicket_core::IndexSet;

use crate::Cone;
use crate::WicketError;
use crate::dd::order::{SelectionRule, SlackCounts};
use crate::error::OrOverflow;

/// Contiguous slack-sign groups produced by [`RayState::partition_by_slack`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Partition {
    pub positive: Range<usize>,
    pub zero: Range<usize>,
    pub negative: Range<usize>,
}

/// Generators of the current cone, their supports and the lineality basis.
///
/// `rays[i]`, `supports[i]` and `slacks[i]` always describe the same generator; every
/// reordering goes through [`RayState::swap`].
#[derive(Clone, Debug)]
pub struct RayState<T, S> {
    rays: Vec<Vec<T>>,
    supports: Vec<S>,
    slacks: Vec<T>,
    subspace: Vec<Vec<T>>,
    cons: usize,
}

impl<T: Int, S: IndexSet> RayState<T, S> {
    /// No rays yet; `subspace` spans the ambient space.
    pub fn new(cons: usize, subspace: Vec<Vec<T>>) -> Self {
        Self {
            rays: Vec::new(),
            supports: Vec::new(),
            slacks: Vec::new(),
            subspace,
            cons,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rays.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    #[inline]
    pub fn rays(&self) -> &[Vec<T>] {
        &self.rays
    }

    #[inline]
    pub fn supports(&self) -> &[S] {
        &self.supports
    }

    /// Slack of every generator on the constraint of the last partition.
    #[inline]
    pub fn slacks(&self) -> &[T] {
        &self.slacks
    }

    #[inline]
    pub fn subspace(&self) -> &[Vec<T>] {
        &self.subspace
    }

    #[inline]
    pub fn lineality_dim(&self) -> usize {
        self.subspace.len()
    }

    #[inline(always)]
    fn swap(&mut self, a: usize, b: usize) {
        self.rays.swap(a, b);
        self.supports.swap(a, b);
        self.slacks.swap(a, b);
    }

    pub fn slack_counts(&self, cone: &Cone<T>, c: usize) -> Result<SlackCounts, WicketError> {
        let mut counts = SlackCounts::default();
        for ray in &self.rays {
            match cone.slack(ray, c)?.sign() {
                Sign::Positive => counts.positive += 1,
                Sign::Negative => counts.negative += 1,
                Sign::Zero => counts.zero += 1,
            }
        }
        Ok(counts)
    }

    /// Picks the next constraint among `remaining`; `None` only when `remaining` is empty.
    pub fn next_constraint<R: SelectionRule>(
        &self,
        cone: &Cone<T>,
        rule: &R,
        remaining: &S,
    ) -> Result<Option<usize>, WicketError> {
        if !rule.needs_counts() {
            return Ok(remaining.iter().next());
        }
        let mut candidates = Vec::new();
        for c in remaining.iter() {
            candidates.push((c, self.slack_counts(cone, c)?));
        }
        Ok(rule.select(candidates))
    }

    /// First lineality vector with a non-zero slack on `c`.
    pub fn pivot_candidate(&self, cone: &Cone<T>, c: usize) -> Result<Option<usize>, WicketError> {
        for (i, s) in self.subspace.iter().enumerate() {
            if !cone.slack(s, c)?.is_zero() {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Turns a lineality direction that is not tight on `c` into a ray.
    ///
    /// The chosen vector `s` is oriented to positive slack and eliminated from every other
    /// lineality vector and every ray (`v ← s_c·v − v_c·s`), so all of them become tight on `c`
    /// while keeping their slacks on processed constraints. `s` joins the rays with support `{c}`.
    pub fn pivot(&mut self, cone: &Cone<T>, c: usize) -> Result<bool, WicketError> {
        let Some(p) = self.pivot_candidate(cone, c)? else {
            return Ok(false);
        };
        let mut s = self.subspace.remove(p);
        let mut sc = cone.slack(&s, c)?;
        if sc.is_negative() {
            num::negate_in_place(&mut s).or_overflow(T::NAME, "orienting a lineality vector")?;
            sc = sc.checked_neg().or_overflow(T::NAME, "orienting a lineality vector")?;
        }
        for v in self.subspace.iter_mut().chain(self.rays.iter_mut()) {
            let vc = cone.slack(v, c)?;
            if vc.is_zero() {
                continue;
            }
            let mut out = num::combine(&sc, v, &vc, &s).or_overflow(T::NAME, "eliminating a lineality vector")?;
            num::make_primitive(&mut out).or_overflow(T::NAME, "eliminating a lineality vector")?;
            *v = out;
        }
        self.rays.push(s);
        self.supports.push(S::from_indices(self.cons, [c]));
        self.slacks.push(sc);
        Ok(true)
    }

    /// Reorders generators into `[positive | zero | negative]` slack on `c`.
    pub fn partition_by_slack(&mut self, cone: &Cone<T>, c: usize) -> Result<Partition, WicketError> {
        self.slacks.clear();
        for ray in &self.rays {
            self.slacks.push(cone.slack(ray, c)?);
        }
        let (mut lo, mut mid, mut hi) = (0, 0, self.rays.len());
        while mid < hi {
            match self.slacks[mid].sign() {
                Sign::Positive => {
                    self.swap(lo, mid);
                    lo += 1;
                    mid += 1;
                }
                Sign::Zero => mid += 1,
                Sign::Negative => {
                    hi -= 1;
                    self.swap(mid, hi);
                }
            }
        }
        Ok(Partition {
            positive: 0..lo,
            zero: lo..hi,
            negative: hi..self.rays.len(),
        })
    }

    /// Moves generators satisfying `pred` to the front of `range`; returns `(matching, rest)`.
    fn partition_range(
        &mut self,
        range: Range<usize>,
        mut pred: impl FnMut(&S) -> bool,
    ) -> (Range<usize>, Range<usize>) {
        let mut split = range.start;
        for i in range.clone() {
            if pred(&self.supports[i]) {
                self.swap(split, i);
                split += 1;
            }
        }
        (range.start..split, split..range.end)
    }

    /// Splits `range` into generators whose support misses `circuit_mask` (rays) and those
    /// touching it (circuits).
    pub fn partition_by_ray_mask(
        &mut self,
        range: Range<usize>,
        circuit_mask: &S,
    ) -> (Range<usize>, Range<usize>) {
        self.partition_range(range, |s| s.is_disjoint(circuit_mask))
    }

    /// Splits `range` into supports with exactly `count` members and the rest.
    pub fn partition_by_count(&mut self, range: Range<usize>, count: usize) -> (Range<usize>, Range<usize>) {
        self.partition_range(range, |s| s.count() == count)
    }

    pub fn update_supports(&mut self, c: usize, range: Range<usize>) {
        for support in &mut self.supports[range] {
            support.set(c);
        }
    }

    /// Grows every support (and the width of supports created later) to `size` bits.
    ///
    /// The driver fixes the width at setup and never calls this; it serves callers that drive a
    /// `RayState` directly and append constraints between iterations.
    pub fn resize_supports(&mut self, size: usize) {
        self.cons = size;
        for support in &mut self.supports {
            support.resize(size);
        }
    }

    pub fn remove(&mut self, range: Range<usize>) {
        self.rays.drain(range.clone());
        self.supports.drain(range.clone());
        self.slacks.drain(range);
    }

    /// Appends generators that are tight on the constraint of the last partition.
    pub fn transfer(&mut self, rays: Vec<Vec<T>>, supports: Vec<S>) {
        debug_assert_eq!(rays.len(), supports.len());
        self.slacks.extend(std::iter::repeat_n(T::zero(), rays.len()));
        self.rays.extend(rays);
        self.supports.extend(supports);
    }

    pub fn into_parts(self) -> (Vec<Vec<T>>, Vec<S>, Vec<Vec<T>>) {
        (self.rays, self.supports, self.subspace)
    }
}

#[cfg(test)]
mod tests {
    use wicket_core::{BitSet, Matrix, Relation, VarSign, WordSet};

    use super::*;
    use crate::dd::ConstraintOrder;
    use crate::Problem;

    fn square_cone() -> Cone<i64> {
        // x, y ≥ 0 and x − y ≥ 0.
        let m = Matrix::from_rows(2, [vec![1i64, -1]]).unwrap();
        let p = Problem::new(m)
            .with_signs(vec![VarSign::NonNegative; 2])
            .unwrap()
            .with_relations(vec![Relation::Greater])
            .unwrap();
        Cone::lift(&p).unwrap()
    }

    fn seeded(cone: &Cone<i64>) -> RayState<i64, WordSet> {
        let mut state = RayState::new(cone.num_cons(), vec![vec![1, 0], vec![0, 1]]);
        assert!(state.pivot(cone, 0).unwrap());
        assert!(state.pivot(cone, 1).unwrap());
        state
    }

    #[test]
    fn pivots_seed_unit_rays() {
        let cone = square_cone();
        let state = seeded(&cone);
        assert_eq!(state.rays(), &[vec![1, 0], vec![0, 1]]);
        assert_eq!(state.lineality_dim(), 0);
        let supports: Vec<Vec<usize>> = state.supports().iter().map(|s| s.iter().collect()).collect();
        assert_eq!(supports, vec![vec![0], vec![1]]);
    }

    #[test]
    fn pivot_eliminates_from_rays_and_subspace() {
        let cone = square_cone();
        let mut state: RayState<i64, WordSet> = RayState::new(3, vec![vec![1, 1], vec![0, 1]]);
        assert!(state.pivot(&cone, 2).unwrap());
        // (0,1) has slack −1 on x − y, so it is flipped to (0,−1) and leaves the subspace.
        assert_eq!(state.rays(), &[vec![0, -1]]);
        assert_eq!(state.subspace(), &[vec![1, 1]]);
        assert!(!state.pivot(&cone, 2).unwrap());
    }

    #[test]
    fn three_way_partition() {
        let cone = square_cone();
        let mut state = seeded(&cone);
        state.transfer(vec![vec![1, 1], vec![2, 1]], vec![WordSet::from_indices(3, [0, 1]); 2]);
        let part = state.partition_by_slack(&cone, 2).unwrap();
        assert_eq!(part.positive.len(), 2);
        assert_eq!(part.zero.len(), 1);
        assert_eq!(part.negative, 3..4);
        for i in part.positive.clone() {
            assert!(state.slacks()[i] > 0);
            assert_eq!(cone.slack(&state.rays()[i], 2).unwrap(), state.slacks()[i]);
        }
        assert_eq!(state.rays()[3], vec![0, 1]);

        state.update_supports(2, part.positive.clone());
        state.remove(part.negative);
        assert_eq!(state.len(), 3);
        assert!(state.supports()[..2].iter().all(|s| s.contains(2)));
    }

    #[test]
    fn mask_and_count_partitions() {
        let mut state: RayState<i64, WordSet> = RayState::new(4, Vec::new());
        state.transfer(
            vec![vec![1], vec![2], vec![3]],
            vec![
                WordSet::from_indices(4, [3]),
                WordSet::from_indices(4, [0, 1]),
                WordSet::from_indices(4, [2, 3]),
            ],
        );
        let mask = WordSet::from_indices(4, [3]);
        let (rays, circuits) = state.partition_by_ray_mask(0..3, &mask);
        assert_eq!(rays, 0..1);
        assert_eq!(circuits, 1..3);
        assert_eq!(state.rays()[0], vec![2]);

        let (two, rest) = state.partition_by_count(0..3, 2);
        assert_eq!(two.len(), 2);
        assert_eq!(rest.len(), 1);
        assert_eq!(state.supports()[2].count(), 1);
    }

    #[test]
    fn resized_supports_keep_their_bits() {
        let cone = square_cone();
        let mut state: RayState<i64, BitSet> = RayState::new(3, vec![vec![1, 0], vec![0, 1]]);
        assert!(state.pivot(&cone, 0).unwrap());
        state.resize_supports(130);
        assert!(state.pivot(&cone, 1).unwrap());
        for support in state.supports() {
            assert_eq!(support.len(), 130);
        }
        assert!(state.supports()[0].contains(0));
        assert!(!state.supports()[0].contains(129));
    }

    #[test]
    fn next_constraint_uses_rule() {
        let cone = square_cone();
        let mut state = seeded(&cone);
        state.transfer(vec![vec![1, 1]], vec![WordSet::from_indices(3, [0, 1])]);
        let remaining = WordSet::from_indices(3, [2]);
        for order in ConstraintOrder::ALL {
            assert_eq!(state.next_constraint(&cone, &order, &remaining).unwrap(), Some(2));
        }
        assert_eq!(
            state.slack_counts(&cone, 2).unwrap(),
            SlackCounts {
                positive: 1,
                negative: 1,
                zero: 1
            }
        );
        assert_eq!(
            state
                .next_constraint(&cone, &ConstraintOrder::MinIndex, &WordSet::new(3))
                .unwrap(),
            None
        );
    }
}
