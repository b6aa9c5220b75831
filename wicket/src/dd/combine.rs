use std::ops::Range;

use wicket_core::num::{self, Int};
use wicket_core::IndexSet;

use crate::Cone;
use crate::WicketError;
use crate::dd::index::SupportTree;
use crate::error::OrOverflow;

/// Generators produced from one chunk of the positive range.
#[derive(Debug)]
pub(crate) struct ChunkOutput<T, S> {
    pub(crate) rays: Vec<Vec<T>>,
    pub(crate) supports: Vec<S>,
    pub(crate) pairs_tested: usize,
    pub(crate) face_tests: usize,
}

impl<T, S> Default for ChunkOutput<T, S> {
    fn default() -> Self {
        Self {
            rays: Vec::new(),
            supports: Vec::new(),
            pairs_tested: 0,
            face_tests: 0,
        }
    }
}

/// Read-only view of one iteration, shared by every worker.
///
/// The negative range is laid out as `[simple | other]`: a simple generator has exactly
/// `budget − 1` non-tight constraints, the most an extreme ray can have.
pub(crate) struct Combiner<'a, T, S> {
    pub(crate) cone: &'a Cone<T>,
    pub(crate) rays: &'a [Vec<T>],
    pub(crate) supports: &'a [S],
    pub(crate) slacks: &'a [T],
    pub(crate) tree: Option<&'a SupportTree<'a, S>>,
    /// Unprocessed and free constraints; never tight for the face test.
    pub(crate) inactive: &'a S,
    pub(crate) no_zeros: &'a S,
    pub(crate) simple: Range<usize>,
    pub(crate) other: Range<usize>,
    pub(crate) budget: usize,
    pub(crate) face_dim: usize,
}

impl<T: Int, S: IndexSet> Combiner<'_, T, S> {
    #[inline]
    fn negative(&self) -> Range<usize> {
        self.simple.start..self.other.end
    }

    #[inline]
    fn is_simple(&self, support: &S) -> bool {
        support.count() + 1 == self.budget
    }

    /// `s1·r2 − s2·r1` with `s1 > 0 > s2`, tight on the current constraint.
    fn emit(&self, out: &mut ChunkOutput<T, S>, r1: usize, r2: usize) -> Result<(), WicketError> {
        let s1 = &self.slacks[r1];
        let s2 = &self.slacks[r2];
        debug_assert!(s1.is_positive() && s2.is_negative());
        let mut ray = num::combine(s1, &self.rays[r2], s2, &self.rays[r1])
            .or_overflow(T::NAME, "combining adjacent generators")?;
        num::make_primitive(&mut ray).or_overflow(T::NAME, "combining adjacent generators")?;
        out.rays.push(ray);
        out.supports.push(self.supports[r1].union(&self.supports[r2]));
        Ok(())
    }

    fn face_test(&self, out: &mut ChunkOutput<T, S>, union: &mut S) -> Result<bool, WicketError> {
        out.face_tests += 1;
        union.union_inplace(self.inactive);
        self.cone.is_d_dimensional_face(union, self.face_dim)
    }

    /// Emits the combination of every adjacent pair `(r1, r2)` with `r1` in `outer`.
    pub(crate) fn run(&self, outer: Range<usize>) -> Result<ChunkOutput<T, S>, WicketError> {
        let mut out = ChunkOutput::default();
        for r1 in outer {
            let n1 = &self.supports[r1];
            if self.is_simple(n1) {
                self.simple_partners(&mut out, r1)?;
            } else {
                for r2 in self.simple.clone() {
                    out.pairs_tested += 1;
                    if n1.singleton_diff(&self.supports[r2]) {
                        self.emit(&mut out, r1, r2)?;
                    }
                }
                match self.tree {
                    Some(tree) => self.tree_partners(&mut out, tree, r1)?,
                    None => self.matrix_partners(&mut out, r1)?,
                }
            }
        }
        Ok(out)
    }

    /// For a simple `r1`, `r2` is adjacent iff `N2 \ N1` is a singleton.
    fn simple_partners(&self, out: &mut ChunkOutput<T, S>, r1: usize) -> Result<(), WicketError> {
        let n1 = &self.supports[r1];
        let negative = self.negative();
        match self.tree {
            Some(tree) => {
                for r2 in tree.find_singleton_diff(n1) {
                    if negative.contains(&r2) {
                        out.pairs_tested += 1;
                        self.emit(out, r1, r2)?;
                    }
                }
            }
            None => {
                for r2 in negative {
                    out.pairs_tested += 1;
                    if self.supports[r2].singleton_diff(n1) {
                        self.emit(out, r1, r2)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn tree_partners(
        &self,
        out: &mut ChunkOutput<T, S>,
        tree: &SupportTree<'_, S>,
        r1: usize,
    ) -> Result<(), WicketError> {
        let n1 = &self.supports[r1];
        for r2 in tree.find_singleton_diff(n1) {
            if self.other.contains(&r2) {
                out.pairs_tested += 1;
                self.emit(out, r1, r2)?;
            }
        }
        for r2 in tree.find(self.no_zeros, n1, self.budget) {
            if !self.other.contains(&r2) {
                continue;
            }
            let n2 = &self.supports[r2];
            if n2.singleton_diff(n1) {
                continue;
            }
            out.pairs_tested += 1;
            if n1.singleton_diff(n2) {
                self.emit(out, r1, r2)?;
                continue;
            }
            let mut union = n1.union(n2);
            if tree.dominated(&union, r1, r2) {
                continue;
            }
            if self.face_test(out, &mut union)? {
                self.emit(out, r1, r2)?;
            }
        }
        Ok(())
    }

    fn matrix_partners(&self, out: &mut ChunkOutput<T, S>, r1: usize) -> Result<(), WicketError> {
        let n1 = &self.supports[r1];
        for r2 in self.other.clone() {
            out.pairs_tested += 1;
            let n2 = &self.supports[r2];
            if n1.count_union(n2) > self.budget {
                continue;
            }
            if n2.singleton_diff(n1) || n1.singleton_diff(n2) {
                self.emit(out, r1, r2)?;
                continue;
            }
            let mut union = n1.union(n2);
            if self.face_test(out, &mut union)? {
                self.emit(out, r1, r2)?;
            }
        }
        Ok(())
    }
}
