use tracing::{debug, info, trace};
use wicket_core::linalg;
use wicket_core::{BitSet, ConstraintType, IndexSet, Int, WordSet};

use crate::dd::combine::{ChunkOutput, Combiner};
use crate::dd::index::SupportTree;
use crate::dd::pool::WorkerPool;
use crate::dd::state::{Partition, RayState};
use crate::error::OrOverflow;
use crate::options::AdjacencyTest;
use crate::output::{self, ConeOutput, ConeStats};
use crate::{Cone, ConeOptions, Problem, WicketError};

/// Double description driver over one cone.
///
/// Each iteration selects a constraint, partitions the generators by slack sign, builds the
/// dominance index, combines adjacent pairs on the worker pool, merges the chunk buffers,
/// marks the surviving positive generators and drops the negative ones.
pub struct DoubleDescription<'a, T, S> {
    cone: &'a Cone<T>,
    options: &'a ConeOptions,
    pool: WorkerPool,
    state: RayState<T, S>,
    /// Inequality constraints not processed yet.
    remaining: S,
    /// Constraints that are neither processed nor equalities.
    inactive: S,
    circuit_mask: S,
    no_zeros: S,
    ambient_dim: usize,
    processed: usize,
    stats: ConeStats,
}

impl<'a, T: Int, S: IndexSet> DoubleDescription<'a, T, S> {
    pub fn new(cone: &'a Cone<T>, options: &'a ConeOptions) -> Result<Self, WicketError> {
        let cons = cone.num_cons();
        if cons > S::MAX_SIZE {
            return Err(WicketError::DimensionMismatch {
                what: "support width",
                expected: S::MAX_SIZE,
                found: cons,
            });
        }
        let subspace = linalg::kernel_basis(&cone.equality_system())
            .or_overflow(T::NAME, "computing the equality kernel")?;

        let mut remaining = S::new(cons);
        cone.constraint_set(ConstraintType::LowerBound, &mut remaining);
        cone.constraint_set(ConstraintType::DoubleBounded, &mut remaining);
        let mut inactive = remaining.clone();
        cone.constraint_set(ConstraintType::Free, &mut inactive);
        let mut circuit_mask = S::new(cons);
        cone.constraint_set(ConstraintType::DoubleBounded, &mut circuit_mask);

        Ok(Self {
            cone,
            options,
            pool: WorkerPool::new(options.threads())?,
            ambient_dim: subspace.len(),
            state: RayState::new(cons, subspace),
            remaining,
            inactive,
            circuit_mask,
            no_zeros: S::new(cons),
            processed: 0,
            stats: ConeStats::default(),
        })
    }

    #[inline]
    pub fn state(&self) -> &RayState<T, S> {
        &self.state
    }

    #[inline]
    pub fn stats(&self) -> &ConeStats {
        &self.stats
    }

    /// Nothing left to do: every inequality is processed, or the cone is `{0}`.
    pub fn is_done(&self) -> bool {
        self.remaining.is_empty() || (self.state.is_empty() && self.state.lineality_dim() == 0)
    }

    /// Largest `|N1 ∪ N2|` for which two extreme rays can still be adjacent.
    fn budget(&self) -> usize {
        let k = self.state.lineality_dim() as isize;
        let d = self.ambient_dim as isize;
        (self.processed as isize - (d - k - 2)).max(0) as usize
    }

    fn mark_processed(&mut self, c: usize) {
        self.remaining.unset(c);
        self.inactive.unset(c);
        self.processed += 1;
        self.stats.constraints_processed += 1;
        self.stats.peak_generators = self.stats.peak_generators.max(self.state.len());
        let log_every = self.options.log_every();
        if log_every > 0 && self.stats.constraints_processed % log_every == 0 {
            info!(
                processed = self.stats.constraints_processed,
                remaining = self.remaining.count(),
                generators = self.state.len(),
                lineality = self.state.lineality_dim(),
                "progress"
            );
        }
    }

    fn try_pivot(&mut self, c: usize) -> Result<bool, WicketError> {
        if !self.state.pivot(self.cone, c)? {
            return Ok(false);
        }
        self.stats.pivots += 1;
        self.mark_processed(c);
        trace!(constraint = c, lineality = self.state.lineality_dim(), "lineality pivot");
        Ok(true)
    }

    /// Pivots every lower-bounded column that still cuts the lineality space, in index order.
    pub fn seed(&mut self) -> Result<(), WicketError> {
        let columns: Vec<usize> = self
            .remaining
            .iter()
            .take_while(|&c| c < self.cone.num_vars())
            .collect();
        for c in columns {
            self.try_pivot(c)?;
        }
        debug!(
            rays = self.state.len(),
            lineality = self.state.lineality_dim(),
            "seeded"
        );
        Ok(())
    }

    /// Remaining constraint with a pivot, or else the ordering rule's choice.
    fn select(&self) -> Result<Option<usize>, WicketError> {
        if self.state.lineality_dim() > 0 {
            for c in self.remaining.iter() {
                if self.state.pivot_candidate(self.cone, c)?.is_some() {
                    return Ok(Some(c));
                }
            }
        }
        let order = self.options.order();
        self.state.next_constraint(self.cone, &order, &self.remaining)
    }

    /// Processes one constraint; returns `false` once there is nothing left to do.
    pub fn step(&mut self) -> Result<bool, WicketError> {
        if self.is_done() {
            return Ok(false);
        }
        let Some(c) = self.select()? else {
            return Ok(false);
        };
        if !self.try_pivot(c)? {
            self.add_constraint(c)?;
        }
        Ok(!self.is_done())
    }

    fn add_constraint(&mut self, c: usize) -> Result<(), WicketError> {
        let part = self.state.partition_by_slack(self.cone, c)?;
        debug!(
            constraint = c,
            positive = part.positive.len(),
            zero = part.zero.len(),
            negative = part.negative.len(),
            generators = self.state.len(),
            lineality = self.state.lineality_dim(),
            "adding constraint"
        );
        if part.negative.is_empty() {
            self.stats.redundant_constraints += 1;
            trace!(constraint = c, "redundant");
        } else if !part.positive.is_empty() {
            let (rays, supports) = self.combine(&part)?;
            self.stats.generators_created += rays.len();
            self.state.transfer(rays, supports);
            self.stats.peak_generators = self.stats.peak_generators.max(self.state.len());
        }
        self.state.update_supports(c, part.positive);
        self.state.remove(part.negative);
        self.mark_processed(c);
        Ok(())
    }

    /// Combines every adjacent (positive, negative) pair; returns the new generators in
    /// deterministic order.
    fn combine(&mut self, part: &Partition) -> Result<(Vec<Vec<T>>, Vec<S>), WicketError> {
        let budget = self.budget();
        let Some(simple_count) = budget.checked_sub(1) else {
            return Ok((Vec::new(), Vec::new()));
        };
        let (simple, other) = self
            .state
            .partition_by_count(part.negative.clone(), simple_count);

        let supports = self.state.supports();
        let tree = match self.options.adjacency() {
            AdjacencyTest::Tree => Some(SupportTree::build(supports)),
            AdjacencyTest::Matrix => None,
        };
        let combiner = Combiner {
            cone: self.cone,
            rays: self.state.rays(),
            supports,
            slacks: self.state.slacks(),
            tree: tree.as_ref(),
            inactive: &self.inactive,
            no_zeros: &self.no_zeros,
            simple,
            other,
            budget,
            face_dim: self.state.lineality_dim() + 2,
        };
        let offset = part.positive.start;
        let chunks = self.pool.run_chunks(
            part.positive.len(),
            self.options.chunk_size(),
            |range| combiner.run(range.start + offset..range.end + offset),
        );

        let mut rays = Vec::new();
        let mut new_supports = Vec::new();
        for chunk in chunks {
            let ChunkOutput {
                rays: chunk_rays,
                supports: chunk_supports,
                pairs_tested,
                face_tests,
            } = chunk?;
            self.stats.pairs_tested += pairs_tested;
            self.stats.face_tests += face_tests;
            rays.extend(chunk_rays);
            new_supports.extend(chunk_supports);
        }
        Ok((rays, new_supports))
    }

    pub fn run(mut self) -> Result<ConeOutput<T>, WicketError> {
        info!(
            vars = self.cone.num_vars(),
            constraints = self.cone.num_cons(),
            inequalities = self.remaining.count(),
            ambient_dim = self.ambient_dim,
            threads = self.pool.threads(),
            "starting enumeration"
        );
        self.seed()?;
        while self.step()? {}
        let out = output::canonicalize(self.cone, self.state, &self.circuit_mask, self.stats)?;
        info!(
            rays = out.rays().len(),
            circuits = out.circuits().len(),
            lineality = out.subspace().len(),
            pairs_tested = out.stats().pairs_tested,
            face_tests = out.stats().face_tests,
            "enumeration finished"
        );
        Ok(out)
    }
}

/// Enumerates a cone with the support backing chosen from its constraint count.
pub fn enumerate_cone<T: Int>(cone: &Cone<T>, options: &ConeOptions) -> Result<ConeOutput<T>, WicketError> {
    if cone.num_cons() <= WordSet::MAX_SIZE {
        DoubleDescription::<T, WordSet>::new(cone, options)?.run()
    } else {
        DoubleDescription::<T, BitSet>::new(cone, options)?.run()
    }
}

/// Lifts `problem` and enumerates its rays, circuits and lineality space.
pub fn enumerate<T: Int>(problem: &Problem<T>, options: &ConeOptions) -> Result<ConeOutput<T>, WicketError> {
    let cone = Cone::lift(problem)?;
    enumerate_cone(&cone, options)
}
