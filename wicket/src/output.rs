use ahash::AHashSet;
use wicket_core::linalg;
use wicket_core::num::{self, Int};
use wicket_core::IndexSet;

use crate::Cone;
use crate::WicketError;
use crate::dd::RayState;
use crate::error::OrOverflow;

/// Work counters of one enumeration.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ConeStats {
    pub constraints_processed: usize,
    pub redundant_constraints: usize,
    pub pivots: usize,
    pub pairs_tested: usize,
    pub face_tests: usize,
    pub generators_created: usize,
    pub peak_generators: usize,
}

/// Generators of the cone in the user's variables, in canonical form.
///
/// The subspace basis is in integer reduced echelon form; rays and circuits are primitive,
/// reduced modulo the subspace and sorted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConeOutput<T> {
    rays: Vec<Vec<T>>,
    circuits: Vec<Vec<T>>,
    subspace: Vec<Vec<T>>,
    stats: ConeStats,
}

impl<T: Int> ConeOutput<T> {
    #[inline]
    pub fn rays(&self) -> &[Vec<T>] {
        &self.rays
    }

    #[inline]
    pub fn circuits(&self) -> &[Vec<T>] {
        &self.circuits
    }

    #[inline]
    pub fn subspace(&self) -> &[Vec<T>] {
        &self.subspace
    }

    #[inline]
    pub fn stats(&self) -> &ConeStats {
        &self.stats
    }

    /// Rays followed by circuits; a circuit whose negation is feasible appears in both directions.
    pub fn homogeneous(&self) -> Vec<Vec<T>> {
        self.rays.iter().chain(&self.circuits).cloned().collect()
    }

    /// One representative per `±c` pair, oriented so the first non-zero entry is positive.
    pub fn circuit_classes(&self) -> Result<Vec<Vec<T>>, WicketError> {
        let mut seen = AHashSet::with_capacity(self.circuits.len());
        let mut out = Vec::new();
        for c in &self.circuits {
            let mut key = c.clone();
            if key.iter().find(|x| !x.is_zero()).is_some_and(Int::is_negative) {
                num::negate_in_place(&mut key).or_overflow(T::NAME, "orienting a circuit")?;
            }
            if seen.insert(key.clone()) {
                out.push(key);
            }
        }
        out.sort();
        Ok(out)
    }

    /// Dimension of the cone.
    pub fn dimension(&self) -> Result<usize, WicketError> {
        let mut rows = self.homogeneous();
        rows.extend(self.subspace.iter().cloned());
        let pivots = linalg::echelon(&mut rows).or_overflow(T::NAME, "computing the dimension")?;
        Ok(pivots.len())
    }
}

fn canonical_group<T: Int>(
    cone: &Cone<T>,
    rays: &[Vec<T>],
    basis: &[Vec<T>],
    pivots: &[usize],
) -> Result<Vec<Vec<T>>, WicketError> {
    let mut out = Vec::with_capacity(rays.len());
    for ray in rays {
        let mut v = cone.project(ray)?;
        if num::is_zero_vector(&v) {
            continue;
        }
        linalg::reduce_modulo(&mut v, basis, pivots).or_overflow(T::NAME, "reducing a generator")?;
        out.push(v);
    }
    out.sort();
    out.dedup();
    Ok(out)
}

/// Projects the final generators back to the user's variables and brings them to canonical form.
pub(crate) fn canonicalize<T: Int, S: IndexSet>(
    cone: &Cone<T>,
    mut state: RayState<T, S>,
    circuit_mask: &S,
    stats: ConeStats,
) -> Result<ConeOutput<T>, WicketError> {
    let (ray_range, circuit_range) = state.partition_by_ray_mask(0..state.len(), circuit_mask);
    let (generators, _, subspace) = state.into_parts();

    let mut projected = Vec::with_capacity(subspace.len());
    for s in &subspace {
        projected.push(cone.project(s)?);
    }
    let (basis, pivots) = if projected.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        linalg::reduced_echelon(projected).or_overflow(T::NAME, "normalising the subspace")?
    };

    let rays = canonical_group(cone, &generators[ray_range], &basis, &pivots)?;
    let circuits = canonical_group(cone, &generators[circuit_range], &basis, &pivots)?;
    Ok(ConeOutput {
        rays,
        circuits,
        subspace: basis,
        stats,
    })
}
