use std::fmt;
use std::num::NonZeroUsize;

use crate::dd::ConstraintOrder;

const DEFAULT_CHUNK_SIZE: NonZeroUsize = NonZeroUsize::new(16).unwrap();

/// How candidate pairs are certified adjacent.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum AdjacencyTest {
    /// Count budget, then the dominance index, then the exact face test.
    #[default]
    Tree,
    /// Count budget, then the exact face test for every surviving pair.
    Matrix,
}

/// Integer backing selected by the caller.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Precision {
    Bits32,
    #[default]
    Bits64,
    Arbitrary,
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Precision::Bits32 => "32",
            Precision::Bits64 => "64",
            Precision::Arbitrary => "arbitrary",
        })
    }
}

/// Immutable engine configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConeOptions {
    adjacency: AdjacencyTest,
    order: ConstraintOrder,
    precision: Precision,
    threads: NonZeroUsize,
    log_every: usize,
    chunk_size: NonZeroUsize,
}

impl Default for ConeOptions {
    fn default() -> Self {
        Self {
            adjacency: AdjacencyTest::default(),
            order: ConstraintOrder::default(),
            precision: Precision::default(),
            threads: NonZeroUsize::MIN,
            log_every: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ConeOptions {
    pub fn builder() -> ConeOptionsBuilder {
        ConeOptionsBuilder {
            options: Self::default(),
        }
    }

    #[inline]
    pub fn adjacency(&self) -> AdjacencyTest {
        self.adjacency
    }

    #[inline]
    pub fn order(&self) -> ConstraintOrder {
        self.order
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads.get()
    }

    /// Emit a progress line every this many processed constraints; `0` disables progress lines.
    #[inline]
    pub fn log_every(&self) -> usize {
        self.log_every
    }

    /// Number of positive-side generators handed to a worker at a time.
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }
}

#[derive(Clone, Debug)]
pub struct ConeOptionsBuilder {
    options: ConeOptions,
}

impl ConeOptionsBuilder {
    pub fn adjacency(mut self, adjacency: AdjacencyTest) -> Self {
        self.options.adjacency = adjacency;
        self
    }

    pub fn order(mut self, order: ConstraintOrder) -> Self {
        self.options.order = order;
        self
    }

    pub fn precision(mut self, precision: Precision) -> Self {
        self.options.precision = precision;
        self
    }

    /// `0` is treated as `1`.
    pub fn threads(mut self, threads: usize) -> Self {
        self.options.threads = NonZeroUsize::new(threads).unwrap_or(NonZeroUsize::MIN);
        self
    }

    pub fn log_every(mut self, log_every: usize) -> Self {
        self.options.log_every = log_every;
        self
    }

    /// `0` is treated as `1`.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.options.chunk_size = NonZeroUsize::new(chunk_size).unwrap_or(NonZeroUsize::MIN);
        self
    }

    pub fn build(self) -> ConeOptions {
        self.options
    }
}
