//! Support sets over constraint indices.
//!
//! Both backings store bits in `u64` words; bits at or beyond the logical size are always clear.
//! The set algebra lives in provided methods of [`IndexSet`] over the word slices, so `WordSet`
//! (one word, size ≤ 64) and `BitSet` (dynamic word vector) behave identically.

use std::fmt;
use std::hash::Hash;

const WORD_BITS: usize = u64::BITS as usize;

#[inline(always)]
fn word_count(size: usize) -> usize {
    size.div_ceil(WORD_BITS)
}

#[inline(always)]
fn tail_mask(size: usize) -> u64 {
    match size % WORD_BITS {
        0 if size == 0 => 0,
        0 => u64::MAX,
        rem => (1u64 << rem) - 1,
    }
}

pub trait IndexSet: Clone + fmt::Debug + Eq + Hash + Send + Sync + 'static {
    /// Largest logical size the backing can hold.
    const MAX_SIZE: usize;

    /// Empty set over `0..size`.
    fn new(size: usize) -> Self;

    /// Logical size (universe), not cardinality.
    fn len(&self) -> usize;

    fn words(&self) -> &[u64];
    fn words_mut(&mut self) -> &mut [u64];

    /// Grows the universe; new positions are clear.
    fn resize(&mut self, size: usize);

    #[inline]
    fn is_empty(&self) -> bool {
        self.words().iter().all(|w| *w == 0)
    }

    fn from_indices(size: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::new(size);
        for i in indices {
            set.set(i);
        }
        set
    }

    #[inline]
    fn contains(&self, i: usize) -> bool {
        debug_assert!(i < self.len(), "index {i} out of range {}", self.len());
        (self.words()[i / WORD_BITS] >> (i % WORD_BITS)) & 1 != 0
    }

    #[inline]
    fn set(&mut self, i: usize) {
        debug_assert!(i < self.len(), "index {i} out of range {}", self.len());
        self.words_mut()[i / WORD_BITS] |= 1u64 << (i % WORD_BITS);
    }

    #[inline]
    fn unset(&mut self, i: usize) {
        debug_assert!(i < self.len(), "index {i} out of range {}", self.len());
        self.words_mut()[i / WORD_BITS] &= !(1u64 << (i % WORD_BITS));
    }

    #[inline]
    fn flip(&mut self, i: usize) {
        debug_assert!(i < self.len(), "index {i} out of range {}", self.len());
        self.words_mut()[i / WORD_BITS] ^= 1u64 << (i % WORD_BITS);
    }

    #[inline]
    fn zero(&mut self) {
        self.words_mut().fill(0);
    }

    fn one(&mut self) {
        let size = self.len();
        let words = self.words_mut();
        words.fill(u64::MAX);
        if let Some(last) = words.last_mut() {
            *last &= tail_mask(size);
        }
    }

    #[inline]
    fn union_inplace(&mut self, other: &Self) {
        debug_assert_eq!(self.len(), other.len());
        for (a, b) in self.words_mut().iter_mut().zip(other.words()) {
            *a |= *b;
        }
    }

    #[inline]
    fn intersection_inplace(&mut self, other: &Self) {
        debug_assert_eq!(self.len(), other.len());
        for (a, b) in self.words_mut().iter_mut().zip(other.words()) {
            *a &= *b;
        }
    }

    #[inline]
    fn difference_inplace(&mut self, other: &Self) {
        debug_assert_eq!(self.len(), other.len());
        for (a, b) in self.words_mut().iter_mut().zip(other.words()) {
            *a &= !*b;
        }
    }

    #[inline]
    fn symmetric_difference_inplace(&mut self, other: &Self) {
        debug_assert_eq!(self.len(), other.len());
        for (a, b) in self.words_mut().iter_mut().zip(other.words()) {
            *a ^= *b;
        }
    }

    fn complement_inplace(&mut self) {
        let size = self.len();
        let words = self.words_mut();
        for w in words.iter_mut() {
            *w = !*w;
        }
        if let Some(last) = words.last_mut() {
            *last &= tail_mask(size);
        }
    }

    #[inline]
    fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.union_inplace(other);
        out
    }

    #[inline]
    fn intersection(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.intersection_inplace(other);
        out
    }

    #[inline]
    fn difference(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.difference_inplace(other);
        out
    }

    #[inline]
    fn symmetric_difference(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.symmetric_difference_inplace(other);
        out
    }

    #[inline]
    fn complement(&self) -> Self {
        let mut out = self.clone();
        out.complement_inplace();
        out
    }

    #[inline]
    fn is_subset(&self, other: &Self) -> bool {
        self.words()
            .iter()
            .zip(other.words())
            .all(|(a, b)| a & !b == 0)
    }

    #[inline]
    fn is_disjoint(&self, other: &Self) -> bool {
        self.words()
            .iter()
            .zip(other.words())
            .all(|(a, b)| a & b == 0)
    }

    /// Exactly one bit set.
    fn is_singleton(&self) -> bool {
        let mut seen = false;
        for &w in self.words() {
            if w == 0 {
                continue;
            }
            if seen || !w.is_power_of_two() {
                return false;
            }
            seen = true;
        }
        seen
    }

    /// `self \ other` is a singleton.
    fn singleton_diff(&self, other: &Self) -> bool {
        let mut seen = false;
        for (a, b) in self.words().iter().zip(other.words()) {
            let w = a & !b;
            if w == 0 {
                continue;
            }
            if seen || !w.is_power_of_two() {
                return false;
            }
            seen = true;
        }
        seen
    }

    #[inline]
    fn count(&self) -> usize {
        self.words().iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    fn count_union(&self, other: &Self) -> usize {
        self.words()
            .iter()
            .zip(other.words())
            .map(|(a, b)| (a | b).count_ones() as usize)
            .sum()
    }

    /// Ascending member indices.
    fn iter(&self) -> Ones<'_> {
        Ones::new(self.words())
    }
}

/// Single-word backing for universes of at most 64 indices.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct WordSet {
    bits: [u64; 1],
    size: u8,
}

impl IndexSet for WordSet {
    const MAX_SIZE: usize = WORD_BITS;

    #[inline]
    fn new(size: usize) -> Self {
        assert!(size <= Self::MAX_SIZE, "WordSet holds at most {WORD_BITS} indices, got {size}");
        Self {
            bits: [0],
            size: size as u8,
        }
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.size as usize
    }

    #[inline(always)]
    fn words(&self) -> &[u64] {
        &self.bits
    }

    #[inline(always)]
    fn words_mut(&mut self) -> &mut [u64] {
        &mut self.bits
    }

    fn resize(&mut self, size: usize) {
        assert!(size <= Self::MAX_SIZE, "WordSet holds at most {WORD_BITS} indices, got {size}");
        debug_assert!(size >= self.len(), "support sets only grow");
        self.size = size as u8;
    }

    #[inline]
    fn count(&self) -> usize {
        self.bits[0].count_ones() as usize
    }

    #[inline]
    fn count_union(&self, other: &Self) -> usize {
        (self.bits[0] | other.bits[0]).count_ones() as usize
    }

    #[inline]
    fn is_subset(&self, other: &Self) -> bool {
        self.bits[0] & !other.bits[0] == 0
    }
}

/// Multi-word backing; the universe may grow with [`IndexSet::resize`].
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct BitSet {
    words: Vec<u64>,
    size: usize,
}

impl IndexSet for BitSet {
    const MAX_SIZE: usize = usize::MAX;

    #[inline]
    fn new(size: usize) -> Self {
        Self {
            words: vec![0; word_count(size)],
            size,
        }
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn words(&self) -> &[u64] {
        &self.words
    }

    #[inline(always)]
    fn words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }

    fn resize(&mut self, size: usize) {
        debug_assert!(size >= self.size, "support sets only grow");
        self.words.resize(word_count(size), 0);
        self.size = size;
    }
}

fn fmt_members(words: &[u64], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(Ones::new(words)).finish()
}

impl fmt::Debug for WordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_members(&self.bits, f)
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_members(&self.words, f)
    }
}

#[doc(hidden)]
pub struct Ones<'a> {
    words: &'a [u64],
    next_word_idx: usize,
    current_word_idx: usize,
    current_word: u64,
}

impl<'a> Ones<'a> {
    fn new(words: &'a [u64]) -> Self {
        Self {
            words,
            next_word_idx: 0,
            current_word_idx: 0,
            current_word: 0,
        }
    }
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_word == 0 {
            let word = self.words.get(self.next_word_idx).copied()?;
            self.current_word_idx = self.next_word_idx;
            self.next_word_idx += 1;
            self.current_word = word;
        }
        let bit = self.current_word.trailing_zeros() as usize;
        self.current_word &= self.current_word - 1;
        Some(self.current_word_idx * WORD_BITS + bit)
    }
}
