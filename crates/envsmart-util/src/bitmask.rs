use bitvec::order::Lsb0;
use bitvec::slice::BitSlice;
use bitvec::vec::BitVec;
use itertools::Itertools;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};

/// Growable bitset used to encode environment and group membership.
///
/// Equality and hashing only look at bits up to the last set one, so two masks built with
/// different capacities compare equal when they have the same bits set.
///
/// # Example
///
/// ```
/// use envsmart_util::bitmask::BitMask;
/// let env = BitMask::with_bit(3);
/// let mut group = BitMask::with_bit(70);
/// group.union_with(&env);
///
/// assert!(env.is_subset_of(&group));
/// assert!(!group.is_subset_of(&env));
/// assert!(env.intersects(&group));
/// assert_eq!(group.iter_ones().collect::<Vec<_>>(), vec![3, 70]);
/// ```
#[derive(Clone, Default)]
pub struct BitMask {
    bits: BitVec<u64, Lsb0>,
}

impl BitMask {
    pub fn new() -> Self {
        BitMask {
            bits: BitVec::new(),
        }
    }

    pub fn with_bit(bit: usize) -> Self {
        let mut ret = BitMask::new();
        ret.set(bit);
        ret
    }

    pub fn set(&mut self, bit: usize) {
        if bit >= self.bits.len() {
            self.bits.resize(bit + 1, false);
        }
        self.bits.set(bit, true);
    }

    pub fn contains_bit(&self, bit: usize) -> bool {
        self.bits.get(bit).is_some_and(|b| *b)
    }

    pub fn union(&self, other: &BitMask) -> BitMask {
        let mut ret = self.clone();
        ret.union_with(other);
        ret
    }

    pub fn union_with(&mut self, other: &BitMask) {
        if other.bits.len() > self.bits.len() {
            self.bits.resize(other.bits.len(), false);
        }
        for bit in other.bits.iter_ones() {
            self.bits.set(bit, true);
        }
    }

    pub fn intersects(&self, other: &BitMask) -> bool {
        self.bits.iter_ones().any(|bit| other.contains_bit(bit))
    }

    /// `true` if every bit set in `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &BitMask) -> bool {
        self.bits.iter_ones().all(|bit| other.contains_bit(bit))
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    fn significant(&self) -> &BitSlice<u64, Lsb0> {
        let len = self.bits.last_one().map_or(0, |last| last + 1);
        &self.bits[..len]
    }
}

impl PartialEq for BitMask {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for BitMask {}

impl Hash for BitMask {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl Debug for BitMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitMask{{{}}}", self.iter_ones().join(", "))
    }
}

impl FromIterator<usize> for BitMask {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut ret = BitMask::new();
        for bit in iter {
            ret.set(bit);
        }
        ret
    }
}
