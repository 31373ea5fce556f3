//! In-place logical combinators.
//!
//! All combinators mutate the left-hand set; none of them allocates beyond
//! what the result needs, and all of them restore the trimmed-backing
//! invariant.

use std::ops::{BitAndAssign, BitOrAssign, BitXorAssign, SubAssign};

use crate::BitSet;

impl BitAndAssign<&BitSet> for BitSet {
    /// Intersection: the result length is at most the shorter input.
    fn bitand_assign(&mut self, rhs: &BitSet) {
        self.words.truncate(rhs.words.len());
        for (w, r) in self.words.iter_mut().zip(rhs.words.iter()) {
            *w &= r;
        }
        self.trim();
    }
}

impl BitOrAssign<&BitSet> for BitSet {
    /// Union: the result length is the longer input.
    fn bitor_assign(&mut self, rhs: &BitSet) {
        if self.words.len() < rhs.words.len() {
            self.words.resize(rhs.words.len(), 0);
        }
        for (w, r) in self.words.iter_mut().zip(rhs.words.iter()) {
            *w |= r;
        }
    }
}

impl BitXorAssign<&BitSet> for BitSet {
    /// Symmetric difference.
    fn bitxor_assign(&mut self, rhs: &BitSet) {
        if self.words.len() < rhs.words.len() {
            self.words.resize(rhs.words.len(), 0);
        }
        for (w, r) in self.words.iter_mut().zip(rhs.words.iter()) {
            *w ^= r;
        }
        self.trim();
    }
}

impl SubAssign<&BitSet> for BitSet {
    /// And-not: clear every bit that is set in `rhs`.
    fn sub_assign(&mut self, rhs: &BitSet) {
        for (w, r) in self.words.iter_mut().zip(rhs.words.iter()) {
            *w &= !r;
        }
        self.trim();
    }
}

impl BitSet {
    /// `self |= a & b` in one pass, without materializing `a & b`.
    ///
    /// This is the overrun accumulator: bits that were already pending in
    /// `b` from a prior unconsumed update and are changed again in `a`
    /// land in `self`.
    pub fn or_and(&mut self, a: &BitSet, b: &BitSet) {
        let and_len = a.words.len().min(b.words.len());
        if self.words.len() < and_len {
            self.words.resize(and_len, 0);
        }
        for i in 0..and_len {
            self.words[i] |= a.words[i] & b.words[i];
        }
        self.trim();
    }

    /// `true` iff some bit is set in both `self` and `other`.
    pub fn logical_and(&self, other: &BitSet) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(w, o)| w & o != 0)
    }

    /// `true` iff some bit is set in `self` or `other`.
    pub fn logical_or(&self, other: &BitSet) -> bool {
        !self.is_empty() || !other.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::BitSet;

    #[test]
    fn or() {
        let mut b1 = BitSet::from([1]);
        let mut b2 = BitSet::from([1]);
        b2.set(65);
        b2.set(106);
        b2.set(105);
        b1 |= &b2;
        assert_eq!(b1.to_string(), "{1, 65, 105, 106}");
        b1.clear_all();
        b1 |= &b2;
        assert_eq!(b1.to_string(), "{1, 65, 105, 106}");
    }

    #[test]
    fn and() {
        let b2 = BitSet::from([1, 65, 105, 106]);
        let mut b1 = b2.clone();
        b1.set(128);
        b1 &= &b2;
        assert_eq!(b1, b2);
    }

    #[test]
    fn xor() {
        let b2 = BitSet::from([1, 65, 105, 106]);
        let mut b1 = b2.clone();
        b1.set(128);
        b1 ^= &b2;
        assert_eq!(b1.cardinality(), 1);
        assert!(b1.get(128));

        let mut b1 = BitSet::from([1]);
        let b2 = BitSet::from([256]);
        b1 ^= &b2;
        assert_eq!(b1.cardinality(), 2);
        assert!(b1.get(1));
        assert!(b1.get(256));
    }

    #[test]
    fn and_not() {
        let mut b1 = BitSet::from([1, 65, 105]);
        let b2 = BitSet::from([65, 500]);
        b1 -= &b2;
        assert_eq!(b1.to_string(), "{1, 105}");
    }

    #[test]
    fn or_and() {
        let mut b1 = BitSet::from([2]);
        let b2 = BitSet::from([66, 128]);
        let b3 = BitSet::from([128, 520]);
        b1.or_and(&b2, &b3);
        assert_eq!(b1.to_string(), "{2, 128}");

        // empty intersection leaves the accumulator untouched
        let mut b3 = BitSet::from([1]);
        let b1 = BitSet::from([1]);
        let b2 = BitSet::new();
        b3.or_and(&b1, &b2);
        assert_eq!(b3.to_string(), "{1}");
    }

    #[test]
    fn logical() {
        let mut a = BitSet::new();
        let mut b = BitSet::new();
        assert!(!a.logical_and(&b));
        assert!(!a.logical_or(&b));

        a.set(41);
        assert!(!a.logical_and(&b));
        assert!(a.logical_or(&b));

        a.set(42);
        assert!(!a.logical_and(&b));
        assert!(a.logical_or(&b));

        b.set(41);
        assert!(a.logical_and(&b));
        assert!(a.logical_or(&b));
    }
}
