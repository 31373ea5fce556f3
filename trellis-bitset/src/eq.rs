//! Structural equality.
//!
//! Two sets compare equal iff they have the same true indices; the length
//! of the backing storage is insignificant. The comparison does not rely
//! on the trimmed-backing invariant, so a set that took a detour through a
//! longer representation still compares equal.

use crate::BitSet;

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        let (short, long) = if self.words.len() <= other.words.len() {
            (&self.words, &other.words)
        } else {
            (&other.words, &self.words)
        };
        short[..] == long[..short.len()] && long[short.len()..].iter().all(|w| *w == 0)
    }
}

impl Eq for BitSet {}

#[cfg(test)]
mod tests {
    use crate::BitSet;

    #[test]
    fn equality_ignores_backing_length() {
        let b1 = BitSet::from([1]);
        let mut b2 = BitSet::new();
        b2.set(100);
        b2.set(1);
        b2.flip(100);
        assert_eq!(b1, b2);

        assert_eq!(BitSet::new(), BitSet::new());
        assert_ne!(b1, BitSet::new());
    }
}
