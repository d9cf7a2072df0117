//! Relational operators and the three equality flavors.
//!
//! Relational and logical-equality results are four-state: any unknown
//! operand bit produces X. Case equality (`exactly_equal`) and wildcard
//! equality are separate functions, as in the language.

use std::cmp::Ordering;

use crate::arith::harmonized;
use crate::bitvec::BitVec;
use crate::logic::Logic;
use crate::word::{num_words, which_word};

/// Unsigned comparison of the value planes of two equal-width operands.
pub(crate) fn cmp_unsigned(lhs: &BitVec, rhs: &BitVec) -> Ordering {
    debug_assert_eq!(lhs.width(), rhs.width());
    let a1 = lhs.active_bits();
    let a2 = rhs.active_bits();
    if a1 != a2 {
        return a1.cmp(&a2);
    }
    if a1 == 0 {
        return Ordering::Equal;
    }
    for i in (0..=which_word(a1 - 1)).rev() {
        match lhs.value_words()[i].cmp(&rhs.value_words()[i]) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

impl BitVec {
    /// `<`; X when either side has unknown bits.
    ///
    /// Comparison is unsigned unless both operands are signed, in which case
    /// negatives sort below non-negatives and equal-sign operands compare by
    /// their two's-complement words (which preserves order, so the
    /// most-negative value needs no special casing).
    pub fn lt(&self, rhs: &BitVec) -> Logic {
        if self.has_unknown() || rhs.has_unknown() {
            return Logic::X;
        }
        let (lhs, rhs, both_signed) = harmonized(self, rhs);
        if both_signed {
            match (lhs.is_negative(), rhs.is_negative()) {
                (true, false) => return Logic::One,
                (false, true) => return Logic::Zero,
                _ => {}
            }
        }
        Logic::from(cmp_unsigned(&lhs, &rhs) == Ordering::Less)
    }

    pub fn gt(&self, rhs: &BitVec) -> Logic {
        rhs.lt(self)
    }

    pub fn le(&self, rhs: &BitVec) -> Logic {
        !self.gt(rhs)
    }

    pub fn ge(&self, rhs: &BitVec) -> Logic {
        !self.lt(rhs)
    }

    /// `==`; X when either side has unknown bits.
    pub fn logical_eq(&self, rhs: &BitVec) -> Logic {
        if self.has_unknown() || rhs.has_unknown() {
            return Logic::X;
        }
        let (lhs, rhs, _) = harmonized(self, rhs);
        Logic::from(cmp_unsigned(&lhs, &rhs) == Ordering::Equal)
    }

    pub fn logical_ne(&self, rhs: &BitVec) -> Logic {
        !self.logical_eq(rhs)
    }
}

/// Case equality: bit-identical including X and Z positions. Operands of
/// different widths are extended first.
pub fn exactly_equal(lhs: &BitVec, rhs: &BitVec) -> bool {
    if !lhs.has_unknown() && !rhs.has_unknown() {
        return lhs.logical_eq(rhs) == Logic::One;
    }
    // one side unknown and the other not can never match
    if !lhs.has_unknown() || !rhs.has_unknown() {
        return false;
    }
    let (lhs, rhs, _) = harmonized(lhs, rhs);
    lhs.raw_words() == rhs.raw_words()
}

/// Wildcard equality: X/Z bits of `rhs` are don't-cares. X if `lhs` has any
/// unknown bit.
pub fn wildcard_equal(lhs: &BitVec, rhs: &BitVec) -> Logic {
    if !lhs.has_unknown() && !rhs.has_unknown() {
        return lhs.logical_eq(rhs);
    }
    if lhs.has_unknown() {
        return Logic::X;
    }
    let (lhs, rhs, _) = harmonized(lhs, rhs);
    let n = num_words(lhs.width());
    for i in 0..n {
        let mask = !rhs.shadow_word(i);
        if lhs.value_words()[i] & mask != rhs.value_words()[i] & mask {
            return Logic::Zero;
        }
    }
    Logic::One
}

/// Structural equality: same width, signedness, and bit-for-bit planes.
/// This is what makes `BitVec` usable as a map key; the language-level
/// equality operators are [`BitVec::logical_eq`] and [`exactly_equal`].
impl PartialEq for BitVec {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.is_signed() == other.is_signed()
            && self.has_unknown() == other.has_unknown()
            && self.raw_words() == other.raw_words()
    }
}

impl Eq for BitVec {}
