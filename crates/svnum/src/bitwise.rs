//! Bitwise operators, reductions, and shifts.
//!
//! Bitwise operators work per bit on the value/shadow plane pair; the
//! propagation formulas come straight from the four-valued truth tables.
//! Shifts move both planes in lockstep.

use std::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, ShlAssign, Shr,
    ShrAssign,
};

use crate::arith::{forward_assign, forward_binop, harmonized};
use crate::bitvec::BitVec;
use crate::logic::Logic;
use crate::word::{self, num_words};

impl Not for &BitVec {
    type Output = BitVec;

    fn not(self) -> BitVec {
        let mut result = self.clone();
        let n = num_words(result.width());
        {
            let words = result.raw_words_mut();
            for i in 0..n {
                words[i] ^= u64::MAX;
            }
            if self.has_unknown() {
                // unknown bits stay unknown, but Z flips to X
                for i in 0..n {
                    words[i] &= !words[i + n];
                }
            }
        }
        result.clear_unused_bits();
        result
    }
}

impl Not for BitVec {
    type Output = BitVec;

    fn not(self) -> BitVec {
        !&self
    }
}

/// Shared shape of the two-operand bitwise operators: harmonize, run the
/// plane formula per word, canonicalize.
fn bitwise_op(
    lhs: &BitVec,
    rhs: &BitVec,
    known: fn(u64, u64) -> u64,
    planes: fn(u64, u64, u64, u64) -> (u64, u64),
) -> BitVec {
    let (lhs, rhs, signed) = harmonized(lhs, rhs);
    let width = lhs.width();
    let unknown = lhs.has_unknown() || rhs.has_unknown();
    if !unknown && width <= 64 {
        return BitVec::new(width, known(lhs.value_words()[0], rhs.value_words()[0]), signed);
    }

    let mut result = BitVec::alloc_zeroed(width, signed, unknown);
    let n = num_words(width);
    {
        let out = result.raw_words_mut();
        for i in 0..n {
            let (lv, rv) = (lhs.value_words()[i], rhs.value_words()[i]);
            if unknown {
                let (lu, ru) = (lhs.shadow_word(i), rhs.shadow_word(i));
                let (value, shadow) = planes(lv, lu, rv, ru);
                out[i] = value;
                out[i + n] = shadow;
            } else {
                out[i] = known(lv, rv);
            }
        }
    }
    result.clear_unused_bits();
    result.check_unknown();
    result
}

impl BitAnd<&BitVec> for &BitVec {
    type Output = BitVec;

    fn bitand(self, rhs: &BitVec) -> BitVec {
        bitwise_op(self, rhs, |a, b| a & b, |lv, lu, rv, ru| {
            let shadow = (lu | ru) & (lu | lv) & (ru | rv);
            (!shadow & lv & rv, shadow)
        })
    }
}

impl BitOr<&BitVec> for &BitVec {
    type Output = BitVec;

    fn bitor(self, rhs: &BitVec) -> BitVec {
        bitwise_op(self, rhs, |a, b| a | b, |lv, lu, rv, ru| {
            let shadow = (lu & (ru | !rv)) | (!lv & ru);
            (!shadow & (lv | rv), shadow)
        })
    }
}

impl BitXor<&BitVec> for &BitVec {
    type Output = BitVec;

    fn bitxor(self, rhs: &BitVec) -> BitVec {
        bitwise_op(self, rhs, |a, b| a ^ b, |lv, lu, rv, ru| {
            let shadow = lu | ru;
            (!shadow & (lv ^ rv), shadow)
        })
    }
}

impl BitVec {
    /// Bitwise XNOR (`~^`), which has no Rust operator.
    pub fn xnor(&self, rhs: &BitVec) -> BitVec {
        bitwise_op(self, rhs, |a, b| !(a ^ b), |lv, lu, rv, ru| {
            let shadow = lu | ru;
            (!shadow & !(lv ^ rv), shadow)
        })
    }

    // ─────────────────────────────────────────────────────
    //  Reductions
    // ─────────────────────────────────────────────────────

    /// AND of all bits; X if any bit is unknown.
    pub fn reduction_and(&self) -> Logic {
        if self.has_unknown() {
            return Logic::X;
        }
        Logic::from(self.is_all_ones())
    }

    /// OR of all bits; X if any bit is unknown.
    pub fn reduction_or(&self) -> Logic {
        if self.has_unknown() {
            return Logic::X;
        }
        Logic::from(!self.is_zero())
    }

    /// XOR of all bits (popcount parity); X if any bit is unknown.
    pub fn reduction_xor(&self) -> Logic {
        if self.has_unknown() {
            return Logic::X;
        }
        Logic::from(self.count_ones() % 2 == 1)
    }

    // ─────────────────────────────────────────────────────
    //  Shifts
    // ─────────────────────────────────────────────────────

    /// Logical left shift by a four-state amount.
    pub fn shl(&self, rhs: &BitVec) -> BitVec {
        match shift_amount(self, rhs) {
            ShiftAmount::Unknown => BitVec::filled_x(self.width(), self.is_signed()),
            ShiftAmount::OutOfRange => BitVec::zero(self.width(), self.is_signed()),
            ShiftAmount::Bits(amount) => self.shl_by(amount),
        }
    }

    /// Logical left shift by a plain amount.
    pub fn shl_by(&self, amount: u32) -> BitVec {
        if amount == 0 {
            return self.clone();
        }
        if amount >= self.width() {
            return BitVec::zero(self.width(), self.is_signed());
        }
        if self.is_single_word() {
            return BitVec::new(
                self.width(),
                self.value_words()[0] << amount,
                self.is_signed(),
            );
        }

        let mut result = BitVec::alloc_zeroed(self.width(), self.is_signed(), self.has_unknown());
        let n = num_words(self.width());
        let bit_shift = amount % 64;
        let offset = (amount / 64) as usize;
        {
            let dst = result.raw_words_mut();
            word::shl_far(dst, self.raw_words(), bit_shift, offset, 0, n);
            if self.has_unknown() {
                word::shl_far(dst, self.raw_words(), bit_shift, offset, n, n);
            }
        }
        result.clear_unused_bits();
        result.check_unknown();
        result
    }

    /// Logical right shift by a four-state amount.
    pub fn lshr(&self, rhs: &BitVec) -> BitVec {
        match shift_amount(self, rhs) {
            ShiftAmount::Unknown => BitVec::filled_x(self.width(), self.is_signed()),
            ShiftAmount::OutOfRange => BitVec::zero(self.width(), self.is_signed()),
            ShiftAmount::Bits(amount) => self.lshr_by(amount),
        }
    }

    /// Logical right shift by a plain amount.
    pub fn lshr_by(&self, amount: u32) -> BitVec {
        if amount == 0 {
            return self.clone();
        }
        if amount >= self.width() {
            return BitVec::zero(self.width(), self.is_signed());
        }
        if self.is_single_word() {
            return BitVec::new(
                self.width(),
                self.value_words()[0] >> amount,
                self.is_signed(),
            );
        }

        let mut result = BitVec::alloc_zeroed(self.width(), self.is_signed(), self.has_unknown());
        let n = num_words(self.width());
        let bit_shift = amount % 64;
        let offset = (amount / 64) as usize;
        {
            let dst = result.raw_words_mut();
            word::lshr_far(dst, self.raw_words(), bit_shift, offset, 0, n);
            if self.has_unknown() {
                word::lshr_far(dst, self.raw_words(), bit_shift, offset, n, n);
            }
        }
        result.check_unknown();
        result
    }

    /// Arithmetic right shift by a four-state amount. Identical to [`lshr`]
    /// for unsigned receivers.
    ///
    /// [`lshr`]: BitVec::lshr
    pub fn ashr(&self, rhs: &BitVec) -> BitVec {
        if !self.is_signed() {
            return self.lshr(rhs);
        }
        match shift_amount(self, rhs) {
            ShiftAmount::Unknown => BitVec::filled_x(self.width(), self.is_signed()),
            ShiftAmount::OutOfRange => self.ashr_by(self.width()),
            ShiftAmount::Bits(amount) => self.ashr_by(amount),
        }
    }

    /// Arithmetic right shift by a plain amount. The vacated high bits take
    /// the original most-significant bit of each plane, so a 0, 1, X, or Z
    /// sign bit fills with itself.
    pub fn ashr_by(&self, amount: u32) -> BitVec {
        if !self.is_signed() {
            return self.lshr_by(amount);
        }
        if amount == 0 {
            return self.clone();
        }
        let fill = amount.min(self.width());
        let keep = self.width() - fill;
        let value_fill = self.value_bit(self.width() - 1);
        let shadow_fill = self.shadow_bit(self.width() - 1);

        let mut result = if keep == 0 {
            BitVec::alloc_zeroed(self.width(), true, shadow_fill)
        } else {
            let mut shifted = self.lshr_by(amount);
            if shadow_fill {
                shifted.promote_unknown();
            }
            shifted
        };
        if value_fill || shadow_fill {
            let n = num_words(self.width());
            let words = result.raw_words_mut();
            if value_fill {
                word::set_bits(&mut words[..n], keep, fill);
            }
            if shadow_fill {
                word::set_bits(&mut words[n..], keep, fill);
            }
            result.clear_unused_bits();
        }
        result
    }
}

enum ShiftAmount {
    Unknown,
    OutOfRange,
    Bits(u32),
}

/// Classify a four-state shift amount. Amounts are unsigned; anything that
/// cannot fit 32 bits is far beyond any legal width.
fn shift_amount(value: &BitVec, rhs: &BitVec) -> ShiftAmount {
    if rhs.has_unknown() {
        return ShiftAmount::Unknown;
    }
    if rhs.active_bits() > 32 {
        return ShiftAmount::OutOfRange;
    }
    let amount = rhs.value_words()[0] as u32;
    if amount >= value.width() {
        ShiftAmount::OutOfRange
    } else {
        ShiftAmount::Bits(amount)
    }
}

// `<<` and `>>` delegate to the logical shifts; `>>>` has no Rust operator
// and stays a named method.
impl Shl<&BitVec> for &BitVec {
    type Output = BitVec;

    fn shl(self, rhs: &BitVec) -> BitVec {
        BitVec::shl(self, rhs)
    }
}

impl Shr<&BitVec> for &BitVec {
    type Output = BitVec;

    fn shr(self, rhs: &BitVec) -> BitVec {
        BitVec::lshr(self, rhs)
    }
}

impl Shl<u32> for &BitVec {
    type Output = BitVec;

    fn shl(self, rhs: u32) -> BitVec {
        self.shl_by(rhs)
    }
}

impl Shr<u32> for &BitVec {
    type Output = BitVec;

    fn shr(self, rhs: u32) -> BitVec {
        self.lshr_by(rhs)
    }
}

impl Shl<u32> for BitVec {
    type Output = BitVec;

    fn shl(self, rhs: u32) -> BitVec {
        self.shl_by(rhs)
    }
}

impl Shr<u32> for BitVec {
    type Output = BitVec;

    fn shr(self, rhs: u32) -> BitVec {
        self.lshr_by(rhs)
    }
}

impl ShlAssign<u32> for BitVec {
    fn shl_assign(&mut self, rhs: u32) {
        *self = self.shl_by(rhs);
    }
}

impl ShrAssign<u32> for BitVec {
    fn shr_assign(&mut self, rhs: u32) {
        *self = self.lshr_by(rhs);
    }
}

forward_binop!(BitAnd, bitand);
forward_binop!(BitOr, bitor);
forward_binop!(BitXor, bitxor);

forward_assign!(BitAndAssign, bitand_assign, &);
forward_assign!(BitOrAssign, bitor_assign, |);
forward_assign!(BitXorAssign, bitxor_assign, ^);
