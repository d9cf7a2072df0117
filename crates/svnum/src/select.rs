//! Bit select, part select, concatenation, replication, and the
//! four-state conditional merge.

use num_traits::ToPrimitive;

use crate::arith::harmonized;
use crate::bitvec::BitVec;
use crate::compare::exactly_equal;
use crate::logic::Logic;
use crate::word::{self, num_words};

impl BitVec {
    /// The four-state bit at `index`; X when the index is out of range.
    pub fn bit(&self, index: i32) -> Logic {
        if index < 0 || index as u32 >= self.width() {
            return Logic::X;
        }
        let i = index as u32;
        let value = self.value_bit(i);
        if !self.shadow_bit(i) {
            return Logic::from(value);
        }
        if value { Logic::Z } else { Logic::X }
    }

    /// Bit select by a four-state index; X when the index has unknown bits
    /// or does not fit.
    pub fn bit_select(&self, index: &BitVec) -> Logic {
        match index.to_i32() {
            Some(i) => self.bit(i),
            None => Logic::X,
        }
    }

    /// Part select `[msb:lsb]` (`msb >= lsb`). Positions outside the value
    /// read as X; a fully out-of-range select is all X.
    pub fn slice(&self, msb: i32, lsb: i32) -> BitVec {
        assert!(msb >= lsb);
        let select_width = (msb - lsb + 1) as u32;
        if msb < 0 || lsb >= self.width() as i32 {
            return BitVec::filled_x(select_width, false);
        }

        let front_oob = if lsb < 0 { (-lsb) as u32 } else { 0 };
        let back_oob = if msb as u32 >= self.width() {
            msb as u32 - self.width() + 1
        } else {
            0
        };
        let any_oob = front_oob > 0 || back_oob > 0;

        if self.is_single_word() && !any_oob {
            let mask = if select_width == 64 {
                u64::MAX
            } else {
                (1u64 << select_width) - 1
            };
            return BitVec::new(
                select_width,
                (self.value_words()[0] >> lsb) & mask,
                self.is_signed(),
            );
        }

        let valid_width = select_width - front_oob - back_oob;
        let src_offset = if front_oob > 0 { 0 } else { lsb as u32 };
        let mut result = BitVec::alloc_zeroed(
            select_width,
            self.is_signed(),
            self.has_unknown() || any_oob,
        );
        let n = num_words(select_width);
        {
            let dst = result.raw_words_mut();
            word::bitcpy(&mut dst[..n], front_oob, self.value_words(), valid_width, src_offset);
            if self.has_unknown() {
                word::bitcpy(&mut dst[n..], front_oob, self.shadow_words(), valid_width, src_offset);
            }
            if any_oob {
                word::set_bits(&mut dst[n..], 0, front_oob);
                word::set_bits(&mut dst[n..], valid_width + front_oob, back_oob);
            }
        }
        result.clear_unused_bits();
        result.check_unknown();
        result
    }

    /// `times` copies of `self` concatenated together.
    pub fn replicate(&self, times: u32) -> BitVec {
        let copies: Vec<BitVec> = (0..times).map(|_| self.clone()).collect();
        concatenate(&copies)
    }
}

/// Concatenation. The first operand lands in the most-significant bits; the
/// result is unsigned. Zero operands produce the width-0 value that is only
/// legal inside a larger concatenation.
pub fn concatenate(operands: &[BitVec]) -> BitVec {
    let mut width = 0u32;
    let mut unknown = false;
    for op in operands {
        width += op.width();
        unknown |= op.has_unknown();
    }
    if width == 0 {
        return BitVec::width_zero();
    }

    let n = num_words(width);
    if n == 1 && !unknown {
        let mut value = 0u64;
        let mut offset = 0;
        for op in operands.iter().rev() {
            word::bitcpy(
                std::slice::from_mut(&mut value),
                offset,
                op.value_words(),
                op.width(),
                0,
            );
            offset += op.width();
        }
        return BitVec::new(width, value, false);
    }

    let mut result = BitVec::alloc_zeroed(width, false, unknown);
    let mut offset = 0;
    for op in operands.iter().rev() {
        {
            let dst = result.raw_words_mut();
            word::bitcpy(&mut dst[..n], offset, op.value_words(), op.width(), 0);
        }
        if op.has_unknown() {
            let dst = result.raw_words_mut();
            word::bitcpy(&mut dst[n..], offset, op.shadow_words(), op.width(), 0);
        }
        offset += op.width();
    }
    result
}

/// Four-state ternary. A known condition picks a branch; an unknown
/// condition merges: bits where the branches agree survive, every other
/// position becomes X.
pub fn conditional(condition: &BitVec, lhs: &BitVec, rhs: &BitVec) -> BitVec {
    let (lhs, rhs, both_signed) = harmonized(lhs, rhs);

    if !condition.has_unknown() {
        return if !condition.is_zero() {
            lhs.into_owned()
        } else {
            rhs.into_owned()
        };
    }

    if exactly_equal(&lhs, &rhs) {
        return rhs.into_owned();
    }

    let width = lhs.width();
    let mut result = BitVec::alloc_zeroed(width, both_signed, true);
    let n = num_words(width);
    {
        let out = result.raw_words_mut();
        for i in 0..n {
            let (lv, rv) = (lhs.value_words()[i], rhs.value_words()[i]);
            let shadow = lhs.shadow_word(i) | rhs.shadow_word(i) | (lv ^ rv);
            out[i] = !shadow & lv & rv;
            out[i + n] = shadow;
        }
    }
    result.clear_unused_bits();
    result
}
