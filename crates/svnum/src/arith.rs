//! Arithmetic operators: `+ - * / %`, unary minus, and power.
//!
//! Every binary operator first harmonizes widths (extend the narrower
//! operand, sign-extending only when both are signed) and takes the AND of
//! the signed flags for the result. Any unknown operand bit makes the whole
//! result X; so does dividing by zero.

use std::borrow::Cow;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign};

use num_traits::Pow;

use crate::bitvec::BitVec;
use crate::compare::cmp_unsigned;
use crate::word::{self, num_words, which_word};

/// Bring two operands to a common width. Returns the operands and the
/// AND of their signed flags.
pub(crate) fn harmonized<'a>(
    lhs: &'a BitVec,
    rhs: &'a BitVec,
) -> (Cow<'a, BitVec>, Cow<'a, BitVec>, bool) {
    let both_signed = lhs.is_signed() && rhs.is_signed();
    if lhs.width() == rhs.width() {
        (Cow::Borrowed(lhs), Cow::Borrowed(rhs), both_signed)
    } else if lhs.width() < rhs.width() {
        (
            Cow::Owned(lhs.extend(rhs.width(), both_signed)),
            Cow::Borrowed(rhs),
            both_signed,
        )
    } else {
        (
            Cow::Borrowed(lhs),
            Cow::Owned(rhs.extend(lhs.width(), both_signed)),
            both_signed,
        )
    }
}

/// A value-plane result of `width` bits built from `words` (truncating or
/// zero-filling as needed).
pub(crate) fn from_value_words(width: u32, signed: bool, words: &[u64]) -> BitVec {
    let mut result = BitVec::alloc_zeroed(width, signed, false);
    let count = words.len().min(num_words(width));
    result.raw_words_mut()[..count].copy_from_slice(&words[..count]);
    result.clear_unused_bits();
    result
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<BitVec> for BitVec {
            type Output = BitVec;
            fn $method(self, rhs: BitVec) -> BitVec {
                (&self).$method(&rhs)
            }
        }
        impl $imp<&BitVec> for BitVec {
            type Output = BitVec;
            fn $method(self, rhs: &BitVec) -> BitVec {
                (&self).$method(rhs)
            }
        }
        impl $imp<BitVec> for &BitVec {
            type Output = BitVec;
            fn $method(self, rhs: BitVec) -> BitVec {
                self.$method(&rhs)
            }
        }
    };
}
pub(crate) use forward_binop;

macro_rules! forward_assign {
    ($imp:ident, $method:ident, $op:tt) => {
        impl $imp<&BitVec> for BitVec {
            fn $method(&mut self, rhs: &BitVec) {
                *self = &*self $op rhs;
            }
        }
        impl $imp<BitVec> for BitVec {
            fn $method(&mut self, rhs: BitVec) {
                *self = &*self $op &rhs;
            }
        }
    };
}
pub(crate) use forward_assign;

// ─────────────────────────────────────────────────────────
//  Add / Sub / Mul
// ─────────────────────────────────────────────────────────

impl Add<&BitVec> for &BitVec {
    type Output = BitVec;

    fn add(self, rhs: &BitVec) -> BitVec {
        let (lhs, rhs, signed) = harmonized(self, rhs);
        if lhs.has_unknown() || rhs.has_unknown() {
            return BitVec::filled_x(lhs.width(), signed);
        }
        if lhs.width() <= 64 {
            let sum = lhs.value_words()[0].wrapping_add(rhs.value_words()[0]);
            return BitVec::new(lhs.width(), sum, signed);
        }
        let mut result = from_value_words(lhs.width(), signed, lhs.value_words());
        word::add_in_place(result.raw_words_mut(), rhs.value_words());
        result.clear_unused_bits();
        result
    }
}

impl Sub<&BitVec> for &BitVec {
    type Output = BitVec;

    fn sub(self, rhs: &BitVec) -> BitVec {
        let (lhs, rhs, signed) = harmonized(self, rhs);
        if lhs.has_unknown() || rhs.has_unknown() {
            return BitVec::filled_x(lhs.width(), signed);
        }
        if lhs.width() <= 64 {
            let diff = lhs.value_words()[0].wrapping_sub(rhs.value_words()[0]);
            return BitVec::new(lhs.width(), diff, signed);
        }
        let mut result = from_value_words(lhs.width(), signed, lhs.value_words());
        word::sub_in_place(result.raw_words_mut(), rhs.value_words());
        result.clear_unused_bits();
        result
    }
}

impl Mul<&BitVec> for &BitVec {
    type Output = BitVec;

    fn mul(self, rhs: &BitVec) -> BitVec {
        let (lhs, rhs, signed) = harmonized(self, rhs);
        if lhs.has_unknown() || rhs.has_unknown() {
            return BitVec::filled_x(lhs.width(), signed);
        }
        if lhs.width() <= 64 {
            let product = lhs.value_words()[0].wrapping_mul(rhs.value_words()[0]);
            return BitVec::new(lhs.width(), product, signed);
        }

        let lhs_words = active_words(&lhs);
        let rhs_words = active_words(&rhs);
        if lhs_words == 0 || rhs_words == 0 {
            return BitVec::zero(lhs.width(), signed);
        }

        // full-precision product into scratch, then truncate
        let mut scratch = vec![0u64; lhs_words + rhs_words];
        word::mul(
            &mut scratch,
            &lhs.value_words()[..lhs_words],
            &rhs.value_words()[..rhs_words],
        );
        from_value_words(lhs.width(), signed, &scratch)
    }
}

fn active_words(value: &BitVec) -> usize {
    let bits = value.active_bits();
    if bits == 0 {
        0
    } else {
        which_word(bits - 1) + 1
    }
}

impl Neg for &BitVec {
    type Output = BitVec;

    fn neg(self) -> BitVec {
        if self.has_unknown() {
            return BitVec::filled_x(self.width(), self.is_signed());
        }
        &BitVec::zero(self.width(), self.is_signed()) - self
    }
}

impl Neg for BitVec {
    type Output = BitVec;

    fn neg(self) -> BitVec {
        -&self
    }
}

// ─────────────────────────────────────────────────────────
//  Div / Rem
// ─────────────────────────────────────────────────────────

/// Unsigned quotient and remainder of equal-width, fully-known operands with
/// a nonzero divisor.
fn udivrem(lhs: &BitVec, rhs: &BitVec, signed: bool) -> (BitVec, BitVec) {
    let width = lhs.width();
    if lhs.is_single_word() {
        let (l, r) = (lhs.value_words()[0], rhs.value_words()[0]);
        return (
            BitVec::new(width, l / r, signed),
            BitVec::new(width, l % r, signed),
        );
    }

    let lhs_words = active_words(lhs);
    let rhs_words = active_words(rhs);

    if lhs_words == 0 {
        return (BitVec::zero(width, signed), BitVec::zero(width, signed));
    }
    if std::ptr::eq(lhs, rhs) {
        return (BitVec::new(width, 1, signed), BitVec::zero(width, signed));
    }
    if lhs_words < rhs_words || cmp_unsigned(lhs, rhs) == std::cmp::Ordering::Less {
        let mut rem = lhs.clone();
        rem.set_signed(signed);
        return (BitVec::zero(width, signed), rem);
    }
    if lhs_words == 1 {
        let (l, r) = (lhs.value_words()[0], rhs.value_words()[0]);
        return (
            BitVec::new(width, l / r, signed),
            BitVec::new(width, l % r, signed),
        );
    }

    let (q, r) = word::udivrem(
        &lhs.value_words()[..lhs_words],
        &rhs.value_words()[..rhs_words],
    );
    (
        from_value_words(width, signed, &q),
        from_value_words(width, signed, &r),
    )
}

impl Div<&BitVec> for &BitVec {
    type Output = BitVec;

    fn div(self, rhs: &BitVec) -> BitVec {
        self.div_rem(rhs).0
    }
}

impl Rem<&BitVec> for &BitVec {
    type Output = BitVec;

    fn rem(self, rhs: &BitVec) -> BitVec {
        self.div_rem(rhs).1
    }
}

impl BitVec {
    /// Quotient and remainder in one pass.
    ///
    /// Division by zero or any unknown bit yields all-X for both. Signed
    /// division divides the magnitudes; the quotient is negative when the
    /// operand signs differ and the remainder takes the dividend's sign.
    pub fn div_rem(&self, rhs: &BitVec) -> (BitVec, BitVec) {
        let (lhs, rhs, signed) = harmonized(self, rhs);
        if lhs.has_unknown() || rhs.has_unknown() || rhs.is_zero() {
            return (
                BitVec::filled_x(lhs.width(), signed),
                BitVec::filled_x(lhs.width(), signed),
            );
        }

        if signed {
            match (lhs.is_negative(), rhs.is_negative()) {
                (true, true) => {
                    let (q, r) = udivrem(&-&*lhs, &-&*rhs, true);
                    return (q, -r);
                }
                (true, false) => {
                    let (q, r) = udivrem(&-&*lhs, &rhs, true);
                    return (-q, -r);
                }
                (false, true) => {
                    let (q, r) = udivrem(&lhs, &-&*rhs, true);
                    return (-q, r);
                }
                (false, false) => {}
            }
        }
        udivrem(&lhs, &rhs, signed)
    }

    // ─────────────────────────────────────────────────────
    //  Power
    // ─────────────────────────────────────────────────────

    /// `self ** rhs`, wrapping modulo `2^width`. The result keeps the
    /// receiver's width.
    pub fn pow(&self, rhs: &BitVec) -> BitVec {
        let both_signed = self.is_signed() && rhs.is_signed();
        if self.has_unknown() || rhs.has_unknown() {
            return BitVec::filled_x(self.width(), both_signed);
        }

        let lhs_bits = self.active_bits();
        let rhs_bits = rhs.active_bits();
        if lhs_bits == 0 {
            if rhs_bits == 0 {
                // 0 ** 0 == 1
                return BitVec::new(self.width(), 1, both_signed);
            }
            if rhs.is_signed() && rhs.is_negative() {
                // 0 ** -y == x
                return BitVec::filled_x(self.width(), both_signed);
            }
            // 0 ** y == 0
            return BitVec::zero(self.width(), both_signed);
        }

        // x ** 0 == 1 and 1 ** y == 1
        if rhs_bits == 0 || lhs_bits == 1 {
            return BitVec::new(self.width(), 1, both_signed);
        }

        if both_signed && self.is_negative() {
            if self.is_all_ones() {
                // (-1) ** y: 1 for even y, -1 for odd
                return if rhs.is_odd() {
                    BitVec::all_ones(self.width(), both_signed)
                } else {
                    BitVec::new(self.width(), 1, both_signed)
                };
            }
        }

        if both_signed && rhs.is_negative() {
            // x ** -y == 0 for |x| > 1
            return BitVec::zero(self.width(), both_signed);
        }

        if both_signed && self.is_negative() {
            let result = mod_pow(&-self, rhs, both_signed);
            return if rhs.is_odd() { -result } else { result };
        }
        mod_pow(self, rhs, both_signed)
    }
}

/// Square-and-multiply modulo `2^width` of the base.
fn mod_pow(base: &BitVec, exponent: &BitVec, both_signed: bool) -> BitVec {
    let width = base.width();
    let result_words = num_words(width);
    // scratch sized for the widest intermediate product
    let mut scratch = vec![0u64; num_words(width * 2)];

    let mul_reduce = |scratch: &mut Vec<u64>, left: &BitVec, right: &BitVec| -> BitVec {
        let left_words = active_words(left);
        let right_words = active_words(right);
        if left_words == 0 || right_words == 0 {
            return BitVec::zero(width, false);
        }
        scratch.fill(0);
        word::mul(
            &mut scratch[..left_words + right_words],
            &left.value_words()[..left_words],
            &right.value_words()[..right_words],
        );
        let count = (left_words + right_words).min(result_words);
        from_value_words(width, false, &scratch[..count])
    };

    let mut base_copy = base.clone();
    let mut result = BitVec::new(width, 1, false);

    let exp_words = exponent.value_words();
    for &word in &exp_words[..exp_words.len() - 1] {
        let mut word = word;
        for _ in 0..64 {
            if word & 1 != 0 {
                result = mul_reduce(&mut scratch, &result, &base_copy);
            }
            base_copy = mul_reduce(&mut scratch, &base_copy, &base_copy);
            word >>= 1;
        }
    }

    // last word: stop squaring once the remaining bits are zero
    let mut word = exp_words[exp_words.len() - 1];
    while word != 0 {
        if word & 1 != 0 {
            result = mul_reduce(&mut scratch, &result, &base_copy);
        }
        if word != 1 {
            base_copy = mul_reduce(&mut scratch, &base_copy, &base_copy);
        }
        word >>= 1;
    }

    result.set_signed(both_signed);
    result
}

impl Pow<&BitVec> for &BitVec {
    type Output = BitVec;

    fn pow(self, rhs: &BitVec) -> BitVec {
        BitVec::pow(self, rhs)
    }
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);
forward_binop!(Div, div);
forward_binop!(Rem, rem);

forward_assign!(AddAssign, add_assign, +);
forward_assign!(SubAssign, sub_assign, -);
forward_assign!(MulAssign, mul_assign, *);
forward_assign!(DivAssign, div_assign, /);
forward_assign!(RemAssign, rem_assign, %);
