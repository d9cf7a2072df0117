use std::hash::{Hash, Hasher};

use fxhash::FxHasher;
use num_traits::ToPrimitive;

use crate::logic::Logic;
use crate::storage::Words;
use crate::word::{self, num_words, top_word_bits, which_word, BITS_PER_WORD};

/// Maximum bit width of a [`BitVec`].
pub const MAX_BITS: u32 = (1 << 24) - 1;

/// A fixed-width four-state integer.
///
/// Each of the `width` bits is 0, 1, X, or Z. The value lives in a single
/// inline word when it fits (at most 64 bits, no unknown bits); otherwise in
/// a heap buffer of little-endian words. Unknown bits add a shadow plane of
/// equal length after the value plane: a set shadow bit marks the position
/// unknown, and the paired value bit distinguishes Z (1) from X (0).
///
/// Operators produce new values and wrap modulo `2^width`. Arithmetic never
/// fails: division by zero and any-unknown operands yield all-X results, as
/// the language requires. Parsing is the only fallible surface.
#[derive(Clone)]
pub struct BitVec {
    width: u32,
    signed: bool,
    unknown: bool,
    words: Words,
}

impl BitVec {
    /// A `width`-bit value from the low bits of `value`.
    ///
    /// Widths above 64 sign-extend when `signed` and `value` is negative as
    /// a 64-bit integer.
    pub fn new(width: u32, value: u64, signed: bool) -> Self {
        assert!(width >= 1 && width <= MAX_BITS, "bit width out of range");
        let mut result = if width <= BITS_PER_WORD {
            BitVec {
                width,
                signed,
                unknown: false,
                words: Words::Inline(value),
            }
        } else {
            let mut buf = vec![0u64; num_words(width)];
            buf[0] = value;
            if signed && (value as i64) < 0 {
                for word in &mut buf[1..] {
                    *word = u64::MAX;
                }
            }
            BitVec {
                width,
                signed,
                unknown: false,
                words: Words::Heap(buf.into_boxed_slice()),
            }
        };
        result.clear_unused_bits();
        result
    }

    pub fn zero(width: u32, signed: bool) -> Self {
        Self::new(width, 0, signed)
    }

    /// All bits one (`-1` when interpreted as signed).
    pub fn all_ones(width: u32, signed: bool) -> Self {
        let mut result = Self::alloc_zeroed(width, signed, false);
        for word in result.words.as_mut_slice() {
            *word = u64::MAX;
        }
        result.clear_unused_bits();
        result
    }

    /// All bits X.
    pub fn filled_x(width: u32, signed: bool) -> Self {
        let mut result = Self::alloc_zeroed(width, signed, true);
        let n = num_words(width);
        for word in &mut result.words.as_mut_slice()[n..] {
            *word = u64::MAX;
        }
        result.clear_unused_bits();
        result
    }

    /// All bits Z.
    pub fn filled_z(width: u32, signed: bool) -> Self {
        let mut result = Self::alloc_zeroed(width, signed, true);
        for word in result.words.as_mut_slice() {
            *word = u64::MAX;
        }
        result.clear_unused_bits();
        result
    }

    pub fn set_all_zeros(&mut self) {
        *self = Self::zero(self.width, self.signed);
    }

    pub fn set_all_ones(&mut self) {
        *self = Self::all_ones(self.width, self.signed);
    }

    pub fn set_all_x(&mut self) {
        *self = Self::filled_x(self.width, self.signed);
    }

    pub fn set_all_z(&mut self) {
        *self = Self::filled_z(self.width, self.signed);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Whether any bit is X or Z.
    pub fn has_unknown(&self) -> bool {
        self.unknown
    }

    // ─────────────────────────────────────────────────────
    //  Storage plumbing
    // ─────────────────────────────────────────────────────

    /// Zeroed storage obeying the inline/heap invariant for the flags.
    pub(crate) fn alloc_zeroed(width: u32, signed: bool, unknown: bool) -> Self {
        assert!(width >= 1 && width <= MAX_BITS, "bit width out of range");
        let words = if width <= BITS_PER_WORD && !unknown {
            Words::Inline(0)
        } else {
            Words::heap_zeroed(num_words(width) * if unknown { 2 } else { 1 })
        };
        BitVec {
            width,
            signed,
            unknown,
            words,
        }
    }

    /// The degenerate zero-width value produced by an empty concatenation.
    pub(crate) fn width_zero() -> Self {
        BitVec {
            width: 0,
            signed: false,
            unknown: false,
            words: Words::Inline(0),
        }
    }

    pub(crate) fn set_signed(&mut self, signed: bool) {
        self.signed = signed;
    }

    /// Both planes as one buffer (shadow plane present iff `has_unknown`).
    pub(crate) fn raw_words(&self) -> &[u64] {
        self.words.as_slice()
    }

    pub(crate) fn raw_words_mut(&mut self) -> &mut [u64] {
        self.words.as_mut_slice()
    }

    pub(crate) fn value_words(&self) -> &[u64] {
        &self.words.as_slice()[..num_words(self.width)]
    }

    pub(crate) fn shadow_words(&self) -> &[u64] {
        debug_assert!(self.unknown);
        &self.words.as_slice()[num_words(self.width)..]
    }

    pub(crate) fn shadow_word(&self, index: usize) -> u64 {
        if self.unknown {
            self.words.as_slice()[num_words(self.width) + index]
        } else {
            0
        }
    }

    pub(crate) fn is_single_word(&self) -> bool {
        self.words.is_inline()
    }

    pub(crate) fn value_bit(&self, bit: u32) -> bool {
        self.value_words()[which_word(bit)] & word::mask_bit(bit) != 0
    }

    pub(crate) fn shadow_bit(&self, bit: u32) -> bool {
        self.unknown && self.shadow_words()[which_word(bit)] & word::mask_bit(bit) != 0
    }

    /// Re-house the value with an all-zero shadow plane attached.
    pub(crate) fn promote_unknown(&mut self) {
        if self.unknown {
            return;
        }
        let n = num_words(self.width);
        let mut buf = vec![0u64; n * 2];
        buf[..n].copy_from_slice(self.value_words());
        self.unknown = true;
        self.words = Words::Heap(buf.into_boxed_slice());
    }

    // ─────────────────────────────────────────────────────
    //  Canonicalization
    // ─────────────────────────────────────────────────────

    /// Zero the bits above `width - 1` in the top word of each plane.
    pub(crate) fn clear_unused_bits(&mut self) {
        let word_bits = self.width % BITS_PER_WORD;
        if word_bits == 0 {
            return;
        }
        let mask = u64::MAX >> (BITS_PER_WORD - word_bits);
        let n = num_words(self.width);
        match &mut self.words {
            Words::Inline(value) => *value &= mask,
            Words::Heap(buf) => {
                buf[n - 1] &= mask;
                if self.unknown {
                    buf[2 * n - 1] &= mask;
                }
            }
        }
    }

    /// Drop the shadow plane if every unknown bit has been cleared, shrinking
    /// back to inline storage when the value fits.
    pub(crate) fn check_unknown(&mut self) {
        if !self.unknown {
            return;
        }
        let n = num_words(self.width);
        if self.words.as_slice()[n..].iter().any(|&word| word != 0) {
            return;
        }
        self.unknown = false;
        let buf = self.words.as_slice();
        self.words = if self.width <= BITS_PER_WORD {
            Words::Inline(buf[0])
        } else {
            Words::Heap(buf[..n].to_vec().into_boxed_slice())
        };
    }

    // ─────────────────────────────────────────────────────
    //  Extension
    // ─────────────────────────────────────────────────────

    /// Sign-extend to a strictly wider `bits`.
    pub fn sign_extend(&self, bits: u32) -> BitVec {
        assert!(bits > self.width);
        if bits <= BITS_PER_WORD && !self.unknown {
            let shift = BITS_PER_WORD - self.width;
            let value = ((self.value_words()[0] << shift) as i64 >> shift) as u64;
            return BitVec::new(bits, value, self.signed);
        }

        let mut result = Self::alloc_zeroed(bits, self.signed, self.unknown);
        let old_words = num_words(self.width);
        let new_words = num_words(bits);
        {
            let src = self.raw_words();
            let dst = result.raw_words_mut();
            word::sign_extend_copy(&mut dst[..new_words], &src[..old_words], self.width);
            if self.unknown {
                word::sign_extend_copy(&mut dst[new_words..], &src[old_words..], self.width);
            }
        }
        result.clear_unused_bits();
        result
    }

    /// Zero-extend to a strictly wider `bits`.
    pub fn zero_extend(&self, bits: u32) -> BitVec {
        assert!(bits > self.width);
        if bits <= BITS_PER_WORD && !self.unknown {
            return BitVec::new(bits, self.value_words()[0], self.signed);
        }

        let mut result = Self::alloc_zeroed(bits, self.signed, self.unknown);
        let old_words = num_words(self.width);
        let new_words = num_words(bits);
        {
            let src = self.raw_words();
            let dst = result.raw_words_mut();
            dst[..old_words].copy_from_slice(&src[..old_words]);
            if self.unknown {
                dst[new_words..new_words + old_words].copy_from_slice(&src[old_words..]);
            }
        }
        result
    }

    /// Sign- or zero-extend depending on `sign`.
    pub fn extend(&self, bits: u32, sign: bool) -> BitVec {
        if sign {
            self.sign_extend(bits)
        } else {
            self.zero_extend(bits)
        }
    }

    // ─────────────────────────────────────────────────────
    //  Bit counts and predicates
    // ─────────────────────────────────────────────────────

    /// Width minus the leading zeros of the value plane.
    pub fn active_bits(&self) -> u32 {
        self.width - self.count_leading_zeros()
    }

    pub fn count_leading_zeros(&self) -> u32 {
        if self.width == 0 {
            return 0;
        }
        let words = self.value_words();
        let n = words.len();
        let msw_bits = top_word_bits(self.width);
        let top = words[n - 1];
        if top != 0 {
            return top.leading_zeros() - (BITS_PER_WORD - msw_bits);
        }
        let mut count = msw_bits;
        for i in (0..n - 1).rev() {
            if words[i] == 0 {
                count += BITS_PER_WORD;
            } else {
                count += words[i].leading_zeros();
                break;
            }
        }
        count
    }

    pub fn count_leading_ones(&self) -> u32 {
        if self.width == 0 {
            return 0;
        }
        let words = self.value_words();
        let n = words.len();
        let msw_bits = top_word_bits(self.width);
        let shift = BITS_PER_WORD - msw_bits;
        let mut count = (words[n - 1] << shift).leading_ones();
        if count == msw_bits {
            for i in (0..n - 1).rev() {
                if words[i] == u64::MAX {
                    count += BITS_PER_WORD;
                } else {
                    count += words[i].leading_ones();
                    break;
                }
            }
        }
        count
    }

    /// Population count of the value plane. Only meaningful for fully-known
    /// values.
    pub fn count_ones(&self) -> u32 {
        self.value_words().iter().map(|word| word.count_ones()).sum()
    }

    /// Whether the top bit of the value plane is set.
    pub fn is_negative(&self) -> bool {
        self.width > 0 && self.value_bit(self.width - 1)
    }

    pub fn is_odd(&self) -> bool {
        self.value_words().first().is_some_and(|word| word & 1 != 0)
    }

    /// Known to be zero: no unknown bits and an all-zero value plane.
    pub fn is_zero(&self) -> bool {
        !self.unknown && self.value_words().iter().all(|&word| word == 0)
    }

    pub fn is_all_ones(&self) -> bool {
        !self.unknown && self.count_ones() == self.width
    }

    /// Stable 64-bit digest over width, flags, and both storage planes.
    pub fn hash64(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl Hash for BitVec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.width);
        state.write_u8(self.signed as u8);
        state.write_u8(self.unknown as u8);
        for &word in self.raw_words() {
            state.write_u64(word);
        }
    }
}

impl ToPrimitive for BitVec {
    fn to_u64(&self) -> Option<u64> {
        if self.unknown || (self.signed && self.is_negative()) || self.active_bits() > 64 {
            return None;
        }
        Some(self.value_words()[0])
    }

    fn to_i64(&self) -> Option<i64> {
        if self.unknown {
            return None;
        }
        if self.signed && self.is_negative() {
            // bits needed for the two's-complement form
            if self.width - self.count_leading_ones() >= 64 {
                return None;
            }
            let word = self.value_words()[0];
            if self.width >= BITS_PER_WORD {
                Some(word as i64)
            } else {
                let shift = BITS_PER_WORD - self.width;
                Some((word << shift) as i64 >> shift)
            }
        } else {
            if self.active_bits() > 63 {
                return None;
            }
            Some(self.value_words()[0] as i64)
        }
    }
}

impl From<bool> for BitVec {
    fn from(value: bool) -> Self {
        BitVec::new(1, value as u64, false)
    }
}

impl From<u32> for BitVec {
    fn from(value: u32) -> Self {
        BitVec::new(32, value as u64, false)
    }
}

impl From<i32> for BitVec {
    fn from(value: i32) -> Self {
        BitVec::new(32, value as u32 as u64, true)
    }
}

impl From<u64> for BitVec {
    fn from(value: u64) -> Self {
        BitVec::new(64, value, false)
    }
}

impl From<i64> for BitVec {
    fn from(value: i64) -> Self {
        BitVec::new(64, value as u64, true)
    }
}

impl From<Logic> for BitVec {
    fn from(bit: Logic) -> Self {
        match bit {
            Logic::Zero => BitVec::new(1, 0, false),
            Logic::One => BitVec::new(1, 1, false),
            Logic::X => BitVec::filled_x(1, false),
            Logic::Z => BitVec::filled_z(1, false),
        }
    }
}
