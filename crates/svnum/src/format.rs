//! Base-aware rendering in literal syntax (`width'sbase digits`).

use std::fmt;

use crate::bitvec::BitVec;
use crate::logic::Logic;
use crate::parse::LiteralBase;
use crate::word;

const DIGIT_CHARS: &[u8; 16] = b"0123456789abcdef";

impl BitVec {
    /// The base `Display` uses: binary for narrow or unknown values,
    /// decimal for 32-bit or signed values, hex for the rest.
    pub fn default_base(&self) -> LiteralBase {
        if self.width() < 8 || self.has_unknown() {
            LiteralBase::Binary
        } else if self.width() == 32 || self.is_signed() {
            LiteralBase::Decimal
        } else {
            LiteralBase::Hex
        }
    }

    /// Render in the given base.
    pub fn to_base_string(&self, base: LiteralBase) -> String {
        let mut buffer = Vec::with_capacity(self.width() as usize / 3 + 12);
        self.write_to(&mut buffer, base);
        String::from_utf8(buffer).expect("rendered literals are ASCII")
    }

    /// Stream the rendering into a byte buffer.
    ///
    /// A negative fully-known signed value renders as `-` plus its
    /// magnitude. The `width'sbase` prefix is omitted only for the default
    /// literal form, 32-bit signed decimal with no unknowns. A decimal
    /// rendering of an unknown value is a single `x` or `z`.
    pub fn write_to(&self, buffer: &mut Vec<u8>, base: LiteralBase) {
        let mut tmp = self.clone();
        if self.is_signed() && !self.has_unknown() && self.is_negative() {
            tmp = -tmp;
            buffer.push(b'-');
        }

        if base != LiteralBase::Decimal || self.width() != 32 || !self.is_signed() || self.has_unknown()
        {
            buffer.extend_from_slice(self.width().to_string().as_bytes());
            buffer.push(b'\'');
            if self.is_signed() {
                buffer.push(b's');
            }
            buffer.push(base.letter());
        }

        let start = buffer.len();
        if base == LiteralBase::Decimal {
            if self.has_unknown() {
                // all-X or all-Z; anything else cannot parse back as decimal
                buffer.push(if tmp.value_words()[0] != 0 { b'z' } else { b'x' });
            } else {
                let mut words = tmp.value_words().to_vec();
                while words.iter().any(|&word| word != 0) {
                    let digit = word::divmod_small(&mut words, 10);
                    buffer.push(DIGIT_CHARS[digit as usize]);
                }
            }
        } else {
            let shift = base.shift();
            let mask = (1u64 << shift) - 1;
            // keep emitting while any bit is set or unknown; shifting can
            // strip the unknowns partway through
            loop {
                let live = tmp.reduction_or();
                if live == Logic::Zero {
                    break;
                }
                let digit = (tmp.value_words()[0] & mask) as usize;
                if !tmp.has_unknown() {
                    buffer.push(DIGIT_CHARS[digit]);
                } else {
                    let unknown_bits = tmp.shadow_words()[0] & mask;
                    if unknown_bits == 0 {
                        buffer.push(DIGIT_CHARS[digit]);
                    } else if digit != 0 {
                        buffer.push(b'z');
                    } else {
                        buffer.push(b'x');
                    }
                }
                tmp = tmp.lshr_by(shift);
            }
        }

        if buffer.len() == start {
            buffer.push(b'0');
        } else {
            buffer[start..].reverse();
        }
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base_string(self.default_base()))
    }
}

impl fmt::Debug for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
