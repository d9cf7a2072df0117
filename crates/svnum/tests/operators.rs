use num_traits::ToPrimitive;
use svnum::{BitVec, LiteralBase};

fn bv(s: &str) -> BitVec {
    s.parse().unwrap()
}

#[test]
fn test_add_wraps_modulo_width() {
    let sum = bv("4'b1010") + bv("4'b0110");
    assert_eq!(sum, BitVec::zero(4, false));
}

#[test]
fn test_width_promotion_extends_narrower_operand() {
    let sum = bv("8'd10") + bv("16'd20");
    assert_eq!(sum.width(), 16);
    assert_eq!(sum.to_u64(), Some(30));
}

#[test]
fn test_result_signedness_is_and_of_operands() {
    let sum = bv("8'sd5") + bv("8'd5");
    assert!(!sum.is_signed());
    let sum = bv("8'sd5") + bv("8'sd5");
    assert!(sum.is_signed());
}

#[test]
fn test_signed_extension_on_promotion() {
    // -1 widened against a 16-bit signed operand stays -1
    let sum = bv("8'shff") + bv("16'sd1");
    assert_eq!(sum.width(), 16);
    assert_eq!(sum.to_i64(), Some(0));

    // with an unsigned operand the extension is zero-fill
    let sum = bv("8'hff") + bv("16'd1");
    assert_eq!(sum.to_u64(), Some(0x100));
}

#[test]
fn test_sub_wraps() {
    let diff = bv("4'd3") - bv("4'd5");
    assert_eq!(diff.to_u64(), Some(14));
}

#[test]
fn test_neg() {
    let v = -bv("8'sd3");
    assert_eq!(v.to_i64(), Some(-3));
    assert_eq!((-bv("8'sd0")).to_i64(), Some(0));
    assert!((-bv("8'bxxxxxxxx")).has_unknown());
}

#[test]
fn test_mul_truncates() {
    let product = bv("8'hff") * bv("8'hff");
    assert_eq!(product.to_u64(), Some(0x01));

    let product = bv("16'd300") * bv("16'd300");
    assert_eq!(product.to_u64(), Some(90000 % 65536));
}

#[test]
fn test_div_rem_unsigned() {
    assert_eq!((bv("32'd100") / bv("32'd7")).to_u64(), Some(14));
    assert_eq!((bv("32'd100") % bv("32'd7")).to_u64(), Some(2));
    let (q, r) = bv("32'd100").div_rem(&bv("32'd7"));
    assert_eq!(q.to_u64(), Some(14));
    assert_eq!(r.to_u64(), Some(2));
}

#[test]
fn test_div_rem_signed() {
    // quotient truncates toward zero, remainder takes the dividend's sign
    assert_eq!((bv("-8'sd7") / bv("8'sd2")).to_i64(), Some(-3));
    assert_eq!((bv("-8'sd7") % bv("8'sd2")).to_i64(), Some(-1));
    assert_eq!((bv("8'sd7") / bv("-8'sd2")).to_i64(), Some(-3));
    assert_eq!((bv("8'sd7") % bv("-8'sd2")).to_i64(), Some(1));
    assert_eq!((bv("-8'sd7") / bv("-8'sd2")).to_i64(), Some(3));
    assert_eq!((bv("-8'sd7") % bv("-8'sd2")).to_i64(), Some(-1));
}

#[test]
fn test_most_negative_division() {
    // -128 / 2: the magnitude of the dividend still has its top bit set
    assert_eq!((bv("8'sh80") / bv("8'sd2")).to_i64(), Some(-64));
    assert_eq!((bv("8'sh80") % bv("8'sd2")).to_i64(), Some(0));
}

#[test]
fn test_divide_by_zero_is_all_x() {
    let q = bv("8'd5") / bv("8'd0");
    assert!(q.has_unknown());
    assert_eq!(q.to_base_string(LiteralBase::Binary), "8'bxxxxxxxx");
    let r = bv("8'd5") % bv("8'd0");
    assert!(r.has_unknown());
}

#[test]
fn test_unknown_operand_poisons_arithmetic() {
    let sum = bv("4'b10x0") + bv("4'b0001");
    assert_eq!(sum.to_base_string(LiteralBase::Binary), "4'bxxxx");
    assert!((bv("4'b10x0") * bv("4'd2")).has_unknown());
    assert!((bv("4'd2") / bv("4'bxxxx")).has_unknown());
}

#[test]
fn test_pow_basics() {
    let result = bv("32'd10").pow(&bv("32'd3"));
    assert_eq!(result, bv("32'd1000"));
    assert_eq!(bv("8'd2").pow(&bv("8'd7")).to_u64(), Some(128));
    // wraps modulo 2^width
    assert_eq!(bv("8'd2").pow(&bv("8'd8")).to_u64(), Some(0));
}

#[test]
fn test_pow_special_cases() {
    // 0 ** 0 == 1, 0 ** y == 0
    assert_eq!(bv("8'd0").pow(&bv("8'd0")).to_u64(), Some(1));
    assert_eq!(bv("8'd0").pow(&bv("8'd5")).to_u64(), Some(0));
    // 0 ** negative is X
    assert!(bv("8'sd0").pow(&bv("-8'sd2")).has_unknown());
    // x ** 0 == 1, 1 ** y == 1
    assert_eq!(bv("8'd9").pow(&bv("8'd0")).to_u64(), Some(1));
    assert_eq!(bv("8'd1").pow(&bv("8'd200")).to_u64(), Some(1));
    // (-1) ** even/odd
    assert_eq!(bv("-8'sd1").pow(&bv("8'sd4")).to_i64(), Some(1));
    assert_eq!(bv("-8'sd1").pow(&bv("8'sd5")).to_i64(), Some(-1));
    // |x| > 1 to a negative power is 0
    assert_eq!(bv("8'sd2").pow(&bv("-8'sd1")).to_i64(), Some(0));
    // negative base, odd exponent
    assert_eq!(bv("-8'sd2").pow(&bv("8'sd3")).to_i64(), Some(-8));
    assert_eq!(bv("-8'sd2").pow(&bv("8'sd4")).to_i64(), Some(16));
    // unknowns poison
    assert!(bv("8'bx").pow(&bv("8'd2")).has_unknown());
}

#[test]
fn test_compound_assignment_self_aliasing() {
    let mut x = bv("8'd12");
    x += x.clone();
    assert_eq!(x.to_u64(), Some(24));
    x *= x.clone();
    assert_eq!(x.to_u64(), Some((24 * 24) & 0xFF));
    x -= x.clone();
    assert_eq!(x.to_u64(), Some(0));

    let mut y = bv("8'd7");
    y /= y.clone();
    assert_eq!(y.to_u64(), Some(1));
    let mut z = bv("8'd7");
    z %= z.clone();
    assert_eq!(z.to_u64(), Some(0));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_additive_inverse(value: u64, width in 1u32..=64) {
            let x = BitVec::new(width, value, false);
            prop_assert!((&x + &(-&x)).is_zero());
        }

        #[test]
        fn prop_double_complement(value: u64, width in 1u32..=64) {
            let x = BitVec::new(width, value, false);
            prop_assert_eq!(!&!&x, x);
        }

        #[test]
        fn prop_idempotent_bitwise(value: u64, width in 1u32..=64) {
            let x = BitVec::new(width, value, false);
            prop_assert!((&x ^ &x).is_zero());
            prop_assert_eq!(&x | &x, x.clone());
            prop_assert_eq!(&x & &x, x);
        }

        #[test]
        fn prop_mul_div_roundtrip(a: u32, b in 1u32..) {
            let x = BitVec::new(64, a as u64, false);
            let y = BitVec::new(64, b as u64, false);
            prop_assert_eq!(&(&x * &y) / &y, x);
        }

        #[test]
        fn prop_sign_extension_preserves_value(value: i32, extra in 1u32..=80) {
            let x = BitVec::from(value);
            let wide = x.sign_extend(32 + extra);
            prop_assert_eq!(wide.to_i64(), Some(value as i64));
        }
    }
}
