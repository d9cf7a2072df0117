use svnum::{BitVec, LiteralBase};

fn bv(s: &str) -> BitVec {
    s.parse().unwrap()
}

fn all_bases(v: &BitVec) -> String {
    [
        LiteralBase::Binary,
        LiteralBase::Octal,
        LiteralBase::Decimal,
        LiteralBase::Hex,
    ]
    .iter()
    .map(|&base| v.to_base_string(base))
    .collect::<Vec<_>>()
    .join("\n")
}

#[test]
fn test_default_base_selection() {
    // narrow widths print binary
    assert_eq!(bv("4'd5").to_string(), "4'b101");
    // unknown bits force binary
    assert_eq!(bv("16'hx5").to_string(), "16'bxxxxxxxxxxxx0101");
    // 32-bit and signed values print decimal
    assert_eq!(bv("32'hdeadbeef").to_string(), "32'd3735928559");
    assert_eq!(bv("16'sd1000").to_string(), "16'sd1000");
    // everything else prints hex
    assert_eq!(bv("16'habc").to_string(), "16'habc");
}

#[test]
fn test_default_form_has_no_prefix() {
    // 32-bit signed decimal is the unadorned literal form
    assert_eq!(bv("100").to_string(), "100");
    assert_eq!(bv("-5").to_string(), "-5");
    assert_eq!(bv("0").to_string(), "0");
}

#[test]
fn test_negative_signed_renders_sign_and_magnitude() {
    assert_eq!(bv("-8'sd1").to_base_string(LiteralBase::Hex), "-8'sh1");
    assert_eq!(bv("8'sh80").to_base_string(LiteralBase::Decimal), "-8'sd128");
    assert_eq!(bv("-8'sd32").to_base_string(LiteralBase::Binary), "-8'sb100000");
}

#[test]
fn test_decimal_unknown_is_single_letter() {
    assert_eq!(bv("32'dx").to_base_string(LiteralBase::Decimal), "32'dx");
    assert_eq!(bv("16'dz").to_base_string(LiteralBase::Decimal), "16'dz");
}

#[test]
fn test_zero_renders_one_digit() {
    assert_eq!(bv("8'd0").to_base_string(LiteralBase::Hex), "8'h0");
    assert_eq!(bv("8'd0").to_base_string(LiteralBase::Binary), "8'b0");
}

#[test]
fn test_mixed_unknown_digit_groups() {
    // a digit group that mixes known and unknown bits prints x (no value
    // bits set) or z (some value bit set)
    assert_eq!(bv("8'hx5").to_base_string(LiteralBase::Hex), "8'hx5");
    assert_eq!(bv("8'b0z010101").to_base_string(LiteralBase::Hex), "8'hz5");
}

#[test]
fn test_write_to_appends() {
    let mut buffer = b"value = ".to_vec();
    bv("8'hff").write_to(&mut buffer, LiteralBase::Hex);
    assert_eq!(buffer, b"value = 8'hff");
}

#[test]
fn test_snapshot_known_value() {
    insta::assert_snapshot!(all_bases(&bv("16'hdead")), @r"
    16'b1101111010101101
    16'o157255
    16'd57005
    16'hdead
    ");
}

#[test]
fn test_snapshot_signed_negative() {
    insta::assert_snapshot!(all_bases(&bv("-16'sd1234")), @r"
    -16'sb10011010010
    -16'so2322
    -16'sd1234
    -16'sh4d2
    ");
}

#[test]
fn test_snapshot_wide_value() {
    insta::assert_snapshot!(
        bv("96'hffffffffffffffffffffffff").to_base_string(LiteralBase::Decimal),
        @"96'd79228162514264337593543950335"
    );
}

mod roundtrips {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_emit_then_parse_is_identity(
            value: u64,
            width in 1u32..=64,
            signed: bool,
            base_index in 0usize..4,
        ) {
            let base = [
                LiteralBase::Binary,
                LiteralBase::Octal,
                LiteralBase::Decimal,
                LiteralBase::Hex,
            ][base_index];
            let v = BitVec::new(width, value, signed);
            let text = v.to_base_string(base);
            let parsed: BitVec = text.parse().unwrap();
            prop_assert_eq!(parsed, v);
        }

        #[test]
        fn prop_wide_hex_roundtrip(lo: u64, hi: u64, extra in 1u32..=64) {
            let width = 64 + extra;
            let v = &BitVec::new(width, hi, false).shl_by(64) | &BitVec::new(width, lo, false);
            let text = v.to_base_string(LiteralBase::Hex);
            let parsed: BitVec = text.parse().unwrap();
            prop_assert_eq!(parsed, v);
        }
    }
}
