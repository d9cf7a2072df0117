use criterion::{criterion_group, criterion_main, Criterion};
use svnum::{BitVec, LiteralBase};

fn benchmark_core_ops(c: &mut Criterion) {
    let a: BitVec = "256'hdeadbeefcafebabe0123456789abcdef00aa00bb00cc00dd00ee00ff01234567"
        .parse()
        .unwrap();
    let b: BitVec = "256'hfeedfacef00dd00dfedcba987654321000112233445566778899aabbccddeeff"
        .parse()
        .unwrap();
    let small: BitVec = "32'hdeadbeef".parse().unwrap();

    c.bench_function("add_256", |bench| bench.iter(|| &a + &b));
    c.bench_function("mul_256", |bench| bench.iter(|| &a * &b));
    c.bench_function("divrem_256", |bench| bench.iter(|| a.div_rem(&b)));
    c.bench_function("shl_256", |bench| bench.iter(|| a.shl_by(77)));
    c.bench_function("add_32_inline", |bench| bench.iter(|| &small + &small));

    c.bench_function("parse_hex_literal", |bench| {
        bench.iter(|| "32'hdeadbeef".parse::<BitVec>().unwrap())
    });
    c.bench_function("parse_four_state_literal", |bench| {
        bench.iter(|| "64'b10xz01_10xz01_10xz01".parse::<BitVec>().unwrap())
    });
    c.bench_function("format_decimal_256", |bench| {
        bench.iter(|| a.to_base_string(LiteralBase::Decimal))
    });
}

criterion_group!(benches, benchmark_core_ops);
criterion_main!(benches);
