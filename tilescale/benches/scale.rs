use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tilescale::assemble::assemble;
use tilescale::catalog;
use tilescale::glyph::Glyph;
use tilescale::scale::scale;
use tilescale::source::{self, parse_c_array};

fn bench_scale(c: &mut Criterion) {
    let glyph = Glyph([0xFF, 0x81, 0xBD, 0xA5, 0xA5, 0xBD, 0x81, 0xFF]);
    c.bench_function("scale_one_glyph", |b| b.iter(|| scale(black_box(&glyph))));

    let src = source::duplicator_font();
    let cat = catalog::duplicator();
    c.bench_function("assemble_duplicator", |b| {
        b.iter(|| assemble(black_box(&src), black_box(&cat)).unwrap())
    });

    let text = include_str!("../fonts/duplicator_font.h");
    c.bench_function("parse_duplicator_font", |b| {
        b.iter(|| parse_c_array(black_box(text), "duplicator_graphics").unwrap())
    });
}

criterion_group!(benches, bench_scale);
criterion_main!(benches);
