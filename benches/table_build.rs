//! Table reconstruction benchmarks
//!
//! Builds synthetic tables of growing height, with and without tokens that
//! need the second assignment phase.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ocr_tables::config::TableConfig;
use ocr_tables::document::{Page, Token};
use ocr_tables::geometry::BoundingBox;
use ocr_tables::tables::Table;

const COLUMNS: [(f32, f32); 4] = [(10.0, 60.0), (120.0, 260.0), (300.0, 340.0), (400.0, 460.0)];

/// Header plus `rows` body rows; every fifth row gets a straddling token.
fn synthetic_tokens(rows: usize, straddle: bool) -> Vec<Token> {
    let mut tokens = Vec::with_capacity((rows + 1) * COLUMNS.len());

    for row in 0..=rows {
        let y = row as f32 * 20.0;
        for (col, (x0, x1)) in COLUMNS.iter().enumerate() {
            let text = if row == 0 {
                format!("H{}", col)
            } else {
                format!("r{}c{}", row, col)
            };
            let (x0, x1) = if straddle && row > 0 && row % 5 == 0 && col == 1 {
                (x0 - 80.0, x1 - 80.0)
            } else {
                (*x0 + 2.0, *x1 - 2.0)
            };
            tokens.push(Token::new(text, BoundingBox::from_coords(x0, y, x1, y + 12.0)));
        }
    }

    tokens
}

fn bench_table_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_build");
    let page = Page::new(600.0, 10_000.0);
    let config = TableConfig::default();

    for rows in [10, 100, 400] {
        for straddle in [false, true] {
            let tokens = synthetic_tokens(rows, straddle);
            let id = format!("{}_rows{}", rows, if straddle { "_straddle" } else { "" });

            group.bench_with_input(BenchmarkId::from_parameter(id), &tokens, |b, tokens| {
                b.iter(|| black_box(Table::build(tokens.clone(), &page, &config)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_table_build);
criterion_main!(benches);
