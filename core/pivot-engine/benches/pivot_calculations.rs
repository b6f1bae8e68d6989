//! FILENAME: core/pivot-engine/benches/pivot_calculations.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::{Query, RawValue, TagDefinition, TagMatrix};
use tagcount_pivot::{generate_table, TableDefinition};

fn build_matrix(records: usize) -> TagMatrix {
    let mut matrix = TagMatrix::with_tags(vec![
        TagDefinition::string("region"),
        TagDefinition::int_range("age"),
        TagDefinition::string("product"),
        TagDefinition::boolean("returning"),
    ])
    .expect("valid schema");

    for i in 0..records {
        matrix
            .record(
                [
                    ("region", RawValue::from(format!("Region_{}", i % 12))),
                    ("age", RawValue::from((18 + (i * 7) % 60) as i64)),
                    ("product", RawValue::from(format!("Product_{}", (i / 3) % 40))),
                    ("returning", RawValue::from(i % 5 == 0)),
                ],
                None,
            )
            .expect("valid record");
    }
    matrix
}

fn bench_count(c: &mut Criterion) {
    let matrix = build_matrix(50_000);
    let query = Query::new()
        .one_of("region", ["Region_1", "Region_4", "Region_9"])
        .exact("returning", true);

    c.bench_function("count_union_with_wildcards", |b| {
        b.iter(|| matrix.count(black_box(&query)).expect("known tags"))
    });
}

fn bench_table(c: &mut Criterion) {
    let matrix = build_matrix(50_000);
    let definition = TableDefinition::new("age", "region");

    c.bench_function("table_age_by_region", |b| {
        b.iter(|| generate_table(black_box(&definition), &matrix).expect("known tags"))
    });
}

criterion_group!(benches, bench_count, bench_table);
criterion_main!(benches);
