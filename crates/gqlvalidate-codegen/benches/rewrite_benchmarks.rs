//! Benchmarks for rule rewriting and annotation compilation
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gqlvalidate_codegen::{collect, rewrite_rule, Compilation, FieldNameMap, NamingConvention, Schema};

fn create_names(fields: usize) -> FieldNameMap {
    let mut names = FieldNameMap::new();
    for i in 0..fields {
        names.insert("BenchInput", &format!("field{}", i), format!("Field{}", i), None);
    }
    names
}

fn create_schema(types: usize, fields: usize) -> String {
    let mut sdl = String::new();
    for t in 0..types {
        sdl.push_str(&format!("input Bench{}Input {{\n", t));
        for f in 0..fields {
            let rule = match f % 4 {
                0 => "required,min=2".to_string(),
                1 => format!("eqfield=field{}", (f + 1) % fields),
                2 => format!("required_with=field0 field{}", (f + 2) % fields),
                _ => format!("required_if=field{} true", (f + 3) % fields),
            };
            sdl.push_str(&format!("  field{}: String @validate(rule: \"{}\")\n", f, rule));
        }
        sdl.push_str("}\n");
    }
    sdl
}

fn bench_rewrite_families(c: &mut Criterion) {
    let names = create_names(16);
    let mut group = c.benchmark_group("rewrite_families");

    let cases = [
        ("identity", "required,min=2,max=64,oneof=a b c"),
        ("whole_token", "eqfield=field3"),
        ("dotted_path", "eqcsfield=field1.field2"),
        ("space_list", "required_with=field1 field2 field3 field4"),
        ("paired_list", "required_if=field1 true field2 false field3 x"),
        ("mixed", "omitempty,required_with=field1 field2|eqfield=field3,min=1"),
    ];

    for (name, rule) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), rule, |b, rule| {
            b.iter(|| rewrite_rule(black_box(rule), "BenchInput", &names))
        });
    }
    group.finish();
}

fn bench_long_rules(c: &mut Criterion) {
    let names = create_names(64);
    let mut group = c.benchmark_group("long_rules");

    for segments in [4usize, 16, 64] {
        let rule = (0..segments)
            .map(|i| format!("required_with=field{} field{}", i % 64, (i + 7) % 64))
            .collect::<Vec<_>>()
            .join(",");
        group.bench_with_input(BenchmarkId::from_parameter(segments), &rule, |b, rule| {
            b.iter(|| rewrite_rule(black_box(rule), "BenchInput", &names))
        });
    }
    group.finish();
}

fn bench_compile_schema(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_schema");

    for types in [1usize, 10, 50] {
        let schema = Schema::parse(&create_schema(types, 20)).expect("bench schema parses");
        group.bench_with_input(BenchmarkId::from_parameter(types), &schema, |b, schema| {
            b.iter(|| {
                let annotations = collect(black_box(schema)).expect("bench schema collects");
                let names = FieldNameMap::seed(schema, NamingConvention::Pascal);
                Compilation::compile(&annotations, &names)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rewrite_families, bench_long_rules, bench_compile_schema);
criterion_main!(benches);
