use criterion::{Criterion, black_box, criterion_group, criterion_main};

use pogcore::{
    BType, Define, PO, POGroup, Pog, Pred, ReaderConfig, Set, TypedVar, WriterConfig, read_str,
    write_string,
};

fn comparison(var: &str, value: usize) -> Pred {
    Pred::new("Exp_Comparison")
        .with_attribute("op", "<=")
        .with_child(Pred::new("Id").with_attribute("value", var).with_type(BType::Int))
        .with_child(
            Pred::new("Integer_Literal")
                .with_attribute("value", value.to_string())
                .with_type(BType::Int),
        )
}

/// A machine-sized document: a few defines and `groups` groups of ten goals each.
fn build_document(groups: usize) -> Pog {
    let types = vec![
        BType::Int,
        BType::Bool,
        BType::power(BType::Int),
        BType::power(BType::product(BType::Int, BType::Int)),
        BType::structure([("count", BType::Int), ("ready", BType::Bool)]),
    ];

    let defines = (0..4)
        .map(|i| {
            let mut define = Define::new(format!("ctx_{}", i), 0x1000 + i as u64);
            define.push_set(Set::enumerated(
                TypedVar::new(format!("S{}", i), BType::power(BType::Int)),
                (0..8)
                    .map(|e| TypedVar::new(format!("e{}_{}", i, e), BType::Int))
                    .collect(),
            ));
            for v in 0..16 {
                define.push_predicate(comparison(&format!("v{}", v), v));
            }
            define
        })
        .collect();

    let groups = (0..groups)
        .map(|g| {
            POGroup::new(
                format!("Operation_{}", g),
                g as u64,
                vec!["ctx_0".into(), "ctx_1".into()],
                (0..6).map(|h| comparison("x", h)).collect(),
                (0..4).map(|h| comparison("y", h)).collect(),
                (0..10)
                    .map(|p| PO::new(format!("PO_{}", p), vec![p % 4, 3 - p % 4], comparison("z", p)))
                    .collect(),
            )
        })
        .collect();

    Pog::new(types, defines, groups)
}

fn bench_write(c: &mut Criterion) {
    let small = build_document(4);
    let large = build_document(256);
    let config = WriterConfig::default();

    c.bench_function("write_small", |b| {
        b.iter(|| black_box(write_string(&small, &config).unwrap()))
    });

    c.bench_function("write_large", |b| {
        b.iter(|| black_box(write_string(&large, &config).unwrap()))
    });
}

fn bench_read(c: &mut Criterion) {
    let config = ReaderConfig::default();
    let small = write_string(&build_document(4), &WriterConfig::default()).unwrap();
    let large = write_string(&build_document(256), &WriterConfig::default()).unwrap();

    c.bench_function("read_small", |b| {
        b.iter(|| black_box(read_str(&small, &config).unwrap()))
    });

    c.bench_function("read_large", |b| {
        b.iter(|| black_box(read_str(&large, &config).unwrap()))
    });
}

criterion_group!(benches, bench_write, bench_read);
criterion_main!(benches);
