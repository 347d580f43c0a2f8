use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use digital_invoice::*;

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn build_invoice(profile: impl Into<Profile>, lines: u32) -> InvoiceBuilder {
    let mut builder = InvoiceBuilder::new("BENCH-001", test_date(), profile);
    builder
        .seller(
            PartyBuilder::new("Benchmark GmbH")
                .address(
                    AddressBuilder::new("Berlin", "10115", "DE")
                        .street("Hauptstr. 1")
                        .build(),
                )
                .vat_id("DE123456789")
                .build(),
        )
        .buyer(
            "BENCH-REF",
            PartyBuilder::new("Kunde AG")
                .address(AddressBuilder::new("München", "80331", "DE").build())
                .build(),
        );

    let rates = [dec!(19), dec!(7), dec!(0)];
    for i in 1..=lines {
        builder.add_line(
            LineItemBuilder::new(format!("Item {i}"), dec!(2), "C62", dec!(9.99))
                .tax_rate(rates[i as usize % rates.len()])
                .build(),
        );
    }
    builder
}

fn bench_aggregate(c: &mut Criterion) {
    c.bench_function("aggregate_1000_lines", |b| {
        b.iter(|| {
            let mut buckets = TaxBuckets::new();
            for i in 0..1000u32 {
                let rate = if i % 2 == 0 { dec!(20) } else { dec!(9.5) };
                buckets.add_line(rate, Decimal::from(i) + dec!(0.01)).unwrap();
            }
            black_box(TaxAggregator::compute(&buckets, ConformanceLevel::En16931))
        });
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let invoice = build_invoice(CiiProfile::En16931, 10);
    c.bench_function("snapshot_10_lines", |b| {
        b.iter(|| black_box(black_box(&invoice).snapshot()));
    });
}

fn bench_facturx_render(c: &mut Criterion) {
    let invoice = build_invoice(CiiProfile::En16931, 10);
    let snapshot = invoice.snapshot().unwrap();
    c.bench_function("facturx_render_10_lines", |b| {
        b.iter(|| black_box(facturx::FacturXGenerator.render(black_box(&snapshot))));
    });
}

fn bench_zugferd_render(c: &mut Criterion) {
    let invoice = build_invoice(CiiProfile::ZugferdComfort, 10);
    let snapshot = invoice.snapshot().unwrap();
    c.bench_function("zugferd_render_10_lines", |b| {
        b.iter(|| black_box(zugferd::ZugferdGenerator.render(black_box(&snapshot))));
    });
}

fn bench_ubl_render(c: &mut Criterion) {
    let invoice = build_invoice(UblPreset::Peppol, 10);
    let snapshot = invoice.snapshot().unwrap();
    c.bench_function("ubl_render_10_lines", |b| {
        b.iter(|| black_box(ubl::UblGenerator.render(black_box(&snapshot))));
    });
}

fn bench_ubl_render_1000_lines(c: &mut Criterion) {
    let invoice = build_invoice(UblPreset::Peppol, 1000);
    let snapshot = invoice.snapshot().unwrap();
    c.bench_function("ubl_render_1000_lines", |b| {
        b.iter(|| black_box(ubl::UblGenerator.render(black_box(&snapshot))));
    });
}

fn bench_structural_check(c: &mut Criterion) {
    let mut invoice = build_invoice(CiiProfile::En16931, 1000);
    let xml = invoice.to_xml().unwrap();
    let profile: Profile = CiiProfile::En16931.into();
    c.bench_function("structural_check_1000_lines", |b| {
        b.iter(|| black_box(StructuralValidator.check(black_box(&xml), &profile)));
    });
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_snapshot,
    bench_facturx_render,
    bench_zugferd_render,
    bench_ubl_render,
    bench_ubl_render_1000_lines,
    bench_structural_check,
);
criterion_main!(benches);
