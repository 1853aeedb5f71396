use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dfc_calc::CoverageCalculator;
use dfc_core::{DfcConfig, ForecastRecord, InventoryBatch};
use rust_decimal::Decimal;

fn dataset(products: usize, days: i64) -> (Vec<ForecastRecord>, Vec<InventoryBatch>) {
    let start = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
    let mut forecasts = Vec::new();
    let mut batches = Vec::new();

    for p in 0..products {
        let product_id = format!("P{:04}", p + 1);
        for d in 0..days {
            let demand = 5 + ((p as i64 * 7 + d * 3) % 11);
            forecasts.push(ForecastRecord::new(
                product_id.clone(),
                start + Duration::days(d),
                Decimal::from(demand),
            ));
        }
        for b in 0..4i64 {
            batches.push(InventoryBatch::new(
                product_id.clone(),
                format!("{}_B{}", product_id, b + 1),
                start + Duration::days(5 + b * 7 + (p as i64 % 5)),
                Decimal::from(40 + (p as i64 % 60)),
            ));
        }
    }

    (forecasts, batches)
}

fn bench_calculate(c: &mut Criterion) {
    let (forecasts, batches) = dataset(500, 30);
    let reference = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();

    let sequential = CoverageCalculator::new(DfcConfig::default());
    c.bench_function("calculate_500x30_sequential", |b| {
        b.iter(|| {
            sequential
                .calculate(black_box(&forecasts), black_box(&batches), reference)
                .unwrap()
        })
    });

    let parallel = CoverageCalculator::new(DfcConfig::default().with_parallel(true));
    c.bench_function("calculate_500x30_parallel", |b| {
        b.iter(|| {
            parallel
                .calculate(black_box(&forecasts), black_box(&batches), reference)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_calculate);
criterion_main!(benches);
