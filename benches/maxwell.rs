use criterion::{criterion_group, criterion_main, Criterion};
use reos::{
    liquid_vapor_equilibria, CarnahanStarling, PengRobinson, ReducedEos, SearchParameters,
    SolverOptions, VanDerWaals,
};

fn construction<E: ReducedEos>(eos: &E, trs: &[f64]) {
    liquid_vapor_equilibria(eos, trs, SearchParameters::default(), SolverOptions::default())
        .unwrap();
}

fn maxwell_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("maxwell_construction");
    group.bench_function("van_der_waals", |b| {
        b.iter(|| construction(&VanDerWaals, &[0.85]))
    });
    group.bench_function("peng_robinson", |b| {
        b.iter(|| construction(&PengRobinson::default(), &[0.85]))
    });
    group.bench_function("carnahan_starling_batch", |b| {
        b.iter(|| construction(&CarnahanStarling, &[0.55, 0.75, 0.95]))
    });
}

criterion_group!(bench, maxwell_construction);
criterion_main!(bench);
