use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tabfold::config::FitSettings;
use tabfold::geometry::Bounds;
use tabfold::optimizer::{Candidate, Optimizer};
use tabfold::scorer::VolumeScore;
use tabfold::shapes::TargetShape;

fn criterion_benchmark(c: &mut Criterion) {
    let segments = 100;
    let lhat = 1.5;
    let objective = VolumeScore::new(segments, lhat);
    let mut candidate = Candidate::random(Bounds::volume(segments, lhat), Some(1));

    c.bench_function("volume sweep (N=100)", |b| {
        b.iter(|| candidate.sweep(black_box(&objective)))
    });

    let settings = FitSettings {
        fit_generations: 10,
        fit_era: 1,
    };
    let given = TargetShape::Semicircle.sample(segments, 0.4);

    c.bench_function("fit batch (N=100, 10 generations)", |b| {
        b.iter(|| {
            let mut opt =
                Optimizer::fit(&settings, given.clone()).expect("Failed to build optimizer");
            opt.start(Some(2));
            black_box(opt.run_batch().expect("Batch failed").score)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
