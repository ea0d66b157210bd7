use criterion::BenchmarkId;
use criterion::Throughput;
use criterion::measurement::WallTime;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkGroup, Criterion, SamplingMode};
use market_clearing::{Market, MarketClearingSolver, PreferenceResolver, ScanResolver, SortedResolver};
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Beta;

type UInt = u32;
type Val = i64;

fn gen_market(seed: u64, size: usize, min_value: f64, range_width: f64) -> Market<UInt, Val> {
    let mut val_rng = ChaCha8Rng::seed_from_u64(seed);
    let mut price_rng = ChaCha8Rng::seed_from_u64(seed + 1);
    let beta = Beta::new(3.0, 3.0).unwrap();
    let price_between = Uniform::from(0..(range_width as Val / 2));

    let prices = (0..size).map(|_| price_between.sample(&mut price_rng)).collect();
    let valuations = (0..size)
        .map(|_| {
            (0..size)
                .map(|_| (range_width * beta.sample(&mut val_rng) + min_value).floor() as Val)
                .collect()
        })
        .collect();
    Market::new(size, prices, valuations).unwrap()
}

fn bench_resolver<R>(
    group: &mut BenchmarkGroup<WallTime>,
    name: &str,
    market: &Market<UInt, Val>,
) where
    R: PreferenceResolver<UInt, Val> + Default + Clone,
{
    let input = MarketClearingSolver::<UInt, Val, R>::new(market.len());
    let benchmark_id = BenchmarkId::new(name, format!("size {}", market.len()));
    group.bench_with_input(benchmark_id, &input, |b, input| {
        b.iter_batched(
            || input.clone(),
            |(mut solver, mut solution)| {
                solver.solve(market, &mut solution).unwrap();
                if solver.nrounds as usize > market.len() {
                    println!(
                        "too many rounds: nrounds {}, size {}",
                        solver.nrounds,
                        market.len()
                    );
                }
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_resolvers_by_size(c: &mut Criterion, max_size: usize, step: usize) {
    let mut group = c.benchmark_group("dense_random_market");
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    for size in (step..=max_size).step_by(step) {
        let market = gen_market(size as u64, size, 300.0, 700.0);
        group.throughput(Throughput::Elements((size * size) as u64));
        bench_resolver::<ScanResolver>(&mut group, "scan", &market);
        bench_resolver::<SortedResolver<UInt>>(&mut group, "sorted", &market);
    }
    group.finish();
}

fn bench_size_up_to_400(c: &mut Criterion) {
    bench_resolvers_by_size(c, 400, 100)
}

criterion_group!(benches, bench_size_up_to_400);
criterion_main!(benches);
