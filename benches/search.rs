use alloy::primitives::U256;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::str::FromStr;

use gyre::arb::decimal::Dec;
use gyre::arb::paths::possible_paths;
use gyre::arb::pool::{Pool, PoolCore};
use gyre::arb::route::{routes, GasMultipliers};
use gyre::arb::types::Token;

/// Generate a synthetic constant-product market over `token_count` tokens
fn generate_benchmark_pools(pool_count: usize, token_count: usize) -> (Vec<Pool>, Vec<Token>) {
    let tokens: Vec<Token> = (0..token_count)
        .map(|i| Token::new(format!("token{i}"), 6))
        .collect();

    let mut pools = Vec::with_capacity(pool_count);
    for i in 0..pool_count {
        let idx0 = fastrand::usize(0..token_count);
        let mut idx1 = fastrand::usize(0..token_count);
        while idx0 == idx1 {
            idx1 = fastrand::usize(0..token_count);
        }

        pools.push(Pool::ConstantProduct(PoolCore {
            address: format!("pool{i}"),
            token0: tokens[idx0].address.clone(),
            token1: tokens[idx1].address.clone(),
            amount0: U256::from(fastrand::u64(1_000..1_000_000_000)),
            amount1: U256::from(fastrand::u64(1_000..1_000_000_000)),
            lp_fee: Dec::from_str("0.003").unwrap(),
            dao_fee: Dec::from_str("0").unwrap(),
        }));
    }
    (pools, tokens)
}

/// Benchmark path enumeration alone across market sizes
fn bench_possible_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("possible_paths");
    group.sample_size(10);

    for pool_count in [50usize, 100, 250] {
        let token_count = (pool_count / 5).max(10);
        let (pools, _) = generate_benchmark_pools(pool_count, token_count);

        group.bench_with_input(
            BenchmarkId::from_parameter(pool_count),
            &pool_count,
            |b, _| {
                b.iter(|| black_box(possible_paths("token0", "token0", 3, &pools)));
            },
        );
    }
    group.finish();
}

/// Benchmark full route evaluation: enumerate, simulate, rank
fn bench_routes(c: &mut Criterion) {
    let mut group = c.benchmark_group("routes");
    group.sample_size(10);

    for pool_count in [50usize, 100, 250] {
        let token_count = (pool_count / 5).max(10);
        let (pools, tokens) = generate_benchmark_pools(pool_count, token_count);
        let gas = GasMultipliers::default();

        group.bench_with_input(
            BenchmarkId::from_parameter(pool_count),
            &pool_count,
            |b, _| {
                b.iter(|| {
                    black_box(
                        routes(
                            U256::from(10_000u64),
                            "token0",
                            "token0",
                            3,
                            &pools,
                            &tokens,
                            &gas,
                        )
                        .unwrap(),
                    )
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_possible_paths, bench_routes);
criterion_main!(benches);
