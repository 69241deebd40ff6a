//! Depth-first enumeration of swap paths over the pool graph.
//!
//! The graph is implicit: pools are edges, tokens are nodes. The walk keeps
//! a visited set of pool addresses, so a pool appears at most once per path,
//! while tokens may repeat. Pools are tried in the caller-supplied order at
//! every level, which makes the emission order deterministic.

use std::collections::HashSet;

use crate::arb::pool::Pool;
use crate::arb::types::PoolAddress;

/// All simple (pool-wise) paths from `input_token` to `output_token` of at
/// most `max_hops` pools. With `input_token == output_token` the result is
/// the set of cycles through that token.
///
/// A path is recorded whenever the walk stands on `output_token` after at
/// least one hop, and the walk then continues: longer routes through the
/// output token are still explored up to the hop bound.
#[must_use]
pub fn possible_paths(
    input_token: &str,
    output_token: &str,
    max_hops: usize,
    pools: &[Pool],
) -> Vec<Vec<PoolAddress>> {
    let mut found = Vec::new();
    let mut path = Vec::new();
    let mut visited = HashSet::new();
    walk(
        input_token,
        output_token,
        max_hops,
        pools,
        &mut path,
        &mut visited,
        &mut found,
        0,
    );
    found
}

#[allow(clippy::too_many_arguments)]
fn walk(
    current_token: &str,
    output_token: &str,
    max_hops: usize,
    pools: &[Pool],
    path: &mut Vec<PoolAddress>,
    visited: &mut HashSet<PoolAddress>,
    found: &mut Vec<Vec<PoolAddress>>,
    depth: usize,
) {
    if depth > 0 && current_token == output_token {
        found.push(path.clone());
    }
    if depth >= max_hops {
        return;
    }

    for pool in pools {
        if visited.contains(pool.address()) || !pool.contains(current_token) {
            continue;
        }
        let next_token = pool.other_token(current_token).clone();
        visited.insert(pool.address().to_string());
        path.push(pool.address().to_string());
        walk(
            &next_token,
            output_token,
            max_hops,
            pools,
            path,
            visited,
            found,
            depth + 1,
        );
        path.pop();
        visited.remove(pool.address());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_parallel_pools() {
        // two pools on the same pair: both single-hop paths, in pool order,
        // and no pool twice within one path
        let pools = vec![
            cpmm("P1", "A", "B", 1_000_000, 1_000_000),
            cpmm("P2", "A", "B", 1_000_000, 1_000_000),
        ];
        let paths = possible_paths("A", "B", 3, &pools);
        assert_eq!(paths, vec![vec!["P1".to_string()], vec!["P2".to_string()]]);
    }

    #[test]
    fn test_cycles_through_parallel_pools() {
        let pools = vec![
            cpmm("P1", "A", "B", 1_000_000, 1_000_000),
            cpmm("P2", "A", "B", 1_000_000, 1_000_000),
        ];
        let paths = possible_paths("A", "A", 2, &pools);
        assert_eq!(
            paths,
            vec![
                vec!["P1".to_string(), "P2".to_string()],
                vec!["P2".to_string(), "P1".to_string()],
            ]
        );
    }

    #[test]
    fn test_triangle_cycles() {
        let pools = triangle_pools(104_000);
        let paths = possible_paths("A", "A", 3, &pools);
        assert_eq!(
            paths,
            vec![
                vec!["P1".to_string(), "P2".to_string(), "P3".to_string()],
                vec!["P3".to_string(), "P2".to_string(), "P1".to_string()],
            ]
        );
        for path in &paths {
            let first = pools.iter().find(|p| p.address() == path[0]).unwrap();
            let last = pools.iter().find(|p| p.address() == path[path.len() - 1]).unwrap();
            assert!(first.contains("A"));
            assert!(last.contains("A"));
        }
    }

    #[test]
    fn test_hop_bound() {
        let pools = triangle_pools(104_000);
        assert!(possible_paths("A", "A", 2, &pools).is_empty());
        for path in possible_paths("A", "A", 5, &pools) {
            assert!(path.len() <= 5);
        }
    }

    #[test]
    fn test_zero_hops() {
        let pools = vec![cpmm("P1", "A", "B", 1_000_000, 1_000_000)];
        assert!(possible_paths("A", "B", 0, &pools).is_empty());
        assert!(possible_paths("A", "A", 0, &pools).is_empty());
    }

    #[test]
    fn test_unknown_token() {
        let pools = vec![cpmm("P1", "A", "B", 1_000_000, 1_000_000)];
        assert!(possible_paths("Z", "B", 3, &pools).is_empty());
    }
}
