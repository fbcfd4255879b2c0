//! racebench Example: sorting
//!
//! Races three ways of sorting the same shuffled vector, with the standard
//! stable sort as the reference.
//!
//! Run with:
//!   cargo run --release --example sorting
//!   cargo run --release --example sorting -- --format markdown
//!   cargo run --release --example sorting -- --seed 7 --time-budget 500ms

use racebench::prelude::*;

fn shuffled(n: u64) -> Vec<u64> {
    // Deterministic LCG so every candidate sorts the same input
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            state >> 33
        })
        .collect()
}

fn insertion_sort(v: &mut [u64]) {
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && v[j - 1] > v[j] {
            v.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let input = shuffled(512);

    let small = {
        let (a, b, c) = (input.clone(), input.clone(), input.clone());
        Suite::new("sort 512 u64")
            .reference(
                "slice::sort",
                from_fn(move || {
                    let mut v = a.clone();
                    v.sort();
                    v
                }),
            )?
            .case(
                "slice::sort_unstable",
                from_fn(move || {
                    let mut v = b.clone();
                    v.sort_unstable();
                    v
                }),
            )?
            .case(
                "insertion sort",
                from_fn(move || {
                    let mut v = c.clone();
                    insertion_sort(&mut v);
                    v
                }),
            )?
    };

    racebench::run(vec![small])
}
