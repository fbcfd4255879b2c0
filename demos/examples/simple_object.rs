//! racebench Example: simple object validation
//!
//! Races five validators of the same small record against a hand-written
//! reference. `strict phone` always fails and `async schema` is skipped, so
//! the report shows every row status.
//!
//! Run with:
//!   cargo run --release --example simple_object -p racebench-demos
//!   cargo run --release --example simple_object -p racebench-demos -- --format json
//!   cargo run --release --example simple_object -p racebench-demos -- --filter regex

use racebench_demos::simple_object_suite;

fn main() -> anyhow::Result<()> {
    racebench::run(vec![simple_object_suite()?])
}
