//! racebench Demos
//!
//! Runnable demonstration suites. This crate is not published; it exists
//! solely to host examples that depend on `racebench`.
//!
//! Run any example with:
//! ```sh
//! cargo run --example <name> -p racebench-demos --release
//! ```
//!
//! | Example | Scenario |
//! |---------|----------|
//! | `simple_object` | Five ways to validate the same small record, one of which always fails |

pub mod validators;

use racebench::{ExecutionError, Suite};
use serde::Deserialize;

/// The record every validator checks
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
    pub email: String,
    pub first_name: String,
    pub phone: String,
    pub age: u32,
}

/// The payload used by the "Simple object" suite
pub fn sample_person() -> Person {
    Person {
        name: "John Doe".to_string(),
        email: "john.doe@company.space".to_string(),
        first_name: "John".to_string(),
        phone: "123-4567".to_string(),
        age: 33,
    }
}

/// The same payload as JSON text
pub const SAMPLE_JSON: &str = r#"{"name":"John Doe","email":"john.doe@company.space","firstName":"John","phone":"123-4567","age":33}"#;

/// Build the "Simple object" suite.
///
/// The hand-written validator is the reference; `strict phone` rejects the
/// payload's phone format and always fails; `async schema` is registered as
/// skipped.
pub fn simple_object_suite() -> anyhow::Result<Suite> {
    let person = sample_person();

    let manual = {
        let p = person.clone();
        move || validators::manual(&p)
    };

    let regex = {
        let p = person.clone();
        let rules = validators::RegexRules::new()?;
        move || rules.validate(&p)
    };

    let schema = {
        let schema = validators::person_schema();
        let value: serde_json::Value = serde_json::from_str(SAMPLE_JSON)?;
        move || schema.validate(&value)
    };

    let typed = move || validators::parse_typed(SAMPLE_JSON);

    let strict = {
        let p = person;
        move || validators::strict_phone(&p)
    };

    let mut suite = Suite::new("Simple object");
    suite
        .add_reference_case("manual", manual)?
        .add_case("regex rules", regex)?
        .add_case("json schema", schema)?
        .add_case("serde typed", typed)?
        .add_case("strict phone", strict)?
        .add_skipped_case(
            "async schema",
            || Err::<(), _>(ExecutionError::raised("no async runtime")),
        )?;
    Ok(suite)
}
