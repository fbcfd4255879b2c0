//! Suite Planner
//!
//! Applies the `--filter` regex before anything runs:
//! - a suite whose name matches is kept whole
//! - otherwise only cases whose name (or `suite/case` path) matches are kept
//! - suites left without cases are dropped
//!
//! Registration order is preserved; execution order is the scheduler's job.

use racebench_core::Suite;
use regex::Regex;

/// Suites selected for execution
pub struct ExecutionPlan {
    /// Suites to run, in the order they were given
    pub suites: Vec<Suite>,
}

impl ExecutionPlan {
    /// Total cases across all planned suites
    pub fn case_count(&self) -> usize {
        self.suites.iter().map(Suite::len).sum()
    }
}

/// Build an execution plan from the given suites
pub fn build_plan(suites: Vec<Suite>, filter: Option<&Regex>) -> ExecutionPlan {
    let Some(re) = filter else {
        return ExecutionPlan { suites };
    };

    let suites = suites
        .into_iter()
        .filter_map(|mut suite| {
            if re.is_match(suite.name()) {
                return Some(suite);
            }
            let suite_name = suite.name().to_string();
            suite.retain_cases(|case| {
                re.is_match(case.name()) || re.is_match(&format!("{}/{}", suite_name, case.name()))
            });
            (!suite.is_empty()).then_some(suite)
        })
        .collect();

    ExecutionPlan { suites }
}

#[cfg(test)]
mod tests {
    use super::*;
    use racebench_core::{ExecutionError, from_fn};

    fn make_suite(name: &str, cases: &[&str]) -> Suite {
        let mut suite = Suite::new(name);
        for (i, case) in cases.iter().enumerate() {
            if i == 0 {
                suite.add_reference_case(*case, from_fn(|| 1 + 1)).unwrap();
            } else {
                suite.add_case(*case, from_fn(|| 2 + 2)).unwrap();
            }
        }
        suite
    }

    fn names(plan: &ExecutionPlan) -> Vec<Vec<String>> {
        plan.suites
            .iter()
            .map(|s| s.cases().iter().map(|c| c.name().to_string()).collect())
            .collect()
    }

    #[test]
    fn test_no_filter_keeps_everything() {
        let plan = build_plan(
            vec![make_suite("json", &["serde", "simd"]), make_suite("empty", &[])],
            None,
        );
        assert_eq!(plan.suites.len(), 2);
        assert_eq!(plan.case_count(), 2);
    }

    #[test]
    fn test_suite_name_match_keeps_suite() {
        let re = Regex::new("^json$").unwrap();
        let plan = build_plan(
            vec![make_suite("json", &["serde", "simd"]), make_suite("yaml", &["serde"])],
            Some(&re),
        );
        assert_eq!(names(&plan), vec![vec!["serde", "simd"]]);
    }

    #[test]
    fn test_case_filter() {
        let re = Regex::new("simd").unwrap();
        let plan = build_plan(
            vec![make_suite("json", &["serde", "simd"]), make_suite("yaml", &["serde"])],
            Some(&re),
        );
        assert_eq!(names(&plan), vec![vec!["simd"]]);
        // The reference was filtered out
        assert!(plan.suites[0].reference_case().is_none());
        // Registration index survives filtering
        assert_eq!(plan.suites[0].cases()[0].index(), 1);
    }

    #[test]
    fn test_path_filter() {
        let re = Regex::new("^yaml/serde$").unwrap();
        let plan = build_plan(
            vec![make_suite("json", &["serde"]), make_suite("yaml", &["serde"])],
            Some(&re),
        );
        assert_eq!(plan.suites.len(), 1);
        assert_eq!(plan.suites[0].name(), "yaml");
    }

    #[test]
    fn test_failing_work_is_still_planned() {
        let mut suite = Suite::new("errs");
        suite
            .add_case("bad", || Err::<(), _>(ExecutionError::raised("no")))
            .unwrap();
        let plan = build_plan(vec![suite], Some(&Regex::new("bad").unwrap()));
        assert_eq!(plan.case_count(), 1);
    }
}
