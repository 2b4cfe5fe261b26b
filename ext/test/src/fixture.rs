//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the prefmatch engine.
//!
//! ```yaml
//! name: numerical
//! description: real-number comparisons
//! prefs:
//!   profile:
//!     views: 12
//! cases:
//!   - name: above threshold
//!     matchers:
//!       - { prefPath: views, condition: "[R>]:10" }
//!     expect: true
//! ```

use chrono::{DateTime, Utc};
use prefmatch::prelude::*;
use prefmatch::{parse_time, ConditionMatcherConfig, PrefSnapshot};
use serde::Deserialize;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Evaluation time for epoch conditions; the wall clock when absent.
    #[serde(default)]
    pub now: Option<String>,
    #[serde(default)]
    pub prefs: PrefSnapshot,
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub matchers: Vec<ConditionMatcherConfig>,
    pub expect: bool,
}

impl TestCase {
    /// Build the matcher map for this case
    pub fn build_matchers(&self) -> ConditionMatcherMap {
        self.matchers
            .iter()
            .map(|m| (m.pref_path.clone(), m.condition.clone()))
            .collect()
    }
}

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: bool,
    pub trace: MatchTrace,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// The fixed evaluation time, if any
    ///
    /// Panics if `now` is set but unparsable.
    pub fn now(&self) -> DateTime<Utc> {
        match &self.now {
            Some(now) => parse_time(now)
                .unwrap_or_else(|| panic!("Fixture '{}' has invalid now: {now}", self.name)),
            None => Utc::now(),
        }
    }

    /// Run all test cases and return results
    pub fn run(&self) -> Vec<CaseResult> {
        let now = self.now();
        self.cases
            .iter()
            .map(|case| {
                let trace = match_conditions_with_trace(&self.prefs, &case.build_matchers(), now);
                CaseResult {
                    case_name: case.name.clone(),
                    passed: trace.matched == case.expect,
                    expected: case.expect,
                    trace,
                }
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {:#?}",
                self.name, result.case_name, result.expected, result.trace
            );
        }
    }
}
