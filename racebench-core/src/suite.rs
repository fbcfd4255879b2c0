//! Suite and Case Registration
//!
//! A [`Suite`] is an ordered, unique-by-name set of [`Case`]s that all perform
//! the same logical operation on the same kind of input. Registration order is
//! preserved (it breaks ties when ranking) but says nothing about execution
//! order. At most one case is the reference that other cases are normalized
//! against.

use crate::error::ConfigurationError;
use crate::work::Work;
use fxhash::FxHashSet;
use std::fmt;

/// How a case takes part in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseRole {
    /// Measured and ranked
    Candidate,
    /// Measured, ranked, and used as the comparison baseline
    Reference,
    /// Registered but never executed; reported as skipped
    Skipped,
}

/// One named candidate
pub struct Case {
    name: String,
    index: usize,
    role: CaseRole,
    work: Box<dyn Work>,
}

impl Case {
    /// Case name, unique within its suite
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position in registration order
    pub fn index(&self) -> usize {
        self.index
    }

    /// Role of this case
    pub fn role(&self) -> CaseRole {
        self.role
    }

    /// Whether this is the suite's reference
    pub fn is_reference(&self) -> bool {
        self.role == CaseRole::Reference
    }

    /// Whether this case is excluded from execution
    pub fn is_skipped(&self) -> bool {
        self.role == CaseRole::Skipped
    }

    /// The case's work, for the sampler
    pub fn work_mut(&mut self) -> &mut dyn Work {
        self.work.as_mut()
    }
}

impl fmt::Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// A named collection of competing cases
pub struct Suite {
    name: String,
    cases: Vec<Case>,
    names: FxHashSet<String>,
    reference: Option<usize>,
}

impl Suite {
    /// Create an empty suite
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
            names: FxHashSet::default(),
            reference: None,
        }
    }

    /// Suite name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a candidate
    pub fn add_case(
        &mut self,
        name: impl Into<String>,
        work: impl Work + 'static,
    ) -> Result<&mut Self, ConfigurationError> {
        self.register(name.into(), Box::new(work), CaseRole::Candidate)
    }

    /// Register the reference candidate. Fails if one is already registered.
    pub fn add_reference_case(
        &mut self,
        name: impl Into<String>,
        work: impl Work + 'static,
    ) -> Result<&mut Self, ConfigurationError> {
        self.register(name.into(), Box::new(work), CaseRole::Reference)
    }

    /// Register a case that is listed in reports but never run
    pub fn add_skipped_case(
        &mut self,
        name: impl Into<String>,
        work: impl Work + 'static,
    ) -> Result<&mut Self, ConfigurationError> {
        self.register(name.into(), Box::new(work), CaseRole::Skipped)
    }

    /// Builder form of [`Suite::add_case`]
    pub fn case(
        mut self,
        name: impl Into<String>,
        work: impl Work + 'static,
    ) -> Result<Self, ConfigurationError> {
        self.add_case(name, work)?;
        Ok(self)
    }

    /// Builder form of [`Suite::add_reference_case`]
    pub fn reference(
        mut self,
        name: impl Into<String>,
        work: impl Work + 'static,
    ) -> Result<Self, ConfigurationError> {
        self.add_reference_case(name, work)?;
        Ok(self)
    }

    fn register(
        &mut self,
        name: String,
        work: Box<dyn Work>,
        role: CaseRole,
    ) -> Result<&mut Self, ConfigurationError> {
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName {
                suite: self.name.clone(),
            });
        }
        if self.names.contains(&name) {
            return Err(ConfigurationError::DuplicateCase {
                suite: self.name.clone(),
                name,
            });
        }
        if role == CaseRole::Reference {
            if let Some(existing) = self.reference_case() {
                return Err(ConfigurationError::DuplicateReference {
                    suite: self.name.clone(),
                    existing: existing.name.clone(),
                    attempted: name,
                });
            }
            self.reference = Some(self.cases.len());
        }

        self.names.insert(name.clone());
        let index = self.cases.last().map_or(0, |c| c.index + 1);
        self.cases.push(Case {
            name,
            index,
            role,
            work,
        });
        Ok(self)
    }

    /// Cases in registration order
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Mutable cases in registration order
    pub fn cases_mut(&mut self) -> &mut [Case] {
        &mut self.cases
    }

    /// The reference case, if registered
    pub fn reference_case(&self) -> Option<&Case> {
        self.reference.map(|i| &self.cases[i])
    }

    /// Number of registered cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether the suite has no cases
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Drop cases for which `keep` returns false.
    ///
    /// Surviving cases keep their registration index. Dropping the reference
    /// leaves the suite without one.
    pub fn retain_cases(&mut self, mut keep: impl FnMut(&Case) -> bool) {
        self.cases.retain(|c| keep(c));
        self.names = self.cases.iter().map(|c| c.name.clone()).collect();
        self.reference = self.cases.iter().position(Case::is_reference);
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("cases", &self.cases)
            .finish()
    }
}
