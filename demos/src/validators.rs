//! Validator Candidates
//!
//! Each function checks the same [`Person`] rules in a different style:
//! - name, first name: non-empty strings
//! - email: `local@domain.tld`
//! - phone: seven digits with a dash after the third (`123-4567`)
//! - age: integer, 0 to 150
//!
//! A rejected record is an [`ExecutionError`], which racebench records as a
//! failed case.

use crate::Person;
use racebench::ExecutionError;
use regex::Regex;
use serde_json::Value;

const MAX_AGE: u64 = 150;

/// Hand-written checks, byte by byte
pub fn manual(p: &Person) -> Result<(), ExecutionError> {
    if p.name.is_empty() || p.first_name.is_empty() {
        return Err(ExecutionError::raised("name must not be empty"));
    }
    if !is_email(&p.email) {
        return Err(ExecutionError::raised("invalid email"));
    }
    if !is_phone(&p.phone) {
        return Err(ExecutionError::raised("invalid phone"));
    }
    if u64::from(p.age) > MAX_AGE {
        return Err(ExecutionError::raised("age out of range"));
    }
    Ok(())
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .rsplit_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
}

fn is_phone(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 8
        && b[3] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 3 || c.is_ascii_digit())
}

/// Precompiled regular expressions
pub struct RegexRules {
    email: Regex,
    phone: Regex,
}

impl RegexRules {
    /// Compile the rule set
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]{2,}$")?,
            phone: Regex::new(r"^\d{3}-\d{4}$")?,
        })
    }

    /// Validate a record
    pub fn validate(&self, p: &Person) -> Result<(), ExecutionError> {
        if p.name.is_empty() || p.first_name.is_empty() {
            return Err(ExecutionError::raised("name must not be empty"));
        }
        if !self.email.is_match(&p.email) {
            return Err(ExecutionError::raised("invalid email"));
        }
        if !self.phone.is_match(&p.phone) {
            return Err(ExecutionError::raised("invalid phone"));
        }
        if u64::from(p.age) > MAX_AGE {
            return Err(ExecutionError::raised("age out of range"));
        }
        Ok(())
    }
}

/// One field rule of a [`Schema`]
#[derive(Debug, Clone)]
pub enum Rule {
    /// Non-empty string
    NonEmpty,
    /// String accepted by the email check
    Email,
    /// String accepted by the phone check
    Phone,
    /// Integer within bounds (inclusive)
    IntRange(u64, u64),
}

/// Declarative, interpreted rule list over untyped JSON
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<(&'static str, Rule)>,
}

impl Schema {
    /// Validate a JSON object
    pub fn validate(&self, value: &Value) -> Result<(), ExecutionError> {
        let object = value
            .as_object()
            .ok_or_else(|| ExecutionError::raised("expected an object"))?;
        for (field, rule) in &self.fields {
            let v = object
                .get(*field)
                .ok_or_else(|| ExecutionError::raised(format!("missing field `{}`", field)))?;
            let ok = match rule {
                Rule::NonEmpty => v.as_str().is_some_and(|s| !s.is_empty()),
                Rule::Email => v.as_str().is_some_and(is_email),
                Rule::Phone => v.as_str().is_some_and(is_phone),
                Rule::IntRange(lo, hi) => v.as_u64().is_some_and(|n| (*lo..=*hi).contains(&n)),
            };
            if !ok {
                return Err(ExecutionError::raised(format!("invalid field `{}`", field)));
            }
        }
        Ok(())
    }
}

/// Rules for [`Person`] as a [`Schema`]
pub fn person_schema() -> Schema {
    Schema {
        fields: vec![
            ("name", Rule::NonEmpty),
            ("email", Rule::Email),
            ("firstName", Rule::NonEmpty),
            ("phone", Rule::Phone),
            ("age", Rule::IntRange(0, MAX_AGE)),
        ],
    }
}

/// Deserialize JSON text into a typed [`Person`], then run the manual checks
pub fn parse_typed(json: &str) -> Result<(), ExecutionError> {
    let person: Person =
        serde_json::from_str(json).map_err(|e| ExecutionError::raised(e.to_string()))?;
    manual(&person)
}

/// Requires an area-code prefix (`(555) 123-4567`); rejects the sample payload
pub fn strict_phone(p: &Person) -> Result<(), ExecutionError> {
    let b = p.phone.as_bytes();
    if b.first() != Some(&b'(') {
        return Err(ExecutionError::raised(format!(
            "phone `{}` has no area code",
            p.phone
        )));
    }
    manual(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SAMPLE_JSON, sample_person};

    fn bad_email() -> Person {
        Person {
            email: "john.doe.company.space".to_string(),
            ..sample_person()
        }
    }

    #[test]
    fn test_all_styles_accept_sample() {
        let p = sample_person();
        assert!(manual(&p).is_ok());
        assert!(RegexRules::new().unwrap().validate(&p).is_ok());
        let value: Value = serde_json::from_str(SAMPLE_JSON).unwrap();
        assert!(person_schema().validate(&value).is_ok());
        assert!(parse_typed(SAMPLE_JSON).is_ok());
    }

    #[test]
    fn test_all_styles_reject_bad_email() {
        let p = bad_email();
        assert!(manual(&p).is_err());
        assert!(RegexRules::new().unwrap().validate(&p).is_err());

        let mut value: Value = serde_json::from_str(SAMPLE_JSON).unwrap();
        value["email"] = Value::from("nope");
        assert!(person_schema().validate(&value).is_err());
    }

    #[test]
    fn test_phone_rules() {
        assert!(is_phone("123-4567"));
        assert!(!is_phone("1234567"));
        assert!(!is_phone("12a-4567"));
        assert!(strict_phone(&sample_person()).is_err());
    }

    #[test]
    fn test_typed_rejects_missing_field() {
        let err = parse_typed(r#"{"name":"x"}"#).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }
}
