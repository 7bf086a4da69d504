use {
    super::{
        primitive::{validate_at_least_one_of, validate_prohibited_fields},
        ValidationCallbacks,
    },
    crate::ValidationError,
    derive_builder::Builder,
    serde_json::{Map, Value},
};

/// Statement-level field requirements for one policy dialect.
///
/// A rule set names fields a statement must not set and groups of fields of which a statement must set at least one.
/// It is a [ValidationCallbacks], so a custom dialect can be checked with
/// `validate_policy_syntax(&document, &rule_set)`.
///
/// `policy_type` is the phrase used in messages, e.g. `a trust policy` gives `Resource is not allowed in a trust
/// policy`.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
pub struct RuleSet {
    #[builder(setter(into))]
    policy_type: String,

    #[builder(default)]
    prohibited_fields: Vec<String>,

    #[builder(default)]
    required_groups: Vec<Vec<String>>,
}

impl RuleSet {
    #[inline]
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    pub(crate) fn new(policy_type: &str, prohibited_fields: &[&str], required_groups: &[&[&str]]) -> Self {
        Self {
            policy_type: policy_type.to_string(),
            prohibited_fields: prohibited_fields.iter().map(|f| f.to_string()).collect(),
            required_groups: required_groups.iter().map(|g| g.iter().map(|f| f.to_string()).collect()).collect(),
        }
    }

    #[inline]
    pub fn policy_type(&self) -> &str {
        &self.policy_type
    }

    #[inline]
    pub fn prohibited_fields(&self) -> &[String] {
        &self.prohibited_fields
    }

    #[inline]
    pub fn required_groups(&self) -> &[Vec<String>] {
        &self.required_groups
    }
}

impl ValidationCallbacks for RuleSet {
    fn validate_statement(&self, statement: &Map<String, Value>, path: &str) -> Vec<ValidationError> {
        let mut errors = validate_prohibited_fields(statement, &self.prohibited_fields, path, &self.policy_type);
        for group in &self.required_groups {
            errors.extend(validate_at_least_one_of(statement, group, path, &self.policy_type));
        }
        errors
    }
}

impl RuleSetBuilder {
    /// Add a field that statements may not set.
    pub fn prohibit<S: Into<String>>(&mut self, field: S) -> &mut Self {
        self.prohibited_fields.get_or_insert_with(Vec::new).push(field.into());
        self
    }

    /// Add a group of fields of which statements must set at least one.
    pub fn require_one_of(&mut self, fields: &[&str]) -> &mut Self {
        self.required_groups.get_or_insert_with(Vec::new).push(fields.iter().map(|f| f.to_string()).collect());
        self
    }
}
