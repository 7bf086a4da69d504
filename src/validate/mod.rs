mod element;
mod policy_type;
mod primitive;
mod rules;


pub use {
    policy_type::{
        validate_endpoint_policy, validate_identity_policy, validate_resource_control_policy, validate_resource_policy,
        validate_service_control_policy, validate_session_policy, validate_trust_policy, PolicyType,
    },
    rules::{RuleSet, RuleSetBuilder, RuleSetBuilderError},
};

use {
    self::primitive::{
        child_path, field, index_path, is_truthy, string_elements, type_name, validate_data_type, validate_keys,
        validate_only_one_of, validate_type_or_array_of_type, DataType, Object,
    },
    crate::{Effect, ValidationError},
    log::{debug, trace},
    serde_json::{Map, Value},
    std::str::FromStr,
};

const POLICY_KEYS: &[&str] = &["Version", "Statement", "Id"];

const STATEMENT_KEYS: &[&str] =
    &["Sid", "Effect", "Action", "NotAction", "Resource", "NotResource", "Principal", "NotPrincipal", "Condition"];

/// Extension points for layering extra rules on top of [validate_policy_syntax].
///
/// Every method defaults to reporting nothing. Errors returned from a hook are merged into the document's error list.
/// `()` implements this trait with no extra rules.
pub trait ValidationCallbacks {
    /// Called once per document with the `Version` value, or `None` if it is absent or null.
    fn validate_version(&self, _version: Option<&Value>) -> Vec<ValidationError> {
        Vec::new()
    }

    /// Called once per statement object, with the statement's path (`Statement` or `Statement[i]`).
    fn validate_statement(&self, _statement: &Map<String, Value>, _path: &str) -> Vec<ValidationError> {
        Vec::new()
    }

    /// Called once per string in `Action`, whether it was given as a single string or as a list element.
    fn validate_action(&self, _action: &str, _path: &str) -> Vec<ValidationError> {
        Vec::new()
    }

    fn validate_not_action(&self, _action: &str, _path: &str) -> Vec<ValidationError> {
        Vec::new()
    }

    /// Called with the raw `Principal` value.
    fn validate_principal(&self, _principal: &Value, _path: &str) -> Vec<ValidationError> {
        Vec::new()
    }

    fn validate_not_principal(&self, _principal: &Value, _path: &str) -> Vec<ValidationError> {
        Vec::new()
    }

    /// Called once per string in `Resource`.
    fn validate_resource(&self, _resource: &str, _path: &str) -> Vec<ValidationError> {
        Vec::new()
    }

    fn validate_not_resource(&self, _resource: &str, _path: &str) -> Vec<ValidationError> {
        Vec::new()
    }
}

impl ValidationCallbacks for () {}

/// Validate the structure of a policy document.
///
/// This never fails on malformed input; problems are reported as [ValidationError]s, and an empty list means the
/// document is structurally valid. Validation is exhaustive except for a root that is not an object, which yields a
/// single error at the empty path.
pub fn validate_policy_syntax<C>(document: &Value, callbacks: &C) -> Vec<ValidationError>
where
    C: ValidationCallbacks + ?Sized,
{
    let policy = match document {
        Value::Object(policy) => policy,
        Value::Array(_) => {
            debug!("Policy document is an array");
            return vec![ValidationError::new("", "Policy must be an object, received an array")];
        }
        other => {
            debug!("Policy document is not an object: {}", other);
            return vec![ValidationError::new(
                "",
                format!("Policy must be an object, received type {}", type_name(other)),
            )];
        }
    };

    let mut errors = validate_keys(policy, POLICY_KEYS, "");
    errors.extend(element::validate_version(field(policy, "Version")));
    errors.extend(callbacks.validate_version(field(policy, "Version")));
    errors.extend(validate_data_type(field(policy, "Id"), "Id", &[DataType::String]));

    if !is_truthy(policy.get("Statement")) {
        errors.push(ValidationError::new("Statement", "Statement is required"));
    }

    let statement = field(policy, "Statement");
    errors.extend(validate_type_or_array_of_type(statement, "Statement", &[DataType::Object]));

    match statement {
        Some(Value::Object(statement)) => errors.extend(validate_statement(statement, "Statement", callbacks)),
        Some(Value::Array(statements)) => {
            for (i, statement) in statements.iter().enumerate() {
                match statement {
                    Value::Object(statement) => {
                        errors.extend(validate_statement(statement, &index_path("Statement", i), callbacks))
                    }
                    _ => debug!("Skipping Statement[{}]: not an object", i),
                }
            }

            errors.extend(validate_unique_sids(statements));
        }
        _ => (),
    }

    errors
}

fn validate_statement<C: ValidationCallbacks + ?Sized>(
    statement: &Object,
    path: &str,
    callbacks: &C,
) -> Vec<ValidationError> {
    trace!("Validating statement at {}", path);

    let mut errors = validate_keys(statement, STATEMENT_KEYS, path);
    errors.extend(validate_data_type(field(statement, "Sid"), &child_path(path, "Sid"), &[DataType::String]));

    let effect = statement.get("Effect").and_then(Value::as_str).map(Effect::from_str);
    if !matches!(effect, Some(Ok(_))) {
        errors.push(ValidationError::new(
            child_path(path, "Effect"),
            r#"Effect must be present and exactly "Allow" or "Deny""#,
        ));
    }

    errors.extend(callbacks.validate_statement(statement, path));

    errors.extend(validate_only_one_of(statement, path, "Action", "NotAction"));
    errors.extend(validate_only_one_of(statement, path, "Resource", "NotResource"));
    errors.extend(validate_only_one_of(statement, path, "Principal", "NotPrincipal"));

    for key in ["Action", "NotAction"] {
        let key_path = child_path(path, key);
        errors.extend(validate_type_or_array_of_type(field(statement, key), &key_path, &[DataType::String]));
    }

    for key in ["Action", "NotAction"] {
        if let Some(actions) = field(statement, key) {
            for (action, action_path) in string_elements(actions, &child_path(path, key)) {
                errors.extend(element::validate_action_string(action, &action_path));
            }
        }
    }

    errors.extend(invoke_string_hook(statement, "Action", path, |a, p| callbacks.validate_action(a, p)));
    errors.extend(invoke_string_hook(statement, "NotAction", path, |a, p| callbacks.validate_not_action(a, p)));

    for key in ["Resource", "NotResource"] {
        errors.extend(element::validate_resource(field(statement, key), &child_path(path, key)));
    }

    errors.extend(invoke_string_hook(statement, "Resource", path, |r, p| callbacks.validate_resource(r, p)));
    errors.extend(invoke_string_hook(statement, "NotResource", path, |r, p| callbacks.validate_not_resource(r, p)));

    for key in ["Principal", "NotPrincipal"] {
        errors.extend(element::validate_principal(field(statement, key), &child_path(path, key)));
    }

    if let Some(principal) = field(statement, "Principal") {
        errors.extend(callbacks.validate_principal(principal, &child_path(path, "Principal")));
    }

    if let Some(principal) = field(statement, "NotPrincipal") {
        errors.extend(callbacks.validate_not_principal(principal, &child_path(path, "NotPrincipal")));
    }

    errors.extend(element::validate_condition(field(statement, "Condition"), &child_path(path, "Condition")));
    errors
}

/// Run a per-string hook over every string of a string-or-list field. Unset fields are skipped.
fn invoke_string_hook<F>(statement: &Object, key: &str, path: &str, hook: F) -> Vec<ValidationError>
where
    F: Fn(&str, &str) -> Vec<ValidationError>,
{
    let value = match statement.get(key) {
        Some(value) if is_truthy(Some(value)) => value,
        _ => return Vec::new(),
    };

    string_elements(value, &child_path(path, key))
        .into_iter()
        .flat_map(|(s, element_path)| hook(s, &element_path))
        .collect()
}

/// Each non-empty Sid appearing more than once yields one error, in order of first appearance.
fn validate_unique_sids(statements: &[Value]) -> Vec<ValidationError> {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for sid in statements.iter().filter_map(|s| s.get("Sid")).filter_map(Value::as_str).filter(|s| !s.is_empty()) {
        match counts.iter_mut().find(|(seen, _)| *seen == sid) {
            Some((_, count)) => *count += 1,
            None => counts.push((sid, 1)),
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(sid, count)| {
            ValidationError::new("Statement", format!("Statement Ids must be unique, found {} {} times", sid, count))
        })
        .collect()
}
