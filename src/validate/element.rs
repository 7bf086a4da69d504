use {
    super::primitive::{
        child_path, field, index_path, validate_data_type, validate_keys, validate_type_or_array_of_type, DataType,
    },
    crate::{condition::SetOperator, PolicyVersion, ValidationError},
    lazy_static::lazy_static,
    regex::Regex,
    serde_json::Value,
    std::str::FromStr,
};

lazy_static! {
    static ref SERVICE: Regex = Regex::new(r"^[a-zA-Z0-9-]+$").unwrap();
    static ref ACTION: Regex = Regex::new(r"^[a-zA-Z0-9*?]+$").unwrap();
    static ref CONDITION_OPERATOR: Regex = Regex::new(r"^[a-zA-Z0-9:]+$").unwrap();
}

const PRINCIPAL_KEYS: &[&str] = &["AWS", "Service", "Federated", "CanonicalUser"];

pub(super) fn validate_version(version: Option<&Value>) -> Vec<ValidationError> {
    match version {
        None => Vec::new(),
        Some(Value::String(v)) => match PolicyVersion::from_str(v) {
            Ok(_) => Vec::new(),
            Err(_) => vec![ValidationError::new("Version", r#"Version must be either "2012-10-17" or "2008-10-17""#)],
        },
        Some(_) => vec![ValidationError::new("Version", "Version must be a string if present")],
    }
}

/// Check a single `service:action` string. The service and action checks are independent; both may fail.
pub(super) fn validate_action_string(action: &str, path: &str) -> Vec<ValidationError> {
    if action == "*" {
        return Vec::new();
    }

    let segments = action.split(':').collect::<Vec<&str>>();
    let (service, action) = match segments.as_slice() {
        [service, action] => (*service, *action),
        _ => return vec![ValidationError::new(path, "Action must be a wildcard (*) or have 2 segments")],
    };

    let mut errors = Vec::new();
    if !SERVICE.is_match(service) {
        errors.push(ValidationError::new(path, "Service can only contain letters, numbers, and hyphens"));
    }

    if !ACTION.is_match(action) {
        errors.push(ValidationError::new(
            path,
            "Action can only contain letters, numbers, asterisks, and question marks",
        ));
    }

    errors
}

pub(super) fn validate_resource(resource: Option<&Value>, path: &str) -> Vec<ValidationError> {
    match resource {
        None => Vec::new(),
        Some(Value::String(s)) => validate_resource_string(s, path),
        Some(Value::Array(elements)) => elements
            .iter()
            .enumerate()
            .flat_map(|(i, element)| {
                let element_path = index_path(path, i);
                match element {
                    Value::String(s) => validate_resource_string(s, &element_path),
                    _ => validate_data_type(Some(element), &element_path, &[DataType::String]),
                }
            })
            .collect(),
        Some(_) => vec![ValidationError::new(path, "Must be a string or array of strings")],
    }
}

fn validate_resource_string(resource: &str, path: &str) -> Vec<ValidationError> {
    if resource == "*" {
        return Vec::new();
    }

    let segments = resource.split(':').collect::<Vec<&str>>();
    if segments.len() < 6 || segments[0] != "arn" {
        return vec![ValidationError::new(path, r#"Resource arn must have 6 segments and start with "arn:""#)];
    }

    Vec::new()
}

pub(super) fn validate_principal(principal: Option<&Value>, path: &str) -> Vec<ValidationError> {
    let mut errors = validate_data_type(principal, path, &[DataType::String, DataType::Object]);

    if let Some(Value::Object(principal)) = principal {
        errors.extend(validate_keys(principal, PRINCIPAL_KEYS, path));
        for key in PRINCIPAL_KEYS {
            errors.extend(validate_type_or_array_of_type(
                field(principal, key),
                &child_path(path, key),
                &[DataType::String],
            ));
        }
    }

    errors
}

pub(super) fn validate_condition(condition: Option<&Value>, path: &str) -> Vec<ValidationError> {
    let condition = match condition {
        None => return Vec::new(),
        Some(Value::Object(condition)) => condition,
        Some(Value::Array(_)) => return vec![ValidationError::new(path, "Condition must be an object, found an array")],
        Some(other) => return validate_data_type(Some(other), path, &[DataType::Object]),
    };

    let mut errors = Vec::new();
    for (operator, keys) in condition {
        let operator_path = child_path(path, operator);
        errors.extend(validate_condition_operator(operator, &operator_path));

        match keys {
            Value::Object(keys) => {
                for (key, values) in keys {
                    errors.extend(validate_type_or_array_of_type(
                        Some(values),
                        &child_path(&operator_path, key),
                        &[DataType::String],
                    ));
                }
            }
            Value::Array(_) => errors.push(ValidationError::new(
                &operator_path,
                "Condition operator must be an object, found an array",
            )),
            _ => errors.extend(validate_data_type(Some(keys), &operator_path, &[DataType::Object])),
        }
    }

    errors
}

/// Operators are alphanumeric with at most one colon separating a set operator prefix from the base operator.
fn validate_condition_operator(operator: &str, path: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !CONDITION_OPERATOR.is_match(operator) {
        errors.push(ValidationError::new(path, "Condition operator is invalid"));
    }

    match operator.split(':').collect::<Vec<&str>>().as_slice() {
        [_] => (),
        [set_operator, _] => {
            if SetOperator::from_str(set_operator).is_err() {
                errors.push(ValidationError::new(
                    path,
                    "Condition set operator must be either ForAllValues or ForAnyValue",
                ));
            }
        }
        _ => errors.push(ValidationError::new(path, "Condition operator is invalid")),
    }

    errors
}
