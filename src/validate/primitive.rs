//! Building blocks shared by the document walker and the policy-type rule sets.
//!
//! Every check here takes the location it is looking at as a path string and returns its own list of errors; callers
//! merge the lists. Paths use `.` for object fields and `[i]` for array elements. The root is the empty path.
use {
    crate::ValidationError,
    serde_json::{Map, Value},
};

pub(crate) type Object = Map<String, Value>;

/// The JSON types a field may be required to have.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DataType {
    String,
    Object,
}

impl DataType {
    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Object => "object",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Object => value.is_object(),
        }
    }
}

/// The name used for a value's type in error messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether a field counts as set: present, not null, not `false`, not zero and not the empty string.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Look up a field, treating an explicit null as absent. Null fields are reported by [validate_keys].
#[inline]
pub(crate) fn field<'a>(object: &'a Object, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

pub(crate) fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

#[inline]
pub(crate) fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

/// Resolve a string-or-list-of-strings field into its strings and their paths. Non-string elements are skipped.
pub(crate) fn string_elements<'a>(value: &'a Value, path: &str) -> Vec<(&'a str, String)> {
    match value {
        Value::String(s) => vec![(s.as_str(), path.to_string())],
        Value::Array(elements) => elements
            .iter()
            .enumerate()
            .filter_map(|(i, element)| element.as_str().map(|s| (s, index_path(path, i))))
            .collect(),
        _ => Vec::new(),
    }
}

/// Report keys outside of `allowed`, and allowed keys whose value is null.
pub(crate) fn validate_keys(object: &Object, allowed: &[&str], path: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (key, value) in object {
        if !allowed.contains(&key.as_str()) {
            errors.push(ValidationError::new(child_path(path, key), format!("Invalid key {}", key)));
        } else if value.is_null() {
            errors.push(ValidationError::new(
                child_path(path, key),
                format!("If present, {} cannot be null or undefined", key),
            ));
        }
    }

    errors
}

pub(crate) fn validate_data_type(value: Option<&Value>, path: &str, allowed: &[DataType]) -> Vec<ValidationError> {
    let value = match value {
        None => return Vec::new(),
        Some(value) => value,
    };

    if allowed.iter().any(|data_type| data_type.matches(value)) {
        return Vec::new();
    }

    let allowed_names = allowed.iter().map(|data_type| data_type.name()).collect::<Vec<_>>().join(", ");
    let message = format!("Found data type {} allowed type(s) are {}", type_name(value), allowed_names);
    vec![ValidationError::new(path, message)]
}

/// Accept a value of an allowed type, or an array whose elements each have an allowed type.
pub(crate) fn validate_type_or_array_of_type(
    value: Option<&Value>,
    path: &str,
    allowed: &[DataType],
) -> Vec<ValidationError> {
    match value {
        None => Vec::new(),
        Some(Value::Array(elements)) => elements
            .iter()
            .enumerate()
            .flat_map(|(i, element)| validate_data_type(Some(element), &index_path(path, i), allowed))
            .collect(),
        Some(value) => validate_data_type(Some(value), path, allowed),
    }
}

/// Only presence matters here, even a null value counts.
pub(crate) fn validate_only_one_of(object: &Object, path: &str, first: &str, second: &str) -> Vec<ValidationError> {
    if object.contains_key(first) && object.contains_key(second) {
        vec![ValidationError::new(path, format!("Only one of {} or {} is allowed, found both", first, second))]
    } else {
        Vec::new()
    }
}

pub(crate) fn validate_prohibited_fields<S: AsRef<str>>(
    statement: &Object,
    fields: &[S],
    path: &str,
    policy_type: &str,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for field in fields {
        let field: &str = field.as_ref();
        if is_truthy(statement.get(field)) {
            errors.push(ValidationError::new(
                format!("{}.#{}", path, field),
                format!("{} is not allowed in {}", field, policy_type),
            ));
        }
    }

    errors
}

pub(crate) fn validate_at_least_one_of<S: AsRef<str>>(
    statement: &Object,
    fields: &[S],
    path: &str,
    policy_type: &str,
) -> Vec<ValidationError> {
    let fields: Vec<&str> = fields.iter().map(|field| field.as_ref()).collect();
    if fields.iter().any(|field| is_truthy(statement.get(*field))) {
        return Vec::new();
    }

    let message = match fields.as_slice() {
        [only] => format!("{} is required in {}", only, policy_type),
        _ => format!("One of {} is required in {}", fields.join(" or "), policy_type),
    };

    vec![ValidationError::new(path, message)]
}
