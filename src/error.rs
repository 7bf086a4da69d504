use {
    serde::{Deserialize, Serialize},
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// A single finding produced by the validator.
///
/// `path` addresses the offending location in the original document using dotted field access and bracketed,
/// zero-based array indices, e.g. `Statement[2].Condition.StringEquals.s3:prefix`. The empty path denotes the
/// document root.
///
/// Errors order by path, then message. Sorting two error lists gives a canonical form for comparison.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum PolicyError {
    InvalidEffect(String),
    InvalidPolicyType(String),
    InvalidPolicyVersion(String),
    InvalidSetOperator(String),
}

impl Display for PolicyError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::InvalidEffect(effect) => write!(f, "Invalid effect: {}", effect),
            Self::InvalidPolicyType(policy_type) => write!(f, "Invalid policy type: {}", policy_type),
            Self::InvalidPolicyVersion(version) => write!(f, "Invalid policy version: {}", version),
            Self::InvalidSetOperator(operator) => write!(f, "Invalid set operator: {}", operator),
        }
    }
}

impl Error for PolicyError {}
