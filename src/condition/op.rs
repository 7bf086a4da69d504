use {
    crate::PolicyError,
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

const IF_EXISTS: &str = "IfExists";

/// Strip a case-insensitive `IfExists` suffix.
fn strip_if_exists(op: &str) -> Option<&str> {
    let split = op.len().checked_sub(IF_EXISTS.len())?;
    match op.get(split..) {
        Some(suffix) if suffix.eq_ignore_ascii_case(IF_EXISTS) => Some(&op[..split]),
        _ => None,
    }
}

/// The multivalued-key qualifier that may prefix a condition operator, as in `ForAllValues:StringLike`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SetOperator {
    ForAllValues,
    ForAnyValue,
}

impl Display for SetOperator {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::ForAllValues => f.write_str("ForAllValues"),
            Self::ForAnyValue => f.write_str("ForAnyValue"),
        }
    }
}

/// Set operators are matched without regard to case.
impl FromStr for SetOperator {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forallvalues" => Ok(Self::ForAllValues),
            "foranyvalue" => Ok(Self::ForAnyValue),
            _ => Err(PolicyError::InvalidSetOperator(s.to_string())),
        }
    }
}

/// A condition operator string such as `ForAnyValue:StringNotEqualsIfExists`, split into its parts on demand.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ConditionOperation<'a> {
    op: &'a str,
}

impl<'a> ConditionOperation<'a> {
    #[inline]
    pub fn new(op: &'a str) -> Self {
        Self {
            op,
        }
    }

    /// The operator exactly as written.
    #[inline]
    pub fn value(&self) -> &'a str {
        self.op
    }

    /// The set operator prefix, if any. A prefix that is neither `ForAllValues` nor `ForAnyValue` is an error.
    pub fn set_operator(&self) -> Result<Option<SetOperator>, PolicyError> {
        match self.op.split_once(':') {
            None => Ok(None),
            Some((prefix, _)) => SetOperator::from_str(prefix).map(Some),
        }
    }

    pub fn is_if_exists(&self) -> bool {
        strip_if_exists(self.op).is_some()
    }

    /// The operator with any set operator prefix and `IfExists` suffix removed.
    pub fn base_operator(&self) -> &'a str {
        let base = self.op.rsplit(':').next().unwrap_or(self.op);
        strip_if_exists(base).unwrap_or(base)
    }
}

impl Display for ConditionOperation<'_> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.op)
    }
}
