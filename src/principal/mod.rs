mod aws;

use {
    self::aws::{account_id, AwsPrincipalKind},
    crate::serutil::ElementList,
    log::debug,
    serde_json::Value,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// The key a principal is listed under in a `Principal` or `NotPrincipal` block.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PrincipalType {
    Aws,
    Service,
    Federated,
    CanonicalUser,
}

impl PrincipalType {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "AWS" => Some(Self::Aws),
            "Service" => Some(Self::Service),
            "Federated" => Some(Self::Federated),
            "CanonicalUser" => Some(Self::CanonicalUser),
            _ => None,
        }
    }
}

impl Display for PrincipalType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Aws => f.write_str("AWS"),
            Self::Service => f.write_str("Service"),
            Self::Federated => f.write_str("Federated"),
            Self::CanonicalUser => f.write_str("CanonicalUser"),
        }
    }
}

/// One principal value from a `Principal` or `NotPrincipal` block.
///
/// The `is_*` methods classify the principal; the matching accessors return `Some` only when the classification
/// holds. `AWS` principals fall into exactly one of wildcard, account, unique id, or other (ARN).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Principal<'a> {
    principal_type: PrincipalType,
    value: &'a str,
}

impl<'a> Principal<'a> {
    #[inline]
    pub fn new(principal_type: PrincipalType, value: &'a str) -> Self {
        Self {
            principal_type,
            value,
        }
    }

    #[inline]
    pub fn principal_type(&self) -> PrincipalType {
        self.principal_type
    }

    #[inline]
    pub fn value(&self) -> &'a str {
        self.value
    }

    fn aws_kind(&self) -> Option<AwsPrincipalKind> {
        match self.principal_type {
            PrincipalType::Aws => Some(AwsPrincipalKind::classify(self.value)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_wildcard_principal(&self) -> bool {
        self.aws_kind() == Some(AwsPrincipalKind::Any)
    }

    #[inline]
    pub fn is_account_principal(&self) -> bool {
        self.aws_kind() == Some(AwsPrincipalKind::Account)
    }

    #[inline]
    pub fn is_unique_id_principal(&self) -> bool {
        self.aws_kind() == Some(AwsPrincipalKind::UniqueId)
    }

    /// An `AWS` principal that is not a wildcard, an account, or a unique id.
    #[inline]
    pub fn is_aws_principal(&self) -> bool {
        self.aws_kind() == Some(AwsPrincipalKind::Arn)
    }

    #[inline]
    pub fn is_service_principal(&self) -> bool {
        self.principal_type == PrincipalType::Service
    }

    #[inline]
    pub fn is_federated_principal(&self) -> bool {
        self.principal_type == PrincipalType::Federated
    }

    #[inline]
    pub fn is_canonical_user_principal(&self) -> bool {
        self.principal_type == PrincipalType::CanonicalUser
    }

    /// The 12-digit account id, taken from the ARN for `arn:<partition>:iam::<account>:root` principals.
    pub fn account_id(&self) -> Option<&'a str> {
        if !self.is_account_principal() {
            return None;
        }

        account_id(self.value)
    }

    pub fn unique_id(&self) -> Option<&'a str> {
        self.is_unique_id_principal().then_some(self.value)
    }

    pub fn arn(&self) -> Option<&'a str> {
        self.is_aws_principal().then_some(self.value)
    }

    pub fn service(&self) -> Option<&'a str> {
        self.is_service_principal().then_some(self.value)
    }

    pub fn federated(&self) -> Option<&'a str> {
        self.is_federated_principal().then_some(self.value)
    }

    pub fn canonical_user(&self) -> Option<&'a str> {
        self.is_canonical_user_principal().then_some(self.value)
    }
}

impl Display for Principal<'_> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}:{}", self.principal_type, self.value)
    }
}

/// Flatten a `Principal` or `NotPrincipal` value.
///
/// A bare string is an `AWS` principal. Unknown principal types and non-string values are skipped.
pub(crate) fn parse_principals(value: &Value) -> Vec<Principal<'_>> {
    let block = match value {
        Value::String(s) => return vec![Principal::new(PrincipalType::Aws, s)],
        Value::Object(block) => block,
        _ => return Vec::new(),
    };

    let mut result = Vec::new();
    for (key, values) in block {
        let principal_type = match PrincipalType::from_key(key) {
            Some(principal_type) => principal_type,
            None => {
                debug!("Skipping unknown principal type {}", key);
                continue;
            }
        };

        result.extend(ElementList::new(values).strings().into_iter().map(|v| Principal::new(principal_type, v)));
    }

    result
}
