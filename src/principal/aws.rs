use {lazy_static::lazy_static, regex::Regex};

lazy_static! {
    static ref AWS_ACCOUNT_ID: Regex = Regex::new(r"^[0-9]{12}$").unwrap();
    static ref AWS_ACCOUNT_ROOT_ARN: Regex = Regex::new(r"^arn:.*?:iam::[0-9]{12}:root$").unwrap();
    static ref AWS_UNIQUE_ID: Regex = Regex::new(r"^A[0-9A-Z]+$").unwrap();
}

/// The shapes an `AWS` principal value can take.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum AwsPrincipalKind {
    /// `*`: everyone.
    Any,

    /// A bare 12-digit account id or an account root ARN.
    Account,

    /// An IAM unique id such as `AIDACKCEVSQ6C2EXAMPLE`.
    UniqueId,

    /// Anything else, normally a user, role or session ARN.
    Arn,
}

impl AwsPrincipalKind {
    pub(crate) fn classify(value: &str) -> Self {
        if value == "*" {
            Self::Any
        } else if AWS_ACCOUNT_ID.is_match(value) || AWS_ACCOUNT_ROOT_ARN.is_match(value) {
            Self::Account
        } else if AWS_UNIQUE_ID.is_match(value) {
            Self::UniqueId
        } else {
            Self::Arn
        }
    }
}

/// The account id of an account principal, whether given bare or as a root ARN.
pub(crate) fn account_id(value: &str) -> Option<&str> {
    if AWS_ACCOUNT_ID.is_match(value) {
        Some(value)
    } else if AWS_ACCOUNT_ROOT_ARN.is_match(value) {
        value.split(':').nth(4)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{account_id, AwsPrincipalKind},
        pretty_assertions::assert_eq,
    };

    #[test_log::test]
    fn test_classify() {
        assert_eq!(AwsPrincipalKind::classify("*"), AwsPrincipalKind::Any);
        assert_eq!(AwsPrincipalKind::classify("123456789012"), AwsPrincipalKind::Account);
        assert_eq!(AwsPrincipalKind::classify("arn:aws:iam::123456789012:root"), AwsPrincipalKind::Account);
        assert_eq!(AwsPrincipalKind::classify("arn:aws-cn:iam::123456789012:root"), AwsPrincipalKind::Account);
        assert_eq!(AwsPrincipalKind::classify("AIDACKCEVSQ6C2EXAMPLE"), AwsPrincipalKind::UniqueId);
        assert_eq!(AwsPrincipalKind::classify("arn:aws:iam::123456789012:role/Admin"), AwsPrincipalKind::Arn);
        assert_eq!(AwsPrincipalKind::classify("12345678901"), AwsPrincipalKind::Arn);
        assert_eq!(AwsPrincipalKind::classify("Aidacasing"), AwsPrincipalKind::Arn);
    }

    #[test_log::test]
    fn test_account_id() {
        assert_eq!(account_id("123456789012"), Some("123456789012"));
        assert_eq!(account_id("arn:aws:iam::210987654321:root"), Some("210987654321"));
        assert_eq!(account_id("arn:aws:iam::210987654321:user/Bob"), None);
    }
}
