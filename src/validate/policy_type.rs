use {
    super::{
        primitive::{field, is_truthy},
        validate_policy_syntax, RuleSet, ValidationCallbacks,
    },
    crate::{PolicyError, ValidationError},
    log::trace,
    serde_json::{Map, Value},
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// The policy dialects with built-in rule sets.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PolicyType {
    Identity,
    ServiceControl,
    Resource,
    ResourceControl,
    Trust,
    Endpoint,
    Session,
}

impl PolicyType {
    /// The phrase naming this dialect in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Identity => "an identity policy statement",
            Self::ServiceControl => "a service control policy",
            Self::Resource => "a resource policy",
            Self::ResourceControl => "a resource control policy",
            Self::Trust => "a trust policy",
            Self::Endpoint => "an endpoint policy",
            Self::Session => "a session policy",
        }
    }

    /// The prohibited and required statement fields for this dialect.
    ///
    /// Some dialects have further rules (fixed values, wildcard placement) that [PolicyType::validate] applies on top.
    pub fn rules(self) -> RuleSet {
        let label = self.label();
        match self {
            Self::Identity | Self::Session | Self::ServiceControl => RuleSet::new(
                label,
                &["Principal", "NotPrincipal"],
                &[&["Action", "NotAction"], &["Resource", "NotResource"]],
            ),
            Self::Resource => {
                RuleSet::new(label, &[], &[&["Action", "NotAction"], &["Principal", "NotPrincipal"]])
            }
            Self::ResourceControl => {
                RuleSet::new(label, &["NotPrincipal", "NotAction"], &[&["Action"], &["Resource", "NotResource"]])
            }
            Self::Trust => RuleSet::new(
                label,
                &["Resource", "NotResource"],
                &[&["Action", "NotAction"], &["Principal", "NotPrincipal"]],
            ),
            Self::Endpoint => RuleSet::new(
                label,
                &["NotPrincipal"],
                &[&["Action", "NotAction"], &["Resource", "NotResource"], &["Principal"]],
            ),
        }
    }

    /// Validate a document as a policy of this type.
    pub fn validate(self, document: &Value) -> Vec<ValidationError> {
        trace!("Validating document as {}", self.label());
        let validator = PolicyTypeValidator {
            policy_type: self,
            rules: self.rules(),
        };

        validate_policy_syntax(document, &validator)
    }
}

impl Display for PolicyType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(match self {
            Self::Identity => "identity",
            Self::ServiceControl => "scp",
            Self::Resource => "resource",
            Self::ResourceControl => "rcp",
            Self::Trust => "trust",
            Self::Endpoint => "endpoint",
            Self::Session => "session",
        })
    }
}

impl FromStr for PolicyType {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(Self::Identity),
            "scp" => Ok(Self::ServiceControl),
            "resource" => Ok(Self::Resource),
            "rcp" => Ok(Self::ResourceControl),
            "trust" => Ok(Self::Trust),
            "endpoint" => Ok(Self::Endpoint),
            "session" => Ok(Self::Session),
            _ => Err(PolicyError::InvalidPolicyType(s.to_string())),
        }
    }
}

/// A built-in rule set plus the fixed-value rules particular to its dialect.
struct PolicyTypeValidator {
    policy_type: PolicyType,
    rules: RuleSet,
}

impl PolicyTypeValidator {
    #[inline]
    fn label(&self) -> &'static str {
        self.policy_type.label()
    }

    /// The first wildcard in a service control policy action must be its last character.
    fn validate_wildcard_position(&self, action: &str, path: &str, field_name: &str) -> Vec<ValidationError> {
        match action.find(|c| c == '*' || c == '?') {
            Some(pos) if pos + 1 != action.len() => vec![ValidationError::new(
                path,
                format!("Wildcard characters are only allowed at the end of {} in {}", field_name, self.label()),
            )],
            _ => Vec::new(),
        }
    }

    fn validate_allow_statement(&self, statement: &Map<String, Value>, path: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if statement.get("Effect").and_then(Value::as_str) != Some("Allow") {
            return errors;
        }

        if statement.get("Resource").and_then(Value::as_str) != Some("*") {
            errors.push(ValidationError::new(
                path,
                format!(r#"Resource must be "*" when Effect is "Allow" in {}"#, self.label()),
            ));
        }

        for key in ["NotAction", "Condition"] {
            if is_truthy(statement.get(key)) {
                errors.push(ValidationError::new(
                    format!("{}.#{}", path, key),
                    format!(r#"{} is not allowed when Effect is "Allow" in {}"#, key, self.label()),
                ));
            }
        }

        errors
    }

    fn validate_deny_everyone(&self, statement: &Map<String, Value>, path: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if statement.get("Effect").and_then(Value::as_str) != Some("Deny") {
            errors.push(ValidationError::new(
                format!("{}.Effect", path),
                format!(r#"Effect must be "Deny" in {}"#, self.label()),
            ));
        }

        if statement.get("Principal").and_then(Value::as_str) != Some("*") {
            let principal_path = match field(statement, "Principal") {
                Some(_) => format!("{}.Principal", path),
                None => path.to_string(),
            };
            errors.push(ValidationError::new(principal_path, format!(r#"Principal must be "*" in {}"#, self.label())));
        }

        errors
    }
}

impl ValidationCallbacks for PolicyTypeValidator {
    fn validate_version(&self, version: Option<&Value>) -> Vec<ValidationError> {
        if self.policy_type != PolicyType::ResourceControl {
            return Vec::new();
        }

        match version {
            Some(Value::String(v)) if v == "2012-10-17" => Vec::new(),
            Some(_) => vec![ValidationError::new(
                "Version",
                format!(r#"Version must be "2012-10-17" in {}"#, self.label()),
            )],
            None => vec![ValidationError::new("", format!(r#"Version must be "2012-10-17" in {}"#, self.label()))],
        }
    }

    fn validate_statement(&self, statement: &Map<String, Value>, path: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.policy_type == PolicyType::ResourceControl {
            errors.extend(self.validate_deny_everyone(statement, path));
        }

        errors.extend(self.rules.validate_statement(statement, path));

        match self.policy_type {
            PolicyType::ServiceControl => errors.extend(self.validate_allow_statement(statement, path)),
            PolicyType::Endpoint => {
                if let Some(principal) = field(statement, "Principal") {
                    if principal.as_str() != Some("*") {
                        errors.push(ValidationError::new(
                            format!("{}.Principal", path),
                            format!(r#"Principal must be "*" in {}"#, self.label()),
                        ));
                    }
                }
            }
            _ => (),
        }

        errors
    }

    fn validate_action(&self, action: &str, path: &str) -> Vec<ValidationError> {
        match self.policy_type {
            PolicyType::ServiceControl => self.validate_wildcard_position(action, path, "Action"),
            PolicyType::ResourceControl if action == "*" => {
                vec![ValidationError::new(path, format!(r#"Action cannot be "*" in {}"#, self.label()))]
            }
            _ => Vec::new(),
        }
    }

    fn validate_not_action(&self, action: &str, path: &str) -> Vec<ValidationError> {
        match self.policy_type {
            PolicyType::ServiceControl => self.validate_wildcard_position(action, path, "NotAction"),
            _ => Vec::new(),
        }
    }
}

/// Validate an identity policy: no principals, and at least one action and resource field per statement.
pub fn validate_identity_policy(document: &Value) -> Vec<ValidationError> {
    PolicyType::Identity.validate(document)
}

/// Validate a service control policy.
///
/// On top of the identity rules, wildcards may only end an action, and `Allow` statements must apply to `"*"` with
/// neither `NotAction` nor `Condition`.
pub fn validate_service_control_policy(document: &Value) -> Vec<ValidationError> {
    PolicyType::ServiceControl.validate(document)
}

pub fn validate_resource_policy(document: &Value) -> Vec<ValidationError> {
    PolicyType::Resource.validate(document)
}

/// Validate a resource control policy. Every statement must deny `Action`s other than `"*"` to the `"*"` principal,
/// and the document must use version `2012-10-17`.
pub fn validate_resource_control_policy(document: &Value) -> Vec<ValidationError> {
    PolicyType::ResourceControl.validate(document)
}

pub fn validate_trust_policy(document: &Value) -> Vec<ValidationError> {
    PolicyType::Trust.validate(document)
}

/// Validate a VPC endpoint policy. `Principal` is required and, when set, must be `"*"`.
pub fn validate_endpoint_policy(document: &Value) -> Vec<ValidationError> {
    PolicyType::Endpoint.validate(document)
}

pub fn validate_session_policy(document: &Value) -> Vec<ValidationError> {
    PolicyType::Session.validate(document)
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq, serde_json::json};

    fn sorted(mut errors: Vec<ValidationError>) -> Vec<ValidationError> {
        errors.sort();
        errors
    }

    #[test_log::test]
    fn test_display_from_str() {
        for policy_type in [
            PolicyType::Identity,
            PolicyType::ServiceControl,
            PolicyType::Resource,
            PolicyType::ResourceControl,
            PolicyType::Trust,
            PolicyType::Endpoint,
            PolicyType::Session,
        ] {
            assert_eq!(PolicyType::from_str(&policy_type.to_string()).unwrap(), policy_type);
        }

        assert_eq!(PolicyType::ServiceControl.to_string(), "scp");
        assert_eq!(PolicyType::from_str("SCP").unwrap_err().to_string(), "Invalid policy type: SCP");
    }

    #[test_log::test]
    fn test_rules() {
        let rules = PolicyType::Trust.rules();
        assert_eq!(rules.policy_type(), "a trust policy");
        assert_eq!(rules.prohibited_fields(), &["Resource".to_string(), "NotResource".to_string()]);

        assert!(PolicyType::Resource.rules().prohibited_fields().is_empty());
        assert_eq!(PolicyType::Endpoint.rules().required_groups()[2], vec!["Principal".to_string()]);
    }

    #[test_log::test]
    fn test_wildcard_position() {
        let validator = PolicyTypeValidator {
            policy_type: PolicyType::ServiceControl,
            rules: PolicyType::ServiceControl.rules(),
        };

        assert!(validator.validate_action("*", "A").is_empty());
        assert!(validator.validate_action("s3:Get*", "A").is_empty());
        assert!(validator.validate_action("s3:GetObjec?", "A").is_empty());
        assert!(validator.validate_action("s3:GetObject", "A").is_empty());
        assert_eq!(
            validator.validate_action("s3:*Object", "A"),
            vec![ValidationError::new(
                "A",
                "Wildcard characters are only allowed at the end of Action in a service control policy"
            )]
        );
        assert_eq!(
            validator.validate_not_action("s3:Get?bject*", "N"),
            vec![ValidationError::new(
                "N",
                "Wildcard characters are only allowed at the end of NotAction in a service control policy"
            )]
        );
    }

    #[test_log::test]
    fn test_rcp_version() {
        let document = json!({
            "Statement": {"Effect": "Deny", "Principal": "*", "Action": "s3:GetObject", "Resource": "*"}
        });
        assert_eq!(
            validate_resource_control_policy(&document),
            vec![ValidationError::new("", r#"Version must be "2012-10-17" in a resource control policy"#)]
        );

        let document = json!({
            "Version": "2008-10-17",
            "Statement": {"Effect": "Deny", "Principal": "*", "Action": "s3:GetObject", "Resource": "*"}
        });
        assert_eq!(
            validate_resource_control_policy(&document),
            vec![ValidationError::new("Version", r#"Version must be "2012-10-17" in a resource control policy"#)]
        );
    }

    #[test_log::test]
    fn test_rcp_statement() {
        let document = json!({
            "Version": "2012-10-17",
            "Statement": [{"Effect": "Allow", "Action": "*", "NotAction": "s3:PutObject", "Resource": "*"}]
        });

        assert_eq!(
            sorted(validate_resource_control_policy(&document)),
            vec![
                ValidationError::new("Statement[0]", "Only one of Action or NotAction is allowed, found both"),
                ValidationError::new("Statement[0]", r#"Principal must be "*" in a resource control policy"#),
                ValidationError::new(
                    "Statement[0].#NotAction",
                    "NotAction is not allowed in a resource control policy"
                ),
                ValidationError::new("Statement[0].Action", r#"Action cannot be "*" in a resource control policy"#),
                ValidationError::new("Statement[0].Effect", r#"Effect must be "Deny" in a resource control policy"#),
            ]
        );

        let document = json!({
            "Version": "2012-10-17",
            "Statement": {"Effect": "Deny", "Principal": {"AWS": "*"}, "Action": ["s3:*"], "Resource": "*"}
        });
        assert_eq!(
            validate_resource_control_policy(&document),
            vec![ValidationError::new("Statement.Principal", r#"Principal must be "*" in a resource control policy"#)]
        );
    }

    #[test_log::test]
    fn test_scp_allow() {
        let document = json!({
            "Version": "2012-10-17",
            "Statement": [
                {
                    "Effect": "Allow",
                    "NotAction": "iam:*",
                    "Resource": ["*"],
                    "Condition": {"Bool": {"aws:SecureTransport": "true"}}
                },
                {
                    "Effect": "Deny",
                    "NotAction": "iam:*",
                    "Resource": "arn:aws:s3:::bucket",
                    "Condition": {"Bool": {"aws:SecureTransport": "false"}}
                }
            ]
        });

        assert_eq!(
            sorted(validate_service_control_policy(&document)),
            vec![
                ValidationError::new(
                    "Statement[0]",
                    r#"Resource must be "*" when Effect is "Allow" in a service control policy"#
                ),
                ValidationError::new(
                    "Statement[0].#Condition",
                    r#"Condition is not allowed when Effect is "Allow" in a service control policy"#
                ),
                ValidationError::new(
                    "Statement[0].#NotAction",
                    r#"NotAction is not allowed when Effect is "Allow" in a service control policy"#
                ),
            ]
        );
    }

    #[test_log::test]
    fn test_endpoint_principal() {
        let document = json!({
            "Statement": [
                {"Effect": "Allow", "Principal": "*", "Action": "s3:GetObject", "Resource": "*"},
                {"Effect": "Allow", "Principal": {"AWS": "123456789012"}, "Action": "s3:GetObject", "Resource": "*"},
                {"Effect": "Allow", "Action": "s3:GetObject", "Resource": "*"}
            ]
        });

        assert_eq!(
            sorted(validate_endpoint_policy(&document)),
            vec![
                ValidationError::new("Statement[1].Principal", r#"Principal must be "*" in an endpoint policy"#),
                ValidationError::new("Statement[2]", "Principal is required in an endpoint policy"),
            ]
        );
    }
}
