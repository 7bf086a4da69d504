use {
    crate::{
        condition::parse_conditions, principal::parse_principals, serutil::ElementList, Action, Annotated,
        AnnotatedAction, AnnotatedCondition, AnnotatedPrincipal, AnnotatedResource, AnnotationStore, Condition, Effect,
        Principal, Resource,
    },
    serde_json::Value,
    std::{cell::OnceCell, ops::Deref, str::FromStr},
};

/// A read-only view of one statement in a policy document.
///
/// Statements come in variants: each of `Action`/`NotAction`, `Resource`/`NotResource` and `Principal`/`NotPrincipal`
/// is normally set on one side only. Check the variant with the `is_*_statement` guards; the matching accessors return
/// `None` when the field is unset (or null).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Statement<'a> {
    statement: &'a Value,
    position: usize,
    in_list: bool,
}

impl<'a> Statement<'a> {
    /// `position` is the zero-based offset of the statement in the `Statement` list.
    pub(crate) fn new(statement: &'a Value, position: usize, in_list: bool) -> Self {
        Self {
            statement,
            position,
            in_list,
        }
    }

    /// The number of this statement in the document, starting from 1.
    #[inline]
    pub fn index(&self) -> usize {
        self.position + 1
    }

    /// `Statement[i]` for a statement in a list, `Statement` for a lone statement object.
    pub fn path(&self) -> String {
        if self.in_list {
            format!("Statement[{}]", self.position)
        } else {
            "Statement".to_string()
        }
    }

    #[inline]
    pub fn raw(&self) -> &'a Value {
        self.statement
    }

    fn field(&self, key: &str) -> Option<&'a Value> {
        self.statement.get(key).filter(|v| !v.is_null())
    }

    #[inline]
    pub fn sid(&self) -> Option<&'a str> {
        self.field("Sid").and_then(Value::as_str)
    }

    pub fn effect(&self) -> Option<Effect> {
        self.field("Effect").and_then(Value::as_str).and_then(|e| Effect::from_str(e).ok())
    }

    #[inline]
    pub fn is_allow(&self) -> bool {
        self.effect() == Some(Effect::Allow)
    }

    #[inline]
    pub fn is_deny(&self) -> bool {
        self.effect() == Some(Effect::Deny)
    }

    #[inline]
    pub fn is_principal_statement(&self) -> bool {
        self.field("Principal").is_some()
    }

    #[inline]
    pub fn is_not_principal_statement(&self) -> bool {
        self.field("NotPrincipal").is_some()
    }

    #[inline]
    pub fn is_action_statement(&self) -> bool {
        self.field("Action").is_some()
    }

    #[inline]
    pub fn is_not_action_statement(&self) -> bool {
        self.field("NotAction").is_some()
    }

    #[inline]
    pub fn is_resource_statement(&self) -> bool {
        self.field("Resource").is_some()
    }

    #[inline]
    pub fn is_not_resource_statement(&self) -> bool {
        self.field("NotResource").is_some()
    }

    pub fn principals(&self) -> Option<Vec<Principal<'a>>> {
        self.field("Principal").map(parse_principals)
    }

    pub fn not_principals(&self) -> Option<Vec<Principal<'a>>> {
        self.field("NotPrincipal").map(parse_principals)
    }

    fn strings(&self, key: &str) -> Option<Vec<&'a str>> {
        self.field(key).map(|value| ElementList::new(value).strings())
    }

    pub fn actions(&self) -> Option<Vec<Action<'a>>> {
        self.strings("Action").map(|actions| actions.into_iter().map(Action::new).collect())
    }

    pub fn not_actions(&self) -> Option<Vec<Action<'a>>> {
        self.strings("NotAction").map(|actions| actions.into_iter().map(Action::new).collect())
    }

    pub fn resources(&self) -> Option<Vec<Resource<'a>>> {
        self.strings("Resource").map(|resources| resources.into_iter().map(Resource::new).collect())
    }

    pub fn not_resources(&self) -> Option<Vec<Resource<'a>>> {
        self.strings("NotResource").map(|resources| resources.into_iter().map(Resource::new).collect())
    }

    /// Whether `Resource` is exactly the string `"*"`. A list containing only `"*"` does not count.
    pub fn has_single_resource_wildcard(&self) -> Option<bool> {
        self.field("Resource").map(|resource| resource.as_str() == Some("*"))
    }

    /// Every condition of the statement, flattened in document order. Empty if there is no `Condition` block.
    pub fn conditions(&self) -> Vec<Condition<'a>> {
        match self.field("Condition") {
            Some(condition) => parse_conditions(condition, &self.path()),
            None => Vec::new(),
        }
    }
}

/// A [Statement] that keeps its elements, and their annotations, across accessor calls.
///
/// Each element list is built the first time it is requested; later calls return the same elements. Everything else
/// is available through the wrapped [Statement].
#[derive(Clone, Debug)]
pub struct AnnotatedStatement<'a> {
    statement: Statement<'a>,
    annotations: AnnotationStore,
    principals: OnceCell<Option<Vec<AnnotatedPrincipal<'a>>>>,
    not_principals: OnceCell<Option<Vec<AnnotatedPrincipal<'a>>>>,
    actions: OnceCell<Option<Vec<AnnotatedAction<'a>>>>,
    not_actions: OnceCell<Option<Vec<AnnotatedAction<'a>>>>,
    resources: OnceCell<Option<Vec<AnnotatedResource<'a>>>>,
    not_resources: OnceCell<Option<Vec<AnnotatedResource<'a>>>>,
    conditions: OnceCell<Vec<AnnotatedCondition<'a>>>,
}

impl<'a> AnnotatedStatement<'a> {
    pub fn new(statement: Statement<'a>) -> Self {
        Self {
            statement,
            annotations: AnnotationStore::new(),
            principals: OnceCell::new(),
            not_principals: OnceCell::new(),
            actions: OnceCell::new(),
            not_actions: OnceCell::new(),
            resources: OnceCell::new(),
            not_resources: OnceCell::new(),
            conditions: OnceCell::new(),
        }
    }

    #[inline]
    pub fn statement(&self) -> &Statement<'a> {
        &self.statement
    }

    #[inline]
    pub fn add_annotation<K: Into<String>, V: Into<String>>(&self, key: K, value: V) {
        self.annotations.add_annotation(key, value)
    }

    #[inline]
    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn principals(&self) -> Option<&[AnnotatedPrincipal<'a>]> {
        cached(&self.principals, || self.statement.principals())
    }

    pub fn not_principals(&self) -> Option<&[AnnotatedPrincipal<'a>]> {
        cached(&self.not_principals, || self.statement.not_principals())
    }

    pub fn actions(&self) -> Option<&[AnnotatedAction<'a>]> {
        cached(&self.actions, || self.statement.actions())
    }

    pub fn not_actions(&self) -> Option<&[AnnotatedAction<'a>]> {
        cached(&self.not_actions, || self.statement.not_actions())
    }

    pub fn resources(&self) -> Option<&[AnnotatedResource<'a>]> {
        cached(&self.resources, || self.statement.resources())
    }

    pub fn not_resources(&self) -> Option<&[AnnotatedResource<'a>]> {
        cached(&self.not_resources, || self.statement.not_resources())
    }

    pub fn conditions(&self) -> &[AnnotatedCondition<'a>] {
        self.conditions.get_or_init(|| self.statement.conditions().into_iter().map(Annotated::new).collect())
    }
}

impl<'a> Deref for AnnotatedStatement<'a> {
    type Target = Statement<'a>;

    fn deref(&self) -> &Statement<'a> {
        &self.statement
    }
}

fn cached<T, F>(cell: &OnceCell<Option<Vec<Annotated<T>>>>, load: F) -> Option<&[Annotated<T>]>
where
    F: FnOnce() -> Option<Vec<T>>,
{
    cell.get_or_init(|| load().map(|elements| elements.into_iter().map(Annotated::new).collect())).as_deref()
}

#[cfg(test)]
mod tests {
    use {
        super::{AnnotatedStatement, Statement},
        crate::{Effect, PrincipalType},
        pretty_assertions::assert_eq,
        serde_json::json,
    };

    #[test_log::test]
    fn test_basic_fields() {
        let value = json!({
            "Sid": "ReadOnly",
            "Effect": "Allow",
            "Action": ["s3:GetObject", "s3:ListBucket"],
            "Resource": "*"
        });
        let statement = Statement::new(&value, 2, true);

        assert_eq!(statement.index(), 3);
        assert_eq!(statement.path(), "Statement[2]");
        assert_eq!(statement.sid(), Some("ReadOnly"));
        assert_eq!(statement.effect(), Some(Effect::Allow));
        assert!(statement.is_allow());
        assert!(!statement.is_deny());
        assert_eq!(statement.raw(), &value);

        assert!(statement.is_action_statement());
        assert!(!statement.is_not_action_statement());
        assert_eq!(
            statement.actions().unwrap().iter().map(|a| a.value()).collect::<Vec<_>>(),
            vec!["s3:GetObject", "s3:ListBucket"]
        );
        assert_eq!(statement.not_actions(), None);

        assert!(statement.is_resource_statement());
        assert_eq!(statement.has_single_resource_wildcard(), Some(true));
        assert!(statement.resources().unwrap()[0].is_all_resources());
        assert_eq!(statement.not_resources(), None);

        assert!(!statement.is_principal_statement());
        assert_eq!(statement.principals(), None);
        assert!(statement.conditions().is_empty());
    }

    #[test_log::test]
    fn test_not_variants() {
        let value = json!({
            "Effect": "Deny",
            "NotAction": "iam:*",
            "NotResource": ["arn:aws:iam::123456789012:role/Admin"],
            "NotPrincipal": {"AWS": ["arn:aws:iam::123456789012:root"]},
            "Principal": null
        });
        let statement = Statement::new(&value, 0, false);

        assert_eq!(statement.index(), 1);
        assert_eq!(statement.path(), "Statement");
        assert_eq!(statement.sid(), None);
        assert!(statement.is_deny());
        assert!(statement.is_not_action_statement());
        assert_eq!(statement.not_actions().unwrap()[0].service().as_deref(), Some("iam"));
        assert!(statement.is_not_resource_statement());
        assert_eq!(statement.not_resources().unwrap()[0].service(), Some("iam"));
        assert_eq!(statement.has_single_resource_wildcard(), None);

        assert!(!statement.is_principal_statement());
        assert!(statement.is_not_principal_statement());
        let not_principals = statement.not_principals().unwrap();
        assert_eq!(not_principals.len(), 1);
        assert_eq!(not_principals[0].principal_type(), PrincipalType::Aws);
        assert_eq!(not_principals[0].account_id(), Some("123456789012"));
    }

    #[test_log::test]
    fn test_resource_list_wildcard() {
        let value = json!({"Effect": "Allow", "Action": "*", "Resource": ["*"]});
        assert_eq!(Statement::new(&value, 0, true).has_single_resource_wildcard(), Some(false));
    }

    #[test_log::test]
    fn test_effect_is_exact() {
        let value = json!({"Effect": "allow"});
        let statement = Statement::new(&value, 0, true);
        assert_eq!(statement.effect(), None);
        assert!(!statement.is_allow());
        assert!(!statement.is_deny());
    }

    #[test_log::test]
    fn test_conditions() {
        let value = json!({
            "Effect": "Allow",
            "Action": "s3:GetObject",
            "Resource": "*",
            "Condition": {
                "StringEquals": {"aws:PrincipalTag/team": "red", "aws:RequestedRegion": ["us-east-1", "us-west-2"]},
                "Bool": {"aws:SecureTransport": "true"}
            }
        });
        let statement = Statement::new(&value, 1, true);
        let conditions = statement.conditions();

        assert_eq!(conditions.len(), 3);
        assert_eq!(conditions[1].condition_key(), "aws:RequestedRegion");
        assert_eq!(conditions[1].condition_values(), vec!["us-east-1", "us-west-2"]);
        assert_eq!(conditions[2].operation().value(), "Bool");
        assert_eq!(conditions[2].values_path(), "Statement[1].Condition.Bool.aws:SecureTransport");
    }

    #[test_log::test]
    fn test_annotated_actions_are_cached() {
        let value = json!({
            "Effect": "Allow",
            "Action": ["s3:GetObject", "s3:PutObject"],
            "NotAction": ["iam:PassRole", "iam:CreateUser"],
            "Resource": ["*"]
        });
        let statement = AnnotatedStatement::new(Statement::new(&value, 0, true));

        let actions = statement.actions().unwrap();
        actions[0].add_annotation("key1", "value1");
        actions[1].add_annotation("key2", "value2");
        let not_actions = statement.not_actions().unwrap();
        not_actions[1].add_annotation("key3", "value3");

        let actions = statement.actions().unwrap();
        assert_eq!(actions[0].annotations().values("key1"), vec!["value1"]);
        assert_eq!(actions[1].annotations().values("key2"), vec!["value2"]);
        assert!(!actions[0].annotations().has_key("key2"));
        assert_eq!(actions[1].value(), "s3:PutObject");
        assert_eq!(statement.not_actions().unwrap()[1].annotations().values("key3"), vec!["value3"]);
    }

    #[test_log::test]
    fn test_annotated_principals_are_cached() {
        let value = json!({
            "Effect": "Deny",
            "Principal": {"AWS": ["arn:aws:iam::123456789012:root", "arn:aws:iam::123456789012:user/Bob"]},
            "Action": "s3:GetObject",
            "Resource": "*"
        });
        let statement = AnnotatedStatement::new(Statement::new(&value, 0, false));

        let principals = statement.principals().unwrap();
        principals[0].add_annotation("key1", "value1");
        principals[1].add_annotation("key2", "value2");

        let principals = statement.principals().unwrap();
        assert_eq!(principals[0].annotations().values("key1"), vec!["value1"]);
        assert_eq!(principals[1].annotations().values("key2"), vec!["value2"]);
        assert!(principals[0].is_account_principal());
        assert_eq!(statement.not_principals(), None);
    }

    #[test_log::test]
    fn test_annotated_not_principals_are_cached() {
        let value = json!({
            "Effect": "Deny",
            "NotPrincipal": {"AWS": ["arn:aws:iam::123456789012:root", "arn:aws:iam::123456789012:user/Bob"]},
            "Action": "s3:GetObject",
            "Resource": "*"
        });
        let statement = AnnotatedStatement::new(Statement::new(&value, 0, true));

        statement.not_principals().unwrap()[1].add_annotation("key2", "value2");
        assert_eq!(statement.not_principals().unwrap()[1].annotations().values("key2"), vec!["value2"]);
        assert!(statement.not_principals().unwrap()[0].annotations().keys().is_empty());
    }

    #[test_log::test]
    fn test_annotated_resources_are_cached() {
        let value = json!({
            "Effect": "Allow",
            "Action": "s3:GetObject",
            "Resource": ["arn:aws:s3:::bucket1/*", "arn:aws:s3:::bucket2/*"],
            "NotResource": ["arn:aws:s3:::bucket3/*"]
        });
        let statement = AnnotatedStatement::new(Statement::new(&value, 0, true));

        let resources = statement.resources().unwrap();
        resources[0].add_annotation("key1", "value1");
        resources[1].add_annotation("key2", "value2");
        statement.not_resources().unwrap()[0].add_annotation("key3", "value3");

        let resources = statement.resources().unwrap();
        assert_eq!(resources[0].annotations().values("key1"), vec!["value1"]);
        assert_eq!(resources[1].annotations().values("key2"), vec!["value2"]);
        assert_eq!(resources[1].resource(), Some("bucket2/*"));
        assert_eq!(statement.not_resources().unwrap()[0].annotations().values("key3"), vec!["value3"]);
    }

    #[test_log::test]
    fn test_annotated_conditions_are_cached() {
        let value = json!({
            "Effect": "Allow",
            "Action": "s3:GetObject",
            "Resource": "*",
            "Condition": {
                "StringEquals": {"s3:prefix": "home/${aws:username}"},
                "ArnLike": {"aws:PrincipalArn": "arn:aws:iam::*:user/key-user"}
            }
        });
        let statement = AnnotatedStatement::new(Statement::new(&value, 0, true));

        let conditions = statement.conditions();
        conditions[0].add_annotation("key1", "value1");
        conditions[1].add_annotation("key2", "value2");

        let conditions = statement.conditions();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].annotations().values("key1"), vec!["value1"]);
        assert_eq!(conditions[1].annotations().values("key2"), vec!["value2"]);
        assert_eq!(conditions[1].condition_key(), "aws:PrincipalArn");
    }

    #[test_log::test]
    fn test_annotated_statement_delegates() {
        let value = json!({"Sid": "One", "Effect": "Deny", "Action": "*", "Resource": "*"});
        let statement = AnnotatedStatement::new(Statement::new(&value, 1, true));
        statement.add_annotation("finding", "broad deny");

        assert_eq!(statement.index(), 2);
        assert_eq!(statement.path(), "Statement[1]");
        assert_eq!(statement.sid(), Some("One"));
        assert!(statement.is_deny());
        assert!(statement.actions().unwrap()[0].is_wildcard_action());
        assert_eq!(statement.statement().sid(), Some("One"));
        assert_eq!(statement.annotations().values("finding"), vec!["broad deny"]);
    }
}
