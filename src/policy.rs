use {
    crate::{serutil::ElementList, AnnotatedStatement, AnnotationStore, PolicyError, Statement},
    log::trace,
    serde::{de::Deserializer, ser::Serializer, Deserialize, Serialize},
    serde_json::Value,
    std::{
        cell::OnceCell,
        fmt::{Display, Formatter, Result as FmtResult},
        ops::Deref,
        str::FromStr,
    },
};

/// The policy language versions a document may declare.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[allow(non_camel_case_types)]
pub enum PolicyVersion {
    V2008_10_17,
    V2012_10_17,
}

impl Display for PolicyVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::V2008_10_17 => f.write_str("2008-10-17"),
            Self::V2012_10_17 => f.write_str("2012-10-17"),
        }
    }
}

impl FromStr for PolicyVersion {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2008-10-17" => Ok(Self::V2008_10_17),
            "2012-10-17" => Ok(Self::V2012_10_17),
            _ => Err(PolicyError::InvalidPolicyVersion(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for PolicyVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        match PolicyVersion::from_str(&value) {
            Ok(v) => Ok(v),
            Err(e) => Err(serde::de::Error::custom(e)),
        }
    }
}

impl Serialize for PolicyVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// A read-only view of a policy document.
///
/// This does not check the document. Run it through one of the validators first; on a malformed document the accessors
/// return `None` or skip what they cannot interpret.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Policy<'a> {
    document: &'a Value,
}

impl<'a> Policy<'a> {
    #[inline]
    pub fn new(document: &'a Value) -> Self {
        Self {
            document,
        }
    }

    #[inline]
    pub fn document(&self) -> &'a Value {
        self.document
    }

    /// The `Version` string as written.
    #[inline]
    pub fn version(&self) -> Option<&'a str> {
        self.document.get("Version").and_then(Value::as_str)
    }

    /// The `Version` as a known policy version, or `None` if it is absent or unrecognized.
    pub fn policy_version(&self) -> Option<PolicyVersion> {
        self.version().and_then(|v| PolicyVersion::from_str(v).ok())
    }

    #[inline]
    pub fn id(&self) -> Option<&'a str> {
        self.document.get("Id").and_then(Value::as_str)
    }

    /// The statements in document order, whether `Statement` holds one statement object or a list.
    ///
    /// Elements that are not objects are skipped, but the remaining statements keep their numbering.
    pub fn statements(&self) -> Vec<Statement<'a>> {
        let statements = match self.document.get("Statement") {
            None | Some(Value::Null) => return Vec::new(),
            Some(statements) => ElementList::new(statements),
        };

        let in_list = statements.is_list();
        statements
            .iter()
            .enumerate()
            .filter(|(_, statement)| statement.is_object())
            .map(|(position, statement)| Statement::new(statement, position, in_list))
            .collect()
    }

    #[inline]
    pub fn statement_is_array(&self) -> bool {
        matches!(self.document.get("Statement"), Some(Value::Array(_)))
    }
}

/// A [Policy] that carries annotations and keeps its statements between calls.
///
/// Statements are built on the first call to [statements](Self::statements) and reused afterwards, so annotations
/// added to a statement, or to any element reached through it, are still there on the next call.
#[derive(Clone, Debug)]
pub struct AnnotatedPolicy<'a> {
    policy: Policy<'a>,
    annotations: AnnotationStore,
    statements: OnceCell<Vec<AnnotatedStatement<'a>>>,
}

impl<'a> AnnotatedPolicy<'a> {
    pub fn new(document: &'a Value) -> Self {
        Self {
            policy: Policy::new(document),
            annotations: AnnotationStore::new(),
            statements: OnceCell::new(),
        }
    }

    #[inline]
    pub fn policy(&self) -> &Policy<'a> {
        &self.policy
    }

    #[inline]
    pub fn add_annotation<K: Into<String>, V: Into<String>>(&self, key: K, value: V) {
        self.annotations.add_annotation(key, value)
    }

    #[inline]
    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn statements(&self) -> &[AnnotatedStatement<'a>] {
        self.statements.get_or_init(|| {
            let statements = self.policy.statements();
            trace!("Caching {} annotated statements", statements.len());
            statements.into_iter().map(AnnotatedStatement::new).collect()
        })
    }
}

impl<'a> From<Policy<'a>> for AnnotatedPolicy<'a> {
    fn from(policy: Policy<'a>) -> Self {
        Self::new(policy.document())
    }
}

impl<'a> Deref for AnnotatedPolicy<'a> {
    type Target = Policy<'a>;

    fn deref(&self) -> &Policy<'a> {
        &self.policy
    }
}
