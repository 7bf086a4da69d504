#![warn(clippy::all)]

//! Validation and a read-only object model for AWS IAM-style policy documents.
//!
//! Documents are [serde_json::Value]s. [validate_policy_syntax] checks the structure common to all policy documents;
//! the `validate_*_policy` functions add the field rules of a specific policy type. Neither ever fails: every problem
//! found is returned as a [ValidationError], and an empty list means the document is valid.
//!
//! [Policy] and the types reachable from it give typed access to a document that has passed validation.
//! [AnnotatedPolicy] is the same view with an [AnnotationStore] on the policy and on every element reached from it.

pub(crate) mod action;
pub(crate) mod annotation;
pub(crate) mod condition;
pub(crate) mod effect;
pub(crate) mod error;
pub(crate) mod policy;
pub(crate) mod principal;
pub(crate) mod resource;
pub(crate) mod serutil;
pub(crate) mod statement;
pub(crate) mod validate;

pub use {
    action::{Action, ActionKind},
    annotation::{
        Annotated, AnnotatedAction, AnnotatedCondition, AnnotatedPrincipal, AnnotatedResource, AnnotationStore,
    },
    condition::{Condition, ConditionOperation, SetOperator},
    effect::Effect,
    error::{PolicyError, ValidationError},
    policy::{AnnotatedPolicy, Policy, PolicyVersion},
    principal::{Principal, PrincipalType},
    resource::Resource,
    statement::{AnnotatedStatement, Statement},
    validate::{
        validate_endpoint_policy, validate_identity_policy, validate_policy_syntax, validate_resource_control_policy,
        validate_resource_policy, validate_service_control_policy, validate_session_policy, validate_trust_policy,
        PolicyType, RuleSet, RuleSetBuilder, RuleSetBuilderError, ValidationCallbacks,
    },
};
