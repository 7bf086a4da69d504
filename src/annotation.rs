use {
    crate::{Action, Condition, Principal, Resource},
    std::{cell::RefCell, ops::Deref},
};

/// Free-form `key -> values` notes attached to a policy element.
///
/// Keys keep the order in which they were first added, and values keep the order in which they were added under
/// their key. Annotations are added through a shared reference so that elements cached inside an
/// [AnnotatedPolicy](crate::AnnotatedPolicy) can be annotated in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationStore {
    annotations: RefCell<Vec<(String, Vec<String>)>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_annotation<K: Into<String>, V: Into<String>>(&self, key: K, value: V) {
        let key = key.into();
        let mut annotations = self.annotations.borrow_mut();

        match annotations.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, values)) => values.push(value.into()),
            None => annotations.push((key, vec![value.into()])),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.annotations.borrow().iter().map(|(key, _)| key.clone()).collect()
    }

    /// The values recorded under `key`, or an empty list if there are none.
    pub fn values(&self, key: &str) -> Vec<String> {
        self.annotations
            .borrow()
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, values)| values.clone())
            .unwrap_or_default()
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.annotations.borrow().iter().any(|(existing, _)| existing == key)
    }
}

/// A leaf policy element (action, resource, principal or condition) carrying its own annotations.
///
/// Dereferences to the wrapped element, so all of the element's accessors are available directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotated<T> {
    element: T,
    annotations: AnnotationStore,
}

impl<T> Annotated<T> {
    pub fn new(element: T) -> Self {
        Self {
            element,
            annotations: AnnotationStore::new(),
        }
    }

    #[inline]
    pub fn element(&self) -> &T {
        &self.element
    }

    #[inline]
    pub fn add_annotation<K: Into<String>, V: Into<String>>(&self, key: K, value: V) {
        self.annotations.add_annotation(key, value)
    }

    #[inline]
    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }
}

impl<T> Deref for Annotated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.element
    }
}

pub type AnnotatedAction<'a> = Annotated<Action<'a>>;
pub type AnnotatedCondition<'a> = Annotated<Condition<'a>>;
pub type AnnotatedPrincipal<'a> = Annotated<Principal<'a>>;
pub type AnnotatedResource<'a> = Annotated<Resource<'a>>;
