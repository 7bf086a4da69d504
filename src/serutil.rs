use {serde_json::Value, std::slice::Iter};

/// A borrowed JSON field that holds either one element or a list of elements.
///
/// Policy documents allow most fields to be written as a bare element instead of a one-element array; this gives both
/// shapes the same iteration interface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ElementList<'a> {
    Single(&'a Value),
    List(&'a [Value]),
}

impl<'a> ElementList<'a> {
    pub(crate) fn new(value: &'a Value) -> Self {
        match value {
            Value::Array(elements) => Self::List(elements.as_slice()),
            other => Self::Single(other),
        }
    }

    #[inline]
    pub(crate) fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub(crate) fn as_slice(&self) -> &'a [Value] {
        match self {
            Self::Single(element) => std::slice::from_ref(*element),
            Self::List(elements) => elements,
        }
    }

    #[inline]
    pub(crate) fn iter(&self) -> Iter<'a, Value> {
        self.as_slice().iter()
    }

    /// The string elements. Anything else is dropped.
    pub(crate) fn strings(&self) -> Vec<&'a str> {
        self.iter().filter_map(Value::as_str).collect()
    }
}

/// True if the value is made up of one or more `*` characters and nothing else.
pub(crate) fn is_all_wildcards(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b == b'*')
}
