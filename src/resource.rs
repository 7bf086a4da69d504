use {
    crate::serutil::is_all_wildcards,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// A single entry of a statement's `Resource` or `NotResource` list.
///
/// Anything other than an all-wildcard value is treated as an ARN pattern. The ARN accessors split on the first five
/// colons, so the resource part keeps any colons of its own; they return `None` for wildcards and for values with
/// too few segments.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Resource<'a> {
    value: &'a str,
}

impl<'a> Resource<'a> {
    #[inline]
    pub fn new(value: &'a str) -> Self {
        Self {
            value,
        }
    }

    #[inline]
    pub fn value(&self) -> &'a str {
        self.value
    }

    #[inline]
    pub fn is_all_resources(&self) -> bool {
        is_all_wildcards(self.value)
    }

    #[inline]
    pub fn is_arn_resource(&self) -> bool {
        !self.is_all_resources()
    }

    fn segment(&self, index: usize) -> Option<&'a str> {
        if !self.is_arn_resource() {
            return None;
        }

        self.value.splitn(6, ':').nth(index)
    }

    #[inline]
    pub fn partition(&self) -> Option<&'a str> {
        self.segment(1)
    }

    #[inline]
    pub fn service(&self) -> Option<&'a str> {
        self.segment(2)
    }

    #[inline]
    pub fn region(&self) -> Option<&'a str> {
        self.segment(3)
    }

    #[inline]
    pub fn account(&self) -> Option<&'a str> {
        self.segment(4)
    }

    #[inline]
    pub fn resource(&self) -> Option<&'a str> {
        self.segment(5)
    }
}

impl Display for Resource<'_> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.value)
    }
}
