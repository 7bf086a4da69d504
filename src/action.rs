use {
    crate::serutil::is_all_wildcards,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ActionKind {
    /// Every action: `*`, `**`, and so on.
    Wildcard,

    /// A `service:action` pattern.
    Service,
}

/// A single entry of a statement's `Action` or `NotAction` list.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Action<'a> {
    value: &'a str,
}

impl<'a> Action<'a> {
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

    pub fn kind(&self) -> ActionKind {
        if is_all_wildcards(self.value) {
            ActionKind::Wildcard
        } else {
            ActionKind::Service
        }
    }

    #[inline]
    pub fn is_wildcard_action(&self) -> bool {
        self.kind() == ActionKind::Wildcard
    }

    #[inline]
    pub fn is_service_action(&self) -> bool {
        self.kind() == ActionKind::Service
    }

    /// The service prefix, lowercased. Service prefixes are case insensitive.
    pub fn service(&self) -> Option<String> {
        if self.is_wildcard_action() {
            return None;
        }

        self.value.split(':').next().map(str::to_lowercase)
    }

    /// The action part after the service prefix, exactly as written.
    pub fn action(&self) -> Option<&'a str> {
        if self.is_wildcard_action() {
            return None;
        }

        self.value.split(':').nth(1)
    }
}

impl Display for Action<'_> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.value)
    }
}
