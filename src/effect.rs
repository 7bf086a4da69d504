use {
    crate::PolicyError,
    serde::{Deserialize, Serialize},
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// The effect of a statement. Matching is exact: `allow` is not an effect.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Display for Effect {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Allow => f.write_str("Allow"),
            Self::Deny => f.write_str("Deny"),
        }
    }
}

impl FromStr for Effect {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Allow" => Ok(Self::Allow),
            "Deny" => Ok(Self::Deny),
            _ => Err(PolicyError::InvalidEffect(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use {crate::Effect, pretty_assertions::assert_eq, std::collections::HashMap, std::str::FromStr};

    #[test_log::test]
    fn test_hash() {
        let mut hash_map = HashMap::new();
        hash_map.insert(Effect::Allow, 1);
        hash_map.insert(Effect::Deny, 2);

        assert_eq!(hash_map.get(&Effect::Allow), Some(&1));
        assert_eq!(hash_map.get(&Effect::Deny), Some(&2));
    }

    #[test_log::test]
    fn test_display() {
        assert_eq!(format!("{}", Effect::Allow), "Allow");
        assert_eq!(format!("{}", Effect::Deny), "Deny");
    }

    #[test_log::test]
    fn test_from_str() {
        assert_eq!(Effect::from_str("Allow").unwrap(), Effect::Allow);
        assert_eq!(Effect::from_str("Deny").unwrap(), Effect::Deny);
        assert_eq!(Effect::from_str("allow").unwrap_err().to_string(), "Invalid effect: allow");
        assert_eq!(Effect::from_str("").unwrap_err().to_string(), "Invalid effect: ");
    }
}
