use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::LedgerError;

/// Name identifying the owner of a ledger. Each name owns exactly one record.
///
/// The name doubles as a file name for the local store, so anything that
/// could escape the data directory is refused.
#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName {
    name: String,
}

impl UserName {
    pub const MAX_LEN: usize = 64;
    /// Bound on the UTF-8 encoding, so `{name}.json` stays well under
    /// the 255 byte file name limit of common filesystems.
    pub const MAX_BYTES: usize = 200;

    pub fn parse(raw: &str) -> Result<UserName, LedgerError> {
        let name = raw.trim();
        let invalid = |reason: &'static str| LedgerError::InvalidUserName {
            name: raw.to_owned(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if name.chars().count() > Self::MAX_LEN {
            return Err(invalid("too long"));
        }
        if name.len() > Self::MAX_BYTES {
            return Err(invalid("too long when encoded as UTF-8"));
        }
        if name == "." || name == ".." {
            return Err(invalid("reserved name"));
        }
        if name.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
            return Err(invalid("contains a path separator or control character"));
        }

        Ok(UserName { name: name.to_owned() })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl FromStr for UserName {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserName::parse(s)
    }
}

impl TryFrom<String> for UserName {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UserName::parse(&value)
    }
}

impl From<UserName> for String {
    fn from(user: UserName) -> Self {
        user.name
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::UserName;
    use crate::core::error::LedgerError;
    use rstest::rstest;

    #[rstest]
    #[case("alice")]
    #[case("Bilbo Baggins")]
    #[case("张三")]
    #[case("o'neil.2024")]
    fn accepts_plain_names(#[case] raw: &str) {
        let user = UserName::parse(raw).unwrap();
        assert_eq!(user.as_str(), raw);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let user = UserName::parse("  frodo \n").unwrap();
        assert_eq!(user.as_str(), "frodo");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(".")]
    #[case("..")]
    #[case("../etc/passwd")]
    #[case("a/b")]
    #[case("a\\b")]
    #[case("tab\there")]
    fn rejects_unsafe_names(#[case] raw: &str) {
        let res = UserName::parse(raw);
        assert!(matches!(res, Err(LedgerError::InvalidUserName { .. })));
    }

    #[test]
    fn rejects_overlong_names() {
        let raw = "x".repeat(UserName::MAX_LEN + 1);
        assert!(UserName::parse(&raw).is_err());
        assert!(UserName::parse(&raw[1..]).is_ok());
    }

    #[rstest]
    #[case("😀".repeat(64), false)]
    #[case("张".repeat(64), true)]
    #[case("😀".repeat(50), true)]
    #[case("😀".repeat(51), false)]
    fn bounds_encoded_length(#[case] raw: String, #[case] accepted: bool) {
        let res = UserName::parse(&raw);
        assert_eq!(res.is_ok(), accepted);
        if !accepted {
            assert!(matches!(res, Err(LedgerError::InvalidUserName { reason, .. }) if reason.contains("UTF-8")));
        }
    }

    #[test]
    fn deserialize_validates() {
        let ok: UserName = serde_json::from_str("\"gimli\"").unwrap();
        assert_eq!(ok.to_string(), "gimli");
        assert!(serde_json::from_str::<UserName>("\"../x\"").is_err());
    }
}
