use serde::{Deserialize, Serialize};
use std::fmt;

/// Major/minor version of a versioned row. Drafts bump the minor number,
/// publishing bumps the major number and resets the minor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VersionNumber {
    pub major: i32,
    pub minor: i32,
}

impl VersionNumber {
    pub fn new(major: i32, minor: i32) -> Self {
        Self { major, minor }
    }

    /// Version of the first draft of a root entity.
    pub fn initial() -> Self {
        Self { major: 0, minor: 1 }
    }

    pub fn next_draft(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor + 1,
        }
    }

    pub fn published(self) -> Self {
        Self {
            major: self.major + 1,
            minor: 0,
        }
    }

    pub fn is_published_number(self) -> bool {
        self.minor == 0 && self.major > 0
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering() {
        let v = VersionNumber::initial();
        assert_eq!(v.to_string(), "0.1");
        assert_eq!(v.next_draft().to_string(), "0.2");
        assert_eq!(v.next_draft().published().to_string(), "1.0");
        assert_eq!(v.published().next_draft().to_string(), "1.1");
        assert!(v.published().is_published_number());
        assert!(!v.is_published_number());
    }

    #[test]
    fn test_ordering() {
        assert!(VersionNumber::new(1, 0) > VersionNumber::new(0, 9));
        assert!(VersionNumber::new(1, 2) > VersionNumber::new(1, 1));
    }
}
