use std::{fmt, ops::Deref};

use crate::{Result, check_string_len};

/// A UTF-8 string whose encoding fits the 32,767-byte limit of the wire
/// format. The limit is checked whenever the content changes.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NbtString(String);

impl NbtString {
    /// # Errors
    ///
    /// [`Error::StringTooLong`](crate::Error::StringTooLong) if `value` is
    /// longer than 32,767 bytes.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        check_string_len(value.len())?;
        Ok(Self(value))
    }

    /// Replaces the content, leaving it untouched on error.
    pub fn set(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        check_string_len(value.len())?;
        self.0 = value;
        Ok(())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for NbtString {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NbtString {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NbtString {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NbtString {
    type Error = crate::Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl PartialEq<str> for NbtString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NbtString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Debug for NbtString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for NbtString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, MAX_STRING_LEN};

    #[test]
    fn limit_is_on_encoded_bytes() {
        // 'é' is two bytes in UTF-8
        let accepted = "é".repeat(MAX_STRING_LEN / 2) + "a";
        assert_eq!(accepted.len(), MAX_STRING_LEN);
        assert!(NbtString::new(accepted).is_ok());

        let rejected = "é".repeat(MAX_STRING_LEN / 2 + 1);
        assert!(matches!(
            NbtString::new(rejected),
            Err(Error::StringTooLong(32768))
        ));
    }

    #[test]
    fn failed_set_keeps_content() {
        let mut s = NbtString::new("keep").unwrap();
        assert!(s.set("x".repeat(MAX_STRING_LEN + 1)).is_err());
        assert_eq!(s, "keep");
        s.set("changed").unwrap();
        assert_eq!(s.as_str(), "changed");
    }
}
