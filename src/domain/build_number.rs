use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a non-negative integer")]
pub struct BuildNumberParseError(pub String);

/// Release counter shared by the Android version code and the iOS build number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BuildNumber(u32);

impl BuildNumber {
    pub fn new(value: u32) -> Self {
        BuildNumber(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// The next build number, or `None` at `u32::MAX`.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(BuildNumber)
    }

    /// Interpret the persisted Android version code, which is stored signed.
    pub fn from_signed(value: i64) -> Option<Self> {
        u32::try_from(value).ok().map(BuildNumber)
    }
}

impl FromStr for BuildNumber {
    type Err = BuildNumberParseError;

    /// Accepts only plain decimal digits; `"-1"`, `"+1"` and `" 1"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BuildNumberParseError(s.to_string()));
        }
        s.parse::<u32>()
            .map(BuildNumber)
            .map_err(|_| BuildNumberParseError(s.to_string()))
    }
}

impl fmt::Display for BuildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_digits() {
        assert_eq!("42".parse::<BuildNumber>().unwrap(), BuildNumber::new(42));
        assert_eq!("0".parse::<BuildNumber>().unwrap(), BuildNumber::new(0));
    }

    #[test]
    fn test_parse_rejects_signs_and_text() {
        assert!("-1".parse::<BuildNumber>().is_err());
        assert!("+1".parse::<BuildNumber>().is_err());
        assert!("abc".parse::<BuildNumber>().is_err());
        assert!("".parse::<BuildNumber>().is_err());
        assert!(" 1".parse::<BuildNumber>().is_err());
    }

    #[test]
    fn test_from_signed() {
        assert_eq!(BuildNumber::from_signed(5), Some(BuildNumber::new(5)));
        assert_eq!(BuildNumber::from_signed(-1), None);
        assert_eq!(BuildNumber::from_signed(i64::from(u32::MAX) + 1), None);
    }

    #[test]
    fn test_next() {
        assert_eq!(BuildNumber::new(7).next(), Some(BuildNumber::new(8)));
        assert_eq!(BuildNumber::new(u32::MAX).next(), None);
    }

    #[test]
    fn test_ordering_takes_max() {
        let android = BuildNumber::new(5);
        let ios = BuildNumber::new(7);
        assert_eq!(android.max(ios), ios);
    }
}
