//! The persisted user profile.
//!
//! Currently a single field, the user's age, which feeds the maximum
//! heart rate used for zone banding. This is the top-level object the
//! GUI saves to and loads from a file.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::zones;

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 129;
pub const DEFAULT_AGE: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u8,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self { age: DEFAULT_AGE }
    }
}

impl UserProfile {
    /// Builds a profile from a validated age.
    pub fn with_age(age: u8) -> Result<Self> {
        validate_age(age)?;
        Ok(Self { age })
    }

    pub fn max_heart_rate(&self) -> u16 {
        zones::max_heart_rate(self.age)
    }
}

pub fn validate_age(age: u8) -> Result<()> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        bail!("age must be between {MIN_AGE} and {MAX_AGE}");
    }
    Ok(())
}

/// Parses free-form age input from the custom entry field.
///
/// Rejection leaves the caller's stored age untouched; the message is
/// meant to be shown to the user as-is.
pub fn parse_age(input: &str) -> Result<u8> {
    let trimmed = input.trim();
    let Ok(age) = trimmed.parse::<u8>() else {
        bail!("enter a whole number between {MIN_AGE} and {MAX_AGE}");
    };
    validate_age(age)?;
    Ok(age)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_in_range_ages() {
        assert_eq!(parse_age("45").unwrap(), 45);
        assert_eq!(parse_age("1").unwrap(), 1);
        assert_eq!(parse_age("129").unwrap(), 129);
        assert_eq!(parse_age(" 35 ").unwrap(), 35);
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert!(parse_age("0").is_err());
        assert!(parse_age("130").is_err());
        assert!(parse_age("200").is_err());
        assert!(parse_age("-5").is_err());
        assert!(parse_age("abc").is_err());
        assert!(parse_age("").is_err());
    }

    #[test]
    fn default_profile_is_age_30() {
        let profile = UserProfile::default();
        assert_eq!(profile.age, 30);
        assert_eq!(profile.max_heart_rate(), 190);
    }

    #[test]
    fn stored_age_drives_max_heart_rate() {
        let profile = UserProfile::with_age(45).unwrap();
        assert_eq!(profile.max_heart_rate(), 175);
        assert!(UserProfile::with_age(0).is_err());
    }
}
