//! Heart-rate zone banding.
//!
//! Maps an estimate against the age-derived maximum heart rate
//! (220 minus age) into three display bands. The zone only drives the
//! readout tint, never any control logic.

/// Display band for an estimate relative to the maximum heart rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Below 65% of max.
    Low,
    /// 65% up to 85% of max.
    Moderate,
    /// 85% of max and above.
    High,
}

/// The conventional age-predicted maximum, 220 minus age.
pub fn max_heart_rate(age: u8) -> u16 {
    220u16.saturating_sub(u16::from(age))
}

pub fn classify(bpm: u32, max_heart_rate: u16) -> Zone {
    let ratio = bpm as f64 / f64::from(max_heart_rate.max(1));
    if ratio < 0.65 {
        Zone::Low
    } else if ratio < 0.85 {
        Zone::Moderate
    } else {
        Zone::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_heart_rate_is_220_minus_age() {
        assert_eq!(max_heart_rate(45), 175);
        assert_eq!(max_heart_rate(30), 190);
    }

    #[test]
    fn band_boundaries() {
        // With max 200 the band edges sit at 130 and 170.
        assert_eq!(classify(129, 200), Zone::Low);
        assert_eq!(classify(130, 200), Zone::Moderate);
        assert_eq!(classify(169, 200), Zone::Moderate);
        assert_eq!(classify(170, 200), Zone::High);
    }

    #[test]
    fn above_max_is_still_high() {
        assert_eq!(classify(260, 200), Zone::High);
    }

    #[test]
    fn resting_rate_is_low() {
        assert_eq!(classify(62, max_heart_rate(30)), Zone::Low);
    }
}
