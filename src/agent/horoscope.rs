//! Fixed horoscope table.

use serde::{Deserialize, Serialize};

const HOROSCOPES: &[(&str, &str)] = &[
    ("Aries", "Today is your lucky day!"),
    ("Taurus", "Focus on your goals today."),
    ("Gemini", "Communication will be important today."),
];

/// Returned for any sign not in the table.
pub const FALLBACK_HOROSCOPE: &str = "The stars are aligned for you today!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoroscopeReport {
    pub sign: String,
    pub horoscope: String,
}

/// Look up today's horoscope. Never fails; unknown signs get the fallback.
pub fn horoscope_for(sign: &str) -> HoroscopeReport {
    let text = HOROSCOPES
        .iter()
        .find(|(name, _)| *name == sign)
        .map(|(_, text)| *text)
        .unwrap_or(FALLBACK_HOROSCOPE);

    HoroscopeReport {
        sign: sign.to_string(),
        horoscope: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sign() {
        assert_eq!(horoscope_for("Aries").horoscope, "Today is your lucky day!");
        assert_eq!(horoscope_for("Gemini").horoscope, "Communication will be important today.");
    }

    #[test]
    fn test_unknown_sign_gets_fallback() {
        let report = horoscope_for("Zzyx");
        assert_eq!(report.sign, "Zzyx");
        assert_eq!(report.horoscope, FALLBACK_HOROSCOPE);
    }
}
