use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Storefront display language. Product text is stored once per locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Kyrgyz; the fallback for every localized lookup.
    #[default]
    Kg,
    Ru,
    En,
}

impl Locale {
    /// Lookup order for localized text: the requested locale first, then the
    /// remaining locales with Kyrgyz ahead of the others.
    #[must_use]
    pub fn fallback_chain(self) -> [Locale; 3] {
        match self {
            Locale::Kg => [Locale::Kg, Locale::Ru, Locale::En],
            Locale::Ru => [Locale::Ru, Locale::Kg, Locale::En],
            Locale::En => [Locale::En, Locale::Kg, Locale::Ru],
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Locale::Kg => "kg",
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown locale \"{0}\" (expected kg, ru or en)")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" | "ky" => Ok(Locale::Kg),
            "ru" => Ok(Locale::Ru),
            "en" => Ok(Locale::En),
            other => Err(UnknownLocale(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("RU".parse::<Locale>().unwrap(), Locale::Ru);
        assert_eq!(" en ".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("ky".parse::<Locale>().unwrap(), Locale::Kg);
    }

    #[test]
    fn rejects_unknown_code() {
        assert_eq!(
            "de".parse::<Locale>().unwrap_err(),
            UnknownLocale("de".to_owned())
        );
    }

    #[test]
    fn fallback_chain_starts_with_requested_locale() {
        assert_eq!(Locale::En.fallback_chain()[0], Locale::En);
        assert_eq!(Locale::En.fallback_chain()[1], Locale::Kg);
    }
}
