//! Salary parsing into exact minor currency units.
//!
//! A locale profile names the currency symbols and separators a source uses.
//! After they are stripped the residue must be `-?digits[<decimal>d{1,2}]`,
//! so `"£45,000"` is 4 500 000 pence and never 450.

use tracing::warn;
use unify_model::Money;

use crate::error::TransformError;

/// Separators and currency symbols of one salary notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleProfile {
    pub name: &'static str,
    pub decimal: char,
    pub thousands: &'static [char],
    pub symbols: &'static [&'static str],
}

const SPACES: [char; 3] = [' ', '\u{a0}', '\u{202f}'];

pub const EN_GB: LocaleProfile = LocaleProfile {
    name: "en-GB",
    decimal: '.',
    thousands: &[','],
    symbols: &["£", "GBP"],
};

pub const EN_US: LocaleProfile = LocaleProfile {
    name: "en-US",
    decimal: '.',
    thousands: &[','],
    symbols: &["US$", "$", "USD"],
};

pub const FR_FR: LocaleProfile = LocaleProfile {
    name: "fr-FR",
    decimal: ',',
    thousands: &['.', ' ', '\u{a0}', '\u{202f}'],
    symbols: &["€", "EUR"],
};

pub const PLAIN: LocaleProfile = LocaleProfile {
    name: "plain",
    decimal: '.',
    thousands: &[','],
    symbols: &[],
};

impl LocaleProfile {
    pub const ALL: [LocaleProfile; 4] = [EN_GB, EN_US, FR_FR, PLAIN];

    pub fn from_name(name: &str) -> Option<LocaleProfile> {
        Self::ALL
            .into_iter()
            .find(|profile| profile.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Parses `raw` into minor units (hundredths).
    pub fn parse_minor_units(&self, raw: &str) -> Result<i64, TransformError> {
        let mut residue = raw.trim().to_string();
        for symbol in self.symbols {
            residue = residue.replace(symbol, "");
        }
        let residue: String = residue
            .chars()
            .filter(|c| !SPACES.contains(c) && !self.thousands.contains(c))
            .collect();

        let (negative, unsigned) = match residue.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, residue.as_str()),
        };
        let (whole, fraction) = match unsigned.split_once(self.decimal) {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty()
            || !all_digits(whole)
            || !all_digits(fraction)
            || fraction.len() > 2
            || (unsigned.contains(self.decimal) && fraction.is_empty())
        {
            return Err(TransformError::numeric(format!(
                "not a {} amount",
                self.name
            )));
        }

        let whole: i64 = whole
            .parse()
            .map_err(|_| TransformError::numeric("amount is too large"))?;
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().unwrap_or(0) * 10,
            _ => fraction.parse::<i64>().unwrap_or(0),
        };
        let minor = whole
            .checked_mul(100)
            .and_then(|m| m.checked_add(cents))
            .ok_or_else(|| TransformError::numeric("amount is too large"))?;
        Ok(if negative { -minor } else { minor })
    }
}

/// Salary transform bound to one source's currency, locale and pay period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryTransformer {
    profile: LocaleProfile,
    currency: String,
    payment_period: u32,
}

impl SalaryTransformer {
    pub fn new(profile: LocaleProfile, currency: impl Into<String>, payment_period: u32) -> Self {
        Self {
            profile,
            currency: currency.into(),
            payment_period: payment_period.max(1),
        }
    }

    /// Annual amount in the source currency.
    pub fn transform(&self, raw: &str) -> Result<Money, TransformError> {
        let minor = self
            .profile
            .parse_minor_units(&strip_code(raw, &self.currency))?;
        let annual = minor
            .checked_mul(i64::from(self.payment_period))
            .ok_or_else(|| TransformError::numeric("annualized amount is too large"))?;
        let money = Money::new(annual, self.currency.clone());
        if money.is_negative() {
            warn!(currency = %self.currency, "negative salary accepted");
        }
        Ok(money)
    }
}

/// Removes every ASCII case-insensitive occurrence of `code`.
fn strip_code(raw: &str, code: &str) -> String {
    if code.is_empty() {
        return raw.to_string();
    }
    // ASCII lowering keeps byte offsets, so matches index into `raw` too.
    let lowered = raw.to_ascii_lowercase();
    let needle = code.to_ascii_lowercase();
    let mut stripped = String::with_capacity(raw.len());
    let mut rest = 0;
    for (start, _) in lowered.match_indices(&needle) {
        stripped.push_str(&raw[rest..start]);
        rest = start + needle.len();
    }
    stripped.push_str(&raw[rest..]);
    stripped
}
