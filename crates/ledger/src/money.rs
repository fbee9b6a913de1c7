use std::{fmt, iter::Sum, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};

use crate::ParseAmountError;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for every monetary value in the ledger (income, expense
/// totals, summary figures) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use ledger::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rounds
/// to the nearest cent, halves away from zero):
///
/// ```rust
/// use ledger::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert_eq!(".5".parse::<MoneyCents>().unwrap().cents(), 50);
/// assert_eq!("12.345".parse::<MoneyCents>().unwrap().cents(), 1235);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Saturating addition, used for figures derived from loaded snapshots.
    #[must_use]
    pub fn saturating_add(self, rhs: MoneyCents) -> MoneyCents {
        MoneyCents(self.0.saturating_add(rhs.0))
    }

    #[must_use]
    pub fn saturating_sub(self, rhs: MoneyCents) -> MoneyCents {
        MoneyCents(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl<'a> Sum<&'a MoneyCents> for MoneyCents {
    fn sum<I: Iterator<Item = &'a MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, |acc, value| acc.saturating_add(*value))
    }
}

impl FromStr for MoneyCents {
    type Err = ParseAmountError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// Either side of the separator may be empty (`.5`, `5.`), not both.
    /// Digits past the cents are rounded, halves away from zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cents(&s.replace(',', "."), false).map(MoneyCents)
    }
}

/// Exact decimal to cents conversion shared by user input and snapshot
/// numbers. `exponent` enables the `e`/`E` suffix of JSON numbers.
fn parse_cents(s: &str, exponent: bool) -> Result<i64, ParseAmountError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let (mantissa, exp) = match rest.find(['e', 'E']) {
        Some(at) if exponent => (&rest[..at], parse_exponent(&rest[at + 1..])?),
        _ => (rest, 0),
    };
    let (units_str, frac_str) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    if units_str.is_empty() && frac_str.is_empty() {
        return Err(ParseAmountError::Invalid);
    }
    if !units_str.bytes().chain(frac_str.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(ParseAmountError::Invalid);
    }

    let digits: Vec<i64> = units_str
        .bytes()
        .chain(frac_str.bytes())
        .map(|b| i64::from(b - b'0'))
        .collect();
    // Number of leading digits that make up whole cents.
    let shift = units_str.len() as i64 + exp + 2;

    let leading_zeros = digits.iter().take_while(|d| **d == 0).count();
    if leading_zeros == digits.len() {
        return Ok(0);
    }
    if shift - leading_zeros as i64 > 19 {
        return Err(ParseAmountError::TooLarge);
    }

    let mut cents: i64 = 0;
    for i in 0..shift.max(0) {
        let digit = digits.get(i as usize).copied().unwrap_or(0);
        cents = cents
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or(ParseAmountError::TooLarge)?;
    }
    let next = if shift >= 0 {
        digits.get(shift as usize).copied().unwrap_or(0)
    } else {
        0
    };
    if next >= 5 {
        cents = cents.checked_add(1).ok_or(ParseAmountError::TooLarge)?;
    }

    Ok(if negative { -cents } else { cents })
}

/// Exponent digits, clamped far past the point where any amount is either
/// zero or too large.
fn parse_exponent(s: &str) -> Result<i64, ParseAmountError> {
    const LIMIT: i64 = 1_000_000;

    let (negative, digits) = if let Some(stripped) = s.strip_prefix('-') {
        (true, stripped)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseAmountError::Invalid);
    }

    let value = digits.bytes().fold(0i64, |acc, b| {
        (acc * 10 + i64::from(b - b'0')).min(LIMIT)
    });
    Ok(if negative { -value } else { value })
}

impl Serialize for MoneyCents {
    /// Written as an exact decimal number in major units (`1500.00`).
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let number = serde_json::Number::from_str(&self.to_string()).map_err(ser::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MoneyCents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = serde_json::Number::deserialize(deserializer)?;
        let text = number.to_string();
        parse_cents(&text, true)
            .map(MoneyCents)
            .map_err(|err| de::Error::custom(format!("{err}: {text}")))
    }
}
