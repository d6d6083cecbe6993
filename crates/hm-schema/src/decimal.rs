//! Text-preserving `xs:decimal`.

use core::fmt;
use core::str::FromStr;

use crate::value::{SchemaValue, ValueError};

/// An `xs:decimal` value that keeps the exact text it was read from.
///
/// Parameter files are edited by hand and by Java tooling; keeping the text
/// means `0.50` is written back as `0.50` rather than whatever a float
/// formatter produces. Use [`Decimal::to_f64`] when a number is needed.
///
/// The exponent form written by Java's `BigDecimal.toString` (`1E-7`) is
/// accepted in addition to the plain decimal lexical space.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(String);

impl Decimal {
    /// Validate `text` and wrap it.
    pub fn new(text: impl Into<String>) -> Result<Self, ValueError> {
        let text = text.into();
        let trimmed = text.trim();
        check_lexical(trimmed)
            .map_err(|reason| ValueError::invalid(Self::XSD_TYPE, trimmed, reason))?;
        if trimmed.len() == text.len() {
            Ok(Decimal(text))
        } else {
            Ok(Decimal(trimmed.to_string()))
        }
    }

    /// Render a finite float. Returns `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then(|| Decimal(format!("{value}")))
    }

    /// The text exactly as it appears in the document.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the decimal.
    pub fn to_f64(&self) -> f64 {
        self.0.parse().unwrap_or(f64::NAN)
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Decimal(value.to_string())
    }
}

impl FromStr for Decimal {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::new(s)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl SchemaValue for Decimal {
    const XSD_TYPE: &'static str = "xs:decimal";

    fn parse_value(text: &str) -> Result<Self, ValueError> {
        Decimal::new(text)
    }

    fn format_value(&self) -> String {
        self.0.clone()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Decimal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Decimal {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Decimal::new(text).map_err(serde::de::Error::custom)
    }
}

fn check_lexical(text: &str) -> Result<(), &'static str> {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (body, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int.is_empty() && frac.is_empty() {
        return Err("no digits");
    }
    if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return Err("unexpected character");
    }
    if let Some(exp) = exponent {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err("malformed exponent");
        }
    }
    Ok(())
}
