//! Text codec shared by every leaf value.

use thiserror::Error;

/// Failure to interpret the text content of a single value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The text is not a valid lexical form of the XSD type.
    #[error("invalid {xsd_type} '{value}': {reason}")]
    Invalid {
        xsd_type: &'static str,
        value: String,
        reason: String,
    },
    /// The text is well formed but not one of the enumerated literals.
    #[error("'{value}' is not one of: {}", .allowed.join(", "))]
    Enumeration {
        value: String,
        allowed: &'static [&'static str],
    },
}

impl ValueError {
    pub(crate) fn invalid(
        xsd_type: &'static str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        ValueError::Invalid {
            xsd_type,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// A value that can be read from and written to element text.
pub trait SchemaValue: Sized {
    /// Name of the XSD type, used in diagnostics.
    const XSD_TYPE: &'static str;

    /// Parse the (already trimmed) element text.
    fn parse_value(text: &str) -> Result<Self, ValueError>;

    /// Render the value as element text.
    fn format_value(&self) -> String;
}

impl SchemaValue for String {
    const XSD_TYPE: &'static str = "xs:string";

    fn parse_value(text: &str) -> Result<Self, ValueError> {
        Ok(text.to_string())
    }

    fn format_value(&self) -> String {
        self.clone()
    }
}

impl SchemaValue for i32 {
    const XSD_TYPE: &'static str = "xs:int";

    fn parse_value(text: &str) -> Result<Self, ValueError> {
        text.trim()
            .parse()
            .map_err(|err| ValueError::invalid(Self::XSD_TYPE, text, format!("{err}")))
    }

    fn format_value(&self) -> String {
        self.to_string()
    }
}

impl SchemaValue for f64 {
    const XSD_TYPE: &'static str = "xs:double";

    fn parse_value(text: &str) -> Result<Self, ValueError> {
        let trimmed = text.trim();
        match trimmed {
            "INF" | "+INF" => return Ok(f64::INFINITY),
            "-INF" => return Ok(f64::NEG_INFINITY),
            "NaN" => return Ok(f64::NAN),
            _ => {}
        }
        // Rust also accepts "inf" and "nan" spellings that xs:double does not.
        if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
            return Err(ValueError::invalid(
                Self::XSD_TYPE,
                text,
                "unexpected character",
            ));
        }
        trimmed
            .parse()
            .map_err(|err| ValueError::invalid(Self::XSD_TYPE, text, format!("{err}")))
    }

    fn format_value(&self) -> String {
        if self.is_nan() {
            "NaN".to_string()
        } else if self.is_infinite() {
            if *self > 0.0 { "INF" } else { "-INF" }.to_string()
        } else {
            format!("{self:?}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_accepts_sign_and_whitespace() {
        assert_eq!(i32::parse_value("+16").unwrap(), 16);
        assert_eq!(i32::parse_value(" -3 ").unwrap(), -3);
        assert!(matches!(
            i32::parse_value("16.5"),
            Err(ValueError::Invalid { xsd_type: "xs:int", .. })
        ));
        assert!(i32::parse_value("").is_err());
    }

    #[test]
    fn double_uses_xsd_special_values() {
        assert_eq!(f64::parse_value("INF").unwrap(), f64::INFINITY);
        assert!(f64::parse_value("NaN").unwrap().is_nan());
        assert!(f64::parse_value("inf").is_err());
        assert_eq!(f64::parse_value("1.5E2").unwrap(), 150.0);
        assert_eq!(1.0f64.format_value(), "1.0");
        assert_eq!(f64::NEG_INFINITY.format_value(), "-INF");
    }

    #[test]
    fn enumeration_error_lists_literals() {
        let err = ValueError::Enumeration {
            value: "Middle".into(),
            allowed: &["MSB", "LSB"],
        };
        assert_eq!(err.to_string(), "'Middle' is not one of: MSB, LSB");
    }
}
