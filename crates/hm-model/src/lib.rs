//! HMxml reconstruction parameters: typed records mapped onto the `hm.xsd`
//! wire format.
//!
//! ```
//! use hm_model::{DocumentRoot, ParseOptions};
//!
//! let xml = "<HMxml><FBP><OutputData><Bits>16</Bits></OutputData></FBP></HMxml>";
//! let parsed = DocumentRoot::from_xml(xml, &ParseOptions::default()).unwrap();
//! let output = parsed.document.fbp().and_then(|fbp| fbp.output_data.as_ref()).unwrap();
//! assert_eq!(output.bits, Some(16));
//! assert_eq!(output.suffix, None);
//! ```

pub mod codec;
mod leaf;

mod backprojection;
mod correction;
mod document;
mod input;
mod output;
mod preprocessing;
mod transform;

pub mod path;
pub mod validate;

pub use hm_schema as schema;
pub use hm_xml;

use hm_schema::ValueError;
use hm_xml::{Position, XmlError};
use thiserror::Error;

pub use backprojection::{
    Backprojection, CircleBound, Circles, CoordinateSystem, Filter, Roi, Tilt,
};
pub use codec::{DecodeContext, Shape, XmlNode};
pub use correction::{FieldCorrection, FlatDarkFields};
pub use document::{BeamlineUser, DocumentRoot, Fbp, HmXml, Namespaces, Parsed};
pub use input::{InputData, Raw};
pub use leaf::{Annotated, Marked, Tracked};
pub use output::OutputData;
pub use path::ParamPath;
pub use preprocessing::{HighPeaks, Intensity, Preprocessing, RingArtefacts};
pub use transform::Transform;
pub use validate::Issue;

/// Error type produced while mapping documents onto the model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The document is not well-formed XML.
    #[error(transparent)]
    Xml(#[from] XmlError),
    /// The root element is not `HMxml`.
    #[error("expected root element <{expected}>, found <{found}> ({position})")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
        position: Position,
    },
    /// A schema deviation rejected under [`Strictness::Strict`].
    #[error(transparent)]
    Schema(#[from] Diagnostic),
    /// Element text that is not a valid value of its type, including values
    /// outside a closed enumeration.
    #[error("<{element}> ({position}): {source}")]
    Value {
        element: String,
        position: Position,
        #[source]
        source: ValueError,
    },
    /// A parameter path that cannot be resolved or edited.
    #[error("path '{path}': {reason}")]
    Path { path: String, reason: String },
}

impl ModelError {
    /// Whether this is a closed-enumeration violation.
    pub fn is_enumeration(&self) -> bool {
        matches!(
            self,
            ModelError::Value {
                source: ValueError::Enumeration { .. },
                ..
            }
        )
    }

    pub(crate) fn path(path: &str, reason: impl Into<String>) -> Self {
        ModelError::Path {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// A deviation from the schema that does not prevent building the model.
///
/// Reported as a warning under [`Strictness::Lenient`] and as
/// [`ModelError::Schema`] under [`Strictness::Strict`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("unknown element <{name}> in <{parent}> ({position})")]
    UnknownElement {
        parent: String,
        name: String,
        position: Position,
    },
    #[error("unknown attribute '{name}' on <{element}> ({position})")]
    UnknownAttribute {
        element: String,
        name: String,
        position: Position,
    },
    #[error("unexpected text in <{element}> ({position})")]
    UnexpectedText { element: String, position: Position },
    #[error("duplicate element <{name}> ({position}), keeping the last one")]
    DuplicateElement { name: String, position: Position },
    #[error("missing attribute '{name}' on <{element}> ({position})")]
    MissingAttribute {
        element: String,
        name: &'static str,
        position: Position,
    },
}

/// How schema deviations are handled while decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Log and collect deviations, keep decoding.
    #[default]
    Lenient,
    /// Fail on the first deviation.
    Strict,
}

/// Decoding configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub strictness: Strictness,
    /// Report enumerated leaves without their `info` attribute.
    pub require_info: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            strictness: Strictness::Lenient,
            require_info: true,
        }
    }
}

impl ParseOptions {
    pub fn strict() -> Self {
        ParseOptions::default().with_strictness(Strictness::Strict)
    }

    pub fn lenient() -> Self {
        ParseOptions::default()
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn require_info(mut self, require: bool) -> Self {
        self.require_info = require;
        self
    }
}
