#![cfg_attr(docsrs, feature(doc_cfg))]
//! Leaf value types of the HMxml reconstruction-parameter schema.
//!
//! Every simple value carried by an HMxml document is one of:
//! a string, an `xs:int` ([`i32`]), an `xs:double` ([`f64`]), an
//! `xs:decimal` ([`Decimal`]) or one of the closed enumerations in
//! [`enums`]. All of them implement [`SchemaValue`], the text codec used by
//! the XML mapping layer.

mod decimal;
pub mod enums;
pub mod names;
mod value;

pub use decimal::Decimal;
pub use enums::{
    BoundUnit, ByteOrder, Extrapolation, FieldCorrectionKind, IntensityNormalisation,
    Interpolation, MissedProjectionsMode, Orientation, RingArtefactRemoval, RoiKind, ScaleKind,
    YesNo,
};
pub use value::{SchemaValue, ValueError};
