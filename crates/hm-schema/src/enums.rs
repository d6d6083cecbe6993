//! Closed enumerations of the schema.
//!
//! Each enumeration maps one-to-one onto the literals the reconstruction
//! pipeline accepts for the corresponding element. Parsing trims
//! surrounding whitespace and is otherwise exact (case sensitive).

use core::fmt;
use core::str::FromStr;

use crate::value::{SchemaValue, ValueError};

macro_rules! schema_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $literal:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in schema order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            /// Wire literals, in schema order.
            pub const LITERALS: &'static [&'static str] = &[$($literal),+];

            /// Wire literal of the variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $literal,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($literal => Ok($name::$variant),)+
                    other => Err(ValueError::Enumeration {
                        value: other.to_string(),
                        allowed: Self::LITERALS,
                    }),
                }
            }
        }

        impl SchemaValue for $name {
            const XSD_TYPE: &'static str = stringify!($name);

            fn parse_value(text: &str) -> Result<Self, ValueError> {
                text.parse()
            }

            fn format_value(&self) -> String {
                self.as_str().to_string()
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

schema_enum! {
    /// Generic on/off switch used by many processing steps.
    pub enum YesNo {
        Yes => "Yes",
        No => "No",
    }
}

impl YesNo {
    pub const fn is_yes(self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

schema_enum! {
    /// Byte order of headerless raw frames.
    pub enum ByteOrder {
        /// Most significant byte first.
        Msb => "MSB",
        /// Least significant byte first.
        Lsb => "LSB",
    }
}

schema_enum! {
    /// Orientation of the rotation axis in the input images.
    pub enum Orientation {
        Horizontal => "Horizontal",
        Vertical => "Vertical",
    }
}

schema_enum! {
    /// How a flat or dark field is obtained.
    pub enum FieldCorrectionKind {
        /// No correction.
        No => "No",
        /// Constant values supplied by the user (`ValueBefore`/`ValueAfter`).
        User => "User",
        /// Images read from `FileBefore`/`FileAfter`, applied row by row.
        Row => "Row",
    }
}

schema_enum! {
    /// Ring artefact suppression applied to sinograms.
    pub enum RingArtefactRemoval {
        No => "No",
        Column => "Column",
        /// Adaptive multi-level filtering, tuned by `ParameterN`/`ParameterR`.
        Aml => "AML",
    }
}

schema_enum! {
    /// Intensity normalisation of each projection.
    pub enum IntensityNormalisation {
        No => "No",
        /// Normalise against the `ColumnLeft`..`ColumnRight` window.
        Column => "Column",
        /// Normalise against the `ZeroLeft`..`ZeroRight` window.
        Zero => "Zero",
    }
}

schema_enum! {
    /// Replacement strategy for projections listed in `MissedProjections`.
    pub enum MissedProjectionsMode {
        Zero => "Zero",
        Linear => "Linear",
    }
}

schema_enum! {
    /// Rescaling of projections before backprojection.
    pub enum ScaleKind {
        Bin => "Bin",
        Pad => "Pad",
        Width => "Width",
        Height => "Height",
        WidthHeight => "WidthHeight",
    }
}

schema_enum! {
    /// Extrapolation of sinogram edges.
    pub enum Extrapolation {
        Zero => "Zero",
        Constant => "Constant",
        Linear => "Linear",
    }
}

schema_enum! {
    /// Resampling kernel used by transforms and polar to cartesian mapping.
    pub enum Interpolation {
        NearestNeighbour => "NearestNeighbour",
        Bilinear => "Bilinear",
        Bicubic => "Bicubic",
    }
}

schema_enum! {
    /// Shape of the reconstructed region of interest.
    pub enum RoiKind {
        Standard => "Standard",
        Rectangle => "Rectangle",
    }
}

schema_enum! {
    /// Unit of a circular-mask bound (`Circles/ValueMin` and friends).
    pub enum BoundUnit {
        Percent => "Percent",
        Pixel => "Pixel",
    }
}
