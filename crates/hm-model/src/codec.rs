//! Mapping between [`Element`] trees and typed records.
//!
//! Every record, leaf wrapper and scalar implements [`XmlNode`]. Decoding is
//! order-insensitive and goes through a [`DecodeContext`], which applies the
//! configured [`Strictness`] to schema deviations. Encoding always writes
//! children in schema order.

use hm_schema::{Decimal, SchemaValue};
use hm_xml::Element;
use tracing::warn;

use crate::{Diagnostic, ModelError, ParseOptions, Strictness};

/// Schema facts about a resolved element path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Attributes the element may carry.
    pub attributes: &'static [&'static str],
    /// Whether the element holds a value rather than child elements.
    pub is_leaf: bool,
}

/// A type with an XML element representation.
pub trait XmlNode: Sized {
    /// Build the value from `element`, reporting deviations to `ctx`.
    fn decode(element: &Element, ctx: &mut DecodeContext<'_>) -> Result<Self, ModelError>;

    /// Render the value as an element called `name`.
    fn encode(&self, name: &str) -> Element;

    /// Resolve `path` (child element names below this node) against the
    /// schema. An empty path describes the node itself.
    fn shape(path: &[&str]) -> Option<Shape>;
}

/// Decoding state: options plus the diagnostics collected so far.
#[derive(Debug)]
pub struct DecodeContext<'a> {
    options: &'a ParseOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> DecodeContext<'a> {
    pub fn new(options: &'a ParseOptions) -> Self {
        DecodeContext {
            options,
            diagnostics: Vec::new(),
        }
    }

    pub fn options(&self) -> &ParseOptions {
        self.options
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Record a deviation, or fail with it in strict mode.
    pub fn report(&mut self, diagnostic: Diagnostic) -> Result<(), ModelError> {
        match self.options.strictness {
            Strictness::Strict => Err(ModelError::Schema(diagnostic)),
            Strictness::Lenient => {
                warn!(%diagnostic, "schema deviation");
                self.diagnostics.push(diagnostic);
                Ok(())
            }
        }
    }

    pub fn unknown_element(&mut self, parent: &Element, child: &Element) -> Result<(), ModelError> {
        self.report(Diagnostic::UnknownElement {
            parent: parent.name.clone(),
            name: child.name.clone(),
            position: child.position,
        })
    }

    /// Namespace declarations and `xsi:*` attributes are accepted anywhere.
    pub fn unknown_attribute(&mut self, element: &Element, name: &str) -> Result<(), ModelError> {
        if name == "xmlns" || name.starts_with("xmlns:") || name.starts_with("xsi:") {
            return Ok(());
        }
        self.report(Diagnostic::UnknownAttribute {
            element: element.name.clone(),
            name: name.to_string(),
            position: element.position,
        })
    }

    pub fn missing_attribute(
        &mut self,
        element: &Element,
        name: &'static str,
    ) -> Result<(), ModelError> {
        if !self.options.require_info {
            return Ok(());
        }
        self.report(Diagnostic::MissingAttribute {
            element: element.name.clone(),
            name,
            position: element.position,
        })
    }

    /// Reject text content on a group element.
    pub fn reject_text(&mut self, element: &Element) -> Result<(), ModelError> {
        if element.has_text() {
            self.report(Diagnostic::UnexpectedText {
                element: element.name.clone(),
                position: element.position,
            })?;
        }
        Ok(())
    }

    /// Reject child elements on a leaf element.
    pub fn reject_children(&mut self, element: &Element) -> Result<(), ModelError> {
        for child in &element.children {
            self.unknown_element(element, child)?;
        }
        Ok(())
    }

    /// Decode `child` into `slot`. A second occurrence replaces the first.
    pub fn decode_child<T: XmlNode>(
        &mut self,
        child: &Element,
        slot: &mut Option<T>,
    ) -> Result<(), ModelError> {
        if slot.is_some() {
            self.report(Diagnostic::DuplicateElement {
                name: child.name.clone(),
                position: child.position,
            })?;
        }
        *slot = Some(T::decode(child, self)?);
        Ok(())
    }

    /// Parse the element text, which may be empty.
    pub fn value<V: SchemaValue>(&self, element: &Element) -> Result<V, ModelError> {
        V::parse_value(element.text().trim()).map_err(|source| ModelError::Value {
            element: element.name.clone(),
            position: element.position,
            source,
        })
    }

    /// Parse the element text, mapping empty content to `None`.
    pub fn optional_value<V: SchemaValue>(
        &self,
        element: &Element,
    ) -> Result<Option<V>, ModelError> {
        if element.has_text() {
            self.value(element).map(Some)
        } else {
            Ok(None)
        }
    }
}

macro_rules! scalar_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl XmlNode for $ty {
                fn decode(element: &Element, ctx: &mut DecodeContext<'_>) -> Result<Self, ModelError> {
                    for attr in &element.attributes {
                        ctx.unknown_attribute(element, &attr.name)?;
                    }
                    ctx.reject_children(element)?;
                    ctx.value(element)
                }

                fn encode(&self, name: &str) -> Element {
                    Element::new(name).with_text(self.format_value())
                }

                fn shape(path: &[&str]) -> Option<Shape> {
                    path.is_empty().then_some(Shape {
                        attributes: &[],
                        is_leaf: true,
                    })
                }
            }
        )*
    };
}

scalar_node!(String, i32, f64, Decimal);

/// Declare a composite record and its element mapping.
///
/// Attributes are listed first as `@"name" => field,`, then child elements
/// as `"Name" => field: Type,` in schema sequence order. Every field is
/// optional and presence follows the document exactly.
macro_rules! record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( @$attr:literal => $attr_field:ident, )*
            $( $(#[$field_meta:meta])* $tag:literal => $field:ident : $ty:ty, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            $(
                #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
                pub $attr_field: Option<String>,
            )*
            $(
                $(#[$field_meta])*
                #[cfg_attr(
                    feature = "serde",
                    serde(default, skip_serializing_if = "Option::is_none", rename = $tag)
                )]
                pub $field: Option<$ty>,
            )*
        }

        impl $crate::codec::XmlNode for $name {
            fn decode(
                element: &hm_xml::Element,
                ctx: &mut $crate::codec::DecodeContext<'_>,
            ) -> Result<Self, $crate::ModelError> {
                let mut record = Self::default();
                for attr in &element.attributes {
                    match attr.name.as_str() {
                        $( $attr => record.$attr_field = Some(attr.value.clone()), )*
                        other => ctx.unknown_attribute(element, other)?,
                    }
                }
                ctx.reject_text(element)?;
                for child in &element.children {
                    match child.local_name() {
                        $( $tag => ctx.decode_child(child, &mut record.$field)?, )*
                        _ => ctx.unknown_element(element, child)?,
                    }
                }
                Ok(record)
            }

            fn encode(&self, name: &str) -> hm_xml::Element {
                #[allow(unused_mut)]
                let mut element = hm_xml::Element::new(name);
                $(
                    if let Some(value) = &self.$attr_field {
                        element.set_attribute($attr, value.clone());
                    }
                )*
                $(
                    if let Some(value) = &self.$field {
                        element.push_child($crate::codec::XmlNode::encode(value, $tag));
                    }
                )*
                element
            }

            fn shape(path: &[&str]) -> Option<$crate::codec::Shape> {
                match path.split_first() {
                    None => Some($crate::codec::Shape {
                        attributes: &[$($attr),*],
                        is_leaf: false,
                    }),
                    $( Some((&$tag, rest)) => <$ty as $crate::codec::XmlNode>::shape(rest), )*
                    Some(_) => None,
                }
            }
        }
    };
}

pub(crate) use record;
