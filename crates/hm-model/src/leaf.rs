//! Simple-content leaves carrying `info` and `done` attributes.

use hm_schema::names::{ATTR_DONE as DONE, ATTR_INFO as INFO};
use hm_schema::SchemaValue;
use hm_xml::Element;

use crate::codec::{DecodeContext, Shape, XmlNode};
use crate::ModelError;

/// A value with the free-text `info` annotation the schema requires on
/// enumerated and typed leaves.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "V: serde::Deserialize<'de>"))
)]
pub struct Annotated<V> {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub value: Option<V>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub info: Option<String>,
}

/// A value with the `done` marker set by acquisition software.
///
/// `done` is opaque: any present string means the step completed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "V: serde::Deserialize<'de>"))
)]
pub struct Marked<V> {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub value: Option<V>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub done: Option<String>,
}

/// A value carrying both `done` and `info`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "V: serde::Deserialize<'de>"))
)]
pub struct Tracked<V> {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub value: Option<V>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub done: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub info: Option<String>,
}

impl<V> Default for Annotated<V> {
    fn default() -> Self {
        Annotated {
            value: None,
            info: None,
        }
    }
}

impl<V> Default for Marked<V> {
    fn default() -> Self {
        Marked {
            value: None,
            done: None,
        }
    }
}

impl<V> Default for Tracked<V> {
    fn default() -> Self {
        Tracked {
            value: None,
            done: None,
            info: None,
        }
    }
}

impl<V> Annotated<V> {
    pub fn new(value: V) -> Self {
        Annotated {
            value: Some(value),
            info: None,
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }
}

impl<V> Marked<V> {
    pub fn new(value: V) -> Self {
        Marked {
            value: Some(value),
            done: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done.is_some()
    }
}

impl<V> Tracked<V> {
    pub fn new(value: V) -> Self {
        Tracked {
            value: Some(value),
            done: None,
            info: None,
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn is_done(&self) -> bool {
        self.done.is_some()
    }
}

impl<V: Clone + Default> Annotated<V> {
    /// The value, or the type's default when unset.
    pub fn value_or_default(&self) -> V {
        self.value.clone().unwrap_or_default()
    }
}

impl<V: Clone + Default> Marked<V> {
    pub fn value_or_default(&self) -> V {
        self.value.clone().unwrap_or_default()
    }
}

impl<V: Clone + Default> Tracked<V> {
    pub fn value_or_default(&self) -> V {
        self.value.clone().unwrap_or_default()
    }
}

/// Attribute slots of one wrapper, filled while scanning the element.
struct Slots<'s> {
    info: Option<&'s mut Option<String>>,
    done: Option<&'s mut Option<String>>,
}

fn decode_leaf<V: SchemaValue>(
    element: &Element,
    ctx: &mut DecodeContext<'_>,
    mut slots: Slots<'_>,
) -> Result<Option<V>, ModelError> {
    for attr in &element.attributes {
        let slot = match attr.name.as_str() {
            INFO => slots.info.as_deref_mut(),
            DONE => slots.done.as_deref_mut(),
            _ => None,
        };
        match slot {
            Some(slot) => *slot = Some(attr.value.clone()),
            None => ctx.unknown_attribute(element, &attr.name)?,
        }
    }
    if matches!(slots.info.as_deref(), Some(None)) {
        ctx.missing_attribute(element, INFO)?;
    }
    ctx.reject_children(element)?;
    ctx.optional_value(element)
}

fn encode_leaf<V: SchemaValue>(
    name: &str,
    value: Option<&V>,
    done: Option<&String>,
    info: Option<&String>,
) -> Element {
    let mut element = Element::new(name);
    if let Some(done) = done {
        element.set_attribute(DONE, done.clone());
    }
    if let Some(info) = info {
        element.set_attribute(INFO, info.clone());
    }
    element.text = value.map(SchemaValue::format_value);
    element
}

impl<V: SchemaValue> XmlNode for Annotated<V> {
    fn decode(element: &Element, ctx: &mut DecodeContext<'_>) -> Result<Self, ModelError> {
        let mut info = None;
        let value = decode_leaf(
            element,
            ctx,
            Slots {
                info: Some(&mut info),
                done: None,
            },
        )?;
        Ok(Annotated { value, info })
    }

    fn encode(&self, name: &str) -> Element {
        encode_leaf(name, self.value.as_ref(), None, self.info.as_ref())
    }

    fn shape(path: &[&str]) -> Option<Shape> {
        path.is_empty().then_some(Shape {
            attributes: &[INFO],
            is_leaf: true,
        })
    }
}

impl<V: SchemaValue> XmlNode for Marked<V> {
    fn decode(element: &Element, ctx: &mut DecodeContext<'_>) -> Result<Self, ModelError> {
        let mut done = None;
        let value = decode_leaf(
            element,
            ctx,
            Slots {
                info: None,
                done: Some(&mut done),
            },
        )?;
        Ok(Marked { value, done })
    }

    fn encode(&self, name: &str) -> Element {
        encode_leaf(name, self.value.as_ref(), self.done.as_ref(), None)
    }

    fn shape(path: &[&str]) -> Option<Shape> {
        path.is_empty().then_some(Shape {
            attributes: &[DONE],
            is_leaf: true,
        })
    }
}

impl<V: SchemaValue> XmlNode for Tracked<V> {
    fn decode(element: &Element, ctx: &mut DecodeContext<'_>) -> Result<Self, ModelError> {
        let mut done = None;
        let mut info = None;
        let value = decode_leaf(
            element,
            ctx,
            Slots {
                info: Some(&mut info),
                done: Some(&mut done),
            },
        )?;
        Ok(Tracked { value, done, info })
    }

    fn encode(&self, name: &str) -> Element {
        encode_leaf(
            name,
            self.value.as_ref(),
            self.done.as_ref(),
            self.info.as_ref(),
        )
    }

    fn shape(path: &[&str]) -> Option<Shape> {
        path.is_empty().then_some(Shape {
            attributes: &[DONE, INFO],
            is_leaf: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Diagnostic, ParseOptions};
    use hm_schema::ByteOrder;
    use hm_xml::parse_document;

    fn decode<T: XmlNode>(xml: &str, options: &ParseOptions) -> Result<T, ModelError> {
        let element = parse_document(xml)?;
        T::decode(&element, &mut DecodeContext::new(options))
    }

    #[test]
    fn annotated_enum_reads_value_and_info() {
        let leaf: Annotated<ByteOrder> = decode(
            "<ByteOrder info=\"MSB or LSB\"> LSB </ByteOrder>",
            &ParseOptions::strict(),
        )
        .unwrap();
        assert_eq!(leaf.value, Some(ByteOrder::Lsb));
        assert_eq!(leaf.info.as_deref(), Some("MSB or LSB"));
    }

    #[test]
    fn enumeration_violation_is_rejected() {
        let err = decode::<Annotated<ByteOrder>>(
            "<ByteOrder info=\"\">Middle</ByteOrder>",
            &ParseOptions::lenient(),
        )
        .unwrap_err();
        assert!(err.is_enumeration());
        let message = err.to_string();
        assert!(message.contains("Middle"), "{message}");
        assert!(message.contains("MSB, LSB"), "{message}");
    }

    #[test]
    fn empty_content_is_an_absent_value() {
        let leaf: Tracked<i32> =
            decode("<Shape done=\"1\" info=\"n\"/>", &ParseOptions::strict()).unwrap();
        assert_eq!(leaf.value, None);
        assert_eq!(leaf.value_or_default(), 0);
        assert!(leaf.is_done());
        let element = leaf.encode("Shape");
        assert!(element.text.is_none());
        assert_eq!(element.attribute("done"), Some("1"));
    }

    #[test]
    fn missing_info_follows_strictness() {
        let err = decode::<Annotated<i32>>("<NOD>3</NOD>", &ParseOptions::strict()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Schema(Diagnostic::MissingAttribute { name: "info", .. })
        ));

        let relaxed = ParseOptions::strict().require_info(false);
        let leaf: Annotated<i32> = decode("<NOD>3</NOD>", &relaxed).unwrap();
        assert_eq!(leaf.value, Some(3));

        let leaf: Marked<i32> = decode("<ImageStep>2</ImageStep>", &ParseOptions::strict()).unwrap();
        assert_eq!(leaf.value, Some(2));
    }

    #[test]
    fn marked_rejects_info() {
        let err = decode::<Marked<i32>>("<ImageFirst info=\"x\">0</ImageFirst>", &ParseOptions::strict())
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::Schema(Diagnostic::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn encode_writes_attributes_then_text() {
        let leaf = Annotated::new(ByteOrder::Msb).with_info("MSB or LSB");
        let element = leaf.encode("ByteOrder");
        assert_eq!(element.text(), "MSB");
        assert_eq!(element.attribute("info"), Some("MSB or LSB"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn wrappers_deserialize_values_without_default() {
        use hm_schema::{Decimal, YesNo};

        let annotated: Annotated<YesNo> =
            serde_json::from_str(r#"{"value":"Yes","info":"Yes or No"}"#).unwrap();
        assert_eq!(annotated.value, Some(YesNo::Yes));
        assert_eq!(annotated.info.as_deref(), Some("Yes or No"));

        let tracked: Tracked<ByteOrder> = serde_json::from_str(r#"{"done":"true"}"#).unwrap();
        assert_eq!(tracked.value, None);
        assert!(tracked.is_done());

        let marked: Marked<Decimal> = serde_json::from_str(r#"{"value":"1.50"}"#).unwrap();
        assert_eq!(marked.value.as_ref().map(Decimal::as_str), Some("1.50"));
    }
}
