//! Field access by parameter path.
//!
//! A path names elements below `HMxml`, separated by `/`, with an optional
//! `@attribute` suffix: `FBP/InputData/Raw/ByteOrder@info`. A leading
//! `HMxml/` is accepted. Paths are resolved against the schema, so a typo is
//! an error rather than an absent value.
//!
//! Edits go through the element tree: the document is encoded, edited and
//! decoded again in strict mode. A rejected edit leaves the document as it
//! was.

use hm_schema::names::ROOT;
use hm_xml::Element;
use tracing::debug;

use crate::codec::{DecodeContext, Shape, XmlNode};
use crate::{DocumentRoot, HmXml, ModelError, ParseOptions};

/// A parsed and schema-checked parameter path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamPath<'a> {
    pub elements: Vec<&'a str>,
    pub attribute: Option<&'a str>,
    pub shape: Shape,
}

impl<'a> ParamPath<'a> {
    pub fn parse(path: &'a str) -> Result<Self, ModelError> {
        let trimmed = path.trim().trim_start_matches('/');
        let trimmed = if trimmed == ROOT {
            ""
        } else {
            trimmed
                .strip_prefix(ROOT)
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(trimmed)
        };
        let (element_path, attribute) = match trimmed.split_once('@') {
            Some((elements, attribute)) => (elements, Some(attribute)),
            None => (trimmed, None),
        };
        if element_path.is_empty() {
            return Err(ModelError::path(path, "no element named"));
        }
        let elements: Vec<&str> = element_path.split('/').collect();
        if elements.iter().any(|segment| segment.is_empty()) {
            return Err(ModelError::path(path, "empty path segment"));
        }
        let shape = HmXml::shape(&elements)
            .ok_or_else(|| ModelError::path(path, "no such element in the schema"))?;
        if let Some(attribute) = attribute {
            if !shape.attributes.contains(&attribute) {
                return Err(ModelError::path(
                    path,
                    format!("<{}> has no attribute '{attribute}'", element_path),
                ));
            }
        }
        Ok(ParamPath {
            elements,
            attribute,
            shape,
        })
    }

    fn find<'e>(&self, root: &'e Element) -> Option<&'e Element> {
        self.elements
            .iter()
            .try_fold(root, |element, name| element.child(name))
    }
}

fn edit_options() -> ParseOptions {
    ParseOptions::strict().require_info(false)
}

impl DocumentRoot {
    /// Text of the leaf or attribute at `path`, `None` when absent.
    pub fn get(&self, path: &str) -> Result<Option<String>, ModelError> {
        let param = ParamPath::parse(path)?;
        if param.attribute.is_none() && !param.shape.is_leaf {
            return Err(ModelError::path(path, "names a group, not a value"));
        }
        let tree = self.hm_xml.encode(ROOT);
        let Some(element) = param.find(&tree) else {
            return Ok(None);
        };
        Ok(match param.attribute {
            Some(attribute) => element.attribute(attribute).map(str::to_string),
            None => element.text.clone(),
        })
    }

    /// Set the leaf or attribute at `path`, creating missing groups.
    pub fn set(&mut self, path: &str, value: &str) -> Result<(), ModelError> {
        let param = ParamPath::parse(path)?;
        if param.attribute.is_none() && !param.shape.is_leaf {
            return Err(ModelError::path(path, "names a group, not a value"));
        }
        let mut tree = self.hm_xml.encode(ROOT);
        let element = param
            .elements
            .iter()
            .fold(&mut tree, |element, name| ensure_child(element, name));
        match param.attribute {
            Some(attribute) => element.set_attribute(attribute, value),
            None => element.text = Some(value.to_string()),
        }
        self.replace_tree(&tree)?;
        debug!(path, value, "set parameter");
        Ok(())
    }

    /// Remove the element or attribute at `path`. Returns whether anything
    /// was present.
    pub fn unset(&mut self, path: &str) -> Result<bool, ModelError> {
        let param = ParamPath::parse(path)?;
        let mut tree = self.hm_xml.encode(ROOT);
        let removed = match param.elements.split_last() {
            Some((last, parents)) => {
                let mut current = Some(&mut tree);
                for name in parents {
                    current = current.and_then(|element| element.child_mut(name));
                }
                match (current, param.attribute) {
                    (Some(parent), None) => parent.remove_child(last).is_some(),
                    (Some(parent), Some(attribute)) => parent
                        .child_mut(last)
                        .and_then(|element| element.remove_attribute(attribute))
                        .is_some(),
                    (None, _) => false,
                }
            }
            None => false,
        };
        if removed {
            self.replace_tree(&tree)?;
            debug!(path, "unset parameter");
        }
        Ok(removed)
    }

    /// Every present value and attribute as `(path, text)` pairs, in
    /// document order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let tree = self.hm_xml.encode(ROOT);
        let mut entries = Vec::new();
        for child in &tree.children {
            collect_entries(child, &child.name, &mut entries);
        }
        entries
    }

    fn replace_tree(&mut self, tree: &Element) -> Result<(), ModelError> {
        let options = edit_options();
        let mut ctx = DecodeContext::new(&options);
        self.hm_xml = HmXml::decode(tree, &mut ctx)?;
        Ok(())
    }
}

fn ensure_child<'e>(element: &'e mut Element, name: &str) -> &'e mut Element {
    let idx = match element.children.iter().position(|child| child.local_name() == name) {
        Some(idx) => idx,
        None => {
            element.push_child(Element::new(name));
            element.children.len() - 1
        }
    };
    &mut element.children[idx]
}

fn collect_entries(element: &Element, path: &str, entries: &mut Vec<(String, String)>) {
    for attr in &element.attributes {
        entries.push((format!("{path}@{}", attr.name), attr.value.clone()));
    }
    if element.children.is_empty() {
        if let Some(text) = &element.text {
            entries.push((path.to_string(), text.clone()));
        }
    }
    for child in &element.children {
        collect_entries(child, &format!("{path}/{}", child.name), entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hm_schema::names;
    use hm_schema::ByteOrder;

    const SETTINGS: &str = include_str!("../fixtures/settings.xml");

    fn settings() -> DocumentRoot {
        DocumentRoot::from_xml(SETTINGS, &ParseOptions::strict())
            .unwrap()
            .document
    }

    #[test]
    fn parse_accepts_root_prefix_and_attributes() {
        let param = ParamPath::parse("/HMxml/FBP/InputData/Raw/ByteOrder@info").unwrap();
        assert_eq!(param.elements, ["FBP", "InputData", "Raw", "ByteOrder"]);
        assert_eq!(param.attribute, Some("info"));
        assert!(param.shape.is_leaf);

        assert!(ParamPath::parse("FBP/Backprojection/Tilt/X-tilt").is_ok());
        assert!(ParamPath::parse("FBP/Backprojection/Circles@comm").is_ok());
        assert!(!ParamPath::parse(names::FBP).unwrap().shape.is_leaf);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        for bad in [
            "",
            "HMxml",
            "FBP//LogFile",
            "FBP/Nope",
            "FBP/LogFile/Deeper",
            "FBP/LogFile@info",
        ] {
            let err = ParamPath::parse(bad).unwrap_err();
            assert!(matches!(err, ModelError::Path { .. }), "{bad}: {err:?}");
        }
    }

    #[test]
    fn get_reads_values_and_attributes() {
        let doc = settings();
        assert_eq!(doc.get(names::IMAGE_CENTRE).unwrap().as_deref(), Some("1024.50"));
        assert_eq!(
            doc.get("FBP/InputData/Raw/ByteOrder@info").unwrap().as_deref(),
            Some("MSB or LSB")
        );
        assert_eq!(doc.get("FBP/InputData/Suffix").unwrap().as_deref(), Some(""));
        assert_eq!(doc.get("FBP/Transform/RotationAngle").unwrap().as_deref(), Some("0"));
        assert!(DocumentRoot::default().get(names::OUTPUT_BITS).unwrap().is_none());
        assert!(doc.get("FBP/InputData").is_err());
    }

    #[test]
    fn set_creates_missing_groups() {
        let mut doc = DocumentRoot::default();
        doc.set("FBP/InputData/Raw/ByteOrder", "MSB").unwrap();
        doc.set("FBP/InputData/Raw/ByteOrder@info", "MSB or LSB").unwrap();
        doc.set(names::GPU_DEVICE_NUMBER, "1").unwrap();

        let fbp = doc.fbp().unwrap();
        assert_eq!(fbp.gpu_device_number, Some(1));
        let order = fbp
            .input_data
            .as_ref()
            .and_then(|input| input.raw.as_ref())
            .and_then(|raw| raw.byte_order.as_ref())
            .unwrap();
        assert_eq!(order.value, Some(ByteOrder::Msb));
        assert_eq!(order.info.as_deref(), Some("MSB or LSB"));
    }

    #[test]
    fn rejected_set_leaves_document_unchanged() {
        let mut doc = settings();
        let before = doc.clone();
        let err = doc.set("FBP/InputData/Raw/ByteOrder", "BIG").unwrap_err();
        assert!(err.is_enumeration());
        assert!(doc.set(names::OUTPUT_BITS, "sixteen").is_err());
        assert!(doc.set("FBP/InputData/Raw/Colour", "red").is_err());
        assert_eq!(doc, before);
    }

    #[test]
    fn unset_makes_fields_absent() {
        let mut doc = settings();
        assert!(doc.unset(names::OUTPUT_BITS).unwrap());
        assert!(doc.fbp().unwrap().output_data.as_ref().unwrap().bits.is_none());
        assert!(!doc.unset(names::OUTPUT_BITS).unwrap());

        assert!(doc.unset("FBP/Backprojection/Circles@comm").unwrap());
        assert!(doc.get("FBP/Backprojection/Circles@comm").unwrap().is_none());

        assert!(doc.unset("FBP/Backprojection").unwrap());
        assert!(doc.fbp().unwrap().backprojection.is_none());
    }

    #[test]
    fn entries_list_present_leaves() {
        let mut doc = DocumentRoot::default();
        doc.set("FBP/Backprojection/Tilt@done", "true").unwrap();
        doc.set("FBP/Backprojection/Tilt/X-tilt", "0.5").unwrap();
        doc.set(names::LOG_FILE, "/tmp/log.xml").unwrap();
        assert_eq!(
            doc.entries(),
            [
                ("FBP/LogFile".to_string(), "/tmp/log.xml".to_string()),
                ("FBP/Backprojection/Tilt@done".to_string(), "true".to_string()),
                ("FBP/Backprojection/Tilt/X-tilt".to_string(), "0.5".to_string()),
            ]
        );
    }

    #[test]
    fn every_entry_of_the_fixture_reads_back() {
        let doc = settings();
        let entries = doc.entries();
        assert!(entries.len() > 150);
        for (path, value) in entries {
            assert_eq!(doc.get(&path).unwrap(), Some(value), "{path}");
        }
    }
}
