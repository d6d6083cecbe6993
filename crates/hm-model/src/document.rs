use hm_schema::names::{
    ATTR_NO_NAMESPACE_SCHEMA_LOCATION, ATTR_SCHEMA_LOCATION, ROOT, XSI_PREFIX,
};
use hm_xml::{parse_document, write_document, Element, WriteOptions};
use tracing::debug;

use crate::codec::{record, DecodeContext, XmlNode};
use crate::{
    Annotated, Backprojection, Diagnostic, FlatDarkFields, InputData, Marked, ModelError,
    OutputData, ParseOptions, Preprocessing, Transform,
};

record! {
    /// The `HMxml` root element.
    pub struct HmXml {
        "FBP" => fbp: Fbp,
    }
}

record! {
    /// One filtered-backprojection reconstruction job.
    pub struct Fbp {
        "DefaultXml" => default_xml: Marked<String>,
        "GPUDeviceNumber" => gpu_device_number: i32,
        "BeamlineUser" => beamline_user: BeamlineUser,
        "LogFile" => log_file: String,
        "InputData" => input_data: InputData,
        "FlatDarkFields" => flat_dark_fields: FlatDarkFields,
        "Preprocessing" => preprocessing: Preprocessing,
        "Transform" => transform: Transform,
        "Backprojection" => backprojection: Backprojection,
        "OutputData" => output_data: OutputData,
    }
}

record! {
    /// Experiment visit metadata and data folders.
    pub struct BeamlineUser {
        @"done" => done,
        "Type" => kind: Annotated<String>,
        "BeamlineName" => beamline_name: String,
        "Year" => year: String,
        "Month" => month: String,
        "Date" => date: String,
        "VisitNumber" => visit_number: String,
        "InputDataFolder" => input_data_folder: String,
        "InputScanFolder" => input_scan_folder: String,
        "OutputDataFolder" => output_data_folder: String,
        "OutputScanFolder" => output_scan_folder: String,
    }
}

/// Namespace declarations and schema-instance attributes found on the root
/// element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Namespaces {
    /// `(attribute name, uri)` pairs, e.g. `("xmlns:xsi", "...")`.
    pub declarations: Vec<(String, String)>,
    /// Every `xsi:*` attribute in document order, e.g.
    /// `("xsi:noNamespaceSchemaLocation", "hm.xsd")`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub schema_instance: Vec<(String, String)>,
}

impl Namespaces {
    fn from_root(root: &Element) -> Self {
        let mut namespaces = Namespaces::default();
        for attr in &root.attributes {
            let pair = (attr.name.clone(), attr.value.clone());
            if attr.name == "xmlns" || attr.name.starts_with("xmlns:") {
                namespaces.declarations.push(pair);
            } else if attr.name.starts_with(XSI_PREFIX) {
                namespaces.schema_instance.push(pair);
            }
        }
        namespaces
    }

    fn apply(&self, root: &mut Element) {
        for (name, value) in self.declarations.iter().chain(&self.schema_instance) {
            root.set_attribute(name, value.clone());
        }
    }

    /// The schema location, namespaced or not.
    pub fn schema_location(&self) -> Option<&str> {
        self.schema_instance
            .iter()
            .find(|(name, _)| {
                name == ATTR_SCHEMA_LOCATION || name == ATTR_NO_NAMESPACE_SCHEMA_LOCATION
            })
            .map(|(_, value)| value.as_str())
    }
}

/// A complete parameter file.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentRoot {
    #[cfg_attr(feature = "serde", serde(default))]
    pub namespaces: Namespaces,
    #[cfg_attr(feature = "serde", serde(rename = "HMxml"))]
    pub hm_xml: HmXml,
}

/// A decoded document plus the deviations tolerated while decoding it.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub document: DocumentRoot,
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentRoot {
    pub fn new(hm_xml: HmXml) -> Self {
        DocumentRoot {
            namespaces: Namespaces::default(),
            hm_xml,
        }
    }

    /// Parse and decode a document from text.
    pub fn from_xml(xml: &str, options: &ParseOptions) -> Result<Parsed, ModelError> {
        let root = parse_document(xml)?;
        Self::from_element(&root, options)
    }

    /// Decode an already parsed element tree.
    pub fn from_element(root: &Element, options: &ParseOptions) -> Result<Parsed, ModelError> {
        if root.local_name() != ROOT {
            return Err(ModelError::UnexpectedRoot {
                expected: ROOT,
                found: root.name.clone(),
                position: root.position,
            });
        }
        let mut ctx = DecodeContext::new(options);
        let hm_xml = HmXml::decode(root, &mut ctx)?;
        let diagnostics = ctx.into_diagnostics();
        debug!(
            diagnostics = diagnostics.len(),
            has_fbp = hm_xml.fbp.is_some(),
            "decoded HMxml document"
        );
        Ok(Parsed {
            document: DocumentRoot {
                namespaces: Namespaces::from_root(root),
                hm_xml,
            },
            diagnostics,
        })
    }

    /// Build the element tree written on save.
    pub fn to_element(&self) -> Element {
        let mut root = Element::new(ROOT);
        self.namespaces.apply(&mut root);
        root.children = self.hm_xml.encode(ROOT).children;
        root
    }

    pub fn to_xml(&self, options: &WriteOptions) -> Result<String, ModelError> {
        Ok(write_document(&self.to_element(), options)?)
    }

    pub fn fbp(&self) -> Option<&Fbp> {
        self.hm_xml.fbp.as_ref()
    }

    /// The `FBP` group, created when absent.
    pub fn fbp_mut(&mut self) -> &mut Fbp {
        self.hm_xml.fbp.get_or_insert_with(Fbp::default)
    }
}
