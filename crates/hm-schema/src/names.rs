//! Well-known element names and parameter paths.
//!
//! Paths are `/`-separated element names relative to the `HMxml` root, the
//! form accepted by the path accessors of the model crate.

/// Root element of a parameter file (`HMxml`).
pub const ROOT: &str = "HMxml";
/// The single reconstruction job below the root (`FBP`).
pub const FBP: &str = "FBP";

/// Annotation attribute carried by enumerated leaves (`info`).
pub const ATTR_INFO: &str = "info";
/// Completion marker written by the instrument software (`done`).
pub const ATTR_DONE: &str = "done";
/// Prefix of the schema-instance attributes kept on the root element.
pub const XSI_PREFIX: &str = "xsi:";
/// Schema location for a namespaced schema.
pub const ATTR_SCHEMA_LOCATION: &str = "xsi:schemaLocation";
/// Schema location for a schema without a target namespace.
pub const ATTR_NO_NAMESPACE_SCHEMA_LOCATION: &str = "xsi:noNamespaceSchemaLocation";

/// Log file written by the reconstruction engine.
pub const LOG_FILE: &str = "FBP/LogFile";
/// GPU used for the backprojection.
pub const GPU_DEVICE_NUMBER: &str = "FBP/GPUDeviceNumber";
/// Folder holding the input projections or sinograms.
pub const INPUT_FOLDER: &str = "FBP/InputData/Folder";
/// File name prefix of the input images.
pub const INPUT_PREFIX: &str = "FBP/InputData/Prefix";
/// First input file index.
pub const INPUT_FILE_FIRST: &str = "FBP/InputData/FileFirst";
/// Last input file index.
pub const INPUT_FILE_LAST: &str = "FBP/InputData/FileLast";
/// Input file index step.
pub const INPUT_FILE_STEP: &str = "FBP/InputData/FileStep";
/// Flat field image taken before the scan.
pub const FLAT_FIELD_FILE_BEFORE: &str = "FBP/FlatDarkFields/FlatField/FileBefore";
/// Dark field image taken before the scan.
pub const DARK_FIELD_FILE_BEFORE: &str = "FBP/FlatDarkFields/DarkField/FileBefore";
/// Ring artefact suppression method.
pub const RING_ARTEFACTS_TYPE: &str = "FBP/Preprocessing/RingArtefacts/Type";
/// Centre of rotation in pixels.
pub const IMAGE_CENTRE: &str = "FBP/Backprojection/ImageCentre";
/// Region of interest shape.
pub const ROI_TYPE: &str = "FBP/Backprojection/ROI/Type";
/// Folder receiving the reconstructed slices.
pub const OUTPUT_FOLDER: &str = "FBP/OutputData/Folder";
/// File name prefix of the reconstructed slices.
pub const OUTPUT_PREFIX: &str = "FBP/OutputData/Prefix";
/// Bit depth of the reconstructed slices.
pub const OUTPUT_BITS: &str = "FBP/OutputData/Bits";
