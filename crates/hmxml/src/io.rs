use std::fs;
use std::path::Path;

use hm_model::{DocumentRoot, ParseOptions, Parsed};
use hm_xml::WriteOptions;
use tracing::debug;

use crate::HmError;

/// Decode a document from text.
pub fn load_str(xml: &str, options: &ParseOptions) -> Result<Parsed, HmError> {
    Ok(DocumentRoot::from_xml(xml, options)?)
}

/// Read and decode a parameter file.
pub fn load(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Parsed, HmError> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path).map_err(|source| HmError::io(path, source))?;
    let parsed = load_str(&xml, options)?;
    debug!(
        path = %path.display(),
        diagnostics = parsed.diagnostics.len(),
        "loaded parameter file"
    );
    Ok(parsed)
}

/// Serialize a document.
pub fn to_string(document: &DocumentRoot, options: &WriteOptions) -> Result<String, HmError> {
    Ok(document.to_xml(options)?)
}

/// Serialize a document and write it to `path`, replacing any existing file.
pub fn save(
    path: impl AsRef<Path>,
    document: &DocumentRoot,
    options: &WriteOptions,
) -> Result<(), HmError> {
    let path = path.as_ref();
    let xml = to_string(document, options)?;
    fs::write(path, xml).map_err(|source| HmError::io(path, source))?;
    debug!(path = %path.display(), "saved parameter file");
    Ok(())
}

/// Asynchronous [`load`] on tokio's file system API.
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub async fn load_async(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<Parsed, HmError> {
    let path = path.as_ref();
    let xml = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| HmError::io(path, source))?;
    let parsed = load_str(&xml, options)?;
    debug!(path = %path.display(), "loaded parameter file");
    Ok(parsed)
}

/// Asynchronous [`save`] on tokio's file system API.
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub async fn save_async(
    path: impl AsRef<Path>,
    document: &DocumentRoot,
    options: &WriteOptions,
) -> Result<(), HmError> {
    let path = path.as_ref();
    let xml = to_string(document, options)?;
    tokio::fs::write(path, xml)
        .await
        .map_err(|source| HmError::io(path, source))?;
    debug!(path = %path.display(), "saved parameter file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hm_schema::names;

    const MINIMAL: &str = "<HMxml><FBP><GPUDeviceNumber>0</GPUDeviceNumber>\
                           <OutputData><Bits>16</Bits></OutputData></FBP></HMxml>";

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.xml");
        let document = load_str(MINIMAL, &ParseOptions::strict()).unwrap().document;
        save(&path, &document, &WriteOptions::default()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        let loaded = load(&path, &ParseOptions::strict()).unwrap();
        assert_eq!(loaded.document, document);
        assert_eq!(loaded.document.get(names::OUTPUT_BITS).unwrap().as_deref(), Some("16"));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.xml");
        let err = load(&path, &ParseOptions::default()).unwrap_err();
        match &err {
            HmError::Io { path: reported, .. } => assert_eq!(reported, &path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("absent.xml"));
    }

    #[test]
    fn model_errors_pass_through() {
        let err = load_str("<HMxml><FBP>", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, HmError::Model(hm_model::ModelError::Xml(_))));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn async_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("async.xml");
        let document = load_str(MINIMAL, &ParseOptions::strict()).unwrap().document;
        save_async(&path, &document, &WriteOptions::default())
            .await
            .unwrap();
        let loaded = load_async(&path, &ParseOptions::strict()).await.unwrap();
        assert_eq!(loaded.document, document);
    }
}
