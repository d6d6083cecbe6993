use core::fmt;
use std::collections::HashMap;
use std::path::Path;

use hm_model::DocumentRoot;
use hm_xml::WriteOptions;
use tracing::debug;

use crate::HmError;

/// One value that changed during an edit. `None` means absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |value: &Option<String>| match value {
            Some(value) => format!("'{value}'"),
            None => "<absent>".to_string(),
        };
        write!(f, "{}: {} -> {}", self.path, show(&self.old), show(&self.new))
    }
}

type Observer = Box<dyn FnMut(&Change) + Send>;

/// Owns a document and notifies observers about every value an edit changes.
///
/// Edits are applied to a copy and committed only when they succeed, so a
/// failed edit neither changes the document nor notifies anyone.
pub struct Editor {
    document: DocumentRoot,
    observers: Vec<Observer>,
    dirty: bool,
}

impl Editor {
    pub fn new(document: DocumentRoot) -> Self {
        Editor {
            document,
            observers: Vec::new(),
            dirty: false,
        }
    }

    pub fn document(&self) -> &DocumentRoot {
        &self.document
    }

    pub fn into_document(self) -> DocumentRoot {
        self.document
    }

    /// Whether the document changed since it was loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Register a callback invoked once per changed value.
    pub fn on_change<F>(&mut self, observer: F)
    where
        F: FnMut(&Change) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn get(&self, path: &str) -> Result<Option<String>, HmError> {
        Ok(self.document.get(path)?)
    }

    /// Set the value or attribute at `path`.
    pub fn set(&mut self, path: &str, value: &str) -> Result<(), HmError> {
        self.update(|document| Ok(document.set(path, value)?))
    }

    /// Remove the element or attribute at `path`. Returns whether it was
    /// present.
    pub fn unset(&mut self, path: &str) -> Result<bool, HmError> {
        let mut removed = false;
        self.update(|document| {
            removed = document.unset(path)?;
            Ok(())
        })?;
        Ok(removed)
    }

    /// Apply an arbitrary edit and report the resulting changes.
    pub fn update<F>(&mut self, edit: F) -> Result<(), HmError>
    where
        F: FnOnce(&mut DocumentRoot) -> Result<(), HmError>,
    {
        let before = self.document.entries();
        let mut draft = self.document.clone();
        edit(&mut draft)?;
        let after = draft.entries();
        self.document = draft;

        let changes = diff(before, after);
        if !changes.is_empty() {
            self.dirty = true;
            debug!(changes = changes.len(), "document edited");
        }
        for change in &changes {
            for observer in &mut self.observers {
                observer(change);
            }
        }
        Ok(())
    }

    /// Write the document and clear the dirty flag.
    pub fn save(&mut self, path: impl AsRef<Path>, options: &WriteOptions) -> Result<(), HmError> {
        crate::save(path, &self.document, options)?;
        self.dirty = false;
        Ok(())
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("document", &self.document)
            .field("observers", &self.observers.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// Changed and removed entries in `before` order, then added ones.
fn diff(before: Vec<(String, String)>, after: Vec<(String, String)>) -> Vec<Change> {
    let mut remaining: HashMap<String, String> = after.iter().cloned().collect();
    let mut changes = Vec::new();
    for (path, old) in before {
        match remaining.remove(&path) {
            Some(new) if new == old => {}
            new => changes.push(Change {
                path,
                old: Some(old),
                new,
            }),
        }
    }
    for (path, new) in after {
        if remaining.remove(&path).is_some() {
            changes.push(Change {
                path,
                old: None,
                new: Some(new),
            });
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use hm_model::ParseOptions;
    use hm_schema::names;
    use std::sync::{Arc, Mutex};

    const TEMPLATE: &str = "<HMxml><FBP><LogFile>/tmp/log.xml</LogFile>\
                            <Backprojection><ImageCentre>1024.5</ImageCentre>\
                            <Tilt done=\"1\"><X-tilt>0</X-tilt></Tilt></Backprojection></FBP></HMxml>";

    fn editor() -> (Editor, Arc<Mutex<Vec<Change>>>) {
        let document = DocumentRoot::from_xml(TEMPLATE, &ParseOptions::strict())
            .unwrap()
            .document;
        let mut editor = Editor::new(document);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        editor.on_change(move |change| sink.lock().unwrap().push(change.clone()));
        (editor, seen)
    }

    #[test]
    fn set_notifies_old_and_new() {
        let (mut editor, seen) = editor();
        editor.set(names::IMAGE_CENTRE, "1012.25").unwrap();
        assert!(editor.is_dirty());
        assert_eq!(
            *seen.lock().unwrap(),
            [Change {
                path: names::IMAGE_CENTRE.to_string(),
                old: Some("1024.5".into()),
                new: Some("1012.25".into()),
            }]
        );
        assert_eq!(editor.get(names::IMAGE_CENTRE).unwrap().as_deref(), Some("1012.25"));
    }

    #[test]
    fn setting_the_same_value_is_silent() {
        let (mut editor, seen) = editor();
        editor.set(names::LOG_FILE, "/tmp/log.xml").unwrap();
        assert!(seen.lock().unwrap().is_empty());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn unset_of_a_group_reports_each_value() {
        let (mut editor, seen) = editor();
        assert!(editor.unset("FBP/Backprojection/Tilt").unwrap());
        let seen = seen.lock().unwrap();
        let paths: Vec<_> = seen.iter().map(|change| change.path.as_str()).collect();
        assert_eq!(
            paths,
            ["FBP/Backprojection/Tilt@done", "FBP/Backprojection/Tilt/X-tilt"]
        );
        assert!(seen.iter().all(|change| change.new.is_none()));
    }

    #[test]
    fn failed_edit_changes_nothing() {
        let (mut editor, seen) = editor();
        let before = editor.document().clone();
        let err = editor.set("FBP/InputData/Raw/ByteOrder", "PDP").unwrap_err();
        assert!(matches!(err, HmError::Model(_)));
        assert_eq!(editor.document(), &before);
        assert!(seen.lock().unwrap().is_empty());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn additions_are_reported_as_new() {
        let (mut editor, seen) = editor();
        editor.set("FBP/InputData/Raw/Bits", "16").unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].old, None);
        assert_eq!(seen[0].to_string(), "FBP/InputData/Raw/Bits: <absent> -> '16'");
    }

    #[test]
    fn save_clears_dirty_flag() {
        let (mut editor, _) = editor();
        editor.set(names::GPU_DEVICE_NUMBER, "2").unwrap();
        let dir = tempfile::tempdir().expect("tempdir");
        editor
            .save(dir.path().join("edited.xml"), &WriteOptions::default())
            .unwrap();
        assert!(!editor.is_dirty());
        assert!(format!("{editor:?}").contains("observers: 1"));
    }
}
