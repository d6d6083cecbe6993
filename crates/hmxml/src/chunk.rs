//! Split one parameter file into per-chunk jobs for a batch queue.
//!
//! Each chunk reconstructs a contiguous range of slices and gets its own
//! copy of the template with `InputData/FileFirst`, `FileLast`, `FileStep`
//! and `LogFile` rewritten. Chunk numbers are one-based so they can be used
//! directly as array-job task ids.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use hm_model::{DocumentRoot, InputData};
use hm_schema::names;
use hm_xml::WriteOptions;
use tracing::{debug, info};

use crate::HmError;

const CHUNK_LIST: &str = "chunklist.txt";

/// Parameters shared by every chunk of a job, applied to the template
/// before it is split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSettings {
    pub input_folder: Option<String>,
    pub input_prefix: Option<String>,
    pub output_folder: Option<String>,
    pub output_prefix: Option<String>,
    pub flat_file: Option<String>,
    pub dark_file: Option<String>,
    pub image_centre: Option<String>,
}

impl JobSettings {
    /// Write the configured values into `document`.
    pub fn apply(&self, document: &mut DocumentRoot) -> Result<(), HmError> {
        let values = [
            (names::INPUT_FOLDER, &self.input_folder),
            (names::INPUT_PREFIX, &self.input_prefix),
            (names::OUTPUT_FOLDER, &self.output_folder),
            (names::OUTPUT_PREFIX, &self.output_prefix),
            (names::FLAT_FIELD_FILE_BEFORE, &self.flat_file),
            (names::DARK_FIELD_FILE_BEFORE, &self.dark_file),
            (names::IMAGE_CENTRE, &self.image_centre),
        ];
        for (path, value) in values {
            if let Some(value) = value {
                document.set(path, value)?;
            }
        }
        Ok(())
    }
}

/// How to divide the slice range `[first_slice, last_slice)` into chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    pub first_slice: i32,
    pub last_slice: i32,
    pub chunks: u32,
    pub step: i32,
    /// Directory for per-chunk log files; `None` leaves the name relative.
    pub log_dir: Option<PathBuf>,
}

/// One job produced by [`ChunkPlan::split`].
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// One-based task number.
    pub task: u32,
    pub first: i32,
    /// Last slice, inclusive.
    pub last: i32,
    pub document: DocumentRoot,
}

impl Chunk {
    pub fn file_name(&self) -> String {
        format!("chunk_{:03}.xml", self.task)
    }

    pub fn slices(&self) -> i32 {
        1 + self.last - self.first
    }
}

impl ChunkPlan {
    pub fn new(first_slice: i32, last_slice: i32, chunks: u32) -> Self {
        ChunkPlan {
            first_slice,
            last_slice,
            chunks,
            step: 1,
            log_dir: None,
        }
    }

    pub fn step(mut self, step: i32) -> Self {
        self.step = step;
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// `(task, first, last)` for every chunk.
    ///
    /// Chunks share `(last_slice - first_slice) / chunks` slices; the final
    /// chunk also takes the remainder and ends at `last_slice - 1`.
    pub fn ranges(&self) -> Result<Vec<(u32, i32, i32)>, HmError> {
        if self.chunks == 0 {
            return Err(HmError::chunk("at least one chunk is required"));
        }
        if self.step <= 0 {
            return Err(HmError::chunk(format!(
                "slice step must be positive, found {}",
                self.step
            )));
        }
        let slices = i64::from(self.last_slice) - i64::from(self.first_slice);
        if slices < i64::from(self.chunks) {
            return Err(HmError::chunk(format!(
                "{} slices from {} to {} cannot fill {} chunks",
                slices.max(0),
                self.first_slice,
                self.last_slice,
                self.chunks
            )));
        }
        let size = slices / i64::from(self.chunks);
        let ranges = (0..self.chunks)
            .map(|chunk| {
                let first = i64::from(self.first_slice) + i64::from(chunk) * size;
                let last = if chunk + 1 == self.chunks {
                    i64::from(self.last_slice) - 1
                } else {
                    first + size - 1
                };
                // Both ends lie inside [first_slice, last_slice), so they fit in i32.
                (chunk + 1, first as i32, last as i32)
            })
            .collect();
        Ok(ranges)
    }

    /// Produce one document per chunk from `template`.
    pub fn split(&self, template: &DocumentRoot) -> Result<Vec<Chunk>, HmError> {
        let ranges = self.ranges()?;
        let chunks = ranges
            .into_iter()
            .map(|(task, first, last)| {
                let mut document = template.clone();
                let fbp = document.fbp_mut();
                let input = fbp.input_data.get_or_insert_with(InputData::default);
                input.file_first = Some(first);
                input.file_last = Some(last);
                input.file_step = Some(self.step);
                fbp.log_file = Some(self.log_file(task));
                debug!(task, first, last, "planned chunk");
                Chunk {
                    task,
                    first,
                    last,
                    document,
                }
            })
            .collect();
        Ok(chunks)
    }

    fn log_file(&self, task: u32) -> String {
        let name = format!("log_{task:03}.xml");
        match &self.log_dir {
            Some(dir) => dir.join(name).to_string_lossy().into_owned(),
            None => name,
        }
    }
}

/// Write every chunk into `dir` together with a `chunklist.txt` summary.
/// Returns the paths of the chunk files.
pub fn write_chunks(
    dir: impl AsRef<Path>,
    chunks: &[Chunk],
    options: &WriteOptions,
) -> Result<Vec<PathBuf>, HmError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| HmError::io(dir, source))?;
    let mut summary = String::new();
    let mut written = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let path = dir.join(chunk.file_name());
        crate::save(&path, &chunk.document, options)?;
        let _ = writeln!(
            summary,
            "chunk {} sge-task {} start {} end {} num {}",
            chunk.task - 1,
            chunk.task,
            chunk.first,
            chunk.last,
            chunk.slices()
        );
        written.push(path);
    }
    let list = dir.join(CHUNK_LIST);
    fs::write(&list, summary).map_err(|source| HmError::io(&list, source))?;
    info!(dir = %dir.display(), chunks = chunks.len(), "wrote chunk files");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hm_model::ParseOptions;

    const TEMPLATE: &str = "<HMxml><FBP><LogFile>log.xml</LogFile>\
        <InputData><Folder>/in</Folder><FileFirst>0</FileFirst><FileLast>1</FileLast>\
        <FileStep>1</FileStep></InputData>\
        <Backprojection><ImageCentre>1024.5</ImageCentre></Backprojection>\
        <OutputData><Folder>/out</Folder></OutputData></FBP></HMxml>";

    fn template() -> DocumentRoot {
        DocumentRoot::from_xml(TEMPLATE, &ParseOptions::strict())
            .unwrap()
            .document
    }

    #[test]
    fn ranges_cover_the_slices() {
        let ranges = ChunkPlan::new(0, 2672, 16).ranges().unwrap();
        assert_eq!(ranges.len(), 16);
        assert_eq!(ranges[0], (1, 0, 166));
        assert_eq!(ranges[1], (2, 167, 333));
        assert_eq!(ranges[15], (16, 2505, 2671));
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].2 + 1, pair[1].1);
        }
    }

    #[test]
    fn last_chunk_takes_the_remainder() {
        let ranges = ChunkPlan::new(10, 21, 3).ranges().unwrap();
        assert_eq!(ranges, [(1, 10, 12), (2, 13, 15), (3, 16, 20)]);
    }

    #[test]
    fn invalid_plans_are_rejected() {
        for plan in [
            ChunkPlan::new(0, 100, 0),
            ChunkPlan::new(0, 3, 4),
            ChunkPlan::new(50, 10, 2),
            ChunkPlan::new(0, 100, 2).step(0),
        ] {
            assert!(matches!(plan.ranges(), Err(HmError::Chunk(_))), "{plan:?}");
        }
    }

    #[test]
    fn split_rewrites_range_and_log() {
        let chunks = ChunkPlan::new(0, 100, 4)
            .step(2)
            .log_dir("/tmp/recon")
            .split(&template())
            .unwrap();
        assert_eq!(chunks.len(), 4);
        let third = &chunks[2];
        assert_eq!(third.file_name(), "chunk_003.xml");
        let doc = &third.document;
        assert_eq!(doc.get(names::INPUT_FILE_FIRST).unwrap().as_deref(), Some("50"));
        assert_eq!(doc.get(names::INPUT_FILE_LAST).unwrap().as_deref(), Some("74"));
        assert_eq!(doc.get(names::INPUT_FILE_STEP).unwrap().as_deref(), Some("2"));
        assert_eq!(
            doc.get(names::LOG_FILE).unwrap().as_deref(),
            Some("/tmp/recon/log_003.xml")
        );
        assert_eq!(doc.get(names::INPUT_FOLDER).unwrap().as_deref(), Some("/in"));
    }

    #[test]
    fn job_settings_override_the_template() {
        let mut doc = template();
        JobSettings {
            input_folder: Some("/data/sinograms".into()),
            input_prefix: Some("sino_".into()),
            output_prefix: Some("image_".into()),
            flat_file: Some("/data/flat/flat.tif".into()),
            image_centre: Some("1012.25".into()),
            ..JobSettings::default()
        }
        .apply(&mut doc)
        .unwrap();
        assert_eq!(doc.get(names::INPUT_FOLDER).unwrap().as_deref(), Some("/data/sinograms"));
        assert_eq!(doc.get(names::OUTPUT_FOLDER).unwrap().as_deref(), Some("/out"));
        assert_eq!(doc.get(names::OUTPUT_PREFIX).unwrap().as_deref(), Some("image_"));
        assert_eq!(
            doc.get(names::FLAT_FIELD_FILE_BEFORE).unwrap().as_deref(),
            Some("/data/flat/flat.tif")
        );
        assert_eq!(doc.get(names::IMAGE_CENTRE).unwrap().as_deref(), Some("1012.25"));
        assert!(doc.get(names::DARK_FIELD_FILE_BEFORE).unwrap().is_none());
    }

    #[test]
    fn bad_centre_is_rejected() {
        let mut doc = template();
        let settings = JobSettings {
            image_centre: Some("middle".into()),
            ..JobSettings::default()
        };
        assert!(matches!(settings.apply(&mut doc), Err(HmError::Model(_))));
    }

    #[test]
    fn write_chunks_creates_files_and_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("jobs");
        let chunks = ChunkPlan::new(0, 10, 2).split(&template()).unwrap();
        let paths = write_chunks(&out, &chunks, &WriteOptions::default()).unwrap();
        assert_eq!(paths, [out.join("chunk_001.xml"), out.join("chunk_002.xml")]);

        let second = crate::load(&paths[1], &ParseOptions::strict()).unwrap().document;
        assert_eq!(second.get(names::INPUT_FILE_FIRST).unwrap().as_deref(), Some("5"));
        assert_eq!(second.get(names::LOG_FILE).unwrap().as_deref(), Some("log_002.xml"));

        let list = fs::read_to_string(out.join(CHUNK_LIST)).unwrap();
        assert_eq!(
            list,
            "chunk 0 sge-task 1 start 0 end 4 num 5\nchunk 1 sge-task 2 start 5 end 9 num 5\n"
        );
    }
}
