use hm_schema::{ByteOrder, Decimal, Orientation, YesNo};

use crate::codec::record;
use crate::{Annotated, Marked, Tracked};

record! {
    /// Location, naming and layout of the projection images.
    pub struct InputData {
        "Folder" => folder: String,
        "Prefix" => prefix: String,
        "Suffix" => suffix: String,
        "Extension" => extension: String,
        "NOD" => nod: Annotated<i32>,
        "MemorySizeMax" => memory_size_max: Annotated<Decimal>,
        "MemorySizeMin" => memory_size_min: Annotated<i32>,
        "Orientation" => orientation: Tracked<Orientation>,
        "FileFirst" => file_first: i32,
        "FileLast" => file_last: i32,
        "FileStep" => file_step: i32,
        "ImageFirst" => image_first: Marked<i32>,
        "ImageLast" => image_last: Marked<i32>,
        "ImageStep" => image_step: Marked<i32>,
        "Raw" => raw: Raw,
        "FirstImageIndex" => first_image_index: Annotated<i32>,
        "ImagesPerFile" => images_per_file: i32,
        "Restrictions" => restrictions: Annotated<YesNo>,
        "ValueMin" => value_min: Decimal,
        "ValueMax" => value_max: Decimal,
        "Type" => kind: Annotated<String>,
        "Shape" => shape: Annotated<String>,
        "PixelParam" => pixel_param: Decimal,
    }
}

record! {
    /// Geometry of headerless raw input files.
    pub struct Raw {
        @"done" => done,
        "Type" => kind: Annotated<YesNo>,
        "Bits" => bits: i32,
        "Offset" => offset: Annotated<i32>,
        "ByteOrder" => byte_order: Annotated<ByteOrder>,
        "Xlen" => xlen: i32,
        "Ylen" => ylen: i32,
        "Zlen" => zlen: i32,
        "Gap" => gap: Annotated<i32>,
    }
}

impl InputData {
    /// Inclusive file index range, when both ends are set.
    pub fn file_range(&self) -> Option<(i32, i32)> {
        Some((self.file_first?, self.file_last?))
    }
}

impl Raw {
    /// Whether the input is read as raw data rather than image files.
    pub fn is_raw(&self) -> bool {
        self.kind
            .as_ref()
            .and_then(|kind| kind.value)
            .is_some_and(YesNo::is_yes)
    }
}
