use hm_schema::{Decimal, YesNo};

use crate::codec::record;
use crate::{Annotated, Tracked};

record! {
    /// Naming and sample format of the reconstructed slices.
    pub struct OutputData {
        "Type" => kind: Annotated<String>,
        "State" => state: Annotated<String>,
        "Folder" => folder: String,
        "Prefix" => prefix: String,
        "Suffix" => suffix: String,
        "Extension" => extension: String,
        "NOD" => nod: i32,
        "FileFirst" => file_first: i32,
        "FileStep" => file_step: i32,
        "BitsType" => bits_type: Annotated<String>,
        "Bits" => bits: i32,
        "Restrictions" => restrictions: Annotated<YesNo>,
        "ValueMin" => value_min: Decimal,
        "ValueMax" => value_max: Decimal,
        "Shape" => shape: Tracked<String>,
    }
}
