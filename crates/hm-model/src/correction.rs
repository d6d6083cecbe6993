use hm_schema::FieldCorrectionKind;

use crate::codec::record;
use crate::Annotated;

record! {
    /// Flat-field and dark-field correction.
    pub struct FlatDarkFields {
        "FlatField" => flat_field: FieldCorrection,
        "DarkField" => dark_field: FieldCorrection,
    }
}

record! {
    /// One calibration field: a constant value, or images taken before and
    /// after the scan.
    pub struct FieldCorrection {
        "Type" => kind: Annotated<FieldCorrectionKind>,
        "ValueBefore" => value_before: f64,
        "ValueAfter" => value_after: f64,
        "FileBefore" => file_before: String,
        "FileAfter" => file_after: String,
        "ProfileType" => profile_type: Annotated<String>,
        "FileProfile" => file_profile: String,
    }
}
