use hm_schema::{Decimal, IntensityNormalisation, RingArtefactRemoval, YesNo};

use crate::codec::record;
use crate::Annotated;

record! {
    pub struct Preprocessing {
        "HighPeaksBefore" => high_peaks_before: HighPeaks,
        "RingArtefacts" => ring_artefacts: RingArtefacts,
        "Intensity" => intensity: Intensity,
        "HighPeaksAfterRows" => high_peaks_after_rows: HighPeaks,
        "HighPeaksAfterColumns" => high_peaks_after_columns: HighPeaks,
    }
}

record! {
    /// Outlier (zinger) suppression settings.
    pub struct HighPeaks {
        "Type" => kind: Annotated<YesNo>,
        "NumberPixels" => number_pixels: i32,
        "Jump" => jump: Decimal,
    }
}

record! {
    pub struct RingArtefacts {
        "Type" => kind: Annotated<RingArtefactRemoval>,
        "ParameterN" => parameter_n: Decimal,
        "ParameterR" => parameter_r: Decimal,
        "NumSeries" => num_series: Annotated<Decimal>,
    }
}

record! {
    /// Intensity normalisation against reference columns.
    ///
    /// `ColumnLeft` and `ColumnRight` are strings on the wire; see
    /// [`Intensity::column_left_value`].
    pub struct Intensity {
        "Type" => kind: Annotated<IntensityNormalisation>,
        "ColumnLeft" => column_left: String,
        "ColumnRight" => column_right: String,
        "ZeroLeft" => zero_left: i32,
        "ZeroRight" => zero_right: i32,
    }
}

impl Intensity {
    pub fn column_left_value(&self) -> Option<Result<i32, std::num::ParseIntError>> {
        self.column_left.as_deref().map(|text| text.trim().parse())
    }

    pub fn column_right_value(&self) -> Option<Result<i32, std::num::ParseIntError>> {
        self.column_right.as_deref().map(|text| text.trim().parse())
    }
}
