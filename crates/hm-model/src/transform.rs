use std::num::ParseIntError;

use hm_schema::{Decimal, Extrapolation, Interpolation, MissedProjectionsMode, ScaleKind, YesNo};

use crate::codec::record;
use crate::Annotated;

record! {
    /// Sinogram-space corrections applied before backprojection.
    pub struct Transform {
        "MissedProjections" => missed_projections: Annotated<String>,
        "MissedProjectionsType" => missed_projections_type: Annotated<MissedProjectionsMode>,
        "RotationAngleType" => rotation_angle_type: Annotated<i32>,
        "RotationAngle" => rotation_angle: i32,
        "RotationAngleEndPoints" => rotation_angle_end_points: Annotated<YesNo>,
        "ReCentreAngle" => re_centre_angle: Decimal,
        "ReCentreRadius" => re_centre_radius: Decimal,
        "CropTop" => crop_top: i32,
        "CropBottom" => crop_bottom: i32,
        "CropLeft" => crop_left: i32,
        "CropRight" => crop_right: i32,
        "ScaleType" => scale_type: Annotated<ScaleKind>,
        "ScaleWidth" => scale_width: i32,
        "ScaleHeight" => scale_height: i32,
        "ExtrapolationType" => extrapolation_type: Annotated<Extrapolation>,
        "ExtrapolationPixels" => extrapolation_pixels: i32,
        "ExtrapolationWidth" => extrapolation_width: i32,
        "Interpolation" => interpolation: Annotated<Interpolation>,
    }
}

impl Transform {
    /// Indices listed in `MissedProjections`, separated by whitespace or
    /// commas. `None` when the element or its value is absent.
    pub fn missed_projection_indices(&self) -> Option<Result<Vec<u32>, ParseIntError>> {
        let text = self.missed_projections.as_ref()?.value.as_deref()?;
        Some(
            text.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .map(str::parse)
                .collect(),
        )
    }

    /// The four crop margins as top, bottom, left, right; unset margins are 0.
    pub fn crop(&self) -> [i32; 4] {
        [self.crop_top, self.crop_bottom, self.crop_left, self.crop_right]
            .map(Option::unwrap_or_default)
    }
}
