use std::num::ParseFloatError;

use hm_schema::{BoundUnit, Decimal, Interpolation, RoiKind, YesNo};

use crate::codec::record;
use crate::{Annotated, Tracked};

record! {
    /// Filtered backprojection settings.
    pub struct Backprojection {
        "Filter" => filter: Filter,
        "ImageCentre" => image_centre: Decimal,
        "ClockwiseRotation" => clockwise_rotation: Tracked<YesNo>,
        "Tilt" => tilt: Tilt,
        "CoordinateSystem" => coordinate_system: CoordinateSystem,
        "Circles" => circles: Circles,
        "ROI" => roi: Roi,
        "PolarCartesianInterpolation" => polar_cartesian_interpolation: Tracked<Interpolation>,
    }
}

record! {
    pub struct Filter {
        "Type" => kind: Annotated<String>,
        "Name" => name: Annotated<String>,
        "Bandwidth" => bandwidth: Decimal,
        "WindowName" => window_name: Annotated<String>,
        "Normalisation" => normalisation: Annotated<String>,
        "PixelSize" => pixel_size: Decimal,
    }
}

record! {
    /// Detector tilt correction. The axis values are kept as written.
    pub struct Tilt {
        @"done" => done,
        "Type" => kind: Annotated<YesNo>,
        "X-tilt" => x_tilt: String,
        "Z-tilt" => z_tilt: String,
    }
}

record! {
    pub struct CoordinateSystem {
        @"done" => done,
        "Type" => kind: Annotated<String>,
        "Slice" => slice: String,
    }
}

record! {
    /// Circular mask bounds.
    pub struct Circles {
        @"comm" => comm,
        "ValueMin" => value_min: CircleBound,
        "ValueMax" => value_max: CircleBound,
        "ValueStep" => value_step: CircleBound,
    }
}

record! {
    pub struct CircleBound {
        "Type" => kind: Annotated<BoundUnit>,
        "Percent" => percent: i32,
        "Pixel" => pixel: i32,
    }
}

record! {
    /// Region of interest in the reconstructed slice.
    pub struct Roi {
        "Type" => kind: Annotated<RoiKind>,
        "Xmin" => xmin: i32,
        "Xmax" => xmax: i32,
        "Ymin" => ymin: i32,
        "Ymax" => ymax: i32,
        "OutputWidthType" => output_width_type: Annotated<String>,
        "OutputWidth" => output_width: i32,
        "Angle" => angle: Decimal,
    }
}

impl Tilt {
    pub fn x_tilt_value(&self) -> Option<Result<f64, ParseFloatError>> {
        self.x_tilt.as_deref().map(|text| text.trim().parse())
    }

    pub fn z_tilt_value(&self) -> Option<Result<f64, ParseFloatError>> {
        self.z_tilt.as_deref().map(|text| text.trim().parse())
    }
}

impl CircleBound {
    /// The bound in the unit selected by `Type`.
    pub fn selected(&self) -> Option<(BoundUnit, i32)> {
        let unit = self.kind.as_ref()?.value?;
        let value = match unit {
            BoundUnit::Percent => self.percent,
            BoundUnit::Pixel => self.pixel,
        }?;
        Some((unit, value))
    }
}
