//! Semantic checks that go beyond the schema.
//!
//! A document that decodes can still describe an impossible job, such as an
//! inverted file range or an unsupported bit depth. [`DocumentRoot::validate`]
//! reports these without refusing to load the file.

use core::fmt;

use hm_schema::Decimal;
use tracing::debug;

use crate::{DocumentRoot, Fbp, InputData, OutputData, Roi, Transform};

/// One semantic problem, located by parameter path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

const SUPPORTED_BITS: [i32; 3] = [8, 16, 32];

#[derive(Default)]
struct Issues(Vec<Issue>);

impl Issues {
    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(Issue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn ordered(&mut self, base: &str, low: (&str, Option<i32>), high: (&str, Option<i32>)) {
        if let (Some(lo), Some(hi)) = (low.1, high.1) {
            if lo > hi {
                self.push(
                    format!("{base}/{}", low.0),
                    format!("{} {lo} is greater than {} {hi}", low.0, high.0),
                );
            }
        }
    }

    fn positive(&mut self, path: String, value: Option<i32>) {
        if let Some(value) = value.filter(|value| *value <= 0) {
            self.push(path, format!("must be positive, found {value}"));
        }
    }

    fn non_negative(&mut self, path: String, value: Option<i32>) {
        if let Some(value) = value.filter(|value| *value < 0) {
            self.push(path, format!("must not be negative, found {value}"));
        }
    }

    fn bits(&mut self, path: String, value: Option<i32>) {
        if let Some(value) = value.filter(|value| !SUPPORTED_BITS.contains(value)) {
            self.push(path, format!("unsupported bit depth {value}, expected 8, 16 or 32"));
        }
    }

    fn value_range(&mut self, base: &str, min: Option<&Decimal>, max: Option<&Decimal>) {
        if let (Some(min), Some(max)) = (min, max) {
            if min.to_f64() > max.to_f64() {
                self.push(
                    format!("{base}/ValueMin"),
                    format!("ValueMin {min} is greater than ValueMax {max}"),
                );
            }
        }
    }
}

impl DocumentRoot {
    /// Run every semantic check and return the problems found.
    pub fn validate(&self) -> Vec<Issue> {
        let mut issues = Issues::default();
        if let Some(fbp) = self.fbp() {
            check_fbp(fbp, &mut issues);
        }
        debug!(issues = issues.0.len(), "validated document");
        issues.0
    }
}

fn check_fbp(fbp: &Fbp, issues: &mut Issues) {
    issues.non_negative("FBP/GPUDeviceNumber".into(), fbp.gpu_device_number);
    if let Some(input) = &fbp.input_data {
        check_input(input, issues);
    }
    if let Some(transform) = &fbp.transform {
        check_transform(transform, issues);
    }
    if let Some(output) = &fbp.output_data {
        check_output(output, issues);
    }
    if let Some(preprocessing) = &fbp.preprocessing {
        if let Some(intensity) = &preprocessing.intensity {
            let base = "FBP/Preprocessing/Intensity";
            for (name, value) in [
                ("ColumnLeft", intensity.column_left_value()),
                ("ColumnRight", intensity.column_right_value()),
            ] {
                if let Some(Err(err)) = value {
                    issues.push(format!("{base}/{name}"), format!("not an integer: {err}"));
                }
            }
        }
    }
    if let Some(back) = &fbp.backprojection {
        if let Some(tilt) = &back.tilt {
            let base = "FBP/Backprojection/Tilt";
            for (name, value) in [("X-tilt", tilt.x_tilt_value()), ("Z-tilt", tilt.z_tilt_value())] {
                if let Some(Err(err)) = value {
                    issues.push(format!("{base}/{name}"), format!("not a number: {err}"));
                }
            }
        }
        if let Some(roi) = &back.roi {
            check_roi(roi, issues);
        }
    }
}

fn check_input(input: &InputData, issues: &mut Issues) {
    let base = "FBP/InputData";
    issues.ordered(
        base,
        ("FileFirst", input.file_first),
        ("FileLast", input.file_last),
    );
    issues.positive(format!("{base}/FileStep"), input.file_step);
    let image = |leaf: &Option<crate::Marked<i32>>| leaf.as_ref().and_then(|leaf| leaf.value);
    issues.ordered(
        base,
        ("ImageFirst", image(&input.image_first)),
        ("ImageLast", image(&input.image_last)),
    );
    issues.positive(format!("{base}/ImageStep"), image(&input.image_step));
    issues.value_range(base, input.value_min.as_ref(), input.value_max.as_ref());
    if let Some(raw) = &input.raw {
        let base = "FBP/InputData/Raw";
        issues.bits(format!("{base}/Bits"), raw.bits);
        issues.positive(format!("{base}/Xlen"), raw.xlen);
        issues.positive(format!("{base}/Ylen"), raw.ylen);
        issues.positive(format!("{base}/Zlen"), raw.zlen);
    }
}

fn check_transform(transform: &Transform, issues: &mut Issues) {
    let base = "FBP/Transform";
    for (name, value) in [
        ("CropTop", transform.crop_top),
        ("CropBottom", transform.crop_bottom),
        ("CropLeft", transform.crop_left),
        ("CropRight", transform.crop_right),
    ] {
        issues.non_negative(format!("{base}/{name}"), value);
    }
    if let Some(Err(err)) = transform.missed_projection_indices() {
        issues.push(
            format!("{base}/MissedProjections"),
            format!("expected a list of non-negative integers: {err}"),
        );
    }
}

fn check_output(output: &OutputData, issues: &mut Issues) {
    let base = "FBP/OutputData";
    issues.bits(format!("{base}/Bits"), output.bits);
    issues.value_range(base, output.value_min.as_ref(), output.value_max.as_ref());
}

fn check_roi(roi: &Roi, issues: &mut Issues) {
    let base = "FBP/Backprojection/ROI";
    issues.ordered(base, ("Xmin", roi.xmin), ("Xmax", roi.xmax));
    issues.ordered(base, ("Ymin", roi.ymin), ("Ymax", roi.ymax));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseOptions;

    const SETTINGS: &str = include_str!("../fixtures/settings.xml");

    fn issues(xml: &str) -> Vec<Issue> {
        DocumentRoot::from_xml(xml, &ParseOptions::lenient().require_info(false))
            .unwrap()
            .document
            .validate()
    }

    fn paths(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|issue| issue.path.as_str()).collect()
    }

    #[test]
    fn fixture_has_no_issues() {
        assert_eq!(issues(SETTINGS), Vec::new());
    }

    #[test]
    fn empty_document_has_no_issues() {
        assert!(issues("<HMxml/>").is_empty());
        assert!(DocumentRoot::default().validate().is_empty());
    }

    #[test]
    fn inverted_ranges_are_reported() {
        let found = issues(
            "<HMxml><FBP><InputData><FileFirst>10</FileFirst><FileLast>2</FileLast>\
             <FileStep>0</FileStep><ImageFirst>5</ImageFirst><ImageLast>1</ImageLast>\
             <ValueMin>2.5</ValueMin><ValueMax>1</ValueMax></InputData>\
             <Backprojection><ROI><Xmin>100</Xmin><Xmax>10</Xmax><Ymin>0</Ymin><Ymax>10</Ymax></ROI>\
             </Backprojection></FBP></HMxml>",
        );
        assert_eq!(
            paths(&found),
            [
                "FBP/InputData/FileFirst",
                "FBP/InputData/FileStep",
                "FBP/InputData/ImageFirst",
                "FBP/InputData/ValueMin",
                "FBP/Backprojection/ROI/Xmin",
            ]
        );
        assert_eq!(found[0].message, "FileFirst 10 is greater than FileLast 2");
    }

    #[test]
    fn unsupported_values_are_reported() {
        let found = issues(
            "<HMxml><FBP><GPUDeviceNumber>-1</GPUDeviceNumber>\
             <InputData><Raw><Bits>12</Bits><Xlen>0</Xlen></Raw></InputData>\
             <Transform><CropLeft>-4</CropLeft></Transform>\
             <OutputData><Bits>24</Bits></OutputData></FBP></HMxml>",
        );
        assert_eq!(
            paths(&found),
            [
                "FBP/GPUDeviceNumber",
                "FBP/InputData/Raw/Bits",
                "FBP/InputData/Raw/Xlen",
                "FBP/Transform/CropLeft",
                "FBP/OutputData/Bits",
            ]
        );
    }

    #[test]
    fn numeric_strings_are_checked() {
        let found = issues(
            "<HMxml><FBP>\
             <Preprocessing><Intensity><ColumnLeft>ten</ColumnLeft><ColumnRight>4</ColumnRight></Intensity></Preprocessing>\
             <Transform><MissedProjections>3, -1</MissedProjections></Transform>\
             <Backprojection><Tilt><X-tilt>0.5</X-tilt><Z-tilt>left</Z-tilt></Tilt></Backprojection>\
             </FBP></HMxml>",
        );
        assert_eq!(
            paths(&found),
            [
                "FBP/Transform/MissedProjections",
                "FBP/Preprocessing/Intensity/ColumnLeft",
                "FBP/Backprojection/Tilt/Z-tilt",
            ]
        );
        let issue = found[2].to_string();
        assert!(issue.starts_with("FBP/Backprojection/Tilt/Z-tilt: not a number"), "{issue}");
    }
}
