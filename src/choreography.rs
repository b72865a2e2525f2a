// choreography.rs - Keyframe tables per section and device class, replaceable by JSON

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::device::DeviceClass;
use crate::timeline::{Axes, TweenSpec};

/// Steps of one section for each device class
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionKeyframes {
    #[serde(default)]
    pub mobile: Vec<TweenSpec>,
    #[serde(default)]
    pub tablet: Vec<TweenSpec>,
    #[serde(default)]
    pub desktop: Vec<TweenSpec>,
}

impl SectionKeyframes {
    pub fn for_device(&self, device: DeviceClass) -> &[TweenSpec] {
        match device {
            DeviceClass::Mobile => &self.mobile,
            DeviceClass::Tablet => &self.tablet,
            DeviceClass::Desktop => &self.desktop,
        }
    }
}

/// Keyframes for every page section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choreography {
    pub sections: Vec<SectionKeyframes>,
}

type Steps = &'static [TweenSpec];

// [mobile, tablet, desktop] per section
const BUILTIN: [[Steps; 3]; 6] = [
    [
        &[
            TweenSpec::scale(Axes::uniform(5.0), 3.0).with_previous(),
            TweenSpec::position(Axes::xyz(0.38, -0.2, 0.0), 5.0),
            TweenSpec::rotation(Axes::xyz(0.0, 0.6283, -0.942), 5.0).with_previous(),
        ],
        &[
            TweenSpec::scale(Axes::uniform(10.0), 3.0).with_previous(),
            TweenSpec::position(Axes::xyz(0.2, -0.3, -0.4), 5.0),
            TweenSpec::rotation(Axes::xyz(0.0, 0.45, -0.35), 5.0).with_previous(),
        ],
        &[
            TweenSpec::scale(Axes::uniform(10.0), 3.0).with_previous(),
            TweenSpec::position(Axes::xyz(0.0, 0.0, 0.0), 5.0),
            TweenSpec::rotation(Axes::xyz(0.0, 0.565486677646163, -0.521504380495906), 5.0).with_previous(),
        ],
    ],
    [
        &[
            TweenSpec::position(Axes::xz(0.8, -0.5), 3.0).with_previous(),
            TweenSpec::rotation(Axes::y(2.0), 3.0).with_previous(),
        ],
        &[
            TweenSpec::position(Axes::xz(1.2, -0.7), 3.0).with_previous(),
            TweenSpec::rotation(Axes::y(2.5), 3.0).with_previous(),
        ],
        &[
            TweenSpec::position(Axes::xz(1.54, -0.92), 3.0).with_previous(),
            TweenSpec::rotation(Axes::y(3.141), 3.0).with_previous(),
        ],
    ],
    [
        &[
            TweenSpec::position(Axes::xz(-0.5, 1.0), 3.0).with_previous(),
            TweenSpec::rotation(Axes::y(0.2), 3.0).with_previous(),
        ],
        &[
            TweenSpec::position(Axes::xz(-0.8, 1.5), 3.0).with_previous(),
            TweenSpec::rotation(Axes::y(0.3), 3.0).with_previous(),
        ],
        &[
            TweenSpec::position(Axes::xz(-0.92, 2.04), 3.0).with_previous(),
            TweenSpec::rotation(Axes::y(0.408), 3.0).with_previous(),
        ],
    ],
    [
        &[
            TweenSpec::scale(Axes::uniform(5.0), 5.0).with_previous(),
            TweenSpec::position(Axes::xz(0.0, 0.0), 3.0).with_previous(),
            TweenSpec::rotation(Axes::y(0.2), 3.0).with_previous(),
        ],
        &[
            TweenSpec::scale(Axes::uniform(10.0), 5.0).with_previous(),
            TweenSpec::position(Axes::xz(-0.5, 1.5), 3.0).with_previous(),
            TweenSpec::rotation(Axes::y(0.3), 3.0).with_previous(),
        ],
        &[
            TweenSpec::scale(Axes::uniform(15.0), 5.0).with_previous(),
            TweenSpec::position(Axes::xz(-0.92, 2.04), 3.0).with_previous(),
            TweenSpec::rotation(Axes::y(0.408), 3.0).with_previous(),
        ],
    ],
    [
        &[
            TweenSpec::scale(Axes::uniform(5.0), 1.0),
            TweenSpec::position(Axes::x(2.0), 3.0).with_previous(),
            TweenSpec::rotation(Axes::xyz(3.141, 0.1, 1.0), 3.0).with_previous(),
        ],
        &[
            TweenSpec::scale(Axes::uniform(10.0), 1.0),
            TweenSpec::position(Axes::x(3.5), 3.0).with_previous(),
            TweenSpec::rotation(Axes::xyz(3.141, 0.15, 1.8), 3.0).with_previous(),
        ],
        &[
            TweenSpec::scale(Axes::uniform(15.0), 1.0),
            TweenSpec::position(Axes::x(4.5), 3.0).with_previous(),
            TweenSpec::rotation(Axes::xyz(3.141, 0.175, 2.337), 3.0).with_previous(),
        ],
    ],
    [
        &[
            TweenSpec::scale(Axes::uniform(5.0), 1.0),
            TweenSpec::position(Axes::x(15.0), 3.0).with_previous(),
        ],
        &[
            TweenSpec::scale(Axes::uniform(10.0), 1.0),
            TweenSpec::position(Axes::x(20.0), 3.0).with_previous(),
        ],
        &[
            TweenSpec::scale(Axes::uniform(15.0), 1.0),
            TweenSpec::position(Axes::x(25.0), 3.0).with_previous(),
        ],
    ],
];

impl Choreography {
    /// The product page's six sections
    pub fn builtin() -> Self {
        let sections = BUILTIN
            .iter()
            .map(|[mobile, tablet, desktop]| SectionKeyframes {
                mobile: mobile.to_vec(),
                tablet: tablet.to_vec(),
                desktop: desktop.to_vec(),
            })
            .collect();
        Self { sections }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let choreography: Self = serde_json::from_str(json).context("Invalid choreography JSON")?;
        choreography.validate()?;
        Ok(choreography)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read choreography: {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("Failed to load choreography: {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        for (index, section) in self.sections.iter().enumerate() {
            for device in DeviceClass::ALL {
                for step in section.for_device(device) {
                    if !step.duration.is_finite() || step.duration < 0.0 {
                        bail!(
                            "section {} ({}): duration {} must be a non-negative number",
                            index,
                            device.name(),
                            step.duration
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Steps for `section` on `device`; empty for sections without keyframes
    pub fn steps(&self, section: usize, device: DeviceClass) -> &[TweenSpec] {
        self.sections
            .get(section)
            .map(|keyframes| keyframes.for_device(device))
            .unwrap_or(&[])
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

impl Default for Choreography {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Property;
    use crate::timeline::Placement;

    #[test]
    fn test_builtin_has_six_sections() {
        let choreography = Choreography::builtin();
        assert_eq!(choreography.section_count(), 6);
        for section in 0..6 {
            for device in DeviceClass::ALL {
                assert!(!choreography.steps(section, device).is_empty());
            }
        }
    }

    #[test]
    fn test_out_of_range_section_has_no_steps() {
        let choreography = Choreography::builtin();
        assert!(choreography.steps(6, DeviceClass::Desktop).is_empty());
        assert!(choreography.steps(usize::MAX, DeviceClass::Mobile).is_empty());
    }

    #[test]
    fn test_first_section_layout() {
        let choreography = Choreography::builtin();
        let steps = choreography.steps(0, DeviceClass::Tablet);
        let properties: Vec<Property> = steps.iter().map(|step| step.property).collect();
        assert_eq!(properties, vec![Property::Scale, Property::Position, Property::Rotation]);
        assert_eq!(steps[1].placement, Placement::Append);
        assert_eq!(steps[1].target, Axes::xyz(0.2, -0.3, -0.4));
    }

    #[test]
    fn test_device_tables_differ() {
        let choreography = Choreography::builtin();
        let last = |device| choreography.steps(5, device)[1].target.x;
        assert_eq!(last(DeviceClass::Mobile), Some(15.0));
        assert_eq!(last(DeviceClass::Tablet), Some(20.0));
        assert_eq!(last(DeviceClass::Desktop), Some(25.0));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "sections": [
                { "desktop": [ { "property": "scale", "target": { "x": 2, "y": 2, "z": 2 }, "duration": 1 } ] }
            ]
        }"#;
        let choreography = Choreography::from_json_str(json).unwrap();
        assert_eq!(choreography.section_count(), 1);
        assert!(choreography.steps(0, DeviceClass::Mobile).is_empty());
        assert_eq!(
            choreography.steps(0, DeviceClass::Desktop),
            &[TweenSpec::scale(Axes::uniform(2.0), 1.0)]
        );
    }

    #[test]
    fn test_negative_duration_rejected() {
        let json = r#"{ "sections": [ { "mobile": [ { "property": "position", "target": { "x": 1 }, "duration": -1 } ] } ] }"#;
        let err = Choreography::from_json_str(json).unwrap_err();
        assert!(format!("{:#}", err).contains("section 0 (mobile)"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Choreography::from_json_file("/nonexistent/choreography.json").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/choreography.json"));
    }
}
