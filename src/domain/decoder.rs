//! Design decoder - translates a raw design vector into the labeled,
//! respondent-facing comparison of two alternatives.

use serde_json::{json, Map, Value};

use super::design::DesignVector;
use super::errors::DecodeError;
use super::registry::{Characteristic, CharacteristicRegistry, LevelValue};
use super::sampler::transform_earnings;

/// The decoded, respondent-facing rendering of one design vector.
///
/// Carries the raw difference encoding alongside the resolved level values
/// so survey tooling can log both. Serialized with `_{qnumber}`-suffixed
/// keys so several questions can coexist in one embedded-data payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub qnumber: u32,
    pub diff_earnings: f64,
    pub d1: i32,
    pub d2: i32,
    pub d3: i32,
    pub label_a: String,
    pub label_b: String,
    pub base_earnings: f64,
    pub treat_earnings: f64,
    pub base_img: Option<String>,
    pub treat_img: Option<String>,
    pub base_a: LevelValue,
    pub base_b: LevelValue,
    pub treat_a: LevelValue,
    pub treat_b: LevelValue,
}

impl Presentation {
    /// Renders the presentation as a flat JSON object with question-number
    /// suffixed keys. Labels are unsuffixed; image keys are omitted when the
    /// registry version carries no imagery.
    pub fn into_payload(self) -> Value {
        let q = self.qnumber;
        let mut map = Map::new();
        map.insert(format!("diff_earnings_{q}"), json!(self.diff_earnings));
        map.insert(format!("diff_d1_{q}"), json!(self.d1));
        map.insert(format!("diff_d2_{q}"), json!(self.d2));
        map.insert(format!("diff_d3_{q}"), json!(self.d3));
        map.insert("label_a".to_string(), json!(self.label_a));
        map.insert("label_b".to_string(), json!(self.label_b));
        map.insert(format!("base_earnings_{q}"), json!(self.base_earnings));
        map.insert(format!("treat_earnings_{q}"), json!(self.treat_earnings));
        if let Some(img) = self.base_img {
            map.insert(format!("base_img_{q}"), json!(img));
        }
        if let Some(img) = self.treat_img {
            map.insert(format!("treat_img_{q}"), json!(img));
        }
        map.insert(format!("base_a_{q}"), json!(self.base_a));
        map.insert(format!("base_b_{q}"), json!(self.base_b));
        map.insert(format!("treat_a_{q}"), json!(self.treat_a));
        map.insert(format!("treat_b_{q}"), json!(self.treat_b));
        Value::Object(map)
    }
}

fn level(characteristic: &Characteristic, index: usize) -> Result<LevelValue, DecodeError> {
    characteristic
        .levels
        .get(index)
        .cloned()
        .ok_or_else(|| DecodeError::LevelOutOfRange {
            key: characteristic.key.to_string(),
            index,
        })
}

/// Decodes one design vector against the registry's decode table.
///
/// Pure function: resolves the `(d1, d2, d3)` pattern to level indices for
/// the two caller-selected characteristics and applies the earnings
/// transform. Any triple outside the table is rejected rather than left
/// undefined.
pub fn decode(
    design: &DesignVector,
    registry: &CharacteristicRegistry,
    qnumber: u32,
    base_earnings: f64,
    characteristic_a: &str,
    characteristic_b: &str,
) -> Result<Presentation, DecodeError> {
    let char_a = registry
        .get(characteristic_a)
        .ok_or_else(|| DecodeError::UnknownCharacteristic {
            key: characteristic_a.to_string(),
        })?;
    let char_b = registry
        .get(characteristic_b)
        .ok_or_else(|| DecodeError::UnknownCharacteristic {
            key: characteristic_b.to_string(),
        })?;

    let (d1, d2, d3) = design.codes()?;
    let entry = registry
        .lookup(d1, d2, d3)
        .ok_or(DecodeError::UnknownPattern { d1, d2, d3 })?;

    let (base_e, treat_e) = transform_earnings(base_earnings, design.diff_earnings());

    Ok(Presentation {
        qnumber,
        diff_earnings: design.diff_earnings(),
        d1,
        d2,
        d3,
        label_a: char_a.label.to_string(),
        label_b: char_b.label.to_string(),
        base_earnings: base_e,
        treat_earnings: treat_e,
        base_img: entry.images.map(|i| i.base.to_string()),
        treat_img: entry.images.map(|i| i.treat.to_string()),
        base_a: level(char_a, entry.base_a)?,
        base_b: level(char_b, entry.base_b)?,
        treat_a: level(char_a, entry.treat_a)?,
        treat_b: level(char_b, entry.treat_b)?,
    })
}
