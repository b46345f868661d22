//! Characteristic registry - the attributes that can distinguish the two
//! alternatives shown to a respondent, plus the decode table that maps the
//! engine's `(d1, d2, d3)` patterns onto concrete level assignments.
//!
//! Two registry versions ship with the service. Both are plain data behind
//! one type; which one is active is configuration, not code.

use serde::{Deserialize, Serialize};

/// One level a characteristic can take. Index 0 is always the
/// absent/baseline level.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LevelValue {
    Number(f64),
    Text(String),
}

impl From<f64> for LevelValue {
    fn from(value: f64) -> Self {
        LevelValue::Number(value)
    }
}

impl From<i32> for LevelValue {
    fn from(value: i32) -> Self {
        LevelValue::Number(f64::from(value))
    }
}

/// A single attribute with a human-readable label and ordered levels.
#[derive(Debug, Clone)]
pub struct Characteristic {
    pub key: &'static str,
    pub label: &'static str,
    pub levels: Vec<LevelValue>,
}

impl Characteristic {
    fn new(key: &'static str, label: &'static str, levels: &[i32]) -> Self {
        Self {
            key,
            label,
            levels: levels.iter().map(|&v| LevelValue::from(v)).collect(),
        }
    }
}

/// Image assets attached to one decode table entry.
#[derive(Debug, Clone, Copy)]
pub struct ImagePair {
    pub base: &'static str,
    pub treat: &'static str,
}

/// One row of the decode table: an exact `(d1, d2, d3)` pattern and the
/// level indices it resolves to for the base and treated alternative.
#[derive(Debug, Clone)]
pub struct DecodeEntry {
    pub pattern: [i32; 3],
    pub base_a: usize,
    pub base_b: usize,
    pub treat_a: usize,
    pub treat_b: usize,
    pub images: Option<ImagePair>,
}

impl DecodeEntry {
    fn new(pattern: [i32; 3], levels: [usize; 4], images: Option<ImagePair>) -> Self {
        let [base_a, base_b, treat_a, treat_b] = levels;
        Self {
            pattern,
            base_a,
            base_b,
            treat_a,
            treat_b,
            images,
        }
    }
}

/// Which registry generation a deployment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryVersion {
    /// Two characteristics: ternary tree size and binary grass presence,
    /// with a Qualtrics image per decoded combination.
    #[default]
    TreesGrass,
    /// Three binary characteristics, no imagery.
    ThreeBinary,
}

/// A fixed, versioned bundle of characteristics and their decode table.
///
/// Immutable after construction; shared read-only across requests.
#[derive(Debug, Clone)]
pub struct CharacteristicRegistry {
    version: RegistryVersion,
    characteristics: Vec<Characteristic>,
    characteristics_per_scenario: usize,
    example_base_earnings: f64,
    decode_table: Vec<DecodeEntry>,
}

// Qualtrics-hosted scenario images for the trees-grass registry.
const IMG_BASELINE: &str = "https://brown.co1.qualtrics.com/CP/Graphic.php?IM=IM_3BExhm4UusJYfga";
const IMG_SMALL_TREES: &str =
    "https://brown.co1.qualtrics.com/CP/Graphic.php?IM=IM_bpbbTyvDu0bNWFo";
const IMG_SMALL_TREES_GRASS: &str =
    "https://brown.co1.qualtrics.com/CP/Graphic.php?IM=IM_eCAXoH8FEEgqMjc";
const IMG_LARGE_TREES: &str =
    "https://brown.co1.qualtrics.com/CP/Graphic.php?IM=IM_6x1QMgV79lnzrWC";
const IMG_LARGE_TREES_GRASS: &str =
    "https://brown.co1.qualtrics.com/ControlPanel/Graphic.php?IM=IM_8qqRVOS6rtEqN2m";
const IMG_GRASS: &str = "https://brown.co1.qualtrics.com/CP/Graphic.php?IM=IM_5ps4NErUcNoGTd4";

fn imgs(base: &'static str, treat: &'static str) -> Option<ImagePair> {
    Some(ImagePair { base, treat })
}

impl CharacteristicRegistry {
    /// Builds the registry data for the given version.
    pub fn for_version(version: RegistryVersion) -> Self {
        match version {
            RegistryVersion::TreesGrass => Self::trees_grass(),
            RegistryVersion::ThreeBinary => Self::three_binary(),
        }
    }

    fn trees_grass() -> Self {
        Self {
            version: RegistryVersion::TreesGrass,
            characteristics: vec![
                Characteristic::new(
                    "characteristic_x",
                    "Characteristic X - Tree Size",
                    &[0, 1, 2],
                ),
                Characteristic::new(
                    "characteristic_y",
                    "Characteristic Y - Grass Present",
                    &[0, 1],
                ),
            ],
            characteristics_per_scenario: 2,
            example_base_earnings: 100.0,
            decode_table: vec![
                DecodeEntry::new([2, 1, 1], [0, 0, 2, 1], imgs(IMG_BASELINE, IMG_LARGE_TREES_GRASS)),
                DecodeEntry::new([2, -1, 0], [0, 1, 2, 0], imgs(IMG_GRASS, IMG_LARGE_TREES)),
                DecodeEntry::new([2, 0, 0], [0, 0, 2, 0], imgs(IMG_BASELINE, IMG_LARGE_TREES)),
                DecodeEntry::new([2, 0, 1], [0, 1, 2, 1], imgs(IMG_GRASS, IMG_LARGE_TREES_GRASS)),
                DecodeEntry::new([1, 1, 1], [0, 0, 1, 1], imgs(IMG_BASELINE, IMG_SMALL_TREES_GRASS)),
                DecodeEntry::new([1, -1, 0], [0, 1, 1, 0], imgs(IMG_GRASS, IMG_SMALL_TREES)),
                DecodeEntry::new([1, 0, 0], [0, 0, 1, 0], imgs(IMG_BASELINE, IMG_SMALL_TREES)),
                DecodeEntry::new([1, 0, 1], [0, 1, 1, 1], imgs(IMG_GRASS, IMG_SMALL_TREES_GRASS)),
                DecodeEntry::new([0, 1, 0], [0, 0, 0, 1], imgs(IMG_BASELINE, IMG_GRASS)),
                DecodeEntry::new([0, 1, 1], [1, 0, 1, 1], imgs(IMG_SMALL_TREES, IMG_SMALL_TREES_GRASS)),
            ],
        }
    }

    fn three_binary() -> Self {
        Self {
            version: RegistryVersion::ThreeBinary,
            characteristics: vec![
                Characteristic::new("characteristic_x", "Characteristic X", &[0, 1]),
                Characteristic::new("characteristic_y", "Characteristic Y", &[0, 1]),
                Characteristic::new("characteristic_z", "Characteristic Z", &[0, 1]),
            ],
            characteristics_per_scenario: 2,
            example_base_earnings: 100.0,
            decode_table: vec![
                DecodeEntry::new([1, 1, 1], [0, 0, 1, 1], None),
                DecodeEntry::new([1, -1, 0], [0, 1, 1, 0], None),
                DecodeEntry::new([1, 0, 0], [0, 0, 1, 0], None),
                DecodeEntry::new([1, 0, 1], [0, 1, 1, 1], None),
                DecodeEntry::new([0, 1, 0], [0, 0, 0, 1], None),
                DecodeEntry::new([0, 1, 1], [1, 0, 1, 1], None),
            ],
        }
    }

    pub fn version(&self) -> RegistryVersion {
        self.version
    }

    /// Looks up a characteristic by key.
    pub fn get(&self, key: &str) -> Option<&Characteristic> {
        self.characteristics.iter().find(|c| c.key == key)
    }

    /// Registry keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.characteristics.iter().map(|c| c.key)
    }

    /// How many characteristics a respondent scenario draws.
    pub fn characteristics_per_scenario(&self) -> usize {
        self.characteristics_per_scenario
    }

    /// Base earnings used by test-mode output.
    pub fn example_base_earnings(&self) -> f64 {
        self.example_base_earnings
    }

    /// Resolves an exact `(d1, d2, d3)` pattern to its decode entry.
    pub fn lookup(&self, d1: i32, d2: i32, d3: i32) -> Option<&DecodeEntry> {
        self.decode_table
            .iter()
            .find(|entry| entry.pattern == [d1, d2, d3])
    }

    /// All decode table entries, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &DecodeEntry> {
        self.decode_table.iter()
    }
}
