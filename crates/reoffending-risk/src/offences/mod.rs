//! Offence-code reference data: the weighting table, its CSV loader and the
//! process-wide registry that swaps whole tables on reload.

mod parser;
mod registry;

pub use parser::{parse_table, OffenceTableError};
pub use registry::{FileOffenceSource, OffenceRegistry, OffenceSource, ReloadSummary};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

/// Instruments that read a per-offence coefficient from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingKind {
    General,
    Violent,
}

/// Classification flags carried by every offence code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OffenceFlags {
    pub violent: bool,
    pub sexual: bool,
    pub indecent_image: bool,
}

/// One row of the offence weighting table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffenceCode {
    pub code: String,
    pub category: String,
    pub sub_category: String,
    pub flags: OffenceFlags,
    weightings: BTreeMap<WeightingKind, f64>,
}

impl OffenceCode {
    pub fn new(
        code: impl Into<String>,
        category: impl Into<String>,
        sub_category: impl Into<String>,
        flags: OffenceFlags,
    ) -> Self {
        Self {
            code: code.into(),
            category: category.into(),
            sub_category: sub_category.into(),
            flags,
            weightings: BTreeMap::new(),
        }
    }

    pub fn with_weighting(mut self, kind: WeightingKind, coefficient: f64) -> Self {
        self.weightings.insert(kind, coefficient);
        self
    }

    /// `None` means the offence does not take part in that instrument's
    /// weighting, which is not the same as a zero coefficient.
    pub fn weighting(&self, kind: WeightingKind) -> Option<f64> {
        self.weightings.get(&kind).copied()
    }

    pub fn is_violent_or_sexual(&self) -> bool {
        self.flags.violent || self.flags.sexual
    }
}

/// Immutable snapshot of the offence reference data.
#[derive(Debug, Clone, Default)]
pub struct OffenceTable {
    generation: u64,
    offences: HashMap<String, OffenceCode>,
}

impl OffenceTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, OffenceTableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, OffenceTableError> {
        parse_table(reader)
    }

    pub fn from_offences(offences: impl IntoIterator<Item = OffenceCode>) -> Self {
        Self {
            generation: 0,
            offences: offences
                .into_iter()
                .map(|offence| (offence.code.clone(), offence))
                .collect(),
        }
    }

    pub fn lookup(&self, code: &str) -> Option<&OffenceCode> {
        self.offences.get(code.trim())
    }

    /// Offences in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &OffenceCode> {
        self.offences.values()
    }

    /// Reload counter assigned by the registry; 0 for tables never installed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.offences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offences.is_empty()
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }
}

/// Outcome of resolving an offence weighting, keeping "unknown code" apart
/// from "known code without this weighting".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightingLookup {
    Found(f64),
    NotWeighted,
    UnknownCode,
}

impl OffenceTable {
    pub fn weighting(&self, code: &str, kind: WeightingKind) -> WeightingLookup {
        match self.lookup(code) {
            None => WeightingLookup::UnknownCode,
            Some(offence) => match offence.weighting(kind) {
                Some(coefficient) => WeightingLookup::Found(coefficient),
                None => WeightingLookup::NotWeighted,
            },
        }
    }
}
