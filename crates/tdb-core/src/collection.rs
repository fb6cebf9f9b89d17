//! Ordered sets of curves of one kind belonging to one device element.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::curve::{CurveDataset, CurveKind};
use crate::error::{Error, Result};

/// Which sub-element of a transistor owns a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRole {
    Switch,
    Diode,
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRole::Switch => f.write_str("switch"),
            ElementRole::Diode => f.write_str("diode"),
        }
    }
}

/// Curves of a single kind for one element, in load order.
///
/// No two datasets share identical `(t_j, v_g, v_supply)`. The collection may
/// be empty; lookups on an empty collection fail with [`Error::MissingData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CollectionRecord")]
pub struct DatasetCollection {
    role: ElementRole,
    kind: CurveKind,
    datasets: Vec<CurveDataset>,
}

#[derive(Debug, Deserialize)]
struct CollectionRecord {
    role: ElementRole,
    kind: CurveKind,
    #[serde(default)]
    datasets: Vec<CurveDataset>,
}

impl TryFrom<CollectionRecord> for DatasetCollection {
    type Error = Error;

    fn try_from(record: CollectionRecord) -> Result<Self> {
        DatasetCollection::new(record.role, record.kind, record.datasets)
    }
}

impl DatasetCollection {
    /// Create a validated collection.
    pub fn new(role: ElementRole, kind: CurveKind, datasets: Vec<CurveDataset>) -> Result<Self> {
        if let Some(other) = datasets.iter().find(|d| d.kind() != kind) {
            return Err(Error::InvalidDataset(format!(
                "{role} {kind} collection contains a {} curve",
                other.kind()
            )));
        }

        for (i, a) in datasets.iter().enumerate() {
            if let Some(b) = datasets[i + 1..]
                .iter()
                .find(|b| b.conditions() == a.conditions())
            {
                return Err(Error::InvalidDataset(format!(
                    "{role} {kind} collection has two datasets at {}",
                    b.conditions()
                )));
            }
        }

        Ok(Self {
            role,
            kind,
            datasets,
        })
    }

    pub fn empty(role: ElementRole, kind: CurveKind) -> Self {
        Self {
            role,
            kind,
            datasets: Vec::new(),
        }
    }

    pub fn role(&self) -> ElementRole {
        self.role
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn datasets(&self) -> &[CurveDataset] {
        &self.datasets
    }

    /// The first dataset in load order.
    pub fn first(&self) -> Option<&CurveDataset> {
        self.datasets.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CurveDataset> {
        self.datasets.iter()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Error to report when this collection has nothing to offer.
    pub fn missing(&self) -> Error {
        Error::MissingData {
            role: self.role,
            kind: self.kind,
        }
    }
}

impl<'a> IntoIterator for &'a DatasetCollection {
    type Item = &'a CurveDataset;
    type IntoIter = std::slice::Iter<'a, CurveDataset>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.iter()
    }
}
