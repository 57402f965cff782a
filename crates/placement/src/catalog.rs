//! Registry of placeable models and the alignments each one accepts
//!
//! The catalog is handed to the engine at construction. It is never
//! consulted through global state.

use crate::alignment::{Alignment, AlignmentSet};
use crate::error::{Error, Result};
use crate::object::ModelKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Catalog entry as written in a catalog TOML file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelEntry {
    pub name: ModelKind,
    pub alignments: AlignmentSet,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    model: Vec<ModelEntry>,
}

/// Static lookup from model kind to allowed alignments
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: BTreeMap<ModelKind, AlignmentSet>,
}

impl ModelCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the bundled models
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        let entries = [
            ("sticky note", AlignmentSet::BOTH),
            ("painting", AlignmentSet::VERTICAL),
            ("cup", AlignmentSet::HORIZONTAL),
            ("vase", AlignmentSet::HORIZONTAL),
            ("lamp", AlignmentSet::HORIZONTAL),
            ("chair", AlignmentSet::HORIZONTAL),
        ];
        for (name, alignments) in entries {
            catalog.models.insert(ModelKind::new(name), alignments);
        }
        catalog
    }

    /// Parse a catalog from TOML (`[[model]]` tables)
    pub fn from_toml(source: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(source)?;
        let mut catalog = Self::new();
        for entry in file.model {
            catalog.register(entry.name, entry.alignments)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&source)
    }

    /// Add a model kind
    pub fn register(&mut self, model: ModelKind, alignments: AlignmentSet) -> Result<()> {
        if self.models.contains_key(&model) {
            return Err(Error::DuplicateModel(model.to_string()));
        }
        self.models.insert(model, alignments);
        Ok(())
    }

    /// Alignments a model kind may be placed with
    pub fn allowed_alignments(&self, model: &ModelKind) -> Result<AlignmentSet> {
        self.models
            .get(model)
            .copied()
            .ok_or_else(|| Error::UnknownModel(model.to_string()))
    }

    /// Models that can be placed on a surface of the given alignment
    ///
    /// With no surface under the query point every model is offered.
    pub fn placeable_on(&self, surface: Option<Alignment>) -> impl Iterator<Item = &ModelKind> {
        self.models
            .iter()
            .filter(move |(_, allowed)| surface.map_or(true, |a| allowed.contains(a)))
            .map(|(model, _)| model)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
