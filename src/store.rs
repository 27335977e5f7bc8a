// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Persistence contract for the registry and the bundled JSON-backed store

use crate::error::StoreError;
use crate::types::{Section, Stack, Yard};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name of the depot store inside the data directory
pub const DEPOT_FILE: &str = "depot.json";

/// What the registry needs from a persistence layer.
///
/// Queries only ever return active sections and stacks. `commit` upserts a
/// batch of stack records by ID and must apply all of them or none.
pub trait StackStore {
    /// Yard by ID
    fn yard(&self, yard_id: &str) -> Result<Option<Yard>, StoreError>;

    /// Active sections of a yard, in insertion order
    fn active_sections(&self, yard_id: &str) -> Result<Vec<Section>, StoreError>;

    /// Active stacks of a yard
    fn active_stacks(&self, yard_id: &str) -> Result<Vec<Stack>, StoreError>;

    /// Stack by ID, active or not
    fn stack(&self, stack_id: &str) -> Result<Option<Stack>, StoreError>;

    /// Number of stack records ever stored for a yard, soft-deleted included
    fn stack_sequence(&self, yard_id: &str) -> Result<usize, StoreError>;

    /// Atomically upsert a batch of stacks
    fn commit(&mut self, batch: Vec<Stack>) -> Result<(), StoreError>;
}

/// In-memory depot data, persisted as a single JSON document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepotStore {
    /// All yards
    #[serde(default)]
    pub yards: Vec<Yard>,
    /// All sections
    #[serde(default)]
    pub sections: Vec<Section>,
    /// All stacks, soft-deleted included
    #[serde(default)]
    pub stacks: Vec<Stack>,
}

impl DepotStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from a data directory, empty if the file does not exist
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(DEPOT_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Save the store to a data directory.
    ///
    /// Writes to a temporary file first so a crash never leaves a truncated
    /// document behind.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        let path = dir.join(DEPOT_FILE);
        let tmp = dir.join(format!("{DEPOT_FILE}.tmp"));

        let json = serde_json::to_string_pretty(self).context("Failed to serialize depot")?;
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        Ok(())
    }

    /// Register a yard
    pub fn add_yard(&mut self, yard: Yard) -> Result<(), StoreError> {
        if self.yards.iter().any(|y| y.id == yard.id) {
            return Err(StoreError::DuplicateId(yard.id));
        }
        self.yards.push(yard);
        Ok(())
    }

    /// Register a section under an existing yard
    pub fn add_section(&mut self, section: Section) -> Result<(), StoreError> {
        if !self.yards.iter().any(|y| y.id == section.yard_id) {
            return Err(StoreError::UnknownYard(section.yard_id));
        }
        if self.sections.iter().any(|s| s.id == section.id) {
            return Err(StoreError::DuplicateId(section.id));
        }
        self.sections.push(section);
        Ok(())
    }

    /// Find a yard by ID or code (case-insensitive)
    #[must_use]
    pub fn find_yard(&self, id_or_code: &str) -> Option<&Yard> {
        self.yards
            .iter()
            .find(|y| y.id == id_or_code || y.code.eq_ignore_ascii_case(id_or_code))
    }

    /// Find an active section of a yard by ID or name (case-insensitive)
    #[must_use]
    pub fn find_section(&self, yard_id: &str, id_or_name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| {
            s.yard_id == yard_id
                && s.is_active
                && (s.id == id_or_name || s.name.eq_ignore_ascii_case(id_or_name))
        })
    }
}

impl StackStore for DepotStore {
    fn yard(&self, yard_id: &str) -> Result<Option<Yard>, StoreError> {
        Ok(self.yards.iter().find(|y| y.id == yard_id).cloned())
    }

    fn active_sections(&self, yard_id: &str) -> Result<Vec<Section>, StoreError> {
        Ok(self
            .sections
            .iter()
            .filter(|s| s.yard_id == yard_id && s.is_active)
            .cloned()
            .collect())
    }

    fn active_stacks(&self, yard_id: &str) -> Result<Vec<Stack>, StoreError> {
        Ok(self
            .stacks
            .iter()
            .filter(|s| s.yard_id == yard_id && s.is_active)
            .cloned()
            .collect())
    }

    fn stack(&self, stack_id: &str) -> Result<Option<Stack>, StoreError> {
        Ok(self.stacks.iter().find(|s| s.id == stack_id).cloned())
    }

    fn stack_sequence(&self, yard_id: &str) -> Result<usize, StoreError> {
        Ok(self.stacks.iter().filter(|s| s.yard_id == yard_id).count())
    }

    fn commit(&mut self, batch: Vec<Stack>) -> Result<(), StoreError> {
        // Reject the whole batch before touching anything
        if let Some(orphan) = batch
            .iter()
            .find(|s| !self.yards.iter().any(|y| y.id == s.yard_id))
        {
            return Err(StoreError::UnknownYard(orphan.yard_id.clone()));
        }

        for stack in batch {
            match self.stacks.iter_mut().find(|s| s.id == stack.id) {
                Some(existing) => *existing = stack,
                None => self.stacks.push(stack),
            }
        }
        Ok(())
    }
}
