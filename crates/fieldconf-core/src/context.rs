//! Override context handed to every processor
//!
//! Copyright (c) 2025 Fieldconf Team
//! Licensed under the Apache-2.0 license

use crate::types::{DataFrame, Field, ScopedVars};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Read-only bundle available while converting one override value
///
/// The caller builds a context per configuration-resolution call. Processors
/// only borrow it; nothing in this crate mutates the field or the series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverrideContext {
    /// The field currently being configured
    #[serde(default)]
    pub field: Field,

    /// Every data series available to the panel, in query order
    #[serde(default)]
    pub data: Vec<DataFrame>,
}

impl OverrideContext {
    /// Create a new override context
    pub fn new(field: Field, data: Vec<DataFrame>) -> Self {
        Self { field, data }
    }

    /// Context for a field with no surrounding data
    pub fn for_field(field: Field) -> Self {
        Self::new(field, Vec::new())
    }

    /// Append a data series
    pub fn with_frame(mut self, frame: DataFrame) -> Self {
        self.data.push(frame);
        self
    }

    /// Scoped variables of the current field, empty when the field has no state
    pub fn scoped_vars(&self) -> &ScopedVars {
        static EMPTY: OnceLock<ScopedVars> = OnceLock::new();
        self.field
            .scoped_vars()
            .unwrap_or_else(|| EMPTY.get_or_init(ScopedVars::new))
    }

    /// First field named `name`, scanning series in order
    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.data.iter().find_map(|frame| frame.field(name))
    }
}
