//! # iotctllib
//!
//! Presentation layer for an IoT platform management CLI: turns fetched
//! resources into text tables, JSON or YAML.
//!
//! ## Overview
//!
//! Command handlers describe what to show with a list of field definitions.
//! A field is either a bare property path (`"maxValue"`, `"definition.minimum"`)
//! whose heading is derived from the name, or a [`FieldSpec`] with an
//! explicit label, a value extractor, an inclusion predicate or a
//! skip-when-empty flag.
//!
//! - **Fields**: label derivation and field definitions ([`fields`])
//! - **Values**: nested path lookup and stringification ([`value`])
//! - **Output**: the table generator, table renderer and output formats ([`output`])
//! - **Resources**: models and field tables for apps, channels and device preferences
//! - **Client**: the list/get seam commands fetch data through
//! - **Config**: profile settings such as row grouping
//!
//! ## Example
//!
//! ```rust
//! use iotctllib::{DefaultTableGenerator, FieldDefinition, FieldSpec, TableGenerator};
//! use serde_json::json;
//!
//! let generator = DefaultTableGenerator::new(true);
//! let item = json!({"title": "Volume", "maxValue": 10, "isActive": true});
//! let fields: Vec<FieldDefinition<serde_json::Value>> = vec![
//!     "title".into(),
//!     "maxValue".into(),
//!     "isActive".into(),
//!     FieldSpec::prop("minValue").skip_empty().into(),
//! ];
//!
//! let table = generator.build_table_from_item(&item, &fields).unwrap();
//! assert!(table.contains("Max Value"));
//! assert!(table.contains("Active"));
//! assert!(!table.contains("Min Value"));
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod output;
pub mod resources;
pub mod value;

pub use client::{ResourceApi, Snapshot, SnapshotClient};
pub use config::{CliConfig, Profile, DEFAULT_PROFILE};
pub use error::IotctlError;
pub use fields::{convert_to_label, FieldDefinition, FieldSpec};
pub use output::{
    format_item, format_list, output_item_or_list, CellValue, DefaultTableGenerator,
    OutputFormat, OutputItemOrListConfig, Table, TableGenerator, TableOptions, NO_ITEMS_FOUND,
    SUMMARIZED_TEXT,
};
pub use value::{lookup, string_from_value, to_data};

/// Result type for iotctllib operations
pub type Result<T> = std::result::Result<T, IotctlError>;
