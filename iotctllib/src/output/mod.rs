//! Output formatting: present items and lists as tables, JSON or YAML.
//!
//! This module is the presentation layer used by command handlers. It provides:
//!
//! - **TableGenerator**: field-definition driven text tables
//! - **Table**: the row buffer and renderer behind every text table
//! - **OutputFormat**: choice between table, JSON and YAML output
//! - **output_item_or_list**: the "show one or list all" flow shared by commands
//!
//! ## Example
//!
//! ```rust
//! use iotctllib::output::{DefaultTableGenerator, TableGenerator};
//! use iotctllib::fields::{FieldDefinition, FieldSpec};
//! use serde_json::json;
//!
//! let generator = DefaultTableGenerator::new(true);
//! let defs: Vec<FieldDefinition<serde_json::Value>> =
//!     vec!["name".into(), FieldSpec::prop("address.city").skip_empty().into()];
//! let items = vec![json!({"name": "A", "address": {"city": "X"}})];
//!
//! let table = generator.build_table_from_list(&items, &defs).unwrap();
//! assert!(table.contains("Name"));
//! assert!(table.contains("City"));
//! ```

pub mod generator;
pub mod table;

pub use generator::{DefaultTableGenerator, TableGenerator, LOGGER_NAME};
pub use table::{CellValue, Table, TableOptions};

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::IotctlError;
use crate::fields::FieldDefinition;
use crate::value::{lookup, string_from_value, to_data};
use crate::Result;

/// Printed instead of an empty list table.
pub const NO_ITEMS_FOUND: &str = "no items found";

/// Appended to list tables that shorten values.
pub const SUMMARIZED_TEXT: &str =
    "(Information is summarized, for full details use YAML, -y, or JSON flag, -j.)";

/// How command output is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable text table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(format!(
                "unknown output format '{}', expected table, json or yaml",
                other
            )),
        }
    }
}

/// What a command needs to show one item or a list of them.
pub struct OutputItemOrListConfig<T> {
    /// Property uniquely identifying an item
    pub primary_key_name: String,
    /// Property lists are sorted by
    pub sort_key_name: String,
    /// Fields of the single item table
    pub table_field_definitions: Vec<FieldDefinition<T>>,
    /// Columns of the list table
    pub list_table_field_definitions: Vec<FieldDefinition<T>>,
    /// List table shortens values; append [`SUMMARIZED_TEXT`] to it
    pub summarized: bool,
}

impl<T> OutputItemOrListConfig<T> {
    pub fn new(primary_key_name: impl Into<String>, sort_key_name: impl Into<String>) -> Self {
        Self {
            primary_key_name: primary_key_name.into(),
            sort_key_name: sort_key_name.into(),
            table_field_definitions: Vec::new(),
            list_table_field_definitions: Vec::new(),
            summarized: false,
        }
    }

    /// Builder: set the single item table fields
    pub fn table_fields(mut self, definitions: Vec<FieldDefinition<T>>) -> Self {
        self.table_field_definitions = definitions;
        self
    }

    /// Builder: set the list table columns
    pub fn list_fields(mut self, definitions: Vec<FieldDefinition<T>>) -> Self {
        self.list_table_field_definitions = definitions;
        self
    }

    /// Builder: mark the list table as summarized
    pub fn summarized(mut self, summarized: bool) -> Self {
        self.summarized = summarized;
        self
    }
}

fn with_summary_note(mut table: String, summarized: bool) -> String {
    if summarized {
        table.push('\n');
        table.push_str(SUMMARIZED_TEXT);
        table.push('\n');
    }
    table
}

fn to_json(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(IotctlError::Serialize)
}

fn to_yaml(value: &impl Serialize) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

/// Render one item.
pub fn format_item<T: Serialize>(
    generator: &impl TableGenerator,
    format: OutputFormat,
    item: &T,
    definitions: &[FieldDefinition<T>],
) -> Result<String> {
    match format {
        OutputFormat::Table => generator.build_table_from_item(item, definitions),
        OutputFormat::Json => to_json(item),
        OutputFormat::Yaml => to_yaml(item),
    }
}

/// Case-insensitive sort key for an item's structured form.
fn sort_key(data: &Value, sort_key_name: &str) -> String {
    lookup(data, sort_key_name)
        .first()
        .map(|value| string_from_value(value))
        .unwrap_or_default()
        .to_lowercase()
}

/// Render a list of items.
///
/// Items are sorted by the configured sort key. Table output gains a leading
/// `#` column holding each item's 1-based position.
pub fn format_list<T: Serialize>(
    generator: &impl TableGenerator,
    format: OutputFormat,
    config: &OutputItemOrListConfig<T>,
    items: Vec<T>,
) -> Result<String> {
    let mut entries = items
        .into_iter()
        .map(|item| to_data(&item).map(|data| (data, item)))
        .collect::<Result<Vec<_>>>()?;
    entries.sort_by_cached_key(|(data, _)| sort_key(data, &config.sort_key_name));

    match format {
        OutputFormat::Json => to_json(&entries.iter().map(|(_, item)| item).collect::<Vec<_>>()),
        OutputFormat::Yaml => to_yaml(&entries.iter().map(|(_, item)| item).collect::<Vec<_>>()),
        OutputFormat::Table if entries.is_empty() => Ok(format!("{}\n", NO_ITEMS_FOUND)),
        OutputFormat::Table => {
            // Labels are validated up front, same as the plain list table
            let mut head = vec!["#".to_string()];
            for definition in &config.list_table_field_definitions {
                head.push(definition.label()?);
            }

            let mut table =
                generator.new_output_table(Some(TableOptions::new().list().head(head)));
            for (index, (data, item)) in entries.iter().enumerate() {
                let mut row = vec![CellValue::from(index + 1)];
                for definition in &config.list_table_field_definitions {
                    row.push(generator.display_value_for(item, data, definition)?.into());
                }
                table.push(row);
            }
            Ok(with_summary_note(table.to_string(), config.summarized))
        }
    }
}

/// Show one item when `id` is given, otherwise list all of them.
///
/// `list_items` and `get_item` are only called for the branch that needs them.
pub fn output_item_or_list<T, L, G>(
    generator: &impl TableGenerator,
    format: OutputFormat,
    config: &OutputItemOrListConfig<T>,
    id: Option<&str>,
    list_items: L,
    get_item: G,
) -> Result<String>
where
    T: Serialize,
    L: FnOnce() -> Result<Vec<T>>,
    G: FnOnce(&str) -> Result<T>,
{
    match id {
        Some(id) => {
            let item = get_item(id)?;
            format_item(generator, format, &item, &config.table_field_definitions)
        }
        None => format_list(generator, format, config, list_items()?),
    }
}
