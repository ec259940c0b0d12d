//! Table generation from items and field definitions.
//!
//! The generator resolves labels and values for each [`FieldDefinition`] and
//! feeds them into a [`Table`]:
//!
//! - [`TableGenerator::build_table_from_item`] produces a two column
//!   label/value table with no header, honoring `include` and `skip_empty`
//! - [`TableGenerator::build_table_from_list`] produces a header row of
//!   labels followed by one row per item; every definition becomes a column

use std::cell::OnceCell;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn, Span};

use super::table::{CellValue, Table, TableOptions};
use crate::error::IotctlError;
use crate::fields::FieldDefinition;
use crate::value::{lookup, string_from_value, to_data};
use crate::Result;

/// Name of the logger the generator reports lookup anomalies under.
pub const LOGGER_NAME: &str = "table-manager";

/// Builds text tables from items.
pub trait TableGenerator {
    /// Create an empty table, applying `options` over the configured defaults.
    fn new_output_table(&self, options: Option<TableOptions>) -> Table;

    /// Display value for one field of an item.
    ///
    /// `data` is the structured form of `item`, used for property lookups.
    fn display_value_for<T>(
        &self,
        item: &T,
        data: &Value,
        definition: &FieldDefinition<T>,
    ) -> Result<Option<String>>;

    /// Build a label/value table describing one item.
    fn build_table_from_item<T: Serialize>(
        &self,
        item: &T,
        definitions: &[FieldDefinition<T>],
    ) -> Result<String>;

    /// Build a table with a header row and one row per item.
    fn build_table_from_list<T: Serialize>(
        &self,
        items: &[T],
        definitions: &[FieldDefinition<T>],
    ) -> Result<String>;
}

/// Standard [`TableGenerator`] whose only setting is row grouping.
#[derive(Debug, Default)]
pub struct DefaultTableGenerator {
    group_rows: bool,
    logger: OnceCell<Span>,
}

impl DefaultTableGenerator {
    pub fn new(group_rows: bool) -> Self {
        Self {
            group_rows,
            logger: OnceCell::new(),
        }
    }

    /// Configured row grouping default.
    pub fn group_rows(&self) -> bool {
        self.group_rows
    }

    fn logger(&self) -> &Span {
        self.logger
            .get_or_init(|| tracing::debug_span!(target: LOGGER_NAME, "table_generator"))
    }
}

impl TableGenerator for DefaultTableGenerator {
    fn new_output_table(&self, options: Option<TableOptions>) -> Table {
        let configured = TableOptions::new().group_rows(self.group_rows);
        match options {
            Some(options) => Table::new(options.merged_over(configured)),
            None => Table::new(configured),
        }
    }

    fn display_value_for<T>(
        &self,
        item: &T,
        data: &Value,
        definition: &FieldDefinition<T>,
    ) -> Result<Option<String>> {
        if let Some(value) = definition.value_fn() {
            return Ok(value(item));
        }

        let path = definition
            .prop_path()
            .ok_or_else(IotctlError::missing_prop)?;

        let matches = lookup(data, path);
        match matches.as_slice() {
            [] => {
                self.logger().in_scope(|| {
                    debug!(target: LOGGER_NAME, "did not find match for {} in {}", path, data)
                });
                Ok(Some(String::new()))
            }
            [single] => Ok(Some(string_from_value(single))),
            many => {
                self.logger().in_scope(|| {
                    warn!(target: LOGGER_NAME, "found more than one match for {} in {}", path, data)
                });
                let joined = many
                    .iter()
                    .map(|value| string_from_value(value))
                    .collect::<Vec<_>>()
                    .join(", ");
                Ok(Some(joined))
            }
        }
    }

    fn build_table_from_item<T: Serialize>(
        &self,
        item: &T,
        definitions: &[FieldDefinition<T>],
    ) -> Result<String> {
        let data = to_data(item)?;
        let mut table = self.new_output_table(None);

        for definition in definitions {
            if !definition.is_included(item) {
                continue;
            }
            let value = self.display_value_for(item, &data, definition)?;
            if definition.skips_empty() && value.as_deref().map_or(true, str::is_empty) {
                continue;
            }
            table.push([CellValue::from(definition.label()?), CellValue::from(value)]);
        }

        Ok(table.to_string())
    }

    fn build_table_from_list<T: Serialize>(
        &self,
        items: &[T],
        definitions: &[FieldDefinition<T>],
    ) -> Result<String> {
        let heading_labels = definitions
            .iter()
            .map(FieldDefinition::label)
            .collect::<Result<Vec<_>>>()?;
        let mut table = self.new_output_table(Some(TableOptions::new().list().head(heading_labels)));

        for item in items {
            let data = to_data(item)?;
            let row = definitions
                .iter()
                .map(|definition| self.display_value_for(item, &data, definition))
                .collect::<Result<Vec<_>>>()?;
            table.push(row);
        }

        Ok(table.to_string())
    }
}
