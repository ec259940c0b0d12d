//! Text table buffer and renderer.
//!
//! A [`Table`] accumulates rows of raw [`CellValue`]s and renders them as a
//! fixed-width block. Borders are blank except for horizontal rules drawn
//! with `─`. Where the rules go depends on the table shape:
//!
//! - every table: above the first row and below the last
//! - single item tables: also after the first row
//! - list tables with grouped rows: also after the header and then after
//!   every fifth data row

use std::fmt;

use unicode_width::UnicodeWidthStr;

const RULE: &str = "─";

/// Rows between rules when rows are grouped.
const GROUP_SIZE: usize = 5;

/// A single cell before stringification.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Capture any value with a custom string conversion.
    pub fn display(value: impl fmt::Display) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Float(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::Text(value.clone())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        i64::try_from(value)
            .map(CellValue::Integer)
            .unwrap_or_else(|_| CellValue::Text(value.to_string()))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

/// Caller supplied table options; unset fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Separate groups of rows with a rule to make long rows easier to follow.
    pub group_rows: Option<bool>,
    /// Header row seeded as the first row.
    pub head: Option<Vec<String>>,
    /// Whether this is a list table (header plus one row per item).
    pub is_list: Option<bool>,
}

impl TableOptions {
    /// Create with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set row grouping
    pub fn group_rows(mut self, group_rows: bool) -> Self {
        self.group_rows = Some(group_rows);
        self
    }

    /// Builder: set the header row
    pub fn head<S: Into<String>>(mut self, head: impl IntoIterator<Item = S>) -> Self {
        self.head = Some(head.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: mark as a list table
    pub fn list(mut self) -> Self {
        self.is_list = Some(true);
        self
    }

    /// Fill every unset field from `base`.
    pub fn merged_over(self, base: TableOptions) -> Self {
        Self {
            group_rows: self.group_rows.or(base.group_rows),
            head: self.head.or(base.head),
            is_list: self.is_list.or(base.is_list),
        }
    }
}

/// Row buffer that renders to a text table.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Vec<CellValue>>,
    group_rows: bool,
    is_list: bool,
}

impl Table {
    /// Create a table, seeding the header row when `head` is set.
    pub fn new(options: TableOptions) -> Self {
        let rows = options
            .head
            .map(|head| vec![head.into_iter().map(CellValue::Text).collect()])
            .unwrap_or_default();

        Table {
            rows,
            group_rows: options.group_rows.unwrap_or(false),
            is_list: options.is_list.unwrap_or(false),
        }
    }

    /// Append a row.
    pub fn push<C: Into<CellValue>>(&mut self, row: impl IntoIterator<Item = C>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows have been added.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a rule is drawn before row `index` (`index == len` is the bottom).
    fn draws_rule_at(&self, index: usize) -> bool {
        let total = self.rows.len();
        if index == 0 || index == total {
            return true;
        }
        match (self.is_list, self.group_rows) {
            (false, _) => index == 1,
            (true, true) => (index - 1) % GROUP_SIZE == 0,
            (true, false) => false,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return Ok(());
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for row in &cells {
            for (column, cell) in row.iter().enumerate() {
                let widest = cell.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
                widths[column] = widths[column].max(widest);
            }
        }

        // Each cell has one space of padding on either side
        let rule = RULE.repeat(widths.iter().map(|w| w + 2).sum());

        for (index, row) in cells.iter().enumerate() {
            if self.draws_rule_at(index) {
                writeln!(f, "{}", rule)?;
            }

            let split: Vec<Vec<&str>> = row.iter().map(|cell| cell.lines().collect()).collect();
            let height = split.iter().map(Vec::len).max().unwrap_or(0).max(1);

            for line in 0..height {
                let mut text = String::new();
                for (column, width) in widths.iter().enumerate() {
                    let content = split
                        .get(column)
                        .and_then(|lines| lines.get(line))
                        .copied()
                        .unwrap_or("");
                    let padding = width - UnicodeWidthStr::width(content);
                    text.push(' ');
                    text.push_str(content);
                    text.push_str(&" ".repeat(padding + 1));
                }
                writeln!(f, "{}", text)?;
            }
        }

        if self.draws_rule_at(self.rows.len()) {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
