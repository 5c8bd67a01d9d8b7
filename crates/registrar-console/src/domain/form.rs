//! Form field declarations and the editable values behind them.
//!
//! A page's form is declared as a list of [`FieldSpec`]s.  Scalar fields are
//! named by their field path (`domain:registrant`); repeated groups expose
//! one row per element, and each cell is named
//! `<group>[<row>].<column>`, e.g. `domain:contact[1].@type`.
//!
//! [`FormValues`] holds the current strings for every field.  Rows can be
//! appended and removed; removing a row shifts the following rows down so
//! cell names always use contiguous indexes starting at 0.

use indexmap::IndexMap;
use registrar_core::tree::{FieldPath, PathError};
use thiserror::Error;

/// Errors raised by form edits and by building a tree from a form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field \"{0}\"")]
    UnknownField(String),

    #[error("unknown repeated group \"{0}\"")]
    UnknownGroup(String),

    #[error("row {index} of \"{group}\" does not exist ({rows} rows)")]
    RowOutOfRange {
        group: String,
        index: usize,
        rows: usize,
    },

    /// A field that must be filled in is empty.
    #[error("\"{0}\" must be filled in")]
    Required(String),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Declaration of one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// One string at `path`.
    Scalar { path: FieldPath },
    /// One row per element stored under `path`; each column is a path
    /// relative to the row element.
    Group {
        path: FieldPath,
        columns: Vec<FieldPath>,
        /// Capacity a renderer may enforce on its add control.
        max_rows: Option<usize>,
    },
}

impl FieldSpec {
    pub fn scalar(path: &str) -> Result<Self, PathError> {
        Ok(FieldSpec::Scalar {
            path: path.parse()?,
        })
    }

    pub fn group(path: &str, columns: &[&str], max_rows: Option<usize>) -> Result<Self, PathError> {
        Ok(FieldSpec::Group {
            path: path.parse()?,
            columns: columns
                .iter()
                .map(|c| c.parse())
                .collect::<Result<_, _>>()?,
            max_rows,
        })
    }

    pub fn path(&self) -> &FieldPath {
        match self {
            FieldSpec::Scalar { path } | FieldSpec::Group { path, .. } => path,
        }
    }
}

/// Current values of one repeated group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupValues {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    max_rows: Option<usize>,
}

impl GroupValues {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order; each row has one string per column.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn max_rows(&self) -> Option<usize> {
        self.max_rows
    }
}

/// String values of every field on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    scalars: IndexMap<String, String>,
    groups: IndexMap<String, GroupValues>,
}

/// Opaque copy of [`FormValues`] taken when editing starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot(FormValues);

impl FormSnapshot {
    /// The values as they were when the snapshot was taken.
    pub fn values(&self) -> &FormValues {
        &self.0
    }
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_scalar(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.scalars.insert(name.into(), value.into());
    }

    /// Declares a group with its initial rows, replacing any group of the
    /// same name.  Short rows are padded with empty cells.
    pub fn insert_group(
        &mut self,
        name: impl Into<String>,
        columns: Vec<String>,
        mut rows: Vec<Vec<String>>,
        max_rows: Option<usize>,
    ) {
        for row in &mut rows {
            row.resize(columns.len(), String::new());
        }
        self.groups.insert(
            name.into(),
            GroupValues {
                columns,
                rows,
                max_rows,
            },
        );
    }

    /// Appends a row of cell values; missing trailing cells become empty.
    pub fn push_row(&mut self, group: &str, mut cells: Vec<String>) -> Result<usize, FormError> {
        let values = self.group_mut(group)?;
        cells.resize(values.columns.len(), String::new());
        values.rows.push(cells);
        Ok(values.rows.len() - 1)
    }

    pub fn scalars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.scalars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &GroupValues)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn group(&self, name: &str) -> Option<&GroupValues> {
        self.groups.get(name)
    }

    /// Every field name with its value, scalars first, then group cells
    /// row by row.
    pub fn fields(&self) -> Vec<(String, &str)> {
        let mut fields: Vec<(String, &str)> = self
            .scalars
            .iter()
            .map(|(k, v)| (k.clone(), v.as_str()))
            .collect();
        for (name, group) in &self.groups {
            for (row, cells) in group.rows.iter().enumerate() {
                for (column, value) in group.columns.iter().zip(cells) {
                    fields.push((format!("{name}[{row}].{column}"), value.as_str()));
                }
            }
        }
        fields
    }

    /// Reads a scalar field or a group cell.
    pub fn get(&self, field: &str) -> Option<&str> {
        if let Some(value) = self.scalars.get(field) {
            return Some(value);
        }
        let (group, row, column) = self.resolve_cell(field)?;
        self.groups
            .get(group)?
            .rows
            .get(row)?
            .get(column)
            .map(String::as_str)
    }

    /// Overwrites a scalar field or a group cell.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        if let Some(slot) = self.scalars.get_mut(field) {
            *slot = value.into();
            return Ok(());
        }
        let (group, row, column) = self
            .resolve_cell(field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        let group = group.to_string();
        let values = self.group_mut(&group)?;
        let rows = values.rows.len();
        let cells = values
            .rows
            .get_mut(row)
            .ok_or(FormError::RowOutOfRange {
                group: group.clone(),
                index: row,
                rows,
            })?;
        cells[column] = value.into();
        Ok(())
    }

    pub fn row_count(&self, group: &str) -> Result<usize, FormError> {
        self.groups
            .get(group)
            .map(|g| g.rows.len())
            .ok_or_else(|| FormError::UnknownGroup(group.to_string()))
    }

    /// `false` once a group with a capacity holds that many rows.
    pub fn can_add_row(&self, group: &str) -> bool {
        self.groups
            .get(group)
            .is_some_and(|g| g.max_rows.map_or(true, |max| g.rows.len() < max))
    }

    /// Appends an empty row and returns its index.
    pub fn add_row(&mut self, group: &str) -> Result<usize, FormError> {
        self.push_row(group, Vec::new())
    }

    /// Deletes row `index`; later rows move down by one.
    pub fn remove_row(&mut self, group: &str, index: usize) -> Result<(), FormError> {
        let values = self.group_mut(group)?;
        if index >= values.rows.len() {
            return Err(FormError::RowOutOfRange {
                group: group.to_string(),
                index,
                rows: values.rows.len(),
            });
        }
        values.rows.remove(index);
        Ok(())
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot(self.clone())
    }

    pub fn restore(&mut self, snapshot: FormSnapshot) {
        *self = snapshot.0;
    }

    fn group_mut(&mut self, group: &str) -> Result<&mut GroupValues, FormError> {
        self.groups
            .get_mut(group)
            .ok_or_else(|| FormError::UnknownGroup(group.to_string()))
    }

    /// Splits `<group>[<row>].<column>` into group name, row and column
    /// position.
    fn resolve_cell<'a>(&'a self, field: &str) -> Option<(&'a str, usize, usize)> {
        self.groups.iter().find_map(|(name, group)| {
            let rest = field.strip_prefix(name.as_str())?.strip_prefix('[')?;
            let (digits, rest) = rest.split_once(']')?;
            let row = digits.parse::<usize>().ok()?;
            let column = rest.strip_prefix('.')?;
            let position = group.columns.iter().position(|c| c == column)?;
            Some((name.as_str(), row, position))
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
