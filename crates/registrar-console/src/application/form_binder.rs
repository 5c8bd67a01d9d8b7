//! Two-way binding between tree values and form fields.
//!
//! [`FormBinder::project`] turns an object tree (the content of an
//! `infData` element) into [`FormValues`]; [`FormBinder::collect`] turns
//! edited values back into a tree with the same shape the codec would
//! decode.
//!
//! ```text
//! <domain:contact type="admin">a</domain:contact>     domain:contact[0].value = "a"
//! <domain:contact type="tech">t</domain:contact>      domain:contact[0].@type = "admin"
//!                                                     domain:contact[1].value = "t"
//!                                                     domain:contact[1].@type = "tech"
//! ```
//!
//! Absent data projects to empty strings, and empty strings are left out
//! when collecting.  A repeated group collects one element per row, even
//! for a row whose cells are all empty.

use registrar_core::tree::{FieldPath, TreeValue};

use crate::domain::form::{FieldSpec, FormError, FormValues};

/// Projects and collects the fields of one page kind.
#[derive(Debug, Clone)]
pub struct FormBinder {
    specs: Vec<FieldSpec>,
}

impl FormBinder {
    pub fn new(specs: Vec<FieldSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    /// Reads every declared field out of `tree`.
    ///
    /// A repeated group gets exactly one row per element, in order.
    pub fn project(&self, tree: &TreeValue) -> FormValues {
        let mut values = FormValues::new();
        for spec in &self.specs {
            match spec {
                FieldSpec::Scalar { path } => {
                    values.insert_scalar(path.to_string(), path.read(tree).unwrap_or_default());
                }
                FieldSpec::Group {
                    path,
                    columns,
                    max_rows,
                } => {
                    let rows: Vec<Vec<String>> = path
                        .elements(tree)
                        .iter()
                        .map(|element| {
                            columns
                                .iter()
                                .map(|column| column.read(element).unwrap_or_default().to_string())
                                .collect()
                        })
                        .collect();
                    values.insert_group(
                        path.to_string(),
                        columns.iter().map(FieldPath::to_string).collect(),
                        rows,
                        *max_rows,
                    );
                }
            }
        }
        values
    }

    /// Builds a tree from `values`.
    ///
    /// # Errors
    ///
    /// [`FormError::Path`] when a cell cannot be placed, e.g. a second
    /// street line filled in while the first is empty.
    pub fn collect(&self, values: &FormValues) -> Result<TreeValue, FormError> {
        let mut tree = TreeValue::new();
        for spec in &self.specs {
            match spec {
                FieldSpec::Scalar { path } => {
                    let name = path.to_string();
                    match values.get(&name) {
                        Some(value) if !value.is_empty() => path.write(&mut tree, value)?,
                        _ => {}
                    }
                }
                FieldSpec::Group { path, columns, .. } => {
                    let name = path.to_string();
                    let Some(group) = values.group(&name) else {
                        continue;
                    };
                    let mut rows = Vec::with_capacity(group.rows().len());
                    for cells in group.rows() {
                        let mut row = TreeValue::new();
                        for (column, value) in columns.iter().zip(cells) {
                            if !value.is_empty() {
                                column.write(&mut row, value.as_str())?;
                            }
                        }
                        rows.push(row);
                    }
                    if !rows.is_empty() {
                        path.set_elements(&mut tree, rows)?;
                    }
                }
            }
        }
        Ok(tree)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
