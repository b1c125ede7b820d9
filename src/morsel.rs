//! C2: `Morsel`, a row-batch of named columns — the unit every operator
//! pulls and pushes (spec §3.2/§4.2).

use std::sync::Arc;

use arrow::array::RecordBatch;

use crate::error::{Error, Result};
use crate::vector::{BoolMask, Vector};

/// A batch of equal-length named columns.
#[derive(Clone, Debug)]
pub struct Morsel {
    names: Arc<[String]>,
    columns: Vec<Vector>,
}

impl Morsel {
    /// Build from parallel name/column vectors. All columns must share the
    /// same row count.
    pub fn new(names: Vec<String>, columns: Vec<Vector>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(Error::ArityError {
                expected: names.len(),
                actual: columns.len(),
            });
        }
        if let Some(first) = columns.first() {
            let expected = first.length();
            for c in &columns {
                if c.length() != expected {
                    return Err(Error::LengthMismatch {
                        left: expected,
                        right: c.length(),
                    });
                }
            }
        }
        Ok(Self {
            names: Arc::from(names.into_boxed_slice()),
            columns,
        })
    }

    /// A zero-column, zero-row morsel (identity element for pipeline start).
    pub fn empty() -> Self {
        Self {
            names: Arc::from(Vec::new().into_boxed_slice()),
            columns: Vec::new(),
        }
    }

    pub fn from_arrow(batch: &RecordBatch) -> Result<Self> {
        let names: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        let columns = batch
            .columns()
            .iter()
            .map(Vector::from_arrow)
            .collect::<Result<Vec<_>>>()?;
        Self::new(names, columns)
    }

    /// Split a `RecordBatch` into morsels at most `rows_per_morsel` rows
    /// each. Rejects chunked/dictionary encodings that can't round-trip
    /// through the native `Vector` representations; callers should
    /// `concat_batches` upstream if they need a single contiguous batch.
    pub fn iter_from_arrow(batch: &RecordBatch, rows_per_morsel: usize) -> Result<Vec<Self>> {
        let total = batch.num_rows();
        if rows_per_morsel == 0 {
            return Err(Error::InvalidState("rows_per_morsel must be > 0".into()));
        }
        let mut out = Vec::with_capacity(total.div_ceil(rows_per_morsel).max(1));
        let mut offset = 0;
        while offset < total {
            let len = rows_per_morsel.min(total - offset);
            out.push(Self::from_arrow(&batch.slice(offset, len))?);
            offset += len;
        }
        if out.is_empty() {
            out.push(Self::from_arrow(batch)?);
        }
        Ok(out)
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Vector::length)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> &[Vector] {
        &self.columns
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        let mut found = None;
        for (i, n) in self.names.iter().enumerate() {
            if n == name {
                if found.is_some() {
                    return Err(Error::AmbiguousColumn(name.to_string()));
                }
                found = Some(i);
            }
        }
        found.ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&Vector> {
        Ok(&self.columns[self.index_of(name)?])
    }

    pub fn column_at(&self, i: usize) -> &Vector {
        &self.columns[i]
    }

    /// Gather rows by index (negative/out-of-range indices become all-null
    /// rows), one `take` per column.
    pub fn take(&self, indices: &[i32]) -> Self {
        Self {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
        }
    }

    /// Keep only the rows where `mask` is true.
    pub fn filter(&self, mask: &BoolMask) -> Self {
        self.take(&mask.true_indices())
    }

    /// Project down to the named columns, in the given order. Duplicate
    /// requested names are permitted (each resolves independently).
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let mut out_names = Vec::with_capacity(names.len());
        let mut out_columns = Vec::with_capacity(names.len());
        for &n in names {
            let i = self.index_of(n)?;
            out_names.push(self.names[i].clone());
            out_columns.push(self.columns[i].clone());
        }
        Ok(Self {
            names: Arc::from(out_names.into_boxed_slice()),
            columns: out_columns,
        })
    }

    pub fn rename(&self, new_names: Vec<String>) -> Result<Self> {
        if new_names.len() != self.columns.len() {
            return Err(Error::ArityError {
                expected: self.columns.len(),
                actual: new_names.len(),
            });
        }
        Ok(Self {
            names: Arc::from(new_names.into_boxed_slice()),
            columns: self.columns.clone(),
        })
    }

    pub fn with_column(&self, name: impl Into<String>, column: Vector) -> Result<Self> {
        if !self.columns.is_empty() && column.length() != self.num_rows() {
            return Err(Error::LengthMismatch {
                left: self.num_rows(),
                right: column.length(),
            });
        }
        let mut names: Vec<String> = self.names.to_vec();
        names.push(name.into());
        let mut columns = self.columns.clone();
        columns.push(column);
        Ok(Self {
            names: Arc::from(names.into_boxed_slice()),
            columns,
        })
    }

    pub fn slice(&self, offset: usize, length: usize) -> Self {
        Self {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.slice(offset, length)).collect(),
        }
    }

    /// Combined per-row hash over `columns` (or every column, if `None`),
    /// built by mixing each column's own `hash_into` contribution in order
    /// (spec §4.1).
    pub fn hash(&self, columns: Option<&[&str]>) -> Result<Vec<u64>> {
        let rows = self.num_rows();
        let mut out = vec![0u64; rows];
        match columns {
            Some(names) => {
                for &name in names {
                    self.column(name)?.hash_into(&mut out, 0);
                }
            }
            None => {
                for c in &self.columns {
                    c.hash_into(&mut out, 0);
                }
            }
        }
        Ok(out)
    }

    pub fn to_arrow(&self) -> Result<RecordBatch> {
        let fields: Vec<Arc<arrow::datatypes::Field>> = self
            .columns
            .iter()
            .zip(self.names.iter())
            .map(|(c, n)| {
                let array = c.to_arrow()?;
                Ok(Arc::new(arrow::datatypes::Field::new(
                    n,
                    array.data_type().clone(),
                    c.null_count() > 0,
                )))
            })
            .collect::<Result<Vec<_>>>()?;
        let arrays = self
            .columns
            .iter()
            .map(Vector::to_arrow)
            .collect::<Result<Vec<_>>>()?;
        RecordBatch::try_new(Arc::new(arrow::datatypes::Schema::new(fields)), arrays)
            .map_err(Error::from)
    }
}
