//! Cycle-indexed value tables.

use polars::prelude::{Column, DataFrame, DataType};

use crate::error::{CoreError, Result};

/// A table of numeric well columns sharing one cycle index.
///
/// The index is kept beside the `DataFrame` rather than inside it so that a
/// frame with no value columns still knows its row count and index name.
/// Missing values are stored as nulls.
#[derive(Debug, Clone)]
pub struct CycleFrame {
    index: Column,
    data: DataFrame,
}

impl CycleFrame {
    /// Create a frame from an index column and value columns of equal height.
    pub fn new(index: Column, data: DataFrame) -> Result<Self> {
        let index = index.cast(&DataType::Float64)?;
        for column in data.get_columns() {
            if column.len() != index.len() {
                return Err(CoreError::ColumnLength {
                    column: column.name().to_string(),
                    expected: index.len(),
                    found: column.len(),
                });
            }
        }
        Ok(Self { index, data })
    }

    /// Build a frame from plain vectors.
    pub fn from_values(
        index_name: &str,
        index: Vec<f64>,
        columns: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self> {
        let index = Column::new(index_name.into(), index);
        let mut data_columns = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if values.len() != index.len() {
                return Err(CoreError::ColumnLength {
                    column: name,
                    expected: index.len(),
                    found: values.len(),
                });
            }
            data_columns.push(Column::new(name.into(), values));
        }
        let data = DataFrame::new(data_columns)?;
        Ok(Self { index, data })
    }

    pub fn index_name(&self) -> &str {
        self.index.name().as_str()
    }

    pub fn index(&self) -> &Column {
        &self.index
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Number of rows (cycles).
    pub fn height(&self) -> usize {
        self.index.len()
    }

    /// Number of value columns.
    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    /// Value column names in frame order.
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|column| column.as_str() == name)
    }

    /// Index values; missing entries become NaN.
    pub fn index_values(&self) -> Result<Vec<f64>> {
        float_values(&self.index).map(|values| {
            values
                .into_iter()
                .map(|value| value.unwrap_or(f64::NAN))
                .collect()
        })
    }

    /// Values of one column, `None` where missing.
    pub fn column_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        float_values(self.data.column(name)?)
    }

    /// Values of one column with missing entries as NaN.
    pub fn column_values_nan(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self
            .column_values(name)?
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect())
    }

    /// Frame restricted to the listed columns that exist, in list order.
    ///
    /// Names not present in the frame are ignored, so an empty or
    /// non-matching list yields a frame with no value columns.
    pub fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let kept: Vec<Column> = names
            .iter()
            .filter_map(|name| self.data.column(name.as_ref()).ok())
            .cloned()
            .collect();
        Ok(Self {
            index: self.index.clone(),
            data: DataFrame::new(kept)?,
        })
    }

    /// Copy of this frame with every value column renamed by `rename`.
    pub fn rename_columns<F>(&self, mut rename: F) -> Result<Self>
    where
        F: FnMut(&str) -> String,
    {
        let columns: Vec<Column> = self
            .data
            .get_columns()
            .iter()
            .map(|column| {
                let mut renamed = column.clone();
                renamed.rename(rename(column.name().as_str()).into());
                renamed
            })
            .collect();
        Ok(Self {
            index: self.index.clone(),
            data: DataFrame::new(columns)?,
        })
    }

    /// Append the value columns of `other` after this frame's columns.
    ///
    /// Callers are responsible for checking that both frames share an index.
    pub(crate) fn hstack(&self, other: &Self) -> Result<Self> {
        let mut columns = self.data.get_columns().to_vec();
        columns.extend(other.data.get_columns().iter().cloned());
        Ok(Self {
            index: self.index.clone(),
            data: DataFrame::new(columns)?,
        })
    }

    /// Apply `f` to every column's values, producing `height` rows indexed by
    /// the first `height` index values.
    pub(crate) fn map_values<F>(&self, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(&[Option<f64>]) -> Vec<Option<f64>>,
    {
        let index = self.index.slice(0, height);
        let mut columns = Vec::with_capacity(self.width());
        for column in self.data.get_columns() {
            let values = f(&float_values(column)?);
            columns.push(Column::new(column.name().clone(), values));
        }
        Self::new(index, DataFrame::new(columns)?)
    }
}

fn float_values(column: &Column) -> Result<Vec<Option<f64>>> {
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CycleFrame {
        CycleFrame::from_values(
            "Cycle",
            vec![1.0, 2.0, 3.0],
            vec![
                ("A1_0".to_string(), vec![Some(1.0), Some(2.0), Some(4.0)]),
                ("B2_0".to_string(), vec![Some(0.5), None, Some(1.5)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn reports_shape_and_names() {
        let frame = sample();
        assert_eq!(frame.shape(), (3, 2));
        assert_eq!(frame.index_name(), "Cycle");
        assert_eq!(frame.column_names(), vec!["A1_0", "B2_0"]);
        assert_eq!(frame.index_values().unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(
            frame.column_values("B2_0").unwrap(),
            vec![Some(0.5), None, Some(1.5)]
        );
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = CycleFrame::from_values(
            "Cycle",
            vec![1.0, 2.0],
            vec![("A1_0".to_string(), vec![Some(1.0)])],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::ColumnLength { found: 1, .. }));
    }

    #[test]
    fn select_ignores_unknown_columns() {
        let frame = sample();
        let sliced = frame.select_columns(&["B2_0", "C3_0"]).unwrap();
        assert_eq!(sliced.column_names(), vec!["B2_0"]);
        assert_eq!(sliced.height(), 3);

        let none = frame.select_columns::<&str>(&[]).unwrap();
        assert_eq!(none.shape(), (3, 0));
        assert!(none.is_empty());
    }

    #[test]
    fn renames_columns() {
        let frame = sample()
            .rename_columns(|name| format!("{name}x"))
            .unwrap();
        assert_eq!(frame.column_names(), vec!["A1_0x", "B2_0x"]);
    }
}
