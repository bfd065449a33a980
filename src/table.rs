//! Tabular sources for the model-bound batch setters.
//!
//! Rows are node indices and columns are attributes. Lookups are one-shot;
//! nothing stays bound to the source.

use slint::{Model, ModelRc, VecModel};

pub trait TableSource<T> {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    fn cell(&self, row: usize, column: usize) -> Option<T>;
}

impl<T: Clone> TableSource<T> for [Vec<T>] {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn column_count(&self) -> usize {
        self.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn cell(&self, row: usize, column: usize) -> Option<T> {
        self.get(row)?.get(column).cloned()
    }
}

impl<T: Clone> TableSource<T> for Vec<Vec<T>> {
    fn row_count(&self) -> usize {
        self.as_slice().row_count()
    }

    fn column_count(&self) -> usize {
        self.as_slice().column_count()
    }

    fn cell(&self, row: usize, column: usize) -> Option<T> {
        self.as_slice().cell(row, column)
    }
}

/// A Slint model of row models, as bound from a `[[T]]` property.
impl<T: Clone + 'static> TableSource<T> for VecModel<ModelRc<T>> {
    fn row_count(&self) -> usize {
        Model::row_count(self)
    }

    fn column_count(&self) -> usize {
        self.iter().map(|row| row.row_count()).max().unwrap_or(0)
    }

    fn cell(&self, row: usize, column: usize) -> Option<T> {
        self.row_data(row)?.row_data(column)
    }
}
