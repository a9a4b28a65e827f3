//! Column schema shared by every node variant and both views

/// Key of the computed duration column, compared numerically when sorting
pub const LENGTH_KEY: &str = "~length";

/// One column: display label plus accessor key passed to `Catalog::column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub key: String,
}

impl Column {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
        }
    }

    pub fn is_length(&self) -> bool {
        self.key == LENGTH_KEY
    }
}

/// Ordered list of columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<Column>,
}

impl ColumnSchema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }
}

impl Default for ColumnSchema {
    /// Title, Length, Artist
    fn default() -> Self {
        Self::new(vec![
            Column::new("Title", "title"),
            Column::new("Length", LENGTH_KEY),
            Column::new("Artist", "artist"),
        ])
    }
}

impl<'a> IntoIterator for &'a ColumnSchema {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
