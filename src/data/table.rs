//! Text snapshot of a DataFrame for the data table widget.

use polars::prelude::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TablePreview {
    /// Render every cell as display text. Nulls become empty strings.
    pub fn from_frame(df: &DataFrame) -> Self {
        let headers = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let columns = df.get_columns();
        let rows = (0..df.height())
            .map(|i| {
                columns
                    .iter()
                    .map(|col| col.get(i).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_text(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{read_csv_bytes, DataProcessor};

    #[test]
    fn test_preview_has_all_columns() {
        let raw = read_csv_bytes(b"Name,Subject,Marks,Room\nAlice,Math,95,\n".to_vec()).unwrap();
        let (df, _) = DataProcessor::prepare(&raw).unwrap();
        let table = TablePreview::from_frame(&df);
        assert_eq!(
            table.headers,
            vec!["Name", "Subject", "Marks", "Room", "Grade", "Remarks"]
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][0], "Alice");
        assert_eq!(table.rows[0][3], "");
        assert_eq!(table.rows[0][4], "A+");
    }
}
