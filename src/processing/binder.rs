use crate::schema::RecordSchema;

/// Header position of every schema field, resolved once per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: Vec<Option<usize>>,
}

impl ColumnIndex {
    /// Exact, case-sensitive match; with duplicate headers the leftmost one wins.
    pub fn bind(schema: &RecordSchema, headers: &[String]) -> Self {
        let positions = schema
            .fields()
            .iter()
            .map(|field| headers.iter().position(|h| *h == field.column))
            .collect();
        Self { positions }
    }

    /// Header position of the field at schema index `field`; `None` when unresolved.
    pub fn position(&self, field: usize) -> Option<usize> {
        self.positions.get(field).copied().flatten()
    }

    /// Cell of `row` for the field at schema index `field`; `""` when unresolved.
    pub fn cell<'r>(&self, row: &'r [String], field: usize) -> &'r str {
        self.position(field)
            .and_then(|p| row.get(p))
            .map_or("", String::as_str)
    }
}
