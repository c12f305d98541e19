use async_trait::async_trait;

use super::db::{Database, DatabaseError};
use super::models::{Condition, Fields, Order, Row};

/// Relational-style metadata store consumed by the content manager.
///
/// Shaped like the table/fields/condition calls of a SQL helper layer, but with
/// bound [`Condition`] values instead of literal predicate strings. There are no
/// transactions spanning calls.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn query(
        &self,
        table: &str,
        fields: Fields<'_>,
        condition: Option<&Condition>,
        order: Option<&Order>,
    ) -> Result<Vec<Row>, DatabaseError>;

    /// Insert a row; a row with the same id is overwritten.
    async fn insert(
        &self,
        table: &str,
        fields: &[&str],
        values: &[Option<String>],
    ) -> Result<(), DatabaseError>;

    async fn update(
        &self,
        table: &str,
        fields: &[&str],
        values: &[Option<String>],
        condition: &Condition,
    ) -> Result<(), DatabaseError>;

    async fn delete(&self, table: &str, condition: &Condition) -> Result<(), DatabaseError>;
}

fn check_arity(fields: &[&str], values: &[Option<String>]) -> Result<(), DatabaseError> {
    if fields.len() != values.len() {
        return Err(DatabaseError::FieldMismatch {
            fields: fields.len(),
            values: values.len(),
        });
    }
    Ok(())
}

#[async_trait]
impl MetadataStore for Database {
    async fn query(
        &self,
        table: &str,
        fields: Fields<'_>,
        condition: Option<&Condition>,
        order: Option<&Order>,
    ) -> Result<Vec<Row>, DatabaseError> {
        let mut rows = self.select_rows(table, condition)?;
        if let Some(order) = order {
            rows.sort_by(|a, b| order.compare(a, b));
        }
        Ok(rows.into_iter().map(|row| row.project(&fields)).collect())
    }

    async fn insert(
        &self,
        table: &str,
        fields: &[&str],
        values: &[Option<String>],
    ) -> Result<(), DatabaseError> {
        check_arity(fields, values)?;
        let row: Row = fields
            .iter()
            .map(|f| f.to_string())
            .zip(values.iter().cloned())
            .collect();
        self.put_row(table, &row)
    }

    async fn update(
        &self,
        table: &str,
        fields: &[&str],
        values: &[Option<String>],
        condition: &Condition,
    ) -> Result<(), DatabaseError> {
        check_arity(fields, values)?;
        let assignments: Vec<(&str, Option<String>)> =
            fields.iter().copied().zip(values.iter().cloned()).collect();
        let updated = self.update_rows(table, &assignments, condition)?;
        tracing::trace!(table, updated, "Updated metadata rows");
        Ok(())
    }

    async fn delete(&self, table: &str, condition: &Condition) -> Result<(), DatabaseError> {
        let deleted = self.delete_rows(table, condition)?;
        tracing::trace!(table, deleted, "Deleted metadata rows");
        Ok(())
    }
}
