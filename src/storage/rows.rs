use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::{Condition, Row};
use super::tables::*;

impl Database {
    // ========================================================================
    // Row operations
    // ========================================================================

    /// Store a row under its id, replacing any existing row with that id
    pub fn put_row(&self, table: &str, row: &Row) -> Result<(), DatabaseError> {
        Self::check_table(table)?;
        let id = row
            .id()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DatabaseError::MissingPrimaryKey(table.to_string()))?;

        let write_txn = self.begin_write()?;
        {
            let mut t = write_txn.open_table(table_def(table))?;
            let data = rmp_serde::to_vec_named(row)?;
            t.insert(id, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a row by its id
    pub fn get_row(&self, table: &str, id: &str) -> Result<Option<Row>, DatabaseError> {
        Self::check_table(table)?;
        let read_txn = self.begin_read()?;
        let t = read_txn.open_table(table_def(table))?;

        match t.get(id)? {
            Some(data) => {
                let row: Row = rmp_serde::from_slice(data.value())?;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    /// Rows matching the condition, or every row when there is none.
    pub fn select_rows(
        &self,
        table: &str,
        condition: Option<&Condition>,
    ) -> Result<Vec<Row>, DatabaseError> {
        Self::check_table(table)?;
        let read_txn = self.begin_read()?;
        let t = read_txn.open_table(table_def(table))?;
        matching_rows(&t, condition)
    }

    /// Assign columns on every matching row. Returns the number of rows touched.
    pub fn update_rows(
        &self,
        table: &str,
        assignments: &[(&str, Option<String>)],
        condition: &Condition,
    ) -> Result<u64, DatabaseError> {
        Self::check_table(table)?;
        if assignments.iter().any(|(field, _)| *field == COL_ID) {
            return Err(DatabaseError::ImmutableKey(table.to_string()));
        }

        let write_txn = self.begin_write()?;
        let mut updated = 0;
        {
            let mut t = write_txn.open_table(table_def(table))?;
            let matching = matching_rows(&t, Some(condition))?;
            for mut row in matching {
                let Some(id) = row.id().map(|id| id.to_string()) else {
                    continue;
                };
                for (field, value) in assignments {
                    row.set(*field, value.clone());
                }
                let data = rmp_serde::to_vec_named(&row)?;
                t.insert(id.as_str(), data.as_slice())?;
                updated += 1;
            }
        }
        write_txn.commit()?;
        Ok(updated)
    }

    /// Delete every matching row. Returns the number of rows removed.
    pub fn delete_rows(&self, table: &str, condition: &Condition) -> Result<u64, DatabaseError> {
        Self::check_table(table)?;

        let write_txn = self.begin_write()?;
        let mut deleted = 0;
        {
            let mut t = write_txn.open_table(table_def(table))?;
            let ids: Vec<String> = matching_rows(&t, Some(condition))?
                .iter()
                .filter_map(|row| row.id().map(|id| id.to_string()))
                .collect();
            for id in &ids {
                if t.remove(id.as_str())?.is_some() {
                    deleted += 1;
                }
            }
        }
        write_txn.commit()?;
        Ok(deleted)
    }
}

/// Id equality goes straight to the key; anything else scans the table.
fn matching_rows<T>(table: &T, condition: Option<&Condition>) -> Result<Vec<Row>, DatabaseError>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    if let Some(id) = condition.and_then(|c| c.primary_key()) {
        return match table.get(id)? {
            Some(data) => Ok(vec![rmp_serde::from_slice(data.value())?]),
            None => Ok(Vec::new()),
        };
    }

    let mut rows = Vec::new();
    for result in table.iter()? {
        let (_, value) = result?;
        let row: Row = rmp_serde::from_slice(value.value())?;
        if condition.map_or(true, |c| c.matches(&row)) {
            rows.push(row);
        }
    }
    Ok(rows)
}
