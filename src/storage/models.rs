use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tables::COL_ID;

/// A metadata row: column name -> nullable text value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row(BTreeMap<String, Option<String>>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a column, `None` for both a missing column and SQL-style null.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|v| v.as_deref())
    }

    pub fn set(&mut self, field: impl Into<String>, value: Option<String>) {
        self.0.insert(field.into(), value);
    }

    pub fn id(&self) -> Option<&str> {
        self.get(COL_ID)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// Keep only the requested columns. Requested columns the row lacks come back as null.
    pub fn project(self, fields: &Fields<'_>) -> Row {
        match fields {
            Fields::All => self,
            Fields::Only(names) => {
                let mut out = Row::new();
                for name in names.iter() {
                    out.set(*name, self.get(name).map(|v| v.to_string()));
                }
                out
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        Row(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Column projection for `query`, the `"*"` / field-list of a SELECT.
#[derive(Debug, Clone, Copy)]
pub enum Fields<'a> {
    All,
    Only(&'a [&'a str]),
}

/// Row predicate. Values are bound, never spliced into a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Eq { field: String, value: String },
}

impl Condition {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Shorthand for the primary-key lookup every lifecycle operation uses.
    pub fn id(id: impl Into<String>) -> Self {
        Self::eq(COL_ID, id)
    }

    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Condition::Eq { field, value } => row.get(field) == Some(value.as_str()),
        }
    }

    /// The primary key this condition pins, if it is an id equality.
    pub fn primary_key(&self) -> Option<&str> {
        match self {
            Condition::Eq { field, value } if field == COL_ID => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }

    /// Nulls sort first, like most SQL engines do for ASC. Two integer values
    /// compare numerically, so epoch timestamps of different widths still order.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let ord = compare_values(a.get(&self.field), b.get(&self.field));
        match self.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    }
}

fn compare_values(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match (x.parse::<i64>(), y.parse::<i64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => x.cmp(y),
        },
        _ => a.cmp(&b),
    }
}
