use std::fmt::Debug;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow};
use uuid::Uuid;
use validator::Validate;

use crate::entities::storage::Bucket;

/// Which generation of the content tables the server writes to.
///
/// `V1` keeps the legacy `position` / `degree` columns mirrored from `title`
/// so older readers keep working. `V2` writes `title` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    #[default]
    V1,
    V2,
}

impl SchemaVersion {
    pub fn writes_legacy_columns(self) -> bool {
        matches!(self, SchemaVersion::V1)
    }
}

/// A typed value destined for one column of an owned table.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(Option<String>),
    Int(Option<i32>),
    Bool(bool),
    Date(Option<NaiveDate>),
    TextList(Vec<String>),
}

impl ColumnValue {
    pub fn text(value: impl Into<String>) -> Self {
        ColumnValue::Text(Some(value.into()))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(value) => value.as_deref(),
            _ => None,
        }
    }
}

pub type Column = (&'static str, ColumnValue);

/// Looks a column up by name in a projection.
pub fn column<'a>(columns: &'a [Column], name: &str) -> Option<&'a ColumnValue> {
    columns.iter().find(|(col, _)| *col == name).map(|(_, value)| value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Many,
    OnePerOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub const fn asc(column: &'static str) -> Self {
        OrderBy { column, descending: false }
    }

    pub const fn desc(column: &'static str) -> Self {
        OrderBy { column, descending: true }
    }
}

/// Where an entity keeps its picture: the bucket files go to and the column
/// holding the public URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSlot {
    pub bucket: Bucket,
    pub column: &'static str,
}

/// One owner-scoped content table managed from the dashboard.
///
/// Implementors describe the table and how a validated form turns into
/// column values; the repository, use case, handlers and routes are shared.
pub trait OwnedEntity: Send + Sync + 'static {
    type Row: for<'r> FromRow<'r, PgRow> + Serialize + Clone + Debug + Send + Sync + Unpin + 'static;
    type Input: DeserializeOwned + Validate + Debug + Send + Sync + 'static;

    const TABLE: &'static str;
    const SINGULAR: &'static str;
    const PLURAL: &'static str;
    const CARDINALITY: Cardinality;
    const ORDER_BY: &'static [OrderBy];
    const IMAGE: Option<ImageSlot> = None;

    /// Projects validated input onto columns, applying derived-field rules.
    fn columns(input: &Self::Input, schema: SchemaVersion) -> Vec<Column>;

    fn id(row: &Self::Row) -> Uuid;

    fn owner(row: &Self::Row) -> Uuid;

    fn image_url(_row: &Self::Row) -> Option<&str> {
        None
    }
}

/// Renders the `ORDER BY` clause for an entity.
pub fn order_clause<E: OwnedEntity>() -> String {
    let parts: Vec<String> = E::ORDER_BY
        .iter()
        .map(|order| {
            let direction = if order.descending { "DESC" } else { "ASC" };
            format!("{} {}", order.column, direction)
        })
        .collect();

    if parts.is_empty() {
        "created_at DESC".to_string()
    } else {
        parts.join(", ")
    }
}
