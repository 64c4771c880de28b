use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::schema::{order_clause, Column, ColumnValue, OwnedEntity},
    errors::AppError,
    repositories::sqlx_repo::SqlxContentRepo,
};

/// Persistence for one owned content table. Every call is scoped to `owner`.
#[async_trait]
pub trait ContentRepository<E: OwnedEntity>: Send + Sync {
    async fn list_for_owner(&self, owner: &Uuid, limit: i64) -> Result<Vec<E::Row>, AppError>;
    async fn find_for_owner(&self, id: &Uuid, owner: &Uuid) -> Result<Option<E::Row>, AppError>;
    async fn find_single(&self, owner: &Uuid) -> Result<Option<E::Row>, AppError>;
    async fn insert(&self, owner: &Uuid, columns: &[Column]) -> Result<E::Row, AppError>;
    async fn update(&self, id: &Uuid, owner: &Uuid, columns: &[Column]) -> Result<E::Row, AppError>;
    async fn upsert_single(&self, owner: &Uuid, columns: &[Column]) -> Result<E::Row, AppError>;
    async fn delete(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError>;
    /// Every stored image URL in the table, across owners.
    async fn image_urls(&self) -> Result<Vec<String>, AppError>;
}

impl SqlxContentRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContentRepo { pool }
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &ColumnValue) {
    match value.clone() {
        ColumnValue::Text(v) => builder.push_bind(v),
        ColumnValue::Int(v) => builder.push_bind(v),
        ColumnValue::Bool(v) => builder.push_bind(v),
        ColumnValue::Date(v) => builder.push_bind(v),
        ColumnValue::TextList(v) => builder.push_bind(v),
    };
}

fn push_assignments(builder: &mut QueryBuilder<'_, Postgres>, columns: &[Column]) {
    for (name, value) in columns {
        builder.push(*name).push(" = ");
        push_value(builder, value);
        builder.push(", ");
    }
    builder.push("updated_at = NOW()");
}

#[async_trait]
impl<E: OwnedEntity> ContentRepository<E> for SqlxContentRepo {
    async fn list_for_owner(&self, owner: &Uuid, limit: i64) -> Result<Vec<E::Row>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {} WHERE user_id = ", E::TABLE));
        builder
            .push_bind(*owner)
            .push(format!(" ORDER BY {} LIMIT ", order_clause::<E>()))
            .push_bind(limit);

        let rows = builder.build_query_as::<E::Row>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_for_owner(&self, id: &Uuid, owner: &Uuid) -> Result<Option<E::Row>, AppError> {
        let row = sqlx::query_as::<_, E::Row>(&format!(
            "SELECT * FROM {} WHERE id = $1 AND user_id = $2",
            E::TABLE
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_single(&self, owner: &Uuid) -> Result<Option<E::Row>, AppError> {
        let row = sqlx::query_as::<_, E::Row>(&format!(
            "SELECT * FROM {} WHERE user_id = $1 ORDER BY {} LIMIT 1",
            E::TABLE,
            order_clause::<E>()
        ))
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert(&self, owner: &Uuid, columns: &[Column]) -> Result<E::Row, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} (user_id", E::TABLE));
        for (name, _) in columns {
            builder.push(", ").push(*name);
        }
        builder.push(") VALUES (").push_bind(*owner);
        for (_, value) in columns {
            builder.push(", ");
            push_value(&mut builder, value);
        }
        builder.push(") RETURNING *");

        let row = builder.build_query_as::<E::Row>().fetch_one(&self.pool).await?;
        Ok(row)
    }

    async fn update(&self, id: &Uuid, owner: &Uuid, columns: &[Column]) -> Result<E::Row, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", E::TABLE));
        push_assignments(&mut builder, columns);
        builder
            .push(" WHERE id = ")
            .push_bind(*id)
            .push(" AND user_id = ")
            .push_bind(*owner)
            .push(" RETURNING *");

        builder
            .build_query_as::<E::Row>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", E::SINGULAR)))
    }

    async fn upsert_single(&self, owner: &Uuid, columns: &[Column]) -> Result<E::Row, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} (user_id", E::TABLE));
        for (name, _) in columns {
            builder.push(", ").push(*name);
        }
        builder.push(") VALUES (").push_bind(*owner);
        for (_, value) in columns {
            builder.push(", ");
            push_value(&mut builder, value);
        }
        builder.push(") ON CONFLICT (user_id) DO UPDATE SET ");
        for (name, _) in columns {
            builder.push(format!("{name} = EXCLUDED.{name}, "));
        }
        builder.push("updated_at = NOW() RETURNING *");

        let row = builder.build_query_as::<E::Row>().fetch_one(&self.pool).await?;
        Ok(row)
    }

    async fn delete(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", E::TABLE))
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{} not found", E::SINGULAR)));
        }

        Ok(())
    }

    async fn image_urls(&self) -> Result<Vec<String>, AppError> {
        let Some(slot) = E::IMAGE else {
            return Ok(Vec::new());
        };

        let urls: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT {col} FROM {table} WHERE {col} IS NOT NULL",
            col = slot.column,
            table = E::TABLE
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(urls)
    }
}
