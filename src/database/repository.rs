use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Drink;

/// Typed access to the `drinks` table.
pub struct DrinkRepository {
    pool: PgPool,
}

impl DrinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Drink>, DatabaseError> {
        let drinks = sqlx::query_as::<_, Drink>("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(drinks)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Drink>, DatabaseError> {
        let drink = sqlx::query_as::<_, Drink>("SELECT id, title, recipe FROM drinks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(drink)
    }

    /// Like `find`, but an absent row becomes `NotFound`.
    pub async fn find_404(&self, id: i64) -> Result<Drink, DatabaseError> {
        self.find(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("drink {} not found", id)))
    }

    pub async fn insert(&self, title: &str, recipe_json: &str) -> Result<Drink, DatabaseError> {
        let drink = sqlx::query_as::<_, Drink>(
            "INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(recipe_json)
        .fetch_one(&self.pool)
        .await?;
        Ok(drink)
    }

    /// Partial update: a `None` field keeps the stored value.
    pub async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        recipe_json: Option<&str>,
    ) -> Result<Drink, DatabaseError> {
        let drink = sqlx::query_as::<_, Drink>(
            "UPDATE drinks \
             SET title = COALESCE($2, title), recipe = COALESCE($3, recipe) \
             WHERE id = $1 \
             RETURNING id, title, recipe",
        )
        .bind(id)
        .bind(title)
        .bind(recipe_json)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("drink {} not found", id)))?;
        Ok(drink)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("drink {} not found", id)));
        }
        Ok(())
    }
}
