use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// A drinks-menu row. `recipe` holds the JSON serialization of the part
/// list; the API boundary guarantees it is valid JSON before it is stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: String,
}

/// One ingredient of a recipe: `parts` is the ratio of ingredient `name` in
/// the drink, `color` is how the frontend draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePart {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// Long representation: full recipe detail.
#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

/// Short representation: ingredient names redacted, colors and ratios kept.
#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortPart>,
}

#[derive(Debug, Serialize)]
pub struct ShortPart {
    pub color: String,
    pub parts: i64,
}

/// A stored recipe that no longer parses as JSON. Surfaced as a 500, never
/// a panic.
#[derive(Debug, Error)]
#[error("drink {id} has an unreadable recipe: {source}")]
pub struct CorruptRecipe {
    pub id: i64,
    #[source]
    pub source: serde_json::Error,
}

impl Drink {
    pub fn recipe_parts(&self) -> Result<Vec<RecipePart>, CorruptRecipe> {
        serde_json::from_str(&self.recipe).map_err(|source| CorruptRecipe { id: self.id, source })
    }

    pub fn long(&self) -> Result<DrinkLong, CorruptRecipe> {
        Ok(DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe_parts()?,
        })
    }

    pub fn short(&self) -> Result<DrinkShort, CorruptRecipe> {
        let recipe = self
            .recipe_parts()?
            .into_iter()
            .map(|part| ShortPart {
                color: part.color,
                parts: part.parts,
            })
            .collect();

        Ok(DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe,
        })
    }
}
