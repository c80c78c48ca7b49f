use axum::{extract::Path, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Permission;
use crate::database::models::RecipePart;
use crate::database::{DatabaseManager, DrinkRepository};
use crate::error::ApiError;
use crate::middleware::BearerClaims;

/// Recipe in a request body. The frontend posts either a bare part object or
/// an array of them; both normalize to a list before persisting.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<RecipePart>),
    One(RecipePart),
}

impl RecipeInput {
    fn into_parts(self) -> Vec<RecipePart> {
        match self {
            RecipeInput::Many(parts) => parts,
            RecipeInput::One(part) => vec![part],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDrink {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrink {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

/// GET /drinks - public, short representation only
pub async fn list() -> Result<Json<Value>, ApiError> {
    let repo = repository().await?;
    let drinks = repo.list().await?;
    let drinks = drinks
        .iter()
        .map(|drink| drink.short())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(json!({ "success": true, "drinks": drinks })))
}

/// GET /drinks-detail - requires the get:drinks-detail permission
pub async fn list_detail(BearerClaims(claims): BearerClaims) -> Result<Json<Value>, ApiError> {
    claims.require(Permission::GetDrinksDetail)?;

    let repo = repository().await?;
    let drinks = repo.list().await?;
    let drinks = drinks
        .iter()
        .map(|drink| drink.long())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(json!({ "success": true, "drinks": drinks })))
}

/// POST /drinks - requires the post:drinks permission
pub async fn create(
    BearerClaims(claims): BearerClaims,
    Json(body): Json<CreateDrink>,
) -> Result<Json<Value>, ApiError> {
    claims.require(Permission::PostDrinks)?;

    let CreateDrink { title, recipe } = body;
    let title = require_title(title.as_deref())?;
    let parts = recipe
        .map(RecipeInput::into_parts)
        .ok_or_else(|| ApiError::unprocessable("recipe is required"))?;
    validate_recipe(&parts)?;
    let recipe_json = serialize_recipe(&parts)?;

    let repo = repository().await?;
    let drink = repo.insert(title, &recipe_json).await?;

    Ok(Json(json!({ "success": true, "drinks": [drink.long()?] })))
}

/// PATCH /drinks/:id - partial update, requires the patch:drinks permission
pub async fn update(
    BearerClaims(claims): BearerClaims,
    Path(id): Path<String>,
    Json(body): Json<UpdateDrink>,
) -> Result<Json<Value>, ApiError> {
    claims.require(Permission::PatchDrinks)?;
    let id = parse_id(&id)?;

    let UpdateDrink { title, recipe } = body;
    let title = match title.as_deref().map(str::trim) {
        Some("") => return Err(ApiError::unprocessable("title must not be empty")),
        other => other,
    };
    let recipe_json = match recipe.map(RecipeInput::into_parts) {
        Some(parts) => {
            validate_recipe(&parts)?;
            Some(serialize_recipe(&parts)?)
        }
        None => None,
    };

    let repo = repository().await?;
    // 404 before any mutation attempt
    repo.find_404(id).await?;
    let drink = repo.update(id, title, recipe_json.as_deref()).await?;

    Ok(Json(json!({ "success": true, "drinks": [drink.long()?] })))
}

/// DELETE /drinks/:id - requires the delete:drinks permission
pub async fn remove(
    BearerClaims(claims): BearerClaims,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    claims.require(Permission::DeleteDrinks)?;
    let id = parse_id(&id)?;

    let repo = repository().await?;
    // 404 before any mutation attempt
    repo.find_404(id).await?;
    repo.delete(id).await?;

    Ok(Json(json!({ "success": true, "delete": id })))
}

async fn repository() -> Result<DrinkRepository, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(DrinkRepository::new(pool))
}

/// A non-numeric id cannot name an existing row, so it reads as 404 rather
/// than 400.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::not_found("resource not found"))
}

fn require_title(title: Option<&str>) -> Result<&str, ApiError> {
    match title.map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title),
        _ => Err(ApiError::unprocessable("title is required")),
    }
}

fn validate_recipe(parts: &[RecipePart]) -> Result<(), ApiError> {
    if parts.is_empty() {
        return Err(ApiError::unprocessable("recipe must have at least one part"));
    }
    for part in parts {
        if part.name.trim().is_empty() {
            return Err(ApiError::unprocessable("recipe part name is required"));
        }
        if part.parts <= 0 {
            return Err(ApiError::unprocessable("recipe parts must be positive"));
        }
    }
    Ok(())
}

fn serialize_recipe(parts: &[RecipePart]) -> Result<String, ApiError> {
    serde_json::to_string(parts).map_err(|e| {
        tracing::error!("Failed to serialize recipe: {}", e);
        ApiError::internal_server_error("internal server error")
    })
}
