//! Repository for the `meals` table.

use nomnomchow_core::meal::{slugify, MealFilters};
use nomnomchow_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::meal::{
    CreateMeal, ImageCounts, ImageSelection, Meal, MealImageTarget, UpdateMeal,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, cuisine, skill_level, time_minutes, \
    age_ranges, dietary_flags, image_url, ingredients, instructions, kid_friendly_notes, \
    slug, seo_title, seo_description, tags, amazon_recommendations, created_at, updated_at";

const IMAGE_TARGET_COLUMNS: &str = "id, title, ingredients, cuisine, skill_level";

/// Provides CRUD and catalog queries for meals.
pub struct MealRepo;

impl MealRepo {
    /// List meals matching `filters`, oldest first.
    pub async fn list(pool: &PgPool, filters: &MealFilters) -> Result<Vec<Meal>, sqlx::Error> {
        let mut builder = QueryBuilder::new(format!("SELECT {COLUMNS} FROM meals"));
        push_filters(&mut builder, filters);
        builder.push(" ORDER BY id");
        builder.build_query_as::<Meal>().fetch_all(pool).await
    }

    /// Find a meal by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Meal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meals WHERE id = $1");
        sqlx::query_as::<_, Meal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new meal together with its zeroed stats row.
    ///
    /// The slug defaults to [`slugify`] of the title.
    pub async fn create(pool: &PgPool, input: &CreateMeal) -> Result<Meal, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let slug = input.slug.clone().unwrap_or_else(|| slugify(&input.title));
        let query = format!(
            "INSERT INTO meals (title, description, cuisine, skill_level, time_minutes, \
                age_ranges, dietary_flags, image_url, ingredients, instructions, \
                kid_friendly_notes, slug, seo_title, seo_description, tags, amazon_recommendations)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        let meal = sqlx::query_as::<_, Meal>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.cuisine)
            .bind(&input.skill_level)
            .bind(input.time_minutes)
            .bind(input.age_ranges.as_ref().map(Json))
            .bind(input.dietary_flags.as_ref().map(Json))
            .bind(&input.image_url)
            .bind(input.ingredients.as_ref().map(Json))
            .bind(input.instructions.as_ref().map(Json))
            .bind(&input.kid_friendly_notes)
            .bind(slug)
            .bind(&input.seo_title)
            .bind(&input.seo_description)
            .bind(input.tags.as_ref().map(Json))
            .bind(input.amazon_recommendations.as_ref().map(Json))
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO meal_stats (meal_id) VALUES ($1)")
            .bind(meal.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(meal)
    }

    /// Update a meal. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMeal,
    ) -> Result<Option<Meal>, sqlx::Error> {
        let query = format!(
            "UPDATE meals SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                cuisine = COALESCE($4, cuisine),
                skill_level = COALESCE($5, skill_level),
                time_minutes = COALESCE($6, time_minutes),
                age_ranges = COALESCE($7, age_ranges),
                dietary_flags = COALESCE($8, dietary_flags),
                image_url = COALESCE($9, image_url),
                ingredients = COALESCE($10, ingredients),
                instructions = COALESCE($11, instructions),
                kid_friendly_notes = COALESCE($12, kid_friendly_notes),
                slug = COALESCE($13, slug),
                seo_title = COALESCE($14, seo_title),
                seo_description = COALESCE($15, seo_description),
                tags = COALESCE($16, tags),
                amazon_recommendations = COALESCE($17, amazon_recommendations)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meal>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.cuisine)
            .bind(&input.skill_level)
            .bind(input.time_minutes)
            .bind(input.age_ranges.as_ref().map(Json))
            .bind(input.dietary_flags.as_ref().map(Json))
            .bind(&input.image_url)
            .bind(input.ingredients.as_ref().map(Json))
            .bind(input.instructions.as_ref().map(Json))
            .bind(&input.kid_friendly_notes)
            .bind(&input.slug)
            .bind(&input.seo_title)
            .bind(&input.seo_description)
            .bind(input.tags.as_ref().map(Json))
            .bind(input.amazon_recommendations.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a meal with its stats and generated recipes.
    ///
    /// Returns `true` if the meal row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM meal_stats WHERE meal_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM generated_recipes WHERE meal_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point a meal at a freshly generated image. Returns `false` if the meal
    /// no longer exists.
    pub async fn update_image_url(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE meals SET image_url = $2 WHERE id = $1")
            .bind(id)
            .bind(image_url)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Meals a batch image run should cover, ordered by id.
    pub async fn list_for_images(
        pool: &PgPool,
        selection: &ImageSelection,
    ) -> Result<Vec<MealImageTarget>, sqlx::Error> {
        match selection {
            ImageSelection::Ids(ids) => {
                let query = format!(
                    "SELECT {IMAGE_TARGET_COLUMNS} FROM meals WHERE id = ANY($1) ORDER BY id"
                );
                sqlx::query_as::<_, MealImageTarget>(&query)
                    .bind(ids.as_slice())
                    .fetch_all(pool)
                    .await
            }
            ImageSelection::All => {
                let query = format!("SELECT {IMAGE_TARGET_COLUMNS} FROM meals ORDER BY id");
                sqlx::query_as::<_, MealImageTarget>(&query)
                    .fetch_all(pool)
                    .await
            }
            ImageSelection::MissingOnly => {
                let query = format!(
                    "SELECT {IMAGE_TARGET_COLUMNS} FROM meals
                     WHERE image_url IS NULL OR btrim(image_url) = ''
                     ORDER BY id"
                );
                sqlx::query_as::<_, MealImageTarget>(&query)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Total number of meals.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM meals")
            .fetch_one(pool)
            .await
    }

    /// How many meals have a non-blank image.
    pub async fn image_counts(pool: &PgPool) -> Result<ImageCounts, sqlx::Error> {
        sqlx::query_as::<_, ImageCounts>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE image_url IS NOT NULL AND btrim(image_url) <> '')
                        AS with_images
             FROM meals",
        )
        .fetch_one(pool)
        .await
    }

    /// Every meal title, used to skip duplicates when adding samples.
    pub async fn existing_titles(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT title FROM meals")
            .fetch_all(pool)
            .await
    }
}

/// Append a `WHERE` clause for every active filter.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &MealFilters) {
    let mut has_clause = false;
    let mut next = |builder: &mut QueryBuilder<'_, Postgres>| {
        builder.push(if has_clause { " AND " } else { " WHERE " });
        has_clause = true;
    };

    if let Some(cuisine) = &filters.cuisine {
        next(builder);
        builder.push("cuisine = ").push_bind(cuisine.clone());
    }
    if let Some(skill) = &filters.skill {
        next(builder);
        builder.push("skill_level = ").push_bind(skill.clone());
    }
    if let Some(max_minutes) = filters.max_minutes {
        next(builder);
        builder.push("time_minutes <= ").push_bind(max_minutes);
    }
    if let Some(age_range) = &filters.age_range {
        next(builder);
        builder
            .push("age_ranges @> ")
            .push_bind(Json(vec![age_range.clone()]));
    }
    if let Some(diet) = &filters.diet {
        next(builder);
        builder
            .push("dietary_flags @> ")
            .push_bind(Json(vec![diet.clone()]));
    }
    if let Some(search) = &filters.search {
        let pattern = format!("%{}%", escape_like(search));
        next(builder);
        builder
            .push("(title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filters: &MealFilters) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM meals");
        push_filters(&mut builder, filters);
        builder.sql().to_string()
    }

    #[test]
    fn no_filters_means_no_where_clause() {
        assert_eq!(sql_for(&MealFilters::default()), "SELECT id FROM meals");
    }

    #[test]
    fn filters_are_joined_with_and() {
        let filters = MealFilters {
            cuisine: Some("Italian".into()),
            max_minutes: Some(30),
            ..MealFilters::default()
        };
        assert_eq!(
            sql_for(&filters),
            "SELECT id FROM meals WHERE cuisine = $1 AND time_minutes <= $2"
        );
    }

    #[test]
    fn json_filters_use_containment() {
        let filters = MealFilters {
            age_range: Some("2-5".into()),
            diet: Some("vegetarian".into()),
            ..MealFilters::default()
        };
        let sql = sql_for(&filters);
        assert!(sql.contains("age_ranges @> $1"));
        assert!(sql.contains("dietary_flags @> $2"));
    }

    #[test]
    fn search_matches_title_or_description() {
        let filters = MealFilters {
            search: Some("pasta".into()),
            ..MealFilters::default()
        };
        assert_eq!(
            sql_for(&filters),
            "SELECT id FROM meals WHERE (title ILIKE $1 OR description ILIKE $2)"
        );
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
