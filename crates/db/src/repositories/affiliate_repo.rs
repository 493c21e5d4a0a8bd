//! Repository for `affiliate_tools` and `affiliate_clicks`.

use sqlx::PgPool;

use crate::models::affiliate::{AffiliateTool, CreateAffiliateClick};

const COLUMNS: &str =
    "id, title, category, search_query, asin, benefit, tags, is_top_pick, bundle, created_at";

/// Provides read access to the tool catalog and click recording.
pub struct AffiliateRepo;

impl AffiliateRepo {
    /// All tools, top picks first.
    pub async fn list_tools(pool: &PgPool) -> Result<Vec<AffiliateTool>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM affiliate_tools ORDER BY is_top_pick DESC, id");
        sqlx::query_as::<_, AffiliateTool>(&query)
            .fetch_all(pool)
            .await
    }

    /// Tools belonging to one bundle (e.g. `toddler-starter`).
    pub async fn list_by_bundle(
        pool: &PgPool,
        bundle: &str,
    ) -> Result<Vec<AffiliateTool>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM affiliate_tools WHERE bundle = $1 ORDER BY is_top_pick DESC, id"
        );
        sqlx::query_as::<_, AffiliateTool>(&query)
            .bind(bundle)
            .fetch_all(pool)
            .await
    }

    /// Record a click-through. Returns `false` if the tool does not exist.
    pub async fn record_click(
        pool: &PgPool,
        input: &CreateAffiliateClick,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO affiliate_clicks (tool_id, meal_id, page)
             SELECT id, (SELECT m.id FROM meals m WHERE m.id = $2), $3
             FROM affiliate_tools WHERE id = $1",
        )
        .bind(input.tool_id)
        .bind(input.meal_id)
        .bind(&input.page)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
