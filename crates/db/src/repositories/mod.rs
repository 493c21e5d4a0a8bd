//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod affiliate_repo;
pub mod draft_meal_repo;
pub mod generated_recipe_repo;
pub mod meal_repo;
pub mod meal_stats_repo;

pub use affiliate_repo::AffiliateRepo;
pub use draft_meal_repo::DraftMealRepo;
pub use generated_recipe_repo::GeneratedRecipeRepo;
pub use meal_repo::MealRepo;
pub use meal_stats_repo::MealStatsRepo;
