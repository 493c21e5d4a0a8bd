//! Starter catalog content.
//!
//! The same list seeds an empty database at startup and backs the admin
//! "add sample meals" action.

use std::collections::HashSet;

use sqlx::PgPool;

use crate::models::meal::CreateMeal;
use crate::repositories::MealRepo;

const SHEET_PAN_IMAGE: &str = "https://images.unsplash.com/photo-1594998893017-361479423561?w=800";
const QUESADILLA_IMAGE: &str = "https://images.unsplash.com/photo-1599354607487-194d27129599?w=800";
const STIR_FRY_IMAGE: &str = "https://images.unsplash.com/photo-1512058564366-18510be2db19?w=800";

fn strings(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

/// The built-in sample meals.
pub fn sample_meals() -> Vec<CreateMeal> {
    vec![
        CreateMeal {
            title: "Sheet Pan Chicken & Veggies".into(),
            description: Some("One pan, no mess, healthy and colorful.".into()),
            cuisine: Some("American".into()),
            skill_level: Some("Easy".into()),
            time_minutes: 30,
            age_ranges: strings(&["2-5", "6-10", "10-13"]),
            dietary_flags: strings(&["gluten-free"]),
            ingredients: strings(&["Chicken breast", "Broccoli", "Carrots", "Olive oil"]),
            instructions: strings(&["Preheat oven", "Chop veggies", "Bake 20 mins"]),
            image_url: Some(SHEET_PAN_IMAGE.into()),
            ..CreateMeal::default()
        },
        CreateMeal {
            title: "Mini Meatballs & Spaghetti".into(),
            description: Some("Fun-sized meatballs perfect for little hands.".into()),
            cuisine: Some("Italian".into()),
            skill_level: Some("Intermediate".into()),
            time_minutes: 45,
            age_ranges: strings(&["2-5", "6-10"]),
            dietary_flags: strings(&[]),
            ingredients: strings(&["Ground beef", "Spaghetti", "Tomato sauce", "Breadcrumbs"]),
            ..CreateMeal::default()
        },
        CreateMeal {
            title: "Chicken Quesadillas".into(),
            description: Some("Cheesy, crispy, and easy to customize.".into()),
            cuisine: Some("Mexican".into()),
            skill_level: Some("Easy".into()),
            time_minutes: 15,
            age_ranges: strings(&["2-5", "6-10", "10-13"]),
            dietary_flags: strings(&[]),
            ingredients: strings(&["Tortillas", "Cheese", "Cooked Chicken"]),
            image_url: Some(QUESADILLA_IMAGE.into()),
            ..CreateMeal::default()
        },
        CreateMeal {
            title: "Vegetable Stir Fry".into(),
            description: Some("Colorful veggies with mild sauce.".into()),
            cuisine: Some("Asian".into()),
            skill_level: Some("Easy".into()),
            time_minutes: 20,
            age_ranges: strings(&["6-10", "10-13"]),
            dietary_flags: strings(&["vegetarian"]),
            ingredients: strings(&["Broccoli", "Bell peppers", "Soy sauce", "Rice"]),
            image_url: Some(STIR_FRY_IMAGE.into()),
            ..CreateMeal::default()
        },
    ]
}

/// Samples whose title is not already in the catalog (case-insensitive).
pub fn missing_samples(existing_titles: &[String]) -> Vec<CreateMeal> {
    let existing: HashSet<String> = existing_titles
        .iter()
        .map(|t| t.trim().to_lowercase())
        .collect();
    sample_meals()
        .into_iter()
        .filter(|m| !existing.contains(&m.title.to_lowercase()))
        .collect()
}

/// Insert every sample not yet present. Returns how many were added.
pub async fn add_sample_meals(pool: &PgPool) -> Result<usize, sqlx::Error> {
    let existing = MealRepo::existing_titles(pool).await?;
    let pending = missing_samples(&existing);
    for meal in &pending {
        MealRepo::create(pool, meal).await?;
    }
    Ok(pending.len())
}

/// Seed the catalog when it is empty. Returns how many meals were inserted.
pub async fn seed_if_empty(pool: &PgPool) -> Result<usize, sqlx::Error> {
    if MealRepo::count(pool).await? > 0 {
        return Ok(0);
    }
    tracing::info!("Seeding empty meal catalog");
    add_sample_meals(pool).await
}
