//! Prompt builders for the image and chat models.
//!
//! Kept free of any client code so the wording can be unit-tested.

use serde_json::Value;

/// System message for the step-by-step recipe guide.
pub const RECIPE_SYSTEM_PROMPT: &str = "You are a helpful cooking assistant for parents.";

/// System message for ingredient-based suggestions.
pub const SUGGEST_SYSTEM_PROMPT: &str = "You are a helpful cooking assistant.";

/// Number of meal ideas asked for in a suggestion request.
pub const SUGGESTION_COUNT: usize = 3;

/// Photorealistic "parent took a photo of dinner" prompt for a meal image.
pub fn meal_image_prompt(
    title: &str,
    ingredients: &[String],
    cuisine: Option<&str>,
    skill_level: Option<&str>,
) -> String {
    let mut prompt = format!(
        "A realistic, home-cooked, kid-friendly meal: \"{title}\".\nIngredients: {}.\n",
        ingredients.join(", ")
    );
    if let Some(cuisine) = cuisine.filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!("Cuisine: {cuisine}.\n"));
    }
    if let Some(skill) = skill_level.filter(|s| !s.trim().is_empty()) {
        prompt.push_str(&format!("Cooking difficulty: {skill}.\n"));
    }
    prompt.push_str(
        "Style: Photorealistic, natural kitchen lighting, home-cooked weeknight dinner, \
         simple plate or bowl, normal portion sizes.\n\
         Rules: No fancy plating, no garnish, no restaurant presentation, no studio lighting.\n\
         The image should look like a parent took a high-quality photo of a real dinner they just made.",
    );
    prompt
}

/// Request for a detailed cooking guide in a fixed JSON shape.
pub fn recipe_guide_prompt(title: &str, age_range: &str, dietary_filters: &[String]) -> String {
    let dietary = if dietary_filters.is_empty() {
        "None".to_string()
    } else {
        dietary_filters.join(", ")
    };
    format!(
        r#"Generate a detailed, kid-friendly cooking guide for "{title}".
Target Audience: Busy parents with kids aged {age_range}.
Dietary Needs: {dietary}.

Return a JSON object with this exact structure:
{{
  "instructions": ["step 1", "step 2", ...],
  "kidFriendlyAdjustments": ["tip 1", "tip 2"],
  "optionalSpice": "instruction for adults to add spice",
  "substitutions": [{{"original": "item", "substitute": "item"}}],
  "shoppingList": {{
    "produce": [],
    "meat": [],
    "dairy": [],
    "pantry": [],
    "spices": [],
    "frozen": []
  }},
  "toolSuggestions": [{{"name": "tool name", "why": "why it helps"}}]
}}"#
    )
}

/// Request for meal ideas that use the given ingredients.
pub fn suggestion_prompt(ingredients: &[String]) -> String {
    format!(
        "I have these ingredients: {}.\n\
         Suggest {SUGGESTION_COUNT} kid-friendly meal ideas.\n\
         Return a JSON object with a \"meals\" array of objects, each with: title, description, \
         cuisine, timeMinutes (int), skillLevel (Easy/Intermediate/Advanced).",
        ingredients.join(", ")
    )
}

/// Pull the suggestion array out of a JSON-object completion.
///
/// Models wrap the array under `meals` or `suggestions` (or return a bare
/// array); anything else yields an empty list.
pub fn extract_suggestions(content: Value) -> Vec<Value> {
    match content {
        Value::Array(items) => items,
        Value::Object(mut map) => ["meals", "suggestions"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn image_prompt_lists_ingredients_and_optional_hints() {
        let ingredients = vec!["Tortillas".to_string(), "Cheese".to_string()];
        let prompt = meal_image_prompt("Chicken Quesadillas", &ingredients, Some("Mexican"), None);

        assert!(prompt.contains("\"Chicken Quesadillas\""));
        assert!(prompt.contains("Ingredients: Tortillas, Cheese."));
        assert!(prompt.contains("Cuisine: Mexican."));
        assert!(!prompt.contains("Cooking difficulty"));
    }

    #[test]
    fn recipe_prompt_defaults_dietary_needs_to_none() {
        let prompt = recipe_guide_prompt("Stir Fry", "6-10", &[]);
        assert!(prompt.contains("kids aged 6-10"));
        assert!(prompt.contains("Dietary Needs: None."));
        assert!(prompt.contains("\"shoppingList\""));
    }

    #[test]
    fn suggestions_unwrap_known_keys() {
        let wrapped = json!({ "meals": [{ "title": "Tacos" }] });
        assert_eq!(extract_suggestions(wrapped), vec![json!({ "title": "Tacos" })]);

        let alt = json!({ "suggestions": [{ "title": "Soup" }, { "title": "Pie" }] });
        assert_eq!(extract_suggestions(alt).len(), 2);

        let bare = json!([{ "title": "Rice" }]);
        assert_eq!(extract_suggestions(bare).len(), 1);
    }

    #[test]
    fn unexpected_suggestion_shape_yields_empty_list() {
        assert!(extract_suggestions(json!({ "ideas": "none" })).is_empty());
        assert!(extract_suggestions(json!("text")).is_empty());
    }
}
