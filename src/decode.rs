//! Conversion of raw service responses into domain objects.
//!
//! Response text is first parsed as plain JSON, so only a syntax error is
//! `MalformedJson`. Each item is then read into a partial type whose fields
//! are untyped, and validated into the strict domain type: a required field
//! that is absent is `MissingField`, one of the wrong type is
//! `InvalidField`. Optional fields of the wrong type are dropped.

use std::collections::HashSet;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::DecodeError;
use crate::gemini::GenerateContentResponse;
use crate::image::ImagePayload;
use crate::models::*;

#[derive(Debug, Default, Deserialize)]
struct PartialSubstitute {
    original: Option<String>,
    replacement: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialRecipe {
    id: Option<Value>,
    name: Option<Value>,
    image_keyword: Option<Value>,
    description: Option<Value>,
    ingredients: Option<Value>,
    substitutes: Option<Value>,
    instructions: Option<Value>,
    time: Option<Value>,
    difficulty: Option<Value>,
    calories: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialNutritionSummary {
    bmr: Option<Value>,
    tdee: Option<Value>,
    target_daily_calories: Option<Value>,
    macro_advice: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialMeal {
    #[serde(rename = "type")]
    meal_type: Option<Value>,
    name: Option<Value>,
    description: Option<Value>,
    calories: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialDay {
    day: Option<Value>,
    meals: Option<Value>,
    total_calories: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialWeeklyPlan {
    nutrition_summary: Option<Value>,
    days: Option<Value>,
}

fn missing(item: &str, field: &'static str) -> DecodeError {
    DecodeError::MissingField {
        item: item.to_string(),
        field,
    }
}

/// Read `value` as the item's partial type. Fails only when the item is not
/// a JSON object.
fn read_item<T: DeserializeOwned>(value: Value, item: &str) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|e| DecodeError::UnexpectedShape {
        item: item.to_string(),
        reason: e.to_string(),
    })
}

/// Convert a field that is allowed to be absent; `null` counts as absent.
fn typed<T: DeserializeOwned>(
    value: Option<Value>,
    item: &str,
    field: &'static str,
) -> Result<Option<T>, DecodeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v)
            .map(Some)
            .map_err(|e| DecodeError::InvalidField {
                item: item.to_string(),
                field,
                reason: e.to_string(),
            }),
    }
}

/// An optional field. A value of the wrong type is logged and dropped.
fn optional<T: DeserializeOwned>(value: Option<Value>, item: &str, field: &'static str) -> Option<T> {
    typed(value, item, field).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring ill-typed optional field");
        None
    })
}

fn required<T: DeserializeOwned>(
    value: Option<Value>,
    item: &str,
    field: &'static str,
) -> Result<T, DecodeError> {
    typed(value, item, field)?.ok_or_else(|| missing(item, field))
}

fn required_text(value: Option<Value>, item: &str, field: &'static str) -> Result<String, DecodeError> {
    let text: String = required(value, item, field)?;
    if text.trim().is_empty() {
        return Err(missing(item, field));
    }
    Ok(text)
}

fn required_list(
    value: Option<Value>,
    item: &str,
    field: &'static str,
) -> Result<Vec<String>, DecodeError> {
    let list: Vec<String> = required::<Vec<String>>(value, item, field)?
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect();
    if list.is_empty() {
        return Err(missing(item, field));
    }
    Ok(list)
}

/// Parse structured-output text, distinguishing empty from malformed.
pub fn parse_json(text: Option<&str>) -> Result<Value, DecodeError> {
    let text = text.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(DecodeError::EmptyResponse);
    }
    serde_json::from_str(text).map_err(|e| DecodeError::MalformedJson(e.to_string()))
}

impl PartialRecipe {
    fn validate(self, item: &str) -> Result<Recipe, DecodeError> {
        let substitutes = optional::<Vec<Value>>(self.substitutes, item, "substitutes").map(|subs| {
            subs.into_iter()
                .filter_map(|s| serde_json::from_value::<PartialSubstitute>(s).ok())
                .filter_map(|s| {
                    Some(Substitute {
                        original: s.original?,
                        replacement: s.replacement?,
                    })
                })
                .collect()
        });
        let id = match self.id {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Ok(Recipe {
            id,
            name: required_text(self.name, item, "name")?,
            image_keyword: required_text(self.image_keyword, item, "image_keyword")?,
            description: required(self.description, item, "description")?,
            ingredients: required_list(self.ingredients, item, "ingredients")?,
            substitutes,
            instructions: required_list(self.instructions, item, "instructions")?,
            time: required(self.time, item, "time")?,
            difficulty: required(self.difficulty, item, "difficulty")?,
            calories: optional(self.calories, item, "calories"),
            custom_image: None,
        })
    }
}

/// Give every recipe a non-empty id that is unique within the set.
///
/// Missing or repeated ids are replaced with one derived from the current
/// time in milliseconds and the recipe's position.
fn assign_unique_ids(recipes: &mut [Recipe]) {
    let ts = Utc::now().timestamp_millis();
    let mut seen = HashSet::new();
    for (idx, recipe) in recipes.iter_mut().enumerate() {
        if recipe.id.is_empty() || seen.contains(&recipe.id) {
            let mut candidate = format!("{}-{}", ts, idx);
            while seen.contains(&candidate) {
                candidate.push('x');
            }
            recipe.id = candidate;
        }
        seen.insert(recipe.id.clone());
    }
}

/// Decode the recipe-list response text.
///
/// Succeeds only with at least one fully populated recipe.
pub fn decode_recipes(text: Option<&str>) -> Result<Vec<Recipe>, DecodeError> {
    let values: Vec<Value> = read_item(parse_json(text)?, "recipe list")?;
    if values.is_empty() {
        return Err(DecodeError::EmptyResult("recipes"));
    }

    let mut recipes = values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let name = format!("recipe {}", idx);
            read_item::<PartialRecipe>(value, &name)?.validate(&name)
        })
        .collect::<Result<Vec<_>, _>>()?;

    assign_unique_ids(&mut recipes);
    Ok(recipes)
}

impl PartialNutritionSummary {
    fn validate(self) -> Result<NutritionSummary, DecodeError> {
        let item = "nutrition_summary";
        Ok(NutritionSummary {
            bmr: optional(self.bmr, item, "bmr"),
            tdee: optional(self.tdee, item, "tdee"),
            target_daily_calories: required(self.target_daily_calories, item, "target_daily_calories")?,
            macro_advice: required(self.macro_advice, item, "macro_advice")?,
        })
    }
}

impl PartialMeal {
    fn validate(self, item: &str) -> Result<MealSummary, DecodeError> {
        Ok(MealSummary {
            meal_type: required(self.meal_type, item, "type")?,
            name: required_text(self.name, item, "name")?,
            description: optional(self.description, item, "description").unwrap_or_default(),
            calories: required(self.calories, item, "calories")?,
        })
    }
}

impl PartialDay {
    fn validate(self, item: &str) -> Result<DayPlan, DecodeError> {
        let day = required_text(self.day, item, "day")?;
        let meals = required::<Vec<Value>>(self.meals, item, "meals")?
            .into_iter()
            .enumerate()
            .map(|(m, value)| {
                let name = format!("{} meal {}", item, m);
                read_item::<PartialMeal>(value, &name)?.validate(&name)
            })
            .collect::<Result<Vec<_>, _>>()?;
        if meals.is_empty() {
            return Err(missing(item, "meals"));
        }

        Ok(DayPlan {
            day,
            meals,
            total_calories: required(self.total_calories, item, "total_calories")?,
        })
    }
}

/// Decode the weekly-plan response text.
pub fn decode_weekly_plan(text: Option<&str>) -> Result<WeeklyPlan, DecodeError> {
    let partial: PartialWeeklyPlan = read_item(parse_json(text)?, "weekly plan")?;

    let days = required::<Vec<Value>>(partial.days, "weekly plan", "days")?
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let name = format!("day {}", idx);
            read_item::<PartialDay>(value, &name)?.validate(&name)
        })
        .collect::<Result<Vec<_>, _>>()?;
    if days.is_empty() {
        return Err(DecodeError::EmptyResult("days"));
    }
    if days.len() != 7 {
        warn!(days = days.len(), "weekly plan does not cover seven days");
    }

    let nutrition_summary = match partial.nutrition_summary {
        None | Some(Value::Null) => None,
        Some(value) => {
            let summary: PartialNutritionSummary = read_item(value, "nutrition_summary")?;
            Some(summary.validate()?)
        }
    };

    Ok(WeeklyPlan {
        nutrition_summary,
        days,
    })
}

/// Extract the first inline image of a response.
pub fn decode_image(response: &GenerateContentResponse) -> Result<ImagePayload, DecodeError> {
    let inline = response.inline_data().ok_or(DecodeError::NoImageReturned)?;
    ImagePayload::from_inline(inline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "أرز بالدجاج",
            "image_keyword": "chicken rice",
            "description": "طبق سريع",
            "ingredients": ["دجاج", "أرز", "طماطم"],
            "substitutes": [{"original": "دجاج", "replacement": "ديك رومي"}],
            "instructions": ["اغسل الأرز", "اطبخ الدجاج"],
            "time": "45 دقيقة",
            "difficulty": "متوسط",
            "calories": 650
        })
    }

    fn day_json(name: &str) -> serde_json::Value {
        json!({
            "day": name,
            "total_calories": 1800,
            "meals": [
                {"type": "فطور", "name": "شوفان", "description": "شوفان بالحليب", "calories": 350},
                {"type": "وجبة خفيفة", "name": "تفاحة", "calories": 95}
            ]
        })
    }

    #[test]
    fn empty_and_malformed_text_are_distinct() {
        assert_eq!(
            decode_recipes(None).unwrap_err(),
            DecodeError::EmptyResponse
        );
        assert_eq!(
            decode_recipes(Some("  ")).unwrap_err(),
            DecodeError::EmptyResponse
        );
        assert!(matches!(
            decode_recipes(Some("not json")),
            Err(DecodeError::MalformedJson(_))
        ));
    }

    #[test]
    fn decodes_three_recipes() {
        let text = json!([recipe_json("a"), recipe_json("b"), recipe_json("c")]).to_string();
        let recipes = decode_recipes(Some(&text)).unwrap();
        assert_eq!(recipes.len(), 3);
        for recipe in &recipes {
            assert!(!recipe.ingredients.is_empty());
            assert!(!recipe.instructions.is_empty());
            assert!(Difficulty::ALL.contains(&recipe.difficulty));
        }
        assert_eq!(recipes[0].calories, Some(650));
        assert_eq!(recipes[0].substitutes.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn empty_recipe_array_is_not_success() {
        assert_eq!(
            decode_recipes(Some("[]")).unwrap_err(),
            DecodeError::EmptyResult("recipes")
        );
    }

    #[test]
    fn missing_required_field_is_reported() {
        let mut incomplete = recipe_json("a");
        incomplete.as_object_mut().unwrap().remove("instructions");
        let text = json!([incomplete]).to_string();
        assert_eq!(
            decode_recipes(Some(&text)).unwrap_err(),
            DecodeError::MissingField {
                item: "recipe 0".to_string(),
                field: "instructions"
            }
        );
    }

    #[test]
    fn empty_ingredient_list_is_rejected() {
        let mut r = recipe_json("a");
        r["ingredients"] = json!([]);
        let text = json!([r]).to_string();
        assert!(matches!(
            decode_recipes(Some(&text)),
            Err(DecodeError::MissingField { field: "ingredients", .. })
        ));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let mut r = recipe_json("a");
        let obj = r.as_object_mut().unwrap();
        obj.remove("calories");
        obj.remove("substitutes");
        let text = json!([r]).to_string();
        let recipes = decode_recipes(Some(&text)).unwrap();
        assert!(recipes[0].calories.is_none());
        assert!(recipes[0].substitutes.is_none());
    }

    #[test]
    fn valid_json_of_the_wrong_type_is_not_malformed() {
        let mut r = recipe_json("a");
        r["ingredients"] = json!("rice");
        let text = json!([r]).to_string();
        assert!(matches!(
            decode_recipes(Some(&text)),
            Err(DecodeError::InvalidField { field: "ingredients", .. })
        ));

        let mut r = recipe_json("a");
        r["difficulty"] = json!("very easy");
        let text = json!([r]).to_string();
        assert!(matches!(
            decode_recipes(Some(&text)),
            Err(DecodeError::InvalidField { field: "difficulty", .. })
        ));

        assert!(matches!(
            decode_recipes(Some(r#"{"recipes": []}"#)),
            Err(DecodeError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            decode_recipes(Some(r#"["just a string"]"#)),
            Err(DecodeError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn ill_typed_optional_fields_are_dropped() {
        let mut first = recipe_json("a");
        first["calories"] = json!(620.5);
        let mut second = recipe_json("b");
        second["substitutes"] = json!("none");
        let mut third = recipe_json("c");
        third["substitutes"] = json!([
            {"original": "دجاج", "replacement": "لحم"},
            {"original": 5},
            "زيت"
        ]);
        let text = json!([first, second, third]).to_string();

        let recipes = decode_recipes(Some(&text)).unwrap();
        assert_eq!(recipes.len(), 3);
        assert!(recipes[0].calories.is_none());
        assert!(recipes[1].substitutes.is_none());
        assert_eq!(recipes[2].substitutes.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn numeric_recipe_id_is_kept() {
        let mut r = recipe_json("a");
        r["id"] = json!(42);
        let text = json!([r]).to_string();
        assert_eq!(decode_recipes(Some(&text)).unwrap()[0].id, "42");
    }

    #[test]
    fn duplicate_and_missing_ids_are_replaced() {
        let mut no_id = recipe_json("");
        no_id.as_object_mut().unwrap().remove("id");
        let text = json!([recipe_json("x"), recipe_json("x"), no_id]).to_string();
        let recipes = decode_recipes(Some(&text)).unwrap();

        assert_eq!(recipes[0].id, "x");
        let ids: HashSet<_> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(recipes.iter().all(|r| !r.id.is_empty()));
    }

    #[test]
    fn decodes_weekly_plan_with_summary() {
        let days: Vec<_> = ["السبت", "الأحد", "الاثنين", "الثلاثاء", "الأربعاء", "الخميس", "الجمعة"]
            .iter()
            .map(|d| day_json(d))
            .collect();
        let text = json!({
            "nutrition_summary": {
                "bmr": 1700,
                "tdee": 2635,
                "target_daily_calories": 2135,
                "macro_advice": "بروتين عالي"
            },
            "days": days
        })
        .to_string();

        let plan = decode_weekly_plan(Some(&text)).unwrap();
        assert_eq!(plan.days.len(), 7);
        assert_eq!(plan.days[0].meals[1].meal_type, MealType::Snack);
        assert_eq!(plan.days[0].meals[1].description, "");
        let summary = plan.nutrition_summary.unwrap();
        assert!(summary.target_daily_calories < summary.tdee.unwrap());
    }

    #[test]
    fn weekly_plan_summary_is_optional_but_validated_when_present() {
        let text = json!({"days": [day_json("السبت")]}).to_string();
        assert!(decode_weekly_plan(Some(&text))
            .unwrap()
            .nutrition_summary
            .is_none());

        let text = json!({
            "nutrition_summary": {"bmr": 1500},
            "days": [day_json("السبت")]
        })
        .to_string();
        assert!(matches!(
            decode_weekly_plan(Some(&text)),
            Err(DecodeError::MissingField { field: "target_daily_calories", .. })
        ));
    }

    #[test]
    fn meal_without_calories_is_rejected() {
        let mut day = day_json("السبت");
        day["meals"][0].as_object_mut().unwrap().remove("calories");
        let text = json!({"days": [day]}).to_string();
        assert!(matches!(
            decode_weekly_plan(Some(&text)),
            Err(DecodeError::MissingField { field: "calories", .. })
        ));
    }

    #[test]
    fn plan_type_errors_are_reported_per_field() {
        let mut day = day_json("السبت");
        day["meals"][0]["type"] = json!("brunch");
        let text = json!({"days": [day]}).to_string();
        assert!(matches!(
            decode_weekly_plan(Some(&text)),
            Err(DecodeError::InvalidField { field: "type", .. })
        ));

        let text = json!({
            "nutrition_summary": {
                "bmr": "unknown",
                "target_daily_calories": 1900,
                "macro_advice": "نوّع مصادر البروتين"
            },
            "days": [day_json("السبت")]
        })
        .to_string();
        let summary = decode_weekly_plan(Some(&text))
            .unwrap()
            .nutrition_summary
            .unwrap();
        assert!(summary.bmr.is_none());
        assert_eq!(summary.target_daily_calories, 1900);
    }

    #[test]
    fn plan_without_days_is_rejected() {
        assert!(matches!(
            decode_weekly_plan(Some("{}")),
            Err(DecodeError::MissingField { field: "days", .. })
        ));
        assert_eq!(
            decode_weekly_plan(Some(r#"{"days": []}"#)).unwrap_err(),
            DecodeError::EmptyResult("days")
        );
    }

    #[test]
    fn image_requires_inline_part() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "sorry"}]}}]
        }))
        .unwrap();
        assert_eq!(decode_image(&resp).unwrap_err(), DecodeError::NoImageReturned);

        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
            ]}}]
        }))
        .unwrap();
        assert_eq!(
            decode_image(&resp).unwrap().to_data_uri(),
            "data:image/png;base64,aGVsbG8="
        );
    }
}
