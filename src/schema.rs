//! Structured-output schemas sent with each generation request.
//!
//! Any field the decoder reads without a fallback is listed under `required`;
//! `substitutes`, `calories` and `nutrition_summary` stay optional.

use serde_json::{json, Value};

use crate::models::{Difficulty, MealType};

/// Schema of a single recipe object.
pub fn recipe_schema() -> Value {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(Difficulty::label).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING", "description": "معرف فريد قصير للوصفة" },
            "name": { "type": "STRING", "description": "اسم الوصفة باللغة العربية" },
            "image_keyword": {
                "type": "STRING",
                "description": "كلمة مفتاحية بالإنجليزية لوصف الصورة (طعام فقط)"
            },
            "description": {
                "type": "STRING",
                "description": "وصف جذاب للطبق يبرز كيف تم استغلال المكونات المتاحة"
            },
            "ingredients": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "قائمة المكونات مع الكميات التقديرية"
            },
            "substitutes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "original": { "type": "STRING", "description": "المكون الأصلي" },
                        "replacement": { "type": "STRING", "description": "البديل المقترح" }
                    },
                    "required": ["original", "replacement"]
                },
                "description": "قائمة ببدائل المكونات المحتملة"
            },
            "instructions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "خطوات التحضير مفصلة ومرقمة بوضوح"
            },
            "time": { "type": "STRING", "description": "وقت التحضير الكلي" },
            "difficulty": { "type": "STRING", "enum": difficulties },
            "calories": {
                "type": "INTEGER",
                "description": "السعرات الحرارية التقريبية للوجبة كاملة"
            }
        },
        "required": [
            "id", "name", "image_keyword", "description",
            "ingredients", "instructions", "time", "difficulty"
        ]
    })
}

/// Schema for the recipe request: an array of recipes.
pub fn recipe_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": recipe_schema()
    })
}

/// Schema for the weekly-plan request.
pub fn weekly_plan_schema() -> Value {
    let meal_types: Vec<&str> = MealType::ALL.iter().map(MealType::label).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "nutrition_summary": {
                "type": "OBJECT",
                "description": "ملخص الحسابات الغذائية المعتمدة على بيانات المستخدم",
                "properties": {
                    "bmr": { "type": "INTEGER", "description": "معدل الأيض الأساسي المحسوب" },
                    "tdee": {
                        "type": "INTEGER",
                        "description": "احتياج الطاقة اليومي الكلي للحفاظ على الوزن"
                    },
                    "target_daily_calories": {
                        "type": "INTEGER",
                        "description": "السعرات اليومية المستهدفة لتحقيق الهدف المختار"
                    },
                    "macro_advice": {
                        "type": "STRING",
                        "description": "نصيحة مختصرة جداً (جملة واحدة) حول توزيع البروتين/الكارب/الدهون المناسب لهذا الهدف"
                    }
                },
                "required": ["target_daily_calories", "macro_advice"]
            },
            "days": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "STRING", "description": "اسم اليوم (مثال: السبت)" },
                        "total_calories": { "type": "INTEGER", "description": "مجموع سعرات هذا اليوم" },
                        "meals": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "type": { "type": "STRING", "enum": meal_types },
                                    "name": { "type": "STRING" },
                                    "description": { "type": "STRING", "description": "وصف مختصر للمكونات" },
                                    "calories": { "type": "INTEGER" }
                                },
                                "required": ["type", "name", "calories"]
                            }
                        }
                    },
                    "required": ["day", "meals", "total_calories"]
                }
            }
        },
        "required": ["days"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn recipe_schema_marks_optional_fields_optional() {
        let schema = recipe_schema();
        let required = required(&schema);
        for field in ["id", "name", "ingredients", "instructions", "difficulty", "time"] {
            assert!(required.contains(&field), "{} should be required", field);
        }
        for field in ["calories", "substitutes"] {
            assert!(!required.contains(&field), "{} should be optional", field);
        }
    }

    #[test]
    fn every_required_field_is_declared() {
        for schema in [recipe_schema(), weekly_plan_schema()] {
            let properties = schema["properties"].as_object().unwrap();
            for field in required(&schema) {
                assert!(properties.contains_key(field), "{} not declared", field);
            }
        }
    }

    #[test]
    fn recipe_list_wraps_recipe_schema() {
        let schema = recipe_list_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"], recipe_schema());
    }

    #[test]
    fn difficulty_enum_has_three_values() {
        let schema = recipe_schema();
        let values = schema["properties"]["difficulty"]["enum"].as_array().unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], "سهل");
    }

    #[test]
    fn weekly_plan_summary_is_optional() {
        let schema = weekly_plan_schema();
        assert_eq!(required(&schema), vec!["days"]);

        let summary = &schema["properties"]["nutrition_summary"];
        assert_eq!(required(summary), vec!["target_daily_calories", "macro_advice"]);

        let meal = &schema["properties"]["days"]["items"]["properties"]["meals"]["items"];
        assert_eq!(required(meal), vec!["type", "name", "calories"]);
        assert_eq!(meal["properties"]["type"]["enum"].as_array().unwrap().len(), 4);
    }
}
