use serde::{Deserialize, Serialize};

/// A suggested replacement for one of a recipe's ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitute {
    pub original: String,
    pub replacement: String,
}

/// Recipe difficulty. Serialized with the Arabic labels the service is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "سهل", alias = "easy")]
    Easy,
    #[serde(rename = "متوسط", alias = "medium")]
    Medium,
    #[serde(rename = "صعب", alias = "hard")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Label sent to and expected from the service.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "سهل",
            Difficulty::Medium => "متوسط",
            Difficulty::Hard => "صعب",
        }
    }
}

/// A generated recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique within one result set
    pub id: String,
    pub name: String,
    /// English keyword used for the placeholder image lookup
    pub image_keyword: String,
    pub description: String,
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitutes: Option<Vec<Substitute>>,
    pub instructions: Vec<String>,
    /// Free-text total preparation time
    pub time: String,
    pub difficulty: Difficulty,
    /// Approximate calories (kcal) for the whole dish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    /// Generated or edited image as a `data:` URI
    #[serde(
        rename = "customImage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "ذكر",
            Gender::Female => "أنثى",
        }
    }
}

/// Activity level, ordered from least to most active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// Identifier as stored and as embedded in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "خامل (قليل الحركة)",
            ActivityLevel::Light => "نشاط خفيف (رياضة 1-3 أيام)",
            ActivityLevel::Moderate => "نشاط متوسط (رياضة 3-5 أيام)",
            ActivityLevel::Active => "نشيط (رياضة 6-7 أيام)",
            ActivityLevel::VeryActive => "نشيط جداً (تمارين شاقة يومياً)",
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("unknown activity level: {}", s))
    }
}

/// Body measurements used to personalise a weekly plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserHealthData {
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Height in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
}

/// Health data with every field present and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompleteHealthData {
    pub age: u32,
    pub weight: f64,
    pub height: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
}

impl UserHealthData {
    /// All five fields set and non-zero, or nothing.
    pub fn complete(&self) -> Option<CompleteHealthData> {
        let age = self.age.filter(|a| *a > 0)?;
        let weight = self.weight.filter(|w| *w > 0.0)?;
        let height = self.height.filter(|h| *h > 0.0)?;
        Some(CompleteHealthData {
            age,
            weight,
            height,
            gender: self.gender?,
            activity_level: self.activity_level?,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.complete().is_some()
    }
}

/// The persisted per-user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Permanent dietary restrictions, free text
    #[serde(default)]
    pub saved_restrictions: String,
    /// Unique by recipe id, in the order they were added
    #[serde(default)]
    pub favorites: Vec<Recipe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_data: Option<UserHealthData>,
    #[serde(default = "default_show_images")]
    pub show_images: bool,
}

fn default_show_images() -> bool {
    true
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            saved_restrictions: String::new(),
            favorites: Vec::new(),
            health_data: None,
            show_images: true,
        }
    }
}

impl UserProfile {
    pub fn is_favorite(&self, recipe_id: &str) -> bool {
        self.favorites.iter().any(|fav| fav.id == recipe_id)
    }

    pub fn favorite(&self, recipe_id: &str) -> Option<&Recipe> {
        self.favorites.iter().find(|fav| fav.id == recipe_id)
    }

    pub fn is_health_data_complete(&self) -> bool {
        self.health_data
            .as_ref()
            .is_some_and(UserHealthData::is_complete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanGoalId {
    WeightLoss,
    WeightGain,
    Maintain,
    Healthy,
}

impl PlanGoalId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanGoalId::WeightLoss => "weight_loss",
            PlanGoalId::WeightGain => "weight_gain",
            PlanGoalId::Maintain => "maintain",
            PlanGoalId::Healthy => "healthy",
        }
    }

    pub fn goal(&self) -> &'static PlanGoal {
        PLAN_GOALS
            .iter()
            .find(|g| g.id == *self)
            .unwrap_or(&PLAN_GOALS[0])
    }
}

impl std::str::FromStr for PlanGoalId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PLAN_GOALS
            .iter()
            .map(|g| g.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown goal: {}", s))
    }
}

/// A selectable weekly-plan goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanGoal {
    pub id: PlanGoalId,
    pub label: &'static str,
    /// Icon name understood by the presentation layer
    pub icon: &'static str,
    pub description: &'static str,
}

/// Goals in display order.
pub static PLAN_GOALS: [PlanGoal; 4] = [
    PlanGoal {
        id: PlanGoalId::WeightLoss,
        label: "إنقاص الوزن",
        icon: "Scale",
        description: "خطة محسوبة السعرات للوصول للوزن المثالي",
    },
    PlanGoal {
        id: PlanGoalId::WeightGain,
        label: "زيادة الوزن وبناء عضلات",
        icon: "TrendingUp",
        description: "وجبات غنية بالبروتين والطاقة الصحية",
    },
    PlanGoal {
        id: PlanGoalId::Healthy,
        label: "أكل صحي ومتوازن",
        icon: "Apple",
        description: "تركيز على الخضروات والفواكه والحبوب الكاملة",
    },
    PlanGoal {
        id: PlanGoalId::Maintain,
        label: "المحافظة على الوزن",
        icon: "Activity",
        description: "توازن مثالي بين الطاقة المستهلكة والمبذولة",
    },
];

/// Calculated energy figures returned alongside a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    /// Basal metabolic rate (kcal/day)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmr: Option<u32>,
    /// Total daily energy expenditure (kcal/day)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdee: Option<u32>,
    pub target_daily_calories: u32,
    pub macro_advice: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealType {
    #[serde(rename = "فطور", alias = "breakfast")]
    Breakfast,
    #[serde(rename = "غداء", alias = "lunch")]
    Lunch,
    #[serde(rename = "عشاء", alias = "dinner")]
    Dinner,
    #[serde(rename = "وجبة خفيفة", alias = "snack")]
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "فطور",
            MealType::Lunch => "غداء",
            MealType::Dinner => "عشاء",
            MealType::Snack => "وجبة خفيفة",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub name: String,
    /// Short description of the components
    #[serde(default)]
    pub description: String,
    pub calories: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// Day name, e.g. "السبت"
    pub day: String,
    pub meals: Vec<MealSummary>,
    pub total_calories: u32,
}

/// A seven-day meal plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_summary: Option<NutritionSummary>,
    pub days: Vec<DayPlan>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_health() -> UserHealthData {
        UserHealthData {
            age: Some(30),
            weight: Some(75.0),
            height: Some(170.0),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::Moderate),
        }
    }

    #[test]
    fn health_data_complete_requires_every_field() {
        assert!(full_health().is_complete());

        let mut missing_age = full_health();
        missing_age.age = None;
        assert!(!missing_age.is_complete());

        let mut zero_weight = full_health();
        zero_weight.weight = Some(0.0);
        assert!(!zero_weight.is_complete());

        let mut missing_activity = full_health();
        missing_activity.activity_level = None;
        assert!(!missing_activity.is_complete());

        assert!(!UserHealthData::default().is_complete());
    }

    #[test]
    fn difficulty_accepts_arabic_and_english() {
        let d: Difficulty = serde_json::from_str("\"متوسط\"").unwrap();
        assert_eq!(d, Difficulty::Medium);
        let d: Difficulty = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(d, Difficulty::Hard);
        assert_eq!(serde_json::to_string(&Difficulty::Easy).unwrap(), "\"سهل\"");
    }

    #[test]
    fn profile_defaults_show_images_when_absent() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"savedRestrictions":"نباتي","favorites":[]}"#).unwrap();
        assert!(profile.show_images);
        assert_eq!(profile.saved_restrictions, "نباتي");
        assert!(profile.health_data.is_none());
    }

    #[test]
    fn health_data_uses_camel_case_keys() {
        let json = serde_json::to_value(full_health()).unwrap();
        assert_eq!(json["activityLevel"], "moderate");
        assert_eq!(json["gender"], "male");
    }

    #[test]
    fn goal_lookup_round_trips() {
        for goal in &PLAN_GOALS {
            let parsed: PlanGoalId = goal.id.as_str().parse().unwrap();
            assert_eq!(parsed, goal.id);
            assert_eq!(parsed.goal().label, goal.label);
        }
        assert!("bulk".parse::<PlanGoalId>().is_err());
    }
}
