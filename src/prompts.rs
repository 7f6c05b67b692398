//! Natural-language prompts for each generation request.
//!
//! The ingredient rule (listed ingredients plus kitchen staples only) is an
//! instruction to the model. Responses are not checked against it.

use crate::models::{CompleteHealthData, PlanGoalId, Recipe, UserHealthData};

/// Separator used when joining restriction lists.
pub const RESTRICTION_SEPARATOR: &str = "، ";

/// Pantry items assumed available regardless of the user's list.
pub const KITCHEN_STAPLES: [&str; 6] = [
    "الماء",
    "الملح",
    "الفلفل",
    "السكر",
    "الزيت/السمن",
    "البهارات الشائعة",
];

/// Calorie baseline used when health data is incomplete.
pub const BASELINE_DAILY_CALORIES: u32 = 2000;

/// Join saved and session restrictions, dropping blank entries.
pub fn merge_restrictions(saved: &str, session: &str) -> String {
    [saved, session]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(RESTRICTION_SEPARATOR)
}

/// Guidance text embedded in the weekly-plan prompt for each goal.
pub fn goal_guidance(goal: PlanGoalId) -> &'static str {
    match goal {
        PlanGoalId::WeightLoss => "إنقاص الوزن (عجز سعرات حرارية حوالي 500 سعرة من TDEE، بروتين عالي)",
        PlanGoalId::WeightGain => {
            "زيادة الوزن (فائض سعرات حرارية حوالي 300-500 سعرة فوق TDEE، تركيز على الكربوهيدرات المعقدة والبروتين)"
        }
        PlanGoalId::Maintain => "الحفاظ على الوزن (سعرات مساوية لـ TDEE تقريباً)",
        PlanGoalId::Healthy => {
            "نمط حياة صحي (توازن غذائي بدون عد صارم للسعرات، لكن ضمن الحدود الطبيعية)"
        }
    }
}

pub fn recipe_prompt(ingredients: &str, restrictions: &str) -> String {
    let mut prompt = format!(
        "أنت طاهٍ ذكي ومبتكر. مهمتك هي اقتراح 3 وصفات طبخ واقعية ولذيذة تعتمد *حصرياً* على المكونات المتوفرة التالية: \"{}\".\n",
        ingredients.trim()
    );

    let restrictions = restrictions.trim();
    if !restrictions.is_empty() {
        prompt.push_str(&format!(
            "يجب الالتزام الصارم بالقيود الغذائية التالية: \"{}\".\n",
            restrictions
        ));
    }

    prompt.push_str(&format!(
        "\nقواعد صارمة للمكونات:\n\
         1. يجب ألا تحتوي الوصفات على أي مكونات رئيسية (مثل لحوم، خضروات، أجبان، أو نشويات) لم يذكرها المستخدم في القائمة أعلاه.\n\
         2. يُسمح لك فقط بافتراض وجود \"أساسيات المطبخ\" المتوفرة في كل بيت، وهي فقط: ({}).\n\
         3. إذا كانت المكونات قليلة جداً، ابتكر طرقاً لتحضيرها (مثال: إذا توفر فقط \"بطاطس\"، اقترح: بطاطس مسلوقة متبلة، أصابع بطاطس محمرة، بطاطس مهروسة بالزيت).\n\
         \n\
         لكل وصفة، يجب تقديم:\n\
         1. خطوات تحضير مفصلة جداً وواضحة حتى للمبتدئين.\n\
         2. اقتراحات لبدائل للمكونات (إذا لزم الأمر، مع التركيز على بدائل شائعة).\n\
         3. كلمة مفتاحية واحدة باللغة الإنجليزية (image_keyword) تصف الطبق بدقة لاستخدامها في البحث عن صورة (مثال: \"grilled chicken salad\", \"lentil soup\").\n\
         4. مُعرف فريد (id) عشوائي قصير للوصفة.\n\
         \n\
         أعد الرد بتنسيق JSON حصراً وفق المخطط المحدد.\n",
        KITCHEN_STAPLES.join("، ")
    ));

    prompt
}

fn health_block(health: &CompleteHealthData, goal: PlanGoalId) -> String {
    format!(
        "**بيانات المستخدم الحيوية (أساسية للحسابات):**\n\
         - العمر: {} سنة\n\
         - الوزن: {} كغ\n\
         - الطول: {} سم\n\
         - الجنس: {}\n\
         - مستوى النشاط: {}\n\
         \n\
         **مطلوب منك كخبير تغذية:**\n\
         1. حساب معدل الأيض الأساسي (BMR) باستخدام معادلة Mifflin-St Jeor.\n\
         2. حساب احتياج الطاقة اليومي الكلي (TDEE) بناءً على مستوى النشاط.\n\
         3. تحديد \"السعرات المستهدفة يومياً\" بناءً على هدف \"{}\".\n\
         4. بناء الخطة الأسبوعية بحيث يكون متوسط سعرات الأيام قريباً جداً من هذا الهدف المستهدف.\n",
        health.age,
        health.weight,
        health.height,
        health.gender.label(),
        health.activity_level.as_str(),
        goal_guidance(goal)
    )
}

fn baseline_block() -> String {
    format!(
        "لم يتم توفير بيانات دقيقة. استخدم متوسط احتياج {} سعرة حرارية كمرجع أساسي وقم بتعديله حسب الهدف.\n",
        BASELINE_DAILY_CALORIES
    )
}

/// Build the weekly-plan prompt. The computed-BMR branch is used only when
/// every health field is present; otherwise the baseline branch applies.
pub fn weekly_plan_prompt(
    goal: PlanGoalId,
    restrictions: &str,
    health: Option<&UserHealthData>,
) -> String {
    let mut prompt = format!(
        "قم بإنشاء خطة وجبات أسبوعية شاملة (7 أيام) مخصصة للهدف: \"{}\".\n",
        goal_guidance(goal)
    );

    let restrictions = restrictions.trim();
    if !restrictions.is_empty() {
        prompt.push_str(&format!("مع الالتزام الصارم بالقيود: \"{}\".\n", restrictions));
    }

    match health.and_then(UserHealthData::complete) {
        Some(complete) => prompt.push_str(&health_block(&complete, goal)),
        None => prompt.push_str(&baseline_block()),
    }

    prompt.push_str(
        "\nلكل يوم (من السبت إلى الجمعة)، اقترح 3 وجبات رئيسية ووجبة خفيفة. يجب أن تكون الوجبات واقعية ومتنوعة.\n\
         \n\
         أعد الرد بتنسيق JSON حصراً يطابق المخطط المطلوب، بما في ذلك ملخص الحسابات الغذائية (nutrition_summary) إذا توفرت البيانات.\n",
    );

    prompt
}

/// Text-to-image prompt for an arbitrary dish description.
pub fn image_prompt(subject: &str) -> String {
    format!(
        "Professional food photography of: {}, delicious, high resolution, 4k, appetizing lighting.",
        subject.trim()
    )
}

/// Image subject for a recipe: the English keyword plus the dish name.
pub fn recipe_image_subject(recipe: &Recipe) -> String {
    format!("{} ({})", recipe.image_keyword, recipe.name)
}
