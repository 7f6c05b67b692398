//! Local energy estimates used to sanity-check generated plans.
//!
//! BMR follows Mifflin-St Jeor (Mifflin et al. 1990):
//! `10 * weight_kg + 6.25 * height_cm - 5 * age + s`, with `s = +5` for
//! men and `-161` for women. TDEE multiplies BMR by the activity factor.

use crate::models::{ActivityLevel, CompleteHealthData, Gender, NutritionSummary, PlanGoalId};

/// Relative difference tolerated between the service's TDEE and ours.
const TDEE_TOLERANCE: f64 = 0.15;

impl ActivityLevel {
    /// Multiplier applied to BMR (McArdle et al. 2010).
    pub fn activity_factor(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyEstimate {
    /// kcal/day
    pub bmr: f64,
    /// kcal/day
    pub tdee: f64,
}

pub fn mifflin_st_jeor(health: &CompleteHealthData) -> f64 {
    let gender_constant = match health.gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    10.0 * health.weight + 6.25 * health.height - 5.0 * f64::from(health.age) + gender_constant
}

pub fn estimate(health: &CompleteHealthData) -> EnergyEstimate {
    let bmr = mifflin_st_jeor(health);
    EnergyEstimate {
        bmr,
        tdee: bmr * health.activity_level.activity_factor(),
    }
}

/// Ways a returned summary disagrees with the goal or our own estimate.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryConcern {
    /// Target calories move in the wrong direction for the goal
    WrongDirection { target: u32, tdee: u32 },
    /// Service TDEE far from the local estimate
    TdeeMismatch { reported: u32, estimated: f64 },
}

/// Compare a plan's nutrition summary against the goal and, when health
/// data is available, the local estimate.
pub fn review_summary(
    summary: &NutritionSummary,
    goal: PlanGoalId,
    health: Option<&CompleteHealthData>,
) -> Vec<SummaryConcern> {
    let mut concerns = Vec::new();

    if let Some(tdee) = summary.tdee {
        let target = summary.target_daily_calories;
        let wrong = match goal {
            PlanGoalId::WeightLoss => target >= tdee,
            PlanGoalId::WeightGain => target <= tdee,
            PlanGoalId::Maintain | PlanGoalId::Healthy => false,
        };
        if wrong {
            concerns.push(SummaryConcern::WrongDirection { target, tdee });
        }

        if let Some(health) = health {
            let estimated = estimate(health).tdee;
            if (f64::from(tdee) - estimated).abs() / estimated > TDEE_TOLERANCE {
                concerns.push(SummaryConcern::TdeeMismatch {
                    reported: tdee,
                    estimated,
                });
            }
        }
    }

    concerns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health() -> CompleteHealthData {
        CompleteHealthData {
            age: 30,
            weight: 75.0,
            height: 170.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::Moderate,
        }
    }

    fn summary(tdee: u32, target: u32) -> NutritionSummary {
        NutritionSummary {
            bmr: None,
            tdee: Some(tdee),
            target_daily_calories: target,
            macro_advice: String::new(),
        }
    }

    #[test]
    fn mifflin_matches_reference_values() {
        // 750 + 1062.5 - 150 + 5
        assert!((mifflin_st_jeor(&health()) - 1667.5).abs() < 1e-9);

        let mut female = health();
        female.gender = Gender::Female;
        assert!((mifflin_st_jeor(&female) - 1501.5).abs() < 1e-9);
    }

    #[test]
    fn tdee_scales_with_activity() {
        let e = estimate(&health());
        assert!((e.tdee - 1667.5 * 1.55).abs() < 1e-9);
    }

    #[test]
    fn weight_loss_target_must_be_below_tdee() {
        let h = health();
        assert!(review_summary(&summary(2585, 2085), PlanGoalId::WeightLoss, Some(&h)).is_empty());

        let concerns = review_summary(&summary(2585, 2700), PlanGoalId::WeightLoss, Some(&h));
        assert_eq!(
            concerns,
            vec![SummaryConcern::WrongDirection {
                target: 2700,
                tdee: 2585
            }]
        );
    }

    #[test]
    fn far_off_tdee_is_flagged() {
        let h = health();
        let concerns = review_summary(&summary(4000, 3500), PlanGoalId::WeightLoss, Some(&h));
        assert!(matches!(
            concerns.as_slice(),
            [SummaryConcern::TdeeMismatch { reported: 4000, .. }]
        ));
    }

    #[test]
    fn summary_without_tdee_is_not_reviewed() {
        let s = NutritionSummary {
            bmr: None,
            tdee: None,
            target_daily_calories: 2000,
            macro_advice: String::new(),
        };
        assert!(review_summary(&s, PlanGoalId::WeightGain, None).is_empty());
    }
}
