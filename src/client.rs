use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::ChefConfig;
use crate::decode::{decode_image, decode_recipes, decode_weekly_plan};
use crate::error::{
    ChefError, Operation, EMPTY_EDIT_INSTRUCTION, EMPTY_INGREDIENTS, NO_IMAGE_TO_EDIT,
};
use crate::gemini::{
    GatewayError, GeminiClient, GenerateContentRequest, GenerateContentResponse,
    GenerativeBackend, InlineData,
};
use crate::image::ImagePayload;
use crate::models::*;
use crate::nutrition::review_summary;
use crate::{prompts, schema};

/// Entry point for every generation action.
///
/// Each call makes exactly one request and keeps no state between calls,
/// so a clone can be handed to each concurrently running task.
#[derive(Clone)]
pub struct ChefClient {
    config: ChefConfig,
    backend: Arc<dyn GenerativeBackend>,
}

impl ChefClient {
    /// Client talking to the hosted service described by `config`.
    pub fn new(config: ChefConfig) -> Self {
        let api_key = config.api_key().unwrap_or_default().to_string();
        let backend = Arc::new(GeminiClient::new(&config.base_url, api_key));
        Self { config, backend }
    }

    pub fn from_env() -> Self {
        Self::new(ChefConfig::from_env())
    }

    /// Client using a custom backend. The credential check still applies.
    pub fn with_backend(config: ChefConfig, backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &ChefConfig {
        &self.config
    }

    /// The backend, once the credential is known to be usable.
    fn backend(&self) -> Result<&dyn GenerativeBackend, ChefError> {
        self.config.api_key()?;
        Ok(self.backend.as_ref())
    }

    /// One round trip. The service error is logged here and replaced with
    /// the operation's generic failure.
    async fn send(
        &self,
        backend: &dyn GenerativeBackend,
        operation: Operation,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ChefError> {
        debug!(%operation, model, "sending generation request");
        backend
            .generate_content(model, request)
            .await
            .map_err(|e: GatewayError| {
                error!(%operation, model, status = ?e.status(), error = %e, "generation request failed");
                ChefError::Service {
                    operation,
                    status: e.status(),
                }
            })
    }

    /// Suggest recipes that use only `ingredients` plus kitchen staples.
    ///
    /// `restrictions` is the already merged restriction text; see
    /// [`prompts::merge_restrictions`].
    pub async fn generate_recipes(
        &self,
        ingredients: &str,
        restrictions: &str,
    ) -> Result<Vec<Recipe>, ChefError> {
        let operation = Operation::Recipes;
        let backend = self.backend()?;
        if ingredients.trim().is_empty() {
            return Err(ChefError::Validation(EMPTY_INGREDIENTS));
        }

        let prompt = prompts::recipe_prompt(ingredients, restrictions);
        let request = GenerateContentRequest::structured(&prompt, schema::recipe_list_schema());
        let response = self
            .send(backend, operation, &self.config.text_model, &request)
            .await?;

        let recipes = decode_recipes(response.text().as_deref()).map_err(|kind| {
            error!(%operation, error = %kind, "could not decode recipes");
            ChefError::decode(operation, kind)
        })?;

        info!(count = recipes.len(), "generated recipes");
        Ok(recipes)
    }

    /// Build a seven-day plan for `goal`.
    ///
    /// Health data only personalises the plan when all of its fields are
    /// set; otherwise a 2000 kcal baseline is used.
    pub async fn generate_weekly_plan(
        &self,
        goal: PlanGoalId,
        restrictions: &str,
        health: Option<&UserHealthData>,
    ) -> Result<WeeklyPlan, ChefError> {
        let operation = Operation::WeeklyPlan;
        let backend = self.backend()?;

        let prompt = prompts::weekly_plan_prompt(goal, restrictions, health);
        let request = GenerateContentRequest::structured(&prompt, schema::weekly_plan_schema());
        let response = self
            .send(backend, operation, &self.config.text_model, &request)
            .await?;

        let plan = decode_weekly_plan(response.text().as_deref()).map_err(|kind| {
            error!(%operation, error = %kind, "could not decode weekly plan");
            ChefError::decode(operation, kind)
        })?;

        if let Some(summary) = &plan.nutrition_summary {
            let complete = health.and_then(UserHealthData::complete);
            for concern in review_summary(summary, goal, complete.as_ref()) {
                warn!(goal = goal.as_str(), ?concern, "nutrition summary looks off");
            }
        }

        info!(goal = goal.as_str(), days = plan.days.len(), "generated weekly plan");
        Ok(plan)
    }

    /// Generate a new image, or edit `source` when one is given.
    pub async fn request_image(
        &self,
        instruction: &str,
        source: Option<&ImagePayload>,
    ) -> Result<ImagePayload, ChefError> {
        let operation = match source {
            Some(_) => Operation::EditImage,
            None => Operation::GenerateImage,
        };
        let backend = self.backend()?;

        let source: Option<InlineData> = source.map(ImagePayload::to_inline);
        let request = GenerateContentRequest::image(instruction, source);
        let response = self
            .send(backend, operation, &self.config.image_model, &request)
            .await?;

        decode_image(&response).map_err(|kind| {
            error!(%operation, error = %kind, "no usable image in response");
            ChefError::decode(operation, kind)
        })
    }

    /// Food photograph for an arbitrary dish description.
    pub async fn generate_image(&self, subject: &str) -> Result<ImagePayload, ChefError> {
        self.request_image(&prompts::image_prompt(subject), None)
            .await
    }

    /// Apply `instruction` to an image given as a data URI.
    pub async fn edit_image(
        &self,
        image_data_uri: &str,
        instruction: &str,
    ) -> Result<ImagePayload, ChefError> {
        self.config.api_key()?;
        if instruction.trim().is_empty() {
            return Err(ChefError::Validation(EMPTY_EDIT_INSTRUCTION));
        }
        let source = ImagePayload::from_data_uri(image_data_uri).ok_or(ChefError::InvalidImage)?;
        self.request_image(instruction.trim(), Some(&source)).await
    }

    /// Generate a photo for `recipe` and store it as its custom image.
    ///
    /// The recipe is left untouched if anything fails.
    pub async fn generate_recipe_image(&self, recipe: &mut Recipe) -> Result<(), ChefError> {
        let subject = prompts::recipe_image_subject(recipe);
        let image = self.generate_image(&subject).await?;
        recipe.custom_image = Some(image.to_data_uri());
        Ok(())
    }

    /// Edit `recipe`'s custom image in place.
    ///
    /// Requires an existing custom image. The recipe is left untouched if
    /// anything fails.
    pub async fn edit_recipe_image(
        &self,
        recipe: &mut Recipe,
        instruction: &str,
    ) -> Result<(), ChefError> {
        let current = recipe
            .custom_image
            .as_deref()
            .ok_or(ChefError::Validation(NO_IMAGE_TO_EDIT))?;
        let image = self.edit_image(current, instruction).await?;
        recipe.custom_image = Some(image.to_data_uri());
        Ok(())
    }
}
