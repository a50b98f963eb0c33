use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::auth::application::ports::outgoing::AuthProvider;
use crate::onboarding::application::domain::SkillsPatch;
use crate::onboarding::application::ports::outgoing::{fields_of, Collection, ProfileStore};
use crate::onboarding::application::services::validation::{self, ValidationError};
use crate::onboarding::application::use_cases::StepError;

#[async_trait]
pub trait ISaveSkillsUseCase: Send + Sync {
    async fn execute(&self, skills: Vec<String>) -> Result<(), StepError>;
}

/// Student step "skills": filters blank entries, requires at least one
/// survivor, then merge-updates the profile document.
pub struct SaveSkillsUseCase {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl SaveSkillsUseCase {
    pub fn new(auth: Arc<dyn AuthProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { auth, profiles }
    }
}

#[async_trait]
impl ISaveSkillsUseCase for SaveSkillsUseCase {
    async fn execute(&self, skills: Vec<String>) -> Result<(), StepError> {
        let cleaned = validation::clean_skills(skills);
        if cleaned.is_empty() {
            return Err(ValidationError::NoSkills.into());
        }

        let session = self
            .auth
            .current_session()
            .ok_or(StepError::NotAuthenticated)?;

        let count = cleaned.len();
        let patch = SkillsPatch {
            habilidades: cleaned,
            ultima_actualizacion: Utc::now(),
        };
        self.profiles
            .update(Collection::Students, &session.account_id, fields_of(&patch)?)
            .await?;

        info!(uid = %session.account_id, count, "skills saved");
        Ok(())
    }
}
