use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::auth::application::ports::outgoing::{AuthProvider, Session};
use crate::auth::application::use_cases::login_user::{
    ILoginUserUseCase, LoginError, LoginUserUseCase,
};
use crate::auth::application::use_cases::recover_password::{
    IRecoverPasswordUseCase, RecoverPasswordError, RecoverPasswordUseCase,
};
use crate::onboarding::application::domain::Role;
use crate::onboarding::application::orchestrator::step::{EntryIntent, Step, StepInput};
use crate::onboarding::application::ports::outgoing::ProfileStore;
use crate::onboarding::application::services::validation;
use crate::onboarding::application::use_cases::check_completion::{
    CheckCompletionUseCase, ICheckCompletionUseCase,
};
use crate::onboarding::application::use_cases::register_company::{
    IRegisterCompanyUseCase, RegisterCompanyInput, RegisterCompanyUseCase,
};
use crate::onboarding::application::use_cases::register_student::{
    IRegisterStudentUseCase, RegisterStudentInput, RegisterStudentUseCase,
};
use crate::onboarding::application::use_cases::save_representative::{
    ISaveRepresentativeUseCase, RepresentativeInput, SaveRepresentativeUseCase,
};
use crate::onboarding::application::use_cases::save_skills::{
    ISaveSkillsUseCase, SaveSkillsUseCase,
};
use crate::onboarding::application::use_cases::save_work_info::{
    ISaveWorkInfoUseCase, SaveWorkInfoUseCase, WorkInfoInput,
};
use crate::onboarding::application::use_cases::upload_company_documents::{
    CompanyDocumentsInput, IUploadCompanyDocumentsUseCase, UploadCompanyDocumentsUseCase,
};
use crate::onboarding::application::use_cases::upload_cv::{IUploadCvUseCase, UploadCvUseCase};
use crate::onboarding::application::use_cases::StepError;
use crate::storage::application::ports::outgoing::BlobStore;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum FlowError {
    #[error("Another submission is already in progress")]
    SubmissionInFlight,

    #[error("This input does not belong to the current step")]
    WrongStep { current: Step },

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Login(#[from] LoginError),

    #[error(transparent)]
    Recover(#[from] RecoverPasswordError),
}

// ============================================================================
// Flow Controller (Orchestration Layer)
// ============================================================================

#[derive(Debug, Clone, Default)]
struct FlowContext {
    session: Option<Session>,
    role: Option<Role>,
}

/// Sequences the onboarding and recovery wizard.
///
/// A finite-state machine over [`Step`]: a forward transition fires only when
/// the step's whole chain (validation, then ordered remote calls) succeeds;
/// back-navigation is always allowed and touches nothing remote. Submissions
/// are serialized — a second `submit_step` while one is in flight is rejected
/// rather than interleaved, since overlapping chains against the same account
/// could mix partial writes.
pub struct FlowController {
    auth: Arc<dyn AuthProvider>,
    register_student: Arc<dyn IRegisterStudentUseCase>,
    register_company: Arc<dyn IRegisterCompanyUseCase>,
    save_work_info: Arc<dyn ISaveWorkInfoUseCase>,
    save_skills: Arc<dyn ISaveSkillsUseCase>,
    upload_cv: Arc<dyn IUploadCvUseCase>,
    save_representative: Arc<dyn ISaveRepresentativeUseCase>,
    upload_company_documents: Arc<dyn IUploadCompanyDocumentsUseCase>,
    login: Arc<dyn ILoginUserUseCase>,
    recover_password: Arc<dyn IRecoverPasswordUseCase>,
    check_completion: Arc<dyn ICheckCompletionUseCase>,

    current: RwLock<Step>,
    last_error: RwLock<Option<String>>,
    context: RwLock<FlowContext>,
    in_flight: tokio::sync::Mutex<()>,
}

impl FlowController {
    /// Wire a controller over the three remote collaborators. All step use
    /// cases are built here; nothing reaches the stores except through them.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfileStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self::from_parts(FlowParts {
            auth: auth.clone(),
            register_student: Arc::new(RegisterStudentUseCase::new(
                auth.clone(),
                profiles.clone(),
            )),
            register_company: Arc::new(RegisterCompanyUseCase::new(
                auth.clone(),
                profiles.clone(),
            )),
            save_work_info: Arc::new(SaveWorkInfoUseCase::new(auth.clone(), profiles.clone())),
            save_skills: Arc::new(SaveSkillsUseCase::new(auth.clone(), profiles.clone())),
            upload_cv: Arc::new(UploadCvUseCase::new(
                auth.clone(),
                profiles.clone(),
                blobs.clone(),
            )),
            save_representative: Arc::new(SaveRepresentativeUseCase::new(
                auth.clone(),
                profiles.clone(),
                blobs.clone(),
            )),
            upload_company_documents: Arc::new(UploadCompanyDocumentsUseCase::new(
                auth.clone(),
                profiles.clone(),
                blobs,
            )),
            login: Arc::new(LoginUserUseCase::new(auth.clone(), profiles.clone())),
            recover_password: Arc::new(RecoverPasswordUseCase::new(auth)),
            check_completion: Arc::new(CheckCompletionUseCase::new(profiles)),
        })
    }

    /// Assemble from pre-built use cases. Lets tests substitute any of them.
    pub fn from_parts(parts: FlowParts) -> Self {
        Self {
            auth: parts.auth,
            register_student: parts.register_student,
            register_company: parts.register_company,
            save_work_info: parts.save_work_info,
            save_skills: parts.save_skills,
            upload_cv: parts.upload_cv,
            save_representative: parts.save_representative,
            upload_company_documents: parts.upload_company_documents,
            login: parts.login,
            recover_password: parts.recover_password,
            check_completion: parts.check_completion,
            current: RwLock::new(Step::Splash),
            last_error: RwLock::new(None),
            context: RwLock::new(FlowContext::default()),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    pub fn current_step(&self) -> Step {
        *self.current.read().expect("step lock poisoned")
    }

    /// The step's current error message, if the last submission failed.
    /// At most one message at a time; cleared by a successful submission.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().expect("error lock poisoned").clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.context.read().expect("context lock poisoned").session.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.context.read().expect("context lock poisoned").role
    }

    /// Rewind one screen. Never blocked by an in-flight chain and never
    /// undoes a remote write; a late result from an abandoned chain is
    /// simply ignored by the presentation.
    pub fn back(&self) -> Step {
        let mut current = self.current.write().expect("step lock poisoned");
        *current = current.back();
        *current
    }

    /// Jump from the login screen into the recovery chain ("forgot
    /// password"). A plain navigation, nothing is submitted.
    pub fn start_recovery(&self) -> Result<Step, FlowError> {
        let mut current = self.current.write().expect("step lock poisoned");
        if *current != Step::Login {
            return Err(FlowError::WrongStep { current: *current });
        }
        *current = Step::RecoverStart;
        Ok(*current)
    }

    pub fn sign_out(&self) {
        self.auth.sign_out();
        let mut context = self.context.write().expect("context lock poisoned");
        context.session = None;
        context.role = None;
    }

    /// Whether onboarding finished for the signed-in account.
    pub async fn is_onboarding_complete(&self) -> Result<bool, FlowError> {
        let session = self.session().ok_or(StepError::NotAuthenticated)?;
        Ok(self.check_completion.execute(&session.account_id).await?)
    }

    /// Submit the active step.
    ///
    /// Runs the step's validation and its ordered remote chain; advances and
    /// returns the next step on success. On failure the controller stays on
    /// the current step and records a single human-readable message.
    pub async fn submit_step(&self, input: StepInput) -> Result<Step, FlowError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| FlowError::SubmissionInFlight)?;

        let current = self.current_step();
        if input.step() != current {
            warn!(%current, given = %input.step(), "input for wrong step");
            return Err(FlowError::WrongStep { current });
        }

        match self.dispatch(input).await {
            Ok(next) => {
                *self.last_error.write().expect("error lock poisoned") = None;
                *self.current.write().expect("step lock poisoned") = next;
                debug!(from = %current, to = %next, "step advanced");
                Ok(next)
            }
            Err(e) => {
                *self.last_error.write().expect("error lock poisoned") = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn dispatch(&self, input: StepInput) -> Result<Step, FlowError> {
        match input {
            StepInput::Splash(EntryIntent::Login) => Ok(Step::Login),
            StepInput::Splash(EntryIntent::Register) => Ok(Step::RoleSelect),

            StepInput::Login { email, password } => {
                let output = self.login.execute(&email, &password).await?;
                let mut context = self.context.write().expect("context lock poisoned");
                context.session = Some(output.session);
                context.role = Some(output.role);
                // The wizard has no home screen; a successful sign-in ends
                // the chain back at the entry point with a live session.
                Ok(Step::Splash)
            }

            StepInput::RoleSelect(Role::Student) => Ok(Step::RegisterStudent),
            StepInput::RoleSelect(Role::Company) => Ok(Step::RegisterCompany),

            StepInput::RegisterStudent {
                full_name,
                email,
                password,
                confirm_password,
            } => {
                let session = self
                    .register_student
                    .execute(RegisterStudentInput {
                        full_name,
                        email,
                        password,
                        confirm_password,
                    })
                    .await?;
                let mut context = self.context.write().expect("context lock poisoned");
                context.session = Some(session);
                context.role = Some(Role::Student);
                Ok(Step::WorkInfo)
            }

            StepInput::WorkInfo {
                works_now,
                employer,
                role,
            } => {
                self.save_work_info
                    .execute(WorkInfoInput {
                        works_now,
                        employer,
                        role,
                    })
                    .await?;
                Ok(Step::Skills)
            }

            StepInput::Skills { skills } => {
                self.save_skills.execute(skills).await?;
                Ok(Step::UploadCv)
            }

            StepInput::UploadCv { file } => {
                self.upload_cv.execute(file).await?;
                Ok(Step::Complete)
            }

            StepInput::RegisterCompany {
                nit,
                phone,
                email,
                workers,
            } => {
                let session = self
                    .register_company
                    .execute(RegisterCompanyInput {
                        nit,
                        phone,
                        email,
                        workers,
                    })
                    .await?;
                let mut context = self.context.write().expect("context lock poisoned");
                context.session = Some(session);
                context.role = Some(Role::Company);
                Ok(Step::RepInfo)
            }

            StepInput::RepInfo {
                name,
                document_type,
                document_number,
                document,
            } => {
                self.save_representative
                    .execute(RepresentativeInput {
                        name,
                        document_type,
                        document_number,
                        document,
                    })
                    .await?;
                Ok(Step::DocsUpload)
            }

            StepInput::DocsUpload {
                tax_document,
                chamber_document,
            } => {
                self.upload_company_documents
                    .execute(CompanyDocumentsInput {
                        tax_document,
                        chamber_document,
                    })
                    .await?;
                Ok(Step::Complete)
            }

            StepInput::RecoverStart { email } => {
                self.recover_password.execute(&email).await?;
                Ok(Step::VerifyCode)
            }

            // The code entry and reset screens have no backing service; the
            // provider's emailed link does the real reset. They validate
            // locally and move on.
            StepInput::VerifyCode { code } => {
                validation::require("Code", &code).map_err(StepError::from)?;
                Ok(Step::ResetPassword)
            }

            StepInput::ResetPassword {
                password,
                confirm_password,
            } => {
                validation::validate_password_length(&password).map_err(StepError::from)?;
                validation::validate_passwords_match(&password, &confirm_password)
                    .map_err(StepError::from)?;
                Ok(Step::RecoverSuccess)
            }

            StepInput::RecoverSuccess => Ok(Step::Login),
        }
    }
}

/// Everything a [`FlowController`] is made of.
pub struct FlowParts {
    pub auth: Arc<dyn AuthProvider>,
    pub register_student: Arc<dyn IRegisterStudentUseCase>,
    pub register_company: Arc<dyn IRegisterCompanyUseCase>,
    pub save_work_info: Arc<dyn ISaveWorkInfoUseCase>,
    pub save_skills: Arc<dyn ISaveSkillsUseCase>,
    pub upload_cv: Arc<dyn IUploadCvUseCase>,
    pub save_representative: Arc<dyn ISaveRepresentativeUseCase>,
    pub upload_company_documents: Arc<dyn IUploadCompanyDocumentsUseCase>,
    pub login: Arc<dyn ILoginUserUseCase>,
    pub recover_password: Arc<dyn IRecoverPasswordUseCase>,
    pub check_completion: Arc<dyn ICheckCompletionUseCase>,
}
