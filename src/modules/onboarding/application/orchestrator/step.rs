use crate::onboarding::application::domain::Role;
use crate::storage::application::ports::outgoing::FileHandle;

/// One screen/state of the onboarding and recovery wizard.
///
/// Two registration chains share the entry and exit; the recovery chain
/// loops back into Login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Splash,
    Login,
    RoleSelect,
    // Student chain
    RegisterStudent,
    WorkInfo,
    Skills,
    UploadCv,
    // Company chain
    RegisterCompany,
    RepInfo,
    DocsUpload,
    /// Terminal for both onboarding chains.
    Complete,
    // Recovery chain
    RecoverStart,
    VerifyCode,
    ResetPassword,
    RecoverSuccess,
}

impl Step {
    /// Where back-navigation lands. Always permitted; rewinds presentation
    /// only and never undoes a persisted write.
    pub fn back(&self) -> Step {
        match self {
            Step::Splash => Step::Splash,
            Step::Login => Step::Splash,
            Step::RoleSelect => Step::Splash,
            Step::RegisterStudent => Step::RoleSelect,
            Step::WorkInfo => Step::RegisterStudent,
            Step::Skills => Step::WorkInfo,
            Step::UploadCv => Step::Skills,
            Step::RegisterCompany => Step::RoleSelect,
            Step::RepInfo => Step::RegisterCompany,
            Step::DocsUpload => Step::RepInfo,
            Step::Complete => Step::Splash,
            Step::RecoverStart => Step::Login,
            Step::VerifyCode => Step::RecoverStart,
            Step::ResetPassword => Step::VerifyCode,
            Step::RecoverSuccess => Step::Login,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Complete)
    }
}

#[cfg(not(tarpaulin_include))]
impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::Splash => "splash",
            Step::Login => "login",
            Step::RoleSelect => "role-select",
            Step::RegisterStudent => "register-student",
            Step::WorkInfo => "work-info",
            Step::Skills => "skills",
            Step::UploadCv => "upload-cv",
            Step::RegisterCompany => "register-company",
            Step::RepInfo => "rep-info",
            Step::DocsUpload => "docs-upload",
            Step::Complete => "complete",
            Step::RecoverStart => "recover-start",
            Step::VerifyCode => "verify-code",
            Step::ResetPassword => "reset-password",
            Step::RecoverSuccess => "recover-success",
        };
        write!(f, "{name}")
    }
}

/// What the user chose on the entry screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryIntent {
    Login,
    Register,
}

/// User input for a single step submission, as reported by the presentation
/// layer. Each variant is only accepted while its step is active.
#[derive(Debug, Clone)]
pub enum StepInput {
    Splash(EntryIntent),
    Login {
        email: String,
        password: String,
    },
    RoleSelect(Role),
    RegisterStudent {
        full_name: String,
        email: String,
        password: String,
        confirm_password: String,
    },
    WorkInfo {
        works_now: bool,
        employer: String,
        role: String,
    },
    Skills {
        skills: Vec<String>,
    },
    UploadCv {
        file: FileHandle,
    },
    RegisterCompany {
        nit: String,
        phone: String,
        email: String,
        workers: String,
    },
    RepInfo {
        name: String,
        document_type: String,
        document_number: String,
        document: FileHandle,
    },
    DocsUpload {
        tax_document: FileHandle,
        chamber_document: FileHandle,
    },
    RecoverStart {
        email: String,
    },
    VerifyCode {
        code: String,
    },
    ResetPassword {
        password: String,
        confirm_password: String,
    },
    RecoverSuccess,
}

impl StepInput {
    /// The step this input belongs to.
    pub fn step(&self) -> Step {
        match self {
            StepInput::Splash(_) => Step::Splash,
            StepInput::Login { .. } => Step::Login,
            StepInput::RoleSelect(_) => Step::RoleSelect,
            StepInput::RegisterStudent { .. } => Step::RegisterStudent,
            StepInput::WorkInfo { .. } => Step::WorkInfo,
            StepInput::Skills { .. } => Step::Skills,
            StepInput::UploadCv { .. } => Step::UploadCv,
            StepInput::RegisterCompany { .. } => Step::RegisterCompany,
            StepInput::RepInfo { .. } => Step::RepInfo,
            StepInput::DocsUpload { .. } => Step::DocsUpload,
            StepInput::RecoverStart { .. } => Step::RecoverStart,
            StepInput::VerifyCode { .. } => Step::VerifyCode,
            StepInput::ResetPassword { .. } => Step::ResetPassword,
            StepInput::RecoverSuccess => Step::RecoverSuccess,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_map_matches_the_wizard_graph() {
        assert_eq!(Step::Login.back(), Step::Splash);
        assert_eq!(Step::UploadCv.back(), Step::Skills);
        assert_eq!(Step::DocsUpload.back(), Step::RepInfo);
        assert_eq!(Step::ResetPassword.back(), Step::VerifyCode);
        assert_eq!(Step::Splash.back(), Step::Splash);
    }

    #[test]
    fn only_complete_is_terminal() {
        assert!(Step::Complete.is_terminal());
        assert!(!Step::RecoverSuccess.is_terminal());
        assert!(!Step::UploadCv.is_terminal());
    }
}
