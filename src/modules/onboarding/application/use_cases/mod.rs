pub mod check_completion;
pub mod error;
pub mod register_company;
pub mod register_student;
pub mod save_representative;
pub mod save_skills;
pub mod save_work_info;
pub mod upload_company_documents;
pub mod upload_cv;

pub use error::StepError;
