pub mod entities;

pub use entities::{
    CompanyDocumentsPatch, CompanyProfile, CvPatch, RepresentativePatch, Role, SkillsPatch,
    StudentProfile, WorkInfoPatch,
};
