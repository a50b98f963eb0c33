use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two user kinds the wizard onboards.
///
/// Serialized values match the `rol` field the mobile clients already store,
/// so documents written here stay readable by the deployed apps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "estudiante")]
    Student,
    #[serde(rename = "empresa")]
    Company,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "estudiante",
            Role::Company => "empresa",
        }
    }
}

/// Student profile document, collection `usuarios`.
///
/// Created at basic registration with `completado = false` and filled in
/// incrementally by the later wizard steps. Field names are the Firestore
/// wire names used by the existing clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub uid: String,
    pub nombre: String,
    pub email: String,
    pub rol: Role,
    #[serde(rename = "fechaRegistro")]
    pub fecha_registro: DateTime<Utc>,
    pub completado: bool,
    #[serde(rename = "trabajaActual", skip_serializing_if = "Option::is_none")]
    pub trabaja_actual: Option<bool>,
    #[serde(rename = "empresaActual", skip_serializing_if = "Option::is_none")]
    pub empresa_actual: Option<String>,
    #[serde(rename = "rolActual", skip_serializing_if = "Option::is_none")]
    pub rol_actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habilidades: Option<Vec<String>>,
    #[serde(rename = "cvUrl", skip_serializing_if = "Option::is_none")]
    pub cv_url: Option<String>,
    #[serde(rename = "cvSubido", skip_serializing_if = "Option::is_none")]
    pub cv_subido: Option<bool>,
    #[serde(
        rename = "ultimaActualizacion",
        skip_serializing_if = "Option::is_none"
    )]
    pub ultima_actualizacion: Option<DateTime<Utc>>,
}

impl StudentProfile {
    /// A freshly registered student: nothing beyond the basics, not complete.
    pub fn new(uid: String, nombre: String, email: String) -> Self {
        Self {
            uid,
            nombre,
            email,
            rol: Role::Student,
            fecha_registro: Utc::now(),
            completado: false,
            trabaja_actual: None,
            empresa_actual: None,
            rol_actual: None,
            habilidades: None,
            cv_url: None,
            cv_subido: None,
            ultima_actualizacion: None,
        }
    }
}

/// Company profile document, collection `empresas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub uid: String,
    pub nit: String,
    pub telefono: String,
    pub email: String,
    #[serde(rename = "numeroTrabajadores")]
    pub numero_trabajadores: String,
    pub rol: Role,
    #[serde(rename = "fechaRegistro")]
    pub fecha_registro: DateTime<Utc>,
    pub completado: bool,
    #[serde(rename = "representanteLegal", skip_serializing_if = "Option::is_none")]
    pub representante_legal: Option<String>,
    #[serde(rename = "tipoDocumento", skip_serializing_if = "Option::is_none")]
    pub tipo_documento: Option<String>,
    #[serde(rename = "numeroDocumento", skip_serializing_if = "Option::is_none")]
    pub numero_documento: Option<String>,
    #[serde(
        rename = "documentoRepresentanteUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub documento_representante_url: Option<String>,
    #[serde(rename = "rutUrl", skip_serializing_if = "Option::is_none")]
    pub rut_url: Option<String>,
    #[serde(rename = "camaraComercioUrl", skip_serializing_if = "Option::is_none")]
    pub camara_comercio_url: Option<String>,
    #[serde(
        rename = "ultimaActualizacion",
        skip_serializing_if = "Option::is_none"
    )]
    pub ultima_actualizacion: Option<DateTime<Utc>>,
}

impl CompanyProfile {
    pub fn new(
        uid: String,
        nit: String,
        telefono: String,
        email: String,
        numero_trabajadores: String,
    ) -> Self {
        Self {
            uid,
            nit,
            telefono,
            email,
            numero_trabajadores,
            rol: Role::Company,
            fecha_registro: Utc::now(),
            completado: false,
            representante_legal: None,
            tipo_documento: None,
            numero_documento: None,
            documento_representante_url: None,
            rut_url: None,
            camara_comercio_url: None,
            ultima_actualizacion: None,
        }
    }
}

// ============================================================================
// Partial updates
// ============================================================================
//
// Each wizard step past registration persists a merge patch, never the whole
// document. These structs serialize to exactly the fields their step owns.

#[derive(Debug, Clone, Serialize)]
pub struct WorkInfoPatch {
    #[serde(rename = "trabajaActual")]
    pub trabaja_actual: bool,
    #[serde(rename = "empresaActual")]
    pub empresa_actual: String,
    #[serde(rename = "rolActual")]
    pub rol_actual: String,
    #[serde(rename = "ultimaActualizacion")]
    pub ultima_actualizacion: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillsPatch {
    pub habilidades: Vec<String>,
    #[serde(rename = "ultimaActualizacion")]
    pub ultima_actualizacion: DateTime<Utc>,
}

/// Final student step: the CV landed in blob storage, onboarding is done.
#[derive(Debug, Clone, Serialize)]
pub struct CvPatch {
    #[serde(rename = "cvUrl")]
    pub cv_url: String,
    #[serde(rename = "cvSubido")]
    pub cv_subido: bool,
    pub completado: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepresentativePatch {
    #[serde(rename = "representanteLegal")]
    pub representante_legal: String,
    #[serde(rename = "tipoDocumento")]
    pub tipo_documento: String,
    #[serde(rename = "numeroDocumento")]
    pub numero_documento: String,
    #[serde(rename = "documentoRepresentanteUrl")]
    pub documento_representante_url: String,
    #[serde(rename = "ultimaActualizacion")]
    pub ultima_actualizacion: DateTime<Utc>,
}

/// Final company step: both registry documents uploaded, onboarding is done.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDocumentsPatch {
    #[serde(rename = "rutUrl")]
    pub rut_url: String,
    #[serde(rename = "camaraComercioUrl")]
    pub camara_comercio_url: String,
    pub completado: bool,
    #[serde(rename = "ultimaActualizacion")]
    pub ultima_actualizacion: DateTime<Utc>,
}
