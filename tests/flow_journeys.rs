//! End-to-end wizard journeys over the in-memory backends.

use std::sync::Arc;

use serde_json::json;

use onboarding_flow::auth::adapter::outgoing::MemoryAuthProvider;
use onboarding_flow::auth::application::ports::outgoing::{AccountId, SessionStore};
use onboarding_flow::onboarding::adapter::outgoing::MemoryProfileStore;
use onboarding_flow::onboarding::application::domain::Role;
use onboarding_flow::onboarding::application::orchestrator::{
    EntryIntent, FlowController, FlowError, Step, StepInput,
};
use onboarding_flow::onboarding::application::ports::outgoing::Collection;
use onboarding_flow::storage::adapter::outgoing::MemoryBlobStore;
use onboarding_flow::storage::application::ports::outgoing::FileHandle;

struct Harness {
    flow: FlowController,
    profiles: Arc<MemoryProfileStore>,
    blobs: Arc<MemoryBlobStore>,
}

fn harness() -> Harness {
    let sessions = SessionStore::new();
    let auth = Arc::new(MemoryAuthProvider::new(sessions.clone()));
    let profiles = Arc::new(MemoryProfileStore::with_sessions(sessions));
    let blobs = Arc::new(MemoryBlobStore::new("demo.appspot.com"));
    let flow = FlowController::new(auth, profiles.clone(), blobs.clone());
    Harness {
        flow,
        profiles,
        blobs,
    }
}

fn pdf(name: &str) -> FileHandle {
    FileHandle::from_bytes(name, format!("%PDF-1.4 {name}").into_bytes())
}

async fn register_alice(flow: &FlowController) -> AccountId {
    flow.submit_step(StepInput::Splash(EntryIntent::Register))
        .await
        .unwrap();
    flow.submit_step(StepInput::RoleSelect(Role::Student))
        .await
        .unwrap();
    flow.submit_step(StepInput::RegisterStudent {
        full_name: "Alice A.".to_string(),
        email: "alice@example.com".to_string(),
        password: "Passw0rd!".to_string(),
        confirm_password: "Passw0rd!".to_string(),
    })
    .await
    .unwrap();
    flow.session().unwrap().account_id
}

#[tokio::test]
async fn student_journey_writes_a_complete_profile() {
    let h = harness();
    let uid = register_alice(&h.flow).await;

    h.flow
        .submit_step(StepInput::WorkInfo {
            works_now: true,
            employer: "Acme Ltda".to_string(),
            role: "Intern".to_string(),
        })
        .await
        .unwrap();
    h.flow
        .submit_step(StepInput::Skills {
            skills: vec!["Excel".to_string(), "  Teamwork  ".to_string()],
        })
        .await
        .unwrap();
    h.flow
        .submit_step(StepInput::UploadCv { file: pdf("cv.pdf") })
        .await
        .unwrap();

    assert_eq!(h.flow.current_step(), Step::Complete);
    assert_eq!(h.blobs.object_count(), 1);

    let doc = h.profiles.document(Collection::Students, &uid).unwrap();
    assert_eq!(doc["rol"], json!("estudiante"));
    assert_eq!(doc["nombre"], json!("Alice A."));
    assert_eq!(doc["email"], json!("alice@example.com"));
    assert_eq!(doc["completado"], json!(true));
    assert_eq!(doc["trabajaActual"], json!(true));
    assert_eq!(doc["empresaActual"], json!("Acme Ltda"));
    assert_eq!(doc["rolActual"], json!("Intern"));
    // Skills arrive trimmed, in the order the user entered them.
    assert_eq!(doc["habilidades"], json!(["Excel", "Teamwork"]));
    assert_eq!(doc["cvSubido"], json!(true));
    let cv_url = doc["cvUrl"].as_str().unwrap();
    assert!(cv_url.contains(&format!("cvs%2F{uid}%2F")));
    assert!(cv_url.contains("alt=media&token="));
    assert!(doc.contains_key("fechaRegistro"));

    // Nothing leaked into the other collection.
    assert!(h.profiles.document(Collection::Companies, &uid).is_none());
}

#[tokio::test]
async fn company_journey_writes_a_complete_profile() {
    let h = harness();
    h.flow
        .submit_step(StepInput::Splash(EntryIntent::Register))
        .await
        .unwrap();
    h.flow
        .submit_step(StepInput::RoleSelect(Role::Company))
        .await
        .unwrap();
    h.flow
        .submit_step(StepInput::RegisterCompany {
            nit: "900123456-7".to_string(),
            phone: "3001234567".to_string(),
            email: "hr@acme.example".to_string(),
            workers: "25".to_string(),
        })
        .await
        .unwrap();
    let uid = h.flow.session().unwrap().account_id;

    h.flow
        .submit_step(StepInput::RepInfo {
            name: "Bob B.".to_string(),
            document_type: "CC".to_string(),
            document_number: "1020304050".to_string(),
            document: pdf("cedula.pdf"),
        })
        .await
        .unwrap();
    h.flow
        .submit_step(StepInput::DocsUpload {
            tax_document: pdf("rut.pdf"),
            chamber_document: pdf("camara.pdf"),
        })
        .await
        .unwrap();

    assert_eq!(h.flow.current_step(), Step::Complete);
    assert_eq!(h.blobs.object_count(), 3);

    let doc = h.profiles.document(Collection::Companies, &uid).unwrap();
    assert_eq!(doc["rol"], json!("empresa"));
    assert_eq!(doc["nit"], json!("900123456-7"));
    assert_eq!(doc["numeroTrabajadores"], json!("25"));
    assert_eq!(doc["representanteLegal"], json!("Bob B."));
    assert_eq!(doc["completado"], json!(true));

    let rep_url = doc["documentoRepresentanteUrl"].as_str().unwrap();
    let rut_url = doc["rutUrl"].as_str().unwrap();
    let camara_url = doc["camaraComercioUrl"].as_str().unwrap();
    assert!(rep_url.contains(&format!("empresas%2F{uid}%2Frepresentante%2F")));
    assert!(rut_url.contains(&format!("empresas%2F{uid}%2Fdocumentos%2Frut_")));
    assert!(camara_url.contains(&format!("empresas%2F{uid}%2Fdocumentos%2Fcamara_")));
    assert_ne!(rut_url, camara_url);
}

#[tokio::test]
async fn resubmitting_registration_converges_on_one_account() {
    let h = harness();
    let uid = register_alice(&h.flow).await;

    // The user backs out of the work-info screen and submits the
    // registration form again with the same credentials.
    assert_eq!(h.flow.back(), Step::RegisterStudent);
    h.flow
        .submit_step(StepInput::RegisterStudent {
            full_name: "Alice A.".to_string(),
            email: "alice@example.com".to_string(),
            password: "Passw0rd!".to_string(),
            confirm_password: "Passw0rd!".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(h.flow.current_step(), Step::WorkInfo);
    assert_eq!(h.flow.session().unwrap().account_id, uid);

    let doc = h.profiles.document(Collection::Students, &uid).unwrap();
    assert_eq!(doc["completado"], json!(false));
}

#[tokio::test]
async fn signing_back_in_detects_the_student_role() {
    let h = harness();
    register_alice(&h.flow).await;
    h.flow
        .submit_step(StepInput::WorkInfo {
            works_now: false,
            employer: String::new(),
            role: String::new(),
        })
        .await
        .unwrap();
    h.flow
        .submit_step(StepInput::Skills {
            skills: vec!["Excel".to_string()],
        })
        .await
        .unwrap();
    h.flow
        .submit_step(StepInput::UploadCv { file: pdf("cv.pdf") })
        .await
        .unwrap();

    h.flow.sign_out();
    assert!(h.flow.session().is_none());

    h.flow.back(); // Complete -> Splash
    h.flow
        .submit_step(StepInput::Splash(EntryIntent::Login))
        .await
        .unwrap();
    let next = h
        .flow
        .submit_step(StepInput::Login {
            email: "alice@example.com".to_string(),
            password: "Passw0rd!".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(next, Step::Splash);
    assert_eq!(h.flow.role(), Some(Role::Student));
    assert!(h.flow.is_onboarding_complete().await.unwrap());
}

#[tokio::test]
async fn a_failed_step_keeps_the_screen_and_one_message() {
    let h = harness();
    register_alice(&h.flow).await;
    h.flow
        .submit_step(StepInput::WorkInfo {
            works_now: false,
            employer: String::new(),
            role: String::new(),
        })
        .await
        .unwrap();

    let err = h
        .flow
        .submit_step(StepInput::Skills {
            skills: vec!["   ".to_string()],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Step(_)));
    assert_eq!(h.flow.current_step(), Step::Skills);
    assert_eq!(
        h.flow.last_error().as_deref(),
        Some("Add at least one skill")
    );

    // A corrected submission clears the message and moves on.
    h.flow
        .submit_step(StepInput::Skills {
            skills: vec!["Excel".to_string()],
        })
        .await
        .unwrap();
    assert!(h.flow.last_error().is_none());
    assert_eq!(h.flow.current_step(), Step::UploadCv);
}

#[tokio::test]
async fn input_for_a_different_step_is_rejected() {
    let h = harness();
    let err = h
        .flow
        .submit_step(StepInput::Skills {
            skills: vec!["Excel".to_string()],
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FlowError::WrongStep {
            current: Step::Splash
        }
    ));
    assert_eq!(h.flow.current_step(), Step::Splash);
}
