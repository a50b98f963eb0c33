//! Drives a full student onboarding journey against either the in-memory
//! backends or a real Firebase project, depending on `ONBOARDING_BACKEND`.
//!
//! With `ONBOARDING_BACKEND=firebase` the usual `FIREBASE_*` variables must
//! be set (a `.env` file works); everything else runs fully offline.

use std::env;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use onboarding_flow::auth::adapter::outgoing::{FirebaseAuthRest, MemoryAuthProvider};
use onboarding_flow::auth::application::ports::outgoing::{AuthProvider, SessionStore};
use onboarding_flow::onboarding::adapter::outgoing::{FirestoreRest, MemoryProfileStore};
use onboarding_flow::onboarding::application::domain::Role;
use onboarding_flow::onboarding::application::orchestrator::{
    EntryIntent, FlowController, StepInput,
};
use onboarding_flow::onboarding::application::ports::outgoing::ProfileStore;
use onboarding_flow::shared::firebase::FirebaseConfig;
use onboarding_flow::storage::adapter::outgoing::{FirebaseStorageRest, MemoryBlobStore};
use onboarding_flow::storage::application::ports::outgoing::{BlobStore, FileHandle};

fn wire_backends() -> (Arc<dyn AuthProvider>, Arc<dyn ProfileStore>, Arc<dyn BlobStore>) {
    let sessions = SessionStore::new();
    let backend = env::var("ONBOARDING_BACKEND").unwrap_or_else(|_| "memory".to_string());

    if backend == "firebase" {
        let config = FirebaseConfig::from_env();
        info!(project = %config.project_id, "using the Firebase REST backends");
        (
            Arc::new(FirebaseAuthRest::new(&config, sessions.clone())),
            Arc::new(FirestoreRest::new(&config, sessions.clone())),
            Arc::new(FirebaseStorageRest::new(&config, sessions)),
        )
    } else {
        info!("using the in-memory backends");
        (
            Arc::new(MemoryAuthProvider::new(sessions.clone())),
            Arc::new(MemoryProfileStore::with_sessions(sessions)),
            Arc::new(MemoryBlobStore::new("demo.appspot.com")),
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (auth, profiles, blobs) = wire_backends();
    let flow = FlowController::new(auth, profiles, blobs);

    let email = env::var("DEMO_EMAIL").unwrap_or_else(|_| "alice@example.com".to_string());
    let password = env::var("DEMO_PASSWORD").unwrap_or_else(|_| "Passw0rd!".to_string());

    info!(step = %flow.current_step(), "flow started");

    flow.submit_step(StepInput::Splash(EntryIntent::Register))
        .await?;
    flow.submit_step(StepInput::RoleSelect(Role::Student)).await?;

    flow.submit_step(StepInput::RegisterStudent {
        full_name: "Alice A.".to_string(),
        email: email.clone(),
        password: password.clone(),
        confirm_password: password.clone(),
    })
    .await?;
    info!(step = %flow.current_step(), "account registered");

    flow.submit_step(StepInput::WorkInfo {
        works_now: true,
        employer: "Acme Ltda".to_string(),
        role: "Intern".to_string(),
    })
    .await?;

    flow.submit_step(StepInput::Skills {
        skills: vec!["Excel".to_string(), "Teamwork".to_string()],
    })
    .await?;

    let cv = match env::var("DEMO_CV_PATH") {
        Ok(path) => FileHandle::from_path(path.into()),
        Err(_) => FileHandle::from_bytes("cv.pdf", b"%PDF-1.4 demo resume".to_vec()),
    };
    flow.submit_step(StepInput::UploadCv { file: cv }).await?;
    info!(step = %flow.current_step(), "onboarding finished");

    // Sign back in to confirm the role probe finds the new profile.
    flow.sign_out();
    flow.back(); // Complete -> Splash
    flow.submit_step(StepInput::Splash(EntryIntent::Login)).await?;
    flow.submit_step(StepInput::Login { email, password }).await?;
    info!(
        role = ?flow.role(),
        complete = flow.is_onboarding_complete().await?,
        "signed back in"
    );

    Ok(())
}
