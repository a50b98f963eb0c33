use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::auth::application::ports::outgoing::{AccountId, SessionStore};
use crate::onboarding::application::ports::outgoing::{
    Collection, Fields, ProfileStore, ProfileStoreError,
};
use crate::shared::firebase::FirebaseConfig;

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

/// Firestore REST adapter for the profile collections.
///
/// Documents are keyed by account id inside the collection. Partial writes
/// go through `updateMask.fieldPaths`, which is what gives `update` and
/// `upsert` their merge semantics. Every request carries the signed-in
/// user's id token; the deployed security rules only accept writes to the
/// caller's own document.
pub struct FirestoreRest {
    http: reqwest::Client,
    documents_base: String,
    sessions: SessionStore,
}

impl FirestoreRest {
    pub fn new(config: &FirebaseConfig, sessions: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            documents_base: format!(
                "{FIRESTORE_BASE}/projects/{}/databases/(default)/documents",
                config.project_id
            ),
            sessions,
        }
    }

    fn document_url(&self, collection: Collection, id: &AccountId) -> String {
        format!("{}/{}/{}", self.documents_base, collection.as_str(), id)
    }

    fn bearer(&self) -> Result<String, ProfileStoreError> {
        self.sessions
            .current()
            .map(|s| s.id_token)
            .ok_or(ProfileStoreError::NotAuthenticated)
    }

    async fn patch(
        &self,
        collection: Collection,
        id: &AccountId,
        fields: Fields,
        must_exist: bool,
    ) -> Result<(), ProfileStoreError> {
        let token = self.bearer()?;

        let mut query: Vec<(&str, String)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", k.clone()))
            .collect();
        if must_exist {
            query.push(("currentDocument.exists", "true".to_string()));
        }

        let response = self
            .http
            .patch(self.document_url(collection, id))
            .bearer_auth(token)
            .query(&query)
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await
            .map_err(|e| ProfileStoreError::Network(e.to_string()))?;

        match response.status() {
            s if s.is_success() => {
                debug!(%collection, uid = %id, keys = fields.len(), "document patched");
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(ProfileStoreError::NotFound),
            status => Err(ProfileStoreError::Network(format!(
                "firestore returned {status}"
            ))),
        }
    }
}

#[async_trait]
impl ProfileStore for FirestoreRest {
    async fn create(
        &self,
        collection: Collection,
        id: &AccountId,
        fields: Fields,
    ) -> Result<(), ProfileStoreError> {
        let token = self.bearer()?;

        let response = self
            .http
            .post(format!("{}/{}", self.documents_base, collection.as_str()))
            .bearer_auth(token)
            .query(&[("documentId", id.as_str())])
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await
            .map_err(|e| ProfileStoreError::Network(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(ProfileStoreError::AlreadyExists),
            status => Err(ProfileStoreError::Network(format!(
                "firestore returned {status}"
            ))),
        }
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: &AccountId,
        fields: Fields,
    ) -> Result<(), ProfileStoreError> {
        self.patch(collection, id, fields, false).await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &AccountId,
        fields: Fields,
    ) -> Result<(), ProfileStoreError> {
        self.patch(collection, id, fields, true).await
    }

    async fn get(
        &self,
        collection: Collection,
        id: &AccountId,
    ) -> Result<Option<Fields>, ProfileStoreError> {
        let token = self.bearer()?;

        let response = self
            .http
            .get(self.document_url(collection, id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProfileStoreError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => {
                let body: Value = response
                    .json()
                    .await
                    .map_err(|e| ProfileStoreError::Network(e.to_string()))?;
                let fields = body
                    .get("fields")
                    .and_then(Value::as_object)
                    .map(decode_fields)
                    .unwrap_or_default();
                Ok(Some(fields))
            }
            status => Err(ProfileStoreError::Network(format!(
                "firestore returned {status}"
            ))),
        }
    }
}

// ============================================================================
// Firestore value codec
// ============================================================================

/// Firestore's REST API wraps every value in a typed envelope
/// (`{"stringValue": ...}`). Encode a flat field map into that form.
fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // Firestore transports integers as decimal strings.
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({
            "mapValue": { "fields": map.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect::<Map<_, _>>() }
        }),
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Fields {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

fn decode_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = map.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(b) = map.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    if let Some(i) = map.get("integerValue") {
        // Arrives either as a decimal string or as a bare number.
        if let Some(n) = i.as_str().and_then(|s| s.parse::<i64>().ok()) {
            return json!(n);
        }
        if let Some(n) = i.as_i64() {
            return json!(n);
        }
    }
    if let Some(f) = map.get("doubleValue").and_then(Value::as_f64) {
        return json!(f);
    }
    if map.contains_key("nullValue") {
        return Value::Null;
    }
    if let Some(ts) = map.get("timestampValue").and_then(Value::as_str) {
        return Value::String(ts.to_string());
    }
    if let Some(items) = map
        .get("arrayValue")
        .and_then(|a| a.get("values"))
        .and_then(Value::as_array)
    {
        return Value::Array(items.iter().map(decode_value).collect());
    }
    if let Some(inner) = map
        .get("mapValue")
        .and_then(|m| m.get("fields"))
        .and_then(Value::as_object)
    {
        return Value::Object(decode_fields(inner));
    }

    Value::Null
}
