use std::env;

/// Connection settings for the Firebase REST backends (identity toolkit,
/// Firestore and Cloud Storage for Firebase).
///
/// The mobile clients ship these values inside `google-services.json`; here
/// they come from the environment so the same build can point at an emulator
/// suite or a real project.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    pub storage_bucket: String,
}

impl FirebaseConfig {
    /// Load Firebase configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load environment variables if available

        let api_key = env::var("FIREBASE_API_KEY").expect("FIREBASE_API_KEY must be set");
        let project_id = env::var("FIREBASE_PROJECT_ID").expect("FIREBASE_PROJECT_ID must be set");
        let storage_bucket = env::var("FIREBASE_STORAGE_BUCKET")
            .unwrap_or_else(|_| format!("{}.appspot.com", project_id));

        if api_key.trim().is_empty() {
            panic!("FIREBASE_API_KEY must not be blank");
        }

        Self {
            api_key,
            project_id,
            storage_bucket,
        }
    }
}

/// Percent-encode a storage object path for use inside a URL path segment.
///
/// Cloud Storage for Firebase addresses objects as a single path segment, so
/// `/` inside the object name must be encoded as `%2F`.
pub fn encode_object_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => {
                out.push('%');
                out.push_str(&format!("{:02X}", other));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_slashes_and_spaces() {
        assert_eq!(
            encode_object_path("cvs/user-1/cv final.pdf"),
            "cvs%2Fuser-1%2Fcv%20final.pdf"
        );
    }

    #[test]
    fn leaves_unreserved_characters_alone() {
        assert_eq!(encode_object_path("abc-123_~.pdf"), "abc-123_~.pdf");
    }
}
