use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::ServiceError;

pub const DEFAULT_FOLDER: &str = "thumbnails";

/// Limits checked before any byte reaches storage.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_size_mb: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self { max_size_mb: 5 }
    }
}

impl UploadPolicy {
    pub fn max_bytes(&self) -> usize {
        (self.max_size_mb * 1024 * 1024) as usize
    }

    pub fn check_type(&self, content_type: &str) -> Result<(), ServiceError> {
        if !content_type.starts_with("image/") {
            return Err(ServiceError::InvalidInput(
                "Please upload an image file".into(),
            ));
        }
        Ok(())
    }

    pub fn check_size(&self, size: usize) -> Result<(), ServiceError> {
        if size > self.max_bytes() {
            return Err(ServiceError::InvalidInput(format!(
                "File size must be less than {}MB",
                self.max_size_mb
            )));
        }
        Ok(())
    }

    pub fn check(&self, content_type: &str, size: usize) -> Result<(), ServiceError> {
        self.check_type(content_type)?;
        self.check_size(size)
    }
}

/// A bucket that stores objects and hands out public URLs for them.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `body` at `path`. `access_token` is the caller's session token.
    async fn put(
        &self,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
        access_token: &str,
    ) -> Result<(), String>;

    fn public_url(&self, path: &str) -> String;
}

pub type SharedStorage = Arc<dyn ObjectStorage>;

/// Supabase Storage over its REST API.
pub struct SupabaseStorage {
    client: reqwest::Client,
    supabase_url: String,
    anon_key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(supabase_url: String, anon_key: String, bucket: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            supabase_url,
            anon_key,
            bucket,
        }
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn put(
        &self,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
        access_token: &str,
    ) -> Result<(), String> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.supabase_url, self.bucket, path
        );

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {access_token}"))
            .header("Content-Type", content_type)
            .header("cache-control", "3600")
            .header("x-upsert", "false")
            .body(body)
            .send()
            .await
            .map_err(|e| format!("Failed to reach storage: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("Storage returned {status}: {text}"));
        }

        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.supabase_url, self.bucket, path
        )
    }
}

/// An image on its way to storage.
pub struct UploadRequest {
    pub folder: Option<String>,
    pub filename: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Validate, store under `{folder}/{uuid}.{ext}` and return the public URL.
pub async fn upload(
    storage: &dyn ObjectStorage,
    policy: &UploadPolicy,
    request: UploadRequest,
    access_token: &str,
) -> Result<String, ServiceError> {
    policy.check(&request.content_type, request.bytes.len())?;

    let folder = match request.folder.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_FOLDER,
        Some(f) if is_safe_segment(f) => f,
        Some(_) => return Err(ServiceError::InvalidInput("Invalid upload folder".into())),
    };
    let ext = extension(request.filename.as_deref(), &request.content_type);
    let path = format!("{folder}/{}.{ext}", Uuid::new_v4());

    storage
        .put(&path, &request.content_type, request.bytes, access_token)
        .await
        .map_err(|e| {
            tracing::error!("Upload to {path} failed: {e}");
            ServiceError::Storage(e)
        })?;

    tracing::info!("Uploaded image to {path}");
    Ok(storage.public_url(&path))
}

fn is_safe_segment(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Last dot-separated piece of the filename, else the MIME subtype without
/// any `+suffix` or parameters (`image/svg+xml` gives `svg`).
fn extension(filename: Option<&str>, content_type: &str) -> String {
    filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .or_else(|| {
            content_type
                .strip_prefix("image/")
                .and_then(|sub| sub.split(['+', ';']).next())
                .map(str::trim)
        })
        .filter(|ext| !ext.is_empty() && is_safe_segment(ext))
        .unwrap_or("bin")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStorage {
        paths: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ObjectStorage for RecordingStorage {
        async fn put(&self, path: &str, _: &str, _: Vec<u8>, _: &str) -> Result<(), String> {
            self.paths.lock().unwrap().push(path.to_string());
            Ok(())
        }

        fn public_url(&self, path: &str) -> String {
            format!("https://cdn.test/{path}")
        }
    }

    fn request(content_type: &str, size: usize) -> UploadRequest {
        UploadRequest {
            folder: None,
            filename: Some("Photo.PNG".into()),
            content_type: content_type.into(),
            bytes: vec![0; size],
        }
    }

    #[tokio::test]
    async fn oversize_upload_never_reaches_storage() {
        let storage = RecordingStorage::default();
        let policy = UploadPolicy { max_size_mb: 1 };

        let err = upload(&storage, &policy, request("image/png", 1024 * 1024 + 1), "t")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("1MB"));
        assert!(storage.paths.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_image_is_rejected() {
        let storage = RecordingStorage::default();
        let err = upload(&storage, &UploadPolicy::default(), request("application/pdf", 10), "t")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(storage.paths.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_goes_to_default_folder_and_returns_public_url() {
        let storage = RecordingStorage::default();
        let url = upload(&storage, &UploadPolicy::default(), request("image/png", 10), "t")
            .await
            .unwrap();

        let paths = storage.paths.lock().unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].starts_with("thumbnails/"));
        assert!(paths[0].ends_with(".png"));
        assert_eq!(url, format!("https://cdn.test/{}", paths[0]));
    }

    #[test]
    fn extension_falls_back_to_mime_subtype() {
        assert_eq!(extension(None, "image/jpeg"), "jpeg");
        assert_eq!(extension(Some("noext"), "image/webp"), "webp");
    }

    #[test]
    fn extension_drops_mime_structured_suffix() {
        assert_eq!(extension(None, "image/svg+xml"), "svg");
        assert_eq!(extension(None, "image/png; charset=binary"), "png");
        assert_eq!(extension(Some("logo.SVG"), "image/svg+xml"), "svg");
    }

    #[test]
    fn size_check_is_inclusive_of_the_limit() {
        let policy = UploadPolicy { max_size_mb: 1 };
        assert!(policy.check_size(policy.max_bytes()).is_ok());
        assert!(policy.check_size(policy.max_bytes() + 1).is_err());
    }
}
