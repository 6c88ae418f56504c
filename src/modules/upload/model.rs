use uuid::Uuid;

use crate::ENV;

#[derive(Debug, Clone)]
pub struct NewFile {
    pub filename: String,
    pub original_filename: String,
    pub mime_type: String,
    pub file_size: i64,
    pub storage_path: String,
    pub owner_id: Uuid,
}

/// Upload limits and storage layout. Profile pictures only, so the allow-list
/// is images.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: usize,
    pub allowed_mime_types: Vec<String>,
    pub upload_dir: String,
    pub base_url: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024, // 5MB
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
            ],
            upload_dir: "./uploads".to_string(),
            base_url: "/api/files/content".to_string(),
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self { upload_dir: ENV.upload_dir.clone(), ..Self::default() }
    }
}
