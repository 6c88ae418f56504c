use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::upload::{
    model::{NewFile, UploadConfig},
    repository::FileRepository,
    schema::{FileEntity, FileUploadResponse},
};

#[derive(Clone)]
pub struct UploadService<R>
where
    R: FileRepository + Send + Sync,
{
    file_repo: Arc<R>,
    config: UploadConfig,
}

impl<R> UploadService<R>
where
    R: FileRepository + Send + Sync,
{
    pub fn with_dependencies(file_repo: Arc<R>, config: UploadConfig) -> Self {
        Self { file_repo, config }
    }

    fn validate_file(&self, file_size: usize, mime_type: &str) -> Result<(), error::SystemError> {
        if file_size == 0 {
            return Err(error::SystemError::bad_request("Uploaded file is empty"));
        }

        if file_size > self.config.max_file_size {
            return Err(error::SystemError::bad_request(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.config.max_file_size
            )));
        }

        if !self.config.allowed_mime_types.iter().any(|m| m == mime_type) {
            return Err(error::SystemError::bad_request(format!(
                "File type '{}' is not allowed; only images are accepted",
                mime_type
            )));
        }

        Ok(())
    }

    /// Random storage name; the extension survives so the file is still
    /// recognizable on disk.
    fn generate_filename(&self, original_filename: &str) -> String {
        let extension =
            Path::new(original_filename).extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let uuid = Uuid::now_v7();
        if extension.is_empty() {
            uuid.to_string()
        } else {
            format!("{}.{}", uuid, extension)
        }
    }

    async fn save_file(&self, filename: &str, bytes: &[u8]) -> Result<String, error::SystemError> {
        tokio::fs::create_dir_all(&self.config.upload_dir).await?;

        let file_path = format!("{}/{}", self.config.upload_dir, filename);
        tokio::fs::write(&file_path, bytes).await?;

        Ok(file_path)
    }

    pub async fn upload_file(
        &self,
        original_filename: String,
        bytes: Vec<u8>,
        mime_type: String,
        owner_id: Uuid,
    ) -> Result<FileUploadResponse, error::SystemError> {
        let file_size = bytes.len();
        self.validate_file(file_size, &mime_type)?;

        let filename = self.generate_filename(&original_filename);
        let storage_path = self.save_file(&filename, &bytes).await?;

        let entity = self
            .file_repo
            .create(&NewFile {
                filename: filename.clone(),
                original_filename,
                mime_type,
                file_size: file_size as i64,
                storage_path,
                owner_id,
            })
            .await?;

        log::info!("User {} uploaded file {} ({} bytes)", owner_id, entity.id, file_size);

        let url = format!("{}/{}", self.config.base_url, entity.id);
        Ok(FileUploadResponse {
            id: entity.id,
            filename: entity.filename,
            original_filename: entity.original_filename,
            mime_type: entity.mime_type,
            file_size: entity.file_size,
            url,
            created_at: entity.created_at,
        })
    }

    pub async fn get_file(&self, file_id: &Uuid) -> Result<FileEntity, error::SystemError> {
        self.file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("File not found"))
    }

    /// Reads the stored bytes for serving. Metadata existing without the
    /// bytes on disk is an internal inconsistency, not a client error.
    pub async fn read_content(
        &self,
        file_id: &Uuid,
    ) -> Result<(FileEntity, Vec<u8>), error::SystemError> {
        let file = self.get_file(file_id).await?;
        let bytes = tokio::fs::read(&file.storage_path).await?;
        Ok((file, bytes))
    }

    pub async fn delete_file(
        &self,
        file_id: &Uuid,
        requester_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        let file = self.get_file(file_id).await?;

        if file.owner_id != *requester_id {
            return Err(error::SystemError::forbidden(
                "You don't have permission to delete this file",
            ));
        }

        // Disk first, best-effort: a dangling row is worse than a stray file.
        tokio::fs::remove_file(&file.storage_path).await.ok();
        self.file_repo.delete(file_id).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::api::error::SystemError;

    #[derive(Default)]
    struct MemFileRepo {
        files: Mutex<HashMap<Uuid, FileEntity>>,
    }

    #[async_trait::async_trait]
    impl FileRepository for MemFileRepo {
        async fn create(&self, file: &NewFile) -> Result<FileEntity, SystemError> {
            let entity = FileEntity {
                id: Uuid::now_v7(),
                filename: file.filename.clone(),
                original_filename: file.original_filename.clone(),
                mime_type: file.mime_type.clone(),
                file_size: file.file_size,
                storage_path: file.storage_path.clone(),
                owner_id: file.owner_id,
                created_at: chrono::Utc::now(),
            };
            self.files.lock().unwrap().insert(entity.id, entity.clone());
            Ok(entity)
        }

        async fn find_by_id(&self, file_id: &Uuid) -> Result<Option<FileEntity>, SystemError> {
            Ok(self.files.lock().unwrap().get(file_id).cloned())
        }

        async fn delete(&self, file_id: &Uuid) -> Result<(), SystemError> {
            self.files.lock().unwrap().remove(file_id);
            Ok(())
        }
    }

    fn service() -> UploadService<MemFileRepo> {
        UploadService::with_dependencies(
            Arc::new(MemFileRepo::default()),
            UploadConfig { max_file_size: 1024, ..UploadConfig::default() },
        )
    }

    #[test]
    fn test_validate_rejects_non_image() {
        let svc = service();
        let result = svc.validate_file(10, "application/pdf");
        assert!(matches!(result, Err(SystemError::BadRequest(_))));
    }

    #[test]
    fn test_validate_rejects_oversize_and_empty() {
        let svc = service();
        assert!(svc.validate_file(2048, "image/png").is_err());
        assert!(svc.validate_file(0, "image/png").is_err());
        assert!(svc.validate_file(512, "image/png").is_ok());
    }

    #[test]
    fn test_generated_filename_keeps_extension() {
        let svc = service();
        let name = svc.generate_filename("me.PNG");
        assert!(name.ends_with(".PNG"));

        let bare = svc.generate_filename("noextension");
        assert!(!bare.contains('.'));
    }

    #[actix_web::test]
    async fn test_delete_requires_ownership() {
        let repo = Arc::new(MemFileRepo::default());
        let svc = UploadService::with_dependencies(repo.clone(), UploadConfig::default());

        let owner = Uuid::now_v7();
        let entity = repo
            .create(&NewFile {
                filename: "x.png".to_string(),
                original_filename: "x.png".to_string(),
                mime_type: "image/png".to_string(),
                file_size: 3,
                storage_path: "/nonexistent/x.png".to_string(),
                owner_id: owner,
            })
            .await
            .unwrap();

        let stranger = Uuid::now_v7();
        let result = svc.delete_file(&entity.id, &stranger).await;
        assert!(matches!(result, Err(SystemError::Forbidden(_))));

        // Owner succeeds even though the bytes are already gone from disk.
        svc.delete_file(&entity.id, &owner).await.unwrap();
        assert!(repo.find_by_id(&entity.id).await.unwrap().is_none());
    }
}
