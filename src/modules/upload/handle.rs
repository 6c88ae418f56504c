use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::upload::{
        repository_pg::FileRepositoryPg,
        schema::{FileEntity, FileUploadResponse},
        service::UploadService,
    },
    utils::Claims,
};

pub type UploadSvc = UploadService<FileRepositoryPg>;

#[post("/upload")]
pub async fn upload_file(
    mut payload: Multipart,
    req: HttpRequest,
    upload_service: web::Data<UploadSvc>,
) -> Result<success::Success<FileUploadResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;

    if let Some(mut field) = payload.try_next().await.map_err(|_| error::Error::InternalServer)? {
        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| error::Error::bad_request("Missing content disposition"))?;

        let filename = content_disposition
            .get_filename()
            .ok_or_else(|| error::Error::bad_request("Missing filename"))?
            .to_string();

        // Fall back to a guess from the extension when the client didn't
        // label the part.
        let mime_type = field.content_type().map(|m| m.to_string()).unwrap_or_else(|| {
            mime_guess::from_path(&filename).first_or_octet_stream().to_string()
        });

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|_| error::Error::InternalServer)? {
            bytes.extend_from_slice(&chunk);
        }

        let result = upload_service.upload_file(filename, bytes, mime_type, user_id).await?;

        return Ok(success::Success::created(Some(result)).message("File uploaded successfully"));
    }

    Err(error::Error::bad_request("No file found in request"))
}

#[get("/{file_id}")]
pub async fn get_file(
    file_id: web::Path<Uuid>,
    upload_service: web::Data<UploadSvc>,
) -> Result<success::Success<FileEntity>, error::Error> {
    let file = upload_service.get_file(&file_id.into_inner()).await?;
    Ok(success::Success::ok(Some(file)))
}

/// Serves the stored bytes with the recorded content type, so the returned
/// upload URL works directly as an <img> source.
#[get("/{file_id}")]
pub async fn get_file_content(
    file_id: web::Path<Uuid>,
    upload_service: web::Data<UploadSvc>,
) -> Result<HttpResponse, error::Error> {
    let (file, bytes) = upload_service.read_content(&file_id.into_inner()).await?;
    Ok(HttpResponse::Ok().content_type(file.mime_type).body(bytes))
}

#[delete("/{file_id}")]
pub async fn delete_file(
    file_id: web::Path<Uuid>,
    req: HttpRequest,
    upload_service: web::Data<UploadSvc>,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    upload_service.delete_file(&file_id.into_inner(), &user_id).await?;
    Ok(success::Success::no_content().message("File deleted successfully"))
}
