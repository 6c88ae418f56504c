use crate::modules::upload::handle::*;
use actix_web::web::{ServiceConfig, scope};

/// Byte serving is unauthenticated so stored picture URLs work as plain
/// image sources.
pub fn public_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/files/content").service(get_file_content));
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/files").service(upload_file).service(get_file).service(delete_file));
}
