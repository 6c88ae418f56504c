use crate::modules::message::handle::*;
use actix_web::web::{ServiceConfig, scope};

/// Everything under /matches: the caller's match list plus the per-match
/// conversation. A single scope so the routes never shadow each other.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/matches")
            .service(crate::modules::swipe::handle::get_matches)
            .service(send_message)
            .service(get_messages),
    );
}
