use crate::modules::swipe::handle::*;
use actix_web::web::{ServiceConfig, scope};

// The match list lives under /matches next to the conversation routes; see
// the message module's configure.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/swipes").service(swipe));
}
