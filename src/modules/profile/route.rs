use crate::modules::profile::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/profiles")
            .service(upsert_profile)
            .service(get_own_profile)
            .service(discover)
            .service(liked_profiles)
            .service(profiles_that_liked_me),
    );
}
