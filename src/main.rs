use actix::Actor;
use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{RedisCache, connect_database},
    middlewares::{authentication, authorization},
    modules::{
        message::{repository_pg::MessageRepositoryPg, service::MessageService},
        profile::{repository_pg::ProfileRepositoryPg, service::ProfileService},
        realtime::{handler::websocket_handler, server::RealtimeServer},
        swipe::{
            repository_pg::{MatchRepositoryPg, SwipeRepositoryPg},
            service::SwipeService,
        },
        upload::{model::UploadConfig, repository_pg::FileRepositoryPg, service::UploadService},
        user::{repository_pg::UserRepositoryPg, schema::UserRole, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| std::io::Error::other(format!("Migration error: {}", e)))?;

    let redis_cache = Arc::new(
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?,
    );

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let profile_repo = Arc::new(ProfileRepositoryPg::new(db_pool.clone()));
    let swipe_repo = Arc::new(SwipeRepositoryPg::new(db_pool.clone()));
    let match_repo = Arc::new(MatchRepositoryPg::new(db_pool.clone()));
    let message_repo = Arc::new(MessageRepositoryPg::new(db_pool.clone()));
    let file_repo = Arc::new(FileRepositoryPg::new(db_pool.clone()));

    let ws_server = RealtimeServer::new().start();
    let ws_server_arc = Arc::new(ws_server.clone());

    let user_service = UserService::with_dependencies(user_repo, redis_cache);
    let profile_service = ProfileService::with_dependencies(profile_repo.clone());
    let swipe_service = SwipeService::with_dependencies(
        swipe_repo,
        match_repo.clone(),
        profile_repo,
        ws_server_arc.clone(),
    );
    let message_service =
        MessageService::with_dependencies(message_repo, match_repo, ws_server_arc);
    let upload_service = UploadService::with_dependencies(file_repo, UploadConfig::from_env());

    println!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(profile_service.clone()))
            .app_data(web::Data::new(swipe_service.clone()))
            .app_data(web::Data::new(message_service.clone()))
            .app_data(web::Data::new(upload_service.clone()))
            .app_data(web::Data::new(ws_server.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .configure(modules::user::route::public_api_configure)
                    .configure(modules::upload::route::public_configure)
                    .route("/ws", web::get().to(websocket_handler))
                    .service(
                        web::scope("")
                            .wrap(from_fn(authorization(vec![UserRole::User, UserRole::Admin])))
                            .wrap(from_fn(authentication))
                            .configure(modules::user::route::configure)
                            .configure(modules::profile::route::configure)
                            .configure(modules::swipe::route::configure)
                            .configure(modules::message::route::configure)
                            .configure(modules::upload::route::configure),
                    ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
