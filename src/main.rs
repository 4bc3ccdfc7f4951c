mod config;
mod constants;
mod errors;
mod handlers;
mod middleware;
mod models;
mod openapi;
mod repositories;
mod routes;
mod services;
#[cfg(test)]
mod test_support;
mod utils;
mod validators;

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::Governor;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use log::{info, warn};
use mongodb::Client;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::handlers::HealthProbe;
use crate::middleware::{create_rate_limiter_config, BannedIps};
use crate::openapi::ApiDoc;
use crate::repositories::{ContactRepository, MongoContactRepository, MongoUserRepository, UserRepository};
use crate::services::avatar_service::{AvatarStore, CloudinaryAvatarStore, LocalAvatarStore};
use crate::services::mail_service::{EmailSender, LogEmailSender, SmtpEmailSender};
use crate::services::user_cache::{MemoryUserCache, RedisUserCache};
use crate::services::{
    AuthService, AvatarService, ContactService, JwtKeys, MailService, TokenBlacklist, UserCache,
};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

async fn user_cache(config: &Config) -> Arc<dyn UserCache> {
    if let Some(url) = &config.redis_url {
        match RedisUserCache::connect(url, config.user_cache_ttl_secs).await {
            Ok(cache) => {
                info!("Using Redis user cache");
                return Arc::new(cache);
            }
            Err(e) => warn!("Redis unavailable ({}), falling back to in-memory user cache", e),
        }
    }
    Arc::new(MemoryUserCache::new(config.user_cache_ttl_secs))
}

fn email_sender(config: &Config) -> io::Result<Arc<dyn EmailSender>> {
    match &config.mail {
        Some(mail) => {
            info!("Sending mail through {}:{}", mail.server, mail.port);
            let sender = SmtpEmailSender::new(mail).map_err(|e| startup_error("SMTP setup failed", e))?;
            Ok(Arc::new(sender))
        }
        None => {
            warn!("MAIL_SERVER not set, verification mails will only be logged");
            Ok(Arc::new(LogEmailSender))
        }
    }
}

fn avatar_store(config: &Config) -> Arc<dyn AvatarStore> {
    match &config.cloudinary {
        Some(cloudinary) => {
            info!("Hosting avatars on Cloudinary cloud {}", cloudinary.cloud_name);
            Arc::new(CloudinaryAvatarStore::new(cloudinary.clone()))
        }
        None => {
            info!("Storing avatars locally in {}", config.upload_dir);
            Arc::new(LocalAvatarStore::new(&config.upload_dir))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    // Connect to MongoDB
    info!("Connecting to MongoDB...");
    let client = Client::with_uri_str(&config.mongodb_uri)
        .await
        .map_err(|e| startup_error("Failed to connect to MongoDB", e))?;
    let db = client.database(&config.database_name);

    if !db
        .ping()
        .await
        .map_err(|e| startup_error("Failed to ping MongoDB", e))?
    {
        return Err(startup_error("Failed to ping MongoDB", "unexpected reply"));
    }
    info!("Connected to MongoDB successfully!");

    let user_repository = MongoUserRepository::new(&db);
    let contact_repository = MongoContactRepository::new(&db);
    user_repository
        .create_indexes()
        .await
        .map_err(|e| startup_error("Failed to create user indexes", e))?;
    contact_repository
        .create_indexes()
        .await
        .map_err(|e| startup_error("Failed to create contact indexes", e))?;

    let users: Arc<dyn UserRepository> = Arc::new(user_repository);
    let contacts: Arc<dyn ContactRepository> = Arc::new(contact_repository);
    let cache = user_cache(&config).await;
    let keys = JwtKeys::from_config(&config);

    // Initialize services
    let auth_service = web::Data::new(AuthService::new(
        users.clone(),
        cache.clone(),
        TokenBlacklist::new(),
        keys.clone(),
    ));
    let mail_service = web::Data::new(MailService::new(email_sender(&config)?, keys));
    let avatar_service = web::Data::new(AvatarService::new(avatar_store(&config), users, cache));
    let contact_service = web::Data::new(ContactService::new(contacts));
    let probe: web::Data<dyn HealthProbe> = web::Data::from(Arc::new(db) as Arc<dyn HealthProbe>);

    let governor_config = create_rate_limiter_config(&config)
        .ok_or_else(|| startup_error("Invalid rate limit", "quota must be positive"))?;
    let banned_ips = BannedIps::new(config.banned_ips.iter().copied());
    let serve_uploads = config.cloudinary.is_none();

    // Start HTTP server
    let server_addr = format!("{}:{}", config.server_host, config.server_port);
    info!("Starting server at http://{}", server_addr);
    info!("Swagger UI available at http://{}/docs/", server_addr);

    HttpServer::new(move || {
        let cors = config
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .expose_headers([header::WWW_AUTHENTICATE])
            .supports_credentials();

        let mut app = App::new()
            .wrap(Governor::new(&governor_config))
            .wrap(banned_ips.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(auth_service.clone())
            .app_data(mail_service.clone())
            .app_data(avatar_service.clone())
            .app_data(contact_service.clone())
            .app_data(probe.clone())
            .service(
                SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            );

        if serve_uploads {
            app = app.service(actix_files::Files::new("/uploads", &config.upload_dir));
        }

        app.configure(routes::configure_routes)
    })
    .bind(&server_addr)?
    .run()
    .await
}
