use actix_web::web;

use crate::handlers;
use crate::middleware::AuthMiddleware;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::root)).service(
        web::scope("/api")
            // Health check
            .route("/database_checker", web::get().to(handlers::database_checker))
            // Auth routes (public, except logout)
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(handlers::signup))
                    .route("/login", web::post().to(handlers::login))
                    .route("/refresh_token", web::get().to(handlers::refresh_token))
                    .route(
                        "/confirmed_email/{token}",
                        web::get().to(handlers::confirmed_email),
                    )
                    .route("/request_email", web::post().to(handlers::request_email))
                    .service(
                        web::resource("/logout")
                            .wrap(AuthMiddleware)
                            .route(web::post().to(handlers::logout)),
                    ),
            )
            // Current user routes (protected)
            .service(
                web::scope("/users")
                    .wrap(AuthMiddleware)
                    .route("/me", web::get().to(handlers::get_current_user))
                    .route("/avatar", web::patch().to(handlers::update_avatar)),
            )
            // Contact routes (protected)
            .service(
                web::scope("/contacts")
                    .wrap(AuthMiddleware)
                    .route("", web::post().to(handlers::create_contact))
                    .route("", web::get().to(handlers::get_contacts))
                    // Must be before /{id} to avoid conflict
                    .route(
                        "/week_to_birthday",
                        web::get().to(handlers::get_week_to_birthday),
                    )
                    .route("/{id}", web::get().to(handlers::get_contact))
                    .route("/{id}", web::put().to(handlers::update_contact))
                    .route("/{id}", web::delete().to(handlers::delete_contact)),
            ),
    );
}
