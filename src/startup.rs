use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use chrono::Duration;
use std::net::TcpListener;

use crate::auth::{AccessTokenCodec, SessionLifecycle};
use crate::configuration::{ApplicationSettings, AuthSettings, PaymentSettings};
use crate::middleware::{HitCounter, RequestLogger, RequestMetrics};
use crate::routes::{
    create_post, create_user, delete_post, get_post, health_check, list_posts, login, metrics,
    payment_webhook, refresh_access_token, reset, revoke_refresh_token,
};
use crate::store::Stores;

pub fn run(
    listener: TcpListener,
    stores: Stores,
    application: ApplicationSettings,
    auth: AuthSettings,
    payment: PaymentSettings,
) -> Result<Server, std::io::Error> {
    let codec = AccessTokenCodec::new(&auth.secret);
    let lifecycle = SessionLifecycle::new(
        stores.users.clone(),
        stores.sessions.clone(),
        codec.clone(),
        Duration::seconds(auth.access_token_ttl_seconds),
        Duration::days(auth.refresh_token_ttl_days),
    );
    let counter = HitCounter::new();

    let stores_data = web::Data::new(stores);
    let codec_data = web::Data::new(codec);
    let lifecycle_data = web::Data::new(lifecycle);
    let counter_data = web::Data::new(counter.clone());
    let application_data = web::Data::new(application);
    let payment_data = web::Data::new(payment);

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(RequestLogger)
            .wrap(RequestMetrics::new(counter.clone()))

            // Shared state
            .app_data(stores_data.clone())
            .app_data(codec_data.clone())
            .app_data(lifecycle_data.clone())
            .app_data(counter_data.clone())
            .app_data(application_data.clone())
            .app_data(payment_data.clone())

            // Liveness and accounts
            .route("/api/healthz", web::get().to(health_check))
            .route("/api/users", web::post().to(create_user))

            // Sessions
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh_access_token))
            .route("/api/revoke", web::post().to(revoke_refresh_token))

            // Posts: reads are public, writes need a bearer token
            .service(
                web::resource("/api/posts")
                    .route(web::get().to(list_posts))
                    .route(web::post().to(create_post)),
            )
            .service(
                web::resource("/api/posts/{post_id}")
                    .route(web::get().to(get_post))
                    .route(web::delete().to(delete_post)),
            )

            // Payment provider callback
            .route("/api/webhooks/payments", web::post().to(payment_webhook))

            // Operator endpoints
            .route("/admin/metrics", web::get().to(metrics))
            .route("/admin/reset", web::post().to(reset))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
