/// Admin Routes
///
/// Operator-facing endpoints: a hit-count page and a dev-only reset.

use actix_web::{web, HttpResponse};

use crate::configuration::ApplicationSettings;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::middleware::HitCounter;
use crate::store::Stores;

/// GET /admin/metrics
///
/// Human-readable count of requests served since start.
pub async fn metrics(counter: web::Data<HitCounter>) -> HttpResponse {
    let body = format!(
        "<html>\n\n<body>\n    <h1>Welcome, Bulletin Admin</h1>\n    \
         <p>Bulletin has been visited {} times!</p>\n</body>\n\n</html>\n",
        counter.count()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// POST /admin/reset
///
/// Wipe every store and zero the hit counter. Only answers in the dev
/// environment.
///
/// # Errors
/// - 403: Not running in dev
/// - 500: Internal server error
pub async fn reset(
    stores: web::Data<Stores>,
    counter: web::Data<HitCounter>,
    application: web::Data<ApplicationSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("admin_reset");

    if !application.is_dev() {
        return Err(AuthError::Forbidden(
            "reset is only available in the dev environment".to_string(),
        )
        .into());
    }

    stores.users.clear_all().await?;
    stores.sessions.clear_all().await?;
    stores.posts.clear_all().await?;
    counter.reset();

    tracing::info!(
        request_id = %context.request_id,
        "Stores cleared and hit counter reset"
    );

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hits reset to 0"))
}
