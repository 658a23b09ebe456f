use actix_web::HttpResponse;

pub async fn health_check() -> HttpResponse {
    tracing::debug!("Liveness probe answered");
    HttpResponse::Ok().finish()
}
