mod admin;
mod auth;
mod health_check;
mod posts;
mod users;
mod webhooks;

pub use admin::metrics;
pub use admin::reset;
pub use auth::login;
pub use auth::refresh_access_token;
pub use auth::revoke_refresh_token;
pub use health_check::health_check;
pub use posts::create_post;
pub use posts::delete_post;
pub use posts::get_post;
pub use posts::list_posts;
pub use users::create_user;
pub use webhooks::payment_webhook;
