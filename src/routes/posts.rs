/// Post Routes
///
/// Publishing, listing, fetching, and deleting posts. Listing and
/// fetching are public; publishing and deletion require a bearer
/// access token.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext, ValidationError};
use crate::store::{PostRecord, Stores};

/// Longest accepted post body, counted in bytes.
const MAX_POST_LENGTH: usize = 140;

/// Words masked with `****` regardless of letter case.
const CENSORED_WORDS: [&str; 3] = ["flimflam", "hornswoggle", "malarkey"];

/// Post creation request
#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub body: String,
}

/// Optional filters for the post listing.
#[derive(Deserialize)]
pub struct ListPostsQuery {
    pub author_id: Option<String>,
}

/// Public view of a post.
#[derive(Serialize)]
pub struct PostBody {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub author_id: Uuid,
}

impl From<PostRecord> for PostBody {
    fn from(post: PostRecord) -> Self {
        Self {
            id: post.id,
            created_at: post.created_at,
            updated_at: post.updated_at,
            body: post.body,
            author_id: post.author_id,
        }
    }
}

/// Length-check the raw body, then mask banned words.
fn validate_post_body(body: &str) -> Result<String, ValidationError> {
    if body.len() > MAX_POST_LENGTH {
        return Err(ValidationError::TooLong(
            "post body".to_string(),
            MAX_POST_LENGTH,
        ));
    }
    Ok(censor_body(body))
}

/// Replace each banned word with `****`. Only whole space-separated
/// words match; "malarkey!" stays as written.
fn censor_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if CENSORED_WORDS.contains(&word.to_lowercase().as_str()) {
                "****"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_post_id(raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidFormat("post_id".to_string()))
}

/// POST /api/posts
///
/// Publish a post as the authenticated caller.
///
/// # Errors
/// - 400: Body over the length limit
/// - 401: Missing or invalid access token
/// - 500: Internal server error
pub async fn create_post(
    user: AuthenticatedUser,
    form: web::Json<CreatePostRequest>,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("post_creation");

    let body = validate_post_body(&form.body)?;
    let post = stores.posts.insert(&body, user.user_id).await?;

    tracing::info!(
        request_id = %context.request_id,
        post_id = %post.id,
        author_id = %post.author_id,
        "Post published"
    );

    Ok(HttpResponse::Created().json(PostBody::from(post)))
}

/// GET /api/posts
///
/// List posts oldest first, optionally filtered to one author via
/// `?author_id=<uuid>`.
///
/// # Errors
/// - 400: Malformed author filter
/// - 500: Internal server error
pub async fn list_posts(
    query: web::Query<ListPostsQuery>,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let posts = match &query.author_id {
        Some(raw) => {
            let author_id = Uuid::parse_str(raw)
                .map_err(|_| ValidationError::InvalidFormat("author_id".to_string()))?;
            stores.posts.list_by_author(author_id).await?
        }
        None => stores.posts.list().await?,
    };

    let bodies: Vec<PostBody> = posts.into_iter().map(PostBody::from).collect();
    Ok(HttpResponse::Ok().json(bodies))
}

/// GET /api/posts/{post_id}
///
/// # Errors
/// - 400: Malformed post id
/// - 404: No such post
/// - 500: Internal server error
pub async fn get_post(
    path: web::Path<String>,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let post_id = parse_post_id(&path)?;
    let post = stores
        .posts
        .get(post_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("post".to_string()))?;

    Ok(HttpResponse::Ok().json(PostBody::from(post)))
}

/// DELETE /api/posts/{post_id}
///
/// Delete one of the caller's own posts.
///
/// # Errors
/// - 400: Malformed post id
/// - 401: Missing or invalid access token
/// - 403: The caller is not the author
/// - 404: No such post
/// - 500: Internal server error
pub async fn delete_post(
    user: AuthenticatedUser,
    path: web::Path<String>,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("post_deletion");

    let post_id = parse_post_id(&path)?;
    let post = stores
        .posts
        .get(post_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("post".to_string()))?;

    if post.author_id != user.user_id {
        return Err(AuthError::Forbidden(
            "posts can only be deleted by their author".to_string(),
        )
        .into());
    }

    stores.posts.delete(post_id).await?;

    tracing::info!(
        request_id = %context.request_id,
        post_id = %post_id,
        author_id = %user.user_id,
        "Post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
