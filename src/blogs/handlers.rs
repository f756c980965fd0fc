use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use bson::oid::ObjectId;
use tracing::{info, instrument, warn};

use crate::{
    blogs::{
        dto::{BlogDetails, BlogResponse, CreateBlogRequest, DeleteBlogRequest, UpdateBlogRequest},
        repo::{Blog, BlogPatch},
    },
    error::ApiError,
    response::ApiResponse,
    state::AppState,
    users::repo::User,
};

/// Absent blog and wrong author are indistinguishable on purpose.
const OWNERSHIP_MESSAGE: &str = "Blog not found or user is not the author";

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_blogs))
        .route("/blogs/:id", get(get_blog))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", post(create_blog))
        .route("/blogs/:id", put(update_blog).delete(delete_blog))
}

/// A path id that is not 24 hex characters is a 400, never a 404.
fn parse_blog_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::BadRequest("Invalid blogId".into()))
}

#[instrument(skip(state))]
async fn list_blogs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BlogDetails>>>, ApiError> {
    let blogs = Blog::find_all(&state.db).await?;
    let items = blogs.into_iter().map(BlogDetails::from).collect();
    Ok(Json(ApiResponse::success(items, "Blogs retrieved")))
}

#[instrument(skip(state))]
async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BlogDetails>>, ApiError> {
    let id = parse_blog_id(&id)?;
    let blog = Blog::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog not found".into()))?;
    Ok(Json(ApiResponse::success(blog.into(), "Blog retrieved")))
}

#[instrument(skip(state, payload))]
async fn create_blog(
    State(state): State<AppState>,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BlogResponse>>), ApiError> {
    // a malformed author id can match no user, so it folds into the 404
    let author = match ObjectId::parse_str(&payload.author_id) {
        Ok(oid) => User::find_by_id(&state.db, oid).await?,
        Err(_) => None,
    };
    let Some(author) = author else {
        warn!(author_id = %payload.author_id, "blog create with unknown author");
        return Err(ApiError::NotFound("User not found".into()));
    };

    let blog = Blog::new(payload.title, payload.content, payload.img, author.id);
    Blog::create(&state.db, &blog).await?;

    info!(blog_id = %blog.id, author_id = %author.id, "blog created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(blog.into(), "Blog post created")),
    ))
}

#[instrument(skip(state, payload))]
async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBlogRequest>,
) -> Result<Json<ApiResponse<BlogResponse>>, ApiError> {
    let id = parse_blog_id(&id)?;
    // an unparseable author value can match no stored author; same 404
    let author = ObjectId::parse_str(&payload.author)
        .map_err(|_| ApiError::NotFound(OWNERSHIP_MESSAGE.into()))?;

    let patch = BlogPatch {
        title: payload.title,
        content: payload.content,
        img: payload.img,
    };
    let updated = Blog::update_one_matching(&state.db, id, author, &patch)
        .await?
        .ok_or_else(|| {
            warn!(blog_id = %id, "update rejected by ownership gate");
            ApiError::NotFound(OWNERSHIP_MESSAGE.into())
        })?;

    info!(blog_id = %id, "blog updated");
    Ok(Json(ApiResponse::success(updated.into(), "Blog post updated")))
}

#[instrument(skip(state, payload))]
async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<DeleteBlogRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_blog_id(&id)?;
    let author = ObjectId::parse_str(&payload.author)
        .map_err(|_| ApiError::NotFound(OWNERSHIP_MESSAGE.into()))?;

    Blog::delete_one_matching(&state.db, id, author)
        .await?
        .ok_or_else(|| {
            warn!(blog_id = %id, "delete rejected by ownership gate");
            ApiError::NotFound(OWNERSHIP_MESSAGE.into())
        })?;

    info!(blog_id = %id, "blog deleted");
    Ok(Json(ApiResponse::success_message("Blog deleted successfully")))
}
