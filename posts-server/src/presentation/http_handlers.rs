use crate::application::PostService;
use crate::domain::{DomainError, PostRequest};
use actix_web::{error::InternalError, web, HttpResponse, Responder};
use std::sync::Arc;

// Преобразование DomainError в HttpResponse
fn error_to_response(err: DomainError) -> HttpResponse {
    let status_code = err.to_status_code();
    let message = err.to_string();

    match status_code {
        400 => HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        404 => HttpResponse::NotFound().json(serde_json::json!({ "error": message })),
        _ => {
            tracing::error!("Request failed: {}", message);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Internal server error" }))
        }
    }
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

/// Route table for `/api/posts`, including the extractor configs that turn
/// malformed bodies and path ids into JSON 400 responses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    });
    let path_config = web::PathConfig::default().error_handler(|err, _req| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    });

    cfg.service(
        web::scope("/api/posts")
            .app_data(json_config)
            .app_data(path_config)
            .route("", web::get().to(list_posts))
            .route("", web::post().to(create_post))
            .route("/{id}", web::get().to(get_post))
            .route("/{id}", web::put().to(update_post))
            .route("/{id}", web::delete().to(delete_post)),
    );
}

pub async fn list_posts(post_service: web::Data<Arc<PostService>>) -> impl Responder {
    tracing::info!("Listing posts");

    match post_service.list_posts().await {
        Ok(posts) => HttpResponse::Ok().json(posts),
        Err(err) => error_to_response(err),
    }
}

pub async fn get_post(
    post_service: web::Data<Arc<PostService>>,
    path: web::Path<i32>,
) -> impl Responder {
    let post_id = path.into_inner();

    tracing::info!("Getting post with id={}", post_id);

    match post_service.get_post(post_id).await {
        Ok(post) => HttpResponse::Ok().json(post),
        Err(err) => error_to_response(err),
    }
}

pub async fn create_post(
    post_service: web::Data<Arc<PostService>>,
    post_data: web::Json<PostRequest>,
) -> impl Responder {
    tracing::info!("Creating post id={:?}", post_data.id);

    match post_service.create_post(post_data.into_inner()).await {
        Ok(post) => HttpResponse::Created().json(post),
        Err(err) => error_to_response(err),
    }
}

pub async fn update_post(
    post_service: web::Data<Arc<PostService>>,
    path: web::Path<i32>,
    post_data: web::Json<PostRequest>,
) -> impl Responder {
    let post_id = path.into_inner();

    tracing::info!("Updating post id={}", post_id);

    match post_service
        .update_post(post_id, post_data.into_inner())
        .await
    {
        Ok(post) => HttpResponse::Ok().json(post),
        Err(err) => error_to_response(err),
    }
}

pub async fn delete_post(
    post_service: web::Data<Arc<PostService>>,
    path: web::Path<i32>,
) -> impl Responder {
    let post_id = path.into_inner();

    tracing::info!("Deleting post id={}", post_id);

    match post_service.delete_post(post_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_to_response(err),
    }
}
