use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};
use uuid::Uuid;

use models::product::Product;
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::middleware::ValidatedProduct;
use crate::routes::ServerState;

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::NewProductDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Malformed Payload"),
        (status = 422, description = "Validation Failed"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(ValidatedProduct(input)): Extension<ValidatedProduct>,
) -> Result<(StatusCode, Json<Product>), JsonApiError> {
    // validation already ran in the middleware; anything left is storage
    match state.products.create(input).await {
        Ok(p) => {
            info!(id = %p.id, sku = %p.sku, "created product");
            Ok((StatusCode::CREATED, Json(p)))
        }
        Err(e) => {
            error!(err = %e, "create product failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Create Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    responses(
        (status = 200, description = "List OK"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Product>>, JsonApiError> {
    match state.products.list().await {
        Ok(items) => {
            info!(count = items.len(), "list products");
            Ok(Json(items))
        }
        Err(e) => {
            error!(err = %e, "list products failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Get Failed")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, JsonApiError> {
    match state.products.get(id).await {
        Ok(Some(p)) => Ok(Json(p)),
        Ok(None) => Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            Some(format!("product {id} not found")),
        )),
        Err(e) => {
            error!(err = %e, "get product failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Get Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = crate::openapi::NewProductDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Malformed Payload"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation Failed"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Extension(ValidatedProduct(input)): Extension<ValidatedProduct>,
) -> Result<Json<Product>, JsonApiError> {
    match state.products.update(id, input).await {
        Ok(p) => {
            info!(id = %p.id, "updated product");
            Ok(Json(p))
        }
        Err(ServiceError::NotFound(msg)) => {
            Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)))
        }
        Err(e) => {
            error!(err = %e, "update product failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Update Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    match state.products.delete(id).await {
        Ok(true) => {
            info!(%id, "deleted product");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            Some(format!("product {id} not found")),
        )),
        Err(e) => {
            error!(err = %e, "delete product failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Delete Failed", Some(e.to_string())))
        }
    }
}
