use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct NewProductDoc {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub sku: String,
}

#[derive(ToSchema)]
pub struct ProductDoc {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub sku: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::products::list,
        crate::routes::products::create,
        crate::routes::products::get,
        crate::routes::products::update,
        crate::routes::products::delete,
    ),
    components(
        schemas(
            HealthResponse,
            NewProductDoc,
            ProductDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "products")
    )
)]
pub struct ApiDoc;
