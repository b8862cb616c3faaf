//! OpenAPI document served at /api/openapi.json.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgconv API",
        description = "Ephemeral image re-encoding: upload an original, request converted variants by handle until the TTL elapses."
    ),
    paths(
        crate::handlers::upload::upload_image,
        crate::handlers::convert::convert_image,
        crate::handlers::convert::convert_image_battery,
        crate::handlers::health::health,
    ),
    tags(
        (name = "images", description = "Upload and conversion endpoints"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
