use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers::{self, transfer::upload_body_limit};
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let max_upload = config.storage.max_upload_size;
    OpenApiRouter::new()
        .nest("/media", media_routes(max_upload))
        .nest("/documents", document_routes(max_upload))
}

fn media_routes(max_upload: usize) -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(handlers::media::list_media))
        .routes(routes!(handlers::media::get_media_file))
        .routes(routes!(
            handlers::media::get_media,
            handlers::media::update_media,
            handlers::media::delete_media
        ));

    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::media::upload_media))
        .layer(upload_body_limit(max_upload));

    crud.merge(upload)
}

fn document_routes(max_upload: usize) -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(handlers::documents::list_documents))
        .routes(routes!(handlers::documents::get_document_file))
        .routes(routes!(
            handlers::documents::get_document,
            handlers::documents::update_document,
            handlers::documents::delete_document
        ));

    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::documents::upload_document))
        .layer(upload_body_limit(max_upload));

    crud.merge(upload)
}
