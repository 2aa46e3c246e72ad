use actix_web::{Scope, web};

use crate::moc::Payload;

pub mod collection_handlers;
pub mod public;
pub mod site_config_handlers;
pub mod translation_handlers;

/// Admin routes for one managed collection, instantiated per payload type.
pub fn collection_routes<P: Payload>(path: &str) -> Scope {
    web::scope(path)
        .route("", web::get().to(collection_handlers::list::<P>))
        .route("", web::put().to(collection_handlers::save::<P>))
        .route("/{id}/move", web::post().to(collection_handlers::move_item::<P>))
        .route(
            "/{id}/publish",
            web::post().to(collection_handlers::set_published::<P>),
        )
        .route("/{id}", web::delete().to(collection_handlers::delete_item::<P>))
}
