use actix_web::{
    HttpResponse,
    web::{self, ServiceConfig},
};
use plinth_manifest::AllCollectionsManifestBuilder;
use plinth_models::Ability;
use plinth_web::{RequestProtocol, Search, Session};

use crate::{Result, concerns::build_response};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg
        .service(web::resource("/collections/manifest")
            .route(web::get().to(index_manifest))
        )
    ;
}

/// Retrieve the manifest listing every collection visible to the caller.
///
/// ## Method
///
/// ```text
/// GET /collections/manifest
/// ```
fn index_manifest(
    search: Search,
    session: Option<Session>,
    proto: RequestProtocol,
) -> Result<HttpResponse> {
    let ability = Ability::new(session.map(Session::into_user));

    build_response(
        AllCollectionsManifestBuilder::new(&*search, &ability, proto.0)
            .build())
}
