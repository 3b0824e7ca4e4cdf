use actix_web::{
    HttpRequest,
    HttpResponse,
    http::{Cookie, header::LOCATION},
    web::{self, Path, Query, ServiceConfig},
};
use plinth_manifest::{BuildManifestError, DocumentPath, build_manifest};
use plinth_models::{
    Ability,
    Action,
    FindResourceError,
    Resource,
    ResourceType,
};
use plinth_web::{RequestProtocol, Search, Session};
use serde::Deserialize;
use serde_json::json;

use crate::Result;

/// Cookie remembering where to send the caller back after they
/// authenticate.
const RETURN_COOKIE: &str = "user_return_to";

pub fn configure(cfg: &mut ServiceConfig) {
    cfg
        .service(web::resource("/concern/{type_path}/{id}/manifest")
            .route(web::get().to(manifest))
        )
        .service(web::resource("/concern/{type_path}/{id}/pdf")
            .route(web::get().to(pdf))
        )
    ;
}

/// Retrieve the IIIF manifest for a work.
///
/// ## Method
///
/// ```text
/// GET /concern/:type_path/:id/manifest
/// ```
fn manifest(
    search: Search,
    session: Option<Session>,
    proto: RequestProtocol,
    path: Path<(String, String)>,
) -> Result<HttpResponse> {
    let resource = lookup(&search, &path)?;
    let ability = ability(session);

    if !ability.allowed(Action::Manifest, &resource) {
        // Unauthenticated callers get a bare 401 instead of a redirect:
        // manifests are fetched by viewers, not browsers.
        let mut response = if ability.authenticated() {
            HttpResponse::Forbidden()
        } else {
            HttpResponse::Unauthorized()
        };
        return Ok(response.json(json!({})));
    }

    build_response(build_manifest(&*search, &resource, proto.0))
}

#[derive(Deserialize)]
struct PdfQuery {
    pdf_quality: Option<String>,
}

/// Request a PDF rendition of a work.
///
/// Redirects to the download location of the rendered file.
///
/// ## Method
///
/// ```text
/// GET /concern/:type_path/:id/pdf?pdf_quality=gray
/// ```
fn pdf(
    req: HttpRequest,
    search: Search,
    session: Option<Session>,
    proto: RequestProtocol,
    path: Path<(String, String)>,
    query: Query<PdfQuery>,
) -> Result<HttpResponse> {
    let resource = lookup(&search, &path)?;
    let ability = ability(session);

    let quality = query.into_inner().pdf_quality
        .or_else(|| resource.pdf_type.first().cloned())
        .unwrap_or_else(|| "gray".to_string());

    let action = if quality == "color" {
        Action::ColorPdf
    } else {
        Action::Pdf
    };

    if let Err(denied) = ability.require(action, &resource) {
        if !denied.authenticated() {
            return Ok(redirect_to_login(&req));
        }
        return Err(denied.into());
    }

    let location = format!(
        "{}?file=pdf",
        DocumentPath::new(&resource, proto.0).download(&resource.id)?,
    );

    Ok(HttpResponse::SeeOther()
        .header(LOCATION, location)
        .finish())
}

fn lookup(search: &Search, path: &Path<(String, String)>)
-> Result<Resource, plinth_error::Error> {
    let (ref type_path, ref id) = **path;

    let resource_type = ResourceType::from_type_path(type_path)
        .ok_or(FindResourceError::NotFound)?;

    let resource = search.resource(id)?;

    // The id namespace is global; reject ids reached through the wrong
    // type path.
    if resource.resource_type != resource_type {
        return Err(FindResourceError::NotFound.into());
    }

    Ok(resource)
}

fn ability(session: Option<Session>) -> Ability {
    Ability::new(session.map(Session::into_user))
}

/// Map a build outcome onto the wire.
///
/// Empty works are a 404 with an empty body; everything else unexpected is
/// a 500 carrying only the error message, never internal state.
pub(crate) fn build_response<T: serde::Serialize>(
    result: std::result::Result<T, BuildManifestError>,
) -> Result<HttpResponse> {
    match result {
        Ok(document) => Ok(HttpResponse::Ok().json(document)),
        Err(BuildManifestError::Empty) =>
            Ok(HttpResponse::NotFound().json(json!({}))),
        Err(err) => {
            log::error!("manifest build failed: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(json!({ "message": err.to_string() })))
        }
    }
}

fn redirect_to_login(req: &HttpRequest) -> HttpResponse {
    let login_url = match req.app_data::<crate::Config>() {
        Some(config) => config.login_url.clone(),
        None => "/".to_string(),
    };

    HttpResponse::SeeOther()
        .cookie(Cookie::build(RETURN_COOKIE, req.uri().to_string())
            .path("/")
            .finish())
        .header(LOCATION, login_url)
        .finish()
}
