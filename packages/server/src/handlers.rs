//! HTTP handler functions for the zanza API.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use zanza_community::{CommunityError, SummaryOptions, community_summary};
use zanza_community_models::AuthToken;
use zanza_geocoder::ResolveError;
use zanza_routing::CollectError;
use zanza_server_models::{
    ApiError, ApiHealth, ApiResolvedAddress, ApiRoute, CommunityQueryParams, GeocodeQueryParams,
    RouteQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/geocode?q=`
///
/// Resolves one address inside the configured city.
pub async fn geocode(
    state: web::Data<AppState>,
    params: web::Query<GeocodeQueryParams>,
) -> HttpResponse {
    let query = params.q.as_deref().unwrap_or_default();

    match state.resolver.resolve(query).await {
        Ok(resolved) => HttpResponse::Ok().json(ApiResolvedAddress {
            query: resolved.text,
            latitude: resolved.coordinate.latitude,
            longitude: resolved.coordinate.longitude,
            matched_address: resolved.matched_address,
        }),
        Err(e) => {
            if e.is_transient() {
                log::error!("Failed to resolve address: {e}");
            }
            HttpResponse::build(resolve_status(&e)).json(ApiError::new(e.kind(), e.user_message()))
        }
    }
}

/// `GET /api/routes?origin=&destination=`
///
/// Resolves both addresses and returns up to three classified routes.
pub async fn routes(
    state: web::Data<AppState>,
    params: web::Query<RouteQueryParams>,
) -> HttpResponse {
    let origin = params.origin.as_deref().unwrap_or_default();
    let destination = params.destination.as_deref().unwrap_or_default();

    match state.search.search(origin, destination).await {
        Ok(routes) => {
            let routes: Vec<ApiRoute> = routes.into_iter().map(ApiRoute::from).collect();
            HttpResponse::Ok().json(routes)
        }
        Err(e) => {
            if matches!(e, CollectError::Failed(_)) {
                log::error!("Failed to collect routes: {e}");
            }
            let mut body = ApiError::new(e.kind(), e.user_message());
            if let Some(side) = e.side() {
                body = body.with_side(side.as_str());
            }
            HttpResponse::build(collect_status(&e)).json(body)
        }
    }
}

/// `GET /api/community?neighborhoods=&streets=`
///
/// Returns community statistics and both rankings. The request's
/// `Authorization` header is forwarded to the backend.
pub async fn community(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<CommunityQueryParams>,
) -> HttpResponse {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(AuthToken::from_header);

    let defaults = SummaryOptions::default();
    let options = SummaryOptions {
        neighborhoods: params.neighborhoods.unwrap_or(defaults.neighborhoods),
        streets: params.streets.unwrap_or(defaults.streets),
        ..defaults
    };

    match community_summary(state.reviews.as_ref(), token.as_ref(), options).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => {
            if matches!(e, CommunityError::Unauthorized) {
                log::warn!("Community summary rejected: {e}");
            } else {
                log::error!("Failed to build community summary: {e}");
            }
            HttpResponse::build(community_status(&e)).json(ApiError::new(e.kind(), e.user_message()))
        }
    }
}

const fn resolve_status(e: &ResolveError) -> StatusCode {
    match e {
        ResolveError::Validation => StatusCode::BAD_REQUEST,
        ResolveError::NotFound { .. } => StatusCode::NOT_FOUND,
        ResolveError::OutOfBounds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ResolveError::Failed(_) => StatusCode::BAD_GATEWAY,
    }
}

const fn collect_status(e: &CollectError) -> StatusCode {
    match e {
        CollectError::Validation => StatusCode::BAD_REQUEST,
        CollectError::OriginUnresolved(inner) | CollectError::DestinationUnresolved(inner) => {
            resolve_status(inner)
        }
        CollectError::Empty => StatusCode::NOT_FOUND,
        CollectError::Failed(_) => StatusCode::BAD_GATEWAY,
    }
}

const fn community_status(e: &CommunityError) -> StatusCode {
    match e {
        CommunityError::Unauthorized => StatusCode::UNAUTHORIZED,
        CommunityError::Http(_) | CommunityError::Json(_) | CommunityError::Io(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{App, test};
    use zanza_community::{ReviewSnapshot, ReviewSource};
    use zanza_community_models::RawReview;
    use zanza_config::city_registry::{DEFAULT_CITY_ID, city_by_id};
    use zanza_geocoder::{AddressResolver, GeocodeError, GeocodedAddress, Geocoder};
    use zanza_geography_models::Coordinate;
    use zanza_routing::{RouteCollector, RouteProvider, RouteSearch, RoutingError};
    use zanza_routing_models::RawRoutePath;

    struct TableGeocoder;

    #[async_trait::async_trait]
    impl Geocoder for TableGeocoder {
        async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
            let coordinate = if query.starts_with("Centro,") {
                Coordinate::new(-22.9056, -47.0608)
            } else if query.starts_with("Cambuí,") {
                Coordinate::new(-22.8936, -47.0512)
            } else if query.starts_with("Avenida Paulista,") {
                Coordinate::new(-23.5614, -46.6559)
            } else {
                return Ok(None);
            };
            Ok(Some(GeocodedAddress {
                coordinate,
                matched_address: None,
            }))
        }
    }

    struct TwoPaths;

    #[async_trait::async_trait]
    impl RouteProvider for TwoPaths {
        async fn alternatives(
            &self,
            origin: Coordinate,
            destination: Coordinate,
        ) -> Result<Vec<RawRoutePath>, RoutingError> {
            Ok(vec![
                RawRoutePath {
                    geometry: vec![origin, destination],
                    distance_meters: 1500.0,
                    duration_seconds: 300.0,
                },
                RawRoutePath {
                    geometry: vec![origin, destination],
                    distance_meters: 1800.0,
                    duration_seconds: 420.0,
                },
            ])
        }
    }

    struct RequiresToken;

    #[async_trait::async_trait]
    impl ReviewSource for RequiresToken {
        async fn fetch_reviews(
            &self,
            token: Option<&AuthToken>,
        ) -> Result<ReviewSnapshot, CommunityError> {
            token.ok_or(CommunityError::Unauthorized)?;
            Ok(ReviewSnapshot {
                reviews: vec![
                    RawReview::in_neighborhood("Centro", 5.0),
                    RawReview::on_street("Rua Barreto Leme", 1.0, Some("Escuro")),
                ],
                total_records: 2,
            })
        }

        async fn count_users(&self, token: Option<&AuthToken>) -> Result<u64, CommunityError> {
            token.ok_or(CommunityError::Unauthorized)?;
            Ok(7)
        }
    }

    fn state() -> web::Data<AppState> {
        let resolver = AddressResolver::new(
            Arc::new(TableGeocoder),
            city_by_id(DEFAULT_CITY_ID).unwrap(),
        );
        let search = RouteSearch::new(RouteCollector::new(resolver.clone(), Arc::new(TwoPaths)));
        web::Data::new(AppState {
            resolver,
            search,
            reviews: Arc::new(RequiresToken),
        })
    }

    async fn get(uri: &str, auth: Option<&str>) -> (StatusCode, serde_json::Value) {
        let app = test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let mut req = test::TestRequest::get().uri(uri);
        if let Some(auth) = auth {
            req = req.insert_header((header::AUTHORIZATION, auth));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn geocode_statuses() {
        let (status, body) = get("/api/geocode?q=Centro", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_object());
        assert_eq!(body["query"], "Centro");
        assert!((body["latitude"].as_f64().unwrap() - -22.9056).abs() < 1e-9);

        let (status, body) = get("/api/geocode?q=Avenida%20Paulista", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "out_of_bounds");

        let (status, _) = get("/api/geocode?q=Lugar%20Nenhum", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get("/api/geocode", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");
    }

    #[actix_web::test]
    async fn routes_are_classified_with_labels() {
        let (status, body) = get("/api/routes?origin=Centro&destination=Cambu%C3%AD", None).await;
        assert_eq!(status, StatusCode::OK);

        let routes = body.as_array().unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0]["id"], 1);
        assert_eq!(routes[0]["safetyTier"], "safe");
        assert_eq!(routes[0]["tierLabel"], "Safe route");
        assert_eq!(routes[0]["distanceLabel"], "1.50 km");
        assert_eq!(routes[1]["category"], "balanced");
        assert!(routes[1]["contributors"].is_null());
    }

    #[actix_web::test]
    async fn unresolved_side_is_reported() {
        let (status, body) =
            get("/api/routes?origin=Centro&destination=Avenida%20Paulista", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["side"], "destination");
        assert_eq!(body["error"], "out_of_bounds");
    }

    #[actix_web::test]
    async fn community_forwards_authorization() {
        let (status, body) = get("/api/community", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");

        let (status, body) = get("/api/community?streets=1", Some("Bearer abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["activeUsers"], 7);
        assert_eq!(body["stats"]["totalReviews"], 2);
        assert_eq!(body["neighborhoods"][0]["name"], "Centro");
        assert_eq!(body["hazards"][0]["representativeIssue"], "Escuro");
    }

    #[actix_web::test]
    async fn status_mapping_per_error_kind() {
        assert_eq!(collect_status(&CollectError::Empty), StatusCode::NOT_FOUND);
        assert_eq!(
            collect_status(&CollectError::Failed(RoutingError::Status { status: 503 })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            community_status(&CommunityError::Unauthorized),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            resolve_status(&ResolveError::Validation),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn non_bearer_authorization_is_not_forwarded() {
        let (status, body) = get("/api/community", Some("Basic dXNlcjpwYXNz")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }
}
