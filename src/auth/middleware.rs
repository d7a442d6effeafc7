use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::{extractors::AuthenticatedUserId, token::TokenService};
use crate::error::AppError;

/// Request gate for protected routes.
///
/// Reads the token from the `Authorization` header (a bare token, or one
/// prefixed with the `Bearer` scheme), verifies it with the
/// `web::Data<dyn TokenService>` registered on the app, and stores the
/// caller's id in the request extensions as [`AuthenticatedUserId`].
/// Rejected requests get a 401 response and never reach the handler.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(user_id) => {
                req.extensions_mut().insert(AuthenticatedUserId(user_id));
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                log::warn!("Rejected {} {}: {}", req.method(), req.path(), app_err);
                let response = req
                    .into_response(app_err.error_response())
                    .map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

fn authenticate(req: &ServiceRequest) -> Result<i32, AppError> {
    let tokens = req
        .app_data::<web::Data<dyn TokenService>>()
        .ok_or_else(|| AppError::InternalServerError("Token service not configured".into()))?;

    let token = extract_token(req.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    let user_id = tokens.verify(token)?;
    log::debug!("Token verified for user {}", user_id);
    Ok(user_id)
}

/// Returns the raw token from the `Authorization` header, if any.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim_start();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::JwtService;
    use actix_web::{http::StatusCode, test, App, HttpResponse};
    use std::sync::Arc;

    const SECRET: &str = "middleware_test_secret";

    async fn whoami(user_id: AuthenticatedUserId) -> HttpResponse {
        HttpResponse::Ok().body(user_id.0.to_string())
    }

    fn token_data() -> web::Data<dyn TokenService> {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtService::new(SECRET));
        web::Data::from(tokens)
    }

    #[actix_rt::test]
    async fn test_extract_token_accepts_raw_and_bearer() {
        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "abc.def.ghi"))
            .to_http_request();
        assert_eq!(extract_token(req.headers()), Some("abc.def.ghi"));

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(extract_token(req.headers()), Some("abc.def.ghi"));

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_http_request();
        assert_eq!(extract_token(req.headers()), None);

        let req = test::TestRequest::default().to_http_request();
        assert_eq!(extract_token(req.headers()), None);
    }

    #[actix_rt::test]
    async fn test_valid_token_reaches_handler() {
        let token = JwtService::new(SECRET).issue(17).unwrap();
        let app = test::init_service(
            App::new().app_data(token_data()).service(
                web::resource("/whoami")
                    .wrap(AuthMiddleware)
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "17");
    }

    #[actix_rt::test]
    async fn test_missing_and_invalid_tokens_are_rejected() {
        let app = test::init_service(
            App::new().app_data(token_data()).service(
                web::resource("/whoami")
                    .wrap(AuthMiddleware)
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing token");

        let foreign = JwtService::new("another_secret").issue(17).unwrap();
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, foreign))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid token"));
    }

    #[actix_rt::test]
    async fn test_missing_token_service_is_a_server_error() {
        let app = test::init_service(
            App::new().service(
                web::resource("/whoami")
                    .wrap(AuthMiddleware)
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, "Bearer abc"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
