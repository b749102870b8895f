use std::future::{ready, Ready};
use std::sync::Arc;

use actix_web::http::header::{HeaderValue, AUTHORIZATION, LOCATION};
use actix_web::{dev::Payload, web, Error as ActixError, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::modules::auth::application::ports::outgoing::TokenProvider;
use crate::shared::api::ApiResponse;

pub const LOGIN_PATH: &str = "/admin/login";

/// The signed-in owner. Taking it as a handler argument gates the route.
///
/// Rejections are `401` with a `Location` header pointing at the login page.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub account_id: Uuid,
}

fn reject(code: &str, message: &str) -> ActixError {
    let mut response = ApiResponse::unauthorized(code, message);
    response
        .headers_mut()
        .insert(LOCATION, HeaderValue::from_static(LOGIN_PATH));
    actix_web::error::InternalError::from_response("", response).into()
}

fn internal() -> ActixError {
    actix_web::error::InternalError::from_response("", ApiResponse::internal_error()).into()
}

impl FromRequest for AdminUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(tokens) = req.app_data::<web::Data<Arc<dyn TokenProvider>>>() else {
            tracing::error!("TokenProvider missing from app data");
            return ready(Err(internal()));
        };

        let Some(token) = bearer_token(req) else {
            return ready(Err(reject("LOGIN_REQUIRED", "Please sign in to continue")));
        };

        match tokens.verify_token(&token) {
            Ok(claims) => ready(Ok(AdminUser {
                account_id: claims.sub,
            })),
            Err(e) => {
                tracing::debug!("Rejected admin token: {}", e);
                ready(Err(reject("INVALID_TOKEN", "Invalid or expired token")))
            }
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
    use actix_web::{get, http::StatusCode, test, App, Responder};

    #[get("/guarded")]
    async fn guarded(user: AdminUser) -> impl Responder {
        ApiResponse::success(user.account_id.to_string())
    }

    fn token_provider() -> Arc<dyn TokenProvider> {
        Arc::new(JwtTokenService::new(JwtConfig::for_tests()))
    }

    #[actix_web::test]
    async fn missing_header_redirects_to_login() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(token_provider()))
                .service(guarded),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/guarded").to_request())
            .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/admin/login");
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "LOGIN_REQUIRED");
    }

    #[actix_web::test]
    async fn bad_token_is_invalid_token() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(token_provider()))
                .service(guarded),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", "Bearer nope"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    }

    #[actix_web::test]
    async fn valid_token_passes_account_id() {
        let tokens = token_provider();
        let id = Uuid::new_v4();
        let token = tokens.generate_access_token(id).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(tokens))
                .service(guarded),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"], id.to_string());
    }
}
