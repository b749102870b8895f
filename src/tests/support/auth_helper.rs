use std::sync::Arc;

use actix_web::web;
use uuid::Uuid;

use crate::modules::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::modules::auth::application::ports::outgoing::TokenProvider;

pub fn token_provider() -> Arc<dyn TokenProvider> {
    Arc::new(JwtTokenService::new(JwtConfig::for_tests()))
}

/// Register next to the app state so `AdminUser` can verify tokens.
pub fn token_data() -> web::Data<Arc<dyn TokenProvider>> {
    web::Data::new(token_provider())
}

/// `Authorization` header for a freshly signed-in owner.
pub fn bearer() -> (&'static str, String) {
    let token = token_provider()
        .generate_access_token(Uuid::new_v4())
        .expect("test token");
    ("Authorization", format!("Bearer {token}"))
}
