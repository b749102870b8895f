pub mod api;
pub mod health;
pub mod modules;
pub mod shared;

use crate::modules::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::modules::auth::adapter::outgoing::security::argon2_hasher::Argon2Hasher;
use crate::modules::auth::adapter::outgoing::{InMemoryUserRepository, UserRepositoryPostgres};
use crate::modules::auth::application::ports::outgoing::{
    PasswordHasher, TokenProvider, UserRepository,
};
use crate::modules::auth::application::use_cases::{
    login_user::{ILoginUserUseCase, LoginUserUseCase},
    sign_up_user::{ISignUpUserUseCase, SignUpUserUseCase},
};
use crate::modules::contact::adapter::outgoing::Web3FormsDelivery;
use crate::modules::contact::application::use_cases::send_contact_message::{
    ISendContactMessageUseCase, SendContactMessageUseCase,
};
use crate::modules::media::adapter::outgoing::GcsImageStorage;
use crate::modules::media::application::domain::UploadPolicy;
use crate::modules::media::application::use_cases::create_upload_url::{
    CreateUploadUrlUseCase, ICreateUploadUrlUseCase,
};
use crate::modules::portfolio::application::{DashboardService, PortfolioManagers};
use crate::modules::section::application::SectionContentService;
use crate::modules::store::adapter::outgoing::{
    DocumentStorePostgres, InMemoryDocumentStore, NotificationLog,
};
use crate::modules::store::application::ports::outgoing::{DocumentStore, Notifier};
use crate::modules::store::application::RequestTracker;
use crate::shared::api::custom_json_config;
use crate::shared::config::{AppConfig, StoreBackend};

use actix_web::{web, App, HttpServer};
use sea_orm::{ConnectOptions, Database};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub notifications: Arc<NotificationLog>,
    pub requests: Arc<RequestTracker>,
    pub managers: Arc<PortfolioManagers>,
    pub dashboard: Arc<DashboardService>,
    pub sections: Arc<SectionContentService>,
    pub login_user_use_case: Arc<dyn ILoginUserUseCase>,
    pub sign_up_user_use_case: Arc<dyn ISignUpUserUseCase>,
    pub send_contact_message_use_case: Arc<dyn ISendContactMessageUseCase>,
    pub create_upload_url_use_case: Arc<dyn ICreateUploadUrlUseCase>,
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    // Try .env.{environment} first, then fall back to .env
    let env = std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
    let env_file = format!(".env.{}", env);
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }

    let config = AppConfig::from_env();

    // Stores
    let (store, users): (Arc<dyn DocumentStore>, Arc<dyn UserRepository>) =
        match config.store_backend {
            StoreBackend::Memory => {
                tracing::warn!("STORE_BACKEND=memory: content is lost on restart");
                let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
                let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
                (store, users)
            }
            StoreBackend::Postgres => {
                let db_url = config
                    .database_url
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;

                let mut opt = ConnectOptions::new(db_url);
                opt.max_connections(20)
                    .min_connections(2)
                    .connect_timeout(Duration::from_secs(5))
                    .acquire_timeout(Duration::from_secs(5))
                    .idle_timeout(Duration::from_secs(300))
                    .max_lifetime(Duration::from_secs(1800))
                    .sqlx_logging(false);

                let db = Arc::new(Database::connect(opt).await?);
                let store: Arc<dyn DocumentStore> =
                    Arc::new(DocumentStorePostgres::new(Arc::clone(&db)));
                let users: Arc<dyn UserRepository> = Arc::new(UserRepositoryPostgres::new(db));
                (store, users)
            }
        };

    // Data-access and managers
    let notifications = Arc::new(NotificationLog::default());
    let notifier: Arc<dyn Notifier> = notifications.clone();
    let requests = RequestTracker::new();

    let managers = Arc::new(PortfolioManagers::new(
        Arc::clone(&store),
        Arc::clone(&notifier),
        Arc::clone(&requests),
    ));
    let _reconciler = Arc::clone(&managers).spawn_reconciler(config.reconcile_interval);

    let dashboard = Arc::new(DashboardService::new(
        Arc::clone(&managers),
        Arc::clone(&notifier),
    ));
    let sections = Arc::new(SectionContentService::new(
        Arc::clone(&store),
        notifier,
        Arc::clone(&requests),
    ));

    // Auth
    let tokens: Arc<dyn TokenProvider> = Arc::new(JwtTokenService::new(JwtConfig::from_env()));
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::from_env());

    let login_user_use_case =
        LoginUserUseCase::new(Arc::clone(&users), Arc::clone(&hasher), Arc::clone(&tokens));
    let sign_up_user_use_case = SignUpUserUseCase::new(users, hasher, Arc::clone(&tokens));

    // Outbound services
    let send_contact_message_use_case = SendContactMessageUseCase::new(Arc::new(
        Web3FormsDelivery::new(&config.contact_endpoint, config.contact_access_key.clone()),
    ));
    let create_upload_url_use_case = CreateUploadUrlUseCase::new(
        Arc::new(GcsImageStorage::new()),
        UploadPolicy::from_bucket(config.media_bucket.as_deref()),
    );

    let state = AppState {
        store,
        notifications,
        requests,
        managers,
        dashboard,
        sections,
        login_user_use_case: Arc::new(login_user_use_case),
        sign_up_user_use_case: Arc::new(sign_up_user_use_case),
        send_contact_message_use_case: Arc::new(send_contact_message_use_case),
        create_upload_url_use_case: Arc::new(create_upload_url_use_case),
    };

    let server_url = config.server_url();
    info!("Server run on: {}", server_url);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(Arc::clone(&tokens)))
            .app_data(custom_json_config())
            .configure(init_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
            )
    })
    .bind(server_url)?
    .run()
    .await?;

    Ok(())
}

#[cfg(not(tarpaulin_include))]
fn init_routes(cfg: &mut web::ServiceConfig) {
    use crate::modules::{auth, contact, portfolio, section};

    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // Public portfolio
    cfg.service(portfolio::adapter::incoming::web::routes::get_projects_handler);
    cfg.service(portfolio::adapter::incoming::web::routes::get_experience_handler);
    cfg.service(portfolio::adapter::incoming::web::routes::get_education_handler);
    cfg.service(portfolio::adapter::incoming::web::routes::get_skills_handler);
    cfg.service(portfolio::adapter::incoming::web::routes::get_skill_categories_handler);
    cfg.service(portfolio::adapter::incoming::web::routes::stream_collection_handler);
    // Sections
    cfg.service(section::adapter::incoming::web::routes::get_sections_handler);
    cfg.service(section::adapter::incoming::web::routes::get_section_handler);
    cfg.service(section::adapter::incoming::web::routes::stream_section_handler);
    // Contact
    cfg.service(contact::adapter::incoming::web::routes::send_contact_message_handler);
    // Auth
    cfg.service(auth::adapter::incoming::web::routes::login_user_handler);
    cfg.service(auth::adapter::incoming::web::routes::sign_up_user_handler);

    #[cfg(feature = "admin")]
    init_admin_routes(cfg);
}

#[cfg(all(feature = "admin", not(tarpaulin_include)))]
fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    use crate::modules::media::adapter::incoming::web::routes as media;
    use crate::modules::portfolio::adapter::incoming::web::routes as portfolio;
    use crate::modules::section::adapter::incoming::web::routes as section;

    // Skill categories (reconcile before the {id} routes)
    cfg.service(portfolio::reconcile_skill_categories_handler);
    cfg.service(portfolio::list_skill_categories_handler);
    cfg.service(portfolio::create_skill_category_handler);
    cfg.service(portfolio::rename_skill_category_handler);
    cfg.service(portfolio::request_skill_category_delete_handler);
    cfg.service(portfolio::delete_skill_category_handler);
    // Managed lists
    cfg.service(portfolio::cancel_delete_handler);
    cfg.configure(portfolio::admin_entity_routes);
    // Sections
    cfg.service(section::save_section_handler);
    cfg.service(section::reset_section_handler);
    // Dashboard and activity
    cfg.service(portfolio::dashboard_stats_handler);
    cfg.service(portfolio::seed_dashboard_handler);
    cfg.service(portfolio::reset_dashboard_handler);
    cfg.service(portfolio::list_notifications_handler);
    cfg.service(portfolio::list_requests_handler);
    // Media
    cfg.service(media::create_upload_url_handler);
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e}");
    }
}
