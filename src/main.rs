use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use portfolio_backend::auth::authorization::AdminAllowList;
use portfolio_backend::auth::gotrue::SupabaseAuth;
use portfolio_backend::auth::jwks::JwksCache;
use portfolio_backend::auth::jwt::TokenVerifier;
use portfolio_backend::cache::{RedisCache, keys};
use portfolio_backend::config::AppConfig;
use portfolio_backend::create_pool;
use portfolio_backend::db::SharedStore;
use portfolio_backend::handlers;
use portfolio_backend::services::journal::{
    ACTIVITY_LIMIT, ActivityLog, JournalBackend, QUERY_HISTORY_LIMIT, QueryHistory,
};
use portfolio_backend::services::uploads::{SharedStorage, SupabaseStorage, UploadPolicy};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let db = create_pool(&config.database_url)
        .await
        .expect("Failed to connect to the database");
    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        tracing::info!("Migrations applied");
    }
    let store: SharedStore = Arc::new(db);
    let store_data = web::Data::new(store);

    // Redis holds the activity log and the SQL console history.
    let redis_cache = RedisCache::new(&config.redis_url)
        .await
        .expect("Failed to connect to Redis");
    tracing::info!("Connected to Redis");
    let journal_backend: Arc<dyn JournalBackend> = Arc::new(redis_cache);
    let activity_data = web::Data::new(ActivityLog::new(
        journal_backend.clone(),
        keys::activity_log(),
        ACTIVITY_LIMIT,
    ));
    let history_data = web::Data::new(QueryHistory::new(
        journal_backend,
        keys::query_history(),
        QUERY_HISTORY_LIMIT,
    ));

    let verifier = match &config.supabase_jwt_secret {
        Some(secret) => TokenVerifier::Secret(secret.clone()),
        None => {
            config
                .project_ref()
                .expect("Invalid SUPABASE_URL format. Expected: https://PROJECT.supabase.co");
            TokenVerifier::Jwks(Arc::new(JwksCache::new(
                &config.supabase_url,
                &config.supabase_anon_key,
            )))
        }
    };
    let verifier_data = web::Data::new(verifier);
    let allow_list_data = web::Data::new(AdminAllowList(config.admin_emails.clone()));
    if config.admin_emails.is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty; every authenticated user can use the admin API");
    }

    let auth_data = web::Data::new(SupabaseAuth::new(
        &config.supabase_url,
        &config.supabase_anon_key,
    ));
    let storage: SharedStorage = Arc::new(SupabaseStorage::new(
        config.supabase_url.clone(),
        config.supabase_anon_key.clone(),
        config.storage_bucket.clone(),
    ));
    let storage_data = web::Data::new(storage);
    let policy = UploadPolicy {
        max_size_mb: config.upload_max_mb,
    };
    let policy_data = web::Data::new(policy);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(store_data.clone())
            .app_data(activity_data.clone())
            .app_data(history_data.clone())
            .app_data(verifier_data.clone())
            .app_data(allow_list_data.clone())
            .app_data(auth_data.clone())
            .app_data(storage_data.clone())
            .app_data(policy_data.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
