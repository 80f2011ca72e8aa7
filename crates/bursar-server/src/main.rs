//! BURSAR Server — application entry point.
//!
//! Reads configuration from the environment, connects to storage,
//! applies migrations and wires the services. The HTTP routing layer
//! lives outside this core and is mounted on top of the services
//! built here.

use std::error::Error;

use bursar_auth::config::AuthConfig;
use bursar_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Build the database configuration from `BURSAR_DB_*` variables.
fn db_config_from_env() -> DbConfig {
    DbConfig {
        endpoint: env_or("BURSAR_DB_ENDPOINT", "127.0.0.1:8000"),
        namespace: env_or("BURSAR_DB_NAMESPACE", "bursar"),
        database: env_or("BURSAR_DB_DATABASE", "main"),
        username: env_or("BURSAR_DB_USER", "root"),
        password: env_or("BURSAR_DB_PASS", "root"),
    }
}

/// Build the auth configuration from `BURSAR_JWT_*` variables. Key
/// material is loaded from the configured PEM file paths.
fn auth_config_from_env() -> Result<AuthConfig, Box<dyn Error>> {
    let private_key_path = env_or("BURSAR_JWT_PRIVATE_KEY_PATH", "certs/jwt-private.pem");
    let public_key_path = env_or("BURSAR_JWT_PUBLIC_KEY_PATH", "certs/jwt-public.pem");

    Ok(AuthConfig {
        jwt_private_key_pem: std::fs::read_to_string(&private_key_path)?,
        jwt_public_key_pem: std::fs::read_to_string(&public_key_path)?,
        jwt_algorithm: env_or("BURSAR_JWT_ALGORITHM", "EdDSA"),
        access_token_lifetime_secs: env_or("BURSAR_ACCESS_TOKEN_TTL_SECS", "86400").parse()?,
        refresh_token_lifetime_secs: env_or("BURSAR_REFRESH_TOKEN_TTL_SECS", "2592000").parse()?,
        pepper: std::env::var("BURSAR_PASSWORD_PEPPER").ok(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("bursar=info".parse()?),
        )
        .json()
        .init();

    tracing::info!("Starting BURSAR server...");

    let auth_config = auth_config_from_env()?;
    let db_config = db_config_from_env();

    let manager = DbManager::connect(&db_config).await?;
    bursar_db::run_migrations(manager.client()).await?;

    let db = manager.client().clone();
    // Hashing and verification must agree on the pepper.
    let users = match auth_config.pepper.clone() {
        Some(pepper) => {
            bursar_db::repository::SurrealUserRepository::with_pepper(db.clone(), pepper)
        }
        None => bursar_db::repository::SurrealUserRepository::new(db.clone()),
    };
    let audit = bursar_service::AuditRecorder::new(
        bursar_db::repository::SurrealOperationRepository::new(db.clone()),
    );

    let _auth = bursar_auth::AuthService::new(users.clone(), auth_config);
    let _directory = bursar_service::UserDirectory::new(users.clone(), audit.clone());
    let _infra = bursar_service::InfraService::new(
        bursar_db::repository::SurrealGroupRepository::new(db.clone()),
        bursar_db::repository::SurrealSemesterRepository::new(db.clone()),
        users.clone(),
        audit.clone(),
    );
    let _operations = bursar_service::OperationService::new(
        users,
        bursar_db::repository::SurrealGroupRepository::new(db.clone()),
        bursar_db::repository::SurrealSemesterRepository::new(db.clone()),
        bursar_db::repository::SurrealTransactionRepository::new(db.clone()),
        audit,
    );

    tracing::info!("BURSAR services ready");

    // TODO: mount the HTTP routing layer on top of the services.

    Ok(())
}
