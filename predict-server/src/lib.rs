//! Bug Assignee Prediction Server
//!
//! Serves developer predictions from the artifacts written by the `train`
//! binary of `model-service`.
//!
//! ```text
//! POST /predict-assignee ──► handlers::predict ──► Predictor (Arc, read-only)
//! GET  /health           ──► handlers::health
//! ```

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use model_service::Predictor;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub config: config::Config,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict-assignee", post(handlers::predict::predict_assignee))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, OnceLock};

    use model_service::{
        dataset::read_records, forest::ForestConfig, train, Predictor, TrainConfig,
    };

    use super::{config::Config, AppState};

    const DATA: &str = "\
taskTitle,taskDetails,taskCompleted,taskTodos,category,assignedEmployee
Login broken,login fails with 500 from auth service,True,\"check logs,fix token\",Backend,alice
Auth timeout,auth service times out on login,False,retry,Backend,alice
Token expiry,session token expires too early,1,,Backend,alice
Button color,submit button has the wrong color,True,css,Frontend,bob
Layout shift,page layout shifts on mobile,False,\"css,test\",Frontend,bob
Font size,heading font size too small,1,,Frontend,bob
";

    fn predictor() -> Arc<Predictor> {
        static PREDICTOR: OnceLock<Arc<Predictor>> = OnceLock::new();
        PREDICTOR
            .get_or_init(|| {
                let records = read_records(DATA.as_bytes()).unwrap();
                let config = TrainConfig {
                    forest: ForestConfig { n_estimators: 10, ..ForestConfig::default() },
                    ..TrainConfig::default()
                };
                let (artifacts, _) = train(&records, &config).unwrap();
                Arc::new(Predictor::from_artifacts(artifacts).unwrap())
            })
            .clone()
    }

    pub fn test_state() -> AppState {
        AppState {
            predictor: predictor(),
            config: Config::from_env(),
        }
    }
}
