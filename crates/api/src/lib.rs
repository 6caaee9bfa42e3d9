//! HTTP API for the wedding invitation service.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod jobs;
pub mod middleware;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use domain::services::template_save::{MemoryLocalStore, TemplateSaver};
    use persistence::repositories::CustomTemplateRepository;

    use crate::app::AppState;
    use crate::config::Config;

    pub const TEST_JWT_SECRET: &str = "test_secret_key_for_jwt_testing_12345";

    /// State whose database is unreachable; templates save to memory.
    pub fn test_state() -> AppState {
        let config = Config::load_for_test(&[
            ("database.url", "postgres://nobody@127.0.0.1:1/none"),
            ("database.connect_timeout_secs", "1"),
            ("jwt.secret", TEST_JWT_SECRET),
        ])
        .expect("test config");
        let jwt = config.jwt.build().expect("test jwt config");
        let pool = persistence::db::create_lazy_pool(&config.database.pool_config())
            .expect("lazy pool");
        let saver = TemplateSaver::new(
            Arc::new(CustomTemplateRepository::new(pool.clone())),
            Arc::new(MemoryLocalStore::new()),
        );
        AppState::new(config, jwt, pool, saver)
    }
}
