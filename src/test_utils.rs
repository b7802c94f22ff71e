use crate::app_state::AppState;
use crate::config::Config;
use crate::dataset::SeedDataset;
use crate::query::QueryService;
use crate::registry::RegistryStore;
use crate::startup::seed_registry;
use crate::views::Views;
use chrono::{DateTime, TimeZone, Utc};

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 28, 8, 0, 0).unwrap()
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        assets_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/web/static").into(),
        cors_allow_any: true,
    }
}

pub fn seeded_query_service() -> QueryService {
    let store = RegistryStore::new();
    seed_registry(&store, &SeedDataset::canonical()).expect("Failed to seed registry");
    QueryService::new(store)
}

pub fn create_test_app_state() -> AppState {
    let views = Views::new().expect("Failed to compile templates");
    AppState::new(seeded_query_service(), views, create_test_config())
}
