use crate::config::Config;
use crate::query::QueryService;
use crate::views::Views;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub query: QueryService,
    pub views: Arc<Views>,
    pub config: Config,
}

impl AppState {
    pub fn new(query: QueryService, views: Views, config: Config) -> Self {
        Self {
            query,
            views: Arc::new(views),
            config,
        }
    }
}
