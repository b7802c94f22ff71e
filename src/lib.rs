pub mod app_state;
pub mod config;
pub mod dataset;
pub mod handlers_api;
pub mod handlers_pages;
pub mod models;
pub mod query;
pub mod registry;
pub mod router;
pub mod startup;
pub mod views;

#[cfg(test)]
pub mod test_utils;
