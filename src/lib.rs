pub mod cache;
pub mod clients;
pub mod config;
pub mod drilldown;
pub mod error;
pub mod export;
pub mod helpers;
pub mod models;
pub mod render;
pub mod routes;

use std::sync::Arc;

use clients::drilldown::Drilldown;
use clients::refresh::Dashboard;
use export::{Clipboard, Launcher};

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub drilldown: Arc<Drilldown>,
    pub config: Arc<config::Config>,
    pub clipboard: Arc<dyn Clipboard>,
    pub launcher: Arc<dyn Launcher>,
}
