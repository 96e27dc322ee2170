use std::sync::Arc;

use crate::analyzer::Analyzer;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn Analyzer>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self { analyzer }
    }
}
