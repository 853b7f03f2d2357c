use crate::config::Config;
use crate::dataset::{Dataset, Fetch};
use crate::demo::DemoBoard;
use crate::sampler::RandomSampler;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    pub fetcher: Box<dyn Fetch>,
    pub dataset: Option<Dataset>,
    pub last_load_error: Option<String>,
    pub sampler: RandomSampler,
    pub demo: DemoBoard,
}

impl AppState {
    pub fn new(config: Config, fetcher: Box<dyn Fetch>) -> Self {
        Self {
            config,
            fetcher,
            dataset: None,
            last_load_error: None,
            sampler: RandomSampler::new(),
            demo: DemoBoard::seeded(),
        }
    }
}
