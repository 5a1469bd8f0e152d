mod client;
mod dataset;
mod error;
mod result;
mod run_config;
mod topology;

pub use client::ApiClient;
pub use dataset::load_dataset;
pub use error::ApiError;
pub use result::{ResultMetadata, SimulationResult, SimulationStep, TopSpreader};
pub use run_config::{RunConfig, Strategy};
pub use topology::{NodeId, RawEdge, RawNode, Topology};
