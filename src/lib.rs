pub mod api;
pub mod config;
pub mod error;
pub mod graph;

pub use api::{HttpPetFetcher, PetFetcher, PetId, PetRecord};
pub use config::Config;
pub use error::{PetlineageError, Result};
pub use graph::{CancellationToken, Edge, GraphBuilder, GraphNode, GraphSink, PetGraph};
