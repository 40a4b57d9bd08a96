pub mod config;
pub mod console;
pub mod constants;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod schema;
pub mod types;

pub use config::{Config, PipelinePaths};
pub use error::{IngestError, QualityError, Result, SchemaError};
pub use pipeline::{Pipeline, PipelineResult};
