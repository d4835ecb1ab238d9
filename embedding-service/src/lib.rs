//! Shared embedding client used by the movie search core.
//!
//! - Construct once at startup, wrap in `Arc`, and pass clones to dependents.
//! - Vectors are L2-normalized on the client side by default.
//! - [`HealthService`] gives a startup probe so an unreachable backend can be
//!   treated as fatal by the binary.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;
pub mod telemetry;

pub use config::embedding_config::EmbeddingModelConfig;
pub use error_handler::{ConfigError, EmbeddingError};
pub use health_service::{HealthService, HealthStatus};
pub use services::ollama_service::{OllamaService, l2_normalize};
