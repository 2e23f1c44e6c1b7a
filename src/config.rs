//! Service configuration
//!
//! All settings are CLI flags with environment-variable fallbacks, so the
//! service can be configured either way in containers (`PORT`, `MODEL_PATH`).

use clap::Parser;

/// Configuration for the serving process
#[derive(Parser, Debug, Clone)]
#[command(name = "model-serve", version, about = "HTTP inference service for a trained classifier")]
pub struct ServeConfig {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Path to the serialized model artifact
    #[arg(long, env = "MODEL_PATH", default_value = "model/artifact.json")]
    pub model_path: String,
}

impl ServeConfig {
    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
