//! Runner connecting parsed arguments to the retag workflow

use crate::cli::args::Args;
use crate::config::RetagConfig;
use crate::error::{RetagError, Result};
use crate::logging::Logger;
use crate::registry::RegistryClient;
use crate::retag::{RetagSummary, Retagger};
use std::io::Read;
use std::sync::Arc;
use std::time::Instant;

pub struct Runner {
    args: Args,
    config: RetagConfig,
    output: Logger,
}

impl Runner {
    pub fn new(args: Args, config: RetagConfig) -> Self {
        let output = Logger::new(config.log_level);
        Self {
            args,
            config,
            output,
        }
    }

    pub fn output(&self) -> &Logger {
        &self.output
    }

    pub async fn run(&self) -> Result<RetagSummary> {
        let start_time = Instant::now();

        self.args.validate().map_err(RetagError::Validation)?;
        let source = self
            .args
            .source()
            .ok_or_else(|| RetagError::Validation("missing source image".to_string()))?;
        let targets = self.args.targets();

        let password = if self.args.password_stdin {
            Some(read_password(std::io::stdin().lock())?)
        } else {
            self.args.password.clone()
        };

        let config = Arc::new(
            self.config
                .clone()
                .with_explicit_auth(self.args.username.clone(), password),
        );
        self.output.debug(&format!(
            "Registry scheme: {}, max workers: {}",
            config.scheme(),
            config.max_workers
        ));

        let client = RegistryClient::builder(Arc::clone(&config))
            .with_logger(self.output.clone())
            .build()?;

        let summary = Retagger::new(Arc::new(client), self.output.clone())
            .with_max_workers(config.max_workers)
            .retag_refs(source, targets)
            .await?;

        self.output.summary_kv(
            "Retag Summary",
            &[
                ("Source", summary.source.to_string()),
                ("Tagged", summary.published.len().to_string()),
                ("Layers", summary.manifest.layers.len().to_string()),
                ("Elapsed", format!("{:.2}s", start_time.elapsed().as_secs_f64())),
            ],
        );
        Ok(summary)
    }
}

/// Read a password from `reader`, trimming surrounding whitespace
pub fn read_password<R: Read>(mut reader: R) -> Result<String> {
    let mut password = String::new();
    reader
        .read_to_string(&mut password)
        .map_err(|e| RetagError::Io(format!("Failed to read password from stdin: {}", e)))?;
    Ok(password.trim().to_string())
}
