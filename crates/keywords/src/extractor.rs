use contentgen_common::AppConfig;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::error::KeywordError;

/// Runner for the external keyword classifier.
///
/// The script receives the text as its only argument and prints a JSON
/// array of keyword strings; any other output is a failure.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    python: PathBuf,
    script: PathBuf,
    model_files: Vec<PathBuf>,
    model_dir: PathBuf,
    timeout: Duration,
}

impl KeywordExtractor {
    /// Create new extractor
    pub fn new(
        python: impl Into<PathBuf>,
        script: impl Into<PathBuf>,
        model_dir: impl Into<PathBuf>,
        model_files: &[&str],
        timeout: Duration,
    ) -> Self {
        let model_dir = model_dir.into();
        Self {
            python: python.into(),
            script: script.into(),
            model_files: model_files.iter().map(|f| model_dir.join(f)).collect(),
            model_dir,
            timeout,
        }
    }

    /// Create extractor from application configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let (model, labels) = config.keyword_model_paths();
        Self {
            python: config.python_executable.clone(),
            script: config.keyword_script.clone(),
            model_files: vec![model, labels],
            model_dir: config.keyword_model_dir.clone(),
            timeout: Duration::from_secs(config.keyword_timeout_secs),
        }
    }

    /// Check that the script and every model artifact are in place
    pub fn check_ready(&self) -> Result<(), KeywordError> {
        if !self.script.is_file() {
            return Err(KeywordError::ScriptMissing(self.script.clone()));
        }
        if let Some(missing) = self.model_files.iter().find(|p| !p.is_file()) {
            return Err(KeywordError::ModelMissing(missing.clone()));
        }
        Ok(())
    }

    /// Extract keywords from `content`
    pub async fn extract(&self, content: &str) -> Result<Vec<String>, KeywordError> {
        self.check_ready().map_err(|e| {
            error!("Keyword extraction not configured: {}", e);
            e
        })?;

        info!("Running keyword extraction - Text length: {} chars", content.len());

        // The classifier loads `ml_models/*.pkl` relative to its working
        // directory, so it runs from the model directory's parent.
        let work_dir = self.work_dir();
        debug!("Keyword process working directory: {}", work_dir.display());

        let mut command = Command::new(self.python_program());
        command
            .arg(absolute(&self.script))
            .arg(content)
            .current_dir(&work_dir)
            .env("PYTHONPATH", &work_dir)
            .env("KEYWORD_MODEL_DIR", absolute(&self.model_dir))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|e| {
                error!("Failed to start keyword process {}: {}", self.python.display(), e);
                KeywordError::Spawn(e)
            })?,
            Err(_) => {
                error!("Keyword process timed out after {:?}", self.timeout);
                return Err(KeywordError::TimedOut(self.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(
                "Keyword process failed with code {:?}: {}",
                output.status.code(),
                stderr
            );
            return Err(KeywordError::ExitStatus {
                code: output.status.code(),
                stderr,
            });
        }

        parse_keywords(&String::from_utf8_lossy(&output.stdout))
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Parent of the model directory, made absolute
    fn work_dir(&self) -> PathBuf {
        let model_dir = absolute(&self.model_dir);
        match model_dir.parent() {
            Some(parent) => parent.to_path_buf(),
            None => model_dir,
        }
    }

    /// Interpreter paths like `venv/bin/python` are resolved before the
    /// working directory changes; bare names are left to `PATH`.
    fn python_program(&self) -> PathBuf {
        if self.python.components().count() > 1 {
            absolute(&self.python)
        } else {
            self.python.clone()
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

fn parse_keywords(stdout: &str) -> Result<Vec<String>, KeywordError> {
    let raw = stdout.trim();
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(keywords) => {
            debug!("Extracted {} keywords", keywords.len());
            Ok(keywords)
        }
        Err(source) => {
            error!("Failed to parse keyword output: {}", raw);
            Err(KeywordError::Parse {
                raw: raw.to_string(),
                source,
            })
        }
    }
}
