//! The three commands that touch the repository: check, export, build.
//!
//! A [`Workspace`] pairs the repository root with its resolved config; all
//! configured paths are joined onto the root. Each command reads the
//! backing store, validates it, and only then does anything else. A failed
//! validation never writes a file.
//!
//! [`build`] computes every artifact in memory before writing any of them,
//! so a README with broken markers aborts the run with the charts and the
//! export untouched. Writes then go charts, export, README: the README links
//! to the charts, so it is updated last.

use crate::aggregate::{self, AggregateResult};
use crate::artifact::{self, WriteStatus};
use crate::config::{self, ConfigError, Overrides, PaperLogConfig};
use crate::export::{self, ExportError};
use crate::render::{self, ChartError, ChartPaths, ChartRenderer, FormatError};
use crate::validate::{self, SchemaError, Validated, Warning};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("{path}: {source}")]
    Format { path: PathBuf, source: FormatError },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// A repository holding a paper log.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: PaperLogConfig,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, config: PaperLogConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Load the config for `root` and wrap both.
    pub fn open(
        root: impl Into<PathBuf>,
        config_path: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self, PipelineError> {
        let root = root.into();
        let config = config::load_config(&root, config_path, overrides)?;
        debug!(root = %root.display(), ?config, "workspace opened");
        Ok(Self { root, config })
    }

    /// Absolute (or root-relative) location of a configured path.
    pub fn path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Today's date in the configured time zone.
    pub fn today(&self) -> Result<NaiveDate, PipelineError> {
        let zone = config::effective_timezone(&self.config)?;
        let today = config::today_in(zone);
        debug!(%zone, %today, "resolved today");
        Ok(today)
    }

    pub fn chart_paths(&self, renderer: &dyn ChartRenderer) -> ChartPaths {
        ChartPaths::new(&self.config.paths.assets_dir, renderer.extension())
    }
}

/// One file a command wrote, or found already up to date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactWrite {
    /// Path as configured, relative to the root.
    pub path: PathBuf,
    pub status: WriteStatus,
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub entries: usize,
    pub warnings: Vec<Warning>,
    pub artifact: ArtifactWrite,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub entries: usize,
    pub warnings: Vec<Warning>,
    pub aggregate: AggregateResult,
    /// In write order.
    pub artifacts: Vec<ArtifactWrite>,
}

/// Read and validate the backing store.
pub fn load_log(ws: &Workspace) -> Result<Validated, PipelineError> {
    let path = ws.path(&ws.config.paths.data);
    let text = read_text(&path)?;
    let validated = validate::validate_str(&text, &ws.config.validation)?;
    info!(
        path = %path.display(),
        entries = validated.entries.len(),
        warnings = validated.warnings.len(),
        "log validated"
    );
    Ok(validated)
}

/// Validate only.
pub fn check(ws: &Workspace) -> Result<Validated, PipelineError> {
    load_log(ws)
}

/// Validate and rewrite the JSON export.
pub fn export(ws: &Workspace) -> Result<ExportReport, PipelineError> {
    let log = load_log(ws)?;
    let bytes = export::export(&log.entries)?;
    let artifact = write(ws, &ws.config.paths.export, &bytes)?;
    Ok(ExportReport {
        entries: log.entries.len(),
        warnings: log.warnings,
        artifact,
    })
}

/// Validate, aggregate, render, splice and export.
pub fn build(
    ws: &Workspace,
    today: NaiveDate,
    renderer: &dyn ChartRenderer,
) -> Result<BuildReport, PipelineError> {
    let log = load_log(ws)?;
    let result = aggregate::aggregate(&log.entries, &ws.config.aggregate_options(today));
    let rendered = render::render(&result, renderer)?;

    let paths = &ws.config.paths;
    let charts = ws.chart_paths(renderer);
    let readme_dir = paths.readme.parent().unwrap_or(Path::new(""));
    let block = render::readme_block(&rendered, &charts, readme_dir);

    let readme_path = ws.path(&paths.readme);
    let readme = read_text(&readme_path)?;
    let spliced = render::splice(&readme, &ws.config.markers, &block).map_err(|source| {
        PipelineError::Format {
            path: readme_path.clone(),
            source,
        }
    })?;
    let export_bytes = export::export(&log.entries)?;

    let artifacts = vec![
        write(ws, &charts.category_chart, &rendered.category_chart)?,
        write(ws, &charts.heatmap, &rendered.heatmap)?,
        write(ws, &paths.export, &export_bytes)?,
        write(ws, &paths.readme, spliced.as_bytes())?,
    ];

    Ok(BuildReport {
        entries: log.entries.len(),
        warnings: log.warnings,
        aggregate: result,
        artifacts,
    })
}

fn read_text(path: &Path) -> Result<String, PipelineError> {
    std::fs::read_to_string(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(ws: &Workspace, relative: &Path, bytes: &[u8]) -> Result<ArtifactWrite, PipelineError> {
    let path = ws.path(relative);
    let status = artifact::write_artifact(&path, bytes)
        .map_err(|source| PipelineError::Write { path, source })?;
    Ok(ArtifactWrite {
        path: relative.to_path_buf(),
        status,
    })
}
