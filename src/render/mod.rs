//! Rendering: aggregate in, chart bytes and markdown out.
//!
//! Rendering is pure. [`render`] turns an [`AggregateResult`] into the four
//! artifacts a build writes or embeds, and [`readme_block`] assembles the text
//! that goes between the README markers. Nothing here touches the filesystem;
//! the pipeline decides where bytes land.
//!
//! ## Submodules
//!
//! - [`series`]: chart input structs, the deterministic part of every chart
//! - [`backend`]: the [`ChartRenderer`] trait
//! - [`svg`]: the shipped SVG renderer
//! - [`markdown`]: breakdown table and recent list
//! - [`splice`]: marker-delimited README rewrite

pub mod backend;
pub mod markdown;
pub mod series;
pub mod splice;
pub mod svg;

pub use backend::{ChartError, ChartRenderer};
pub use splice::{FormatError, splice};
pub use svg::SvgRenderer;

use crate::aggregate::AggregateResult;
use std::path::{Component, Path, PathBuf};

/// File stem of the category chart.
pub const CATEGORY_CHART_STEM: &str = "category_stylish";
/// File stem of the activity heatmap.
pub const HEATMAP_STEM: &str = "activity_heatmap";

/// Everything one build renders, held in memory until the pipeline writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    pub category_chart: Vec<u8>,
    pub heatmap: Vec<u8>,
    pub breakdown_markdown: String,
    pub recent_markdown: String,
}

/// Where the chart images live, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPaths {
    pub category_chart: PathBuf,
    pub heatmap: PathBuf,
}

impl ChartPaths {
    pub fn new(assets_dir: &Path, extension: &str) -> Self {
        Self {
            category_chart: assets_dir.join(format!("{CATEGORY_CHART_STEM}.{extension}")),
            heatmap: assets_dir.join(format!("{HEATMAP_STEM}.{extension}")),
        }
    }
}

pub fn render(
    result: &AggregateResult,
    renderer: &dyn ChartRenderer,
) -> Result<RenderedArtifacts, ChartError> {
    let category = series::category_series(&result.histogram);
    let heatmap = series::heatmap_series(&result.activity);
    Ok(RenderedArtifacts {
        category_chart: renderer.category_chart(&category)?,
        heatmap: renderer.heatmap(&heatmap)?,
        breakdown_markdown: markdown::breakdown_table(&result.histogram),
        recent_markdown: markdown::recent_list(&result.recent),
    })
}

/// The README content between the markers.
///
/// `readme_dir` is the README's directory relative to the project root; image
/// links are made relative to it so they resolve wherever the README is
/// viewed.
pub fn readme_block(artifacts: &RenderedArtifacts, charts: &ChartPaths, readme_dir: &Path) -> String {
    [
        format!(
            "![By category]({})",
            relative_link(readme_dir, &charts.category_chart)
        ),
        format!(
            "![Activity heatmap]({})",
            relative_link(readme_dir, &charts.heatmap)
        ),
        artifacts.breakdown_markdown.clone(),
        artifacts.recent_markdown.clone(),
    ]
    .join("\n\n")
}

/// Relative URL path from `from_dir` to `target`, both relative to the same
/// root. Always uses `/`.
pub fn relative_link(from_dir: &Path, target: &Path) -> String {
    let from = normal_components(from_dir);
    let to = normal_components(target);
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

fn normal_components(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop();
            }
            _ => {}
        }
    }
    parts
}
