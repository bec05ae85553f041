//! Chart renderer trait.
//!
//! The [`ChartRenderer`] trait is the seam between the deterministic series
//! and whatever turns them into image bytes. The production implementation
//! is [`SvgRenderer`](super::svg::SvgRenderer), which writes plain SVG with
//! no font or rasterizer dependency.

use super::series::{CategorySeries, HeatmapSeries};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Chart rendering failed: {0}")]
    RenderFailed(String),
}

/// Trait for chart image renderers.
///
/// Implementations must be deterministic: equal series in, equal bytes out.
pub trait ChartRenderer {
    /// File extension of the produced images, without the dot.
    fn extension(&self) -> &'static str;

    /// Horizontal bar chart of entries per category.
    fn category_chart(&self, series: &CategorySeries) -> Result<Vec<u8>, ChartError>;

    /// Calendar heatmap of entries per day.
    fn heatmap(&self, series: &HeatmapSeries) -> Result<Vec<u8>, ChartError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Mock renderer that records the series it was handed.
    #[derive(Default)]
    pub struct MockRenderer {
        pub category_calls: RefCell<Vec<CategorySeries>>,
        pub heatmap_calls: RefCell<Vec<HeatmapSeries>>,
    }

    impl MockRenderer {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl ChartRenderer for MockRenderer {
        fn extension(&self) -> &'static str {
            "txt"
        }

        fn category_chart(&self, series: &CategorySeries) -> Result<Vec<u8>, ChartError> {
            self.category_calls.borrow_mut().push(series.clone());
            Ok(format!("{} bars", series.bars.len()).into_bytes())
        }

        fn heatmap(&self, series: &HeatmapSeries) -> Result<Vec<u8>, ChartError> {
            self.heatmap_calls.borrow_mut().push(series.clone());
            Ok(series.title.clone().into_bytes())
        }
    }

    /// Renderer that always fails, for error-path tests.
    pub struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn extension(&self) -> &'static str {
            "svg"
        }

        fn category_chart(&self, _series: &CategorySeries) -> Result<Vec<u8>, ChartError> {
            Err(ChartError::RenderFailed("mock failure".into()))
        }

        fn heatmap(&self, _series: &HeatmapSeries) -> Result<Vec<u8>, ChartError> {
            Err(ChartError::RenderFailed("mock failure".into()))
        }
    }

    #[test]
    fn mock_records_calls() {
        let mock = MockRenderer::new();
        let series = CategorySeries {
            title: "t".into(),
            bars: vec![],
        };
        assert_eq!(mock.category_chart(&series).unwrap(), b"0 bars");
        assert_eq!(mock.category_calls.borrow().len(), 1);
    }
}
