//! Ordered chains of filters.
//!
//! A [`Pipeline`] threads one buffer through its stages left to right:
//! stage *k*'s output is the input of stage *k + 1*. Stages run strictly one
//! after another; the parallelism lives inside each filter.
//!
//! ```
//! use edgestag_rust::{Blur, Pipeline, SampleBuffer, Sobel};
//!
//! let image = SampleBuffer::filled(8, 8, 120)?;
//! let edges = Pipeline::new().append(Blur::new()).append(Sobel::new()).run(image)?;
//! assert_eq!(edges.dim(), (8, 8));
//! # Ok::<(), edgestag_rust::Error>(())
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::buffer::SampleBuffer;
use crate::error::{Error, Result};
use crate::filters::{Blur, Filter, FilterKind, Scharr, Sobel};

// ============================================================================
// Pipeline
// ============================================================================

/// Sequence of filters applied in append order.
///
/// Stages are shared (`Arc`), so cloning a pipeline is cheap and a pipeline
/// can be run from several threads at once.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Filter>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `filter` as the last stage.
    pub fn append<F: Filter + 'static>(self, filter: F) -> Self {
        self.append_shared(Arc::new(filter))
    }

    /// Add an already shared filter as the last stage.
    pub fn append_shared(mut self, filter: Arc<dyn Filter>) -> Self {
        self.stages.push(filter);
        self
    }

    pub fn blur(self) -> Self {
        self.append(Blur::new())
    }

    pub fn sobel(self) -> Self {
        self.append(Sobel::new())
    }

    pub fn scharr(self) -> Self {
        self.append(Scharr::new())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run `input` through every stage.
    ///
    /// An empty pipeline returns `input` unchanged.
    ///
    /// # Errors
    /// `Error::Stage` wrapping the first stage failure, with its index and
    /// filter name.
    pub fn run(&self, input: SampleBuffer) -> Result<SampleBuffer> {
        self.stages
            .iter()
            .enumerate()
            .try_fold(input, |buffer, (index, stage)| run_stage(index, stage.as_ref(), &buffer))
    }

    /// Like [`run`](Self::run), also reporting how long each stage took.
    pub fn run_timed(&self, input: SampleBuffer) -> Result<(SampleBuffer, TimingBreakdown)> {
        let start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let mut buffer = input;

        for (index, stage) in self.stages.iter().enumerate() {
            let stage_start = Instant::now();
            buffer = run_stage(index, stage.as_ref(), &buffer)?;
            timings.push(stage.name(), elapsed_ms(stage_start));
        }

        timings.total_ms = elapsed_ms(start);
        Ok((buffer, timings))
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

fn run_stage(index: usize, stage: &dyn Filter, input: &SampleBuffer) -> Result<SampleBuffer> {
    let start = Instant::now();
    let output = stage.apply(input).map_err(|source| Error::Stage {
        index,
        filter: stage.name(),
        source: Box::new(source),
    })?;
    debug!(
        "stage {} ({}) {}x{} in {:.3} ms",
        index,
        stage.name(),
        input.height(),
        input.width(),
        elapsed_ms(start)
    );
    Ok(output)
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1e3
}

// ============================================================================
// Timing
// ============================================================================

/// Wall time of a single stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

/// Per-stage timings of one pipeline run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming {
            label: label.into(),
            elapsed_ms,
        });
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// One stage of a configured pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub kind: FilterKind,
    /// Overrides the filter's default threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i32>,
}

impl From<FilterKind> for StageConfig {
    fn from(kind: FilterKind) -> Self {
        Self {
            kind,
            threshold: None,
        }
    }
}

/// Serialisable description of a pipeline, e.g.
///
/// ```json
/// { "stages": [ { "kind": "blur" }, { "kind": "sobel", "threshold": 30 } ] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub stages: Vec<StageConfig>,
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Parse a comma separated list of filter names, e.g. `"blur,sobel"`.
    /// Empty entries are skipped.
    pub fn parse_list(list: &str) -> Result<Self> {
        let stages = list
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(|name| name.parse::<FilterKind>().map(StageConfig::from))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { stages })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn build(&self) -> Pipeline {
        self.stages.iter().fold(Pipeline::new(), |pipeline, stage| {
            let filter = match stage.threshold {
                Some(threshold) => stage.kind.build_with_threshold(threshold),
                None => stage.kind.build(),
            };
            pipeline.append_shared(filter)
        })
    }
}
