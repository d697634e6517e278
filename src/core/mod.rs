pub mod classifier;
pub mod extractor;
pub mod item;
pub mod pipeline;
pub mod samples;

pub use classifier::{Classifier, ClassifierRules, MatchReason};
pub use extractor::{ExtractorRules, SongExtractor};
pub use item::{SongRecord, VideoItem};
pub use pipeline::{dedupe_by_url, emit, run_samples, Pipeline, PipelineOutput, SampleReport, Summary};
