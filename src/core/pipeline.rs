use crate::core::{samples, Classifier, SongExtractor, SongRecord, VideoItem};
use crate::error::ExtractError;
use crate::output::RecordSink;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub music: usize,
    pub unique: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutput {
    pub records: Vec<SongRecord>,
    pub summary: Summary,
}

/// Keeps the first record for each distinct URL string, in input order.
pub fn dedupe_by_url(records: Vec<SongRecord>) -> Vec<SongRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.url.clone()))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub classifier: Classifier,
    pub extractor: SongExtractor,
}

impl Pipeline {
    pub fn new(classifier: Classifier, extractor: SongExtractor) -> Self {
        Self {
            classifier,
            extractor,
        }
    }

    /// Classifies and extracts in fetch order, then dedupes.
    ///
    /// An accepted item without any identifier aborts the run.
    pub fn run(&self, items: &[VideoItem]) -> Result<PipelineOutput, ExtractError> {
        let mut music = Vec::new();

        for item in items {
            let Some(reason) = self.classifier.match_reason(item) else {
                continue;
            };
            debug!("Accepted {:?} ({:?})", item.title, reason);
            music.push(self.extractor.extract(item)?);
        }

        let music_count = music.len();
        let records = dedupe_by_url(music);

        Ok(PipelineOutput {
            summary: Summary {
                total: items.len(),
                music: music_count,
                unique: records.len(),
            },
            records,
        })
    }
}

/// Hands the run result to the sink, telling it explicitly when nothing was found.
pub fn emit(output: &PipelineOutput, sink: &mut dyn RecordSink) -> anyhow::Result<()> {
    if output.records.is_empty() {
        sink.no_content(&output.summary)
    } else {
        sink.write(&output.records, &output.summary)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleReport {
    pub processed: usize,
    pub records: Vec<SongRecord>,
}

/// Runs the classifier and extractor over the built-in samples; no network needed.
pub fn run_samples(pipeline: &Pipeline) -> Result<SampleReport, ExtractError> {
    let items = samples::sample_items();
    let mut records = Vec::new();

    for item in &items {
        if pipeline.classifier.classify(item) {
            records.push(pipeline.extractor.extract(item)?);
        }
    }

    Ok(SampleReport {
        processed: items.len(),
        records,
    })
}
