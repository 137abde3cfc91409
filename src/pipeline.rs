use std::path::Path;

use tracing::info;

use crate::embed::Embed;
use crate::error::{Error, Result};
use crate::features::combine;
use crate::loader::load_records;
use crate::progress::Progress;
use crate::types::{MovieRecord, VectorizedMovie};
use crate::writer::write_vectors;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Texts per model call. 1 embeds every record on its own.
    pub batch_size: usize,
    pub progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            batch_size: 1,
            progress: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub dimensions: usize,
    pub model: String,
}

/// Loads `input`, embeds every record and writes `output`. Nothing is
/// written unless every record was embedded.
pub fn run<E: Embed + ?Sized>(
    input: &Path,
    output: &Path,
    embedder: &mut E,
    options: RunOptions,
) -> Result<RunSummary> {
    let records = load_records(input)?;
    let progress = Progress::new(records.len() as u64, options.progress);
    progress.set_message(embedder.model_name().to_string());
    let vectorized = vectorize(&records, embedder, options.batch_size, &progress);
    progress.finish();
    let vectorized = vectorized?;

    write_vectors(output, &vectorized)?;
    Ok(RunSummary {
        rows: vectorized.len(),
        dimensions: embedder.dimensions(),
        model: embedder.model_name().to_string(),
    })
}

/// Derives the feature text and vector of every record, in input order.
pub fn vectorize<E: Embed + ?Sized>(
    records: &[MovieRecord],
    embedder: &mut E,
    batch_size: usize,
    progress: &Progress,
) -> Result<Vec<VectorizedMovie>> {
    let dims = embedder.dimensions();
    let batch_size = batch_size.max(1);
    let mut out = Vec::with_capacity(records.len());

    for (chunk_idx, chunk) in records.chunks(batch_size).enumerate() {
        let first_row = chunk_idx * batch_size;
        let texts: Vec<String> = chunk.iter().map(combine).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

        let vectors = if refs.len() == 1 {
            vec![embedder.embed(refs[0]).map_err(|e| at_row(e, first_row, 1))?]
        } else {
            embedder
                .embed_batch(&refs)
                .map_err(|e| at_row(e, first_row, refs.len()))?
        };
        if vectors.len() != chunk.len() {
            return Err(Error::Embed {
                row: first_row,
                message: format!(
                    "model returned {} embeddings for {} inputs",
                    vectors.len(),
                    chunk.len()
                ),
            });
        }

        for (offset, ((record, feature_text), vector)) in
            chunk.iter().zip(texts).zip(vectors).enumerate()
        {
            if vector.len() != dims {
                return Err(Error::DimensionMismatch {
                    row: first_row + offset,
                    expected: dims,
                    actual: vector.len(),
                });
            }
            out.push(VectorizedMovie {
                original_title: record.original_title.clone(),
                feature_text,
                vector,
            });
        }
        progress.add_embedded(chunk.len() as u64);
    }

    info!(rows = out.len(), dims, "embedded records");
    Ok(out)
}

/// Pins a model error to `row`. For a batch, `row` is the first row of
/// the batch and the message says how many rows it covered.
fn at_row(err: Error, row: usize, batch: usize) -> Error {
    match err {
        Error::Embed { message, .. } if batch > 1 => Error::Embed {
            row,
            message: format!("{message} (in batch of rows {row}..={})", row + batch - 1),
        },
        Error::Embed { message, .. } => Error::Embed { row, message },
        Error::DimensionMismatch {
            expected, actual, ..
        } => Error::DimensionMismatch {
            row,
            expected,
            actual,
        },
        other => other,
    }
}
