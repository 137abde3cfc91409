use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::types::{OUTPUT_HEADER, VectorizedMovie};

/// Writes `original_title;vector_descriptions` rows, replacing any file
/// already at `path`. The file only appears once every row is written.
pub fn write_vectors(path: &Path, rows: &[VectorizedMovie]) -> Result<()> {
    let write_err = |source: io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let tmp_path = tmp_path(path);
    let written = write_tmp(&tmp_path, rows).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(source));
    }

    info!(rows = rows.len(), path = %path.display(), "wrote vectors");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_tmp(tmp_path: &Path, rows: &[VectorizedMovie]) -> io::Result<()> {
    let file = File::create(tmp_path)?;
    let mut out = BufWriter::new(file);
    write_rows(&mut out, rows)?;
    let file = out.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

pub(crate) fn write_rows<W: Write>(out: W, rows: &[VectorizedMovie]) -> io::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(out);
    writer.write_record(OUTPUT_HEADER)?;
    for row in rows {
        let vector = format_vector(&row.vector);
        writer.write_record([row.original_title.as_str(), vector.as_str()])?;
    }
    writer.flush()
}

/// Renders a vector as a JSON array, e.g. `[0.25,-1.0]`.
pub fn format_vector(vector: &[f32]) -> String {
    // serde_json would turn NaN and infinities into null
    if vector.iter().all(|v| v.is_finite()) {
        if let Ok(json) = serde_json::to_string(vector) {
            return json;
        }
    }
    let parts: Vec<String> = vector.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(","))
}
