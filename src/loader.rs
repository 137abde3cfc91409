use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::{MovieRecord, TEXT_COLUMNS, TITLE_COLUMN};

/// Reads a comma-delimited movie table, preserving file order.
pub fn load_records(path: &Path) -> Result<Vec<MovieRecord>> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => Error::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let records = read_records(file, path)?;
    info!(rows = records.len(), path = %path.display(), "loaded input");
    Ok(records)
}

pub(crate) fn read_records<R: Read>(reader: R, path: &Path) -> Result<Vec<MovieRecord>> {
    let parse_err = |err: csv::Error| Error::Parse {
        path: path.to_path_buf(),
        line: err.position().map(|p| p.line()),
        message: err.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(parse_err)?.clone();
    let find = |name: &str| headers.iter().position(|h| h == name);

    let title_idx = find(TITLE_COLUMN).ok_or_else(|| Error::MissingColumn {
        path: path.to_path_buf(),
        column: TITLE_COLUMN,
    })?;
    let text_idx: Vec<Option<usize>> = TEXT_COLUMNS.iter().map(|&name| find(name)).collect();
    for (name, idx) in TEXT_COLUMNS.iter().zip(&text_idx) {
        if idx.is_none() {
            warn!(column = *name, "column missing from input, treating as empty");
        }
    }

    let mut out = Vec::new();
    for result in reader.records() {
        let row = result.map_err(parse_err)?;
        let title = row.get(title_idx).unwrap_or("");
        if title.is_empty() {
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            warn!(line, "row has no original_title, passing it through blank");
        }
        let mut record = MovieRecord::new(title);
        for (slot, idx) in text_idx.iter().enumerate() {
            let value = idx
                .and_then(|i| row.get(i))
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            record.set_text_field(slot, value);
        }
        out.push(record);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(data: &str) -> Result<Vec<MovieRecord>> {
        read_records(data.as_bytes(), Path::new("movies.csv"))
    }

    #[test]
    fn reads_rows_in_file_order_and_ignores_extra_columns() {
        let data = "index,budget,genres,keywords,original_title,cast,director\n\
                    0,237000000,Action Adventure,culture clash future,Avatar,Sam Worthington,James Cameron\n\
                    1,300000000,Adventure Fantasy,ocean drug abuse,Pirates of the Caribbean: At World's End,Johnny Depp,Gore Verbinski\n";
        let records = parse(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].original_title, "Avatar");
        assert_eq!(records[0].keywords.as_deref(), Some("culture clash future"));
        assert_eq!(records[0].cast.as_deref(), Some("Sam Worthington"));
        assert_eq!(records[0].genres.as_deref(), Some("Action Adventure"));
        assert_eq!(records[0].director.as_deref(), Some("James Cameron"));
        assert_eq!(
            records[1].original_title,
            "Pirates of the Caribbean: At World's End"
        );
    }

    #[test]
    fn empty_cells_are_missing() {
        let data = "original_title,keywords,cast,genres,director\nSpectre,spy thriller,,Action,\n";
        let records = parse(data).unwrap();
        assert_eq!(records[0].keywords.as_deref(), Some("spy thriller"));
        assert_eq!(records[0].cast, None);
        assert_eq!(records[0].genres.as_deref(), Some("Action"));
        assert_eq!(records[0].director, None);
    }

    #[test]
    fn na_markers_are_kept_as_text() {
        let data = "original_title,keywords,cast,genres,director\nNone,NA,null,NaN,N/A\n";
        let records = parse(data).unwrap();
        assert_eq!(records[0].original_title, "None");
        assert_eq!(records[0].keywords.as_deref(), Some("NA"));
        assert_eq!(records[0].director.as_deref(), Some("N/A"));
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let data = "original_title,keywords,cast,genres,director\n\"Crouching Tiger, Hidden Dragon\",\"martial arts, sword\",Chow Yun-fat,Drama,Ang Lee\n";
        let records = parse(data).unwrap();
        assert_eq!(records[0].original_title, "Crouching Tiger, Hidden Dragon");
        assert_eq!(records[0].keywords.as_deref(), Some("martial arts, sword"));
    }

    #[test]
    fn absent_text_columns_are_empty_for_every_row() {
        let data = "original_title,keywords,genres\nA,k1,g1\nB,k2,g2\n";
        let records = parse(data).unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.cast, None);
            assert_eq!(record.director, None);
        }
        assert_eq!(records[1].genres.as_deref(), Some("g2"));
    }

    #[test]
    fn short_rows_treat_trailing_cells_as_missing() {
        let data = "original_title,keywords,cast,genres,director\nShort,kw\n";
        let records = parse(data).unwrap();
        assert_eq!(records[0].keywords.as_deref(), Some("kw"));
        assert_eq!(records[0].cast, None);
        assert_eq!(records[0].director, None);
    }

    #[test]
    fn blank_title_passes_through() {
        let data = "original_title,keywords,cast,genres,director\n,kw,c,g,d\n";
        let records = parse(data).unwrap();
        assert_eq!(records[0].original_title, "");
    }

    #[test]
    fn missing_title_column_is_an_error() {
        let data = "title,keywords,cast,genres,director\nAvatar,a,b,c,d\n";
        let err = parse(data).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingColumn {
                column: TITLE_COLUMN,
                ..
            }
        ));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let mut data = b"original_title,keywords,cast,genres,director\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b',', b'a', b'\n']);
        let err = read_records(data.as_slice(), Path::new("bad.csv")).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, Error::InputNotFound { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        fs::write(
            &path,
            "original_title,keywords,cast,genres,director\nAvatar,a,b,c,d\n",
        )
        .unwrap();
        let records = load_records(&path).unwrap();
        assert_eq!(records, vec![MovieRecord {
            original_title: "Avatar".to_string(),
            keywords: Some("a".to_string()),
            cast: Some("b".to_string()),
            genres: Some("c".to_string()),
            director: Some("d".to_string()),
        }]);
    }
}
