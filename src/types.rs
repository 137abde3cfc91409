pub const TITLE_COLUMN: &str = "original_title";

/// Columns concatenated into the feature text, in concatenation order.
pub const TEXT_COLUMNS: [&str; 4] = ["keywords", "cast", "genres", "director"];

pub const OUTPUT_HEADER: [&str; 2] = [TITLE_COLUMN, "vector_descriptions"];

/// One input row. Text attributes are `None` when the cell is empty or the
/// column is absent from the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieRecord {
    pub original_title: String,
    pub keywords: Option<String>,
    pub cast: Option<String>,
    pub genres: Option<String>,
    pub director: Option<String>,
}

impl MovieRecord {
    pub fn new(original_title: impl Into<String>) -> Self {
        Self {
            original_title: original_title.into(),
            ..Self::default()
        }
    }

    /// Text attributes in `TEXT_COLUMNS` order.
    pub fn text_fields(&self) -> [Option<&str>; 4] {
        [
            self.keywords.as_deref(),
            self.cast.as_deref(),
            self.genres.as_deref(),
            self.director.as_deref(),
        ]
    }

    pub(crate) fn set_text_field(&mut self, idx: usize, value: Option<String>) {
        match idx {
            0 => self.keywords = value,
            1 => self.cast = value,
            2 => self.genres = value,
            3 => self.director = value,
            _ => {}
        }
    }
}

/// A record together with everything derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizedMovie {
    pub original_title: String,
    pub feature_text: String,
    pub vector: Vec<f32>,
}
