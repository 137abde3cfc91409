use anyhow::Result;
use movie_vectors::embed::{Embed, EmbedderHandle, ModelChoice};
use movie_vectors::features::combine;
use movie_vectors::types::MovieRecord;

fn main() -> Result<()> {
    let choice: ModelChoice = std::env::args()
        .nth(1)
        .as_deref()
        .unwrap_or("all-minilm-l6-v2")
        .parse()?;
    let mut embedder = EmbedderHandle::with_model(choice, None)?;

    let avatar = MovieRecord {
        original_title: "Avatar".to_string(),
        keywords: Some("culture clash future".to_string()),
        cast: Some("Sam Worthington".to_string()),
        genres: Some("Action Adventure".to_string()),
        director: Some("James Cameron".to_string()),
    };
    let spectre = MovieRecord {
        original_title: "Spectre".to_string(),
        keywords: Some("spy thriller".to_string()),
        genres: Some("Action".to_string()),
        ..MovieRecord::default()
    };

    for record in [avatar, spectre] {
        let text = combine(&record);
        let vector = embedder.embed(&text)?;
        let preview: Vec<String> = vector.iter().take(8).map(|v| format!("{v:.4}")).collect();
        println!(
            "{} {:?}: dims {}, [{}]",
            record.original_title,
            text,
            vector.len(),
            preview.join(", ")
        );
    }
    Ok(())
}
