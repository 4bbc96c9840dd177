//! Generate command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::executor::{Executor, GenerateRequest};
use crate::flashcard::Flashcard;
use anyhow::Result;

/// Run the generate command.
pub async fn run_generate(
    files: Vec<String>,
    url: Option<String>,
    max_flashcards: Option<usize>,
    output: Option<String>,
    format: &str,
    settings: Settings,
) -> Result<()> {
    if url.is_none() && files.is_empty() {
        Output::warning("Nothing to do: pass document files and/or a video URL with --url.");
        return Ok(());
    }

    // Pre-flight checks
    let operation = if url.is_some() {
        Operation::GenerateVideo
    } else {
        Operation::Generate
    };
    if let Err(e) = preflight::check(operation) {
        Output::error(&format!("{}", e));
        Output::info("Run 'minne doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let executor = Executor::new(settings)?;
    let request = GenerateRequest {
        youtube_url: url,
        files,
        max_flashcards,
    };

    let spinner = Output::spinner("Generating flashcards...");

    match executor.run(&request).await {
        Ok(flashcards) => {
            spinner.finish_and_clear();

            if flashcards.is_empty() {
                Output::warning("No flashcards were generated.");
                return Ok(());
            }

            write_flashcards(&flashcards, output.as_deref(), format)?;
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate flashcards: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

/// Render flashcards to stdout or a file in the requested format.
fn write_flashcards(flashcards: &[Flashcard], output: Option<&str>, format: &str) -> Result<()> {
    let rendered = match format {
        "text" => None,
        "json" => Some(serde_json::to_string_pretty(flashcards)?),
        "csv" => Some(render_csv(flashcards)?),
        other => {
            anyhow::bail!("Unknown output format: {} (expected text, json, or csv)", other)
        }
    };

    match (output, rendered) {
        (Some(path), Some(content)) => {
            std::fs::write(path, content)?;
            Output::success(&format!("Wrote {} flashcard(s) to {}", flashcards.len(), path));
        }
        (Some(path), None) => {
            // Plain text to a file gets the same numbered layout
            let mut content = String::new();
            for (index, card) in flashcards.iter().enumerate() {
                content.push_str(&format!("{}. {}\n   {}\n", index + 1, card.concept, card.definition));
            }
            std::fs::write(path, content)?;
            Output::success(&format!("Wrote {} flashcard(s) to {}", flashcards.len(), path));
        }
        (None, Some(content)) => {
            println!("{}", content);
        }
        (None, None) => {
            Output::header(&format!("Flashcards ({})", flashcards.len()));
            for (index, card) in flashcards.iter().enumerate() {
                Output::flashcard(index + 1, card);
            }
        }
    }

    Ok(())
}

fn render_csv(flashcards: &[Flashcard]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for card in flashcards {
        writer.serialize(card)?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cards() -> Vec<Flashcard> {
        vec![
            Flashcard {
                concept: "Osmosis".to_string(),
                definition: "Water crossing a membrane.".to_string(),
            },
            Flashcard {
                concept: "Mitosis".to_string(),
                definition: "Cell division producing identical cells.".to_string(),
            },
        ]
    }

    #[test]
    fn test_render_csv_has_header_and_rows() {
        let csv = render_csv(&sample_cards()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "concept,definition");
        assert!(lines[1].starts_with("Osmosis,"));
    }

    #[test]
    fn test_write_flashcards_rejects_unknown_format() {
        let err = write_flashcards(&sample_cards(), None, "yaml").unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }
}
