//! Command-line frontend.
//!
//! Single-utterance mode prints one JSON object; batch mode reads JSONL
//! (`{"text": ..., "base_time"?: ...}` per line) and appends `results`
//! and `query_tag` to each input object. Malformed lines produce an
//! `{"error": ...}` record and processing continues.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Deserialize;
use serde_json::json;

use timetag::{Extractor, ExtractorConfig, Language};

#[derive(Parser)]
#[command(name = "timetag", version, about = "Recognize time expressions in text")]
struct Cli {
    /// Recognition language.
    #[arg(long)]
    language: Language,

    /// One utterance to process.
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Batch input: one JSON object per line with fields text, base_time.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Reference instant (ISO-8601 UTC); defaults to the current time.
    #[arg(long)]
    base_time: Option<String>,

    /// Directory for the compiled grammar artifact.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Recompile the grammar even when a cached artifact matches.
    #[arg(long)]
    overwrite_cache: bool,
}

#[derive(Deserialize)]
struct BatchLine {
    text: String,
    #[serde(default)]
    base_time: Option<String>,
}

fn run(cli: Cli) -> Result<(), String> {
    let extractor = Extractor::new(ExtractorConfig {
        language: cli.language,
        cache_dir: cli.cache_dir,
        overwrite_cache: cli.overwrite_cache,
    })
    .map_err(|e| format!("failed to load grammar: {e}"))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(text) = &cli.text {
        let extraction = extractor
            .extract_str(text, cli.base_time.as_deref())
            .map_err(|e| e.to_string())?;
        serde_json::to_writer(&mut out, &extraction).map_err(|e| e.to_string())?;
        writeln!(out).map_err(|e| e.to_string())?;
        return Ok(());
    }

    let path = cli
        .file
        .as_ref()
        .ok_or_else(|| "either --text or --file is required".to_string())?;
    let file = File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;

    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| format!("read error at line {}: {e}", lineno + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = match serde_json::from_str::<BatchLine>(&line) {
            Ok(r) => r,
            Err(e) => {
                let err = json!({"error": format!("line {}: {e}", lineno + 1)});
                writeln!(out, "{err}").map_err(|e| e.to_string())?;
                continue;
            }
        };
        let base_time = record.base_time.as_deref().or(cli.base_time.as_deref());
        let output = match extractor.extract_str(&record.text, base_time) {
            Ok(extraction) => json!({
                "text": record.text,
                "base_time": base_time,
                "results": extraction.results,
                "query_tag": extraction.query_tag,
            }),
            Err(e) => json!({"text": record.text, "error": e.to_string()}),
        };
        writeln!(out, "{output}").map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("timetag: {e}");
            ExitCode::FAILURE
        }
    }
}
