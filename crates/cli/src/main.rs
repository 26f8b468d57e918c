// ABOUTME: CLI for clipping web pages into Markdown notes with clipmark.
// ABOUTME: Clips a URL and writes the note into a vault directory, or prints it for inspection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use clipmark::store::{save_note, FsStore};
use clipmark::{Client, ClipperSettings};
use tracing::warn;

/// Clip a web page into a Markdown note.
#[derive(Parser, Debug)]
#[command(name = "clipmark")]
#[command(about = "Clip a web page into a Markdown note", long_about = None)]
struct Args {
    /// URL to clip.
    url: String,

    /// Vault directory notes are written into.
    #[arg(long, default_value = ".")]
    vault: PathBuf,

    /// Subfolder inside the vault. Defaults to the settings value.
    #[arg(long)]
    folder: Option<String>,

    /// Settings file (JSON). Missing fields take their defaults.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print the finished note to stdout instead of writing it.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Print the structured clip result as JSON instead of a note.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings file {}", path.display()))?;
            serde_json::from_str::<ClipperSettings>(&raw)
                .with_context(|| format!("parsing settings file {}", path.display()))?
        }
        None => ClipperSettings::default(),
    };

    // Template files are optional; a broken folder keeps the defaults.
    let template_dir = args.vault.join(&settings.template_folder);
    if template_dir.is_dir() {
        if let Err(e) = settings.load_templates_from(&template_dir) {
            warn!(dir = %template_dir.display(), error = %e, "template folder skipped");
        }
    }

    let folder = args
        .folder
        .clone()
        .unwrap_or_else(|| settings.clip_folder.clone());
    let client = Client::builder().settings(settings).build();

    if args.json {
        let result = client.clip(&args.url).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let note = client.clip_note(&args.url).await?;
    if args.dry_run {
        print!("{}", note.content);
        return Ok(());
    }

    let store = FsStore::new(&args.vault);
    let path = save_note(&store, &note, &folder)?;
    println!("{}", path);
    Ok(())
}
