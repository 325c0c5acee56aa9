//! `smartdeck` builds Anki decks from the words a book uses that you do
//! not know yet.
//!
//! # Usage
//!
//! ```text
//! smartdeck sync add apkg ~/decks/german.apkg --lang de
//! smartdeck diff novel.epub --lang de --pages 1-20
//! smartdeck build novel.epub --lang de --top 50 -o novel.apkg
//! smartdeck sync list
//! ```

mod commands;
mod settings;

use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use settings::Settings;
use smartdeck_core::source::kind;
use smartdeck_vault::SqliteVault;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "smartdeck", version, about = "Known-word vault and Anki deck builder")]
struct Cli {
  /// Path to a TOML config file (default: <config dir>/smartdeck/config.toml).
  #[arg(short, long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Vault database to use instead of the configured one.
  #[arg(long, global = true, value_name = "PATH")]
  vault: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show lexical coverage, difficulty tier and top unknown lemmas for a book.
  Diff {
    #[command(flatten)]
    book: BookArgs,

    /// Number of unknown lemmas to list.
    #[arg(short, long)]
    top: Option<usize>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Build an Anki deck from the most frequent unknown lemmas in a book.
  Build {
    #[command(flatten)]
    book: BookArgs,

    /// Number of cards to create.
    #[arg(short, long)]
    top: Option<usize>,

    /// Output package.
    #[arg(short, long, default_value = "deck.apkg")]
    output: PathBuf,
  },

  /// Synchronise Anki decks with the known-word vault.
  #[command(subcommand)]
  Sync(SyncCommand),
}

#[derive(Subcommand, Debug)]
enum SyncCommand {
  /// Add the words of an `.apkg` file or a live Anki deck to the vault.
  Add {
    kind:  DeckKind,
    /// Path to the `.apkg`, or the live deck's name.
    ident: String,

    #[arg(short, long)]
    lang: Option<String>,

    /// Read only the first N notes (apkg only).
    #[arg(short, long)]
    top: Option<usize>,
  },

  /// Remove a source and every word no other source still knows.
  Remove { kind: SourceKind, ident: String },

  /// List the vault's sources with their word counts.
  List,
}

/// Where the pages of a book come from.
#[derive(Args, Debug)]
struct BookArgs {
  /// EPUB, PDF or plain-text file.
  source: PathBuf,

  /// Pages to read, e.g. `1-3,5` (1-based).
  #[arg(short, long)]
  pages: Option<String>,

  /// Re-split the selected text every N words.
  #[arg(short = 'v', long, value_name = "N")]
  virtual_pages: Option<NonZeroUsize>,

  #[arg(short, long)]
  lang: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DeckKind {
  Apkg,
  Live,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SourceKind {
  Apkg,
  Live,
  Book,
}

impl SourceKind {
  fn as_str(self) -> &'static str {
    match self {
      Self::Apkg => kind::APKG,
      Self::Live => kind::LIVE,
      Self::Book => kind::BOOK,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(cli.config.as_deref())?;

  let vault_path = match cli.vault {
    Some(path) => smartdeck_vault::expand_tilde(path),
    None => {
      smartdeck_vault::resolve_path(settings.vault.clone()).context("cannot locate the vault")?
    }
  };
  tracing::debug!(path = %vault_path.display(), "opening vault");
  let vault = SqliteVault::open(&vault_path)
    .await
    .with_context(|| format!("failed to open vault at {}", vault_path.display()))?;

  match cli.command {
    Command::Diff { book, top, json } => {
      let top = top.unwrap_or(settings.diff_top);
      commands::diff(&vault, &book.resolve(&settings), top, json).await
    }
    Command::Build { book, top, output } => {
      let top = top.unwrap_or(settings.build_top);
      commands::build(&vault, &book.resolve(&settings), top, &output).await
    }
    Command::Sync(SyncCommand::Add { kind, ident, lang, top }) => {
      let lang = lang.unwrap_or_else(|| settings.lang.clone());
      match kind {
        DeckKind::Apkg => commands::sync_add_apkg(&vault, &ident, &lang, top).await,
        DeckKind::Live => {
          if top.is_some() {
            tracing::warn!("--top only applies to apkg sources; ignoring it");
          }
          commands::sync_add_live(&vault, &settings.anki_connect_url, &ident, &lang).await
        }
      }
    }
    Command::Sync(SyncCommand::Remove { kind, ident }) => {
      commands::sync_remove(&vault, kind.as_str(), &ident).await
    }
    Command::Sync(SyncCommand::List) => commands::sync_list(&vault).await,
  }
}

impl BookArgs {
  fn resolve(self, settings: &Settings) -> commands::Book {
    commands::Book {
      path:          self.source,
      pages:         self.pages,
      virtual_pages: self.virtual_pages,
      lang:          self.lang.unwrap_or_else(|| settings.lang.clone()),
    }
  }
}
