//! `rcat`: command-line front end for the incident document triage store.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use rca_triage::engine::ContentReader;
use rca_triage::{
    DateExtractor, Document, KeywordRanker, NoticeLevel, Priority, PriorityFilter, SourceFile,
    TriageApp, TriageConfig,
};

#[derive(Parser)]
#[command(name = "rcat", version, about = "Triage incident post-mortem documents")]
struct Cli {
    /// Store file (overrides the config file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file (defaults to <config dir>/rca-triage/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload .txt/.docx documents.
    Add {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Priority for every file; otherwise detected from each filename.
        #[arg(short, long)]
        priority: Option<Priority>,
        /// Accept detected priorities without asking.
        #[arg(short, long)]
        yes: bool,
    },
    /// List stored documents.
    List {
        /// all, P1, P2 or P3.
        #[arg(short, long, default_value = "all")]
        priority: PriorityFilter,
        /// Only documents carrying this keyword.
        #[arg(short, long, default_value = "")]
        keyword: String,
        /// Sort by name.
        #[arg(short, long)]
        sort: Option<SortArg>,
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print a document's content.
    Show { id: u64 },
    /// Delete a document.
    Delete {
        id: u64,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Rank keywords for a file without storing it.
    Keywords { file: PathBuf },
    /// Extract start/end dates from a file without storing it.
    Dates { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Asc,
    Desc,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = TriageConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config = config.with_db_path(db);
    }

    match cli.command {
        Command::Add {
            files,
            priority,
            yes,
        } => cmd_add(config, files, priority, yes),
        Command::List {
            priority,
            keyword,
            sort,
            json,
        } => cmd_list(config, priority, &keyword, sort, json),
        Command::Show { id } => cmd_show(config, id),
        Command::Delete { id, yes } => cmd_delete(config, id, yes),
        Command::Keywords { file } => cmd_keywords(&config, &file),
        Command::Dates { file } => cmd_dates(&file),
    }
}

fn open(config: TriageConfig) -> Result<TriageApp> {
    let mut app = TriageApp::start(config);
    if !app.is_ready() {
        let reason = app
            .take_notices()
            .into_iter()
            .map(|n| n.message)
            .collect::<Vec<_>>()
            .join("; ");
        bail!("{reason}");
    }
    app.take_notices();
    Ok(app)
}

fn cmd_add(
    config: TriageConfig,
    paths: Vec<PathBuf>,
    priority: Option<Priority>,
    yes: bool,
) -> Result<()> {
    let files = paths
        .iter()
        .map(|p| SourceFile::from_path(p).with_context(|| format!("reading {}", p.display())))
        .collect::<Result<Vec<_>>>()?;

    let mut app = open(config)?;
    let count = app.on_files_selected(files).len();
    if let Some(priority) = priority {
        for index in 0..count {
            app.set_staged_priority(index, priority);
        }
    }

    println!("{:<40} PRIORITY", "FILE");
    for entry in app.staged() {
        let shown = entry
            .priority
            .map(|p| p.label().to_string())
            .unwrap_or_else(|| "(select priority)".to_string());
        println!("{:<40} {}", entry.file.name, shown);
    }

    let missing = app.staged().iter().filter(|e| e.needs_review()).count();
    if missing > 0 {
        app.cancel_upload();
        bail!(
            "{missing} file(s) have no detectable priority; pass --priority P1|P2|P3"
        );
    }

    if priority.is_none() && !yes && !confirm("Upload with these priorities?")? {
        app.cancel_upload();
        println!("Upload cancelled.");
        return Ok(());
    }

    let report = app.confirm_upload()?;
    print_notices(&mut app);
    for failure in &report.failures {
        eprintln!("  {}: {}", failure.file_name, failure.reason);
    }
    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_list(
    config: TriageConfig,
    priority: PriorityFilter,
    keyword: &str,
    sort: Option<SortArg>,
    json: bool,
) -> Result<()> {
    let mut app = open(config)?;
    if let Some(sort) = sort {
        app.sort_by_name(matches!(sort, SortArg::Asc));
    }
    app.on_filter_changed(priority, keyword);
    let docs = app.view();

    if json {
        println!("{}", serde_json::to_string_pretty(&docs)?);
        return Ok(());
    }

    if docs.is_empty() {
        println!("No matching documents found.");
        return Ok(());
    }
    println!(
        "{:>5}  {:<32} {:<4} {:<10} {:<10} KEYWORDS",
        "ID", "NAME", "PRI", "START", "END"
    );
    for doc in docs {
        print_row(doc);
    }
    Ok(())
}

fn print_row(doc: &Document) {
    let keywords = if doc.keywords.is_empty() {
        "N/A".to_string()
    } else {
        doc.keywords.join(", ")
    };
    println!(
        "{:>5}  {:<32} {:<4} {:<10} {:<10} {}",
        doc.id, doc.name, doc.priority, doc.start_date, doc.end_date, keywords
    );
}

fn cmd_show(config: TriageConfig, id: u64) -> Result<()> {
    let app = open(config)?;
    let doc = app
        .document(id)
        .ok_or(rca_triage::TriageError::NotFound(id))?;
    println!("# {} ({})", doc.name, doc.priority);
    println!();
    println!("{}", doc.content);
    Ok(())
}

fn cmd_delete(config: TriageConfig, id: u64, yes: bool) -> Result<()> {
    let mut app = open(config)?;
    let confirmation = app.on_delete_requested(id);
    if !yes && !confirm(&confirmation.prompt())? {
        println!("Delete cancelled.");
        return Ok(());
    }
    let result = app.confirm_delete(confirmation);
    print_notices(&mut app);
    result?;
    Ok(())
}

fn cmd_keywords(config: &TriageConfig, path: &Path) -> Result<()> {
    let text = read_text(path)?;
    let ranker = KeywordRanker::with_limit(config.max_keywords);
    for keyword in ranker.rank(&text) {
        println!("{:<24} {}", keyword.term, keyword.count);
    }
    Ok(())
}

fn cmd_dates(path: &Path) -> Result<()> {
    let text = read_text(path)?;
    let dates = DateExtractor::new().extract(&text);
    println!("Start Date: {}", dates.start_date);
    println!("End Date:   {}", dates.end_date);
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    let file = SourceFile::from_path(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(ContentReader::new().read(&file)?)
}

fn print_notices(app: &mut TriageApp) {
    for notice in app.take_notices() {
        match notice.level {
            NoticeLevel::Error => eprintln!("{}", notice.message),
            _ => println!("{}", notice.message),
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}
