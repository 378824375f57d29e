use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use topicmap::config::Config;
use topicmap::corpus::html::extract_directory;
use topicmap::corpus::loader::load_corpus;
use topicmap::corpus::Corpus;
use topicmap::embeddings::download::download_model;
use topicmap::output::report::{BranchSummary, RunSummary, SUMMARY_FILE};
use topicmap::output::tables::{self, BOW_FILE, SIMILARITY_FILE, TFIDF_FILE, WEIGHT_PRECISION};
use topicmap::output::terminal;
use topicmap::pipeline::analyze::{self, AnalysisOptions, Branch};
use topicmap::pipeline::preprocess;
use topicmap::tokenize::traits::Methodology;
use topicmap::vectorize::top_terms::ScoreFormat;

/// topicmap: find what a corpus of news articles is about.
///
/// Extracts articles from HTML, tokenizes them two ways, and ranks their
/// key terms with bag-of-words and TF-IDF alongside embedding similarity.
#[derive(Parser)]
#[command(name = "topicmap", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract title and body from raw HTML articles into the corpus CSV
    Extract {
        /// Directory of .html files (default: TOPICMAP_RAW_DIR)
        #[arg(long)]
        raw_dir: Option<PathBuf>,

        /// Corpus CSV to write (default: TOPICMAP_CORPUS)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Tokenize the corpus with both methodologies and write token tables
    Preprocess {
        /// Corpus CSV (default: TOPICMAP_CORPUS)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output directory (default: TOPICMAP_OUT_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Run bag-of-words, TF-IDF and embedding similarity over the corpus
    Analyze {
        /// Corpus CSV (default: TOPICMAP_CORPUS)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output directory (default: TOPICMAP_OUT_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Terms kept per document (default: TOPICMAP_TOP_N or 12)
        #[arg(long)]
        top_n: Option<usize>,

        /// Abort on the first failing branch instead of reporting partial results
        #[arg(long)]
        fail_fast: bool,
    },

    /// Download the ONNX sentence embedding model
    DownloadModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topicmap=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Extract { raw_dir, output } => {
            if let Some(dir) = raw_dir {
                config.raw_dir = dir;
            }
            if let Some(path) = output {
                config.corpus_path = path;
            }
            run_extract(&config)?;
        }

        Commands::Preprocess { input, out_dir } => {
            if let Some(path) = input {
                config.corpus_path = path;
            }
            if let Some(dir) = out_dir {
                config.out_dir = dir;
            }
            run_preprocess(&config)?;
        }

        Commands::Analyze {
            input,
            out_dir,
            top_n,
            fail_fast,
        } => {
            if let Some(path) = input {
                config.corpus_path = path;
            }
            if let Some(dir) = out_dir {
                config.out_dir = dir;
            }
            if let Some(n) = top_n {
                config.top_n = n;
            }
            run_analyze(&config, fail_fast).await?;
        }

        Commands::DownloadModel => {
            let model = config.embedding_model()?;

            println!("Downloading ONNX embedding model...");
            println!("  Destination: {}", config.model_dir.display());

            download_model(&config.model_dir, &model).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `topicmap analyze`.");
        }
    }

    Ok(())
}

fn run_extract(config: &Config) -> Result<()> {
    println!("Extracting articles from {}...", config.raw_dir.display());

    let documents = extract_directory(&config.raw_dir)?;
    if documents.is_empty() {
        anyhow::bail!("No .html files found in {}", config.raw_dir.display());
    }

    let file = tables::create_file(&config.corpus_path)?;
    tables::write_corpus(file, &documents)?;

    info!(documents = documents.len(), path = %config.corpus_path.display(), "Corpus written");
    println!(
        "{} {} articles -> {}",
        "Extracted".bold(),
        documents.len(),
        config.corpus_path.display()
    );
    Ok(())
}

fn run_preprocess(config: &Config) -> Result<()> {
    let corpus = load(config)?;
    let models = config.local_models();

    let token_tables = preprocess::run(&corpus, &config.rule_tokenizer(), &models)?;

    for methodology in [Methodology::RuleBased, Methodology::Linguistic] {
        let path = config
            .out_dir
            .join(format!("tokens_{}.csv", methodology.as_str()));
        tables::write_token_table(tables::create_file(&path)?, token_tables.table(methodology))?;
        println!("  {} -> {}", methodology.as_str(), path.display());
    }

    println!();
    terminal::display_token_comparison(&token_tables);
    Ok(())
}

async fn run_analyze(config: &Config, fail_fast: bool) -> Result<()> {
    let corpus = load(config)?;
    let models = config.local_models();

    // An unknown model name is reported by the embedding branch itself
    if matches!(config.embedding_files_present(), Ok(false)) {
        println!(
            "{}",
            "Tip: Run `topicmap download-model` to enable embedding similarity.".dimmed()
        );
    }

    let options = AnalysisOptions {
        top_n: config.top_n,
        fail_fast,
        rule_tokenizer: config.rule_tokenizer(),
    };
    let results = analyze::run(&corpus, &models, &options).await?;

    let mut summary = RunSummary::new(&config.corpus_path, results.documents, config.top_n);

    match &results.bag_of_words {
        Ok(rows) => {
            let path = config.out_dir.join(BOW_FILE);
            tables::write_top_terms(tables::create_file(&path)?, rows, ScoreFormat::Count)?;
            summary.push(BranchSummary::completed(Branch::BagOfWords, rows.len(), path));
        }
        Err(e) => summary.push(BranchSummary::failed(Branch::BagOfWords, e)),
    }

    let weights = ScoreFormat::Fixed(WEIGHT_PRECISION);
    match &results.tfidf {
        Ok(rows) => {
            let path = config.out_dir.join(TFIDF_FILE);
            tables::write_top_terms(tables::create_file(&path)?, rows, weights)?;
            summary.push(BranchSummary::completed(Branch::TfIdf, rows.len(), path));
        }
        Err(e) => summary.push(BranchSummary::failed(Branch::TfIdf, e)),
    }

    match &results.similarity {
        Ok(pairs) => {
            let path = config.out_dir.join(SIMILARITY_FILE);
            tables::write_similarity(tables::create_file(&path)?, pairs)?;
            summary.push(BranchSummary::completed(Branch::Embeddings, pairs.len(), path));
        }
        Err(e) => summary.push(BranchSummary::failed(Branch::Embeddings, e)),
    }

    let summary_path = config.out_dir.join(SUMMARY_FILE);
    summary.write(&summary_path)?;

    terminal::display_run_summary(&summary);
    if let Ok(rows) = &results.bag_of_words {
        terminal::display_top_terms("Bag of words", rows, ScoreFormat::Count);
    }
    if let Ok(rows) = &results.tfidf {
        terminal::display_top_terms("TF-IDF", rows, weights);
    }
    if let Ok(pairs) = &results.similarity {
        terminal::display_similar_pairs(pairs);
    }
    println!("Run summary: {}", summary_path.display());

    let failed = results.failures().len();
    if failed > 0 {
        anyhow::bail!("{failed} of 3 analysis branches failed; see messages above");
    }
    Ok(())
}

fn load(config: &Config) -> Result<Corpus> {
    let corpus = load_corpus(&config.corpus_path, &config.column_names())?;
    println!(
        "Loaded {} documents from {}",
        corpus.len(),
        config.corpus_path.display()
    );
    Ok(corpus)
}
