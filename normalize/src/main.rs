use std::fs::File;
use std::io::{prelude::*, stdin, stdout, BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use polarity::{Corpus, Document};
use polarity_rules::string_filters::StopwordsFilter;
use polarity_rules::TextNormalizer;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "normalize",
    about = "A program to normalize review text read from stdin, one review per line."
)]
struct Args {
    /// The number of least frequent tokens of the input to remove (0 disables the stage)
    #[arg(long, default_value = "1000")]
    rare_word_limit: usize,

    /// A stopword file with one word per line, replacing the built-in English list
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// The log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut normalizer = TextNormalizer::new().rare_word_limit(args.rare_word_limit);
    if let Some(path) = args.stopwords {
        info!(?path, "loading stopwords");
        let f = BufReader::new(File::open(path)?);
        let mut words = vec![];
        for line in f.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                words.push(word.to_string());
            }
        }
        normalizer = normalizer.stopwords(StopwordsFilter::new(words));
    }

    let mut docs = vec![];
    for line in stdin().lock().lines() {
        docs.push(Document::new(line?));
    }
    let corpus = Corpus::new(docs);

    let start = Instant::now();
    let (normalized, rare_words) = normalizer.normalize_corpus(&corpus);
    let duration = start.elapsed();

    let mut out = BufWriter::new(stdout().lock());
    for doc in &normalized {
        writeln!(out, "{}", doc.text().unwrap_or_default())?;
    }
    out.flush()?;

    info!(
        n_documents = normalized.len(),
        n_rare = rare_words.len(),
        elapsed_sec = duration.as_secs_f64(),
        "finished normalization"
    );

    Ok(())
}
