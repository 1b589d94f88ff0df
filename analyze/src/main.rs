mod pipeline;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use polarity::errors::PolarityError;
use polarity::{
    Corpus, DatasetColumns, FoldStrategy, ForestConfig, Lexicon, LogisticRegression,
    SentimentIntensityAnalyzer, SolverType, TfIdfConfig, Weighting,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use pipeline::{CvPartition, PipelineConfig, PipelineOutput, Stage, StageResult};

#[derive(Parser, Debug)]
#[command(
    name = "analyze",
    about = "A program to label product reviews by sentiment and evaluate classifiers on them."
)]
struct Args {
    /// A review table in CSV format with a header row
    #[arg(long)]
    dataset: PathBuf,

    /// The column holding review text
    #[arg(long, default_value = "Review")]
    text_column: String,

    /// The column holding star ratings
    #[arg(long, default_value = "Star")]
    rating_column: String,

    /// A sentiment lexicon in TSV format (token and valence), replacing the built-in one
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// The number of least frequent tokens to remove (0 disables the stage)
    #[arg(long, default_value = "1000")]
    rare_word_limit: usize,

    /// The first review to label
    #[arg(long, default_value = "0")]
    label_start: usize,

    /// The number of reviews to label (all remaining reviews if omitted)
    #[arg(long)]
    label_limit: Option<usize>,

    /// The fraction of labeled reviews held out for testing
    #[arg(long, default_value = "0.25")]
    test_size: f64,

    /// The seed of the train/test split
    #[arg(long, default_value = "42")]
    seed: u64,

    /// The feature weighting. {counts, tfidf}
    #[arg(long, default_value = "tfidf")]
    weighting: Weighting,

    /// Do not smooth inverse document frequencies.
    #[arg(long)]
    no_smooth_idf: bool,

    /// Use 1 + ln(tf) instead of raw term counts.
    #[arg(long)]
    sublinear_tf: bool,

    /// Do not scale feature vectors to unit length.
    #[arg(long)]
    no_norm: bool,

    /// The epsilon stopping criterion for logistic regression
    #[arg(long, default_value = "0.01")]
    eps: f64,

    /// The cost hyperparameter for logistic regression
    #[arg(long, default_value = "1.0")]
    cost: f64,

    /// The solver. {0, 1, 2, 3, 5, 6, 7} (see LIBLINEAR documentation for more details)
    #[arg(long, default_value = "0")]
    solver: SolverType,

    /// The number of trees in the random forest
    #[arg(long, default_value = "100")]
    n_trees: usize,

    /// The maximum depth of each tree (unlimited if omitted)
    #[arg(long)]
    max_depth: Option<usize>,

    /// The number of features examined per split (square root of the feature count if omitted)
    #[arg(long)]
    max_features: Option<usize>,

    /// The number of folds for cross-validating logistic regression
    #[arg(long, default_value = "2")]
    logistic_folds: usize,

    /// The number of folds for cross-validating the random forest
    #[arg(long, default_value = "5")]
    forest_folds: usize,

    /// The samples to cross-validate on. {train, test, all}
    #[arg(long, default_value = "test")]
    cv_partition: CvPartition,

    /// The fold assignment. {contiguous, stratified}
    #[arg(long, default_value = "stratified")]
    fold_strategy: FoldStrategy,

    /// Fit cross-validation folds one after another.
    #[arg(long)]
    no_parallel: bool,

    /// The feature weighting of the sample prediction. {counts, tfidf}
    #[arg(long, default_value = "counts")]
    sample_weighting: Weighting,

    /// Do not normalize the sample review before predicting its label.
    #[arg(long)]
    no_sample_norm: bool,

    /// The seed used to pick the sample review
    #[arg(long, default_value = "42")]
    sample_seed: u64,

    /// Terms counted more often than this value are reported
    #[arg(long, default_value = "500")]
    term_threshold: usize,

    /// A CSV file to write the labeled reviews to
    #[arg(long)]
    output: Option<PathBuf>,

    /// The log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            rare_word_limit: self.rare_word_limit,
            label_start: self.label_start,
            label_limit: self.label_limit,
            test_size: self.test_size,
            seed: self.seed,
            weighting: self.weighting,
            tfidf: TfIdfConfig {
                smooth_idf: !self.no_smooth_idf,
                sublinear_tf: self.sublinear_tf,
                normalize: !self.no_norm,
            },
            logistic: LogisticRegression::new()
                .solver(self.solver)
                .cost(self.cost)
                .epsilon(self.eps),
            forest: ForestConfig {
                n_trees: self.n_trees,
                max_depth: self.max_depth,
                max_features: self.max_features,
                seed: self.seed,
                ..ForestConfig::default()
            },
            logistic_folds: self.logistic_folds,
            forest_folds: self.forest_folds,
            cv_partition: self.cv_partition,
            fold_strategy: self.fold_strategy,
            cv_parallel: !self.no_parallel,
            sample_weighting: self.sample_weighting,
            normalize_sample: !self.no_sample_norm,
            sample_seed: self.sample_seed,
            term_threshold: self.term_threshold,
        }
    }
}

#[derive(Serialize)]
struct LabeledReview<'a> {
    #[serde(rename = "Review")]
    review: Option<&'a str>,
    #[serde(rename = "Normalized")]
    normalized: Option<&'a str>,
    #[serde(rename = "Star")]
    star: Option<f64>,
    #[serde(rename = "Compound")]
    compound: Option<f64>,
    #[serde(rename = "Sentiment_Label")]
    label: Option<&'static str>,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_corpus(path: &Path, columns: &DatasetColumns) -> Result<Corpus, PolarityError> {
    let f = BufReader::new(File::open(path)?);
    Corpus::read_csv(f, columns)
}

fn load_lexicon(path: &Path) -> Result<Lexicon, PolarityError> {
    let f = BufReader::new(File::open(path)?);
    Lexicon::read(f)
}

fn write_labeled(path: &Path, corpus: &Corpus) -> Result<(), PolarityError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for doc in corpus {
        wtr.serialize(LabeledReview {
            review: doc.raw_text(),
            normalized: doc.normalized_text(),
            star: doc.rating(),
            compound: doc.polarity(),
            label: doc.label().map(|label| label.as_str()),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_output(output: &PipelineOutput, config: &PipelineConfig) {
    println!("Terms counted more than {} times:", config.term_threshold);
    for (term, count) in &output.term_table {
        println!("{term}\t{count}");
    }
    println!();

    println!("Mean star rating per label:");
    for (label, mean) in &output.mean_ratings {
        println!("{label}\t{mean:.4}");
    }
    println!();

    println!(
        "Logistic regression trained on {} reviews, tested on {}:",
        output.split.train.len(),
        output.split.test.len(),
    );
    println!("{}", output.report);

    println!(
        "Logistic regression cross-validation accuracy: {:.4} (+/- {:.4})",
        output.logistic_cv.mean(),
        output.logistic_cv.std(),
    );

    if let Some(sample) = &output.sample {
        println!("Review #{}: {}", sample.index, sample.review);
        println!("Features: {}", sample.features_text);
        println!("Predicted label: {}", sample.label);
    }

    println!(
        "Random forest cross-validation accuracy: {:.4} (+/- {:.4})",
        output.forest_cv.mean(),
        output.forest_cv.std(),
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);
    let config = args.pipeline_config();

    info!(path = ?args.dataset, "loading dataset");
    let columns = DatasetColumns {
        text: args.text_column.clone(),
        rating: Some(args.rating_column.clone()),
    };
    let corpus = load_corpus(&args.dataset, &columns).stage(Stage::Load)?;
    info!(n_documents = corpus.len(), "loaded dataset");

    let analyzer = match &args.lexicon {
        Some(path) => {
            info!(?path, "loading lexicon");
            SentimentIntensityAnalyzer::with_lexicon(load_lexicon(path).stage(Stage::Load)?)
        }
        None => SentimentIntensityAnalyzer::new(),
    };

    let start = Instant::now();
    let output = pipeline::run(&corpus, analyzer, &config)?;
    let duration = start.elapsed();

    print_output(&output, &config);

    if let Some(path) = &args.output {
        info!(?path, "writing labeled reviews");
        write_labeled(path, &output.corpus).stage(Stage::Write)?;
    }

    info!(elapsed_sec = duration.as_secs_f64(), "finished analysis");

    Ok(())
}
