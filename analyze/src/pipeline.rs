use core::fmt;
use core::str::FromStr;
use std::error::Error;

use polarity::errors::PolarityError;
use polarity::logistic::QuietOutput;
use polarity::{
    cross_validate, evaluate, predict, predict_single, Classifier, Corpus, CrossValidation,
    CrossValidationScores, DatasetSplitter, FeatureMatrix, FoldStrategy, ForestConfig, Label,
    LexiconLabeler, LogisticRegression, PolarityScorer, RandomForest, Report, Split, TfIdfConfig,
    Vectorizer, Weighting,
};
use polarity_rules::TextNormalizer;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// A step of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Load,
    Normalize,
    TermFrequencies,
    Label,
    Split,
    Vectorize,
    Fit,
    Report,
    CrossValidateLogistic,
    SamplePrediction,
    CrossValidateForest,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Self::Load => "load",
            Self::Normalize => "normalize",
            Self::TermFrequencies => "term-frequencies",
            Self::Label => "label",
            Self::Split => "split",
            Self::Vectorize => "vectorize",
            Self::Fit => "fit",
            Self::Report => "report",
            Self::CrossValidateLogistic => "cross-validate-logistic",
            Self::SamplePrediction => "sample-prediction",
            Self::CrossValidateForest => "cross-validate-forest",
            Self::Write => "write",
        })
    }
}

/// An error that aborted the pipeline.
#[derive(Debug)]
pub struct PipelineError {
    pub stage: Stage,
    pub source: PolarityError,
}

impl PipelineError {
    pub const fn new(stage: Stage, source: PolarityError) -> Self {
        Self { stage, source }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PipelineError: {} stage failed: {}", self.stage, self.source)
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

pub trait StageResult<T> {
    /// Attaches the failed stage to an error.
    fn stage(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T> StageResult<T> for Result<T, PolarityError> {
    fn stage(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|e| PipelineError::new(stage, e))
    }
}

/// Samples used for cross-validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CvPartition {
    Train,
    Test,
    All,
}

impl FromStr for CvPartition {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Self::Train),
            "test" => Ok(Self::Test),
            "all" => Ok(Self::All),
            _ => Err("Could not parse a partition"),
        }
    }
}

/// Pipeline settings.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Number of least frequent tokens removed from the corpus
    pub rare_word_limit: usize,
    /// First document to label
    pub label_start: usize,
    /// Number of documents to label (None = up to the end)
    pub label_limit: Option<usize>,
    /// Fraction of labeled documents held out for testing
    pub test_size: f64,
    /// Seed of the train/test split
    pub seed: u64,
    /// Weighting of the classifier features
    pub weighting: Weighting,
    pub tfidf: TfIdfConfig,
    pub logistic: LogisticRegression,
    pub forest: ForestConfig,
    pub logistic_folds: usize,
    pub forest_folds: usize,
    pub cv_partition: CvPartition,
    pub fold_strategy: FoldStrategy,
    pub cv_parallel: bool,
    /// Weighting used to vectorize the sample review
    pub sample_weighting: Weighting,
    /// Normalizes the sample review before vectorizing it
    pub normalize_sample: bool,
    pub sample_seed: u64,
    /// Terms counted more often than this are reported
    pub term_threshold: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rare_word_limit: TextNormalizer::DEFAULT_RARE_WORD_LIMIT,
            label_start: 0,
            label_limit: None,
            test_size: DatasetSplitter::DEFAULT_TEST_SIZE,
            seed: DatasetSplitter::DEFAULT_SEED,
            weighting: Weighting::TfIdf,
            tfidf: TfIdfConfig::default(),
            logistic: LogisticRegression::default(),
            forest: ForestConfig::default(),
            logistic_folds: 2,
            forest_folds: 5,
            cv_partition: CvPartition::Test,
            fold_strategy: FoldStrategy::Stratified,
            cv_parallel: true,
            sample_weighting: Weighting::Counts,
            normalize_sample: true,
            sample_seed: 42,
            term_threshold: 500,
        }
    }
}

/// A review picked from the corpus and classified on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplePrediction {
    pub index: usize,
    pub review: String,
    pub features_text: String,
    pub label: Label,
}

/// Everything the pipeline produced.
pub struct PipelineOutput {
    pub corpus: Corpus,
    pub term_table: Vec<(String, usize)>,
    pub mean_ratings: Vec<(Label, f64)>,
    pub split: Split,
    pub report: Report,
    pub logistic_cv: CrossValidationScores,
    pub sample: Option<SamplePrediction>,
    pub forest_cv: CrossValidationScores,
}

fn cv_data(
    config: &PipelineConfig,
    split: &Split,
    vectorizer: &Vectorizer,
    train_x: &FeatureMatrix,
    test_x: &FeatureMatrix,
) -> Result<(FeatureMatrix, Vec<Label>), PolarityError> {
    Ok(match config.cv_partition {
        CvPartition::Train => (train_x.clone(), split.train.labels().to_vec()),
        CvPartition::Test => (test_x.clone(), split.test.labels().to_vec()),
        CvPartition::All => {
            let all = split.all();
            (vectorizer.transform(all.texts())?, all.labels().to_vec())
        }
    })
}

/// Runs every stage after loading.
///
/// # Errors
///
/// The first failure aborts the run and is returned with its stage.
pub fn run<S>(
    corpus: &Corpus,
    scorer: S,
    config: &PipelineConfig,
) -> Result<PipelineOutput, PipelineError>
where
    S: PolarityScorer,
{
    info!(stage = %Stage::Normalize, "start");
    let normalizer = TextNormalizer::new().rare_word_limit(config.rare_word_limit);
    let (corpus, rare_words) = normalizer.normalize_corpus(corpus);

    info!(stage = %Stage::TermFrequencies, "start");
    let term_table: Vec<(String, usize)> = corpus
        .term_frequencies()
        .above(config.term_threshold)
        .map(|(term, count)| (term.to_string(), count))
        .collect();

    info!(stage = %Stage::Label, "start");
    let labeler = LexiconLabeler::new(scorer);
    let end = config
        .label_limit
        .map_or(corpus.len(), |limit| config.label_start.saturating_add(limit));
    let corpus = labeler.label_range(&corpus, config.label_start..end);
    let mean_ratings = corpus.mean_rating_by_label();

    info!(stage = %Stage::Split, "start");
    let split = DatasetSplitter::new()
        .test_size(config.test_size)
        .seed(config.seed)
        .split(&corpus)
        .stage(Stage::Split)?;

    info!(stage = %Stage::Vectorize, "start");
    let mut vectorizer = Vectorizer::new(config.weighting).tfidf_config(config.tfidf);
    let n_features = vectorizer.fit(split.train.texts()).n_features();
    let train_x = vectorizer
        .transform(split.train.texts())
        .stage(Stage::Vectorize)?;
    let test_x = vectorizer
        .transform(split.test.texts())
        .stage(Stage::Vectorize)?;
    info!(n_features, "vectorized");

    let _quiet = QuietOutput::new();
    info!(stage = %Stage::Fit, "start");
    let model = config
        .logistic
        .fit(&train_x, split.train.labels())
        .stage(Stage::Fit)?;

    info!(stage = %Stage::Report, "start");
    let predicted = predict(model.as_ref(), &test_x).stage(Stage::Report)?;
    let report = evaluate(&predicted, split.test.labels()).stage(Stage::Report)?;

    info!(stage = %Stage::CrossValidateLogistic, "start");
    let (cv_x, cv_y) = cv_data(config, &split, &vectorizer, &train_x, &test_x)
        .stage(Stage::CrossValidateLogistic)?;
    let logistic_cv = cross_validate(
        &config.logistic,
        &cv_x,
        &cv_y,
        &CrossValidation::new(config.logistic_folds)
            .strategy(config.fold_strategy)
            .parallel(config.cv_parallel),
    )
    .stage(Stage::CrossValidateLogistic)?;

    info!(stage = %Stage::SamplePrediction, "start");
    let candidates: Vec<usize> = corpus
        .iter()
        .enumerate()
        .filter(|(_, doc)| doc.raw_text().is_some())
        .map(|(i, _)| i)
        .collect();
    let sample = if candidates.is_empty() {
        None
    } else {
        let mut rng = ChaCha8Rng::seed_from_u64(config.sample_seed);
        let index = candidates[rng.gen_range(0..candidates.len())];
        let review = corpus.documents()[index]
            .raw_text()
            .unwrap_or_default()
            .to_string();
        let features_text = if config.normalize_sample {
            normalizer.normalize_text(&review, &rare_words)
        } else {
            review.clone()
        };
        let mut sample_vectorizer =
            Vectorizer::new(config.sample_weighting).tfidf_config(config.tfidf);
        sample_vectorizer.fit(split.train.texts());
        let label = predict_single(model.as_ref(), &sample_vectorizer, &features_text)
            .stage(Stage::SamplePrediction)?;
        Some(SamplePrediction {
            index,
            review,
            features_text,
            label,
        })
    };

    info!(stage = %Stage::CrossValidateForest, "start");
    let forest = RandomForest::new(config.forest);
    let forest_cv = cross_validate(
        &forest,
        &cv_x,
        &cv_y,
        &CrossValidation::new(config.forest_folds)
            .strategy(config.fold_strategy)
            .parallel(config.cv_parallel),
    )
    .stage(Stage::CrossValidateForest)?;

    info!(classifier = forest.name(), "finished");
    Ok(PipelineOutput {
        corpus,
        term_table,
        mean_ratings,
        split,
        report,
        logistic_cv,
        sample,
        forest_cv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use polarity::Document;

    fn reviews() -> Corpus {
        Corpus::new(vec![
            Document::new("great product loved it").with_rating(5.0),
            Document::new("terrible waste of money").with_rating(1.0),
            Document::new("okay experience nothing special").with_rating(3.0),
        ])
    }

    fn stub_scorer(text: &str) -> f64 {
        if text.starts_with("great") {
            0.8
        } else if text.starts_with("terrible") {
            -0.6
        } else {
            0.0
        }
    }

    fn small_config() -> PipelineConfig {
        PipelineConfig {
            rare_word_limit: 0,
            test_size: 1.0 / 3.0,
            forest_folds: 3,
            cv_partition: CvPartition::All,
            cv_parallel: false,
            forest: ForestConfig {
                n_trees: 5,
                ..ForestConfig::default()
            },
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_labels_from_scores() {
        let output = run(&reviews(), stub_scorer, &small_config()).unwrap();
        let labels: Vec<_> = output.corpus.iter().map(Document::label).collect();
        assert_eq!(
            vec![Some(Label::Positive), Some(Label::Negative), Some(Label::Negative)],
            labels
        );
        assert_eq!(
            vec![(Label::Negative, 2.0), (Label::Positive, 5.0)],
            output.mean_ratings
        );
        assert_eq!(
            Some("great product loved"),
            output.corpus.documents()[0].normalized_text()
        );
    }

    #[test]
    fn test_split_reproducible() {
        let config = small_config();
        let first = run(&reviews(), stub_scorer, &config).unwrap();
        let second = run(&reviews(), stub_scorer, &config).unwrap();
        assert_eq!(2, first.split.train.len());
        assert_eq!(1, first.split.test.len());
        assert_eq!(first.split, second.split);
        assert_eq!(first.sample, second.sample);
        assert_eq!(first.logistic_cv, second.logistic_cv);
        assert_eq!(first.forest_cv, second.forest_cv);
        assert_eq!(2, first.logistic_cv.scores().len());
        assert_eq!(3, first.forest_cv.scores().len());
    }

    #[test]
    fn test_sample_prediction() {
        let output = run(&reviews(), stub_scorer, &small_config()).unwrap();
        let sample = output.sample.unwrap();
        assert_eq!(
            output.corpus.documents()[sample.index].raw_text(),
            Some(sample.review.as_str())
        );
        assert!(!sample.features_text.contains(char::is_uppercase));
    }

    #[test]
    fn test_limited_label_range() {
        let config = PipelineConfig {
            label_limit: Some(2),
            test_size: 0.5,
            forest_folds: 2,
            ..small_config()
        };
        let output = run(&reviews(), stub_scorer, &config).unwrap();
        assert_eq!(None, output.corpus.documents()[2].label());
        assert_eq!(2, output.split.all().len());
    }

    #[test]
    fn test_error_names_split_stage() {
        let err = run(&reviews(), |_: &str| 1.0, &small_config())
            .err()
            .unwrap();
        assert_eq!(Stage::Split, err.stage);
        assert!(matches!(err.source, PolarityError::InsufficientData(_)));
        assert!(err.to_string().contains("split stage failed"));
    }

    #[test]
    fn test_error_names_cross_validation_stage() {
        // A single held-out review cannot be split into two folds.
        let config = PipelineConfig {
            cv_partition: CvPartition::Test,
            ..small_config()
        };
        let err = run(&reviews(), stub_scorer, &config).err().unwrap();
        assert_eq!(Stage::CrossValidateLogistic, err.stage);
        assert!(matches!(err.source, PolarityError::InvalidFoldCount(_)));
    }

    #[test]
    fn test_cv_partition_from_str() {
        assert_eq!(CvPartition::Test, "test".parse().unwrap());
        assert_eq!(CvPartition::All, "all".parse().unwrap());
        assert!("valid".parse::<CvPartition>().is_err());
    }
}
