#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Polarity
//!
//! Polarity labels product reviews with a sentiment lexicon, turns them into sparse bag-of-words
//! features, and trains and evaluates classifiers on them.
//!
//! ## Examples
//!
//! ```
//! use polarity::{
//!     evaluate, predict, Classifier, Corpus, DatasetSplitter, LexiconLabeler,
//!     LogisticRegression, SentimentIntensityAnalyzer, Vectorizer, Weighting,
//! };
//!
//! let corpus = Corpus::from_texts([
//!     "great product love it",
//!     "terrible waste of money",
//!     "love the great quality",
//!     "awful and terrible",
//!     "great value",
//!     "broken and useless",
//!     "wonderful gift",
//!     "bad smell",
//! ]);
//! let labeler = LexiconLabeler::new(SentimentIntensityAnalyzer::new());
//! let corpus = labeler.label_all(&corpus);
//!
//! let split = DatasetSplitter::new().split(&corpus).unwrap();
//! let mut vectorizer = Vectorizer::new(Weighting::TfIdf);
//! vectorizer.fit(split.train.texts());
//! let train_x = vectorizer.transform(split.train.texts()).unwrap();
//! let test_x = vectorizer.transform(split.test.texts()).unwrap();
//!
//! let model = LogisticRegression::new()
//!     .fit(&train_x, split.train.labels())
//!     .unwrap();
//! let predicted = predict(model.as_ref(), &test_x).unwrap();
//! let report = evaluate(&predicted, split.test.labels()).unwrap();
//! println!("{}", report);
//! ```
//!
//! Cross-validation folds are fitted in parallel with **crate feature** `parallel` (enabled by
//! default). For more details, see [`cross_validate()`].

mod utils;

pub mod classifier;
pub mod cross_validation;
mod dataset;
mod document;
pub mod errors;
pub mod forest;
mod labeler;
mod lexicon;
pub mod logistic;
pub mod metrics;
mod sentiment_intensity;
mod splitter;
mod vectorizer;

pub use classifier::{predict, predict_single, Classifier, ConstantModel, Model};
pub use cross_validation::{cross_validate, CrossValidation, CrossValidationScores, FoldStrategy};
pub use dataset::DatasetColumns;
pub use document::{Corpus, Document, Label, TermFrequencies};
pub use forest::{ForestConfig, ForestModel, RandomForest};
pub use labeler::LexiconLabeler;
pub use lexicon::Lexicon;
pub use logistic::{LinearModel, LogisticRegression, SolverType};
pub use metrics::{evaluate, Report};
pub use sentiment_intensity::{PolarityScorer, SentimentIntensityAnalyzer};
pub use splitter::{DatasetSplitter, Partition, Split};
pub use utils::tokens;
pub use vectorizer::{FeatureMatrix, SparseVector, TfIdfConfig, Vectorizer, Vocabulary, Weighting};
