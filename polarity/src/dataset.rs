use std::io::Read;

use tracing::debug;

use crate::document::{Corpus, Document};
use crate::errors::{PolarityError, Result};

/// Column names of a review table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetColumns {
    /// Review text column
    pub text: String,
    /// Star rating column (None = no ratings)
    pub rating: Option<String>,
}

impl Default for DatasetColumns {
    fn default() -> Self {
        Self {
            text: "Review".to_string(),
            rating: Some("Star".to_string()),
        }
    }
}

fn column_index(headers: &csv::StringRecord, arg: &'static str, name: &str) -> Result<usize> {
    headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
        PolarityError::invalid_argument(arg, format!("column {:?} not found in the header", name))
    })
}

impl Corpus {
    /// Reads a review table in CSV format with a header row.
    ///
    /// Empty text cells produce documents without text. Empty or unparsable ratings are left
    /// unset.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    /// * `columns` - Names of the columns to read.
    ///
    /// # Errors
    ///
    /// [`PolarityError::InvalidArgument`] is returned if a column is not in the header. CSV and
    /// I/O errors are passed through.
    ///
    /// # Examples
    ///
    /// ```
    /// use polarity::{Corpus, DatasetColumns};
    ///
    /// let data = "Star,Review\n5,Great product\n1,\n";
    /// let corpus = Corpus::read_csv(data.as_bytes(), &DatasetColumns::default()).unwrap();
    ///
    /// assert_eq!(2, corpus.len());
    /// assert_eq!(Some("Great product"), corpus.documents()[0].raw_text());
    /// assert_eq!(None, corpus.documents()[1].raw_text());
    /// assert_eq!(Some(1.0), corpus.documents()[1].rating());
    /// ```
    pub fn read_csv<R>(rdr: R, columns: &DatasetColumns) -> Result<Self>
    where
        R: Read,
    {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
        let headers = rdr.headers()?.clone();
        let text_idx = column_index(&headers, "text_column", &columns.text)?;
        let rating_idx = columns
            .rating
            .as_deref()
            .map(|name| column_index(&headers, "rating_column", name))
            .transpose()?;

        let mut documents = vec![];
        for record in rdr.records() {
            let record = record?;
            let mut doc = match record.get(text_idx) {
                Some(text) if !text.is_empty() => Document::new(text),
                _ => Document::missing(),
            };
            if let Some(rating) = rating_idx
                .and_then(|i| record.get(i))
                .and_then(|v| v.trim().parse::<f64>().ok())
            {
                doc = doc.with_rating(rating);
            }
            documents.push(doc);
        }
        debug!(n_documents = documents.len(), "read dataset");
        Ok(Self::new(documents))
    }
}
