use hstd::card::CardRowError;
use hstd::config::ConfigError;
use hstd::encoding::EncodingError;
use std::fmt::{self, Debug, Display};

/// Holds information about the errors which can happen while scraping and
/// assembling the card dataset.
pub enum ScrapeError {
    Web(reqwest::Error),
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    Encoding(EncodingError),
    Config(ConfigError),
    Row(CardRowError),
    /// A page is missing an element the extractor depends on
    MissingElement(&'static str),
    /// The details list has no entry under this key
    MissingField(String),
    /// A details cell without the `key: value` shape
    DetailLayout(String),
    /// A field that must be numeric was not
    InvalidNumber {
        field: &'static str,
        value: String,
    },
    /// The pagination indicator did not look like "... N"
    Pagination(String),
    /// The query URL does not start with the cards root
    QueryUrl(String),
    /// A rating widget was present but its text did not match "Rating: X/Y"
    RatingLayout(String),
    /// A comment block split into fewer segments than the layout guarantees
    CommentLayout(usize),
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        ScrapeError::Web(err)
    }
}

impl From<std::io::Error> for ScrapeError {
    fn from(err: std::io::Error) -> Self {
        ScrapeError::Io(err)
    }
}

impl From<csv::Error> for ScrapeError {
    fn from(err: csv::Error) -> Self {
        ScrapeError::Csv(err)
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(err: serde_json::Error) -> Self {
        ScrapeError::Json(err)
    }
}

impl From<EncodingError> for ScrapeError {
    fn from(err: EncodingError) -> Self {
        ScrapeError::Encoding(err)
    }
}

impl From<ConfigError> for ScrapeError {
    fn from(err: ConfigError) -> Self {
        ScrapeError::Config(err)
    }
}

impl From<CardRowError> for ScrapeError {
    fn from(err: CardRowError) -> Self {
        ScrapeError::Row(err)
    }
}

impl Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeError::Web(err) => write!(f, "web request failed: {}", err),
            ScrapeError::Io(err) => write!(f, "file access failed: {}", err),
            ScrapeError::Csv(err) => write!(f, "CSV handling failed: {}", err),
            ScrapeError::Json(err) => write!(f, "JSON handling failed: {}", err),
            ScrapeError::Encoding(err) => write!(f, "{}", err),
            ScrapeError::Config(err) => write!(f, "{}", err),
            ScrapeError::Row(err) => write!(f, "{}", err),
            ScrapeError::MissingElement(selector) => {
                write!(f, "page has no element matching {}", selector)
            }
            ScrapeError::MissingField(key) => {
                write!(f, "card details list has no \"{}\" entry", key)
            }
            ScrapeError::DetailLayout(cell) => {
                write!(f, "details cell is not a \"key: value\" pair: {:?}", cell)
            }
            ScrapeError::InvalidNumber { field, value } => {
                write!(f, "{} is not numeric: {:?}", field, value)
            }
            ScrapeError::Pagination(text) => {
                write!(f, "pagination indicator has unexpected text: {:?}", text)
            }
            ScrapeError::QueryUrl(url) => {
                write!(f, "query URL does not start with the cards root: {}", url)
            }
            ScrapeError::RatingLayout(text) => {
                write!(f, "rating widget has unexpected text: {:?}", text)
            }
            ScrapeError::CommentLayout(segments) => {
                write!(
                    f,
                    "comment block split into {} segments, expected at least 6",
                    segments
                )
            }
        }
    }
}

// The Display form already carries the context, so the propagated-error
// rendering reuses it.
impl Debug for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}
