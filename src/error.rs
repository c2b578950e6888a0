use thiserror::Error;

// Failures while loading a language's reasons
#[derive(Error, Debug)]
pub enum ReasonError {
    #[error("no reasons available for language '{0}'")]
    NotFound(String),

    #[error("reasons for language '{lang}' are malformed: {detail}")]
    Malformed { lang: String, detail: String },

    #[error("failed to read reasons for language '{lang}': {source}")]
    Io {
        lang: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReasonError>;
