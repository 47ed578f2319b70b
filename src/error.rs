use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum QrError {
    #[error("value for tag {tag} is {length} characters long, the maximum is 99")]
    #[diagnostic(
        code(hkqr::length_overflow),
        help("the two-digit length field cannot describe values longer than 99 characters")
    )]
    LengthOverflow { tag: String, length: usize },

    #[error("invalid point of initiation method: {0:?}")]
    #[diagnostic(
        code(hkqr::invalid_initiation_method),
        help("use STATIC, DYNAMIC or a numeric code of at most two digits")
    )]
    InvalidInitiationMethod(String),

    #[error("unsupported currency format: {0:?}")]
    #[diagnostic(
        code(hkqr::unsupported_currency),
        help("supply the numeric ISO 4217 code, e.g. 344 for HKD")
    )]
    UnsupportedCurrencyFormat(String),

    #[error("missing required field: {0}")]
    #[diagnostic(code(hkqr::missing_field))]
    MissingRequiredField(&'static str),

    #[error("unknown field: {0}")]
    #[diagnostic(
        code(hkqr::unknown_field),
        help("unknown fields are only dropped in permissive mode")
    )]
    UnknownField(String),

    #[error("invalid tag {0:?}: tags are exactly two ASCII letters or digits")]
    #[diagnostic(code(hkqr::invalid_tag))]
    InvalidTag(String),

    #[error("invalid value for {field}: {reason}")]
    #[diagnostic(code(hkqr::invalid_value))]
    InvalidFieldValue { field: &'static str, reason: String },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QrError>;
