//! Error types for mail metadata extraction

use mailparse::MailParseError;
use thiserror::Error;

/// Errors that abort an extraction or projection call
#[derive(Error, Debug)]
pub enum ParseError {
    /// The underlying MIME parser rejected the input
    #[error("Failed to parse email structure: {0}")]
    Structure(#[from] MailParseError),

    /// A journal report carried no part that could hold the original message
    #[error("attempted to extract journalled mail, but message has no attachments:\n{raw}\n")]
    NoAttachments { raw: String },

    /// The Date header is present but could not be read
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// A single address failed to parse
    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Errors raised while parsing one address
#[derive(Error, Debug)]
pub enum AddressError {
    /// The address grammar was rejected
    #[error("Failed to parse address {input:?}: {source}")]
    Syntax {
        input: String,
        #[source]
        source: MailParseError,
    },

    /// The input held a group, a list, or nothing at all
    #[error("Expected exactly one mailbox in {input:?}, found {count}")]
    NotSingle { input: String, count: usize },

    /// The mailbox parsed but its address is not `local@domain`
    #[error("Invalid address {addr:?} in {input:?}")]
    InvalidAddress { input: String, addr: String },
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ParseError>;
