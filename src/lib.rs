// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Mail Metadata Extractor
//!
//! Turns RFC822 mail into flat, JSON-friendly metadata, unwrapping
//! journal report envelopes on the way.
//!
//! # Features
//!
//! - Journal report unwrapping, with optional body discard
//! - Message-ID, In-Reply-To and References without angle brackets
//! - Address headers as name and address pairs, skipping unparseable ones
//! - Stable, serde-serializable output record
//!
//! # Example
//!
//! ```rust
//! use mail_metadata::Extractor;
//!
//! let raw = b"From: Jane Doe <jane@example.com>\r\n\
//!             To: bob@example.com\r\n\
//!             Message-ID: <abc@example.com>\r\n\
//!             Date: Wed, 21 Apr 2010 14:43:24 +0100\r\n\
//!             Subject: Hello\r\n\
//!             \r\n\
//!             Body";
//!
//! let extractor = Extractor::new();
//! let message = extractor.extract_journalled_mail(raw, true).unwrap();
//! let record = extractor.mail_to_hash(&message, false).unwrap();
//!
//! assert_eq!(record.message_id.as_deref(), Some("abc@example.com"));
//! assert_eq!(record.sent_at.as_deref(), Some("2010-04-21T14:43:24+01:00"));
//! println!("{}", record.to_json().unwrap());
//! ```

mod config;
mod error;
mod extractor;
mod journal;
mod logger;
mod normalize;
mod parser;
mod types;

pub use config::{DEFAULT_JOURNAL_HEADER, ExtractorConfig};
pub use error::{AddressError, ParseError, Result};
pub use extractor::Extractor;
pub use journal::discard_mail_body;
pub use logger::{Logger, TracingLogger};
pub use normalize::{parse_address, strip_header, strip_headers};
pub use types::*;
