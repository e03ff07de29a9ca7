//! Core types for parsed messages and projected metadata

use crate::error::Result;
use mailparse::{DispositionType, SingleInfo};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A parsed RFC822 message that owns its raw bytes
#[derive(Debug, Clone)]
pub struct Message {
    /// The bytes this message was parsed from
    pub(crate) raw: Vec<u8>,

    /// Unfolded, decoded headers in declaration order
    pub(crate) headers: Vec<(String, String)>,

    /// Mailboxes of each address header, keyed by lower-cased name
    pub(crate) addresses: Vec<(String, Vec<Mailbox>)>,

    /// Best text body
    pub(crate) body: String,

    /// Top-level MIME parts
    pub(crate) parts: Vec<Part>,
}

impl Message {
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of the named header, matched case-insensitively
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Message-ID as written, angle brackets included
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.header("message-id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Raw Date header text
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.header("date")
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.header("subject")
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Msg-id tokens of In-Reply-To, brackets kept
    #[must_use]
    pub fn in_reply_to(&self) -> Vec<String> {
        self.header("in-reply-to")
            .map(crate::parser::split_message_ids)
            .unwrap_or_default()
    }

    /// Msg-id tokens of References, brackets kept
    #[must_use]
    pub fn references(&self) -> Vec<String> {
        self.header("references")
            .map(crate::parser::split_message_ids)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn from_addrs(&self) -> Vec<&Mailbox> {
        self.address_list("from")
    }

    #[must_use]
    pub fn sender_addrs(&self) -> Vec<&Mailbox> {
        self.address_list("sender")
    }

    #[must_use]
    pub fn to_addrs(&self) -> Vec<&Mailbox> {
        self.address_list("to")
    }

    #[must_use]
    pub fn cc_addrs(&self) -> Vec<&Mailbox> {
        self.address_list("cc")
    }

    #[must_use]
    pub fn bcc_addrs(&self) -> Vec<&Mailbox> {
        self.address_list("bcc")
    }

    /// Every address found in all headers with this name, one entry per mailbox
    fn address_list(&self, name: &str) -> Vec<&Mailbox> {
        self.addresses
            .iter()
            .filter(|(key, _)| key == name)
            .flat_map(|(_, mailboxes)| mailboxes)
            .collect()
    }
}

/// One entry of an address header
#[derive(Debug, Clone, PartialEq)]
pub enum Mailbox {
    /// Tokenized and decoded by `mailparse`
    Parsed(SingleInfo),

    /// Raw entry of a header `mailparse` rejected as a whole
    Unparsed(String),
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        AddressInput::from(self).fmt(f)
    }
}

/// A top-level MIME body part
#[derive(Debug, Clone)]
pub struct Part {
    /// Lower-cased mimetype, e.g. `message/rfc822`
    pub(crate) content_type: String,

    pub(crate) disposition: DispositionType,

    /// Body with the transfer encoding removed
    pub(crate) content: Vec<u8>,
}

impl Part {
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub const fn disposition(&self) -> &DispositionType {
        &self.disposition
    }

    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Whether this part can carry a journalled message
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.disposition == DispositionType::Attachment
            || self.content_type.eq_ignore_ascii_case("message/rfc822")
    }
}

/// Mail handed to an extraction call, either still raw or already parsed
#[derive(Debug, Clone)]
pub enum MailInput<'a> {
    Raw(&'a [u8]),
    Parsed(Cow<'a, Message>),
}

impl<'a> MailInput<'a> {
    /// Parse raw input, pass parsed input through
    pub fn into_message(self) -> Result<Cow<'a, Message>> {
        match self {
            Self::Raw(raw) => Message::parse(raw).map(Cow::Owned),
            Self::Parsed(message) => Ok(message),
        }
    }
}

impl<'a> From<&'a [u8]> for MailInput<'a> {
    fn from(raw: &'a [u8]) -> Self {
        Self::Raw(raw)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for MailInput<'a> {
    fn from(raw: &'a [u8; N]) -> Self {
        Self::Raw(raw)
    }
}

impl<'a> From<&'a Vec<u8>> for MailInput<'a> {
    fn from(raw: &'a Vec<u8>) -> Self {
        Self::Raw(raw)
    }
}

impl<'a> From<&'a str> for MailInput<'a> {
    fn from(raw: &'a str) -> Self {
        Self::Raw(raw.as_bytes())
    }
}

impl<'a> From<&'a String> for MailInput<'a> {
    fn from(raw: &'a String) -> Self {
        Self::Raw(raw.as_bytes())
    }
}

impl From<Message> for MailInput<'_> {
    fn from(message: Message) -> Self {
        Self::Parsed(Cow::Owned(message))
    }
}

impl<'a> From<&'a Message> for MailInput<'a> {
    fn from(message: &'a Message) -> Self {
        Self::Parsed(Cow::Borrowed(message))
    }
}

/// An address handed to address parsing, either raw text or a parsed mailbox
#[derive(Debug, Clone, Copy)]
pub enum AddressInput<'a> {
    Raw(&'a str),
    Parsed(&'a SingleInfo),
}

impl<'a> From<&'a str> for AddressInput<'a> {
    fn from(raw: &'a str) -> Self {
        Self::Raw(raw)
    }
}

impl<'a> From<&'a String> for AddressInput<'a> {
    fn from(raw: &'a String) -> Self {
        Self::Raw(raw)
    }
}

impl<'a> From<&'a SingleInfo> for AddressInput<'a> {
    fn from(info: &'a SingleInfo) -> Self {
        Self::Parsed(info)
    }
}

impl<'a> From<&'a Mailbox> for AddressInput<'a> {
    fn from(mailbox: &'a Mailbox) -> Self {
        match mailbox {
            Mailbox::Parsed(info) => Self::Parsed(info),
            Mailbox::Unparsed(raw) => Self::Raw(raw),
        }
    }
}

impl fmt::Display for AddressInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(raw) => write!(f, "{raw}"),
            Self::Parsed(SingleInfo {
                display_name: Some(name),
                addr,
            }) => write!(f, "\"{name}\" <{addr}>"),
            Self::Parsed(SingleInfo { addr, .. }) => write!(f, "{addr}"),
        }
    }
}

/// Name and address pair projected from an address header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedAddress {
    /// Display name (e.g., "John Doe")
    pub name: Option<String>,

    /// Address (e.g., "john@example.com")
    pub email_address: String,
}

impl NormalizedAddress {
    #[must_use]
    pub fn new(name: Option<&str>, email_address: &str) -> Self {
        Self {
            name: name.map(ToString::to_string),
            email_address: email_address.to_string(),
        }
    }
}

impl fmt::Display for NormalizedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email_address),
            None => write!(f, "{}", self.email_address),
        }
    }
}

/// Flat metadata projected from a message, ready for JSON
///
/// Fields serialize in declaration order. Every field but `subject` is always
/// emitted; `subject` is emitted only when content was retained, and is then
/// `null` for a message without one.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Message-ID without angle brackets
    pub message_id: Option<String>,

    /// Date header as RFC3339 with offset
    pub sent_at: Option<String>,

    /// First In-Reply-To id without angle brackets
    pub in_reply_to: Option<String>,

    /// References ids without angle brackets, oldest first
    pub references: Option<Vec<String>>,

    pub from: Option<NormalizedAddress>,

    pub sender: Option<NormalizedAddress>,

    pub to: Vec<NormalizedAddress>,

    pub cc: Vec<NormalizedAddress>,

    pub bcc: Vec<NormalizedAddress>,

    /// Raw subject, present only when content is kept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Option<String>>,
}

impl MetadataRecord {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
