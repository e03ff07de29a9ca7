//! Building a [`Message`] from raw RFC822 bytes

use crate::error::{ParseError, Result};
use crate::types::{Mailbox, Message, Part};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use mailparse::{MailAddr, MailHeader, ParsedMail};
use regex::Regex;
use tracing::debug;

static MSG_ID_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"<[^<>]*>").unwrap());

const ADDRESS_HEADERS: [&str; 5] = ["from", "sender", "to", "cc", "bcc"];

impl Message {
    /// Parse raw RFC822 bytes
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let parsed = mailparse::parse_mail(raw)?;
        Self::from_parsed(&parsed)
    }

    /// Take ownership of a message already parsed by `mailparse`
    pub fn from_parsed(parsed: &ParsedMail<'_>) -> Result<Self> {
        let headers = parsed
            .headers
            .iter()
            .map(|h| (h.get_key(), h.get_value()))
            .collect();

        let addresses = parsed
            .headers
            .iter()
            .filter_map(|h| {
                let key = h.get_key().to_lowercase();
                ADDRESS_HEADERS
                    .contains(&key.as_str())
                    .then(|| (key, mailboxes_from_header(h)))
            })
            .collect();

        let parts = parsed
            .subparts
            .iter()
            .map(part_from_parsed)
            .collect::<Result<Vec<_>>>()?;

        let message = Self {
            raw: parsed.raw_bytes.to_vec(),
            headers,
            addresses,
            body: extract_body(parsed),
            parts,
        };

        debug!(
            "Parsed message {} with {} parts",
            message.message_id().unwrap_or("(no message id)"),
            message.parts.len()
        );

        Ok(message)
    }

    /// The Date header, if present
    ///
    /// RFC2822 dates keep their offset. Anything `mailparse` can still make
    /// sense of is read as UTC. A Date header that neither accepts is an
    /// error rather than a missing value.
    pub fn sent_at(&self) -> Result<Option<DateTime<FixedOffset>>> {
        let Some(value) = self.date() else {
            return Ok(None);
        };
        let value = value.trim();

        if let Ok(date) = DateTime::parse_from_rfc2822(value) {
            return Ok(Some(date));
        }

        mailparse::dateparse(value)
            .ok()
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|date| Some(date.fixed_offset()))
            .ok_or_else(|| ParseError::InvalidDate(value.to_string()))
    }
}

/// Render a date the way the metadata record carries it
pub(crate) fn format_timestamp(date: &DateTime<FixedOffset>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Mailboxes of one address header, groups flattened
///
/// The header is tokenized before encoded words are decoded, so a decoded
/// comma never splits a name. If the header as a whole is rejected, its
/// still-encoded value is split per entry and each entry is left for
/// address parsing to accept or reject.
fn mailboxes_from_header(header: &MailHeader<'_>) -> Vec<Mailbox> {
    match mailparse::addrparse_header(header) {
        Ok(list) => list
            .into_inner()
            .into_iter()
            .flat_map(|addr| match addr {
                MailAddr::Single(info) => vec![info],
                MailAddr::Group(group) => group.addrs,
            })
            .map(Mailbox::Parsed)
            .collect(),
        Err(e) => {
            debug!("Splitting {} header entry by entry: {e}", header.get_key());
            split_address_list(&String::from_utf8_lossy(header.get_value_raw()))
                .into_iter()
                .map(Mailbox::Unparsed)
                .collect()
        }
    }
}

fn part_from_parsed(part: &ParsedMail<'_>) -> Result<Part> {
    Ok(Part {
        content_type: part.ctype.mimetype.to_lowercase(),
        disposition: part.get_content_disposition().disposition,
        content: part.get_body_raw()?,
    })
}

fn extract_body(parsed: &ParsedMail<'_>) -> String {
    if parsed.subparts.is_empty() {
        return parsed.get_body().unwrap_or_default();
    }

    find_text_part(parsed).unwrap_or_default()
}

fn find_text_part(parsed: &ParsedMail<'_>) -> Option<String> {
    for part in &parsed.subparts {
        if part.subparts.is_empty() {
            if part.ctype.mimetype.eq_ignore_ascii_case("text/plain")
                && let Ok(body) = part.get_body()
            {
                return Some(body);
            }
        } else if let Some(body) = find_text_part(part) {
            return Some(body);
        }
    }

    None
}

/// Split an In-Reply-To or References value into msg-id tokens
///
/// Bracketed ids are picked out wherever they appear, so comments and
/// legacy phrases around them are ignored. A value with no brackets at all
/// falls back to whitespace and comma separated tokens.
pub(crate) fn split_message_ids(value: &str) -> Vec<String> {
    let bracketed: Vec<String> = MSG_ID_REGEX
        .find_iter(value)
        .map(|m| m.as_str().to_string())
        .collect();

    if !bracketed.is_empty() {
        return bracketed;
    }

    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Split a raw address header into one string per mailbox
///
/// Commas inside quoted strings, comments and angle brackets do not split.
/// Groups contribute their members and lose their display name.
pub(crate) fn split_address_list(value: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut in_angle = false;
    let mut in_group = false;
    let mut escaped = false;
    let mut comment_depth = 0usize;

    for c in value.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }

        let structural = !in_quotes && comment_depth == 0 && !in_angle;
        match c {
            '\\' if in_quotes || comment_depth > 0 => {
                escaped = true;
                current.push(c);
            }
            '"' if comment_depth == 0 => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '(' if !in_quotes => {
                comment_depth += 1;
                current.push(c);
            }
            ')' if !in_quotes && comment_depth > 0 => {
                comment_depth -= 1;
                current.push(c);
            }
            '<' if structural => {
                in_angle = true;
                current.push(c);
            }
            '>' if in_angle && !in_quotes && comment_depth == 0 => {
                in_angle = false;
                current.push(c);
            }
            ':' if structural && !in_group => {
                in_group = true;
                current.clear();
            }
            ';' if structural && in_group => {
                in_group = false;
                push_entry(&mut entries, &mut current);
            }
            ',' if structural => push_entry(&mut entries, &mut current),
            _ => current.push(c),
        }
    }
    push_entry(&mut entries, &mut current);

    entries
}

fn push_entry(entries: &mut Vec<String>, current: &mut String) {
    let entry = current.trim();
    if !entry.is_empty() {
        entries.push(entry.to_string());
    }
    current.clear();
}
