//! Unwrapping of journal report envelopes

use crate::error::{ParseError, Result};
use crate::logger::Logger;
use crate::types::{MailInput, Message};
use crate::Extractor;
use tracing::debug;

const BLANK_LINE: &[u8] = b"\r\n\r\n";

/// Keep only the header block of an RFC822 message
///
/// Everything from the first `\r\n\r\n` on is dropped. Content without that
/// boundary is returned unchanged.
#[must_use]
pub fn discard_mail_body(content: &[u8]) -> &[u8] {
    content
        .windows(BLANK_LINE.len())
        .position(|window| window == BLANK_LINE)
        .map_or(content, |end| &content[..end])
}

impl<L: Logger> Extractor<L> {
    /// Recover the original message from a journal report
    ///
    /// Mail without the journal header is returned as it is, whatever
    /// `strip_content` says. Otherwise the first top-level part that is an
    /// attachment or a `message/rfc822` is parsed as the result, after its
    /// body is discarded when `strip_content` is set.
    pub fn extract_journalled_mail<'a>(
        &self,
        mail: impl Into<MailInput<'a>>,
        strip_content: bool,
    ) -> Result<Message> {
        let journal = mail.into().into_message()?;

        if !journal.has_header(&self.config.journal_header) {
            return Ok(journal.into_owned());
        }

        let attachment = journal
            .parts()
            .iter()
            .find(|part| part.is_attachment())
            .ok_or_else(|| ParseError::NoAttachments {
                raw: String::from_utf8_lossy(journal.raw()).into_owned(),
            })?;

        let content = if strip_content {
            discard_mail_body(attachment.content())
        } else {
            attachment.content()
        };

        debug!(
            "Unwrapping journal report {} ({} part, {} bytes kept)",
            journal.message_id().unwrap_or("(no message id)"),
            attachment.content_type(),
            content.len()
        );

        Message::parse(content)
    }
}
