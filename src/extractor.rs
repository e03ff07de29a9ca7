//! Projection of a message into a [`MetadataRecord`]

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::logger::{Logger, TracingLogger};
use crate::normalize::{parse_address, strip_header, strip_headers};
use crate::parser::format_timestamp;
use crate::types::{AddressInput, MailInput, MetadataRecord, NormalizedAddress};
use tracing::debug;

/// Extracts metadata from mail, reporting skipped input to its logger
#[derive(Debug, Clone, Default)]
pub struct Extractor<L = TracingLogger> {
    pub(crate) config: ExtractorConfig,
    pub(crate) logger: L,
}

impl Extractor {
    /// Default configuration, warnings sent to [`TracingLogger`]
    ///
    /// Those warnings only surface once a `tracing` subscriber is installed,
    /// e.g. `tracing_subscriber::fmt().init()` for standard error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: Logger> Extractor<L> {
    #[must_use]
    pub fn with_logger(logger: L) -> Self {
        Self::with_config(ExtractorConfig::default(), logger)
    }

    #[must_use]
    pub const fn with_config(config: ExtractorConfig, logger: L) -> Self {
        Self { config, logger }
    }

    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    #[must_use]
    pub const fn logger(&self) -> &L {
        &self.logger
    }

    /// Parse each address, dropping the ones that fail
    ///
    /// Every failure is logged once, with the offending input and the error.
    pub fn parse_addresses<'a, I>(&self, addresses: I) -> Vec<NormalizedAddress>
    where
        I: IntoIterator,
        I::Item: Into<AddressInput<'a>>,
    {
        addresses
            .into_iter()
            .filter_map(|address| {
                let address: AddressInput<'a> = address.into();
                match parse_address(address) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        self.logger
                            .warn(&format!("failure parsing: {address}: {e}"));
                        None
                    }
                }
            })
            .collect()
    }

    /// Project a message into a flat record
    ///
    /// With `strip_content` the subject is left out entirely.
    pub fn mail_to_hash<'a>(
        &self,
        mail: impl Into<MailInput<'a>>,
        strip_content: bool,
    ) -> Result<MetadataRecord> {
        let mail = mail.into().into_message()?;

        let message_id = mail.message_id().map(|id| strip_header(id).to_string());
        let sent_at = mail.sent_at()?.as_ref().map(format_timestamp);

        let in_reply_to = strip_headers(mail.in_reply_to()).into_iter().next();
        let references = Some(strip_headers(mail.references())).filter(|r| !r.is_empty());

        let from = self.parse_addresses(mail.from_addrs()).into_iter().next();
        let sender = self.parse_addresses(mail.sender_addrs()).into_iter().next();
        let to = self.parse_addresses(mail.to_addrs());
        let cc = self.parse_addresses(mail.cc_addrs());
        let bcc = self.parse_addresses(mail.bcc_addrs());

        let subject = (!strip_content).then(|| mail.subject().map(ToString::to_string));

        debug!(
            "Projected message {} with {} recipients",
            message_id.as_deref().unwrap_or("(no message id)"),
            to.len() + cc.len() + bcc.len()
        );

        Ok(MetadataRecord {
            message_id,
            sent_at,
            in_reply_to,
            references,
            from,
            sender,
            to,
            cc,
            bcc,
            subject,
        })
    }
}
