//! Header normalization: message-id decoration and address projection

use crate::error::AddressError;
use crate::types::{AddressInput, NormalizedAddress};
use mailparse::{MailAddr, SingleInfo};
use regex::Regex;

static ADDR_SPEC_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r#"^[^\s<>@,;"]+@[^\s<>@,;"]+$"#).unwrap());

/// Remove one pair of angle brackets wrapping the whole value
///
/// Only the first and last characters are inspected, so `<a<b>c>` becomes
/// `a<b>c`. Whitespace outside the brackets prevents stripping.
#[must_use]
pub fn strip_header(header: &str) -> &str {
    header
        .strip_prefix('<')
        .and_then(|inner| inner.strip_suffix('>'))
        .unwrap_or(header)
}

/// Apply [`strip_header`] to each value, keeping order
///
/// Accepts anything iterable over string-likes: a slice, a `Vec`, or an
/// `Option` for a single value that may be missing.
pub fn strip_headers<I, S>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    headers
        .into_iter()
        .map(|h| strip_header(h.as_ref()).to_string())
        .collect()
}

/// Project one address into a name and address pair
///
/// Raw text must hold exactly one mailbox. Parsed or not, the address has to
/// look like `local@domain`, since `mailparse` keeps stray brackets in it.
pub fn parse_address<'a>(
    address: impl Into<AddressInput<'a>>,
) -> Result<NormalizedAddress, AddressError> {
    let address = address.into();
    let info = match address {
        AddressInput::Raw(raw) => parse_single(raw)?,
        AddressInput::Parsed(info) => info.clone(),
    };

    if !ADDR_SPEC_REGEX.is_match(&info.addr) {
        return Err(AddressError::InvalidAddress {
            input: address.to_string(),
            addr: info.addr,
        });
    }

    Ok(normalized(info))
}

fn parse_single(raw: &str) -> Result<SingleInfo, AddressError> {
    let list = mailparse::addrparse(raw).map_err(|source| AddressError::Syntax {
        input: raw.to_string(),
        source,
    })?;

    let mut mailboxes = list.into_inner();
    match (mailboxes.pop(), mailboxes.is_empty()) {
        (Some(MailAddr::Single(info)), true) => Ok(info),
        (Some(MailAddr::Group(group)), true) => Err(AddressError::NotSingle {
            input: raw.to_string(),
            count: group.addrs.len(),
        }),
        (last, _) => Err(AddressError::NotSingle {
            input: raw.to_string(),
            count: mailboxes.len() + usize::from(last.is_some()),
        }),
    }
}

fn normalized(info: SingleInfo) -> NormalizedAddress {
    NormalizedAddress {
        name: info.display_name,
        email_address: info.addr,
    }
}
