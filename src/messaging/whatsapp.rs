//! WhatsApp deep links

use super::MessagingError;
use crate::lead::LeadRecord;
use reqwest::Url;

/// Click-to-chat base URL
pub const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// E.164 allows at most 15 digits; 10 covers a Brazilian landline without country code
const MIN_DIGITS: usize = 10;
const MAX_DIGITS: usize = 15;

/// Build `https://wa.me/<digits>?text=<encoded text>`
///
/// Formatting characters in `number` (`+`, spaces, dashes, parentheses) are
/// dropped.
pub fn whatsapp_link(number: &str, text: &str) -> Result<Url, MessagingError> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
        return Err(MessagingError::InvalidNumber(number.to_string()));
    }

    let mut url = Url::parse(&format!("{}/{}", WHATSAPP_BASE_URL, digits))
        .map_err(|e| MessagingError::InvalidUrl(e.to_string()))?;

    if !text.is_empty() {
        url.query_pairs_mut().append_pair("text", text);
    }

    Ok(url)
}

/// Fill `{placeholder}`s from a lead
///
/// `{name}`, `{email}` and `{phone}` map to the contact fields; any other
/// placeholder is looked up in the custom fields and renders empty when
/// absent. An unmatched `{` is kept as is.
pub fn render_template(template: &str, lead: &LeadRecord) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = after[..close].trim();
                let value = match key {
                    "name" => lead.name(),
                    "email" => lead.email(),
                    "phone" => lead.phone(),
                    other => lead.field(other).unwrap_or_default(),
                };
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
