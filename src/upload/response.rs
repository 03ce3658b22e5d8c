//! Upload reply parsing.
//!
//! The upload endpoints answer with a small fixed XML document:
//!
//! ```text
//! <rsp stat="ok"><photoid>1234</photoid></rsp>
//! <rsp stat="ok"><ticketid>5678</ticketid></rsp>
//! <rsp stat="fail"><err code="5" msg="Filetype was not recognised"/></rsp>
//! ```
//!
//! Only those shapes are understood; this is not a general XML reader.

use crate::error::{FlickrError, Result};

/// Page where a freshly uploaded photo can be edited.
pub const EDIT_URL_PREFIX: &str = "https://www.flickr.com/photos/upload/edit/?ids=";

// == Upload Outcome ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Synchronous upload finished; `edit_url` is set for new uploads only.
    Photo { id: String, edit_url: Option<String> },
    /// Asynchronous upload queued; poll with `flickr.photos.upload.checkTickets`.
    Ticket { id: String },
}

impl UploadOutcome {
    pub fn id(&self) -> &str {
        match self {
            UploadOutcome::Photo { id, .. } | UploadOutcome::Ticket { id } => id,
        }
    }
}

/// Interprets an upload or replace reply. `with_edit_url` adds the edit link
/// to photo results.
pub fn parse_reply(xml: &str, with_edit_url: bool) -> Result<UploadOutcome> {
    let rsp = start_tag(xml, "rsp")
        .ok_or_else(|| FlickrError::UnexpectedResponse(format!("no <rsp> element: {}", xml)))?;

    if attribute(rsp, "stat").as_deref() != Some("ok") {
        let err = start_tag(xml, "err").unwrap_or("");
        let code = attribute(err, "code")
            .and_then(|c| c.parse().ok())
            .unwrap_or(0);
        let message = attribute(err, "msg").unwrap_or_else(|| "unknown error".to_string());
        return Err(FlickrError::Api { code, message });
    }

    if let Some(id) = element_text(xml, "photoid") {
        let edit_url = with_edit_url.then(|| format!("{}{}", EDIT_URL_PREFIX, id));
        return Ok(UploadOutcome::Photo { id, edit_url });
    }
    if let Some(id) = element_text(xml, "ticketid") {
        return Ok(UploadOutcome::Ticket { id });
    }

    let tag = first_child_tag(xml).unwrap_or_default();
    Err(FlickrError::UnexpectedResponse(format!("Unexpected tag: {}", tag)))
}

// Contents of the first `<name ...>` start tag, between the name and `>`.
fn start_tag<'a>(xml: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{}", name);
    let mut search = 0;
    while let Some(pos) = xml[search..].find(&open) {
        let after = search + pos + open.len();
        let rest = &xml[after..];
        // `<rsp` must not match `<rspx`
        if rest.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/') {
            let end = rest.find('>')?;
            return Some(rest[..end].trim_end_matches('/'));
        }
        search = after;
    }
    None
}

fn attribute(tag: &str, name: &str) -> Option<String> {
    let key = format!("{}=", name);
    let mut search = 0;
    while let Some(pos) = tag[search..].find(&key) {
        let start = search + pos;
        let boundary_ok = start == 0 || tag[..start].ends_with(char::is_whitespace);
        let rest = &tag[start + key.len()..];
        if boundary_ok {
            let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
            let value = &rest[1..];
            let end = value.find(quote)?;
            return Some(unescape(&value[..end]));
        }
        search = start + key.len();
    }
    None
}

fn element_text(xml: &str, name: &str) -> Option<String> {
    let open = format!("<{}", name);
    let close = format!("</{}>", name);
    let start = xml.find(&open)?;
    let body_start = start + xml[start..].find('>')? + 1;
    let body_end = body_start + xml[body_start..].find(&close)?;
    Some(unescape(xml[body_start..body_end].trim()))
}

fn first_child_tag(xml: &str) -> Option<String> {
    let rsp_start = xml.find("<rsp")?;
    let after_rsp = rsp_start + xml[rsp_start..].find('>')? + 1;
    let rest = &xml[after_rsp..];
    let open = rest.find('<')?;
    let name: String = rest[open + 1..]
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '>' && *c != '/')
        .collect();
    (!name.is_empty()).then_some(name)
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
