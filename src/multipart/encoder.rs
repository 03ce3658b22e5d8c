//! Multipart Encoder
//!
//! Serializes form fields and file payloads into a `multipart/form-data` body.

use bytes::Bytes;

use crate::error::{FlickrError, Result};

/// Fixed boundary token. Never generated per request, so identical input
/// always encodes to identical bytes.
pub const BOUNDARY: &str = "----------ThIs_Is_tHe_bouNdaRY_$";

const CRLF: &[u8] = b"\r\n";

/// Content type used when the extension is not recognised.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// == File Part ==
/// A file attachment: form field name, file name and raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub name: String,
    pub filename: String,
    pub data: Bytes,
}

impl FilePart {
    pub fn new(name: impl Into<String>, filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            data: data.into(),
        }
    }
}

// == Multipart Body ==
/// Encoded body plus the `Content-Type` header value declaring its boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub content_type: String,
    pub body: Vec<u8>,
}

impl MultipartBody {
    /// Exact byte length, for the `Content-Length` header.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

// Writes CRLF-separated lines.
struct LineWriter {
    out: Vec<u8>,
    first: bool,
}

impl LineWriter {
    fn new() -> Self {
        Self {
            out: Vec::new(),
            first: true,
        }
    }

    fn line(&mut self, bytes: &[u8]) {
        if !self.first {
            self.out.extend_from_slice(CRLF);
        }
        self.first = false;
        self.out.extend_from_slice(bytes);
    }

    fn finish(self) -> Vec<u8> {
        self.out
    }
}

// == Encode ==
/// Encodes `fields` and `files`, in order, as a `multipart/form-data` body.
///
/// Each field becomes a part with a `Content-Disposition` header; each file
/// also carries a `Content-Type` guessed from its extension. The body ends
/// with `--BOUNDARY--` followed by CRLF.
///
/// Field names and filenames are escaped before they are quoted into the
/// header. A value or payload that contains the boundary delimiter is
/// rejected, since the parser on the other side would split it.
pub fn encode(fields: &[(String, String)], files: &[FilePart]) -> Result<MultipartBody> {
    let delimiter = format!("--{}", BOUNDARY);

    for (name, value) in fields {
        if contains(value.as_bytes(), delimiter.as_bytes()) {
            return Err(boundary_collision(name));
        }
    }
    for file in files {
        if contains(&file.data, delimiter.as_bytes()) {
            return Err(boundary_collision(&file.name));
        }
    }

    let mut writer = LineWriter::new();
    for (name, value) in fields {
        writer.line(delimiter.as_bytes());
        writer.line(
            format!("Content-Disposition: form-data; name=\"{}\"", escape_quoted(name)).as_bytes(),
        );
        writer.line(b"");
        writer.line(value.as_bytes());
    }
    for file in files {
        writer.line(delimiter.as_bytes());
        writer.line(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                escape_quoted(&file.name),
                escape_quoted(&file.filename)
            )
            .as_bytes(),
        );
        writer.line(format!("Content-Type: {}", content_type_for(&file.filename)).as_bytes());
        writer.line(b"");
        writer.line(&file.data);
    }
    writer.line(format!("{}--", delimiter).as_bytes());
    writer.line(b"");

    Ok(MultipartBody {
        content_type: format!("multipart/form-data; boundary={}", BOUNDARY),
        body: writer.finish(),
    })
}

fn boundary_collision(field: &str) -> FlickrError {
    FlickrError::InvalidField {
        field: field.to_string(),
        reason: "content contains the multipart boundary".to_string(),
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

// == Escape Quoted ==
/// Escapes a header parameter value the way browsers encode form data:
/// `"` becomes `%22`, CR `%0D` and LF `%0A`.
pub fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("%22"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            _ => out.push(c),
        }
    }
    out
}

// == Content Type ==
/// Guesses a MIME type from the filename's extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let extension = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => return FALLBACK_CONTENT_TYPE,
    };

    match extension.as_str() {
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        "ico" => "image/vnd.microsoft.icon",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "xml" => "text/xml",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mpeg" | "mpg" | "mpe" => "video/mpeg",
        "wmv" => "video/x-ms-wmv",
        "3gp" => "video/3gpp",
        "ogv" => "video/ogg",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mp3" | "mp2" => "audio/mpeg",
        "wav" => "audio/x-wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "opus" => "audio/opus",
        "aif" | "aifc" | "aiff" => "audio/x-aiff",
        "au" | "snd" => "audio/basic",
        _ => FALLBACK_CONTENT_TYPE,
    }
}
