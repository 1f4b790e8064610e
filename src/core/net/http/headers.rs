use core::fmt::Write;

use embassy_net::tcp::{Error as TcpError, TcpSocket};

pub(crate) type StatusCode = u16;

fn reason_phrase(code: StatusCode) -> &'static str {
    match code {
        200 => "OK",
        202 => "Accepted",
        302 => "Found",
        400 => "Bad Request",
        404 => "Not Found",
        413 => "Request Entity Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// HTTP Content Type.
#[derive(Debug)]
pub(crate) enum ContentType {
    Json,
    TextHtml,
}

impl ContentType {
    pub(super) fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::TextHtml => "text/html",
        }
    }
}

/// Text Encoding.
#[derive(Debug)]
pub(crate) enum TextEncoding {
    Utf8,
}

impl TextEncoding {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
        }
    }
}

/// HTTP socket connection policy.
#[derive(Debug)]
pub(super) enum ConnectionPolicy {
    Close,
}

impl ConnectionPolicy {
    pub(super) fn as_str(&self) -> &'static str {
        match self {
            ConnectionPolicy::Close => "close",
        }
    }
}

pub(super) trait TargetWriter {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error>;
}

/// HTTP Content Headers.
pub(crate) struct ContentHeaders<'a> {
    content_type: ContentType,
    content_length: Option<usize>,
    text_encoding: Option<TextEncoding>,
    attachment: Option<&'a str>,
}

impl<'a> ContentHeaders<'a> {
    /// Create a new content headers with a content type.
    pub(crate) const fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            content_length: None,
            text_encoding: None,
            attachment: None,
        }
    }

    #[must_use]
    pub(crate) const fn with_length(mut self, length: usize) -> Self {
        self.content_length = Some(length);
        self
    }

    #[must_use]
    pub(crate) const fn with_text_encoding(mut self, text_encoding: TextEncoding) -> Self {
        self.text_encoding = Some(text_encoding);
        self
    }

    /// Ask the browser to save the body as `filename`.
    #[must_use]
    pub(crate) const fn with_attachment(mut self, filename: &'a str) -> Self {
        self.attachment = Some(filename);
        self
    }
}

impl TargetWriter for ContentHeaders<'_> {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error> {
        write!(writer, "Content-Type: {}", self.content_type.as_str())?;
        if let Some(text_encoding) = &self.text_encoding {
            write!(writer, "; charset={}", text_encoding.as_str())?;
        }
        write!(writer, "\r\n")?;
        if let Some(content_length) = self.content_length {
            write!(writer, "Content-Length: {}\r\n", content_length)?;
        }
        if let Some(filename) = self.attachment {
            write!(writer, "Content-Disposition: attachment; filename=\"{}\"\r\n", filename)?;
        }
        Ok(())
    }
}

/// Response Headers.
pub(crate) struct ResponseHeaders<'a> {
    status: StatusCode,
    connection: ConnectionPolicy,
    location: Option<&'a str>,
    content: Option<ContentHeaders<'a>>,
}

impl<'a> ResponseHeaders<'a> {
    pub(crate) const fn from_code(code: StatusCode) -> Self {
        Self {
            status: code,
            connection: ConnectionPolicy::Close,
            location: None,
            content: None,
        }
    }

    pub(crate) const fn success() -> Self {
        Self::from_code(200)
    }

    pub(crate) const fn accepted() -> Self {
        Self::from_code(202)
    }

    /// Temporary redirect to `location`.
    pub(crate) const fn redirect(location: &'a str) -> Self {
        let mut headers = Self::from_code(302);
        headers.location = Some(location);
        headers
    }

    pub(crate) const fn bad_request() -> Self {
        Self::from_code(400)
    }

    pub(crate) const fn not_found() -> Self {
        Self::from_code(404)
    }

    pub(crate) const fn too_large() -> Self {
        Self::from_code(413)
    }

    pub(crate) const fn internal_error() -> Self {
        Self::from_code(500)
    }

    pub(crate) const fn unavailable() -> Self {
        Self::from_code(503)
    }

    #[must_use]
    pub(crate) const fn with_content(mut self, content: ContentHeaders<'a>) -> Self {
        self.content = Some(content);
        self
    }
}

impl TargetWriter for ResponseHeaders<'_> {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error> {
        let reason = reason_phrase(self.status);
        write!(writer, "HTTP/1.1 {} {}\r\n", self.status, reason)?;
        if let Some(location) = self.location {
            write!(writer, "Location: {}\r\n", location)?;
        }
        match &self.content {
            Some(content) => content.write_to(writer)?,
            None => write!(writer, "Content-Length: 0\r\n")?,
        }

        write!(writer, "Connection: {}\r\n", self.connection.as_str())?;
        write!(writer, "\r\n")?;
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub(super) fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "OPTIONS" => HttpMethod::Options,
            "HEAD" => HttpMethod::Head,
            _ => return None,
        })
    }
}

/// Parse the request line from the header string.
///
/// Returns the method, request target, and rest of the header string.
pub(super) fn parse_request_line(header_str: &str) -> Option<(HttpMethod, &str, &str)> {
    let line_end = header_str.find("\r\n")?;
    let first_line = &header_str[..line_end];
    let mut parts = first_line.split_whitespace();
    let method = parts.next().and_then(HttpMethod::parse)?;
    let target = parts.next()?;

    Some((method, target, &header_str[line_end + 2..]))
}

/// Read the start line and headers from the socket.
///
/// Returns the position of the end of the headers and the number of bytes
/// read. A header block that does not fit `buf` yields [`None`] for the end.
pub(super) async fn read_heading(
    buf: &mut [u8],
    socket: &mut TcpSocket<'_>,
) -> Result<(Option<usize>, usize), TcpError> {
    let mut header_len = 0;
    loop {
        let n = socket.read(&mut buf[header_len..]).await?;
        if n == 0 {
            return Ok((None, header_len));
        }
        header_len += n;
        if let Some(pos) = buf[..header_len].windows(4).position(|w| w == b"\r\n\r\n") {
            return Ok((Some(pos + 4), header_len));
        }
        if header_len >= buf.len() {
            return Ok((None, header_len));
        }
    }
}

/// Find the content length in the header string.
pub(super) fn find_content_length(header: &str) -> Option<usize> {
    const TARGET: &str = "content-length:";
    header
        .lines()
        .find(|line| {
            line.get(..TARGET.len())
                .is_some_and(|name| name.eq_ignore_ascii_case(TARGET))
        })
        .and_then(|line| line[TARGET.len()..].trim().parse::<usize>().ok())
}
