use embassy_net::tcp::TcpSocket;
use embedded_io_async::Write as _;
#[cfg(feature = "log")]
use esp_println::println;
use heapless::{String, Vec};
use serde::{Serialize, de::DeserializeOwned};

use super::{
    Error,
    HttpResult,
    headers::{
        ContentHeaders,
        ContentType,
        HttpMethod,
        ResponseHeaders,
        TargetWriter as _,
        find_content_length,
        parse_request_line,
        read_heading,
    },
    query::{query_param, split_target},
};

const HEADER_BUFFER_SIZE: usize = 512;
const BODY_BUFFER_SIZE: usize = 1024;
const STREAM_CHUNK_SIZE: usize = 1024;
const MAX_TARGET_LEN: usize = 128;

/// Error body sent with 4xx/5xx responses.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// HTTP connection context
pub(crate) struct HttpConnection<'a> {
    method: HttpMethod,
    target: String<MAX_TARGET_LEN>,

    socket: TcpSocket<'a>,
    content_length: usize,
    header_end: usize,
    header_buf: Vec<u8, HEADER_BUFFER_SIZE>,
    body_buf: Vec<u8, BODY_BUFFER_SIZE>,
}

impl<'a> HttpConnection<'a> {
    /// Read the request head from a freshly accepted socket.
    pub(crate) async fn from_socket(mut socket: TcpSocket<'a>) -> Result<Self, Error> {
        let mut header_buf = Vec::<u8, HEADER_BUFFER_SIZE>::new();
        header_buf
            .resize_default(HEADER_BUFFER_SIZE)
            .map_err(|()| Error::TooLarge)?;
        let (header_end, header_len) = read_heading(header_buf.as_mut_slice(), &mut socket).await?;
        header_buf.truncate(header_len);
        let header_end = match header_end {
            Some(end) => end,
            None if header_len == 0 => return Err(Error::Closed),
            None => return Err(Error::TooLarge),
        };

        // Only the head is text; the tail may already hold body bytes
        let header_str =
            core::str::from_utf8(&header_buf[..header_end]).map_err(|_| Error::Parse)?;
        let (method, raw_target, rest_headers) =
            parse_request_line(header_str).ok_or(Error::Parse)?;
        let content_length = find_content_length(rest_headers).unwrap_or(0);

        let mut target = String::new();
        target.push_str(raw_target).map_err(|()| Error::TooLarge)?;
        Ok(Self {
            method,
            target,
            socket,
            header_buf,
            body_buf: Vec::new(),
            content_length,
            header_end,
        })
    }

    /// Request method and path, without the query string.
    pub(crate) fn route(&self) -> (HttpMethod, &'_ str) {
        (self.method, split_target(self.target.as_str()).0)
    }

    /// Decoded value of a query parameter.
    pub(crate) fn query<const N: usize>(&self, key: &str) -> Option<String<N>> {
        query_param(split_target(self.target.as_str()).1, key)
    }

    pub(crate) async fn write_headers(&mut self, headers: &ResponseHeaders<'_>) -> HttpResult {
        self.header_buf.clear();
        headers.write_to(&mut self.header_buf)?;
        self.socket.write_all(self.header_buf.as_slice()).await?;
        self.socket.flush().await?;
        Ok(())
    }

    pub(crate) async fn write_body(&mut self, body: &[u8]) -> HttpResult {
        for chunk in body.chunks(STREAM_CHUNK_SIZE) {
            self.socket.write_all(chunk).await?;
        }
        self.socket.flush().await?;
        Ok(())
    }

    /// Write a 200 JSON response.
    pub(crate) async fn write_json<T: Serialize>(&mut self, data: &T) -> HttpResult {
        self.write_json_with(
            ResponseHeaders::success(),
            ContentHeaders::new(ContentType::Json),
            data,
        )
        .await
    }

    /// Serialize `data` and write it with the given status and content
    /// headers. The content length is filled in.
    pub(crate) async fn write_json_with<T: Serialize>(
        &mut self,
        response: ResponseHeaders<'_>,
        content: ContentHeaders<'_>,
        data: &T,
    ) -> HttpResult {
        self.body_buf.clear();
        self.body_buf
            .resize_default(BODY_BUFFER_SIZE)
            .map_err(|()| Error::TooLarge)?;
        let n = serde_json_core::to_slice(data, self.body_buf.as_mut_slice())
            .map_err(|_| Error::TooLarge)?;
        self.body_buf.truncate(n);

        let headers = response.with_content(content.with_length(n));
        self.write_headers(&headers).await?;

        self.socket.write_all(self.body_buf.as_slice()).await?;
        self.socket.flush().await?;
        Ok(())
    }

    /// Write `{"error": message}` with an error status.
    pub(crate) async fn write_error(
        &mut self,
        response: ResponseHeaders<'_>,
        message: &str,
    ) -> HttpResult {
        #[cfg(feature = "log")]
        println!("http: error response: {}", message);
        self.write_json_with(
            response,
            ContentHeaders::new(ContentType::Json),
            &ErrorBody { error: message },
        )
        .await
    }

    /// Answer a request whose body could not be read. Transport errors are
    /// passed back to the server.
    pub(crate) async fn reject_request(&mut self, error: Error) -> HttpResult {
        match error {
            Error::Parse => {
                self.write_error(ResponseHeaders::bad_request(), "malformed request body")
                    .await
            }
            Error::NoData => {
                self.write_error(ResponseHeaders::bad_request(), "missing request body")
                    .await
            }
            Error::TooLarge => {
                self.write_error(ResponseHeaders::too_large(), "request body too large")
                    .await
            }
            other => Err(other),
        }
    }

    /// Read JSON from the request body
    pub(crate) async fn read_json<T: DeserializeOwned>(&mut self) -> Result<T, Error> {
        let body = self.read_body().await?;
        knitled_core::codec::decode_json(body).map_err(|_e| {
            #[cfg(feature = "log")]
            println!("http: json parse error: {:?}", _e);
            Error::Parse
        })
    }

    /// Read the whole request body into the connection buffer.
    pub(crate) async fn read_body(&mut self) -> Result<&[u8], Error> {
        if self.content_length == 0 {
            return Err(Error::NoData);
        }
        if self.content_length > BODY_BUFFER_SIZE {
            return Err(Error::TooLarge);
        }

        self.body_buf.clear();
        let tail = &self.header_buf[self.header_end..];
        let tail = &tail[..tail.len().min(self.content_length)];
        self.body_buf
            .extend_from_slice(tail)
            .map_err(|()| Error::TooLarge)?;

        let mut received = self.body_buf.len();
        self.body_buf
            .resize_default(self.content_length)
            .map_err(|()| Error::TooLarge)?;
        while received < self.content_length {
            let n = self.socket.read(&mut self.body_buf[received..]).await?;
            if n == 0 {
                return Err(Error::Closed);
            }
            received += n;
        }

        Ok(self.body_buf.as_slice())
    }
}
