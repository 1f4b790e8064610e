#[cfg(feature = "log")]
use esp_println::println;
use heapless::String;
use knitled_core::{
    KnitError,
    Pattern,
    PatternId,
    SettingsPatch,
    StorageError,
    codec::{PatternDocument, decode_pattern},
};
use serde::Serialize;

use super::{dependencies::with_knit, system::handle_get_system_information};
use crate::{
    core::net::http::{
        ContentHeaders,
        ContentType,
        HttpConnection,
        HttpHandler,
        HttpMethod,
        HttpResult,
        ResponseHeaders,
        TextEncoding,
    },
    domain::dto::{
        ActiveRowResponse,
        FileListResponse,
        FileRequest,
        FileResponse,
        PatternRequest,
        PatternResponse,
        RawPatternId,
        RowStepRequest,
    },
    infrastructure::types::KnitControllerImpl,
};

const INDEX_HTML: &[u8] = include_bytes!("../assets/index.html");

/// Knitting API served in station mode.
#[derive(Debug, Default)]
pub struct KnitHttpController;

impl HttpHandler for KnitHttpController {
    async fn handle_request(&self, conn: HttpConnection<'_>) -> HttpResult {
        let mut conn = conn;
        match conn.route() {
            (HttpMethod::Get, "/") => handle_get_html(&mut conn).await,
            (HttpMethod::Get, "/api/system") => handle_get_system_information(&mut conn).await,
            (HttpMethod::Get, "/api/state") => handle_get_state(&mut conn).await,
            (HttpMethod::Get, "/api/files") => handle_list_files(&mut conn).await,
            (HttpMethod::Get, "/api/pattern") => handle_select_pattern(&mut conn).await,
            (HttpMethod::Post, "/api/pattern") => handle_save_pattern(&mut conn).await,
            (HttpMethod::Post, "/api/delete") => handle_delete_pattern(&mut conn).await,
            (HttpMethod::Post, "/api/row") => handle_row_step(&mut conn).await,
            (HttpMethod::Post, "/api/confirm") => handle_confirm(&mut conn).await,
            (HttpMethod::Get, "/api/config") => handle_get_config(&mut conn).await,
            (HttpMethod::Post, "/api/config") => handle_update_config(&mut conn).await,
            (HttpMethod::Get, "/api/download") => handle_download(&mut conn).await,
            (HttpMethod::Post, "/api/upload") => handle_upload(&mut conn).await,
            _ => serve_404(&mut conn).await,
        }
    }
}

async fn handle_get_html(conn: &mut HttpConnection<'_>) -> HttpResult {
    let content = ContentHeaders::new(ContentType::TextHtml)
        .with_text_encoding(TextEncoding::Utf8)
        .with_length(INDEX_HTML.len());
    let headers = ResponseHeaders::success().with_content(content);
    conn.write_headers(&headers).await?;
    conn.write_body(INDEX_HTML).await
}

async fn handle_get_state(conn: &mut HttpConnection<'_>) -> HttpResult {
    respond(conn, with_knit(|knit| Ok(knit.snapshot()))).await
}

async fn handle_list_files(conn: &mut HttpConnection<'_>) -> HttpResult {
    let result = with_knit(|knit| -> Result<_, KnitError> {
        let files = knit.list_patterns()?;
        Ok(FileListResponse { files })
    });
    respond(conn, result).await
}

/// Select `?file=` (creating it when missing) or report the current pattern.
async fn handle_select_pattern(conn: &mut HttpConnection<'_>) -> HttpResult {
    let requested = conn.query::<64>("file");
    let result = with_knit(|knit| -> Result<_, KnitError> {
        if let Some(raw) = requested {
            let id = PatternId::normalize(&raw)?;
            knit.select_pattern(id)?;
        }
        Ok(pattern_response(knit))
    });
    respond(conn, result).await
}

async fn handle_save_pattern(conn: &mut HttpConnection<'_>) -> HttpResult {
    let request = match conn.read_json::<PatternRequest>().await {
        Ok(request) => request,
        Err(err) => return conn.reject_request(err).await,
    };
    let result = with_knit(|knit| -> Result<_, KnitError> {
        let id = PatternId::normalize(&request.file)?;
        let pattern = Pattern::try_from(&request.pattern)?;
        knit.save_pattern(id, pattern)?;
        Ok(pattern_response(knit))
    });
    respond(conn, result).await
}

async fn handle_delete_pattern(conn: &mut HttpConnection<'_>) -> HttpResult {
    let request = match conn.read_json::<FileRequest>().await {
        Ok(request) => request,
        Err(err) => return conn.reject_request(err).await,
    };
    let result = with_knit(|knit| -> Result<_, KnitError> {
        let file = PatternId::normalize(&request.file)?;
        knit.delete_pattern(&file)?;
        #[cfg(feature = "log")]
        println!("knit_http: deleted {}", file);
        Ok(FileResponse { file })
    });
    respond(conn, result).await
}

async fn handle_row_step(conn: &mut HttpConnection<'_>) -> HttpResult {
    let request = match conn.read_json::<RowStepRequest>().await {
        Ok(request) => request,
        Err(err) => return conn.reject_request(err).await,
    };
    let result = with_knit(|knit| -> Result<_, KnitError> {
        let active_row = knit.step_from_network(request.delta)?;
        Ok(ActiveRowResponse { active_row })
    });
    respond(conn, result).await
}

async fn handle_confirm(conn: &mut HttpConnection<'_>) -> HttpResult {
    let result = with_knit(|knit| {
        Ok(ActiveRowResponse {
            active_row: knit.confirm(),
        })
    });
    respond(conn, result).await
}

async fn handle_get_config(conn: &mut HttpConnection<'_>) -> HttpResult {
    respond(conn, with_knit(|knit| Ok(knit.settings().config()))).await
}

async fn handle_update_config(conn: &mut HttpConnection<'_>) -> HttpResult {
    let patch = match conn.read_json::<SettingsPatch>().await {
        Ok(patch) => patch,
        Err(err) => return conn.reject_request(err).await,
    };
    respond(conn, with_knit(|knit| Ok(knit.update_config(&patch)))).await
}

/// Send a stored pattern as `<name>.json`.
async fn handle_download(conn: &mut HttpConnection<'_>) -> HttpResult {
    let Some(raw) = conn.query::<64>("file") else {
        return conn
            .write_error(ResponseHeaders::bad_request(), "missing file parameter")
            .await;
    };
    let result = with_knit(|knit| -> Result<_, KnitError> {
        let id = PatternId::normalize(&raw)?;
        let pattern = knit.read_pattern(&id)?;
        Ok((id, PatternDocument::from(&pattern)))
    });
    let (id, document) = match result {
        Some(Ok(found)) => found,
        Some(Err(err)) => return respond_knit_error(conn, err).await,
        None => return serve_unavailable(conn).await,
    };

    let filename = attachment_name(&id);
    let content = ContentHeaders::new(ContentType::Json).with_attachment(filename.as_str());
    conn.write_json_with(ResponseHeaders::success(), content, &document)
        .await
}

/// Store a raw pattern body under `?file=` without selecting it.
async fn handle_upload(conn: &mut HttpConnection<'_>) -> HttpResult {
    let Some(raw) = conn.query::<64>("file") else {
        return conn
            .write_error(ResponseHeaders::bad_request(), "missing file parameter")
            .await;
    };
    let decoded = match conn.read_body().await.map(decode_pattern) {
        Ok(decoded) => decoded,
        Err(err) => return conn.reject_request(err).await,
    };
    let result = with_knit(|knit| upload_pattern(knit, &raw, decoded));
    respond(conn, result).await
}

fn upload_pattern(
    knit: &mut KnitControllerImpl,
    raw: &RawPatternId,
    decoded: Result<Pattern, knitled_core::PatternError>,
) -> Result<FileResponse, KnitError> {
    let file = PatternId::normalize(raw)?;
    let pattern = decoded?;
    knit.store_pattern(&file, &pattern)?;
    #[cfg(feature = "log")]
    println!("knit_http: uploaded {}", file);
    Ok(FileResponse { file })
}

fn pattern_response(knit: &KnitControllerImpl) -> PatternResponse {
    PatternResponse {
        file: knit.settings().pattern_id.clone(),
        active_row: knit.active_row(),
        pattern: PatternDocument::from(knit.pattern()),
    }
}

fn attachment_name(id: &PatternId) -> String<64> {
    let mut name = String::new();
    // the stem is at most 48 bytes
    let _ = name.push_str(id.stem());
    let _ = name.push_str(".json");
    name
}

/// Write the outcome of a controller operation.
async fn respond<T: Serialize>(
    conn: &mut HttpConnection<'_>,
    result: Option<Result<T, KnitError>>,
) -> HttpResult {
    match result {
        Some(Ok(data)) => conn.write_json(&data).await,
        Some(Err(err)) => respond_knit_error(conn, err).await,
        None => serve_unavailable(conn).await,
    }
}

async fn respond_knit_error(conn: &mut HttpConnection<'_>, err: KnitError) -> HttpResult {
    let response = match err {
        KnitError::Storage(StorageError::NotFound) => ResponseHeaders::not_found(),
        KnitError::Storage(_) => ResponseHeaders::internal_error(),
        KnitError::InvalidDelta
        | KnitError::InvalidPattern(_)
        | KnitError::InvalidPatternId(_)
        | KnitError::ProtectedPattern => ResponseHeaders::bad_request(),
    };
    conn.write_error(response, err.as_str()).await
}

async fn serve_unavailable(conn: &mut HttpConnection<'_>) -> HttpResult {
    conn.write_error(ResponseHeaders::unavailable(), "controller not ready")
        .await
}

async fn serve_404(conn: &mut HttpConnection<'_>) -> HttpResult {
    conn.write_error(ResponseHeaders::not_found(), "not found").await
}
