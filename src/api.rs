// HTTP client module: a small blocking reqwest client that turns an upload
// request into one POST and reports the exchange through the verbose trace.

use crate::error::UploadError;
use crate::json::JsonUploadRequest;
use crate::request::{FilePart, UploadRequest};
use crate::trace;
use reqwest::blocking::{multipart, Client, Request};
use reqwest::StatusCode;
use std::io::{self, Write};
use std::time::Duration;

/// What came back from the server. The body is kept as raw bytes and never
/// inspected beyond a debug log.
#[derive(Debug)]
pub struct UploadOutcome {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Blocking upload client. With `fail_on_error` set, HTTP statuses >= 400
/// become errors; otherwise any completed exchange is a success.
#[derive(Clone)]
pub struct UploadClient {
    client: Client,
    fail_on_error: bool,
}

impl UploadClient {
    /// Build a client that ignores proxy settings and waits indefinitely.
    pub fn new() -> Result<Self, UploadError> {
        let client = Client::builder()
            .no_proxy()
            .timeout(None::<Duration>)
            .build()
            .map_err(UploadError::Transport)?;
        Ok(UploadClient {
            client,
            fail_on_error: false,
        })
    }

    pub fn fail_on_error(mut self, fail: bool) -> Self {
        self.fail_on_error = fail;
        self
    }

    /// Send `req` as one multipart/form-data POST.
    pub fn upload(
        &self,
        req: &UploadRequest,
        out: &mut dyn Write,
    ) -> Result<UploadOutcome, UploadError> {
        let form = build_form(&req.parts)?;
        trace::parts(out, &req.url, &req.parts)?;

        let request = self
            .client
            .post(&req.url)
            .multipart(form)
            .build()
            .map_err(|e| UploadError::from_reqwest(&req.url, e))?;
        self.dispatch(request, out)
    }

    /// Send `req` as a JSON array body.
    pub fn upload_json(
        &self,
        req: &JsonUploadRequest,
        out: &mut dyn Write,
    ) -> Result<UploadOutcome, UploadError> {
        let len = req.encoded_len()?;
        writeln!(
            out,
            "* Uploading {} JSON item(s) ({} bytes) to {}",
            req.items.len(),
            len,
            req.url
        )?;

        let request = self
            .client
            .post(&req.url)
            .json(&req.items)
            .build()
            .map_err(|e| UploadError::from_reqwest(&req.url, e))?;
        self.dispatch(request, out)
    }

    fn dispatch(
        &self,
        request: Request,
        out: &mut dyn Write,
    ) -> Result<UploadOutcome, UploadError> {
        let url = request.url().to_string();
        trace::request(out, &request)?;

        let res = self
            .client
            .execute(request)
            .map_err(|e| UploadError::from_reqwest(&url, e))?;
        trace::response(out, &res)?;

        let status = res.status();
        if self.fail_on_error && (status.is_client_error() || status.is_server_error()) {
            return Err(UploadError::HttpStatus(status));
        }

        let body = res
            .bytes()
            .map_err(|e| UploadError::from_reqwest(&url, e))?
            .to_vec();
        log_uploaded_ids(&body);
        Ok(UploadOutcome { status, body })
    }
}

/// Build the multipart form. Every file is checked up front so a missing one
/// fails before any connection is made.
pub fn build_form(parts: &[FilePart]) -> Result<multipart::Form, UploadError> {
    let mut form = multipart::Form::new();
    for part in parts {
        let meta = std::fs::metadata(&part.path)
            .map_err(|e| UploadError::read_file(&part.path, e))?;
        if !meta.is_file() {
            return Err(UploadError::read_file(
                &part.path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        // Read the whole file now: a streamed body would turn a refused
        // connection into a body error.
        let data = std::fs::read(&part.path).map_err(|e| UploadError::read_file(&part.path, e))?;
        let guessed = mime_guess::from_path(&part.path).first_or_octet_stream();
        let content_type = part.content_type.as_deref().unwrap_or(guessed.as_ref());

        let mut file_part = multipart::Part::bytes(data)
            .mime_str(content_type)
            .map_err(|_| UploadError::ContentType(content_type.to_string()))?;
        if let Some(name) = part.file_name() {
            file_part = file_part.file_name(name.to_string());
        }
        form = form.part(part.field.clone(), file_part);
    }
    Ok(form)
}

/// The server answers with a JSON list of stored image ids.
fn log_uploaded_ids(body: &[u8]) {
    if let Ok(serde_json::Value::Array(ids)) = serde_json::from_slice(body) {
        log::debug!("server stored {} image(s): {:?}", ids.len(), ids);
    }
}
