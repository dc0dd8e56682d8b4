// Verbose protocol trace in the style of `curl -v`: `*` lines are
// informational, `>` lines describe the outgoing request and `<` lines the
// response. All of it goes to the writer handed in (stderr in the binary).

use crate::request::FilePart;
use reqwest::blocking::{Request, Response};
use reqwest::header::HeaderMap;
use std::io::{self, Write};

pub fn parts(out: &mut dyn Write, url: &str, parts: &[FilePart]) -> io::Result<()> {
    writeln!(out, "* Uploading {} part(s) to {}", parts.len(), url)?;
    for (i, part) in parts.iter().enumerate() {
        writeln!(
            out,
            "* part {}: name=\"{}\"; filename=\"{}\"; content-type={}",
            i + 1,
            part.field,
            part.file_name().unwrap_or(""),
            part.content_type.as_deref().unwrap_or("(inferred)"),
        )?;
    }
    Ok(())
}

pub fn request(out: &mut dyn Write, request: &Request) -> io::Result<()> {
    let url = request.url();
    let target = match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    };
    writeln!(out, "> {} {} HTTP/1.1", request.method(), target)?;
    if let Some(host) = url.host_str() {
        match url.port_or_known_default() {
            Some(port) => writeln!(out, "> Host: {}:{}", host, port)?,
            None => writeln!(out, "> Host: {}", host)?,
        }
    }
    headers(out, '>', request.headers())?;
    writeln!(out, ">")
}

pub fn response(out: &mut dyn Write, response: &Response) -> io::Result<()> {
    writeln!(out, "< {:?} {}", response.version(), response.status())?;
    headers(out, '<', response.headers())?;
    writeln!(out, "<")
}

fn headers(out: &mut dyn Write, marker: char, headers: &HeaderMap) -> io::Result<()> {
    for (name, value) in headers {
        writeln!(
            out,
            "{} {}: {}",
            marker,
            name,
            value.to_str().unwrap_or("<non-ascii>")
        )?;
    }
    Ok(())
}
