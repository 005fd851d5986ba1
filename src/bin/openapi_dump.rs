#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
//! Print the OpenAPI document as JSON.
//!
//! # Examples
//! ```sh
//! cargo run --quiet --bin openapi-dump > openapi.json
//! ```

use parsehub_backend::ApiDoc;
use serde_json::to_writer_pretty;
use std::io::{self, BufWriter, Write};
use utoipa::OpenApi;

/// Write the OpenAPI document to stdout, two-space indented to match repo style.
fn main() -> io::Result<()> {
    let doc = ApiDoc::openapi();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    to_writer_pretty(&mut out, &doc)
        .map_err(|e| io::Error::other(format!("serialising OpenAPI document: {e}")))?;
    writeln!(out)?;
    Ok(())
}
