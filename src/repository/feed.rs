// src/repository/feed.rs

//! Streaming scanner for Guvnor package and asset feeds
//!
//! The feeds are scanned in a single forward pass over start elements; no
//! document tree is built. Each scanner keeps its in-progress record in a
//! small state struct that is flushed when a record boundary is seen and once
//! more at end of stream.

use std::mem;

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

use super::metadata::{Package, is_process_format};

/// Feed scanning failures
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(String),
}

/// In-progress package record
#[derive(Default)]
struct PackageScan {
    current: Option<Package>,
    packages: Vec<Package>,
}

impl PackageScan {
    fn begin(&mut self) {
        self.flush();
        self.current = Some(Package::default());
    }

    fn flush(&mut self) {
        if let Some(pkg) = self.current.take() {
            if !pkg.is_feed_sentinel() {
                self.packages.push(pkg);
            }
        }
    }

    fn set_field(&mut self, field: &[u8], text: String) {
        let Some(pkg) = self.current.as_mut() else {
            return;
        };
        match field {
            b"uuid" => pkg.uuid = text,
            b"title" => pkg.title = text,
            b"archived" => pkg.archived = text.trim().eq_ignore_ascii_case("true"),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Package> {
        self.flush();
        self.packages
    }
}

/// Transient asset fields, reset whenever a process is emitted
#[derive(Default)]
struct ProcessScan {
    format: String,
    title: String,
    processes: Vec<String>,
}

impl ProcessScan {
    fn flush(&mut self) {
        if is_process_format(&self.format) {
            self.processes.push(mem::take(&mut self.title));
            self.format.clear();
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.processes
    }
}

/// Scan a `/rest/packages/` feed into packages, in document order
///
/// Every `package` element starts a new record; `uuid`, `title` and
/// `archived` elements fill the current one. Records titled `Packages`
/// (any case) are feed wrappers and are dropped.
pub fn scan_packages(xml: &str) -> Result<Vec<Package>, ScanError> {
    let mut reader = Reader::from_str(xml);
    let mut scan = PackageScan::default();

    loop {
        let event = reader.read_event().map_err(|e| xml_error(&reader, e))?;
        match event {
            Event::Start(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"package" => scan.begin(),
                    field @ (b"uuid" | b"title" | b"archived") => {
                        let text = read_element_text(&mut reader, field)?;
                        scan.set_field(field, text);
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => match e.local_name().as_ref() {
                b"package" => scan.begin(),
                field => scan.set_field(field, String::new()),
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(scan.finish())
}

/// Scan a `/rest/packages/{pkg}/assets/` feed for process titles
///
/// Tracks the most recent `format` and `title`; at each `asset` boundary
/// and at end of stream a `bpmn`/`bpmn2` format emits the title.
pub fn scan_processes(xml: &str) -> Result<Vec<String>, ScanError> {
    let mut reader = Reader::from_str(xml);
    let mut scan = ProcessScan::default();

    loop {
        let event = reader.read_event().map_err(|e| xml_error(&reader, e))?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"format" => scan.format = read_element_text(&mut reader, b"format")?,
                b"title" => scan.title = read_element_text(&mut reader, b"title")?,
                b"asset" => scan.flush(),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"format" => scan.format.clear(),
                b"title" => scan.title.clear(),
                b"asset" => scan.flush(),
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"asset" => scan.flush(),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(scan.finish())
}

/// Whether any `format` element in an asset document equals `wanted`
/// (case-insensitive, surrounding whitespace ignored)
pub fn has_format(xml: &str, wanted: &str) -> Result<bool, ScanError> {
    let mut reader = Reader::from_str(xml);

    loop {
        let event = reader.read_event().map_err(|e| xml_error(&reader, e))?;
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"format" => {
                let text = read_element_text(&mut reader, b"format")?;
                if text.trim().eq_ignore_ascii_case(wanted) {
                    return Ok(true);
                }
            }
            Event::Eof => return Ok(false),
            _ => {}
        }
    }
}

/// Collect the text of the element just opened, including nested elements,
/// and leave the reader after its end tag.
fn read_element_text(reader: &mut Reader<&[u8]>, element: &[u8]) -> Result<String, ScanError> {
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| xml_error(reader, e))?;
        match event {
            Event::Text(t) => {
                let unescaped = t.unescape().map_err(|e| xml_error(reader, e))?;
                text.push_str(&unescaped);
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    return Ok(text);
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(ScanError::UnexpectedEof(
                    String::from_utf8_lossy(element).into_owned(),
                ));
            }
            _ => {}
        }
    }
}

fn xml_error(reader: &Reader<&[u8]>, source: quick_xml::Error) -> ScanError {
    ScanError::Xml {
        position: reader.buffer_position(),
        source,
    }
}
