//! Streaming reader for feed documents.
//!
//! The document shape is `…<records><item><Field>text</Field>…</item>…</records>…`.
//! Only the first `records` element that is the document root or one of its
//! direct children is read. Everything outside it is ignored, as is anything
//! nested deeper than an item's direct children.
//!
//! The character encoding comes from the XML declaration (UTF-8 when absent).

use quick_xml::events::{BytesStart, Event};

use crate::{
  FeedItem,
  error::{Error, Result},
};

/// The field element currently being read.
struct OpenField {
  name:   String,
  text:   String,
  /// Set once a nested child element starts; later text is not part of the
  /// field's own text.
  sealed: bool,
}

/// Parse a feed document into its items, in document order.
///
/// Fails on malformed XML and on documents without a top-level `records`
/// element. An empty `records` element yields an empty list. When an item
/// repeats a field, the first occurrence wins.
pub fn parse_document(xml: &[u8]) -> Result<Vec<FeedItem>> {
  let mut reader = quick_xml::Reader::from_reader(xml);
  reader.config_mut().trim_text(true);

  let mut depth = 0usize;
  let mut records_depth: Option<usize> = None;
  let mut seen_records = false;
  let mut current: Option<FeedItem> = None;
  let mut field: Option<OpenField> = None;
  let mut items = Vec::new();
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e)) => {
        depth += 1;
        let name = element_name(e);
        match records_depth {
          // Root (depth 1) or a direct child of the root (depth 2).
          None if !seen_records && depth <= 2 && name == "records" => {
            records_depth = Some(depth);
            seen_records = true;
          }
          Some(r) if depth == r + 1 && name == "item" => {
            current = Some(FeedItem::default());
          }
          Some(r) if depth == r + 2 && current.is_some() => {
            field = Some(OpenField { name, text: String::new(), sealed: false });
          }
          Some(r) if depth > r + 2 => {
            if let Some(f) = field.as_mut() {
              f.sealed = true;
            }
          }
          _ => {}
        }
      }
      Ok(Event::Empty(ref e)) => {
        let name = element_name(e);
        match records_depth {
          None if !seen_records && depth <= 1 && name == "records" => {
            seen_records = true;
          }
          Some(r) if depth == r && name == "item" => {
            items.push(FeedItem::default());
          }
          Some(r) if depth == r + 1 => {
            if let Some(item) = current.as_mut() {
              item.insert(name, String::new());
            }
          }
          Some(r) if depth >= r + 2 => {
            if let Some(f) = field.as_mut() {
              f.sealed = true;
            }
          }
          _ => {}
        }
      }
      Ok(Event::Text(ref e)) => {
        if let (Some(r), Some(f)) = (records_depth, field.as_mut())
          && depth == r + 2
          && !f.sealed
        {
          let unescaped = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
          f.text.push_str(&unescaped);
        }
      }
      Ok(Event::CData(ref e)) => {
        if let (Some(r), Some(f)) = (records_depth, field.as_mut())
          && depth == r + 2
          && !f.sealed
        {
          let decoded = reader
            .decoder()
            .decode(e)
            .map_err(|e| Error::Xml(e.to_string()))?;
          f.text.push_str(&decoded);
        }
      }
      Ok(Event::End(_)) => {
        if let Some(r) = records_depth {
          if depth == r + 2 {
            if let (Some(item), Some(f)) = (current.as_mut(), field.take()) {
              item.insert(f.name, f.text);
            }
          } else if depth == r + 1 {
            if let Some(item) = current.take() {
              items.push(item);
            }
          } else if depth == r {
            records_depth = None;
          }
        }
        depth = depth.saturating_sub(1);
      }
      Ok(Event::Eof) => break,
      Err(e) => return Err(Error::Xml(e.to_string())),
      _ => {}
    }
    buf.clear();
  }

  if depth != 0 {
    return Err(Error::Xml(format!(
      "unexpected end of document with {depth} unclosed element(s)"
    )));
  }
  if !seen_records {
    return Err(Error::MissingRecords);
  }

  Ok(items)
}

fn element_name(e: &BytesStart<'_>) -> String {
  let name = e.name();
  String::from_utf8_lossy(local_name(name.as_ref())).into_owned()
}

fn local_name(name: &[u8]) -> &[u8] {
  // strip "prefix:" if present
  if let Some(pos) = name.iter().rposition(|&b| b == b':') {
    &name[pos + 1..]
  } else {
    name
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
