use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::ParseError;

/// Parses a run of root-less XML fragments such as
/// `<status>success</status><ipaddress>10.0.0.1</ipaddress>`.
///
/// Returns the text content of each top-level element. Empty elements are
/// left out and a repeated tag keeps its last value. A reply with no elements
/// at all (plain text, an empty body) or a top-level element holding nested
/// elements is rejected.
pub fn parse_fragments(text: &str) -> Result<HashMap<String, String>, ParseError> {
    let wrapped = format!("<root>{}</root>", text.trim());
    let mut reader = Reader::from_str(&wrapped);
    reader.trim_text(true);

    let mut fields = HashMap::new();
    let mut depth = 0usize;
    let mut current: Option<(String, String)> = None;
    let mut elements = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                if depth == 2 {
                    elements += 1;
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    current = Some((name, String::new()));
                } else if depth == 3 {
                    return Err(nested_element(current.as_ref()));
                }
            }
            Ok(Event::Empty(e)) => {
                if depth == 1 {
                    elements += 1;
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    fields.remove(&name);
                } else if depth == 2 {
                    return Err(nested_element(current.as_ref()));
                }
            }
            Ok(Event::Text(t)) if depth == 2 => {
                let text = t.unescape().map_err(|e| ParseError::Xml(e.to_string()))?;
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&text);
                }
            }
            Ok(Event::CData(c)) if depth == 2 => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                if depth == 2 {
                    if let Some((name, value)) = current.take() {
                        if value.is_empty() {
                            fields.remove(&name);
                        } else {
                            fields.insert(name, value);
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::Xml(format!(
                    "at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            Ok(_) => {}
        }
    }

    if elements == 0 {
        return Err(ParseError::Xml(format!(
            "no elements in response {:?}",
            truncate(text.trim(), 64)
        )));
    }

    Ok(fields)
}

fn nested_element(current: Option<&(String, String)>) -> ParseError {
    let name = current.map(|(name, _)| name.as_str()).unwrap_or_default();
    ParseError::Xml(format!("<{name}> contains nested elements"))
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
