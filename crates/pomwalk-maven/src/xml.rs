//! POM XML parsing into the generic [`PomMap`] tree.
//!
//! Every element becomes a sequence under its parent, text-only elements
//! become [`PomValue::Text`], and namespace prefixes are dropped. Attributes
//! and text mixed in with child elements are ignored.

use quick_xml::events::Event;
use quick_xml::Reader;

use pomwalk_core::tree::{PomMap, PomValue};
use pomwalk_util::errors::PomwalkError;

/// An element that has been opened but not yet closed.
struct Frame {
    name: String,
    children: PomMap,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: PomMap::new(),
            text: String::new(),
        }
    }

    fn into_value(self) -> (String, PomValue) {
        let value = if self.children.is_empty() {
            PomValue::Text(self.text)
        } else {
            PomValue::Node(self.children)
        };
        (self.name, value)
    }
}

/// Parse POM XML into a tree rooted above the document element, so a POM
/// yields `{ project: [ ... ] }`.
pub fn parse_tree(xml: &str) -> miette::Result<PomMap> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<PomMap> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                stack.push(Frame::new(name));
            }
            Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                attach(&mut stack, &mut root, name, PomValue::Text(String::new()))?;
            }
            Ok(Event::Text(ref e)) => {
                if let Some(frame) = stack.last_mut() {
                    let text = e.unescape().map_err(|err| malformed(&err))?;
                    frame.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let Some(frame) = stack.pop() else {
                    return Err(malformed(&"unexpected closing tag"));
                };
                let (name, value) = frame.into_value();
                attach(&mut stack, &mut root, name, value)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(malformed(&e)),
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(&format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| malformed(&"document has no root element"))
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<PomMap>,
    name: String,
    value: PomValue,
) -> miette::Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(name, value);
            Ok(())
        }
        None if root.is_none() => {
            let mut map = PomMap::new();
            map.push(name, value);
            *root = Some(map);
            Ok(())
        }
        None => Err(malformed(&"multiple root elements")),
    }
}

fn malformed(detail: &dyn std::fmt::Display) -> miette::Report {
    PomwalkError::Manifest {
        message: format!("Failed to parse POM XML: {detail}"),
    }
    .into()
}
