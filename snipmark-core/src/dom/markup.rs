//! Build a [`Document`] from a plain-text page.
//!
//! Blank lines separate blocks. Within a block, `#`..`######` lines become
//! headings, `- ` lines list items, `> ` lines a quote; everything else is
//! paragraph text.

use super::document::Document;
use super::NodeId;

#[derive(Debug, PartialEq, Eq)]
enum Pending {
    None,
    Paragraph(Vec<String>),
    Quote(Vec<String>),
    List(NodeId),
}

impl Document {
    /// Parse a plain-text page into a document.
    pub fn from_text(title: impl Into<String>, text: &str) -> Self {
        let mut doc = Document::new(title);
        let body = doc.body();
        let mut pending = Pending::None;

        for raw in text.lines() {
            let line = raw.trim_end();
            if line.trim().is_empty() {
                doc.flush(body, &mut pending);
                continue;
            }

            if let Some((level, heading)) = heading(line) {
                doc.flush(body, &mut pending);
                doc.append_block(body, &format!("h{level}"), heading);
            } else if let Some(item) = line.strip_prefix("- ") {
                let list = match pending {
                    Pending::List(list) => list,
                    _ => {
                        doc.flush(body, &mut pending);
                        doc.append_element(body, "ul")
                    }
                };
                doc.append_block(list, "li", item.trim());
                pending = Pending::List(list);
            } else if let Some(quote) = line.strip_prefix("> ") {
                match &mut pending {
                    Pending::Quote(lines) => lines.push(quote.to_string()),
                    _ => {
                        doc.flush(body, &mut pending);
                        pending = Pending::Quote(vec![quote.to_string()]);
                    }
                }
            } else {
                match &mut pending {
                    Pending::Paragraph(lines) => lines.push(line.to_string()),
                    _ => {
                        doc.flush(body, &mut pending);
                        pending = Pending::Paragraph(vec![line.to_string()]);
                    }
                }
            }
        }
        doc.flush(body, &mut pending);
        doc
    }

    fn flush(&mut self, body: NodeId, pending: &mut Pending) {
        match std::mem::replace(pending, Pending::None) {
            Pending::Paragraph(lines) => {
                self.append_block(body, "p", &lines.join("\n"));
            }
            Pending::Quote(lines) => {
                self.append_block(body, "blockquote", &lines.join("\n"));
            }
            Pending::List(_) | Pending::None => {}
        }
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = line[level..].strip_prefix(' ')?;
    Some((level, rest.trim()))
}
