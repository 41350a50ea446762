//! Raw clause templating.
//!
//! A raw template is scanned once, left to right, into text, column and
//! marker segments. `.Field` references are resolved while scanning (each
//! distinct name once); placeholder numbers are only handed out afterwards,
//! when the segments are rendered, so a bad reference never consumes a number.

use super::Placeholders;
use crate::error::{BuilderError, BuilderResult};
use crate::naming::quote_ident;
use crate::schema::Schema;
use crate::value::Arg;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'t> {
    Text(&'t str),
    /// Index into `RawTemplate::columns`.
    Column(usize),
    Marker,
}

/// A scanned raw template with every reference resolved.
#[derive(Debug)]
pub(crate) struct RawTemplate<'t> {
    segments: Vec<Segment<'t>>,
    columns: Vec<String>,
    markers: usize,
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl<'t> RawTemplate<'t> {
    pub(crate) fn parse(schema: &Schema, template: &'t str) -> BuilderResult<Self> {
        let bytes = template.as_bytes();
        let mut segments = Vec::new();
        let mut columns: Vec<String> = Vec::new();
        let mut resolved: HashMap<&'t str, usize> = HashMap::new();
        let mut markers = 0;

        let mut text_start = 0;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'.' => {
                    let start = i + 1;
                    let end = start + bytes[start..].iter().take_while(|&&b| is_ident_byte(b)).count();
                    if end == start {
                        i += 1;
                        continue;
                    }
                    if text_start < i {
                        segments.push(Segment::Text(&template[text_start..i]));
                    }

                    let field = &template[start..end];
                    let idx = match resolved.get(field) {
                        Some(&idx) => idx,
                        None => {
                            let column = schema
                                .field_to_column(field)
                                .ok_or_else(|| BuilderError::invalid_field("raw", field))?;
                            columns.push(quote_ident(column));
                            resolved.insert(field, columns.len() - 1);
                            columns.len() - 1
                        }
                    };
                    segments.push(Segment::Column(idx));
                    i = end;
                    text_start = end;
                }
                b'?' => {
                    if text_start < i {
                        segments.push(Segment::Text(&template[text_start..i]));
                    }
                    segments.push(Segment::Marker);
                    markers += 1;
                    i += 1;
                    text_start = i;
                }
                _ => i += 1,
            }
        }
        if text_start < bytes.len() {
            segments.push(Segment::Text(&template[text_start..]));
        }

        Ok(Self {
            segments,
            columns,
            markers,
        })
    }

    /// Render the template, numbering markers from `counter`.
    ///
    /// A scalar argument takes one number, a list one number per element.
    /// An empty list is rejected: it would render as `IN ()`.
    pub(crate) fn render(&self, args: &[Arg], counter: &mut Placeholders) -> BuilderResult<String> {
        if args.len() != self.markers {
            return Err(BuilderError::RawPlaceholders {
                op: "raw",
                markers: self.markers,
                args: args.len(),
            });
        }
        if let Some(index) = args.iter().position(|a| a.placeholder_count() == 0) {
            return Err(BuilderError::EmptyList { op: "raw", index });
        }

        let mut out = String::new();
        let mut args = args.iter();
        for segment in &self.segments {
            match *segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Column(idx) => out.push_str(&self.columns[idx]),
                Segment::Marker => match args.next() {
                    Some(arg) => out.push_str(&counter.run(arg.placeholder_count())),
                    None => break,
                },
            }
        }
        Ok(out)
    }
}
