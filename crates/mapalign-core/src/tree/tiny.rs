//! Tiny v2 reader and writer.
//!
//! Tiny v2 is a tab-separated, indentation-structured text format:
//!
//! ```text
//! tiny	2	0	source	mojang	modifiers
//! 	escaped-names
//! c	a	net/minecraft/Foo	1
//! 	f	I	b	count	2
//! 	m	()V	c	tick	1
//! 		p	1	d	delta
//! ```
//!
//! Only classes, fields and methods are loaded. Parameter, local variable and
//! comment lines are accepted and skipped. An empty column means the element
//! has no name in that namespace.

use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use super::{ClassId, ElementMapping, MappingTree, TreeError};

const HEADER_MAGIC: &str = "tiny";
const MAJOR_VERSION: &str = "2";
const MINOR_VERSION: &str = "0";
const ESCAPED_NAMES_PROPERTY: &str = "escaped-names";

/// Errors raised while reading Tiny v2 input.
#[derive(Debug, Error)]
pub enum TinyError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The first line is not a valid Tiny v2 header.
    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    /// A content line could not be understood.
    #[error("line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },

    /// The header declares an invalid namespace set.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

// ============================================================================
// Reading
// ============================================================================

/// Read a tree from a file.
pub fn read_path(path: &Path) -> Result<MappingTree, TinyError> {
    let file = fs::File::open(path)?;
    read(BufReader::new(file))
}

/// Read a tree from a string.
pub fn read_str(content: &str) -> Result<MappingTree, TinyError> {
    read(content.as_bytes())
}

/// Read a tree from Tiny v2 text.
pub fn read(reader: impl BufRead) -> Result<MappingTree, TinyError> {
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(TinyError::InvalidHeader {
                reason: "empty input".to_string(),
            })
        }
    };
    let header = header.trim_end_matches('\r');
    let columns: Vec<&str> = header.split('\t').collect();
    if columns.len() < 4 || columns[0] != HEADER_MAGIC || columns[1] != MAJOR_VERSION {
        return Err(TinyError::InvalidHeader {
            reason: format!("expected 'tiny 2 <minor> <namespaces...>', got '{}'", header),
        });
    }
    let mut tree = MappingTree::new(columns[3], columns[4..].iter().copied())?;
    let dst_count = tree.dst_namespaces().len();

    let mut escaped = false;
    let mut in_header = true;
    let mut current_class: Option<ClassId> = None;

    for (index, line) in lines.enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        let line_no = index + 2;
        if line.is_empty() {
            continue;
        }

        let depth = line.bytes().take_while(|&b| b == b'\t').count();
        let columns: Vec<&str> = line[depth..].split('\t').collect();
        let invalid = |reason: String| TinyError::InvalidLine {
            line: line_no,
            reason,
        };

        if depth == 1 && in_header && !matches!(columns[0], "c" | "f" | "m") {
            if columns[0] == ESCAPED_NAMES_PROPERTY {
                escaped = true;
            }
            continue;
        }

        match (depth, columns[0]) {
            (0, "c") => {
                in_header = false;
                let src = match columns.get(1) {
                    Some(src) if !src.is_empty() => unescape(src, escaped).map_err(invalid)?,
                    _ => return Err(invalid("class line without source name".to_string())),
                };
                let names = dst_names(&columns[2..], dst_count, escaped).map_err(invalid)?;
                let id = tree.add_class(&src);
                if let Some(class) = tree.class_mut(id) {
                    apply_names(class, names);
                }
                current_class = Some(id);
            }
            (1, kind @ ("f" | "m")) => {
                let Some(owner) = current_class else {
                    return Err(invalid("member line outside of a class".to_string()));
                };
                if columns.len() < 3 || columns[2].is_empty() {
                    return Err(invalid(
                        "member line without descriptor and source name".to_string(),
                    ));
                }
                let desc = unescape(columns[1], escaped).map_err(invalid)?;
                let src = unescape(columns[2], escaped).map_err(invalid)?;
                let names = dst_names(&columns[3..], dst_count, escaped).map_err(invalid)?;
                if let Some(class) = tree.class_mut(owner) {
                    if kind == "f" {
                        apply_names(class.add_field(&src, &desc), names);
                    } else {
                        apply_names(class.add_method(&src, &desc), names);
                    }
                }
            }
            // class comments, parameters, local variables and their comments
            (1, "c") | (2.., _) => {}
            _ => {
                return Err(invalid(format!(
                    "unexpected '{}' entry at depth {}",
                    columns[0], depth
                )))
            }
        }
    }

    Ok(tree)
}

/// Decode the destination name columns of an entry.
fn dst_names(
    columns: &[&str],
    dst_count: usize,
    escaped: bool,
) -> Result<Vec<Option<String>>, String> {
    if columns.len() > dst_count {
        return Err(format!(
            "{} destination names for {} namespaces",
            columns.len(),
            dst_count
        ));
    }
    columns
        .iter()
        .map(|name| {
            if name.is_empty() {
                Ok(None)
            } else {
                unescape(name, escaped).map(Some)
            }
        })
        .collect()
}

fn apply_names(element: &mut impl ElementMapping, names: Vec<Option<String>>) {
    *element.dst_names_mut() = names;
}

fn unescape(value: &str, escaped: bool) -> Result<String, String> {
    if !escaped || !value.contains('\\') {
        return Ok(value.to_string());
    }
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => result.push('\\'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('0') => result.push('\0'),
            Some(other) => return Err(format!("invalid escape sequence '\\{}'", other)),
            None => return Err("dangling escape at end of name".to_string()),
        }
    }
    Ok(result)
}

// ============================================================================
// Writing
// ============================================================================

/// Write a tree to a file.
pub fn write_path(tree: &MappingTree, path: &Path) -> io::Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(tree, &mut writer)?;
    writer.flush()
}

/// Write a tree to a string.
pub fn write_string(tree: &MappingTree) -> String {
    let mut buffer = Vec::new();
    // writing to a Vec cannot fail
    let _ = write(tree, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Write a tree as Tiny v2 text.
///
/// The `escaped-names` property is emitted only when some name needs it.
pub fn write(tree: &MappingTree, writer: &mut impl Write) -> io::Result<()> {
    let escaped = needs_escaping(tree);

    write!(
        writer,
        "{}\t{}\t{}\t{}",
        HEADER_MAGIC,
        MAJOR_VERSION,
        MINOR_VERSION,
        tree.src_namespace()
    )?;
    for ns in tree.dst_namespaces() {
        write!(writer, "\t{}", ns)?;
    }
    writeln!(writer)?;
    if escaped {
        writeln!(writer, "\t{}", ESCAPED_NAMES_PROPERTY)?;
    }

    let dst_count = tree.dst_namespaces().len();
    for (_, class) in tree.classes() {
        write!(writer, "c\t{}", escape(class.src_name(), escaped))?;
        write_names(writer, class, dst_count, escaped)?;

        for field in class.fields() {
            write!(
                writer,
                "\tf\t{}\t{}",
                escape(field.src_desc(), escaped),
                escape(field.src_name(), escaped)
            )?;
            write_names(writer, field, dst_count, escaped)?;
        }
        for method in class.methods() {
            write!(
                writer,
                "\tm\t{}\t{}",
                escape(method.src_desc(), escaped),
                escape(method.src_name(), escaped)
            )?;
            write_names(writer, method, dst_count, escaped)?;
        }
    }
    Ok(())
}

fn write_names(
    writer: &mut impl Write,
    element: &impl ElementMapping,
    dst_count: usize,
    escaped: bool,
) -> io::Result<()> {
    let names = element.dst_names();
    for index in 0..dst_count {
        let name = names.get(index).and_then(|n| n.as_deref()).unwrap_or("");
        write!(writer, "\t{}", escape(name, escaped))?;
    }
    writeln!(writer)
}

fn needs_escaping(tree: &MappingTree) -> bool {
    fn special(value: &str) -> bool {
        value.contains(['\\', '\n', '\r', '\t', '\0'])
    }
    fn element_special(element: &impl ElementMapping) -> bool {
        special(element.src_name()) || element.dst_names().iter().flatten().any(|n| special(n))
    }

    tree.classes().any(|(_, class)| {
        element_special(class)
            || class
                .fields()
                .iter()
                .any(|f| element_special(f) || special(f.src_desc()))
            || class
                .methods()
                .iter()
                .any(|m| element_special(m) || special(m.src_desc()))
    })
}

fn escape(value: &str, escaped: bool) -> String {
    if !escaped {
        return value.to_string();
    }
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => result.push_str("\\0"),
            other => result.push(other),
        }
    }
    result
}

// ============================================================================
// Tests
// ============================================================================
