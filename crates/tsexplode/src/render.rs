//! Serialization of flattened entries.
//!
//! [`OutputUnit`] holds one flattened entry. [`CodeWriter`] turns it into
//! source text with the block, array and union grammar of the output files:
//!
//! ```text
//! export interface Contact {
//!     id: string;
//!     tags: Array<{
//!         name: string,
//!     }>;
//! }
//! ```

use crate::flatten::{Rendered, RenderedProperty};

/// One flattened entry, ready to be written to its own sink.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputUnit {
    name: String,
    docs: Vec<String>,
    properties: Vec<RenderedProperty>,
}

impl OutputUnit {
    pub fn new(
        name: impl Into<String>,
        docs: Vec<String>,
        properties: Vec<RenderedProperty>,
    ) -> Self {
        Self {
            name: name.into(),
            docs,
            properties,
        }
    }

    /// Returns the entry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entry's doc comment lines, empty unless carried over.
    pub fn docs(&self) -> &[String] {
        &self.docs
    }

    /// Returns the effective properties, fully flattened.
    pub fn properties(&self) -> &[RenderedProperty] {
        &self.properties
    }

    /// Serialize the unit with `indent_width` spaces per nesting level.
    pub fn render(&self, indent_width: usize) -> String {
        let mut writer = CodeWriter::new(indent_width);
        for line in &self.docs {
            writer.write(line);
            writer.write_line();
        }

        writer.write("export interface ");
        writer.write(&self.name);
        writer.write(" ");
        writer.write_block(&self.properties, ";");
        writer.write_line();
        writer.finish()
    }
}

/// Indentation-aware text sink.
///
/// Indentation is emitted lazily on the first write of each line, so a line
/// that stays empty carries no trailing spaces.
#[derive(Debug)]
pub struct CodeWriter {
    output: String,
    indent_width: usize,
    indent_level: usize,
    at_line_start: bool,
}

impl CodeWriter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            output: String::new(),
            indent_width,
            indent_level: 0,
            at_line_start: true,
        }
    }

    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            let width = self.indent_width * self.indent_level;
            self.output.extend(std::iter::repeat_n(' ', width));
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }

    pub fn write_line(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Ends the current line unless nothing has been written on it yet.
    pub fn write_line_if_last_not(&mut self) {
        if !self.at_line_start {
            self.write_line();
        }
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn finish(self) -> String {
        self.output
    }

    /// Write a flattened type. Unions and intersections leave the writer at
    /// the start of a fresh line.
    pub fn write_rendered(&mut self, rendered: &Rendered) {
        match rendered {
            Rendered::Text(text) => self.write(text),
            Rendered::Array(element) => {
                self.write("Array<");
                self.write_rendered(element);
                self.write(">");
            }
            Rendered::Block(properties) => self.write_block(properties, ","),
            Rendered::Union(members) => self.write_members(members, "| "),
            Rendered::Intersection(members) => self.write_members(members, "& "),
        }
    }

    fn write_block(&mut self, properties: &[RenderedProperty], terminator: &str) {
        self.write("{");
        self.write_line();
        self.increase_indent();

        for property in properties {
            for line in &property.docs {
                self.write(line);
                self.write_line();
            }

            self.write(&property.name);
            if property.optional {
                self.write("?");
            }
            self.write(": ");
            self.write_rendered(&property.ty);
            self.write(terminator);
            self.write_line_if_last_not();
        }

        self.decrease_indent();
        self.write("}");
    }

    fn write_members(&mut self, members: &[Rendered], prefix: &str) {
        for member in members {
            self.write(prefix);
            self.write_rendered(member);
            self.write_line_if_last_not();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(name: &str, ty: Rendered) -> RenderedProperty {
        RenderedProperty {
            name: name.to_string(),
            optional: false,
            docs: vec![],
            ty,
        }
    }

    fn text(value: &str) -> Rendered {
        Rendered::Text(value.to_string())
    }

    #[test]
    fn test_nested_blocks_use_commas() {
        let unit = OutputUnit::new(
            "Contact",
            vec![],
            vec![
                property("id", text("string")),
                property(
                    "tags",
                    Rendered::Array(Box::new(Rendered::Block(vec![property(
                        "name",
                        text("string"),
                    )]))),
                ),
            ],
        );

        let expected = "\
export interface Contact {
    id: string;
    tags: Array<{
        name: string,
    }>;
}
";
        assert_eq!(unit.render(4), expected);
    }

    #[test]
    fn test_union_members_on_their_own_lines() {
        let mut optional = property("kind", Rendered::Union(vec![text("\"A\""), text("\"B\"")]));
        optional.optional = true;
        let unit = OutputUnit::new(
            "Choice",
            vec![],
            vec![
                optional,
                property("both", Rendered::Intersection(vec![text("X"), text("Y")])),
            ],
        );

        let expected = "\
export interface Choice {
  kind?: | \"A\"
  | \"B\"
  ;
  both: & X
  & Y
  ;
}
";
        assert_eq!(unit.render(2), expected);
    }

    #[test]
    fn test_docs_are_written_above_entry_and_properties() {
        let mut documented = property("id", text("string"));
        documented.docs = vec!["/** The identifier. */".to_string()];
        let unit = OutputUnit::new(
            "Doc",
            vec!["/**".to_string(), " * A doc.".to_string(), " */".to_string()],
            vec![documented],
        );

        let expected = "\
/**
 * A doc.
 */
export interface Doc {
    /** The identifier. */
    id: string;
}
";
        assert_eq!(unit.render(4), expected);
    }

    #[test]
    fn test_empty_block() {
        let unit = OutputUnit::new("Empty", vec![], vec![]);
        assert_eq!(unit.render(4), "export interface Empty {\n}\n");
    }

    #[test]
    fn test_writer_indents_lazily() {
        let mut writer = CodeWriter::new(4);
        writer.increase_indent();
        writer.write_line();
        writer.write("x");
        writer.write_line_if_last_not();
        writer.write_line_if_last_not();
        writer.decrease_indent();
        writer.decrease_indent();
        writer.write("y");
        assert_eq!(writer.finish(), "\n    x\ny");
    }
}
