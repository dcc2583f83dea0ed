//! Parsed documentation comments.
//!
//! JSDoc blocks (`/** ... */`) attached to declarations and properties are kept
//! as [`DocComment`] values. The raw text is split into an inner text with the
//! comment delimiters and leading asterisks removed, and a list of block tags
//! (`@name rest of line`).

/// A single block tag inside a documentation comment, such as `@document` or
/// `@deprecated use Other instead`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    name: String,
    text: String,
}

impl DocTag {
    /// Returns the tag name without the leading `@`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the text following the tag name, possibly spanning several lines.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A parsed JSDoc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    inner_lines: Vec<String>,
    description: String,
    tags: Vec<DocTag>,
}

impl DocComment {
    /// Parses a raw comment, with or without its `/**` and `*/` delimiters.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsexplode_core::docs::DocComment;
    ///
    /// let doc = DocComment::parse("/**\n * A contact.\n * @document\n */");
    /// assert_eq!(doc.description(), "A contact.");
    /// assert!(doc.has_tag("document"));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let body = raw.trim();
        let body = body.strip_prefix("/**").unwrap_or(body);
        let body = body.strip_suffix("*/").unwrap_or(body);

        let mut inner_lines: Vec<String> = body
            .lines()
            .map(|line| {
                let line = line.trim_start();
                let line = match line.strip_prefix('*') {
                    Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                    None => line,
                };
                line.trim_end().to_string()
            })
            .collect();

        while inner_lines.first().is_some_and(|line| line.is_empty()) {
            inner_lines.remove(0);
        }
        while inner_lines.last().is_some_and(|line| line.is_empty()) {
            inner_lines.pop();
        }

        let mut description = Vec::new();
        let mut tags: Vec<DocTag> = Vec::new();
        for line in &inner_lines {
            if let Some(tag) = line.strip_prefix('@') {
                let (name, text) = match tag.split_once(char::is_whitespace) {
                    Some((name, text)) => (name, text.trim()),
                    None => (tag, ""),
                };
                if !name.is_empty() {
                    tags.push(DocTag {
                        name: name.to_string(),
                        text: text.to_string(),
                    });
                    continue;
                }
            }

            match tags.last_mut() {
                Some(tag) => {
                    if !tag.text.is_empty() {
                        tag.text.push('\n');
                    }
                    tag.text.push_str(line.trim());
                }
                None => description.push(line.as_str()),
            }
        }

        Self {
            description: description.join("\n").trim().to_string(),
            inner_lines,
            tags,
        }
    }

    /// Returns the comment text without delimiters or leading asterisks.
    pub fn inner_text(&self) -> String {
        self.inner_lines.join("\n")
    }

    /// Returns the free text preceding the first block tag.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the block tags in source order.
    pub fn tags(&self) -> &[DocTag] {
        &self.tags
    }

    /// Returns `true` if any block tag has the given name.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }

    /// Returns the comment re-rendered as normalized source lines.
    ///
    /// Single-line comments stay on one line (`/** text */`); longer comments
    /// use the conventional leading-asterisk layout.
    pub fn render_lines(&self) -> Vec<String> {
        match self.inner_lines.as_slice() {
            [] => vec!["/** */".to_string()],
            [line] => vec![format!("/** {line} */")],
            lines => {
                let mut rendered = Vec::with_capacity(lines.len() + 2);
                rendered.push("/**".to_string());
                rendered.extend(lines.iter().map(|line| {
                    if line.is_empty() {
                        " *".to_string()
                    } else {
                        format!(" * {line}")
                    }
                }));
                rendered.push(" */".to_string());
                rendered
            }
        }
    }
}
