//! Source unit collection and loading.
//!
//! A [`Project`] is the list of files a run starts from. Loading parses each
//! file and follows its relative imports, so declarations referenced from
//! other files are part of the type graph even when those files were not
//! named explicitly.

use std::{
    collections::{HashSet, VecDeque},
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use serde::Deserialize;

use tsexplode_core::graph::TypeGraph;
use tsexplode_parser::{elaborate, parse_module, parser_types::Module};

use crate::error::ExplodeError;

/// The initial set of source files of a run.
#[derive(Debug, Default, Clone)]
pub struct Project {
    files: Vec<PathBuf>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, or every `.ts` file below a directory in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`ExplodeError::Io`] if the path does not exist or a directory
    /// cannot be read.
    pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ExplodeError> {
        let path = path.as_ref();
        if path.is_dir() {
            let before = self.files.len();
            collect_sources(path, &mut self.files)?;
            debug!(
                dir = path.display().to_string(),
                files = self.files.len() - before;
                "Collected directory"
            );
        } else if path.is_file() {
            self.files.push(path.to_path_buf());
        } else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("input path `{}` does not exist", path.display()),
            )
            .into());
        }
        Ok(self)
    }

    /// Build a project from a tsconfig-style JSON file.
    ///
    /// `files` entries are added as files and `include` patterns are reduced
    /// to the directory before their first wildcard segment. Without either
    /// key, the tsconfig's own directory is used. Comments and trailing
    /// commas are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ExplodeError::Config`] for malformed JSON and
    /// [`ExplodeError::Io`] for missing files.
    pub fn from_tsconfig(path: impl AsRef<Path>) -> Result<Self, ExplodeError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading project configuration");

        let source = fs::read_to_string(path)?;
        let config = parse_tsconfig(&source)
            .map_err(|err| ExplodeError::Config(format!("{}: {err}", path.display())))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let mut project = Self::new();

        for file in &config.files {
            project.add_path(base.join(file))?;
        }
        for pattern in &config.include {
            let root = base.join(strip_wildcards(pattern));
            if root.exists() {
                project.add_path(root)?;
            } else {
                warn!(pattern = pattern.as_str(); "Include pattern matches nothing");
            }
        }
        if config.files.is_empty() && config.include.is_empty() {
            project.add_path(base)?;
        }

        Ok(project)
    }

    /// Returns the initial files in the order they were added.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Parse the initial files and, transitively, the files their relative
    /// imports resolve to. Each file is loaded once; imported files come
    /// after the initial ones.
    ///
    /// # Errors
    ///
    /// Returns [`ExplodeError::Io`] for unreadable files and
    /// [`ExplodeError::Parse`] for the first file that fails to parse.
    pub fn load(&self) -> Result<LoadedProject, ExplodeError> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<PathBuf> = self.files.iter().cloned().collect();
        let mut loaded = LoadedProject::default();

        while let Some(path) = queue.pop_front() {
            if !seen.insert(fs::canonicalize(&path)?) {
                continue;
            }

            let name = path.display().to_string();
            let source = fs::read_to_string(&path)?;
            let module = match parse_module(&source) {
                Ok(module) => module,
                Err(err) => return Err(ExplodeError::new_parse_error(err, source, name)),
            };

            for specifier in &module.imports {
                match resolve_import(&path, specifier.inner()) {
                    Some(dependency) => queue.push_back(dependency),
                    None => debug!(
                        unit = name.as_str(),
                        specifier = specifier.inner().as_str();
                        "Import not followed"
                    ),
                }
            }

            debug!(unit = name.as_str(), declarations = module.declarations.len(); "Unit loaded");
            loaded.units.push((name, module));
            loaded.sources.push(source);
        }

        info!(units = loaded.units.len(); "Project loaded");
        Ok(loaded)
    }
}

/// Parsed source units, in discovery order.
#[derive(Debug, Default)]
pub struct LoadedProject {
    units: Vec<(String, Module)>,
    sources: Vec<String>,
}

impl LoadedProject {
    /// Returns the unit names in discovery order.
    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Elaborate all units into one type graph.
    ///
    /// # Errors
    ///
    /// Returns [`ExplodeError::Parse`] carrying the source of the unit the
    /// diagnostics point into.
    pub fn type_graph(&self) -> Result<TypeGraph, ExplodeError> {
        elaborate(&self.units).map_err(|err| {
            let unit = err.unit();
            let name = self.units.get(unit).map(|(name, _)| name.as_str());
            let source = self.sources.get(unit).map(String::as_str);
            ExplodeError::new_parse_error(
                err.into_error(),
                source.unwrap_or_default(),
                name.unwrap_or_default(),
            )
        })
    }
}

/// Append every `.ts` file below `dir`, visiting entries in sorted order.
/// `node_modules` and hidden directories are skipped.
fn collect_sources(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ExplodeError> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    for path in entries {
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.') || name == "node_modules");
        if hidden {
            continue;
        }

        if path.is_dir() {
            collect_sources(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "ts") {
            files.push(path);
        }
    }
    Ok(())
}

/// Resolve a relative module specifier against the importing file.
///
/// Bare specifiers (packages) are not followed.
fn resolve_import(from: &Path, specifier: &str) -> Option<PathBuf> {
    if !(specifier.starts_with("./") || specifier.starts_with("../")) {
        return None;
    }

    let base = from.parent().unwrap_or_else(|| Path::new(".")).join(specifier);
    let mut candidates = Vec::new();
    if base.extension().is_some_and(|ext| ext == "ts") {
        candidates.push(base.clone());
    }
    if base.extension().is_some_and(|ext| ext == "js") {
        candidates.push(base.with_extension("ts"));
        candidates.push(base.with_extension("d.ts"));
    }
    candidates.push(with_suffix(&base, ".ts"));
    candidates.push(with_suffix(&base, ".d.ts"));
    candidates.push(base.join("index.ts"));
    candidates.push(base.join("index.d.ts"));

    candidates.into_iter().find(|candidate| candidate.is_file())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// The subset of a tsconfig file that selects source files.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfig {
    #[serde(default)]
    files: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
}

fn parse_tsconfig(source: &str) -> Result<TsConfig, serde_json::Error> {
    serde_json::from_str(&remove_trailing_commas(&strip_comments(source)))
}

/// Keep the path segments before the first one containing a wildcard.
fn strip_wildcards(pattern: &str) -> PathBuf {
    pattern
        .split('/')
        .take_while(|segment| !segment.contains(['*', '?']))
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Remove `//` and `/* */` comments outside string literals. Newlines inside
/// comments are kept so error positions stay meaningful.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match (ch, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                for rest in chars.by_ref() {
                    if rest == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for rest in chars.by_ref() {
                    if rest == '\n' {
                        out.push('\n');
                    }
                    if previous == '*' && rest == '/' {
                        break;
                    }
                    previous = rest;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Drop commas that are followed only by whitespace before `}` or `]`.
fn remove_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escape = false;

    for (index, &ch) in chars.iter().enumerate() {
        if in_string {
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
        } else if ch == ',' {
            let next = chars[index + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(ch);
    }

    out
}
