//! tsexplode - Flattens TypeScript interfaces into self-contained types.
//!
//! Interfaces marked with a doc tag (`@document` by default) are expanded
//! until no named type is left: referenced interfaces, aliases and object
//! types are inlined, enums become their literal values. Each marked
//! interface produces one output unit named `<Name>-doc`.

pub mod classify;
pub mod config;
pub mod discovery;
pub mod emit;
pub mod flatten;
pub mod project;
pub mod render;
pub mod resolve;
pub mod select;

mod error;

pub use tsexplode_core::{docs, graph, identifier, provider};

pub use error::ExplodeError;

use indexmap::IndexMap;
use log::{debug, info, trace};

use tsexplode_core::{graph::InterfaceDecl, provider::TypeGraphProvider};

use config::AppConfig;
use discovery::Discovery;
use emit::{Emitter, MemoryEmitter};
use flatten::Flattener;
use render::OutputUnit;
use select::select_entries;

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplodeSummary {
    written: Vec<String>,
    skipped: Vec<String>,
    duplicates: Vec<String>,
}

impl ExplodeSummary {
    /// Names of the units written, in entry order.
    pub fn written(&self) -> &[String] {
        &self.written
    }

    /// Names of the units left untouched because they already existed.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Interface names declared more than once.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

/// Builder for flattening marked interfaces.
///
/// # Examples
///
/// ```
/// use tsexplode::{Exploder, config::AppConfig};
///
/// let source = r#"
///     interface Tag { name: string }
///
///     /**
///      * @document
///      */
///     interface Post { title: string; tags: Tag[] }
/// "#;
///
/// let exploder = Exploder::new(AppConfig::default());
/// let units = exploder
///     .explode_sources(&[("post.ts", source)])
///     .expect("Failed to explode");
///
/// assert!(units["Post-doc"].contains("tags: Array<{"));
/// ```
#[derive(Debug, Default)]
pub struct Exploder {
    config: AppConfig,
}

impl Exploder {
    /// Create a new exploder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Flatten every marked interface of `provider` without writing anything.
    ///
    /// # Errors
    ///
    /// Returns the first flattening error; see [`Flattener::flatten`].
    pub fn output_units<P: TypeGraphProvider>(
        &self,
        provider: &P,
    ) -> Result<Vec<OutputUnit>, ExplodeError> {
        let discovery = Discovery::new(provider);
        let entries = select_entries(discovery.interfaces(), self.config.explode().marker_tag());
        let mut flattener = Flattener::new(provider, self.config.explode());

        entries
            .into_iter()
            .map(|entry| self.output_unit(&mut flattener, entry))
            .collect()
    }

    /// Flatten every marked interface of `provider` and write one unit per
    /// entry to `emitter`.
    ///
    /// Entries are processed in discovery order. With `overwrite` disabled,
    /// units already present in the sink are skipped. Units written before a
    /// failure stay written.
    ///
    /// # Errors
    ///
    /// Returns the first flattening error, or [`ExplodeError::Export`] if the
    /// sink fails.
    pub fn explode<P, E>(
        &self,
        provider: &P,
        emitter: &mut E,
    ) -> Result<ExplodeSummary, ExplodeError>
    where
        P: TypeGraphProvider,
        E: Emitter,
    {
        let output = self.config.output();
        let discovery = Discovery::new(provider);
        let entries = select_entries(discovery.interfaces(), self.config.explode().marker_tag());
        info!(entries = entries.len(); "Flattening entries");

        let mut flattener = Flattener::new(provider, self.config.explode());
        let mut summary = ExplodeSummary {
            duplicates: discovery.duplicates().to_vec(),
            ..ExplodeSummary::default()
        };

        for entry in entries {
            let unit_name = output.unit_name(&entry.name().to_string());
            if !output.overwrite() && emitter.exists(&unit_name) {
                info!(unit = unit_name.as_str(); "Output unit exists, skipping");
                summary.skipped.push(unit_name);
                continue;
            }

            let unit = self.output_unit(&mut flattener, entry)?;
            let contents = unit.render(output.indent_width());
            emitter.emit(&unit_name, &contents)?;

            info!(unit = unit_name.as_str(); "Output unit written");
            summary.written.push(unit_name);
        }

        Ok(summary)
    }

    /// Parse, elaborate and flatten in-memory `(name, source)` units.
    ///
    /// Returns the serialized units keyed by unit name, in entry order.
    /// `overwrite` has no effect since the sink starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`ExplodeError::Parse`] for invalid sources, otherwise the
    /// errors of [`Exploder::explode`].
    pub fn explode_sources<N, S>(
        &self,
        sources: &[(N, S)],
    ) -> Result<IndexMap<String, String>, ExplodeError>
    where
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let graph = tsexplode_parser::build_graph(sources).map_err(|err| {
            let (name, source) = sources
                .get(err.unit())
                .map(|(name, source)| (name.as_ref(), source.as_ref()))
                .unwrap_or_default();
            ExplodeError::new_parse_error(err.into_error(), source, name)
        })?;
        debug!(units = sources.len(); "Sources elaborated");

        let mut emitter = MemoryEmitter::new();
        self.explode(&graph, &mut emitter)?;
        Ok(emitter.into_units())
    }

    fn output_unit<'p, P: TypeGraphProvider>(
        &self,
        flattener: &mut Flattener<'p, P>,
        entry: &'p InterfaceDecl,
    ) -> Result<OutputUnit, ExplodeError> {
        trace!(entry = entry.name().to_string(); "Flattening entry");
        let properties = flattener.flatten_properties(entry)?;

        let docs = if self.config.explode().include_doc_comments() {
            entry.docs().iter().flat_map(|doc| doc.render_lines()).collect()
        } else {
            Vec::new()
        };

        Ok(OutputUnit::new(entry.name().to_string(), docs, properties))
    }
}
