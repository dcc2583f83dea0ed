//! # tsexplode parser
//!
//! TypeScript declaration front end for tsexplode. This crate turns source
//! text into the [`TypeGraph`] the flattener works on.
//!
//! ## Usage
//!
//! ```
//! # use tsexplode_parser::{build_graph, error::UnitError};
//! use tsexplode_core::provider::TypeGraphProvider;
//!
//! fn main() -> Result<(), UnitError> {
//!     let source = r#"
//!         enum PhoneType { CELL = "CELL", HOME = "HOME" }
//!         interface Phone { kind: PhoneType; number: string; }
//!     "#;
//!
//!     let graph = build_graph(&[("phone.ts", source)])?;
//!     assert_eq!(graph.interfaces().len(), 1);
//!     Ok(())
//! }
//! ```

mod elaborate;
pub mod error;
mod lexer;
mod parser;
pub mod parser_types;
mod span;
mod tokens;

pub use elaborate::elaborate;
pub use span::{Span, Spanned};

use log::debug;

use tsexplode_core::graph::TypeGraph;

use error::{ParseError, UnitError};
use parser_types::Module;

/// Parse one source unit into a syntax tree.
///
/// The pipeline is:
///
/// 1. **Tokenize** - Convert source text to tokens, collecting every lexer
///    diagnostic
/// 2. **Parse** - Build the syntax tree, stopping at the first syntax error
///
/// # Errors
///
/// Returns a [`ParseError`] whose diagnostics carry spans into `source`.
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    // Step 1: Tokenize
    let tokens = lexer::tokenize(source)?;

    // Step 2: Parse
    let module = parser::build_module(&tokens)?;

    debug!(
        declarations = module.declarations.len(),
        imports = module.imports.len();
        "Parsed module"
    );
    Ok(module)
}

/// Parse and elaborate a set of `(name, source)` units into one type graph.
///
/// # Errors
///
/// Returns a [`UnitError`] naming the index of the unit whose diagnostics it
/// carries.
pub fn build_graph<N, S>(sources: &[(N, S)]) -> Result<TypeGraph, UnitError>
where
    N: AsRef<str>,
    S: AsRef<str>,
{
    let units = sources
        .iter()
        .enumerate()
        .map(|(index, (name, source))| {
            parse_module(source.as_ref())
                .map(|module| (name.as_ref().to_string(), module))
                .map_err(|error| UnitError::new(index, error))
        })
        .collect::<Result<Vec<_>, _>>()?;

    elaborate(&units)
}
