//! Integration tests for the Exploder API
//!
//! These tests run complete sources through parsing, flattening and
//! serialization and compare the written units.

use std::fs;

use proptest::prelude::*;

use tsexplode::{
    ExplodeError, Exploder,
    config::{AppConfig, EnumMode, ExplodeConfig, OutputConfig},
    emit::{Emitter, FileEmitter, MemoryEmitter},
};

const CONTACT: &str = r#"
type UUID = string

// tslint:disable-next-line
type Tag = {
  name: string
}

enum PhoneType {
  CALL = 'CELL',
  BUSINESS = 'BUSINESS',
  HOME = 'HOME'
}

interface Phone {
  type: PhoneType
  number: number
}

/**
 * @document
 */
interface Contact {
  id: UUID
  tags: Tag[]
  phones: Phone[]

  name: string
}
"#;

fn explode_one(config: AppConfig, source: &str, unit: &str) -> String {
    let units = Exploder::new(config)
        .explode_sources(&[("input.ts", source)])
        .expect("Failed to explode sources");
    units
        .get(unit)
        .cloned()
        .unwrap_or_else(|| panic!("Missing unit {unit}, got {:?}", units.keys()))
}

fn with_explode(explode: ExplodeConfig) -> AppConfig {
    AppConfig::new(explode, OutputConfig::default())
}

#[test]
fn test_contact_end_to_end() {
    let expected = r#"export interface Contact {
    id: string;
    tags: Array<{
        name: string,
    }>;
    phones: Array<{
        type: | "CELL"
        | "BUSINESS"
        | "HOME"
        ,
        number: number,
    }>;
    name: string;
}
"#;

    assert_eq!(explode_one(AppConfig::default(), CONTACT, "Contact-doc"), expected);
}

#[test]
fn test_contact_enum_names() {
    let config = with_explode(ExplodeConfig::default().with_enum_mode(EnumMode::Name));
    let output = explode_one(config, CONTACT, "Contact-doc");

    assert!(output.contains("type: | CALL\n        | BUSINESS\n        | HOME\n"));
    assert!(!output.contains("\"CELL\""));
}

#[test]
fn test_only_marked_entries_produce_units() {
    let units = Exploder::default()
        .explode_sources(&[("input.ts", CONTACT)])
        .expect("Failed to explode sources");

    let names: Vec<&String> = units.keys().collect();
    assert_eq!(names, vec!["Contact-doc"]);
}

#[test]
fn test_inherited_properties_follow_own() {
    let source = r#"
        interface A { id: string }

        /**
         * @document
         */
        interface B extends A { name: string }
    "#;

    let expected = "export interface B {\n    name: string;\n    id: string;\n}\n";
    assert_eq!(explode_one(AppConfig::default(), source, "B-doc"), expected);
}

#[test]
fn test_entries_across_units_share_declarations() {
    let units = Exploder::default()
        .explode_sources(&[
            ("tag.ts", "export interface Tag { name: string }"),
            (
                "post.ts",
                "/**\n * @document\n */\nexport interface Post { tag?: Tag }",
            ),
        ])
        .expect("Failed to explode sources");

    assert_eq!(
        units["Post-doc"],
        "export interface Post {\n    tag?: {\n        name: string,\n    };\n}\n"
    );
}

#[test]
fn test_doc_comments_are_carried_when_enabled() {
    let source = r#"
        /**
         * A person.
         * @document
         */
        interface Person {
            /** Display name. */
            name: string;
        }
    "#;

    let config = with_explode(ExplodeConfig::default().with_doc_comments(true));
    let expected = "\
/**
 * A person.
 * @document
 */
export interface Person {
    /** Display name. */
    name: string;
}
";
    assert_eq!(explode_one(config, source, "Person-doc"), expected);
}

#[test]
fn test_custom_output_layout() {
    let config = AppConfig::new(
        ExplodeConfig::default().with_marker_tag("flatten"),
        OutputConfig::default()
            .with_indent_width(2)
            .with_file_suffix(".flat"),
    );
    let source = r#"
        interface Inner { value: number }
        /**
         * @flatten
         */
        interface Outer { inner: Inner }
    "#;

    let expected = "export interface Outer {\n  inner: {\n    value: number,\n  };\n}\n";
    assert_eq!(explode_one(config, source, "Outer.flat"), expected);
}

#[test]
fn test_nullable_enum_renders_one_flat_union() {
    let source = r#"
enum P { A = 'a', B = 'b' }

/** @document */
interface X {
  p: P | null
}
"#;
    let expected = r#"export interface X {
    p: | "a"
    | "b"
    | null
    ;
}
"#;

    assert_eq!(explode_one(AppConfig::default(), source, "X-doc"), expected);
}

#[test]
fn test_generic_arguments_are_substituted() {
    let source = r#"
interface G<T> { v: T }

/** @document */
interface X {
  g: G<string>
}
"#;
    let expected = r#"export interface X {
    g: {
        v: string,
    };
}
"#;

    assert_eq!(explode_one(AppConfig::default(), source, "X-doc"), expected);
}

#[test]
fn test_cycle_aborts_the_run() {
    let source = r#"
        /**
         * @document
         */
        interface TreeNode { children: TreeNode[] }
    "#;

    let err = Exploder::default()
        .explode_sources(&[("tree.ts", source)])
        .expect_err("cyclic input should fail");
    assert!(matches!(err, ExplodeError::CyclicTypeReference { .. }));
    assert_eq!(err.to_string(), "Cyclic type reference: TreeNode -> TreeNode");
}

#[test]
fn test_parse_error_names_the_unit() {
    let err = Exploder::default()
        .explode_sources(&[("ok.ts", "interface Ok {}"), ("bad.ts", "interface Bad {")])
        .expect_err("invalid source should fail");

    assert!(matches!(
        err,
        ExplodeError::Parse { ref path, ref src, .. } if path == "bad.ts" && src == "interface Bad {"
    ));
}

#[test]
fn test_duplicates_are_reported_not_fatal() {
    let mut builder_source = String::from("/**\n * @document\n */\ninterface Dup { a: string }\n");
    builder_source.push_str("interface Dup { b: string }\n");

    let graph = tsexplode_parser::build_graph(&[("dup.ts", builder_source.as_str())])
        .expect("source should elaborate");
    let mut emitter = MemoryEmitter::new();
    let summary = Exploder::default()
        .explode(&graph, &mut emitter)
        .expect("duplicates should not fail the run");

    assert_eq!(summary.duplicates(), ["Dup".to_string()]);
    assert_eq!(summary.written(), ["Dup-doc".to_string()]);
}

#[test]
fn test_file_emitter_respects_overwrite() {
    let temp = tempfile::tempdir().expect("Failed to create temp directory");
    let graph = tsexplode_parser::build_graph(&[("contact.ts", CONTACT)])
        .expect("source should elaborate");

    let mut emitter = FileEmitter::new(temp.path(), "ts");
    let path = emitter.path_for("Contact-doc");
    fs::write(&path, "stale").expect("Failed to write stale output");

    let keep = AppConfig::new(
        ExplodeConfig::default(),
        OutputConfig::default().with_overwrite(false),
    );
    let summary = Exploder::new(keep)
        .explode(&graph, &mut emitter)
        .expect("run should succeed");
    assert_eq!(summary.skipped(), ["Contact-doc".to_string()]);
    assert_eq!(fs::read_to_string(&path).unwrap(), "stale");

    let summary = Exploder::default()
        .explode(&graph, &mut emitter)
        .expect("run should succeed");
    assert_eq!(summary.written(), ["Contact-doc".to_string()]);
    assert!(emitter.exists("Contact-doc"));
    assert!(fs::read_to_string(&path).unwrap().starts_with("export interface Contact {"));
}

#[test]
fn test_output_units_without_a_sink() {
    let graph = tsexplode_parser::build_graph(&[("contact.ts", CONTACT)])
        .expect("source should elaborate");
    let units = Exploder::default()
        .output_units(&graph)
        .expect("flattening should succeed");

    assert_eq!(units.len(), 1);
    let names: Vec<&str> = units[0].properties().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["id", "tags", "phones", "name"]);
}

/// Kinds of property type used by the generated sources.
fn property_type(kind: u8, target: Option<usize>) -> String {
    match (kind, target) {
        (0, _) | (_, None) => "string".to_string(),
        (1, Some(target)) => format!("Iface{target}[]"),
        (2, Some(target)) => format!("Iface{target}"),
        (_, Some(target)) => format!("number | Iface{target}"),
    }
}

fn generated_source(interfaces: &[Vec<(u8, prop::sample::Index, bool)>]) -> String {
    let mut source = String::new();
    for (index, properties) in interfaces.iter().enumerate() {
        source.push_str("/** @document */\n");
        source.push_str(&format!("interface Iface{index} {{\n"));
        for (position, (kind, target, optional)) in properties.iter().enumerate() {
            let target = (index > 0).then(|| target.index(index));
            let marker = if *optional { "?" } else { "" };
            source.push_str(&format!(
                "    p{position}{marker}: {};\n",
                property_type(*kind, target)
            ));
        }
        source.push_str("}\n");
    }
    source
}

proptest! {
    #[test]
    fn prop_flattening_is_deterministic_and_self_contained(
        interfaces in prop::collection::vec(
            prop::collection::vec((0u8..4, any::<prop::sample::Index>(), any::<bool>()), 0..4),
            1..6,
        )
    ) {
        let source = generated_source(&interfaces);
        let exploder = Exploder::default();

        let first = exploder.explode_sources(&[("gen.ts", source.as_str())]).unwrap();
        let second = exploder.explode_sources(&[("gen.ts", source.as_str())]).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), interfaces.len());

        for contents in first.values() {
            for line in contents.lines().skip(1) {
                prop_assert!(!line.contains("Iface"), "named reference left in {}", contents);
            }
        }
    }
}
