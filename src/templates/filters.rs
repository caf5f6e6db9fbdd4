//! Custom MiniJinja filters for test scaffolding
//!
//! Available to both the built-in template and project overrides:
//! - `pascal_case`, `camel_case`: identifiers derived from function names
//! - `basename`: last `/` segment of a namespaced name
//! - `escape_string`: safe inside single- or double-quoted JS strings

use crate::util;
use minijinja::Environment;

/// Register all custom filters with the environment
pub fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("pascal_case", filter_pascal_case);
    env.add_filter("camel_case", filter_camel_case);
    env.add_filter("basename", filter_basename);
    env.add_filter("escape_string", escape_string);
}

fn filter_pascal_case(value: &str) -> String {
    util::to_pascal_case(value)
}

fn filter_camel_case(value: &str) -> String {
    util::to_camel_case(value)
}

fn filter_basename(value: &str) -> String {
    util::basename(value).to_string()
}

/// Escape string for use in generated code
fn escape_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
