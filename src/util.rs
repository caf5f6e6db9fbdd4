//! Shared utility functions
//!
//! Name and path helpers used by scaffolding and runs.

use std::path::{Component, Path};

/// Convert snake_case or kebab-case to PascalCase
///
/// # Examples
/// ```
/// use slstest::util::to_pascal_case;
/// assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
/// assert_eq!(to_pascal_case("get-user"), "GetUser");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', '-'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert snake_case or kebab-case to camelCase
///
/// # Examples
/// ```
/// use slstest::util::to_camel_case;
/// assert_eq!(to_camel_case("hello_world"), "helloWorld");
/// assert_eq!(to_camel_case("foo"), "foo");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Last `/`-separated segment of a function name
///
/// # Examples
/// ```
/// use slstest::util::basename;
/// assert_eq!(basename("module/myFunc"), "myFunc");
/// assert_eq!(basename("myFunc"), "myFunc");
/// ```
pub fn basename(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// `path` relative to `base`, joined with `/` on every platform.
///
/// Falls back to the full path when `path` is not under `base`.
pub fn relative_slash_path(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// File stem of a path, used to match suites back to functions
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case("hello_world", "HelloWorld")]
    #[case("foo", "Foo")]
    #[case("get-user-by_id", "GetUserById")]
    fn test_to_pascal_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_pascal_case(input), expected);
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("hello_world"), "helloWorld");
        assert_eq!(to_camel_case(""), "");
    }

    #[rstest]
    #[case("module/myFunc", "myFunc")]
    #[case("a/b/c", "c")]
    #[case("plain", "plain")]
    fn test_basename(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(basename(input), expected);
    }

    #[test]
    fn test_relative_slash_path() {
        let base = PathBuf::from("/work/proj");
        let path = base.join("users").join("create");
        assert_eq!(relative_slash_path(&base, &path), "users/create");
        assert_eq!(relative_slash_path(&base, &base), "");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("test/myFunc.js")), "myFunc");
        assert_eq!(file_stem(Path::new("/abs/other.spec.js")), "other.spec");
    }
}
