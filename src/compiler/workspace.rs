//! Workspace paths
//!
//! Paths are joined as POSIX paths regardless of the host running the
//! compiler, since they are resolved inside the step's container.

/// Joins path elements with `/` and cleans the result lexically.
///
/// Empty elements are skipped; an all-empty input yields an empty string.
#[must_use]
pub fn join(elements: &[&str]) -> String {
    let joined = elements
        .iter()
        .filter(|e| !e.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        joined
    } else {
        clean(&joined)
    }
}

/// Returns the shortest equivalent of a POSIX path: repeated and trailing
/// slashes collapse, `.` disappears and `..` removes the preceding element.
#[must_use]
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

/// Returns true for absolute POSIX paths
#[must_use]
pub fn is_abs(path: &str) -> bool {
    path.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["/ci", "src/app"], "/ci/src/app")]
    #[case(&["/workspace", ""], "/workspace")]
    #[case(&["/workspace/", "app/", "build"], "/workspace/app/build")]
    #[case(&["/workspace", "app", "../lib"], "/workspace/lib")]
    #[case(&["/workspace", "./app"], "/workspace/app")]
    #[case(&["", ""], "")]
    #[case(&["a", "b"], "a/b")]
    fn test_join(#[case] elements: &[&str], #[case] expected: &str) {
        assert_eq!(join(elements), expected);
    }

    #[rstest]
    #[case("/", "/")]
    #[case("/../x", "/x")]
    #[case("a/../..", "..")]
    #[case("a/..", ".")]
    #[case("//a//b/", "/a/b")]
    fn test_clean(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(clean(input), expected);
    }

    #[test]
    fn test_is_abs() {
        assert!(is_abs("/src"));
        assert!(!is_abs("src"));
        assert!(!is_abs(""));
    }
}
