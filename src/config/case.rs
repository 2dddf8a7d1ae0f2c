// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Convert a snake_case configuration kind into the PascalCase type name it names.
///
/// Empty segments (leading, trailing or doubled underscores) are dropped.
///
/// ```
/// use plyght::config::case::pascal;
///
/// assert_eq!(pascal("opensearch_config"), "OpensearchConfig");
/// ```
pub fn pascal(kind: &str) -> String {
    kind.split('_')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
