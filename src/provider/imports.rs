//! Bare module specifier scanning.
//!
//! Only finds references that need the resolver: anything not relative
//! (`./`, `../`) and not absolute (`/`). Full parsing is the bundler's job.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;

use crate::core::FileSet;

/// `import x from "m"`, `export * from "m"`, `import "m"`, `require("m")`, `import("m")`
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:from|import|require)[ \t\r\n]*\(?[ \t\r\n]*["']([^"' \t\r\n]+)["']"#)
        .expect("import pattern is valid")
});

/// Bare specifiers referenced by the file set, first occurrence order.
pub fn bare_specifiers(files: &FileSet) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut specifiers = Vec::new();

    for file in files {
        for caps in IMPORT_RE.captures_iter(&file.content) {
            let specifier = &caps[1];
            if is_bare(specifier) && seen.insert(specifier.to_string()) {
                specifiers.push(specifier.to_string());
            }
        }
    }

    specifiers
}

fn is_bare(specifier: &str) -> bool {
    !(specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/'))
        && specifier != "."
        && specifier != ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InputFile;

    fn set(content: &str) -> FileSet {
        FileSet::new(vec![InputFile::new("App.tsx", content)])
    }

    #[test]
    fn test_finds_import_forms() {
        let files = set(r#"
import React from "react";
import { a } from './local';
export * from "lodash";
import "normalize.css";
const dom = require('react-dom');
const lazy = import("@scope/pkg");
"#);
        assert_eq!(
            bare_specifiers(&files),
            ["react", "lodash", "normalize.css", "react-dom", "@scope/pkg"]
        );
    }

    #[test]
    fn test_skips_relative_and_absolute() {
        let files = set(r#"import a from "../a"; import b from "/abs/b"; import c from "./c";"#);
        assert!(bare_specifiers(&files).is_empty());
    }

    #[test]
    fn test_dedup_across_files() {
        let files = FileSet::new(vec![
            InputFile::new("a.tsx", r#"import React from "react";"#),
            InputFile::new("b.tsx", r#"import { useState } from "react";"#),
        ]);
        assert_eq!(bare_specifiers(&files), ["react"]);
    }
}
