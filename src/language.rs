//! The fixed language table: file extensions plus the routine grammar.
//!
//! Each language names the extensions that mark a file as source code and the
//! keywords that introduce a routine declaration. Languages without routine
//! keywords still get file-level bookmarks, just no routine children.

/// A supported source language.
#[derive(Debug)]
pub struct Language {
    pub name: &'static str,

    /// Extensions (without the leading dot) that mark a file as this language
    pub extensions: &'static [&'static str],

    /// Keywords that introduce a routine declaration, e.g. `subroutine foo`
    pub routine_keywords: &'static [&'static str],

    /// Keyword that, preceding a routine keyword, marks a closing statement
    /// (`end subroutine foo`) rather than a declaration
    pub end_keyword: Option<&'static str>,
}

pub const LANGUAGES: &[Language] = &[
    Language {
        name: "fortran",
        extensions: &["f", "for", "f90", "f95", "f03"],
        routine_keywords: &["subroutine", "function"],
        end_keyword: Some("end"),
    },
    Language {
        name: "python",
        extensions: &["py"],
        routine_keywords: &["def"],
        end_keyword: None,
    },
    Language {
        name: "rust",
        extensions: &["rs"],
        routine_keywords: &["fn"],
        end_keyword: None,
    },
    // no declaration keyword to pattern-match on, so no routine bookmarks
    Language {
        name: "c",
        extensions: &["c", "h"],
        routine_keywords: &[],
        end_keyword: None,
    },
];

/// Look a language up by name.
pub fn lookup(name: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.name == name)
}
