//! Parsing of JavaScript/TypeScript sources into the swc AST
//!
//! The engine never lexes or parses on its own: swc produces the syntax
//! tree, and this module only wraps it with error recovery and per-file
//! metadata.

use swc_common::sync::Lrc;
use swc_common::{FileName, SourceMap, Spanned};
use swc_ecma_parser::{parse_file_as_module, EsSyntax, Syntax, TsSyntax};

pub use swc_ecma_ast::{EsVersion, Module};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        _ => Language::JavaScript,
    }
}

fn syntax_for(language: Language) -> Syntax {
    match language {
        Language::JavaScript => Syntax::Es(EsSyntax::default()),
        Language::Jsx => Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
        Language::TypeScript => Syntax::Typescript(TsSyntax::default()),
        Language::Tsx => Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        }),
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub span_lo: u32,
    pub span_hi: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub language: Language,
    pub line_count: usize,
    pub has_errors: bool,
}

/// A source file parsed with error recovery: a file with syntax errors
/// still yields a module when swc can produce one.
pub struct ParsedFile {
    source: String,
    metadata: FileMetadata,
    ast_module: Option<Module>,
    errors: Vec<ParseError>,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("metadata", &self.metadata)
            .field("has_module", &self.ast_module.is_some())
            .field("error_count", &self.errors.len())
            .finish()
    }
}

impl ParsedFile {
    pub fn from_source(filename: &str, source: &str) -> Self {
        let language = detect_language(filename);
        let (ast_module, errors) = parse_module_recovering(syntax_for(language), source);

        if !errors.is_empty() {
            tracing::debug!(filename, error_count = errors.len(), "parsed with errors");
        }

        let metadata = FileMetadata {
            filename: filename.to_string(),
            language,
            line_count: source.lines().count(),
            has_errors: !errors.is_empty(),
        };

        Self {
            source: source.to_string(),
            metadata,
            ast_module,
            errors,
        }
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn module(&self) -> Option<&Module> {
        self.ast_module.as_ref()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

fn parse_module_recovering(syntax: Syntax, code: &str) -> (Option<Module>, Vec<ParseError>) {
    let source_map: Lrc<SourceMap> = Default::default();
    let fm = source_map.new_source_file(
        FileName::Custom("input.js".into()).into(),
        code.to_string(),
    );

    let mut recovered_errors = Vec::new();

    let result = parse_file_as_module(
        &fm,
        syntax,
        EsVersion::latest(),
        None,
        &mut recovered_errors,
    );

    let to_parse_error = |e: swc_ecma_parser::error::Error| {
        let span = e.span();
        let loc = source_map.lookup_char_pos(span.lo);
        ParseError {
            line: loc.line,
            column: loc.col_display,
            span_lo: span.lo.0,
            span_hi: span.hi.0,
            message: e.kind().msg().to_string(),
        }
    };

    let mut errors: Vec<ParseError> = recovered_errors.into_iter().map(to_parse_error).collect();

    match result {
        Ok(module) => (Some(module), errors),
        Err(e) => {
            errors.push(to_parse_error(e));
            (None, errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_language_from_extension() {
        assert_eq!(detect_language("a.js"), Language::JavaScript);
        assert_eq!(detect_language("a.mjs"), Language::JavaScript);
        assert_eq!(detect_language("a.ts"), Language::TypeScript);
        assert_eq!(detect_language("a.tsx"), Language::Tsx);
        assert_eq!(detect_language("a.jsx"), Language::Jsx);
        assert_eq!(detect_language("noext"), Language::JavaScript);
    }

    #[test]
    fn parses_a_valid_module() {
        let parsed = ParsedFile::from_source("test.js", "const x = 1;");

        assert!(parsed.module().is_some());
        assert!(parsed.errors().is_empty());
        assert!(!parsed.metadata().has_errors);
        assert_eq!(parsed.metadata().line_count, 1);
    }

    #[test]
    fn syntax_errors_are_reported_with_positions() {
        let parsed = ParsedFile::from_source("test.js", "const = ;");

        assert!(parsed.metadata().has_errors);
        let error = &parsed.errors()[0];
        assert!(error.line >= 1);
        assert!(!error.message.is_empty());
    }

    #[test]
    fn typescript_sources_parse_with_annotations() {
        let parsed = ParsedFile::from_source("test.ts", "const x: number = 1;");

        assert!(parsed.module().is_some());
        assert!(parsed.errors().is_empty());
    }
}
