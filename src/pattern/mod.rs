//! Structural pattern queries over parsed scripts.
//!
//! A [`Pattern`] is a named tree-sitter query: literal node shapes, named
//! captures (`@name`) and text constraints written as query predicates
//! (`#eq?`, `#any-of?`, `#match?`). It is compiled once for every supported
//! grammar, so analyzers stay declarative instead of walking trees by hand.
//!
//! # Example
//!
//! ```ignore
//! use scriptscope::pattern::{parse_script, Pattern};
//! use scriptscope::source::ScriptSource;
//!
//! let pattern = Pattern::new("calls", "(call_expression function: (identifier) @callee)")?;
//! let script = ScriptSource::new("inline.js", "foo(); bar();");
//! let parsed = parse_script(&mut tree_sitter::Parser::new(), &script)?;
//!
//! for found in pattern.find_all(&parsed) {
//!     let callee = found.capture("callee").unwrap();
//!     println!("{}", parsed.text(callee));
//! }
//! ```

use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor, Tree};

use crate::analysis::{AnalysisError, AnalysisResult};
use crate::source::{ScriptSource, SourceLanguage};

/// A successfully parsed script: the syntax tree plus the text it was built from.
pub struct ParsedScript<'src> {
    tree: Tree,
    source: &'src str,
    language: SourceLanguage,
}

impl<'src> ParsedScript<'src> {
    /// Root node of the syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Grammar the script was parsed with.
    pub fn language(&self) -> SourceLanguage {
        self.language
    }

    /// Full source text.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Exact source text of a node.
    pub fn text(&self, node: Node<'_>) -> &'src str {
        self.source.get(node.byte_range()).unwrap_or("")
    }
}

/// Parse a script with `parser`, switching the parser's grammar as needed.
///
/// A tree containing any error or missing node is a parse failure; there is no
/// partial-tree recovery.
pub fn parse_script<'src>(
    parser: &mut Parser,
    script: &'src ScriptSource,
) -> AnalysisResult<ParsedScript<'src>> {
    let language = script.language();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|_| AnalysisError::LanguageInit)?;

    let tree = parser
        .parse(&script.source_text, None)
        .ok_or_else(|| AnalysisError::Parse {
            identifier: script.identifier.clone(),
        })?;

    if tree.root_node().has_error() {
        return Err(AnalysisError::Parse {
            identifier: script.identifier.clone(),
        });
    }

    Ok(ParsedScript {
        tree,
        source: &script.source_text,
        language,
    })
}

/// A compiled structural query.
pub struct Pattern {
    name: &'static str,
    queries: Vec<(SourceLanguage, Query)>,
}

impl Pattern {
    /// Compile `query` for every supported grammar.
    ///
    /// Fails with [`AnalysisError::Pattern`] if the query is malformed for any of them.
    pub fn new(name: &'static str, query: &str) -> AnalysisResult<Self> {
        let queries = SourceLanguage::ALL
            .iter()
            .map(|&language| {
                Query::new(&language.tree_sitter_language(), query)
                    .map(|compiled| (language, compiled))
                    .map_err(|source| AnalysisError::Pattern { name, source })
            })
            .collect::<AnalysisResult<Vec<_>>>()?;

        Ok(Self { name, queries })
    }

    /// Pattern name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Find every match in the script, in document order.
    pub fn find_all<'p, 'tree>(&'p self, script: &'tree ParsedScript<'_>) -> Vec<Match<'p, 'tree>> {
        let Some(query) = self
            .queries
            .iter()
            .find(|(language, _)| *language == script.language())
            .map(|(_, query)| query)
        else {
            return Vec::new();
        };
        let names = query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, script.root(), script.source().as_bytes());

        let mut found = Vec::new();
        while let Some(m) = matches.next() {
            let captures = m
                .captures
                .iter()
                .map(|c| (names[c.index as usize], c.node))
                .collect();
            found.push(Match { captures });
        }

        tracing::trace!("{}: {} match(es)", self.name, found.len());
        found
    }
}

/// One match of a [`Pattern`], with its named captures.
#[derive(Debug, Clone)]
pub struct Match<'p, 'tree> {
    captures: Vec<(&'p str, Node<'tree>)>,
}

impl<'p, 'tree> Match<'p, 'tree> {
    /// First node captured under `name`, if any.
    pub fn capture(&self, name: &str) -> Option<Node<'tree>> {
        self.captures
            .iter()
            .find(|(capture, _)| *capture == name)
            .map(|(_, node)| *node)
    }
}
