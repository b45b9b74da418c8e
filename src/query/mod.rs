//! Query parsing module
//!
//! Splits a raw typed phrase into the pieces the router needs: the leading
//! keyword token, the argument tokens after it, and the full token list for
//! plugins that have no keyword to strip.

use serde::{Deserialize, Serialize};

/// Parsed user query, derived once per inbound phrase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Original raw phrase as typed
    pub phrase: String,
    /// First whitespace-delimited token (empty for a blank phrase)
    pub keyword: String,
    /// Tokens after the keyword
    pub args: Vec<String>,
    /// Arguments rejoined and trimmed
    pub query_string: String,
    /// All tokens including the keyword, for keyword-less plugins
    pub fractions: Vec<String>,
}

impl ParsedQuery {
    /// Parse a raw phrase
    pub fn parse(raw: &str) -> Self {
        let fractions: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
        let keyword = fractions.first().cloned().unwrap_or_default();
        let args: Vec<String> = fractions.iter().skip(1).cloned().collect();
        let query_string = args.join(" ").trim().to_string();

        Self {
            phrase: raw.to_string(),
            keyword,
            args,
            query_string,
            fractions,
        }
    }

    /// True when the phrase contained no tokens at all
    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }
}
