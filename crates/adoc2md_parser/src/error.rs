use adoc2md_syntax::{Token, TokenKind};
use thiserror::Error;

pub type IncludeError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: cannot advance past {kind:?} while {context}")]
    UnexpectedEof {
        line: u32,
        kind: TokenKind,
        context: &'static str,
    },

    #[error("line {line}: malformed directive {literal:?}")]
    MalformedDirective { line: u32, literal: String },

    #[error("line {line}: failed to include {file:?}: {source}")]
    IncludeFailed {
        line: u32,
        file: String,
        #[source]
        source: IncludeError,
    },

    #[error("line {line}: unknown token in block context: {kind:?}")]
    UnknownToken { line: u32, kind: TokenKind },

    #[error("line {line}: invalid header, found {kind:?}")]
    InvalidHeader { line: u32, kind: TokenKind },
}

impl ParseError {
    pub fn unexpected_eof(tok: &Token, context: &'static str) -> Self {
        ParseError::UnexpectedEof {
            line: tok.line,
            kind: tok.kind,
            context,
        }
    }

    pub fn unknown_token(tok: &Token) -> Self {
        ParseError::UnknownToken {
            line: tok.line,
            kind: tok.kind,
        }
    }

    pub fn invalid_header(tok: &Token) -> Self {
        ParseError::InvalidHeader {
            line: tok.line,
            kind: tok.kind,
        }
    }
}
