use std::fmt;

/// The taxonomy of tokens produced by the lexer. Grouped the way spec.md
/// groups them: structural tokens, block-start tokens (only ever valid at
/// the start of a line), and payload tokens produced while parsing the body
/// of a block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TokenKind {
    // Structural
    Eof,
    Illegal,
    Newline,
    Indent,
    Str,

    // Block starts (only valid at line start)
    Header,
    ExBlock,
    QuoteBlock,
    Sidebar,
    BlockDelim,
    FencedBlockDelim,
    BlockImage,
    BlockOpts,
    BlockTitle,
    HorLine,
    Table,
    LBoundary,
    Include,
    Comment,
    Admonition,
    DeflMark,
    ConcatPar,
    LMark,
    NlMark,
    AlMark,

    // Payloads
    SyntaxBlock,
    FencedSyntaxBlock,
    Bookmark,
    Url,
    LinkName,
    IntLink,
    InlineImage,
    Column,
    AColumn,
}

impl TokenKind {
    /// True for tokens that are only ever recognized immediately after a
    /// `Newline` token, i.e. tokens whose meaning is line-start-sensitive.
    pub fn is_block_start(self) -> bool {
        matches!(
            self,
            TokenKind::Header
                | TokenKind::ExBlock
                | TokenKind::QuoteBlock
                | TokenKind::Sidebar
                | TokenKind::BlockDelim
                | TokenKind::FencedBlockDelim
                | TokenKind::BlockImage
                | TokenKind::BlockOpts
                | TokenKind::BlockTitle
                | TokenKind::HorLine
                | TokenKind::Table
                | TokenKind::LBoundary
                | TokenKind::Include
                | TokenKind::Comment
                | TokenKind::DeflMark
                | TokenKind::ConcatPar
                | TokenKind::LMark
                | TokenKind::NlMark
                | TokenKind::AlMark
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single lexed token: its kind, the literal text it carries (already
/// stripped of surrounding delimiters where spec.md calls for that, e.g.
/// `BOOKMARK`'s `[[...]]`), and the 1-indexed source line it started on.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            literal: literal.into(),
            line,
        }
    }

    pub fn eof(line: u32) -> Self {
        Self::new(TokenKind::Eof, "", line)
    }

    pub fn illegal(literal: impl Into<String>, line: u32) -> Self {
        Self::new(TokenKind::Illegal, literal, line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ type:{}, line:{}, literal:{:?} ]", self.kind, self.line, self.literal)
    }
}
