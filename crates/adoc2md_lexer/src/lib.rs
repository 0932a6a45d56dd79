//! Context-sensitive AsciiDoc lexer.
//!
//! Grounded on `intl_markdown`'s `Lexer` for the overall shape (a byte
//! cursor with a plain-data `checkpoint()`/`rewind()` pair, never hidden
//! behind an `Iterator`) and on `lexer.go`'s `NextToken`/`readString` for
//! the actual classification rules: full-line keyword search first, then
//! word-by-word inline keyword search, with unmatched runs of text
//! coalesced into `STR`.
//!
//! The original threads a `receiver` callback through the scanner and
//! returns `bool` to mean "keep going"; we use a pull model instead (an
//! internal queue of already-scanned tokens drained before further
//! scanning), which is the natural shape for a Rust iterator-adjacent API
//! and avoids inverting control into the caller.

use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;

use adoc2md_syntax::{Token, TokenKind};

static ADMONITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(NOTE|TIP|IMPORTANT|WARNING|CAUTION): ").unwrap());
static DEFL_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+?)::[ \t]*$").unwrap());
static AL_MARK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(<\.>|<\d+>)").unwrap());
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(https?://\S+|link:\S+)").unwrap());

fn is_whitespace(ch: Option<char>) -> bool {
    matches!(ch, Some(' ') | Some('\t'))
}

fn is_newline(ch: Option<char>) -> bool {
    matches!(ch, Some('\n') | Some('\r'))
}

fn is_eof(ch: Option<char>) -> bool {
    ch.is_none()
}

fn is_list_marker(ch: Option<char>) -> bool {
    matches!(ch, Some('*') | Some('.') | Some('-'))
}

fn is_word_delimiter(ch: Option<char>) -> bool {
    is_whitespace(ch) || is_newline(ch) || is_eof(ch)
}

/// A snapshot of the scanner's full state, cheap to clone and restore.
/// Kept as plain data rather than behind any abstraction so `rewind` can
/// never be anything but "assign these fields back".
#[derive(Clone, Debug)]
pub struct Checkpoint {
    position: usize,
    read_position: usize,
    ch: Option<char>,
    line: u32,
    prev_kind: TokenKind,
    table_flag: bool,
    eof_forced: bool,
    pending: VecDeque<Token>,
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    read_position: usize,
    ch: Option<char>,
    line: u32,
    prev_kind: TokenKind,
    table_flag: bool,
    eof_forced: bool,
    /// Tokens already scanned off a line but not yet handed to the caller.
    /// Stands in for the original's receiver callback, which could emit
    /// more than one token per `NextToken` call.
    pending: VecDeque<Token>,
    emitted_eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input,
            position: 0,
            read_position: 0,
            ch: None,
            line: 1,
            prev_kind: TokenKind::Newline,
            table_flag: false,
            eof_forced: false,
            pending: VecDeque::new(),
            emitted_eof: false,
        };
        lexer.read_rune();
        lexer
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            read_position: self.read_position,
            ch: self.ch,
            line: self.line,
            prev_kind: self.prev_kind,
            table_flag: self.table_flag,
            eof_forced: self.eof_forced,
            pending: self.pending.clone(),
        }
    }

    pub fn rewind(&mut self, cp: Checkpoint) {
        self.position = cp.position;
        self.read_position = cp.read_position;
        self.ch = cp.ch;
        self.line = cp.line;
        self.prev_kind = cp.prev_kind;
        self.table_flag = cp.table_flag;
        self.eof_forced = cp.eof_forced;
        self.pending = cp.pending;
    }

    /// Signed byte-granular cursor move, then re-decodes the rune at the
    /// resulting position. Used to return an over-read tail (e.g. the
    /// unconsumed part of a line after an embedded keyword match) to the
    /// stream.
    pub fn shift(&mut self, delta: isize) {
        let target = (self.position as isize + delta).max(0) as usize;
        self.read_position = target.min(self.input.len());
        self.read_rune();
    }

    fn read_rune(&mut self) {
        if self.read_position >= self.input.len() {
            self.position = self.read_position;
            self.ch = None;
            return;
        }
        let ch = self.input[self.read_position..].chars().next().unwrap();
        self.position = self.read_position;
        self.read_position += ch.len_utf8();
        self.ch = Some(ch);
    }

    fn peek_rune(&self) -> Option<char> {
        if self.read_position >= self.input.len() {
            return None;
        }
        self.input[self.read_position..].chars().next()
    }

    fn rest_of_line(&self) -> &'a str {
        let end = self.input[self.position..]
            .find(['\n', '\r'])
            .map(|i| self.position + i)
            .unwrap_or(self.input.len());
        &self.input[self.position..end]
    }

    fn read_whitespace(&mut self) -> &'a str {
        let start = self.position;
        while is_whitespace(self.ch) {
            self.read_rune();
        }
        &self.input[start..self.position]
    }

    fn read_line(&mut self) -> &'a str {
        let start = self.position;
        while !is_newline(self.ch) && !is_eof(self.ch) {
            self.read_rune();
        }
        &self.input[start..self.position]
    }

    fn read_new_line(&mut self) -> &'a str {
        let start = self.position;
        let ch = self.ch;
        self.read_rune();
        if ch == Some('\r') && self.ch == Some('\n') {
            self.read_rune();
        }
        self.line += 1;
        &self.input[start..self.position]
    }

    fn read_list_marker(&mut self) -> &'a str {
        let start = self.position;
        let marker_char = self.ch;
        while self.ch == marker_char {
            self.read_rune();
        }
        &self.input[start..self.position]
    }

    fn read_word(&mut self) -> &'a str {
        let start = self.position;
        while !is_word_delimiter(self.ch) && !(self.table_flag && self.ch == Some('|')) {
            self.read_rune();
        }
        if self.position == start && self.table_flag && self.ch == Some('|') {
            self.read_rune();
            return &self.input[start..self.position];
        }
        &self.input[start..self.position]
    }

    /// Returns the next token, honoring the merge-consecutive-`STR`
    /// contract: once a `STR` is produced, keep scanning and folding
    /// further `STR`s in, pushing the first non-`STR` token back via
    /// `rewind` once found.
    pub fn next_token(&mut self) -> Token {
        let first = self.next_token_raw();
        if first.kind != TokenKind::Str {
            return first;
        }
        let mut literal = first.literal;
        loop {
            let cp = self.checkpoint();
            let next = self.next_token_raw();
            if next.kind == TokenKind::Str {
                literal.push_str(&next.literal);
            } else {
                self.rewind(cp);
                break;
            }
        }
        Token::new(TokenKind::Str, literal, first.line)
    }

    fn emit(&mut self, tok: Token) -> Token {
        self.prev_kind = tok.kind;
        tok
    }

    fn next_token_raw(&mut self) -> Token {
        if let Some(tok) = self.pending.pop_front() {
            return self.emit(tok);
        }
        if self.eof_forced || is_eof(self.ch) {
            if self.emitted_eof {
                return Token::eof(self.line);
            }
            self.emitted_eof = true;
            return self.emit(Token::eof(self.line));
        }

        let at_line_start = self.prev_kind == TokenKind::Newline;

        if self.ch == Some('.')
            && at_line_start
            && !matches!(self.peek_rune(), Some('.') | Some('*') | Some(' ') | Some('\t'))
            && !is_newline(self.peek_rune())
        {
            self.read_rune();
            let line = self.line;
            let literal = self.read_line().to_string();
            return self.emit(Token::new(TokenKind::BlockTitle, literal, line));
        }

        if self.ch == Some('+') && at_line_start && is_newline(self.peek_rune()) {
            self.read_rune();
            self.read_whitespace();
            return self.emit(Token::new(TokenKind::ConcatPar, "+", self.line));
        }

        if is_newline(self.ch) {
            let line = self.line;
            let literal = self.read_new_line().to_string();
            return self.emit(Token::new(TokenKind::Newline, literal, line));
        }

        if is_whitespace(self.ch) && at_line_start {
            let line = self.line;
            let literal = self.read_whitespace().to_string();
            return self.emit(Token::new(TokenKind::Indent, literal, line));
        }

        if self.ch == Some('=') && at_line_start {
            return self.emit(self.read_header_or_example());
        }

        if is_list_marker(self.ch)
            && at_line_start
            && matches!(self.peek_rune(), Some('.') | Some('*') | Some('-') | Some(' ') | Some('\t'))
        {
            if let Some(tok) = self.try_read_list_marker() {
                return self.emit(tok);
            }
        }

        if self.ch == Some('[') && at_line_start {
            self.read_rune();
            if self.ch == Some('[') {
                return self.emit(self.read_bookmark());
            }
            return self.emit(self.read_block_options());
        }

        if self.ch == Some('[') && self.prev_kind == TokenKind::Url {
            return self.emit(self.read_link_name());
        }

        if self.ch == Some(':') && at_line_start {
            self.read_line();
            return self.next_token_raw();
        }

        let tokens = self.read_string();
        self.push_pending(tokens);
        let first = self.pending.pop_front().expect("read_string always yields at least one token");
        self.emit(first)
    }

    fn push_pending(&mut self, tokens: Vec<Token>) {
        match tokens.first() {
            Some(t) if t.kind == TokenKind::BlockDelim || t.kind == TokenKind::FencedBlockDelim => {
                let delim = tokens[0].clone();
                let line = delim.line;
                let literal = self.read_syntax_block(&delim.literal);
                let kind = if delim.kind == TokenKind::FencedBlockDelim {
                    TokenKind::FencedSyntaxBlock
                } else {
                    TokenKind::SyntaxBlock
                };
                self.pending.push_back(Token::new(kind, literal, line));
            }
            Some(t) if t.kind == TokenKind::Table => {
                self.table_flag = !self.table_flag;
                self.pending.extend(tokens);
            }
            _ => self.pending.extend(tokens),
        }
    }

    /// Reads everything between a `----`/` ``` ` delimiter line and the
    /// matching closing delimiter (or EOF) without tokenizing it.
    fn read_syntax_block(&mut self, delim: &str) -> String {
        self.read_rune(); // skip the newline after the opening delimiter
        let start = self.position;
        let mut end;
        loop {
            end = self.position;
            let line = self.read_line();
            if line.trim() == delim {
                break;
            }
            if is_eof(self.ch) {
                end = self.position;
                break;
            }
            self.read_new_line();
        }
        self.input[start..end].to_string()
    }

    fn read_block_options(&mut self) -> Token {
        let line = self.line;
        let start = self.position;
        let opts = self.read_line();
        if opts.ends_with(']') {
            let literal = opts[..opts.len() - 1].to_string();
            Token::new(TokenKind::BlockOpts, literal, line)
        } else {
            Token::illegal(self.input[start..self.position].to_string(), line)
        }
    }

    fn read_bookmark(&mut self) -> Token {
        let line = self.line;
        let start = self.position;
        let b = self.read_line();
        if let Some(stripped) = b.strip_prefix('[').and_then(|s| s.strip_suffix("]]")) {
            Token::new(TokenKind::Bookmark, stripped.to_string(), line)
        } else {
            Token::illegal(self.input[start..self.position].to_string(), line)
        }
    }

    /// `[link text]` immediately following a `URL` token.
    fn read_link_name(&mut self) -> Token {
        let line = self.line;
        let start = self.position;
        let opts = self.read_line();
        if opts.ends_with(']') {
            let literal = opts[..opts.len() - 1].to_string();
            Token::new(TokenKind::LinkName, literal, line)
        } else {
            Token::illegal(self.input[start..self.position].to_string(), line)
        }
    }

    fn read_header_or_example(&mut self) -> Token {
        let line = self.line;
        let from = self.position;
        while self.ch == Some('=') {
            self.read_rune();
        }
        let literal = self.input[from..self.position].to_string();
        self.read_whitespace();
        if is_newline(self.ch) || is_eof(self.ch) {
            if literal == "====" {
                Token::new(TokenKind::ExBlock, literal, line)
            } else {
                Token::illegal(literal, line)
            }
        } else {
            Token::new(TokenKind::Header, literal, line)
        }
    }

    /// Tries to read a list-marker run at line start. Returns `None` (and
    /// leaves the cursor untouched) when the run turns out to be a `--`
    /// list-boundary, a `****` sidebar, or a lone `-` with no trailing
    /// whitespace — none of which are list markers.
    fn try_read_list_marker(&mut self) -> Option<Token> {
        let cp = self.checkpoint();
        let line = self.line;
        let first_char = self.ch;
        let literal = self.read_list_marker().to_string();
        let next_is_space = is_whitespace(self.ch);
        let next_is_eol = is_newline(self.ch) || is_eof(self.ch);

        if literal == "--" && next_is_eol {
            self.read_line();
            return Some(Token::new(TokenKind::LBoundary, literal, line));
        }
        if literal == "****" && next_is_eol {
            self.read_line();
            return Some(Token::new(TokenKind::Sidebar, literal, line));
        }
        if first_char == Some('-') && !next_is_space {
            self.rewind(cp);
            return None;
        }
        if !next_is_space {
            self.rewind(cp);
            return None;
        }
        self.read_whitespace();
        if first_char == Some('.') {
            Some(Token::new(TokenKind::NlMark, literal, line))
        } else {
            Some(Token::new(TokenKind::LMark, literal, line))
        }
    }

    /// Equivalent of `readString`/`lookupLineKeyword`/`lookupInlineKeyword`:
    /// tries a full-line keyword match first (only meaningful right after a
    /// `NEWLINE`), then falls back to scanning word by word, coalescing
    /// unmatched runs into `STR` and splitting out inline keywords
    /// (`INLINE_IMAGE`, `URL`, `INT_LINK`, table columns) as they're found.
    fn read_string(&mut self) -> Vec<Token> {
        let at_line_start = self.prev_kind == TokenKind::Newline;
        if at_line_start {
            let cp = self.checkpoint();
            let line_text = self.rest_of_line().to_string();
            if let Some(tok) = self.lookup_line_keyword(&line_text) {
                self.read_line();
                return vec![tok];
            }
            self.rewind(cp);
        }

        let mut tokens = Vec::new();
        let start = self.position;
        let mut seg_start = self.position;

        while !is_newline(self.ch) && !is_eof(self.ch) {
            let word_start = self.position;
            let word = self.read_word().to_string();
            if let Some(tok) = self.lookup_inline_keyword(&word) {
                if self.position > seg_start && word_start > seg_start {
                    tokens.push(Token::new(
                        TokenKind::Str,
                        self.input[seg_start..word_start].to_string(),
                        self.line,
                    ));
                }
                tokens.push(tok);
                self.read_whitespace();
                seg_start = self.position;
            } else {
                self.read_whitespace();
            }
        }
        if self.position > seg_start {
            tokens.push(Token::new(
                TokenKind::Str,
                self.input[seg_start..self.position].to_string(),
                self.line,
            ));
        }
        if tokens.is_empty() {
            // Nothing matched and nothing left unread (e.g. a blank line
            // that fell through to the default arm): surface an empty STR
            // rather than returning no tokens, so the scanner always
            // advances.
            tokens.push(Token::new(
                TokenKind::Str,
                self.input[start..self.position].to_string(),
                self.line,
            ));
        }
        tokens
    }

    fn lookup_inline_keyword(&mut self, w: &str) -> Option<Token> {
        if w.starts_with("image:") {
            return Some(Token::new(TokenKind::InlineImage, w.to_string(), self.line));
        }
        if let Some(m) = URL_RE.find(w) {
            if m.start() == 0 {
                return Some(Token::new(TokenKind::Url, w.to_string(), self.line));
            }
        }
        if w.starts_with("<<") && w.ends_with(">>") {
            return Some(Token::new(
                TokenKind::IntLink,
                w[2..w.len() - 2].to_string(),
                self.line,
            ));
        }
        if self.table_flag && w == "|" {
            return Some(Token::new(TokenKind::Column, w.to_string(), self.line));
        }
        if self.table_flag && w == "a" && self.ch == Some('|') {
            self.read_rune();
            return Some(Token::new(TokenKind::AColumn, "a|".to_string(), self.line));
        }
        None
    }

    fn lookup_line_keyword(&mut self, line: &str) -> Option<Token> {
        if line == "//EOF" {
            self.eof_forced = true;
            return None;
        }
        if line.starts_with("|===") {
            return Some(Token::new(TokenKind::Table, line.to_string(), self.line));
        }
        if line.starts_with("____") {
            return Some(Token::new(TokenKind::QuoteBlock, "____".to_string(), self.line));
        }
        if line.starts_with("----") {
            return Some(Token::new(TokenKind::BlockDelim, "----".to_string(), self.line));
        }
        if line.starts_with("```") {
            return Some(Token::new(
                TokenKind::FencedBlockDelim,
                "```".to_string(),
                self.line,
            ));
        }
        if line == "'''" {
            return Some(Token::new(TokenKind::HorLine, line.to_string(), self.line));
        }
        if line.starts_with("//") {
            return Some(Token::new(TokenKind::Comment, line.to_string(), self.line));
        }
        if line.starts_with("include::") {
            return Some(Token::new(TokenKind::Include, line.to_string(), self.line));
        }
        if line.starts_with("image::") {
            return Some(Token::new(TokenKind::BlockImage, line.to_string(), self.line));
        }
        if let Some(caps) = ADMONITION_RE.captures(line) {
            return Some(Token::new(
                TokenKind::Admonition,
                caps.get(1).unwrap().as_str().to_string(),
                self.line,
            ));
        }
        if AL_MARK_RE.is_match(line) {
            return Some(Token::new(TokenKind::AlMark, line.to_string(), self.line));
        }
        if let Some(caps) = DEFL_LINE_RE.captures(line) {
            return Some(Token::new(
                TokenKind::DeflMark,
                caps.get(1).unwrap().as_str().trim().to_string(),
                self.line,
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(src: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            out.push(tok);
            if is_eof {
                break;
            }
        }
        out
    }

    #[test]
    fn header_and_text() {
        let toks = lex_all("== Title\ntext\n");
        assert_eq!(toks[0].kind, TokenKind::Header);
        assert_eq!(toks[0].literal, "==");
    }

    #[test]
    fn ex_block_vs_header() {
        let toks = lex_all("====\ntext\n====\n");
        assert_eq!(toks[0].kind, TokenKind::ExBlock);
    }

    #[test]
    fn list_marker_requires_trailing_space() {
        let toks = lex_all("*text\n");
        assert_ne!(toks[0].kind, TokenKind::LMark);
    }

    #[test]
    fn bare_dash_dash_is_boundary() {
        let toks = lex_all("--\ntext\n");
        assert_eq!(toks[0].kind, TokenKind::LBoundary);
    }

    #[test]
    fn single_dash_list_marker() {
        let toks = lex_all("- item\n");
        assert_eq!(toks[0].kind, TokenKind::LMark);
    }

    #[test]
    fn block_title_vs_ordered_list() {
        let toks = lex_all(".Title here\n");
        assert_eq!(toks[0].kind, TokenKind::BlockTitle);
        let toks = lex_all(". item\n");
        assert_eq!(toks[0].kind, TokenKind::NlMark);
    }

    #[test]
    fn admonition_token() {
        let toks = lex_all("NOTE: hello\n");
        assert_eq!(toks[0].kind, TokenKind::Admonition);
        assert_eq!(toks[0].literal, "NOTE");
    }

    #[test]
    fn syntax_block_is_opaque() {
        let toks = lex_all("----\nfn main() {}\n----\n");
        assert_eq!(toks[0].kind, TokenKind::SyntaxBlock);
        assert_eq!(toks[0].literal, "fn main() {}");
    }

    #[test]
    fn checkpoint_rewind_roundtrips() {
        let mut lexer = Lexer::new("== Title\nbody\n");
        let cp = lexer.checkpoint();
        let first = lexer.next_token();
        lexer.rewind(cp);
        let again = lexer.next_token();
        assert_eq!(first, again);
    }

    #[test]
    fn table_flag_toggles_column_tokens() {
        let toks = lex_all("|===\n| a | b\n|===\n");
        assert_eq!(toks[0].kind, TokenKind::Table);
        assert!(toks.iter().any(|t| t.kind == TokenKind::Column));
    }

    #[test]
    fn inline_image_mid_text() {
        let toks = lex_all("see image:foo.png[] here\n");
        assert!(toks.iter().any(|t| t.kind == TokenKind::InlineImage));
    }

    #[test]
    fn every_stream_ends_in_single_eof() {
        let toks = lex_all("text\n");
        assert_eq!(toks.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(toks.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    }

    #[test]
    fn debug_eof_hook_truncates_stream() {
        let toks = lex_all("first\n//EOF\nsecond\n");
        assert!(!toks.iter().any(|t| t.kind == TokenKind::Str && t.literal.contains("second")));
    }
}
