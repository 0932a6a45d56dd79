//! The `Block` sum type and its supporting structs.
//!
//! Where the original implementation (`ast.go`) models every node as a type
//! implementing a common `Block` interface and leans on type assertions to
//! recover the concrete shape, we use a single tagged enum: the match
//! arms the renderer and splitter need become exhaustive and checked at
//! compile time instead of panicking on an unexpected type assertion.

/// A single node in the parsed document tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Document(Document),
    Container(ContainerBlock),
    Paragraph(Paragraph),
    Header(Header),
    BlockTitle(BlockTitle),
    List(List),
    ListBlock(ListBlock),
    Example(ExampleBlock),
    Admonition(Admonition),
    Table(Table),
    Image(Image),
    InlineImage(InlineImage),
    Link(Link),
    Bookmark(Bookmark),
    HorLine,
    Syntax(SyntaxBlock),
    Text(Text),
}

/// The root of one source file's tree. `name` is the file's slug, used by
/// the splitter to derive output filenames when no explicit id is present.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub name: String,
    pub children: Vec<Block>,
}

/// A plain grouping of blocks with no rendering identity of its own: the
/// body of an include, a list item's content, or the top level of a block
/// that was opened and closed but carries no other metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerBlock {
    pub children: Vec<Block>,
}

/// Inline content allowed inside a `Paragraph`. Kept as its own enum
/// (rather than reusing `Block` and trusting callers not to push a `List`
/// in) so the invariant "paragraphs hold only text, links, and inline
/// images" is enforced by the type system instead of by convention.
#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    Text(Text),
    InlineImage(InlineImage),
    Link(Link),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub level: u8,
    pub text: String,
    /// Explicit `[[id]]`/`[#id]` anchor, if any. When absent the splitter
    /// derives one from `text` via `adoc2md_syntax::kebab_case`.
    pub id: Option<String>,
    /// `[float]` option: renders as italic text instead of a heading, but
    /// is otherwise an ordinary header — it still registers its `id`/
    /// derived anchor in the id map and still opens a new chapter file if
    /// its level matches the split level.
    pub float: bool,
    pub options: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockTitle {
    pub text: String,
}

/// Which delimiter opened an `ExampleBlock`. Determines the default
/// admonition-style kind used when no explicit `[kind]` option is present.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DelimiterKind {
    /// `====`
    Example,
    /// `____`
    Quote,
    /// `****`
    Sidebar,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExampleBlock {
    pub kind: Option<String>,
    pub collapsible: bool,
    pub delimiter: DelimiterKind,
    pub children: Vec<Block>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdmonitionKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AdmonitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AdmonitionKind::Note => "NOTE",
            AdmonitionKind::Tip => "TIP",
            AdmonitionKind::Important => "IMPORTANT",
            AdmonitionKind::Warning => "WARNING",
            AdmonitionKind::Caution => "CAUTION",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Admonition {
    pub kind: AdmonitionKind,
    pub content: Paragraph,
}

/// A `--` delimited list-continuation block: extra block content attached
/// to the preceding list item beyond its first paragraph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListBlock {
    pub children: Vec<Block>,
}

/// One `*`/`-`/`.`/term-list level. `items` holds one `ContainerBlock` per
/// marker occurrence at this level.
///
/// The original implementation gives every `List` node an owning `parent
/// *List` pointer so `CheckMarker` can walk upward when a line's marker
/// doesn't match the current level. We don't carry that pointer into the
/// tree at all: the parser already needs an explicit stack of
/// `(marker, numbered)` pairs to drive the same decision while it's
/// building the item bodies, and that stack is strictly more useful there
/// (the tree itself never needs to walk back up once parsing is done, and
/// an actual back-reference would force `Rc`/`Weak` for no reader of the
/// finished tree). See the `parse_list` ancestor-chain notes in the parser
/// crate for where that stack lives.
#[derive(Clone, Debug, PartialEq)]
pub struct List {
    pub marker: String,
    pub numbered: bool,
    pub definition: bool,
    pub callouts: bool,
    pub level: u32,
    pub items: Vec<ContainerBlock>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub cols: usize,
    pub header: bool,
    pub cells: Vec<ContainerBlock>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub path: String,
    pub options: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InlineImage {
    pub path: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub url: String,
    pub text: String,
    /// True for `<<id>>`/`<<id,text>>` cross-references, resolved by the
    /// splitter against the id map; false for `link:`/bare URLs, which pass
    /// through unchanged (save for `url_rewrites`).
    pub internal: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bookmark {
    pub literal: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxBlock {
    pub language: Option<String>,
    pub literal: String,
    /// True when callouts inside `literal` should be rewritten to trailing
    /// comments (fenced/"source,lang" blocks) rather than left as `<N>`.
    pub inline_highlight: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub literal: String,
}

impl From<Inline> for Block {
    fn from(inline: Inline) -> Self {
        match inline {
            Inline::Text(t) => Block::Text(t),
            Inline::InlineImage(i) => Block::InlineImage(i),
            Inline::Link(l) => Block::Link(l),
        }
    }
}

/// The inverse of `From<Inline> for Block`, used by `visit_mut` to recurse
/// into `Paragraph.inlines`: convert the inline to a `Block` temporarily,
/// hand it to the visitor, then convert back. Fails only if the visitor
/// somehow replaced the node with a variant that isn't one of the three
/// inline ones, which would violate the paragraph invariant.
impl TryFrom<Block> for Inline {
    type Error = Block;

    fn try_from(block: Block) -> Result<Self, Self::Error> {
        match block {
            Block::Text(t) => Ok(Inline::Text(t)),
            Block::InlineImage(i) => Ok(Inline::InlineImage(i)),
            Block::Link(l) => Ok(Inline::Link(l)),
            other => Err(other),
        }
    }
}
