//! The map pass: walks a parsed document once, allocating an output file
//! name to each split-level chapter and recording where every anchorable
//! node ends up. Grounded on `splitter.go`'s `FileSplitter.init`/
//! `getNextFileName`, generalized from "render while walking" (the Go
//! version interleaves this with actual Markdown output) to "collect a
//! plan the renderer consults later", per spec.md §4.3's two-pass split.

use adoc2md_ast::{visit, Block, Document};
use adoc2md_config::IdMap as ConfigIdMap;
use adoc2md_syntax::kebab_case;

use crate::idmap::{DocIdMap, IdMapEntry};

/// `getNextFileName`'s sentinel: the chapter starting at this header is
/// written to a discard sink and left out of the navigation.
const SKIP_SENTINEL: &str = "<skip chapter>";

/// One entry per split-level chapter, in document order. The renderer
/// walks this in lockstep with its own file-index counter — kept
/// deliberately separate from the counter used to build this plan, per
/// spec.md §9's note that `fileIndex` must not be reused across passes.
#[derive(Clone, Debug, PartialEq)]
pub enum FileSlot {
    Write(String),
    Skip,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitPlan {
    pub idmap: DocIdMap,
    pub nav_entries: Vec<String>,
    pub files: Vec<FileSlot>,
}

/// Builds the split plan for `doc`. `config_headers` is
/// `config.headers.get(doc.name)`, already resolved by the caller;
/// `doc_rel_path` is the path navigation entries should be prefixed with
/// (`config.cross_links[doc.name]`, or empty for a top-level site).
pub fn plan(doc: &Document, config_headers: Option<&ConfigIdMap>, slug: &str, split_level: u8, doc_rel_path: &str) -> SplitPlan {
    let mut file_index: u32 = 0;
    let mut next_file_name = |header_text: &str| -> FileSlot {
        file_index += 1;
        match config_headers.and_then(|m| m.get(header_text)) {
            Some(name) if name == SKIP_SENTINEL => FileSlot::Skip,
            Some(name) => FileSlot::Write(name.clone()),
            None => {
                log::info!("no configured file name for header {header_text:?}, falling back to slug numbering");
                FileSlot::Write(format!("{slug}_{file_index}.md"))
            }
        }
    };

    // The first split-level header (found the same way `findFirstHeader`
    // does: a direct scan of the top level, not a recursive one) gets its
    // file name allocated up front, so content preceding it — typically a
    // level-1 document title — still lands in that first file.
    let first_header_text = doc.children.iter().find_map(|b| match b {
        Block::Header(h) if h.level == split_level => Some(h.text.clone()),
        _ => None,
    });

    let mut files = Vec::new();
    let mut nav_entries = Vec::new();
    let mut idmap = DocIdMap::new();
    let mut current_file = String::new();
    let mut first_consumed = first_header_text.is_none();

    if let Some(text) = &first_header_text {
        let slot = next_file_name(text);
        if let FileSlot::Write(name) = &slot {
            current_file = name.clone();
            nav_entries.push(format!("- {text}: {}", join_rel(doc_rel_path, name)));
        }
        files.push(slot);
    }
    idmap.insert(doc.name.clone(), IdMapEntry { file_name: current_file.clone(), caption: String::new() });

    for child in &doc.children {
        visit(child, &mut |b| {
            match b {
                Block::Header(h) => {
                    if h.level == split_level {
                        if !first_consumed {
                            first_consumed = true;
                        } else {
                            let slot = next_file_name(&h.text);
                            if let FileSlot::Write(name) = &slot {
                                current_file = name.clone();
                                nav_entries.push(format!("- {}: {}", h.text, join_rel(doc_rel_path, name)));
                            }
                            files.push(slot);
                        }
                    }
                    if let Some(id) = &h.id {
                        idmap.insert(id.clone(), IdMapEntry { file_name: current_file.clone(), caption: h.text.clone() });
                    }
                    idmap.insert(kebab_case(&h.text), IdMapEntry { file_name: current_file.clone(), caption: h.text.clone() });
                }
                Block::Bookmark(bm) => {
                    idmap.insert(bm.literal.clone(), IdMapEntry { file_name: current_file.clone(), caption: String::new() });
                }
                _ => {}
            }
            true
        });
    }

    SplitPlan { idmap, nav_entries, files }
}

fn join_rel(rel_path: &str, file_name: &str) -> String {
    if rel_path.is_empty() {
        file_name.to_string()
    } else {
        adoc2md_syntax::join_path(rel_path, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adoc2md_ast::Header;

    fn header(level: u8, text: &str, id: Option<&str>) -> Block {
        Block::Header(Header { level, text: text.to_string(), id: id.map(str::to_string), float: false, options: None })
    }

    #[test]
    fn single_chapter_document_gets_one_file() {
        let doc = Document { name: "guide.adoc".to_string(), children: vec![header(2, "Intro", Some("intro"))] };
        let plan = plan(&doc, None, "guide", 2, "");
        assert_eq!(plan.files, vec![FileSlot::Write("guide_1.md".to_string())]);
        assert_eq!(plan.idmap.get("intro").unwrap().file_name, "guide_1.md");
        assert_eq!(plan.idmap.get("guide.adoc").unwrap().file_name, "guide_1.md");
    }

    #[test]
    fn second_split_header_allocates_a_new_file() {
        let doc = Document {
            name: "guide.adoc".to_string(),
            children: vec![header(2, "Intro", Some("intro")), header(2, "Setup", Some("setup"))],
        };
        let plan = plan(&doc, None, "guide", 2, "");
        assert_eq!(plan.files, vec![FileSlot::Write("guide_1.md".to_string()), FileSlot::Write("guide_2.md".to_string())]);
        assert_eq!(plan.idmap.get("setup").unwrap().file_name, "guide_2.md");
        assert_eq!(plan.nav_entries, vec!["- Intro: guide_1.md".to_string(), "- Setup: guide_2.md".to_string()]);
    }

    #[test]
    fn configured_header_name_overrides_slug_numbering() {
        let mut headers = ConfigIdMap::new();
        headers.insert("Setup".to_string(), "setup.md".to_string());
        let doc = Document {
            name: "guide.adoc".to_string(),
            children: vec![header(2, "Intro", None), header(2, "Setup", None)],
        };
        let plan = plan(&doc, Some(&headers), "guide", 2, "");
        assert_eq!(plan.files[1], FileSlot::Write("setup.md".to_string()));
    }

    #[test]
    fn skip_chapter_sentinel_omits_file_and_nav_entry() {
        let mut headers = ConfigIdMap::new();
        headers.insert("Internal".to_string(), "<skip chapter>".to_string());
        let doc = Document {
            name: "guide.adoc".to_string(),
            children: vec![header(2, "Intro", None), header(2, "Internal", None)],
        };
        let plan = plan(&doc, Some(&headers), "guide", 2, "");
        assert_eq!(plan.files[1], FileSlot::Skip);
        assert_eq!(plan.nav_entries.len(), 1);
    }

    #[test]
    fn title_before_first_split_header_maps_to_its_file() {
        let doc = Document {
            name: "guide.adoc".to_string(),
            children: vec![header(1, "Guide", Some("title")), header(2, "Intro", Some("intro"))],
        };
        let plan = plan(&doc, None, "guide", 2, "");
        assert_eq!(plan.idmap.get("title").unwrap().file_name, "guide_1.md");
        assert_eq!(plan.files.len(), 1);
    }
}
