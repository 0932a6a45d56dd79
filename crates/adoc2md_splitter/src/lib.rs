//! Two-pass id-map/navigation builder, cross-document link rewriter, and
//! navigation-file patcher. Grounded on `original_source/splitter.go` for
//! the map pass and `original_source/nav.go` for the patcher; the rewrite
//! pass and persisted idmap sidecar are new, per spec.md §4.3/§6 (the Go
//! original never implements cross-document linking).

mod idmap;
mod map_pass;
mod nav;
mod rewrite;

pub use idmap::{load_sidecar, save_sidecar, sidecar_path, DocIdMap, IdMapEntry, IdMapError};
pub use map_pass::{plan, FileSlot, SplitPlan};
pub use nav::{write_nav, NavError};
pub use rewrite::rewrite_links;

use std::collections::HashMap;
use std::path::Path;

use adoc2md_ast::Document;
use adoc2md_config::Config;

/// Runs both passes over `doc` and returns the finished plan with every
/// `Link` inside `doc.children` rewritten in place. `doc_rel_path` is
/// `config.cross_links.get(&doc.name)`, resolved by the caller.
pub fn split(doc: &mut Document, config: &Config, slug: &str, split_level: u8, artifacts_dir: &Path) -> SplitPlan {
    let config_headers = config.headers.get(&doc.name);
    let doc_rel_path = config.cross_links.get(&doc.name).map(String::as_str).unwrap_or("");
    let split_plan = plan(doc, config_headers, slug, split_level, doc_rel_path);

    let mut cache: HashMap<String, DocIdMap> = HashMap::new();
    rewrite::rewrite_links(&mut doc.children, &doc.name, &split_plan.idmap, config, artifacts_dir, &mut cache);

    split_plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use adoc2md_ast::{Block, Header, Link, Paragraph};

    #[test]
    fn split_persists_links_against_the_built_idmap() {
        let mut doc = Document {
            name: "guide.adoc".to_string(),
            children: vec![
                Block::Header(Header { level: 2, text: "Intro".to_string(), id: Some("intro".to_string()), float: false, options: None }),
                Block::Header(Header { level: 2, text: "Setup".to_string(), id: Some("setup".to_string()), float: false, options: None }),
                Block::Paragraph(Paragraph {
                    inlines: vec![adoc2md_ast::Inline::Link(Link { url: "setup".to_string(), text: String::new(), internal: true })],
                }),
            ],
        };
        let config = Config::default();
        let artifacts = std::env::temp_dir().join(format!("adoc2md_split_test_{}", std::process::id()));
        let plan = split(&mut doc, &config, "guide", 2, &artifacts);
        assert_eq!(plan.files.len(), 2);

        let Block::Paragraph(p) = &doc.children[2] else { panic!() };
        let adoc2md_ast::Inline::Link(l) = &p.inlines[0] else { panic!() };
        assert_eq!(l.url, "guide_2.md#setup");
        assert_eq!(l.text, "Setup");
    }
}
