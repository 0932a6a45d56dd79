//! The rewrite pass: resolves every `Link.url` against the id maps built
//! by the map pass (this document's own, plus any sibling documents'
//! persisted sidecars), per spec.md §4.3's five-step algorithm. Has no
//! `original_source` counterpart — `splitter.go` never implements
//! cross-document linking at all — so this is built directly from spec.md,
//! with the ordering choices spelled out inline and logged in DESIGN.md.

use std::collections::HashMap;
use std::path::Path;

use adoc2md_ast::{visit_mut, Block};
use adoc2md_config::Config;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::idmap::{load_sidecar, DocIdMap};

/// Rewrites every `Link` inside `blocks` in place. `doc_name` is the
/// current document's name (as it appears in `config.cross_links` and as
/// the key `own_idmap` was built under); `cache` holds already-loaded
/// sidecars for other documents, keyed by document name, and is mutated as
/// new ones are loaded.
pub fn rewrite_links(
    blocks: &mut [Block],
    doc_name: &str,
    own_idmap: &DocIdMap,
    config: &Config,
    artifacts_dir: &Path,
    cache: &mut HashMap<String, DocIdMap>,
) {
    for block in blocks {
        visit_mut(block, &mut |b| {
            if let Block::Link(link) = b {
                if let Some((new_url, caption)) = resolve(&link.url, link.internal, doc_name, own_idmap, config, artifacts_dir, cache) {
                    link.url = new_url;
                    if link.text.is_empty() {
                        if let Some(caption) = caption {
                            link.text = caption;
                        }
                    }
                } else {
                    log::error!("could not resolve link target {:?} from document {doc_name:?}", link.url);
                }
            }
            true
        });
    }
}

fn resolve(
    url: &str,
    internal: bool,
    doc_name: &str,
    own_idmap: &DocIdMap,
    config: &Config,
    artifacts_dir: &Path,
    cache: &mut HashMap<String, DocIdMap>,
) -> Option<(String, Option<String>)> {
    let rewritten = apply_regex_rewrites(url, &config.url_rewrites);
    let (mut adoc_ref, mut id_ref) = match rewritten.split_once('#') {
        Some((a, b)) => (a.to_string(), b.to_string()),
        None => (rewritten, String::new()),
    };

    if adoc_ref.is_empty() {
        adoc_ref = doc_name.to_string();
    } else if internal && !adoc_ref.ends_with(".adoc") {
        id_ref = adoc_ref;
        adoc_ref = doc_name.to_string();
    } else {
        adoc_ref = basename(&adoc_ref).to_string();
    }
    adoc_ref = apply_literal_rewrites(&adoc_ref, &config.url_rewrites);

    let lookup_key = if id_ref.is_empty() { adoc_ref.clone() } else { id_ref.clone() };

    let mut candidates = vec![adoc_ref.clone()];
    if let Some(fallback) = config.idmap_fallbacks.get(&adoc_ref) {
        candidates.push(fallback.clone());
    }

    for candidate_doc in candidates {
        let hit = if candidate_doc == doc_name {
            own_idmap.get(&lookup_key)
        } else {
            load_cached(&candidate_doc, artifacts_dir, cache).and_then(|m| m.get(&lookup_key))
        };
        if let Some(entry) = hit {
            let rel = relative_path(doc_name, &candidate_doc, &config.cross_links);
            let with_file = if rel.is_empty() { entry.file_name.clone() } else { adoc2md_syntax::join_path(&rel, &entry.file_name) };
            let new_url = if id_ref.is_empty() { with_file } else { format!("{with_file}#{id_ref}") };
            let caption = if entry.caption.is_empty() { None } else { Some(entry.caption.clone()) };
            return Some((new_url, caption));
        }
    }
    None
}

fn load_cached<'a>(doc: &str, artifacts_dir: &Path, cache: &'a mut HashMap<String, DocIdMap>) -> Option<&'a DocIdMap> {
    if !cache.contains_key(doc) {
        match load_sidecar(artifacts_dir, doc) {
            Ok(map) => {
                cache.insert(doc.to_string(), map);
            }
            Err(err) => {
                log::error!("failed to load idmap sidecar for {doc:?}: {err}");
                return None;
            }
        }
    }
    cache.get(doc)
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Counts path segments in `cross_links[src]` to climb back to the docs
/// root, then descends into `cross_links[target]`. Same document ⇒ empty
/// (same directory).
fn relative_path(src: &str, target: &str, cross_links: &HashMap<String, String>) -> String {
    if src == target {
        return String::new();
    }
    let src_root = cross_links.get(src).map(String::as_str).unwrap_or("");
    let target_root = cross_links.get(target).map(String::as_str).unwrap_or("");
    let up = src_root.split('/').filter(|s| !s.is_empty()).count();
    let mut parts: Vec<&str> = Vec::with_capacity(up + 2);
    let ups = vec![".."; up];
    parts.extend(ups.iter().copied());
    parts.extend(target_root.split('/').filter(|s| !s.is_empty()));
    parts.join("/")
}

fn apply_regex_rewrites(input: &str, rewrites: &HashMap<String, String>) -> String {
    static CACHE: Lazy<std::sync::Mutex<HashMap<String, Regex>>> = Lazy::new(|| std::sync::Mutex::new(HashMap::new()));
    let mut s = input.to_string();
    for (key, value) in rewrites {
        let Some(pattern) = key.strip_prefix('@') else { continue };
        let mut cache = CACHE.lock().unwrap();
        let re = cache.entry(pattern.to_string());
        let re = re.or_insert_with(|| Regex::new(pattern).unwrap_or_else(|_| Regex::new("$^").unwrap()));
        s = re.replace_all(&s, value.as_str()).into_owned();
    }
    s
}

fn apply_literal_rewrites(input: &str, rewrites: &HashMap<String, String>) -> String {
    let mut s = input.to_string();
    for (key, value) in rewrites {
        if !key.starts_with('@') {
            s = s.replace(key.as_str(), value.as_str());
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idmap::IdMapEntry;
    use adoc2md_ast::Link;

    fn link(url: &str, text: &str, internal: bool) -> Block {
        Block::Link(Link { url: url.to_string(), text: text.to_string(), internal })
    }

    #[test]
    fn bare_internal_id_resolves_against_own_idmap() {
        let mut own = DocIdMap::new();
        own.insert("v3.6".to_string(), IdMapEntry { file_name: "guide_2.md".to_string(), caption: "Version 3.6".to_string() });
        let mut blocks = vec![link("v3.6", "", true)];
        let config = Config::default();
        let mut cache = HashMap::new();
        rewrite_links(&mut blocks, "guide.adoc", &own, &config, Path::new("/art"), &mut cache);
        let Block::Link(l) = &blocks[0] else { panic!() };
        assert_eq!(l.url, "guide_2.md#v3.6");
        assert_eq!(l.text, "Version 3.6");
    }

    #[test]
    fn unresolved_link_is_left_unchanged() {
        let own = DocIdMap::new();
        let mut blocks = vec![link("missing", "text", true)];
        let config = Config::default();
        let mut cache = HashMap::new();
        rewrite_links(&mut blocks, "guide.adoc", &own, &config, Path::new("/art"), &mut cache);
        let Block::Link(l) = &blocks[0] else { panic!() };
        assert_eq!(l.url, "missing");
        assert_eq!(l.text, "text");
    }

    #[test]
    fn idmap_fallback_is_keyed_by_the_resolved_reference_target() {
        // "other.adoc" is missing its own sidecar, so the fallback
        // configured for it ("legacy_other.adoc") is tried next — the
        // fallback key is the referenced document (`adocRef`), not
        // "guide.adoc" (the document containing the link).
        let own = DocIdMap::new();
        let mut fallback_map = DocIdMap::new();
        fallback_map.insert(
            "setup".to_string(),
            IdMapEntry { file_name: "legacy_1.md".to_string(), caption: "Setup".to_string() },
        );
        let mut cache = HashMap::new();
        cache.insert("legacy_other.adoc".to_string(), fallback_map);

        let mut config = Config::default();
        config.idmap_fallbacks.insert("other.adoc".to_string(), "legacy_other.adoc".to_string());

        let mut blocks = vec![link("other.adoc#setup", "", true)];
        rewrite_links(&mut blocks, "guide.adoc", &own, &config, Path::new("/art"), &mut cache);
        let Block::Link(l) = &blocks[0] else { panic!() };
        assert_eq!(l.url, "legacy_1.md#setup");
    }

    #[test]
    fn relative_path_climbs_then_descends() {
        let mut cross = HashMap::new();
        cross.insert("a.adoc".to_string(), "guide/sub/".to_string());
        cross.insert("b.adoc".to_string(), "other/".to_string());
        assert_eq!(relative_path("a.adoc", "b.adoc", &cross), "../../other");
        assert_eq!(relative_path("a.adoc", "a.adoc", &cross), "");
    }
}
