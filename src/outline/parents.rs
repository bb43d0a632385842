//! Reading the compiler-written outline.
//!
//! hyperref records one top-level bookmark per `\section`, in document order.
//! Those entries are the parents of the routine hierarchy; here we walk the
//! `/First`/`/Next` chain and resolve each entry's destination, direct
//! or named, down to a page number.

use super::page_tree::PageMap;
use anyhow::{anyhow, bail, Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// One file-section bookmark with its resolved page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentBookmark {
    pub title: String,
    pub page: u32,
}

/// The document's top-level outline entries, in outline order.
///
/// A document without an outline (e.g. one with zero sections) yields an
/// empty list, not an error.
pub fn read_parent_bookmarks(doc: &Document, pages: &PageMap) -> Result<Vec<ParentBookmark>> {
    let catalog = doc.catalog().with_context(|| "Document has no catalog")?;
    let outlines = match catalog.get(b"Outlines") {
        Ok(outlines) => match deref(doc, outlines) {
            Object::Dictionary(outlines) => outlines,
            _ => bail!("Document outline is not a dictionary"),
        },
        Err(_) => return Ok(Vec::new()),
    };

    let mut parents = Vec::new();
    let mut next = outlines.get(b"First").and_then(Object::as_reference).ok();
    while let Some(id) = next {
        let item = doc
            .get_dictionary(id)
            .with_context(|| format!("Failed to resolve outline item {} {}", id.0, id.1))?;

        let title = item
            .get(b"Title")
            .map(|title| decode_text(doc, title))
            .unwrap_or_default();
        let page_id = destination_page(doc, item)
            .with_context(|| format!("Failed to resolve destination of outline entry `{title}`"))?;
        let page = pages.number_of(page_id).ok_or_else(|| {
            anyhow!(
                "Outline entry `{title}` points at object {} {} which is not in the page tree",
                page_id.0,
                page_id.1
            )
        })?;

        parents.push(ParentBookmark { title, page });
        next = item.get(b"Next").and_then(Object::as_reference).ok();
    }

    Ok(parents)
}

/// Follow a reference one level down; other objects pass through unchanged.
fn deref<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// The page object an outline item's destination points at.
fn destination_page(doc: &Document, item: &Dictionary) -> Result<ObjectId> {
    // either a /Dest directly on the item, or a /GoTo action under /A
    let target = item
        .get(b"Dest")
        .or_else(|_| item.get(b"A"))
        .map_err(|_| anyhow!("Outline entry has neither /Dest nor /A"))?;
    resolve_destination(doc, target)
}

fn resolve_destination(doc: &Document, destination: &Object) -> Result<ObjectId> {
    match deref(doc, destination) {
        // explicit destination: [page /XYZ x y z]
        Object::Array(parts) => parts
            .first()
            .ok_or_else(|| anyhow!("Empty destination array"))?
            .as_reference()
            .with_context(|| "Destination does not reference a page object"),
        // named destination, resolved through the catalog
        Object::Name(name) => lookup_named_destination(doc, name),
        Object::String(name, _) => lookup_named_destination(doc, name),
        // a /GoTo action or a destination dictionary, both carry /D
        Object::Dictionary(dict) => {
            let inner = dict
                .get(b"D")
                .map_err(|_| anyhow!("Destination dictionary has no /D"))?;
            resolve_destination(doc, inner)
        }
        _ => bail!("Unsupported destination object"),
    }
}

/// Resolve a named destination through the catalog's `/Names` name tree
/// (PDF 1.2+) or the legacy flat `/Dests` dictionary (PDF 1.1).
fn lookup_named_destination(doc: &Document, name: &[u8]) -> Result<ObjectId> {
    let catalog = doc.catalog().with_context(|| "Document has no catalog")?;

    if let Ok(Object::Dictionary(names)) = catalog.get(b"Names").map(|o| deref(doc, o)) {
        if let Ok(Object::Dictionary(dests)) = names.get(b"Dests").map(|o| deref(doc, o)) {
            if let Some(found) = search_name_tree(doc, dests, name)? {
                return resolve_destination(doc, &found);
            }
        }
    }

    if let Ok(Object::Dictionary(dests)) = catalog.get(b"Dests").map(|o| deref(doc, o)) {
        if let Ok(found) = dests.get(name) {
            return resolve_destination(doc, found);
        }
    }

    bail!(
        "Named destination `{}` not found",
        String::from_utf8_lossy(name)
    )
}

fn search_name_tree(doc: &Document, node: &Dictionary, name: &[u8]) -> Result<Option<Object>> {
    if let Ok(pairs) = node.get(b"Names").and_then(Object::as_array) {
        for pair in pairs.chunks_exact(2) {
            if let Object::String(key, _) = deref(doc, &pair[0]) {
                if key.as_slice() == name {
                    return Ok(Some(pair[1].clone()));
                }
            }
        }
    }

    if let Ok(kids) = node.get(b"Kids").and_then(Object::as_array) {
        for kid in kids {
            let kid_id = kid
                .as_reference()
                .with_context(|| "Name tree kid is not a reference")?;
            let kid = doc
                .get_dictionary(kid_id)
                .with_context(|| "Failed to resolve name tree node")?;
            if let Some(found) = search_name_tree(doc, kid, name)? {
                return Ok(Some(found));
            }
        }
    }

    Ok(None)
}

/// Decode a PDF text string: UTF-16BE when it carries the byte-order mark,
/// otherwise treated as a byte string.
fn decode_text(doc: &Document, object: &Object) -> String {
    match deref(doc, object) {
        Object::String(bytes, _) => {
            if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF][..]) {
                let units: Vec<u16> = utf16
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            } else {
                String::from_utf8_lossy(bytes).into_owned()
            }
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::page_tree::{collect_page_tree, number_pages};
    use lopdf::dictionary;

    /// A two-page document with two top-level outline entries: the first with
    /// a direct destination array, the second with a /GoTo action into the
    /// /Names destination tree; the two forms hyperref-compiled documents
    /// actually use.
    fn fixture() -> Document {
        let mut doc = Document::with_version("1.5");
        let page1 = doc.add_object(dictionary! { "Type" => "Page" });
        let page2 = doc.add_object(dictionary! { "Type" => "Page" });
        let pages = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page1.into(), page2.into()],
            "Count" => 2,
        });

        let item2 = doc.add_object(dictionary! {
            "Title" => Object::string_literal("beta.f90"),
            "A" => dictionary! {
                "S" => "GoTo",
                "D" => Object::string_literal("section.2"),
            },
        });
        let item1 = doc.add_object(dictionary! {
            "Title" => Object::string_literal("alpha.f90"),
            "Dest" => vec![page1.into(), "XYZ".into(), Object::Null, Object::Null, Object::Null],
            "Next" => item2,
        });
        let outlines = doc.add_object(dictionary! {
            "Type" => "Outlines",
            "First" => item1,
            "Last" => item2,
        });

        let dests = doc.add_object(dictionary! {
            "Names" => vec![
                Object::string_literal("section.2"),
                vec![page2.into(), "XYZ".into(), Object::Null, Object::Null, Object::Null].into(),
            ],
        });
        let names = doc.add_object(dictionary! { "Dests" => dests });

        let catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages,
            "Outlines" => outlines,
            "Names" => names,
        });
        doc.trailer.set("Root", catalog);
        doc
    }

    #[test]
    fn reads_parents_in_outline_order_with_resolved_pages() {
        let doc = fixture();
        let pages = number_pages(&collect_page_tree(&doc).expect("tree collects"));

        let parents = read_parent_bookmarks(&doc, &pages).expect("outline reads");

        assert_eq!(
            parents,
            vec![
                ParentBookmark {
                    title: "alpha.f90".to_string(),
                    page: 0
                },
                ParentBookmark {
                    title: "beta.f90".to_string(),
                    page: 1
                },
            ]
        );
    }

    #[test]
    fn a_document_without_an_outline_yields_no_parents() {
        let mut doc = Document::with_version("1.5");
        let page = doc.add_object(dictionary! { "Type" => "Page" });
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page.into()],
            "Count" => 1,
        });
        let catalog = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog);

        let pages = number_pages(&collect_page_tree(&doc).expect("tree collects"));
        let parents = read_parent_bookmarks(&doc, &pages).expect("outline reads");
        assert!(parents.is_empty());
    }

    #[test]
    fn utf16_titles_are_decoded() {
        // "Hi" as UTF-16BE with a byte-order mark
        let title = Object::String(
            vec![0xFE, 0xFF, 0x00, b'H', 0x00, b'i'],
            lopdf::StringFormat::Literal,
        );
        let doc = Document::with_version("1.5");
        assert_eq!(decode_text(&doc, &title), "Hi");
    }

    #[test]
    fn an_unknown_named_destination_is_an_error() {
        let mut doc = fixture();
        // point the second entry at a name that isn't registered
        let item2_id = {
            let catalog = doc.catalog().unwrap();
            let outlines_id = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
            let outlines = doc.get_dictionary(outlines_id).unwrap();
            outlines.get(b"Last").unwrap().as_reference().unwrap()
        };
        if let Ok(Object::Dictionary(item)) = doc.get_object_mut(item2_id) {
            item.set(
                "A",
                dictionary! { "S" => "GoTo", "D" => Object::string_literal("nowhere") },
            );
        }

        let pages = number_pages(&collect_page_tree(&doc).expect("tree collects"));
        let err = read_parent_bookmarks(&doc, &pages).unwrap_err();
        assert!(format!("{err:#}").contains("nowhere"));
    }
}
