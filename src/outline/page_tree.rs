//! Page tree traversal and numbering.
//!
//! The PDF page tree nests leaf pages under collection nodes. Outline
//! destinations may reference either kind, so the numbering records an entry
//! for both: a leaf gets its own sequential number, a collection resolves to
//! the number of its first descendant leaf.

use anyhow::{anyhow, bail, Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};

/// A type-tagged node of the document's page tree.
#[derive(Debug)]
pub enum PageNode {
    Collection { id: ObjectId, kids: Vec<PageNode> },
    Leaf { id: ObjectId },
}

/// Build the [`PageNode`] tree from the document catalog's `/Pages` entry.
///
/// A node without a recognizable type tag, or a reference cycle, is a
/// malformed page tree and fatal: bookmark pages can't be resolved against it.
pub fn collect_page_tree(doc: &Document) -> Result<PageNode> {
    let catalog = doc.catalog().with_context(|| "Document has no catalog")?;
    let pages_id = catalog
        .get(b"Pages")
        .and_then(Object::as_reference)
        .with_context(|| "Document catalog has no page tree")?;

    let mut visited = HashSet::new();
    collect_node(doc, pages_id, &mut visited)
}

fn collect_node(
    doc: &Document,
    id: ObjectId,
    visited: &mut HashSet<ObjectId>,
) -> Result<PageNode> {
    if !visited.insert(id) {
        bail!("Page tree contains a reference cycle at object {} {}", id.0, id.1);
    }

    let node = doc
        .get_dictionary(id)
        .with_context(|| format!("Failed to resolve page tree object {} {}", id.0, id.1))?;
    let type_tag = node
        .get(b"Type")
        .and_then(Object::as_name)
        .map_err(|_| anyhow!("Page tree object {} {} has no type tag", id.0, id.1))?;

    if type_tag == b"Pages" {
        let kid_refs = node
            .get(b"Kids")
            .and_then(Object::as_array)
            .with_context(|| format!("Page tree node {} {} has no kids array", id.0, id.1))?;

        let mut kids = Vec::with_capacity(kid_refs.len());
        for kid in kid_refs {
            let kid_id = kid
                .as_reference()
                .with_context(|| format!("Page tree node {} {} has a non-reference kid", id.0, id.1))?;
            kids.push(collect_node(doc, kid_id, visited)?);
        }
        Ok(PageNode::Collection { id, kids })
    } else if type_tag == b"Page" {
        Ok(PageNode::Leaf { id })
    } else {
        bail!(
            "Unexpected page tree node type `{}` at object {} {}",
            String::from_utf8_lossy(type_tag),
            id.0,
            id.1
        );
    }
}

/// Zero-based page numbers for every node of the page tree.
pub struct PageMap {
    numbers: HashMap<ObjectId, u32>,
    leaves: Vec<ObjectId>,
}

impl PageMap {
    /// The page number a node resolves to, if any.
    pub fn number_of(&self, id: ObjectId) -> Option<u32> {
        self.numbers.get(&id).copied()
    }

    /// The leaf page object at a zero-based page number.
    pub fn leaf(&self, page: u32) -> Option<ObjectId> {
        self.leaves.get(page as usize).copied()
    }

    pub fn page_count(&self) -> u32 {
        self.leaves.len() as u32
    }
}

/// Number the tree's leaves 0..n-1 in depth-first, left-to-right order.
pub fn number_pages(root: &PageNode) -> PageMap {
    let mut map = PageMap {
        numbers: HashMap::new(),
        leaves: Vec::new(),
    };
    number_node(root, &mut map);
    map
}

fn number_node(node: &PageNode, map: &mut PageMap) {
    match node {
        PageNode::Leaf { id } => {
            map.numbers.insert(*id, map.leaves.len() as u32);
            map.leaves.push(*id);
        }
        PageNode::Collection { id, kids } => {
            let first = map.leaves.len() as u32;
            for kid in kids {
                number_node(kid, map);
            }
            // a collection with no leaves beneath it resolves to nothing
            if (map.leaves.len() as u32) > first {
                map.numbers.insert(*id, first);
            }
        }
    }
}
