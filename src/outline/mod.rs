//! PDF outline post-processing.
//!
//! This is the heart of the tool: after the TeX engine has produced the PDF,
//! we map every page-tree node to its page number, read back the file-section
//! bookmarks hyperref wrote, scan every page's text for routine declarations,
//! and rebuild the outline as a two-level tree: one parent per file section,
//! one child per routine found on that section's pages.

mod hierarchy;
mod page_tree;
mod parents;
mod routines;

pub use hierarchy::{build_hierarchy, FileOutline};
pub use page_tree::{collect_page_tree, number_pages, PageMap, PageNode};
pub use parents::{read_parent_bookmarks, ParentBookmark};
pub use routines::{extract_routines, RoutineMatcher, RoutineOccurrence};

use crate::language::Language;
use anyhow::{Context, Result};
use lopdf::{Bookmark, Document, Object};
use std::path::Path;

pub struct AnnotateStats {
    pub parents: usize,
    pub routines: usize,
}

/// Rewrite the PDF at `pdf_path` with the two-level routine outline.
pub fn annotate(pdf_path: &Path, language: &Language) -> Result<AnnotateStats> {
    let mut doc =
        Document::load(pdf_path).with_context(|| format!("Failed to load {}", pdf_path.display()))?;

    let root = collect_page_tree(&doc).with_context(|| "Failed to walk the page tree")?;
    let pages = number_pages(&root);
    log::debug!("located {} pages", pages.page_count());

    let parents =
        read_parent_bookmarks(&doc, &pages).with_context(|| "Failed to read the outline")?;
    log::debug!("found {} file sections", parents.len());

    let routines = match RoutineMatcher::for_language(language) {
        Some(matcher) => extract_routines(&doc, pages.page_count(), &matcher)?,
        None => Vec::new(),
    };
    log::debug!("found {} routine declarations", routines.len());

    let outline = build_hierarchy(&parents, &routines);
    let routine_count = outline.iter().map(|f| f.routines.len()).sum();

    write_outline(&mut doc, &pages, &outline)?;
    doc.compress();
    doc.save(pdf_path)
        .with_context(|| format!("Failed to save {}", pdf_path.display()))?;

    Ok(AnnotateStats {
        parents: parents.len(),
        routines: routine_count,
    })
}

/// Replace the document's outline with the freshly built hierarchy.
fn write_outline(doc: &mut Document, pages: &PageMap, outline: &[FileOutline]) -> Result<()> {
    const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

    for file in outline {
        let page_id = pages
            .leaf(file.page)
            .with_context(|| format!("Section `{}` points past the last page", file.title))?;
        let parent_id =
            doc.add_bookmark(Bookmark::new(file.title.clone(), BLACK, 0, page_id), None);

        for routine in &file.routines {
            let page_id = pages.leaf(routine.page).with_context(|| {
                format!("Routine `{}` points past the last page", routine.name)
            })?;
            doc.add_bookmark(
                Bookmark::new(routine.name.clone(), BLACK, 0, page_id),
                Some(parent_id),
            );
        }
    }

    doc.adjust_zero_pages();
    if let Some(outline_id) = doc.build_outline() {
        let catalog_id = doc
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .with_context(|| "Document has no catalog reference")?;
        if let Object::Dictionary(catalog) = doc
            .get_object_mut(catalog_id)
            .with_context(|| "Failed to resolve the document catalog")?
        {
            catalog.set("Outlines", Object::Reference(outline_id));
        }
    }

    Ok(())
}
