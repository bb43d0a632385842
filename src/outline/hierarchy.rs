//! The bookmark hierarchy: attaching routine occurrences to file sections.

use super::parents::ParentBookmark;
use super::routines::RoutineOccurrence;

/// One file section plus the routines that landed on its pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutline {
    pub title: String,
    pub page: u32,
    pub routines: Vec<RoutineOccurrence>,
}

/// Attach each occurrence to the parent whose page range contains it.
///
/// Parent *i* owns the half-open page range `[page_i, page_{i+1})`; the last
/// parent owns everything from its own page up. Occurrences before the first
/// parent's page belong to no section and are dropped. The scan over
/// occurrences resumes where the previous parent stopped, so the whole pass
/// is linear and an occurrence can never land under two parents. When
/// consecutive parents share a page the earlier one claims the occurrences on
/// that page, even though its half-open range is empty.
pub fn build_hierarchy(
    parents: &[ParentBookmark],
    occurrences: &[RoutineOccurrence],
) -> Vec<FileOutline> {
    let mut outline = Vec::with_capacity(parents.len());
    let mut next = 0usize;

    if let Some(first) = parents.first() {
        while next < occurrences.len() && occurrences[next].page < first.page {
            next += 1;
        }
    }

    for (i, parent) in parents.iter().enumerate() {
        let upper = parents.get(i + 1).map(|p| p.page);
        let mut routines = Vec::new();

        while next < occurrences.len() {
            let occurrence = &occurrences[next];
            let claimed = match upper {
                Some(upper) => occurrence.page < upper || occurrence.page == parent.page,
                None => true,
            };
            if !claimed {
                break;
            }
            routines.push(occurrence.clone());
            next += 1;
        }

        outline.push(FileOutline {
            title: parent.title.clone(),
            page: parent.page,
            routines,
        });
    }

    outline
}
