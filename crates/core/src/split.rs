//! Splitting a deck into contiguous parts.

use crate::error::{Error, Result};
use crate::locale::Language;
use crate::types::Document;

/// One contiguous slice of a split deck.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPart {
    /// 1-based part number.
    pub number: usize,
    /// Number of parts actually produced.
    pub total: usize,
    /// Position of this part's first slide in the undivided deck.
    pub offset: usize,
    pub document: Document,
}

/// Sizes of the contiguous chunks for `len` slides split into `parts`.
///
/// Chunks are `ceil(len / parts)` long, shortened only as far as needed so
/// that no chunk is empty. The result always has `min(parts, len)` entries
/// summing to `len`.
pub fn chunk_sizes(len: usize, parts: usize) -> Vec<usize> {
    let count = parts.min(len);
    if count == 0 {
        return Vec::new();
    }

    let size = len.div_ceil(count);
    let mut remaining = len;
    let mut sizes = Vec::with_capacity(count);
    for produced in 0..count {
        let still_needed = count - produced - 1;
        let chunk = size.min(remaining - still_needed);
        sizes.push(chunk);
        remaining -= chunk;
    }
    sizes
}

/// Partition a document into at most `parts` contiguous parts.
///
/// Slide order and ids are preserved. With more than one part each title is
/// suffixed with a localized "Part i of n" marker. Asking for more parts
/// than there are slides yields one part per slide.
pub fn split_document(document: &Document, parts: usize, language: Language) -> Result<Vec<DocumentPart>> {
    if parts == 0 {
        return Err(Error::InvalidInput("parts must be at least 1".to_string()));
    }
    document.validate()?;

    if parts == 1 {
        return Ok(vec![DocumentPart {
            number: 1,
            total: 1,
            offset: 0,
            document: document.clone(),
        }]);
    }

    let sizes = chunk_sizes(document.slides.len(), parts);
    let total = sizes.len();
    if total < parts {
        log::debug!(
            "Requested {} parts for {} slides, producing {}",
            parts,
            document.slides.len(),
            total
        );
    }

    let mut offset = 0;
    let mut result = Vec::with_capacity(total);
    for (idx, size) in sizes.into_iter().enumerate() {
        let slides = document.slides[offset..offset + size].to_vec();
        let title = language.part_title(&document.title, idx + 1, total);
        result.push(DocumentPart {
            number: idx + 1,
            total,
            offset,
            document: Document::new(title, slides),
        });
        offset += size;
    }

    Ok(result)
}
