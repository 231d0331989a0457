//! Bundling the packages of a split deck into one archive.

use crate::archive::{write_archive, Entry};
use deck_core::Result;

/// One packaged part of a split deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPart {
    pub number: usize,
    pub total: usize,
    pub bytes: Vec<u8>,
}

/// `{stem}_Part_{i}_of_{n}.pptx`
pub fn part_filename(stem: &str, number: usize, total: usize) -> String {
    format!("{}_Part_{}_of_{}.pptx", stem, number, total)
}

/// Store every part under its deterministic name, in part order.
pub fn write_bundle(stem: &str, parts: &[PackedPart]) -> Result<Vec<u8>> {
    log::debug!("Bundling {} parts of '{}'", parts.len(), stem);
    let entries: Vec<Entry> = parts
        .iter()
        .map(|part| Entry::new(part_filename(stem, part.number, part.total), part.bytes.clone()))
        .collect();
    write_archive(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use zip::ZipArchive;

    #[test]
    fn test_part_filename() {
        assert_eq!(part_filename("Roadmap", 2, 3), "Roadmap_Part_2_of_3.pptx");
    }

    #[test]
    fn test_bundle_entries_in_order() {
        let parts: Vec<PackedPart> = (1..=3)
            .map(|number| PackedPart {
                number,
                total: 3,
                bytes: vec![number as u8],
            })
            .collect();
        let bytes = write_bundle("Deck", &parts).unwrap();

        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(archive.len(), 3);
        assert!(names.contains(&"Deck_Part_1_of_3.pptx"));
        assert!(names.contains(&"Deck_Part_3_of_3.pptx"));
    }
}
