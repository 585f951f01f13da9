use std::cmp::Ordering;
use std::fs::File;
use std::path::Path;

use memmap2::{Mmap, MmapOptions};

use crate::core::error::{Error, ErrorKind, Result};
use crate::index::{occurrence_percentiles, ItemIndex};

const HEADER_BYTES: usize = 24;

/// Memory-mapped dictionary of words sorted by byte order.
///
/// File layout (all integers little-endian):
/// 8 bytes word count, 8 bytes vector width, 8 bytes metadata length,
/// the metadata JSON, padding up to the next 4-byte boundary, an 8-byte
/// absolute-offset pointer table with one entry per word, and per word an
/// 8-byte occurrence followed by the NUL-terminated UTF-8 word.
#[derive(Debug)]
pub struct Wordlist {
    mmap: Mmap,
    number_of_words: u64,
    vector_width: u64,
    metadata: serde_json::Value,
    start_of_table: usize,
    occurrence_percentiles: Vec<u64>,
}

impl Wordlist {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            Error::new(
                ErrorKind::Io,
                format!("can't open the wordlist at {}: {}", path.display(), err),
            )
        })?;

        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|err| {
            Error::new(
                ErrorKind::Io,
                format!("can't mmap the wordlist at {}: {}", path.display(), err),
            )
        })?;

        if mmap.len() < HEADER_BYTES {
            return Err(Error::new(
                ErrorKind::CorruptIndex,
                format!("wordlist header needs {} bytes, file has {}", HEADER_BYTES, mmap.len()),
            ));
        }

        let number_of_words = read_u64(&mmap, 0);
        let vector_width = read_u64(&mmap, 8);
        let metadata_length = read_u64(&mmap, 16) as usize;

        if HEADER_BYTES + metadata_length > mmap.len() {
            return Err(Error::new(
                ErrorKind::CorruptIndex,
                "metadata length points past the end of the file",
            ));
        }

        let metadata = if metadata_length == 0 {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&mmap[HEADER_BYTES..HEADER_BYTES + metadata_length])?
        };

        // The format always pads 1-4 bytes, even when the metadata already
        // ends on a 4-byte boundary.
        let mut start_of_table = HEADER_BYTES + metadata_length;
        start_of_table += 4 - (start_of_table % 4);

        let table_end = start_of_table + 8 * number_of_words as usize;
        if table_end > mmap.len() {
            return Err(Error::new(
                ErrorKind::CorruptIndex,
                "word pointer table is truncated",
            ));
        }

        let mut wordlist = Wordlist {
            mmap,
            number_of_words,
            vector_width,
            metadata,
            start_of_table,
            occurrence_percentiles: Vec::new(),
        };

        // Walking every entry up front doubles as validation of the pointer
        // table, the NUL terminators, and the UTF-8 payloads.
        let mut occurrences = Vec::with_capacity(number_of_words as usize);
        for index in 0..number_of_words as usize {
            wordlist.check_entry(index)?;
            let (_, occurrence) = wordlist.get(index)?;
            occurrences.push(occurrence);
        }
        wordlist.occurrence_percentiles = occurrence_percentiles(occurrences);

        Ok(wordlist)
    }

    pub fn number_of_words(&self) -> u64 {
        self.number_of_words
    }

    pub fn vector_width(&self) -> u64 {
        self.vector_width
    }

    /// Opaque build metadata stored in the file header.
    pub fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }

    pub fn occurrence_percentile(&self, percentile: usize) -> Result<u64> {
        if percentile > 100 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("occurrence percentile must be between 0 and 100, got {}", percentile),
            ));
        }

        Ok(self.occurrence_percentiles[percentile])
    }

    /// Binary search over the pointer table. `None` if the word isn't part
    /// of the vocabulary.
    pub fn find(&self, word: &str) -> Option<ItemIndex> {
        let mut needle = Vec::with_capacity(word.len() + 1);
        needle.extend_from_slice(word.as_bytes());
        needle.push(0);

        let mut low: i64 = 0;
        let mut high: i64 = self.number_of_words as i64 - 1;

        while low <= high {
            let midpoint = ((low + high) / 2) as usize;
            let entry = self.entry(midpoint);

            // The last entry runs to the end of the map; clamp the compare
            // window so a long needle never reads past the mapped region.
            let end = (8 + needle.len()).min(entry.len());

            match needle.as_slice().cmp(&entry[8..end]) {
                Ordering::Equal => return Some(midpoint),
                Ordering::Less => high = midpoint as i64 - 1,
                Ordering::Greater => low = midpoint as i64 + 1,
            }
        }

        None
    }

    /// Word and occurrence stored at the given index.
    pub fn get(&self, index: ItemIndex) -> Result<(&str, u64)> {
        if index >= self.number_of_words as usize {
            return Err(Error::new(
                ErrorKind::OutOfBounds,
                format!("item {} out of bounds for {} words", index, self.number_of_words),
            ));
        }

        let entry = self.entry(index);
        let occurrence = read_u64(entry, 0);

        let terminator = entry[8..]
            .iter()
            .position(|&byte| byte == 0)
            .ok_or_else(|| {
                Error::new(ErrorKind::CorruptIndex, format!("word {} is not NUL-terminated", index))
            })?;

        let word = std::str::from_utf8(&entry[8..8 + terminator]).map_err(|err| {
            Error::new(ErrorKind::CorruptIndex, format!("word {} is not UTF-8: {}", index, err))
        })?;

        Ok((word, occurrence))
    }

    fn entry(&self, index: ItemIndex) -> &[u8] {
        let pointer = self.start_of_table + index * 8;
        let address = read_u64(&self.mmap, pointer) as usize;
        &self.mmap[address..]
    }

    fn check_entry(&self, index: ItemIndex) -> Result<()> {
        let pointer = self.start_of_table + index * 8;
        let address = read_u64(&self.mmap, pointer) as usize;

        // Smallest valid entry: 8-byte occurrence plus the terminator of an
        // empty word.
        if address + 9 > self.mmap.len() {
            return Err(Error::new(
                ErrorKind::CorruptIndex,
                format!("word pointer {} points past the end of the file", index),
            ));
        }

        Ok(())
    }
}

fn read_u64(buffer: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(buffer[offset..offset + 8].try_into().expect("8-byte slice"))
}
