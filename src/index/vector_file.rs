use std::fs::File;
use std::path::Path;

use memmap2::{Mmap, MmapOptions};

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::vector::Vector;
use crate::index::ItemIndex;

/// Per-record header preceding the float payload. Inherited from the ANN
/// tool that produces the file; skipped on read.
const RECORD_HEADER_BYTES: usize = 16;

/// Memory-mapped table of fixed-stride float32 vectors, one record per item
/// in item-index order. Read-only.
#[derive(Debug)]
pub struct VectorFile {
    mmap: Mmap,
    dimensions: usize,
    number_of_items: usize,
    stride: usize,
}

impl VectorFile {
    pub fn open(
        path: impl AsRef<Path>,
        dimensions: usize,
        number_of_items: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            Error::new(
                ErrorKind::Io,
                format!("can't open the vector file at {}: {}", path.display(), err),
            )
        })?;

        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|err| {
            Error::new(
                ErrorKind::Io,
                format!("can't mmap the vector file at {}: {}", path.display(), err),
            )
        })?;

        let stride = RECORD_HEADER_BYTES + 4 * dimensions;
        if stride * number_of_items > mmap.len() {
            return Err(Error::new(
                ErrorKind::CorruptIndex,
                format!(
                    "vector file holds {} bytes but {} items of stride {} need {}",
                    mmap.len(),
                    number_of_items,
                    stride,
                    stride * number_of_items
                ),
            ));
        }

        Ok(VectorFile {
            mmap,
            dimensions,
            number_of_items,
            stride,
        })
    }

    pub fn number_of_items(&self) -> usize {
        self.number_of_items
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn vector_for(&self, index: ItemIndex) -> Result<Vector> {
        if index >= self.number_of_items {
            return Err(Error::new(
                ErrorKind::OutOfBounds,
                format!("item {} out of bounds for {} vectors", index, self.number_of_items),
            ));
        }

        let begin = index * self.stride + RECORD_HEADER_BYTES;
        let payload = &self.mmap[begin..begin + 4 * self.dimensions];

        let components = payload
            .chunks_exact(4)
            .map(|bytes| f32::from_le_bytes(bytes.try_into().expect("4-byte chunk")))
            .collect();

        Ok(Vector::new(components))
    }
}
