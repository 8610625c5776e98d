/// A block of file data destined for one upload part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Raw chunk data. Only the final chunk may be shorter than the chunk size.
    pub data: Vec<u8>,
}

impl Chunk {
    /// Size of this chunk in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
