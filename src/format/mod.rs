//! `.rcad` store file layout.
//!
//! ```text
//! magic "RCAD" | version u32 | flags u32 | next_id u64 | record_count u64
//! records section:        len u64 | lz4(JSON array of documents)
//! priority index section: len u64 | PriorityIndex::to_bytes   (flag 0x1)
//! keyword index section:  len u64 | KeywordIndex::to_bytes    (flag 0x2)
//! ```
//!
//! All integers are little-endian. Version 1 files never carry index
//! sections; opening one rebuilds both indexes and rewrites it as the
//! current version.

pub mod reader;
pub mod writer;

pub use reader::{StoreImage, StoreReader};
pub use writer::{StoreSnapshot, StoreWriter};

/// File magic.
pub const MAGIC: [u8; 4] = *b"RCAD";

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 2;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 28;

/// Header flags describing which optional sections follow the records.
pub mod flags {
    pub const PRIORITY_INDEX: u32 = 0x1;
    pub const KEYWORD_INDEX: u32 = 0x2;
}

/// Fixed-size file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u32,
    pub flags: u32,
    /// Next id the store will hand out. Never decreases.
    pub next_id: u64,
    pub record_count: u64,
}

impl FileHeader {
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&MAGIC);
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..12].copy_from_slice(&self.flags.to_le_bytes());
        buf[12..20].copy_from_slice(&self.next_id.to_le_bytes());
        buf[20..28].copy_from_slice(&self.record_count.to_le_bytes());
        buf
    }

    /// Parse a header; `None` on short input or bad magic.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < HEADER_SIZE || data[0..4] != MAGIC {
            return None;
        }
        Some(Self {
            version: u32::from_le_bytes(data[4..8].try_into().ok()?),
            flags: u32::from_le_bytes(data[8..12].try_into().ok()?),
            next_id: u64::from_le_bytes(data[12..20].try_into().ok()?),
            record_count: u64::from_le_bytes(data[20..28].try_into().ok()?),
        })
    }
}
