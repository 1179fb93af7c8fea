use std::fs::{self, File};
use std::path::Path;

use memmap2::Mmap;

use super::{PhraseCandidate, PhraseTable, PhraseTableError};

/// Leading bytes of a compiled phrase table.
pub const MAGIC: &[u8; 4] = b"LXPT";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 4 + 1 + 4 + 4; // magic + version + body_len + crc32 = 13

impl PhraseTable {
    /// Serialize to the `LXPT` format. Entries are written sorted by phrase so
    /// identical tables produce identical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PhraseTableError> {
        let mut pairs: Vec<(&String, &Vec<PhraseCandidate>)> = self.entries.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        let body = bincode::serialize(&pairs).map_err(PhraseTableError::Serialize)?;

        let body_len: u32 = body.len().try_into().map_err(|_| {
            PhraseTableError::Serialize(Box::new(bincode::ErrorKind::Custom(
                "phrase table exceeds u32::MAX bytes".to_string(),
            )))
        })?;
        let crc = crc32fast::hash(&body);

        let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body_len.to_le_bytes());
        buf.extend_from_slice(&crc.to_le_bytes());
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, PhraseTableError> {
        if data.len() < 5 {
            return Err(PhraseTableError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(PhraseTableError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(PhraseTableError::UnsupportedVersion(data[4]));
        }
        if data.len() < HEADER_SIZE {
            return Err(PhraseTableError::InvalidHeader);
        }

        let body_len = read_u32(&data[5..9]) as usize;
        let expected = read_u32(&data[9..13]);
        let body = data
            .get(HEADER_SIZE..HEADER_SIZE + body_len)
            .ok_or(PhraseTableError::InvalidHeader)?;

        let actual = crc32fast::hash(body);
        if actual != expected {
            return Err(PhraseTableError::Checksum { expected, actual });
        }

        let pairs: Vec<(String, Vec<PhraseCandidate>)> =
            bincode::deserialize(body).map_err(PhraseTableError::Deserialize)?;
        Ok(Self::from_entries(pairs))
    }

    /// Open a compiled table through a read-only memory map.
    pub fn open(path: &Path) -> Result<Self, PhraseTableError> {
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and the mapping is immutable.
        // The Mmap is dropped once deserialization below has copied the data out.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap)
    }

    pub fn save(&self, path: &Path) -> Result<(), PhraseTableError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}
