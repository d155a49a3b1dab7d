//! Transposition table: a process-wide map from canonical key to per-piece
//! evaluation, with many-reader/single-writer concurrency and a hand-rolled
//! big-endian disk format.

use crate::error::TtLoadError;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

pub const DEFAULT_TT_PATH: &str = "ss_state.shmx";

pub struct TranspositionTable {
    map: RwLock<HashMap<u128, HashMap<u8, i8>>>,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TranspositionTable {
    pub fn new() -> Self {
        TranspositionTable {
            map: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts or overwrites `map[key][piece] = eval`.
    pub fn store(&self, key: u128, piece: u8, eval: i8) {
        let mut guard = self.map.write().unwrap();
        guard.entry(key).or_default().insert(piece, eval);
    }

    pub fn lookup(&self, key: u128, piece: u8) -> Option<i8> {
        let guard = self.map.read().unwrap();
        guard.get(&key).and_then(|inner| inner.get(&piece)).copied()
    }

    pub fn contains(&self, key: u128, piece: u8) -> bool {
        let guard = self.map.read().unwrap();
        guard
            .get(&key)
            .map(|inner| inner.contains_key(&piece))
            .unwrap_or(false)
    }

    /// Drops every `(key, piece)` entry whose eval is 0, and any key whose
    /// inner map becomes empty as a result. Called after a top-level
    /// alpha-beta search completes.
    pub fn purge_zero(&self) {
        let mut guard = self.map.write().unwrap();
        guard.retain(|_, inner| {
            inner.retain(|_, eval| *eval != 0);
            !inner.is_empty()
        });
    }

    pub fn clear(&self) {
        self.map.write().unwrap().clear();
    }

    /// Number of distinct canonical keys stored.
    pub fn size(&self) -> usize {
        self.map.read().unwrap().len()
    }

    /// Number of `(key, piece)` pairs stored across all keys.
    pub fn total_size(&self) -> usize {
        self.map.read().unwrap().values().map(|inner| inner.len()).sum()
    }

    /// Reads `path` and replaces the in-memory table with its contents.
    /// Returns `false` (and logs) on any open/read/decode failure, per the
    /// persistence failure policy: non-fatal, start (or stay) empty.
    pub fn load(&self, path: &Path) -> bool {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(?path, %err, "transposition table file unreadable, starting empty");
                return false;
            }
        };
        match decode(&bytes) {
            Ok(loaded) => {
                *self.map.write().unwrap() = loaded;
                tracing::info!(?path, "transposition table loaded");
                true
            }
            Err(err) => {
                tracing::error!(?path, %err, "transposition table corrupt, starting empty");
                false
            }
        }
    }

    pub fn save(&self, path: &Path) -> bool {
        let bytes = encode(&self.map.read().unwrap());
        match std::fs::write(path, bytes) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(?path, %err, "could not save transposition table");
                false
            }
        }
    }
}

/// Splits a full 128-bit canonical key into the 80 bits the disk format
/// persists: `B[0]` (bits 64..79, the packing's upper 16 bits) and
/// `B[1..4]` (bits 0..63, the packing's lower 64 bits). The middle 48 bits
/// (always zero under the current packing) are dropped, per the specified
/// (and preserved) on-disk layout.
#[inline]
fn split_key(key: u128) -> (u16, u64) {
    let upper = (key >> 64) as u16;
    let lower = key as u64;
    (upper, lower)
}

#[inline]
fn join_key(upper: u16, lower: u64) -> u128 {
    (upper as u128) << 64 | (lower as u128)
}

fn encode(map: &HashMap<u128, HashMap<u8, i8>>) -> Vec<u8> {
    let mut out = Vec::new();
    for (&key, inner) in map.iter() {
        let (upper, lower) = split_key(key);
        out.extend_from_slice(&upper.to_be_bytes());
        out.extend_from_slice(&lower.to_be_bytes());
        out.push(inner.len() as u8);
        for (&piece, &eval) in inner.iter() {
            out.push(piece);
            out.push(eval as u8);
        }
    }
    out
}

fn decode(bytes: &[u8]) -> Result<HashMap<u128, HashMap<u8, i8>>, TtLoadError> {
    let mut map = HashMap::new();
    let mut cursor = 0usize;

    while cursor < bytes.len() {
        if cursor + 11 > bytes.len() {
            return Err(TtLoadError::Truncated);
        }
        let upper = u16::from_be_bytes([bytes[cursor], bytes[cursor + 1]]);
        cursor += 2;
        let lower = u64::from_be_bytes(bytes[cursor..cursor + 8].try_into().unwrap());
        cursor += 8;
        let count = bytes[cursor] as usize;
        cursor += 1;

        let mut inner = HashMap::with_capacity(count);
        for _ in 0..count {
            if cursor + 2 > bytes.len() {
                return Err(TtLoadError::Truncated);
            }
            let piece = bytes[cursor];
            let eval = bytes[cursor + 1] as i8;
            cursor += 2;

            if piece >= 16 {
                return Err(TtLoadError::PieceIndexOutOfRange(piece));
            }
            if eval == 0 {
                return Err(TtLoadError::ZeroEvalOnDisk);
            }
            inner.insert(piece, eval);
        }
        map.insert(join_key(upper, lower), inner);
    }

    Ok(map)
}

static TABLE: OnceCell<TranspositionTable> = OnceCell::new();

/// The process-wide transposition table, lazily initialized on first use.
/// Attempts to load from [`DEFAULT_TT_PATH`]; starts empty (with a warning)
/// if that fails. Never torn down during the process lifetime.
pub fn table() -> &'static TranspositionTable {
    TABLE.get_or_init(|| {
        let tt = TranspositionTable::new();
        tt.load(Path::new(DEFAULT_TT_PATH));
        tt
    })
}
