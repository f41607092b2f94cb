//! Table persistence: one checksummed file per table.
//!
//! # File layout
//!
//! ```text
//! +-------+---------+----------+-------------+-----------------+---------+
//! | RALG  | version | encoding | compression | sha256(payload) | payload |
//! | 4 B   | 1 B     | 1 B      | 1 B         | 32 B            | ...     |
//! +-------+---------+----------+-------------+-----------------+---------+
//! ```
//!
//! The payload is a bincode or JSON image of the table, optionally zstd
//! compressed. The checksum covers the payload exactly as stored.

use crate::config::{StoreConfig, StoreFormat};
use crate::error::{RelError, RelResult};
use crate::index::IndexKind;
use crate::schema::Schema;
use crate::table::Table;
use crate::types::{Domain, Tuple};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const MAGIC: &[u8; 4] = b"RALG";
const FORMAT_VERSION: u8 = 1;
const CHECKSUM_LEN: usize = 32;
const HEADER_LEN: usize = MAGIC.len() + 3 + CHECKSUM_LEN;

const COMPRESSION_NONE: u8 = 0;
const COMPRESSION_ZSTD: u8 = 1;

/// Serialized form of a table
#[derive(Debug, Serialize, Deserialize)]
struct TableImage {
    name: String,
    attributes: Vec<String>,
    domains: Vec<Domain>,
    key: Vec<String>,
    index: IndexKind,
    tuples: Vec<Tuple>,
}

impl TableImage {
    fn capture(table: &Table) -> Self {
        let schema = table.schema();
        Self {
            name: table.name().to_string(),
            attributes: schema.attributes().to_vec(),
            domains: schema.domains().to_vec(),
            key: schema.key().to_vec(),
            index: table.index_kind(),
            tuples: table.tuples().to_vec(),
        }
    }

    /// Rebuild the table, re-validating the schema and every tuple.
    fn restore(self) -> RelResult<Table> {
        let schema = Schema::new(self.attributes, self.domains, self.key)?;
        for tuple in &self.tuples {
            schema.type_check(tuple)?;
        }
        Ok(Table::derived(self.name, schema, self.index, self.tuples))
    }
}

/// Saves and loads tables under a [`StoreConfig`] directory.
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    config: StoreConfig,
}

impl TableStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// File holding the table called `name`; see [`StoreConfig::path_for`].
    pub fn path_for(&self, name: &str) -> RelResult<PathBuf> {
        self.config.path_for(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_ok_and(|path| path.is_file())
    }

    /// Write `table` to `<dir>/<name>.<ext>`, replacing any previous file.
    pub fn save(&self, table: &Table) -> RelResult<PathBuf> {
        let path = self.path_for(table.name())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let bytes = self.encode(&TableImage::capture(table))?;
        fs::write(&path, &bytes)?;

        info!(
            table = %table.name(),
            path = %path.display(),
            rows = table.len(),
            bytes = bytes.len(),
            "table saved"
        );
        Ok(path)
    }

    /// Read the table called `name` back from disk.
    pub fn load(&self, name: &str) -> RelResult<Table> {
        let path = self.path_for(name)?;
        let bytes = fs::read(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => persistence(&path, "no such table file"),
            _ => RelError::Io { source: err },
        })?;

        let table = decode(&path, &bytes)?.restore()?;
        info!(table = %table.name(), path = %path.display(), rows = table.len(), "table loaded");
        Ok(table)
    }

    fn encode(&self, image: &TableImage) -> RelResult<Vec<u8>> {
        let raw = match self.config.format {
            StoreFormat::Binary => bincode::serialize(image)?,
            StoreFormat::Json => serde_json::to_vec(image)?,
        };
        let (compression, payload) = match self.config.compression_level {
            Some(level) => (COMPRESSION_ZSTD, compress(&raw, level)?),
            None => (COMPRESSION_NONE, raw),
        };
        debug!(
            format = self.config.format.as_str(),
            compressed = compression == COMPRESSION_ZSTD,
            payload = payload.len(),
            "encoding table image"
        );

        let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
        out.extend_from_slice(MAGIC);
        out.push(FORMAT_VERSION);
        out.push(self.config.format.tag());
        out.push(compression);
        out.extend_from_slice(&checksum(&payload));
        out.extend_from_slice(&payload);
        Ok(out)
    }
}

/// Parse a file produced by [`TableStore::save`]. Encoding and compression
/// come from the header, not from the store's config.
fn decode(path: &Path, bytes: &[u8]) -> RelResult<TableImage> {
    if bytes.len() < HEADER_LEN {
        return Err(persistence(path, "file truncated"));
    }
    let (header, payload) = bytes.split_at(HEADER_LEN);
    if &header[..4] != MAGIC {
        return Err(persistence(path, "not a table file"));
    }
    if header[4] != FORMAT_VERSION {
        return Err(persistence(path, &format!("unsupported format version {}", header[4])));
    }
    let format = StoreFormat::from_tag(header[5])
        .ok_or_else(|| persistence(path, &format!("unknown encoding {}", header[5])))?;
    if checksum(payload).as_slice() != &header[7..] {
        return Err(persistence(path, "checksum mismatch"));
    }

    let raw = match header[6] {
        COMPRESSION_NONE => payload.to_vec(),
        COMPRESSION_ZSTD => decompress(payload)?,
        other => return Err(persistence(path, &format!("unknown compression {other}"))),
    };
    Ok(match format {
        StoreFormat::Binary => bincode::deserialize(&raw)?,
        StoreFormat::Json => serde_json::from_slice(&raw)?,
    })
}

fn persistence(path: &Path, message: &str) -> RelError {
    RelError::Persistence {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

fn compress(data: &[u8], level: i32) -> RelResult<Vec<u8>> {
    zstd::encode_all(data, level)
        .map_err(|e| RelError::Serialization(format!("Compression failed: {}", e)))
}

fn decompress(data: &[u8]) -> RelResult<Vec<u8>> {
    zstd::decode_all(data)
        .map_err(|e| RelError::Serialization(format!("Decompression failed: {}", e)))
}

fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

impl Table {
    /// Save through `store`; see [`TableStore::save`].
    pub fn save(&self, store: &TableStore) -> RelResult<PathBuf> {
        store.save(self)
    }

    /// Load `name` through `store`; see [`TableStore::load`].
    pub fn load(store: &TableStore, name: &str) -> RelResult<Table> {
        store.load(name)
    }
}
