//! The `world.txt` key=value metadata file.
//!
//! Read by world-selection screens to list saved worlds. Unknown keys are
//! skipped and malformed values fall back to their defaults, so older or
//! hand-edited files still load.

use strata_voxel::ChunkExtent;

/// Summary written alongside a world on every save.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldMetadata {
    pub name: String,
    /// Unix timestamp in seconds.
    pub last_saved: u64,
    /// Number of chunks written by the save.
    pub chunk_count: usize,
    pub chunk_extent: Option<ChunkExtent>,
}

impl WorldMetadata {
    /// Renders the file contents, one `key=value` per line.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "name={}\nlast_saved={}\nchunk_count={}\n",
            self.name, self.last_saved, self.chunk_count
        );
        if let Some(e) = self.chunk_extent {
            out.push_str(&format!(
                "chunk_extent={}x{}x{}\n",
                e.width(),
                e.height(),
                e.depth()
            ));
        }
        out
    }

    /// Parses file contents. Never fails; see the module docs.
    pub fn parse(text: &str) -> Self {
        let mut meta = Self::default();
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "name" => meta.name = value.to_string(),
                "last_saved" => meta.last_saved = parse_or_warn(key, value),
                "chunk_count" => meta.chunk_count = parse_or_warn(key, value),
                "chunk_extent" => meta.chunk_extent = parse_extent(value),
                _ => {}
            }
        }
        meta
    }
}

fn parse_or_warn<T: std::str::FromStr + Default>(key: &str, value: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        tracing::warn!("world metadata: bad value for {key}: {value:?}");
        T::default()
    })
}

fn parse_extent(value: &str) -> Option<ChunkExtent> {
    let mut parts = value.split('x').map(|p| p.trim().parse::<i32>());
    let (w, h, d) = (parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?);
    if parts.next().is_some() {
        return None;
    }
    ChunkExtent::new(w, h, d).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_parses_back() {
        let meta = WorldMetadata {
            name: "alpha".into(),
            last_saved: 1_700_000_000,
            chunk_count: 42,
            chunk_extent: Some(ChunkExtent::DEFAULT),
        };
        assert_eq!(WorldMetadata::parse(&meta.to_text()), meta);
    }

    #[test]
    fn test_minimal_file_from_older_saves() {
        let meta = WorldMetadata::parse("last_saved=123\nchunk_count=7\n");
        assert_eq!(meta.last_saved, 123);
        assert_eq!(meta.chunk_count, 7);
        assert!(meta.name.is_empty());
        assert!(meta.chunk_extent.is_none());
    }

    #[test]
    fn test_garbage_is_tolerated() {
        let meta = WorldMetadata::parse("chunk_count=lots\nno equals sign\ncolour=blue\nchunk_extent=0x1x1\n");
        assert_eq!(meta.chunk_count, 0);
        assert!(meta.chunk_extent.is_none());
    }
}
