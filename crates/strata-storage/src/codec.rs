//! Raw chunk file format.
//!
//! A chunk file is exactly `width * height * depth` bytes, one [`VoxelKind`]
//! tag per voxel, in the chunk's storage order (y-major, then z, then x).
//! There is no header, version or compression. Bytes past the expected
//! length are ignored.

use strata_voxel::{Chunk, VoxelKind};

/// Serializes a chunk's voxels to their on-disk tags.
pub fn encode_chunk(chunk: &Chunk) -> Vec<u8> {
    chunk.voxels().iter().map(|v| v.kind().tag()).collect()
}

/// Why a chunk file could not be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeFailure {
    /// Fewer bytes than the chunk volume.
    Truncated { expected: usize, actual: usize },
    /// A byte that is not a known kind tag.
    UnknownTag { index: usize, tag: u8 },
}

/// Decodes `bytes` into `chunk`, replacing its contents and marking it generated.
///
/// On failure the chunk is left untouched.
pub fn decode_into(bytes: &[u8], chunk: &mut Chunk) -> Result<(), DecodeFailure> {
    let expected = chunk.extent().volume();
    let Some(body) = bytes.get(..expected) else {
        return Err(DecodeFailure::Truncated {
            expected,
            actual: bytes.len(),
        });
    };
    if let Some((index, &tag)) = body
        .iter()
        .enumerate()
        .find(|(_, tag)| VoxelKind::from_tag(**tag).is_none())
    {
        return Err(DecodeFailure::UnknownTag { index, tag });
    }

    let mut tags = body.iter();
    chunk.generate_with(|_| {
        tags.next()
            .and_then(|&tag| VoxelKind::from_tag(tag))
            .unwrap_or_default()
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use glam::IVec3;
    use strata_voxel::{ChunkCoord, ChunkExtent};

    use super::*;

    fn chunk() -> Chunk {
        Chunk::new(ChunkCoord::new(1, 0, -1), ChunkExtent::new(3, 2, 2).unwrap()).unwrap()
    }

    #[test]
    fn test_encoding_is_y_major() {
        let mut c = chunk();
        c.set(IVec3::new(1, 0, 0), VoxelKind::Stone);
        c.set(IVec3::new(0, 0, 1), VoxelKind::Dirt);
        c.set(IVec3::new(0, 1, 0), VoxelKind::Grass);
        let bytes = encode_chunk(&c);
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes[1], VoxelKind::Stone.tag());
        assert_eq!(bytes[3], VoxelKind::Dirt.tag());
        assert_eq!(bytes[6], VoxelKind::Grass.tag());
    }

    #[test]
    fn test_decode_restores_kinds() {
        let mut src = chunk();
        src.set(IVec3::new(2, 1, 1), VoxelKind::Bedrock);
        src.set(IVec3::new(0, 0, 0), VoxelKind::Sand);
        let mut dst = chunk();
        decode_into(&encode_chunk(&src), &mut dst).unwrap();
        assert_eq!(dst.voxels(), src.voxels());
        assert!(dst.is_generated());
        assert!(!dst.is_modified());
    }

    #[test]
    fn test_short_file_is_rejected_and_chunk_untouched() {
        let mut dst = chunk();
        let err = decode_into(&[1; 11], &mut dst).unwrap_err();
        assert_eq!(err, DecodeFailure::Truncated { expected: 12, actual: 11 });
        assert!(!dst.is_generated());
        assert_eq!(dst.solid_count(), 0);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let mut bytes = vec![0u8; 12];
        bytes[5] = 42;
        let mut dst = chunk();
        assert_eq!(
            decode_into(&bytes, &mut dst),
            Err(DecodeFailure::UnknownTag { index: 5, tag: 42 })
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = vec![VoxelKind::Wood.tag(); 12];
        bytes.extend_from_slice(&[99, 99, 99]);
        let mut dst = chunk();
        decode_into(&bytes, &mut dst).unwrap();
        assert_eq!(dst.solid_count(), 12);
    }
}
