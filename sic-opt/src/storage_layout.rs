//! Storage descriptor layout in constant buffer 0
//!
//! The driver writes one descriptor per bound storage buffer into constant
//! buffer slot 0. Each graphics stage owns a block of 16 descriptors; compute
//! shares the tessellation evaluation block since it never runs alongside
//! the tessellation or geometry stages. The backend reads descriptors back
//! through [`storage_cb_offset`], so these values must match the runtime
//! binding table exactly.
//!
//! All offsets are in 32-bit words.

use sic_common::ShaderStage;
use std::ops::Range;

pub use sic_common::STORAGE_MAX_COUNT;

/// First word of the descriptor area
pub const STORAGE_DESCS_BASE_OFFSET: u32 = 0x44;

/// Words per storage descriptor
pub const STORAGE_DESC_SIZE: u32 = 4;

/// Words per stage block
pub const STORAGE_DESCS_SIZE: u32 = STORAGE_DESC_SIZE * STORAGE_MAX_COUNT;

/// Offset of the first descriptor for `stage`
pub fn storage_base_cb_offset(stage: ShaderStage) -> u32 {
    let block = match stage {
        ShaderStage::Vertex => 0,
        ShaderStage::TessellationControl => 1,
        ShaderStage::TessellationEvaluation | ShaderStage::Compute => 2,
        ShaderStage::Geometry => 3,
        ShaderStage::Fragment => 4,
    };
    STORAGE_DESCS_BASE_OFFSET + block * STORAGE_DESCS_SIZE
}

/// `[start, end)` word range holding the descriptors of `stage`
pub fn storage_region(stage: ShaderStage) -> Range<u32> {
    let start = storage_base_cb_offset(stage);
    start..start + STORAGE_DESCS_SIZE
}

/// Offset of the descriptor for storage buffer `slot` of `stage`
///
/// `slot` must be below `STORAGE_MAX_COUNT` to land inside the stage block.
/// Larger slots wrap instead of panicking.
pub fn storage_cb_offset(stage: ShaderStage, slot: u32) -> u32 {
    storage_base_cb_offset(stage).wrapping_add(slot.wrapping_mul(STORAGE_DESC_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_bases() {
        assert_eq!(storage_base_cb_offset(ShaderStage::Vertex), 0x44);
        assert_eq!(storage_base_cb_offset(ShaderStage::TessellationControl), 0x44 + 64);
        assert_eq!(storage_base_cb_offset(ShaderStage::TessellationEvaluation), 0x44 + 2 * 64);
        assert_eq!(storage_base_cb_offset(ShaderStage::Geometry), 0x44 + 3 * 64);
        assert_eq!(storage_base_cb_offset(ShaderStage::Fragment), 0x44 + 4 * 64);
    }

    #[test]
    fn test_compute_aliases_tessellation_evaluation() {
        assert_eq!(
            storage_region(ShaderStage::Compute),
            storage_region(ShaderStage::TessellationEvaluation)
        );
    }

    #[test]
    fn test_graphics_regions_are_contiguous() {
        let graphics: Vec<_> = ShaderStage::ALL
            .into_iter()
            .filter(ShaderStage::is_graphics)
            .map(storage_region)
            .collect();
        assert_eq!(graphics.first().map(|r| r.start), Some(STORAGE_DESCS_BASE_OFFSET));
        for pair in graphics.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_slot_offsets() {
        assert_eq!(storage_cb_offset(ShaderStage::Geometry, 5), 0x44 + 3 * 64 + 5 * 4);
        assert_eq!(storage_cb_offset(ShaderStage::Vertex, 0), STORAGE_DESCS_BASE_OFFSET);
        let last = storage_cb_offset(ShaderStage::Fragment, STORAGE_MAX_COUNT - 1);
        assert!(storage_region(ShaderStage::Fragment).contains(&last));
    }

    #[test]
    fn test_out_of_range_slot_does_not_panic() {
        let offset = storage_cb_offset(ShaderStage::Fragment, 1 << 30);
        assert_eq!(offset, storage_base_cb_offset(ShaderStage::Fragment));
        let wrapped = storage_cb_offset(ShaderStage::Vertex, u32::MAX);
        assert!(!storage_region(ShaderStage::Vertex).contains(&wrapped));
    }
}
