//! Layer compositor for base + patch tile layers.

use serde::{Deserialize, Serialize};

use crate::core::{Result, TileCode};
use crate::grid::Grid;
use crate::region::keep_largest;

/// Which patch keeps a cell when two patches cover it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchPrecedence {
    /// Iterative overwrite: base < earlier patch < later patch.
    #[default]
    LaterWins,
    /// The first patch to cover a cell keeps it.
    FirstClaimed,
}

/// Output views of one composite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeLayers {
    /// Base mask with patch codes written over it.
    pub combined: Grid,
    /// Walkable area: the base code on every non-empty cell of `combined`.
    pub expanded_base: Grid,
    /// Patch codes only; base cells are empty.
    pub patch_union: Grid,
}

/// Merges layers under a fixed precedence rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerCompositor {
    pub precedence: PatchPrecedence,
    /// Reduce `expanded_base` to its largest 4-connected region.
    pub reconnect_expanded_base: bool,
}

impl Default for LayerCompositor {
    fn default() -> Self {
        Self {
            precedence: PatchPrecedence::LaterWins,
            reconnect_expanded_base: true,
        }
    }
}

impl LayerCompositor {
    pub fn new(precedence: PatchPrecedence, reconnect_expanded_base: bool) -> Self {
        Self { precedence, reconnect_expanded_base }
    }

    /// Composite `base_mask` with `patches` in order.
    ///
    /// `None` patches (not produced) are skipped. Every patch grid must match
    /// the base dimensions. The base code used for `expanded_base` is the
    /// first non-empty code of the base mask, or `TileCode::BASE` when the
    /// base is empty.
    pub fn composite(
        &self,
        base_mask: &Grid,
        patches: &[(TileCode, Option<&Grid>)],
    ) -> Result<CompositeLayers> {
        let mut combined = base_mask.clone();
        let mut patch_union = base_mask.empty_like();

        for &(code, patch) in patches {
            let Some(patch) = patch else {
                log::debug!("composite: skipping missing patch {}", code);
                continue;
            };
            base_mask.ensure_same_dimensions(patch)?;

            for (idx, cell) in patch.cells().iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                let taken = !patch_union.cells()[idx].is_empty();
                if taken && self.precedence == PatchPrecedence::FirstClaimed {
                    continue;
                }
                patch_union.cells_mut()[idx] = code;
                combined.cells_mut()[idx] = code;
            }
        }

        let base_code = base_mask.first_code().unwrap_or(TileCode::BASE);
        let mut expanded_base = combined.clone();
        for cell in expanded_base.cells_mut() {
            if !cell.is_empty() {
                *cell = base_code;
            }
        }
        if self.reconnect_expanded_base {
            expanded_base = keep_largest(&expanded_base, base_code);
        }

        if combined.is_all_empty() {
            log::warn!("composite: base and patches are all empty");
        }

        Ok(CompositeLayers { combined, expanded_base, patch_union })
    }
}

/// Composite with the default rules (later patches win, expanded base reconnected).
pub fn composite(base_mask: &Grid, patches: &[(TileCode, Grid)]) -> Result<CompositeLayers> {
    let patches: Vec<_> = patches.iter().map(|(code, grid)| (*code, Some(grid))).collect();
    LayerCompositor::default().composite(base_mask, &patches)
}
