//! Sequential tile code allocation for named terrains.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result, TileCode};

/// Maps terrain names to tile codes for one generation session.
///
/// The base terrain always gets `TileCode::BASE`; patches get consecutive
/// codes from `TileCode::FIRST_PATCH` in allocation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePalette {
    base: String,
    patches: Vec<(String, TileCode)>,
}

impl TilePalette {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            patches: Vec::new(),
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base
    }

    /// Code for `name`, allocating the next free one on first use.
    pub fn allocate(&mut self, name: &str) -> Result<TileCode> {
        if let Some(code) = self.code_of(name) {
            return Ok(code);
        }
        let code = u16::try_from(self.patches.len())
            .ok()
            .and_then(|n| TileCode::FIRST_PATCH.0.checked_add(n))
            .map(TileCode)
            .ok_or_else(|| Error::PaletteExhausted(name.to_string()))?;
        self.patches.push((name.to_string(), code));
        Ok(code)
    }

    pub fn code_of(&self, name: &str) -> Option<TileCode> {
        if name == self.base {
            return Some(TileCode::BASE);
        }
        self.patches.iter().find(|(n, _)| n == name).map(|&(_, code)| code)
    }

    pub fn name_of(&self, code: TileCode) -> Option<&str> {
        match code {
            TileCode::EMPTY => None,
            TileCode::BASE => Some(&self.base),
            _ => self.patches.iter().find(|(_, c)| *c == code).map(|(n, _)| n.as_str()),
        }
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    /// `(code, label)` for every code in use, empty first.
    pub fn legend(&self) -> Vec<(TileCode, String)> {
        let mut legend = vec![
            (TileCode::EMPTY, "empty".to_string()),
            (TileCode::BASE, self.base.clone()),
        ];
        legend.extend(self.patches.iter().map(|(n, c)| (*c, n.clone())));
        legend
    }
}
