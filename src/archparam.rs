// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tile shapes for the tiled gemm.
//!
//! The shape is a tuning table, not part of the algorithm: larger matrices
//! use wider column blocks and shorter row blocks, keeping the rows of the
//! right matrix that one block touches resident in cache.
//!
//! Setting both `VECTORBENCH_TILE_WIDTH` and `VECTORBENCH_TILE_HEIGHT` at
//! build time replaces the default table with that single tile.

use std::borrow::Cow;

use crate::constparse::parse_unwarp;
use crate::error::{Error, Result};

/// Column block width must be a multiple of this (the widest chunk).
pub(crate) const TILE_WIDTH_MULTIPLE: usize = 64;

/// Block shape of the tiled gemm
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Columns of `result` (and `right`) per column block
    pub width: usize,
    /// Rows of `right` (columns of `left`) per row block
    pub height: usize,
}

/// Use `tile` for problem sizes `n >= min_n`, up to the next rule
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileRule {
    pub min_n: usize,
    pub tile: Tile,
}

/// Mapping from problem size to tile shape.
///
/// ```
/// use vectorbench::{Tile, TileRule, TileTable};
///
/// let table = TileTable::new(vec![
///     TileRule { min_n: 0, tile: Tile { width: 128, height: 64 } },
///     TileRule { min_n: 1024, tile: Tile { width: 1024, height: 4 } },
/// ]).unwrap();
/// assert_eq!(table.tile_for(512).width, 128);
/// assert_eq!(table.tile_for(2048).height, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileTable {
    rules: Cow<'static, [TileRule]>,
}

const fn rule(min_n: usize, width: usize, height: usize) -> TileRule {
    TileRule { min_n, tile: Tile { width, height } }
}

static TUNED_RULES: [TileRule; 3] = [
    rule(0, 256, 32),
    rule(256, 512, 16),
    rule(512, 512, 8),
];

const TILE_WIDTH_ENV: Option<&str> = option_env!("VECTORBENCH_TILE_WIDTH");
const TILE_HEIGHT_ENV: Option<&str> = option_env!("VECTORBENCH_TILE_HEIGHT");

const HAS_FIXED_TILE: bool = TILE_WIDTH_ENV.is_some() && TILE_HEIGHT_ENV.is_some();

const fn env_or(var: Option<&str>, default: usize) -> usize {
    match var {
        Some(s) => parse_unwarp(s),
        None => default,
    }
}

static FIXED_RULES: [TileRule; 1] = [
    rule(0, env_or(TILE_WIDTH_ENV, 256), env_or(TILE_HEIGHT_ENV, 32)),
];

/// The table used when the caller does not pass one
pub(crate) static DEFAULT_TILES: TileTable = TileTable {
    rules: Cow::Borrowed(if HAS_FIXED_TILE { &FIXED_RULES as &[TileRule] } else { &TUNED_RULES }),
};

impl Tile {
    /// Check the shape for a chunk width of `chunk` columns
    pub(crate) fn check(self, chunk: usize) -> Result<()> {
        let Tile { width, height } = self;
        let reason = if width == 0 || height == 0 {
            "width and height must be non-zero"
        } else if width % TILE_WIDTH_MULTIPLE != 0 || width % chunk != 0 {
            "width must be a multiple of 64"
        } else {
            return Ok(());
        };
        Err(Error::InvalidTile { width, height, reason })
    }
}

impl TileTable {
    /// Create a table from rules sorted by `min_n`.
    ///
    /// The first rule must start at 0, thresholds must be strictly
    /// increasing, widths non-zero multiples of 64 and heights non-zero.
    pub fn new(rules: Vec<TileRule>) -> Result<Self> {
        match rules.first() {
            None => return Err(Error::InvalidTileTable { reason: "no rules" }),
            Some(first) if first.min_n != 0 => {
                return Err(Error::InvalidTileTable { reason: "first rule must start at 0" });
            }
            Some(_) => {}
        }
        if rules.windows(2).any(|w| w[0].min_n >= w[1].min_n) {
            return Err(Error::InvalidTileTable { reason: "thresholds must be increasing" });
        }
        for rule in &rules {
            rule.tile.check(TILE_WIDTH_MULTIPLE)?;
        }
        Ok(TileTable { rules: Cow::Owned(rules) })
    }

    /// A table that uses `tile` for every problem size
    pub fn fixed(tile: Tile) -> Result<Self> {
        TileTable::new(vec![TileRule { min_n: 0, tile }])
    }

    /// The tile for an `n × n` problem
    pub fn tile_for(&self, n: usize) -> Tile {
        let mut tile = self.rules[0].tile;
        for rule in self.rules.iter() {
            if rule.min_n <= n {
                tile = rule.tile;
            }
        }
        tile
    }

    pub fn rules(&self) -> &[TileRule] {
        &self.rules
    }
}

impl Default for TileTable {
    fn default() -> Self {
        DEFAULT_TILES.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuned_thresholds() {
        let table = TileTable { rules: Cow::Borrowed(&TUNED_RULES) };
        assert_eq!(table.tile_for(0), Tile { width: 256, height: 32 });
        assert_eq!(table.tile_for(64), Tile { width: 256, height: 32 });
        assert_eq!(table.tile_for(255), Tile { width: 256, height: 32 });
        assert_eq!(table.tile_for(256), Tile { width: 512, height: 16 });
        assert_eq!(table.tile_for(511), Tile { width: 512, height: 16 });
        assert_eq!(table.tile_for(512), Tile { width: 512, height: 8 });
        assert_eq!(table.tile_for(4096), Tile { width: 512, height: 8 });
    }

    #[test]
    fn default_table_is_valid() {
        for rule in DEFAULT_TILES.rules() {
            rule.tile.check(TILE_WIDTH_MULTIPLE).unwrap();
        }
        assert_eq!(TileTable::default(), DEFAULT_TILES);
    }

    #[test]
    fn rejects_bad_tables() {
        let t = |width, height| Tile { width, height };
        assert!(TileTable::new(vec![]).is_err());
        assert_eq!(
            TileTable::new(vec![TileRule { min_n: 8, tile: t(64, 8) }]),
            Err(Error::InvalidTileTable { reason: "first rule must start at 0" }));
        assert!(TileTable::new(vec![
            TileRule { min_n: 0, tile: t(64, 8) },
            TileRule { min_n: 0, tile: t(128, 8) },
        ]).is_err());
        assert!(matches!(TileTable::fixed(t(96, 8)),
                         Err(Error::InvalidTile { width: 96, .. })));
        assert!(matches!(TileTable::fixed(t(64, 0)),
                         Err(Error::InvalidTile { height: 0, .. })));
        assert!(matches!(TileTable::fixed(t(0, 8)), Err(Error::InvalidTile { .. })));
    }

    #[test]
    fn fixed_table() {
        let tile = Tile { width: 64, height: 1 };
        let table = TileTable::fixed(tile).unwrap();
        assert_eq!(table.tile_for(0), tile);
        assert_eq!(table.tile_for(100_000), tile);
    }
}
