//! Voxel terrain of the sandbox.
//!
//! The terrain is a `width × height × depth` grid of [`BlockKind`]s. Each `(x, z)`
//! column is solid from the bottom up to its surface and air above it. Column
//! surfaces are where ants stand.
//!
//! # Generation
//!
//! [`TerrainGenerator::generate`] is a pure function of the generator's parameters:
//!
//! 1. Draw a surface height per column from `N(base_height, roughness²)`
//! 2. Smooth heights with a 3×3 box filter and clamp to `[1, height - 3]`
//! 3. Fill columns with stone, topped with mulch, acid or stone (Bernoulli draws)
//! 4. Overwrite the bottom layer and the outer ring of columns with containers
//!
//! Every trial gets a freshly generated terrain, so nothing one candidate does to the
//! world is visible to the next.

use rand::SeedableRng as _;
use rand_distr::{Bernoulli, Distribution as _, Normal};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::block::BlockKind;

/// Horizontal coordinates of a terrain column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub x: usize,
    pub z: usize,
}

impl Column {
    #[must_use]
    pub const fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }

    /// Returns the column offset by `(dx, dz)`, or `None` on underflow.
    #[must_use]
    pub fn offset(self, dx: isize, dz: isize) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            z: self.z.checked_add_signed(dz)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: usize,
    pub depth: usize,
    pub height: usize,
    /// Mean surface height before smoothing.
    pub base_height: f64,
    /// Standard deviation of the raw surface height.
    pub roughness: f64,
    /// Probability that a surface block is mulch.
    pub mulch_density: f64,
    /// Probability that a non-mulch surface block is acidic.
    pub acid_density: f64,
    /// Seed of the terrain's own random stream.
    pub seed: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 32,
            depth: 32,
            height: 24,
            base_height: 8.0,
            roughness: 1.5,
            mulch_density: 0.15,
            acid_density: 0.05,
            seed: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TerrainError {
    #[display("terrain must be at least 3x4x3 (got {width}x{height}x{depth})")]
    TooSmall {
        width: usize,
        height: usize,
        depth: usize,
    },
    #[display("base height must be finite (got {base_height})")]
    BaseHeight { base_height: f64 },
    #[display("roughness must be finite and non-negative (got {roughness})")]
    Roughness { roughness: f64 },
    #[display("{name} must be in [0, 1] (got {value})")]
    Density { name: &'static str, value: f64 },
}

/// Builds identical terrains from a validated [`TerrainConfig`].
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    config: TerrainConfig,
    height_noise: Normal<f64>,
    mulch: Bernoulli,
    acid: Bernoulli,
}

impl TerrainGenerator {
    pub fn new(config: TerrainConfig) -> Result<Self, TerrainError> {
        let TerrainConfig {
            width,
            depth,
            height,
            base_height,
            roughness,
            mulch_density,
            acid_density,
            seed: _,
        } = config;
        if width < 3 || depth < 3 || height < 4 {
            return Err(TerrainError::TooSmall {
                width,
                height,
                depth,
            });
        }
        if !base_height.is_finite() {
            return Err(TerrainError::BaseHeight { base_height });
        }
        let height_noise =
            Normal::new(base_height, roughness).map_err(|_| TerrainError::Roughness { roughness })?;
        let mulch = Bernoulli::new(mulch_density).map_err(|_| TerrainError::Density {
            name: "mulch density",
            value: mulch_density,
        })?;
        let acid = Bernoulli::new(acid_density).map_err(|_| TerrainError::Density {
            name: "acid density",
            value: acid_density,
        })?;
        Ok(Self {
            config,
            height_noise,
            mulch,
            acid,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn generate(&self) -> Terrain {
        let TerrainConfig {
            width,
            depth,
            height,
            seed,
            ..
        } = self.config;
        let mut rng = Pcg32::seed_from_u64(seed);

        let raw = (0..width * depth)
            .map(|_| self.height_noise.sample(&mut rng))
            .collect::<Vec<_>>();
        let max_surface = (height - 3) as f64;

        let mut terrain = Terrain::empty(width, height, depth);
        for z in 0..depth {
            for x in 0..width {
                let (mut sum, mut count) = (0.0, 0.0);
                for nz in z.saturating_sub(1)..=(z + 1).min(depth - 1) {
                    for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                        sum += raw[nz * width + nx];
                        count += 1.0;
                    }
                }
                let surface = (sum / count).round().clamp(1.0, max_surface) as usize;

                let border = x == 0 || z == 0 || x == width - 1 || z == depth - 1;
                for y in 0..=surface {
                    let kind = if border || y == 0 {
                        BlockKind::Container
                    } else if y < surface {
                        BlockKind::Stone
                    } else if self.mulch.sample(&mut rng) {
                        BlockKind::Mulch
                    } else if self.acid.sample(&mut rng) {
                        BlockKind::Acidic
                    } else {
                        BlockKind::Stone
                    };
                    terrain.set(x, y, z, kind);
                }
            }
        }
        terrain
    }
}

/// A voxel grid of blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terrain {
    width: usize,
    height: usize,
    depth: usize,
    blocks: Vec<BlockKind>,
}

impl Terrain {
    /// Creates a terrain filled with air.
    #[must_use]
    pub fn empty(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
            blocks: vec![BlockKind::Air; width * height * depth],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        (x < self.width && y < self.height && z < self.depth)
            .then(|| (y * self.depth + z) * self.width + x)
    }

    /// Returns the block at `(x, y, z)`, or `None` outside the terrain.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<BlockKind> {
        self.index(x, y, z).map(|i| self.blocks[i])
    }

    /// Replaces the block at `(x, y, z)`. Returns `false` outside the terrain.
    pub fn set(&mut self, x: usize, y: usize, z: usize, kind: BlockKind) -> bool {
        match self.index(x, y, z) {
            Some(i) => {
                self.blocks[i] = kind;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, column: Column) -> bool {
        column.x < self.width && column.z < self.depth
    }

    /// Height of the topmost solid block of a column.
    ///
    /// Returns `None` outside the terrain or for a column with no solid block.
    #[must_use]
    pub fn surface_height(&self, column: Column) -> Option<usize> {
        if !self.contains(column) {
            return None;
        }
        (0..self.height)
            .rev()
            .find(|&y| self.get(column.x, y, column.z).is_some_and(BlockKind::is_solid))
    }

    /// The topmost solid block of a column and its height.
    #[must_use]
    pub fn surface_block(&self, column: Column) -> Option<(usize, BlockKind)> {
        let y = self.surface_height(column)?;
        Some((y, self.get(column.x, y, column.z)?))
    }

    /// Returns `true` if the column is at least `margin` cells away from every edge.
    #[must_use]
    pub fn is_interior(&self, column: Column, margin: usize) -> bool {
        self.contains(column)
            && column.x >= margin
            && column.z >= margin
            && column.x + margin < self.width
            && column.z + margin < self.depth
    }

    /// Counts blocks of the given kind.
    #[must_use]
    pub fn count(&self, kind: BlockKind) -> usize {
        self.blocks.iter().filter(|&&b| b == kind).count()
    }
}
