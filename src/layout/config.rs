use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("canvas must have a positive size, got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("step bound must be at least 1")]
    ZeroStepBound,
    #[error("{name} must lie in [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f32 },
    #[error("{name} must be a finite non-negative number, got {value}")]
    NegativeCoefficient { name: &'static str, value: f32 },
    #[error("{name} size range is inverted ({min} > {max})")]
    InvertedSizeRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{name} grid needs at least one column")]
    EmptyGrid { name: &'static str },
}

/// How the repulsion pass finds nearby nodes. Both strategies produce the
/// same positions; the quadtree only prunes candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NeighborStrategy {
    #[default]
    Auto,
    Pairwise,
    Quadtree,
}

/// Row-major seed grid for one node kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSeed {
    pub origin_x: f32,
    pub origin_y: f32,
    pub columns: usize,
    pub spacing_x: f32,
    pub spacing_y: f32,
}

impl GridSeed {
    pub fn position(&self, index: usize) -> (f32, f32) {
        let columns = self.columns.max(1);
        let column = (index % columns) as f32;
        let row = (index / columns) as f32;
        (
            self.origin_x + column * self.spacing_x,
            self.origin_y + row * self.spacing_y,
        )
    }
}

/// Display radius derived from a metric: `clamp(metric * scale, min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRange {
    pub scale: f32,
    pub min: f32,
    pub max: f32,
}

impl SizeRange {
    pub fn size_for(&self, metric: f32) -> f32 {
        (metric * self.scale).clamp(self.min, self.max)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub step_bound: u32,
    pub dampening_floor: f32,
    pub centering: f32,
    pub repulsion: f32,
    pub separation_margin: f32,
    pub velocity_damping: f32,
    pub velocity_noise_floor: f32,
    pub boundary_margin: f32,
    pub organization_grid: GridSeed,
    pub person_grid: GridSeed,
    pub organization_size: SizeRange,
    pub person_size: SizeRange,
    pub neighbor_strategy: NeighborStrategy,
    pub quadtree_threshold: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            step_bound: 300,
            dampening_floor: 0.8,
            centering: 0.001,
            repulsion: 0.01,
            separation_margin: 20.0,
            velocity_damping: 0.9,
            velocity_noise_floor: 0.1,
            boundary_margin: 10.0,
            organization_grid: GridSeed {
                origin_x: 200.0,
                origin_y: 150.0,
                columns: 5,
                spacing_x: 120.0,
                spacing_y: 100.0,
            },
            person_grid: GridSeed {
                origin_x: 400.0,
                origin_y: 200.0,
                columns: 8,
                spacing_x: 60.0,
                spacing_y: 50.0,
            },
            organization_size: SizeRange {
                scale: 3.0,
                min: 15.0,
                max: 30.0,
            },
            person_size: SizeRange {
                scale: 0.125,
                min: 6.0,
                max: 12.0,
            },
            neighbor_strategy: NeighborStrategy::Auto,
            quadtree_threshold: 400,
        }
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeCoefficient { name, value })
    }
}

fn unit_range(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

fn size_range(name: &'static str, range: &SizeRange) -> Result<(), ConfigError> {
    non_negative(name, range.scale)?;
    non_negative(name, range.min)?;
    non_negative(name, range.max)?;
    if range.min > range.max {
        return Err(ConfigError::InvertedSizeRange {
            name,
            min: range.min,
            max: range.max,
        });
    }
    Ok(())
}

impl LayoutConfig {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let canvas_ok = self.canvas_width.is_finite()
            && self.canvas_height.is_finite()
            && self.canvas_width > 0.0
            && self.canvas_height > 0.0;
        if !canvas_ok {
            return Err(ConfigError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.step_bound == 0 {
            return Err(ConfigError::ZeroStepBound);
        }

        unit_range("dampening floor", self.dampening_floor)?;
        unit_range("velocity damping", self.velocity_damping)?;
        non_negative("centering", self.centering)?;
        non_negative("repulsion", self.repulsion)?;
        non_negative("separation margin", self.separation_margin)?;
        non_negative("velocity noise floor", self.velocity_noise_floor)?;
        non_negative("boundary margin", self.boundary_margin)?;
        size_range("organization", &self.organization_size)?;
        size_range("person", &self.person_size)?;

        if self.organization_grid.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                name: "organization",
            });
        }
        if self.person_grid.columns == 0 {
            return Err(ConfigError::EmptyGrid { name: "person" });
        }
        Ok(())
    }

    pub fn center(&self) -> (f32, f32) {
        (self.canvas_width * 0.5, self.canvas_height * 0.5)
    }

    pub fn uses_quadtree(&self, node_count: usize) -> bool {
        match self.neighbor_strategy {
            NeighborStrategy::Pairwise => false,
            NeighborStrategy::Quadtree => true,
            NeighborStrategy::Auto => node_count > self.quadtree_threshold,
        }
    }
}
