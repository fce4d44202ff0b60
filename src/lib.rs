//! Tunnelcarve - tunnel and cave carving geometry for procedural terrain
//!
//! A deterministic CPU geometry library: implicit tunnel volumes (SDFs),
//! boolean subtraction of a volume from a terrain mesh, terrain-aware
//! clipping of generated tunnel interiors, and collision geometry output.
//! Terrain heights are queried through [`terrain::TerrainHeightQuerier`];
//! this crate never synthesizes or stores a height-field of its own beyond
//! the noise-backed demo querier.

pub mod core;
pub mod mesh;
pub mod volume;
pub mod csg;
pub mod clip;
pub mod terrain;
pub mod generation;
pub mod collision;
