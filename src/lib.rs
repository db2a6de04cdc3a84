//! A Doom-engine level compiler's BSP node builder: recursive seg
//! partitioning, splitting, and (optionally) GL-node miniseg closure
//! over a flat 2D line set.

pub mod arena;
pub mod bsp;
pub mod chooser;
pub mod config;
pub mod error;
pub mod event_tree;
pub mod fixed;
pub mod geometry;
pub mod input;
pub mod output;
pub mod polyobject;
pub mod seg_graph;
pub mod splitter;
pub mod vertex_map;

pub mod map;

pub use bsp::NodeBuilder;
pub use config::BuilderConfig;
pub use error::{BuildError, BuildResult, BuildWarning};
