//! Blob fixtures and builders for navstitch development.
//!
//! [`CellBuilder`] turns plain triangle soups into fully classified
//! [`NavCell`](navstitch_core::NavCell)s: it pairs shared edges, links
//! coincident edges of sibling floors, files edges lying on the cell's
//! sides into the boundary lists, and marks everything else as an
//! obstacle. The [`fixtures`] module builds the standard test meshes on
//! top of it.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod builder;
pub mod fixtures;

pub use builder::{CellBuilder, MeshBuilder};
pub use fixtures::{
    grid_mesh, layered_cell, quad_cell, raised_quad_cell, row_mesh, walled_cell, GROUND, WATER,
};
