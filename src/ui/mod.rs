/// View layer
///
/// Pure functions from state to widgets:
/// - One image cell (cell.rs)
/// - The scrolling gallery with its sentinel frame (gallery.rs)

pub mod cell;
pub mod gallery;
