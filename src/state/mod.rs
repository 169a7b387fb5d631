/// State management module
/// 
/// This module owns everything the gallery mutates:
/// - Listing records as decoded from the endpoint (data.rs)
/// - User configuration loaded from disk (config.rs)
/// - The sentinel observer that stands in for viewport intersection (observer.rs)
/// - The pagination engine itself (gallery.rs)

pub mod config;
pub mod data;
pub mod gallery;
pub mod observer;
