/// Network access module
///
/// This module handles:
/// - Fetching pages of the image listing
/// - Downloading the placeholder image shown in every cell

pub mod listing;

pub use listing::ListingClient;
