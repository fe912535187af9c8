pub mod binner;
pub mod bins;
pub mod normalize;

pub use binner::{bin_counts, bin_index, filter_to_domain};
pub use bins::{bin_width, generate_edges, midpoints};
pub use normalize::normalize;
