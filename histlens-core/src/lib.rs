pub mod coordinator;
pub mod export;
pub mod histogram;
pub mod node;
pub mod reader;
pub mod scale;

pub use coordinator::{DomainCoordinator, PreserveDomain, COUNT_HEADROOM};
pub use export::{export_csv, export_json, print_summary, JsonFileSink};
pub use histogram::{bin_counts, bin_index, bin_width, filter_to_domain, generate_edges, midpoints, normalize};
pub use histlens_common::{HistLensError, Result};
pub use node::{
    AxisMetadata, BinDetail, Change, Dimension, HistogramAttrs, HistogramNode, HistogramOutput,
    Lifecycle, NodeEvent, NodeState, Orientation, ScalesMetadata, StateSink, SubscriptionId,
    UpdatePath,
};
pub use reader::{load_sample, parse_text_sample, read_json_sample, read_parquet_column, read_text_sample};
pub use scale::{Domain, LinearScale, OwnerId, Scale, SharedScale};
