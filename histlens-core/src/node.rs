use crate::coordinator::{DomainCoordinator, PreserveDomain};
use crate::histogram::{bin_counts, bin_width, filter_to_domain, generate_edges, midpoints, normalize};
use crate::scale::{Domain, SharedScale};
use histlens_common::{HistLensError, HistogramConfig, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMetadata {
    pub orientation: Orientation,
    pub dimension: Dimension,
}

/// Which axis each data attribute is plotted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalesMetadata {
    pub sample: AxisMetadata,
    pub count: AxisMetadata,
}

impl Default for ScalesMetadata {
    fn default() -> Self {
        Self {
            sample: AxisMetadata { orientation: Orientation::Horizontal, dimension: Dimension::X },
            count: AxisMetadata { orientation: Orientation::Vertical, dimension: Dimension::Y },
        }
    }
}

/// Input attributes of a histogram node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramAttrs {
    pub bins: usize,
    pub sample: Vec<f64>,
    pub normalized: bool,
    pub preserve_domain: PreserveDomain,
    pub scales_metadata: ScalesMetadata,
}

impl Default for HistogramAttrs {
    fn default() -> Self {
        Self {
            bins: 10,
            sample: Vec::new(),
            normalized: false,
            preserve_domain: PreserveDomain::default(),
            scales_metadata: ScalesMetadata::default(),
        }
    }
}

impl From<&HistogramConfig> for HistogramAttrs {
    fn from(cfg: &HistogramConfig) -> Self {
        Self {
            bins: cfg.bins,
            normalized: cfg.normalized,
            preserve_domain: PreserveDomain { sample: cfg.preserve_sample, count: cfg.preserve_count },
            ..Self::default()
        }
    }
}

/// An observed attribute change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Sample,
    Bins,
    PreserveDomain,
    Normalized,
    /// Another producer moved the shared sample scale.
    ScaleDomain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePath {
    /// negotiate sample domain, rebin, normalize, negotiate count domain
    Full,
    /// renormalize cached raw counts, negotiate count domain
    Normalize,
}

impl Change {
    pub fn path(self) -> UpdatePath {
        match self {
            Change::Sample | Change::Bins | Change::PreserveDomain | Change::ScaleDomain => UpdatePath::Full,
            Change::Normalized => UpdatePath::Normalize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    DataUpdated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Published derived state; replaced wholesale on every recompute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistogramOutput {
    pub edges: Vec<f64>,
    pub midpoints: Vec<f64>,
    pub counts: Vec<f64>,
}

impl HistogramOutput {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinDetail {
    pub index: usize,
    pub bin_start: f64,
    pub bin_end: f64,
    pub midpoint: f64,
    pub count: f64,
}

/// Serializable view of the node's attributes, pushed to a [`StateSink`] after each recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeState {
    pub id: String,
    pub bins: usize,
    pub sample: Vec<f64>,
    pub normalized: bool,
    pub preserve_domain: PreserveDomain,
    pub scales_metadata: ScalesMetadata,
    pub domain: Option<Domain>,
    pub edges: Vec<f64>,
    pub midpoints: Vec<f64>,
    pub count: Vec<f64>,
}

impl NodeState {
    pub fn bin_details(&self) -> Vec<BinDetail> {
        // a loaded snapshot may be inconsistent; stop at the shortest sequence
        self.edges
            .windows(2)
            .zip(self.midpoints.iter().zip(&self.count))
            .enumerate()
            .map(|(i, (w, (&midpoint, &count)))| BinDetail {
                index: i,
                bin_start: w[0],
                bin_end: w[1],
                midpoint,
                count,
            })
            .collect()
    }
}

/// Persists or forwards node state to remote observers.
pub trait StateSink {
    fn save(&mut self, state: &NodeState) -> Result<()>;
}

#[derive(Debug, Default)]
struct Binned {
    edges: Vec<f64>,
    midpoints: Vec<f64>,
    raw: Vec<u64>,
}

type Callback = Box<dyn FnMut(&NodeEvent)>;

/// Reactive histogram: keeps edges, midpoints and counts in step with its inputs and
/// with the sample/count scales it shares with other producers.
pub struct HistogramNode {
    id: String,
    attrs: HistogramAttrs,
    coordinator: DomainCoordinator,
    binned: Binned,
    output: HistogramOutput,
    lifecycle: Lifecycle,
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_subscription: u64,
    sink: Option<Box<dyn StateSink>>,
}

impl HistogramNode {
    pub fn new(
        id: impl Into<String>,
        attrs: HistogramAttrs,
        sample_scale: SharedScale,
        count_scale: SharedScale,
    ) -> Result<Self> {
        if attrs.bins == 0 {
            return Err(HistLensError::InvalidBins(attrs.bins));
        }
        let id = id.into();
        let mut attrs = attrs;
        attrs.sample = finite_only(&id, attrs.sample);
        let coordinator = DomainCoordinator::new(&id, sample_scale, count_scale);
        let mut node = Self {
            id,
            attrs,
            coordinator,
            binned: Binned::default(),
            output: HistogramOutput::default(),
            lifecycle: Lifecycle::Uninitialized,
            subscribers: Vec::new(),
            next_subscription: 0,
            sink: None,
        };
        node.run(UpdatePath::Full);
        node.run(UpdatePath::Normalize);
        node.lifecycle = Lifecycle::Ready;
        Ok(node)
    }

    pub fn with_sink(mut self, sink: Box<dyn StateSink>) -> Self {
        self.sink = Some(sink);
        self.save_changes();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn attrs(&self) -> &HistogramAttrs {
        &self.attrs
    }
    pub fn output(&self) -> &HistogramOutput {
        &self.output
    }
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
    /// Raw counts from the last binning, before normalization.
    pub fn raw_counts(&self) -> &[u64] {
        &self.binned.raw
    }
    /// Domain the current bins were computed against.
    pub fn domain(&self) -> Option<Domain> {
        self.coordinator.last_domain()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&NodeEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Replaces the sample; non-finite values are dropped.
    pub fn set_sample(&mut self, sample: Vec<f64>) {
        let sample = finite_only(&self.id, sample);
        if sample == self.attrs.sample {
            return;
        }
        self.attrs.sample = sample;
        self.apply(Change::Sample);
    }

    pub fn set_bins(&mut self, bins: usize) -> Result<()> {
        if bins == 0 {
            return Err(HistLensError::InvalidBins(bins));
        }
        if bins != self.attrs.bins {
            self.attrs.bins = bins;
            self.apply(Change::Bins);
        }
        Ok(())
    }

    pub fn set_preserve_domain(&mut self, preserve: PreserveDomain) {
        if preserve != self.attrs.preserve_domain {
            self.attrs.preserve_domain = preserve;
            self.apply(Change::PreserveDomain);
        }
    }

    pub fn set_normalized(&mut self, normalized: bool) {
        if normalized != self.attrs.normalized {
            self.attrs.normalized = normalized;
            self.apply(Change::Normalized);
        }
    }

    /// Rebins against the current shared sample domain.
    pub fn refresh(&mut self) {
        self.apply(Change::ScaleDomain);
    }

    pub fn bin_detail(&self, index: usize) -> Option<BinDetail> {
        let out = &self.output;
        Some(BinDetail {
            index,
            bin_start: *out.edges.get(index)?,
            bin_end: *out.edges.get(index + 1)?,
            midpoint: *out.midpoints.get(index)?,
            count: *out.counts.get(index)?,
        })
    }

    pub fn snapshot(&self) -> NodeState {
        NodeState {
            id: self.id.clone(),
            bins: self.attrs.bins,
            sample: self.attrs.sample.clone(),
            normalized: self.attrs.normalized,
            preserve_domain: self.attrs.preserve_domain,
            scales_metadata: self.attrs.scales_metadata,
            domain: self.coordinator.last_domain(),
            edges: self.output.edges.clone(),
            midpoints: self.output.midpoints.clone(),
            count: self.output.counts.clone(),
        }
    }

    fn apply(&mut self, change: Change) {
        log::debug!("{:<24}{:<24}{:?}", "change", self.id, change);
        self.run(change.path());
        self.save_changes();
        self.emit(NodeEvent::DataUpdated);
    }

    fn run(&mut self, path: UpdatePath) {
        if path == UpdatePath::Full {
            self.binned = self.rebin();
        }
        let width = bin_width(&self.binned.edges).unwrap_or(1.0);
        let counts = normalize(&self.binned.raw, width, self.attrs.normalized);
        self.coordinator.negotiate_count(&counts, self.attrs.preserve_domain.count);
        self.output = HistogramOutput {
            edges: self.binned.edges.clone(),
            midpoints: self.binned.midpoints.clone(),
            counts,
        };
    }

    fn rebin(&mut self) -> Binned {
        let sample = &self.attrs.sample;
        if sample.is_empty() {
            self.coordinator.withdraw_sample();
            return Binned::default();
        }
        let domain = self.coordinator.negotiate_sample(sample, self.attrs.preserve_domain.sample);
        let kept = filter_to_domain(sample, &domain);
        if kept.is_empty() {
            log::debug!("{:<24}{:<24}no values in [{}, {}]", "rebin", self.id, domain.min, domain.max);
            return Binned::default();
        }
        let edges = generate_edges(domain.min, domain.max, self.attrs.bins);
        let raw = bin_counts(&kept, &edges);
        log::debug!("{:<24}{:<24}{} of {} values in {} bins", "rebin", self.id, kept.len(), sample.len(), self.attrs.bins);
        Binned { midpoints: midpoints(&edges), edges, raw }
    }

    fn save_changes(&mut self) {
        if self.sink.is_none() {
            return;
        }
        let state = self.snapshot();
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.save(&state) {
                log::warn!("{:<24}{:<24}{e}", "state save failed", self.id);
            }
        }
    }

    fn emit(&mut self, event: NodeEvent) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&event);
        }
    }
}

fn finite_only(id: &str, sample: Vec<f64>) -> Vec<f64> {
    let total = sample.len();
    let kept: Vec<f64> = sample.into_iter().filter(|v| v.is_finite()).collect();
    if kept.len() != total {
        log::warn!("{:<24}{:<24}dropped {} non-finite values", "sample", id, total - kept.len());
    }
    kept
}
