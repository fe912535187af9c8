use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Identity under which a producer contributes to a shared scale.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub const UNIT: Domain = Domain { min: 0.0, max: 1.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Extent of the finite values, `None` when there are none.
    pub fn extent(values: &[f64]) -> Option<Self> {
        values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Domain>, v| match acc {
                None => Some(Domain::new(v, v)),
                Some(d) => Some(Domain::new(d.min.min(v), d.max.max(v))),
            })
    }

    pub fn union(self, other: Domain) -> Self {
        Domain::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// A shared axis scale whose domain is negotiated between producers.
pub trait Scale {
    /// Records the extent of `values` under `owner` and returns the combined domain.
    fn compute_and_set_domain(&mut self, values: &[f64], owner: &OwnerId) -> Domain;
    /// Withdraws whatever `owner` contributed.
    fn del_domain(&mut self, owner: &OwnerId);
    /// Records an explicit range under `owner`.
    fn set_domain(&mut self, range: Domain, owner: &OwnerId);
    /// Current combined domain.
    fn domain(&self) -> Domain;
}

/// Registry of per-owner ranges; the domain is the union of every contribution,
/// clamped by the optional pinned bounds.
#[derive(Debug, Clone)]
pub struct LinearScale {
    contributions: BTreeMap<OwnerId, Domain>,
    min: Option<f64>,
    max: Option<f64>,
    fallback: Domain,
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            contributions: BTreeMap::new(),
            min: None,
            max: None,
            fallback: Domain::UNIT,
        }
    }

    /// Pins the lower and/or upper bound regardless of contributions.
    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Domain reported while nobody contributes.
    pub fn with_fallback(mut self, fallback: Domain) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn shared(self) -> SharedScale {
        Rc::new(RefCell::new(self))
    }

    pub fn contribution(&self, owner: &OwnerId) -> Option<Domain> {
        self.contributions.get(owner).copied()
    }

    pub fn owners(&self) -> impl Iterator<Item = &OwnerId> {
        self.contributions.keys()
    }
}

impl Scale for LinearScale {
    fn compute_and_set_domain(&mut self, values: &[f64], owner: &OwnerId) -> Domain {
        match Domain::extent(values) {
            Some(d) => {
                self.contributions.insert(owner.clone(), d);
            }
            None => {
                self.contributions.remove(owner);
            }
        }
        self.domain()
    }

    fn del_domain(&mut self, owner: &OwnerId) {
        self.contributions.remove(owner);
    }

    fn set_domain(&mut self, range: Domain, owner: &OwnerId) {
        self.contributions.insert(owner.clone(), range);
    }

    fn domain(&self) -> Domain {
        let combined = self
            .contributions
            .values()
            .copied()
            .reduce(Domain::union)
            .unwrap_or(self.fallback);
        Domain::new(
            self.min.unwrap_or(combined.min),
            self.max.unwrap_or(combined.max),
        )
    }
}

/// One scale per axis, shared by every producer on the same thread.
pub type SharedScale = Rc<RefCell<LinearScale>>;
