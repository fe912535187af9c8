use crate::scale::{Domain, OwnerId, Scale, SharedScale};
use serde::{Deserialize, Serialize};

/// Headroom above the tallest bin on the count axis.
pub const COUNT_HEADROOM: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreserveDomain {
    pub sample: bool,
    pub count: bool,
}

/// Negotiates the sample (x) and count (y) domains with the shared scales.
pub struct DomainCoordinator {
    sample_scale: SharedScale,
    count_scale: SharedScale,
    sample_owner: OwnerId,
    count_owner: OwnerId,
    last_domain: Option<Domain>,
}

impl DomainCoordinator {
    pub fn new(node_id: &str, sample_scale: SharedScale, count_scale: SharedScale) -> Self {
        Self {
            sample_scale,
            count_scale,
            sample_owner: OwnerId::new(format!("{node_id}_sample")),
            count_owner: OwnerId::new(format!("{node_id}_count")),
            last_domain: None,
        }
    }

    /// Contributes (or withdraws) the sample extent and returns the domain to bin against.
    pub fn negotiate_sample(&mut self, sample: &[f64], preserve: bool) -> Domain {
        let mut scale = self.sample_scale.borrow_mut();
        let domain = if preserve {
            scale.del_domain(&self.sample_owner);
            scale.domain()
        } else {
            scale.compute_and_set_domain(sample, &self.sample_owner)
        };
        log::debug!("{:<24}{:<24}[{}, {}]", "sample domain", self.sample_owner, domain.min, domain.max);
        self.last_domain = Some(domain);
        domain
    }

    /// Drops the sample contribution; used when there is nothing to bin.
    pub fn withdraw_sample(&mut self) {
        self.sample_scale.borrow_mut().del_domain(&self.sample_owner);
        self.last_domain = None;
    }

    /// Sets the count axis to `[0, 1.05 * max]` unless preserved.
    pub fn negotiate_count(&mut self, counts: &[f64], preserve: bool) {
        if preserve {
            return;
        }
        let mut scale = self.count_scale.borrow_mut();
        match counts.iter().copied().reduce(f64::max) {
            Some(tallest) => {
                let range = Domain::new(0.0, tallest * COUNT_HEADROOM);
                log::debug!("{:<24}{:<24}[{}, {}]", "count domain", self.count_owner, range.min, range.max);
                scale.set_domain(range, &self.count_owner);
            }
            None => scale.del_domain(&self.count_owner),
        }
    }

    pub fn last_domain(&self) -> Option<Domain> {
        self.last_domain
    }

    pub fn sample_scale(&self) -> &SharedScale {
        &self.sample_scale
    }

    pub fn count_scale(&self) -> &SharedScale {
        &self.count_scale
    }

    pub fn sample_owner(&self) -> &OwnerId {
        &self.sample_owner
    }

    pub fn count_owner(&self) -> &OwnerId {
        &self.count_owner
    }
}
