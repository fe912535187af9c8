use crate::node::{NodeState, StateSink};
use histlens_common::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn print_summary(state: &NodeState) {
    println!("{:<16} {}", "Histogram:", state.id);
    println!("{:<16} {}", "Samples:", state.sample.len());
    println!("{:<16} {}", "Bins:", state.bins);
    match state.domain {
        Some(d) => println!("{:<16} [{}, {}]", "Domain:", d.min, d.max),
        None => println!("{:<16} -", "Domain:"),
    }
    println!("{:<16} {}", "Normalized:", state.normalized);
    if state.count.is_empty() {
        println!("(no data)");
        return;
    }
    println!("{:>6} {:>14} {:>14} {:>14} {:>14}", "bin", "start", "end", "midpoint", "count");
    for d in state.bin_details() {
        println!(
            "{:>6} {:>14.6} {:>14.6} {:>14.6} {:>14.6}",
            d.index, d.bin_start, d.bin_end, d.midpoint, d.count
        );
    }
}

pub fn export_json(output_path: &Path, state: &NodeState) -> Result<()> {
    let doc = serde_json::json!({
        "state": state,
        "bins": state.bin_details(),
    });
    let mut file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, &doc)?;
    Ok(())
}

pub fn export_csv(output_path: &Path, state: &NodeState) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    writeln!(file, "index,bin_start,bin_end,midpoint,count")?;
    for d in state.bin_details() {
        writeln!(file, "{},{},{},{},{}", d.index, d.bin_start, d.bin_end, d.midpoint, d.count)?;
    }
    Ok(())
}

/// Rewrites a JSON snapshot of the node after every recompute.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<NodeState> {
        Ok(serde_json::from_str(&std::fs::read_to_string(&self.path)?)?)
    }
}

impl StateSink for JsonFileSink {
    fn save(&mut self, state: &NodeState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        Ok(())
    }
}
