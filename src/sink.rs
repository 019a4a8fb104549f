//! Directory callbacks, per-entry records, and aggregate totals.

use crate::kind::ContainerKind;

/// One directory entry as reported to a [`DirSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Displayable name, already normalized.
    pub name: String,
    /// Three-character CBM type tag (`"PRG"`, `"SEQ"`, ...).
    pub file_type: &'static str,
    /// Logical length in bytes.
    pub length: u64,
    /// Block count of the extracted file.
    pub blocks: u32,
    /// Storage method tag (`"Stored"`, `"Squeezed"`, `"lh5"`, ...).
    pub method: &'static str,
    /// Space saving in percent; negative when storage expanded.
    pub savings: i32,
    /// Blocks the entry occupies inside the container.
    pub blocks_now: u32,
    /// Stored checksum, for the formats that carry one.
    pub checksum: Option<u16>,
}

/// Receives the directory of one container.
///
/// `container_start` is called exactly once before any entry; entries follow
/// in container order. A sink may hold arbitrary state; the walkers treat it
/// as an opaque destination and never call it again after a fatal error.
pub trait DirSink {
    /// The container has been identified and its header decoded. `label` is
    /// the embedded volume name where the format has one.
    fn container_start(&mut self, kind: ContainerKind, label: Option<&str>);
    /// One directory entry.
    fn entry(&mut self, entry: &DirEntry);
}

/// Aggregate counters for one `dir` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub entries: u32,
    /// Sum of the entries' extracted block counts.
    pub total_blocks: u32,
    /// Blocks the entries occupy inside the container.
    pub total_blocks_now: u32,
    /// Sum of the entries' logical lengths.
    pub total_length: u64,
    /// Blocks taken by a self-extractor prelude, if any.
    pub dearcer_blocks: u32,
    /// Positive: plain integer. Negative: x10 fixed point (-23 means 2.3).
    /// Zero: unknown.
    pub version: i32,
}

/// Options for a `dir` call.
#[derive(Debug, Clone, Copy)]
pub struct DirOptions {
    /// Follow disk file chains to compute exact lengths. With this off the
    /// disk walker skips the chains and reports those lengths as 0.
    pub precise_lengths: bool,
}

impl Default for DirOptions {
    fn default() -> Self {
        Self {
            precise_lengths: true,
        }
    }
}

/// A sink that keeps everything it is given, mostly useful in tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub containers: Vec<(ContainerKind, Option<String>)>,
    pub entries: Vec<DirEntry>,
}

impl DirSink for CollectingSink {
    fn container_start(&mut self, kind: ContainerKind, label: Option<&str>) {
        self.containers.push((kind, label.map(str::to_owned)));
    }

    fn entry(&mut self, entry: &DirEntry) {
        self.entries.push(entry.clone());
    }
}
