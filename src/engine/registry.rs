//! Canonical shape storage.
//!
//! Entries live in an arena addressed by stable [`EntryHandle`]s; the
//! fingerprint index refers to entries by handle only, so growing an
//! entry's instance list never invalidates anything.

use crate::align::PointSetStats;
use crate::mesh::TriangleMesh;

use super::pack::InstanceTransform;

/// Stable identifier of a canonical shape within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle(pub(crate) u32);

impl EntryHandle {
    /// Get the position of the entry in registration order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One occurrence of a canonical shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceRecord {
    /// Maps the canonical mesh onto this occurrence's world-space points.
    pub transform: InstanceTransform,
    /// Color/material id carried through to the packed attribute buffer.
    pub attribute: u8,
}

/// A canonical shape: the reference mesh, its precomputed alignment
/// statistics and every instance recorded against it.
///
/// The mesh is the world-space pose of the first occurrence and is never
/// mutated after registration; only records are appended.
#[derive(Debug, Clone)]
pub struct CanonicalEntry {
    mesh: TriangleMesh,
    fingerprint: u32,
    stats: PointSetStats,
    records: Vec<InstanceRecord>,
}

impl CanonicalEntry {
    /// Create an entry from the world-space mesh of its first occurrence,
    /// seeded with one identity-transform record.
    pub(crate) fn new(
        mesh: TriangleMesh,
        fingerprint: u32,
        stats: PointSetStats,
        attribute: u8,
    ) -> Self {
        Self {
            mesh,
            fingerprint,
            stats,
            records: vec![InstanceRecord {
                transform: InstanceTransform::IDENTITY,
                attribute,
            }],
        }
    }

    /// Get the canonical mesh.
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Get the deduplicated point count used as the match pre-filter.
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }

    /// Get the precomputed alignment statistics.
    pub fn stats(&self) -> &PointSetStats {
        &self.stats
    }

    /// Get the recorded instances, in submission order.
    pub fn records(&self) -> &[InstanceRecord] {
        &self.records
    }

    /// Get the number of recorded instances.
    pub fn instance_count(&self) -> usize {
        self.records.len()
    }

    /// Whether this entry is excluded from candidate evaluation.
    ///
    /// Shapes whose statistics came out singular are still drawn but can
    /// never absorb a match.
    pub fn is_degenerate(&self) -> bool {
        self.stats.is_degenerate()
    }

    pub(crate) fn push_record(&mut self, record: InstanceRecord) {
        self.records.push(record);
    }

    pub(crate) fn into_parts(self) -> (TriangleMesh, Vec<InstanceRecord>) {
        (self.mesh, self.records)
    }
}

/// Arena of canonical entries.
#[derive(Debug, Default)]
pub(crate) struct CanonicalRegistry {
    entries: Vec<CanonicalEntry>,
}

impl CanonicalRegistry {
    pub fn insert(&mut self, entry: CanonicalEntry) -> EntryHandle {
        let handle = EntryHandle(self.entries.len() as u32);
        self.entries.push(entry);
        handle
    }

    pub fn get(&self, handle: EntryHandle) -> Option<&CanonicalEntry> {
        self.entries.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: EntryHandle) -> Option<&mut CanonicalEntry> {
        self.entries.get_mut(handle.index())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalEntry> {
        self.entries.iter()
    }

    /// Take the entries out, in registration order.
    pub fn into_entries(self) -> Vec<CanonicalEntry> {
        self.entries
    }
}
