//! Identifiers used by authoring expressions.
//!
//! Concept identifiers are kept as opaque text while parsing. Structural
//! checks on SNOMED CT identifiers (SCTIDs) live in [`crate::validate`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::AllocationError;
use crate::validate::{PartitionKind, verhoeff_check_digit};

/// An opaque concept identifier.
///
/// The only guarantee is that the token is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConceptId(String);

impl ConceptId {
    /// Creates a concept identifier, returning `None` for an empty token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// Wraps a token already known to be non-empty.
    pub(crate) fn from_trusted(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ConceptId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse-time placeholder for a relationship identifier.
///
/// Displays as `rel_<group>.<index>` where `index` is zero-based within the
/// group. It is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TempId {
    /// 1-based attribute group number.
    pub group: u32,
    /// Zero-based position within the group.
    pub index: usize,
}

impl TempId {
    pub fn new(group: u32, index: usize) -> Self {
        Self { group, index }
    }
}

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rel_{}.{}", self.group, self.index)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TempId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Largest total SCTID length.
const MAX_SCTID_LEN: usize = 18;

/// Sequential SCTID allocator for one partition.
///
/// Item identifiers come from an atomic counter, so a single allocator can be
/// shared between worker threads without locking.
#[derive(Debug)]
pub struct SctidAllocator {
    namespace: Option<u32>,
    kind: PartitionKind,
    next: AtomicU64,
    max_item: u64,
}

impl SctidAllocator {
    /// Creates an allocator.
    ///
    /// `namespace` selects the extension form (`1x` partition followed by a
    /// 7-digit namespace); `None` allocates in the core (`0x`) partition.
    pub fn new(
        namespace: Option<u32>,
        kind: PartitionKind,
        start: u64,
    ) -> Result<Self, AllocationError> {
        if let Some(ns) = namespace {
            if ns > 9_999_999 {
                return Err(AllocationError::InvalidNamespace { namespace: ns });
            }
        }
        // check digit + partition + optional namespace
        let overhead = 3 + if namespace.is_some() { 7 } else { 0 };
        let max_item = 10u64.pow((MAX_SCTID_LEN - overhead) as u32) - 1;
        // core ids need a 3-digit item to reach the minimum length
        let min_item = if namespace.is_some() { 1 } else { 100 };
        Ok(Self {
            namespace,
            kind,
            next: AtomicU64::new(start.max(min_item)),
            max_item,
        })
    }

    /// Allocates the next identifier.
    pub fn allocate(&self) -> Result<String, AllocationError> {
        let item = self.next.fetch_add(1, Ordering::Relaxed);
        if item > self.max_item {
            return Err(AllocationError::NamespaceExhausted {
                namespace: self.namespace,
            });
        }
        let kind_digit = self.kind.digit();
        let mut body = match self.namespace {
            Some(ns) => format!("{item}{ns:07}1{kind_digit}"),
            None => format!("{item}0{kind_digit}"),
        };
        let check = verhoeff_check_digit(&body);
        body.push(char::from(b'0' + check));
        Ok(body)
    }

    /// Allocates a concept identifier.
    pub fn allocate_concept(&self) -> Result<ConceptId, AllocationError> {
        self.allocate().map(ConceptId::from_trusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_sctid;

    #[test]
    fn test_concept_id_rejects_empty() {
        assert!(ConceptId::new("").is_none());
        assert_eq!(ConceptId::new("71388002").unwrap().as_str(), "71388002");
    }

    #[test]
    fn test_temp_id_format() {
        assert_eq!(TempId::new(1, 0).to_string(), "rel_1.0");
        assert_eq!(TempId::new(3, 12).to_string(), "rel_3.12");
    }

    #[test]
    fn test_allocator_core_ids_are_valid() {
        let alloc = SctidAllocator::new(None, PartitionKind::Relationship, 100).unwrap();
        let first = alloc.allocate().unwrap();
        let second = alloc.allocate().unwrap();

        assert!(first.starts_with("10002"));
        assert!(second.starts_with("10102"));
        for id in [&first, &second] {
            let partition = validate_sctid(id).unwrap();
            assert_eq!(partition.kind, PartitionKind::Relationship);
            assert!(!partition.extension);
        }
    }

    #[test]
    fn test_allocator_core_start_is_raised_to_minimum_length() {
        let alloc = SctidAllocator::new(None, PartitionKind::Concept, 1).unwrap();
        let id = alloc.allocate_concept().unwrap();
        assert!(id.as_str().starts_with("10000"));
        assert_eq!(id.as_str().len(), 6);
        assert!(validate_sctid(id.as_str()).is_ok());
    }

    #[test]
    fn test_allocator_extension_ids_carry_namespace() {
        let alloc = SctidAllocator::new(Some(1000124), PartitionKind::Concept, 1).unwrap();
        let id = alloc.allocate_concept().unwrap();

        assert!(id.as_str().starts_with("1100012410"));
        let partition = validate_sctid(id.as_str()).unwrap();
        assert_eq!(partition.kind, PartitionKind::Concept);
        assert!(partition.extension);
    }

    #[test]
    fn test_allocator_rejects_long_namespace() {
        let result = SctidAllocator::new(Some(12_345_678), PartitionKind::Concept, 1);
        assert!(matches!(result, Err(AllocationError::InvalidNamespace { .. })));
    }

    #[test]
    fn test_allocator_exhaustion() {
        let alloc = SctidAllocator::new(Some(1000124), PartitionKind::Concept, 99_999_999).unwrap();
        assert!(alloc.allocate().is_ok());
        assert!(matches!(
            alloc.allocate(),
            Err(AllocationError::NamespaceExhausted { namespace: Some(1000124) })
        ));
    }
}
