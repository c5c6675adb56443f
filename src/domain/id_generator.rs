use super::MovieId;
use uuid::Uuid;

/// Source of fresh movie identifiers.
///
/// Uniqueness is probabilistic; callers do not check generated ids against
/// the existing collection.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> MovieId;
}

/// Random UUID v4 ids in hyphenated lowercase form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn generate(&self) -> MovieId {
        MovieId::new(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_ids_are_distinct_and_parseable() {
        let generator = UuidV4Generator;
        let ids: HashSet<MovieId> = (0..100).map(|_| generator.generate()).collect();
        assert_eq!(ids.len(), 100);

        for id in &ids {
            let parsed = Uuid::parse_str(id.as_str()).unwrap();
            assert_eq!(parsed.get_version_num(), 4);
        }
    }
}
