//! Caller-owned cache for the lexical index.
//!
//! The index is keyed by the corpus [`Fingerprint`], never by time: any edit
//! to the corpus changes the fingerprint, and the next lookup rebuilds before
//! scoring. Built indices are handed out as `Arc`s so concurrent readers can
//! share one read-only model.

use std::sync::Arc;

use casebook_core::capabilities::Capabilities;
use casebook_core::model::{Corpus, Fingerprint};
use tracing::debug;

use super::index::LexicalIndex;

#[derive(Debug, Default)]
pub struct IndexCache {
    entry: Option<(Fingerprint, Arc<LexicalIndex>)>,
    builds: usize,
}

impl IndexCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index for `corpus`, rebuilding if the snapshot changed.
    ///
    /// Returns `None` when the vector signal is disabled or the corpus is
    /// empty; nothing is cached in that case.
    pub fn get_or_build(
        &mut self,
        corpus: &Corpus,
        capabilities: Capabilities,
    ) -> Option<Arc<LexicalIndex>> {
        if !capabilities.vector || corpus.is_empty() {
            return None;
        }

        let fingerprint = corpus.fingerprint();
        if let Some((cached, index)) = &self.entry
            && *cached == fingerprint
        {
            return Some(Arc::clone(index));
        }

        debug!(%fingerprint, "corpus changed, rebuilding lexical index");
        let index = Arc::new(LexicalIndex::build(corpus.composite_texts(), capabilities)?);
        self.entry = Some((fingerprint, Arc::clone(&index)));
        self.builds += 1;
        Some(index)
    }

    /// Drop the cached index.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Fingerprint of the snapshot currently cached.
    #[must_use]
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.entry.as_ref().map(|(fp, _)| *fp)
    }

    /// How many times an index has been built by this cache.
    #[must_use]
    pub const fn builds(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebook_core::model::RawCaseRow;

    fn corpus(topic: &str) -> Corpus {
        Corpus::from_rows(vec![RawCaseRow {
            model: Some("HGT-421".into()),
            topic: Some(topic.into()),
            ..RawCaseRow::default()
        }])
    }

    #[test]
    fn same_snapshot_reuses_index() {
        let mut cache = IndexCache::new();
        let c = corpus("馬達異音");
        let first = cache.get_or_build(&c, Capabilities::all()).expect("index");
        let second = cache.get_or_build(&c.clone(), Capabilities::all()).expect("index");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.builds(), 1);
        assert_eq!(cache.fingerprint(), Some(c.fingerprint()));
    }

    #[test]
    fn edited_snapshot_rebuilds() {
        let mut cache = IndexCache::new();
        let before = cache
            .get_or_build(&corpus("馬達異音"), Capabilities::all())
            .expect("index");
        let after = cache
            .get_or_build(&corpus("皮帶斷裂"), Capabilities::all())
            .expect("index");
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(cache.builds(), 2);
    }

    #[test]
    fn disabled_vector_caches_nothing() {
        let mut cache = IndexCache::new();
        assert!(
            cache
                .get_or_build(&corpus("x"), Capabilities::keyword_only())
                .is_none()
        );
        assert_eq!(cache.builds(), 0);
        assert!(cache.fingerprint().is_none());
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let mut cache = IndexCache::new();
        let c = corpus("馬達異音");
        let _ = cache.get_or_build(&c, Capabilities::all());
        cache.invalidate();
        let _ = cache.get_or_build(&c, Capabilities::all());
        assert_eq!(cache.builds(), 2);
    }
}
