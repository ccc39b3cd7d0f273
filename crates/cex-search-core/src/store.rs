//! Snapshot store for the current [`Corpus`].
//!
//! Readers take an `Arc` to the current snapshot and keep using it for as
//! long as they need, even if a newer corpus is published meanwhile.
//! Publishing is a single atomic pointer swap, so a half-built corpus is
//! never observable.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::models::Corpus;

/// A published corpus together with its publication number.
#[derive(Debug)]
pub struct Snapshot {
    /// 0 for the initial empty snapshot, incremented on every replace.
    pub generation: u64,
    pub corpus: Arc<Corpus>,
}

/// Thread-safe holder of the current corpus snapshot.
pub struct CorpusStore {
    inner: ArcSwap<Snapshot>,
}

impl CorpusStore {
    /// A store whose current snapshot is the empty corpus.
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(Snapshot {
                generation: 0,
                corpus: Arc::new(Corpus::default()),
            }),
        }
    }

    /// The current snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        self.inner.load_full()
    }

    /// Atomically publish `corpus`, returning its generation.
    pub fn replace(&self, corpus: Corpus) -> u64 {
        let corpus = Arc::new(corpus);
        let mut generation = 0;
        self.inner.rcu(|old| {
            generation = old.generation + 1;
            Snapshot {
                generation,
                corpus: corpus.clone(),
            }
        });
        generation
    }

    /// Generation of the current snapshot.
    pub fn generation(&self) -> u64 {
        self.inner.load().generation
    }
}

impl Default for CorpusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Passage, Work};
    use std::thread;

    fn corpus_with(work_id: &str, texts: &[&str]) -> Corpus {
        let mut work = Work::new(work_id);
        for (i, t) in texts.iter().enumerate() {
            work.passages.push(Passage {
                passage_id: format!("{}:{}", work_id, i + 1),
                text: t.to_string(),
                index: i,
            });
        }
        Corpus::new(vec![work])
    }

    #[test]
    fn test_starts_empty() {
        let store = CorpusStore::new();
        let snap = store.current();
        assert_eq!(snap.generation, 0);
        assert!(snap.corpus.is_empty());
    }

    #[test]
    fn test_replace_bumps_generation() {
        let store = CorpusStore::new();
        assert_eq!(store.replace(corpus_with("urn:cts:x:a", &["one"])), 1);
        assert_eq!(store.replace(corpus_with("urn:cts:x:b", &["two"])), 2);
        assert_eq!(store.generation(), 2);
        assert_eq!(store.current().corpus.works[0].work_id, "urn:cts:x:b");
    }

    #[test]
    fn test_held_snapshot_survives_replace() {
        let store = CorpusStore::new();
        store.replace(corpus_with("urn:cts:x:a", &["old"]));
        let held = store.current();

        store.replace(corpus_with("urn:cts:x:b", &["new", "newer"]));

        assert_eq!(held.generation, 1);
        assert_eq!(held.corpus.works[0].passages[0].text, "old");
        assert_eq!(store.current().corpus.passage_count(), 2);
    }

    #[test]
    fn test_concurrent_readers_see_complete_snapshots() {
        let store = Arc::new(CorpusStore::new());
        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for n in 1..=50usize {
                    let texts: Vec<String> = (0..n).map(|i| i.to_string()).collect();
                    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
                    store.replace(corpus_with("urn:cts:x:a", &refs));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snap = store.current();
                        // Generation n always carries exactly n passages.
                        assert_eq!(snap.corpus.passage_count() as u64, snap.generation);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(store.generation(), 50);
    }
}
