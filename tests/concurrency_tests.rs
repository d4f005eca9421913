use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use txmatch::{
    Document, Engine, Entity, HashEmbedder, IngestError, RecordSource, RecordStore, RecordTable,
    SimilaritySearch, StaticSource,
};

/// Counts how often each table is loaded.
struct CountingSource {
    inner: StaticSource,
    entity_loads: Arc<AtomicUsize>,
    document_loads: Arc<AtomicUsize>,
}

impl RecordSource for CountingSource {
    fn load_entities(&self) -> Result<RecordTable<Entity>, IngestError> {
        self.entity_loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_entities()
    }

    fn load_documents(&self) -> Result<RecordTable<Document>, IngestError> {
        self.document_loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_documents()
    }
}

fn counting_engine() -> (Arc<Engine>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let entity_loads = Arc::new(AtomicUsize::new(0));
    let document_loads = Arc::new(AtomicUsize::new(0));
    let source = CountingSource {
        inner: StaticSource::from_pairs(
            [("u1", "Liam Johnson"), ("u2", "Zoe")],
            [("t1", "liam johnson"), ("t2", "invoice for zoe")],
        ),
        entity_loads: Arc::clone(&entity_loads),
        document_loads: Arc::clone(&document_loads),
    };
    let engine = Engine::new(
        RecordStore::new(source),
        Arc::new(HashEmbedder::new(64)),
        SimilaritySearch::default(),
    );
    (Arc::new(engine), entity_loads, document_loads)
}

#[test]
fn concurrent_first_requests_load_tables_once() {
    let (engine, entity_loads, document_loads) = counting_engine();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let id = if i % 2 == 0 { "t1" } else { "t2" };
                engine.match_users(id).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().total, 1);
    }
    assert_eq!(entity_loads.load(Ordering::SeqCst), 1);
    assert_eq!(document_loads.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_searches_share_one_store() {
    let (engine, entity_loads, document_loads) = counting_engine();

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.search_similar("liam johnson").await.unwrap() })
        })
        .collect();

    let mut outcomes = Vec::new();
    for task in tasks {
        outcomes.push(task.await.unwrap());
    }
    assert!(outcomes.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(document_loads.load(Ordering::SeqCst), 1);
    assert_eq!(entity_loads.load(Ordering::SeqCst), 0);
}
