pub mod analysis;
pub mod core;
pub mod extensions;
pub mod index;
pub mod schema;
pub mod service;
pub mod splitting;
pub mod vectorizer;

/*
┌─────────────────────────────────────────────────────────────────────────┐
│                          LEXIVEC ARCHITECTURE                           │
└─────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────── SERVICE ──────────────────────────────────┐
│  struct Contextionary                                                   │
│  • base: Arc<MmappedIndex>            // wordlist + vectors + ANN       │
│  • combined: RwLock<Arc<CombinedIndex>> // swapped on schema change     │
│  • vectorizer: Arc<Vectorizer>                                          │
│  • extensions: Option<Arc<ExtensionLookup>>  // watched overlay         │
│  • storer: Option<Storer>             // AddExtension path              │
│  • batch_pool: rayon::ThreadPool      // Multi* fan-out                 │
└─────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────── INDEX LAYER ──────────────────────────────┐
│  trait VectorIndex  ── word_to_index / vector_for_index / nns_by_*      │
│        ▲                    ▲                     ▲                     │
│  MmappedIndex         MemoryIndex           CombinedIndex               │
│  • Wordlist (mmap)    • builder-frozen      • base + memory             │
│  • VectorFile (mmap)  • schema centroids    • offset id union           │
│  • AnnIndex (hora)    • own small ANN       • merged kNN                │
└─────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────── VECTORIZER ─────────────────────────────────┐
│  corpus ─ tokenize ─ greedy compounds ─ (overlay | base | splitter)     │
│         ─ occurrence weights (log|linear, overrides via Evaluator)      │
│         ─ weighted centroid ─ average over corpi                        │
│  VectorCache: clear-all above max_vector_cache_size                     │
└─────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────── COLLABORATORS ──────────────────────────────┐
│  SchemaCentroids   $OBJECT[Class] / $OBJECT[Class][property]            │
│  SchemaSearch      kNN 10000/3 + regex filter + certainty threshold     │
│  CompoundSplitter  bounded DAG search, 20 nodes, 500 ms deadline        │
│  ExtensionLookup   watcher thread replaces snapshot map                 │
└─────────────────────────────────────────────────────────────────────────┘
*/
