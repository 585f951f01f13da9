use std::collections::HashMap;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use lexivec::analysis::stopwords::StopwordDetector;
use lexivec::core::config::{Config, WeightStrategy};
use lexivec::core::vector::Vector;
use lexivec::index::memory::{MemoryIndex, MemoryIndexBuilder};
use lexivec::index::VectorIndex;
use lexivec::splitting::dictionary::MapDict;
use lexivec::splitting::splitter::Splitter;
use lexivec::vectorizer::vectorizer::Vectorizer;

const VECTOR_WIDTH: usize = 64;
const VOCABULARY: usize = 2_000;

fn synthetic_words(count: usize) -> Vec<String> {
    let syllables = ["ka", "ro", "mi", "ta", "shu", "len", "vor", "da", "pel", "gon"];
    let mut rng = StdRng::seed_from_u64(7);

    (0..count)
        .map(|_| {
            let pieces = rng.gen_range(2..5);
            (0..pieces)
                .map(|_| *syllables.choose(&mut rng).expect("non-empty"))
                .collect::<String>()
        })
        .collect()
}

fn build_index(words: &[String]) -> Arc<MemoryIndex> {
    let mut rng = StdRng::seed_from_u64(11);
    let mut builder = MemoryIndexBuilder::new(VECTOR_WIDTH);

    for word in words {
        let components: Vec<f32> = (0..VECTOR_WIDTH).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let occurrence = rng.gen_range(1..100_000);
        builder
            .add_word(word, Vector::new(components), occurrence)
            .expect("width matches");
    }

    Arc::new(builder.build().expect("build succeeds"))
}

fn build_vectorizer(index: Arc<MemoryIndex>, words: &[String]) -> Vectorizer {
    let dict = MapDict::new(words.iter().map(|word| (word.clone(), word.len() as f64)));

    let config = Config {
        occurrence_weight_strategy: WeightStrategy::Log,
        max_compound_word_length: 4,
        max_vector_cache_size: 100_000,
        ..Config::default()
    };

    Vectorizer::new(
        index,
        Arc::new(StopwordDetector::from_words(["is", "the", "a", "of"])),
        None,
        Box::new(Splitter::new(Box::new(dict))),
        &config,
    )
}

fn random_corpus(words: &[String], length: usize, rng: &mut StdRng) -> String {
    let fillers = ["is", "the", "a", "of"];
    (0..length)
        .map(|_| {
            if rng.gen_bool(0.2) {
                fillers.choose(rng).expect("non-empty").to_string()
            } else {
                words.choose(rng).expect("non-empty").clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_vectorize_corpus(c: &mut Criterion) {
    let words = synthetic_words(VOCABULARY);
    let index = build_index(&words);
    let vectorizer = build_vectorizer(index, &words);

    let mut rng = StdRng::seed_from_u64(23);
    let corpora: Vec<Vec<String>> = (0..64)
        .map(|_| vec![random_corpus(&words, 24, &mut rng)])
        .collect();

    let overrides = HashMap::new();

    let mut at = 0;
    c.bench_function("vectorize_corpus_24_tokens", |b| {
        b.iter(|| {
            let corpus = &corpora[at % corpora.len()];
            at += 1;
            black_box(vectorizer.vector_for_corpi(corpus, &overrides).expect("vectorizes"))
        })
    });
}

fn bench_word_lookup(c: &mut Criterion) {
    let words = synthetic_words(VOCABULARY);
    let index = build_index(&words);

    let mut rng = StdRng::seed_from_u64(42);
    let probes: Vec<&String> = (0..256)
        .map(|_| words.choose(&mut rng).expect("non-empty"))
        .collect();

    let mut at = 0;
    c.bench_function("word_to_index", |b| {
        b.iter(|| {
            let word = probes[at % probes.len()];
            at += 1;
            black_box(index.word_to_index(word))
        })
    });
}

fn bench_knn(c: &mut Criterion) {
    let words = synthetic_words(VOCABULARY);
    let index = build_index(&words);

    let mut rng = StdRng::seed_from_u64(97);
    let queries: Vec<Vector> = (0..64)
        .map(|_| Vector::new((0..VECTOR_WIDTH).map(|_| rng.gen_range(-1.0..1.0)).collect()))
        .collect();

    let mut at = 0;
    c.bench_function("nns_by_vector_top10", |b| {
        b.iter(|| {
            let query = &queries[at % queries.len()];
            at += 1;
            black_box(index.nns_by_vector(query, 10, 32).expect("searches"))
        })
    });
}

criterion_group!(
    benches,
    bench_vectorize_corpus,
    bench_word_lookup,
    bench_knn
);
criterion_main!(benches);
