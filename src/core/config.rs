use std::path::PathBuf;

/// Strategy used to turn word occurrences into centroid weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightStrategy {
    /// `w(o) = 2 * (1.05 - ln(o)/ln(max))`
    Log,
    /// `w(o) = 1 - ((o - min)/(max - min)) * factor`
    Linear,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the mmapped wordlist file.
    pub wordlist_path: PathBuf,
    /// Path to the mmapped fixed-stride vector table.
    pub vector_path: PathBuf,
    /// Path to the stopword list, one lowercase word per line.
    pub stopwords_path: PathBuf,

    pub occurrence_weight_strategy: WeightStrategy,
    /// Skew factor for the linear strategy, in `[0, 1]`. 0 disables weighting.
    pub occurrence_weight_linear_factor: f32,

    /// Largest n-gram window (inclusive) tried when greedily compounding
    /// neighboring tokens into a single underscore-joined lookup key.
    pub max_compound_word_length: usize,

    /// Vectorizer cache entries above which the whole cache is wiped.
    pub max_vector_cache_size: usize,

    pub enable_compound_splitting: bool,
    /// `word,occurrence` lines consumed by the compound splitter.
    pub compound_splitting_dictionary_path: PathBuf,

    /// Neighbors whose occurrence falls below this percentile (0-100) of the
    /// vocabulary are dropped from similar-word results. 0 disables the filter.
    pub neighbor_occurrence_ignore_percentile: usize,

    /// Transport selector for the extension repository. Interpreted by the
    /// embedding process; the core only sees the injected repository.
    pub extensions_storage_mode: String,

    /// Worker-pool width for the Multi* batch operations.
    pub max_batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            wordlist_path: PathBuf::from("./data/words.idx"),
            vector_path: PathBuf::from("./data/vectors.knn"),
            stopwords_path: PathBuf::from("./data/stopwords.txt"),

            occurrence_weight_strategy: WeightStrategy::Log,
            occurrence_weight_linear_factor: 0.0,

            max_compound_word_length: 4,
            max_vector_cache_size: 100_000,

            enable_compound_splitting: false,
            compound_splitting_dictionary_path: PathBuf::from("./data/splitter.dict"),

            neighbor_occurrence_ignore_percentile: 0,
            extensions_storage_mode: String::new(),

            max_batch_size: num_cpus::get(),
        }
    }
}
