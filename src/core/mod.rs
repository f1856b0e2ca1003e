/// Core functionality modules
///
/// History loading, tokenizing, edit distance and search.

pub mod distance;
pub mod history;
pub mod searcher;
pub mod tokenizer;

pub use distance::levenshtein;
pub use history::{load_history_file, parse_history};
pub use searcher::{search_history, Searcher};
pub use tokenizer::tokenize;
