/// 検索結果の表示モジュール

mod tree_formatter;
mod utils;

pub use tree_formatter::{TreeFormatter, CONTENT_INDEX_NOTE, HEADER_TITLE};
pub use utils::detect_color_support;

use crate::types::SearchResult;

/// Result as pretty-printed JSON
pub fn to_json(result: &SearchResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SearchBackend;

    #[test]
    fn test_json_output_shape() {
        let result = SearchResult::new(SearchBackend::GrepSearch);
        let json: serde_json::Value = serde_json::from_str(&to_json(&result).unwrap()).unwrap();
        assert_eq!(json["backend"], "GrepSearch");
        assert_eq!(json["completion"], "completed");
        assert!(json["assets"].as_array().unwrap().is_empty());
    }
}
