/*!
 * Common test utilities shared by unit and integration tests
 */

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use yamtwai::app_config::{Config, TranslationProvider};
use yamtwai::app_controller::Controller;
use yamtwai::catalog::store::Catalog;
use yamtwai::markdown::segmenter::{Block, MarkdownSegmenter};

/// Initialize logging for a test; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The document used by the basic workflow scenarios
pub const SIMPLE_DOCUMENT: &str = "# Title\n\nHello world\n\n---\n\nGoodbye\n";

/// A document exercising every block kind
pub const KITCHEN_SINK_DOCUMENT: &str = "\
# Overview

Intro paragraph spanning
two lines.

## Setup

- first item
- second item
  with continuation

1. step one
2. step two

> a quote
> continued

| col a | col b |
|-------|-------|
| 1     | 2     |

```rust
fn main() {}
```

---

Closing words.
";

/// Segment a document string into blocks
pub fn segment(content: &str) -> Vec<Block> {
    let lines: Vec<&str> = content.lines().collect();
    MarkdownSegmenter::new().segment(&lines)
}

/// Build a reconciled catalog where every translatable unit is complete,
/// with `translation = prefix + source`
pub fn complete_catalog(content: &str, prefix: &str) -> Catalog {
    let blocks = segment(content);
    let mut catalog = Catalog::new(Some("ko"), Controller::SKIP_KINDS.to_vec());
    catalog.reconcile(&blocks);

    for context_id in catalog.pending_ids() {
        let source = catalog.entry(&context_id).unwrap().msgid.clone();
        let translation = format!("{}{}", prefix, source);
        catalog.set_translation(&context_id, &translation);
        catalog.mark_complete(&context_id);
    }

    catalog
}

/// Config wired to the offline mock provider
pub fn mock_config() -> Config {
    let mut config = Config::default();
    config.provider.provider_type = TranslationProvider::Mock;
    config.target_language = "ko".to_string();
    config
}

/// Write a file under a directory, creating parents as needed
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
