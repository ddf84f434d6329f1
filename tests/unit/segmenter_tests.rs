/*!
 * Tests for markdown segmentation
 */

use yamtwai::markdown::segmenter::{BlockKind, MarkdownSegmenter};

use crate::common;

/// Segment a literal and return (kind, text) pairs for compact assertions
fn kinds(content: &str) -> Vec<BlockKind> {
    common::segment(content).iter().map(|b| b.kind).collect()
}

#[test]
fn test_segment_simpleDocument_shouldYieldFourBlocks() {
    let blocks = common::segment(common::SIMPLE_DOCUMENT);

    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[0].kind, BlockKind::Heading);
    assert_eq!(blocks[1].kind, BlockKind::Paragraph);
    assert_eq!(blocks[2].kind, BlockKind::Rule);
    assert_eq!(blocks[3].kind, BlockKind::Paragraph);

    assert_eq!(blocks[0].text, "# Title");
    assert_eq!(blocks[1].text, "Hello world");
    assert_eq!(blocks[3].text, "Goodbye");
}

#[test]
fn test_segment_kitchenSink_shouldRecognizeEveryKind() {
    assert_eq!(
        kinds(common::KITCHEN_SINK_DOCUMENT),
        vec![
            BlockKind::Heading,
            BlockKind::Paragraph,
            BlockKind::Heading,
            BlockKind::UnorderedList,
            BlockKind::OrderedList,
            BlockKind::Quote,
            BlockKind::Table,
            BlockKind::Code,
            BlockKind::Rule,
            BlockKind::Paragraph,
        ]
    );
}

#[test]
fn test_segment_blocks_shouldCoverDisjointAscendingRanges() {
    let blocks = common::segment(common::KITCHEN_SINK_DOCUMENT);

    let mut previous_end = 0;
    for block in &blocks {
        assert!(block.start >= previous_end, "block ranges must not overlap");
        assert!(block.end > block.start, "block ranges must not be empty");
        previous_end = block.end;
    }
}

#[test]
fn test_segment_emptyOrBlankInput_shouldYieldNoBlocks() {
    assert!(common::segment("").is_empty());
    assert!(common::segment("\n\n\n").is_empty());
}

#[test]
fn test_contextId_shouldCombinePathKindAndIndex() {
    let blocks = common::segment("# Overview\n\nfirst\n\nsecond\n");

    assert_eq!(blocks[0].context_id(), "overview::heading:0");
    assert_eq!(blocks[1].context_id(), "overview::para:0");
    assert_eq!(blocks[2].context_id(), "overview::para:1");
}

#[test]
fn test_contextId_independentOfText_shouldSurviveContentEdits() {
    let before = common::segment("# Intro\n\nold text\n");
    let after = common::segment("# Intro\n\ncompletely new text\n");

    assert_eq!(before[1].context_id(), after[1].context_id());
}

#[test]
fn test_contextId_siblingReorder_shouldNotChangeUntouchedSection() {
    let original = "# Alpha\n\na-body\n\n# Beta\n\nb-body\n\n# Gamma\n\ng-body\n";
    let reordered = "# Beta\n\nb-body\n\n# Alpha\n\na-body\n\n# Gamma\n\ng-body\n";

    let find = |content: &str, text: &str| -> String {
        common::segment(content)
            .iter()
            .find(|b| b.text == text)
            .map(|b| b.context_id())
            .unwrap()
    };

    // Gamma's paragraph keeps its identity although siblings swapped places
    assert_eq!(find(original, "g-body"), find(reordered, "g-body"));
    assert_eq!(find(original, "a-body"), find(reordered, "a-body"));
}

#[test]
fn test_headingSlugs_duplicateTitles_shouldGetSuffixes() {
    let blocks = common::segment("# Setup\n\n# Setup\n");

    assert_eq!(blocks[0].path, vec!["setup"]);
    assert_eq!(blocks[1].path, vec!["setup-1"]);
}

#[test]
fn test_headingSlugs_deeperCountersReset_whenReturningToShallowerDepth() {
    // Both "Usage" subsections live under different parents, so neither
    // needs a numeric suffix once the depth-2 counters reset
    let content = "# One\n\n## Usage\n\n# Two\n\n## Usage\n\nbody\n";
    let blocks = common::segment(content);

    assert_eq!(blocks[1].path, vec!["one", "usage"]);
    assert_eq!(blocks[3].path, vec!["two", "usage"]);
    assert_eq!(blocks[4].path, vec!["two", "usage"]);
}

#[test]
fn test_headingSlugs_emptyTitleAfterCleaning_shouldFallBackToSection() {
    let blocks = common::segment("# !!!\n\nbody\n");
    assert_eq!(blocks[0].path, vec!["section"]);
}

#[test]
fn test_headingPath_skippedLevels_shouldNotPad() {
    // An h3 directly under an h1 nests one level deep, not three
    let blocks = common::segment("# Top\n\n### Deep\n\nbody\n");
    assert_eq!(blocks[1].path, vec!["top", "deep"]);
}

#[test]
fn test_codeFence_unterminated_shouldConsumeToEndOfInput() {
    let blocks = common::segment("```\nlet x = 1;\nno closing fence\n");

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::Code);
    assert_eq!(blocks[0].text, "```\nlet x = 1;\nno closing fence");
}

#[test]
fn test_codeFence_tildeVariant_shouldMatchItsOwnCloser() {
    let blocks = common::segment("~~~\ncode here\n~~~\n\nafter\n");

    assert_eq!(blocks[0].kind, BlockKind::Code);
    assert_eq!(blocks[0].text, "~~~\ncode here\n~~~");
    assert_eq!(blocks[1].kind, BlockKind::Paragraph);
}

#[test]
fn test_codeFence_interior_shouldNeverBeScannedAsMarkdown() {
    let blocks = common::segment("```md\n# not a heading\n- not a list\n```\n");

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::Code);
}

#[test]
fn test_list_blankSeparatedItems_shouldStayOneList() {
    let blocks = common::segment("- one\n\n- two\n\n- three\n");

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::UnorderedList);
    assert_eq!(blocks[0].text, "- one\n\n- two\n\n- three");
}

#[test]
fn test_list_orderednessChangeAtSameIndent_shouldSplitLists() {
    let blocks = common::segment("- bullet\n1. numbered\n");

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].kind, BlockKind::UnorderedList);
    assert_eq!(blocks[1].kind, BlockKind::OrderedList);
}

#[test]
fn test_list_nestedDifferentMarkerDeeper_shouldStayInList() {
    let blocks = common::segment("1. step\n   - detail\n2. next\n");

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::OrderedList);
}

#[test]
fn test_list_unindentedProseContinuation_shouldBeAbsorbed() {
    // Prose directly after an item, without indentation, continues the item
    // (common in scripts without conventional wrapping)
    let blocks = common::segment("- item one\ncontinuation without indent\n- item two\n");

    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0].text,
        "- item one\ncontinuation without indent\n- item two"
    );
}

#[test]
fn test_list_followingHeading_shouldStopTheList() {
    let blocks = common::segment("- item\n# Heading\n");

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].kind, BlockKind::UnorderedList);
    assert_eq!(blocks[1].kind, BlockKind::Heading);
}

#[test]
fn test_quote_contiguousLines_shouldFormOneBlock() {
    let blocks = common::segment("> first\n> second\n\nafter\n");

    assert_eq!(blocks[0].kind, BlockKind::Quote);
    assert_eq!(blocks[0].text, "> first\n> second");
}

#[test]
fn test_table_pipeLines_shouldFormOneBlock() {
    let blocks = common::segment("| a | b |\n|---|---|\n| 1 | 2 |\n\nafter\n");

    assert_eq!(blocks[0].kind, BlockKind::Table);
    assert_eq!(blocks[0].end, 3);
}

#[test]
fn test_rule_variants_shouldBeRecognized() {
    for rule in ["---", "***", "___", "- - -", "* * *"] {
        let content = format!("before\n\n{}\n\nafter\n", rule);
        let blocks = common::segment(&content);
        assert_eq!(blocks[1].kind, BlockKind::Rule, "input: {}", rule);
    }
}

#[test]
fn test_sevenHashes_shouldDegradeToParagraph() {
    let blocks = common::segment("####### too deep\n");
    assert_eq!(blocks[0].kind, BlockKind::Paragraph);
}

#[test]
fn test_idxInSection_countsPerPathAndKind() {
    let content = "# A\n\npara one\n\npara two\n\n- list\n\n# B\n\npara three\n";
    let blocks = common::segment(content);

    assert_eq!(blocks[1].idx_in_section, 0); // para one under A
    assert_eq!(blocks[2].idx_in_section, 1); // para two under A
    assert_eq!(blocks[3].idx_in_section, 0); // list counts separately
    assert_eq!(blocks[5].idx_in_section, 0); // para three under B restarts
}

#[test]
fn test_segment_isReusableAcrossDocuments() {
    // One segmenter value must not leak slug state between calls
    let segmenter = MarkdownSegmenter::new();

    let lines_a: Vec<&str> = "# Setup\n".lines().collect();
    let lines_b: Vec<&str> = "# Setup\n".lines().collect();

    let first = segmenter.segment(&lines_a);
    let second = segmenter.segment(&lines_b);

    assert_eq!(first[0].path, vec!["setup"]);
    assert_eq!(second[0].path, vec!["setup"]);
}
