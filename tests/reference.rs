//! End-to-end scenarios exercised through the public API, with expected
//! values matching the diff-match-patch reference implementation so that
//! wire formats interoperate.

use std::time::{Duration, Instant};

use text_patch::{diff, patch, Config, Diff, Differ, Matcher, Patcher};

#[test]
fn common_affixes() {
    let a: Vec<char> = "1234abcdef".chars().collect();
    let b: Vec<char> = "1234xyz".chars().collect();
    assert_eq!(4, text_patch::text::common_prefix(&a, &b));

    let a: Vec<char> = "abcdef1234".chars().collect();
    let b: Vec<char> = "xyz1234".chars().collect();
    assert_eq!(4, text_patch::text::common_suffix(&a, &b));
}

#[test]
fn character_diff() {
    let differ = Differ::with_config(Config {
        diff_timeout: 0.0,
        ..Config::default()
    });
    assert_eq!(
        vec![
            Diff::delete("Apple"),
            Diff::insert("Banana"),
            Diff::equal("s are a"),
            Diff::insert("lso"),
            Diff::equal(" fruit."),
        ],
        differ.main("Apples are a fruit.", "Bananas are also fruit.", false)
    );
}

#[test]
fn delta_encoding() {
    let diffs = vec![
        Diff::equal("jump"),
        Diff::delete("s"),
        Diff::insert("ed"),
        Diff::equal(" over "),
        Diff::delete("the"),
        Diff::insert("a"),
        Diff::equal(" lazy"),
        Diff::insert("old dog"),
    ];
    assert_eq!(
        "=4\t-1\t+ed\t=6\t-3\t+a\t=5\t+old dog",
        diff::to_delta(&diffs)
    );
}

#[test]
fn bitap_location() {
    let matcher = Matcher::with_config(Config {
        match_threshold: 0.5,
        match_distance: 100,
        ..Config::default()
    });
    assert_eq!(Some(5), matcher.bitap("abcdefghijk", "fgh", 5).unwrap());

    let matcher = Matcher::with_config(Config {
        match_threshold: 0.4,
        match_distance: 100,
        ..Config::default()
    });
    assert_eq!(Some(4), matcher.bitap("abcdefghijk", "efxyhi", 1).unwrap());

    let matcher = Matcher::with_config(Config {
        match_threshold: 0.3,
        match_distance: 100,
        ..Config::default()
    });
    assert_eq!(None, matcher.bitap("abcdefghijk", "efxyhi", 1).unwrap());
}

#[test]
fn patch_wire_format() {
    let patcher = Patcher::new();
    let patches = patcher.make(
        "The quick brown fox jumps over the lazy dog.",
        "That quick brown fox jumped over a lazy dog.",
    );
    assert_eq!(
        "@@ -1,11 +1,12 @@\n Th\n-e\n+at\n  quick b\n\
         @@ -22,18 +22,17 @@\n jump\n-s\n+ed\n  over \n-the\n+a\n  laz\n",
        patch::to_text(&patches)
    );
}

#[test]
fn patch_application_on_drifted_target() {
    let patcher = Patcher::new();
    let patches = patcher.make(
        "The quick brown fox jumps over the lazy dog.",
        "That quick brown fox jumped over a lazy dog.",
    );

    // Ship the patches as text, parse them back, apply to a target that
    // has drifted since the patch was made.
    let wire = patch::to_text(&patches);
    let patches = patch::from_text(&wire).unwrap();
    let (result, applied) = patcher.apply(
        &patches,
        "The quick red rabbit jumps over the tired tiger.",
    );
    assert_eq!("That quick red rabbit jumped over a tired tiger.", result);
    assert_eq!(vec![true, true], applied);
}

#[test]
fn forced_timeout_returns_within_budget() {
    let differ = Differ::with_config(Config {
        diff_timeout: 0.1,
        ..Config::default()
    });
    let mut a = String::from(
        "`Twas brillig, and the slithy toves\nDid gyre and gimble in the wabe:\n\
         All mimsy were the borogoves,\nAnd the mome raths outgrabe.\n",
    );
    let mut b = String::from(
        "I am the very model of a modern major general,\nI've information \
         vegetable, animal, and mineral,\nI know the kings of England, and I \
         quote the fights historical,\nFrom Marathon to Waterloo, in order \
         categorical.\n",
    );
    for _ in 0..10 {
        a = format!("{}{}", a, a);
        b = format!("{}{}", b, b);
    }

    let start = Instant::now();
    let diffs = differ.main(&a, &b, false);
    let elapsed = start.elapsed();

    // The result is coarse but correct.
    assert_eq!(a, diff::text1(&diffs));
    assert_eq!(b, diff::text2(&diffs));
    // The deadline is polled, so allow roughly double the budget.
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(2000));
}

#[test]
fn line_folding_scales_past_a_byte() {
    // 300 distinct lines stress the line dictionary beyond 8 bits.
    let text1: String = (1..=300).map(|i| format!("line {}\n", i)).collect();
    let text2: String = (1..=300).rev().map(|i| format!("line {}\n", i)).collect();
    let differ = Differ::new();
    let diffs = differ.main(&text1, &text2, true);
    assert_eq!(text1, diff::text1(&diffs));
    assert_eq!(text2, diff::text2(&diffs));
}

#[test]
fn patch_at_text_edges() {
    let patcher = Patcher::new();

    // Pure insertion at the very start of an empty text.
    let patches = patcher.make("", "test");
    assert_eq!("@@ -0,0 +1,4 @@\n+test\n", patch::to_text(&patches));
    let reparsed = patch::from_text(&patch::to_text(&patches)).unwrap();
    assert_eq!(patches, reparsed);
    let (result, applied) = patcher.apply(&patches, "");
    assert_eq!("test", result);
    assert_eq!(vec![true], applied);

    // Deletion of an entire text.
    let patches = patcher.make("abc", "");
    assert_eq!("@@ -1,3 +0,0 @@\n-abc\n", patch::to_text(&patches));
    let (result, applied) = patcher.apply(&patches, "abc");
    assert_eq!("", result);
    assert_eq!(vec![true], applied);
}

#[test]
fn diffs_differing_at_single_edges() {
    let differ = Differ::with_config(Config {
        diff_timeout: 0.0,
        ..Config::default()
    });
    assert_eq!(
        vec![Diff::delete("x"), Diff::equal("abc")],
        differ.main("xabc", "abc", false)
    );
    assert_eq!(
        vec![Diff::equal("abc"), Diff::insert("y")],
        differ.main("abc", "abcy", false)
    );
}
