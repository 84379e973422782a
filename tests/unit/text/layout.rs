use super::*;

/// Monospace stand-in: every character is 10 px wide.
struct Mono;

impl TextMeasure for Mono {
    fn measure(&mut self, text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }
}

#[test]
fn wrap_packs_greedily_under_budget() {
    // Budget of 120 px fits at most 11 characters (width must stay strictly below).
    let lines = wrap_words("the quick brown fox jumps over the lazy dog", 120.0, &mut Mono);
    assert_eq!(
        lines,
        vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
    );
}

#[test]
fn wrap_width_is_strictly_below_budget() {
    let captions = [
        "Preheat the oven to 180 degrees and grease a round tin",
        "a bb ccc dddd eeeee ffffff ggggggg hhhhhhhh",
        "one",
        "x y z x y z x y z x y z x y z x y z",
    ];
    for budget in [90.0f32, 100.0, 155.0, 300.0] {
        for caption in captions {
            for line in wrap_words(caption, budget, &mut Mono) {
                assert!(
                    Mono.measure(&line) < budget,
                    "line {line:?} too wide for {budget}"
                );
            }
        }
    }
}

#[test]
fn wrap_exact_fit_starts_new_line() {
    // "abcd efgh" is 90 px; with a 90 px budget it must break.
    let lines = wrap_words("abcd efgh", 90.0, &mut Mono);
    assert_eq!(lines, vec!["abcd", "efgh"]);
}

#[test]
fn wrap_overlong_first_word_leaves_empty_first_line() {
    let lines = wrap_words("Supercalifragilistic is long", 100.0, &mut Mono);
    assert_eq!(lines, vec!["", "Supercalifragilistic", "is long"]);
}

#[test]
fn wrap_keeps_empty_words_from_double_spaces() {
    let lines = wrap_words("a  b", 1000.0, &mut Mono);
    assert_eq!(lines, vec!["a  b"]);
    assert_eq!(wrap_words("", 100.0, &mut Mono), vec![""]);
}

#[test]
fn reveal_consumes_line_plus_one() {
    let lines = vec!["hello world".to_string(), "foo bar".to_string()];
    assert!(reveal_lines(&lines, 0).is_empty());
    assert_eq!(reveal_lines(&lines, 5), vec!["hello"]);
    assert_eq!(reveal_lines(&lines, 11), vec!["hello world"]);
    // The 12th character is the joining space; the second line is not started yet.
    assert_eq!(reveal_lines(&lines, 12), vec!["hello world"]);
    assert_eq!(reveal_lines(&lines, 13), vec!["hello world", "f"]);
    assert_eq!(reveal_lines(&lines, 19), vec!["hello world", "foo bar"]);
    assert_eq!(reveal_lines(&lines, 500), vec!["hello world", "foo bar"]);
}

#[test]
fn reveal_all_of_quirky_wrap_drops_last_char() {
    let caption = "Supercalifragilistic";
    let lines = wrap_words(caption, 100.0, &mut Mono);
    let drawn = reveal_lines(&lines, Reveal::All.budget(caption));
    assert_eq!(drawn, vec!["", "Supercalifragilisti"]);
}

#[test]
fn reveal_counts_unicode_scalars() {
    let lines = vec!["crème brûlée".to_string()];
    assert_eq!(reveal_lines(&lines, 4), vec!["crèm"]);
    assert_eq!(Reveal::All.budget("brûlée"), 6);
    assert_eq!(Reveal::Chars(3).budget("brûlée"), 3);
}

#[test]
fn builtin_metrics_scale_with_size() {
    let mut m = BuiltinMetrics::new(20.0);
    assert!((m.measure("abcd") - 44.0).abs() < 1e-4);
    assert_eq!(m.measure(""), 0.0);
}
