//! Word-bounded character n-grams.
//!
//! Text is lowercased and split on whitespace; each word is padded with one
//! space on either side and every n-gram of length `min_n..=max_n` inside the
//! padded word is emitted. A padded word no longer than `n` is emitted once,
//! whole, and no longer n-grams are taken from it. N-grams never span two
//! words, which keeps CJK phrases and part codes from bleeding into each other.

/// Smallest n-gram length.
pub const MIN_N: usize = 1;
/// Largest n-gram length.
pub const MAX_N: usize = 3;

/// Emit word-bounded char n-grams of `text` into `out`.
pub fn char_wb_ngrams(text: &str, out: &mut Vec<String>) {
    let lowered = text.to_lowercase();
    for word in lowered.split_whitespace() {
        let mut padded: Vec<char> = Vec::with_capacity(word.len() + 2);
        padded.push(' ');
        padded.extend(word.chars());
        padded.push(' ');
        let len = padded.len();

        for n in MIN_N..=MAX_N {
            if len <= n {
                out.push(padded.iter().collect());
                break;
            }
            for start in 0..=(len - n) {
                out.push(padded[start..start + n].iter().collect());
            }
        }
    }
}
