use crate::token::TaggedToken;

/// Language-model context: the words of the last `max_n` output rows,
/// oldest first. A boundary among those rows discards every word before
/// it, so context never reaches back across a sentence break.
pub fn build_context(output: &[TaggedToken], max_n: usize) -> Vec<&str> {
    let start = output.len().saturating_sub(max_n);
    let mut context = Vec::with_capacity(max_n);
    for row in &output[start..] {
        match row.word() {
            Some(word) => context.push(word),
            None => context.clear(),
        }
    }
    context
}
