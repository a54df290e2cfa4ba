/// Approximate token count of a finished dump, as the receiving model sees it.
///
/// Uses tiktoken's `cl100k_base` encoding. If the encoding cannot be loaded
/// this falls back to the `len / 4` rule of thumb, rounded up.
pub fn count_tokens(text: &str) -> usize {
    match tiktoken_rs::cl100k_base() {
        Ok(encoding) => encoding.encode_ordinary(text).len(),
        Err(e) => {
            log::debug!("tiktoken unavailable, estimating tokens: {}", e);
            fallback_tokens(text)
        }
    }
}

#[inline]
fn fallback_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}
