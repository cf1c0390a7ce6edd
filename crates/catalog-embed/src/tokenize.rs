use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

/// Encodes a batch, truncated to `max_len` and right-padded with id 0 to the longest
/// sequence. Returns `(input_ids, attention_mask)`, both `[B, T]` u32 tensors.
pub fn tokenize_batch(
    tokenizer: &Tokenizer,
    texts: &[String],
    max_len: usize,
    device: &Device,
) -> Result<(Tensor, Tensor)> {
    let mut encoded = Vec::with_capacity(texts.len());
    for text in texts {
        let enc = tokenizer
            .encode(text.as_str(), true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let mut ids = enc.get_ids().to_vec();
        let mut mask = enc.get_attention_mask().to_vec();
        ids.truncate(max_len);
        mask.truncate(max_len);
        encoded.push((ids, mask));
    }

    let seq_len = encoded.iter().map(|(ids, _)| ids.len()).max().unwrap_or(0).max(1);
    let batch = encoded.len();
    let mut all_ids = Vec::with_capacity(batch * seq_len);
    let mut all_mask = Vec::with_capacity(batch * seq_len);
    for (ids, mask) in encoded {
        let pad = seq_len - ids.len();
        all_ids.extend(ids.into_iter().chain(std::iter::repeat(0).take(pad)));
        all_mask.extend(mask.into_iter().chain(std::iter::repeat(0).take(pad)));
    }

    let input_ids = Tensor::from_vec(all_ids, (batch, seq_len), device)?;
    let attention_mask = Tensor::from_vec(all_mask, (batch, seq_len), device)?;
    Ok((input_ids, attention_mask))
}
