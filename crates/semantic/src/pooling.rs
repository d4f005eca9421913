//! Tensor plumbing for local transformer models: batch padding and
//! attention-masked mean pooling over flat row-major buffers.

#![cfg_attr(not(feature = "onnx"), allow(dead_code))]

use crate::SemanticError;

/// Token ids and attention masks padded to a common sequence length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PaddedBatch {
    pub(crate) batch: usize,
    pub(crate) seq_len: usize,
    pub(crate) ids: Vec<i64>,
    pub(crate) mask: Vec<i64>,
}

impl PaddedBatch {
    /// Truncate each `(ids, mask)` row to `max_len` and right-pad with zeros
    /// to the longest remaining row (at least 1).
    pub(crate) fn new(rows: &[(Vec<u32>, Vec<u32>)], max_len: usize) -> Result<Self, SemanticError> {
        let seq_len = rows
            .iter()
            .map(|(ids, _)| ids.len().min(max_len))
            .max()
            .unwrap_or(0)
            .max(1);
        let mut ids = Vec::with_capacity(rows.len() * seq_len);
        let mut mask = Vec::with_capacity(rows.len() * seq_len);

        for (row_ids, row_mask) in rows {
            if row_ids.len() != row_mask.len() {
                return Err(SemanticError::Inference(
                    "tokenizer produced mismatched id/mask lengths".into(),
                ));
            }
            let keep = row_ids.len().min(seq_len);
            ids.extend(row_ids[..keep].iter().map(|&id| i64::from(id)));
            mask.extend(row_mask[..keep].iter().map(|&m| i64::from(m)));
            ids.extend(std::iter::repeat_n(0, seq_len - keep));
            mask.extend(std::iter::repeat_n(0, seq_len - keep));
        }

        Ok(Self {
            batch: rows.len(),
            seq_len,
            ids,
            mask,
        })
    }

    pub(crate) fn row_mask(&self, row: usize) -> &[i64] {
        &self.mask[row * self.seq_len..(row + 1) * self.seq_len]
    }
}

/// Mean of the token vectors whose mask is set. `tokens` is one sequence,
/// `mask.len()` rows of `hidden` floats. An all-zero mask gives zeros.
pub(crate) fn mean_pool(tokens: &[f32], mask: &[i64], hidden: usize) -> Vec<f32> {
    let mut sum = vec![0.0f32; hidden];
    let mut count = 0.0f32;
    for (row, _) in tokens.chunks(hidden).zip(mask).filter(|(_, m)| **m != 0) {
        for (acc, val) in sum.iter_mut().zip(row) {
            *acc += val;
        }
        count += 1.0;
    }
    if count > 0.0 {
        for acc in &mut sum {
            *acc /= count;
        }
    }
    sum
}

/// Turn a flat model output into one vector per input.
///
/// `shape` is `[batch, hidden]` for models with a pooled output, or
/// `[batch, seq, hidden]` for a raw hidden state, which is mean-pooled with
/// the batch's attention mask.
pub(crate) fn pool_output(
    flat: &[f32],
    shape: &[usize],
    padded: &PaddedBatch,
) -> Result<Vec<Vec<f32>>, SemanticError> {
    match *shape {
        [batch, hidden] if batch == padded.batch && flat.len() == batch * hidden => {
            Ok(flat.chunks(hidden.max(1)).map(<[f32]>::to_vec).collect())
        }
        [batch, seq, hidden]
            if batch == padded.batch
                && seq == padded.seq_len
                && flat.len() == batch * seq * hidden =>
        {
            Ok((0..batch)
                .map(|row| {
                    let start = row * seq * hidden;
                    mean_pool(&flat[start..start + seq * hidden], padded.row_mask(row), hidden)
                })
                .collect())
        }
        _ => Err(SemanticError::Inference(format!(
            "unexpected model output shape {shape:?} for {} inputs of length {}",
            padded.batch, padded.seq_len
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_longest_row() {
        let rows = vec![(vec![101, 7, 102], vec![1, 1, 1]), (vec![101, 102], vec![1, 1])];
        let padded = PaddedBatch::new(&rows, 512).unwrap();
        assert_eq!((padded.batch, padded.seq_len), (2, 3));
        assert_eq!(padded.ids, vec![101, 7, 102, 101, 102, 0]);
        assert_eq!(padded.row_mask(1), &[1, 1, 0]);
    }

    #[test]
    fn truncates_to_max_len() {
        let rows = vec![(vec![1, 2, 3, 4, 5], vec![1; 5])];
        let padded = PaddedBatch::new(&rows, 3).unwrap();
        assert_eq!(padded.seq_len, 3);
        assert_eq!(padded.ids, vec![1, 2, 3]);
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let rows = vec![(vec![1, 2], vec![1])];
        assert!(matches!(
            PaddedBatch::new(&rows, 8),
            Err(SemanticError::Inference(_))
        ));
    }

    #[test]
    fn mean_pool_ignores_padding() {
        // two real tokens, one padded token carrying junk
        let tokens = [1.0, 2.0, 3.0, 4.0, 100.0, 100.0];
        assert_eq!(mean_pool(&tokens, &[1, 1, 0], 2), vec![2.0, 3.0]);
        assert_eq!(mean_pool(&tokens, &[0, 0, 0], 2), vec![0.0, 0.0]);
    }

    #[test]
    fn hidden_state_output_is_pooled_per_row() {
        let rows = vec![(vec![1, 2], vec![1, 1]), (vec![1], vec![1])];
        let padded = PaddedBatch::new(&rows, 8).unwrap();
        let flat = [1.0, 1.0, 3.0, 3.0, 5.0, 7.0, 9.0, 9.0];
        let vectors = pool_output(&flat, &[2, 2, 2], &padded).unwrap();
        assert_eq!(vectors, vec![vec![2.0, 2.0], vec![5.0, 7.0]]);
    }

    #[test]
    fn pooled_output_is_split_per_row() {
        let rows = vec![(vec![1], vec![1]), (vec![2], vec![1])];
        let padded = PaddedBatch::new(&rows, 8).unwrap();
        let vectors = pool_output(&[0.1, 0.2, 0.3, 0.4], &[2, 2], &padded).unwrap();
        assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
    }

    #[test]
    fn unexpected_shape_is_an_error() {
        let rows = vec![(vec![1], vec![1])];
        let padded = PaddedBatch::new(&rows, 8).unwrap();
        assert!(pool_output(&[0.0; 6], &[3, 2], &padded).is_err());
        assert!(pool_output(&[0.0; 6], &[6], &padded).is_err());
    }
}
