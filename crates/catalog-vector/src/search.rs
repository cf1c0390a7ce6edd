use std::cmp::Ordering;

use crate::matrix::EmbeddingMatrix;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRow {
    pub index: usize,
    pub similarity: f32,
}

fn by_similarity_desc(a: &ScoredRow, b: &ScoredRow) -> Ordering {
    b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal)
}

/// Similarity of `query` against each candidate row, in candidate order.
pub fn rank_rows(matrix: &EmbeddingMatrix, query: &[f32], candidates: &[usize]) -> Vec<ScoredRow> {
    candidates
        .iter()
        .map(|&index| ScoredRow { index, similarity: matrix.similarity(query, index) })
        .collect()
}

/// The `k` most similar rows that pass `keep`, best first; equal scores keep row order.
pub fn top_k_rows<F>(matrix: &EmbeddingMatrix, query: &[f32], k: usize, keep: F) -> Vec<ScoredRow>
where
    F: Fn(usize) -> bool,
{
    let mut scored: Vec<ScoredRow> = (0..matrix.rows())
        .filter(|&i| keep(i))
        .map(|index| ScoredRow { index, similarity: matrix.similarity(query, index) })
        .collect();
    scored.sort_by(by_similarity_desc);
    scored.truncate(k);
    scored
}
