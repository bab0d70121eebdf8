//! サンプル木の各節に結びついた、前計算済みの文書集合を格納する。
//!
//! 平坦な連結と境界ビットベクトルで持つ [`PlainChunkStore`] と、
//! 連結列自体を二次的な SLP で圧縮する [`GcChunkStore`] の 2 種類を持つ。
//! どちらも `chunk(k)` で昇順・重複なしの文書 id 列を返す。

use packed_int_vector::PackedIntVector;
use slp::{PlainSlp, Slp};
use sparse_bit_vector::SparseBitVector;

/// サンプル節の文書集合を取り出すための共通インタフェース。
pub trait ChunkStore {
    fn node_count(&self) -> usize;
    /// サンプル節 `k` の文書集合を、昇順・重複なしの列として返す。
    fn chunk(&self, k: usize) -> Vec<u32>;
}

fn prefix_starts(chunks: &[Vec<u32>]) -> (Vec<usize>, usize) {
    let mut starts = Vec::with_capacity(chunks.len());
    let mut total = 0;
    for c in chunks {
        starts.push(total);
        total += c.len();
    }
    (starts, total)
}

/// 連結した `values` と、節ごとの境界を持つ素朴な格納方式。
#[derive(Clone, Debug)]
pub struct PlainChunkStore {
    node_count: usize,
    total_len: usize,
    offsets: SparseBitVector,
    values: PackedIntVector,
}

impl PlainChunkStore {
    /// サンプル木の各節について、昇順・重複なしの文書集合の列 `chunks` から構築する。
    pub fn build(chunks: &[Vec<u32>]) -> Self {
        let node_count = chunks.len();
        let (starts, total_len) = prefix_starts(chunks);
        let offsets = SparseBitVector::from_sorted(&starts, total_len.max(1));

        let flat: Vec<u64> = chunks.iter().flatten().map(|&x| x as u64).collect();
        let width = PackedIntVector::width_for_max(
            flat.iter().cloned().max().unwrap_or(0),
        );
        let values = PackedIntVector::from_values_with_width(&flat, width);

        Self { node_count, total_len, offsets, values }
    }

    fn bounds(&self, k: usize) -> (usize, usize) {
        let start = self.offsets.get(k);
        let end = if k + 1 < self.node_count { self.offsets.get(k + 1) } else { self.total_len };
        (start, end)
    }

    pub fn total_len(&self) -> usize { self.total_len }
    pub fn offsets_raw(&self) -> &SparseBitVector { &self.offsets }
    pub fn values_raw(&self) -> &PackedIntVector { &self.values }

    pub fn into_raw_parts(self) -> (usize, usize, SparseBitVector, PackedIntVector) {
        (self.node_count, self.total_len, self.offsets, self.values)
    }

    pub fn from_raw_parts(
        node_count: usize,
        total_len: usize,
        offsets: SparseBitVector,
        values: PackedIntVector,
    ) -> Self {
        Self { node_count, total_len, offsets, values }
    }
}

impl ChunkStore for PlainChunkStore {
    fn node_count(&self) -> usize { self.node_count }

    fn chunk(&self, k: usize) -> Vec<u32> {
        let (start, end) = self.bounds(k);
        (start..end).map(|i| self.values.get(i) as u32).collect()
    }
}

/// 連結した `values` を、二次的な SLP で圧縮して持つ格納方式。
///
/// 節の境界は、展開前の（圧縮後の）文字列上の位置ではなく、展開後の領域での
/// 位置として持つ点は [`PlainChunkStore`] と同じ。`chunk(k)` はその区間を
/// SLP の `expandRange` で復元する。
#[derive(Clone, Debug)]
pub struct GcChunkStore {
    node_count: usize,
    total_len: usize,
    offsets: SparseBitVector,
    slp: PlainSlp,
}

impl GcChunkStore {
    /// `chunks` を連結し、`doc_count` を終端数とする二次 SLP を構築する。
    ///
    /// # Requirements
    /// `doc_count >= 1`。
    pub fn build(chunks: &[Vec<u32>], doc_count: u32) -> Self {
        let node_count = chunks.len();
        let (starts, total_len) = prefix_starts(chunks);
        let offsets = SparseBitVector::from_sorted(&starts, total_len.max(1));

        let flat: Vec<u32> = chunks.iter().flatten().cloned().collect();
        let slp = if flat.is_empty() {
            // 空の入力（文書集合が全て空）に対しても root が要る。
            // 終端 0 を 1 つだけ展開する自明な SLP を充てる（chunk は使われない）。
            slp::PlainSlp::build(0, doc_count, &[])
        } else {
            slp::build_balanced(&flat, doc_count)
        };

        Self { node_count, total_len, offsets, slp }
    }

    fn bounds(&self, k: usize) -> (usize, usize) {
        let start = self.offsets.get(k);
        let end = if k + 1 < self.node_count { self.offsets.get(k + 1) } else { self.total_len };
        (start, end)
    }

    pub fn total_len(&self) -> usize { self.total_len }
    pub fn offsets_raw(&self) -> &SparseBitVector { &self.offsets }
    pub fn slp_raw(&self) -> &PlainSlp { &self.slp }

    pub fn into_raw_parts(self) -> (usize, usize, SparseBitVector, PlainSlp) {
        (self.node_count, self.total_len, self.offsets, self.slp)
    }

    pub fn from_raw_parts(
        node_count: usize,
        total_len: usize,
        offsets: SparseBitVector,
        slp: PlainSlp,
    ) -> Self {
        Self { node_count, total_len, offsets, slp }
    }
}

impl ChunkStore for GcChunkStore {
    fn node_count(&self) -> usize { self.node_count }

    fn chunk(&self, k: usize) -> Vec<u32> {
        let (start, end) = self.bounds(k);
        if start == end {
            return vec![];
        }
        let mut out = Vec::with_capacity(end - start);
        self.slp.expand_range(start, end, &mut |doc| out.push(doc as u32));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chunks() -> Vec<Vec<u32>> {
        vec![vec![0, 1], vec![2], vec![], vec![0, 1, 2], vec![1]]
    }

    #[test]
    fn test_plain_chunk_store() {
        let chunks = sample_chunks();
        let store = PlainChunkStore::build(&chunks);
        assert_eq!(store.node_count(), chunks.len());
        for (k, expect) in chunks.iter().enumerate() {
            assert_eq!(&store.chunk(k), expect);
        }
    }

    #[test]
    fn test_gc_chunk_store() {
        let chunks = sample_chunks();
        let store = GcChunkStore::build(&chunks, 3);
        assert_eq!(store.node_count(), chunks.len());
        for (k, expect) in chunks.iter().enumerate() {
            assert_eq!(&store.chunk(k), expect);
        }
    }
}
