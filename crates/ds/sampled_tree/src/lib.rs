//! SLP の parse tree から射影した、文書集合の前計算点（サンプル点）を持つ木。
//!
//! 根から下ってゆき、スパンが十分短いか、通過する文書の種類数が十分少ない
//! 節に達したら、そこで打ち切って「サンプル葉」(= DA のブロック) とする。
//! 打ち切らない節は両方の子を無条件にサンプルする（サンプル木の節は必ず
//! SLP 上の直接の子を指し、祖先を飛び越えない）。これにより `firstChildMask`/
//! `parents` の対応が単純になる。

use std::collections::HashMap;
use std::rc::Rc;

use count::Count;
use packed_int_vector::PackedIntVector;
use slp::{Slp, VarId};
use sparse_bit_vector::SparseBitVector;

/// サンプル木の構築結果。`chunks[k]` がサンプル節 `k` の文書集合
/// （昇順・重複なし）。葉は `0..leaf_count`、内部節は `leaf_count..node_count`。
pub struct Built {
    pub tree: SampledTree,
    pub chunks: Vec<Vec<u32>>,
}

/// SLP の parse tree に射影された、サンプル点の木。
#[derive(Clone, Debug)]
pub struct SampledTree {
    n: usize,
    leaf_count: usize,
    internal_count: usize,
    leaf_starts: SparseBitVector,
    first_child_mask: rs_dict::RsDict,
    parents: PackedIntVector,
    next_leaf: PackedIntVector,
}

enum ChildRef {
    Leaf(usize),
    Internal(usize),
}

struct InternalNode {
    start: usize,
    end: usize,
    chunk: Rc<Vec<u32>>,
    children: [ChildRef; 2],
}

struct Builder<'a, S: Slp> {
    slp: &'a S,
    block_size: usize,
    chunk_threshold: usize,
    memo: HashMap<VarId, Rc<Vec<u32>>>,
    leaves: Vec<(usize, Rc<Vec<u32>>)>,
    internal: Vec<InternalNode>,
}

impl<'a, S: Slp> Builder<'a, S> {
    fn doc_set_of(&mut self, v: VarId) -> Rc<Vec<u32>> {
        if let Some(hit) = self.memo.get(&v) {
            return hit.clone();
        }
        let set = if self.slp.is_terminal(v) {
            vec![v]
        } else {
            let (l, r) = self.slp.children(v);
            let ls = self.doc_set_of(l);
            let rs = self.doc_set_of(r);
            set_merge::union_sorted(&ls, &rs)
        };
        let rc = Rc::new(set);
        self.memo.insert(v, rc.clone());
        rc
    }

    fn is_leaf_cut(&mut self, v: VarId) -> bool {
        if self.slp.is_terminal(v) {
            return true;
        }
        if self.slp.span_len(v) <= self.block_size {
            return true;
        }
        self.doc_set_of(v).len() <= self.chunk_threshold
    }

    fn visit(&mut self, v: VarId, start: usize) -> ChildRef {
        if self.is_leaf_cut(v) {
            let chunk = self.doc_set_of(v);
            let id = self.leaves.len();
            self.leaves.push((start, chunk));
            return ChildRef::Leaf(id);
        }
        let (l, r) = self.slp.children(v);
        let ls = self.slp.span_len(l);
        let span = self.slp.span_len(v);
        let chunk = self.doc_set_of(v);
        let id = self.internal.len();
        // 子を訪れる前に id を確保する: 「最初に現れた順」での番号付けのため。
        self.internal.push(InternalNode {
            start,
            end: start + span,
            chunk,
            children: [ChildRef::Leaf(0), ChildRef::Leaf(0)],
        });
        let lc = self.visit(l, start);
        let rc = self.visit(r, start + ls);
        self.internal[id].children = [lc, rc];
        ChildRef::Internal(id)
    }
}

impl SampledTree {
    /// `slp` の根を文書配列全体とみなし、サンプル木を構築する。
    ///
    /// `block_size` はサンプル葉のスパンの上限（これ以下なら、文書集合の
    /// 大きさに関わらず打ち切る）。`chunk_threshold` は、スパンが大きくても
    /// 通過する文書の種類数がこれ以下ならそれ以上細分化しない、という打ち切り
    /// 条件を与える。
    ///
    /// # Requirements
    /// `block_size >= 1`。
    pub fn build<S: Slp>(slp: &S, block_size: usize, chunk_threshold: usize) -> Built {
        let mut builder = Builder {
            slp,
            block_size,
            chunk_threshold,
            memo: HashMap::new(),
            leaves: Vec::new(),
            internal: Vec::new(),
        };
        let n = slp.span_len(slp.root());
        builder.visit(slp.root(), 0);

        let leaf_count = builder.leaves.len();
        let internal_count = builder.internal.len();
        let node_count = leaf_count + internal_count;

        let leaf_positions: Vec<usize> =
            builder.leaves.iter().map(|&(start, _)| start).collect();
        let leaf_starts = SparseBitVector::from_sorted(&leaf_positions, n.max(1));

        let abs_id = |c: &ChildRef| -> usize {
            match *c {
                ChildRef::Leaf(i) => i,
                ChildRef::Internal(i) => leaf_count + i,
            }
        };

        let mut first_child_bits = vec![false; node_count];
        let mut first_child_entries: Vec<(usize, u32)> = Vec::with_capacity(internal_count);
        for (j, node) in builder.internal.iter().enumerate() {
            let first_abs = abs_id(&node.children[0]);
            first_child_bits[first_abs] = true;
            first_child_entries.push((first_abs, j as u32));
        }
        first_child_entries.sort_by_key(|&(id, _)| id);
        let parents_raw: Vec<u64> =
            first_child_entries.iter().map(|&(_, j)| j as u64).collect();
        let parents_width =
            PackedIntVector::width_for_max(internal_count.saturating_sub(1) as u64);
        let parents = PackedIntVector::from_values_with_width(&parents_raw, parents_width);

        let first_child_mask: rs_dict::RsDict = first_child_bits.into();

        let next_leaf_raw: Vec<u64> = builder
            .internal
            .iter()
            .map(|node| {
                if node.end >= n {
                    leaf_count as u64
                } else {
                    leaf_starts.rank(node.end) as u64
                }
            })
            .collect();
        let next_leaf_width = PackedIntVector::width_for_max(leaf_count as u64);
        let next_leaf = PackedIntVector::from_values_with_width(&next_leaf_raw, next_leaf_width);

        let chunks: Vec<Vec<u32>> = builder
            .leaves
            .iter()
            .map(|(_, c)| (**c).clone())
            .chain(builder.internal.iter().map(|node| (*node.chunk).clone()))
            .collect();

        let tree = SampledTree {
            n,
            leaf_count,
            internal_count,
            leaf_starts,
            first_child_mask,
            parents,
            next_leaf,
        };
        Built { tree, chunks }
    }

    pub fn leaf_count(&self) -> usize { self.leaf_count }
    pub fn internal_count(&self) -> usize { self.internal_count }
    pub fn node_count(&self) -> usize { self.leaf_count + self.internal_count }
    pub fn len(&self) -> usize { self.n }
    pub fn is_empty(&self) -> bool { self.n == 0 }

    /// サンプル葉 `k` の開始 SA 位置。`k == leaf_count()` のときは `n` を返す
    /// （末尾の番兵）。
    ///
    /// # Requirements
    /// `k <= leaf_count()`。
    pub fn position(&self, k: usize) -> usize {
        if k == self.leaf_count {
            self.n
        } else {
            self.leaf_starts.get(k)
        }
    }

    /// SA 位置 `i` を含むブロックのサンプル葉の添字を返す。
    ///
    /// # Requirements
    /// `i < self.len()`。
    pub fn leaf(&self, i: usize) -> usize { self.leaf_starts.rank(i + 1) - 1 }

    /// サンプル節 `k` が、自身の親の最初の子かどうかを返す。
    pub fn is_first_child(&self, k: usize) -> bool {
        self.first_child_mask.count(k..=k, 1) == 1
    }

    /// サンプル節 `k`（最初の子であるもの限定）の親を返す。
    ///
    /// 戻り値は `(親の絶対添字, 親の直後にある最初のサンプル葉の添字)`。
    /// `k` が最初の子でなければ `None`。
    pub fn parent(&self, k: usize) -> Option<(usize, usize)> {
        if !self.is_first_child(k) {
            return None;
        }
        let rank = self.first_child_mask.count(0..k, 1);
        let parent_rel = self.parents.get(rank) as usize;
        let parent_abs = self.leaf_count + parent_rel;
        let next_leaf = self.next_leaf.get(parent_rel) as usize;
        Some((parent_abs, next_leaf))
    }

    /// 内部節 `j`（`leaf_count()` からの相対添字）の `nextLeaf` を返す。
    pub fn next_leaf_of_internal(&self, j: usize) -> usize { self.next_leaf.get(j) as usize }

    pub fn leaf_starts_raw(&self) -> &SparseBitVector { &self.leaf_starts }
    pub fn first_child_mask_raw(&self) -> &rs_dict::RsDict { &self.first_child_mask }
    pub fn parents_raw(&self) -> &PackedIntVector { &self.parents }
    pub fn next_leaf_raw(&self) -> &PackedIntVector { &self.next_leaf }

    pub fn into_raw_parts(
        self,
    ) -> (usize, usize, usize, SparseBitVector, rs_dict::RsDict, PackedIntVector, PackedIntVector)
    {
        (
            self.n,
            self.leaf_count,
            self.internal_count,
            self.leaf_starts,
            self.first_child_mask,
            self.parents,
            self.next_leaf,
        )
    }

    pub fn from_raw_parts(
        n: usize,
        leaf_count: usize,
        internal_count: usize,
        leaf_starts: SparseBitVector,
        first_child_mask: rs_dict::RsDict,
        parents: PackedIntVector,
        next_leaf: PackedIntVector,
    ) -> Self {
        Self { n, leaf_count, internal_count, leaf_starts, first_child_mask, parents, next_leaf }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ToySlp {
        root: VarId,
        terminal_count: VarId,
        children: Vec<(VarId, VarId)>,
        span: Vec<usize>,
    }

    impl ToySlp {
        fn new(da: &[u32], d: u32) -> Self {
            let mut level: Vec<VarId> = da.to_vec();
            let mut children = vec![];
            let mut span = vec![];
            let mut next_id = d;
            loop {
                if level.len() == 1 {
                    return Self { root: level[0], terminal_count: d, children, span };
                }
                let mut next_level = vec![];
                let mut i = 0;
                while i < level.len() {
                    if i + 1 < level.len() {
                        let sl = Self::span_of(level[i], d, &span);
                        let sr = Self::span_of(level[i + 1], d, &span);
                        children.push((level[i], level[i + 1]));
                        span.push(sl + sr);
                        next_level.push(next_id);
                        next_id += 1;
                        i += 2;
                    } else {
                        next_level.push(level[i]);
                        i += 1;
                    }
                }
                level = next_level;
            }
        }
        fn span_of(v: VarId, d: VarId, span: &[usize]) -> usize {
            if v < d {
                1
            } else {
                span[(v - d) as usize]
            }
        }
    }

    impl Slp for ToySlp {
        fn root(&self) -> VarId { self.root }
        fn terminal_count(&self) -> VarId { self.terminal_count }
        fn children(&self, v: VarId) -> (VarId, VarId) {
            self.children[(v - self.terminal_count) as usize]
        }
        fn span_len(&self, v: VarId) -> usize {
            if self.is_terminal(v) {
                1
            } else {
                self.span[(v - self.terminal_count) as usize]
            }
        }
    }

    #[test]
    fn test_build_and_query() {
        let da: Vec<u32> = vec![0, 1, 1, 2, 0, 0, 1, 2, 2, 0, 1, 1, 1, 0, 2];
        let slp = ToySlp::new(&da, 3);
        let Built { tree, chunks } = SampledTree::build(&slp, 3, 1);

        assert_eq!(tree.len(), da.len());
        assert_eq!(tree.position(tree.leaf_count()), da.len());
        assert_eq!(tree.position(0), 0);

        // leaf の開始位置が厳密増加で、n をタイルしていることを確かめる。
        let mut prev = 0;
        for k in 0..tree.leaf_count() {
            let p = tree.position(k);
            assert!(k == 0 || p > prev);
            prev = p;
        }

        // leaf(i) が各位置を正しいブロックに割り当てることを確かめる。
        for i in 0..da.len() {
            let k = tree.leaf(i);
            let start = tree.position(k);
            let end = tree.position(k + 1);
            assert!(start <= i && i < end);
        }

        // 各サンプル節のチャンクは、対応する SA 範囲の文書集合の昇順・重複なし列。
        for k in 0..tree.leaf_count() {
            let start = tree.position(k);
            let end = tree.position(k + 1);
            let mut expect: Vec<u32> = da[start..end].to_vec();
            expect.sort_unstable();
            expect.dedup();
            assert_eq!(chunks[k], expect);
        }
    }

    #[test]
    fn test_single_leaf_small_collection() {
        let da: Vec<u32> = vec![0, 1];
        let slp = ToySlp::new(&da, 2);
        let Built { tree, chunks } = SampledTree::build(&slp, 256, 8);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.internal_count(), 0);
        assert_eq!(chunks[0], vec![0, 1]);
    }
}
