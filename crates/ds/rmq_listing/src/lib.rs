//! RMQ に基づく文書列挙: Sadakane の C 配列版と ILCP 版。
//!
//! どちらも、同じ入力範囲に対して同じ文書集合を返す（順序は未規定）。

use arg_rmq::ArgRmq;
use sparse_bit_vector::SparseBitVector;

/// Sadakane の C 配列を構築する。
///
/// `C[i]` は、`i` より前で `DA[j] = DA[i]` となる最大の `j` に `1` を足したもの、
/// そのような `j` がなければ `0`。
pub fn build_c_array(da: &[u32], doc_count: usize) -> Vec<u32> {
    let mut c = vec![0u32; da.len()];
    let mut last_seen: Vec<Option<usize>> = vec![None; doc_count];
    for (i, &d) in da.iter().enumerate() {
        c[i] = match last_seen[d as usize] {
            Some(j) => (j + 1) as u32,
            None => 0,
        };
        last_seen[d as usize] = Some(i);
    }
    c
}

/// Kasai のアルゴリズムによる LCP 配列の構築。
///
/// `lcp[0] = 0`。`lcp[i]`（`i >= 1`）は `text[sa[i-1]..]` と `text[sa[i]..]`
/// の最長共通接頭辞長。
///
/// # Complexity
/// $O(n)$ time。
pub fn kasai_lcp<T: Eq>(text: &[T], sa: &[usize]) -> Vec<usize> {
    let n = sa.len();
    let mut rank = vec![0usize; n];
    for (i, &p) in sa.iter().enumerate() {
        rank[p] = i;
    }
    let mut lcp = vec![0usize; n];
    let mut h = 0usize;
    for i in 0..n {
        if rank[i] > 0 {
            let j = sa[rank[i] - 1];
            while i + h < n && j + h < n && text[i + h] == text[j + h] {
                h += 1;
            }
            lcp[rank[i]] = h;
            if h > 0 {
                h -= 1;
            }
        } else {
            h = 0;
        }
    }
    lcp
}

fn recurse(
    da: &[u32],
    rmq: &ArgRmq<u32>,
    a: usize,
    b: usize,
    reported: &mut [bool],
    out: &mut Vec<u32>,
) {
    let k = rmq.argmin(a, b + 1);
    let doc = da[k] as usize;
    if reported[doc] {
        return;
    }
    reported[doc] = true;
    out.push(doc as u32);
    if a < k {
        recurse(da, rmq, a, k - 1, reported, out);
    }
    if k < b {
        recurse(da, rmq, k + 1, b, reported, out);
    }
}

/// Sadakane の C 配列に対する RMQ で文書列挙を行うエンジン。
pub struct RmqListingEngine {
    c: Vec<u32>,
    rmq: ArgRmq<u32>,
    doc_count: usize,
}

impl RmqListingEngine {
    /// `da`（長さ n）と文書数 `doc_count` から構築する。
    pub fn build(da: &[u32], doc_count: usize) -> Self {
        let c = build_c_array(da, doc_count);
        Self::from_c_array(c, doc_count)
    }

    /// すでに計算済みの C 配列から直接構築する（永続化からの読み込みに使う）。
    pub fn from_c_array(c: Vec<u32>, doc_count: usize) -> Self {
        let rmq = ArgRmq::from(c.clone());
        Self { c, rmq, doc_count }
    }

    pub fn doc_count(&self) -> usize { self.doc_count }
    pub fn c_array(&self) -> &[u32] { &self.c }

    /// `[sp, ep)` に現れる文書を、`reported` ビットマップで刈り込みながら列挙する。
    /// 出力の順序は未規定（呼び出し側で sort-unique する）。
    pub fn list_range(&self, da: &[u32], sp: usize, ep: usize) -> Vec<u32> {
        if sp >= ep {
            return vec![];
        }
        let mut reported = vec![false; self.doc_count];
        let mut out = vec![];
        recurse(da, &self.rmq, sp, ep - 1, &mut reported, &mut out);
        out
    }
}

/// interleaved-LCP run-head による文書列挙エンジン。
///
/// [`RmqListingEngine`] とは異なる領域で再帰する: クエリ範囲 `[sp, ep)` を
/// `run_heads` の rank によって run の添字領域 `[a, b]` に変換し、そこで
/// `run_rmq`（`run_argmin`）による argmin 再帰を行う。見つかった run の先頭
/// 位置は `run_heads` の select（[`SparseBitVector::get`]）で文字位置に戻し、
/// その文書を `da` から読む。同じ run 内の以降の位置はすべて同じ文書に属す
/// る（LCP run の構成上の不変条件）ので、run の終端（次の run 先頭、または
/// クエリ境界）まで歩いて回収してから、残る左右の部分区間に再帰する。
pub struct IlcpListingEngine {
    inner: RmqListingEngine,
    run_heads: SparseBitVector,
    run_values: Vec<u32>,
    run_rmq: ArgRmq<u32>,
}

impl IlcpListingEngine {
    /// `text`/`sa` から LCP を構築し、`da`/`doc_count` から C 配列を構築する。
    pub fn build<T: Eq>(text: &[T], sa: &[usize], da: &[u32], doc_count: usize) -> Self {
        let inner = RmqListingEngine::build(da, doc_count);
        let lcp = kasai_lcp(text, sa);

        let mut positions = vec![];
        let mut run_values = vec![];
        let mut prev: Option<usize> = None;
        for (i, &v) in lcp.iter().enumerate() {
            if prev != Some(v) {
                positions.push(i);
                run_values.push(v as u32);
                prev = Some(v);
            }
        }
        let run_heads = SparseBitVector::from_sorted(&positions, lcp.len().max(1));
        let run_rmq = ArgRmq::from(run_values.clone());

        Self { inner, run_heads, run_values, run_rmq }
    }

    /// すでに計算済みの C 配列・run head 構造から直接構築する
    /// （永続化からの読み込みに使う）。
    pub fn from_parts(
        c: Vec<u32>,
        doc_count: usize,
        run_heads: SparseBitVector,
        run_values: Vec<u32>,
    ) -> Self {
        let inner = RmqListingEngine::from_c_array(c, doc_count);
        let run_rmq = ArgRmq::from(run_values.clone());
        Self { inner, run_heads, run_values, run_rmq }
    }

    pub fn run_count(&self) -> usize { self.run_values.len() }
    pub fn run_values(&self) -> &[u32] { &self.run_values }
    pub fn run_heads(&self) -> &SparseBitVector { &self.run_heads }

    /// `[l, r)` における run 値の最小値の添字を返す（run の領域に対する RMQ）。
    pub fn run_argmin(&self, l: usize, r: usize) -> usize { self.run_rmq.argmin(l, r) }

    /// `pos` を含む run の添字を返す（`run_heads` の rank による領域変換）。
    fn run_index_of(&self, pos: usize) -> usize { self.run_heads.rank(pos + 1) - 1 }

    /// run の添字領域 `[a, b]` に対する argmin 再帰。見つかった run ごとに、
    /// その先頭位置の文書と、run の終端（または `ep`）までの残り位置の文書を
    /// まとめて報告してから、残る左右の部分区間に再帰する。
    fn recurse_runs(
        &self,
        da: &[u32],
        sp: usize,
        ep: usize,
        a: usize,
        b: usize,
        reported: &mut [bool],
        out: &mut Vec<u32>,
    ) {
        let run_idx = self.run_argmin(a, b + 1);
        let head_pos = self.run_heads.get(run_idx);
        let pos = sp.max(head_pos);
        let doc = da[pos] as usize;
        if reported[doc] {
            return;
        }
        reported[doc] = true;
        out.push(doc as u32);

        let run_end =
            if run_idx + 1 < self.run_heads.len() { self.run_heads.get(run_idx + 1).min(ep) } else { ep };
        for &d in &da[pos + 1..run_end] {
            let d = d as usize;
            if !reported[d] {
                reported[d] = true;
                out.push(d as u32);
            }
        }

        if a < run_idx {
            self.recurse_runs(da, sp, ep, a, run_idx - 1, reported, out);
        }
        if run_idx < b {
            self.recurse_runs(da, sp, ep, run_idx + 1, b, reported, out);
        }
    }

    /// `[sp, ep)` に現れる文書を、run-head の領域変換と run 単位の argmin
    /// 再帰で列挙する。出力の順序は未規定。
    pub fn list_range(&self, da: &[u32], sp: usize, ep: usize) -> Vec<u32> {
        if sp >= ep {
            return vec![];
        }
        let a = self.run_index_of(sp);
        let b = self.run_index_of(ep - 1);
        let mut reported = vec![false; self.inner.doc_count()];
        let mut out = vec![];
        self.recurse_runs(da, sp, ep, a, b, &mut reported, &mut out);
        out
    }

    pub fn inner(&self) -> &RmqListingEngine { &self.inner }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(da: &[u32], sp: usize, ep: usize) -> Vec<u32> {
        let mut v: Vec<u32> = da[sp..ep].to_vec();
        v.sort_unstable();
        v.dedup();
        v
    }

    #[test]
    fn test_rmq_listing_matches_brute_force() {
        let da: Vec<u32> = vec![0, 1, 1, 2, 0, 0, 1, 2, 2, 0, 1, 1, 1, 0, 2];
        let engine = RmqListingEngine::build(&da, 3);
        for sp in 0..da.len() {
            for ep in sp..=da.len() {
                let mut got = engine.list_range(&da, sp, ep);
                got.sort_unstable();
                assert_eq!(got, brute_force(&da, sp, ep), "sp={sp} ep={ep}");
            }
        }
    }

    #[test]
    fn test_kasai_lcp() {
        // "banana$" 接尾辞配列: 位置 0..7 に対する SA は既知の値。
        let text: Vec<u8> = b"banana$".to_vec();
        let mut sa: Vec<usize> = (0..text.len()).collect();
        sa.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
        let lcp = kasai_lcp(&text, &sa);
        assert_eq!(lcp[0], 0);
        for i in 1..sa.len() {
            let common = text[sa[i - 1]..]
                .iter()
                .zip(text[sa[i]..].iter())
                .take_while(|(a, b)| a == b)
                .count();
            assert_eq!(lcp[i], common);
        }
    }

    #[test]
    fn test_ilcp_matches_rmq_listing() {
        let text: Vec<u8> = b"TATA$LATA$AAAA$".to_vec();
        let mut sa: Vec<usize> = (0..text.len()).collect();
        sa.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
        let border: Vec<bool> = text.iter().map(|&b| b == b'$').collect();
        let mut doc_of_pos = vec![0u32; text.len()];
        {
            let mut d = 0;
            for (i, &is_border) in border.iter().enumerate() {
                doc_of_pos[i] = d;
                if is_border {
                    d += 1;
                }
            }
        }
        let da: Vec<u32> = sa.iter().map(|&p| doc_of_pos[p]).collect();

        let rmq_engine = RmqListingEngine::build(&da, 3);
        let ilcp_engine = IlcpListingEngine::build(&text, &sa, &da, 3);

        for sp in 0..da.len() {
            for ep in sp..=da.len() {
                let mut a = rmq_engine.list_range(&da, sp, ep);
                let mut b = ilcp_engine.list_range(&da, sp, ep);
                a.sort_unstable();
                b.sort_unstable();
                assert_eq!(a, b, "sp={sp} ep={ep}");
            }
        }
    }
}
