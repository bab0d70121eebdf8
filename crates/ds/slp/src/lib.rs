//! 文書配列を圧縮する straight-line program (SLP)。

use packed_int_vector::PackedIntVector;

/// SLP の変数を指す添字。終端は `0..terminal_count()`、非終端はそれ以降。
pub type VarId = u32;

/// straight-line program。
///
/// 変数 `v` はちょうど一つの文字列 `expand(v)` を生成する文脈自由文法であり、
/// 終端 `0..d` はそれぞれ文書 id `0..d` を生成する 1 文字の変数、非終端は
/// 必ず 2 つの子を持つ。根の展開が文書配列 DA そのものになる。
///
/// 実装は 3 種の「戦略」を型として持つ（[`PlainSlp`]、[`CombinedSlp`]、
/// [`LightSlp`]）。いずれも本トレイトを実装し、ホットパスはインスタンスごとに
/// 単相化される。
pub trait Slp {
    /// 根の変数 id を返す。
    fn root(&self) -> VarId;
    /// 終端の個数（文書数 `d`）を返す。
    fn terminal_count(&self) -> VarId;
    /// `v` が終端かどうかを返す。
    fn is_terminal(&self, v: VarId) -> bool { v < self.terminal_count() }
    /// 非終端 `v` の子 `(left, right)` を返す。
    ///
    /// # Requirements
    /// `v` は非終端。
    fn children(&self, v: VarId) -> (VarId, VarId);
    /// `expand(v)` の長さを返す。
    fn span_len(&self, v: VarId) -> usize;

    /// `DA[k]` を、根からの descent により求める。
    ///
    /// # Complexity
    /// $O(h)$ time、$h$ は SLP の高さ。
    fn doc_at(&self, k: usize) -> usize {
        let mut v = self.root();
        let mut k = k;
        loop {
            if self.is_terminal(v) {
                return v as usize;
            }
            let (l, r) = self.children(v);
            let ls = self.span_len(l);
            if k < ls {
                v = l;
            } else {
                k -= ls;
                v = r;
            }
        }
    }

    /// `DA[b..e)` を左から順に `report` へ渡す。
    ///
    /// スタックを明示的に持つ非再帰の走査で行う。[b, e) を完全に含む
    /// 極大な部分木まで降りたら、その部分木を丸ごと展開する。
    ///
    /// # Complexity
    /// $O((e-b) + h\\cdot\\log(c))$ time、$c$ は極大な被覆部分木の個数。
    fn expand_range(&self, b: usize, e: usize, report: &mut dyn FnMut(usize)) {
        if b >= e {
            return;
        }
        let root_span = self.span_len(self.root());
        let mut stack = vec![(self.root(), 0_usize, root_span)];
        while let Some((v, vb, ve)) = stack.pop() {
            if ve <= b || vb >= e {
                continue;
            }
            if vb >= b && ve <= e {
                self.expand_all(v, report);
                continue;
            }
            // v を部分的にしか含まない場合、v は終端ではありえない
            // （終端の spanLength は 1 なので、含むなら完全に含む）。
            let (l, r) = self.children(v);
            let mid = vb + self.span_len(l);
            stack.push((r, mid, ve));
            stack.push((l, vb, mid));
        }
    }

    /// `v` の展開全体を左から順に `report` へ渡す。
    fn expand_all(&self, v: VarId, report: &mut dyn FnMut(usize)) {
        let mut stack = vec![v];
        while let Some(v) = stack.pop() {
            if self.is_terminal(v) {
                report(v as usize);
            } else {
                let (l, r) = self.children(v);
                stack.push(r);
                stack.push(l);
            }
        }
    }
}

/// `values` を生成する、単純な左から二分木状の SLP を構築する。
///
/// 本物の RePair は繰り返し出現するペアを規則として共有することで文法を
/// 小さくするが、ここでは外部の RePair アダプタを持たない場面のために、
/// 隣接要素を常にペアにして縮約してゆく素朴な構築を行う。生成される文字列は
/// `values` と一致するという契約は満たすが、圧縮率は RePair に及ばない。
pub fn build_balanced(values: &[VarId], terminal_count: VarId) -> PlainSlp {
    assert!(!values.is_empty(), "values must be non-empty");
    let mut level: Vec<VarId> = values.to_vec();
    let mut children = vec![];
    let mut next_id = terminal_count;
    let root = loop {
        if level.len() == 1 {
            break level[0];
        }
        let mut next_level = Vec::with_capacity((level.len() + 1) / 2);
        let mut i = 0;
        while i < level.len() {
            if i + 1 < level.len() {
                children.push((level[i], level[i + 1]));
                next_level.push(next_id);
                next_id += 1;
                i += 2;
            } else {
                next_level.push(level[i]);
                i += 1;
            }
        }
        level = next_level;
    };
    PlainSlp::build(root, terminal_count, &children)
}

/// 素朴な SLP。左右の子と spanLength を、非終端ごとに詰めた
/// [`PackedIntVector`] として持つ。`.slp` ファイル形式の中核。
#[derive(Clone, Debug)]
pub struct PlainSlp {
    root: VarId,
    terminal_count: VarId,
    left: PackedIntVector,
    right: PackedIntVector,
    // 非終端 `d+i` の spanLength が `span.get(i)`。
    span: PackedIntVector,
}

impl PlainSlp {
    /// 非終端ごとの `(left, right)` 対の列から構築する。
    ///
    /// `children[i]` が非終端 `terminal_count + i` の子。子の id は自身より
    /// 小さくなければならない（RePair などのボトムアップな構築では自然に
    /// 満たされる）。spanLength は post-order に 1 回の走査で計算する。
    ///
    /// # Requirements
    /// `root < terminal_count + children.len() as u32`。
    pub fn build(
        root: VarId,
        terminal_count: VarId,
        children: &[(VarId, VarId)],
    ) -> Self {
        let nonterm_count = children.len();
        let total = terminal_count as usize + nonterm_count;
        let id_width = PackedIntVector::width_for_max(total.saturating_sub(1) as u64);

        let mut left = PackedIntVector::new(nonterm_count, id_width);
        let mut right = PackedIntVector::new(nonterm_count, id_width);
        for (i, &(l, r)) in children.iter().enumerate() {
            left.set(i, l as u64);
            right.set(i, r as u64);
        }

        let span_of = |v: VarId, span: &[usize]| -> usize {
            if v < terminal_count {
                1
            } else {
                span[v as usize - terminal_count as usize]
            }
        };
        let mut span_vals = vec![0_usize; nonterm_count];
        for i in 0..nonterm_count {
            let (l, r) = children[i];
            span_vals[i] = span_of(l, &span_vals) + span_of(r, &span_vals);
        }
        let span_width =
            PackedIntVector::width_for_max(span_vals.iter().cloned().max().unwrap_or(1) as u64);
        let span_raw: Vec<u64> = span_vals.iter().map(|&x| x as u64).collect();
        let span = PackedIntVector::from_values_with_width(&span_raw, span_width);

        Self { root, terminal_count, left, right, span }
    }

    fn idx(&self, v: VarId) -> usize { (v - self.terminal_count) as usize }

    pub fn nonterm_count(&self) -> usize { self.left.len() }

    /// 内部表現を取り出す。永続化に用いる。
    pub fn into_raw_parts(
        self,
    ) -> (VarId, VarId, PackedIntVector, PackedIntVector, PackedIntVector) {
        (self.root, self.terminal_count, self.left, self.right, self.span)
    }

    /// [`into_raw_parts`](Self::into_raw_parts) の逆。
    pub fn from_raw_parts(
        root: VarId,
        terminal_count: VarId,
        left: PackedIntVector,
        right: PackedIntVector,
        span: PackedIntVector,
    ) -> Self {
        Self { root, terminal_count, left, right, span }
    }

    pub fn left_raw(&self) -> &PackedIntVector { &self.left }
    pub fn right_raw(&self) -> &PackedIntVector { &self.right }
    pub fn span_raw(&self) -> &PackedIntVector { &self.span }
}

impl Slp for PlainSlp {
    fn root(&self) -> VarId { self.root }
    fn terminal_count(&self) -> VarId { self.terminal_count }

    fn children(&self, v: VarId) -> (VarId, VarId) {
        let i = self.idx(v);
        (self.left.get(i) as VarId, self.right.get(i) as VarId)
    }

    fn span_len(&self, v: VarId) -> usize {
        if self.is_terminal(v) {
            1
        } else {
            self.span.get(self.idx(v)) as usize
        }
    }
}

/// spanLength を持たない SLP。読み込み時に `left`/`right` から
/// 1 回の前方走査で再計算する（永続化サイズを削る代わりに読み込みが少し遅い）。
///
/// 子の id は自身より小さいという [`PlainSlp::build`] と同じ前提に立つ。
#[derive(Clone, Debug)]
pub struct LightSlp {
    inner: PlainSlp,
}

impl LightSlp {
    /// `left`/`right` のみから構築し、spanLength を計算する。
    pub fn from_children(
        root: VarId,
        terminal_count: VarId,
        children: &[(VarId, VarId)],
    ) -> Self {
        Self { inner: PlainSlp::build(root, terminal_count, children) }
    }

    /// 読み込み時の入力 — spanLength を持たない `.slp` ファイルから構築する。
    pub fn from_raw_parts_without_span(
        root: VarId,
        terminal_count: VarId,
        left: PackedIntVector,
        right: PackedIntVector,
    ) -> Self {
        let nonterm_count = left.len();
        let children: Vec<_> =
            (0..nonterm_count).map(|i| (left.get(i) as VarId, right.get(i) as VarId)).collect();
        Self::from_children(root, terminal_count, &children)
    }

    /// spanLength を含まない内部表現（`left`/`right` のみ）を取り出す。
    pub fn into_raw_parts(self) -> (VarId, VarId, PackedIntVector, PackedIntVector) {
        let (root, terminal_count, left, right, _span) = self.inner.into_raw_parts();
        (root, terminal_count, left, right)
    }

    /// spanLength を再計算済みの内部 `PlainSlp` への参照。永続化に用いる
    /// （`.slp` ファイルへは `left`/`right` のみを書き、`span` は書かない）。
    pub fn inner(&self) -> &PlainSlp { &self.inner }
}

impl Slp for LightSlp {
    fn root(&self) -> VarId { self.inner.root() }
    fn terminal_count(&self) -> VarId { self.inner.terminal_count() }
    fn children(&self, v: VarId) -> (VarId, VarId) { self.inner.children(v) }
    fn span_len(&self, v: VarId) -> usize { self.inner.span_len(v) }
}

/// スパンの短い非終端の展開をインライン化した SLP。
///
/// `spanLength(v) <= inline_threshold` であるような非終端 `v` について、
/// その展開（終端の列）をあらかじめ平坦化して持つ。`docAt`/`expandRange` は、
/// インライン化された節に達したら、それ以上降りずに直接読み出す。
/// 短い繰り返し（同じ文書が連続する区間など）が多い文書配列で、
/// 実効的な descent の深さを縮める。
#[derive(Clone, Debug)]
pub struct CombinedSlp {
    base: PlainSlp,
    inline_threshold: usize,
    // 非終端 `terminal_count + i` のインライン展開（あれば）。
    inline: Vec<Option<Box<[VarId]>>>,
}

impl CombinedSlp {
    /// `base` から、spanLength が `inline_threshold` 以下の非終端をインライン化して構築する。
    pub fn build(base: PlainSlp, inline_threshold: usize) -> Self {
        let nonterm_count = base.nonterm_count();
        let mut inline: Vec<Option<Box<[VarId]>>> = vec![None; nonterm_count];
        for i in 0..nonterm_count {
            let v = base.terminal_count + i as VarId;
            if base.span_len(v) > inline_threshold {
                continue;
            }
            let (l, r) = base.children(v);
            let mut flat = Vec::with_capacity(base.span_len(v));
            flatten_into(&base, &inline, l, &mut flat);
            flatten_into(&base, &inline, r, &mut flat);
            inline[i] = Some(flat.into_boxed_slice());
        }
        Self { base, inline_threshold, inline }
    }

    pub fn inline_threshold(&self) -> usize { self.inline_threshold }

    /// インライン化前の素朴な SLP への参照。永続化に用いる（インライン表は
    /// `inline_threshold` と `base` から読み込み時に再構築する）。
    pub fn base(&self) -> &PlainSlp { &self.base }
}

fn flatten_into(
    base: &PlainSlp,
    inline: &[Option<Box<[VarId]>>],
    v: VarId,
    out: &mut Vec<VarId>,
) {
    if base.is_terminal(v) {
        out.push(v);
        return;
    }
    let i = (v - base.terminal_count) as usize;
    if let Some(flat) = &inline[i] {
        out.extend_from_slice(flat);
        return;
    }
    // 呼び出し元が span <= inline_threshold のときにしか呼ばないため、
    // 子の span も inline_threshold 以下であり、id の昇順で処理しているので
    // 既に計算済みのはず。
    let (l, r) = base.children(v);
    flatten_into(base, inline, l, out);
    flatten_into(base, inline, r, out);
}

impl Slp for CombinedSlp {
    fn root(&self) -> VarId { self.base.root() }
    fn terminal_count(&self) -> VarId { self.base.terminal_count() }
    fn children(&self, v: VarId) -> (VarId, VarId) { self.base.children(v) }
    fn span_len(&self, v: VarId) -> usize { self.base.span_len(v) }

    fn doc_at(&self, k: usize) -> usize {
        let mut v = self.root();
        let mut k = k;
        loop {
            if self.is_terminal(v) {
                return v as usize;
            }
            if let Some(flat) = self.inline_of(v) {
                return flat[k] as usize;
            }
            let (l, r) = self.children(v);
            let ls = self.span_len(l);
            if k < ls {
                v = l;
            } else {
                k -= ls;
                v = r;
            }
        }
    }

    fn expand_all(&self, v: VarId, report: &mut dyn FnMut(usize)) {
        if let Some(flat) = self.inline_of(v) {
            for &t in flat {
                report(t as usize);
            }
            return;
        }
        let mut stack = vec![v];
        while let Some(v) = stack.pop() {
            if self.is_terminal(v) {
                report(v as usize);
                continue;
            }
            if let Some(flat) = self.inline_of(v) {
                for &t in flat {
                    report(t as usize);
                }
                continue;
            }
            let (l, r) = self.children(v);
            stack.push(r);
            stack.push(l);
        }
    }
}

impl CombinedSlp {
    fn inline_of(&self, v: VarId) -> Option<&[VarId]> {
        if self.is_terminal(v) {
            return None;
        }
        let i = (v - self.terminal_count()) as usize;
        self.inline[i].as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `da` と同じ内容を生成する、単純な左からの二分木 SLP を作る。
    /// 実運用では RePair が作るが、テストには十分。
    fn build_balanced(da: &[usize], d: usize) -> (VarId, Vec<(VarId, VarId)>) {
        let mut level: Vec<VarId> = da.iter().map(|&x| x as VarId).collect();
        let mut children = vec![];
        let mut next_id = d as VarId;
        loop {
            if level.len() == 1 {
                return (level[0], children);
            }
            let mut next_level = vec![];
            let mut i = 0;
            while i < level.len() {
                if i + 1 < level.len() {
                    children.push((level[i], level[i + 1]));
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

    fn sample_da() -> Vec<usize> {
        vec![0, 1, 1, 2, 0, 0, 1, 2, 2, 0, 1, 1, 1, 0, 2]
    }

    #[test]
    fn test_plain_doc_at_and_expand() {
        let da = sample_da();
        let (root, children) = build_balanced(&da, 3);
        let slp = PlainSlp::build(root, 3, &children);
        assert_eq!(slp.span_len(slp.root()), da.len());
        for (i, &x) in da.iter().enumerate() {
            assert_eq!(slp.doc_at(i), x);
        }
        for b in 0..da.len() {
            for e in b..=da.len() {
                let mut got = vec![];
                slp.expand_range(b, e, &mut |x| got.push(x));
                assert_eq!(got, da[b..e]);
            }
        }
    }

    #[test]
    fn test_light_slp_recomputes_span() {
        let da = sample_da();
        let (root, children) = build_balanced(&da, 3);
        let slp = LightSlp::from_children(root, 3, &children);
        for (i, &x) in da.iter().enumerate() {
            assert_eq!(slp.doc_at(i), x);
        }
    }

    #[test]
    fn test_combined_slp_matches_plain() {
        let da = sample_da();
        let (root, children) = build_balanced(&da, 3);
        let plain = PlainSlp::build(root, 3, &children);
        let combined = CombinedSlp::build(plain.clone(), 4);
        for (i, &x) in da.iter().enumerate() {
            assert_eq!(combined.doc_at(i), x);
        }
        for b in 0..da.len() {
            for e in b..=da.len() {
                let mut got = vec![];
                combined.expand_range(b, e, &mut |x| got.push(x));
                assert_eq!(got, da[b..e]);
            }
        }
    }
}
