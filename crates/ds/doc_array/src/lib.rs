//! 文書配列 (document array)。

use packed_int_vector::PackedIntVector;

/// 文書配列。
///
/// 接尾辞配列の各順位 `i` に対して、`SA[i]` がどの文書に属すかを格納する。
///
/// `DA[i] = docOfPosition(SA[i])`。長さ `n`、各要素の幅 `ceil(log2(d))` bits
/// の [`PackedIntVector`] として持つ。
#[derive(Clone, Debug)]
pub struct DocArray {
    buf: PackedIntVector,
    doc_count: usize,
}

impl DocArray {
    /// `sa[i]` を `doc_of_pos(sa[i])` へ写して構築する。
    ///
    /// `doc_count` はありうる文書 id の個数（`0..doc_count` に収まる）。
    ///
    /// # Examples
    /// ```
    /// use doc_array::DocArray;
    ///
    /// let sa = vec![3, 0, 2, 1];
    /// let doc_of_pos = |p: usize| [1, 0, 0, 0][p];
    /// let da = DocArray::build(&sa, doc_of_pos, 2);
    /// assert_eq!(da.get(0), 0);
    /// assert_eq!(da.get(1), 1);
    /// assert_eq!(da.len(), 4);
    /// ```
    pub fn build(
        sa: &[usize],
        doc_of_pos: impl Fn(usize) -> usize,
        doc_count: usize,
    ) -> Self {
        let width = PackedIntVector::width_for_max(doc_count.saturating_sub(1) as u64);
        let mut buf = PackedIntVector::new(sa.len(), width);
        for (i, &p) in sa.iter().enumerate() {
            let doc = doc_of_pos(p);
            debug_assert!(doc < doc_count, "doc id {} out of range {}", doc, doc_count);
            buf.set(i, doc as u64);
        }
        Self { buf, doc_count }
    }

    /// 既に計算済みの値の列からそのまま構築する。
    pub fn from_values(values: &[usize], doc_count: usize) -> Self {
        let width = PackedIntVector::width_for_max(doc_count.saturating_sub(1) as u64);
        let raw: Vec<u64> = values.iter().map(|&v| v as u64).collect();
        Self { buf: PackedIntVector::from_values_with_width(&raw, width), doc_count }
    }

    pub fn len(&self) -> usize { self.buf.len() }
    pub fn is_empty(&self) -> bool { self.buf.is_empty() }
    pub fn doc_count(&self) -> usize { self.doc_count }

    /// `DA[i]` を返す。
    pub fn get(&self, i: usize) -> usize { self.buf.get(i) as usize }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.buf.iter().map(|v| v as usize)
    }

    /// 内部の [`PackedIntVector`] への参照。永続化に用いる。
    pub fn raw(&self) -> &PackedIntVector { &self.buf }

    /// 内部の [`PackedIntVector`] を取り出す。永続化に用いる。
    pub fn into_inner(self) -> (PackedIntVector, usize) { (self.buf, self.doc_count) }

    pub fn from_inner(buf: PackedIntVector, doc_count: usize) -> Self {
        Self { buf, doc_count }
    }
}

#[test]
fn test_build() {
    // T = "TATA$LATA$AAAA$", documents 0:"TATA" 1:"LATA" 2:"AAAA"
    let doc_border: Vec<bool> =
        "TATA$LATA$AAAA$".chars().map(|c| c == '$').collect();
    let rank1 = |i: usize| doc_border[..i].iter().filter(|&&b| b).count();
    let n = doc_border.len();
    let mut sa: Vec<usize> = (0..n).collect();
    let text: Vec<u8> = "TATA$LATA$AAAA$".bytes().collect();
    sa.sort_by_key(|&i| text[i..].to_vec());

    let da = DocArray::build(&sa, rank1, 3);
    assert_eq!(da.len(), n);
    for (i, &p) in sa.iter().enumerate() {
        assert_eq!(da.get(i), rank1(p));
    }
}
