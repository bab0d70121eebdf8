//! 文書の集合（デリミタで連結された単一のテキスト）と、その接尾辞配列。
//!
//! ここでのコレクションは、外部から与えられる FM-index/RLCSA
//! を模した黒箱として扱う。文書列挙の核である `gcda`/`rmq_listing`
//! クレートからは、`count`/`sa_at`/`doc_of_pos` の 3 操作のみを介して触れる。

use count::Count;
use suffix_array::SuffixArray;

/// デリミタで連結された文書の集合。
///
/// テキスト `T` の長さを `n`、デリミタ `delim` の出現回数（= 文書数）を `d` とする。
/// 文書 `i` はテキスト中で `i` 番目に出現する `delim` で終わる。
pub struct Collection {
    sa: SuffixArray<u8>,
    doc_border: rs_dict::RsDict,
    doc_count: usize,
    len: usize,
}

impl Collection {
    /// テキスト `text` から構築する。`delim` は文書の終端を表すバイト値で、`text`
    /// の各文書の末尾にちょうど一度ずつ出現しなければならない。
    ///
    /// # Examples
    /// ```
    /// use text_collection::Collection;
    ///
    /// let col = Collection::new(b"TATA$LATA$AAAA$".to_vec(), b'$');
    /// assert_eq!(col.len(), 15);
    /// assert_eq!(col.doc_count(), 3);
    ///
    /// let (sp, ep) = col.count(b"TA");
    /// let mut docs: Vec<_> =
    ///     (sp..ep).map(|i| col.doc_of_pos(col.sa_at(i))).collect();
    /// docs.sort_unstable();
    /// docs.dedup();
    /// assert_eq!(docs, vec![0, 1]);
    /// ```
    pub fn new(text: Vec<u8>, delim: u8) -> Self {
        let len = text.len();
        let border: Vec<bool> = text.iter().map(|&b| b == delim).collect();
        let doc_count = border.iter().filter(|&&b| b).count();
        assert!(doc_count > 0, "text must contain at least one delimiter");
        let doc_border: rs_dict::RsDict = border.into();

        // `suffix_array` 自身が末尾に辞書順最小の番兵を付加するため、
        // 得られる SA の長さは `len + 1` になる。番兵に対応する行は常に
        // 先頭（添字 0）に来るので、以降はそれを取り除いた `sa()[1..]` を使う。
        let sa = SuffixArray::from(text);

        Self { sa, doc_border, doc_count, len }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn doc_count(&self) -> usize { self.doc_count }

    /// `SA[i]`（テキスト上の開始位置）を返す。
    ///
    /// # Requirements
    /// `i < self.len()`。
    pub fn sa_at(&self, i: usize) -> usize { self.sa.sa()[i + 1] }

    /// テキスト上の位置 `p` が属する文書 id を返す。
    ///
    /// # Requirements
    /// `p < self.len()`。
    pub fn doc_of_pos(&self, p: usize) -> usize { self.doc_border.count(0..p, 1_u64) }

    /// パターン `pat` に対する backward-search の結果 `(sp, ep)` を返す。
    ///
    /// 接尾辞配列上の半開区間 `[sp, ep)` であり、`sp..ep` のすべての順位 `i` に
    /// ついて `text[sa_at(i)..]` が `pat` から始まる。
    pub fn count(&self, pat: &[u8]) -> (usize, usize) {
        if pat.is_empty() {
            return (0, self.len);
        }
        let range = self.sa.search_range(pat);
        (range.start.saturating_sub(1), range.end.saturating_sub(1))
    }

    /// 元のテキストへの参照を返す。
    pub fn text(&self) -> &[u8] { self.sa.text() }
}

#[test]
fn test_concrete_scenarios() {
    let col = Collection::new(b"TATA$LATA$AAAA$".to_vec(), b'$');
    let docs_for = |pat: &[u8]| {
        let (sp, ep) = col.count(pat);
        let mut docs: Vec<_> =
            (sp..ep).map(|i| col.doc_of_pos(col.sa_at(i))).collect();
        docs.sort_unstable();
        docs.dedup();
        docs
    };

    assert_eq!(docs_for(b"TA"), vec![0, 1]);
    assert_eq!(docs_for(b"A"), vec![0, 1, 2]);
    assert_eq!(docs_for(b"LT"), Vec::<usize>::new());
    assert_eq!(docs_for(b"AA"), vec![2]);
    assert_eq!(docs_for(b"TATA"), vec![0]);
    assert_eq!(docs_for(b"$"), vec![0, 1, 2]);
}

#[test]
fn test_single_doc() {
    let col = Collection::new(b"AAAA$".to_vec(), b'$');
    assert_eq!(col.doc_count(), 1);
    for p in 0..col.len() {
        assert_eq!(col.doc_of_pos(p), 0);
    }
}
