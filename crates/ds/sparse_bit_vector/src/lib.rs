//! 疎なビット列 (Elias--Fano 表現)。

use packed_int_vector::PackedIntVector;

/// 疎なビット列。Elias--Fano 表現による rank/select 辞書。
///
/// 全体の長さ（宇宙サイズ） `u` に対して、立っているビットの個数が `m` であるとき、
/// `rs_dict::RsDict` を愚直にかけるより省空間になる（$m \\ll u$ のとき）。
///
/// # Idea
/// 集合を昇順に並べた値 `v_0 < v_1 < \\dots < v_{m-1}` に対して、各値を上位
/// `u/l` ビット（bucket 番号）と下位 `l` ビットに分割する。下位ビットは
/// [`PackedIntVector`] にそのまま詰める。上位ビットは、`v_i` の bucket 番号を
/// `h_i` として、長さ `m + 2^{u-l}` のビット列の位置 `h_i + i` を立てることで
/// 単項符号的に表現する（`rs_dict::RsDict` で rank/select を提供する）。
///
/// `l` は `u/m` 程度に選ぶことで、全体が $O(m\\log(u/m))$ bits に収まる。
///
/// # Complexity
/// 構築は $O(m)$ time。`rank`/`contains` は $O(1)$ amortized
/// （bucket 内の走査は平均定数回）。`get` は $O(1)$。
#[derive(Clone, Debug)]
pub struct SparseBitVector {
    universe: usize,
    len: usize,
    low_width: u32,
    low: PackedIntVector,
    high: rs_dict::RsDict,
}

impl SparseBitVector {
    /// 昇順かつ重複のない値の列 `values`（すべて `< universe`）から構築する。
    ///
    /// # Examples
    /// ```
    /// use sparse_bit_vector::SparseBitVector;
    ///
    /// let sbv = SparseBitVector::from_sorted(&[1, 4, 5, 9], 16);
    /// assert_eq!(sbv.len(), 4);
    /// assert_eq!(sbv.get(2), 5);
    /// assert!(sbv.contains(5));
    /// assert!(!sbv.contains(6));
    /// assert_eq!(sbv.rank(5), 1);
    /// assert_eq!(sbv.rank(6), 3);
    /// ```
    pub fn from_sorted(values: &[usize], universe: usize) -> Self {
        let m = values.len();
        for w in values.windows(2) {
            assert!(w[0] < w[1], "values must be sorted and distinct");
        }
        if let Some(&last) = values.last() {
            assert!(last < universe, "value {} out of universe {}", last, universe);
        }

        let low_width = if m == 0 || universe <= m {
            0
        } else {
            (usize::BITS - (universe / m).leading_zeros() - 1).min(63)
        };
        let num_buckets = (universe >> low_width) + 1;

        let mut low = PackedIntVector::new(m, low_width);
        let mut high_bits = vec![false; m + num_buckets];
        let mask = if low_width == 0 { 0 } else { (1_usize << low_width) - 1 };
        for (i, &v) in values.iter().enumerate() {
            let hi = v >> low_width;
            low.set(i, (v & mask) as u64);
            high_bits[hi + i] = true;
        }

        Self { universe, len: m, low_width, low, high: high_bits.into() }
    }

    /// 空の集合を構築する。
    pub fn empty(universe: usize) -> Self { Self::from_sorted(&[], universe) }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn universe(&self) -> usize { self.universe }

    /// `i` 番目（昇順で 0-indexed）に小さい値を返す。
    ///
    /// # Requirements
    /// `i < self.len()`。
    pub fn get(&self, i: usize) -> usize {
        use find_nth::FindNth;
        assert!(i < self.len, "index out of bounds");
        let pos = self.high.find_nth(.., 1, i).expect("inconsistent structure");
        let hi = pos - i;
        let lo = self.low.get(i) as usize;
        (hi << self.low_width) | lo
    }

    /// `[0, pos)` に含まれる値の個数を返す。
    ///
    /// # Examples
    /// ```
    /// use sparse_bit_vector::SparseBitVector;
    ///
    /// let sbv = SparseBitVector::from_sorted(&[2, 3, 7], 10);
    /// assert_eq!(sbv.rank(0), 0);
    /// assert_eq!(sbv.rank(3), 1);
    /// assert_eq!(sbv.rank(10), 3);
    /// ```
    pub fn rank(&self, pos: usize) -> usize {
        use count::Count;
        use find_nth::FindNth;
        if self.len == 0 {
            return 0;
        }
        let pos = pos.min(self.universe);
        let hi = pos >> self.low_width;
        let lo = pos & if self.low_width == 0 { 0 } else { (1 << self.low_width) - 1 };

        let before = if hi == 0 {
            0
        } else {
            match self.high.find_nth(.., 0, hi - 1) {
                Some(z) => z - (hi - 1),
                None => self.len,
            }
        };
        if before >= self.len {
            return before;
        }
        let end = match self.high.find_nth(.., 0, hi) {
            Some(z) => z - hi,
            None => self.len,
        };
        let mut extra = 0;
        for j in before..end {
            if (self.low.get(j) as usize) < lo {
                extra += 1;
            } else {
                break;
            }
        }
        before + extra
    }

    /// `pos` が集合に含まれるかを返す。
    pub fn contains(&self, pos: usize) -> bool {
        let r = self.rank(pos);
        r < self.len && self.get(r) == pos
    }

    /// `pos` 以下の最大の値を返す（存在しなければ `None`）。
    pub fn predecessor(&self, pos: usize) -> Option<usize> {
        let r = self.rank(pos + 1);
        if r == 0 {
            None
        } else {
            Some(self.get(r - 1))
        }
    }

    /// `pos` 以上の最小の値を返す（存在しなければ `None`）。
    pub fn successor(&self, pos: usize) -> Option<usize> {
        let r = self.rank(pos);
        if r >= self.len {
            None
        } else {
            Some(self.get(r))
        }
    }

    /// 値を昇順に返すイテレータ。
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    /// 内部表現を取り出す。永続化に用いる。
    pub fn into_raw_parts(self) -> (usize, usize, u32, PackedIntVector, rs_dict::RsDict) {
        (self.universe, self.len, self.low_width, self.low, self.high)
    }

    /// [`into_raw_parts`](Self::into_raw_parts) の逆。
    pub fn from_raw_parts(
        universe: usize,
        len: usize,
        low_width: u32,
        low: PackedIntVector,
        high: rs_dict::RsDict,
    ) -> Self {
        Self { universe, len, low_width, low, high }
    }
}

#[test]
fn test_roundtrip() {
    let values = vec![0, 1, 2, 5, 8, 13, 21, 34, 55, 100, 999];
    let sbv = SparseBitVector::from_sorted(&values, 1000);
    for (i, &v) in values.iter().enumerate() {
        assert_eq!(sbv.get(i), v);
    }
    assert_eq!(sbv.len(), values.len());
}

#[test]
fn test_rank_contains() {
    let values: Vec<usize> = (0..500).map(|i| i * 7).collect();
    let universe = 3501;
    let sbv = SparseBitVector::from_sorted(&values, universe);
    for pos in 0..universe {
        let expect = values.iter().filter(|&&v| v < pos).count();
        assert_eq!(sbv.rank(pos), expect, "pos = {}", pos);
        assert_eq!(sbv.contains(pos), values.contains(&pos), "pos = {}", pos);
    }
}

#[test]
fn test_predecessor_successor() {
    let values = vec![3, 7, 7 + 4, 20];
    let sbv = SparseBitVector::from_sorted(&values, 50);
    assert_eq!(sbv.predecessor(0), None);
    assert_eq!(sbv.predecessor(3), Some(3));
    assert_eq!(sbv.predecessor(5), Some(3));
    assert_eq!(sbv.successor(4), Some(7));
    assert_eq!(sbv.successor(21), None);
}

#[test]
fn test_empty() {
    let sbv = SparseBitVector::empty(10);
    assert_eq!(sbv.len(), 0);
    assert_eq!(sbv.rank(5), 0);
    assert_eq!(sbv.predecessor(5), None);
    assert_eq!(sbv.successor(0), None);
}
