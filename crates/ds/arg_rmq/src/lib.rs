//! 位置つき RMQ（argmin）。

use n1_rmq::N1Rmq;

/// 値と添字の組。値で比較し、同値なら添字の小さい方を優先する。
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
struct Indexed<T>(T, usize);

/// 配列上の区間最小値の「位置」を答える RMQ。
///
/// [`n1_rmq::N1Rmq`] は最小値そのものしか返さないため、各要素に元の添字を
/// 同梱した組に対して RMQ を張ることで argmin を得る。同値の要素が複数あるときは、
/// 添字が最小のものを返す。
///
/// # Complexity
/// 構築は $O(n)$ time、クエリは $O(1)$ time。
pub struct ArgRmq<T> {
    inner: N1Rmq<Indexed<T>>,
}

impl<T: Clone + Ord> From<Vec<T>> for ArgRmq<T> {
    fn from(base: Vec<T>) -> Self {
        let indexed: Vec<_> =
            base.into_iter().enumerate().map(|(i, x)| Indexed(x, i)).collect();
        Self { inner: indexed.into() }
    }
}

impl<T: Clone + Ord> ArgRmq<T> {
    /// 半開区間 `[l, r)` における最小値の添字を返す。
    ///
    /// # Requirements
    /// `l < r`。
    pub fn argmin(&self, l: usize, r: usize) -> usize { self.inner.min(l, r).1 }

    /// 半開区間 `[l, r)` における最小値そのものを返す。
    pub fn min_value(&self, l: usize, r: usize) -> &T { &self.inner.min(l, r).0 }
}

#[test]
fn test_argmin() {
    let a = vec![5, 3, 3, 8, 1, 1, 9, 2];
    let rmq: ArgRmq<_> = a.clone().into();
    for l in 0..a.len() {
        for r in l + 1..=a.len() {
            let idx = rmq.argmin(l, r);
            let min = *a[l..r].iter().min().unwrap();
            assert_eq!(a[idx], min);
            // leftmost tie-break
            let expect_idx = (l..r).find(|&i| a[i] == min).unwrap();
            assert_eq!(idx, expect_idx);
        }
    }
}
