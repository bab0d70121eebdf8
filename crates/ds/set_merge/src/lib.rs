//! 昇順かつ重複のない `u32` の列同士を併合する。
//!
//! [`SampledTree`](../sampled_tree/struct.SampledTree.html) のチャンクや
//! フリンジの文書集合をまとめ上げる、文書列挙の最終段で使う素朴な道具。

/// 2 つの昇順・重複なし列を併合し、新たな昇順・重複なし列を返す。
pub fn union_sorted(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// `sets` を二分木状にまとめ上げる。
///
/// スタックの一番上と併合対象の大きさが等しい間、繰り返し併合する
/// （マージソートの下から積み上げる併合と同じ発想）。これにより、
/// 全体の作業量は $O(N\log m)$ に抑えられる（$N$ は全集合の要素数の総和、
/// $m$ は入力集合の個数）。
///
/// `doc_count` に達した時点で即座に打ち切る（early-exit）。これ以上
/// 併合しても増えようがないため。
pub fn merge_binary_tree<I>(sets: I, doc_count: usize) -> Vec<u32>
where
    I: IntoIterator<Item = Vec<u32>>,
{
    let mut stack: Vec<Vec<u32>> = Vec::new();
    for s in sets {
        let mut cur = s;
        if cur.len() >= doc_count {
            return cur;
        }
        while let Some(top) = stack.last() {
            if top.len() == cur.len() {
                let top = stack.pop().unwrap();
                cur = union_sorted(&top, &cur);
                if cur.len() >= doc_count {
                    return cur;
                }
            } else {
                break;
            }
        }
        stack.push(cur);
    }
    while stack.len() > 1 {
        let b = stack.pop().unwrap();
        let a = stack.pop().unwrap();
        let merged = union_sorted(&a, &b);
        if merged.len() >= doc_count {
            return merged;
        }
        stack.push(merged);
    }
    stack.pop().unwrap_or_default()
}

/// [`merge_binary_tree`] の結果に、初期集合 `base`（フリンジの文書）を併合する。
pub fn merge_with_base(base: Vec<u32>, nodes: Vec<u32>) -> Vec<u32> {
    union_sorted(&base, &nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_sorted() {
        assert_eq!(union_sorted(&[1, 2, 4], &[2, 3, 4, 5]), vec![1, 2, 3, 4, 5]);
        assert_eq!(union_sorted(&[], &[1, 2]), vec![1, 2]);
        assert_eq!(union_sorted(&[1, 2], &[]), vec![1, 2]);
        assert_eq!(union_sorted(&[], &[]), Vec::<u32>::new());
    }

    #[test]
    fn test_merge_binary_tree() {
        let sets = vec![vec![0], vec![1], vec![0, 2], vec![3], vec![1, 3, 4]];
        let merged = merge_binary_tree(sets, 10);
        assert_eq!(merged, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_merge_binary_tree_early_exit() {
        let sets = vec![vec![0, 1], vec![2], vec![3], vec![4]];
        let merged = merge_binary_tree(sets, 3);
        assert!(merged.len() >= 3);
        for x in &merged {
            assert!(*x < 5);
        }
    }

    #[test]
    fn test_merge_with_base() {
        let nodes = merge_binary_tree(vec![vec![1, 2], vec![3]], 10);
        assert_eq!(merge_with_base(vec![0, 2], nodes), vec![0, 1, 2, 3]);
    }
}
