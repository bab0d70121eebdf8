//! サンプル木・チャンク格納・RMQ 列挙エンジンの `Encode`/`Decode`。
//!
//! RMQ 系列の前計算テーブル（[`n1_rmq::N1Rmq`] のブロック分割やスパーステーブル）
//! はそれ自体を永続化せず、元の配列（C 配列、run head の値）だけを書き出し、
//! 読み込み時に $O(n)$ で再構築する。前計算は構築時の定数倍でしかなく、
//! 素朴な配列よりも複雑な表現を個別に永続化する価値が薄いための単純化。

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chunk_store::ChunkStore as _;
use slp::Slp as _;

use crate::codec::{Decode, Encode};
use crate::error::Result;

impl Encode for sampled_tree::SampledTree {
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<BigEndian>(self.len() as u64)?;
        writer.write_u64::<BigEndian>(self.leaf_count() as u64)?;
        writer.write_u64::<BigEndian>(self.internal_count() as u64)?;
        self.leaf_starts_raw().encode_into(writer)?;
        self.first_child_mask_raw().encode_into(writer)?;
        self.parents_raw().encode_into(writer)?;
        self.next_leaf_raw().encode_into(writer)?;
        Ok(())
    }
}

impl Decode for sampled_tree::SampledTree {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let n = reader.read_u64::<BigEndian>()? as usize;
        let leaf_count = reader.read_u64::<BigEndian>()? as usize;
        let internal_count = reader.read_u64::<BigEndian>()? as usize;
        let leaf_starts = sparse_bit_vector::SparseBitVector::decode_from(reader)?;
        let first_child_mask = rs_dict::RsDict::decode_from(reader)?;
        let parents = packed_int_vector::PackedIntVector::decode_from(reader)?;
        let next_leaf = packed_int_vector::PackedIntVector::decode_from(reader)?;
        Ok(sampled_tree::SampledTree::from_raw_parts(
            n,
            leaf_count,
            internal_count,
            leaf_starts,
            first_child_mask,
            parents,
            next_leaf,
        ))
    }
}

impl Encode for chunk_store::PlainChunkStore {
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<BigEndian>(self.node_count() as u64)?;
        writer.write_u64::<BigEndian>(self.total_len() as u64)?;
        self.offsets_raw().encode_into(writer)?;
        self.values_raw().encode_into(writer)?;
        Ok(())
    }
}

impl Decode for chunk_store::PlainChunkStore {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let node_count = reader.read_u64::<BigEndian>()? as usize;
        let total_len = reader.read_u64::<BigEndian>()? as usize;
        let offsets = sparse_bit_vector::SparseBitVector::decode_from(reader)?;
        let values = packed_int_vector::PackedIntVector::decode_from(reader)?;
        Ok(chunk_store::PlainChunkStore::from_raw_parts(node_count, total_len, offsets, values))
    }
}

impl Encode for chunk_store::GcChunkStore {
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<BigEndian>(self.node_count() as u64)?;
        writer.write_u64::<BigEndian>(self.total_len() as u64)?;
        self.offsets_raw().encode_into(writer)?;
        self.slp_raw().encode_into(writer)?;
        Ok(())
    }
}

impl Decode for chunk_store::GcChunkStore {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let node_count = reader.read_u64::<BigEndian>()? as usize;
        let total_len = reader.read_u64::<BigEndian>()? as usize;
        let offsets = sparse_bit_vector::SparseBitVector::decode_from(reader)?;
        let slp = slp::PlainSlp::decode_from(reader)?;
        Ok(chunk_store::GcChunkStore::from_raw_parts(node_count, total_len, offsets, slp))
    }
}

impl Encode for crate::variant::SlpVariant {
    /// タグ 1 バイトに続けて、各バリアントの表現を書く。`Plain` は
    /// `spanLength` も持つ完全な形、`Light` は `spanLength` を省いた形
    /// （読み込み時に再計算する）、`Combined` は元の `PlainSlp` と
    /// `inline_threshold`（インライン表は読み込み時に作り直す）。
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        use crate::variant::SlpVariant;
        match self {
            SlpVariant::Plain(s) => {
                writer.write_u8(0)?;
                s.encode_into(writer)
            }
            SlpVariant::Light(s) => {
                let inner = s.inner();
                writer.write_u8(1)?;
                writer.write_u32::<BigEndian>(inner.root())?;
                writer.write_u32::<BigEndian>(inner.terminal_count())?;
                inner.left_raw().encode_into(writer)?;
                inner.right_raw().encode_into(writer)
            }
            SlpVariant::Combined(s) => {
                writer.write_u8(2)?;
                writer.write_u64::<BigEndian>(s.inline_threshold() as u64)?;
                s.base().encode_into(writer)
            }
        }
    }
}

impl Decode for crate::variant::SlpVariant {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        use crate::variant::SlpVariant;
        let tag = reader.read_u8()?;
        match tag {
            0 => Ok(SlpVariant::Plain(slp::PlainSlp::decode_from(reader)?)),
            1 => {
                let root = reader.read_u32::<BigEndian>()?;
                let terminal_count = reader.read_u32::<BigEndian>()?;
                let left = packed_int_vector::PackedIntVector::decode_from(reader)?;
                let right = packed_int_vector::PackedIntVector::decode_from(reader)?;
                Ok(SlpVariant::Light(slp::LightSlp::from_raw_parts_without_span(
                    root,
                    terminal_count,
                    left,
                    right,
                )))
            }
            2 => {
                let inline_threshold = reader.read_u64::<BigEndian>()? as usize;
                let base = slp::PlainSlp::decode_from(reader)?;
                Ok(SlpVariant::Combined(slp::CombinedSlp::build(base, inline_threshold)))
            }
            other => Err(crate::error::Error::Format(format!("unknown SLP tag {other}"))),
        }
    }
}

impl Encode for crate::variant::ChunkStoreVariant {
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::Plain(s) => {
                writer.write_u8(0)?;
                s.encode_into(writer)
            }
            Self::Gc(s) => {
                writer.write_u8(1)?;
                s.encode_into(writer)
            }
        }
    }
}

impl Decode for crate::variant::ChunkStoreVariant {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let tag = reader.read_u8()?;
        match tag {
            0 => Ok(Self::Plain(chunk_store::PlainChunkStore::decode_from(reader)?)),
            1 => Ok(Self::Gc(chunk_store::GcChunkStore::decode_from(reader)?)),
            other => Err(crate::error::Error::Format(format!("unknown chunk store tag {other}"))),
        }
    }
}

fn write_u32_vec<W: Write>(writer: &mut W, values: &[u32]) -> Result<()> {
    writer.write_u64::<BigEndian>(values.len() as u64)?;
    for &v in values {
        writer.write_u32::<BigEndian>(v)?;
    }
    Ok(())
}

fn read_u32_vec<R: Read>(reader: &mut R) -> Result<Vec<u32>> {
    let len = reader.read_u64::<BigEndian>()? as usize;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        out.push(reader.read_u32::<BigEndian>()?);
    }
    Ok(out)
}

impl Encode for rmq_listing::RmqListingEngine {
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<BigEndian>(self.doc_count() as u64)?;
        write_u32_vec(writer, self.c_array())
    }
}

impl Decode for rmq_listing::RmqListingEngine {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let doc_count = reader.read_u64::<BigEndian>()? as usize;
        let c = read_u32_vec(reader)?;
        Ok(rmq_listing::RmqListingEngine::from_c_array(c, doc_count))
    }
}

impl Encode for rmq_listing::IlcpListingEngine {
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<BigEndian>(self.inner().doc_count() as u64)?;
        write_u32_vec(writer, self.inner().c_array())?;
        self.run_heads().encode_into(writer)?;
        write_u32_vec(writer, self.run_values())
    }
}

impl Decode for rmq_listing::IlcpListingEngine {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let doc_count = reader.read_u64::<BigEndian>()? as usize;
        let c = read_u32_vec(reader)?;
        let run_heads = sparse_bit_vector::SparseBitVector::decode_from(reader)?;
        let run_values = read_u32_vec(reader)?;
        Ok(rmq_listing::IlcpListingEngine::from_parts(c, doc_count, run_heads, run_values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slp::Slp as _;

    #[test]
    fn test_sampled_tree_roundtrip() {
        struct ToySlp {
            root: slp::VarId,
            terminal_count: slp::VarId,
            children: Vec<(slp::VarId, slp::VarId)>,
        }
        impl slp::Slp for ToySlp {
            fn root(&self) -> slp::VarId { self.root }
            fn terminal_count(&self) -> slp::VarId { self.terminal_count }
            fn children(&self, v: slp::VarId) -> (slp::VarId, slp::VarId) {
                self.children[(v - self.terminal_count) as usize]
            }
            fn span_len(&self, v: slp::VarId) -> usize {
                fn go(s: &ToySlp, v: slp::VarId) -> usize {
                    if v < s.terminal_count {
                        1
                    } else {
                        let (l, r) = s.children(v);
                        go(s, l) + go(s, r)
                    }
                }
                go(self, v)
            }
        }

        let da: Vec<slp::VarId> = vec![0, 1, 1, 2, 0, 0, 1, 2, 2, 0, 1, 1, 1, 0, 2];
        let base = slp::build_balanced(&da, 3);
        let (root, terminal_count, left, right, _span) = base.into_raw_parts();
        let nonterm_count = left.len();
        let children: Vec<_> =
            (0..nonterm_count).map(|i| (left.get(i) as slp::VarId, right.get(i) as slp::VarId)).collect();
        let toy = ToySlp { root, terminal_count, children };

        let sampled_tree::Built { tree, .. } = sampled_tree::SampledTree::build(&toy, 3, 1);
        let bytes = tree.encode_into_vec();
        let tree2 = sampled_tree::SampledTree::decode_from(&mut &bytes[..]).unwrap();
        assert_eq!(tree2.leaf_count(), tree.leaf_count());
        assert_eq!(tree2.internal_count(), tree.internal_count());
        for i in 0..tree.len() {
            assert_eq!(tree2.leaf(i), tree.leaf(i));
        }
    }

    #[test]
    fn test_rmq_listing_engine_roundtrip() {
        let da: Vec<u32> = vec![0, 1, 1, 2, 0, 0, 1, 2, 2, 0, 1, 1, 1, 0, 2];
        let engine = rmq_listing::RmqListingEngine::build(&da, 3);
        let bytes = engine.encode_into_vec();
        let engine2 = rmq_listing::RmqListingEngine::decode_from(&mut &bytes[..]).unwrap();
        for sp in 0..da.len() {
            for ep in sp..=da.len() {
                let mut a = engine.list_range(&da, sp, ep);
                let mut b = engine2.list_range(&da, sp, ep);
                a.sort_unstable();
                b.sort_unstable();
                assert_eq!(a, b);
            }
        }
    }
}
