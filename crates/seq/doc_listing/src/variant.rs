//! 構築時に選ばれる SLP / ChunkStore の実装を、インスタンスごとに単相化する
//! ための、タグ付き共用体。
//!
//! テンプレート多相の代わりに、小さなバリアントの集合として表現する
//! （各クエリのホットパスは実際に選ばれたバリアントに単相化される）。

use chunk_store::ChunkStore;
use slp::{CombinedSlp, LightSlp, PlainSlp, Slp, VarId};

use crate::config::{ChunkStoreKind, SlpKind};

/// 構築時に選ばれた SLP の実装。
#[derive(Clone, Debug)]
pub enum SlpVariant {
    Plain(PlainSlp),
    Light(LightSlp),
    Combined(CombinedSlp),
}

impl SlpVariant {
    pub fn build(kind: SlpKind, base: PlainSlp) -> Self {
        match kind {
            SlpKind::Plain => Self::Plain(base),
            SlpKind::Light => {
                let (root, terminal_count, left, right, _span) = base.into_raw_parts();
                Self::Light(LightSlp::from_raw_parts_without_span(
                    root,
                    terminal_count,
                    left,
                    right,
                ))
            }
            SlpKind::Combined { inline_threshold } => {
                Self::Combined(CombinedSlp::build(base, inline_threshold))
            }
        }
    }

    /// 格納に使う `PlainSlp` 部分への参照。`Light`/`Combined` も内部的には
    /// `PlainSlp` の `(left, right)` を持つため、`.slp` ファイルへの書き出し
    /// はこの素朴な形に対して行う。
    pub fn as_plain(&self) -> Option<&PlainSlp> {
        match self {
            Self::Plain(p) => Some(p),
            _ => None,
        }
    }
}

impl Slp for SlpVariant {
    fn root(&self) -> VarId {
        match self {
            Self::Plain(s) => s.root(),
            Self::Light(s) => s.root(),
            Self::Combined(s) => s.root(),
        }
    }

    fn terminal_count(&self) -> VarId {
        match self {
            Self::Plain(s) => s.terminal_count(),
            Self::Light(s) => s.terminal_count(),
            Self::Combined(s) => s.terminal_count(),
        }
    }

    fn children(&self, v: VarId) -> (VarId, VarId) {
        match self {
            Self::Plain(s) => s.children(v),
            Self::Light(s) => s.children(v),
            Self::Combined(s) => s.children(v),
        }
    }

    fn span_len(&self, v: VarId) -> usize {
        match self {
            Self::Plain(s) => s.span_len(v),
            Self::Light(s) => s.span_len(v),
            Self::Combined(s) => s.span_len(v),
        }
    }

    fn doc_at(&self, k: usize) -> usize {
        match self {
            Self::Plain(s) => s.doc_at(k),
            Self::Light(s) => s.doc_at(k),
            Self::Combined(s) => s.doc_at(k),
        }
    }

    fn expand_range(&self, b: usize, e: usize, report: &mut dyn FnMut(usize)) {
        match self {
            Self::Plain(s) => s.expand_range(b, e, report),
            Self::Light(s) => s.expand_range(b, e, report),
            Self::Combined(s) => s.expand_range(b, e, report),
        }
    }

    fn expand_all(&self, v: VarId, report: &mut dyn FnMut(usize)) {
        match self {
            Self::Plain(s) => s.expand_all(v, report),
            Self::Light(s) => s.expand_all(v, report),
            Self::Combined(s) => s.expand_all(v, report),
        }
    }
}

/// 構築時に選ばれた ChunkStore の実装。
#[derive(Clone, Debug)]
pub enum ChunkStoreVariant {
    Plain(chunk_store::PlainChunkStore),
    Gc(chunk_store::GcChunkStore),
}

impl ChunkStoreVariant {
    pub fn build(kind: ChunkStoreKind, chunks: &[Vec<u32>], doc_count: u32) -> Self {
        match kind {
            ChunkStoreKind::Plain => Self::Plain(chunk_store::PlainChunkStore::build(chunks)),
            ChunkStoreKind::GrammarCompressed => {
                Self::Gc(chunk_store::GcChunkStore::build(chunks, doc_count))
            }
        }
    }
}

impl ChunkStore for ChunkStoreVariant {
    fn node_count(&self) -> usize {
        match self {
            Self::Plain(s) => s.node_count(),
            Self::Gc(s) => s.node_count(),
        }
    }

    fn chunk(&self, k: usize) -> Vec<u32> {
        match self {
            Self::Plain(s) => s.chunk(k),
            Self::Gc(s) => s.chunk(k),
        }
    }
}
