//! 文書列挙インデックスの facade。
//!
//! 構築は `text_collection::Collection` → `DocArray` → SLP → `SampledTree`
//! → `ChunkStore` の順に行い、クエリは設定された方式（被覆、Sadakane の
//! RMQ、ILCP の RMQ のいずれか）でディスパッチする。

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chunk_store::ChunkStore as _;
use cover_engine::cover;
use doc_array::DocArray;
use text_collection::Collection;

use crate::codec::{read_checksummed, read_header, write_checksummed, write_header, Decode, Encode};
use crate::config::{Config, ListingKind};
use crate::error::{Error, Result};
use crate::variant::{ChunkStoreVariant, SlpVariant};

const MAGIC_DA: &[u8; 4] = b"DLda";
const MAGIC_SLP: &[u8; 4] = b"DLsl";
const MAGIC_STREE: &[u8; 4] = b"DLst";
const MAGIC_CHUNKS: &[u8; 4] = b"DLch";
const MAGIC_RMQ: &[u8; 4] = b"DLrq";
const MAGIC_ILCP: &[u8; 4] = b"DLil";

enum ListingEngine {
    Cover,
    RmqSadakane(rmq_listing::RmqListingEngine),
    RmqIlcp(rmq_listing::IlcpListingEngine),
}

/// 構築済みの文書列挙インデックス。
pub struct Index {
    collection: Collection,
    da: DocArray,
    // RMQ 系列のエンジンが `&[u32]` を要求するための、DA の平坦な複製。
    // `da` は永続化用の圧縮表現、こちらはクエリ時の直接参照専用。
    da_values: Vec<u32>,
    tree: sampled_tree::SampledTree,
    chunk_store: ChunkStoreVariant,
    slp: SlpVariant,
    listing: ListingEngine,
    config: Config,
}

impl Index {
    /// テキスト `text` から、`config` に従って一から構築する。
    pub fn build(text: Vec<u8>, config: Config) -> Result<Self> {
        config.validate()?;
        if text.is_empty() {
            return Err(Error::Config("text must be non-empty".to_string()));
        }

        let collection = Collection::new(text, config.delim);
        let n = collection.len();
        let doc_count = collection.doc_count();

        let sa: Vec<usize> = (0..n).map(|i| collection.sa_at(i)).collect();
        let da = DocArray::build(&sa, |p| collection.doc_of_pos(p), doc_count);
        let da_values: Vec<u32> = da.iter().map(|v| v as u32).collect();

        let base_slp = slp::build_balanced(&da_values, doc_count as slp::VarId);
        let slp_variant = SlpVariant::build(config.slp, base_slp);

        let sampled_tree::Built { tree, chunks } =
            sampled_tree::SampledTree::build(&slp_variant, config.block_size, config.chunk_threshold);

        let chunk_store =
            ChunkStoreVariant::build(config.chunk_store, &chunks, doc_count as u32);

        let listing = Self::build_listing(config.listing, collection.text(), &sa, &da_values, doc_count);

        Ok(Self { collection, da, da_values, tree, chunk_store, slp: slp_variant, listing, config })
    }

    fn build_listing(
        kind: ListingKind,
        text: &[u8],
        sa: &[usize],
        da_values: &[u32],
        doc_count: usize,
    ) -> ListingEngine {
        match kind {
            ListingKind::Cover => ListingEngine::Cover,
            ListingKind::RmqSadakane => {
                ListingEngine::RmqSadakane(rmq_listing::RmqListingEngine::build(da_values, doc_count))
            }
            ListingKind::RmqIlcp => ListingEngine::RmqIlcp(rmq_listing::IlcpListingEngine::build(
                text, sa, da_values, doc_count,
            )),
        }
    }

    pub fn doc_count(&self) -> usize { self.collection.doc_count() }
    pub fn len(&self) -> usize { self.collection.len() }
    pub fn is_empty(&self) -> bool { self.collection.is_empty() }

    /// パターン `pattern` を含む文書 id の集合を、昇順・重複なしで返す。
    pub fn list(&self, pattern: &[u8]) -> Vec<usize> {
        let (sp, ep) = self.collection.count(pattern);
        self.list_range(sp, ep)
    }

    /// 接尾辞配列上の範囲 `[sp, ep)` に現れる文書 id の集合を、昇順・重複なしで返す。
    ///
    /// `ep <= sp` または `ep > len()` のときは空を返す（エラーにしない:
    /// 呼び出し側が事前に検証できるようにするための設計判断）。
    pub fn list_range(&self, sp: usize, ep: usize) -> Vec<usize> {
        if ep <= sp || ep > self.len() {
            return vec![];
        }
        match &self.listing {
            ListingEngine::Cover => self.list_range_cover(sp, ep),
            ListingEngine::RmqSadakane(engine) => {
                let mut docs = engine.list_range(&self.da_values, sp, ep);
                docs.sort_unstable();
                docs.into_iter().map(|d| d as usize).collect()
            }
            ListingEngine::RmqIlcp(engine) => {
                let mut docs = engine.list_range(&self.da_values, sp, ep);
                docs.sort_unstable();
                docs.into_iter().map(|d| d as usize).collect()
            }
        }
    }

    fn list_range_cover(&self, sp: usize, ep: usize) -> Vec<usize> {
        let c = cover(&self.tree, sp, ep);

        let mut fringe: Vec<u32> = (sp..c.l).chain(c.r..ep).map(|i| self.da.get(i) as u32).collect();
        fringe.sort_unstable();
        fringe.dedup();

        let result = if c.nodes.is_empty() {
            fringe
        } else {
            let sets = c.nodes.iter().map(|&k| self.chunk_store.chunk(k));
            let merged = set_merge::merge_binary_tree(sets, self.doc_count());
            set_merge::merge_with_base(fringe, merged)
        };
        result.into_iter().map(|d| d as usize).collect()
    }

    /// 各アーティファクトを `dir/<basename>.*` へ書き出す。
    ///
    /// 書き出すのは DA・SLP（素朴形）・サンプル木・チャンク格納・選択された
    /// クエリ方式の RMQ 構造。外部の接尾辞配列そのものは対象外
    /// （黒箱として扱われる依存なので、本ライブラリの責務ではない）。
    pub fn save(&self, dir: &Path, basename: &str) -> Result<()> {
        write_artifact(dir, basename, "da.int", MAGIC_DA, self.da.raw())?;
        write_artifact(dir, basename, "slp", MAGIC_SLP, &self.slp)?;
        write_artifact(dir, basename, "stree", MAGIC_STREE, &self.tree)?;
        write_artifact(dir, basename, "chunks", MAGIC_CHUNKS, &self.chunk_store)?;

        match &self.listing {
            ListingEngine::Cover => {}
            ListingEngine::RmqSadakane(engine) => {
                write_artifact(dir, basename, "rmq", MAGIC_RMQ, engine)?;
            }
            ListingEngine::RmqIlcp(engine) => {
                write_artifact(dir, basename, "ilcp", MAGIC_ILCP, engine)?;
            }
        }
        Ok(())
    }

    /// 読み込んだ文書コレクション `collection` に対して、`dir/<basename>.*`
    /// から各アーティファクトを読み戻す。
    ///
    /// `collection` はアーティファクトの構築時に使ったテキストと一致して
    /// いなければならない（外部の接尾辞配列は本ライブラリの外で再構築される）。
    pub fn load(collection: Collection, dir: &Path, basename: &str, config: Config) -> Result<Self> {
        config.validate()?;
        let doc_count = collection.doc_count();

        let da_packed: packed_int_vector::PackedIntVector =
            read_artifact(dir, basename, "da.int", MAGIC_DA)?;
        let da = DocArray::from_inner(da_packed, doc_count);
        let da_values: Vec<u32> = da.iter().map(|v| v as u32).collect();

        let slp: SlpVariant = read_artifact(dir, basename, "slp", MAGIC_SLP)?;
        let tree: sampled_tree::SampledTree = read_artifact(dir, basename, "stree", MAGIC_STREE)?;
        let chunk_store: ChunkStoreVariant = read_artifact(dir, basename, "chunks", MAGIC_CHUNKS)?;

        let listing = match config.listing {
            ListingKind::Cover => ListingEngine::Cover,
            ListingKind::RmqSadakane => {
                let engine: rmq_listing::RmqListingEngine =
                    read_artifact(dir, basename, "rmq", MAGIC_RMQ)?;
                ListingEngine::RmqSadakane(engine)
            }
            ListingKind::RmqIlcp => {
                let engine: rmq_listing::IlcpListingEngine =
                    read_artifact(dir, basename, "ilcp", MAGIC_ILCP)?;
                ListingEngine::RmqIlcp(engine)
            }
        };

        if tree.len() != da.len() {
            return Err(Error::InvariantViolation(format!(
                "sampled tree span {} does not match DA length {}",
                tree.len(),
                da.len()
            )));
        }

        Ok(Self { collection, da, da_values, tree, chunk_store, slp, listing, config })
    }
}

fn write_artifact<T: Encode>(
    dir: &Path,
    basename: &str,
    ext: &str,
    magic: &[u8; 4],
    value: &T,
) -> Result<()> {
    let path = dir.join(format!("{basename}.{ext}"));
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    write_header(&mut writer, magic)?;
    let payload = value.encode_into_vec();
    write_checksummed(&mut writer, &payload)?;
    Ok(())
}

fn read_artifact<T: Decode>(dir: &Path, basename: &str, ext: &str, magic: &[u8; 4]) -> Result<T> {
    let path = dir.join(format!("{basename}.{ext}"));
    let file = File::open(&path)?;
    let mut reader = BufReader::new(file);
    read_header(&mut reader, magic)?;
    let payload = read_checksummed(&mut reader)?;
    T::decode_from(&mut &payload[..])
}
