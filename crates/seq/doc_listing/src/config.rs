//! 構築時に渡す、明示的なパラメータの集合。
//!
//! グローバルなフラグは持たない。コアライブラリも CLI も、この構造体を
//! 介してのみ構築パラメータを受け取る。

/// チャンク（サンプル節の文書集合）の格納方式。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChunkStoreKind {
    /// 連結 + 境界ビットベクトルによる素朴な格納。
    Plain,
    /// 連結列自体を二次的な SLP で圧縮して持つ。
    GrammarCompressed,
}

/// 文書列挙クエリの実行方式。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListingKind {
    /// サンプル木の被覆 + フリンジ展開 + 集合併合。
    Cover,
    /// Sadakane の C 配列に対する RMQ。
    RmqSadakane,
    /// interleaved-LCP の run head に対する RMQ。
    RmqIlcp,
}

/// SLP の格納方式。`spanLength` を持つかどうか、短いスパンをインライン化
/// するかどうかを切り替える。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlpKind {
    /// spanLength を持つ素朴な SLP。
    Plain,
    /// spanLength を持たず、読み込み時に再計算する（永続化サイズを削る）。
    Light,
    /// スパンの短い非終端の展開をインライン化した SLP。
    Combined { inline_threshold: usize },
}

/// 文書列挙インデックスの構築パラメータ。
#[derive(Clone, Debug)]
pub struct Config {
    /// 文書の区切りを表すバイト値。
    pub delim: u8,
    /// サンプル葉のスパンの上限（`BS`）。
    pub block_size: usize,
    /// これ以下の文書集合サイズならスパンに関わらず打ち切る閾値（`SF` 相当）。
    pub chunk_threshold: usize,
    /// チャンクの格納方式。
    pub chunk_store: ChunkStoreKind,
    /// SLP の格納方式。
    pub slp: SlpKind,
    /// クエリの実行方式。
    pub listing: ListingKind,
}

impl Default for Config {
    /// ブロックサイズ 256、チャンク閾値 4、素朴なチャンク格納、被覆方式の
    /// デフォルト。
    fn default() -> Self {
        Self {
            delim: b'$',
            block_size: 256,
            chunk_threshold: 4,
            chunk_store: ChunkStoreKind::Plain,
            slp: SlpKind::Plain,
            listing: ListingKind::Cover,
        }
    }
}

impl Config {
    /// `block_size >= 1` であることを確認する。
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.block_size == 0 {
            return Err(crate::error::Error::Config(
                "block_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
