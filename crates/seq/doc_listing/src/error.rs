//! エラー種別。すべての失敗は明示的な `Result` として現れ、例外的な制御フローは行わない。

/// 文書列挙インデックスの構築・読み込み・クエリで発生しうるエラー。
#[derive(Debug)]
pub enum Error {
    /// 必須の入力が欠けているか空である。
    Config(String),

    /// ファイルが存在しない、途中で切れている、読み書きできない。
    Io(std::io::Error),

    /// マジックバイト・バージョンの不一致、サイズフィールドの矛盾。
    Format(String),

    /// 読み込み時のクロス構造チェックに失敗した（例: `spanLength(root) != n`）。
    InvariantViolation(String),

    /// クエリ範囲が `[0, n]` の外にある。
    Range { sp: usize, ep: usize, n: usize },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
            Self::Range { sp, ep, n } => {
                write!(f, "range error: [{sp}, {ep}) is not within [0, {n}]")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self { Self::Io(value) }
}

pub type Result<T> = std::result::Result<T, Error>;
