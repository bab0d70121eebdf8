//! 永続化フォーマットの共通部分: ヘッダ、チェックサム、基本型の符号化。
//!
//! マジックバイト + バージョン番号のヘッダと、ペイロードに対する xxh3-64
//! チェックサムを付けるという構成は、各アーティファクトのファイル形式
//! （`.da.int`、`.slp`、`.stree` など）で共通して使う。

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use slp::Slp as _;

use crate::error::{Error, Result};

pub const FORMAT_VERSION: u32 = 1;

/// バイト列として永続化できる値。
pub trait Encode {
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()>;

    fn encode_into_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // `Vec<u8>` への書き込みは失敗しない。
        self.encode_into(&mut buf).expect("encoding into a Vec cannot fail");
        buf
    }
}

/// バイト列から読み戻せる値。
pub trait Decode: Sized {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self>;
}

/// マジックバイト 4 バイトとフォーマットバージョンからなるヘッダを書く。
pub fn write_header<W: Write>(writer: &mut W, magic: &[u8; 4]) -> Result<()> {
    writer.write_all(magic)?;
    writer.write_u32::<BigEndian>(FORMAT_VERSION)?;
    Ok(())
}

/// ヘッダを読み、マジックバイトが一致することを確かめる。
pub fn read_header<R: Read>(reader: &mut R, magic: &[u8; 4]) -> Result<u32> {
    let mut got = [0u8; 4];
    reader.read_exact(&mut got)?;
    if &got != magic {
        return Err(Error::Format(format!(
            "bad magic bytes: expected {magic:?}, got {got:?}"
        )));
    }
    let version = reader.read_u32::<BigEndian>()?;
    if version > FORMAT_VERSION {
        return Err(Error::Format(format!(
            "unsupported format version {version} (this build supports up to {FORMAT_VERSION})"
        )));
    }
    Ok(version)
}

/// `payload` を、長さ・xxh3-64 チェックサム・本体の順で書く。
pub fn write_checksummed<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    writer.write_u64::<BigEndian>(payload.len() as u64)?;
    let checksum = xxhash_rust::xxh3::xxh3_64(payload);
    writer.write_u64::<BigEndian>(checksum)?;
    writer.write_all(payload)?;
    Ok(())
}

/// [`write_checksummed`] で書いたペイロードを読み、チェックサムを検証する。
pub fn read_checksummed<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let len = reader.read_u64::<BigEndian>()? as usize;
    let expected_checksum = reader.read_u64::<BigEndian>()?;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    let actual_checksum = xxhash_rust::xxh3::xxh3_64(&payload);
    if actual_checksum != expected_checksum {
        return Err(Error::Format(format!(
            "checksum mismatch: expected {expected_checksum:x}, got {actual_checksum:x}"
        )));
    }
    Ok(payload)
}

impl Encode for u32 {
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(*self)?;
        Ok(())
    }
}

impl Decode for u32 {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(reader.read_u32::<BigEndian>()?)
    }
}

impl Encode for u64 {
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<BigEndian>(*self)?;
        Ok(())
    }
}

impl Decode for u64 {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(reader.read_u64::<BigEndian>()?)
    }
}

impl Encode for packed_int_vector::PackedIntVector {
    /// `len`、`width`、ビット詰め済みのワード列をそのまま書く。
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<BigEndian>(self.len() as u64)?;
        writer.write_u32::<BigEndian>(self.width())?;
        let words = self.raw_words();
        writer.write_u64::<BigEndian>(words.len() as u64)?;
        for &w in words {
            writer.write_u64::<BigEndian>(w)?;
        }
        Ok(())
    }
}

impl Decode for packed_int_vector::PackedIntVector {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let len = reader.read_u64::<BigEndian>()? as usize;
        let width = reader.read_u32::<BigEndian>()?;
        let nwords = reader.read_u64::<BigEndian>()? as usize;
        let mut words = Vec::with_capacity(nwords);
        for _ in 0..nwords {
            words.push(reader.read_u64::<BigEndian>()?);
        }
        Ok(packed_int_vector::PackedIntVector::from_raw_parts(words, width, len))
    }
}

impl Encode for sparse_bit_vector::SparseBitVector {
    /// universe と、立っているビット位置の昇順列を書く。
    /// Elias-Fano の内部構造そのものは持たず、読み込み時に `from_sorted`
    /// で組み直す（単純さを優先した表現）。
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<BigEndian>(self.universe() as u64)?;
        writer.write_u64::<BigEndian>(self.len() as u64)?;
        for v in self.iter() {
            writer.write_u64::<BigEndian>(v as u64)?;
        }
        Ok(())
    }
}

impl Decode for sparse_bit_vector::SparseBitVector {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let universe = reader.read_u64::<BigEndian>()? as usize;
        let len = reader.read_u64::<BigEndian>()? as usize;
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(reader.read_u64::<BigEndian>()? as usize);
        }
        Ok(sparse_bit_vector::SparseBitVector::from_sorted(&values, universe.max(1)))
    }
}

impl Encode for rs_dict::RsDict {
    /// ビット長と、ビットを順に並べた列を書く（内部の rank/select
    /// 前計算テーブルは読み込み時に作り直す）。
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<BigEndian>(self.len() as u64)?;
        for b in self.iter() {
            writer.write_u8(b as u8)?;
        }
        Ok(())
    }
}

impl Decode for rs_dict::RsDict {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let len = reader.read_u64::<BigEndian>()? as usize;
        let mut bits = Vec::with_capacity(len);
        for _ in 0..len {
            bits.push(reader.read_u8()? != 0);
        }
        Ok(rs_dict::RsDict::from(bits))
    }
}

impl Encode for slp::PlainSlp {
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(self.root())?;
        writer.write_u32::<BigEndian>(self.terminal_count())?;
        self.left_raw().encode_into(writer)?;
        self.right_raw().encode_into(writer)?;
        self.span_raw().encode_into(writer)?;
        Ok(())
    }
}

impl Decode for slp::PlainSlp {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let root = reader.read_u32::<BigEndian>()?;
        let terminal_count = reader.read_u32::<BigEndian>()?;
        let left = packed_int_vector::PackedIntVector::decode_from(reader)?;
        let right = packed_int_vector::PackedIntVector::decode_from(reader)?;
        let span = packed_int_vector::PackedIntVector::decode_from(reader)?;
        Ok(slp::PlainSlp::from_raw_parts(root, terminal_count, left, right, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slp::Slp;

    #[test]
    fn test_packed_int_vector_roundtrip() {
        let v = packed_int_vector::PackedIntVector::from_values_with_width(&[1, 2, 3, 4, 5], 4);
        let bytes = v.encode_into_vec();
        let v2 = packed_int_vector::PackedIntVector::decode_from(&mut &bytes[..]).unwrap();
        assert_eq!(v2.len(), v.len());
        for i in 0..v.len() {
            assert_eq!(v2.get(i), v.get(i));
        }
    }

    #[test]
    fn test_sparse_bit_vector_roundtrip() {
        let sbv = sparse_bit_vector::SparseBitVector::from_sorted(&[1, 4, 5, 9], 16);
        let bytes = sbv.encode_into_vec();
        let sbv2 = sparse_bit_vector::SparseBitVector::decode_from(&mut &bytes[..]).unwrap();
        assert_eq!(sbv2.len(), sbv.len());
        assert_eq!(sbv2.universe(), sbv.universe());
        for i in 0..sbv.len() {
            assert_eq!(sbv2.get(i), sbv.get(i));
        }
    }

    #[test]
    fn test_rs_dict_roundtrip() {
        let bits = vec![true, false, false, true, true, false, true];
        let rs: rs_dict::RsDict = bits.clone().into();
        let bytes = rs.encode_into_vec();
        let rs2 = rs_dict::RsDict::decode_from(&mut &bytes[..]).unwrap();
        assert_eq!(rs2.len(), rs.len());
        for (i, &b) in bits.iter().enumerate() {
            assert_eq!(rs2.iter().nth(i), Some(b));
        }
    }

    #[test]
    fn test_plain_slp_roundtrip() {
        let da = [0u32, 1, 1, 2, 0, 0, 1, 2, 2];
        let slp = slp::build_balanced(&da, 3);
        let bytes = slp.encode_into_vec();
        let slp2 = slp::PlainSlp::decode_from(&mut &bytes[..]).unwrap();
        for (i, &x) in da.iter().enumerate() {
            assert_eq!(slp2.doc_at(i), x as usize);
        }
    }

    #[test]
    fn test_header_and_checksum_roundtrip() {
        let magic = *b"DLDA";
        let mut buf = Vec::new();
        write_header(&mut buf, &magic).unwrap();
        write_checksummed(&mut buf, b"hello world").unwrap();

        let mut cursor = &buf[..];
        let version = read_header(&mut cursor, &magic).unwrap();
        assert_eq!(version, FORMAT_VERSION);
        let payload = read_checksummed(&mut cursor).unwrap();
        assert_eq!(&payload, b"hello world");
    }

    #[test]
    fn test_bad_magic_is_format_error() {
        let mut buf = Vec::new();
        write_header(&mut buf, b"XXXX").unwrap();
        let mut cursor = &buf[..];
        let err = read_header(&mut cursor, b"DLDA").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
