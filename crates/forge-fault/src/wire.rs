//! Ordered-field transports.
//!
//! A carrier travels as a fixed sequence of string fields with no tag or
//! version header. Framing (one carrier per slot) is the caller's job.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rmpv::Value;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::CodecConfig;
use crate::error::{Error, Result};

/// Parcel length marker for an absent string.
pub const ABSENT_STRING_LEN: i32 = -1;

/// Write side of an ordered-field transport.
pub trait FieldSink {
    /// `None` writes the transport's "absent string" encoding.
    fn write_string(&mut self, value: Option<&str>) -> Result<()>;
}

/// Read side of an ordered-field transport.
pub trait FieldSource {
    fn read_string(&mut self) -> Result<Option<String>>;
}

impl<T: FieldSink + ?Sized> FieldSink for &mut T {
    fn write_string(&mut self, value: Option<&str>) -> Result<()> {
        (**self).write_string(value)
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &mut T {
    fn read_string(&mut self) -> Result<Option<String>> {
        (**self).read_string()
    }
}

/// Writes strings as an `i32` little-endian byte length followed by UTF-8 bytes.
#[derive(Debug)]
pub struct ParcelWriter<W> {
    inner: W,
    config: CodecConfig,
}

impl<W: Write> ParcelWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    pub fn with_config(inner: W, config: CodecConfig) -> Self {
        Self { inner, config }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> FieldSink for ParcelWriter<W> {
    fn write_string(&mut self, value: Option<&str>) -> Result<()> {
        let Some(value) = value else {
            self.inner.write_i32::<LittleEndian>(ABSENT_STRING_LEN)?;
            return Ok(());
        };
        check_write_len(value, &self.config)?;
        let len = i32::try_from(value.len()).map_err(|_| {
            Error::Encode(format!(
                "string of {} bytes exceeds parcel length field",
                value.len()
            ))
        })?;
        self.inner.write_i32::<LittleEndian>(len)?;
        self.inner.write_all(value.as_bytes())?;
        Ok(())
    }
}

/// Reads strings written by [`ParcelWriter`].
#[derive(Debug)]
pub struct ParcelReader<R> {
    inner: R,
    config: CodecConfig,
}

impl<R: Read> ParcelReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    pub fn with_config(inner: R, config: CodecConfig) -> Self {
        Self { inner, config }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> FieldSource for ParcelReader<R> {
    fn read_string(&mut self) -> Result<Option<String>> {
        let len = self
            .inner
            .read_i32::<LittleEndian>()
            .map_err(|err| map_truncated(err, "string length"))?;
        if len == ABSENT_STRING_LEN {
            return Ok(None);
        }
        if len < 0 {
            return Err(Error::invalid_frame(format!("negative string length {len}")));
        }

        let len = len as u32;
        if len > self.config.max_string_len {
            return Err(Error::invalid_frame(format!(
                "string length {} exceeds maximum {}",
                len, self.config.max_string_len
            )));
        }

        let mut buf = vec![0u8; len as usize];
        self.inner
            .read_exact(&mut buf)
            .map_err(|err| map_truncated(err, "string payload"))?;
        String::from_utf8(buf)
            .map(Some)
            .map_err(|err| Error::invalid_frame(format!("string is not valid utf-8: {err}")))
    }
}

/// Writers enforce the same cap as readers so oversized fields fail at the producer.
fn check_write_len(value: &str, config: &CodecConfig) -> Result<()> {
    if value.len() > config.max_string_len as usize {
        return Err(Error::Encode(format!(
            "string length {} exceeds maximum {}",
            value.len(),
            config.max_string_len
        )));
    }
    Ok(())
}

fn map_truncated(err: std::io::Error, what: &str) -> Error {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::invalid_frame(format!("{what} truncated"))
    } else {
        Error::Io(err)
    }
}

/// In-memory parcel: an owned byte buffer with a read cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parcel {
    data: Vec<u8>,
    pos: usize,
    config: CodecConfig,
}

impl Parcel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::from_bytes_with_config(data, CodecConfig::default())
    }

    pub fn from_bytes_with_config(data: impl Into<Vec<u8>>, config: CodecConfig) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            config,
        }
    }

    pub fn config(&self) -> CodecConfig {
        self.config
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Bytes not yet consumed by reads.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
    }
}

impl FieldSink for Parcel {
    fn write_string(&mut self, value: Option<&str>) -> Result<()> {
        ParcelWriter::with_config(&mut self.data, self.config).write_string(value)
    }
}

impl FieldSource for Parcel {
    fn read_string(&mut self) -> Result<Option<String>> {
        let unread = self.data.get(self.pos..).unwrap_or_default();
        let mut cursor = Cursor::new(unread);
        let value = ParcelReader::with_config(&mut cursor, self.config).read_string();
        self.pos += cursor.position() as usize;
        value
    }
}

/// Writes each field as a bare msgpack `str` (or `nil` when absent).
#[derive(Debug)]
pub struct MsgpackSink<W> {
    inner: W,
    config: CodecConfig,
}

impl<W: Write> MsgpackSink<W> {
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    pub fn with_config(inner: W, config: CodecConfig) -> Self {
        Self { inner, config }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> FieldSink for MsgpackSink<W> {
    fn write_string(&mut self, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => {
                check_write_len(value, &self.config)?;
                rmp::encode::write_str(&mut self.inner, value)
                    .map_err(|err| Error::Encode(format!("msgpack encode error: {err}")))
            }
            None => rmp::encode::write_nil(&mut self.inner).map_err(Error::Io),
        }
    }
}

/// Reads fields written by [`MsgpackSink`].
#[derive(Debug)]
pub struct MsgpackSource<R> {
    inner: R,
    config: CodecConfig,
}

impl<R: Read> MsgpackSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    pub fn with_config(inner: R, config: CodecConfig) -> Self {
        Self { inner, config }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> FieldSource for MsgpackSource<R> {
    fn read_string(&mut self) -> Result<Option<String>> {
        let value = rmpv::decode::read_value(&mut self.inner).map_err(map_msgpack_read)?;
        let text = match value {
            Value::Nil => return Ok(None),
            Value::String(text) => text
                .into_str()
                .ok_or_else(|| Error::invalid_frame("msgpack string is not valid utf-8"))?,
            other => {
                return Err(Error::invalid_frame(format!(
                    "expected msgpack string field, found {other}"
                )));
            }
        };
        if text.len() > self.config.max_string_len as usize {
            return Err(Error::invalid_frame(format!(
                "string length {} exceeds maximum {}",
                text.len(),
                self.config.max_string_len
            )));
        }
        Ok(Some(text))
    }
}

/// Truncation is an invalid frame in both codecs; other failures are decode errors.
fn map_msgpack_read(err: rmpv::decode::Error) -> Error {
    match err {
        rmpv::decode::Error::InvalidMarkerRead(err) => map_truncated(err, "msgpack marker"),
        rmpv::decode::Error::InvalidDataRead(err) => map_truncated(err, "msgpack field payload"),
        other => Error::Decode(format!("msgpack decode error: {other}")),
    }
}

pub fn encode_msgpack<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    rmp_serde::to_vec(value).map_err(|err| Error::Encode(format!("msgpack encode error: {err}")))
}

pub fn decode_msgpack_into<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    rmp_serde::from_slice(data).map_err(|err| Error::Decode(format!("msgpack decode error: {err}")))
}
