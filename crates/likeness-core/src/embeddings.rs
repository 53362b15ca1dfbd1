//! Readers for precomputed embedding blobs.
//!
//! Two self-describing formats are understood, each optionally gzip
//! compressed (a trailing `.gz` on the file name):
//!
//! - NumPy `.npy` arrays of `float32` or `float64`, shape `(N, D)` or `(D,)`
//! - JSON `.json` documents holding an array of equal-length number arrays
//!
//! Both recover N and D from the file itself.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::DataLoadError;
use crate::model::VectorMatrix;

const NPY_MAGIC: &[u8] = b"\x93NUMPY";

/// On-disk encoding of an embedding blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingFormat {
    Npy,
    Json,
}

impl EmbeddingFormat {
    /// Detect the format from a file name, returning it together with whether
    /// the file is gzip compressed.
    pub fn detect(path: &Path) -> Option<(Self, bool)> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        let (inner, gzipped) = match name.strip_suffix(".gz") {
            Some(inner) => (inner.to_string(), true),
            None => (name, false),
        };

        let format = if inner.ends_with(".npy") {
            Self::Npy
        } else if inner.ends_with(".json") {
            Self::Json
        } else {
            return None;
        };
        Some((format, gzipped))
    }
}

/// Read an embedding matrix from `path`.
pub fn read_embeddings(path: &Path) -> Result<VectorMatrix, DataLoadError> {
    let file = File::open(path).map_err(|e| DataLoadError::from_io(path, e))?;
    let (format, gzipped) = EmbeddingFormat::detect(path).ok_or_else(|| {
        DataLoadError::malformed(
            path,
            "unrecognised embedding format (expected .npy or .json, optionally .gz)",
        )
    })?;

    let mut bytes = Vec::new();
    let read = if gzipped {
        GzDecoder::new(file).read_to_end(&mut bytes)
    } else {
        let mut file = file;
        file.read_to_end(&mut bytes)
    };
    read.map_err(|e| DataLoadError::from_io(path, e))?;

    log::debug!(
        "Read {} bytes of {:?} embeddings from {}",
        bytes.len(),
        format,
        path.display()
    );

    match format {
        EmbeddingFormat::Npy => parse_npy(&bytes, path),
        EmbeddingFormat::Json => parse_json(&bytes, path),
    }
}

/// Parse a JSON array of rows.
pub fn parse_json(bytes: &[u8], path: &Path) -> Result<VectorMatrix, DataLoadError> {
    let rows: Vec<Vec<f32>> = serde_json::from_slice(bytes)
        .map_err(|e| DataLoadError::malformed(path, format!("invalid JSON embeddings: {e}")))?;
    if rows.is_empty() {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    VectorMatrix::from_rows(rows)
}

// ---------------------------------------------------------------------------
// NumPy .npy
// ---------------------------------------------------------------------------

/// Element types accepted in an `.npy` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NpyDtype {
    F32,
    F64,
}

impl NpyDtype {
    /// Classify a numpy type string such as `<f4` or `>f8`.
    fn parse(descr: &str) -> Option<Self> {
        match descr.trim_start_matches(['<', '>', '=', '|']) {
            "f4" => Some(Self::F32),
            "f8" => Some(Self::F64),
            _ => None,
        }
    }
}

/// Parse an in-memory `.npy` file.
pub fn parse_npy(bytes: &[u8], path: &Path) -> Result<VectorMatrix, DataLoadError> {
    if !bytes.starts_with(NPY_MAGIC) {
        return Err(DataLoadError::malformed(path, "missing .npy magic string"));
    }
    let npy = npyz::NpyFile::new(bytes)
        .map_err(|e| DataLoadError::malformed(path, format!("invalid .npy header: {e}")))?;

    let descr = match npy.dtype() {
        npyz::DType::Plain(ty) => ty.to_string(),
        other => format!("{other:?}"),
    };
    let dtype = NpyDtype::parse(&descr)
        .ok_or_else(|| DataLoadError::malformed(path, format!("unsupported dtype {descr:?}")))?;

    let shape = npy
        .shape()
        .iter()
        .map(|&n| usize::try_from(n))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| DataLoadError::malformed(path, "array shape overflows"))?;
    let (rows, dims) = match shape.as_slice() {
        [dims] => (1, *dims),
        [rows, dims] => (*rows, *dims),
        other => {
            return Err(DataLoadError::malformed(
                path,
                format!("expected a 1-D or 2-D array, found shape {other:?}"),
            ))
        }
    };
    if rows == 0 {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    if dims == 0 {
        return Err(DataLoadError::ZeroDimension);
    }
    let fortran_order = matches!(npy.order(), npyz::Order::Fortran);

    let truncated = |e: std::io::Error| {
        DataLoadError::malformed(path, format!("payload does not fill shape {rows}x{dims}: {e}"))
    };
    #[allow(clippy::cast_possible_truncation)]
    let raw: Vec<f32> = match dtype {
        NpyDtype::F32 => npy.into_vec::<f32>().map_err(truncated)?,
        NpyDtype::F64 => npy
            .into_vec::<f64>()
            .map_err(truncated)?
            .into_iter()
            .map(|v| v as f32)
            .collect(),
    };

    let data = if fortran_order && rows > 1 {
        let mut data = vec![0.0; raw.len()];
        for (pos, value) in raw.into_iter().enumerate() {
            let (col, row) = (pos / rows, pos % rows);
            data[row * dims + col] = value;
        }
        data
    } else {
        raw
    };

    VectorMatrix::from_flat(rows, dims, data)
}
