//! Asset fetching.
//!
//! Downloads the label vocabulary and the model-zoo archive (model plus
//! reference test data sets) so the classifier has everything it needs on
//! disk. Files already present are left alone.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;
use std::time::Duration;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::info;

use crate::error::{DownloadError, Result};
use crate::{LABELS_FILE, MODEL_FILE};

/// Where the label vocabulary is published.
pub const LABELS_URL: &str =
    "https://raw.githubusercontent.com/anishathalye/imagenet-simple-labels/master/imagenet-simple-labels.json";

/// Model-zoo archive holding `resnet50v2.onnx` and `test_data_set_{0,1,2}`.
pub const MODEL_ARCHIVE_URL: &str =
    "https://s3.amazonaws.com/onnx-model-zoo/resnet/resnet50v2/resnet50v2.tar.gz";

/// Local name the downloaded archive is saved under before unpacking.
const MODEL_ARCHIVE_FILE: &str = "resnet50v2.tar.gz";

/// Fetch every missing asset into the current directory.
///
/// The target photograph is deliberately not fetched; callers should place
/// their own JPEG at `images/dog.jpg`.
pub fn fetch_all() -> Result<()> {
    if Path::new(LABELS_FILE).exists() {
        info!(path = LABELS_FILE, "Labels already present, skipping");
    } else {
        download(LABELS_URL, Path::new(LABELS_FILE))?;
    }

    if Path::new(MODEL_FILE).exists() {
        info!(path = MODEL_FILE, "Model already present, skipping");
    } else {
        let archive = Path::new(MODEL_ARCHIVE_FILE);
        download(MODEL_ARCHIVE_URL, archive)?;
        unpack_archive(archive, Path::new("."))?;
        fs::remove_file(archive)?;
    }

    Ok(())
}

/// Download `url` to `dest`, verifying the copied byte count against the
/// server's `Content-Length` when one is announced.
pub fn download(url: &str, dest: &Path) -> Result<()> {
    info!(url, dest = %dest.display(), "Downloading");

    let response = ureq::get(url)
        .timeout(Duration::from_secs(180))
        .call()
        .map_err(|e| DownloadError::Request(Box::new(e)))?;

    let expected: Option<u64> = response
        .header("Content-Length")
        .and_then(|s| s.parse().ok());

    let mut reader = response.into_reader();
    let file = File::create(dest).map_err(DownloadError::Io)?;
    let mut writer = BufWriter::new(file);
    let copied = io::copy(&mut reader, &mut writer).map_err(DownloadError::Io)?;

    match expected {
        Some(expected) if expected != copied => {
            Err(DownloadError::CopyMismatch { expected, copied }.into())
        }
        _ => Ok(()),
    }
}

/// Unpack a gzip-compressed tarball into `dest`.
fn unpack_archive(archive: &Path, dest: &Path) -> Result<()> {
    info!(archive = %archive.display(), "Unpacking");
    let file = File::open(archive)?;
    Archive::new(GzDecoder::new(file)).unpack(dest)?;
    Ok(())
}
