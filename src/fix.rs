//! Planning of upright copies for the `fix` command.
//!
//! Every input maps to `<out_dir>/<file name>`. The planner refuses targets
//! that would overwrite their own source or a copy written earlier in the
//! same run, so a batch never destroys its inputs.

use crate::error::{Error, Result};
use crate::exif::{detect_orientation, OrientationResult};
use crate::image_loader::read_image_bytes;
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do with one input file.
#[derive(Debug)]
pub enum FixPlan {
    /// The bytes are not a JPEG; nothing is written.
    NotJpeg,
    Write {
        target: PathBuf,
        data: Vec<u8>,
        orientation: OrientationResult,
    },
}

pub struct FixPlanner {
    out_dir: PathBuf,
    taken: HashSet<PathBuf>,
}

impl FixPlanner {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: resolve(out_dir),
            taken: HashSet::new(),
        }
    }

    /// Read `source` and pick its target. A `Write` plan reserves the target
    /// for the rest of the run.
    pub fn plan(&mut self, source: &Path) -> Result<FixPlan> {
        let data = read_image_bytes(source)?;
        let orientation = detect_orientation(&data);
        if orientation == OrientationResult::NotJpeg {
            return Ok(FixPlan::NotJpeg);
        }

        let name = source
            .file_name()
            .ok_or_else(|| Error::TargetConflict {
                target: source.to_path_buf(),
                reason: "input has no file name",
            })?;
        let target = resolve(&self.out_dir.join(name));

        if target == resolve(source) {
            return Err(Error::TargetConflict {
                target,
                reason: "it is the input file",
            });
        }
        if !self.taken.insert(target.clone()) {
            return Err(Error::TargetConflict {
                target,
                reason: "an earlier input already wrote it",
            });
        }

        debug!("{} -> {}", source.display(), target.display());
        Ok(FixPlan::Write {
            target,
            data,
            orientation,
        })
    }
}

/// Canonical form when the path exists, otherwise the path as given.
fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Decode, rotate and re-encode `data`, then write it to `target`.
#[cfg(feature = "jpeg")]
pub fn write_upright(target: &Path, data: &[u8], quality: u8) -> Result<()> {
    let (img, _) = crate::image_loader::decode_upright_jpeg(data)?;
    let encoded = crate::image_loader::encode_jpeg(&img, quality)?;
    crate::image_loader::write_image_bytes(target, &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::tests::jpeg_with_exif;
    use crate::exif::{ByteOrder, ORIENTATION_TAG};
    use crate::image_loader::collect_paths;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn upload() -> Vec<u8> {
        jpeg_with_exif(ByteOrder::Little, &[(ORIENTATION_TAG, 6)])
    }

    #[test]
    fn test_mixed_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        for sub in ["a", "b"] {
            fs::create_dir_all(input.join(sub)).unwrap();
            fs::write(input.join(sub).join("x.jpg"), upload()).unwrap();
        }
        fs::write(input.join("c.png"), PNG_HEADER).unwrap();
        fs::write(input.join("d.jpg"), b"plain text").unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let mut planner = FixPlanner::new(&out);
        let args = [input.to_string_lossy().into_owned()];
        let mut skipped = Vec::new();
        let mut written = Vec::new();
        let mut refused = 0;
        for path in collect_paths(&args) {
            match planner.plan(&path) {
                Ok(FixPlan::NotJpeg) => {
                    skipped.push(path.file_name().unwrap().to_string_lossy().into_owned())
                }
                Ok(FixPlan::Write {
                    target,
                    orientation,
                    ..
                }) => written.push((target, orientation)),
                Err(Error::TargetConflict { .. }) => refused += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(skipped, vec!["c.png", "d.jpg"]);
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0.file_name().unwrap(), "x.jpg");
        assert_eq!(written[0].0.parent(), Some(fs::canonicalize(&out).unwrap().as_path()));
        assert_eq!(written[0].1, OrientationResult::Orientation(6));
        assert_eq!(refused, 1);
    }

    #[test]
    fn test_refuses_to_overwrite_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let source = dir.path().join("photo.jpg");
        fs::write(&source, upload()).unwrap();

        // Same directory reached through a detour.
        let mut planner = FixPlanner::new(&dir.path().join("sub").join(".."));
        let err = planner.plan(&source).unwrap_err();
        assert!(matches!(err, Error::TargetConflict { .. }));

        let mut planner = FixPlanner::new(&dir.path().join("sub"));
        assert!(matches!(planner.plan(&source), Ok(FixPlan::Write { .. })));
    }

    #[test]
    fn test_skipped_input_does_not_reserve_target() {
        let dir = tempfile::tempdir().unwrap();
        let (a, b) = (dir.path().join("a"), dir.path().join("b"));
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();
        fs::write(a.join("scan.jpg"), PNG_HEADER).unwrap();
        fs::write(b.join("scan.jpg"), upload()).unwrap();

        let mut planner = FixPlanner::new(&dir.path().join("out"));
        assert!(matches!(planner.plan(&a.join("scan.jpg")), Ok(FixPlan::NotJpeg)));
        assert!(matches!(planner.plan(&b.join("scan.jpg")), Ok(FixPlan::Write { .. })));
    }

    #[test]
    fn test_missing_input_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut planner = FixPlanner::new(&dir.path().join("out"));
        let err = planner.plan(&dir.path().join("gone.jpg")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
