//! Loop-mounting an ISO image by shelling out to `mount`.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MountError {
    #[error("mount ISO: could not run sudo: {0}")]
    Spawn(std::io::Error),
    #[error("mount ISO: {status}: {output}")]
    Failed { status: String, output: String },
}

/// Something that can attach an image file to a directory.
pub trait Mounter {
    fn mount(&self, image: &Path, target: &Path) -> Result<(), MountError>;
}

/// `sudo mount -o loop,ro <image> <target>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoopMount;

impl Mounter for LoopMount {
    fn mount(&self, image: &Path, target: &Path) -> Result<(), MountError> {
        tracing::debug!(image = %image.display(), target = %target.display(), "sudo mount");

        let output = Command::new("sudo")
            .args(["mount", "-o", "loop,ro"])
            .arg(image)
            .arg(target)
            .output()
            .map_err(MountError::Spawn)?;

        if output.status.success() {
            return Ok(());
        }

        // Mirror a combined stdout+stderr capture.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(MountError::Failed {
            status: output.status.to_string(),
            output: combined.trim().to_owned(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use super::*;

    /// Records every mount request; optionally fails them all.
    #[derive(Debug, Default, Clone)]
    pub struct RecordingMounter {
        pub calls: Rc<RefCell<Vec<(PathBuf, PathBuf)>>>,
        pub fail_with: Option<String>,
    }

    impl RecordingMounter {
        pub fn failing(output: &str) -> Self {
            Self {
                fail_with: Some(output.to_owned()),
                ..Self::default()
            }
        }
    }

    impl Mounter for RecordingMounter {
        fn mount(&self, image: &Path, target: &Path) -> Result<(), MountError> {
            self.calls
                .borrow_mut()
                .push((image.to_path_buf(), target.to_path_buf()));
            match &self.fail_with {
                Some(output) => Err(MountError::Failed {
                    status: "exit status: 32".into(),
                    output: output.clone(),
                }),
                None => Ok(()),
            }
        }
    }
}
