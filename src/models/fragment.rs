use std::path::{Path, PathBuf};

/// Suffix identifying the backbone document of a sitting day
pub const BACKBONE_SUFFIX: &str = "_0.html";

/// Pointer to one speaker fragment referenced from the backbone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRef {
    /// Session base identifier (backbone file name without `_0.html`)
    pub session_base: String,
    /// Fragment index taken from the backbone anchor
    pub index: u32,
    /// Speaker name shown on the backbone link
    pub display_name: String,
}

impl FragmentRef {
    pub fn file_name(&self) -> String {
        format!("{}_{}.html", self.session_base, self.index)
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

/// A sitting day discovered on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSource {
    /// Directory holding the backbone and its fragments
    pub dir: PathBuf,
    /// Session base identifier, prefix of every block id
    pub base: String,
    /// Path of the `{base}_0.html` backbone document
    pub backbone: PathBuf,
}

impl SessionSource {
    /// Build from a backbone file name, returning `None` if it is not one
    pub fn from_backbone_name(dir: &Path, file_name: &str) -> Option<Self> {
        let base = file_name.strip_suffix(BACKBONE_SUFFIX)?;
        Some(Self {
            dir: dir.to_path_buf(),
            base: base.to_string(),
            backbone: dir.join(file_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_file_name() {
        let fragment = FragmentRef {
            session_base: "2024-01-10".to_string(),
            index: 7,
            display_name: "Jan Kowalski".to_string(),
        };
        assert_eq!(fragment.file_name(), "2024-01-10_7.html");
        assert_eq!(
            fragment.path_in(Path::new("data")),
            Path::new("data").join("2024-01-10_7.html")
        );
    }

    #[test]
    fn test_session_from_backbone_name() {
        let session = SessionSource::from_backbone_name(Path::new("d"), "2024-01-10_0.html").unwrap();
        assert_eq!(session.base, "2024-01-10");
        assert_eq!(session.backbone, Path::new("d").join("2024-01-10_0.html"));

        assert!(SessionSource::from_backbone_name(Path::new("d"), "2024-01-10_3.html").is_none());
    }
}
