use std::fmt;
use std::path::PathBuf;

/// Where the profiles file lives once the config directory is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub dir: PathBuf,
    pub file: PathBuf,
}

impl ConfigLocation {
    pub fn new(dir: PathBuf, file_name: &str, extension: &str) -> Self {
        let file = dir.join(format!("{}.{}", file_name, extension));
        Self { dir, file }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The file did not exist and was written empty.
    Created,
    /// An existing file was read; nothing was written.
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Create,
    Write,
    Remove,
    Rename,
    Chmod,
}

impl fmt::Display for ChangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeOp::Create => "CREATE",
            ChangeOp::Write => "WRITE",
            ChangeOp::Remove => "REMOVE",
            ChangeOp::Rename => "RENAME",
            ChangeOp::Chmod => "CHMOD",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChange {
    pub path: PathBuf,
    pub op: ChangeOp,
}

impl fmt::Display for ConfigChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Config file changed: {} {}", self.path.display(), self.op)
    }
}
