use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{PipeReader, PipeWriter},
    os::{
        fd::{AsRawFd, OwnedFd},
        unix::fs::OpenOptionsExt,
    },
    path::Path,
    process::Stdio,
};

use crate::result::ShellError;

/// `rw-r--r--`
pub const OUTPUT_MODE: u32 = 0o644;

/// A standard stream of a child: either inherited from the shell or bound to a
/// descriptor the shell opened for that child alone.
#[derive(Debug)]
pub enum Stream {
    Standard,
    Fd(OwnedFd),
}

impl Stream {
    pub fn is_standard(&self) -> bool {
        matches!(self, Stream::Standard)
    }

    pub fn into_stdio(self) -> Stdio {
        match self {
            Stream::Standard => Stdio::inherit(),
            Stream::Fd(fd) => Stdio::from(fd),
        }
    }
}

impl From<File> for Stream {
    fn from(file: File) -> Self {
        Stream::Fd(file.into())
    }
}

impl From<PipeReader> for Stream {
    fn from(reader: PipeReader) -> Self {
        Stream::Fd(reader.into())
    }
}

impl From<PipeWriter> for Stream {
    fn from(writer: PipeWriter) -> Self {
        Stream::Fd(writer.into())
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Standard => write!(f, "std"),
            Stream::Fd(fd) => write!(f, "{}", fd.as_raw_fd()),
        }
    }
}

/// Opens the target of `< file`.
pub fn open_input(path: &Path) -> Result<Stream, ShellError> {
    File::open(path)
        .map(Stream::from)
        .map_err(|source| ShellError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Opens the target of `> file`, creating or truncating it.
pub fn open_output(path: &Path) -> Result<Stream, ShellError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(OUTPUT_MODE)
        .open(path)
        .map(Stream::from)
        .map_err(|source| ShellError::Open {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        io::{Read, Write},
        os::unix::fs::PermissionsExt,
    };

    use super::*;

    #[test]
    fn output_is_truncated_and_readable_by_all() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old contents\n").unwrap();

        let Stream::Fd(fd) = open_output(&path).unwrap() else {
            panic!("expected a descriptor");
        };
        let mut file = File::from(fd);
        file.write_all(b"new\n").unwrap();
        drop(file);

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        // umask can only clear bits
        assert_eq!(mode & 0o777 & !OUTPUT_MODE, 0);
    }

    #[test]
    fn input_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        fs::write(&path, "hello").unwrap();

        let Stream::Fd(fd) = open_input(&path).unwrap() else {
            panic!("expected a descriptor");
        };
        let mut buf = String::new();
        File::from(fd).read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "hello");
    }

    #[test]
    fn missing_input_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let err = open_input(&path).unwrap_err();
        assert!(matches!(err, ShellError::Open { .. }));
        assert!(err.to_string().starts_with(&path.display().to_string()));
    }
}
