use std::{error, fmt, io};

use crate::kind::ContainerKind;

/// Errors surfaced while walking a container directory.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    /// End of stream inside a structure the format requires.
    Truncated(&'static str),
    /// A textual directory (Lynx, LBR) did not parse.
    Text(&'static str),
    /// `dir` dispatched a kind this walker does not handle.
    WrongKind(ContainerKind),
    /// `dir` was called with the `Unknown` sentinel.
    UnknownKind,
    /// An X64 prelude names a disk drive this crate has no geometry for.
    UnsupportedDevice(u8),
    /// No candidate disk geometry validated against the image.
    UnsupportedImage,
    /// The directory sector chain ran past the disk capacity.
    DirectoryLoop(u32),
    /// A directory sector link points off the disk.
    BadLink { track: u8, sector: u8 },
    /// TAP header version other than 0 or 1.
    TapeVersion(u8),
    /// The tape pulse stream stopped making sense.
    Tape(&'static str),
}

impl Error {
    /// Process-style status code: 3 for unsupported variants, 2 otherwise.
    #[must_use]
    pub fn status(&self) -> i32 {
        match self {
            Self::UnknownKind | Self::UnsupportedDevice(_) | Self::UnsupportedImage => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => err.fmt(f),
            Self::Truncated(what) => write!(f, "unexpected end of file in {what}"),
            Self::Text(what) => write!(f, "archive format error in {what}"),
            Self::WrongKind(kind) => write!(f, "walker cannot handle {kind:?}"),
            Self::UnknownKind => f.write_str("not a known Commodore container"),
            Self::UnsupportedDevice(code) => {
                write!(f, "unsupported disk image device type (#{code})")
            }
            Self::UnsupportedImage => f.write_str("unsupported disk image format"),
            Self::DirectoryLoop(blocks) => {
                write!(f, "directory chain still running after {blocks} blocks")
            }
            Self::BadLink { track, sector } => {
                write!(f, "directory chain leaves the disk at track {track} sector {sector}")
            }
            Self::TapeVersion(version) => write!(f, "unsupported tape image version {version}"),
            Self::Tape(what) => write!(f, "tape decoding error: {what}"),
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
