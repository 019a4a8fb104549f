//! Directory inspector for Commodore 8-bit archive and disk-image containers.
//!
//! [`determine`] sniffs which historical container format a byte stream
//! holds; [`dir`] walks that container's directory, reporting one callback
//! per entry and returning aggregate totals. Nothing is ever extracted or
//! written.

mod arc;
mod bytes;
mod disk;
mod error;
mod kind;
mod lha;
mod lynx;
mod p00;
mod probe;
mod sink;
mod stream;
mod t64;
mod tap;

pub use self::error::Error;
pub use self::kind::{CbmFileAttr, CbmFileType, ContainerKind};
pub use self::probe::determine;
pub use self::sink::{CollectingSink, DirEntry, DirOptions, DirSink, Totals};

use std::io::{Read, Seek};

/// Walk the directory of a container of `kind`, reporting entries to `sink`.
///
/// The stream is rewound internally; its position afterwards is unspecified.
/// On failure, [`Error::status`] distinguishes malformed input (2) from an
/// unsupported sub-variant (3). The sink is never called again once an error
/// has been decided.
pub fn dir<S: Read + Seek, V: DirSink>(
    stream: &mut S,
    kind: ContainerKind,
    options: &DirOptions,
    sink: &mut V,
) -> Result<Totals, Error> {
    let mut totals = Totals::default();
    match kind {
        ContainerKind::ArcRaw
        | ContainerKind::C64Arc10
        | ContainerKind::C64Arc13
        | ContainerKind::C64Arc15
        | ContainerKind::C128Arc15 => arc::walk(stream, kind, &mut totals, sink)?,
        ContainerKind::LhaSfx | ContainerKind::LhaRaw => {
            lha::walk(stream, kind, &mut totals, sink)?;
        }
        ContainerKind::LynxOld | ContainerKind::LynxNew => {
            lynx::walk(stream, kind, &mut totals, sink)?;
        }
        ContainerKind::T64 => t64::walk(stream, kind, &mut totals, sink)?,
        ContainerKind::D64 | ContainerKind::C1581 | ContainerKind::X64 => {
            disk::walk(stream, kind, options, &mut totals, sink)?;
        }
        ContainerKind::P00
        | ContainerKind::S00
        | ContainerKind::U00
        | ContainerKind::R00
        | ContainerKind::D00
        | ContainerKind::X00 => p00::walk_x00(stream, kind, &mut totals, sink)?,
        ContainerKind::N64 => p00::walk_n64(stream, kind, &mut totals, sink)?,
        ContainerKind::Lbr => p00::walk_lbr(stream, kind, &mut totals, sink)?,
        ContainerKind::Tap => tap::walk(stream, kind, &mut totals, sink)?,
        ContainerKind::Unknown => return Err(Error::UnknownKind),
    }
    Ok(totals)
}
