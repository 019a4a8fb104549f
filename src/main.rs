//! Command-line front end: argument handling, output formatting, and the
//! exit-code mapping around the library's `determine`/`dir` engine.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek};
use std::process::ExitCode;

use clap::Parser;

use cbmview::{determine, dir, ContainerKind, DirEntry, DirOptions, DirSink, Totals};

/// View directories of Commodore 64/128 archive, tape, and disk image files.
#[derive(Parser)]
#[command(version, about, max_term_width = 100)]
struct Cli {
    /// Print a 1541-style directory listing instead of the wide table.
    #[arg(short = 'd', long = "directory")]
    directory_style: bool,

    /// Files to inspect; "-" reads standard input.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<String>,
}

/// Everything the walkers need from an input.
trait Input: Read + Seek {}
impl<T: Read + Seek> Input for T {}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("cbmview: {}", record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Wide-table sink: one row per entry plus a totals footer.
struct WideSink;

impl WideSink {
    fn banner() {
        println!("Name              Type  Length  Blks  Method     SF   Now   Check");
        println!("================  ====  ======  ====  ========  ====  ====  =====");
    }

    fn footer(totals: &Totals, kind: ContainerKind) {
        println!("================  ====  ======  ====  ========  ====  ====  =====");
        let version = match totals.version {
            0 => String::new(),
            v if v < 0 => format!(" {}.{}", -v / 10, -v % 10),
            v => format!(" {v}"),
        };
        let savings = if totals.total_blocks == 0 {
            0
        } else {
            100 - i64::from(totals.total_blocks_now) * 100 / i64::from(totals.total_blocks)
        };
        println!(
            "*total {:5}           {:7}  {:4}  {}{} {:4}%  {:4}+{}",
            totals.entries,
            totals.total_length,
            totals.total_blocks,
            kind.tag(),
            version,
            savings,
            totals.total_blocks_now,
            totals.dearcer_blocks,
        );
    }
}

impl DirSink for WideSink {
    fn container_start(&mut self, _kind: ContainerKind, label: Option<&str>) {
        if let Some(label) = label {
            println!("Volume: \"{label}\"");
        }
        Self::banner();
    }

    fn entry(&mut self, entry: &DirEntry) {
        let checksum = entry
            .checksum
            .map_or_else(String::new, |sum| format!("{sum:04X}"));
        println!(
            "{:16}  {}  {:7}  {:4}  {:8} {:4}%  {:4}   {}",
            entry.name,
            entry.file_type,
            entry.length,
            entry.blocks,
            entry.method,
            entry.savings,
            entry.blocks_now,
            checksum,
        );
    }
}

/// 1541-style listing, like LOADing "$" would show.
struct ListingSink;

impl DirSink for ListingSink {
    fn container_start(&mut self, _kind: ContainerKind, label: Option<&str>) {
        println!("0 \"{:16}\"", label.unwrap_or(""));
    }

    fn entry(&mut self, entry: &DirEntry) {
        let quoted = format!("\"{}\"", entry.name);
        println!("{:<5}{:18}{}", entry.blocks, quoted, entry.file_type);
    }
}

fn open_input(path: &str) -> io::Result<(Box<dyn Input>, Option<String>)> {
    if path == "-" {
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        return Ok((Box::new(Cursor::new(data)), None));
    }
    match File::open(path) {
        Ok(file) => Ok((Box::new(BufReader::new(file)), Some(path.to_owned()))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // the historical default extension for self-dissolving archives
            let with_ext = format!("{path}.sda");
            match File::open(&with_ext) {
                Ok(file) => Ok((Box::new(BufReader::new(file)), Some(with_ext))),
                Err(_) => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}

fn inspect(path: &str, directory_style: bool) -> i32 {
    let (mut stream, name_hint) = match open_input(path) {
        Ok(opened) => opened,
        Err(err) => {
            eprintln!("cbmview: {path}: {err}");
            return 2;
        }
    };

    let kind = match determine(&mut stream, name_hint.as_deref()) {
        Ok(ContainerKind::Unknown) => {
            eprintln!("cbmview: {path}: not a known Commodore container");
            return 3;
        }
        Ok(kind) => kind,
        Err(err) => {
            eprintln!("cbmview: {path}: {err}");
            return err.status();
        }
    };

    let options = DirOptions {
        precise_lengths: !directory_style,
    };
    let walked = if directory_style {
        dir(&mut stream, kind, &options, &mut ListingSink)
    } else {
        dir(&mut stream, kind, &options, &mut WideSink)
    };
    match walked {
        Ok(totals) => {
            if directory_style {
                println!("{} BLOCKS USED.", totals.total_blocks);
            } else {
                WideSink::footer(&totals, kind);
            }
            0
        }
        Err(err) => {
            eprintln!("cbmview: {path}: {err}");
            err.status()
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // usage problems exit 1; --help and --version exit 0
            let code: u8 = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(log::LevelFilter::Warn));

    let mut worst = 0i32;
    let many = cli.files.len() > 1;
    for path in &cli.files {
        if many {
            println!("{path}:");
        }
        worst = worst.max(inspect(path, cli.directory_style));
        if many {
            println!();
        }
    }
    ExitCode::from(worst.clamp(0, u8::MAX.into()) as u8)
}
