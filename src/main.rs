use clap::{arg, crate_version, Command};
use std::path::{Path, PathBuf};
use un80::detect::{detect_with_extension, FormatTag};
use un80::{arc, cpm, crlzh, crunch, lbr, squeeze};

const RCH: &str = "unreachable was reached";

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let long_help = "Examples:
---------
List:       `un80 -l some_archive.arc`
Extract:    `un80 some_archive.lbr -o out_dir`
Text mode:  `un80 -t readme.dyc -o out_dir`";

    let main_cmd = Command::new("un80")
        .about("Extract and decompress CP/M archive and compression formats")
        .after_long_help(long_help)
        .version(crate_version!())
        .arg(arg!([file] "input file").required(true))
        .arg(arg!(-o --output <DIR> "output directory").required(false))
        .arg(arg!(-l --list "list contents without extracting"))
        .arg(arg!(-t --text "apply text-mode post-processing (strip EOF, CR+LF -> LF)"))
        .arg(
            arg!(-f --format <FORMAT> "force format instead of auto-detecting")
                .value_parser(["lbr", "arc", "squeeze", "crunch", "crlzh"])
                .required(false),
        );

    let matches = main_cmd.get_matches();
    let path = PathBuf::from(matches.get_one::<String>("file").expect(RCH));
    let data = std::fs::read(&path)?;
    let forced = matches.get_one::<String>("format").map(|s| s.as_str());
    let tag = resolve_format(&data, &path, forced)?;

    if matches.get_flag("list") {
        list(tag, &data)
    } else {
        let out_dir = matches.get_one::<String>("output").map(PathBuf::from);
        extract(tag, &data, &path, out_dir.as_deref(), matches.get_flag("text"))
    }
}

fn resolve_format(data: &[u8], path: &Path, forced: Option<&str>) -> Result<FormatTag, Box<dyn std::error::Error>> {
    if let Some(f) = forced {
        return Ok(match f {
            "lbr" => FormatTag::Lbr,
            "arc" => FormatTag::Arc,
            "squeeze" => FormatTag::Squeeze,
            "crunch" => FormatTag::Crunch,
            "crlzh" => FormatTag::CrLzh,
            _ => unreachable!("{RCH}"),
        });
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    detect_with_extension(data, ext).ok_or_else(|| "could not determine file format".into())
}

fn list(tag: FormatTag, data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    match tag {
        FormatTag::Lbr => {
            println!("{:<13}{:>10}", "Filename", "Size");
            for e in lbr::list_lbr(data)? {
                println!("{:<13}{:>10}", e.filename, e.byte_length());
            }
        }
        FormatTag::Arc => {
            println!("{:<15}{:>10}{:>12}{:>10}", "Filename", "Original", "Compressed", "Method");
            for e in arc::list_arc(data)? {
                println!("{:<15}{:>10}{:>12}{:>10}", e.filename, e.original_size, e.compressed_size, e.method.name());
            }
        }
        FormatTag::Squeeze => println!("{}", squeeze::get_squeezed_filename(data)?),
        FormatTag::Crunch => println!("{}", crunch::get_crunched_filename(data)?),
        FormatTag::CrLzh => println!("{}", crlzh::get_crlzh_filename(data)?),
    }
    Ok(())
}

fn extract(
    tag: FormatTag,
    data: &[u8],
    path: &Path,
    out_dir: Option<&Path>,
    text_mode: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = out_dir.unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(out_dir)?;

    let write_member = |name: &str, bytes: Vec<u8>| -> std::io::Result<()> {
        let bytes = if text_mode { cpm::crlf_to_lf(&cpm::strip_cpm_eof(&bytes)) } else { bytes };
        std::fs::write(out_dir.join(name), bytes)
    };

    match tag {
        FormatTag::Lbr => {
            for e in lbr::list_lbr(data)? {
                let bytes = lbr::extract_lbr_member(data, &e)?;
                write_member(&e.filename, bytes)?;
            }
        }
        FormatTag::Arc => {
            for e in arc::list_arc(data)? {
                let bytes = arc::extract_arc_member(data, &e)?;
                write_member(&e.filename, bytes)?;
            }
        }
        FormatTag::Squeeze => {
            let name = squeeze::get_squeezed_filename(data)?;
            let bytes = squeeze::unsqueeze(data)?;
            write_member(&name, bytes)?;
        }
        FormatTag::Crunch => {
            let name = crunch::get_crunched_filename(data)?;
            let bytes = crunch::uncrunch(data)?;
            write_member(&name, bytes)?;
        }
        FormatTag::CrLzh => {
            let name = crlzh::get_crlzh_filename(data)?;
            let bytes = crlzh::uncrlzh(data)?;
            write_member(&name, bytes)?;
        }
    }
    log::info!("extracted {} into {}", path.display(), out_dir.display());
    Ok(())
}
