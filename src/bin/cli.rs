use quarto::position::Position;
use quarto::search::dispatcher::compute_move;
use quarto::search::tt::{DEFAULT_TT_PATH, table};
use std::path::PathBuf;

/// Parses the compact textual position encoding: six colon-separated
/// fields, `B0:B1:B2:B3:B4:selection_state:selected_piece`, each a
/// hexadecimal `u16` (`selected_piece` as `u8`, `0x67` for "none selected").
fn parse_position(encoded: &str) -> Option<Position> {
    let fields: Vec<&str> = encoded.split(':').collect();
    if fields.len() != 7 {
        return None;
    }
    let mut boards = [0u16; 5];
    for (slot, field) in boards.iter_mut().zip(&fields[0..5]) {
        *slot = u16::from_str_radix(field, 16).ok()?;
    }
    let selection_state = u16::from_str_radix(fields[5], 16).ok()?;
    let selected_piece = u8::from_str_radix(fields[6], 16).ok()?;
    Some(Position::construct(
        boards,
        selection_state,
        selected_piece,
    ))
}

fn print_usage() {
    eprintln!(
        "usage: quarto --position <B0:B1:B2:B3:B4:selection_state:selected_piece> \
         [--time-ms <u32>] [--tt-path <path>] [--log-level <level>]"
    );
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut position_str: Option<String> = None;
    let mut time_ms: u32 = 5000;
    let mut tt_path = PathBuf::from(DEFAULT_TT_PATH);
    let mut log_level = "info".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--position" => {
                if i + 1 < args.len() {
                    position_str = Some(args[i + 1].clone());
                }
                i += 2;
            }
            "--time-ms" => {
                if i + 1 < args.len() {
                    time_ms = args[i + 1].parse().unwrap_or(5000);
                }
                i += 2;
            }
            "--tt-path" => {
                if i + 1 < args.len() {
                    tt_path = PathBuf::from(&args[i + 1]);
                }
                i += 2;
            }
            "--log-level" => {
                if i + 1 < args.len() {
                    log_level = args[i + 1].clone();
                }
                i += 2;
            }
            other => {
                eprintln!("unrecognized argument: {other}");
                print_usage();
                std::process::exit(2);
            }
        }
    }

    #[cfg(feature = "cli")]
    quarto::logger::init_logging("logs/quarto.log", &log_level);
    #[cfg(not(feature = "cli"))]
    let _ = &log_level;

    let Some(position_str) = position_str else {
        print_usage();
        std::process::exit(2);
    };

    let Some(pos) = parse_position(&position_str) else {
        eprintln!("could not parse --position argument: {position_str}");
        print_usage();
        std::process::exit(2);
    };

    if tt_path.as_path() != std::path::Path::new(DEFAULT_TT_PATH) {
        table().load(&tt_path);
    }

    let code = compute_move(&pos, time_ms);
    println!("{code:#06x}");

    if tt_path.as_path() != std::path::Path::new(DEFAULT_TT_PATH) {
        table().save(&tt_path);
    }
}
