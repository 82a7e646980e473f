//! Command-line front end for the `mini_xz` decoder.
//!
//! Usage: `mini-xz-dec <input.xz> <output>`

use std::fs;
use std::process::ExitCode;

use mini_xz::{decode_into, decoded_size, Error};

fn main() -> ExitCode {
    let mut args = std::env::args_os().skip(1);
    let (Some(input_path), Some(output_path)) = (args.next(), args.next()) else {
        eprintln!("usage: mini-xz-dec <input.xz> <output>");
        return ExitCode::from(22); // EINVAL
    };

    let input = match fs::read(&input_path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("failed to read {}: {e}", input_path.to_string_lossy());
            return ExitCode::from(5); // EIO
        }
    };

    let size = match decoded_size(&input) {
        Ok(size) => size,
        Err(e) => {
            eprintln!("failed to determine decoded size: {e}");
            return exit_code_for(e);
        }
    };

    let mut output = vec![0u8; size];
    let written = match decode_into(&input, &mut output) {
        Ok(written) => written,
        Err(e) => {
            eprintln!("failed to decode input: {e}");
            return exit_code_for(e);
        }
    };
    output.truncate(written);

    if let Err(e) = fs::write(&output_path, &output) {
        eprintln!("failed to write {}: {e}", output_path.to_string_lossy());
        return ExitCode::from(5); // EIO
    }

    let ratio = if written == 0 {
        0.0
    } else {
        input.len() as f64 / written as f64
    };
    println!(
        "{} -> {}: {} bytes -> {} bytes (ratio {:.3})",
        input_path.to_string_lossy(),
        output_path.to_string_lossy(),
        input.len(),
        written,
        ratio
    );

    ExitCode::SUCCESS
}

fn exit_code_for(err: Error) -> ExitCode {
    match err {
        Error::Framing(_) | Error::Padding | Error::Capacity(_) => ExitCode::from(22), // EINVAL
        Error::Truncation(_) | Error::RangeDesync(_) | Error::LzmaSemantic(_) => {
            ExitCode::from(5) // EIO
        }
        Error::Integrity => ExitCode::from(74), // data corruption
    }
}
