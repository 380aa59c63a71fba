//! # Hack Toolchain Executable
//!
//! The command-line entry point for the toolchain. It uses the `clap` crate
//! to parse user arguments and dispatches to the `driver::Toolchain` for the
//! assemble, translate, and compile actions.

use clap::{Arg, Command};
use hackc::Toolchain;
use std::path::Path;
use std::process;

fn main() {
    // Define the command-line interface structure using clap.
    let matches = Command::new("hackc")
        .version("0.1.0")
        .about("Hack platform toolchain: assembler, VM translator, Jack compiler")
        // --- 'assemble' Subcommand ---
        .subcommand(
            Command::new("assemble")
                .about("Assemble a .asm file into .hack machine code")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_name("FILE")
                        .help("Hack assembly file to assemble"),
                )
                .arg(verbose_arg()),
        )
        // --- 'translate' Subcommand ---
        .subcommand(
            Command::new("translate")
                .about("Translate VM code into Hack assembly")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_name("PATH")
                        .help("A .vm file or a directory of .vm files"),
                )
                .arg(verbose_arg()),
        )
        // --- 'compile' Subcommand ---
        .subcommand(
            Command::new("compile")
                .about("Compile Jack source into VM code")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_name("PATH")
                        .help("A .jack file or a directory of .jack files"),
                )
                .arg(
                    Arg::new("dump-tokens")
                        .long("dump-tokens")
                        .action(clap::ArgAction::SetTrue)
                        .help("Print the token stream as JSON instead of compiling"),
                )
                .arg(verbose_arg()),
        )
        .get_matches();

    let mut toolchain = Toolchain::new();

    // Dispatch the command based on the user's input.
    match matches.subcommand() {
        Some(("assemble", sub_matches)) => {
            toolchain.verbose = sub_matches.get_flag("verbose");
            let file = sub_matches.get_one::<String>("file").expect("required arg");

            if let Err(e) = toolchain.assemble_file(Path::new(file)) {
                eprintln!("assembly failed: {e}");
                process::exit(1);
            }
        }
        Some(("translate", sub_matches)) => {
            toolchain.verbose = sub_matches.get_flag("verbose");
            let path = Path::new(sub_matches.get_one::<String>("path").expect("required arg"));

            let result = if path.extension().is_some_and(|ext| ext == "vm") {
                toolchain.translate_file(path).map(|_| ())
            } else {
                toolchain.translate_dir(path).map(|_| ())
            };
            if let Err(e) = result {
                eprintln!("translation failed: {e}");
                process::exit(1);
            }
        }
        Some(("compile", sub_matches)) => {
            toolchain.verbose = sub_matches.get_flag("verbose");
            let path = Path::new(sub_matches.get_one::<String>("path").expect("required arg"));

            let result = if sub_matches.get_flag("dump-tokens") {
                toolchain.dump_tokens(path)
            } else {
                toolchain.compile_path(path).map(|_| ())
            };
            if let Err(e) = result {
                eprintln!("compilation failed: {e}");
                process::exit(1);
            }
        }
        // Default case: show help message.
        _ => {
            println!("Hack toolchain");
            println!("Use 'hackc --help' for usage information");
        }
    }
}

fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .long("verbose")
        .action(clap::ArgAction::SetTrue)
        .help("Show step-by-step progress")
}
