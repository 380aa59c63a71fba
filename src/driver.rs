//! # Toolchain Driver
//!
//! Orchestrates the three pipelines over the filesystem: path dispatch,
//! directory enumeration, output naming, and the Sys.vm bootstrap trigger.
//! Every pipeline runs fully in memory and the output file is written only
//! on success, so a failing input never leaves a partial artifact behind.

use crate::error::CompileError;
use crate::vm::SourceUnit;
use crate::{asm, debug, jack, vm};
use std::fs;
use std::path::{Path, PathBuf};

/// The central structure managing assembly, translation, and compilation
/// runs over files and directories.
pub struct Toolchain {
    /// Flag for step-by-step progress messages on stdout.
    pub verbose: bool,
}

impl Toolchain {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Assembles one `.asm` file into a sibling `.hack` file.
    pub fn assemble_file(&self, path: &Path) -> Result<PathBuf, CompileError> {
        self.log(&format!("assembling {}", path.display()));
        let source = fs::read_to_string(path)?;
        let binary = asm::assemble(&source)?;
        let out_path = path.with_extension("hack");
        fs::write(&out_path, binary)?;
        self.log(&format!("wrote {}", out_path.display()));
        Ok(out_path)
    }

    /// Translates every `.vm` file in a directory into `<dir>/output.asm`.
    ///
    /// Files are taken in filename order so a compilation set translates the
    /// same way on every run. The `Sys.init` prologue is emitted when the
    /// set contains a `Sys.vm`.
    pub fn translate_dir(&self, dir: &Path) -> Result<PathBuf, CompileError> {
        let files = files_with_extension(dir, "vm")?;
        let mut units = Vec::with_capacity(files.len());
        for file in &files {
            self.log(&format!("reading {}", file.display()));
            units.push(SourceUnit::new(stem_of(file), fs::read_to_string(file)?));
        }

        let assembly = vm::translate(&units)?;
        let out_path = dir.join("output.asm");
        fs::write(&out_path, assembly)?;
        self.log(&format!("wrote {}", out_path.display()));
        Ok(out_path)
    }

    /// Translates a single `.vm` file into a sibling `.asm` file.
    pub fn translate_file(&self, path: &Path) -> Result<PathBuf, CompileError> {
        self.log(&format!("translating {}", path.display()));
        let unit = SourceUnit::new(stem_of(path), fs::read_to_string(path)?);
        let assembly = vm::translate(std::slice::from_ref(&unit))?;
        let out_path = path.with_extension("asm");
        fs::write(&out_path, assembly)?;
        self.log(&format!("wrote {}", out_path.display()));
        Ok(out_path)
    }

    /// Compiles a `.jack` file, or every `.jack` file in a directory, each
    /// into a sibling `.vm` file.
    pub fn compile_path(&self, path: &Path) -> Result<Vec<PathBuf>, CompileError> {
        let files = if path.extension().is_some_and(|ext| ext == "jack") {
            vec![path.to_path_buf()]
        } else {
            files_with_extension(path, "jack")?
        };

        let mut outputs = Vec::with_capacity(files.len());
        for file in &files {
            self.log(&format!("compiling {}", file.display()));
            let timer = debug::PerfTimer::new(&file.display().to_string());
            let source = fs::read_to_string(file)?;
            let vm_text = jack::compile(&source)?;
            let out_path = file.with_extension("vm");
            fs::write(&out_path, vm_text)?;
            timer.finish();
            self.log(&format!("wrote {}", out_path.display()));
            outputs.push(out_path);
        }
        Ok(outputs)
    }

    /// Scans a `.jack` file and prints its token stream as JSON.
    pub fn dump_tokens(&self, path: &Path) -> Result<(), CompileError> {
        let source = fs::read_to_string(path)?;
        let tokens = jack::tokenizer::tokenize(&source)?;
        println!("{}", debug::tokens_to_json(&tokens));
        Ok(())
    }

    fn log(&self, message: &str) {
        if self.verbose {
            println!("{message}");
        }
        debug::log_driver(message);
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new()
    }
}

/// All files in `dir` carrying the extension, sorted by filename.
///
/// An empty result is an error: every pipeline needs at least one input.
fn files_with_extension(dir: &Path, extension: &'static str) -> Result<Vec<PathBuf>, CompileError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == extension))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(CompileError::NoSourceFiles { extension });
    }
    Ok(files)
}

/// The filename without directory or extension, used for `static` naming.
fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
