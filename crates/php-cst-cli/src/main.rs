//! Debug driver for the tolerant PHP front end.
//!
//! Usage: php-cst scan <file-or-dir>
//!        php-cst parse <file-or-dir>
//!        php-cst compare (scan|parse) <file-or-dir> [--reference <cmd>]
//!
//! `scan` prints one JSON object per token, `parse` prints the CST as
//! pretty JSON, and `compare` diffs our JSON against a reference tool's
//! output, exiting non-zero on any difference.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{self, Command};

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(name = "php-cst", about = "Tolerant PHP lexer/parser debug driver")]
struct Cli {
    #[command(subcommand)]
    command: CstCommand,
}

#[derive(Subcommand, Debug)]
enum CstCommand {
    /// Print debug token lines for each .php file
    Scan {
        /// A .php file or a directory to walk
        path: PathBuf,
    },

    /// Print the parse tree as pretty JSON
    Parse {
        /// A .php file or a directory to walk
        path: PathBuf,
    },

    /// Diff scan or parse output against a reference implementation
    Compare {
        /// Which projection to compare
        #[arg(value_parser = ["scan", "parse"])]
        action: String,

        /// A .php file or a directory to walk
        path: PathBuf,

        /// Reference command; invoked as `<cmd> <action> <file>`
        #[arg(long, default_value = "php debug.php")]
        reference: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(failures) if failures == 0 => 0,
        Ok(_) => 1,
        Err(error) => {
            eprintln!("{error}");
            1
        }
    };
    process::exit(exit_code);
}

fn run(cli: Cli) -> io::Result<usize> {
    match cli.command {
        CstCommand::Scan { path } => {
            for file in php_files(&path)? {
                let source = fs::read_to_string(&file)?;
                print_token_lines(&source);
            }
            Ok(0)
        }
        CstCommand::Parse { path } => {
            for file in php_files(&path)? {
                let source = fs::read_to_string(&file)?;
                let bytes = php_cst_parser::pretty_print(&parse_json(&source));
                println!("AST of : {}", file.display());
                println!("{}", String::from_utf8_lossy(&bytes));
            }
            Ok(0)
        }
        CstCommand::Compare {
            action,
            path,
            reference,
        } => {
            let mut failures = 0;
            for file in php_files(&path)? {
                let source = fs::read_to_string(&file)?;
                let ours = match action.as_str() {
                    "scan" => scan_json(&source),
                    _ => parse_json(&source),
                };
                let theirs = reference_output(&reference, &action, &file)?;
                if ours == theirs {
                    println!("Ok:  {}", file.display());
                } else {
                    failures += 1;
                    println!("Fail:  {}", file.display());
                    println!("START DIFF");
                    print_diff(&ours, &theirs);
                    println!("END DIFF");
                }
            }
            Ok(failures)
        }
    }
}

/// The file itself, or every `.php` file below a directory.
fn php_files(path: &Path) -> io::Result<Vec<PathBuf>> {
    let metadata = fs::metadata(path)?;
    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    collect_php_files(path, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_php_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_php_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "php") {
            files.push(path);
        }
    }
    Ok(())
}

fn print_token_lines(source: &str) {
    for token in php_cst_lexer::tokenize(source) {
        let short = token.short_form(source);
        let line = json!({
            "kind": short.kind,
            "textLength": short.text_length,
            "text": short.text,
        });
        println!("{}", String::from_utf8_lossy(&php_cst_parser::pretty_print(&line)));
    }
}

/// The scan projection compared against the reference: one object per
/// token with its kind and offsets.
fn scan_json(source: &str) -> Value {
    let tokens: Vec<Value> = php_cst_lexer::tokenize(source)
        .iter()
        .map(|token| {
            json!({
                "kind": token.kind.name(),
                "fullStart": token.full_start,
                "start": token.start,
                "length": token.length,
            })
        })
        .collect();
    Value::Array(tokens)
}

fn parse_json(source: &str) -> Value {
    php_cst_parser::serialize(&php_cst_parser::parse_source_file(source, None))
}

/// Runs the reference tool and parses its stdout as JSON.
fn reference_output(reference: &str, action: &str, file: &Path) -> io::Result<Value> {
    let mut parts = reference.split_whitespace();
    let program = parts.next().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "empty reference command")
    })?;
    let output = Command::new(program)
        .args(parts)
        .arg(action)
        .arg(file)
        .output()?;
    if !output.status.success() {
        return Err(io::Error::other(format!(
            "reference command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    serde_json::from_slice(&output.stdout)
        .map_err(|error| io::Error::other(format!("reference produced invalid JSON: {error}")))
}

/// Line-oriented diff of the two pretty-printed values.
fn print_diff(ours: &Value, theirs: &Value) {
    let ours = String::from_utf8_lossy(&php_cst_parser::pretty_print(ours)).into_owned();
    let theirs = String::from_utf8_lossy(&php_cst_parser::pretty_print(theirs)).into_owned();
    let our_lines: Vec<&str> = ours.lines().collect();
    let their_lines: Vec<&str> = theirs.lines().collect();
    let common = our_lines.len().min(their_lines.len());
    for i in 0..common {
        if our_lines[i] != their_lines[i] {
            println!("- {}", our_lines[i]);
            println!("+ {}", their_lines[i]);
        }
    }
    for line in &our_lines[common..] {
        println!("- {line}");
    }
    for line in &their_lines[common..] {
        println!("+ {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_php_files_walks_directories_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("a.php"), "<?php $a;").unwrap();
        fs::write(nested.join("b.php"), "<?php $b;").unwrap();
        fs::write(dir.path().join("notes.txt"), "not php").unwrap();

        let files = php_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "php"));
    }

    #[test]
    fn test_php_files_accepts_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("only.php");
        fs::write(&file, "<?php 1;").unwrap();
        let files = php_files(&file).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_scan_json_shape() {
        let value = scan_json("<?php $a;");
        let tokens = value.as_array().unwrap();
        assert_eq!(tokens[0]["kind"], "ScriptSectionStartTag");
        assert_eq!(tokens[0]["fullStart"], 0);
        assert_eq!(tokens.last().unwrap()["kind"], "EndOfFileToken");
    }

    #[test]
    fn test_parse_json_has_root_wrapper() {
        let value = parse_json("<?php $a;");
        assert!(value.get("SourceFile").is_some());
    }

    #[test]
    fn test_identical_values_produce_no_failures() {
        // compare logic boils down to Value equality
        let a = parse_json("<?php $a;");
        let b = parse_json("<?php $a;");
        assert_eq!(a, b);
        let c = parse_json("<?php $b;");
        assert_ne!(a, c);
    }
}
