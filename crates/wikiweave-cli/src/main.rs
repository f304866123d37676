use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, process};

struct Args {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn parse_args(argv: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut output = None;

    let mut iter = argv.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let path = iter.next().ok_or_else(|| format!("{arg} needs a path"))?;
                output = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(String::new()),
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("unknown option: {arg}"));
            }
            _ => {
                if input.replace(PathBuf::from(arg)).is_some() {
                    return Err("more than one input file given".to_string());
                }
            }
        }
    }

    Ok(Args { input, output })
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut markup = String::new();
            std::io::stdin()
                .read_to_string(&mut markup)
                .context("failed to read stdin")?;
            Ok(markup)
        }
    }
}

fn write_output(output: Option<&Path>, html: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, html)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{html}");
            Ok(())
        }
    }
}

fn main() {
    let argv: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("Error: {message}");
            }
            eprintln!("Usage: wikiweave [INPUT] [-o OUTPUT]");
            eprintln!("Converts Creole markup to XHTML; reads stdin without INPUT.");
            process::exit(if message.is_empty() { 0 } else { 1 });
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let markup = read_input(args.input.as_deref())?;
    let html = wikiweave_engine::convert(&markup);
    write_output(args.output.as_deref(), &html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_a_file_to_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.creole");
        let output = dir.path().join("page.html");
        fs::write(&input, "**Hello**").unwrap();

        let markup = read_input(Some(&input)).unwrap();
        let html = wikiweave_engine::convert(&markup);
        write_output(Some(&output), &html).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "<p><strong>Hello</strong></p>\n\n"
        );
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.creole");
        assert!(read_input(Some(&missing)).is_err());
    }

    #[test]
    fn rejects_conflicting_arguments() {
        let argv = vec!["a.creole".to_string(), "b.creole".to_string()];
        assert!(parse_args(&argv).is_err());

        let argv = vec!["--output".to_string()];
        assert!(parse_args(&argv).is_err());
    }

    #[test]
    fn parses_input_and_output_paths() {
        let argv = vec![
            "page.creole".to_string(),
            "-o".to_string(),
            "page.html".to_string(),
        ];
        let args = parse_args(&argv).unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("page.creole")));
        assert_eq!(args.output.as_deref(), Some(Path::new("page.html")));
    }
}
