mod env_file;

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use env_file::{EnvFile, EnvFileError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration file {} not found", .0.display())]
    FileNotFound(PathBuf),
    #[error("key '{key}' not found in {}", .file.display())]
    KeyNotFound { key: String, file: PathBuf },
    #[error("VALUE is required unless --stdin is used")]
    MissingValue,
    #[error("could not read from stdin: {0}")]
    Stdin(io::Error),
    #[error("operation cancelled")]
    Cancelled,
    #[error(transparent)]
    EnvFile(#[from] EnvFileError),
}

#[derive(Parser, Debug)]
#[command(name = "envcli", about = "Edit .env configuration files")]
struct Cli {
    #[arg(
        long,
        short = 'f',
        env = "ENVCLI_FILE",
        default_value = ".env",
        global = true
    )]
    file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Set {
        key: String,
        value: Option<String>,
        #[arg(long, help = "Read the value from the first line of stdin")]
        stdin: bool,
    },
    Get {
        key: String,
        #[arg(long, short = 's', help = "Print sensitive values instead of masking")]
        show: bool,
    },
    List {
        #[arg(long)]
        show_values: bool,
        #[arg(long, short = 'g')]
        grep: Option<String>,
    },
    Delete {
        key: String,
        #[arg(long, short = 'y')]
        force: bool,
    },
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Set { key, value, stdin } => run_set(&cli.file, &key, value, stdin),
        Command::Get { key, show } => run_get(&cli.file, &key, show),
        Command::List { show_values, grep } => run_list(&cli.file, show_values, grep.as_deref()),
        Command::Delete { key, force } => run_delete(&cli.file, &key, force),
    }
}

fn run_set(file: &Path, key: &str, value: Option<String>, from_stdin: bool) -> Result<(), CliError> {
    let value = if from_stdin {
        read_stdin_line()?
    } else {
        value.ok_or(CliError::MissingValue)?
    };

    let mut env = EnvFile::load(file)?;
    env.set(key, &value);
    env.save(file)?;
    println!("set {key} in {}", file.display());
    eprintln!("note: restart the service to apply the change");
    Ok(())
}

fn run_get(file: &Path, key: &str, show: bool) -> Result<(), CliError> {
    let env = load_existing(file)?;
    let Some(value) = env.get(key) else {
        return Err(CliError::KeyNotFound {
            key: key.to_owned(),
            file: file.to_path_buf(),
        });
    };
    println!("{}", render_pair(key, value, show));
    Ok(())
}

fn run_list(file: &Path, show_values: bool, grep: Option<&str>) -> Result<(), CliError> {
    let env = load_existing(file)?;
    let needle = grep.map(str::to_lowercase);
    let mut matched = 0_usize;
    for (key, value) in env.entries() {
        if let Some(needle) = &needle {
            if !key.to_lowercase().contains(needle) {
                continue;
            }
        }
        matched = matched.saturating_add(1);
        if show_values {
            println!("{}", render_pair(key, value, false));
        } else {
            println!("{key}");
        }
    }
    if matched == 0 {
        match grep {
            Some(pattern) => eprintln!("no keys match pattern: {pattern}"),
            None => eprintln!("no entries in {}", file.display()),
        }
    }
    Ok(())
}

fn run_delete(file: &Path, key: &str, force: bool) -> Result<(), CliError> {
    let mut env = load_existing(file)?;
    if !force && !confirm(&format!("delete '{key}' from {}?", file.display()))? {
        return Err(CliError::Cancelled);
    }
    if !env.remove(key) {
        println!("key '{key}' not found in {}; nothing to delete", file.display());
        return Ok(());
    }
    env.save(file)?;
    println!("deleted {key} from {}", file.display());
    eprintln!("note: restart the service to apply the change");
    Ok(())
}

fn load_existing(file: &Path) -> Result<EnvFile, CliError> {
    if !file.is_file() {
        return Err(CliError::FileNotFound(file.to_path_buf()));
    }
    Ok(EnvFile::load(file)?)
}

/// Masks sensitive values unless `reveal` is set.
fn render_pair(key: &str, value: &str, reveal: bool) -> String {
    if env_file::is_sensitive_key(key) && !reveal {
        format!("{key}=******** (masked)")
    } else {
        format!("{key}={value}")
    }
}

/// Reads the value from the first line of stdin, so secrets never appear in
/// `ps` output or shell history.
fn read_stdin_line() -> Result<String, CliError> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(CliError::Stdin)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn confirm(prompt: &str) -> Result<bool, CliError> {
    eprint!("{prompt} [y/N] ");
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(CliError::Stdin)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
