use clap::{Parser, Subcommand};
use richdoc::Document;
use richdoc::html;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize a JSON document to HTML
    Export {
        /// Input file (reads stdin when omitted)
        input: Option<PathBuf>,
        /// Emit the bare fragment instead of a standalone page
        #[arg(long)]
        fragment: bool,
    },
    /// Check a JSON document for structural problems
    Validate {
        /// Input file (reads stdin when omitted)
        input: Option<PathBuf>,
    },
    /// Print the built-in welcome document
    Welcome {
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Export { input, fragment } => export_command(input.as_deref(), *fragment),
        Commands::Validate { input } => validate_command(input.as_deref()),
        Commands::Welcome { json } => welcome_command(*json),
    }
}

fn read_input(input: Option<&std::path::Path>) -> String {
    match input {
        Some(path) => match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        },
        None => {
            let mut contents = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut contents) {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
            contents
        }
    }
}

fn export_command(input: Option<&std::path::Path>, fragment: bool) {
    let contents = read_input(input);
    let doc = match Document::from_json(&contents) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    if fragment {
        println!("{}", html::to_html(&doc));
    } else {
        println!("{}", html::to_html_document(&doc));
    }
}

fn validate_command(input: Option<&std::path::Path>) {
    let contents = read_input(input);
    match Document::from_json(&contents) {
        Ok(doc) => {
            println!("OK: {} block(s)", doc.blocks.len());
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn welcome_command(json: bool) {
    let doc = Document::welcome();
    if json {
        match doc.to_json() {
            Ok(out) => println!("{out}"),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", html::to_html(&doc));
    }
}
