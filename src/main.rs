//! stemma CLI
//!
//! Usage:
//!   stemma [OPTIONS] [FILE]
//!
//! Options:
//!   -r, --root <NAME>      Person to center the tree on
//!   -d, --depth <N>        Generations of descent to show
//!   -e, --everyone         Show everyone in the dataset
//!   -s, --settings <FILE>  Settings file (TOML format)
//!   --state <TOKEN>        Restore a saved view
//!   -g, --grammar          Show input format reference
//!   -h, --help             Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use stemma::layout::TextMetrics;
use stemma::renderer::render_svg;
use stemma::viewstate::{self, ViewState};
use stemma::{draw, load, Filter, RenderError, Settings};

#[derive(Parser)]
#[command(name = "stemma")]
#[command(about = "Genealogical tree layout and rendering")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Person to center the tree on (default: the settings file's root, or
    /// the first person in the data)
    #[arg(short, long)]
    root: Option<String>,

    /// Generations of descent to show (0: ancestors only; default: all
    /// blood relatives)
    #[arg(short, long, conflicts_with = "everyone")]
    depth: Option<u32>,

    /// Show everyone, in-laws' families included
    #[arg(short, long)]
    everyone: bool,

    /// Settings file (TOML format)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Restore a view-state token (overrides --root/--depth/--everyone)
    #[arg(long, conflicts_with_all = ["root", "depth", "everyone"])]
    state: Option<String>,

    /// Print this view's state token to stderr
    #[arg(long)]
    emit_state: bool,

    /// Show input format reference
    #[arg(short, long)]
    grammar: bool,

    /// Debug mode: dump the computed layout to stderr
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.grammar {
        print_grammar();
        return ExitCode::SUCCESS;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return ExitCode::SUCCESS;
    }

    let settings = match &cli.settings {
        Some(path) => match Settings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    let (requested_root, filter) = match &cli.state {
        Some(token) => match viewstate::decode(token) {
            Ok(state) => (Some(state.root), state.filter),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let filter = if cli.everyone {
                Filter::everyone()
            } else {
                match cli.depth {
                    Some(depth) => Filter::depth(depth),
                    None => Filter::blood(),
                }
            };
            (cli.root.clone(), filter)
        }
    };

    let family = match load(&source) {
        Ok(family) => family,
        Err(RenderError::Parse(e)) => {
            eprint!("{}", e.format(&source, &filename));
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let root = requested_root
        .or(settings.default_root.clone())
        .or_else(|| family.default_root().map(str::to_string));
    let Some(root) = root else {
        eprintln!("Error: the dataset declares no persons");
        return ExitCode::FAILURE;
    };

    let metrics = TextMetrics::new(&family.doc);
    let layout_config = settings.layout_config();
    let (layout, scene) = match draw(&family, &root, filter, &layout_config, &metrics) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.debug {
        eprintln!("=== Layout Debug ===");
        for (name, point) in layout.iter() {
            eprintln!("[{}] x={:.1} y={:.1}", name, point.x, point.y);
        }
        eprintln!("====================");
    }
    if cli.emit_state {
        let state = ViewState {
            root: root.clone(),
            filter,
        };
        eprintln!("{}", viewstate::encode(&state));
    }

    let svg = render_svg(
        &scene,
        &family.doc,
        &family.graph,
        &metrics,
        &settings.svg_config(),
    );
    println!("{}", svg);
    ExitCode::SUCCESS
}

fn print_intro() {
    println!(
        r#"stemma - genealogical tree layout and rendering

USAGE:
    stemma [OPTIONS] [FILE]
    cat family.txt | stemma --root "Leopold" > tree.svg

OPTIONS:
    -r, --root <NAME>      Person to center the tree on
    -d, --depth <N>        Generations of descent (0: ancestors only)
    -e, --everyone         Show everyone in the dataset
    -s, --settings <FILE>  Settings file (TOML)
    --state <TOKEN>        Restore a saved view
    --emit-state           Print this view's state token to stderr
    -g, --grammar          Show input format reference
    -h, --help             Print help

QUICK START:
    printf 'Abe + Mona\n c: Homer\n' | stemma -r Homer > tree.svg

Run --grammar for the input format reference."#
    );
}

fn print_grammar() {
    println!(
        r#"FAMILY DESCRIPTION FORMAT
=========================

RECORDS
-------
A record is a key line followed by indented attribute lines:

    Homer Simpson           a person
     n: safety inspector
     l: 1956-
     p: homer.png

    Homer Simpson + Marge Bouvier     a union (couple)
     n: married at Shotgun Pete's
     c: Bart Simpson, Lisa Simpson, Maggie Simpson

KEYS
----
A person key is a bare name. A union key is two names joined by ' + '.
Names may not contain commas. A '#' suffix disambiguates two people with
the same name (the suffix is never displayed): 'John Smith#elder'.
'?' or '...' stands for an unknown individual; each occurrence is a
distinct person.

ATTRIBUTES
----------
Attribute lines start with one space, then a letter and ': '.

    person:  n: <note>            free text, URLs included
             l: <birth>-<death>   either side may be empty
             p: <file>            photo, relative to the photo directory
    union:   n: <note>            shown with the partner's details
             c: <a>, <b>, ...     children, in display order

COMMENTS
--------
Blank lines and lines whose first non-space character is '#' are ignored.

STRUCTURE
---------
The described family must form a single connected tree: everyone reachable
from everyone, no relationship loops, and at most one union on each side
of a person. Violations are reported with the offending names."#
    );
}
