//! Gaddis CLI: command-line driver for the pseudocode toolchain.

use clap::{Parser as ClapParser, Subcommand};
use gaddis_core::Value;
use gaddis_rt::{render_display_line, DebugSession, Host};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ANSI color helpers
fn red(s: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", s)
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{}\x1b[0m", s)
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{}\x1b[0m", s)
}
fn gray(s: &str) -> String {
    format!("\x1b[90m{}\x1b[0m", s)
}

#[derive(ClapParser)]
#[command(
    name = "gaddis",
    version,
    about = "Interpreter, debugger, and flowchart extractor for Gaddis-style pseudocode",
    help_template = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}

Examples:
  gaddis run program.psc               Run a program
  gaddis debug program.psc             Step through it, one statement per Enter
  gaddis flowchart program.psc         Print the flowchart graph as JSON
  gaddis fmt program.psc --write       Reindent the source in place
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pseudocode program to completion
    Run {
        /// Path to the source file
        #[arg()]
        file: PathBuf,
    },
    /// Step through a program, showing the active line and scope
    Debug {
        /// Path to the source file
        #[arg()]
        file: PathBuf,

        /// Emit one JSON object per step instead of pausing interactively
        #[arg(long)]
        json: bool,
    },
    /// Extract the flowchart graph as JSON
    Flowchart {
        /// Path to the source file
        #[arg()]
        file: PathBuf,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Reindent a source file by its block structure
    Fmt {
        /// Path to the source file
        #[arg()]
        file: PathBuf,

        /// Rewrite the file instead of printing to stdout
        #[arg(long)]
        write: bool,
    },
}

/// Console host: Display to stdout, Input from stdin, stop on Ctrl-C.
struct ConsoleHost {
    stop: Arc<AtomicBool>,
}

impl Host for ConsoleHost {
    fn display(&self, values: &[Value]) {
        println!("{}", render_display_line(values));
    }

    fn input(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
        }
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

fn read_source(file: &PathBuf) -> Result<String, String> {
    std::fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {}", file.display(), e))
}

fn report(err: &gaddis_rt::Error) -> ExitCode {
    if err.is_stopped() {
        eprintln!("{}", yellow("Program stopped by user."));
        return ExitCode::from(130);
    }
    let message = match err.line() {
        Some(line) => format!("Error on line {}: {}", line, err),
        None => format!("Error: {}", err),
    };
    eprintln!("{}", red(&message));
    ExitCode::FAILURE
}

fn stop_flag() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst)).ok();
    stop
}

fn cmd_run(file: &PathBuf) -> ExitCode {
    let source = match read_source(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", red(&e));
            return ExitCode::FAILURE;
        }
    };
    let host = ConsoleHost { stop: stop_flag() };
    match gaddis_rt::interpret(&source, &host) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// Interactive pacing for debug mode: Enter steps, `c` runs to the end,
/// `q` stops.
enum Pace {
    Step,
    Continue,
    Quit,
}

fn read_pace() -> Pace {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).unwrap_or(0) == 0 {
        return Pace::Quit;
    }
    match line.trim() {
        "c" => Pace::Continue,
        "q" => Pace::Quit,
        _ => Pace::Step,
    }
}

fn print_step(step: &gaddis_rt::Step) {
    let scope: Vec<String> = step
        .scope
        .iter()
        .map(|(name, value)| format!("{} = {}", name, value.to_display_string()))
        .collect();
    println!(
        "{} {:>4}  {}",
        cyan("line"),
        step.line,
        gray(&format!("{{{}}}", scope.join(", ")))
    );
}

fn cmd_debug(file: &PathBuf, json: bool) -> ExitCode {
    let source = match read_source(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", red(&e));
            return ExitCode::FAILURE;
        }
    };
    let host: Arc<dyn Host> = Arc::new(ConsoleHost { stop: stop_flag() });
    let mut session: DebugSession = match gaddis_rt::debug(&source, host) {
        Ok(s) => s,
        Err(err) => return report(&err),
    };
    let mut paused = !json;
    while let Some(step) = session.next() {
        if json {
            match serde_json::to_string(&step) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("{}", red(&format!("cannot encode step: {}", e)));
                    break;
                }
            }
        } else {
            print_step(&step);
        }
        if paused {
            match read_pace() {
                Pace::Step => {}
                Pace::Continue => paused = false,
                Pace::Quit => {
                    session.request_stop();
                    break;
                }
            }
        }
    }
    match session.finish() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&gaddis_rt::Error::Runtime(err)),
    }
}

fn cmd_flowchart(file: &PathBuf, output: Option<&PathBuf>) -> ExitCode {
    let source = match read_source(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", red(&e));
            return ExitCode::FAILURE;
        }
    };
    let program = match gaddis_compiler::compile(&source) {
        Ok(p) => p,
        Err(err) => return report(&gaddis_rt::Error::Compile(err)),
    };
    let graph = gaddis_compiler::flowchart::build(&program);
    let json = match serde_json::to_string_pretty(&graph) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("{}", red(&format!("cannot encode flowchart: {}", e)));
            return ExitCode::FAILURE;
        }
    };
    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("{}", red(&format!("cannot write {}: {}", path.display(), e)));
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        None => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
    }
}

fn cmd_fmt(file: &PathBuf, write: bool) -> ExitCode {
    let source = match read_source(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", red(&e));
            return ExitCode::FAILURE;
        }
    };
    let formatted = gaddis_compiler::formatter::format(&source);
    if write {
        if let Err(e) = std::fs::write(file, formatted) {
            eprintln!("{}", red(&format!("cannot write {}: {}", file.display(), e)));
            return ExitCode::FAILURE;
        }
        ExitCode::SUCCESS
    } else {
        print!("{}", formatted);
        ExitCode::SUCCESS
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run { file } => cmd_run(&file),
        Commands::Debug { file, json } => cmd_debug(&file, json),
        Commands::Flowchart { file, output } => cmd_flowchart(&file, output.as_ref()),
        Commands::Fmt { file, write } => cmd_fmt(&file, write),
    }
}
