//! Command-line front end: one-shot verbs for scripting and an interactive
//! session that saves its settings on exit.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use reckoner::{Error, Evaluator, Settings};

#[derive(Parser)]
#[command(
    name = "reckoner",
    version,
    about = "Scientific expression calculator"
)]
struct Cli {
    /// Angle unit for this run (deg, rad or grad); overrides the saved one
    #[arg(long)]
    angle_unit: Option<String>,

    /// Rounding precision for this run, in decimal digits
    #[arg(long)]
    precision: Option<u32>,

    /// Without a command, an interactive session starts
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate an expression
    Evaluate {
        /// The expression, quoted: "2 + 3 * 4"
        expression: String,
    },
    /// Add two numbers
    Add {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
    /// Subtract the second number from the first
    Subtract {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
    /// Multiply two numbers
    Multiply {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
    /// Divide the first number by the second
    Divide {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
    /// Raise the first number to the second
    Power {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
    /// Square root of a number
    Sqrt {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Sine of an angle in the session angle unit
    Sin {
        #[arg(allow_negative_numbers = true)]
        angle: f64,
    },
    /// Cosine of an angle in the session angle unit
    Cos {
        #[arg(allow_negative_numbers = true)]
        angle: f64,
    },
    /// Tangent of an angle in the session angle unit
    Tan {
        #[arg(allow_negative_numbers = true)]
        angle: f64,
    },
    /// Base-10 logarithm of a number
    Log {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Natural logarithm of a number
    Ln {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// e raised to a number
    Exp {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Show the session settings, or change and save them
    Config {
        /// New angle unit to save (deg, rad or grad)
        #[arg(long)]
        angle_unit: Option<String>,
        /// New rounding precision to save
        #[arg(long)]
        precision: Option<u32>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let settings_path = Settings::default_path();
    let mut settings = match settings_path.as_deref() {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    if let Some(word) = cli.angle_unit.as_deref() {
        match word.parse() {
            Ok(unit) => settings.angle_unit = unit,
            Err(err) => return fail(&err),
        }
    }
    if let Some(digits) = cli.precision {
        settings.precision = digits;
    }

    let mut eval = Evaluator::new();
    settings.apply(&mut eval);
    log::debug!(
        "session: angle unit {}, precision {}",
        eval.angle_unit(),
        eval.precision()
    );

    // Direct operations answer unrounded; round them here so the output
    // matches what an evaluated expression would show.
    match cli.command {
        None => repl(&mut eval, settings_path.as_deref()),
        Some(Command::Evaluate { expression }) => finish(eval.evaluate(&expression)),
        Some(Command::Add { a, b }) => finish(Ok(eval.round(eval.add(a, b)))),
        Some(Command::Subtract { a, b }) => finish(Ok(eval.round(eval.subtract(a, b)))),
        Some(Command::Multiply { a, b }) => finish(Ok(eval.round(eval.multiply(a, b)))),
        Some(Command::Divide { a, b }) => finish(eval.divide(a, b).map(|v| eval.round(v))),
        Some(Command::Power { a, b }) => finish(Ok(eval.round(eval.power(a, b)))),
        Some(Command::Sqrt { value }) => finish(Ok(eval.round(eval.sqrt(value)))),
        Some(Command::Sin { angle }) => finish(Ok(eval.round(eval.sin(angle)))),
        Some(Command::Cos { angle }) => finish(Ok(eval.round(eval.cos(angle)))),
        Some(Command::Tan { angle }) => finish(Ok(eval.round(eval.tan(angle)))),
        Some(Command::Log { value }) => finish(Ok(eval.round(eval.log(value)))),
        Some(Command::Ln { value }) => finish(Ok(eval.round(eval.ln(value)))),
        Some(Command::Exp { value }) => finish(Ok(eval.round(eval.exp(value)))),
        Some(Command::Config {
            angle_unit,
            precision,
        }) => run_config(settings_path.as_deref(), settings, angle_unit, precision),
    }
}

/// The `config` command: print the settings, saving first if any changed.
fn run_config(
    path: Option<&Path>,
    mut settings: Settings,
    angle_unit: Option<String>,
    precision: Option<u32>,
) -> ExitCode {
    let mut changed = false;
    if let Some(word) = angle_unit {
        match word.parse() {
            Ok(unit) => {
                settings.angle_unit = unit;
                changed = true;
            }
            Err(err) => return fail(&err),
        }
    }
    if let Some(digits) = precision {
        settings.precision = digits;
        changed = true;
    }

    if changed {
        let Some(path) = path else {
            eprintln!("{}", "no configuration directory on this system".red());
            return ExitCode::FAILURE;
        };
        if let Err(err) = settings.save(path) {
            eprintln!(
                "{}",
                format!("could not save settings to {}: {}", path.display(), err).red()
            );
            return ExitCode::FAILURE;
        }
        log::info!("settings saved to {}", path.display());
    }

    println!("angle unit: {}", settings.angle_unit);
    println!("precision: {}", settings.precision);
    ExitCode::SUCCESS
}

/// The interactive session. Settings changed here are saved when it ends.
fn repl(eval: &mut Evaluator, settings_path: Option<&Path>) -> ExitCode {
    println!(
        "reckoner {} (type 'help' for commands, 'quit' to leave)",
        env!("CARGO_PKG_VERSION")
    );
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().ok();
        let Some(line) = lines.next() else { break };
        let Ok(line) = line else { break };
        if !handle_line(line.trim(), eval) {
            break;
        }
    }

    if let Some(path) = settings_path {
        let settings = Settings::new(eval.angle_unit(), eval.precision());
        if let Err(err) = settings.save(path) {
            log::warn!("could not save settings to {}: {}", path.display(), err);
        }
    }
    ExitCode::SUCCESS
}

/// One line of the interactive session. Returns false when it is over.
fn handle_line(line: &str, eval: &mut Evaluator) -> bool {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return true;
    };
    match first.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => return false,
        "help" | "?" => print_help(),
        "mode" => match words.next() {
            None => println!("angle unit: {}", eval.angle_unit()),
            Some(word) => match word.parse() {
                Ok(unit) => {
                    eval.set_angle_unit(unit);
                    println!("angle unit: {}", unit);
                }
                Err(err) => report(&err),
            },
        },
        "precision" => match words.next() {
            None => println!("precision: {}", eval.precision()),
            Some(word) => match word.parse() {
                Ok(digits) => {
                    eval.set_precision(digits);
                    println!("precision: {}", eval.precision());
                }
                Err(_) => report(&Error::Syntax(format!(
                    "'{}' is not a number of digits",
                    word
                ))),
            },
        },
        "mc" => {
            eval.clear_memory();
            println!("memory cleared");
        }
        "mr" => println!("{}", format_value(eval.memory())),
        "m+" => match memory_operand(words.next(), eval) {
            Ok(value) => {
                eval.memory_add(value);
                println!("memory: {}", format_value(eval.memory()));
            }
            Err(err) => report(&err),
        },
        "m-" => match memory_operand(words.next(), eval) {
            Ok(value) => {
                eval.memory_subtract(value);
                println!("memory: {}", format_value(eval.memory()));
            }
            Err(err) => report(&err),
        },
        _ => match eval.evaluate(line) {
            Ok(value) => println!("{}", format_value(value)),
            Err(err) => report(&err),
        },
    }
    true
}

/// Operand of `m+` and `m-`: an explicit number, or the last answer.
fn memory_operand(word: Option<&str>, eval: &Evaluator) -> Result<f64, Error> {
    match word {
        Some(text) => text
            .parse()
            .map_err(|_| Error::Syntax(format!("'{}' is not a number", text))),
        None => Ok(eval.last_answer()),
    }
}

fn print_help() {
    println!("Enter an expression to evaluate it, or one of:");
    println!("  mode [deg|rad|grad]   show or set the angle unit");
    println!("  precision [digits]    show or set the rounding precision");
    println!("  mr                    recall the memory register");
    println!("  mc                    clear the memory register");
    println!("  m+ [number]           add to memory (default: the last answer)");
    println!("  m- [number]           subtract from memory (default: the last answer)");
    println!("  quit                  leave the session");
}

/// Render a result for the console: plain text for everyday magnitudes,
/// scientific notation toward the extremes.
fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && (magnitude < 1e-10 || magnitude > 1e10) {
        format!("{:.6e}", value)
    } else {
        value.to_string()
    }
}

fn finish(result: Result<f64, Error>) -> ExitCode {
    match result {
        Ok(value) => {
            println!("{}", format_value(value));
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err),
    }
}

/// Print an error without ending the session.
fn report(err: &Error) {
    eprintln!("{}", err.to_string().red());
}

fn fail(err: &Error) -> ExitCode {
    report(err);
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_magnitudes_print_plainly() {
        assert_eq!(format_value(14.0), "14");
        assert_eq!(format_value(-2.5), "-2.5");
        assert_eq!(format_value(0.0), "0");
    }

    #[test]
    fn extreme_magnitudes_go_scientific() {
        assert_eq!(format_value(2.5e15), "2.500000e15");
        assert_eq!(format_value(-3e-12), "-3.000000e-12");
    }

    #[test]
    fn non_finite_values_print_their_names() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn memory_operand_defaults_to_the_last_answer() {
        let mut eval = Evaluator::new();
        eval.evaluate("6*7").unwrap();
        assert_eq!(memory_operand(None, &eval).unwrap(), 42.0);
        assert_eq!(memory_operand(Some("2.5"), &eval).unwrap(), 2.5);
        assert!(memory_operand(Some("nope"), &eval).is_err());
    }

    #[test]
    fn session_lines_drive_the_evaluator() {
        let mut eval = Evaluator::new();
        assert!(handle_line("1+1", &mut eval));
        assert_eq!(eval.last_answer(), 2.0);
        assert!(handle_line("mode rad", &mut eval));
        assert_eq!(eval.angle_unit(), reckoner::AngleUnit::Radians);
        assert!(handle_line("precision 3", &mut eval));
        assert_eq!(eval.precision(), 3);
        assert!(handle_line("m+ 5", &mut eval));
        assert!(handle_line("m-", &mut eval));
        assert_eq!(eval.memory(), 3.0);
        assert!(handle_line("", &mut eval));
        assert!(!handle_line("quit", &mut eval));
    }
}
