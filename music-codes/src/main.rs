//! music-codes CLI - Inspect and allocate ISRC, ISWC and label codes
//!
//! # Commands
//!
//! ```bash
//! music-codes inspect "gb-a1b-11-00036 isrc"   # JSON report of a code
//! music-codes validate T-034.524.680-1         # Canonical form, exit 2 if invalid
//! music-codes format GBA1B1100036 --prefixed   # Reformat a code
//! music-codes next GB-A1B-11-99998 -n 3 --flip-year
//! music-codes previous LC-0100 -n 5
//! music-codes check-digit 034.524.680          # ISWC check digit of an id
//! ```
//!
//! The kind of code is detected from its shape unless `--kind` is given.

use clap::{Parser, Subcommand};
use music_codes::{check_digit_for, AnyCode, CodeKind, CodeReport, Direction, IsrcPolicy, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "music-codes")]
#[command(about = "Parse, validate, format and sequence ISRC, ISWC and label codes", long_about = None)]
struct Cli {
    /// Accept ISRC id 00000 as valid
    #[arg(long, global = true)]
    zero_ids_allowed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a JSON report of a code
    Inspect {
        /// Code to inspect
        code: String,

        /// Code kind: isrc, iswc or label (detected if not specified)
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<CodeKind>,
    },

    /// Print the canonical form of a valid code
    Validate {
        /// Code to validate
        code: String,

        /// Code kind: isrc, iswc or label (detected if not specified)
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<CodeKind>,
    },

    /// Reformat a code
    Format {
        /// Code to format
        code: String,

        /// Code kind: isrc, iswc or label (detected if not specified)
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<CodeKind>,

        /// Leave out separators
        #[arg(long)]
        undashed: bool,

        /// Prefix ISRCs with "ISRC "
        #[arg(long)]
        prefixed: bool,
    },

    /// Print the codes following a code
    Next {
        /// Starting code (not printed)
        code: String,

        /// Code kind: isrc, iswc or label (detected if not specified)
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<CodeKind>,

        /// Number of codes to print
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Roll ISRC ids over into the next year
        #[arg(long)]
        flip_year: bool,
    },

    /// Print the codes preceding a code
    Previous {
        /// Starting code (not printed)
        code: String,

        /// Code kind: isrc, iswc or label (detected if not specified)
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<CodeKind>,

        /// Number of codes to print
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Roll ISRC ids over into the previous year
        #[arg(long)]
        flip_year: bool,
    },

    /// Compute the ISWC check digit of a work id
    CheckDigit {
        /// Work id, plain or dotted (034.524.680)
        id: String,
    },
}

fn parse_kind(value: &str) -> Result<CodeKind, String> {
    CodeKind::from_name(value).ok_or_else(|| format!("unknown code kind '{}' (isrc, iswc, label)", value))
}

fn main() {
    // Load .env file (if present)
    let settings = Settings::from_env();
    init_tracing(&settings);

    for entry in &settings.ignored {
        tracing::warn!(setting = %entry, "ignoring unrecognized setting");
    }

    let cli = Cli::parse();

    let mut policy = settings.isrc_policy();
    policy.zero_ids_allowed |= cli.zero_ids_allowed;

    let result = match cli.command {
        Commands::Inspect { code, kind } => cmd_inspect(&code, kind, policy),
        Commands::Validate { code, kind } => cmd_validate(&code, kind, policy),
        Commands::Format {
            code,
            kind,
            undashed,
            prefixed,
        } => cmd_format(&code, kind, policy, !undashed, prefixed),
        Commands::Next {
            code,
            kind,
            count,
            flip_year,
        } => cmd_step(&code, kind, policy, Direction::Forward, count, flip_year),
        Commands::Previous {
            code,
            kind,
            count,
            flip_year,
        } => cmd_step(&code, kind, policy, Direction::Backward, count, flip_year),
        Commands::CheckDigit { id } => cmd_check_digit(&id),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Parse `raw` as `kind`, or as whatever kind its shape matches.
fn resolve(raw: &str, kind: Option<CodeKind>, policy: IsrcPolicy) -> Result<AnyCode, Box<dyn std::error::Error>> {
    match kind {
        Some(kind) => Ok(AnyCode::parse_as(kind, raw, policy)),
        None => AnyCode::detect(raw, policy)
            .ok_or_else(|| format!("'{}' is not a recognizable ISRC, ISWC or label code", raw.trim()).into()),
    }
}

fn cmd_inspect(raw: &str, kind: Option<CodeKind>, policy: IsrcPolicy) -> Result<(), Box<dyn std::error::Error>> {
    let code = resolve(raw, kind, policy)?;
    let report = CodeReport::new(&code, raw);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_validate(raw: &str, kind: Option<CodeKind>, policy: IsrcPolicy) -> Result<(), Box<dyn std::error::Error>> {
    let code = resolve(raw, kind, policy)?;

    match code.validate() {
        Ok(()) => {
            eprintln!("Valid {}", code.kind());
            println!("{}", code.canonical());
            Ok(())
        }
        Err(e) => {
            eprintln!("Invalid {}: {}", code.kind(), e);
            std::process::exit(2);
        }
    }
}

fn cmd_format(
    raw: &str,
    kind: Option<CodeKind>,
    policy: IsrcPolicy,
    dashed: bool,
    prefixed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let code = resolve(raw, kind, policy)?;
    code.validate()?;
    println!("{}", code.format(dashed, prefixed));
    Ok(())
}

fn cmd_step(
    raw: &str,
    kind: Option<CodeKind>,
    policy: IsrcPolicy,
    direction: Direction,
    count: usize,
    flip_year: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut code = resolve(raw, kind, policy)?;
    code.validate()?;

    for produced in 0..count {
        if !code.advance(direction, flip_year) {
            let reason = code.validate().err().map(|e| e.to_string()).unwrap_or_default();
            return Err(format!("sequence ended after {} code(s): {}", produced, reason).into());
        }
        println!("{}", code.canonical());
    }

    Ok(())
}

fn cmd_check_digit(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let digits = id.trim().replace('.', "");
    if digits.is_empty() || digits.len() > 9 {
        return Err(format!("'{}' is not a work id of at most 9 digits", id.trim()).into());
    }

    let padded = format!("{:0>9}", digits);
    let check = check_digit_for(&padded).ok_or_else(|| format!("'{}' is not a numeric work id", id.trim()))?;

    println!("{}", check);
    Ok(())
}
