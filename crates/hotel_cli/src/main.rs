//! Hotel front-desk command-line interface.
//!
//! ```bash
//! # Open (or create) the database and start the menu
//! hotel --db hotel.sqlite3
//!
//! # Seed hotels and staff first, print reports as JSON
//! hotel --init-sql seed.sql --output json
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

mod formatter;
mod menu;
mod prompt;

use formatter::OutputFormat;
use hotel_core::{HotelReports, HotelService, SqlHotelRepository};
use menu::Menu;
use prompt::{Prompter, Terminal};

/// Hotel front-desk menu over a SQLite database
#[derive(Parser, Debug)]
#[command(name = "hotel", version, about = "Interactive hotel management menu")]
struct Args {
    /// Database file, created and migrated on first use
    #[arg(short = 'd', long, default_value = "hotel.sqlite3", env = "HOTEL_DB_PATH")]
    db: PathBuf,

    /// SQL script run once after opening (e.g. hotel and staff rows)
    #[arg(long, value_name = "FILE", env = "HOTEL_INIT_SQL")]
    init_sql: Option<PathBuf>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, value_name = "DIR", env = "HOTEL_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "HOTEL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Report output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    output: OutputFormatArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Bordered table
    Table,
    /// Array of JSON objects
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

impl Args {
    fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(hotel_core::default_log_level())
    }
}

/// Prints a status prefix and flushes so it shows before the slow step.
fn announce(out: &mut impl Write, text: &str) -> io::Result<()> {
    write!(out, "{text}")?;
    out.flush()
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    if let Some(log_dir) = &args.log_dir {
        hotel_core::init_logging(args.log_level(), log_dir).context("failed to start logging")?;
    }

    announce(&mut io::stdout(), "Connecting to database...")?;
    let mut conn = hotel_core::open_db(&args.db)
        .with_context(|| format!("cannot open database `{}`", args.db.display()))?;
    println!("Done");

    if let Some(script) = &args.init_sql {
        hotel_core::load_script(&mut conn, script)
            .with_context(|| format!("cannot load `{}`", script.display()))?;
        println!("Loaded {}", script.display());
    }

    let service = HotelService::new(
        SqlHotelRepository::from_connection(&conn),
        HotelReports::from_connection(&conn),
    );
    let terminal = Terminal::new().context("cannot open terminal")?;
    let prompter = Prompter::new(terminal, io::stdout());
    Menu::new(&service, prompter, args.output.into())
        .run()
        .context("terminal I/O failed")?;

    announce(&mut io::stdout(), "Disconnecting from database...")?;
    drop(service);
    conn.close()
        .map_err(|(_, err)| err)
        .context("failed to close database")?;
    println!("Done\n\nBye !");
    info!("event=app_exit module=cli status=ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{announce, Args};
    use clap::Parser;
    use std::io::{self, Write};

    #[derive(Default)]
    struct Recorder {
        written: Vec<u8>,
        flushed: usize,
    }

    impl Write for Recorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushed = self.written.len();
            Ok(())
        }
    }

    #[test]
    fn log_level_falls_back_to_build_default() {
        let args = Args::try_parse_from(["hotel", "--log-dir", "logs"]).unwrap();
        if std::env::var_os("HOTEL_LOG_LEVEL").is_none() {
            assert_eq!(args.log_level(), hotel_core::default_log_level());
        }

        let args = Args::try_parse_from(["hotel", "--log-level", "warn"]).unwrap();
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn announce_flushes_the_status_prefix() {
        let mut out = Recorder::default();
        announce(&mut out, "Connecting to database...").unwrap();
        assert_eq!(out.written, b"Connecting to database...");
        assert_eq!(out.flushed, out.written.len());
    }
}
