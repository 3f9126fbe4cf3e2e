//! CLI argument parsing.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "salesperson")]
#[command(about = "Sales board client — live board, sale reports, history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join the live board: print every event, send each stdin line as a sale
    Join {
        /// Salesperson number shown on the board
        #[arg(value_name = "CLIENT_ID", allow_negative_numbers = true)]
        client_id: i64,
    },

    /// Report a sale over HTTP (needs BOARD_USERNAME and BOARD_PASSWORD)
    Report {
        /// Sale description
        #[arg(value_name = "MESSAGE", required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Print the board history, oldest first
    History,
}

impl Commands {
    /// Words of a `report` message joined back into one line.
    pub fn report_message(words: &[String]) -> String {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_join() {
        let cli = Cli::try_parse_from(["salesperson", "join", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Join { client_id: 3 }));
    }

    #[test]
    fn join_requires_integer_id() {
        assert!(Cli::try_parse_from(["salesperson", "join", "abc"]).is_err());
    }

    #[test]
    fn report_joins_words() {
        let cli = Cli::try_parse_from(["salesperson", "report", "5", "units"]).unwrap();
        let Commands::Report { message } = cli.command else {
            panic!("expected report");
        };
        assert_eq!(Commands::report_message(&message), "5 units");
    }

    #[test]
    fn report_requires_message() {
        assert!(Cli::try_parse_from(["salesperson", "report"]).is_err());
    }
}
