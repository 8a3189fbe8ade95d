//! Subcommands and their execution.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use tracing::info;

use widerow_driver::{
    ColumnRange, Entry, EntryColumn, InstrumentationHook, RowUpdate, Utf8Codec, WideRowDriver,
};
use widerow_engine::ColumnFamilySession;

/// Driver over UTF-8 row keys, names and values.
pub type StringDriver<S, H> = WideRowDriver<S, Utf8Codec, Utf8Codec, Utf8Codec, H>;

/// A subcommand.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read the columns of a row
    Get {
        /// Row key
        row: String,

        /// Return columns in descending name order
        #[arg(long)]
        desc: bool,

        /// First column name to return (inclusive)
        #[arg(long, value_name = "NAME")]
        from: Option<String>,

        /// Last column name to return (inclusive)
        #[arg(long, value_name = "NAME")]
        to: Option<String>,

        /// Maximum number of columns
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },

    /// Insert or overwrite columns
    Put {
        /// Row key
        row: String,

        /// Columns as NAME=VALUE or NAME=VALUE@TTL_SECONDS
        #[arg(required = true, value_name = "NAME=VALUE[@TTL]")]
        columns: Vec<String>,
    },

    /// Delete columns
    Delete {
        /// Row key
        row: String,

        /// Column names
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },

    /// Delete a whole row
    Drop {
        /// Row key
        row: String,
    },
}

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Columns read.
    Entries(Vec<Entry<String, String, String>>),
    /// Mutations applied to a row.
    Applied {
        /// Row mutated.
        row_key: String,
        /// Number of intents in the batch.
        mutations: usize,
    },
}

/// Parses `NAME=VALUE` or `NAME=VALUE@TTL`.
///
/// The suffix after the last `@` is a ttl only if it is a positive integer,
/// so values such as e-mail addresses are kept whole.
pub fn parse_column(arg: &str) -> Result<EntryColumn<String, String>> {
    let Some((name, rest)) = arg.split_once('=') else {
        bail!("expected NAME=VALUE, got '{arg}'");
    };
    if name.is_empty() {
        bail!("column name is empty in '{arg}'");
    }

    let column = match rest.rsplit_once('@') {
        Some((value, ttl)) => match ttl.parse::<u32>() {
            Ok(0) => bail!("ttl must be positive in '{arg}'"),
            Ok(ttl) => EntryColumn::new(name, value).with_ttl(ttl),
            Err(_) => EntryColumn::new(name, rest),
        },
        None => EntryColumn::new(name, rest),
    };
    Ok(column)
}

/// Executes `command` against `driver`.
pub async fn execute<S, H>(
    driver: &StringDriver<S, H>,
    command: &Command,
    default_limit: u32,
) -> Result<Outcome>
where
    S: ColumnFamilySession,
    H: InstrumentationHook,
{
    match command {
        Command::Get {
            row,
            desc,
            from,
            to,
            limit,
        } => {
            let range = ColumnRange {
                ascending: !desc,
                from: from.clone(),
                to: to.clone(),
                limit: limit.unwrap_or(default_limit),
            };
            let entries = driver
                .fetch_range(row, &range)
                .await
                .with_context(|| format!("reading row '{row}'"))?;
            info!(row = %row, columns = entries.len(), "read row");
            Ok(Outcome::Entries(entries))
        }
        Command::Put { row, columns } => {
            let insert = columns
                .iter()
                .map(|arg| parse_column(arg))
                .collect::<Result<Vec<_>>>()?;
            let update = RowUpdate {
                insert,
                ..RowUpdate::new(row.clone())
            };
            apply(driver, update).await
        }
        Command::Delete { row, names } => {
            let update = RowUpdate {
                remove: names.clone(),
                ..RowUpdate::new(row.clone())
            };
            apply(driver, update).await
        }
        Command::Drop { row } => apply(driver, RowUpdate::new(row.clone()).drop_row()).await,
    }
}

async fn apply<S, H>(
    driver: &StringDriver<S, H>,
    update: RowUpdate<String, String, String>,
) -> Result<Outcome>
where
    S: ColumnFamilySession,
    H: InstrumentationHook,
{
    let mutations = usize::from(update.drop) + update.remove.len() + update.insert.len();
    driver
        .apply(&update)
        .await
        .with_context(|| format!("updating row '{}'", update.row_key))?;
    info!(row = %update.row_key, mutations, "updated row");
    Ok(Outcome::Applied {
        row_key: update.row_key,
        mutations,
    })
}
