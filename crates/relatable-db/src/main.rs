//! relatable CLI
//!
//! Command-line front-end for driving table operations: create from a
//! delimited file, insert, query, update, delete, schema alterations, and
//! export. Multi-column arguments are comma-separated lists; filter
//! fragments are taken as written and AND-joined.

use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use relatable_core::condition::{Condition, OrderBy};
use relatable_core::frame::Frame;
use relatable_core::types::SqlType;
use relatable_core::value::Value;
use relatable_db::flatfile;
use relatable_db::table::Table;

/// Table-oriented convenience layer over a relational database.
#[derive(Parser)]
#[command(name = "relatable")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Table to operate on.
    #[arg(short, long)]
    table: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the table from a delimited file, inferring column types.
    Create {
        /// File supplying the columns and sample rows.
        file: PathBuf,

        /// The file already carries its own identity column.
        #[arg(long)]
        id_included: bool,

        /// Also insert the file's rows after creating the table.
        #[arg(long)]
        load: bool,
    },

    /// Insert rows from a delimited file.
    Insert {
        /// File supplying the rows; its header must match the table.
        file: PathBuf,
    },

    /// Fetch rows, optionally filtered, ordered, and limited.
    Query {
        /// Filter fragment; repeatable, fragments are AND-joined.
        #[arg(short, long = "filter")]
        filters: Vec<String>,

        /// Column to order by.
        #[arg(short, long)]
        order_by: Option<String>,

        /// Order descending instead of ascending.
        #[arg(long)]
        desc: bool,

        /// Maximum number of rows to fetch.
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Update matching rows with new values.
    Update {
        /// New value for a column, as `column=value`; repeatable.
        #[arg(short, long = "set", value_name = "COLUMN=VALUE")]
        sets: Vec<String>,

        /// Filter fragment; repeatable and required.
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },

    /// Delete matching rows.
    Delete {
        /// Filter fragment; repeatable.
        #[arg(short, long = "filter")]
        filters: Vec<String>,

        /// Delete every row (required when no filter is given).
        #[arg(long)]
        all: bool,
    },

    /// Rename the table.
    RenameTable {
        /// The new table name.
        new_name: String,
    },

    /// Add columns with explicit storage types.
    AddColumns {
        /// Comma-separated column names.
        #[arg(long)]
        columns: String,

        /// Comma-separated storage types (real, varchar(200), int, bit).
        #[arg(long)]
        types: String,
    },

    /// Rename columns pairwise.
    RenameColumns {
        /// Comma-separated columns to rename.
        #[arg(long)]
        from: String,

        /// Comma-separated new names.
        #[arg(long)]
        to: String,
    },

    /// Drop columns.
    DropColumns {
        /// Comma-separated column names.
        columns: String,
    },

    /// Drop the whole table.
    DropTable,

    /// List the table's columns in schema order.
    Columns,

    /// Export the table to a delimited file.
    Export {
        /// Destination file.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut table = Table::connect(&cli.database, &cli.table).await?;

    match cli.command {
        Commands::Create {
            file,
            id_included,
            load,
        } => {
            let frame = flatfile::read_frame(&file, ',')?;
            table.create(&frame, id_included).await?;
            println!("Table \"{}\" created", table.name());
            if load {
                let inserted = table.insert(&frame).await?;
                println!("{inserted} records inserted into \"{}\"", table.name());
            }
        }

        Commands::Insert { file } => {
            let frame = flatfile::read_frame(&file, ',')?;
            let inserted = table.insert(&frame).await?;
            println!("{inserted} records inserted into \"{}\"", table.name());
        }

        Commands::Query {
            filters,
            order_by,
            desc,
            limit,
        } => {
            let conditions = raw_conditions(&filters);
            let order = match order_by {
                Some(column) if desc => Some(OrderBy::desc(&column)?),
                Some(column) => Some(OrderBy::asc(&column)?),
                None => None,
            };
            let frame = table.query(&conditions, order.as_ref(), limit).await?;
            print_frame(&frame);
        }

        Commands::Update { sets, filters } => {
            let patch = parse_sets(&sets)?;
            let conditions = raw_conditions(&filters);
            let updated = table.update(&patch, &conditions).await?;
            println!("{updated} rows updated in \"{}\"", table.name());
        }

        Commands::Delete { filters, all } => {
            if filters.is_empty() && !all {
                bail!("no filter given; pass --all to delete every row");
            }
            let conditions = raw_conditions(&filters);
            let removed = table.delete(&conditions).await?;
            println!("{removed} rows deleted from \"{}\"", table.name());
        }

        Commands::RenameTable { new_name } => {
            table.rename(&new_name).await?;
            println!("Table renamed to \"{}\"", table.name());
        }

        Commands::AddColumns { columns, types } => {
            let names = split_list(&columns);
            let parsed = parse_types(&names, &split_list(&types))?;
            table.add_columns(&names, &parsed).await?;
            println!("{} columns added to \"{}\"", names.len(), table.name());
        }

        Commands::RenameColumns { from, to } => {
            let renamed = table
                .rename_columns(&split_list(&from), &split_list(&to))
                .await?;
            println!("{renamed} columns renamed in \"{}\"", table.name());
        }

        Commands::DropColumns { columns } => {
            let names = split_list(&columns);
            table.drop_columns(&names).await?;
            println!("{} columns dropped from \"{}\"", names.len(), table.name());
        }

        Commands::DropTable => {
            table.drop_table().await?;
            println!("Table \"{}\" dropped", table.name());
        }

        Commands::Columns => {
            for column in table.columns().await? {
                println!("{column}");
            }
        }

        Commands::Export { file } => {
            let rows = table.export(&file).await?;
            println!(
                "{rows} rows exported from \"{}\" to {}",
                table.name(),
                file.display()
            );
        }
    }

    table.close().await?;
    Ok(())
}

/// Splits a comma-separated entry list, tolerating stray whitespace.
fn split_list(text: &str) -> Vec<String> {
    text.replace(',', " ")
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Wraps front-end-collected filter text as raw condition fragments.
fn raw_conditions(filters: &[String]) -> Vec<Condition> {
    filters.iter().map(Condition::raw).collect()
}

/// Parses `column=value` pairs into a single-row update payload.
fn parse_sets(sets: &[String]) -> anyhow::Result<Frame> {
    let mut columns = Vec::with_capacity(sets.len());
    let mut row = Vec::with_capacity(sets.len());
    for set in sets {
        let Some((column, value)) = set.split_once('=') else {
            bail!("expected COLUMN=VALUE, got '{set}'");
        };
        columns.push(String::from(column.trim()));
        row.push(Value::parse(value.trim()));
    }
    let mut frame = Frame::new(columns);
    if !row.is_empty() {
        frame.push_row(row)?;
    }
    Ok(frame)
}

/// Parses one storage type per column name.
fn parse_types(columns: &[String], types: &[String]) -> anyhow::Result<Vec<SqlType>> {
    if types.len() != columns.len() {
        bail!(
            "expected {} storage types, got {}",
            columns.len(),
            types.len()
        );
    }
    columns
        .iter()
        .zip(types)
        .map(|(column, text)| Ok(SqlType::parse(column, text)?))
        .collect()
}

/// Prints a frame as an aligned text table.
fn print_frame(frame: &Frame) {
    let mut widths: Vec<usize> = frame.columns().iter().map(String::len).collect();
    let rendered: Vec<Vec<String>> = frame
        .rows()
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header: Vec<String> = frame
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{c:<width$}", width = widths[i]))
        .collect();
    println!("{}", header.join(" | "));
    println!("{:-<total$}", "", total = header.join(" | ").len());
    for row in &rendered {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{cell:<width$}", width = widths[i]))
            .collect();
        println!("{}", cells.join(" | "));
    }
    println!("({} rows)", frame.len());
}
