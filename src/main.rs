use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tabledb_client::config::ClientConfig;
use tabledb_client::datatypes::{render_table, Column, ColumnType};
use tabledb_client::notify::Level;
use tabledb_client::orchestrator::{Confirm, Session};
use tabledb_client::store::HttpStore;
use tabledb_client::ClientResult;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabledb", about = "Browse and edit tables of a tabledb store")]
struct Cli {
    /// Store host, overrides config and TABLEDB_HOST
    #[arg(long)]
    host: Option<String>,

    /// Store port, overrides config and TABLEDB_PORT
    #[arg(long)]
    port: Option<u16>,

    /// TOML file with scheme/host/port/timeout_secs
    #[arg(long, env = "TABLEDB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the store answers
    Health,
    /// List table names
    Tables,
    /// Print the schema and records of a table
    Show { table: String },
    /// Create a table from `name:type` column specs
    CreateTable {
        name: String,
        #[arg(value_parser = parse_column, required = true)]
        columns: Vec<Column>,
    },
    /// Delete a table
    DropTable {
        name: String,
        #[arg(long)]
        yes: bool,
    },
    /// Insert a record, one text per column; blank cells take the default
    Insert { table: String, values: Vec<String> },
    /// Replace the values of a record
    Update {
        table: String,
        id: String,
        values: Vec<String>,
    },
    /// Delete a record
    Delete {
        table: String,
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Show records of table B that also appear in table A
    Intersect {
        table_a: String,
        table_b: String,
        /// Save the result as table `<a>_<b>_intersection`
        #[arg(long)]
        save: bool,
    },
}

fn parse_column(text: &str) -> Result<Column, String> {
    let (name, column_type) = text
        .rsplit_once(':')
        .ok_or_else(|| format!("expected `name:type`, got `{text}`"))?;
    let column_type: ColumnType = column_type.parse()?;
    Ok(Column::new(name, column_type))
}

/// Asks on stdin unless the operator already passed `--yes`.
fn confirm(prompt: &str, yes: bool) -> Confirm {
    if yes {
        return Confirm::Yes;
    }
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return Confirm::No;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return Confirm::No;
    }
    Confirm::from(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn run(cli: Cli, session: &mut Session<HttpStore>) -> ClientResult<()> {
    match cli.command {
        Command::Health => {
            if session.check_health() {
                session.notifications().info("store is reachable");
            }
        }
        Command::Tables => {
            session.refresh_tables()?;
            for table in session.tables() {
                println!("{table}");
            }
        }
        Command::Show { table } => {
            session.select_table(&table)?;
            if let Some(cache) = session.selected() {
                for column in cache.columns() {
                    println!("# {} {}", column.name, column.column_type);
                }
                print!("{}", render_table(cache.columns(), cache.records()));
            }
        }
        Command::CreateTable { name, columns } => {
            for column in &columns {
                session.add_builder_column(&column.name, column.column_type)?;
            }
            session.submit_builder(&name)?;
        }
        Command::DropTable { name, yes } => {
            let answer = confirm(&format!("delete table {name}?"), yes);
            session.delete_table(&name, answer)?;
        }
        Command::Insert { table, values } => {
            session.select_table(&table)?;
            for (column, text) in values.iter().enumerate() {
                session.set_draft_text(column, text)?;
            }
            session.submit_draft()?;
        }
        Command::Update { table, id, values } => {
            session.select_table(&table)?;
            session.begin_edit(&id)?;
            for (column, text) in values.iter().enumerate() {
                session.set_edit_text(column, text)?;
            }
            session.submit_edit()?;
        }
        Command::Delete { table, id, yes } => {
            session.select_table(&table)?;
            let answer = confirm(&format!("delete record {id} from {table}?"), yes);
            session.delete_record(&id, answer)?;
        }
        Command::Intersect {
            table_a,
            table_b,
            save,
        } => {
            // selecting A first lets the result carry its column names
            session.select_table(&table_a)?;
            let found = session.intersect(&table_a, &table_b)?;
            print!("{}", found.render());
            if save {
                session.save_intersection_as_table()?;
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = match ClientConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let store = match HttpStore::new(&config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };
    let mut session = Session::new(store);

    let result = run(cli, &mut session);

    let mut failed = false;
    for notification in session.notifications().drain() {
        failed = notification.level == Level::Error;
        match notification.level {
            Level::Info => println!("{notification}"),
            Level::Error => eprintln!("{notification}"),
        }
    }

    if failed || result.is_err() {
        process::exit(1);
    }
}
