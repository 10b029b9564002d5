//! Seraph CLI — command-line access to a REST graph store
//!
//! Uses the seraph client to read, write and query a running store.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use seraph::{
    Cell, ClientConfig, Direction, Entity, Node, OneOrMany, Properties, Relationship,
    RelationshipQuery, Row, Seraph,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seraph", version, about = "REST graph database client")]
struct Cli {
    /// Store endpoint
    #[arg(long, default_value = "http://localhost:7474", global = true, env = "SERAPH_URL")]
    url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout: u64,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a Cypher query
    Query {
        /// The query text
        cypher: String,

        /// Query parameter as key=value; the value is parsed as JSON when possible
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, Value)>,

        /// Print the table exactly as returned, without rebuilding entities
        #[arg(long)]
        raw: bool,
    },
    /// Read nodes by id
    Read {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Save a node given as a JSON object; an `id` key updates that node
    Save { json: String },
    /// Delete nodes by id
    Delete {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// List the relationships of a node
    Rels {
        id: u64,

        /// in, out or all
        #[arg(long, default_value = "all")]
        direction: Direction,

        /// Only relationships of this type (repeatable)
        #[arg(long = "type")]
        types: Vec<String>,
    },
    /// Look up entities in an index
    IndexRead {
        name: String,
        key: String,
        value: String,

        /// Search a relationship index instead of a node index
        #[arg(long)]
        rel: bool,
    },
}

fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig {
        timeout_secs: cli.timeout,
        ..ClientConfig::new(&cli.url)
    };

    let result = match Seraph::with_config(config) {
        Ok(db) => run(&db, cli.command, &cli.format).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// A single id is read or deleted on its own; several go through one batch
fn id_args(mut ids: Vec<u64>) -> OneOrMany<u64> {
    if ids.len() == 1 {
        OneOrMany::One(ids.remove(0))
    } else {
        OneOrMany::Many(ids)
    }
}

async fn run(
    db: &Seraph,
    command: Commands,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Query { cypher, params, raw } => {
            let params: Properties = params.into_iter().collect();
            let params = (!params.is_empty()).then_some(&params);
            if raw {
                let result = db.query_raw(&cypher, params).await?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                    OutputFormat::Table => print_table(
                        &result.columns,
                        result.data.iter().map(|row| row.iter().map(format_value).collect()),
                    ),
                }
            } else {
                let rows = db.query(&cypher, params).await?;
                print_rows(&rows, format)?;
            }
        }
        Commands::Read { ids } => {
            let nodes = db.read(id_args(ids)).await?.into_vec();
            print_nodes(&nodes, format)?;
        }
        Commands::Save { json } => {
            let object = match serde_json::from_str(&json)? {
                Value::Object(object) => object,
                other => return Err(format!("expected a JSON object, got {}", other).into()),
            };
            let node = Node::from_object(object, &db.config().id_key)?;
            let saved = db.save_one(node).await?;
            print_nodes(&[saved], format)?;
        }
        Commands::Delete { ids } => {
            let count = ids.len();
            db.delete(id_args(ids)).await?;
            println!("Deleted {} node(s)", count);
        }
        Commands::Rels { id, direction, types } => {
            let rels = db
                .relationships_of(id, &RelationshipQuery::new(direction, types))
                .await?;
            print_relationships(&rels, format)?;
        }
        Commands::IndexRead { name, key, value, rel } => {
            let index = if rel { db.rel_index() } else { db.node_index() };
            let hits = match index.read(&name, &key, value).await? {
                OneOrMany::One(hit) => vec![hit],
                OneOrMany::Many(hits) => hits,
            };
            let mut nodes = Vec::new();
            let mut rels = Vec::new();
            for hit in hits {
                match hit {
                    Entity::Node(node) => nodes.push(node),
                    Entity::Relationship(r) => rels.push(r),
                }
            }
            if rel {
                print_relationships(&rels, format)?;
            } else {
                print_nodes(&nodes, format)?;
            }
        }
    }
    Ok(())
}

fn print_table<I>(columns: &[String], rows: I)
where
    I: IntoIterator<Item = Vec<String>>,
{
    if columns.is_empty() {
        println!("(no results)");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(columns);

    let mut count = 0;
    for row in rows {
        table.add_row(row);
        count += 1;
    }

    println!("{}", table);
    println!("{} row(s)", count);
}

fn print_rows(rows: &[Row], format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }
    let columns: Vec<String> = match rows.first() {
        Some(Row::Named(cells)) => cells.keys().cloned().collect(),
        Some(Row::Single(_)) => vec!["value".to_string()],
        None => Vec::new(),
    };
    print_table(
        &columns,
        rows.iter().map(|row| match row {
            Row::Single(cell) => vec![format_cell(cell)],
            Row::Named(cells) => cells.values().map(format_cell).collect(),
        }),
    );
    Ok(())
}

fn print_nodes(nodes: &[Node], format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(nodes)?);
        return Ok(());
    }
    let columns = vec!["id".to_string(), "properties".to_string()];
    print_table(
        &columns,
        nodes.iter().map(|node| {
            vec![
                node.id().map(|id| id.to_string()).unwrap_or_default(),
                serde_json::to_string(&node.properties).unwrap_or_default(),
            ]
        }),
    );
    Ok(())
}

fn print_relationships(
    rels: &[Relationship],
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(rels)?);
        return Ok(());
    }
    let columns: Vec<String> = ["id", "start", "type", "end", "properties"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    print_table(
        &columns,
        rels.iter().map(|r| {
            vec![
                r.id().to_string(),
                r.start().to_string(),
                r.rel_type().to_string(),
                r.end().to_string(),
                serde_json::to_string(&r.properties).unwrap_or_default(),
            ]
        }),
    );
    Ok(())
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        // compact representations for entities
        Cell::Node(node) => format!(
            "({} {})",
            node.id().map(|id| id.to_string()).unwrap_or_default(),
            serde_json::to_string(&node.properties).unwrap_or_default()
        ),
        Cell::Relationship(r) => {
            format!("({})-[{}:{}]->({})", r.start(), r.id(), r.rel_type(), r.end())
        }
        Cell::Value(value) => format_value(value),
    }
}

fn format_value(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(_) | Value::Array(_) => serde_json::to_string(v).unwrap_or_default(),
    }
}
