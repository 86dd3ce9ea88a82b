use std::{
    env,
    io::{self, Write},
};

use log::info;
use rustdb::{Config, Database, ResultSet, storage::FileStore};

const HELP: &str = "\
Available SQL commands:
  CREATE TABLE name (col TYPE [PRIMARY KEY|UNIQUE|NOT NULL|DEFAULT v], ...)
  INSERT INTO name [(cols)] VALUES (v1, v2, ...)
  SELECT cols|* FROM name [JOIN name ON cond] [WHERE pred] [ORDER BY cols]
  UPDATE name SET col = v, ... [WHERE pred]
  DELETE FROM name [WHERE pred]
  DROP TABLE name
  CREATE INDEX idx ON name (col1, col2)
  BEGIN [TRANSACTION] | COMMIT | ROLLBACK

Data types: INTEGER, TEXT, REAL, BOOLEAN, DATE

Shell commands:
  TABLES  list all tables
  HELP    show this help
  EXIT    quit";

fn main() -> rustdb::Result<()> {
    env_logger::init();

    let mut config = Config::from_env();
    if let Some(dir) = env::args().nth(1) {
        config = config.with_data_dir(dir);
    }
    info!("opening database in {}", config.data_dir.display());
    let mut db = Database::open(&config)?;

    println!("RustDB SQL shell");
    println!("Type 'EXIT' to quit, 'HELP' for help");
    println!();

    let stdin = io::stdin();
    loop {
        print!("SQL> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break; // EOF
        }
        let command = input.trim();
        if command.is_empty() {
            continue;
        }
        match command.to_uppercase().as_str() {
            "EXIT" => break,
            "HELP" => println!("{}", HELP),
            "TABLES" => show_tables(&db),
            _ => match db.execute(command) {
                Ok(result) => print_result(&result),
                Err(e) => println!("Error: {}", e),
            },
        }
    }
    Ok(())
}

fn print_result(result: &ResultSet) {
    let ResultSet::Scan { columns, rows } = result else {
        if let Some(status) = result.status() {
            println!("{}", status);
        }
        return;
    };

    println!("{}", columns.join(" | "));
    println!("{}", "-".repeat(columns.len() * 10));
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        println!("{}", cells.join(" | "));
    }
    println!("\n{} row(s) returned", rows.len());
}

fn show_tables(db: &Database<FileStore>) {
    let mut tables = db.tables().peekable();
    if tables.peek().is_none() {
        println!("No tables in database");
        return;
    }

    println!("\nTables in database:");
    for table in tables {
        println!("\n{}:", table.name);
        for col in &table.columns {
            let mut constraints = Vec::new();
            if col.primary_key {
                constraints.push("PRIMARY KEY".to_string());
            }
            if col.unique {
                constraints.push("UNIQUE".to_string());
            }
            if !col.nullable {
                constraints.push("NOT NULL".to_string());
            }
            if let Some(default) = &col.default {
                constraints.push(format!("DEFAULT {}", default));
            }
            if constraints.is_empty() {
                println!("  - {}: {}", col.name, col.datatype);
            } else {
                println!("  - {}: {} [{}]", col.name, col.datatype, constraints.join(", "));
            }
        }
        println!("  Rows: {}", table.rows.len());
        println!("  Indexes: {}", table.indexes.len());
    }
}
