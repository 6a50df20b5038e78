use std::{env, process};

use baca::{
    db::Database,
    executor::query::QueryOutput,
    planner::select::Projection,
    types::error::DatabaseError,
};
use rustyline::{error::ReadlineError, DefaultEditor};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: baca <database-file> [command]");
        process::exit(1);
    };
    let command = args.next();

    let db = match Database::open(&path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let result = match command {
        Some(command) => run_command(&db, &command),
        None => shell(&db),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run_command(db: &Database, command: &str) -> Result<(), DatabaseError> {
    match command.trim() {
        ".dbinfo" => {
            println!("database page size: {}", db.page_size());
            println!("number of tables: {}", db.object_count());
        }
        ".tables" => {
            println!("{}", db.table_names().join(" "));
        }
        sql => run_sql(db, sql)?,
    }
    Ok(())
}

fn run_sql(db: &Database, sql: &str) -> Result<(), DatabaseError> {
    let stmt = db.parse(sql)?;

    if stmt.projection == Projection::Count {
        match db.execute(&stmt)? {
            QueryOutput::Count(n) => println!("{}", n),
            QueryOutput::Rows(rows) => println!("{}", rows.len()),
        }
        return Ok(());
    }

    for row in db.scan(&stmt)? {
        println!("{}", row?);
    }
    Ok(())
}

fn shell(db: &Database) -> Result<(), DatabaseError> {
    let mut rl = DefaultEditor::new().map_err(|e| std::io::Error::other(e.to_string()))?;
    println!("baca shell - .dbinfo, .tables, SELECT ..., .exit");

    loop {
        match rl.readline("baca> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    ".exit" | ".quit" => break,
                    command => {
                        // keep the shell alive across bad queries
                        if let Err(e) = run_command(db, command) {
                            eprintln!("{}", e);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}", e);
                break;
            }
        }
    }
    Ok(())
}
