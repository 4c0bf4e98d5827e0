use anyhow::{Context, Result};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

use financial_chatbot::{group_thousands, load_csv, process_query, DatasetIndex, DEFAULT_DATA_PATH};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    // Optional `--data <path>` in front of the command.
    let (data_path, command) = match args.split_first() {
        Some((flag, rest)) if flag == "--data" => {
            let (path, command) = rest
                .split_first()
                .context("--data requires a file path")?;
            (path.clone(), command.to_vec())
        }
        _ => (DEFAULT_DATA_PATH.to_string(), args),
    };

    let index = load_csv(Path::new(&data_path))?;
    println!(
        "📊 Loaded {} rows for {} companies from {}",
        index.records().len(),
        index.companies().len(),
        data_path
    );

    match command.first().map(String::as_str) {
        Some("ask") => {
            let query = command[1..].join(" ");
            println!("{}", process_query(&query, &index));
        }
        Some("summary") => print_summary(&index),
        _ => run_repl(&index)?,
    }

    Ok(())
}

/// Per-company overview of the loaded dataset.
fn print_summary(index: &DatasetIndex) {
    for company in index.companies() {
        let Some(summary) = index.summary(company) else {
            continue;
        };

        println!("\n{} (latest year: {})", company, summary.latest_year);
        for (i, year) in summary.years.iter().enumerate() {
            println!(
                "  {}: revenue ${}, net income ${}",
                year,
                group_thousands(summary.revenues[i]),
                group_thousands(summary.net_incomes[i]),
            );
        }
    }
}

/// Interactive chat loop over stdin. Ends on EOF, "quit" or "exit".
fn run_repl(index: &DatasetIndex) -> Result<()> {
    println!("💬 Financial Chatbot - type a question, or 'quit' to leave\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("you> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query == "quit" || query == "exit" {
            break;
        }

        println!("bot> {}\n", process_query(query, index));
    }

    println!("\n✓ Bye");
    Ok(())
}
