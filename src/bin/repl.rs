use clap::Parser;
use rolldice::{DiceError, DiceRoller, RollConfig};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "repl", about = "Roll dice expressions, one per line", version)]
struct Cli {
    /// Keep fractional results and accept decimal numbers
    #[arg(long)]
    floats: bool,
    /// Treat function names like `abs` as dice terms
    #[arg(long)]
    no_functions: bool,
    /// Roll this expression once instead of reading lines from stdin
    expression: Option<String>,
}

fn report(roller: &mut DiceRoller, line: &str) {
    match roller.roll(line) {
        Ok((value, explanation)) => println!("{} = {}", explanation, value),
        Err(DiceError::GroupSyntax(why)) => eprintln!("Invalid dice: {}", why),
        Err(DiceError::Expression(why)) => eprintln!("Invalid expression: {}", why),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RollConfig::default()
        .with_floats(cli.floats)
        .with_functions(!cli.no_functions);
    let mut roller = DiceRoller::new(config);

    if let Some(expression) = cli.expression {
        report(&mut roller, &expression);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(Ok(line)) = lines.next() {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            break;
        }
        if !line.is_empty() {
            report(&mut roller, line);
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
