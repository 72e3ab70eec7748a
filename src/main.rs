use avl_set::avl_tree::AvlSet;
use log::{debug, info, warn};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::io::{self, BufRead, Write};

const LOG_LEVEL_VAR: &str = "AVL_SET_LOG";

fn log_level() -> LevelFilter {
    env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn main() -> io::Result<()> {
    if TermLogger::init(log_level(), Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
        .is_err()
    {
        eprintln!("a logger is already installed");
    }

    let mut set: AvlSet<i64> = (1..=20).collect();
    info!("built a set of {} values with height {:?}", set.len(), set.height());
    print!("{}", set.to_debug_string());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "value to remove? ")?;
        stdout.flush()?;

        let mut buffer = String::new();
        if input.read_line(&mut buffer)? == 0 {
            break;
        }
        let line = buffer.trim();
        if line.is_empty() {
            break;
        }

        match line.parse::<i64>() {
            Ok(value) => {
                if set.discard(&value) {
                    info!("removed {}, {} values left", value, set.len());
                } else {
                    debug!("{} is not in the set", value);
                }
                print!("{}", set.to_debug_string());
            },
            Err(err) => warn!("ignoring {:?}: {}", line, err),
        }
    }

    Ok(())
}
