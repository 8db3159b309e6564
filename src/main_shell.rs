// Copyright (C) 2020-2024 Andy Kurnia.

use longword::{config, contest, error};

fn print_help() {
    println!("start              draw letters and start the clock (stop the last round first)");
    println!("say <user> <word>  submit a word for someone");
    println!("stop               abort the round");
    println!("wait <ms>          pause, mostly for sourced scripts");
    println!("source <file>      run commands from a file");
    println!("exit");
}

// rustyline blocks, so it gets its own thread.
fn read_lines(lines: tokio::sync::mpsc::UnboundedSender<String>) {
    let mut rl = match rustyline::DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            println!("Error: {err:?}");
            return;
        }
    };
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                if lines.send(line).is_err() {
                    break;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        }
    }
}

async fn start_round(contest: &contest::Contest<String>) {
    let started = contest
        .try_start(
            Box::new(|line: &str| println!("{line}")),
            Box::new(|winner: Option<String>| match winner {
                Some(user) => println!("(round over, {user} wins, stop before the next start)"),
                None => println!("(round over, nobody wins, stop before the next start)"),
            }),
        )
        .await;
    match started {
        Ok(()) => {}
        Err(err @ error::RoundError::NotIdle(_)) => println!("{err}, stop first"),
        Err(err) => println!("Error: {err}"),
    }
}

#[tokio::main]
async fn main() -> error::Returns<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = std::env::args().collect::<Vec<_>>();
    if args.len() < 2 {
        println!(
            "args:
  shell words.txt
    plain word list, one word per line, default settings
  shell config.json
    {{\"dictFile\": \"words.txt\", \"durationMs\": 30000, ...}}"
        );
        return Ok(());
    }
    let config = if args[1].ends_with(".json") {
        config::RoundConfig::from_file(&args[1])?
    } else {
        config::RoundConfig::new(&args[1])
    };
    let contest = contest::Contest::<String>::new(config)?;
    println!("{}: {}", contest.title(), contest.rules());
    let t0 = std::time::Instant::now();
    let num_words = contest.ready().await?;
    println!(
        "{} words loaded in {}ms, help for help",
        num_words,
        t0.elapsed().as_millis()
    );

    let (lines_tx, mut lines_rx) = tokio::sync::mpsc::unbounded_channel();
    std::thread::spawn(move || read_lines(lines_tx));

    let mut cmd_stack = Vec::<(String, Option<(String, usize)>)>::new();
    loop {
        let (line, source) = match cmd_stack.pop() {
            Some(cmd) => cmd,
            None => match lines_rx.recv().await {
                Some(line) => (line, None),
                None => break,
            },
        };
        if let Some((filename, line_num)) = source {
            println!("{filename}:{line_num}> {line}");
        }
        let strings = match shell_words::split(&line) {
            Ok(strings) => strings,
            Err(err) => {
                println!("Bad quoting: {err:?}");
                continue;
            }
        };
        if strings.is_empty() {
            continue;
        }
        match strings[0].as_str() {
            "help" => print_help(),
            "exit" => break,
            "start" => start_round(&contest).await,
            "stop" => contest.stop(),
            "say" => {
                if strings.len() > 2 {
                    contest.handle_message(strings[2..].join(" "), strings[1].clone());
                } else {
                    println!("need a user and a word");
                }
            }
            "wait" => match strings.get(1).map(|ms| ms.parse::<u64>()) {
                Some(Ok(ms)) => tokio::time::sleep(std::time::Duration::from_millis(ms)).await,
                _ => println!("need a number of milliseconds"),
            },
            "source" => {
                if strings.len() > 1 {
                    match std::fs::read_to_string(&strings[1]) {
                        Ok(whole_file) => {
                            let v = cmd_stack.len();
                            for (line_num, line) in whole_file.lines().enumerate() {
                                cmd_stack.push((
                                    line.to_string(),
                                    Some((strings[1].clone(), line_num + 1)),
                                ));
                            }
                            cmd_stack[v..].reverse();
                        }
                        Err(err) => {
                            println!("cannot open file: {err:?}");
                        }
                    }
                } else {
                    println!("need another arg");
                }
            }
            _ => {
                println!("invalid input, help for help");
            }
        }
    }
    contest.stop();

    Ok(())
}
