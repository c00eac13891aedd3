//! Terminal input/output utilities for the client.
//!
//! The readline loop runs on a dedicated thread (rustyline is synchronous)
//! and feeds the async session loop through channels: one for submitted
//! lines, one for keystroke notifications that drive the typing debounce.

use std::io::Write;

use rustyline::Editor;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use tokio::sync::mpsc;

/// Redisplay the prompt after printing output over it
pub fn redisplay_prompt(username: &str) {
    print!("{}> ", username);
    std::io::stdout().flush().ok();
}

/// Rustyline helper that reports each edit of the input line.
///
/// Rustyline recomputes hints on every keystroke, which is exactly the
/// granularity the typing debounce needs; the hint itself is never shown.
struct InputNotifier {
    keystrokes: mpsc::UnboundedSender<()>,
}

impl Completer for InputNotifier {
    type Candidate = String;
}

impl Hinter for InputNotifier {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        let _ = self.keystrokes.send(());
        None
    }
}

impl Highlighter for InputNotifier {}

impl Validator for InputNotifier {}

impl rustyline::Helper for InputNotifier {}

/// Spawn the readline thread. Returns the line channel and the keystroke
/// channel; both close when the user exits with Ctrl+C or Ctrl+D.
pub fn spawn_readline_thread(
    username: &str,
) -> (
    mpsc::UnboundedReceiver<String>,
    mpsc::UnboundedReceiver<()>,
) {
    let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();
    let (key_tx, key_rx) = mpsc::unbounded_channel::<()>();
    let prompt = format!("{}> ", username);

    std::thread::spawn(move || {
        let mut rl = match Editor::<InputNotifier, DefaultHistory>::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };
        rl.set_helper(Some(InputNotifier { keystrokes: key_tx }));

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if line_tx.send(line.to_string()).is_err() {
                            // Session loop is gone, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    (line_rx, key_rx)
}
