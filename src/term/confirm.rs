use std::io::{self, BufRead, Write};

/// Asks the user a yes/no question. Injected into the switch flow so the
/// core logic is testable without a terminal.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Reads the answer from standard input. EOF or a read error counts as no.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> bool {
        print!("{}", question);
        let _ = io::stdout().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "yes" || answer == "y"
}
