use std::io::{self, BufRead, Write};

use tracing::info;

use crate::memory::ConversationMemory;
use crate::runtime::AssistantRuntime;

pub const PROMPT: &str = "> ";
pub const EXIT_TOKENS: [&str; 3] = ["q", "quit", "exit"];
pub const FAREWELL: &str = "Goodbye!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    ExitToken,
    EndOfInput,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopSummary {
    pub answered: usize,
    pub exit: LoopExit,
    pub memory: ConversationMemory,
}

pub fn is_exit_token(line: &str) -> bool {
    let trimmed = line.trim();
    EXIT_TOKENS.iter().any(|token| trimmed.eq_ignore_ascii_case(token))
}

/// Line-oriented interactive session. Blank lines are skipped, invalid
/// UTF-8 is replaced rather than rejected, and the session ends on an exit
/// token or end of input.
pub struct QueryLoop<'a, R, W> {
    runtime: &'a AssistantRuntime,
    input: R,
    output: W,
    memory: ConversationMemory,
}

impl<'a, R, W> QueryLoop<'a, R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(runtime: &'a AssistantRuntime, input: R, output: W) -> Self {
        Self { runtime, input, output, memory: ConversationMemory::new() }
    }

    pub fn run(mut self) -> io::Result<LoopSummary> {
        let mut answered = 0;
        let mut buffer = Vec::new();

        let exit = loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            buffer.clear();
            if self.input.read_until(b'\n', &mut buffer)? == 0 {
                break LoopExit::EndOfInput;
            }
            let line = String::from_utf8_lossy(&buffer);
            let query = line.trim();

            if query.is_empty() {
                continue;
            }
            if is_exit_token(query) {
                writeln!(self.output, "{FAREWELL}")?;
                break LoopExit::ExitToken;
            }

            let response = self.runtime.handle_query(query, &mut self.memory);
            write!(self.output, "{}", response.render())?;
            answered += 1;
        };

        info!(
            event_name = "sellerbot.session.ended",
            answered,
            exit = ?exit,
            "query loop finished"
        );
        Ok(LoopSummary { answered, exit, memory: self.memory })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use sellerbot_core::eligibility::Thresholds;
    use sellerbot_core::{SellerCatalog, SellerId, SellerRecord};

    use super::{is_exit_token, LoopExit, QueryLoop};
    use crate::runtime::AssistantRuntime;

    fn runtime() -> AssistantRuntime {
        let record = |id: &str, rating: f64, sold: &str| SellerRecord {
            user_id: SellerId(id.to_string()),
            user_name: id.to_uppercase(),
            rating: Some(rating),
            sold_raw: sold.to_string(),
            reviews_raw: "1K".to_string(),
            enrichment: None,
        };
        let catalog = SellerCatalog::from_records(vec![
            record("alpha", 5.0, "1.2K"),
            record("bravo", 4.5, "3K"),
        ])
        .expect("catalog");
        AssistantRuntime::new(catalog, Thresholds::default(), 10)
    }

    fn run(input: &[u8]) -> (super::LoopSummary, String) {
        let runtime = runtime();
        let mut output = Vec::new();
        let summary = QueryLoop::new(&runtime, Cursor::new(input.to_vec()), &mut output)
            .run()
            .expect("loop should run");
        (summary, String::from_utf8(output).expect("utf-8 output"))
    }

    #[test]
    fn exit_tokens_are_case_insensitive() {
        for token in ["q", "QUIT", " Exit "] {
            assert!(is_exit_token(token), "token: {token}");
        }
        assert!(!is_exit_token("quitter"));
    }

    #[test]
    fn exit_token_says_goodbye() {
        let (summary, output) = run(b"top 1\nquit\ntop 2\n");
        assert_eq!(summary.exit, LoopExit::ExitToken);
        assert_eq!(summary.answered, 1);
        assert!(output.contains("TOP 1 BY RATING"));
        assert!(output.trim_end().ends_with("Goodbye!"));
        assert!(!output.contains("TOP 2"));
    }

    #[test]
    fn end_of_input_ends_quietly() {
        let (summary, output) = run(b"\n   \ntop 1 sold");
        assert_eq!(summary.exit, LoopExit::EndOfInput);
        assert_eq!(summary.answered, 1);
        assert!(!output.contains("Goodbye!"));
        assert!(summary.memory.last_explanation().is_some_and(|text| text.contains("'sold'")));
    }

    #[test]
    fn memory_carries_across_lines() {
        let (summary, output) = run(b"top 2 sold\nwhy\n");
        assert_eq!(summary.answered, 2);
        assert!(output.contains("CONTEXTUAL ANSWER:"));
        assert!(output.contains("sorted by Items Sold"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let (summary, output) = run(b"\xff\xfe\n");
        assert_eq!(summary.answered, 1);
        assert!(output.contains("not found in database"));
    }
}
