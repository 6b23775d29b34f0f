use arena_core::{ExecutionMode, ProblemMetadata};
use arena_judge::JudgeBackend;
use arena_session::{ConsoleTab, NoticeLevel, Session};
use arena_store::CodeStore;
use colored::Colorize;

pub fn metadata(meta: &ProblemMetadata) {
    println!("> {} ({})", meta.title.bold(), meta.problem_id);
    if !meta.difficulty.is_empty() {
        println!("    Difficulty: {}", meta.difficulty);
    }
    if !meta.tags.is_empty() {
        println!("    Tags: {}", meta.tags.join(", "));
    }
    println!("    Languages: {}", meta.supported_languages.join(", "));
    if !meta.description.is_empty() {
        println!();
        println!("{}", meta.description);
    }

    if !meta.sample_cases().is_empty() {
        println!();
        println!("{}", "Sample cases".bold());
        for (idx, tc) in meta.sample_cases().iter().enumerate() {
            println!("    #{} {} => {}", idx + 1, tc.input, tc.expected);
        }
    }
}

pub fn outcome<B: JudgeBackend, S: CodeStore>(session: &Session<B, S>) {
    if let Some(notice) = session.notice() {
        let line = match notice.level {
            NoticeLevel::Success => notice.message.green().bold(),
            NoticeLevel::Warning => notice.message.yellow().bold(),
            NoticeLevel::Error => notice.message.red().bold(),
        };
        println!("{}", line);
    }

    match session.focused_tab() {
        ConsoleTab::Output => {
            for line in session.output() {
                println!("    {}", line);
            }
        }
        // Submit failures point into the hidden suite, which is not listed locally.
        ConsoleTab::TestCases if session.last_mode() == Some(ExecutionMode::Run) => {
            let highlighted = session.highlighted_case();
            for (idx, tc) in session.test_set(ExecutionMode::Run).iter().enumerate() {
                let marker = if highlighted == Some(idx) {
                    "●".red()
                } else {
                    "●".green()
                };
                println!("    {} #{} {} => {}", marker, idx + 1, tc.input, tc.expected);
            }
        }
        ConsoleTab::TestCases => {}
    }

    if let Some(result) = session.result() {
        println!();
        print!("{}", result);
    }
}
