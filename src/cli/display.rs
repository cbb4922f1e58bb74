//! Terminal rendering for classifications, answers and model status

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::models::{ModelStatus, RoleStatus};
use crate::types::{Classification, Priority, RAGResponse, Sentiment};

/// Progress bar for batch classification
pub fn batch_progress(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.cyan} Classifying [{bar:40.cyan/blue}] {pos}/{len} | ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb
}

fn priority_label(priority: Priority) -> ColoredString {
    match priority {
        Priority::P0 => priority.label().red().bold(),
        Priority::P1 => priority.label().yellow(),
        Priority::P2 => priority.label().green(),
    }
}

fn sentiment_label(sentiment: Sentiment) -> ColoredString {
    match sentiment {
        Sentiment::Angry => sentiment.label().red(),
        Sentiment::Frustrated => sentiment.label().yellow(),
        Sentiment::Urgent => sentiment.label().magenta(),
        Sentiment::Curious => sentiment.label().cyan(),
        Sentiment::Neutral => sentiment.label().normal(),
    }
}

pub fn print_classification(classification: &Classification) {
    let tags: Vec<&str> = classification.topic_tags.iter().map(|t| t.label()).collect();
    println!("{}", "Classification".bold().cyan());
    println!("  {:<11} {}", "Topics:", tags.join(", ").bold());
    println!("  {:<11} {}", "Sentiment:", sentiment_label(classification.sentiment));
    println!("  {:<11} {}", "Priority:", priority_label(classification.priority));
    println!("  {:<11} {:.2}", "Confidence:", classification.confidence);
    println!("  {:<11} {}", "Reasoning:", classification.reasoning.dimmed());
}

pub fn print_response(response: &RAGResponse) {
    println!("{}", "Response".bold().cyan());
    println!("{}", response.answer);
    if !response.sources.is_empty() {
        println!("\n{}", "Sources:".bold());
        for source in &response.sources {
            println!("  - {}", source.blue());
        }
    }
    println!("\n  {:<11} {:.2}", "Confidence:", response.confidence);
    println!("  {:<11} {}", "Reasoning:", response.reasoning.dimmed());
}

fn role_line(role: &str, status: &RoleStatus) {
    let state = match status {
        RoleStatus::Model(_) => status.to_string().green(),
        RoleStatus::Fallback(_) => status.to_string().yellow(),
    };
    println!("  {:<20} {}", role, state);
}

pub fn print_status(status: &ModelStatus) {
    println!("{}", "Models".bold().cyan());
    role_line("Embedder:", &status.embedder);
    role_line("Topic classifier:", &status.topic);
    role_line("Sentiment:", &status.sentiment);
    role_line("Answer generator:", &status.generator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_progress_length() {
        let pb = batch_progress(7);
        assert_eq!(pb.length(), Some(7));
    }

    #[test]
    fn test_priority_label_text() {
        colored::control::set_override(false);
        assert_eq!(priority_label(Priority::P0).to_string(), "P0 (High)");
        assert_eq!(sentiment_label(Sentiment::Curious).to_string(), "Curious");
    }
}
