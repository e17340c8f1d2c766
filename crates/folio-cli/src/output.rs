//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use folio_core::{
    BlogPost, Certificate, ChangeRecord, Project, SkillGroups, SocialLink, VisitorEntry,
};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a list of certificates
    pub fn print_certificates(&self, certificates: &[Certificate]) {
        match self.format {
            OutputFormat::Human => {
                if certificates.is_empty() {
                    println!("No certificates.");
                    return;
                }
                for cert in certificates {
                    println!(
                        "{:>4} | {}{} | {} | {}",
                        cert.id,
                        truncate(&cert.name, 35),
                        visibility_marker(cert.is_visible),
                        truncate(&cert.issuer, 25),
                        cert.issued_on
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
                println!("\n{} certificate(s)", certificates.len());
            }
            OutputFormat::Json => print_json(certificates),
            OutputFormat::Quiet => {
                for cert in certificates {
                    println!("{}", cert.id);
                }
            }
        }
    }

    /// Print a list of projects
    pub fn print_projects(&self, projects: &[Project]) {
        match self.format {
            OutputFormat::Human => {
                if projects.is_empty() {
                    println!("No projects.");
                    return;
                }
                for project in projects {
                    println!(
                        "{:>4} | {}{} | {}",
                        project.id,
                        truncate(&project.title, 35),
                        visibility_marker(project.is_visible),
                        truncate(&project.description, 45)
                    );
                }
                println!("\n{} project(s)", projects.len());
            }
            OutputFormat::Json => print_json(projects),
            OutputFormat::Quiet => {
                for project in projects {
                    println!("{}", project.id);
                }
            }
        }
    }

    /// Print a list of blog posts
    pub fn print_posts(&self, posts: &[BlogPost]) {
        match self.format {
            OutputFormat::Human => {
                if posts.is_empty() {
                    println!("No posts.");
                    return;
                }
                for post in posts {
                    println!(
                        "{:>4} | {}{} | {}",
                        post.id,
                        truncate(&post.title, 40),
                        visibility_marker(post.is_visible),
                        post.published_on
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "draft".to_string())
                    );
                }
                println!("\n{} post(s)", posts.len());
            }
            OutputFormat::Json => print_json(posts),
            OutputFormat::Quiet => {
                for post in posts {
                    println!("{}", post.id);
                }
            }
        }
    }

    /// Print a list of social links
    pub fn print_socials(&self, links: &[SocialLink]) {
        match self.format {
            OutputFormat::Human => {
                if links.is_empty() {
                    println!("No social links.");
                    return;
                }
                for link in links {
                    println!(
                        "{:>4} | {}{} | {}",
                        link.id,
                        truncate(&link.platform, 15),
                        visibility_marker(link.is_active),
                        truncate(&link.url, 55)
                    );
                }
                println!("\n{} link(s)", links.len());
            }
            OutputFormat::Json => print_json(links),
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", link.id);
                }
            }
        }
    }

    /// Print the skill groups
    pub fn print_skills(&self, skills: &SkillGroups) {
        match self.format {
            OutputFormat::Human => {
                if skills.is_empty() {
                    println!("No skills.");
                    return;
                }
                for (category, entries) in skills {
                    println!("{}: {}", category, entries.join(", "));
                }
            }
            OutputFormat::Json => print_json(skills),
            OutputFormat::Quiet => {
                for category in skills.keys() {
                    println!("{}", category);
                }
            }
        }
    }

    /// Print change log records
    pub fn print_records(&self, records: &[ChangeRecord]) {
        match self.format {
            OutputFormat::Human => {
                if records.is_empty() {
                    println!("Change log is empty.");
                    return;
                }
                for record in records {
                    println!(
                        "[{}] {} {} ({})",
                        record.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                        record.event,
                        record.action,
                        truncate(&record.agent, 25)
                    );
                }
                println!("\n{} record(s)", records.len());
            }
            OutputFormat::Json => print_json(records),
            OutputFormat::Quiet => {
                for record in records {
                    println!("{} {}", record.event, record.action);
                }
            }
        }
    }

    /// Print visitor log entries
    pub fn print_visits(&self, visits: &[VisitorEntry]) {
        match self.format {
            OutputFormat::Human => {
                if visits.is_empty() {
                    println!("No recorded visits.");
                    return;
                }
                for visit in visits {
                    println!(
                        "[{}] {} {}",
                        visit.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                        truncate(&visit.path, 40),
                        visit.referrer.as_deref().unwrap_or("")
                    );
                }
                println!("\n{} visit(s)", visits.len());
            }
            OutputFormat::Json => print_json(visits),
            OutputFormat::Quiet => {
                for visit in visits {
                    println!("{}", visit.path);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("Failed to serialize output: {}", err),
    }
}

fn visibility_marker(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        " [hidden]"
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_visibility_marker() {
        assert_eq!(visibility_marker(true), "");
        assert_eq!(visibility_marker(false), " [hidden]");
    }
}
